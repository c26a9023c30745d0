use crate::policy::{ConfigField, ConfigSchema};
use crate::registry::{RegistrationError, RuleDescriptor, RuleRegistry};
use crate::resources::{MethodSettings, ResourceKind, RestApi, Stage};
use crate::validation::typed;
use awsguard_types::ids;

/// Endpoint type AWS assigns when a REST API does not configure one.
const DEFAULT_ENDPOINT_TYPE: &str = "EDGE";

pub fn register(registry: &mut RuleRegistry) -> Result<(), RegistrationError> {
    registry.register(endpoint_type())?;
    registry.register(method_cached_and_encrypted())?;
    registry.register(stage_cached())?;
    Ok(())
}

fn endpoint_type() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_APIGATEWAY_ENDPOINT_TYPE,
        ids::NAME_APIGATEWAY_ENDPOINT_TYPE,
        "Checks API Gateway endpoint configuration is one of the allowed types.",
        vec![typed::<RestApi, _>(
            ResourceKind::ApiGatewayRestApi,
            |api, config, reporter| {
                let allowed = config.string_list("allowedTypes").unwrap_or_default();
                let types = api
                    .endpoint_configuration
                    .as_ref()
                    .and_then(|c| c.types.as_ref())
                    .map(|t| t.values())
                    .unwrap_or_else(|| vec![DEFAULT_ENDPOINT_TYPE]);

                let name = api.name.as_deref().unwrap_or("<unnamed>");
                for endpoint in types.into_iter().filter(|t| !allowed.contains(t)) {
                    reporter.report(format!(
                        "API Gateway '{name}' has an unsupported endpoint type '{endpoint}'; allowed types: {}",
                        allowed.join(", ")
                    ));
                }
                Ok(())
            },
        )],
    )
    .with_config(ConfigSchema::new(vec![ConfigField::string_list(
        "allowedTypes",
        &[DEFAULT_ENDPOINT_TYPE],
        "Endpoint types a REST API may use.",
    )]))
}

fn method_cached_and_encrypted() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_APIGATEWAY_METHOD_CACHED_AND_ENCRYPTED,
        ids::NAME_APIGATEWAY_METHOD_CACHED_AND_ENCRYPTED,
        "Checks API Gateway Methods that responses are configured to be cached and that those cached responses are encrypted.",
        vec![typed::<MethodSettings, _>(
            ResourceKind::ApiGatewayMethodSettings,
            |method, _, reporter| {
                let path = method.method_path.as_deref().unwrap_or("<unknown>");
                let settings = method.settings.clone().unwrap_or_default();
                if settings.caching_enabled != Some(true) {
                    reporter.report(format!(
                        "API Gateway Method '{path}' does not have caching enabled."
                    ));
                }
                if settings.cache_data_encrypted != Some(true) {
                    reporter.report(format!(
                        "API Gateway Method '{path}' not configured to encrypt cached responses."
                    ));
                }
                Ok(())
            },
        )],
    )
}

fn stage_cached() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_APIGATEWAY_STAGE_CACHED,
        ids::NAME_APIGATEWAY_STAGE_CACHED,
        "Checks that API Gateway Stages have a cache cluster enabled.",
        vec![typed::<Stage, _>(
            ResourceKind::ApiGatewayStage,
            |stage, _, reporter| {
                if stage.cache_cluster_enabled != Some(true) {
                    let name = stage.stage_name.as_deref().unwrap_or("<unnamed>");
                    reporter.report(format!(
                        "API Gateway Stage '{name}' does not have a cache cluster enabled."
                    ));
                }
                Ok(())
            },
        )],
    )
}

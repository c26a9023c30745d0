use crate::registry::{RegistrationError, RuleDescriptor, RuleRegistry};
use crate::resources::{Listener, LoadBalancer, ResourceKind};
use crate::validation::{ResourceValidation, typed};
use awsguard_types::ids;

pub fn register(registry: &mut RuleRegistry) -> Result<(), RegistrationError> {
    registry.register(access_logging())?;
    registry.register(http_redirect())?;
    Ok(())
}

fn access_logging() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_ELB_ACCESS_LOGGING,
        ids::NAME_ELB_ACCESS_LOGGING,
        "Checks whether the Application Load Balancers and the Classic Load Balancers have logging enabled.",
        vec![
            // Classic ELB access logs are on once the block is declared.
            access_logs_check(ResourceKind::ElbLoadBalancer, true),
            access_logs_check(ResourceKind::ElasticLoadBalancingLoadBalancer, true),
            access_logs_check(ResourceKind::AlbLoadBalancer, false),
            access_logs_check(ResourceKind::LbLoadBalancer, false),
            access_logs_check(ResourceKind::ElbV2LoadBalancer, false),
            access_logs_check(ResourceKind::ApplicationLoadBalancingLoadBalancer, false),
        ],
    )
}

fn access_logs_check(kind: ResourceKind, enabled_by_default: bool) -> Box<dyn ResourceValidation> {
    typed::<LoadBalancer, _>(kind, move |lb, _, reporter| {
        let enabled = lb
            .access_logs
            .as_ref()
            .is_some_and(|logs| logs.enabled.unwrap_or(enabled_by_default));
        if !enabled {
            reporter.report("Load balancer must have access logs enabled.");
        }
        Ok(())
    })
}

fn http_redirect() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_LB_HTTP_REDIRECT,
        ids::NAME_LB_HTTP_REDIRECT,
        "Checks whether HTTP to HTTPS redirection is configured on all HTTP listeners of Application Load Balancers.",
        vec![
            redirect_check(ResourceKind::AlbListener),
            redirect_check(ResourceKind::LbListener),
            redirect_check(ResourceKind::ElbV2Listener),
        ],
    )
}

fn redirect_check(kind: ResourceKind) -> Box<dyn ResourceValidation> {
    typed::<Listener, _>(kind, |listener, _, reporter| {
        if !listener
            .protocol
            .as_deref()
            .is_some_and(|p| p.eq_ignore_ascii_case("HTTP"))
        {
            return Ok(());
        }

        let redirects_to_https = listener.default_actions.iter().flatten().any(|action| {
            action.action_type.as_deref() == Some("redirect")
                && action
                    .redirect
                    .as_ref()
                    .and_then(|r| r.protocol.as_deref())
                    .is_some_and(|p| p.eq_ignore_ascii_case("HTTPS"))
        });
        if !redirects_to_https {
            reporter.report("Default action for HTTP listener must be a redirect using HTTPS.");
        }
        Ok(())
    })
}

use crate::registry::{RegistrationError, RuleDescriptor, RuleRegistry};
use crate::resources::{ElasticsearchDomain, ResourceKind};
use crate::validation::typed;
use awsguard_types::ids;

pub fn register(registry: &mut RuleRegistry) -> Result<(), RegistrationError> {
    registry.register(encrypted_at_rest())?;
    registry.register(in_vpc_only())?;
    Ok(())
}

fn domain_name(domain: &ElasticsearchDomain) -> &str {
    domain.domain_name.as_deref().unwrap_or("<unnamed>")
}

fn encrypted_at_rest() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_ELASTICSEARCH_ENCRYPTED_AT_REST,
        ids::NAME_ELASTICSEARCH_ENCRYPTED_AT_REST,
        "Checks if the Elasticsearch Service domains have encryption at rest enabled.",
        vec![typed::<ElasticsearchDomain, _>(
            ResourceKind::ElasticsearchDomain,
            |domain, _, reporter| {
                let enabled = domain.encrypt_at_rest.as_ref().and_then(|e| e.enabled);
                if enabled != Some(true) {
                    reporter.report(format!(
                        "Elasticsearch domain '{}' must have encryption at rest enabled.",
                        domain_name(domain)
                    ));
                }
                Ok(())
            },
        )],
    )
}

fn in_vpc_only() -> RuleDescriptor {
    RuleDescriptor::resource(
        ids::RULE_ELASTICSEARCH_IN_VPC_ONLY,
        ids::NAME_ELASTICSEARCH_IN_VPC_ONLY,
        "Checks that the Elasticsearch domain is only available within a VPC, and not accessible via a public endpoint.",
        vec![typed::<ElasticsearchDomain, _>(
            ResourceKind::ElasticsearchDomain,
            |domain, _, reporter| {
                let in_vpc = domain
                    .vpc_options
                    .as_ref()
                    .and_then(|v| v.subnet_ids.as_ref())
                    .is_some_and(|subnets| !subnets.is_empty());
                if !in_vpc {
                    reporter.report(format!(
                        "Elasticsearch domain '{}' must be deployed inside a VPC.",
                        domain_name(domain)
                    ));
                }
                Ok(())
            },
        )],
    )
}

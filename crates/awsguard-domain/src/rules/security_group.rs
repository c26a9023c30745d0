use crate::model::{Stack, Subject};
use crate::registry::{RegistrationError, RuleDescriptor, RuleRegistry};
use crate::resources::{ResourceKind, SecurityGroup};
use crate::validation::stack;
use anyhow::Context;
use awsguard_types::ids;
use serde_json::Value;
use std::collections::BTreeSet;

/// Input property of a security group rule naming the group it manages.
const GROUP_PROPERTY: &str = "securityGroupId";

pub fn register(registry: &mut RuleRegistry) -> Result<(), RegistrationError> {
    registry.register(no_rule_management_conflicts())
}

fn no_rule_management_conflicts() -> RuleDescriptor {
    RuleDescriptor::stack(
        ids::RULE_SECURITY_GROUP_RULE_CONFLICTS,
        ids::NAME_SECURITY_GROUP_RULE_CONFLICTS,
        "Checks that security groups with inline rules are not also managed by standalone security group rules.",
        stack(|view, _, reporter| {
            let group_tag = ResourceKind::Ec2SecurityGroup.tag();
            for rule in view.of_type(ResourceKind::Ec2SecurityGroupRule.tag()) {
                for group in managed_groups(view, rule) {
                    if !group.is_type(group_tag) || !has_inline_rules(group)? {
                        continue;
                    }
                    reporter.report_for(
                        format!(
                            "Security group rule '{}' manages security group '{}', which also declares inline rules; the two will overwrite each other.",
                            rule.name, group.name
                        ),
                        rule.urn.clone(),
                    );
                }
            }
            Ok(())
        }),
    )
}

/// Groups a rule manages: the declared `securityGroupId` dependency, else a plain
/// dependency, else a literal URN in the property itself. Edges recorded under other
/// properties (such as `sourceSecurityGroupId`) never count.
fn managed_groups<'a>(view: &Stack<'a>, rule: &Subject) -> Vec<&'a Subject> {
    let index = view.relationships();
    let mut targets: BTreeSet<&str> = index.property_references(&rule.urn, GROUP_PROPERTY).collect();
    if targets.is_empty() {
        targets = rule.dependencies.iter().map(String::as_str).collect();
    }
    if targets.is_empty()
        && let Some(Value::String(literal)) = rule.property(GROUP_PROPERTY)
    {
        targets.insert(literal.as_str());
    }

    targets.into_iter().filter_map(|urn| view.get(urn)).collect()
}

fn has_inline_rules(group: &Subject) -> anyhow::Result<bool> {
    let parsed: SecurityGroup = serde_json::from_value(Value::Object(group.properties.clone()))
        .with_context(|| format!("properties of {} do not match the security group shape", group.urn))?;
    Ok(parsed.declares_inline_rules())
}

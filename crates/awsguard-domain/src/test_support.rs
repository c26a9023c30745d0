use crate::engine;
use crate::model::Subject;
use crate::policy::{ResolvedPolicy, RuleConfig};
use crate::registry::{RuleDescriptor, RuleRegistry};
use crate::resources::ResourceKind;
use crate::validation::{Reporter, ResourceValidation};
use async_trait::async_trait;
use awsguard_types::{EnforcementLevel, Violation};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

/// Resource callback with an arbitrary tag that records every subject it sees.
pub struct TagCheck {
    tag: String,
    seen: Option<Arc<Mutex<Vec<String>>>>,
}

#[async_trait]
impl ResourceValidation for TagCheck {
    fn resource_type(&self) -> &str {
        &self.tag
    }

    async fn validate(
        &self,
        subject: &Subject,
        _config: &RuleConfig,
        reporter: &mut Reporter,
    ) -> anyhow::Result<()> {
        if let Some(seen) = &self.seen {
            seen.lock()
                .expect("seen lock")
                .push(format!("{}/{}", subject.type_tag, subject.name));
            reporter.report(format!("saw {}", subject.name));
        }
        Ok(())
    }
}

pub fn noop_check(tag: &str) -> Box<dyn ResourceValidation> {
    Box::new(TagCheck {
        tag: tag.to_string(),
        seen: None,
    })
}

pub fn recording_check(tag: &str, seen: Arc<Mutex<Vec<String>>>) -> Box<dyn ResourceValidation> {
    Box::new(TagCheck {
        tag: tag.to_string(),
        seen: Some(seen),
    })
}

pub fn resource_rule(id: &str, name: &str) -> RuleDescriptor {
    RuleDescriptor::resource(id, name, "Test rule.", vec![noop_check("t:test")])
}

/// Resolve a descriptor at `level` with its schema defaults.
pub fn resolved(descriptor: RuleDescriptor, level: EnforcementLevel) -> ResolvedPolicy {
    let config = descriptor
        .config_schema
        .resolve(&BTreeMap::new())
        .expect("schema defaults must resolve");
    ResolvedPolicy::new(Arc::new(descriptor), level, config)
}

pub fn subject(kind: ResourceKind, name: &str, properties: Value) -> Subject {
    Subject::new(kind.tag(), name).with_properties(properties)
}

/// Run one built-in rule with explicit config values over `subjects`.
pub fn run_builtin_with(
    id: &str,
    explicit: BTreeMap<String, Value>,
    subjects: &[Subject],
) -> Vec<Violation> {
    let registry = crate::rules::builtin_registry().expect("built-in rules register");
    let descriptor = registry
        .get(id)
        .unwrap_or_else(|| panic!("unknown built-in rule {id}"));
    let config = descriptor
        .config_schema
        .resolve(&explicit)
        .expect("test config must resolve");
    let policy = ResolvedPolicy::new(Arc::clone(descriptor), EnforcementLevel::Mandatory, config);
    engine::run_blocking(&policy, subjects).expect("rule must not fail")
}

pub fn run_builtin(id: &str, subjects: &[Subject]) -> Vec<Violation> {
    run_builtin_with(id, BTreeMap::new(), subjects)
}

pub fn messages(violations: &[Violation]) -> Vec<&str> {
    violations.iter().map(|v| v.message.as_str()).collect()
}

pub fn registry_with(ids: &[&str]) -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    for id in ids {
        registry
            .register(resource_rule(id, &format!("{id}-name")))
            .expect("test ids are unique");
    }
    registry
}

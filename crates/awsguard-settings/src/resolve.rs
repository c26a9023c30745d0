use crate::model::AwsGuardArgs;
use awsguard_domain::policy::{ResolvedPolicy, SchemaError};
use awsguard_domain::registry::RuleRegistry;
use awsguard_types::BUILTIN_DEFAULT_LEVEL;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("configuration names unknown rule '{0}'")]
    UnknownRule(String),
    #[error("rule '{rule}' has no config field '{field}'")]
    UnknownField { rule: String, field: String },
    #[error("rule '{rule}': config field '{field}' must be a {expected}")]
    InvalidField {
        rule: String,
        field: String,
        expected: &'static str,
    },
    #[error("rule '{rule}' must be set to a level or a config object, found {found}")]
    MalformedOverride { rule: String, found: &'static str },
}

impl ConfigError {
    fn from_schema(rule: &str, err: SchemaError) -> Self {
        match err {
            SchemaError::UnknownField(field) => ConfigError::UnknownField {
                rule: rule.to_string(),
                field,
            },
            SchemaError::InvalidField { field, expected } => ConfigError::InvalidField {
                rule: rule.to_string(),
                field,
                expected,
            },
        }
    }
}

/// Compute the active policies for one resolution pass.
///
/// Rules without an explicit level take the global level (built-in default when absent).
/// An explicit per-rule level always wins, in both directions. Disabled rules are left
/// out. Output is sorted by rule id.
pub fn resolve(
    registry: &RuleRegistry,
    args: &AwsGuardArgs,
) -> Result<Vec<ResolvedPolicy>, ConfigError> {
    if let Some(unknown) = args.rules.keys().find(|id| !registry.contains(id)) {
        return Err(ConfigError::UnknownRule(unknown.clone()));
    }

    let global = args.all.unwrap_or(BUILTIN_DEFAULT_LEVEL);
    let no_fields = BTreeMap::new();
    let mut out = Vec::new();

    for descriptor in registry.iter_sorted() {
        let (explicit, fields) = match args.rules.get(&descriptor.id) {
            Some(spec) => spec.parts(),
            None => (None, None),
        };
        let level = explicit.unwrap_or(global);

        if level.is_disabled() {
            debug!(rule = %descriptor.id, explicit = explicit.is_some(), "rule disabled");
            continue;
        }

        let config = descriptor
            .config_schema
            .resolve(fields.unwrap_or(&no_fields))
            .map_err(|e| ConfigError::from_schema(&descriptor.id, e))?;

        debug!(rule = %descriptor.id, level = %level, explicit = explicit.is_some(), "rule resolved");
        out.push(ResolvedPolicy::new(Arc::clone(descriptor), level, config));
    }

    Ok(out)
}

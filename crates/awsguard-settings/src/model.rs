use crate::resolve::ConfigError;
use awsguard_types::{EnforcementLevel, RESERVED_GLOBAL_KEY};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::warn;

/// Key inside a per-rule object that carries the rule's level.
pub const ENFORCEMENT_LEVEL_KEY: &str = "enforcementLevel";

/// `awsguard.toml` / `awsguard.json` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive. Values are kept
/// untyped until [`AwsGuardConfigV1::into_args`] applies the lenient level defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AwsGuardConfigV1 {
    /// Global enforcement level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub all: Option<Value>,

    /// Map of rule id -> level string or rule config object.
    #[serde(flatten)]
    pub rules: BTreeMap<String, Value>,
}

/// Typed policy-pack arguments.
///
/// `AwsGuardArgs::default()` is "no arguments": every rule at the built-in level.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AwsGuardArgs {
    pub all: Option<EnforcementLevel>,
    pub rules: BTreeMap<String, OverrideSpec>,
}

/// What the user said about one rule.
#[derive(Clone, Debug, PartialEq)]
pub enum OverrideSpec {
    /// Bare level; same as a config object with only `enforcementLevel` set.
    Level(EnforcementLevel),
    Config(RuleOverride),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleOverride {
    pub enforcement_level: Option<EnforcementLevel>,
    pub fields: BTreeMap<String, Value>,
}

impl RuleOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(mut self, level: EnforcementLevel) -> Self {
        self.enforcement_level = Some(level);
        self
    }

    pub fn field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }
}

impl OverrideSpec {
    /// Explicit level and config fields, with the bare-level sugar expanded.
    pub fn parts(&self) -> (Option<EnforcementLevel>, Option<&BTreeMap<String, Value>>) {
        match self {
            OverrideSpec::Level(level) => (Some(*level), None),
            OverrideSpec::Config(o) => (o.enforcement_level, Some(&o.fields)),
        }
    }
}

impl AwsGuardArgs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_all(mut self, level: EnforcementLevel) -> Self {
        self.all = Some(level);
        self
    }

    pub fn with_level(mut self, rule: &str, level: EnforcementLevel) -> Self {
        self.rules
            .insert(rule.to_string(), OverrideSpec::Level(level));
        self
    }

    pub fn with_override(mut self, rule: &str, spec: RuleOverride) -> Self {
        self.rules
            .insert(rule.to_string(), OverrideSpec::Config(spec));
        self
    }
}

impl From<EnforcementLevel> for AwsGuardArgs {
    fn from(level: EnforcementLevel) -> Self {
        AwsGuardArgs::new().with_all(level)
    }
}

impl AwsGuardConfigV1 {
    /// Convert to typed arguments.
    ///
    /// Unknown level strings and falsy values fall back to "no override" and are logged.
    /// Per-rule values that are neither a string nor an object are rejected.
    pub fn into_args(self) -> Result<AwsGuardArgs, ConfigError> {
        let all = self.all.as_ref().and_then(|value| {
            let level = EnforcementLevel::from_value(value);
            if level.is_none() && !value.is_null() {
                warn!(key = RESERVED_GLOBAL_KEY, value = %value, "ignoring unrecognized global enforcement level");
            }
            level
        });

        let mut rules = BTreeMap::new();
        for (rule, value) in self.rules {
            if let Some(spec) = convert_override(&rule, value)? {
                rules.insert(rule, spec);
            }
        }

        Ok(AwsGuardArgs { all, rules })
    }
}

fn convert_override(rule: &str, value: Value) -> Result<Option<OverrideSpec>, ConfigError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => match EnforcementLevel::parse(&s) {
            Some(level) => Ok(Some(OverrideSpec::Level(level))),
            None => {
                warn!(rule = %rule, value = %s, "ignoring unrecognized enforcement level");
                Ok(None)
            }
        },
        Value::Object(map) => Ok(Some(OverrideSpec::Config(convert_object(rule, map)))),
        other => Err(ConfigError::MalformedOverride {
            rule: rule.to_string(),
            found: kind_of(&other),
        }),
    }
}

fn convert_object(rule: &str, mut map: Map<String, Value>) -> RuleOverride {
    let enforcement_level = map.remove(ENFORCEMENT_LEVEL_KEY).and_then(|value| {
        let level = EnforcementLevel::from_value(&value);
        if level.is_none() && !value.is_null() {
            warn!(rule = %rule, value = %value, "ignoring unrecognized enforcement level");
        }
        level
    });

    RuleOverride {
        enforcement_level,
        fields: map.into_iter().collect(),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

use crate::registry::RuleDescriptor;
use awsguard_types::EnforcementLevel;
use serde::de::DeserializeOwned;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Value shape accepted by a rule configuration field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Integer,
    String,
    StringList,
    Any,
}

impl FieldKind {
    pub fn accepts(self, value: &Value) -> bool {
        match self {
            FieldKind::Bool => value.is_boolean(),
            FieldKind::Integer => value.is_i64() || value.is_u64(),
            FieldKind::String => value.is_string(),
            FieldKind::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
            FieldKind::Any => true,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            FieldKind::Bool => "boolean",
            FieldKind::Integer => "integer",
            FieldKind::String => "string",
            FieldKind::StringList => "list of strings",
            FieldKind::Any => "any value",
        }
    }

    pub fn json_schema(self) -> Value {
        match self {
            FieldKind::Bool => json!({ "type": "boolean" }),
            FieldKind::Integer => json!({ "type": "integer" }),
            FieldKind::String => json!({ "type": "string" }),
            FieldKind::StringList => json!({ "type": "array", "items": { "type": "string" } }),
            FieldKind::Any => json!({}),
        }
    }
}

/// One named, rule-specific configuration field.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigField {
    pub name: String,
    pub kind: FieldKind,
    /// `Value::Null` means "no default": the field is left out of the resolved bag.
    pub default: Value,
    pub description: String,
}

impl ConfigField {
    pub fn new(name: &str, kind: FieldKind, default: Value, description: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            default,
            description: description.to_string(),
        }
    }

    pub fn bool(name: &str, default: bool, description: &str) -> Self {
        Self::new(name, FieldKind::Bool, Value::Bool(default), description)
    }

    pub fn optional_integer(name: &str, description: &str) -> Self {
        Self::new(name, FieldKind::Integer, Value::Null, description)
    }

    pub fn optional_string(name: &str, description: &str) -> Self {
        Self::new(name, FieldKind::String, Value::Null, description)
    }

    pub fn string_list(name: &str, default: &[&str], description: &str) -> Self {
        Self::new(name, FieldKind::StringList, json!(default), description)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SchemaError {
    #[error("unknown config field '{0}'")]
    UnknownField(String),
    #[error("config field '{field}' must be a {expected}")]
    InvalidField {
        field: String,
        expected: &'static str,
    },
}

/// Declarative schema of a rule's configuration fields.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigSchema {
    fields: Vec<ConfigField>,
}

impl ConfigSchema {
    pub fn new(fields: Vec<ConfigField>) -> Self {
        Self { fields }
    }

    pub fn fields(&self) -> &[ConfigField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&ConfigField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Merge explicit values over declared defaults.
    ///
    /// Explicit `null` counts as absent. Names the schema does not declare are rejected.
    pub fn resolve(&self, explicit: &BTreeMap<String, Value>) -> Result<RuleConfig, SchemaError> {
        if let Some(unknown) = explicit.keys().find(|k| self.field(k).is_none()) {
            return Err(SchemaError::UnknownField(unknown.clone()));
        }

        let mut values = BTreeMap::new();
        for field in &self.fields {
            let value = match explicit.get(&field.name) {
                Some(v) if !v.is_null() => {
                    if !field.kind.accepts(v) {
                        return Err(SchemaError::InvalidField {
                            field: field.name.clone(),
                            expected: field.kind.describe(),
                        });
                    }
                    v.clone()
                }
                _ => field.default.clone(),
            };
            if !value.is_null() {
                values.insert(field.name.clone(), value);
            }
        }

        Ok(RuleConfig(values))
    }

    /// JSON Schema `properties` for this rule's fields.
    pub fn json_properties(&self) -> Map<String, Value> {
        let mut props = Map::new();
        for field in &self.fields {
            let mut schema = field.kind.json_schema();
            if let Some(obj) = schema.as_object_mut() {
                obj.insert("description".into(), json!(field.description));
                if !field.default.is_null() {
                    obj.insert("default".into(), field.default.clone());
                }
            }
            props.insert(field.name.clone(), schema);
        }
        props
    }
}

/// The effective configuration bag handed to a rule's callbacks.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RuleConfig(BTreeMap<String, Value>);

impl RuleConfig {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    pub fn string(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn string_list(&self, name: &str) -> Option<Vec<&str>> {
        self.get(name)?
            .as_array()?
            .iter()
            .map(Value::as_str)
            .collect()
    }

    /// Read the whole bag into a rule's typed argument struct.
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        let map: Map<String, Value> = self.0.clone().into_iter().collect();
        serde_json::from_value(Value::Object(map))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, Value>> for RuleConfig {
    fn from(values: BTreeMap<String, Value>) -> Self {
        Self(values)
    }
}

/// A registered rule with its effective level and configuration for one resolution pass.
#[derive(Clone, Debug)]
pub struct ResolvedPolicy {
    pub descriptor: Arc<RuleDescriptor>,
    pub level: EnforcementLevel,
    pub config: RuleConfig,
}

impl ResolvedPolicy {
    pub fn new(descriptor: Arc<RuleDescriptor>, level: EnforcementLevel, config: RuleConfig) -> Self {
        Self {
            descriptor,
            level,
            config,
        }
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }
}

impl PartialEq for ResolvedPolicy {
    fn eq(&self, other: &Self) -> bool {
        self.descriptor.id == other.descriptor.id
            && self.level == other.level
            && self.config == other.config
    }
}

impl Serialize for ResolvedPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ResolvedPolicy", 4)?;
        s.serialize_field("id", self.id())?;
        s.serialize_field("name", self.name())?;
        s.serialize_field("level", &self.level)?;
        s.serialize_field("config", &self.config)?;
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ConfigSchema {
        ConfigSchema::new(vec![
            ConfigField::bool("checkDeletion", true, "Require delete-on-termination."),
            ConfigField::optional_string("kmsId", "Required KMS key."),
            ConfigField::string_list("allowedTypes", &["EDGE"], "Allowed endpoint types."),
        ])
    }

    #[test]
    fn defaults_fill_absent_fields_and_null_defaults_are_omitted() {
        let config = schema().resolve(&BTreeMap::new()).unwrap();
        assert_eq!(config.bool("checkDeletion"), Some(true));
        assert_eq!(config.string("kmsId"), None);
        assert_eq!(config.string_list("allowedTypes"), Some(vec!["EDGE"]));
        assert!(config.get("kmsId").is_none());
    }

    #[test]
    fn explicit_values_win_and_null_counts_as_absent() {
        let mut explicit = BTreeMap::new();
        explicit.insert("checkDeletion".to_string(), json!(false));
        explicit.insert("allowedTypes".to_string(), Value::Null);
        explicit.insert("kmsId".to_string(), json!("key-1"));

        let config = schema().resolve(&explicit).unwrap();
        assert_eq!(config.bool("checkDeletion"), Some(false));
        assert_eq!(config.string("kmsId"), Some("key-1"));
        assert_eq!(config.string_list("allowedTypes"), Some(vec!["EDGE"]));
    }

    #[test]
    fn unknown_and_mistyped_fields_are_rejected() {
        let mut unknown = BTreeMap::new();
        unknown.insert("nope".to_string(), json!(1));
        assert_eq!(
            schema().resolve(&unknown).unwrap_err(),
            SchemaError::UnknownField("nope".to_string())
        );

        let mut mistyped = BTreeMap::new();
        mistyped.insert("allowedTypes".to_string(), json!(["EDGE", 3]));
        assert_eq!(
            schema().resolve(&mistyped).unwrap_err(),
            SchemaError::InvalidField {
                field: "allowedTypes".to_string(),
                expected: "list of strings",
            }
        );
    }

    #[test]
    fn bag_deserializes_into_typed_args() {
        #[derive(serde::Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Args {
            check_deletion: bool,
            kms_id: Option<String>,
        }

        let args: Args = schema().resolve(&BTreeMap::new()).unwrap().deserialize().unwrap();
        assert!(args.check_deletion);
        assert!(args.kms_id.is_none());
    }

    #[test]
    fn json_properties_carry_defaults() {
        let props = schema().json_properties();
        assert_eq!(props["checkDeletion"]["type"], "boolean");
        assert_eq!(props["checkDeletion"]["default"], true);
        assert!(props["kmsId"].get("default").is_none());
        assert_eq!(props["allowedTypes"]["items"]["type"], "string");
    }
}

use crate::model::ENFORCEMENT_LEVEL_KEY;
use awsguard_domain::registry::{RuleDescriptor, RuleRegistry};
use awsguard_types::{EnforcementLevel, RESERVED_GLOBAL_KEY};
use schemars::schema_for;
use serde_json::{Map, Value, json};

const LEVEL_REF: &str = "#/$defs/EnforcementLevel";

/// JSON Schema for the whole configuration surface of `registry`.
///
/// Composed from each descriptor's declared fields; the level sub-schema comes from the
/// `EnforcementLevel` type itself.
pub fn config_schema(registry: &RuleRegistry) -> Value {
    let mut properties = Map::new();
    properties.insert(
        RESERVED_GLOBAL_KEY.to_string(),
        json!({
            "description": "Enforcement level for every rule without its own setting.",
            "$ref": LEVEL_REF,
        }),
    );
    for descriptor in registry.iter_sorted() {
        properties.insert(descriptor.id.clone(), rule_schema(descriptor));
    }

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "AwsGuardConfigV1",
        "type": "object",
        "properties": properties,
        "additionalProperties": false,
        "$defs": { "EnforcementLevel": level_schema() },
    })
}

fn rule_schema(descriptor: &RuleDescriptor) -> Value {
    let mut fields = descriptor.config_schema.json_properties();
    fields.insert(ENFORCEMENT_LEVEL_KEY.to_string(), json!({ "$ref": LEVEL_REF }));

    json!({
        "description": format!("[{}] {}", descriptor.name, descriptor.description),
        "anyOf": [
            { "$ref": LEVEL_REF },
            {
                "type": "object",
                "properties": fields,
                "additionalProperties": false,
            },
        ],
    })
}

fn level_schema() -> Value {
    let mut schema = schema_for!(EnforcementLevel).to_value();
    if let Some(obj) = schema.as_object_mut() {
        obj.remove("$schema");
    }
    schema
}

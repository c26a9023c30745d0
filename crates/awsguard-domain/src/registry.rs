//! Rule registration table.
//!
//! Populated once by the assembling caller (each rule module registers into the registry it
//! is handed), read-only afterwards. Keys are unique; a second registration under the same
//! id fails instead of overwriting.

use crate::policy::ConfigSchema;
use crate::validation::{ResourceValidation, StackValidation};
use awsguard_types::{BUILTIN_DEFAULT_LEVEL, EnforcementLevel, RESERVED_GLOBAL_KEY};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// How a rule inspects subjects.
pub enum Validation {
    /// One or more callbacks, each bound to a resource type tag.
    Resource(Vec<Box<dyn ResourceValidation>>),
    /// One callback over the whole declared graph.
    Stack(Box<dyn StackValidation>),
}

impl fmt::Debug for Validation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Validation::Resource(checks) => f
                .debug_tuple("Resource")
                .field(&checks.iter().map(|c| c.resource_type()).collect::<Vec<_>>())
                .finish(),
            Validation::Stack(_) => f.write_str("Stack"),
        }
    }
}

#[derive(Debug)]
pub struct RuleDescriptor {
    /// Registration key and configuration key.
    pub id: String,
    /// Stable external name used in violation reports.
    pub name: String,
    pub description: String,
    /// Documented default; resolution applies the global level unless the rule is named.
    pub default_enforcement_level: EnforcementLevel,
    pub config_schema: ConfigSchema,
    pub validation: Validation,
}

impl RuleDescriptor {
    pub fn resource(
        id: &str,
        name: &str,
        description: &str,
        checks: Vec<Box<dyn ResourceValidation>>,
    ) -> Self {
        Self::with_validation(id, name, description, Validation::Resource(checks))
    }

    pub fn stack(id: &str, name: &str, description: &str, check: Box<dyn StackValidation>) -> Self {
        Self::with_validation(id, name, description, Validation::Stack(check))
    }

    fn with_validation(id: &str, name: &str, description: &str, validation: Validation) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            default_enforcement_level: BUILTIN_DEFAULT_LEVEL,
            config_schema: ConfigSchema::default(),
            validation,
        }
    }

    pub fn with_config(mut self, schema: ConfigSchema) -> Self {
        self.config_schema = schema;
        self
    }

    pub fn with_default_level(mut self, level: EnforcementLevel) -> Self {
        self.default_enforcement_level = level;
        self
    }

    /// Type tags this rule's resource callbacks accept (empty for stack rules).
    pub fn resource_types(&self) -> Vec<&str> {
        match &self.validation {
            Validation::Resource(checks) => checks.iter().map(|c| c.resource_type()).collect(),
            Validation::Stack(_) => Vec::new(),
        }
    }

    pub fn is_stack(&self) -> bool {
        matches!(self.validation, Validation::Stack(_))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("rule id must not be empty")]
    EmptyId,
    #[error("rule id '{0}' is reserved for the global enforcement level")]
    ReservedId(String),
    #[error("rule '{0}' is already registered")]
    DuplicateId(String),
    #[error("rule '{id}' reuses the name '{name}'")]
    DuplicateName { id: String, name: String },
    #[error("rule '{0}' has an empty name")]
    EmptyName(String),
    #[error("rule '{0}' declares no validation callbacks")]
    EmptyValidation(String),
}

#[derive(Debug, Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<RuleDescriptor>>,
    by_id: BTreeMap<String, usize>,
    names: BTreeSet<String>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, descriptor: RuleDescriptor) -> Result<(), RegistrationError> {
        let id = descriptor.id.as_str();
        if id.is_empty() {
            return Err(RegistrationError::EmptyId);
        }
        if id == RESERVED_GLOBAL_KEY {
            return Err(RegistrationError::ReservedId(id.to_string()));
        }
        if self.by_id.contains_key(id) {
            return Err(RegistrationError::DuplicateId(id.to_string()));
        }
        if descriptor.name.is_empty() {
            return Err(RegistrationError::EmptyName(id.to_string()));
        }
        if self.names.contains(&descriptor.name) {
            return Err(RegistrationError::DuplicateName {
                id: id.to_string(),
                name: descriptor.name.clone(),
            });
        }
        if let Validation::Resource(checks) = &descriptor.validation
            && checks.is_empty()
        {
            return Err(RegistrationError::EmptyValidation(id.to_string()));
        }

        debug!(rule = %id, name = %descriptor.name, "registered rule");

        self.by_id.insert(descriptor.id.clone(), self.rules.len());
        self.names.insert(descriptor.name.clone());
        self.rules.push(Arc::new(descriptor));
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<RuleDescriptor>> {
        self.by_id.get(id).map(|&idx| &self.rules[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<RuleDescriptor>> {
        self.rules.iter()
    }

    /// Sorted by id; the order every output list uses.
    pub fn iter_sorted(&self) -> impl Iterator<Item = &Arc<RuleDescriptor>> {
        self.by_id.values().map(|&idx| &self.rules[idx])
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.by_id.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

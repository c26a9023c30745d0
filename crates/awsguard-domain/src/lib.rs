//! Rule registry and typed dispatch (no IO).
//!
//! Input: resolved policies plus the subjects a host declared.
//! Output: raw violations, in a reproducible order.

#![forbid(unsafe_code)]

pub mod engine;
pub mod model;
pub mod policy;
pub mod registry;
pub mod resources;
pub mod rules;
pub mod validation;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use engine::{EngineError, run, run_blocking, validate_resource, validate_stack};
pub use model::{RelationshipIndex, Stack, StackDocument, StackError, Subject};
pub use policy::{ConfigField, ConfigSchema, FieldKind, ResolvedPolicy, RuleConfig, SchemaError};
pub use registry::{RegistrationError, RuleDescriptor, RuleRegistry, Validation};
pub use rules::builtin_registry;
pub use validation::{Reporter, ResourceValidation, StackValidation, ValidationError};

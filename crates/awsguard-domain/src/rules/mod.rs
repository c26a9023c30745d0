//! Built-in rule catalog.
//!
//! Each module registers its rules into the registry it is handed; nothing is global.

use crate::registry::{RegistrationError, RuleRegistry};

mod apigateway;
mod compute;
mod database;
mod elasticsearch;
mod network;
mod security_group;


/// Registry holding every built-in rule.
pub fn builtin_registry() -> Result<RuleRegistry, RegistrationError> {
    let mut registry = RuleRegistry::new();
    register_all(&mut registry)?;
    Ok(registry)
}

pub fn register_all(registry: &mut RuleRegistry) -> Result<(), RegistrationError> {
    apigateway::register(registry)?;
    compute::register(registry)?;
    database::register(registry)?;
    elasticsearch::register(registry)?;
    network::register(registry)?;
    security_group::register(registry)?;
    Ok(())
}

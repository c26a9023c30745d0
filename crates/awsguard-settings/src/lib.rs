//! Config parsing and enforcement-level resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;
mod schema;

#[cfg(test)]
mod proptest;

pub use model::{AwsGuardArgs, AwsGuardConfigV1, ENFORCEMENT_LEVEL_KEY, OverrideSpec, RuleOverride};
pub use resolve::{ConfigError, resolve};
pub use schema::config_schema;

use anyhow::Context;
use awsguard_domain::policy::ResolvedPolicy;
use awsguard_domain::registry::RuleRegistry;

/// Parse `awsguard.toml` into the permissive model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<AwsGuardConfigV1> {
    let cfg: AwsGuardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Parse a JSON configuration object into the permissive model.
pub fn parse_config_json(input: &str) -> anyhow::Result<AwsGuardConfigV1> {
    let cfg: AwsGuardConfigV1 = serde_json::from_str(input)?;
    Ok(cfg)
}

/// Convert a parsed config and resolve it against `registry`.
pub fn resolve_config(
    registry: &RuleRegistry,
    cfg: AwsGuardConfigV1,
) -> anyhow::Result<Vec<ResolvedPolicy>> {
    let args = cfg.into_args().context("invalid awsguard configuration")?;
    let resolved = resolve(registry, &args).context("failed to resolve awsguard configuration")?;
    Ok(resolved)
}

//! Public facade for awsguard.
//!
//! Most hosts only need [`AwsGuard::new`]: it registers the built-in rule catalog, resolves the
//! supplied [`AwsGuardArgs`] against it, and returns the ordered [`PolicyPack`] to run.
//!
//! ```ignore
//! use awsguard::{AwsGuard, AwsGuardArgs, EnforcementLevel};
//!
//! let pack = AwsGuard::new(&AwsGuardArgs::from(EnforcementLevel::Advisory))?;
//! let violations = pack.validate_subjects_blocking(&subjects)?;
//! ```

#![forbid(unsafe_code)]

use anyhow::Context;
use serde_json::Value;
use tracing::debug;

pub use awsguard_app::{
    CheckInput, CheckOutput, ConfigFormat, DEFAULT_PACK_NAME, PackReport, PolicyPack,
    render_text, run_check, serialize_report,
};
pub use awsguard_domain::{
    EngineError, RegistrationError, Reporter, ResolvedPolicy, RuleDescriptor, RuleRegistry, Stack,
    StackDocument, Subject, ValidationError, builtin_registry,
};
pub use awsguard_settings::{AwsGuardArgs, AwsGuardConfigV1, ConfigError, RuleOverride};
pub use awsguard_types::{
    BUILTIN_DEFAULT_LEVEL, EnforcementLevel, LevelCounts, PolicyViolation, Verdict, ids,
};

/// Entry points that turn arguments into a ready policy pack.
#[derive(Debug)]
pub struct AwsGuard;

impl AwsGuard {
    /// Resolve `args` against the built-in rule catalog.
    pub fn new(args: &AwsGuardArgs) -> anyhow::Result<PolicyPack> {
        let registry = builtin_registry().context("register built-in rules")?;
        Self::with_registry(&registry, args)
    }

    /// Resolve `args` against a caller-supplied registry.
    pub fn with_registry(registry: &RuleRegistry, args: &AwsGuardArgs) -> anyhow::Result<PolicyPack> {
        let resolved = awsguard_settings::resolve(registry, args).context("resolve policy levels")?;
        debug!(rules = registry.len(), active = resolved.len(), "resolved policy levels");
        Ok(PolicyPack::assemble(DEFAULT_PACK_NAME, resolved))
    }

    /// Parse and resolve a TOML config against the built-in catalog.
    pub fn from_toml(text: &str) -> anyhow::Result<PolicyPack> {
        let cfg = awsguard_app::parse_config(text, ConfigFormat::Toml).context("parse config")?;
        let args = cfg.into_args().context("invalid awsguard configuration")?;
        Self::new(&args)
    }

    /// JSON Schema for the config accepted by [`AwsGuard::from_toml`].
    pub fn config_schema() -> anyhow::Result<Value> {
        let registry = builtin_registry().context("register built-in rules")?;
        Ok(awsguard_settings::config_schema(&registry))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use awsguard_domain::resources::{Ec2Instance, ResourceKind};
    use awsguard_domain::validation::typed;
    use futures::executor::block_on;

    #[test]
    fn default_args_enable_the_whole_catalog() {
        let pack = AwsGuard::new(&AwsGuardArgs::default()).unwrap();
        assert_eq!(pack.len(), ids::all_rule_ids().len());
        assert!(pack.policies().iter().all(|p| p.level == BUILTIN_DEFAULT_LEVEL));
    }

    #[test]
    fn toml_config_flows_through() {
        let pack = AwsGuard::from_toml(
            "all = \"disabled\"\nec2InstanceDetailedMonitoringEnabled = \"advisory\"\n",
        )
        .unwrap();
        assert_eq!(pack.len(), 1);
        assert_eq!(pack.policies()[0].name(), ids::NAME_EC2_DETAILED_MONITORING);

        let web = Subject::new(ResourceKind::Ec2Instance.tag(), "web");
        let out = block_on(pack.validate_resource(&web)).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].level, EnforcementLevel::Advisory);
    }

    #[test]
    fn unknown_rules_are_rejected() {
        let args = AwsGuardArgs::default().with_level("noSuchRule", EnforcementLevel::Advisory);
        let err = AwsGuard::new(&args).unwrap_err();
        assert!(format!("{err:#}").contains("noSuchRule"));
    }

    #[test]
    fn custom_registries_are_supported() {
        let mut registry = RuleRegistry::new();
        registry
            .register(RuleDescriptor::resource(
                "alwaysFlag",
                "always-flag",
                "Flags every instance.",
                vec![typed::<Ec2Instance, _>(ResourceKind::Ec2Instance, |_, _, reporter| {
                    reporter.report("flagged");
                    Ok(())
                })],
            ))
            .unwrap();

        let pack = AwsGuard::with_registry(&registry, &AwsGuardArgs::default()).unwrap();
        let out = pack
            .validate_subjects_blocking(&[Subject::new(ResourceKind::Ec2Instance.tag(), "a")])
            .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].policy_name, "always-flag");
        assert_eq!(out[0].message, "flagged");
    }

    #[test]
    fn schema_lists_every_rule() {
        let schema = AwsGuard::config_schema().unwrap();
        let properties = schema["properties"].as_object().unwrap();
        for id in ids::all_rule_ids() {
            assert!(properties.contains_key(*id), "schema lacks {id}");
        }
    }
}

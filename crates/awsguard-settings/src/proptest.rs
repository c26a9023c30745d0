//! Property-based tests for resolution.
//!
//! These tests use proptest to verify invariants around:
//! - Completeness of the default resolution
//! - Per-rule precedence over the global level, in both directions
//! - Determinism of repeated passes

use crate::model::{AwsGuardArgs, AwsGuardConfigV1};
use crate::resolve::resolve;
use awsguard_domain::builtin_registry;
use awsguard_domain::registry::{RuleDescriptor, RuleRegistry};
use awsguard_domain::resources::{Ec2Instance, ResourceKind};
use awsguard_domain::validation::typed;
use awsguard_types::{BUILTIN_DEFAULT_LEVEL, EnforcementLevel, ids};
use proptest::prelude::*;
use serde_json::json;

fn arb_rule_id() -> impl Strategy<Value = &'static str> {
    prop::sample::select(ids::all_rule_ids().to_vec())
}

fn arb_level() -> impl Strategy<Value = EnforcementLevel> {
    prop::sample::select(EnforcementLevel::ALL.to_vec())
}

fn arb_global() -> impl Strategy<Value = serde_json::Value> {
    prop_oneof![
        arb_level().prop_map(|l| json!(l.as_str())),
        Just(json!(false)),
        Just(json!("")),
        Just(json!(null)),
        "[a-z]{1,8}".prop_map(|s| json!(s)),
    ]
}

proptest! {
    #[test]
    fn explicit_enable_survives_global_disable(rule in arb_rule_id()) {
        let registry = builtin_registry().unwrap();
        let args = AwsGuardArgs::from(EnforcementLevel::Disabled)
            .with_level(rule, EnforcementLevel::Mandatory);

        let resolved = resolve(&registry, &args).unwrap();
        prop_assert_eq!(resolved.len(), 1);
        prop_assert_eq!(resolved[0].id(), rule);
        prop_assert_eq!(resolved[0].level, EnforcementLevel::Mandatory);
    }

    #[test]
    fn explicit_disable_survives_global_level(rule in arb_rule_id()) {
        let registry = builtin_registry().unwrap();
        let args = AwsGuardArgs::from(EnforcementLevel::Advisory)
            .with_level(rule, EnforcementLevel::Disabled);

        let resolved = resolve(&registry, &args).unwrap();
        prop_assert_eq!(resolved.len(), registry.len() - 1);
        prop_assert!(resolved.iter().all(|p| p.id() != rule));
        prop_assert!(resolved.iter().all(|p| p.level == EnforcementLevel::Advisory));
    }

    #[test]
    fn unusable_global_values_fall_back_to_builtin(all in arb_global()) {
        let registry = builtin_registry().unwrap();
        let cfg: AwsGuardConfigV1 = serde_json::from_value(json!({ "all": all.clone() })).unwrap();
        let resolved = resolve(&registry, &cfg.into_args().unwrap()).unwrap();

        let expected = EnforcementLevel::from_value(&all).unwrap_or(BUILTIN_DEFAULT_LEVEL);
        if expected.is_disabled() {
            prop_assert!(resolved.is_empty());
        } else {
            prop_assert_eq!(resolved.len(), registry.len());
            prop_assert!(resolved.iter().all(|p| p.level == expected));
        }
    }

    #[test]
    fn resolution_is_deterministic(
        global in prop::option::of(arb_level()),
        overrides in prop::collection::btree_map(arb_rule_id(), arb_level(), 0..6),
    ) {
        let registry = builtin_registry().unwrap();
        let mut args = AwsGuardArgs { all: global, ..AwsGuardArgs::default() };
        for (rule, level) in overrides {
            args = args.with_level(rule, level);
        }

        let first = serde_json::to_string(&resolve(&registry, &args).unwrap()).unwrap();
        let second = serde_json::to_string(&resolve(&registry, &args).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }
}

fn noop_rule(id: &str, default_level: EnforcementLevel) -> RuleDescriptor {
    RuleDescriptor::resource(
        id,
        &format!("{id}-name"),
        "Does nothing.",
        vec![typed::<Ec2Instance, _>(ResourceKind::Ec2Instance, |_, _, _| Ok(()))],
    )
    .with_default_level(default_level)
}

#[test]
fn default_resolution_is_complete_and_ordered() {
    let registry = builtin_registry().unwrap();
    let resolved = resolve(&registry, &AwsGuardArgs::default()).unwrap();
    let got: Vec<&str> = resolved.iter().map(|p| p.id()).collect();
    assert_eq!(got, ids::all_rule_ids());
}

#[test]
fn global_advisory_with_one_mandatory_rule() {
    let mut registry = RuleRegistry::new();
    registry
        .register(noop_rule("B", EnforcementLevel::Advisory))
        .unwrap();
    registry
        .register(noop_rule("A", EnforcementLevel::Mandatory))
        .unwrap();

    let args = AwsGuardArgs::from(EnforcementLevel::Advisory).with_level("A", EnforcementLevel::Mandatory);
    let resolved = resolve(&registry, &args).unwrap();
    let got: Vec<(&str, EnforcementLevel)> = resolved.iter().map(|p| (p.id(), p.level)).collect();
    assert_eq!(
        got,
        vec![
            ("A", EnforcementLevel::Mandatory),
            ("B", EnforcementLevel::Advisory),
        ]
    );
}

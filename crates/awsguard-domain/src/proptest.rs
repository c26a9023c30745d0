//! Property-based tests for dispatch and configuration bags.
//!
//! These tests use proptest to verify invariants around:
//! - Type-tag narrowing of resource callbacks
//! - Determinism of violation order
//! - Schema defaults versus explicit values

use crate::engine::run_blocking;
use crate::model::Subject;
use crate::policy::{ConfigField, ConfigSchema};
use crate::registry::RuleDescriptor;
use crate::test_support::{recording_check, resolved};
use crate::validation::stack;
use awsguard_types::EnforcementLevel;
use proptest::prelude::*;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

const TAGS: [&str; 3] = ["t:lb", "t:alb", "t:db"];

fn arb_subjects() -> impl Strategy<Value = Vec<Subject>> {
    prop::collection::vec(0usize..TAGS.len(), 0..24).prop_map(|tags| {
        tags.into_iter()
            .enumerate()
            .map(|(i, t)| Subject::new(TAGS[t], &format!("r{i}")))
            .collect()
    })
}

proptest! {
    #[test]
    fn callbacks_see_exactly_their_tag_in_input_order(subjects in arb_subjects()) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let policy = resolved(
            RuleDescriptor::resource(
                "lb",
                "lb",
                "Checks lbs.",
                vec![recording_check("t:lb", Arc::clone(&seen))],
            ),
            EnforcementLevel::Mandatory,
        );

        let out = run_blocking(&policy, &subjects).unwrap();

        let expected: Vec<String> = subjects
            .iter()
            .filter(|s| s.type_tag == "t:lb")
            .map(|s| format!("t:lb/{}", s.name))
            .collect();
        prop_assert_eq!(seen.lock().unwrap().clone(), expected);
        prop_assert!(out.iter().all(|v| v.subject.as_deref().is_some_and(|u| u.contains("t:lb::"))));
    }

    #[test]
    fn repeated_runs_produce_identical_violations(subjects in arb_subjects()) {
        let make = || resolved(
            RuleDescriptor::resource(
                "multi",
                "multi",
                "Checks two kinds.",
                vec![
                    recording_check("t:db", Arc::new(Mutex::new(Vec::new()))),
                    recording_check("t:alb", Arc::new(Mutex::new(Vec::new()))),
                ],
            ),
            EnforcementLevel::Advisory,
        );
        let first = run_blocking(&make(), &subjects).unwrap();
        let second = run_blocking(&make(), &subjects).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn stack_callback_runs_once_over_everything(subjects in arb_subjects()) {
        let policy = resolved(
            RuleDescriptor::stack("count", "count", "Counts.", stack(|view, _, reporter| {
                reporter.report(view.subjects().len().to_string());
                Ok(())
            })),
            EnforcementLevel::Mandatory,
        );
        let out = run_blocking(&policy, &subjects).unwrap();
        prop_assert_eq!(out.len(), 1);
        prop_assert_eq!(out[0].message.clone(), subjects.len().to_string());
    }

    #[test]
    fn explicit_values_override_defaults(flag in any::<bool>(), limit in prop::option::of(0i64..1000)) {
        let schema = ConfigSchema::new(vec![
            ConfigField::bool("flag", !flag, "A flag."),
            ConfigField::optional_integer("limit", "A limit."),
        ]);
        let mut explicit = BTreeMap::new();
        explicit.insert("flag".to_string(), json!(flag));
        explicit.insert("limit".to_string(), limit.map_or(Value::Null, |l| json!(l)));

        let config = schema.resolve(&explicit).unwrap();
        prop_assert_eq!(config.bool("flag"), Some(flag));
        prop_assert_eq!(config.integer("limit"), limit);
        prop_assert_eq!(config.get("limit").is_some(), limit.is_some());
    }
}

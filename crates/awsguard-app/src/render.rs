//! Text and JSON rendering of pack reports, plus file loading helpers.

use crate::check::{ConfigFormat, parse_config, parse_stack};
use crate::report::PackReport;
use anyhow::Context;
use awsguard_domain::model::StackDocument;
use awsguard_settings::AwsGuardConfigV1;
use awsguard_types::{PolicyViolation, Verdict};
use std::fmt::Write as _;
use std::path::Path;

/// Host-style diagnostics, grouped by subject in first-seen order.
pub fn render_text(report: &PackReport) -> String {
    let mut out = String::new();

    let verdict = match report.verdict {
        Verdict::Pass => "pass",
        Verdict::Warn => "warn",
        Verdict::Fail => "fail",
    };
    let _ = writeln!(
        out,
        "Policy pack {}: {} ({} mandatory, {} advisory)",
        report.pack, verdict, report.counts.mandatory, report.counts.advisory
    );

    if report.violations.is_empty() {
        out.push_str("No violations.\n");
        return out;
    }

    let mut groups: Vec<(String, Vec<&PolicyViolation>)> = Vec::new();
    for v in &report.violations {
        let heading = subject_heading(v);
        match groups.iter().position(|(h, _)| *h == heading) {
            Some(idx) => groups[idx].1.push(v),
            None => groups.push((heading, vec![v])),
        }
    }

    for (heading, members) in groups {
        let _ = writeln!(out, "\n{heading}:");
        for v in members {
            let _ = writeln!(out, "  {}: [{}] {}", v.level, v.policy_name, v.description);
            let _ = writeln!(out, "    {}", v.message);
        }
    }

    out
}

fn subject_heading(v: &PolicyViolation) -> String {
    match (&v.subject_type, &v.subject_name, &v.subject_urn) {
        (Some(ty), Some(name), _) => format!("{ty} ({name})"),
        (_, _, Some(urn)) => urn.clone(),
        _ => "stack".to_string(),
    }
}

pub fn serialize_report(report: &PackReport) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(report).context("serialize report")?;
    json.push('\n');
    Ok(json)
}

/// Write a report as pretty JSON.
pub fn write_report(path: &Path, report: &PackReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create report directory {}", parent.display()))?;
    }
    std::fs::write(path, serialize_report(report)?)
        .with_context(|| format!("write report {}", path.display()))
}

/// Load a config file; the format follows the extension (`.json`, else TOML).
pub fn load_config(path: &Path) -> anyhow::Result<AwsGuardConfigV1> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    parse_config(&text, format_for(path))
        .with_context(|| format!("parse config {}", path.display()))
}

pub fn load_stack(path: &Path) -> anyhow::Result<StackDocument> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read stack {}", path.display()))?;
    parse_stack(&text).with_context(|| format!("parse stack {}", path.display()))
}

pub fn format_for(path: &Path) -> ConfigFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => ConfigFormat::Json,
        _ => ConfigFormat::Toml,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use awsguard_types::{EnforcementLevel, fingerprint_for_violation};
    use time::macros::datetime;

    fn violation(
        level: EnforcementLevel,
        policy: &str,
        subject: Option<(&str, &str)>,
        message: &str,
    ) -> PolicyViolation {
        let urn = subject.map(|(ty, name)| format!("urn:test::{ty}::{name}"));
        PolicyViolation {
            policy_id: policy.to_string(),
            policy_name: policy.to_string(),
            description: format!("Checks {policy}."),
            level,
            message: message.to_string(),
            fingerprint: fingerprint_for_violation(policy, urn.as_deref(), message),
            subject_urn: urn,
            subject_type: subject.map(|(ty, _)| ty.to_string()),
            subject_name: subject.map(|(_, name)| name.to_string()),
        }
    }

    fn sample_report() -> PackReport {
        PackReport::new(
            "awsguard",
            vec!["a".to_string(), "b".to_string()],
            vec![
                violation(
                    EnforcementLevel::Mandatory,
                    "redshift-cluster-configuration",
                    Some(("aws:redshift/cluster:Cluster", "test-cluster")),
                    "Redshift cluster must be encrypted.",
                ),
                violation(
                    EnforcementLevel::Advisory,
                    "elb-logging-enabled",
                    Some(("aws:lb/loadBalancer:LoadBalancer", "test-alb")),
                    "Load balancer must have access logs enabled.",
                ),
                violation(
                    EnforcementLevel::Mandatory,
                    "redshift-cluster-public-access-check",
                    Some(("aws:redshift/cluster:Cluster", "test-cluster")),
                    "Redshift cluster must not be publicly accessible.",
                ),
                violation(EnforcementLevel::Advisory, "stack-rule", None, "Graph is odd."),
            ],
            datetime!(2026-01-02 03:04:05 UTC),
            datetime!(2026-01-02 03:04:06 UTC),
        )
    }

    #[test]
    fn text_groups_by_subject() {
        insta::assert_snapshot!(render_text(&sample_report()), @r"
        Policy pack awsguard: fail (2 mandatory, 2 advisory)

        aws:redshift/cluster:Cluster (test-cluster):
          mandatory: [redshift-cluster-configuration] Checks redshift-cluster-configuration.
            Redshift cluster must be encrypted.
          mandatory: [redshift-cluster-public-access-check] Checks redshift-cluster-public-access-check.
            Redshift cluster must not be publicly accessible.

        aws:lb/loadBalancer:LoadBalancer (test-alb):
          advisory: [elb-logging-enabled] Checks elb-logging-enabled.
            Load balancer must have access logs enabled.

        stack:
          advisory: [stack-rule] Checks stack-rule.
            Graph is odd.
        ");
    }

    #[test]
    fn empty_report_says_so() {
        let report = PackReport::new(
            "awsguard",
            Vec::new(),
            Vec::new(),
            datetime!(2026-01-02 03:04:05 UTC),
            datetime!(2026-01-02 03:04:05 UTC),
        );
        assert_eq!(
            render_text(&report),
            "Policy pack awsguard: pass (0 mandatory, 0 advisory)\nNo violations.\n"
        );
    }

    #[test]
    fn json_report_round_trips_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("report.json");
        let report = sample_report();

        write_report(&path, &report).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"started_at\": \"2026-01-02T03:04:05Z\""));
        let back: PackReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn loads_config_by_extension_and_stack() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = dir.path().join("awsguard.toml");
        let json_path = dir.path().join("awsguard.json");
        let stack_path = dir.path().join("stack.json");
        std::fs::write(&toml_path, "all = \"advisory\"\n").unwrap();
        std::fs::write(&json_path, r#"{ "all": "advisory" }"#).unwrap();
        std::fs::write(
            &stack_path,
            r#"{ "resources": [{ "urn": "urn:a", "name": "a", "type": "t:a" }] }"#,
        )
        .unwrap();

        assert_eq!(load_config(&toml_path).unwrap(), load_config(&json_path).unwrap());
        assert_eq!(load_stack(&stack_path).unwrap().resources.len(), 1);

        let err = load_stack(&dir.path().join("missing.json")).unwrap_err();
        assert!(err.to_string().starts_with("read stack"));
    }
}

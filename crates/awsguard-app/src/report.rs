use awsguard_types::{LevelCounts, PolicyViolation, Verdict};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

pub const SCHEMA_PACK_REPORT_V1: &str = "awsguard.report.v1";

/// Result of validating one stack against one policy pack.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackReport {
    pub schema: String,
    pub pack: String,
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub counts: LevelCounts,
    /// Policy ids that ran, in pack order.
    pub policies: Vec<String>,
    pub violations: Vec<PolicyViolation>,
}

impl PackReport {
    pub fn new(
        pack: &str,
        policies: Vec<String>,
        violations: Vec<PolicyViolation>,
        started_at: OffsetDateTime,
        finished_at: OffsetDateTime,
    ) -> Self {
        let counts = LevelCounts::from_violations(&violations);
        Self {
            schema: SCHEMA_PACK_REPORT_V1.to_string(),
            pack: pack.to_string(),
            started_at,
            finished_at,
            verdict: counts.verdict(),
            counts,
            policies,
            violations,
        }
    }
}

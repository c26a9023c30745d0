use crate::EnforcementLevel;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A raw report produced by a validation callback.
///
/// The runner never interprets `message`; it only collects it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Violation {
    pub message: String,

    /// URN of the offending subject, when the callback (or the runner) knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
}

impl Violation {
    pub fn new(message: impl Into<String>, subject: Option<String>) -> Self {
        Self {
            message: message.into(),
            subject,
        }
    }
}

/// A violation attributed to the policy that produced it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PolicyViolation {
    pub policy_id: String,
    pub policy_name: String,
    pub description: String,
    pub level: EnforcementLevel,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_urn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,

    /// Stable identifier intended for dedup and trending: a hash of
    /// `policy_name + subject_urn + message`.
    pub fingerprint: String,
}

/// Compute a stable SHA-256 fingerprint for a violation.
pub fn fingerprint_for_violation(
    policy_name: &str,
    subject_urn: Option<&str>,
    message: &str,
) -> String {
    let canonical = [policy_name, subject_urn.unwrap_or(""), message].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LevelCounts {
    pub mandatory: u32,
    pub advisory: u32,
}

impl LevelCounts {
    pub fn from_violations(violations: &[PolicyViolation]) -> Self {
        let mut counts = LevelCounts::default();
        for v in violations {
            match v.level {
                EnforcementLevel::Mandatory => counts.mandatory += 1,
                EnforcementLevel::Advisory => counts.advisory += 1,
                // Disabled policies never run, so they never report.
                EnforcementLevel::Disabled => {}
            }
        }
        counts
    }

    pub fn verdict(&self) -> Verdict {
        if self.mandatory > 0 {
            Verdict::Fail
        } else if self.advisory > 0 {
            Verdict::Warn
        } else {
            Verdict::Pass
        }
    }
}

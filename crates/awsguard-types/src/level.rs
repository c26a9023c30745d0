use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Configuration key that sets the level for every rule without its own override.
pub const RESERVED_GLOBAL_KEY: &str = "all";

/// Level applied when the user supplies no usable global level.
pub const BUILTIN_DEFAULT_LEVEL: EnforcementLevel = EnforcementLevel::Mandatory;

/// How a policy's violations are treated by the host.
///
/// `Mandatory` violations fail the deployment, `Advisory` ones are reported only,
/// and `Disabled` policies are never run.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum EnforcementLevel {
    Mandatory,
    Advisory,
    Disabled,
}

impl EnforcementLevel {
    pub const ALL: [EnforcementLevel; 3] = [
        EnforcementLevel::Mandatory,
        EnforcementLevel::Advisory,
        EnforcementLevel::Disabled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EnforcementLevel::Mandatory => "mandatory",
            EnforcementLevel::Advisory => "advisory",
            EnforcementLevel::Disabled => "disabled",
        }
    }

    /// Exact membership test against the closed set of level names.
    pub fn is_valid(value: &str) -> bool {
        Self::parse(value).is_some()
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|level| level.as_str() == value)
    }

    /// Lenient read of a loosely-typed configuration value.
    ///
    /// Anything other than one of the three level strings yields `None`, which callers
    /// treat as "no override" rather than as an error.
    pub fn from_value(value: &Value) -> Option<Self> {
        value.as_str().and_then(Self::parse)
    }

    pub fn is_disabled(self) -> bool {
        self == EnforcementLevel::Disabled
    }
}

impl fmt::Display for EnforcementLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseLevelError(String);

impl fmt::Display for ParseLevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown enforcement level: {} (expected mandatory|advisory|disabled)",
            self.0
        )
    }
}

impl std::error::Error for ParseLevelError {}

impl FromStr for EnforcementLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

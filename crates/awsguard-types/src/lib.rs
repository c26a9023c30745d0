//! Stable DTOs and IDs used across the awsguard workspace.
//!
//! This crate is intentionally boring:
//! - the enforcement level value type
//! - stable rule IDs and report names
//! - violation, verdict, and fingerprint types

#![forbid(unsafe_code)]

pub mod ids;
pub mod level;
pub mod violation;

pub use level::{
    BUILTIN_DEFAULT_LEVEL, EnforcementLevel, ParseLevelError, RESERVED_GLOBAL_KEY,
};
pub use violation::{
    LevelCounts, PolicyViolation, Verdict, Violation, fingerprint_for_violation,
};

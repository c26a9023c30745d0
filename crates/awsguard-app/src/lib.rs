//! Use case orchestration for awsguard.
//!
//! This crate provides the application layer: policy pack assembly and the use cases that
//! coordinate the settings and domain layers. It is intentionally thin.

#![forbid(unsafe_code)]

mod check;
mod pack;
mod render;
mod report;

pub use check::{
    CheckInput, CheckOutput, ConfigFormat, DEFAULT_PACK_NAME, parse_config, parse_stack, run_check,
};
pub use pack::PolicyPack;
pub use render::{
    format_for, load_config, load_stack, render_text, serialize_report, write_report,
};
pub use report::{PackReport, SCHEMA_PACK_REPORT_V1};

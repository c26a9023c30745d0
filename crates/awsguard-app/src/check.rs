//! The `check` use case: resolve configuration, validate a stack, and produce a report.

use crate::pack::PolicyPack;
use crate::report::PackReport;
use anyhow::Context;
use awsguard_domain::model::{Stack, StackDocument};
use awsguard_domain::registry::RuleRegistry;
use awsguard_settings::AwsGuardConfigV1;
use time::OffsetDateTime;
use tracing::info;

pub const DEFAULT_PACK_NAME: &str = "awsguard";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfigFormat {
    #[default]
    Toml,
    Json,
}

/// Input for the check use case.
#[derive(Clone, Copy, Debug)]
pub struct CheckInput<'a> {
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    pub config_format: ConfigFormat,
    /// Stack document: `{ "resources": [ ... ] }`.
    pub stack_json: &'a str,
    pub pack_name: &'a str,
}

impl<'a> CheckInput<'a> {
    pub fn new(config_text: &'a str, stack_json: &'a str) -> Self {
        Self {
            config_text,
            config_format: ConfigFormat::Toml,
            stack_json,
            pack_name: DEFAULT_PACK_NAME,
        }
    }
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    pub report: PackReport,
    /// The assembled pack used for the run.
    pub pack: PolicyPack,
}

pub fn parse_config(text: &str, format: ConfigFormat) -> anyhow::Result<AwsGuardConfigV1> {
    // Empty is allowed, defaults apply.
    if text.trim().is_empty() {
        return Ok(AwsGuardConfigV1::default());
    }
    match format {
        ConfigFormat::Toml => awsguard_settings::parse_config_toml(text),
        ConfigFormat::Json => awsguard_settings::parse_config_json(text),
    }
}

pub fn parse_stack(text: &str) -> anyhow::Result<StackDocument> {
    let doc: StackDocument = serde_json::from_str(text)?;
    Ok(doc)
}

/// Run the check use case against `registry`.
pub fn run_check(registry: &RuleRegistry, input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    let cfg = parse_config(input.config_text, input.config_format).context("parse config")?;
    let resolved = awsguard_settings::resolve_config(registry, cfg).context("resolve config")?;
    let pack = PolicyPack::assemble(input.pack_name, resolved);

    let doc = parse_stack(input.stack_json).context("parse stack document")?;
    let stack = Stack::new(&doc.resources).context("index stack")?;
    let violations = futures::executor::block_on(pack.validate_stack(&stack))
        .context("validate stack")?;

    let finished_at = OffsetDateTime::now_utc();
    let policies = pack.policies().iter().map(|p| p.id().to_string()).collect();
    let report = PackReport::new(pack.name(), policies, violations, started_at, finished_at);

    info!(
        pack = %pack.name(),
        verdict = ?report.verdict,
        mandatory = report.counts.mandatory,
        advisory = report.counts.advisory,
        "check finished"
    );
    Ok(CheckOutput { report, pack })
}

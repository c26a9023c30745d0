//! Validation callback contracts.
//!
//! A rule validates either one resource at a time ([`ResourceValidation`], bound to a
//! single type tag) or the whole declared graph at once ([`StackValidation`]). Both may
//! suspend; the runner awaits each call before starting the next.

use crate::model::{Stack, Subject};
use crate::policy::RuleConfig;
use crate::resources::ResourceKind;
use anyhow::Context;
use async_trait::async_trait;
use awsguard_types::Violation;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::marker::PhantomData;

/// Collects the violations a callback reports.
#[derive(Debug, Default)]
pub struct Reporter {
    default_subject: Option<String>,
    violations: Vec<Violation>,
}

impl Reporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reporter whose un-addressed reports are attributed to `urn`.
    pub fn for_subject(urn: &str) -> Self {
        Self {
            default_subject: Some(urn.to_string()),
            violations: Vec::new(),
        }
    }

    pub fn report(&mut self, message: impl Into<String>) {
        let subject = self.default_subject.clone();
        self.violations.push(Violation::new(message, subject));
    }

    pub fn report_for(&mut self, message: impl Into<String>, subject: impl Into<String>) {
        self.violations
            .push(Violation::new(message, Some(subject.into())));
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}

/// Validates subjects of one resource type, one at a time.
#[async_trait]
pub trait ResourceValidation: Send + Sync {
    /// Type tag of the only subjects this callback may receive.
    fn resource_type(&self) -> &str;

    async fn validate(
        &self,
        subject: &Subject,
        config: &RuleConfig,
        reporter: &mut Reporter,
    ) -> anyhow::Result<()>;
}

/// Validates relationships across every declared resource.
#[async_trait]
pub trait StackValidation: Send + Sync {
    async fn validate(
        &self,
        stack: &Stack<'_>,
        config: &RuleConfig,
        reporter: &mut Reporter,
    ) -> anyhow::Result<()>;
}

/// Synchronous check over a typed view of one resource kind.
pub struct TypedCheck<T, F> {
    kind: ResourceKind,
    check: F,
    _resource: PhantomData<fn() -> T>,
}

/// Bind a synchronous check to `kind`; the property bag is deserialized into `T` first.
pub fn typed<T, F>(kind: ResourceKind, check: F) -> Box<dyn ResourceValidation>
where
    T: DeserializeOwned + Send + 'static,
    F: Fn(&T, &RuleConfig, &mut Reporter) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Box::new(TypedCheck {
        kind,
        check,
        _resource: PhantomData,
    })
}

#[async_trait]
impl<T, F> ResourceValidation for TypedCheck<T, F>
where
    T: DeserializeOwned + Send + 'static,
    F: Fn(&T, &RuleConfig, &mut Reporter) -> anyhow::Result<()> + Send + Sync + 'static,
{
    fn resource_type(&self) -> &str {
        self.kind.tag()
    }

    async fn validate(
        &self,
        subject: &Subject,
        config: &RuleConfig,
        reporter: &mut Reporter,
    ) -> anyhow::Result<()> {
        let resource: T = serde_json::from_value(Value::Object(subject.properties.clone()))
            .with_context(|| {
                format!(
                    "properties of {} do not match the {} shape",
                    subject.urn,
                    self.kind.tag()
                )
            })?;
        (self.check)(&resource, config, reporter)
    }
}

/// Synchronous whole-stack check.
pub struct StackCheck<F> {
    check: F,
}

pub fn stack<F>(check: F) -> Box<dyn StackValidation>
where
    F: Fn(&Stack<'_>, &RuleConfig, &mut Reporter) -> anyhow::Result<()> + Send + Sync + 'static,
{
    Box::new(StackCheck { check })
}

#[async_trait]
impl<F> StackValidation for StackCheck<F>
where
    F: Fn(&Stack<'_>, &RuleConfig, &mut Reporter) -> anyhow::Result<()> + Send + Sync + 'static,
{
    async fn validate(
        &self,
        stack: &Stack<'_>,
        config: &RuleConfig,
        reporter: &mut Reporter,
    ) -> anyhow::Result<()> {
        (self.check)(stack, config, reporter)
    }
}

/// A callback failed while validating `target` (a URN, or `stack`).
#[derive(Debug, thiserror::Error)]
#[error("policy '{policy}' failed while validating {target}")]
pub struct ValidationError {
    pub policy: String,
    pub target: String,
    #[source]
    pub source: Box<dyn std::error::Error + Send + Sync>,
}

impl ValidationError {
    pub fn new(policy: &str, target: &str, source: anyhow::Error) -> Self {
        Self {
            policy: policy.to_string(),
            target: target.to_string(),
            source: source.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resources::Ec2Instance;
    use futures::executor::block_on;
    use serde_json::json;

    #[test]
    fn reporter_defaults_subject_but_allows_override() {
        let mut reporter = Reporter::for_subject("urn:a");
        reporter.report("first");
        reporter.report_for("second", "urn:b");

        let out = reporter.into_violations();
        assert_eq!(out[0].subject.as_deref(), Some("urn:a"));
        assert_eq!(out[1].subject.as_deref(), Some("urn:b"));
    }

    #[test]
    fn typed_check_deserializes_before_invoking() {
        let check = typed::<Ec2Instance, _>(ResourceKind::Ec2Instance, |instance, _, reporter| {
            if instance.monitoring != Some(true) {
                reporter.report("monitoring off");
            }
            Ok(())
        });
        assert_eq!(check.resource_type(), "aws:ec2/instance:Instance");

        let subject = Subject::new("aws:ec2/instance:Instance", "web")
            .with_properties(json!({ "monitoring": false }));
        let mut reporter = Reporter::for_subject(&subject.urn);
        block_on(check.validate(&subject, &RuleConfig::default(), &mut reporter)).unwrap();
        assert_eq!(reporter.violations().len(), 1);
    }

    #[test]
    fn typed_check_fails_loudly_on_malformed_properties() {
        let check = typed::<Ec2Instance, _>(ResourceKind::Ec2Instance, |_, _, _| Ok(()));
        let subject = Subject::new("aws:ec2/instance:Instance", "web")
            .with_properties(json!({ "monitoring": "yes please" }));

        let mut reporter = Reporter::new();
        let err = block_on(check.validate(&subject, &RuleConfig::default(), &mut reporter))
            .unwrap_err();
        assert!(err.to_string().contains("do not match"));
    }

    #[test]
    fn validation_error_chain_names_the_cause_once() {
        let err = ValidationError::new("boom", "urn:a", anyhow::anyhow!("lookup exploded"));
        assert_eq!(err.to_string(), "policy 'boom' failed while validating urn:a");

        let chained = format!("{:#}", anyhow::Error::from(err).context("validate stack"));
        assert_eq!(chained.matches("lookup exploded").count(), 1);
        assert!(chained.ends_with("failed while validating urn:a: lookup exploded"));
    }
}

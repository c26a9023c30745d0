//! Policy pack assembly and host-facing validation entry points.

use awsguard_domain::engine::{self, EngineError};
use awsguard_domain::model::{Stack, Subject};
use awsguard_domain::policy::ResolvedPolicy;
use awsguard_domain::validation::ValidationError;
use awsguard_types::{PolicyViolation, Violation, fingerprint_for_violation};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// The ordered set of active policies handed to a validation host.
#[derive(Clone, Debug)]
pub struct PolicyPack {
    name: String,
    policies: Vec<ResolvedPolicy>,
}

impl PolicyPack {
    /// Order by id and drop anything disabled. Names are unique by registration.
    pub fn assemble(name: &str, mut resolved: Vec<ResolvedPolicy>) -> Self {
        resolved.retain(|p| !p.level.is_disabled());
        resolved.sort_by(|a, b| a.id().cmp(b.id()));
        debug_assert!(
            {
                let names: BTreeSet<&str> = resolved.iter().map(|p| p.name()).collect();
                names.len() == resolved.len()
            },
            "policy names must be unique"
        );

        info!(pack = %name, policies = resolved.len(), "assembled policy pack");
        Self {
            name: name.to_string(),
            policies: resolved,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn policies(&self) -> &[ResolvedPolicy] {
        &self.policies
    }

    pub fn get(&self, id: &str) -> Option<&ResolvedPolicy> {
        self.policies.iter().find(|p| p.id() == id)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    /// Run every resource policy against one subject, in pack order.
    pub async fn validate_resource(
        &self,
        subject: &Subject,
    ) -> Result<Vec<PolicyViolation>, ValidationError> {
        let mut out = Vec::new();
        for policy in &self.policies {
            let raw = engine::validate_resource(policy, subject).await?;
            out.extend(raw.into_iter().map(|v| {
                let known = v.subject.as_deref() == Some(subject.urn.as_str());
                enrich(policy, v, known.then_some(subject))
            }));
        }
        Ok(out)
    }

    /// Run every policy (resource and stack) over the whole graph, in pack order.
    pub async fn validate_stack(
        &self,
        stack: &Stack<'_>,
    ) -> Result<Vec<PolicyViolation>, ValidationError> {
        let mut out = Vec::new();
        for policy in &self.policies {
            let raw = engine::validate_stack(policy, stack).await?;
            out.extend(raw.into_iter().map(|v| {
                let subject = v.subject.as_deref().and_then(|urn| stack.get(urn));
                enrich(policy, v, subject)
            }));
        }
        debug!(
            pack = %self.name,
            subjects = stack.subjects().len(),
            violations = out.len(),
            "stack validated"
        );
        Ok(out)
    }

    /// Blocking convenience over [`PolicyPack::validate_stack`] for a plain subject list.
    pub fn validate_subjects_blocking(
        &self,
        subjects: &[Subject],
    ) -> Result<Vec<PolicyViolation>, EngineError> {
        let stack = Stack::new(subjects)?;
        Ok(futures::executor::block_on(self.validate_stack(&stack))?)
    }
}

fn enrich(policy: &ResolvedPolicy, violation: Violation, subject: Option<&Subject>) -> PolicyViolation {
    let fingerprint =
        fingerprint_for_violation(policy.name(), violation.subject.as_deref(), &violation.message);
    PolicyViolation {
        policy_id: policy.id().to_string(),
        policy_name: policy.name().to_string(),
        description: policy.descriptor.description.clone(),
        level: policy.level,
        message: violation.message,
        subject_urn: violation.subject,
        subject_type: subject.map(|s| s.type_tag.clone()),
        subject_name: subject.map(|s| s.name.clone()),
        fingerprint,
    }
}

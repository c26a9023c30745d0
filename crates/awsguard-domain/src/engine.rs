use crate::model::{Stack, StackError, Subject};
use crate::policy::ResolvedPolicy;
use crate::registry::Validation;
use crate::validation::{Reporter, ResourceValidation, StackValidation, ValidationError};
use awsguard_types::Violation;
use tracing::{debug, trace};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Stack(#[from] StackError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Run one policy over a set of subjects.
///
/// Resource callbacks each see only the subjects whose type tag they declared, in input
/// order; a stack callback sees the whole collection once. Callbacks are awaited one at a
/// time, so violation order is reproducible.
pub async fn run(policy: &ResolvedPolicy, subjects: &[Subject]) -> Result<Vec<Violation>, EngineError> {
    let violations = match &policy.descriptor.validation {
        Validation::Resource(checks) => run_resource_checks(policy, checks, subjects).await?,
        Validation::Stack(check) => {
            let stack = Stack::new(subjects)?;
            invoke_stack(policy, check.as_ref(), &stack).await?
        }
    };

    debug!(
        policy = %policy.name(),
        subjects = subjects.len(),
        violations = violations.len(),
        "policy run finished"
    );
    Ok(violations)
}

/// Per-subject host invocation. Stack policies have nothing to say about a lone subject.
pub async fn validate_resource(
    policy: &ResolvedPolicy,
    subject: &Subject,
) -> Result<Vec<Violation>, ValidationError> {
    match &policy.descriptor.validation {
        Validation::Resource(checks) => {
            run_resource_checks(policy, checks, std::slice::from_ref(subject)).await
        }
        Validation::Stack(_) => Ok(Vec::new()),
    }
}

/// Whole-graph host invocation.
pub async fn validate_stack(
    policy: &ResolvedPolicy,
    stack: &Stack<'_>,
) -> Result<Vec<Violation>, ValidationError> {
    match &policy.descriptor.validation {
        Validation::Resource(checks) => {
            run_resource_checks(policy, checks, stack.subjects()).await
        }
        Validation::Stack(check) => invoke_stack(policy, check.as_ref(), stack).await,
    }
}

/// Blocking convenience over [`run`] for hosts without an async runtime.
pub fn run_blocking(
    policy: &ResolvedPolicy,
    subjects: &[Subject],
) -> Result<Vec<Violation>, EngineError> {
    futures::executor::block_on(run(policy, subjects))
}

async fn run_resource_checks(
    policy: &ResolvedPolicy,
    checks: &[Box<dyn ResourceValidation>],
    subjects: &[Subject],
) -> Result<Vec<Violation>, ValidationError> {
    let mut out = Vec::new();
    for check in checks {
        let tag = check.resource_type();
        for subject in subjects.iter().filter(|s| s.is_type(tag)) {
            out.extend(invoke_resource(policy, check.as_ref(), subject).await?);
        }
    }
    Ok(out)
}

async fn invoke_resource(
    policy: &ResolvedPolicy,
    check: &dyn ResourceValidation,
    subject: &Subject,
) -> Result<Vec<Violation>, ValidationError> {
    trace!(policy = %policy.name(), subject = %subject.urn, "invoking resource validation");

    let mut reporter = Reporter::for_subject(&subject.urn);
    check
        .validate(subject, &policy.config, &mut reporter)
        .await
        .map_err(|e| ValidationError::new(policy.name(), &subject.urn, e))?;
    Ok(reporter.into_violations())
}

async fn invoke_stack(
    policy: &ResolvedPolicy,
    check: &dyn StackValidation,
    stack: &Stack<'_>,
) -> Result<Vec<Violation>, ValidationError> {
    trace!(
        policy = %policy.name(),
        subjects = stack.subjects().len(),
        "invoking stack validation"
    );

    let mut reporter = Reporter::new();
    check
        .validate(stack, &policy.config, &mut reporter)
        .await
        .map_err(|e| ValidationError::new(policy.name(), "stack", e))?;
    Ok(reporter.into_violations())
}

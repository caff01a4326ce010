//! Input validation for job-shop problems and candidate schedules.
//!
//! Checks structural integrity of jobs, operations, and resources before a
//! problem model is built, and checks operation sequences before they are
//! replayed. Detects:
//! - Empty problems and empty jobs
//! - Non-positive durations
//! - Total processing time beyond the `i64` range
//! - Malformed, duplicate, or undeclared resources
//! - Duplicate job IDs
//! - Sequences that skip, repeat, or reorder operations
//!
//! All detected issues are reported together, not just the first one.

use std::collections::HashSet;
use std::fmt;

use crate::models::{CandidateSchedule, Job, ProblemModel, Resource};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two jobs or two resources share the same ID.
    DuplicateId,
    /// The problem has no jobs at all.
    EmptyProblem,
    /// A job has no operations.
    EmptyJob,
    /// An operation has a duration of zero or less.
    NonPositiveDuration,
    /// The sum of all durations does not fit in an `i64`.
    ProcessingTimeOverflow,
    /// A resource identifier is empty or blank.
    MalformedResource,
    /// An operation references a resource outside the declared set.
    UnknownResource,
    /// A sequence entry points outside the problem's jobs/operations.
    InvalidOperationRef,
    /// A sequence contains the same operation twice.
    DuplicateOperation,
    /// A sequence does not contain every operation.
    MissingOperation,
    /// A sequence places an operation before its job predecessor.
    PrecedenceViolation,
    /// Reinforcement was requested with a makespan of zero or less.
    NonPositiveMakespan,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validates the job data for a problem model.
///
/// Checks:
/// 1. At least one job
/// 2. No duplicate job IDs
/// 3. Every job has at least one operation
/// 4. Every duration is strictly positive, and their sum fits in an `i64`
/// 5. Every referenced resource ID is non-blank
/// 6. When `resources` is given: no duplicate or blank resource IDs, and
///    every operation references a declared resource
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_jobs(jobs: &[Job], resources: Option<&[Resource]>) -> ValidationResult {
    let mut errors = Vec::new();

    if jobs.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyProblem,
            "Problem has no jobs",
        ));
    }

    let declared: Option<HashSet<&str>> = resources.map(|resources| {
        let mut ids = HashSet::new();
        for r in resources {
            if !r.is_well_formed() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MalformedResource,
                    format!("Declared resource has a blank ID: {:?}", r.id),
                ));
            }
            if !ids.insert(r.id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    format!("Duplicate resource ID: {}", r.id),
                ));
            }
        }
        ids
    });

    // Every start and finish time is bounded by the total processing time.
    let mut total_processing: Option<i64> = Some(0);
    let mut job_ids = HashSet::new();
    for job in jobs {
        if !job_ids.insert(job.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate job ID: {}", job.id),
            ));
        }

        if job.operations.is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyJob,
                format!("Job '{}' has no operations", job.id),
            ));
        }

        for (task, op) in job.operations.iter().enumerate() {
            if op.duration <= 0 {
                errors.push(ValidationError::new(
                    ValidationErrorKind::NonPositiveDuration,
                    format!(
                        "Operation {task} of job '{}' has duration {}",
                        job.id, op.duration
                    ),
                ));
            } else {
                total_processing = total_processing.and_then(|t| t.checked_add(op.duration));
            }
            if op.resource.trim().is_empty() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::MalformedResource,
                    format!("Operation {task} of job '{}' has a blank resource", job.id),
                ));
            } else if let Some(ids) = &declared {
                if !ids.contains(op.resource.as_str()) {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnknownResource,
                        format!(
                            "Operation {task} of job '{}' references unknown resource '{}'",
                            job.id, op.resource
                        ),
                    ));
                }
            }
        }
    }

    if total_processing.is_none() {
        errors.push(ValidationError::new(
            ValidationErrorKind::ProcessingTimeOverflow,
            "Total processing time exceeds the representable range",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates that a sequence is a candidate schedule for `problem`.
///
/// A candidate schedule contains every (job, task) pair exactly once, and
/// within each job the tasks appear in increasing index order.
pub fn validate_sequence(problem: &ProblemModel, sequence: &CandidateSchedule) -> ValidationResult {
    let mut errors = Vec::new();
    let mut next_task = vec![0usize; problem.job_count()];
    let mut seen = HashSet::new();

    for op in sequence.iter() {
        if op.job >= problem.job_count() || op.task >= problem.task_count(op.job) {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidOperationRef,
                format!("Sequence references nonexistent operation {op}"),
            ));
            continue;
        }
        if !seen.insert(*op) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateOperation,
                format!("Operation {op} appears more than once"),
            ));
            continue;
        }
        if op.task != next_task[op.job] {
            errors.push(ValidationError::new(
                ValidationErrorKind::PrecedenceViolation,
                format!(
                    "Operation {op} placed while task {} of job {} is still pending",
                    next_task[op.job], op.job
                ),
            ));
        }
        next_task[op.job] = next_task[op.job].max(op.task + 1);
    }

    let missing = problem.total_operations().saturating_sub(seen.len());
    if missing > 0 {
        errors.push(ValidationError::new(
            ValidationErrorKind::MissingOperation,
            format!("Sequence is missing {missing} operation(s)"),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

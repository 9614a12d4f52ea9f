//! Input validation for scheduling requests.
//!
//! Checks structural integrity of jobs and machines before scheduling.
//! Detects:
//! - Duplicate IDs
//! - Non-positive or non-finite processing times and capacities
//! - Processing times that round to zero milliseconds or overflow the
//!   time range from the job's arrival
//! - Due dates before arrival
//! - Jobs referencing unknown machines
//!
//! The last two are advisory: the scheduler tolerates them (a job due
//! before it arrives is simply late; a job on an unknown machine is left
//! unscheduled). Everything else blocks a run.

use std::collections::HashSet;

use serde::Serialize;

use crate::models::{Job, Machine};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ValidationErrorKind {
    /// Two jobs or two machines share the same ID.
    DuplicateId,
    /// Processing time is zero, negative, or not finite.
    NonPositiveProcessingTime,
    /// Processing time rounds to zero milliseconds, or arrival plus
    /// processing time leaves the representable time range.
    ProcessingTimeOutOfRange,
    /// Machine capacity is zero, negative, or not finite.
    NonPositiveCapacity,
    /// Due date precedes arrival time.
    DueBeforeArrival,
    /// A job references a machine that doesn't exist.
    UnknownMachine,
}

impl ValidationErrorKind {
    /// Whether this kind prevents scheduling.
    pub fn is_blocking(self) -> bool {
        !matches!(
            self,
            ValidationErrorKind::DueBeforeArrival | ValidationErrorKind::UnknownMachine
        )
    }
}

impl ValidationError {
    /// Creates a validation error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input data for a scheduling request.
///
/// Checks:
/// 1. No duplicate machine IDs
/// 2. Every machine has a positive, finite capacity
/// 3. No duplicate job IDs
/// 4. Every job has a positive, finite processing time
/// 5. That processing time is at least one millisecond and, started at
///    arrival, ends inside the representable time range
/// 6. No job is due before it arrives
/// 7. Every job references an existing machine
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(jobs: &[Job], machines: &[Machine]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut machine_ids = HashSet::new();
    for m in machines {
        if !machine_ids.insert(m.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate machine ID: {}", m.id),
            ));
        }
        if !(m.capacity.is_finite() && m.capacity > 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveCapacity,
                format!("Machine '{}' has non-positive capacity {}", m.id, m.capacity),
            ));
        }
    }

    let mut job_ids = HashSet::new();
    for job in jobs {
        if !job_ids.insert(job.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate job ID: {}", job.id),
            ));
        }
        if !(job.processing_time.is_finite() && job.processing_time > 0.0) {
            errors.push(ValidationError::new(
                ValidationErrorKind::NonPositiveProcessingTime,
                format!(
                    "Job '{}' has non-positive processing time {}",
                    job.id, job.processing_time
                ),
            ));
        } else if !job
            .end_if_started(job.arrival_time)
            .is_some_and(|end| end > job.arrival_time)
        {
            errors.push(ValidationError::new(
                ValidationErrorKind::ProcessingTimeOutOfRange,
                format!(
                    "Job '{}' has processing time {} outside the schedulable range",
                    job.id, job.processing_time
                ),
            ));
        }
        if job.due_date < job.arrival_time {
            errors.push(ValidationError::new(
                ValidationErrorKind::DueBeforeArrival,
                format!("Job '{}' is due before it arrives", job.id),
            ));
        }
        if !machine_ids.contains(job.machine_id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnknownMachine,
                format!(
                    "Job '{}' references unknown machine '{}'",
                    job.id, job.machine_id
                ),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

//! Job selection policies.
//!
//! Each policy turns the pending job set into a decision order. Sorting is
//! stable everywhere, so equal keys keep input order.
//!
//! | Policy | Key | Score |
//! |--------|-----|-------|
//! | Fuzzy priority | inferred priority, descending | inferred priority |
//! | First come, first served | arrival, ascending | none |
//! | Earliest due date | due date, ascending | urgency × 10 (display only) |
//!
//! # References
//! - Jackson (1955), EDD optimal for maximum lateness on one machine
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{signals, SchedulingContext};
use crate::error::ConfigurationError;
use crate::fuzzy::{presets, CrispInputs, InferenceEngine};
use crate::models::Job;

/// Closed set of ordering policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// Fuzzy-inferred priority, highest first.
    #[default]
    FuzzyPriority,
    /// Earliest arrival first.
    FirstComeFirstServed,
    /// Earliest due date first.
    EarliestDueDate,
}

impl Policy {
    /// All policies.
    pub const ALL: [Policy; 3] = [
        Policy::FuzzyPriority,
        Policy::FirstComeFirstServed,
        Policy::EarliestDueDate,
    ];

    /// Canonical name (e.g. "fuzzy-priority").
    pub fn name(self) -> &'static str {
        match self {
            Policy::FuzzyPriority => "fuzzy-priority",
            Policy::FirstComeFirstServed => "first-come-first-served",
            Policy::EarliestDueDate => "earliest-due-date",
        }
    }

    /// Scores `jobs` (where the policy defines a score) and returns their
    /// indices in decision order.
    ///
    /// # Errors
    /// Fuzzy priority propagates inference configuration errors (the engine's
    /// system lacks the `processing_time`/`urgency`/`machine_load` inputs).
    pub fn order(
        self,
        jobs: &mut [Job],
        context: &SchedulingContext,
        engine: &InferenceEngine,
    ) -> Result<Vec<usize>, ConfigurationError> {
        let order = match self {
            Policy::FuzzyPriority => order_by_fuzzy_priority(jobs, context, engine)?,
            Policy::FirstComeFirstServed => order_by_arrival(jobs),
            Policy::EarliestDueDate => order_by_due_date(jobs, context),
        };
        debug!(
            policy = self.name(),
            order = ?order.iter().map(|&i| jobs[i].id.as_str()).collect::<Vec<_>>(),
            "decision order"
        );
        Ok(order)
    }
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Policy {
    type Err = ConfigurationError;

    /// Accepts canonical names and the short aliases `fuzzy_priority`,
    /// `fcfs` and `edd`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fuzzy-priority" | "fuzzy_priority" => Ok(Policy::FuzzyPriority),
            "first-come-first-served" | "fcfs" => Ok(Policy::FirstComeFirstServed),
            "earliest-due-date" | "edd" => Ok(Policy::EarliestDueDate),
            _ => Err(ConfigurationError::UnknownPolicy { name: s.to_string() }),
        }
    }
}

/// Crisp inputs of the manufacturing priority system for one job.
pub fn priority_inputs(job: &Job, context: &SchedulingContext, load: f64) -> CrispInputs {
    CrispInputs::new()
        .with(presets::PROCESSING_TIME, job.processing_time)
        .with(
            presets::URGENCY,
            signals::urgency(job.due_date, context.now, job.processing_time),
        )
        .with(presets::MACHINE_LOAD, load)
}

fn order_by_fuzzy_priority(
    jobs: &mut [Job],
    context: &SchedulingContext,
    engine: &InferenceEngine,
) -> Result<Vec<usize>, ConfigurationError> {
    for job in jobs.iter_mut() {
        // Unknown machine: left unscored, rejected at assignment.
        job.priority_score = match context.load(&job.machine_id) {
            Some(load) => Some(engine.infer(&priority_inputs(job, context, load))?),
            None => None,
        };
    }

    let mut indices: Vec<usize> = (0..jobs.len()).collect();
    let key = |i: usize| jobs[i].priority_score.unwrap_or(f64::NEG_INFINITY);
    indices.sort_by(|&a, &b| key(b).total_cmp(&key(a)));
    Ok(indices)
}

fn order_by_arrival(jobs: &mut [Job]) -> Vec<usize> {
    for job in jobs.iter_mut() {
        job.priority_score = None;
    }
    let mut indices: Vec<usize> = (0..jobs.len()).collect();
    indices.sort_by_key(|&i| jobs[i].arrival_time);
    indices
}

fn order_by_due_date(jobs: &mut [Job], context: &SchedulingContext) -> Vec<usize> {
    for job in jobs.iter_mut() {
        job.priority_score =
            Some(signals::urgency(job.due_date, context.now, job.processing_time) * 10.0);
    }
    let mut indices: Vec<usize> = (0..jobs.len()).collect();
    indices.sort_by_key(|&i| jobs[i].due_date);
    indices
}

//! Job model.
//!
//! A job is a single unit of work that must run on one specific machine.
//! It carries its scheduling inputs (processing time, arrival, due date)
//! and, once a run has placed it, its outputs (score, slot, status).
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::time;

/// Lifecycle of a job within one scheduling run.
///
/// `Pending → Scheduled → {OnTime | Late}`. The final classification is a
/// read-only comparison of end time against due date, made after every job
/// of the run has been placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Not yet placed.
    #[default]
    Pending,
    /// Placed on its machine, not yet classified.
    Scheduled,
    /// Completes at or before its due date.
    OnTime,
    /// Completes after its due date.
    Late,
}

impl JobStatus {
    /// Whether the job has been placed (scheduled or classified).
    pub fn is_placed(self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

/// A job to be scheduled.
///
/// # Time Representation
/// Processing time is in hours (positive real). Arrival and due date are
/// UTC timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Processing time (hours). Slots are placed at millisecond
    /// precision, so values below one millisecond are rejected by
    /// validation.
    pub processing_time: f64,
    /// Latest desired completion.
    pub due_date: DateTime<Utc>,
    /// Earliest start.
    pub arrival_time: DateTime<Utc>,
    /// Machine this job must run on.
    pub machine_id: String,
    /// Priority score set by the run's policy (`None` if the policy sets none).
    pub priority_score: Option<f64>,
    /// Assigned start.
    pub start_time: Option<DateTime<Utc>>,
    /// Assigned end.
    pub end_time: Option<DateTime<Utc>>,
    /// Lifecycle status.
    pub status: JobStatus,
}

impl Job {
    /// Creates a pending job.
    pub fn new(
        id: impl Into<String>,
        processing_time: f64,
        arrival_time: DateTime<Utc>,
        due_date: DateTime<Utc>,
        machine_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            processing_time,
            due_date,
            arrival_time,
            machine_id: machine_id.into(),
            priority_score: None,
            start_time: None,
            end_time: None,
            status: JobStatus::Pending,
        }
    }

    /// Sets the job name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Hours left until the due date at `now` (negative when overdue).
    pub fn remaining_hours(&self, now: DateTime<Utc>) -> f64 {
        time::hours_between(now, self.due_date)
    }

    /// Slack at `now`: remaining hours minus processing time.
    pub fn slack_hours(&self, now: DateTime<Utc>) -> f64 {
        self.remaining_hours(now) - self.processing_time
    }

    /// Whether the due date has passed at `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        now > self.due_date
    }

    /// End of the job if it started at `start`, `None` when that instant
    /// is out of the representable time range.
    pub fn end_if_started(&self, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
        start.checked_add_signed(time::checked_hours(self.processing_time)?)
    }

    /// Places the job in `[start, start + processing_time)`.
    ///
    /// Returns the end, or `None` (job left untouched) on time overflow.
    pub(crate) fn place(&mut self, start: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let end = self.end_if_started(start)?;
        self.start_time = Some(start);
        self.end_time = Some(end);
        self.status = JobStatus::Scheduled;
        Some(end)
    }

    /// Classifies a placed job as on-time or late. Pending jobs are left as is.
    pub(crate) fn classify(&mut self) {
        if let (JobStatus::Scheduled, Some(end)) = (self.status, self.end_time) {
            self.status = if end <= self.due_date {
                JobStatus::OnTime
            } else {
                JobStatus::Late
            };
        }
    }

    /// Completion minus arrival (hours).
    pub fn flow_time_hours(&self) -> Option<f64> {
        self.end_time
            .map(|end| time::hours_between(self.arrival_time, end))
    }

    /// Start minus arrival (hours).
    pub fn waiting_time_hours(&self) -> Option<f64> {
        self.start_time
            .map(|start| time::hours_between(self.arrival_time, start))
    }

    /// `max(0, completion - due)` in hours.
    pub fn tardiness_hours(&self) -> Option<f64> {
        self.end_time
            .map(|end| time::hours_between(self.due_date, end).max(0.0))
    }
}

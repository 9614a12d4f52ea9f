//! Schedule quality metrics (KPIs).
//!
//! Computes standard scheduling performance indicators from the final job
//! and machine state of a run. Pure: the same jobs and machines always give
//! the same metrics, so a serialized job list re-derives them exactly.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Makespan | Latest end − earliest start over scheduled jobs |
//! | Utilization | Assigned hours ÷ makespan (or capacity), per machine |
//! | On-Time Rate | Fraction of scheduled jobs ending by their due date |
//! | Avg Flow Time | Mean of end − arrival |
//! | Avg Waiting Time | Mean of start − arrival |
//! | Total / Max Tardiness | Sum / largest of max(0, end − due) |
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{time, Job, Machine};

/// Denominator of machine utilization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilizationBasis {
    /// Busy hours over the schedule's makespan.
    #[default]
    Makespan,
    /// Busy hours over the machine's nominal capacity.
    Capacity,
}

/// Schedule performance indicators.
///
/// All time values are in hours.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleMetrics {
    /// Jobs considered (scheduled or not).
    pub total_jobs: usize,
    /// Jobs that received a slot.
    pub scheduled_jobs: usize,
    /// Scheduled jobs ending at or before their due date.
    pub on_time_jobs: usize,
    /// Scheduled jobs ending after their due date.
    pub late_jobs: usize,
    /// Latest end minus earliest start (hours).
    pub makespan_hours: f64,
    /// Per-machine utilization.
    pub utilization_by_machine: BTreeMap<String, f64>,
    /// Mean utilization over machines.
    pub avg_utilization: f64,
    /// `on_time_jobs / scheduled_jobs`, 0 when nothing is scheduled.
    pub on_time_rate: f64,
    /// Mean of end − arrival (hours).
    pub avg_flow_time_hours: f64,
    /// Mean of start − arrival (hours).
    pub avg_waiting_time_hours: f64,
    /// Sum of tardiness (hours).
    pub total_tardiness_hours: f64,
    /// Largest single tardiness (hours).
    pub max_tardiness_hours: f64,
    /// Mean priority score over scored, scheduled jobs.
    pub average_priority: Option<f64>,
}

impl ScheduleMetrics {
    /// Computes metrics from jobs and the machines they ran on.
    ///
    /// Jobs without a slot count towards `total_jobs` only. Every machine
    /// in `machines` gets a utilization entry, idle ones included.
    ///
    /// Only `jobs` contribute to makespan and busy hours. Slots a machine
    /// already carried before the run delay its jobs but are not part of
    /// this run's metrics.
    pub fn calculate(jobs: &[Job], machines: &[Machine], basis: UtilizationBasis) -> Self {
        let scheduled: Vec<(&Job, f64, f64)> = jobs
            .iter()
            .filter_map(|job| match (job.start_time, job.end_time) {
                (Some(start), Some(end)) => Some((
                    job,
                    time::hours_between(job.arrival_time, start),
                    time::hours_between(job.arrival_time, end),
                )),
                _ => None,
            })
            .collect();

        let makespan_hours = {
            let earliest = scheduled.iter().filter_map(|(j, _, _)| j.start_time).min();
            let latest = scheduled.iter().filter_map(|(j, _, _)| j.end_time).max();
            match (earliest, latest) {
                (Some(from), Some(to)) => time::hours_between(from, to),
                _ => 0.0,
            }
        };

        let mut on_time_jobs = 0;
        let mut total_tardiness_hours = 0.0;
        let mut max_tardiness_hours: f64 = 0.0;
        let mut total_flow = 0.0;
        let mut total_wait = 0.0;
        for &(job, wait, flow) in &scheduled {
            total_wait += wait;
            total_flow += flow;
            let tardiness = job.tardiness_hours().unwrap_or(0.0);
            if tardiness > 0.0 {
                total_tardiness_hours += tardiness;
                max_tardiness_hours = max_tardiness_hours.max(tardiness);
            } else {
                on_time_jobs += 1;
            }
        }

        let mut utilization_by_machine = BTreeMap::new();
        for machine in machines {
            let busy: f64 = scheduled
                .iter()
                .filter(|(j, _, _)| j.machine_id == machine.id)
                .map(|(j, _, _)| j.processing_time)
                .sum();
            let denominator = match basis {
                UtilizationBasis::Makespan => makespan_hours,
                UtilizationBasis::Capacity => machine.capacity,
            };
            let utilization = if denominator > 0.0 {
                busy / denominator
            } else {
                0.0
            };
            utilization_by_machine.insert(machine.id.clone(), utilization);
        }
        let avg_utilization = mean(utilization_by_machine.values().copied());

        let n = scheduled.len();
        let scores: Vec<f64> = scheduled
            .iter()
            .filter_map(|(j, _, _)| j.priority_score)
            .collect();

        Self {
            total_jobs: jobs.len(),
            scheduled_jobs: n,
            on_time_jobs,
            late_jobs: n - on_time_jobs,
            makespan_hours,
            utilization_by_machine,
            avg_utilization,
            on_time_rate: ratio(on_time_jobs as f64, n),
            avg_flow_time_hours: ratio(total_flow, n),
            avg_waiting_time_hours: ratio(total_wait, n),
            total_tardiness_hours,
            max_tardiness_hours,
            average_priority: (!scores.is_empty())
                .then(|| scores.iter().sum::<f64>() / scores.len() as f64),
        }
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_tardiness_hours: f64, min_on_time_rate: f64) -> bool {
        self.max_tardiness_hours <= max_tardiness_hours && self.on_time_rate >= min_on_time_rate
    }
}

fn ratio(total: f64, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        total / n as f64
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0), |(s, n), v| (s + v, n + 1));
    ratio(sum, n)
}

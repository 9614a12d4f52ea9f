//! Policy-driven greedy scheduler.
//!
//! # Algorithm
//!
//! 1. Validate jobs and machines.
//! 2. Order pending jobs by the request's policy.
//! 3. Append each job to its machine's queue at
//!    `max(arrival, end of the machine's last slot)`.
//! 4. Classify every placed job as on-time or late.
//!
//! Slots are only ever appended: idle gaps left earlier on a machine are
//! never back-filled.
//!
//! # Complexity
//! O(n log n) ordering plus O(n) assignment, n = pending jobs.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 4: Priority Dispatching

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{ScheduleMetrics, UtilizationBasis};
use crate::dispatching::{Policy, SchedulingContext};
use crate::error::ConfigurationError;
use crate::fuzzy::{presets, InferenceEngine};
use crate::models::{AssignedSlot, Job, JobStatus, Machine};
use crate::validation::{validate_input, ValidationError};

/// Input container for one scheduling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Jobs to schedule. Only `Pending` jobs take part.
    pub jobs: Vec<Job>,
    /// Available machines. Slots already present count as committed work.
    pub machines: Vec<Machine>,
    /// Ordering policy.
    #[serde(default)]
    pub policy: Policy,
    /// Fixed reference time for urgency.
    pub now: DateTime<Utc>,
}

impl ScheduleRequest {
    /// Creates a request using the default (fuzzy priority) policy.
    pub fn new(jobs: Vec<Job>, machines: Vec<Machine>, now: DateTime<Utc>) -> Self {
        Self {
            jobs,
            machines,
            policy: Policy::default(),
            now,
        }
    }

    /// Sets the ordering policy.
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the ordering policy by name (e.g. `"edd"`).
    ///
    /// # Errors
    /// `UnknownPolicy` for names outside the policy set.
    pub fn with_policy_name(self, name: &str) -> Result<Self, ConfigurationError> {
        Ok(self.with_policy(name.parse()?))
    }
}

/// Scheduler settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Denominator used for machine utilization.
    #[serde(default)]
    pub utilization_basis: UtilizationBasis,
}

impl SchedulerConfig {
    /// Sets the utilization basis.
    pub fn with_utilization_basis(mut self, basis: UtilizationBasis) -> Self {
        self.utilization_basis = basis;
        self
    }
}

/// A job left out of the schedule, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct UnscheduledJob {
    /// The job, still pending.
    pub job: Job,
    /// Why it could not be placed.
    pub reason: ConfigurationError,
}

/// Result of a scheduling run.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleOutcome {
    /// Policy that ordered the run.
    pub policy: Policy,
    /// Placed jobs, in decision order.
    pub jobs: Vec<Job>,
    /// Pending jobs that could not be placed.
    pub unscheduled: Vec<UnscheduledJob>,
    /// Non-pending input jobs, untouched.
    pub skipped: Vec<Job>,
    /// Final machine state.
    pub machines: Vec<Machine>,
    /// Summary metrics over placed and unscheduled jobs.
    pub metrics: ScheduleMetrics,
}

impl ScheduleOutcome {
    /// Looks up a placed job by ID.
    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Looks up a machine by ID.
    pub fn machine(&self, id: &str) -> Option<&Machine> {
        self.machines.iter().find(|m| m.id == id)
    }

    /// Whether no two slots overlap on any machine.
    pub fn is_feasible(&self) -> bool {
        self.machines.iter().all(Machine::is_feasible)
    }
}

/// Policy-driven greedy scheduler.
///
/// Holds the inference engine used by the fuzzy priority policy. The
/// engine shares its rule base through an `Arc`, so cloning a scheduler
/// is cheap and clones may run on different threads.
///
/// # Example
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use fuzzy_schedule::scheduler::{ScheduleRequest, Scheduler};
/// use fuzzy_schedule::models::{time, Job, JobStatus, Machine};
///
/// let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
/// let jobs = vec![Job::new("J1", 4.0, t0, t0 + time::hours(8.0), "M1")];
/// let request = ScheduleRequest::new(jobs, vec![Machine::new("M1")], t0);
///
/// let scheduler = Scheduler::with_default_rules().unwrap();
/// let outcome = scheduler.run(request).unwrap();
/// assert_eq!(outcome.jobs[0].status, JobStatus::OnTime);
/// assert_eq!(outcome.metrics.makespan_hours, 4.0);
/// ```
#[derive(Debug, Clone)]
pub struct Scheduler {
    engine: InferenceEngine,
    config: SchedulerConfig,
}

impl Scheduler {
    /// Creates a scheduler around an inference engine.
    pub fn new(engine: InferenceEngine) -> Self {
        Self {
            engine,
            config: SchedulerConfig::default(),
        }
    }

    /// Creates a scheduler with the built-in manufacturing priority rules.
    pub fn with_default_rules() -> Result<Self, ConfigurationError> {
        let system = presets::manufacturing_priority()?;
        Ok(Self::new(InferenceEngine::new(Arc::new(system))))
    }

    /// Sets the scheduler configuration.
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    /// The inference engine.
    pub fn engine(&self) -> &InferenceEngine {
        &self.engine
    }

    /// The scheduler configuration.
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Runs one scheduling pass.
    ///
    /// # Errors
    /// - `InvalidInput` when validation finds duplicate IDs, non-positive
    ///   capacities, or processing times that are non-positive, below one
    ///   millisecond, or overflow the time range from arrival.
    /// - Inference errors from a rule base that lacks the priority inputs.
    ///
    /// Jobs on unknown machines, or whose slot would end past the
    /// representable time range behind earlier work, don't fail the run;
    /// they are returned in [`ScheduleOutcome::unscheduled`].
    pub fn run(&self, request: ScheduleRequest) -> Result<ScheduleOutcome, ConfigurationError> {
        let ScheduleRequest {
            jobs,
            mut machines,
            policy,
            now,
        } = request;

        check_input(&jobs, &machines)?;

        let (mut pending, skipped): (Vec<Job>, Vec<Job>) = jobs
            .into_iter()
            .partition(|j| j.status == JobStatus::Pending);
        info!(
            policy = policy.name(),
            pending = pending.len(),
            skipped = skipped.len(),
            machines = machines.len(),
            "scheduling run started"
        );

        let context = SchedulingContext::at_time(now).with_machines(&machines);
        let order = policy.order(&mut pending, &context, &self.engine)?;

        let machine_index: HashMap<String, usize> = machines
            .iter()
            .enumerate()
            .map(|(i, m)| (m.id.clone(), i))
            .collect();

        let mut slots: Vec<Option<Job>> = pending.into_iter().map(Some).collect();
        let mut placed = Vec::with_capacity(slots.len());
        let mut unscheduled = Vec::new();

        for idx in order {
            let Some(mut job) = slots.get_mut(idx).and_then(Option::take) else {
                continue;
            };
            let Some(&mi) = machine_index.get(&job.machine_id) else {
                warn!(job = %job.id, machine = %job.machine_id, "unknown machine, job left unscheduled");
                let reason = ConfigurationError::UnknownMachine {
                    job_id: job.id.clone(),
                    machine_id: job.machine_id.clone(),
                };
                unscheduled.push(UnscheduledJob { job, reason });
                continue;
            };

            let machine = &mut machines[mi];
            let start = machine
                .available_from()
                .map_or(job.arrival_time, |free| free.max(job.arrival_time));
            let Some(end) = job.place(start) else {
                warn!(job = %job.id, machine = %machine.id, %start, "slot end out of time range, job left unscheduled");
                let reason = ConfigurationError::TimeOverflow {
                    job_id: job.id.clone(),
                    start: start.to_rfc3339(),
                };
                unscheduled.push(UnscheduledJob { job, reason });
                continue;
            };
            machine.push_slot(AssignedSlot {
                job_id: job.id.clone(),
                start,
                end,
                processing_time: job.processing_time,
            });
            debug!(job = %job.id, machine = %machine.id, %start, %end, "assigned");
            placed.push(job);
        }

        for job in &mut placed {
            job.classify();
        }

        let considered: Vec<Job> = placed
            .iter()
            .chain(unscheduled.iter().map(|u| &u.job))
            .cloned()
            .collect();
        let metrics =
            ScheduleMetrics::calculate(&considered, &machines, self.config.utilization_basis);

        info!(
            policy = policy.name(),
            scheduled = metrics.scheduled_jobs,
            unscheduled = unscheduled.len(),
            late = metrics.late_jobs,
            makespan_hours = metrics.makespan_hours,
            "scheduling run finished"
        );

        Ok(ScheduleOutcome {
            policy,
            jobs: placed,
            unscheduled,
            skipped,
            machines,
            metrics,
        })
    }
}

/// Rejects blocking validation errors; logs the tolerated ones.
fn check_input(jobs: &[Job], machines: &[Machine]) -> Result<(), ConfigurationError> {
    let Err(errors) = validate_input(jobs, machines) else {
        return Ok(());
    };
    let (blocking, advisory): (Vec<ValidationError>, Vec<ValidationError>) =
        errors.into_iter().partition(|e| e.kind.is_blocking());
    for e in &advisory {
        debug!(kind = ?e.kind, "{}", e.message);
    }
    if blocking.is_empty() {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidInput(blocking))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::time;
    use crate::validation::ValidationErrorKind;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 6, 0, 0).unwrap()
    }

    fn at(h: f64) -> DateTime<Utc> {
        t0() + time::hours(h)
    }

    fn scheduler() -> Scheduler {
        Scheduler::with_default_rules().unwrap()
    }

    fn machines() -> Vec<Machine> {
        vec![
            Machine::new("M1").with_capacity(100.0),
            Machine::new("M2").with_capacity(100.0),
        ]
    }

    fn scenario() -> Vec<Job> {
        vec![
            Job::new("J1", 10.0, at(0.0), at(5.0), "M1"),
            Job::new("J2", 5.0, at(0.0), at(20.0), "M1"),
            Job::new("J3", 8.0, at(0.0), at(30.0), "M2"),
        ]
    }

    fn ids(jobs: &[Job]) -> Vec<&str> {
        jobs.iter().map(|j| j.id.as_str()).collect()
    }

    #[test]
    fn test_three_job_scenario_fuzzy_priority() {
        let request = ScheduleRequest::new(scenario(), machines(), t0());
        let outcome = scheduler().run(request).unwrap();

        // J1 is due within its own processing time: highest priority.
        assert_eq!(outcome.jobs[0].id, "J1");
        let j1 = outcome.job("J1").unwrap();
        let j2 = outcome.job("J2").unwrap();
        let j3 = outcome.job("J3").unwrap();
        assert!(j1.priority_score.unwrap() > j2.priority_score.unwrap());
        assert!(j1.priority_score.unwrap() > j3.priority_score.unwrap());

        assert_eq!((j1.start_time, j1.end_time), (Some(at(0.0)), Some(at(10.0))));
        assert_eq!(j1.status, JobStatus::Late);
        assert_eq!((j2.start_time, j2.end_time), (Some(at(10.0)), Some(at(15.0))));
        assert_eq!(j2.status, JobStatus::OnTime);
        assert_eq!((j3.start_time, j3.end_time), (Some(at(0.0)), Some(at(8.0))));
        assert_eq!(j3.status, JobStatus::OnTime);

        assert!(outcome.is_feasible());
        assert_eq!(outcome.metrics.makespan_hours, 15.0);
        assert_eq!(outcome.metrics.late_jobs, 1);
        assert!((outcome.metrics.on_time_rate - 2.0 / 3.0).abs() < 1e-10);
        assert_eq!(outcome.machine("M1").unwrap().slots.len(), 2);
    }

    #[test]
    fn test_fcfs_preserves_input_order_for_increasing_arrivals() {
        let jobs: Vec<Job> = (0..6)
            .map(|i| {
                let m = if i % 2 == 0 { "M1" } else { "M2" };
                Job::new(format!("J{i}"), 2.0, at(i as f64), at(50.0), m)
            })
            .collect();
        let expected: Vec<String> = jobs.iter().map(|j| j.id.clone()).collect();
        let request = ScheduleRequest::new(jobs, machines(), t0())
            .with_policy(Policy::FirstComeFirstServed);
        let outcome = scheduler().run(request).unwrap();
        assert_eq!(ids(&outcome.jobs), expected);
        assert!(outcome.jobs.iter().all(|j| j.priority_score.is_none()));
    }

    #[test]
    fn test_edd_runs_tightest_due_date_first() {
        let request = ScheduleRequest::new(scenario(), machines(), t0())
            .with_policy_name("edd")
            .unwrap();
        let outcome = scheduler().run(request).unwrap();
        assert_eq!(ids(&outcome.jobs), vec!["J1", "J2", "J3"]);
        assert_eq!(outcome.job("J1").unwrap().priority_score, Some(90.0));
    }

    #[test]
    fn test_unknown_policy_name() {
        let err = ScheduleRequest::new(scenario(), machines(), t0())
            .with_policy_name("round-robin")
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownPolicy { .. }));
    }

    #[test]
    fn test_arrival_delays_start() {
        let jobs = vec![
            Job::new("A", 2.0, at(0.0), at(50.0), "M1"),
            Job::new("B", 2.0, at(5.0), at(50.0), "M1"),
        ];
        let request =
            ScheduleRequest::new(jobs, machines(), t0()).with_policy(Policy::FirstComeFirstServed);
        let outcome = scheduler().run(request).unwrap();
        // Append-only: B waits for its own arrival, the 2h..5h gap stays idle.
        assert_eq!(outcome.job("B").unwrap().start_time, Some(at(5.0)));
        assert_eq!(outcome.metrics.avg_waiting_time_hours, 0.0);
    }

    #[test]
    fn test_existing_slots_count_as_committed_work() {
        let mut m1 = Machine::new("M1");
        m1.push_slot(AssignedSlot {
            job_id: "earlier".into(),
            start: at(0.0),
            end: at(6.0),
            processing_time: 6.0,
        });
        let jobs = vec![Job::new("J1", 2.0, at(0.0), at(50.0), "M1")];
        let outcome = scheduler()
            .run(ScheduleRequest::new(jobs, vec![m1], t0()))
            .unwrap();
        assert_eq!(outcome.jobs[0].start_time, Some(at(6.0)));
        assert_eq!(outcome.machine("M1").unwrap().slots.len(), 2);
    }

    #[test]
    fn test_unknown_machine_is_reported_not_fatal() {
        let mut jobs = scenario();
        jobs.push(Job::new("J4", 1.0, at(0.0), at(2.0), "M404"));
        for policy in Policy::ALL {
            let request = ScheduleRequest::new(jobs.clone(), machines(), t0()).with_policy(policy);
            let outcome = scheduler().run(request).unwrap();
            assert_eq!(outcome.jobs.len(), 3);
            assert_eq!(outcome.unscheduled.len(), 1);
            let u = &outcome.unscheduled[0];
            assert_eq!(u.job.status, JobStatus::Pending);
            assert_eq!(
                u.reason,
                ConfigurationError::UnknownMachine {
                    job_id: "J4".into(),
                    machine_id: "M404".into()
                }
            );
            assert_eq!(outcome.metrics.total_jobs, 4);
            assert_eq!(outcome.metrics.scheduled_jobs, 3);
        }
    }

    #[test]
    fn test_non_pending_jobs_are_skipped() {
        let mut done = Job::new("old", 3.0, at(0.0), at(10.0), "M1");
        done.place(at(0.0));
        done.classify();
        let mut jobs = scenario();
        jobs.push(done.clone());
        let outcome = scheduler()
            .run(ScheduleRequest::new(jobs, machines(), t0()))
            .unwrap();
        assert_eq!(outcome.skipped, vec![done]);
        assert!(outcome.job("old").is_none());
        assert_eq!(outcome.metrics.total_jobs, 3);
    }

    #[test]
    fn test_invalid_input_aborts_run() {
        let jobs = vec![
            Job::new("J1", 0.0, at(0.0), at(5.0), "M1"),
            Job::new("J1", 1.0, at(0.0), at(5.0), "M1"),
        ];
        let err = scheduler()
            .run(ScheduleRequest::new(jobs, machines(), t0()))
            .unwrap_err();
        let ConfigurationError::InvalidInput(errors) = err else {
            panic!("expected InvalidInput, got {err:?}");
        };
        let kinds: Vec<_> = errors.iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&ValidationErrorKind::DuplicateId));
        assert!(kinds.contains(&ValidationErrorKind::NonPositiveProcessingTime));
    }

    #[test]
    fn test_huge_processing_time_is_rejected_not_panicking() {
        let jobs = vec![Job::new("J1", 1.0e10, t0(), t0(), "M1")];
        let err = scheduler()
            .run(ScheduleRequest::new(jobs, machines(), t0()))
            .unwrap_err();
        let ConfigurationError::InvalidInput(errors) = err else {
            panic!("expected InvalidInput, got {err:?}");
        };
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::ProcessingTimeOutOfRange);
    }

    #[test]
    fn test_sub_millisecond_processing_time_is_rejected() {
        let jobs = vec![Job::new("J1", 1.0e-7, t0(), at(1.0), "M1")];
        let err = scheduler()
            .run(ScheduleRequest::new(jobs, machines(), t0()))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidInput(ref e)
            if e[0].kind == ValidationErrorKind::ProcessingTimeOutOfRange));
    }

    #[test]
    fn test_overflow_behind_earlier_work_is_unscheduled() {
        // Each job fits alone from its arrival; queued behind the first,
        // the second would end past the time range.
        let jobs = vec![
            Job::new("first", 1.5e9, t0(), at(1.0), "M1"),
            Job::new("second", 1.5e9, t0(), at(2.0), "M1"),
        ];
        let request =
            ScheduleRequest::new(jobs, machines(), t0()).with_policy(Policy::FirstComeFirstServed);
        let outcome = scheduler().run(request).unwrap();
        assert_eq!(ids(&outcome.jobs), vec!["first"]);
        assert_eq!(outcome.unscheduled.len(), 1);
        let u = &outcome.unscheduled[0];
        assert_eq!(u.job.id, "second");
        assert_eq!(u.job.status, JobStatus::Pending);
        assert!(matches!(u.reason, ConfigurationError::TimeOverflow { ref job_id, .. } if job_id == "second"));
        assert_eq!(outcome.machine("M1").unwrap().slots.len(), 1);
    }

    #[test]
    fn test_due_before_arrival_is_tolerated() {
        let jobs = vec![Job::new("J1", 1.0, at(4.0), at(2.0), "M1")];
        let outcome = scheduler()
            .run(ScheduleRequest::new(jobs, machines(), t0()))
            .unwrap();
        assert_eq!(outcome.jobs[0].status, JobStatus::Late);
    }

    #[test]
    fn test_empty_input() {
        let outcome = scheduler()
            .run(ScheduleRequest::new(Vec::new(), Vec::new(), t0()))
            .unwrap();
        assert!(outcome.jobs.is_empty());
        assert_eq!(outcome.metrics.makespan_hours, 0.0);
        assert_eq!(outcome.metrics.on_time_rate, 0.0);
    }

    #[test]
    fn test_capacity_utilization_basis() {
        let config = SchedulerConfig::default().with_utilization_basis(UtilizationBasis::Capacity);
        let outcome = scheduler()
            .with_config(config)
            .run(ScheduleRequest::new(scenario(), machines(), t0()))
            .unwrap();
        // M1: 15h of 100h, M2: 8h of 100h
        assert!((outcome.metrics.utilization_by_machine["M1"] - 0.15).abs() < 1e-10);
        assert!((outcome.metrics.utilization_by_machine["M2"] - 0.08).abs() < 1e-10);
    }

    #[test]
    fn test_serialized_jobs_rederive_metrics() {
        let outcome = scheduler()
            .run(ScheduleRequest::new(scenario(), machines(), t0()))
            .unwrap();
        let json = serde_json::to_string(&outcome.jobs).unwrap();
        let jobs: Vec<Job> = serde_json::from_str(&json).unwrap();
        let metrics =
            ScheduleMetrics::calculate(&jobs, &outcome.machines, UtilizationBasis::Makespan);
        assert_eq!(metrics, outcome.metrics);
    }

    #[test]
    fn test_outcome_serializes() {
        let mut jobs = scenario();
        jobs.push(Job::new("J4", 1.0, at(0.0), at(2.0), "M404"));
        let outcome = scheduler()
            .run(ScheduleRequest::new(jobs, machines(), t0()))
            .unwrap();
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["policy"], "fuzzy-priority");
        assert_eq!(value["jobs"][0]["status"], "late");
        assert!(value["unscheduled"][0]["reason"]["unknown_machine"].is_object());
    }

    #[test]
    fn test_scheduler_is_shareable_across_threads() {
        let scheduler = scheduler();
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let s = scheduler.clone();
                std::thread::spawn(move || {
                    s.run(ScheduleRequest::new(scenario(), machines(), t0()))
                        .unwrap()
                        .metrics
                })
            })
            .collect();
        let results: Vec<ScheduleMetrics> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }

    proptest! {
        #[test]
        fn prop_no_overlap_on_any_machine(
            specs in prop::collection::vec((0.0f64..48.0, 0.25f64..12.0, 0.0f64..96.0, 0usize..3), 0..25),
            policy_idx in 0usize..3,
        ) {
            let jobs: Vec<Job> = specs
                .iter()
                .enumerate()
                .map(|(i, &(arrival, p, due, m))| {
                    Job::new(format!("J{i}"), p, at(arrival), at(arrival + due), format!("M{m}"))
                })
                .collect();
            let machines: Vec<Machine> = (0..3).map(|m| Machine::new(format!("M{m}"))).collect();
            let request = ScheduleRequest::new(jobs, machines, t0())
                .with_policy(Policy::ALL[policy_idx]);
            let outcome = scheduler().run(request).unwrap();

            prop_assert!(outcome.is_feasible());
            prop_assert_eq!(outcome.jobs.len(), specs.len());
            for job in &outcome.jobs {
                prop_assert!(job.start_time.unwrap() >= job.arrival_time);
                prop_assert!(matches!(job.status, JobStatus::OnTime | JobStatus::Late));
            }
        }
    }
}

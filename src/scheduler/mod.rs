//! Greedy scheduling runs and KPI evaluation.
//!
//! # Algorithm
//!
//! `Scheduler` orders pending jobs by a [`Policy`](crate::dispatching::Policy)
//! and appends each one to its required machine. It is not optimal, but it
//! is fast, deterministic and easy to audit.
//!
//! # KPI
//!
//! `ScheduleMetrics` computes makespan, utilization, on-time rate, flow
//! time, waiting time and tardiness from the final job/machine state.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod kpi;
mod simple;

pub use kpi::{ScheduleMetrics, UtilizationBasis};
pub use simple::{ScheduleOutcome, ScheduleRequest, Scheduler, SchedulerConfig, UnscheduledJob};

//! Fuzzy-priority job scheduling.
//!
//! Assigns jobs to machines in an order chosen by one of three policies:
//! a Mamdani fuzzy inference over processing time, due-date urgency and
//! machine load; first come, first served; or earliest due date. Each job
//! is appended to its required machine's queue and classified as on-time
//! or late.
//!
//! # Modules
//!
//! - **`fuzzy`**: Membership functions, linguistic variables, rules and
//!   the Mamdani inference engine, plus the built-in manufacturing rule base
//! - **`models`**: Domain types: `Job`, `Machine`, `AssignedSlot`
//! - **`dispatching`**: Urgency/load signals and ordering policies
//! - **`scheduler`**: The greedy scheduling run and its summary metrics
//! - **`validation`**: Input integrity checks (duplicate IDs, bad durations)
//! - **`error`**: `ConfigurationError`
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use fuzzy_schedule::models::{time, Job, Machine};
//! use fuzzy_schedule::scheduler::{ScheduleRequest, Scheduler};
//!
//! let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let jobs = vec![
//!     Job::new("J1", 10.0, t0, t0 + time::hours(5.0), "M1"),
//!     Job::new("J2", 5.0, t0, t0 + time::hours(20.0), "M1"),
//! ];
//! let request = ScheduleRequest::new(jobs, vec![Machine::new("M1")], t0)
//!     .with_policy_name("fuzzy-priority")
//!     .unwrap();
//!
//! let outcome = Scheduler::with_default_rules().unwrap().run(request).unwrap();
//! assert_eq!(outcome.jobs[0].id, "J1");
//! assert_eq!(outcome.jobs[1].start_time, Some(t0 + time::hours(10.0)));
//! ```
//!
//! # References
//!
//! - Mamdani & Assilian (1975), "An experiment in linguistic synthesis with
//!   a fuzzy logic controller"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"

pub mod dispatching;
pub mod error;
pub mod fuzzy;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use error::ConfigurationError;

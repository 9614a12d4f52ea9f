//! Job ordering: input signals, scheduling context and selection policies.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use chrono::{TimeZone, Utc};
//! use fuzzy_schedule::dispatching::{Policy, SchedulingContext};
//! use fuzzy_schedule::fuzzy::{presets, InferenceEngine};
//! use fuzzy_schedule::models::{time, Job, Machine};
//!
//! let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let mut jobs = vec![
//!     Job::new("J1", 2.0, t0, t0 + time::hours(48.0), "M1"),
//!     Job::new("J2", 2.0, t0, t0 + time::hours(3.0), "M1"),
//! ];
//! let context = SchedulingContext::at_time(t0).with_machines(&[Machine::new("M1")]);
//! let engine = InferenceEngine::new(Arc::new(presets::manufacturing_priority().unwrap()));
//!
//! let order = Policy::EarliestDueDate.order(&mut jobs, &context, &engine).unwrap();
//! assert_eq!(order, vec![1, 0]);
//! ```

mod context;
mod policy;
pub mod signals;

pub use context::SchedulingContext;
pub use policy::{priority_inputs, Policy};

//! Scheduling domain models.
//!
//! Provides the data types exchanged with the scheduler: jobs (work items)
//! and machines (single-capacity resources), plus hour-based time helpers.
//!
//! # Domain Mappings
//!
//! | fuzzy-schedule | Manufacturing | Print shop | Support desk |
//! |----------------|---------------|------------|--------------|
//! | Job | Work order | Print job | Ticket |
//! | Machine | Machine/Cell | Press | Agent |

mod job;
mod machine;
pub mod time;

pub use job::{Job, JobStatus};
pub use machine::{AssignedSlot, Machine, DEFAULT_CAPACITY_HOURS};

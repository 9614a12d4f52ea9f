//! Crisp input signals for fuzzy prioritization.
//!
//! - **Urgency**: a deliberate staircase over remaining time relative to
//!   processing time. The cliffs are smoothed again by fuzzification.
//! - **Load**: percentage of a machine's nominal capacity already committed
//!   in the current run. Not clamped; above 100 means over-committed.

use chrono::{DateTime, Utc};

use crate::models::{time, Machine};

/// Urgency level in `{10, 9, 7, 5, 3, 1}`.
///
/// With `remaining = due − now` (hours) and `p = processing_time`:
///
/// | remaining | urgency |
/// |-----------|---------|
/// | ≤ 0 | 10 (overdue) |
/// | ≤ p | 9 (must start now) |
/// | ≤ 2p | 7 |
/// | ≤ 5p | 5 |
/// | ≤ 10p | 3 |
/// | otherwise | 1 |
///
/// Evaluated top-down; ties go to the more urgent step.
pub fn urgency(due_date: DateTime<Utc>, now: DateTime<Utc>, processing_time: f64) -> f64 {
    let remaining = time::hours_between(now, due_date);
    let p = processing_time;
    if remaining <= 0.0 {
        10.0
    } else if remaining <= p {
        9.0
    } else if remaining <= 2.0 * p {
        7.0
    } else if remaining <= 5.0 * p {
        5.0
    } else if remaining <= 10.0 * p {
        3.0
    } else {
        1.0
    }
}

/// `100 · assigned hours / capacity`.
pub fn load_percentage(machine: &Machine) -> f64 {
    100.0 * machine.assigned_hours() / machine.capacity
}

//! Machine model.
//!
//! A machine processes one job at a time. During a run it accumulates an
//! append-only queue of slots; its nominal capacity (hours) only serves to
//! normalize load and, optionally, utilization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::time;

/// Default nominal capacity (hours of work).
pub const DEFAULT_CAPACITY_HOURS: f64 = 100.0;

/// A job placed on a machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedSlot {
    /// Job occupying the slot.
    pub job_id: String,
    /// Slot start (inclusive).
    pub start: DateTime<Utc>,
    /// Slot end (exclusive).
    pub end: DateTime<Utc>,
    /// Processing time of the job (hours).
    pub processing_time: f64,
}

impl AssignedSlot {
    /// Slot length (hours).
    pub fn duration_hours(&self) -> f64 {
        time::hours_between(self.start, self.end)
    }

    /// Whether two half-open slots `[start, end)` intersect.
    pub fn overlaps(&self, other: &AssignedSlot) -> bool {
        self.start < other.end && other.start < self.end
    }
}

/// A machine (single-capacity resource).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    /// Unique machine identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Nominal capacity (hours). Positive.
    pub capacity: f64,
    /// Slots assigned in the current run, in assignment order.
    #[serde(default)]
    pub slots: Vec<AssignedSlot>,
}

impl Machine {
    /// Creates a machine with the default capacity.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            capacity: DEFAULT_CAPACITY_HOURS,
            slots: Vec::new(),
        }
    }

    /// Sets the machine name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the nominal capacity (hours).
    pub fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = capacity;
        self
    }

    /// End of the last assigned slot, `None` when idle.
    pub fn available_from(&self) -> Option<DateTime<Utc>> {
        self.slots.last().map(|s| s.end)
    }

    /// Total processing time assigned (hours).
    pub fn assigned_hours(&self) -> f64 {
        self.slots.iter().map(|s| s.processing_time).sum()
    }

    /// Appends a slot to the queue.
    pub(crate) fn push_slot(&mut self, slot: AssignedSlot) {
        self.slots.push(slot);
    }

    /// Whether no two assigned slots overlap.
    pub fn is_feasible(&self) -> bool {
        let mut sorted: Vec<&AssignedSlot> = self.slots.iter().collect();
        sorted.sort_by_key(|s| s.start);
        sorted.windows(2).all(|w| !w[0].overlaps(w[1]))
    }

    /// Drops every assigned slot.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

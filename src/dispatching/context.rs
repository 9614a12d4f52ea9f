//! Scheduling context for policy evaluation.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::signals;
use crate::models::Machine;

/// Run-wide state read by ordering policies.
///
/// Holds the fixed "now" reference of the run and the load percentage of
/// every machine at ordering time.
#[derive(Debug, Clone)]
pub struct SchedulingContext {
    /// Reference time for urgency.
    pub now: DateTime<Utc>,
    /// Machine load in percent (machine_id → load).
    pub machine_loads: HashMap<String, f64>,
}

impl SchedulingContext {
    /// Creates a context at the given time with no machines.
    pub fn at_time(now: DateTime<Utc>) -> Self {
        Self {
            now,
            machine_loads: HashMap::new(),
        }
    }

    /// Records the current load of every machine.
    pub fn with_machines(mut self, machines: &[Machine]) -> Self {
        for machine in machines {
            self.machine_loads
                .insert(machine.id.clone(), signals::load_percentage(machine));
        }
        self
    }

    /// Sets the load of one machine.
    pub fn with_load(mut self, machine_id: impl Into<String>, load: f64) -> Self {
        self.machine_loads.insert(machine_id.into(), load);
        self
    }

    /// Load of a machine, `None` if the machine is unknown.
    pub fn load(&self, machine_id: &str) -> Option<f64> {
        self.machine_loads.get(machine_id).copied()
    }
}

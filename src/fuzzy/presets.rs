//! Ready-made fuzzy systems.
//!
//! # Manufacturing priority
//!
//! | Variable | Domain | Terms |
//! |----------|--------|-------|
//! | `processing_time` (h) | 0..100 | short, medium, long |
//! | `urgency` | 0..10 | low, medium, high |
//! | `machine_load` (%) | 0..100 | light, medium, heavy |
//! | `priority` (output) | 0..100 | very_low, low, medium, high, very_high |
//!
//! Thirteen rules favour urgent, short jobs on lightly loaded machines and
//! push non-urgent long jobs or jobs queued on heavily loaded machines down.

use super::{FuzzyRule, FuzzySystem, FuzzyVariable, MembershipFunction, RuleBase};
use crate::error::ConfigurationError;

/// Processing time input (hours).
pub const PROCESSING_TIME: &str = "processing_time";
/// Deadline urgency input (0..10).
pub const URGENCY: &str = "urgency";
/// Machine load input (percent of capacity).
pub const MACHINE_LOAD: &str = "machine_load";
/// Priority output (0..100).
pub const PRIORITY: &str = "priority";

fn triangles(
    name: &str,
    min: f64,
    max: f64,
    terms: &[(&str, f64, f64, f64)],
) -> Result<FuzzyVariable, ConfigurationError> {
    terms
        .iter()
        .try_fold(FuzzyVariable::new(name, min, max)?, |var, &(t, a, b, c)| {
            var.with_term(MembershipFunction::triangular(t, a, b, c)?)
        })
}

/// `urgency AND processing_time AND machine_load → priority`.
fn all3(urgency: &str, processing: &str, load: &str, priority: &str) -> FuzzyRule {
    FuzzyRule::when(URGENCY, urgency)
        .and(PROCESSING_TIME, processing)
        .and(MACHINE_LOAD, load)
        .then(PRIORITY, priority)
}

/// The three-input manufacturing priority system.
///
/// Inputs are named [`PROCESSING_TIME`], [`URGENCY`] and [`MACHINE_LOAD`];
/// the output is [`PRIORITY`].
pub fn manufacturing_priority() -> Result<FuzzySystem, ConfigurationError> {
    let processing_time = triangles(
        PROCESSING_TIME,
        0.0,
        100.0,
        &[
            ("short", 0.0, 0.0, 40.0),
            ("medium", 20.0, 50.0, 80.0),
            ("long", 60.0, 100.0, 100.0),
        ],
    )?;

    let urgency = triangles(
        URGENCY,
        0.0,
        10.0,
        &[
            ("low", 0.0, 0.0, 5.0),
            ("medium", 2.0, 5.0, 8.0),
            ("high", 5.0, 10.0, 10.0),
        ],
    )?;

    let machine_load = triangles(
        MACHINE_LOAD,
        0.0,
        100.0,
        &[
            ("light", 0.0, 0.0, 50.0),
            ("medium", 25.0, 50.0, 75.0),
            ("heavy", 50.0, 100.0, 100.0),
        ],
    )?;

    let priority = triangles(
        PRIORITY,
        0.0,
        100.0,
        &[
            ("very_low", 0.0, 0.0, 25.0),
            ("low", 0.0, 25.0, 50.0),
            ("medium", 25.0, 50.0, 75.0),
            ("high", 50.0, 75.0, 100.0),
            ("very_high", 75.0, 100.0, 100.0),
        ],
    )?;

    let rules = RuleBase::new()
        // High urgency
        .with_rule(all3("high", "short", "light", "very_high"))
        .with_rule(all3("high", "short", "medium", "very_high"))
        .with_rule(all3("high", "medium", "light", "high"))
        .with_rule(all3("high", "long", "light", "high"))
        .with_rule(
            FuzzyRule::when(URGENCY, "high")
                .and(MACHINE_LOAD, "heavy")
                .then(PRIORITY, "medium"),
        )
        // Medium urgency
        .with_rule(all3("medium", "short", "light", "high"))
        .with_rule(all3("medium", "medium", "light", "medium"))
        .with_rule(all3("medium", "long", "medium", "low"))
        .with_rule(
            FuzzyRule::when(URGENCY, "medium")
                .and(MACHINE_LOAD, "heavy")
                .then(PRIORITY, "low"),
        )
        // Low urgency
        .with_rule(all3("low", "short", "light", "medium"))
        .with_rule(
            FuzzyRule::when(URGENCY, "low")
                .and(PROCESSING_TIME, "medium")
                .then(PRIORITY, "low"),
        )
        .with_rule(
            FuzzyRule::when(URGENCY, "low")
                .and(PROCESSING_TIME, "long")
                .then(PRIORITY, "very_low"),
        )
        .with_rule(
            FuzzyRule::when(URGENCY, "low")
                .and(MACHINE_LOAD, "heavy")
                .then(PRIORITY, "very_low"),
        );

    FuzzySystem::new(
        vec![processing_time, urgency, machine_load],
        priority,
        rules,
    )
}

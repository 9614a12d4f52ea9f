//! Configuration-level errors.
//!
//! Every failure the crate can report is a configuration problem: a
//! reference that does not resolve (machine, variable, term, policy) or a
//! structurally invalid definition. Numeric edge cases (zero-width
//! membership segments, an all-zero aggregated curve) are recovered
//! internally and never surface here.

use serde::Serialize;
use thiserror::Error;

use crate::validation::ValidationError;

/// A referenced entity does not exist, or a definition is malformed.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfigurationError {
    /// Policy name not in the closed policy set.
    #[error("unknown scheduling policy '{name}'")]
    UnknownPolicy { name: String },

    /// Job references a machine absent from the run's machine set.
    #[error("job '{job_id}' requires unknown machine '{machine_id}'")]
    UnknownMachine { job_id: String, machine_id: String },

    /// Variable name not defined in the fuzzy system.
    #[error("unknown fuzzy variable '{variable}'")]
    UnknownVariable { variable: String },

    /// Term name not defined on the given variable.
    #[error("variable '{variable}' has no term '{term}'")]
    UnknownTerm { variable: String, term: String },

    /// A rule references an input variable that was not supplied.
    #[error("no crisp value supplied for input variable '{variable}'")]
    MissingInput { variable: String },

    /// Two terms on one variable share a name.
    #[error("variable '{variable}' already defines term '{term}'")]
    DuplicateTerm { variable: String, term: String },

    /// Two variables in one system share a name.
    #[error("fuzzy variable '{variable}' defined more than once")]
    DuplicateVariable { variable: String },

    /// Breakpoints are not finite and non-decreasing.
    #[error("term '{term}' has invalid breakpoints {points:?}")]
    InvalidBreakpoints { term: String, points: Vec<f64> },

    /// A term's breakpoints leave the variable's domain.
    #[error("term '{term}' lies outside the domain [{min}, {max}] of variable '{variable}'")]
    TermOutsideDomain {
        variable: String,
        term: String,
        min: f64,
        max: f64,
    },

    /// Domain bounds are not finite or not ordered.
    #[error("variable '{variable}' has invalid domain [{min}, {max}]")]
    InvalidDomain { variable: String, min: f64, max: f64 },

    /// A rule concludes on a variable other than the system's output.
    #[error("rule {index} concludes on '{variable}', expected output '{output}'")]
    ConsequentMismatch {
        index: usize,
        variable: String,
        output: String,
    },

    /// A rule has no antecedent clauses.
    #[error("rule {index} has no antecedents")]
    EmptyAntecedent { index: usize },

    /// Defuzzification needs at least two samples.
    #[error("defuzzification resolution must be at least 2, got {resolution}")]
    InvalidResolution { resolution: usize },

    /// The job's slot would end past the representable time range.
    #[error("job '{job_id}' would end outside the representable time range when started at {start}")]
    TimeOverflow { job_id: String, start: String },

    /// Job/machine input failed structural validation.
    #[error("invalid scheduling input ({} problem(s)): {}", .0.len(), summarize(.0))]
    InvalidInput(Vec<ValidationError>),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

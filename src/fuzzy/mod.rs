//! Mamdani fuzzy inference.
//!
//! Converts several crisp signals into one crisp output through linguistic
//! rules. Domain-agnostic: nothing here knows about jobs or machines.
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use fuzzy_schedule::fuzzy::{
//!     CrispInputs, FuzzyRule, FuzzySystem, FuzzyVariable, InferenceEngine,
//!     MembershipFunction, RuleBase,
//! };
//!
//! let load = FuzzyVariable::new("load", 0.0, 100.0).unwrap()
//!     .with_term(MembershipFunction::trapezoidal("idle", 0.0, 0.0, 20.0, 40.0).unwrap()).unwrap()
//!     .with_term(MembershipFunction::trapezoidal("busy", 30.0, 60.0, 100.0, 100.0).unwrap()).unwrap();
//! let score = FuzzyVariable::new("score", 0.0, 10.0).unwrap()
//!     .with_term(MembershipFunction::triangular("low", 0.0, 0.0, 5.0).unwrap()).unwrap()
//!     .with_term(MembershipFunction::triangular("high", 5.0, 10.0, 10.0).unwrap()).unwrap();
//! let rules = RuleBase::new()
//!     .with_rule(FuzzyRule::when("load", "idle").then("score", "high"))
//!     .with_rule(FuzzyRule::when("load", "busy").then("score", "low"));
//!
//! let system = FuzzySystem::new(vec![load], score, rules).unwrap();
//! let engine = InferenceEngine::new(Arc::new(system));
//! let s = engine.infer(&CrispInputs::new().with("load", 10.0)).unwrap();
//! assert!(s > 5.0);
//! ```
//!
//! # References
//!
//! - Mamdani & Assilian (1975), "An Experiment in Linguistic Synthesis with
//!   a Fuzzy Logic Controller"
//! - Ross (2010), "Fuzzy Logic with Engineering Applications"

mod engine;
mod membership;
pub mod presets;
mod rule;
mod system;
mod variable;

pub use engine::{CrispInputs, Inference, InferenceConfig, InferenceEngine, DEFAULT_RESOLUTION};
pub use membership::{MembershipFunction, Shape};
pub use rule::{Clause, FuzzyRule, RuleBase, RuleBuilder};
pub use system::{FuzzySystem, FuzzySystemSpec};
pub use variable::{Fuzzified, FuzzyVariable};

//! Mamdani inference engine.
//!
//! # Algorithm
//!
//! 1. **Fuzzification**: every supplied input is mapped to its term degrees.
//! 2. **Rule evaluation**: rule strength = min of antecedent degrees.
//! 3. **Implication/aggregation**: each rule clips its consequent term at its
//!    strength; clipped curves are combined by pointwise max over a
//!    discretized output domain.
//! 4. **Defuzzification**: centroid `Σ x·μ(x) / Σ μ(x)` over the samples.
//!
//! When no rule fires, the aggregated curve is identically zero and the
//! output domain midpoint is returned instead of dividing by zero.
//!
//! # Complexity
//! O(r·a + t·n) where r=rules, a=antecedents/rule, t=output terms,
//! n=resolution.
//!
//! # Reference
//! Mamdani & Assilian (1975), "An Experiment in Linguistic Synthesis with a
//! Fuzzy Logic Controller"

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::{Fuzzified, FuzzySystem};
use crate::error::ConfigurationError;

/// Default number of output-domain samples for centroid defuzzification.
pub const DEFAULT_RESOLUTION: usize = 100;

/// Inference tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Number of equally spaced samples across the output domain, both
    /// endpoints included. Must be at least 2.
    pub resolution: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
        }
    }
}

impl InferenceConfig {
    /// Sets the defuzzification resolution.
    pub fn with_resolution(mut self, resolution: usize) -> Self {
        self.resolution = resolution;
        self
    }
}

/// Crisp input values keyed by variable name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrispInputs(BTreeMap<String, f64>);

impl CrispInputs {
    /// Creates an empty input set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the value of one variable.
    pub fn with(mut self, variable: impl Into<String>, value: f64) -> Self {
        self.0.insert(variable.into(), value);
        self
    }

    /// Value of one variable.
    pub fn get(&self, variable: &str) -> Option<f64> {
        self.0.get(variable).copied()
    }

    /// Iterates `(variable, value)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for CrispInputs {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Full trace of one inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inference {
    /// Defuzzified output.
    pub crisp: f64,
    /// Firing strength of each rule, in rule-base order.
    pub rule_strengths: Vec<f64>,
    /// Activation (max strength) per output term, in term order.
    pub activations: Vec<(String, f64)>,
    /// Aggregated membership at each output sample.
    pub curve: Vec<f64>,
    /// Whether the midpoint fallback was used.
    pub degenerate: bool,
}

/// Evaluates a [`FuzzySystem`] on crisp inputs.
///
/// The system is shared by `Arc`; cloning an engine is cheap and engines
/// can be used from several threads at once.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use fuzzy_schedule::fuzzy::{presets, CrispInputs, InferenceEngine};
///
/// let system = Arc::new(presets::manufacturing_priority().unwrap());
/// let engine = InferenceEngine::new(system);
///
/// let inputs = CrispInputs::new()
///     .with(presets::PROCESSING_TIME, 10.0)
///     .with(presets::URGENCY, 9.0)
///     .with(presets::MACHINE_LOAD, 0.0);
/// let priority = engine.infer(&inputs).unwrap();
/// assert!(priority > 75.0 && priority <= 100.0);
/// ```
#[derive(Debug, Clone)]
pub struct InferenceEngine {
    system: Arc<FuzzySystem>,
    config: InferenceConfig,
}

impl InferenceEngine {
    /// Creates an engine with the default configuration.
    pub fn new(system: Arc<FuzzySystem>) -> Self {
        Self {
            system,
            config: InferenceConfig::default(),
        }
    }

    /// Creates an engine with a custom configuration.
    pub fn with_config(
        system: Arc<FuzzySystem>,
        config: InferenceConfig,
    ) -> Result<Self, ConfigurationError> {
        if config.resolution < 2 {
            return Err(ConfigurationError::InvalidResolution {
                resolution: config.resolution,
            });
        }
        Ok(Self { system, config })
    }

    /// The bound system.
    pub fn system(&self) -> &FuzzySystem {
        &self.system
    }

    /// The engine configuration.
    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Runs inference and returns the crisp output.
    ///
    /// # Errors
    /// `UnknownVariable` if an input names no input variable;
    /// `MissingInput` if a rule needs a variable that was not supplied.
    pub fn infer(&self, inputs: &CrispInputs) -> Result<f64, ConfigurationError> {
        self.evaluate(inputs).map(|inference| inference.crisp)
    }

    /// Runs inference and returns every intermediate result.
    pub fn evaluate(&self, inputs: &CrispInputs) -> Result<Inference, ConfigurationError> {
        let fuzzified = self.fuzzify(inputs)?;
        let rules = self.system.rules().rules();
        let output = self.system.output();

        // Rule evaluation
        let rule_strengths: Vec<f64> = rules
            .iter()
            .enumerate()
            .map(|(i, rule)| {
                let strength = rule.strength(|clause| {
                    fuzzified
                        .get(clause.variable.as_str())
                        .and_then(|f| f.degree(&clause.term))
                        .unwrap_or(0.0)
                });
                trace!(rule = i, strength, consequent = %rule.consequent.term, "rule evaluated");
                strength
            })
            .collect();

        // Clip-then-max over rules equals clipping each term at its max strength.
        let activations: Vec<(String, f64)> = output
            .terms()
            .iter()
            .map(|term| {
                let level = rules
                    .iter()
                    .zip(&rule_strengths)
                    .filter(|(rule, _)| rule.consequent.term == term.name)
                    .map(|(_, &s)| s)
                    .fold(0.0_f64, f64::max);
                (term.name.clone(), level)
            })
            .collect();

        let samples = self.samples();
        let curve: Vec<f64> = samples
            .iter()
            .map(|&x| {
                output
                    .terms()
                    .iter()
                    .zip(&activations)
                    .filter(|(_, (_, level))| *level > 0.0)
                    .map(|(term, (_, level))| term.clipped(x, *level))
                    .fold(0.0_f64, f64::max)
            })
            .collect();

        let (crisp, degenerate) = centroid(&samples, &curve)
            .map(|c| (c, false))
            .unwrap_or_else(|| {
                debug!(
                    output = %output.name,
                    "no rule fired; defuzzifying to domain midpoint"
                );
                (output.midpoint(), true)
            });

        Ok(Inference {
            crisp,
            rule_strengths,
            activations,
            curve,
            degenerate,
        })
    }

    /// Output-domain sample points, both endpoints included.
    pub fn samples(&self) -> Vec<f64> {
        let output = self.system.output();
        let n = self.config.resolution;
        let step = (output.max - output.min) / (n - 1) as f64;
        (0..n)
            .map(|i| {
                if i == n - 1 {
                    output.max
                } else {
                    output.min + step * i as f64
                }
            })
            .collect()
    }

    fn fuzzify<'a>(
        &self,
        inputs: &'a CrispInputs,
    ) -> Result<BTreeMap<&'a str, Fuzzified>, ConfigurationError> {
        let mut fuzzified = BTreeMap::new();
        for (name, value) in inputs.iter() {
            let variable =
                self.system
                    .input(name)
                    .ok_or_else(|| ConfigurationError::UnknownVariable {
                        variable: name.to_string(),
                    })?;
            fuzzified.insert(name, variable.fuzzify(value));
        }
        for name in self.system.referenced_inputs() {
            if !fuzzified.contains_key(name) {
                return Err(ConfigurationError::MissingInput {
                    variable: name.to_string(),
                });
            }
        }
        Ok(fuzzified)
    }
}

/// Center of gravity of a sampled curve; `None` if the curve has no mass.
fn centroid(samples: &[f64], curve: &[f64]) -> Option<f64> {
    let (num, den) = samples
        .iter()
        .zip(curve)
        .fold((0.0_f64, 0.0_f64), |(num, den), (&x, &mu)| {
            (num + x * mu, den + mu)
        });
    if den > 0.0 {
        Some(num / den)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::{presets, FuzzyRule, FuzzyVariable, MembershipFunction, RuleBase};

    fn engine() -> InferenceEngine {
        InferenceEngine::new(Arc::new(presets::manufacturing_priority().unwrap()))
    }

    fn inputs(processing: f64, urgency: f64, load: f64) -> CrispInputs {
        CrispInputs::new()
            .with(presets::PROCESSING_TIME, processing)
            .with(presets::URGENCY, urgency)
            .with(presets::MACHINE_LOAD, load)
    }

    /// One input, one output, one rule: "x is high → y is big".
    fn single_rule_engine() -> InferenceEngine {
        let x = FuzzyVariable::new("x", 0.0, 10.0)
            .unwrap()
            .with_term(MembershipFunction::triangular("high", 5.0, 10.0, 10.0).unwrap())
            .unwrap();
        let y = FuzzyVariable::new("y", 0.0, 100.0)
            .unwrap()
            .with_term(MembershipFunction::triangular("big", 0.0, 50.0, 100.0).unwrap())
            .unwrap();
        let rules = RuleBase::new().with_rule(FuzzyRule::when("x", "high").then("y", "big"));
        InferenceEngine::new(Arc::new(FuzzySystem::new(vec![x], y, rules).unwrap()))
    }

    #[test]
    fn test_urgent_short_job_gets_very_high_priority() {
        let e = engine();
        let inference = e.evaluate(&inputs(10.0, 9.0, 0.0)).unwrap();
        // urgency high = 0.8, short = 0.75, light = 1.0 → rule 0 fires at 0.75
        assert!((inference.rule_strengths[0] - 0.75).abs() < 1e-12);
        let very_high = inference
            .activations
            .iter()
            .find(|(t, _)| t == "very_high")
            .unwrap()
            .1;
        assert!((very_high - 0.75).abs() < 1e-12);
        assert!(!inference.degenerate);
        assert!(inference.crisp > 80.0 && inference.crisp < 100.0);
    }

    #[test]
    fn test_symmetric_consequent_centroid_near_peak() {
        // medium urgency + short + light → "high" (50, 75, 100) only
        let p = engine().infer(&inputs(5.0, 5.0, 0.0)).unwrap();
        assert!((p - 75.0).abs() < 1.0, "got {p}");
    }

    #[test]
    fn test_low_urgency_long_job_low_priority() {
        let p = engine().infer(&inputs(100.0, 0.0, 100.0)).unwrap();
        assert!(p < 25.0, "got {p}");
    }

    #[test]
    fn test_priority_within_output_domain() {
        let e = engine();
        for &(p, u, l) in &[
            (1.0, 10.0, 0.0),
            (50.0, 5.0, 50.0),
            (99.0, 1.0, 150.0),
            (30.0, 7.0, 80.0),
        ] {
            let out = e.infer(&inputs(p, u, l)).unwrap();
            assert!((0.0..=100.0).contains(&out), "{out}");
        }
    }

    #[test]
    fn test_determinism() {
        let e = engine();
        let a = e.infer(&inputs(12.5, 7.0, 33.3)).unwrap();
        let b = e.infer(&inputs(12.5, 7.0, 33.3)).unwrap();
        assert_eq!(a.to_bits(), b.to_bits());
    }

    #[test]
    fn test_no_rule_fires_returns_midpoint() {
        let e = single_rule_engine();
        let inference = e.evaluate(&CrispInputs::new().with("x", 2.0)).unwrap();
        assert!(inference.degenerate);
        assert_eq!(inference.crisp, 50.0);
        assert!(inference.curve.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_out_of_domain_input_falls_back() {
        let e = single_rule_engine();
        assert_eq!(e.infer(&CrispInputs::new().with("x", -40.0)).unwrap(), 50.0);
    }

    #[test]
    fn test_clipped_curve_height() {
        let e = single_rule_engine();
        let inference = e.evaluate(&CrispInputs::new().with("x", 7.5)).unwrap();
        let max = inference.curve.iter().cloned().fold(0.0, f64::max);
        assert!((max - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_input_variable() {
        let e = single_rule_engine();
        let err = e
            .infer(&CrispInputs::new().with("x", 1.0).with("nope", 1.0))
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::UnknownVariable {
                variable: "nope".into()
            }
        );
    }

    #[test]
    fn test_missing_input_variable() {
        let err = engine()
            .infer(&CrispInputs::new().with(presets::URGENCY, 5.0))
            .unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingInput { .. }));
    }

    #[test]
    fn test_samples_cover_domain() {
        let e = engine();
        let s = e.samples();
        assert_eq!(s.len(), DEFAULT_RESOLUTION);
        assert_eq!(s[0], 0.0);
        assert_eq!(s[DEFAULT_RESOLUTION - 1], 100.0);
    }

    #[test]
    fn test_resolution_is_configurable() {
        let system = Arc::new(presets::manufacturing_priority().unwrap());
        let coarse = InferenceEngine::new(system.clone());
        let fine =
            InferenceEngine::with_config(system, InferenceConfig::default().with_resolution(1000))
                .unwrap();
        let a = coarse.infer(&inputs(10.0, 9.0, 0.0)).unwrap();
        let b = fine.infer(&inputs(10.0, 9.0, 0.0)).unwrap();
        assert_eq!(fine.samples().len(), 1000);
        // Finer sampling moves the centroid by well under one percent
        assert!((a - b).abs() / b < 0.01);
    }

    #[test]
    fn test_invalid_resolution() {
        let system = Arc::new(presets::manufacturing_priority().unwrap());
        assert!(matches!(
            InferenceEngine::with_config(system, InferenceConfig::default().with_resolution(1)),
            Err(ConfigurationError::InvalidResolution { resolution: 1 })
        ));
    }

    #[test]
    fn test_engine_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<InferenceEngine>();
    }
}

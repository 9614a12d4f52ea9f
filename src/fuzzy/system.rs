//! Validated fuzzy system definition.
//!
//! A [`FuzzySystem`] binds input variables, one output variable and a rule
//! base into an immutable configuration. All variable/term references are
//! resolved once here, so inference never meets a dangling reference.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{FuzzyRule, FuzzyVariable, RuleBase};
use crate::error::ConfigurationError;

/// Immutable Mamdani system definition.
///
/// Built once at setup and shared read-only (typically behind an `Arc`)
/// by every inference engine and scheduling run that uses it.
///
/// Deserializes through [`FuzzySystemSpec`], so a system loaded from any
/// serde format is validated exactly like one built in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "FuzzySystemSpec", into = "FuzzySystemSpec")]
pub struct FuzzySystem {
    inputs: Vec<FuzzyVariable>,
    output: FuzzyVariable,
    rules: RuleBase,
}

/// Unvalidated system definition, as read from configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzySystemSpec {
    /// Input variables.
    pub inputs: Vec<FuzzyVariable>,
    /// Output variable.
    pub output: FuzzyVariable,
    /// Rules concluding on the output variable.
    pub rules: Vec<FuzzyRule>,
}

impl FuzzySystem {
    /// Validates and binds a system.
    ///
    /// # Errors
    /// - `InvalidDomain` / `InvalidBreakpoints` / `TermOutsideDomain` /
    ///   `DuplicateTerm` for malformed variables
    /// - `DuplicateVariable` if two variables share a name
    /// - `EmptyAntecedent` for a rule without antecedents
    /// - `UnknownVariable` / `UnknownTerm` for unresolved antecedents
    /// - `ConsequentMismatch` / `UnknownTerm` for unresolved consequents
    pub fn new(
        inputs: Vec<FuzzyVariable>,
        output: FuzzyVariable,
        rules: RuleBase,
    ) -> Result<Self, ConfigurationError> {
        let mut names = HashSet::new();
        for var in inputs.iter().chain(std::iter::once(&output)) {
            var.validate()?;
            if !names.insert(var.name.as_str()) {
                return Err(ConfigurationError::DuplicateVariable {
                    variable: var.name.clone(),
                });
            }
        }

        for (index, rule) in rules.rules().iter().enumerate() {
            if rule.antecedents.is_empty() {
                return Err(ConfigurationError::EmptyAntecedent { index });
            }
            for clause in &rule.antecedents {
                let var = inputs
                    .iter()
                    .find(|v| v.name == clause.variable)
                    .ok_or_else(|| ConfigurationError::UnknownVariable {
                        variable: clause.variable.clone(),
                    })?;
                if !var.has_term(&clause.term) {
                    return Err(ConfigurationError::UnknownTerm {
                        variable: clause.variable.clone(),
                        term: clause.term.clone(),
                    });
                }
            }
            if rule.consequent.variable != output.name {
                return Err(ConfigurationError::ConsequentMismatch {
                    index,
                    variable: rule.consequent.variable.clone(),
                    output: output.name.clone(),
                });
            }
            if !output.has_term(&rule.consequent.term) {
                return Err(ConfigurationError::UnknownTerm {
                    variable: output.name.clone(),
                    term: rule.consequent.term.clone(),
                });
            }
        }

        Ok(Self {
            inputs,
            output,
            rules,
        })
    }

    /// Input variables in declaration order.
    pub fn inputs(&self) -> &[FuzzyVariable] {
        &self.inputs
    }

    /// Looks up an input variable by name.
    pub fn input(&self, name: &str) -> Option<&FuzzyVariable> {
        self.inputs.iter().find(|v| v.name == name)
    }

    /// The output variable.
    pub fn output(&self) -> &FuzzyVariable {
        &self.output
    }

    /// The rule base.
    pub fn rules(&self) -> &RuleBase {
        &self.rules
    }

    /// Input variables referenced by at least one rule, in first-use order.
    pub fn referenced_inputs(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rules
            .rules()
            .iter()
            .flat_map(|r| r.antecedents.iter())
            .map(|c| c.variable.as_str())
            .filter(|v| seen.insert(*v))
            .collect()
    }
}

impl TryFrom<FuzzySystemSpec> for FuzzySystem {
    type Error = ConfigurationError;

    fn try_from(spec: FuzzySystemSpec) -> Result<Self, Self::Error> {
        FuzzySystem::new(spec.inputs, spec.output, spec.rules.into_iter().collect())
    }
}

impl From<FuzzySystem> for FuzzySystemSpec {
    fn from(system: FuzzySystem) -> Self {
        Self {
            inputs: system.inputs,
            output: system.output,
            rules: system.rules.rules().to_vec(),
        }
    }
}

//! Fuzzy rules and rule bases.
//!
//! A rule reads `IF v1 IS t1 AND v2 IS t2 ... THEN out IS t`. Antecedents
//! combine with the min t-norm. Rule order never changes the numeric result
//! (aggregation is a max), but it is preserved for reproducible iteration.

use serde::{Deserialize, Serialize};

/// One `(variable IS term)` clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Clause {
    /// Variable name.
    pub variable: String,
    /// Term name on that variable.
    pub term: String,
}

impl Clause {
    /// Creates a clause.
    pub fn new(variable: impl Into<String>, term: impl Into<String>) -> Self {
        Self {
            variable: variable.into(),
            term: term.into(),
        }
    }
}

/// An AND-combination of antecedents implying one consequent.
///
/// # Example
/// ```
/// use fuzzy_schedule::fuzzy::FuzzyRule;
///
/// let rule = FuzzyRule::when("urgency", "high")
///     .and("processing_time", "short")
///     .then("priority", "very_high");
/// assert_eq!(rule.antecedents.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyRule {
    /// IF part, in declaration order.
    pub antecedents: Vec<Clause>,
    /// THEN part.
    pub consequent: Clause,
}

impl FuzzyRule {
    /// Creates a rule from explicit clauses.
    pub fn new(antecedents: Vec<Clause>, consequent: Clause) -> Self {
        Self {
            antecedents,
            consequent,
        }
    }

    /// Starts a rule with its first antecedent.
    pub fn when(variable: impl Into<String>, term: impl Into<String>) -> RuleBuilder {
        RuleBuilder {
            antecedents: vec![Clause::new(variable, term)],
        }
    }

    /// Firing strength: minimum antecedent degree.
    ///
    /// `degree_of` resolves a clause to its degree. A rule with no
    /// antecedents has strength 0.
    pub fn strength<F>(&self, mut degree_of: F) -> f64
    where
        F: FnMut(&Clause) -> f64,
    {
        if self.antecedents.is_empty() {
            return 0.0;
        }
        self.antecedents
            .iter()
            .map(&mut degree_of)
            .fold(1.0_f64, f64::min)
    }
}

/// Incremental builder returned by [`FuzzyRule::when`].
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    antecedents: Vec<Clause>,
}

impl RuleBuilder {
    /// Adds another AND-ed antecedent.
    pub fn and(mut self, variable: impl Into<String>, term: impl Into<String>) -> Self {
        self.antecedents.push(Clause::new(variable, term));
        self
    }

    /// Completes the rule with its consequent.
    pub fn then(self, variable: impl Into<String>, term: impl Into<String>) -> FuzzyRule {
        FuzzyRule::new(self.antecedents, Clause::new(variable, term))
    }
}

/// Ordered rules concluding on a single output variable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleBase {
    rules: Vec<FuzzyRule>,
}

impl RuleBase {
    /// Creates an empty rule base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule.
    pub fn add_rule(&mut self, rule: FuzzyRule) {
        self.rules.push(rule);
    }

    /// Builder form of [`add_rule`](Self::add_rule).
    pub fn with_rule(mut self, rule: FuzzyRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Rules in declaration order.
    pub fn rules(&self) -> &[FuzzyRule] {
        &self.rules
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the rule base has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl FromIterator<FuzzyRule> for RuleBase {
    fn from_iter<I: IntoIterator<Item = FuzzyRule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_builder() {
        let rule = FuzzyRule::when("urgency", "high")
            .and("machine_load", "heavy")
            .then("priority", "medium");
        assert_eq!(
            rule.antecedents,
            vec![
                Clause::new("urgency", "high"),
                Clause::new("machine_load", "heavy")
            ]
        );
        assert_eq!(rule.consequent, Clause::new("priority", "medium"));
    }

    #[test]
    fn test_strength_is_min() {
        let rule = FuzzyRule::when("a", "x").and("b", "y").then("out", "z");
        let degrees: HashMap<&str, f64> = [("a", 0.8), ("b", 0.3)].into_iter().collect();
        let s = rule.strength(|c| degrees[c.variable.as_str()]);
        assert_eq!(s, 0.3);
    }

    #[test]
    fn test_strength_zero_antecedent() {
        let rule = FuzzyRule::when("a", "x").and("b", "y").then("out", "z");
        assert_eq!(rule.strength(|c| if c.variable == "a" { 1.0 } else { 0.0 }), 0.0);
    }

    #[test]
    fn test_empty_antecedents() {
        let rule = FuzzyRule::new(Vec::new(), Clause::new("out", "z"));
        assert_eq!(rule.strength(|_| 1.0), 0.0);
    }

    #[test]
    fn test_rule_base_order() {
        let base: RuleBase = vec![
            FuzzyRule::when("a", "x").then("out", "hi"),
            FuzzyRule::when("a", "y").then("out", "lo"),
        ]
        .into_iter()
        .collect();
        assert_eq!(base.len(), 2);
        assert_eq!(base.rules()[0].consequent.term, "hi");
        assert_eq!(base.rules()[1].consequent.term, "lo");
    }
}

//! Linguistic variables and fuzzification.

use serde::{Deserialize, Serialize};

use super::MembershipFunction;
use crate::error::ConfigurationError;

/// A named quantity over a numeric domain, partitioned into linguistic terms.
///
/// Terms keep declaration order so that fuzzification output and rule
/// iteration are reproducible.
///
/// # Example
/// ```
/// use fuzzy_schedule::fuzzy::{FuzzyVariable, MembershipFunction};
///
/// let urgency = FuzzyVariable::new("urgency", 0.0, 10.0)
///     .unwrap()
///     .with_term(MembershipFunction::triangular("low", 0.0, 0.0, 5.0).unwrap())
///     .unwrap()
///     .with_term(MembershipFunction::triangular("high", 5.0, 10.0, 10.0).unwrap())
///     .unwrap();
///
/// let degrees = urgency.fuzzify(7.5);
/// assert_eq!(degrees.degree("low"), Some(0.0));
/// assert_eq!(degrees.degree("high"), Some(0.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuzzyVariable {
    /// Variable name (e.g. "urgency").
    pub name: String,
    /// Lower domain bound.
    pub min: f64,
    /// Upper domain bound.
    pub max: f64,
    terms: Vec<MembershipFunction>,
}

impl FuzzyVariable {
    /// Creates a variable over `[min, max]` with no terms.
    pub fn new(name: impl Into<String>, min: f64, max: f64) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(ConfigurationError::InvalidDomain {
                variable: name,
                min,
                max,
            });
        }
        Ok(Self {
            name,
            min,
            max,
            terms: Vec::new(),
        })
    }

    /// Adds a term. Its breakpoints must lie within the domain and its name
    /// must be new on this variable.
    pub fn add_term(&mut self, term: MembershipFunction) -> Result<(), ConfigurationError> {
        if self.term(&term.name).is_some() {
            return Err(ConfigurationError::DuplicateTerm {
                variable: self.name.clone(),
                term: term.name,
            });
        }
        let (lo, hi) = term.shape.support();
        if lo < self.min || hi > self.max {
            return Err(ConfigurationError::TermOutsideDomain {
                variable: self.name.clone(),
                term: term.name,
                min: self.min,
                max: self.max,
            });
        }
        self.terms.push(term);
        Ok(())
    }

    /// Builder form of [`add_term`](Self::add_term).
    pub fn with_term(mut self, term: MembershipFunction) -> Result<Self, ConfigurationError> {
        self.add_term(term)?;
        Ok(self)
    }

    /// Looks up a term by name.
    pub fn term(&self, name: &str) -> Option<&MembershipFunction> {
        self.terms.iter().find(|t| t.name == name)
    }

    /// Terms in declaration order.
    pub fn terms(&self) -> &[MembershipFunction] {
        &self.terms
    }

    /// Whether `name` is a term of this variable.
    pub fn has_term(&self, name: &str) -> bool {
        self.term(name).is_some()
    }

    /// Re-checks domain and term invariants.
    ///
    /// Needed for variables that arrived through deserialization rather than
    /// the checked constructors.
    pub(crate) fn validate(&self) -> Result<(), ConfigurationError> {
        let mut checked = FuzzyVariable::new(self.name.clone(), self.min, self.max)?;
        for term in &self.terms {
            checked.add_term(MembershipFunction::new(term.name.clone(), term.shape)?)?;
        }
        Ok(())
    }

    /// Midpoint of the domain.
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Degree of every term for the crisp value `x`.
    ///
    /// Values outside the domain are not rejected; they simply fall outside
    /// (most) term supports.
    pub fn fuzzify(&self, x: f64) -> Fuzzified {
        Fuzzified {
            degrees: self
                .terms
                .iter()
                .map(|t| (t.name.clone(), t.degree(x)))
                .collect(),
        }
    }
}

/// Term degrees for one crisp value, in the variable's term order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fuzzified {
    /// `(term name, degree)` pairs.
    pub degrees: Vec<(String, f64)>,
}

impl Fuzzified {
    /// Degree for a term, `None` if the term does not exist.
    pub fn degree(&self, term: &str) -> Option<f64> {
        self.degrees
            .iter()
            .find(|(name, _)| name == term)
            .map(|(_, d)| *d)
    }

    /// Terms with nonzero degree.
    pub fn active(&self) -> impl Iterator<Item = (&str, f64)> {
        self.degrees
            .iter()
            .filter(|(_, d)| *d > 0.0)
            .map(|(name, d)| (name.as_str(), *d))
    }
}

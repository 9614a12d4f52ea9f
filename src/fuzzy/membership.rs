//! Membership functions.
//!
//! A membership function maps a crisp value to a truth degree in `[0, 1]`
//! for one linguistic term. The shape set is closed: triangular and
//! trapezoidal, both piecewise linear.
//!
//! # Degenerate segments
//! A zero-width rising or falling segment (`a == b`, `c == d`) is a vertical
//! edge. Evaluation never divides by that width; the degree jumps straight
//! between 0 and 1 at the breakpoint, and the breakpoint itself belongs to
//! the plateau.
//!
//! # Reference
//! Zadeh (1965), "Fuzzy Sets"; Ross (2010), "Fuzzy Logic with Engineering
//! Applications", Ch. 4

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Breakpoints of a piecewise-linear membership curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Shape {
    /// Rises on `[a, b]`, peaks at `b`, falls on `[b, c]`.
    Triangular { a: f64, b: f64, c: f64 },
    /// Rises on `[a, b]`, plateau on `[b, c]`, falls on `[c, d]`.
    Trapezoidal { a: f64, b: f64, c: f64, d: f64 },
}

impl Shape {
    /// Degree of membership of `x`.
    ///
    /// Always finite and within `[0, 1]`. NaN maps to 0.
    pub fn degree(&self, x: f64) -> f64 {
        match *self {
            Shape::Triangular { a, b, c } => plateau_degree(x, a, b, b, c),
            Shape::Trapezoidal { a, b, c, d } => plateau_degree(x, a, b, c, d),
        }
    }

    /// Breakpoints in ascending order.
    pub fn breakpoints(&self) -> Vec<f64> {
        match *self {
            Shape::Triangular { a, b, c } => vec![a, b, c],
            Shape::Trapezoidal { a, b, c, d } => vec![a, b, c, d],
        }
    }

    /// Outermost breakpoints `(first, last)`.
    pub fn support(&self) -> (f64, f64) {
        match *self {
            Shape::Triangular { a, c, .. } => (a, c),
            Shape::Trapezoidal { a, d, .. } => (a, d),
        }
    }

    /// Centre of the region where the degree is 1.
    pub fn peak(&self) -> f64 {
        match *self {
            Shape::Triangular { b, .. } => b,
            Shape::Trapezoidal { b, c, .. } => (b + c) / 2.0,
        }
    }

    fn is_well_formed(&self) -> bool {
        let points = self.breakpoints();
        points.iter().all(|p| p.is_finite()) && points.windows(2).all(|w| w[0] <= w[1])
    }
}

/// Shared evaluation: a triangle is a trapezoid whose plateau is one point.
fn plateau_degree(x: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    if x >= b && x <= c {
        return 1.0;
    }
    if x <= a || x >= d {
        return 0.0;
    }
    // Strictly inside a sloped segment, so its width is nonzero here.
    if x < b {
        (x - a) / (b - a)
    } else {
        (d - x) / (d - c)
    }
}

/// A named membership function (one linguistic term).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MembershipFunction {
    /// Term name (e.g. "short", "high").
    pub name: String,
    /// Curve shape.
    pub shape: Shape,
}

impl MembershipFunction {
    /// Creates a membership function from a validated shape.
    ///
    /// Fails if breakpoints are non-finite or decreasing.
    pub fn new(name: impl Into<String>, shape: Shape) -> Result<Self, ConfigurationError> {
        let name = name.into();
        if !shape.is_well_formed() {
            return Err(ConfigurationError::InvalidBreakpoints {
                term: name,
                points: shape.breakpoints(),
            });
        }
        Ok(Self { name, shape })
    }

    /// Triangular term with breakpoints `a <= b <= c`.
    pub fn triangular(
        name: impl Into<String>,
        a: f64,
        b: f64,
        c: f64,
    ) -> Result<Self, ConfigurationError> {
        Self::new(name, Shape::Triangular { a, b, c })
    }

    /// Trapezoidal term with breakpoints `a <= b <= c <= d`.
    pub fn trapezoidal(
        name: impl Into<String>,
        a: f64,
        b: f64,
        c: f64,
        d: f64,
    ) -> Result<Self, ConfigurationError> {
        Self::new(name, Shape::Trapezoidal { a, b, c, d })
    }

    /// Degree of membership of `x` in this term.
    #[inline]
    pub fn degree(&self, x: f64) -> f64 {
        self.shape.degree(x)
    }

    /// Degree clipped at `height` (Mamdani min implication).
    #[inline]
    pub fn clipped(&self, x: f64, height: f64) -> f64 {
        self.degree(x).min(height)
    }
}

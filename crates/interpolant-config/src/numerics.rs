//! Numerical settings for the spline, solver and least-squares stages.

use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

/// Default relative pivot tolerance for direct solves.
pub const DEFAULT_PIVOT_TOLERANCE: f64 = 1e-12;

/// Default relative singular-value cutoff for the numerical rank.
pub const DEFAULT_RANK_TOLERANCE: f64 = 1e-12;

/// Default condition number above which a normal-equation system is reported
/// as ill-conditioned.
pub const DEFAULT_CONDITION_WARNING: f64 = 1e10;

// =============================================================================
// SPLINE
// =============================================================================

/// Boundary conditions of the cubic spline.
///
/// The spline prescribes the second derivative (`ω`) at both ends. Zero on both
/// ends gives the natural spline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SplineConfig {
    /// Second derivative imposed at the first knot.
    pub start_second_derivative: f64,

    /// Second derivative imposed at the last knot.
    pub end_second_derivative: f64,
}

impl SplineConfig {
    /// Natural boundary conditions (`ω_0 = ω_{n-1} = 0`).
    pub fn natural() -> Self {
        Self::default()
    }

    /// Prescribed end second derivatives.
    pub fn clamped(start: f64, end: f64) -> Self {
        Self {
            start_second_derivative: start,
            end_second_derivative: end,
        }
    }

    /// Returns true when both boundary weights are zero.
    pub fn is_natural(&self) -> bool {
        self.start_second_derivative == 0.0 && self.end_second_derivative == 0.0
    }
}

impl Validate for SplineConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !self.start_second_derivative.is_finite() {
            errors.push(ValidationError::new(
                "start_second_derivative",
                "Boundary second derivative must be finite",
            ));
        }
        if !self.end_second_derivative.is_finite() {
            errors.push(ValidationError::new(
                "end_second_derivative",
                "Boundary second derivative must be finite",
            ));
        }

        errors
    }
}

// =============================================================================
// SOLVER
// =============================================================================

/// Tolerances for the direct linear solvers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// A pivot smaller than `pivot_tolerance * max|A|` marks the system singular.
    pub pivot_tolerance: f64,

    /// Singular values below `rank_tolerance * σ_max` do not count toward rank.
    pub rank_tolerance: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
            rank_tolerance: DEFAULT_RANK_TOLERANCE,
        }
    }
}

impl SolverConfig {
    /// Sets the pivot tolerance.
    #[must_use]
    pub fn with_pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    /// Sets the rank tolerance.
    #[must_use]
    pub fn with_rank_tolerance(mut self, tolerance: f64) -> Self {
        self.rank_tolerance = tolerance;
        self
    }
}

fn check_tolerance(field: &str, value: f64, errors: &mut Vec<ValidationError>) {
    if !value.is_finite() || value <= 0.0 || value >= 1.0 {
        errors.push(ValidationError::with_rule(
            field,
            "Tolerance must be finite and in (0, 1)",
            "valid_tolerance",
        ));
    }
}

impl Validate for SolverConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        check_tolerance("pivot_tolerance", self.pivot_tolerance, &mut errors);
        check_tolerance("rank_tolerance", self.rank_tolerance, &mut errors);
        errors
    }
}

// =============================================================================
// LEAST SQUARES
// =============================================================================

/// Defaults for least-squares fitting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeastSquaresConfig {
    /// Polynomial degree used when the caller does not pick one.
    pub default_degree: usize,

    /// Condition number of `AᵗA` above which a fit is flagged ill-conditioned.
    pub condition_warning_threshold: f64,
}

impl Default for LeastSquaresConfig {
    fn default() -> Self {
        Self {
            default_degree: 1,
            condition_warning_threshold: DEFAULT_CONDITION_WARNING,
        }
    }
}

impl LeastSquaresConfig {
    /// Sets the default polynomial degree.
    #[must_use]
    pub fn with_default_degree(mut self, degree: usize) -> Self {
        self.default_degree = degree;
        self
    }

    /// Sets the ill-conditioning threshold.
    #[must_use]
    pub fn with_condition_warning_threshold(mut self, threshold: f64) -> Self {
        self.condition_warning_threshold = threshold;
        self
    }
}

impl Validate for LeastSquaresConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if !(self.condition_warning_threshold.is_finite()
            && self.condition_warning_threshold > 1.0)
        {
            errors.push(ValidationError::with_rule(
                "condition_warning_threshold",
                "Condition threshold must be finite and greater than 1",
                "valid_threshold",
            ));
        }

        errors
    }
}

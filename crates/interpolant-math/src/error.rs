//! Error types for interpolation and fitting.

use interpolant_config::ConfigError;
use thiserror::Error;

/// A specialized Result type for interpolation and fitting.
pub type InterpolationResult<T> = Result<T, InterpolationError>;

/// Errors that can occur while building or evaluating an interpolant.
///
/// Every variant is deterministic: the same inputs always fail the same way.
#[derive(Error, Debug)]
pub enum InterpolationError {
    /// The x and y sequences have different lengths.
    #[error("Dimension mismatch: x has {x_len} values, y has {y_len}")]
    DimensionMismatch {
        /// Number of x values.
        x_len: usize,
        /// Number of y values.
        y_len: usize,
    },

    /// A divided-difference order outside the table.
    #[error("Invalid order {order}: at most {max} is available for {points} points")]
    InvalidOrder {
        /// Requested order.
        order: usize,
        /// Largest order available.
        max: usize,
        /// Number of sample points.
        points: usize,
    },

    /// A polynomial degree that would leave the fit underdetermined.
    #[error("Invalid degree {degree}: must be less than the number of points ({points})")]
    InvalidDegree {
        /// Requested degree.
        degree: usize,
        /// Number of sample points.
        points: usize,
    },

    /// Too few points, or points that collapse the computation (duplicate x).
    #[error("Degenerate input: {reason}")]
    DegenerateInput {
        /// What made the input degenerate.
        reason: String,
    },

    /// The x values are not strictly increasing.
    #[error("x values must be strictly increasing: x[{index}] = {current} follows {previous}")]
    NonMonotonicInput {
        /// Index of the first offending value.
        index: usize,
        /// The value before it.
        previous: f64,
        /// The offending value.
        current: f64,
    },

    /// A sample value is NaN or infinite.
    #[error("Non-finite {axis} value at index {index}: {value}")]
    NonFiniteInput {
        /// Which sequence (`"x"` or `"y"`).
        axis: &'static str,
        /// Position in the sequence.
        index: usize,
        /// The value found.
        value: f64,
    },

    /// The linear system has no unique solution.
    #[error("Singular system: pivot {pivot:.3e} at row {row} is below tolerance")]
    SingularSystem {
        /// Row where elimination broke down.
        row: usize,
        /// The vanishing pivot.
        pivot: f64,
    },

    /// The normal equations `AᵗA c = Aᵗb` have no unique solution.
    #[error("Singular normal equations: rank {rank} < {parameters} parameters")]
    SingularNormalEquations {
        /// Numerical rank of `AᵗA`.
        rank: usize,
        /// Number of model parameters.
        parameters: usize,
    },

    /// Evaluation outside the interval covered by a piecewise function.
    #[error("{x} is outside the domain [{min}, {max}]")]
    OutOfDomain {
        /// The query point.
        x: f64,
        /// Lower end of the domain.
        min: f64,
        /// Upper end of the domain.
        max: f64,
    },

    /// Input outside the domain of a model transform.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// Configuration rejected.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl InterpolationError {
    /// Creates a degenerate-input error.
    #[must_use]
    pub fn degenerate(reason: impl Into<String>) -> Self {
        Self::DegenerateInput {
            reason: reason.into(),
        }
    }

    /// Creates a degenerate-input error for too few points.
    #[must_use]
    pub fn insufficient(required: usize, actual: usize) -> Self {
        Self::degenerate(format!(
            "need at least {} points, got {}",
            required, actual
        ))
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

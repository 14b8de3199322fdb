//! # Interpolant Math
//!
//! The numerical engine of Interpolant: closed-form functions through, or
//! fitted to, a set of sample points.
//!
//! This crate provides:
//!
//! - **Divided Differences**: Triangular tables of `f[x_i, …, x_{i+k}]`
//! - **Newton Interpolation**: Interpolating polynomials in Newton and standard form
//! - **Cubic Splines**: Natural and second-derivative-clamped splines via a tridiagonal solve
//! - **Least Squares**: Polynomial, periodic, exponential and power-law fits via the normal equations
//! - **Expressions**: Evaluation, differentiation and text rendering of the results
//! - **Reports**: Rounded, serializable views for a display layer
//!
//! ## Example
//!
//! ```rust
//! use interpolant_math::prelude::*;
//!
//! let table = DividedDifferenceTable::build(&[0.0, 1.0, 2.0, 4.0], &[1.0, 2.0, 4.0, 8.0], None)?;
//! let newton = newton_polynomial(&table)?;
//! assert!((evaluate(&newton, 4.0)? - 8.0).abs() < 1e-12);
//!
//! let spline = natural_cubic_spline(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0], 0.0, 0.0)?;
//! assert!(evaluate(&spline, 3.0).is_err());
//!
//! let fit = fit_least_squares(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0], Model::linear())?;
//! assert!((fit.predict(3.0)? - 7.0).abs() < 1e-12);
//! # Ok::<(), InterpolationError>(())
//! ```
//!
//! ## Design Philosophy
//!
//! - **Full Precision**: Engine values are never rounded; only [`report`] rounds
//! - **Explicit Failures**: Every invalid input maps to a distinct [`InterpolationError`]
//! - **Value Objects**: Results are immutable and `Send + Sync`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::suboptimal_flops)]

pub mod divided_differences;
pub mod error;
pub mod expression;
pub mod least_squares;
pub mod linear_algebra;
pub mod newton;
pub mod piecewise;
pub mod polynomial;
pub mod report;
pub mod samples;
pub mod spline;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::divided_differences::DividedDifferenceTable;
    pub use crate::error::{InterpolationError, InterpolationResult};
    pub use crate::expression::{evaluate, Expression, Variable};
    pub use crate::least_squares::{
        fit_least_squares, FittedExpression, FittedModel, LeastSquaresFitter, Model,
    };
    pub use crate::newton::{newton_polynomial, NewtonPolynomial};
    pub use crate::piecewise::{PiecewisePolynomial, Segment};
    pub use crate::polynomial::Polynomial;
    pub use crate::report::{round_to, DifferenceTableView, FitView, SplineView};
    pub use crate::samples::{SamplePoint, SampleSet};
    pub use crate::spline::{natural_cubic_spline, CubicSpline, SplineSystem, SplineSystemBuilder};
}

pub use error::{InterpolationError, InterpolationResult};

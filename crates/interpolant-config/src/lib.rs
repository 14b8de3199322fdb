//! Interpolant Configuration Layer
//!
//! This crate provides configuration management for the Interpolant engine:
//! display precision, spline boundary conditions, linear-solver tolerances and
//! least-squares defaults.
//!
//! # Features
//!
//! - **Display Configuration**: Decimal places for shown tables, free-variable name
//! - **Spline Configuration**: Second-derivative boundary weights (natural by default)
//! - **Solver Configuration**: Pivot and rank tolerances
//! - **Least-Squares Configuration**: Default degree, ill-conditioning threshold
//! - **Loading**: JSON and TOML documents, validated on load
//!
//! # Example
//!
//! ```rust
//! use interpolant_config::{EngineConfig, SplineConfig, Validate};
//!
//! let config = EngineConfig::new().with_spline(SplineConfig::clamped(0.5, -0.5));
//! assert!(config.is_valid());
//!
//! let json = config.to_json_string().unwrap();
//! let reloaded = EngineConfig::from_json_str(&json).unwrap();
//! assert_eq!(reloaded.spline.start_second_derivative, 0.5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod display;
mod engine;
mod error;
mod numerics;

pub use display::{DisplayConfig, MAX_DECIMALS};
pub use engine::EngineConfig;
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use numerics::{
    LeastSquaresConfig, SolverConfig, SplineConfig, DEFAULT_CONDITION_WARNING,
    DEFAULT_PIVOT_TOLERANCE, DEFAULT_RANK_TOLERANCE,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::display::DisplayConfig;
    pub use crate::engine::EngineConfig;
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::numerics::{LeastSquaresConfig, SolverConfig, SplineConfig};
}

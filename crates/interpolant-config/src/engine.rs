//! Top-level engine configuration and file loading.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::display::DisplayConfig;
use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};
use crate::numerics::{LeastSquaresConfig, SolverConfig, SplineConfig};

/// Complete configuration of the interpolation engine.
///
/// Every section falls back to its defaults when absent, so an empty
/// document is a valid configuration.
///
/// ```rust
/// use interpolant_config::EngineConfig;
///
/// let config = EngineConfig::from_toml_str(
///     r#"
///     [display]
///     decimals = 6
///
///     [spline]
///     start_second_derivative = 1.5
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.display.decimals, 6);
/// assert_eq!(config.spline.end_second_derivative, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Presentation settings.
    pub display: DisplayConfig,

    /// Spline boundary conditions.
    pub spline: SplineConfig,

    /// Linear solver tolerances.
    pub solver: SolverConfig,

    /// Least-squares defaults.
    pub least_squares: LeastSquaresConfig,
}

impl EngineConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tighter tolerances: rejects nearly singular systems earlier and flags
    /// ill-conditioning sooner.
    pub fn strict() -> Self {
        Self {
            solver: SolverConfig::default()
                .with_pivot_tolerance(1e-9)
                .with_rank_tolerance(1e-9),
            least_squares: LeastSquaresConfig::default().with_condition_warning_threshold(1e6),
            ..Self::default()
        }
    }

    /// Sets the display section.
    #[must_use]
    pub fn with_display(mut self, display: DisplayConfig) -> Self {
        self.display = display;
        self
    }

    /// Sets the spline section.
    #[must_use]
    pub fn with_spline(mut self, spline: SplineConfig) -> Self {
        self.spline = spline;
        self
    }

    /// Sets the solver section.
    #[must_use]
    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    /// Sets the least-squares section.
    #[must_use]
    pub fn with_least_squares(mut self, least_squares: LeastSquaresConfig) -> Self {
        self.least_squares = least_squares;
        self
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Parses and validates a TOML document.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate_or_error()?;
        Ok(config)
    }

    /// Loads a configuration file, picking the format from its extension
    /// (`.json` or `.toml`).
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let read = || {
            std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })
        };

        match extension.as_deref() {
            Some("json") => Self::from_json_str(&read()?),
            Some("toml") => Self::from_toml_str(&read()?),
            _ => Err(ConfigError::UnsupportedFormat { extension }),
        }
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let sections: [(&str, Vec<ValidationError>); 4] = [
            ("display", self.display.validate()),
            ("spline", self.spline.validate()),
            ("solver", self.solver.validate()),
            ("least_squares", self.least_squares.validate()),
        ];

        sections
            .into_iter()
            .flat_map(|(name, errors)| errors.into_iter().map(move |e| e.nested(name)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_documents_give_defaults() {
        assert_eq!(EngineConfig::from_json_str("{}").unwrap(), EngineConfig::default());
        assert_eq!(EngineConfig::from_toml_str("").unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_partial_json() {
        let config = EngineConfig::from_json_str(
            r#"{ "solver": { "pivot_tolerance": 1e-10 }, "display": { "variable": "t" } }"#,
        )
        .unwrap();

        assert_eq!(config.solver.pivot_tolerance, 1e-10);
        assert_eq!(config.solver.rank_tolerance, crate::numerics::DEFAULT_RANK_TOLERANCE);
        assert_eq!(config.display.variable, "t");
        assert_eq!(config.display.decimals, 4);
    }

    #[test]
    fn test_invalid_values_are_rejected_with_paths() {
        let err = EngineConfig::from_json_str(
            r#"{ "display": { "decimals": 40 }, "solver": { "pivot_tolerance": 0.0 } }"#,
        )
        .unwrap_err();

        match err {
            ConfigError::MultipleValidationErrors(errors) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert!(fields.contains(&"display.decimals"));
                assert!(fields.contains(&"solver.pivot_tolerance"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = EngineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "json", .. }));

        let err = EngineConfig::from_toml_str("display = 3").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { format: "toml", .. }));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("engine.toml");
        let mut file = std::fs::File::create(&toml_path).unwrap();
        writeln!(file, "[spline]\nstart_second_derivative = 2.0\nend_second_derivative = -1.0").unwrap();
        let config = EngineConfig::load(&toml_path).unwrap();
        assert_eq!(config.spline, SplineConfig::clamped(2.0, -1.0));

        let json_path = dir.path().join("engine.JSON");
        let written = EngineConfig::strict().to_json_string().unwrap();
        std::fs::write(&json_path, written).unwrap();
        assert_eq!(EngineConfig::load(&json_path).unwrap(), EngineConfig::strict());
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("engine.yaml");
        std::fs::write(&yaml, "display: {}").unwrap();
        assert!(matches!(
            EngineConfig::load(&yaml),
            Err(ConfigError::UnsupportedFormat { extension: Some(ref e) }) if e == "yaml"
        ));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(EngineConfig::load(&missing), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_strict_is_valid() {
        assert!(EngineConfig::strict().is_valid());
        assert!(EngineConfig::new().is_valid());
    }
}

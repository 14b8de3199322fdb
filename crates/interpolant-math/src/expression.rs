//! Closed-form functions handed to the presentation layer.
//!
//! Every interpolant the engine produces implements [`Expression`]: it can be
//! evaluated, differentiated at a point and rendered as text in terms of an
//! explicit [`Variable`].

use std::fmt;

use interpolant_config::DisplayConfig;

use crate::error::{InterpolationError, InterpolationResult};

/// Name of the free variable used when rendering an expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    name: String,
}

impl Variable {
    /// Creates a variable.
    ///
    /// # Errors
    ///
    /// [`InterpolationError::InvalidInput`] if the name is empty, does not start
    /// with a letter, or contains whitespace.
    pub fn new(name: impl Into<String>) -> InterpolationResult<Self> {
        let name = name.into();
        let starts_with_letter = name.chars().next().is_some_and(char::is_alphabetic);
        if !starts_with_letter || name.chars().any(char::is_whitespace) {
            return Err(InterpolationError::invalid_input(format!(
                "'{}' is not a valid variable name",
                name
            )));
        }
        Ok(Self { name })
    }

    /// The conventional `x`.
    pub fn x() -> Self {
        Self {
            name: "x".to_string(),
        }
    }

    /// The variable configured for display.
    pub fn from_config(config: &DisplayConfig) -> InterpolationResult<Self> {
        Self::new(config.variable.clone())
    }

    /// The name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for Variable {
    fn default() -> Self {
        Self::x()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A real function of one variable with a closed-form rendering.
pub trait Expression: Send + Sync + fmt::Debug {
    /// Value at `x`.
    fn evaluate(&self, x: f64) -> InterpolationResult<f64>;

    /// First derivative at `x`.
    fn derivative(&self, x: f64) -> InterpolationResult<f64>;

    /// Closed interval on which the expression is defined, `None` for the
    /// whole real line.
    fn domain(&self) -> Option<(f64, f64)> {
        None
    }

    /// Text form in terms of `variable`.
    fn render(&self, variable: &Variable) -> String;

    /// Returns true if `x` lies in the domain.
    fn in_domain(&self, x: f64) -> bool {
        match self.domain() {
            Some((min, max)) => x >= min && x <= max,
            None => true,
        }
    }
}

/// Evaluates an expression at a finite point.
///
/// # Errors
///
/// - [`InterpolationError::InvalidInput`] for a NaN or infinite `x`.
/// - Whatever the expression reports, such as
///   [`InterpolationError::OutOfDomain`] for a spline queried outside its knots.
pub fn evaluate(expression: &dyn Expression, x: f64) -> InterpolationResult<f64> {
    if !x.is_finite() {
        return Err(InterpolationError::invalid_input(format!(
            "cannot evaluate at {}",
            x
        )));
    }
    expression.evaluate(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polynomial::Polynomial;

    #[test]
    fn test_variable_validation() {
        assert_eq!(Variable::new("t").unwrap().name(), "t");
        assert_eq!(Variable::new("theta1").unwrap().to_string(), "theta1");
        assert!(Variable::new("").is_err());
        assert!(Variable::new("1x").is_err());
        assert!(Variable::new("x y").is_err());
        assert_eq!(Variable::default(), Variable::x());
    }

    #[test]
    fn test_variable_from_config() {
        let config = DisplayConfig::default().with_variable("s");
        assert_eq!(Variable::from_config(&config).unwrap().name(), "s");
    }

    #[test]
    fn test_free_evaluate() {
        let p = Polynomial::new(vec![1.0, 1.0]);
        assert_eq!(evaluate(&p, 2.0).unwrap(), 3.0);
        assert!(matches!(
            evaluate(&p, f64::NAN),
            Err(InterpolationError::InvalidInput { .. })
        ));
        assert!(p.in_domain(1e300));
    }
}

//! Presentation settings handed to the rendering layer.

use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

/// Largest number of decimals an `f64` can meaningfully be rounded to.
pub const MAX_DECIMALS: u32 = 15;

/// Settings for tables and rendered expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Decimal places kept when values are shown. The engine itself never rounds.
    pub decimals: u32,

    /// Name of the free variable used when expressions are rendered.
    pub variable: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            decimals: 4,
            variable: "x".to_string(),
        }
    }
}

impl DisplayConfig {
    /// Sets the number of decimals.
    #[must_use]
    pub fn with_decimals(mut self, decimals: u32) -> Self {
        self.decimals = decimals;
        self
    }

    /// Sets the free-variable name.
    #[must_use]
    pub fn with_variable(mut self, variable: impl Into<String>) -> Self {
        self.variable = variable.into();
        self
    }
}

impl Validate for DisplayConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.decimals > MAX_DECIMALS {
            errors.push(ValidationError::with_rule(
                "decimals",
                format!("Decimals must be at most {}", MAX_DECIMALS),
                "max_decimals",
            ));
        }

        match self.variable.chars().next() {
            None => errors.push(ValidationError::new(
                "variable",
                "Variable name cannot be empty",
            )),
            Some(first) if !first.is_alphabetic() => {
                errors.push(ValidationError::with_rule(
                    "variable",
                    "Variable name must start with a letter",
                    "identifier",
                ));
            }
            Some(_) => {}
        }

        if self.variable.chars().any(char::is_whitespace) {
            errors.push(ValidationError::with_rule(
                "variable",
                "Variable name cannot contain whitespace",
                "identifier",
            ));
        }

        errors
    }
}

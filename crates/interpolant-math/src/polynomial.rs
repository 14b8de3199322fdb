//! Dense polynomials in ascending powers.

use std::fmt;
use std::ops::{Add, Mul};

use crate::error::InterpolationResult;
use crate::expression::{Expression, Variable};

/// A polynomial `c_0 + c_1 x + … + c_d x^d`.
///
/// Trailing zero coefficients are dropped on construction; the zero
/// polynomial is stored as `[0.0]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Polynomial {
    coefficients: Vec<f64>,
}

impl Polynomial {
    /// Creates a polynomial from coefficients in ascending powers.
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }.trim()
    }

    /// The zero polynomial.
    pub fn zero() -> Self {
        Self {
            coefficients: vec![0.0],
        }
    }

    /// A constant polynomial.
    pub fn constant(value: f64) -> Self {
        Self {
            coefficients: vec![value],
        }
    }

    /// The constant 1.
    pub fn one() -> Self {
        Self::constant(1.0)
    }

    /// Degree; the zero polynomial has degree 0.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Coefficients in ascending powers.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Returns true for the zero polynomial.
    pub fn is_zero(&self) -> bool {
        self.coefficients.iter().all(|&c| c == 0.0)
    }

    /// Evaluates with Horner's scheme.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }

    /// First derivative.
    #[must_use]
    pub fn derivative(&self) -> Self {
        if self.coefficients.len() <= 1 {
            return Self::zero();
        }
        Self::new(
            self.coefficients
                .iter()
                .enumerate()
                .skip(1)
                .map(|(i, &c)| c * i as f64)
                .collect(),
        )
    }

    /// Derivative of order `order`.
    #[must_use]
    pub fn nth_derivative(&self, order: usize) -> Self {
        (0..order).fold(self.clone(), |p, _| p.derivative())
    }

    /// Multiplies by `(x - root)`.
    #[must_use]
    pub fn mul_linear(&self, root: f64) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let mut out = vec![0.0; self.coefficients.len() + 1];
        for (i, &c) in self.coefficients.iter().enumerate() {
            out[i + 1] += c;
            out[i] -= root * c;
        }
        Self::new(out)
    }

    /// Multiplies every coefficient by `factor`.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.coefficients.iter().map(|&c| c * factor).collect())
    }

    /// Sum of two polynomials.
    #[must_use]
    pub fn sum(&self, other: &Self) -> Self {
        let len = self.coefficients.len().max(other.coefficients.len());
        Self::new(
            (0..len)
                .map(|i| {
                    self.coefficients.get(i).copied().unwrap_or(0.0)
                        + other.coefficients.get(i).copied().unwrap_or(0.0)
                })
                .collect(),
        )
    }

    /// Returns `q(x) = p(x - shift)` in expanded form.
    #[must_use]
    pub fn translate(&self, shift: f64) -> Self {
        self.coefficients
            .iter()
            .rev()
            .fold(Self::zero(), |acc, &c| acc.mul_linear(shift).sum(&Self::constant(c)))
    }

    /// Drops trailing zero coefficients, keeping at least one.
    #[must_use]
    pub fn trim(mut self) -> Self {
        while self.coefficients.len() > 1 && self.coefficients.last() == Some(&0.0) {
            self.coefficients.pop();
        }
        if self.coefficients.is_empty() {
            self.coefficients.push(0.0);
        }
        self
    }

    /// Renders with `variable` standing for the indeterminate.
    ///
    /// `variable` is inserted verbatim, so a compound such as `"(x + 6)"`
    /// renders a polynomial in a shifted coordinate.
    pub fn render_in(&self, variable: &str) -> String {
        let mut out = String::new();

        for (power, &c) in self.coefficients.iter().enumerate() {
            if c == 0.0 {
                continue;
            }
            let magnitude = c.abs();
            if out.is_empty() {
                if c < 0.0 {
                    out.push('-');
                }
            } else {
                out.push_str(if c < 0.0 { " - " } else { " + " });
            }

            match power {
                0 => out.push_str(&magnitude.to_string()),
                _ => {
                    if magnitude != 1.0 {
                        out.push_str(&magnitude.to_string());
                        out.push('*');
                    }
                    out.push_str(variable);
                    if power > 1 {
                        out.push('^');
                        out.push_str(&power.to_string());
                    }
                }
            }
        }

        if out.is_empty() {
            out.push('0');
        }
        out
    }
}

impl Default for Polynomial {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_in("x"))
    }
}

impl Add for Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Self) -> Self::Output {
        self.sum(&rhs)
    }
}

impl Add<&Polynomial> for &Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: &Polynomial) -> Self::Output {
        self.sum(rhs)
    }
}

impl Mul<f64> for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl Mul<f64> for &Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl Expression for Polynomial {
    fn evaluate(&self, x: f64) -> InterpolationResult<f64> {
        Ok(Polynomial::evaluate(self, x))
    }

    fn derivative(&self, x: f64) -> InterpolationResult<f64> {
        Ok(Polynomial::derivative(self).evaluate(x))
    }

    fn render(&self, variable: &Variable) -> String {
        self.render_in(variable.name())
    }
}

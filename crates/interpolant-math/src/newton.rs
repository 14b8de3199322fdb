//! Newton-form interpolating polynomials.
//!
//! The interpolant through `(x_0, y_0), …, (x_{n-1}, y_{n-1})` is
//!
//! ```text
//! P(x) = c_0 + c_1 (x - x_0) + c_2 (x - x_0)(x - x_1) + …
//!      + c_{n-1} (x - x_0)…(x - x_{n-2})
//! ```
//!
//! with `c_k = f[x_0, …, x_k]`, the leading entry of order `k` in the
//! divided-difference table.

use crate::divided_differences::DividedDifferenceTable;
use crate::error::{InterpolationError, InterpolationResult};
use crate::expression::{Expression, Variable};
use crate::polynomial::Polynomial;

/// Builds the Newton interpolating polynomial from a full-order table.
///
/// # Errors
///
/// [`InterpolationError::InvalidOrder`] if the table stops short of order
/// `n - 1`.
///
/// # Example
///
/// ```rust
/// use interpolant_math::divided_differences::DividedDifferenceTable;
/// use interpolant_math::newton::newton_polynomial;
///
/// let table = DividedDifferenceTable::build(&[0.0, 1.0, 2.0], &[1.0, 3.0, 7.0], None).unwrap();
/// let p = newton_polynomial(&table).unwrap();
/// assert_eq!(p.expanded().coefficients(), &[1.0, 1.0, 1.0]);
/// ```
pub fn newton_polynomial(table: &DividedDifferenceTable) -> InterpolationResult<NewtonPolynomial> {
    let n = table.len();
    if !table.is_full() {
        return Err(InterpolationError::InvalidOrder {
            order: n - 1,
            max: table.max_order(),
            points: n,
        });
    }

    let nodes = table.x().to_vec();
    let coefficients = table.leading_coefficients();
    let diagonal = (0..n)
        .filter_map(|k| table.order(k).and_then(|row| row.last().copied()))
        .collect();

    let expanded = expand(&nodes, &coefficients);
    log::debug!("Newton polynomial of degree {} from {} points", expanded.degree(), n);

    Ok(NewtonPolynomial {
        nodes,
        coefficients,
        diagonal,
        expanded,
    })
}

/// Accumulates `Σ c_k (x - x_0)…(x - x_{k-1})` with a running product.
fn expand(nodes: &[f64], coefficients: &[f64]) -> Polynomial {
    let mut product = Polynomial::one();
    let mut sum = Polynomial::zero();
    for (k, &c) in coefficients.iter().enumerate() {
        sum = &sum + &(&product * c);
        if k + 1 < coefficients.len() {
            product = product.mul_linear(nodes[k]);
        }
    }
    sum
}

/// An interpolating polynomial kept in Newton form alongside its expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonPolynomial {
    /// All sample abscissae, in input order.
    nodes: Vec<f64>,
    /// `c_k = f[x_0, …, x_k]`.
    coefficients: Vec<f64>,
    /// Trailing entry of each order, `f[x_{n-1-k}, …, x_{n-1}]`, for extension.
    diagonal: Vec<f64>,
    expanded: Polynomial,
}

impl NewtonPolynomial {
    /// Builds the interpolant directly from samples.
    pub fn from_samples(x: &[f64], y: &[f64]) -> InterpolationResult<Self> {
        let table = DividedDifferenceTable::build(x, y, None)?;
        newton_polynomial(&table)
    }

    /// Sample abscissae `x_0, …, x_{n-1}`.
    ///
    /// Only `x_0, …, x_{n-2}` appear in the basis products.
    pub fn nodes(&self) -> &[f64] {
        &self.nodes
    }

    /// Newton coefficients `c_0, …, c_{n-1}`.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// The same polynomial in standard form.
    pub fn expanded(&self) -> &Polynomial {
        &self.expanded
    }

    /// Degree of the expanded polynomial (at most `n - 1`).
    pub fn degree(&self) -> usize {
        self.expanded.degree()
    }

    /// Evaluates the Newton form by nested multiplication.
    pub fn value(&self, x: f64) -> f64 {
        let n = self.coefficients.len();
        (0..n - 1)
            .rev()
            .fold(self.coefficients[n - 1], |acc, k| {
                acc * (x - self.nodes[k]) + self.coefficients[k]
            })
    }

    /// First derivative, differentiating the nested form alongside its value.
    pub fn slope(&self, x: f64) -> f64 {
        let n = self.coefficients.len();
        let mut value = self.coefficients[n - 1];
        let mut slope = 0.0;
        for k in (0..n - 1).rev() {
            slope = slope * (x - self.nodes[k]) + value;
            value = value * (x - self.nodes[k]) + self.coefficients[k];
        }
        slope
    }

    /// Derivative polynomial in standard form.
    pub fn derivative(&self) -> Polynomial {
        self.expanded.derivative()
    }

    /// Returns the interpolant through the existing points and `(x, y)`.
    ///
    /// Only the new trailing diagonal of the table is computed; the existing
    /// coefficients are reused.
    ///
    /// # Errors
    ///
    /// - [`InterpolationError::NonFiniteInput`] for a NaN or infinite value.
    /// - [`InterpolationError::DegenerateInput`] if `x` repeats a node.
    pub fn add_point(&self, x: f64, y: f64) -> InterpolationResult<Self> {
        let n = self.nodes.len();
        if !x.is_finite() {
            return Err(InterpolationError::NonFiniteInput {
                axis: "x",
                index: n,
                value: x,
            });
        }
        if !y.is_finite() {
            return Err(InterpolationError::NonFiniteInput {
                axis: "y",
                index: n,
                value: y,
            });
        }
        if let Some(i) = self.nodes.iter().position(|&node| node == x) {
            return Err(InterpolationError::degenerate(format!(
                "duplicate x value {} at indices {} and {}",
                x, i, n
            )));
        }

        let mut diagonal = Vec::with_capacity(n + 1);
        diagonal.push(y);
        for k in 1..=n {
            let next = (diagonal[k - 1] - self.diagonal[k - 1]) / (x - self.nodes[n - k]);
            if !next.is_finite() {
                return Err(InterpolationError::degenerate(format!(
                    "order {} difference ending at x = {} is not finite ({})",
                    k, x, next
                )));
            }
            diagonal.push(next);
        }

        let c_new = diagonal[n];
        let basis = self
            .nodes
            .iter()
            .fold(Polynomial::one(), |p, &node| p.mul_linear(node));

        let mut nodes = self.nodes.clone();
        nodes.push(x);
        let mut coefficients = self.coefficients.clone();
        coefficients.push(c_new);

        Ok(Self {
            nodes,
            coefficients,
            diagonal,
            expanded: &self.expanded + &(basis * c_new),
        })
    }

    /// Renders the unexpanded Newton form, e.g. `1 + 2*(x - 0) + …`.
    pub fn render_newton_form(&self, variable: &Variable) -> String {
        let mut out = String::new();
        for (k, &c) in self.coefficients.iter().enumerate() {
            if k > 0 {
                out.push_str(if c < 0.0 { " - " } else { " + " });
            } else if c < 0.0 {
                out.push('-');
            }
            out.push_str(&c.abs().to_string());
            for node in &self.nodes[..k] {
                out.push_str(&format!("*({} - {})", variable, node));
            }
        }
        out
    }
}

impl Expression for NewtonPolynomial {
    fn evaluate(&self, x: f64) -> InterpolationResult<f64> {
        Ok(self.value(x))
    }

    fn derivative(&self, x: f64) -> InterpolationResult<f64> {
        Ok(self.slope(x))
    }

    fn render(&self, variable: &Variable) -> String {
        self.expanded.render_in(variable.name())
    }
}

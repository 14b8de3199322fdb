//! Divided-difference tables.
//!
//! The table is a triangle stored row by row:
//!
//! ```text
//! row 0 : x_0        x_1          x_2              x_3
//! row 1 : y_0        y_1          y_2              y_3
//! row 2 : f[x0,x1]   f[x1,x2]     f[x2,x3]
//! row 3 : f[x0..x2]  f[x1..x3]
//! row 4 : f[x0..x3]
//! ```
//!
//! Row `r >= 2` holds differences of order `r - 1`:
//!
//! ```text
//! row[r][i] = (row[r-1][i+1] - row[r-1][i]) / (x[i+r-1] - x[i])
//! ```
//!
//! Values are kept at full precision. Rounding for display lives in
//! [`crate::report`].

use crate::error::{InterpolationError, InterpolationResult};
use crate::samples::SampleSet;

/// Immutable triangular divided-difference table.
#[derive(Debug, Clone, PartialEq)]
pub struct DividedDifferenceTable {
    rows: Vec<Vec<f64>>,
}

impl DividedDifferenceTable {
    /// Builds the table for `x`, `y` up to `max_order`.
    ///
    /// `max_order` counts difference orders: `Some(2)` stops after the
    /// second-order differences `f[x_i, x_{i+1}, x_{i+2}]`. `None` builds the
    /// full table (`n - 1`).
    ///
    /// # Errors
    ///
    /// - [`InterpolationError::DimensionMismatch`] if `x.len() != y.len()`.
    /// - [`InterpolationError::NonFiniteInput`] for NaN or infinite samples.
    /// - [`InterpolationError::DegenerateInput`] for an empty input or when two
    ///   x values coincide inside a difference window.
    /// - [`InterpolationError::InvalidOrder`] if `max_order > n - 1`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use interpolant_math::divided_differences::DividedDifferenceTable;
    ///
    /// let table = DividedDifferenceTable::build(&[0.0, 1.0, 2.0], &[1.0, 3.0, 7.0], None).unwrap();
    /// assert_eq!(table.order(1).unwrap(), &[2.0, 4.0]);
    /// assert_eq!(table.order(2).unwrap(), &[1.0]);
    /// ```
    pub fn build(x: &[f64], y: &[f64], max_order: Option<usize>) -> InterpolationResult<Self> {
        let samples = SampleSet::new(x, y)?;
        Self::from_samples(&samples, max_order)
    }

    /// Builds the table from a validated sample set.
    pub fn from_samples(samples: &SampleSet, max_order: Option<usize>) -> InterpolationResult<Self> {
        let n = samples.len();
        if n == 0 {
            return Err(InterpolationError::insufficient(1, 0));
        }

        let full = n - 1;
        let max_order = max_order.unwrap_or(full);
        if max_order > full {
            return Err(InterpolationError::InvalidOrder {
                order: max_order,
                max: full,
                points: n,
            });
        }

        let x = samples.x();
        let mut rows: Vec<Vec<f64>> = Vec::with_capacity(max_order + 2);
        rows.push(x.to_vec());
        rows.push(samples.y().to_vec());

        for r in 2..=max_order + 1 {
            let prev = &rows[r - 1];
            let row = (0..=n - r)
                .map(|i| {
                    let denom = x[i + r - 1] - x[i];
                    if denom == 0.0 {
                        return Err(InterpolationError::degenerate(format!(
                            "duplicate x value {} at indices {} and {}",
                            x[i],
                            i,
                            i + r - 1
                        )));
                    }
                    let value = (prev[i + 1] - prev[i]) / denom;
                    if !value.is_finite() {
                        return Err(InterpolationError::degenerate(format!(
                            "order {} difference over x[{}..={}] is not finite ({})",
                            r - 1,
                            i,
                            i + r - 1,
                            value
                        )));
                    }
                    Ok(value)
                })
                .collect::<InterpolationResult<Vec<f64>>>()?;
            rows.push(row);
        }

        log::debug!(
            "built divided-difference table: {} points, max order {}",
            n,
            max_order
        );

        Ok(Self { rows })
    }

    /// Number of sample points.
    pub fn len(&self) -> usize {
        self.rows[0].len()
    }

    /// Always false: a table holds at least one point.
    pub fn is_empty(&self) -> bool {
        self.rows[0].is_empty()
    }

    /// Highest difference order stored.
    pub fn max_order(&self) -> usize {
        self.rows.len() - 2
    }

    /// True when every order up to `n - 1` is present.
    pub fn is_full(&self) -> bool {
        self.max_order() + 1 == self.len()
    }

    /// The x row.
    pub fn x(&self) -> &[f64] {
        &self.rows[0]
    }

    /// The y row (order-0 differences).
    pub fn y(&self) -> &[f64] {
        &self.rows[1]
    }

    /// Raw row `r`: row 0 is x, row `r >= 1` holds order `r - 1`.
    /// Row `r >= 1` has `n - r + 1` entries.
    pub fn row(&self, r: usize) -> Option<&[f64]> {
        self.rows.get(r).map(Vec::as_slice)
    }

    /// Differences of order `k` (`n - k` entries); `order(0)` is y.
    pub fn order(&self, k: usize) -> Option<&[f64]> {
        self.row(k + 1)
    }

    /// All rows, x first.
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Leading entry of every order: `f[x_0]`, `f[x_0,x_1]`, …, the Newton coefficients.
    pub fn leading_coefficients(&self) -> Vec<f64> {
        self.rows[1..].iter().map(|row| row[0]).collect()
    }
}

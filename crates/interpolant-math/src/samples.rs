//! Sample point sets.

use crate::error::{InterpolationError, InterpolationResult};

/// A single `(x, y)` observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePoint {
    /// Abscissa.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
}

/// An ordered set of sample points with equal-length, finite coordinates.
///
/// Ordering and distinctness are not enforced at construction; each operation
/// checks what it needs with [`require_distinct`](Self::require_distinct) or
/// [`require_increasing`](Self::require_increasing).
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl SampleSet {
    /// Creates a sample set from parallel coordinate slices.
    ///
    /// # Errors
    ///
    /// - [`InterpolationError::DimensionMismatch`] if the lengths differ.
    /// - [`InterpolationError::NonFiniteInput`] for NaN or infinite values.
    pub fn new(xs: &[f64], ys: &[f64]) -> InterpolationResult<Self> {
        if xs.len() != ys.len() {
            return Err(InterpolationError::DimensionMismatch {
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }
        check_finite("x", xs)?;
        check_finite("y", ys)?;

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    /// Creates a sample set from points.
    pub fn from_points(points: &[SamplePoint]) -> InterpolationResult<Self> {
        let xs: Vec<f64> = points.iter().map(|p| p.x).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        Self::new(&xs, &ys)
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    /// Returns true when the set has no points.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// The x coordinates.
    pub fn x(&self) -> &[f64] {
        &self.xs
    }

    /// The y coordinates.
    pub fn y(&self) -> &[f64] {
        &self.ys
    }

    /// Iterates over the points in order.
    pub fn iter(&self) -> impl Iterator<Item = SamplePoint> + '_ {
        self.xs
            .iter()
            .zip(self.ys.iter())
            .map(|(&x, &y)| SamplePoint { x, y })
    }

    /// Fails with [`InterpolationError::DegenerateInput`] below `min` points.
    pub fn require_len(&self, min: usize) -> InterpolationResult<()> {
        if self.len() < min {
            return Err(InterpolationError::insufficient(min, self.len()));
        }
        Ok(())
    }

    /// Fails with [`InterpolationError::DegenerateInput`] if two x values coincide.
    pub fn require_distinct(&self) -> InterpolationResult<()> {
        let mut sorted: Vec<(f64, usize)> =
            self.xs.iter().copied().enumerate().map(|(i, x)| (x, i)).collect();
        sorted.sort_by(|a, b| a.0.total_cmp(&b.0));

        for pair in sorted.windows(2) {
            if pair[0].0 == pair[1].0 {
                return Err(InterpolationError::degenerate(format!(
                    "duplicate x value {} at indices {} and {}",
                    pair[0].0,
                    pair[0].1.min(pair[1].1),
                    pair[0].1.max(pair[1].1)
                )));
            }
        }
        Ok(())
    }

    /// Fails with [`InterpolationError::NonMonotonicInput`] unless x is strictly increasing.
    pub fn require_increasing(&self) -> InterpolationResult<()> {
        for i in 1..self.xs.len() {
            if self.xs[i] <= self.xs[i - 1] {
                return Err(InterpolationError::NonMonotonicInput {
                    index: i,
                    previous: self.xs[i - 1],
                    current: self.xs[i],
                });
            }
        }
        Ok(())
    }

    /// Returns a copy with points reordered: point `i` of the result is
    /// point `order[i]` of `self`.
    ///
    /// # Errors
    ///
    /// [`InterpolationError::InvalidInput`] unless `order` is a permutation of `0..len`.
    pub fn permuted(&self, order: &[usize]) -> InterpolationResult<Self> {
        let n = self.len();
        let mut seen = vec![false; n];
        if order.len() != n {
            return Err(InterpolationError::invalid_input(format!(
                "permutation has {} entries for {} points",
                order.len(),
                n
            )));
        }
        for &i in order {
            if i >= n || seen[i] {
                return Err(InterpolationError::invalid_input(format!(
                    "index {} repeated or out of range in permutation",
                    i
                )));
            }
            seen[i] = true;
        }

        Ok(Self {
            xs: order.iter().map(|&i| self.xs[i]).collect(),
            ys: order.iter().map(|&i| self.ys[i]).collect(),
        })
    }
}

fn check_finite(axis: &'static str, values: &[f64]) -> InterpolationResult<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(InterpolationError::NonFiniteInput {
            axis,
            index,
            value: values[index],
        }),
        None => Ok(()),
    }
}

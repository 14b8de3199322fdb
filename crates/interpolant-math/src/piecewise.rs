//! Piecewise polynomial functions.
//!
//! Segments use the half-open `[start, end)` convention: a knot shared by two
//! segments belongs to the one that starts there. The final segment also
//! contains its right endpoint, so the whole closed interval is covered.

use crate::error::{InterpolationError, InterpolationResult};
use crate::expression::{Expression, Variable};
use crate::polynomial::Polynomial;

/// One piece: a polynomial in the local coordinate `t = x - start`.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// Left end of the interval.
    pub start: f64,
    /// Right end of the interval.
    pub end: f64,
    /// Polynomial in `t = x - start`.
    pub polynomial: Polynomial,
}

impl Segment {
    /// Creates a segment.
    pub fn new(start: f64, end: f64, polynomial: Polynomial) -> Self {
        Self {
            start,
            end,
            polynomial,
        }
    }

    /// Width of the interval.
    pub fn width(&self) -> f64 {
        self.end - self.start
    }

    /// Returns true if `x` lies in the closed interval `[start, end]`.
    pub fn contains(&self, x: f64) -> bool {
        x >= self.start && x <= self.end
    }

    /// Value at global `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        self.polynomial.evaluate(x - self.start)
    }

    /// Derivative of the given order at global `x`.
    pub fn derivative_at(&self, x: f64, order: usize) -> f64 {
        self.polynomial.nth_derivative(order).evaluate(x - self.start)
    }

    /// The segment's polynomial expanded in the global coordinate.
    pub fn global_polynomial(&self) -> Polynomial {
        self.polynomial.translate(self.start)
    }

    /// Renders the polynomial in the shifted coordinate, e.g. `(x + 6)`.
    pub fn render(&self, variable: &Variable) -> String {
        let shifted = if self.start == 0.0 {
            variable.name().to_string()
        } else if self.start < 0.0 {
            format!("({} + {})", variable, -self.start)
        } else {
            format!("({} - {})", variable, self.start)
        };
        self.polynomial.render_in(&shifted)
    }
}

/// Contiguous segments covering `[segments[0].start, segments[last].end]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PiecewisePolynomial {
    segments: Vec<Segment>,
}

impl PiecewisePolynomial {
    /// Creates a piecewise polynomial.
    ///
    /// # Errors
    ///
    /// - [`InterpolationError::DegenerateInput`] for an empty segment list.
    /// - [`InterpolationError::InvalidInput`] if a segment is empty or
    ///   reversed, has non-finite ends, or does not start where the previous
    ///   one ends.
    pub fn new(segments: Vec<Segment>) -> InterpolationResult<Self> {
        if segments.is_empty() {
            return Err(InterpolationError::degenerate(
                "piecewise polynomial needs at least one segment",
            ));
        }

        for (i, segment) in segments.iter().enumerate() {
            if !(segment.start.is_finite() && segment.end.is_finite())
                || segment.start >= segment.end
            {
                return Err(InterpolationError::invalid_input(format!(
                    "segment {} has invalid interval [{}, {})",
                    i, segment.start, segment.end
                )));
            }
        }

        for (i, pair) in segments.windows(2).enumerate() {
            if pair[0].end != pair[1].start {
                return Err(InterpolationError::invalid_input(format!(
                    "segment {} ends at {} but segment {} starts at {}",
                    i,
                    pair[0].end,
                    i + 1,
                    pair[1].start
                )));
            }
        }

        Ok(Self { segments })
    }

    /// The segments in order.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false: construction requires a segment.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Left end of the domain.
    pub fn min_x(&self) -> f64 {
        self.segments[0].start
    }

    /// Right end of the domain.
    pub fn max_x(&self) -> f64 {
        self.segments[self.segments.len() - 1].end
    }

    /// Index of the segment owning `x`.
    ///
    /// # Errors
    ///
    /// [`InterpolationError::OutOfDomain`] outside `[min_x, max_x]` (NaN included).
    pub fn segment_index(&self, x: f64) -> InterpolationResult<usize> {
        let (min, max) = (self.min_x(), self.max_x());
        if !(x >= min && x <= max) {
            return Err(InterpolationError::OutOfDomain { x, min, max });
        }

        let owned = self.segments.partition_point(|s| s.start <= x);
        Ok(owned.saturating_sub(1).min(self.segments.len() - 1))
    }

    /// Value at `x`.
    pub fn evaluate(&self, x: f64) -> InterpolationResult<f64> {
        let i = self.segment_index(x)?;
        Ok(self.segments[i].evaluate(x))
    }

    /// First derivative at `x`, taken from the owning segment.
    pub fn derivative(&self, x: f64) -> InterpolationResult<f64> {
        self.nth_derivative(x, 1)
    }

    /// Derivative of the given order at `x`, taken from the owning segment.
    pub fn nth_derivative(&self, x: f64, order: usize) -> InterpolationResult<f64> {
        let i = self.segment_index(x)?;
        Ok(self.segments[i].derivative_at(x, order))
    }

    /// Renders one line per segment with its interval condition.
    pub fn render(&self, variable: &Variable) -> String {
        let last = self.segments.len() - 1;
        self.segments
            .iter()
            .enumerate()
            .map(|(i, s)| {
                let upper = if i == last { "<=" } else { "<" };
                format!(
                    "{}    for {} <= {} {} {}",
                    s.render(variable),
                    s.start,
                    variable,
                    upper,
                    s.end
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Expression for PiecewisePolynomial {
    fn evaluate(&self, x: f64) -> InterpolationResult<f64> {
        PiecewisePolynomial::evaluate(self, x)
    }

    fn derivative(&self, x: f64) -> InterpolationResult<f64> {
        PiecewisePolynomial::derivative(self, x)
    }

    fn domain(&self) -> Option<(f64, f64)> {
        Some((self.min_x(), self.max_x()))
    }

    fn render(&self, variable: &Variable) -> String {
        PiecewisePolynomial::render(self, variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn two_pieces() -> PiecewisePolynomial {
        // t on [0, 1), 1 + 2t on [1, 3]
        PiecewisePolynomial::new(vec![
            Segment::new(0.0, 1.0, Polynomial::new(vec![0.0, 1.0])),
            Segment::new(1.0, 3.0, Polynomial::new(vec![1.0, 2.0])),
        ])
        .unwrap()
    }

    #[test]
    fn test_segment_lookup_half_open() {
        let p = two_pieces();
        assert_eq!(p.segment_index(0.0).unwrap(), 0);
        assert_eq!(p.segment_index(0.999).unwrap(), 0);
        assert_eq!(p.segment_index(1.0).unwrap(), 1);
        assert_eq!(p.segment_index(3.0).unwrap(), 1);
    }

    #[test]
    fn test_out_of_domain() {
        let p = two_pieces();
        for x in [-0.1, 3.1, f64::NAN] {
            assert!(matches!(
                p.evaluate(x),
                Err(InterpolationError::OutOfDomain { .. })
            ));
        }
        assert_eq!(Expression::domain(&p), Some((0.0, 3.0)));
    }

    #[test]
    fn test_evaluate_uses_local_coordinate() {
        let p = two_pieces();
        assert_eq!(p.evaluate(0.5).unwrap(), 0.5);
        assert_eq!(p.evaluate(2.0).unwrap(), 3.0);
        assert_eq!(p.derivative(2.0).unwrap(), 2.0);
        assert_eq!(p.nth_derivative(2.0, 2).unwrap(), 0.0);
    }

    #[test]
    fn test_global_polynomial() {
        let s = Segment::new(2.0, 4.0, Polynomial::new(vec![1.0, 0.0, 1.0]));
        let g = s.global_polynomial();
        for x in [2.0, 3.0, 3.7] {
            assert_relative_eq!(g.evaluate(x), s.evaluate(x), epsilon = 1e-12);
        }
        assert!(s.contains(4.0));
        assert!(!s.contains(4.5));
        assert_eq!(s.width(), 2.0);
    }

    #[test]
    fn test_validation() {
        assert!(PiecewisePolynomial::new(vec![]).is_err());
        let gap = vec![
            Segment::new(0.0, 1.0, Polynomial::one()),
            Segment::new(1.5, 2.0, Polynomial::one()),
        ];
        assert!(matches!(
            PiecewisePolynomial::new(gap),
            Err(InterpolationError::InvalidInput { .. })
        ));
        let reversed = vec![Segment::new(1.0, 0.0, Polynomial::one())];
        assert!(PiecewisePolynomial::new(reversed).is_err());
    }

    #[test]
    fn test_render() {
        let p = PiecewisePolynomial::new(vec![
            Segment::new(-6.0, 0.0, Polynomial::new(vec![1.0, 1.0])),
            Segment::new(0.0, 2.0, Polynomial::new(vec![7.0, -1.0])),
        ])
        .unwrap();
        let text = Expression::render(&p, &Variable::x());
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "1 + (x + 6)    for -6 <= x < 0");
        assert_eq!(lines[1], "7 - x    for 0 <= x <= 2");
    }
}

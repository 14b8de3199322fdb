//! Cubic splines with prescribed end second derivatives.
//!
//! With `h_i = x_{i+1} - x_i` and `ω_i` the second derivative at knot `i`,
//! continuity of the first derivative at the interior knots gives, for
//! `i = 0, …, n-3`,
//!
//! ```text
//! h_i/6 ω_i + (h_i + h_{i+1})/3 ω_{i+1} + h_{i+1}/6 ω_{i+2}
//!     = f[x_{i+1}, x_{i+2}] - f[x_i, x_{i+1}]
//!     = (h_i + h_{i+1}) f[x_i, x_{i+1}, x_{i+2}]
//! ```
//!
//! `ω_0` and `ω_{n-1}` are fixed (zero for the natural spline), so their
//! terms move to the right-hand side and the interior unknowns satisfy a
//! symmetric tridiagonal system. Segment `i` is then
//!
//! ```text
//! S_i(x) = ω_i/(6h_i) (x_{i+1} - x)^3 + ω_{i+1}/(6h_i) (x - x_i)^3
//!        + (y_i/h_i - h_i ω_i/6) (x_{i+1} - x)
//!        + (y_{i+1}/h_i - h_i ω_{i+1}/6) (x - x_i)
//! ```

use interpolant_config::{EngineConfig, Validate, DEFAULT_PIVOT_TOLERANCE};

use crate::divided_differences::DividedDifferenceTable;
use crate::error::{InterpolationError, InterpolationResult};
use crate::expression::{Expression, Variable};
use crate::linear_algebra::SymmetricTridiagonal;
use crate::piecewise::{PiecewisePolynomial, Segment};
use crate::polynomial::Polynomial;
use crate::samples::SampleSet;

/// Minimum number of knots for a cubic spline.
pub const MIN_SPLINE_POINTS: usize = 3;

/// Collects the inputs of a spline system.
///
/// # Example
///
/// ```rust
/// use interpolant_math::spline::SplineSystemBuilder;
///
/// let system = SplineSystemBuilder::new(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 0.0, 1.0])
///     .boundary(0.0, 0.0)
///     .build()
///     .unwrap();
/// assert_eq!(system.dimension(), 2);
///
/// let spline = system.solve().unwrap();
/// assert!((spline.evaluate(1.0).unwrap() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SplineSystemBuilder {
    x: Vec<f64>,
    y: Vec<f64>,
    start_second_derivative: f64,
    end_second_derivative: f64,
    pivot_tolerance: f64,
}

impl SplineSystemBuilder {
    /// Starts a natural spline through the given points.
    pub fn new(x: &[f64], y: &[f64]) -> Self {
        Self {
            x: x.to_vec(),
            y: y.to_vec(),
            start_second_derivative: 0.0,
            end_second_derivative: 0.0,
            pivot_tolerance: DEFAULT_PIVOT_TOLERANCE,
        }
    }

    /// Prescribes the second derivatives `ω_0` and `ω_{n-1}`.
    #[must_use]
    pub fn boundary(mut self, start: f64, end: f64) -> Self {
        self.start_second_derivative = start;
        self.end_second_derivative = end;
        self
    }

    /// Relative pivot tolerance of the tridiagonal solve.
    #[must_use]
    pub fn pivot_tolerance(mut self, tolerance: f64) -> Self {
        self.pivot_tolerance = tolerance;
        self
    }

    /// Takes boundary weights and tolerance from a configuration.
    #[must_use]
    pub fn config(self, config: &EngineConfig) -> Self {
        self.boundary(
            config.spline.start_second_derivative,
            config.spline.end_second_derivative,
        )
        .pivot_tolerance(config.solver.pivot_tolerance)
    }

    /// Assembles the tridiagonal system.
    ///
    /// # Errors
    ///
    /// - [`InterpolationError::DimensionMismatch`] if x and y differ in length.
    /// - [`InterpolationError::NonFiniteInput`] for NaN or infinite samples.
    /// - [`InterpolationError::DegenerateInput`] for fewer than 3 points.
    /// - [`InterpolationError::NonMonotonicInput`] unless x is strictly increasing.
    /// - [`InterpolationError::InvalidInput`] for non-finite boundary weights
    ///   or a pivot tolerance that is not finite and positive.
    pub fn build(self) -> InterpolationResult<SplineSystem> {
        let samples = SampleSet::new(&self.x, &self.y)?;
        samples.require_len(MIN_SPLINE_POINTS)?;
        samples.require_increasing()?;

        let (w0, wn) = (self.start_second_derivative, self.end_second_derivative);
        if !(w0.is_finite() && wn.is_finite()) {
            return Err(InterpolationError::invalid_input(format!(
                "boundary second derivatives must be finite, got {} and {}",
                w0, wn
            )));
        }

        if !(self.pivot_tolerance.is_finite() && self.pivot_tolerance > 0.0) {
            return Err(InterpolationError::invalid_input(format!(
                "pivot tolerance must be finite and positive, got {}",
                self.pivot_tolerance
            )));
        }

        let n = samples.len();
        let x = samples.x();
        let widths: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();

        let table = DividedDifferenceTable::from_samples(&samples, Some(2))?;
        let second = table
            .order(2)
            .ok_or(InterpolationError::InvalidOrder {
                order: 2,
                max: table.max_order(),
                points: n,
            })?;

        let m = n - 2;
        let diagonal: Vec<f64> = (0..m).map(|i| (widths[i] + widths[i + 1]) / 3.0).collect();
        let off_diagonal: Vec<f64> = (0..m - 1).map(|i| widths[i + 1] / 6.0).collect();

        let mut rhs: Vec<f64> = (0..m)
            .map(|i| (widths[i] + widths[i + 1]) * second[i])
            .collect();
        rhs[0] -= widths[0] * w0 / 6.0;
        rhs[m - 1] -= widths[n - 2] * wn / 6.0;

        let matrix = SymmetricTridiagonal::new(diagonal, off_diagonal)?;

        log::debug!("spline system: {} knots, {} unknowns", n, m);
        log::trace!("spline rhs: {:?}", rhs);

        Ok(SplineSystem {
            samples,
            widths,
            matrix,
            rhs,
            start_second_derivative: w0,
            end_second_derivative: wn,
            pivot_tolerance: self.pivot_tolerance,
        })
    }
}

/// The assembled second-derivative system of a cubic spline.
#[derive(Debug, Clone, PartialEq)]
pub struct SplineSystem {
    samples: SampleSet,
    widths: Vec<f64>,
    matrix: SymmetricTridiagonal,
    rhs: Vec<f64>,
    start_second_derivative: f64,
    end_second_derivative: f64,
    pivot_tolerance: f64,
}

impl SplineSystem {
    /// Knot abscissae.
    pub fn knots(&self) -> &[f64] {
        self.samples.x()
    }

    /// Knot values.
    pub fn values(&self) -> &[f64] {
        self.samples.y()
    }

    /// Interval widths `h_i`.
    pub fn widths(&self) -> &[f64] {
        &self.widths
    }

    /// The (n-2)×(n-2) coefficient matrix.
    pub fn matrix(&self) -> &SymmetricTridiagonal {
        &self.matrix
    }

    /// Right-hand side, boundary terms included.
    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    /// `(ω_0, ω_{n-1})`.
    pub fn boundary(&self) -> (f64, f64) {
        (self.start_second_derivative, self.end_second_derivative)
    }

    /// Number of interior unknowns.
    pub fn dimension(&self) -> usize {
        self.matrix.dimension()
    }

    /// Solves for the interior second derivatives and assembles the spline.
    ///
    /// # Errors
    ///
    /// [`InterpolationError::SingularSystem`] if the tridiagonal solve breaks down.
    pub fn solve(&self) -> InterpolationResult<CubicSpline> {
        let interior = self.matrix.solve(&self.rhs, self.pivot_tolerance)?;

        let mut omega = Vec::with_capacity(interior.len() + 2);
        omega.push(self.start_second_derivative);
        omega.extend(interior);
        omega.push(self.end_second_derivative);

        let x = self.samples.x();
        let y = self.samples.y();
        let segments = self
            .widths
            .iter()
            .enumerate()
            .map(|(i, &h)| {
                Segment::new(
                    x[i],
                    x[i + 1],
                    segment_polynomial(h, y[i], y[i + 1], omega[i], omega[i + 1]),
                )
            })
            .collect();

        let piecewise = PiecewisePolynomial::new(segments)?;

        Ok(CubicSpline {
            system: self.clone(),
            second_derivatives: omega,
            piecewise,
        })
    }
}

/// Expands `S_i` in the local coordinate `t = x - x_i`.
fn segment_polynomial(h: f64, y_lo: f64, y_hi: f64, w_lo: f64, w_hi: f64) -> Polynomial {
    let a = w_lo / (6.0 * h);
    let b = w_hi / (6.0 * h);
    let c = y_lo / h - h * w_lo / 6.0;
    let d = y_hi / h - h * w_hi / 6.0;

    Polynomial::new(vec![
        a * h * h * h + c * h,
        -3.0 * a * h * h - c + d,
        3.0 * a * h,
        b - a,
    ])
}

/// Solves for a cubic spline with prescribed end second derivatives.
///
/// `w0 = wn = 0` gives the natural spline.
///
/// # Example
///
/// ```rust
/// use interpolant_math::spline::natural_cubic_spline;
///
/// let spline = natural_cubic_spline(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0], 0.0, 0.0).unwrap();
/// let w = spline.second_derivatives();
/// assert_eq!(w.len(), 3);
/// assert!((w[1] + 3.0).abs() < 1e-12);
/// ```
pub fn natural_cubic_spline(x: &[f64], y: &[f64], w0: f64, wn: f64) -> InterpolationResult<CubicSpline> {
    SplineSystemBuilder::new(x, y).boundary(w0, wn).build()?.solve()
}

/// A solved cubic spline.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicSpline {
    system: SplineSystem,
    second_derivatives: Vec<f64>,
    piecewise: PiecewisePolynomial,
}

impl CubicSpline {
    /// Natural cubic spline through the points.
    pub fn new(x: &[f64], y: &[f64]) -> InterpolationResult<Self> {
        natural_cubic_spline(x, y, 0.0, 0.0)
    }

    /// Cubic spline with boundary weights and tolerance from `config`.
    ///
    /// # Errors
    ///
    /// [`InterpolationError::Config`] if the configuration is invalid, plus the
    /// errors of [`SplineSystemBuilder::build`] and [`SplineSystem::solve`].
    pub fn with_config(x: &[f64], y: &[f64], config: &EngineConfig) -> InterpolationResult<Self> {
        config.validate_or_error()?;
        SplineSystemBuilder::new(x, y).config(config).build()?.solve()
    }

    /// Knot abscissae.
    pub fn knots(&self) -> &[f64] {
        self.system.knots()
    }

    /// Knot values.
    pub fn values(&self) -> &[f64] {
        self.system.values()
    }

    /// Interval widths.
    pub fn widths(&self) -> &[f64] {
        self.system.widths()
    }

    /// `ω_0, …, ω_{n-1}`.
    pub fn second_derivatives(&self) -> &[f64] {
        &self.second_derivatives
    }

    /// The system the spline was solved from.
    pub fn system(&self) -> &SplineSystem {
        &self.system
    }

    /// The segments.
    pub fn piecewise(&self) -> &PiecewisePolynomial {
        &self.piecewise
    }

    /// Value at `x`; [`InterpolationError::OutOfDomain`] outside the knots.
    pub fn evaluate(&self, x: f64) -> InterpolationResult<f64> {
        self.piecewise.evaluate(x)
    }

    /// First derivative at `x`.
    pub fn derivative(&self, x: f64) -> InterpolationResult<f64> {
        self.piecewise.derivative(x)
    }

    /// Second derivative at `x`, from the owning segment.
    pub fn second_derivative(&self, x: f64) -> InterpolationResult<f64> {
        self.piecewise.nth_derivative(x, 2)
    }
}

impl Expression for CubicSpline {
    fn evaluate(&self, x: f64) -> InterpolationResult<f64> {
        self.piecewise.evaluate(x)
    }

    fn derivative(&self, x: f64) -> InterpolationResult<f64> {
        self.piecewise.derivative(x)
    }

    fn domain(&self) -> Option<(f64, f64)> {
        Some((self.piecewise.min_x(), self.piecewise.max_x()))
    }

    fn render(&self, variable: &Variable) -> String {
        self.piecewise.render(variable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use interpolant_config::SplineConfig;

    #[test]
    fn test_passes_through_knots() {
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.0, 1.0, 4.0, 9.0];
        let spline = CubicSpline::new(&x, &y).unwrap();

        for (xi, yi) in x.iter().zip(&y) {
            assert_relative_eq!(spline.evaluate(*xi).unwrap(), *yi, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_three_points() {
        // Single equation: (1 + 1)/3 ω_1 = f[1,2] - f[0,1] = -2
        let spline = natural_cubic_spline(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0], 0.0, 0.0).unwrap();
        assert_eq!(spline.system().dimension(), 1);
        assert_relative_eq!(spline.second_derivatives()[1], -3.0, epsilon = 1e-14);
        assert_relative_eq!(spline.evaluate(0.5).unwrap(), 0.6875, epsilon = 1e-14);
    }

    #[test]
    fn test_linear_data_gives_straight_line() {
        let x = [0.0, 0.5, 2.0, 3.0, 7.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v - 1.0).collect();
        let spline = CubicSpline::new(&x, &y).unwrap();

        for w in spline.second_derivatives() {
            assert_relative_eq!(*w, 0.0, epsilon = 1e-12);
        }
        assert_relative_eq!(spline.evaluate(5.0).unwrap(), 9.0, epsilon = 1e-12);
        assert_relative_eq!(spline.derivative(1.0).unwrap(), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_system_entries() {
        let system = SplineSystemBuilder::new(&[0.0, 1.0, 3.0, 4.0], &[0.0, 1.0, 1.0, 0.0])
            .build()
            .unwrap();

        assert_eq!(system.widths(), &[1.0, 2.0, 1.0]);
        assert_eq!(system.matrix().diagonal(), &[1.0, 1.0]);
        assert_eq!(system.matrix().off_diagonal(), &[2.0 / 6.0]);
        // f[0,1,3] = (0 - 1)/3, f[1,3,4] = (-1 - 0)/3
        assert_relative_eq!(system.rhs()[0], -1.0, epsilon = 1e-14);
        assert_relative_eq!(system.rhs()[1], -1.0, epsilon = 1e-14);
    }

    #[test]
    fn test_boundary_weights_are_honoured() {
        let x = [0.0, 1.0, 2.5, 3.0, 4.0];
        let y = [1.0, -1.0, 0.5, 2.0, 0.0];
        let spline = natural_cubic_spline(&x, &y, 1.5, -2.0).unwrap();

        assert_eq!(spline.second_derivatives()[0], 1.5);
        assert_eq!(spline.second_derivatives()[4], -2.0);
        assert_relative_eq!(spline.second_derivative(0.0).unwrap(), 1.5, epsilon = 1e-10);
        assert_relative_eq!(spline.second_derivative(4.0).unwrap(), -2.0, epsilon = 1e-10);

        for i in 1..4 {
            let left = &spline.piecewise().segments()[i - 1];
            let right = &spline.piecewise().segments()[i];
            assert_relative_eq!(left.evaluate(x[i]), right.evaluate(x[i]), epsilon = 1e-10);
            assert_relative_eq!(
                left.derivative_at(x[i], 1),
                right.derivative_at(x[i], 1),
                epsilon = 1e-10
            );
            assert_relative_eq!(
                left.derivative_at(x[i], 2),
                right.derivative_at(x[i], 2),
                epsilon = 1e-10
            );
        }
    }

    #[test]
    fn test_with_config() {
        let config = EngineConfig::new().with_spline(SplineConfig::clamped(0.5, 0.25));
        let spline = CubicSpline::with_config(&[0.0, 1.0, 2.0], &[1.0, 2.0, 0.0], &config).unwrap();
        assert_eq!(spline.system().boundary(), (0.5, 0.25));

        let bad = EngineConfig::new().with_spline(SplineConfig::clamped(f64::NAN, 0.0));
        assert!(matches!(
            CubicSpline::with_config(&[0.0, 1.0, 2.0], &[1.0, 2.0, 0.0], &bad),
            Err(InterpolationError::Config(_))
        ));
    }

    #[test]
    fn test_pivot_tolerance_must_be_positive() {
        let (x, y) = ([0.0, 1.0, 2.0], [1.0, 2.0, 0.0]);
        for tolerance in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                SplineSystemBuilder::new(&x, &y).pivot_tolerance(tolerance).build(),
                Err(InterpolationError::InvalidInput { .. })
            ));
        }

        let bad = EngineConfig::new()
            .with_solver(interpolant_config::SolverConfig::default().with_pivot_tolerance(-1.0));
        assert!(SplineSystemBuilder::new(&x, &y).config(&bad).build().is_err());
        assert!(matches!(
            CubicSpline::with_config(&x, &y, &bad),
            Err(InterpolationError::Config(_))
        ));
    }

    #[test]
    fn test_input_errors() {
        assert!(matches!(
            CubicSpline::new(&[0.0, 1.0], &[0.0, 1.0]),
            Err(InterpolationError::DegenerateInput { .. })
        ));
        assert!(matches!(
            CubicSpline::new(&[0.0, 2.0, 1.0], &[0.0, 1.0, 2.0]),
            Err(InterpolationError::NonMonotonicInput { index: 2, .. })
        ));
        assert!(matches!(
            CubicSpline::new(&[0.0, 1.0, 1.0], &[0.0, 1.0, 2.0]),
            Err(InterpolationError::NonMonotonicInput { .. })
        ));
        assert!(matches!(
            CubicSpline::new(&[0.0, 1.0, 2.0], &[0.0, 1.0]),
            Err(InterpolationError::DimensionMismatch { .. })
        ));
        assert!(matches!(
            natural_cubic_spline(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0], f64::INFINITY, 0.0),
            Err(InterpolationError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_out_of_domain() {
        let spline = CubicSpline::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).unwrap();
        assert!(matches!(
            spline.evaluate(2.5),
            Err(InterpolationError::OutOfDomain { x, min, max }) if x == 2.5 && min == 0.0 && max == 2.0
        ));
        assert!(spline.evaluate(2.0).is_ok());
    }
}

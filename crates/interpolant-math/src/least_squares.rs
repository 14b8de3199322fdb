//! Least-squares fitting through the normal equations.
//!
//! For a design matrix `A` (one row per sample, one column per basis
//! function) and target `b`, the coefficients solve `AᵗA c = Aᵗb`. Models
//! that are linear only after a transform (exponential and power law) fit
//! `ln y` and map the coefficients back.

use std::f64::consts::PI;
use std::fmt;

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

use interpolant_config::{EngineConfig, LeastSquaresConfig, SolverConfig, Validate};

use crate::error::{InterpolationError, InterpolationResult};
use crate::expression::{Expression, Variable};
use crate::linear_algebra::{condition_number, normal_equations, numerical_rank, solve_linear_system};
use crate::polynomial::Polynomial;
use crate::samples::SampleSet;

const TWO_PI: f64 = 2.0 * PI;

/// The family of functions to fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    /// `c_0 + c_1 x + … + c_d x^d`.
    Polynomial {
        /// Degree `d`.
        degree: usize,
    },
    /// `c_0 + c_1 cos(2πx) + c_2 sin(2πx)`.
    Periodic,
    /// `a e^{b x}`, fitted as `ln y = ln a + b x`.
    Exponential,
    /// `a x^b`, fitted as `ln y = ln a + b ln x`.
    Power,
}

impl Model {
    /// Straight-line fit.
    pub fn linear() -> Self {
        Model::Polynomial { degree: 1 }
    }

    /// Number of coefficients.
    pub fn parameter_count(&self) -> usize {
        match self {
            Model::Polynomial { degree } => degree.saturating_add(1),
            Model::Periodic => 3,
            Model::Exponential | Model::Power => 2,
        }
    }

    /// Basis function `j` at `x`: the entry `A[i][j]` for sample `x_i`.
    pub fn basis_value(&self, j: usize, x: f64) -> f64 {
        match self {
            Model::Polynomial { .. } => x.powi(j as i32),
            Model::Periodic => match j {
                0 => 1.0,
                1 => (TWO_PI * x).cos(),
                _ => (TWO_PI * x).sin(),
            },
            Model::Exponential => match j {
                0 => 1.0,
                _ => x,
            },
            Model::Power => match j {
                0 => 1.0,
                _ => x.ln(),
            },
        }
    }

    fn uses_log_target(&self) -> bool {
        matches!(self, Model::Exponential | Model::Power)
    }

    /// Checks sample count and transform domains.
    fn check(&self, samples: &SampleSet) -> InterpolationResult<()> {
        let n = samples.len();
        match self {
            Model::Polynomial { degree } if *degree >= n => {
                return Err(InterpolationError::InvalidDegree {
                    degree: *degree,
                    points: n,
                });
            }
            Model::Polynomial { .. } => {}
            _ => samples.require_len(self.parameter_count())?,
        }

        if self.uses_log_target() {
            if let Some((i, y)) = samples.y().iter().enumerate().find(|&(_, &y)| y <= 0.0) {
                return Err(InterpolationError::invalid_input(format!(
                    "{} model needs y > 0, got y[{}] = {}",
                    self, i, y
                )));
            }
        }
        if *self == Model::Power {
            if let Some((i, x)) = samples.x().iter().enumerate().find(|&(_, &x)| x <= 0.0) {
                return Err(InterpolationError::invalid_input(format!(
                    "power model needs x > 0, got x[{}] = {}",
                    i, x
                )));
            }
        }
        Ok(())
    }

    fn expression(&self, c: &DVector<f64>) -> FittedExpression {
        match self {
            Model::Polynomial { .. } => {
                FittedExpression::Polynomial(Polynomial::new(c.iter().copied().collect()))
            }
            Model::Periodic => FittedExpression::Periodic {
                constant: c[0],
                cosine: c[1],
                sine: c[2],
            },
            Model::Exponential => FittedExpression::Exponential {
                scale: c[0].exp(),
                rate: c[1],
            },
            Model::Power => FittedExpression::Power {
                scale: c[0].exp(),
                exponent: c[1],
            },
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Polynomial { degree } => write!(f, "polynomial (degree {})", degree),
            Model::Periodic => write!(f, "periodic"),
            Model::Exponential => write!(f, "exponential"),
            Model::Power => write!(f, "power"),
        }
    }
}

/// Closed form of a fitted model in the original coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum FittedExpression {
    /// Polynomial in standard form.
    Polynomial(Polynomial),
    /// `constant + cosine·cos(2πx) + sine·sin(2πx)`.
    Periodic {
        /// Constant term.
        constant: f64,
        /// Cosine weight.
        cosine: f64,
        /// Sine weight.
        sine: f64,
    },
    /// `scale·e^{rate·x}`.
    Exponential {
        /// Value at zero.
        scale: f64,
        /// Growth rate.
        rate: f64,
    },
    /// `scale·x^exponent`, defined for `x > 0`.
    Power {
        /// Value at one.
        scale: f64,
        /// Exponent.
        exponent: f64,
    },
}

fn signed(value: f64) -> String {
    if value < 0.0 {
        format!(" - {}", -value)
    } else {
        format!(" + {}", value)
    }
}

impl Expression for FittedExpression {
    fn evaluate(&self, x: f64) -> InterpolationResult<f64> {
        match self {
            FittedExpression::Polynomial(p) => Ok(p.evaluate(x)),
            FittedExpression::Periodic {
                constant,
                cosine,
                sine,
            } => Ok(constant + cosine * (TWO_PI * x).cos() + sine * (TWO_PI * x).sin()),
            FittedExpression::Exponential { scale, rate } => Ok(scale * (rate * x).exp()),
            FittedExpression::Power { scale, exponent } => {
                if x <= 0.0 {
                    return Err(InterpolationError::OutOfDomain {
                        x,
                        min: 0.0,
                        max: f64::INFINITY,
                    });
                }
                Ok(scale * x.powf(*exponent))
            }
        }
    }

    fn derivative(&self, x: f64) -> InterpolationResult<f64> {
        match self {
            FittedExpression::Polynomial(p) => Ok(p.derivative().evaluate(x)),
            FittedExpression::Periodic { cosine, sine, .. } => {
                Ok(TWO_PI * (sine * (TWO_PI * x).cos() - cosine * (TWO_PI * x).sin()))
            }
            FittedExpression::Exponential { scale, rate } => Ok(scale * rate * (rate * x).exp()),
            FittedExpression::Power { scale, exponent } => {
                if x <= 0.0 {
                    return Err(InterpolationError::OutOfDomain {
                        x,
                        min: 0.0,
                        max: f64::INFINITY,
                    });
                }
                Ok(scale * exponent * x.powf(exponent - 1.0))
            }
        }
    }

    fn domain(&self) -> Option<(f64, f64)> {
        match self {
            FittedExpression::Power { .. } => Some((f64::MIN_POSITIVE, f64::INFINITY)),
            _ => None,
        }
    }

    fn render(&self, variable: &Variable) -> String {
        match self {
            FittedExpression::Polynomial(p) => p.render_in(variable.name()),
            FittedExpression::Periodic {
                constant,
                cosine,
                sine,
            } => format!(
                "{}{}*cos(2*pi*{v}){}*sin(2*pi*{v})",
                constant,
                signed(*cosine),
                signed(*sine),
                v = variable
            ),
            FittedExpression::Exponential { scale, rate } => {
                format!("{}*exp({}*{})", scale, rate, variable)
            }
            FittedExpression::Power { scale, exponent } => {
                format!("{}*{}^{}", scale, variable, exponent)
            }
        }
    }
}

/// Result of a least-squares fit, with the intermediate matrices kept for
/// display.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    model: Model,
    expression: FittedExpression,
    coefficients: DVector<f64>,
    design_matrix: DMatrix<f64>,
    target: DVector<f64>,
    normal_matrix: DMatrix<f64>,
    normal_rhs: DVector<f64>,
    condition_number: f64,
    residual_sum_of_squares: f64,
    ill_conditioned: bool,
}

impl FittedModel {
    /// The fitted model family.
    pub fn model(&self) -> Model {
        self.model
    }

    /// Closed form in the original coordinates.
    pub fn expression(&self) -> &FittedExpression {
        &self.expression
    }

    /// Solution `c` of the normal equations (in log space for the
    /// exponential and power models).
    pub fn coefficients(&self) -> &DVector<f64> {
        &self.coefficients
    }

    /// Design matrix `A`.
    pub fn design_matrix(&self) -> &DMatrix<f64> {
        &self.design_matrix
    }

    /// Target `b` (`y`, or `ln y`).
    pub fn target(&self) -> &DVector<f64> {
        &self.target
    }

    /// `AᵗA`.
    pub fn normal_matrix(&self) -> &DMatrix<f64> {
        &self.normal_matrix
    }

    /// `Aᵗb`.
    pub fn normal_rhs(&self) -> &DVector<f64> {
        &self.normal_rhs
    }

    /// Condition number of `AᵗA`.
    pub fn condition_number(&self) -> f64 {
        self.condition_number
    }

    /// `‖A c - b‖²`, measured in the space the fit was solved in.
    pub fn residual_sum_of_squares(&self) -> f64 {
        self.residual_sum_of_squares
    }

    /// True when the condition number exceeded the configured threshold.
    pub fn is_ill_conditioned(&self) -> bool {
        self.ill_conditioned
    }

    /// Evaluates the fitted function.
    pub fn predict(&self, x: f64) -> InterpolationResult<f64> {
        self.expression.evaluate(x)
    }
}

impl Expression for FittedModel {
    fn evaluate(&self, x: f64) -> InterpolationResult<f64> {
        self.expression.evaluate(x)
    }

    fn derivative(&self, x: f64) -> InterpolationResult<f64> {
        self.expression.derivative(x)
    }

    fn domain(&self) -> Option<(f64, f64)> {
        self.expression.domain()
    }

    fn render(&self, variable: &Variable) -> String {
        self.expression.render(variable)
    }
}

/// Fits models with fixed solver settings.
#[derive(Debug, Clone, Default)]
pub struct LeastSquaresFitter {
    solver: SolverConfig,
    settings: LeastSquaresConfig,
}

impl LeastSquaresFitter {
    /// Fitter with default tolerances.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitter using the solver and least-squares sections of `config`.
    ///
    /// # Errors
    ///
    /// [`InterpolationError::Config`] if the configuration is invalid.
    pub fn with_config(config: &EngineConfig) -> InterpolationResult<Self> {
        config.validate_or_error()?;
        Ok(Self {
            solver: config.solver,
            settings: config.least_squares,
        })
    }

    /// Fits a polynomial of the configured default degree.
    pub fn fit_default(&self, x: &[f64], y: &[f64]) -> InterpolationResult<FittedModel> {
        self.fit(
            x,
            y,
            Model::Polynomial {
                degree: self.settings.default_degree,
            },
        )
    }

    /// Fits `model` to the samples.
    ///
    /// # Errors
    ///
    /// - [`InterpolationError::DimensionMismatch`] if x and y differ in length.
    /// - [`InterpolationError::InvalidDegree`] if a polynomial degree is not below n.
    /// - [`InterpolationError::DegenerateInput`] with fewer points than parameters.
    /// - [`InterpolationError::InvalidInput`] when a log transform meets a
    ///   non-positive value.
    /// - [`InterpolationError::SingularNormalEquations`] if `AᵗA` is rank deficient.
    ///
    /// # Example
    ///
    /// ```rust
    /// use interpolant_math::least_squares::{LeastSquaresFitter, Model};
    ///
    /// let fit = LeastSquaresFitter::new()
    ///     .fit(&[0.0, 1.0, 2.0], &[1.0, 3.0, 5.0], Model::linear())
    ///     .unwrap();
    /// assert!((fit.coefficients()[1] - 2.0).abs() < 1e-12);
    /// ```
    pub fn fit(&self, x: &[f64], y: &[f64], model: Model) -> InterpolationResult<FittedModel> {
        let samples = SampleSet::new(x, y)?;
        model.check(&samples)?;

        let n = samples.len();
        let m = model.parameter_count();
        let xs = samples.x();

        let design_matrix = DMatrix::from_fn(n, m, |i, j| model.basis_value(j, xs[i]));
        let target = if model.uses_log_target() {
            DVector::from_iterator(n, samples.y().iter().map(|y| y.ln()))
        } else {
            DVector::from_column_slice(samples.y())
        };

        let (normal_matrix, normal_rhs) = normal_equations(&design_matrix, &target)?;

        let rank = numerical_rank(&normal_matrix, self.solver.rank_tolerance);
        if rank < m {
            return Err(InterpolationError::SingularNormalEquations {
                rank,
                parameters: m,
            });
        }

        let condition = condition_number(&normal_matrix);
        let ill_conditioned = condition > self.settings.condition_warning_threshold;
        if ill_conditioned {
            log::warn!(
                "{} fit: normal equations are ill-conditioned (condition number {:.3e})",
                model,
                condition
            );
        }

        let coefficients = solve_linear_system(&normal_matrix, &normal_rhs, self.solver.pivot_tolerance)
            .map_err(|e| match e {
                InterpolationError::SingularSystem { .. } => {
                    InterpolationError::SingularNormalEquations {
                        rank,
                        parameters: m,
                    }
                }
                other => other,
            })?;

        let residual_sum_of_squares = (&design_matrix * &coefficients - &target).norm_squared();
        let expression = model.expression(&coefficients);

        log::debug!(
            "{} fit on {} points: rss = {:.6e}, condition = {:.3e}",
            model,
            n,
            residual_sum_of_squares,
            condition
        );

        Ok(FittedModel {
            model,
            expression,
            coefficients,
            design_matrix,
            target,
            normal_matrix,
            normal_rhs,
            condition_number: condition,
            residual_sum_of_squares,
            ill_conditioned,
        })
    }
}

/// Fits `model` with default settings.
pub fn fit_least_squares(x: &[f64], y: &[f64], model: Model) -> InterpolationResult<FittedModel> {
    LeastSquaresFitter::new().fit(x, y, model)
}

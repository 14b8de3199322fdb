//! Rounded, serializable views of engine results for a display layer.
//!
//! Engine values stay at full precision; rounding happens only here.

use nalgebra::{DMatrix, DVector};
use serde::Serialize;

use interpolant_config::DisplayConfig;

use crate::divided_differences::DividedDifferenceTable;
use crate::error::InterpolationResult;
use crate::expression::{Expression, Variable};
use crate::least_squares::{FittedExpression, FittedModel, Model};
use crate::polynomial::Polynomial;
use crate::spline::CubicSpline;

/// Rounds to `decimals` places, half away from zero.
///
/// Values too large to scale are returned unchanged.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

fn round_all(values: &[f64], decimals: u32) -> Vec<f64> {
    values.iter().map(|&v| round_to(v, decimals)).collect()
}

fn matrix_rows(matrix: &DMatrix<f64>, decimals: u32) -> Vec<Vec<f64>> {
    (0..matrix.nrows())
        .map(|i| {
            (0..matrix.ncols())
                .map(|j| round_to(matrix[(i, j)], decimals))
                .collect()
        })
        .collect()
}

fn vector(values: &DVector<f64>, decimals: u32) -> Vec<f64> {
    round_all(values.as_slice(), decimals)
}

fn round_polynomial(p: &Polynomial, decimals: u32) -> Polynomial {
    Polynomial::new(round_all(p.coefficients(), decimals))
}

/// Divided-difference table with rounded entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifferenceTableView {
    /// Decimal places applied.
    pub decimals: u32,
    /// Rows as in the table: x, y, then each difference order.
    pub rows: Vec<Vec<f64>>,
}

impl DifferenceTableView {
    /// Rounds every entry of `table`.
    pub fn from_table(table: &DividedDifferenceTable, decimals: u32) -> Self {
        Self {
            decimals,
            rows: table.rows().iter().map(|r| round_all(r, decimals)).collect(),
        }
    }

    /// Triangular layout for printing: one column per table row, `2n - 1`
    /// lines. x and y sit on even lines; entry `i` of order `k` sits on line
    /// `2i + k`, between the two entries it was computed from.
    pub fn staggered(&self) -> Vec<Vec<Option<f64>>> {
        let n = self.rows.first().map_or(0, Vec::len);
        if n == 0 {
            return vec![];
        }

        let columns = self.rows.len();
        let mut grid = vec![vec![None; columns]; 2 * n - 1];

        for (c, row) in self.rows.iter().enumerate() {
            let offset = c.saturating_sub(1);
            for (i, &value) in row.iter().enumerate() {
                grid[2 * i + offset][c] = Some(value);
            }
        }
        grid
    }

    /// Pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// One spline segment, rounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentView {
    /// Left end.
    pub start: f64,
    /// Right end.
    pub end: f64,
    /// Local coefficients in ascending powers of `x - start`.
    pub coefficients: Vec<f64>,
    /// The segment polynomial rendered in the shifted coordinate.
    pub function: String,
}

/// The spline system and its solution, rounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplineView {
    /// Decimal places applied.
    pub decimals: u32,
    /// Interval widths `h`.
    pub widths: Vec<f64>,
    /// Dense coefficient matrix `A`.
    pub matrix: Vec<Vec<f64>>,
    /// Right-hand side `b`.
    pub rhs: Vec<f64>,
    /// Second derivatives `ω`.
    pub second_derivatives: Vec<f64>,
    /// Segments in order.
    pub segments: Vec<SegmentView>,
}

impl SplineView {
    /// Rounded view, rendered in `x`.
    pub fn from_spline(spline: &CubicSpline, decimals: u32) -> Self {
        Self::build(spline, decimals, &Variable::x())
    }

    /// Rounded view using the display configuration.
    pub fn with_config(spline: &CubicSpline, config: &DisplayConfig) -> InterpolationResult<Self> {
        let variable = Variable::from_config(config)?;
        Ok(Self::build(spline, config.decimals, &variable))
    }

    fn build(spline: &CubicSpline, decimals: u32, variable: &Variable) -> Self {
        let system = spline.system();
        let segments = spline
            .piecewise()
            .segments()
            .iter()
            .map(|s| {
                let mut rounded = s.clone();
                rounded.polynomial = round_polynomial(&s.polynomial, decimals);
                SegmentView {
                    start: s.start,
                    end: s.end,
                    coefficients: rounded.polynomial.coefficients().to_vec(),
                    function: rounded.render(variable),
                }
            })
            .collect();

        Self {
            decimals,
            widths: round_all(system.widths(), decimals),
            matrix: matrix_rows(&system.matrix().to_dense(), decimals),
            rhs: round_all(system.rhs(), decimals),
            second_derivatives: round_all(spline.second_derivatives(), decimals),
            segments,
        }
    }

    /// Pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// A least-squares fit with its normal equations, rounded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitView {
    /// The fitted model.
    pub model: Model,
    /// Decimal places applied.
    pub decimals: u32,
    /// Design matrix `A`.
    pub design_matrix: Vec<Vec<f64>>,
    /// Target `b`.
    pub target: Vec<f64>,
    /// `AᵗA`.
    pub normal_matrix: Vec<Vec<f64>>,
    /// `Aᵗb`.
    pub normal_rhs: Vec<f64>,
    /// Solution `c`.
    pub coefficients: Vec<f64>,
    /// Condition number of `AᵗA`, unrounded.
    pub condition_number: f64,
    /// Whether the fit was flagged ill-conditioned.
    pub ill_conditioned: bool,
    /// The fitted function with rounded constants.
    pub function: String,
}

impl FitView {
    /// Rounded view, rendered in `x`.
    pub fn from_model(model: &FittedModel, decimals: u32) -> Self {
        Self::build(model, decimals, &Variable::x())
    }

    /// Rounded view using the display configuration.
    pub fn with_config(model: &FittedModel, config: &DisplayConfig) -> InterpolationResult<Self> {
        let variable = Variable::from_config(config)?;
        Ok(Self::build(model, config.decimals, &variable))
    }

    fn build(model: &FittedModel, decimals: u32, variable: &Variable) -> Self {
        let r = |v: f64| round_to(v, decimals);
        let rounded = match model.expression() {
            FittedExpression::Polynomial(p) => {
                FittedExpression::Polynomial(round_polynomial(p, decimals))
            }
            FittedExpression::Periodic {
                constant,
                cosine,
                sine,
            } => FittedExpression::Periodic {
                constant: r(*constant),
                cosine: r(*cosine),
                sine: r(*sine),
            },
            FittedExpression::Exponential { scale, rate } => FittedExpression::Exponential {
                scale: r(*scale),
                rate: r(*rate),
            },
            FittedExpression::Power { scale, exponent } => FittedExpression::Power {
                scale: r(*scale),
                exponent: r(*exponent),
            },
        };

        Self {
            model: model.model(),
            decimals,
            design_matrix: matrix_rows(model.design_matrix(), decimals),
            target: vector(model.target(), decimals),
            normal_matrix: matrix_rows(model.normal_matrix(), decimals),
            normal_rhs: vector(model.normal_rhs(), decimals),
            coefficients: vector(model.coefficients(), decimals),
            condition_number: model.condition_number(),
            ill_conditioned: model.is_ill_conditioned(),
            function: rounded.render(variable),
        }
    }

    /// Pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::least_squares::fit_least_squares;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(0.123456, 4), 0.1235);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(1.0 / 3.0, 2), 0.33);
        assert_eq!(round_to(1e300, 15), 1e300);
    }

    #[test]
    fn test_table_view_and_layout() {
        let table = DividedDifferenceTable::build(&[0.0, 1.0, 3.0], &[0.0, 1.0, 2.0], None).unwrap();
        let view = DifferenceTableView::from_table(&table, 4);

        // f[1,3] = 0.5, f[0,1,3] = (0.5 - 1)/3
        assert_eq!(view.rows[3], vec![-0.1667]);

        let grid = view.staggered();
        assert_eq!(grid.len(), 5);
        assert_eq!(grid[0], vec![Some(0.0), Some(0.0), None, None]);
        assert_eq!(grid[1], vec![None, None, Some(1.0), None]);
        assert_eq!(grid[2], vec![Some(1.0), Some(1.0), None, Some(-0.1667)]);
        assert_eq!(grid[3], vec![None, None, Some(0.5), None]);
        assert_eq!(grid[4], vec![Some(3.0), Some(2.0), None, None]);
    }

    #[test]
    fn test_spline_view() {
        let spline = CubicSpline::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).unwrap();
        let view = SplineView::from_spline(&spline, 4);

        assert_eq!(view.widths, vec![1.0, 1.0]);
        assert_eq!(view.matrix, vec![vec![0.6667]]);
        assert_eq!(view.rhs, vec![-2.0]);
        assert_eq!(view.second_derivatives, vec![0.0, -3.0, 0.0]);
        assert_eq!(view.segments.len(), 2);
        assert_eq!(view.segments[0].function, "1.5*x - 0.5*x^3");

        let json = view.to_json().unwrap();
        assert!(json.contains("\"second_derivatives\""));
    }

    #[test]
    fn test_fit_view() {
        let fit = fit_least_squares(&[0.0, 1.0, 2.0], &[1.0, 2.0, 2.0], Model::linear()).unwrap();
        let config = DisplayConfig::default().with_decimals(2).with_variable("t");
        let view = FitView::with_config(&fit, &config).unwrap();

        assert_eq!(view.decimals, 2);
        assert_eq!(view.coefficients, vec![1.17, 0.5]);
        assert_eq!(view.function, "1.17 + 0.5*t");
        assert_eq!(view.normal_matrix, vec![vec![3.0, 3.0], vec![3.0, 5.0]]);

        let json = view.to_json().unwrap();
        assert!(json.contains("\"kind\": \"polynomial\""));
    }
}

//! Property-based tests for the interpolation invariants.
//!
//! These tests verify properties that must hold for any well-formed input:
//! - The Newton polynomial passes through every sample
//! - The Newton polynomial does not depend on the order of the samples
//! - Cubic splines interpolate and are C² at interior knots
//! - A degree-1 least-squares fit is the simple linear regression line
//! - Divided-difference rows have the documented lengths

use interpolant_math::prelude::*;
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

/// Strictly increasing x (steps of at least 0.5) with arbitrary y.
fn samples(min: usize, max: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
    (min..=max)
        .prop_flat_map(|n| {
            (
                -5.0f64..5.0,
                prop::collection::vec(0.5f64..2.0, n),
                prop::collection::vec(-10.0f64..10.0, n),
            )
        })
        .prop_map(|(start, steps, ys)| {
            let xs = steps
                .iter()
                .scan(start, |acc, step| {
                    let x = *acc;
                    *acc += step;
                    Some(x)
                })
                .collect();
            (xs, ys)
        })
}

/// Samples together with a permutation of their indices.
fn shuffled_samples(
    min: usize,
    max: usize,
) -> impl Strategy<Value = (Vec<f64>, Vec<f64>, Vec<usize>)> {
    samples(min, max).prop_flat_map(|(xs, ys)| {
        let order: Vec<usize> = (0..xs.len()).collect();
        (Just(xs), Just(ys), Just(order).prop_shuffle())
    })
}

fn scale(values: &[f64]) -> f64 {
    1.0 + values.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn newton_interpolates_in_any_order((xs, ys, order) in shuffled_samples(1, 7)) {
        let shuffled = SampleSet::new(&xs, &ys).unwrap().permuted(&order).unwrap();
        let p = NewtonPolynomial::from_samples(shuffled.x(), shuffled.y()).unwrap();
        let tolerance = 1e-7 * scale(&ys);

        for (&xi, &yi) in xs.iter().zip(&ys) {
            prop_assert!((p.value(xi) - yi).abs() <= tolerance, "P({}) = {}, want {}", xi, p.value(xi), yi);
        }
    }

    #[test]
    fn newton_is_order_invariant((xs, ys, order) in shuffled_samples(2, 7)) {
        let original = NewtonPolynomial::from_samples(&xs, &ys).unwrap();
        let shuffled = SampleSet::new(&xs, &ys).unwrap().permuted(&order).unwrap();
        let permuted = NewtonPolynomial::from_samples(shuffled.x(), shuffled.y()).unwrap();

        let (lo, hi) = (xs[0], xs[xs.len() - 1]);
        let probe: Vec<f64> = (0..=20).map(|k| lo + (hi - lo) * f64::from(k) / 20.0).collect();
        let values: Vec<f64> = probe.iter().map(|&x| original.value(x)).collect();
        let tolerance = 1e-6 * scale(&values);

        for (&x, &expected) in probe.iter().zip(&values) {
            prop_assert!((permuted.value(x) - expected).abs() <= tolerance);
        }
    }

    #[test]
    fn newton_forms_agree((xs, ys) in samples(1, 6)) {
        let p = NewtonPolynomial::from_samples(&xs, &ys).unwrap();
        let tolerance = 1e-7 * scale(&ys) * scale(&xs).powi(xs.len() as i32);
        for &x in &xs {
            prop_assert!((p.value(x) - p.expanded().evaluate(x)).abs() <= tolerance);
        }
    }

    #[test]
    fn spline_interpolates_and_is_twice_continuous((xs, ys) in samples(3, 12)) {
        let spline = natural_cubic_spline(&xs, &ys, 0.0, 0.0).unwrap();
        let tolerance = 1e-9 * scale(&ys);

        for (&xi, &yi) in xs.iter().zip(&ys) {
            prop_assert!((spline.evaluate(xi).unwrap() - yi).abs() <= tolerance);
        }

        let segments = spline.piecewise().segments();
        let curvature_tolerance = 1e-7 * scale(spline.second_derivatives());
        for i in 1..xs.len() - 1 {
            let (left, right) = (&segments[i - 1], &segments[i]);
            prop_assert!((left.evaluate(xs[i]) - right.evaluate(xs[i])).abs() <= tolerance);
            prop_assert!(
                (left.derivative_at(xs[i], 1) - right.derivative_at(xs[i], 1)).abs() <= curvature_tolerance
            );
            prop_assert!(
                (left.derivative_at(xs[i], 2) - right.derivative_at(xs[i], 2)).abs() <= curvature_tolerance
            );
        }
    }

    #[test]
    fn clamped_spline_keeps_end_curvature(
        (xs, ys) in samples(3, 10),
        w0 in -20.0f64..20.0,
        wn in -20.0f64..20.0,
    ) {
        let spline = natural_cubic_spline(&xs, &ys, w0, wn).unwrap();
        let last = xs[xs.len() - 1];

        prop_assert!((spline.second_derivative(xs[0]).unwrap() - w0).abs() <= 1e-8 * (1.0 + w0.abs()));
        prop_assert!((spline.second_derivative(last).unwrap() - wn).abs() <= 1e-8 * (1.0 + wn.abs()));
    }

    #[test]
    fn linear_fit_is_simple_regression((xs, ys) in samples(2, 20)) {
        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;
        let sxy: f64 = xs.iter().zip(&ys).map(|(x, y)| (x - mean_x) * (y - mean_y)).sum();
        let sxx: f64 = xs.iter().map(|x| (x - mean_x).powi(2)).sum();
        let slope = sxy / sxx;
        let intercept = mean_y - slope * mean_x;

        let fit = fit_least_squares(&xs, &ys, Model::linear()).unwrap();
        prop_assert!((fit.coefficients()[1] - slope).abs() <= 1e-8 * (1.0 + slope.abs()));
        prop_assert!((fit.coefficients()[0] - intercept).abs() <= 1e-8 * (1.0 + intercept.abs()) * scale(&xs));
    }

    #[test]
    fn difference_rows_have_documented_lengths((xs, ys) in samples(1, 10), fraction in 0.0f64..=1.0) {
        let n = xs.len();
        let max_order = ((n - 1) as f64 * fraction).floor() as usize;
        let table = DividedDifferenceTable::build(&xs, &ys, Some(max_order)).unwrap();

        prop_assert_eq!(table.max_order(), max_order);
        prop_assert_eq!(table.row(0).map(<[f64]>::len), Some(n));
        for k in 0..=max_order {
            prop_assert_eq!(table.order(k).map(<[f64]>::len), Some(n - k));
        }
        prop_assert!(table.order(max_order + 1).is_none());
    }

    #[test]
    fn degree_at_least_point_count_is_rejected((xs, ys) in samples(1, 8), extra in 0usize..3) {
        let degree = xs.len() + extra;
        let is_invalid_degree = matches!(
            fit_least_squares(&xs, &ys, Model::Polynomial { degree }),
            Err(InterpolationError::InvalidDegree { .. })
        );
        prop_assert!(is_invalid_degree);
    }
}

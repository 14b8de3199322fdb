//! Linear algebra utilities.
//!
//! Direct solvers for the spline and least-squares systems, plus the
//! singular-value diagnostics used to judge normal equations.

use nalgebra::{DMatrix, DVector};

use crate::error::{InterpolationError, InterpolationResult};

/// Solves a tridiagonal system of equations with the Thomas algorithm.
///
/// The system has the form:
/// ```text
/// | b[0]  c[0]   0    ...     0    | | x[0]   |   | d[0]   |
/// | a[0]  b[1]  c[1]  ...     0    | | x[1]   |   | d[1]   |
/// |  0    a[1]  b[2]  ...     0    | | x[2]   | = | d[2]   |
/// | ...   ...   ...   ...    ...   | | ...    |   | ...    |
/// |  0     0     0   a[n-2] b[n-1] | | x[n-1] |   | d[n-1] |
/// ```
///
/// # Arguments
///
/// * `a` - Lower diagonal (length n-1)
/// * `b` - Main diagonal (length n)
/// * `c` - Upper diagonal (length n-1)
/// * `d` - Right-hand side (length n)
/// * `tolerance` - Relative pivot tolerance; a pivot below
///   `tolerance * max|entry|` is treated as zero
///
/// # Errors
///
/// [`InterpolationError::SingularSystem`] when elimination meets a vanishing pivot.
pub fn solve_tridiagonal(
    a: &[f64],
    b: &[f64],
    c: &[f64],
    d: &[f64],
    tolerance: f64,
) -> InterpolationResult<Vec<f64>> {
    let n = b.len();
    if n == 0 {
        return if a.is_empty() && c.is_empty() && d.is_empty() {
            Ok(vec![])
        } else {
            Err(InterpolationError::invalid_input(
                "Tridiagonal system has inconsistent dimensions",
            ))
        };
    }

    if a.len() != n - 1 || c.len() != n - 1 || d.len() != n {
        return Err(InterpolationError::invalid_input(
            "Tridiagonal system has inconsistent dimensions",
        ));
    }

    let scale = a
        .iter()
        .chain(b)
        .chain(c)
        .fold(0.0_f64, |m, v| m.max(v.abs()));
    let threshold = tolerance * scale;

    let check = |row: usize, pivot: f64| {
        if pivot.abs() <= threshold || !pivot.is_finite() {
            Err(InterpolationError::SingularSystem { row, pivot })
        } else {
            Ok(pivot)
        }
    };

    // Forward elimination
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];

    let first = check(0, b[0])?;
    if n > 1 {
        c_prime[0] = c[0] / first;
    }
    d_prime[0] = d[0] / first;

    for i in 1..n {
        let denom = check(i, b[i] - a[i - 1] * c_prime[i - 1])?;
        if i < n - 1 {
            c_prime[i] = c[i] / denom;
        }
        d_prime[i] = (d[i] - a[i - 1] * d_prime[i - 1]) / denom;
    }

    // Back substitution
    let mut x = vec![0.0; n];
    x[n - 1] = d_prime[n - 1];

    for i in (0..n - 1).rev() {
        x[i] = d_prime[i] - c_prime[i] * x[i + 1];
    }

    log::trace!("tridiagonal solve: n = {}", n);

    Ok(x)
}

/// A symmetric tridiagonal matrix stored as its two distinct diagonals.
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricTridiagonal {
    diagonal: Vec<f64>,
    off_diagonal: Vec<f64>,
}

impl SymmetricTridiagonal {
    /// Creates the matrix from its main diagonal (length n) and off-diagonal
    /// (length n-1).
    pub fn new(diagonal: Vec<f64>, off_diagonal: Vec<f64>) -> InterpolationResult<Self> {
        if off_diagonal.len() + 1 != diagonal.len() && !(diagonal.is_empty() && off_diagonal.is_empty())
        {
            return Err(InterpolationError::invalid_input(format!(
                "off-diagonal has {} entries for a diagonal of {}",
                off_diagonal.len(),
                diagonal.len()
            )));
        }
        Ok(Self {
            diagonal,
            off_diagonal,
        })
    }

    /// Matrix dimension.
    pub fn dimension(&self) -> usize {
        self.diagonal.len()
    }

    /// Main diagonal.
    pub fn diagonal(&self) -> &[f64] {
        &self.diagonal
    }

    /// Off-diagonal (shared by the upper and lower bands).
    pub fn off_diagonal(&self) -> &[f64] {
        &self.off_diagonal
    }

    /// Solves `M x = rhs` in O(n).
    pub fn solve(&self, rhs: &[f64], tolerance: f64) -> InterpolationResult<Vec<f64>> {
        solve_tridiagonal(
            &self.off_diagonal,
            &self.diagonal,
            &self.off_diagonal,
            rhs,
            tolerance,
        )
    }

    /// Computes `M v`.
    pub fn mul_vec(&self, v: &[f64]) -> InterpolationResult<Vec<f64>> {
        let n = self.dimension();
        if v.len() != n {
            return Err(InterpolationError::invalid_input(format!(
                "vector has {} entries for a {}x{} matrix",
                v.len(),
                n,
                n
            )));
        }

        Ok((0..n)
            .map(|i| {
                let mut sum = self.diagonal[i] * v[i];
                if i > 0 {
                    sum += self.off_diagonal[i - 1] * v[i - 1];
                }
                if i + 1 < n {
                    sum += self.off_diagonal[i] * v[i + 1];
                }
                sum
            })
            .collect())
    }

    /// Dense copy of the matrix.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let n = self.dimension();
        DMatrix::from_fn(n, n, |i, j| {
            if i == j {
                self.diagonal[i]
            } else if i + 1 == j {
                self.off_diagonal[i]
            } else if j + 1 == i {
                self.off_diagonal[j]
            } else {
                0.0
            }
        })
    }
}

/// Solves a square linear system `Ax = b` by Gaussian elimination with
/// partial pivoting.
///
/// A pivot whose magnitude is at most `tolerance * max|A|` stops the solve with
/// [`InterpolationError::SingularSystem`].
pub fn solve_linear_system(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
    tolerance: f64,
) -> InterpolationResult<DVector<f64>> {
    let n = a.nrows();
    if n != a.ncols() {
        return Err(InterpolationError::invalid_input("Matrix must be square"));
    }
    if n != b.len() {
        return Err(InterpolationError::invalid_input(format!(
            "right-hand side has {} entries for a {}x{} matrix",
            b.len(),
            n,
            n
        )));
    }

    let scale = a.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
    let threshold = tolerance * scale;

    let mut u = a.clone();
    let mut rhs = b.clone();

    for k in 0..n {
        let (pivot_row, pivot) = (k..n)
            .map(|i| (i, u[(i, k)]))
            .fold((k, 0.0_f64), |best, (i, v)| {
                if v.abs() > best.1.abs() {
                    (i, v)
                } else {
                    best
                }
            });

        if pivot.abs() <= threshold || !pivot.is_finite() {
            return Err(InterpolationError::SingularSystem { row: k, pivot });
        }

        if pivot_row != k {
            u.swap_rows(k, pivot_row);
            rhs.swap_rows(k, pivot_row);
        }

        for i in k + 1..n {
            let factor = u[(i, k)] / u[(k, k)];
            if factor == 0.0 {
                continue;
            }
            for j in k..n {
                u[(i, j)] -= factor * u[(k, j)];
            }
            rhs[i] -= factor * rhs[k];
        }
    }

    // Back substitution
    let mut x = DVector::zeros(n);
    for i in (0..n).rev() {
        let mut sum = rhs[i];
        for j in i + 1..n {
            sum -= u[(i, j)] * x[j];
        }
        x[i] = sum / u[(i, i)];
    }

    log::trace!("dense solve: n = {}", n);

    Ok(x)
}

/// Forms the normal equations `(AᵗA, Aᵗb)`.
pub fn normal_equations(
    a: &DMatrix<f64>,
    b: &DVector<f64>,
) -> InterpolationResult<(DMatrix<f64>, DVector<f64>)> {
    if a.nrows() != b.len() {
        return Err(InterpolationError::invalid_input(format!(
            "design matrix has {} rows, target has {} entries",
            a.nrows(),
            b.len()
        )));
    }
    let at = a.transpose();
    Ok((&at * a, &at * b))
}

/// Singular values in descending order.
pub fn singular_values(matrix: &DMatrix<f64>) -> Vec<f64> {
    if matrix.is_empty() {
        return vec![];
    }
    let svd = matrix.clone().svd(false, false);
    let mut values: Vec<f64> = svd.singular_values.iter().copied().collect();
    values.sort_by(|a, b| b.total_cmp(a));
    values
}

/// Ratio of the largest to the smallest singular value.
///
/// Infinite for a singular (or empty) matrix.
pub fn condition_number(matrix: &DMatrix<f64>) -> f64 {
    let values = singular_values(matrix);
    match (values.first(), values.last()) {
        (Some(&max), Some(&min)) if min > 0.0 => max / min,
        _ => f64::INFINITY,
    }
}

/// Number of singular values above `tolerance * σ_max`.
pub fn numerical_rank(matrix: &DMatrix<f64>, tolerance: f64) -> usize {
    let values = singular_values(matrix);
    let Some(&max) = values.first() else {
        return 0;
    };
    if max == 0.0 {
        return 0;
    }
    values.iter().filter(|&&s| s > tolerance * max).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_tridiagonal_simple() {
        let a = vec![1.0, 1.0];
        let b = vec![2.0, 2.0, 2.0];
        let c = vec![1.0, 1.0];
        let d = vec![1.0, 2.0, 3.0];

        let x = solve_tridiagonal(&a, &b, &c, &d, 1e-12).unwrap();

        assert_relative_eq!(b[0] * x[0] + c[0] * x[1], d[0], epsilon = 1e-10);
        assert_relative_eq!(
            a[0] * x[0] + b[1] * x[1] + c[1] * x[2],
            d[1],
            epsilon = 1e-10
        );
        assert_relative_eq!(a[1] * x[1] + b[2] * x[2], d[2], epsilon = 1e-10);
    }

    #[test]
    fn test_tridiagonal_single_and_empty() {
        assert_eq!(solve_tridiagonal(&[], &[4.0], &[], &[2.0], 1e-12).unwrap(), vec![0.5]);
        assert!(solve_tridiagonal(&[], &[], &[], &[], 1e-12).unwrap().is_empty());
        assert!(solve_tridiagonal(&[1.0], &[1.0], &[], &[1.0], 1e-12).is_err());
    }

    #[test]
    fn test_tridiagonal_singular() {
        let err = solve_tridiagonal(&[1.0], &[1.0, 1.0], &[1.0], &[1.0, 2.0], 1e-12).unwrap_err();
        assert!(matches!(err, InterpolationError::SingularSystem { row: 1, .. }));
    }

    #[test]
    fn test_symmetric_tridiagonal() {
        let m = SymmetricTridiagonal::new(vec![4.0, 4.0, 4.0], vec![1.0, 1.0]).unwrap();
        let x = m.solve(&[5.0, 6.0, 5.0], 1e-12).unwrap();
        for (xi, expected) in x.iter().zip([1.0, 1.0, 1.0]) {
            assert_relative_eq!(*xi, expected, epsilon = 1e-12);
        }

        assert_eq!(m.mul_vec(&[1.0, 1.0, 1.0]).unwrap(), vec![5.0, 6.0, 5.0]);

        let dense = m.to_dense();
        assert_eq!(dense[(0, 1)], 1.0);
        assert_eq!(dense[(1, 0)], 1.0);
        assert_eq!(dense[(0, 2)], 0.0);
        assert_eq!(dense, dense.transpose());

        assert!(SymmetricTridiagonal::new(vec![1.0, 2.0], vec![]).is_err());
    }

    #[test]
    fn test_solve_linear_system() {
        let a = DMatrix::from_row_slice(2, 2, &[2.0, 1.0, 1.0, 3.0]);
        let b = DVector::from_vec(vec![5.0, 5.0]);

        let x = solve_linear_system(&a, &b, 1e-12).unwrap();

        assert_relative_eq!(x[0], 2.0, epsilon = 1e-10);
        assert_relative_eq!(x[1], 1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_solve_needs_pivoting() {
        let a = DMatrix::from_row_slice(3, 3, &[0.0, 2.0, 1.0, 1.0, 1.0, 1.0, 2.0, 1.0, 3.0]);
        let expected = DVector::from_vec(vec![1.0, -1.0, 2.0]);
        let b = &a * &expected;

        let x = solve_linear_system(&a, &b, 1e-12).unwrap();
        assert_relative_eq!(x, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_solve_singular() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 2.0, 4.0]);
        let b = DVector::from_vec(vec![1.0, 2.0]);
        assert!(matches!(
            solve_linear_system(&a, &b, 1e-12),
            Err(InterpolationError::SingularSystem { row: 1, .. })
        ));
    }

    #[test]
    fn test_normal_equations_and_diagnostics() {
        let a = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let b = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let (ata, atb) = normal_equations(&a, &b).unwrap();

        assert_eq!(ata, DMatrix::from_row_slice(2, 2, &[3.0, 3.0, 3.0, 5.0]));
        assert_eq!(atb, DVector::from_vec(vec![6.0, 8.0]));

        assert_eq!(numerical_rank(&ata, 1e-12), 2);
        let values = singular_values(&ata);
        assert!(values[0] >= values[1]);
        assert_relative_eq!(condition_number(&ata), values[0] / values[1], epsilon = 1e-12);
    }

    #[test]
    fn test_rank_deficient() {
        let m = DMatrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 1.0]);
        assert_eq!(numerical_rank(&m, 1e-12), 1);
        assert!(condition_number(&m) > 1e12);
        assert_eq!(numerical_rank(&DMatrix::zeros(2, 2), 1e-12), 0);
    }
}

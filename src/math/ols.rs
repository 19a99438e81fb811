//! Ordinary least squares.
//!
//! We solve small regression problems of the form:
//!
//! ```text
//! minimize Σ (y_i - x_i^T β)^2
//! ```
//!
//! Implementation choices:
//! - We solve with SVD so the tall design matrix (more rows than columns) is
//!   handled directly. (Nalgebra's `QR::solve` is intended for square systems
//!   and will panic for non-square matrices.)
//! - The singular values double as a rank check: a design whose numerical rank is
//!   below its column count is reported as degenerate instead of silently
//!   returning a minimum-norm solution.
//! - Inference (standard errors, t statistics) uses `σ² (XᵀX)⁻¹` with
//!   `σ² = SSE / (n - p)`.

use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::error::FitError;

/// Relative tolerance on singular values when deciding the numerical rank.
const RANK_TOL: f64 = 1e-10;

/// Solve a least squares problem using SVD.
///
/// Returns `None` if the system is too ill-conditioned to solve robustly.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    let svd = x.clone().svd(true, true);

    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                return Some(beta);
            }
        }
    }

    None
}

/// Numerical rank of `x`, relative to its largest singular value.
pub fn numerical_rank(x: &DMatrix<f64>) -> usize {
    let svd = x.clone().svd(false, false);
    let max_sv = svd.singular_values.iter().copied().fold(0.0_f64, f64::max);
    if !(max_sv.is_finite() && max_sv > 0.0) {
        return 0;
    }
    svd.rank(max_sv * RANK_TOL)
}

/// Fit output of `y = β0 + β1 x` with inference on the slope.
#[derive(Debug, Clone, PartialEq)]
pub struct SimpleFit {
    pub intercept: f64,
    pub slope: f64,
    pub slope_std_err: f64,
    /// Two-sided p-value for `H0: slope = 0`.
    pub slope_p_value: f64,
    pub r_squared: f64,
    pub sse: f64,
    pub n: usize,
}

/// Fit `y = β0 + β1 x + ε` by OLS with an intercept column.
pub fn fit_simple(x: &[f64], y: &[f64]) -> Result<SimpleFit, FitError> {
    let n = x.len();
    if n != y.len() {
        return Err(FitError::Degenerate(format!(
            "length mismatch: x has {n} values, y has {}",
            y.len()
        )));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite);
    }
    // Two parameters plus at least one residual degree of freedom.
    if n < 3 {
        return Err(FitError::NoResidualDof { n });
    }

    let design = DMatrix::from_fn(n, 2, |i, j| if j == 0 { 1.0 } else { x[i] });
    let response = DVector::from_column_slice(y);

    if numerical_rank(&design) < 2 {
        return Err(FitError::Degenerate(
            "regressor has no variation (all prices identical)".to_string(),
        ));
    }

    let beta = solve_least_squares(&design, &response)
        .ok_or_else(|| FitError::Degenerate("least squares solve failed".to_string()))?;
    let intercept = beta[0];
    let slope = beta[1];

    let fitted = &design * &beta;
    let sse: f64 = (&response - fitted).iter().map(|r| r * r).sum();

    let y_mean = y.iter().sum::<f64>() / n as f64;
    let sst: f64 = y.iter().map(|v| (v - y_mean) * (v - y_mean)).sum();

    let r_squared = if sst > 0.0 {
        (1.0 - sse / sst).clamp(0.0, 1.0)
    } else {
        // Constant response: nothing to explain.
        0.0
    };

    let dof = (n - 2) as f64;
    let sigma2 = sse / dof;

    let xtx = design.transpose() * &design;
    let xtx_inv = xtx
        .try_inverse()
        .ok_or_else(|| FitError::Degenerate("singular normal equations".to_string()))?;
    let slope_var = sigma2 * xtx_inv[(1, 1)];
    // Round-off can leave a tiny negative variance on exact fits.
    let slope_std_err = slope_var.max(0.0).sqrt();

    let slope_p_value = slope_p_value(slope, slope_std_err, dof)?;

    let fit = SimpleFit {
        intercept,
        slope,
        slope_std_err,
        slope_p_value,
        r_squared,
        sse,
        n,
    };

    if [fit.intercept, fit.slope, fit.slope_std_err, fit.r_squared, fit.sse]
        .iter()
        .any(|v| !v.is_finite())
    {
        return Err(FitError::NonFinite);
    }
    Ok(fit)
}

fn slope_p_value(slope: f64, std_err: f64, dof: f64) -> Result<f64, FitError> {
    if std_err == 0.0 {
        // Exact fit: any non-zero slope is infinitely significant.
        return Ok(if slope == 0.0 { 1.0 } else { 0.0 });
    }

    let t = slope / std_err;
    if !t.is_finite() {
        return Err(FitError::NonFinite);
    }

    let dist = StudentsT::new(0.0, 1.0, dof)
        .map_err(|e| FitError::Degenerate(format!("t distribution: {e}")))?;
    let p = 2.0 * dist.sf(t.abs());
    Ok(p.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn least_squares_solves_simple_system() {
        // Fit y = 2 + 3x on x = [0,1,2]
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).unwrap();
        assert!((beta[0] - 2.0).abs() < 1e-10);
        assert!((beta[1] - 3.0).abs() < 1e-10);
    }

    #[test]
    fn rank_detects_constant_regressor() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 4.0, 1.0, 4.0, 1.0, 4.0]);
        assert_eq!(numerical_rank(&x), 1);
    }

    #[test]
    fn exact_line_has_unit_r_squared() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 1.5 - 0.8 * v).collect();
        let fit = fit_simple(&x, &y).unwrap();
        assert!((fit.slope + 0.8).abs() < 1e-10);
        assert!((fit.intercept - 1.5).abs() < 1e-10);
        assert!((fit.r_squared - 1.0).abs() < 1e-10);
        assert!(fit.slope_p_value < 1e-6);
    }

    #[test]
    fn matches_textbook_values() {
        // Hand-computed: x̄=3, ȳ=4, Sxx=10, Sxy=6 → slope=0.6, intercept=2.2,
        // SSE=2.4, SST=6 → R²=0.6, se=sqrt(0.8/10), t≈2.1213 on 3 dof.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [2.0, 4.0, 5.0, 4.0, 5.0];
        let fit = fit_simple(&x, &y).unwrap();
        assert!((fit.slope - 0.6).abs() < 1e-10);
        assert!((fit.intercept - 2.2).abs() < 1e-10);
        assert!((fit.sse - 2.4).abs() < 1e-10);
        assert!((fit.r_squared - 0.6).abs() < 1e-10);
        assert!((fit.slope_std_err - (0.08_f64).sqrt()).abs() < 1e-10);
        // Two-sided p for t=2.1213 with 3 dof is ~0.1240.
        assert!((fit.slope_p_value - 0.1240).abs() < 1e-3, "p={}", fit.slope_p_value);
    }

    #[test]
    fn constant_regressor_is_degenerate() {
        let x = [2.0, 2.0, 2.0, 2.0];
        let y = [1.0, 2.0, 3.0, 4.0];
        assert!(matches!(fit_simple(&x, &y), Err(FitError::Degenerate(_))));
    }

    #[test]
    fn two_points_have_no_residual_dof() {
        let x = [1.0, 2.0];
        let y = [1.0, 2.0];
        assert_eq!(fit_simple(&x, &y), Err(FitError::NoResidualDof { n: 2 }));
    }

    #[test]
    fn constant_response_is_fittable() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [2.0, 2.0, 2.0, 2.0];
        let fit = fit_simple(&x, &y).unwrap();
        assert!(fit.slope.abs() < 1e-10);
        assert_eq!(fit.r_squared, 0.0);
        assert!(fit.slope_p_value >= 0.0 && fit.slope_p_value <= 1.0);
    }
}

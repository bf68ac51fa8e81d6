//! Least-squares line fit.
//!
//! The projector solves exactly one regression shape: a straight line
//! `value = slope * year + intercept` over a handful of yearly observations.
//!
//! Implementation choices:
//! - We center the year column at its mean before building the design matrix.
//!   Raw calendar years (≈2e3) against a unit intercept column make the
//!   normal equations needlessly ill-conditioned; centering fixes that and
//!   the coefficients map back exactly.
//! - We solve via SVD, which stays robust for the tall (n×2) design matrix.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic
//!   for non-square matrices.)

use nalgebra::{DMatrix, DVector};

use crate::domain::TrendLine;

/// Fit `value = slope * year + intercept` by ordinary least squares.
///
/// Callers are expected to have validated the input (≥2 points, finite
/// values, non-zero year variance); `None` here means the system was still
/// too ill-conditioned to solve robustly.
pub fn fit_line(years: &[f64], values: &[f64]) -> Option<TrendLine> {
    debug_assert_eq!(years.len(), values.len());
    let n = years.len();
    if n < 2 {
        return None;
    }

    let mean_year = years.iter().sum::<f64>() / n as f64;

    let mut x = DMatrix::<f64>::zeros(n, 2);
    for (i, &year) in years.iter().enumerate() {
        x[(i, 0)] = 1.0;
        x[(i, 1)] = year - mean_year;
    }
    let y = DVector::from_column_slice(values);

    let svd = x.svd(true, true);

    // Try progressively looser tolerances if the strict solve fails.
    for &tol in &[1e-10, 1e-8, 1e-6] {
        if let Ok(beta) = svd.solve(&y, tol) {
            if beta.iter().all(|v| v.is_finite()) {
                let slope = beta[1];
                // Undo the centering: value = beta0 + slope * (year - mean).
                let intercept = beta[0] - slope * mean_year;
                if slope.is_finite() && intercept.is_finite() {
                    return Some(TrendLine { slope, intercept });
                }
            }
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_exact_line() {
        // value = 10 * (year - 2017), i.e. slope 10, intercept -20170.
        let years = [2018.0, 2019.0, 2020.0];
        let values = [10.0, 20.0, 30.0];

        let line = fit_line(&years, &values).unwrap();
        assert!((line.slope - 10.0).abs() < 1e-9);
        assert!((line.value_at(2021) - 40.0).abs() < 1e-9);
    }

    #[test]
    fn fits_least_squares_through_noisy_points() {
        // Symmetric residuals around value = 5 + 1*(year - 2000).
        let years = [2000.0, 2001.0, 2002.0, 2003.0];
        let values = [5.0 - 0.5, 6.0 + 0.5, 7.0 + 0.5, 8.0 - 0.5];

        let line = fit_line(&years, &values).unwrap();
        assert!((line.slope - 1.0).abs() < 0.2);
        assert!((line.value_at(2001) - 6.0).abs() < 0.5);
    }

    #[test]
    fn single_point_is_rejected() {
        assert!(fit_line(&[2020.0], &[5.0]).is_none());
    }
}

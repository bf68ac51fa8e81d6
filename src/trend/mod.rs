//! Linear trend projection: the forecasting core of the dashboard.
//!
//! Given an indicator's observed history, fit an ordinary-least-squares line
//! on `(year, value)` pairs and evaluate it at the requested target years.
//! That is the entire model: no seasonality, no intervals, no bounds
//! checking. The output is a baseline trend line, not a validated forecast.
//!
//! All preconditions are checked up front so the solver can never divide by
//! zero or emit NaN into a chart:
//!
//! - fewer than 2 observations  -> `InsufficientData`
//! - any non-finite value       -> `InvalidValue`
//! - all years identical        -> `DegenerateInput`
//!
//! For identical inputs the output is bit-for-bit reproducible: there is no
//! randomness and no iteration-order dependence anywhere in the fit.

pub mod ols;

pub use ols::fit_line;

use crate::domain::{Forecast, ForecastPoint, QueryError, TimeSeries, TrendLine};

/// Fit the trend line for a series, enforcing the projector preconditions.
pub fn fit_trend(series: &TimeSeries) -> Result<TrendLine, QueryError> {
    let n = series.len();
    if n < 2 {
        return Err(QueryError::InsufficientData { points: n });
    }

    for p in &series.points {
        if !p.value.is_finite() {
            return Err(QueryError::InvalidValue { year: p.year });
        }
    }

    // Zero variance in the predictor must fail fast, before the solver: an
    // SVD solve would happily return a minimum-norm (slope = 0) answer for
    // the underdetermined system, which is not a fit, it's an artifact.
    let first_year = series.points[0].year;
    if series.points.iter().all(|p| p.year == first_year) {
        return Err(QueryError::DegenerateInput);
    }

    let years: Vec<f64> = series.points.iter().map(|p| p.year as f64).collect();
    let values: Vec<f64> = series.points.iter().map(|p| p.value).collect();

    fit_line(&years, &values).ok_or(QueryError::DegenerateInput)
}

/// Project a series at each target year, preserving caller-supplied order.
///
/// Target years may precede, overlap, or follow the observed range; the line
/// is extrapolated without bounds checking either way.
pub fn project(series: &TimeSeries, target_years: &[i32]) -> Result<Forecast, QueryError> {
    let line = fit_trend(series)?;

    let points = target_years
        .iter()
        .map(|&year| ForecastPoint {
            year,
            value: line.value_at(year),
        })
        .collect();

    Ok(Forecast {
        indicator: series.indicator,
        line,
        points,
    })
}

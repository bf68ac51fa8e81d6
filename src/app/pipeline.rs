//! Shared query pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> filter -> series/latest -> trend projection
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).
//!
//! Forecasts are recomputed on every call; only the loaded table (`Dataset`)
//! is cached, and it is immutable for the process lifetime.

use crate::data::store::Dataset;
use crate::domain::{
    Forecast, Indicator, Observation, QueryConfig, QueryError, TimeSeries, TARGET_YEARS,
};
use crate::error::AppError;
use crate::trend;

/// Everything one indicator's pages need: history, latest value, forecast.
///
/// `forecast` keeps the `QueryError` rather than flattening it away so the
/// presentation layer can render the right advisory.
#[derive(Debug, Clone)]
pub struct IndicatorView {
    pub indicator: Indicator,
    pub series: TimeSeries,
    pub latest: Option<Observation>,
    pub forecast: Result<Forecast, QueryError>,
}

/// All computed outputs of a single query run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub dataset: Dataset,
    pub views: Vec<IndicatorView>,
}

/// Load the dataset and compute views for every catalog indicator.
pub fn run_query(config: &QueryConfig) -> Result<RunOutput, AppError> {
    let dataset = Dataset::load(config)?;
    let views = view_all(&dataset);
    Ok(RunOutput { dataset, views })
}

/// Compute the view for one indicator against an already-loaded dataset.
pub fn view(dataset: &Dataset, indicator: Indicator) -> IndicatorView {
    let series = dataset.series(indicator);
    let latest = dataset.latest(indicator).ok();
    let forecast = trend::project(&series, &TARGET_YEARS);
    IndicatorView {
        indicator,
        series,
        latest,
        forecast,
    }
}

/// Compute views for the whole catalog, in display order.
pub fn view_all(dataset: &Dataset) -> Vec<IndicatorView> {
    Indicator::ALL.into_iter().map(|ind| view(dataset, ind)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(indicator: Indicator, year: i32, value: f64) -> Observation {
        Observation {
            indicator,
            year,
            value,
        }
    }

    #[test]
    fn view_carries_series_latest_and_forecast() {
        let ds = Dataset::from_observations(vec![
            obs(Indicator::AccountOwnership, 2018, 10.0),
            obs(Indicator::AccountOwnership, 2019, 20.0),
            obs(Indicator::AccountOwnership, 2020, 30.0),
        ]);

        let v = view(&ds, Indicator::AccountOwnership);
        assert_eq!(v.series.len(), 3);
        assert_eq!(v.latest.unwrap().year, 2020);

        let forecast = v.forecast.unwrap();
        assert_eq!(forecast.points.len(), TARGET_YEARS.len());
        // 2025 on the exact line value = 10 * (year - 2017).
        assert!((forecast.points[0].value - 80.0).abs() < 1e-9);
    }

    #[test]
    fn absent_indicator_yields_empty_view_not_error() {
        let ds = Dataset::from_observations(vec![obs(Indicator::MobileMoney, 2021, 9.7)]);

        let v = view(&ds, Indicator::DigitalPayment);
        assert!(v.series.is_empty());
        assert!(v.latest.is_none());
        assert_eq!(
            v.forecast,
            Err(QueryError::InsufficientData { points: 0 })
        );
    }

    #[test]
    fn view_all_covers_the_catalog_in_display_order() {
        let ds = Dataset::from_observations(Vec::new());
        let views = view_all(&ds);
        let order: Vec<Indicator> = views.iter().map(|v| v.indicator).collect();
        assert_eq!(order, Indicator::ALL.to_vec());
    }
}

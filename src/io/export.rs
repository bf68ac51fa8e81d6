//! Exports: per-indicator series re-export (CSV) and forecast files (JSON).
//!
//! The CSV export is the dashboard's "download" of the filtered series,
//! meant to be easy to consume in spreadsheets or downstream scripts. The
//! JSON export is the portable representation of a fitted trend: enough to
//! replot the line elsewhere without access to the source dataset. Its
//! schema is defined by `domain::ForecastFile`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{Forecast, ForecastFile, TimeSeries};
use crate::error::AppError;

/// Write one indicator's filtered series as a delimited text file.
pub fn write_series_csv(path: &Path, series: &TimeSeries) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "indicator_code,label,year,value_numeric")
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for p in &series.points {
        writeln!(
            file,
            "{},{},{},{:.4}",
            series.indicator.code(),
            series.indicator.label(),
            p.year,
            p.value,
        )
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    Ok(())
}

/// Assemble the portable forecast representation.
pub fn forecast_file(series: &TimeSeries, forecast: &Forecast) -> Result<ForecastFile, AppError> {
    let observed_years = series
        .year_range()
        .ok_or_else(|| AppError::new(3, "Cannot export a forecast without observations."))?;

    Ok(ForecastFile {
        tool: "fid".to_string(),
        indicator: forecast.indicator,
        label: forecast.indicator.label().to_string(),
        observed_years,
        n_observations: series.len(),
        line: forecast.line,
        points: forecast.points.clone(),
    })
}

/// Write a forecast JSON file.
pub fn write_forecast_json(
    path: &Path,
    series: &TimeSeries,
    forecast: &Forecast,
) -> Result<(), AppError> {
    let out = forecast_file(series, forecast)?;

    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create forecast JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, &out)
        .map_err(|e| AppError::new(2, format!("Failed to write forecast JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Indicator, SeriesPoint, TARGET_YEARS};
    use crate::trend::project;

    fn demo_series() -> TimeSeries {
        TimeSeries {
            indicator: Indicator::DigitalPayment,
            points: vec![
                SeriesPoint { year: 2017, value: 11.9 },
                SeriesPoint { year: 2021, value: 20.3 },
            ],
        }
    }

    #[test]
    fn forecast_file_round_trips_through_json() {
        let series = demo_series();
        let forecast = project(&series, &TARGET_YEARS).unwrap();
        let out = forecast_file(&series, &forecast).unwrap();

        let json = serde_json::to_string(&out).unwrap();
        let back: ForecastFile = serde_json::from_str(&json).unwrap();

        assert_eq!(back.indicator, Indicator::DigitalPayment);
        assert_eq!(back.observed_years, (2017, 2021));
        assert_eq!(back.points.len(), TARGET_YEARS.len());
        assert!((back.line.slope - forecast.line.slope).abs() < 1e-12);
    }

    #[test]
    fn forecast_file_requires_observations() {
        let empty = TimeSeries {
            indicator: Indicator::MobileMoney,
            points: Vec::new(),
        };
        let series = demo_series();
        let forecast = project(&series, &TARGET_YEARS).unwrap();

        let err = forecast_file(&empty, &forecast).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}

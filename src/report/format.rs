//! Text rendering for overview, trends, forecasts, and the target projection.

use crate::app::pipeline::IndicatorView;
use crate::data::store::DatasetStats;
use crate::domain::{Observation, QueryError, NATIONAL_TARGET_PCT};

/// Substitute value shown wherever a number is unavailable.
pub const NOT_AVAILABLE: &str = "N/A";

/// One-line advisory for a failed query. Always user-facing language; the
/// precise error stays available via `Display` on `QueryError` for logs.
pub fn advisory(err: &QueryError) -> &'static str {
    match err {
        QueryError::InsufficientData { .. } => "Not enough data to forecast.",
        QueryError::DegenerateInput => "Observations span a single year; cannot fit a trend.",
        QueryError::InvalidValue { .. } => "Observation values are invalid; cannot fit a trend.",
        QueryError::MissingIndicator { .. } => "No observations for this indicator.",
    }
}

/// Format the overview page: one metric tile per indicator + latest table.
pub fn format_overview(views: &[IndicatorView], stats: &DatasetStats) -> String {
    let mut out = String::new();

    out.push_str("=== Financial Inclusion Overview ===\n");
    out.push_str(&format_dataset_line(stats));
    out.push('\n');

    for view in views {
        out.push_str(&format!(
            "{:<24} {}\n",
            format!("{} (%):", view.indicator.label()),
            fmt_latest(view.latest.as_ref()),
        ));
    }

    out.push_str("\nLatest Observations:\n");
    out.push_str(&format_latest_table(views));

    out
}

/// The latest-observations table on its own (the TUI embeds this directly).
pub fn format_latest_table(views: &[IndicatorView]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<24} {:>6} {:>8}\n", "indicator", "year", "value"));
    out.push_str(&format!("{:-<24} {:-<6} {:-<8}\n", "", "", ""));
    for view in views {
        match &view.latest {
            Some(obs) => out.push_str(&format!(
                "{:<24} {:>6} {:>8.1}\n",
                view.indicator.label(),
                obs.year,
                obs.value,
            )),
            None => out.push_str(&format!(
                "{:<24} {:>6} {:>8}\n",
                view.indicator.label(),
                "-",
                NOT_AVAILABLE,
            )),
        }
    }
    out
}

/// Format the historical series of one indicator as a year/value table.
pub fn format_series_table(view: &IndicatorView) -> String {
    let mut out = String::new();
    out.push_str(&format!("Historical Trend: {}\n", view.indicator.label()));

    if view.series.is_empty() {
        out.push_str(advisory(&QueryError::MissingIndicator {
            indicator: view.indicator,
        }));
        out.push('\n');
        return out;
    }

    out.push_str(&format!("{:>6} {:>8}\n", "year", "value"));
    out.push_str(&format!("{:->6} {:->8}\n", "", ""));
    for p in &view.series.points {
        out.push_str(&format!("{:>6} {:>8.1}\n", p.year, p.value));
    }

    out
}

/// Format the forecast page body: fitted line + per-year table, or advisory.
pub fn format_forecast(view: &IndicatorView) -> String {
    let mut out = String::new();
    out.push_str(&format!("Baseline Forecast: {}\n", view.indicator.label()));

    let forecast = match &view.forecast {
        Ok(f) => f,
        Err(err) => {
            out.push_str(advisory(err));
            out.push('\n');
            return out;
        }
    };

    if let Some((first, last)) = view.series.year_range() {
        out.push_str(&format!(
            "Fit: {} observations, {first}-{last} | slope: {:+.2} pp/yr\n",
            view.series.len(),
            forecast.line.slope,
        ));
    }

    out.push_str(&format!("{:>6} {:>10}\n", "year", "forecast"));
    out.push_str(&format!("{:->6} {:->10}\n", "", ""));
    for p in &forecast.points {
        out.push_str(&format!("{:>6} {:>10.1}\n", p.year, p.value));
    }

    out
}

/// Format the account-ownership projection against the national target.
pub fn format_projection(view: &IndicatorView) -> String {
    let mut out = String::new();
    out.push_str("Inclusion Target Projection: Account Ownership\n");

    let forecast = match &view.forecast {
        Ok(f) => f,
        Err(err) => {
            out.push_str(advisory(err));
            out.push('\n');
            return out;
        }
    };

    out.push_str(&format!(
        "{:>6} {:>10} {:>16}\n",
        "year", "forecast", "gap to target"
    ));
    out.push_str(&format!("{:->6} {:->10} {:->16}\n", "", "", ""));
    for p in &forecast.points {
        let gap = NATIONAL_TARGET_PCT - p.value;
        let gap_str = if gap <= 0.0 {
            "reached".to_string()
        } else {
            format!("{gap:.1} pp")
        };
        out.push_str(&format!("{:>6} {:>10.1} {:>16}\n", p.year, p.value, gap_str));
    }

    out.push_str(&format!(
        "\nProjected progress toward the {NATIONAL_TARGET_PCT:.0}% national financial-inclusion target.\n"
    ));

    out
}

fn format_dataset_line(stats: &DatasetStats) -> String {
    let years = match stats.year_range {
        Some((lo, hi)) => format!("{lo}-{hi}"),
        None => "-".to_string(),
    };
    format!(
        "Rows: {} read | {} dropped | {} observations | years {}\n",
        stats.rows_read, stats.rows_dropped, stats.n_observations, years,
    )
}

fn fmt_latest(latest: Option<&Observation>) -> String {
    match latest {
        Some(obs) => format!("{:.1}  ({})", obs.value, obs.year),
        None => NOT_AVAILABLE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::pipeline::view;
    use crate::data::store::Dataset;
    use crate::domain::Indicator;

    fn obs(indicator: Indicator, year: i32, value: f64) -> Observation {
        Observation {
            indicator,
            year,
            value,
        }
    }

    fn demo_dataset() -> Dataset {
        Dataset::from_observations(vec![
            obs(Indicator::AccountOwnership, 2014, 22.0),
            obs(Indicator::AccountOwnership, 2017, 35.0),
            obs(Indicator::AccountOwnership, 2021, 46.0),
            obs(Indicator::MobileMoney, 2021, 9.7),
        ])
    }

    #[test]
    fn overview_substitutes_na_for_absent_indicators() {
        let ds = demo_dataset();
        let views: Vec<_> = Indicator::ALL.iter().map(|&i| view(&ds, i)).collect();
        let text = format_overview(&views, &ds.stats());

        assert!(text.contains("Account Ownership"));
        assert!(text.contains("46.0"));
        // Digital payments has no rows: visible substitute, not an omission.
        assert!(text.contains(NOT_AVAILABLE));
    }

    #[test]
    fn forecast_renders_advisory_instead_of_failing() {
        let ds = demo_dataset();
        let v = view(&ds, Indicator::MobileMoney); // single observation
        let text = format_forecast(&v);
        assert!(text.contains("Not enough data to forecast."));
        assert!(!text.contains("2025"));
    }

    #[test]
    fn forecast_table_lists_target_years_in_order() {
        let ds = demo_dataset();
        let v = view(&ds, Indicator::AccountOwnership);
        let text = format_forecast(&v);

        let pos_2025 = text.find("2025").unwrap();
        let pos_2026 = text.find("2026").unwrap();
        let pos_2027 = text.find("2027").unwrap();
        assert!(pos_2025 < pos_2026 && pos_2026 < pos_2027);
    }

    #[test]
    fn projection_reports_gap_to_national_target() {
        let ds = demo_dataset();
        let v = view(&ds, Indicator::AccountOwnership);
        let text = format_projection(&v);
        assert!(text.contains("gap to target"));
        assert!(text.contains("60% national financial-inclusion target"));
    }

    #[test]
    fn series_table_for_absent_indicator_is_an_advisory() {
        let ds = demo_dataset();
        let v = view(&ds, Indicator::DigitalPayment);
        let text = format_series_table(&v);
        assert!(text.contains("No observations for this indicator."));
    }
}

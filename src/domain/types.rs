//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during querying and projection
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Record-type tag that marks an actual observation row in the dataset.
///
/// The enriched CSV interleaves observation rows with metadata rows
/// (source notes, survey descriptions); only observation rows ever reach
/// the queries.
pub const OBSERVATION_RECORD_TYPE: &str = "observation";

/// Forecast horizon. Fixed by the dashboard, not configurable.
pub const TARGET_YEARS: [i32; 3] = [2025, 2026, 2027];

/// National financial-inclusion target for account ownership (% of adults).
pub const NATIONAL_TARGET_PCT: f64 = 60.0;

/// The closed set of indicators the dashboard tracks.
///
/// Unknown `indicator_code` values are rejected at the filter boundary and
/// never reach queries or projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Indicator {
    /// Adults with an account at a financial institution or mobile-money provider.
    #[value(name = "account-ownership")]
    AccountOwnership,
    /// Adults with a registered mobile-money account.
    #[value(name = "mobile-money")]
    MobileMoney,
    /// Adults who made or received a digital payment in the past year.
    #[value(name = "digital-payment")]
    DigitalPayment,
}

impl Indicator {
    /// All catalog indicators, in display order.
    pub const ALL: [Indicator; 3] = [
        Indicator::AccountOwnership,
        Indicator::MobileMoney,
        Indicator::DigitalPayment,
    ];

    /// Dataset code as it appears in the `indicator_code` column.
    pub fn code(self) -> &'static str {
        match self {
            Indicator::AccountOwnership => "ACC_OWNERSHIP",
            Indicator::MobileMoney => "ACC_MM_ACCOUNT",
            Indicator::DigitalPayment => "USG_DIGITAL_PAYMENT",
        }
    }

    /// Human-readable label for tiles, tables, and chart titles.
    pub fn label(self) -> &'static str {
        match self {
            Indicator::AccountOwnership => "Account Ownership",
            Indicator::MobileMoney => "Mobile Money Accounts",
            Indicator::DigitalPayment => "Digital Payment Usage",
        }
    }

    /// CLI-facing name (what `--indicator` accepts).
    pub fn cli_name(self) -> &'static str {
        match self {
            Indicator::AccountOwnership => "account-ownership",
            Indicator::MobileMoney => "mobile-money",
            Indicator::DigitalPayment => "digital-payment",
        }
    }

    /// Resolve a dataset code to a catalog indicator.
    ///
    /// The mapping is exact (no case folding): the upstream pipeline emits
    /// canonical codes, and near-miss codes should be dropped, not guessed at.
    pub fn from_code(code: &str) -> Option<Indicator> {
        Indicator::ALL.into_iter().find(|i| i.code() == code)
    }
}

impl std::fmt::Display for Indicator {
    // Displays the CLI name so clap can round-trip `default_value_t`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.cli_name())
    }
}

/// One observation row after filtering and typing.
///
/// `year` is the calendar year extracted from `observation_date` during
/// ingest; `value` is the indicator level in percent of adults.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub indicator: Indicator,
    pub year: i32,
    pub value: f64,
}

/// A `(year, value)` pair inside a time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub year: i32,
    pub value: f64,
}

/// The observation history of a single indicator, sorted by year ascending.
///
/// Duplicate years are kept as-is (the dataset occasionally carries revised
/// and original rows for the same survey year); sorting is stable so equal
/// years preserve input order.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    pub indicator: Indicator,
    pub points: Vec<SeriesPoint>,
}

impl TimeSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Observed year range, `None` for an empty series.
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let first = self.points.first()?.year;
        let last = self.points.last()?.year;
        Some((first, last))
    }
}

/// A fitted straight line `value = slope * year + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
}

impl TrendLine {
    /// Evaluate the line at a calendar year.
    pub fn value_at(&self, year: i32) -> f64 {
        self.slope * year as f64 + self.intercept
    }
}

/// A projected value for one target year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub year: i32,
    pub value: f64,
}

/// Projection output: the fitted line plus one point per target year,
/// in the order the target years were supplied.
///
/// Forecasts are derived values: recomputed on every query, never cached,
/// and never written back into the dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub indicator: Indicator,
    pub line: TrendLine,
    pub points: Vec<ForecastPoint>,
}

/// Per-query failure taxonomy.
///
/// None of these terminate an interaction: the presentation layer converts
/// each into an advisory message or an "N/A" substitute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryError {
    /// Fewer than two observations; a line cannot be fit through one point.
    InsufficientData { points: usize },
    /// All observed years identical: the slope is underdetermined.
    DegenerateInput,
    /// A non-finite observed value reached the projector.
    InvalidValue { year: i32 },
    /// The requested indicator has no observations in the loaded dataset.
    MissingIndicator { indicator: Indicator },
}

impl std::fmt::Display for QueryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryError::InsufficientData { points } => {
                write!(f, "insufficient data: {points} observation(s), need at least 2")
            }
            QueryError::DegenerateInput => {
                write!(f, "degenerate input: all observations share one year")
            }
            QueryError::InvalidValue { year } => {
                write!(f, "non-finite observation value for year {year}")
            }
            QueryError::MissingIndicator { indicator } => {
                write!(f, "no observations for indicator {}", indicator.code())
            }
        }
    }
}

impl std::error::Error for QueryError {}

/// Resolved run configuration shared by every subcommand and the TUI.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    /// Path to the enriched dataset CSV.
    pub data_path: PathBuf,
}

/// A portable forecast file (JSON).
///
/// The "downloadable" counterpart of the forecast view: enough to replot the
/// fitted line elsewhere without access to the source dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastFile {
    pub tool: String,
    pub indicator: Indicator,
    pub label: String,
    /// Observed year range the line was fit on.
    pub observed_years: (i32, i32),
    pub n_observations: usize,
    pub line: TrendLine,
    pub points: Vec<ForecastPoint>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_codes_round_trip() {
        for ind in Indicator::ALL {
            assert_eq!(Indicator::from_code(ind.code()), Some(ind));
        }
        assert_eq!(Indicator::from_code("USG_SAVINGS"), None);
        // Exact matching only: no case folding at this boundary.
        assert_eq!(Indicator::from_code("acc_ownership"), None);
    }

    #[test]
    fn trend_line_evaluates_at_year() {
        let line = TrendLine {
            slope: 2.0,
            intercept: -4000.0,
        };
        assert!((line.value_at(2020) - 40.0).abs() < 1e-12);
    }
}

//! The cached in-memory table.
//!
//! `Dataset` is the "load once, read many" handle: it is built exactly once
//! per process (an explicit initialization step, no ambient global), held
//! immutably, and passed by reference to every query. Series and latest
//! lookups are derived on each call; nothing here mutates after `load`.

use std::path::Path;

use crate::data::filter::{filter_rows, to_observations};
use crate::domain::{
    Indicator, Observation, QueryConfig, QueryError, SeriesPoint, TimeSeries,
    OBSERVATION_RECORD_TYPE,
};
use crate::error::AppError;
use crate::io::ingest::{self, RowError};

/// Summary stats about the loaded table (for headers and reports).
#[derive(Debug, Clone)]
pub struct DatasetStats {
    /// Data rows read from the CSV (before any filtering).
    pub rows_read: usize,
    /// Rows dropped during ingest (bad dates/values), with diagnostics kept.
    pub rows_dropped: usize,
    /// Typed observations surviving the record-type + catalog filter.
    pub n_observations: usize,
    /// Observed year range across all indicators, `None` when empty.
    pub year_range: Option<(i32, i32)>,
}

/// The immutable observation table plus load diagnostics.
#[derive(Debug, Clone)]
pub struct Dataset {
    observations: Vec<Observation>,
    row_errors: Vec<RowError>,
    rows_read: usize,
}

impl Dataset {
    /// Load, filter, and type the dataset once.
    ///
    /// An empty result (no catalog observations) is valid: the dashboard
    /// renders "N/A" tiles and advisories instead of failing the load.
    pub fn load(config: &QueryConfig) -> Result<Self, AppError> {
        Self::load_from(&config.data_path)
    }

    pub fn load_from(path: &Path) -> Result<Self, AppError> {
        let ingested = ingest::load_rows(path)?;
        let kept = filter_rows(&ingested.rows, OBSERVATION_RECORD_TYPE);
        Ok(Self {
            observations: to_observations(&kept),
            row_errors: ingested.row_errors,
            rows_read: ingested.rows_read,
        })
    }

    /// Build a dataset directly from typed observations (tests, sample data).
    pub fn from_observations(observations: Vec<Observation>) -> Self {
        let rows_read = observations.len();
        Self {
            observations,
            row_errors: Vec::new(),
            rows_read,
        }
    }

    pub fn observations(&self) -> &[Observation] {
        &self.observations
    }

    pub fn row_errors(&self) -> &[RowError] {
        &self.row_errors
    }

    pub fn stats(&self) -> DatasetStats {
        let mut year_range: Option<(i32, i32)> = None;
        for obs in &self.observations {
            year_range = Some(match year_range {
                None => (obs.year, obs.year),
                Some((lo, hi)) => (lo.min(obs.year), hi.max(obs.year)),
            });
        }
        DatasetStats {
            rows_read: self.rows_read,
            rows_dropped: self.row_errors.len(),
            n_observations: self.observations.len(),
            year_range,
        }
    }

    /// All observations for one indicator, sorted by year ascending.
    ///
    /// The sort is stable: duplicate years keep their input order (they are
    /// not deduplicated here or anywhere else).
    pub fn series(&self, indicator: Indicator) -> TimeSeries {
        let mut points: Vec<SeriesPoint> = self
            .observations
            .iter()
            .filter(|o| o.indicator == indicator)
            .map(|o| SeriesPoint {
                year: o.year,
                value: o.value,
            })
            .collect();
        points.sort_by_key(|p| p.year);
        TimeSeries { indicator, points }
    }

    /// The observation with the maximum year for one indicator.
    ///
    /// Tie-break policy: when several rows share the maximum year, the one
    /// with the highest input-row index wins. This is a deliberate, stable
    /// policy (the upstream export appends revisions after originals), not an
    /// accident of sort order.
    pub fn latest(&self, indicator: Indicator) -> Result<Observation, QueryError> {
        let mut best: Option<Observation> = None;
        for obs in self.observations.iter().filter(|o| o.indicator == indicator) {
            match best {
                // `>=` so a later row replaces an earlier one on equal years.
                Some(b) if obs.year >= b.year => best = Some(*obs),
                Some(_) => {}
                None => best = Some(*obs),
            }
        }
        best.ok_or(QueryError::MissingIndicator { indicator })
    }

    /// Latest observation per catalog indicator; absent ones are `None`.
    pub fn latest_all(&self) -> Vec<(Indicator, Option<Observation>)> {
        Indicator::ALL
            .into_iter()
            .map(|ind| (ind, self.latest(ind).ok()))
            .collect()
    }
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
    fn latest_picks_maximum_year() {
        let ds = Dataset::from_observations(vec![
            obs(Indicator::AccountOwnership, 2019, 40.0),
            obs(Indicator::AccountOwnership, 2021, 55.0),
            obs(Indicator::AccountOwnership, 2020, 50.0),
        ]);

        let latest = ds.latest(Indicator::AccountOwnership).unwrap();
        assert_eq!(latest.year, 2021);
        assert!((latest.value - 55.0).abs() < 1e-12);
    }

    #[test]
    fn latest_tie_breaks_to_highest_row_index() {
        let ds = Dataset::from_observations(vec![
            obs(Indicator::MobileMoney, 2021, 9.0),
            obs(Indicator::MobileMoney, 2021, 9.7),
        ]);

        let latest = ds.latest(Indicator::MobileMoney).unwrap();
        assert!((latest.value - 9.7).abs() < 1e-12);
    }

    #[test]
    fn latest_on_absent_indicator_is_missing_indicator() {
        let ds = Dataset::from_observations(vec![obs(Indicator::AccountOwnership, 2021, 46.2)]);
        assert_eq!(
            ds.latest(Indicator::DigitalPayment),
            Err(QueryError::MissingIndicator {
                indicator: Indicator::DigitalPayment
            })
        );
    }

    #[test]
    fn series_is_sorted_ascending_and_keeps_duplicate_years() {
        let ds = Dataset::from_observations(vec![
            obs(Indicator::DigitalPayment, 2021, 20.3),
            obs(Indicator::DigitalPayment, 2017, 11.9),
            obs(Indicator::DigitalPayment, 2021, 20.5),
            obs(Indicator::DigitalPayment, 2014, 5.8),
        ]);

        let series = ds.series(Indicator::DigitalPayment);
        let years: Vec<i32> = series.points.iter().map(|p| p.year).collect();
        assert_eq!(years, vec![2014, 2017, 2021, 2021]);
        // Stable sort: the two 2021 rows keep input order.
        assert!((series.points[2].value - 20.3).abs() < 1e-12);
        assert!((series.points[3].value - 20.5).abs() < 1e-12);
    }

    #[test]
    fn stats_cover_year_range_and_counts() {
        let ds = Dataset::from_observations(vec![
            obs(Indicator::AccountOwnership, 2014, 22.0),
            obs(Indicator::MobileMoney, 2021, 9.7),
        ]);
        let stats = ds.stats();
        assert_eq!(stats.n_observations, 2);
        assert_eq!(stats.year_range, Some((2014, 2021)));
    }

    #[test]
    fn empty_dataset_is_valid() {
        let ds = Dataset::from_observations(Vec::new());
        assert!(ds.observations().is_empty());
        assert_eq!(ds.stats().year_range, None);
        assert!(ds.latest_all().iter().all(|(_, latest)| latest.is_none()));
    }
}

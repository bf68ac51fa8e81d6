//! Row filtering: record-type tag + closed indicator allow-list.
//!
//! The filter is a pure function over raw rows with no side effects. It is
//! deliberately idempotent: filtering an already-filtered slice returns the
//! same rows, which keeps callers free to compose it without bookkeeping.

use crate::domain::{Indicator, Observation};
use crate::io::ingest::RawRow;

/// Keep only rows whose `record_type` matches `record_type` exactly and whose
/// `indicator_code` belongs to the catalog.
///
/// Zero matching rows is a valid result; callers render "N/A"/advisories for
/// whatever is absent rather than treating emptiness as an error.
pub fn filter_rows(rows: &[RawRow], record_type: &str) -> Vec<RawRow> {
    rows.iter()
        .filter(|r| r.record_type == record_type && Indicator::from_code(&r.indicator_code).is_some())
        .cloned()
        .collect()
}

/// Convert filtered rows into typed observations, preserving input order.
///
/// Rows with codes outside the catalog are skipped (a no-op after
/// `filter_rows`, but this function does not assume its input was filtered).
pub fn to_observations(rows: &[RawRow]) -> Vec<Observation> {
    rows.iter()
        .filter_map(|r| {
            let indicator = Indicator::from_code(&r.indicator_code)?;
            Some(Observation {
                indicator,
                year: r.year,
                value: r.value,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OBSERVATION_RECORD_TYPE;

    fn row(line: usize, record_type: &str, code: &str, year: i32, value: f64) -> RawRow {
        RawRow {
            line,
            record_type: record_type.to_string(),
            indicator_code: code.to_string(),
            year,
            value,
        }
    }

    #[test]
    fn keeps_only_rows_matching_both_constraints() {
        let rows = vec![
            row(2, "observation", "ACC_OWNERSHIP", 2021, 46.2),
            row(3, "metadata", "ACC_OWNERSHIP", 2021, 0.0),
            row(4, "observation", "USG_SAVINGS", 2021, 12.0),
            row(5, "observation", "ACC_MM_ACCOUNT", 2021, 9.7),
            row(6, "metadata", "USG_SAVINGS", 2021, 0.0),
        ];

        let kept = filter_rows(&rows, OBSERVATION_RECORD_TYPE);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].indicator_code, "ACC_OWNERSHIP");
        assert_eq!(kept[1].indicator_code, "ACC_MM_ACCOUNT");
    }

    #[test]
    fn filtering_twice_equals_filtering_once() {
        let rows = vec![
            row(2, "observation", "ACC_OWNERSHIP", 2021, 46.2),
            row(3, "metadata", "ACC_OWNERSHIP", 2021, 0.0),
            row(4, "observation", "USG_DIGITAL_PAYMENT", 2021, 20.3),
        ];

        let once = filter_rows(&rows, OBSERVATION_RECORD_TYPE);
        let twice = filter_rows(&once, OBSERVATION_RECORD_TYPE);
        assert_eq!(once, twice);
    }

    #[test]
    fn zero_matching_rows_is_a_valid_empty_result() {
        let rows = vec![row(2, "metadata", "ACC_OWNERSHIP", 2021, 0.0)];
        assert!(filter_rows(&rows, OBSERVATION_RECORD_TYPE).is_empty());
        assert!(filter_rows(&[], OBSERVATION_RECORD_TYPE).is_empty());
    }

    #[test]
    fn typed_conversion_preserves_order_and_values() {
        let rows = vec![
            row(2, "observation", "ACC_MM_ACCOUNT", 2017, 5.5),
            row(3, "observation", "ACC_OWNERSHIP", 2021, 46.2),
        ];
        let obs = to_observations(&rows);
        assert_eq!(obs.len(), 2);
        assert_eq!(obs[0].indicator, Indicator::MobileMoney);
        assert_eq!(obs[0].year, 2017);
        assert_eq!(obs[1].indicator, Indicator::AccountOwnership);
        assert!((obs[1].value - 46.2).abs() < 1e-12);
    }
}

//! CSV ingest for the enriched financial-inclusion dataset.
//!
//! This module turns the upstream pipeline's CSV into raw rows that are safe
//! to filter and query.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Row-level tolerance**: a bad date or value drops that row with a
//!   recorded diagnostic, it never fails the load
//! - **Deterministic behavior** (no hidden randomness)
//! - **Separation of concerns**: no filtering or fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{Datelike, NaiveDate};
use csv::StringRecord;

use crate::error::AppError;

/// One raw dataset row with the date already reduced to a calendar year.
///
/// `record_type` and `indicator_code` are kept as strings: the allow-list
/// filter is a separate, explicitly tested step (`data::filter`).
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based CSV line the row came from (for diagnostics).
    pub line: usize,
    pub record_type: String,
    pub indicator_code: String,
    pub year: i32,
    pub value: f64,
}

/// A row-level problem encountered during ingest. The row is dropped.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: surviving raw rows + diagnostics + row counts.
#[derive(Debug, Clone)]
pub struct IngestOutput {
    pub rows: Vec<RawRow>,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
}

/// Load raw rows from a dataset CSV on disk.
pub fn load_rows(path: &Path) -> Result<IngestOutput, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open dataset '{}': {e}", path.display()))
    })?;
    read_rows(file)
}

/// Load raw rows from any reader (tests feed in-memory CSV through this).
pub fn read_rows<R: Read>(reader: R) -> Result<IngestOutput, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?
        .clone();

    let header_map = build_header_map(&headers);
    ensure_required_columns_exist(&header_map)?;

    let mut rows = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(line, &record, &header_map) {
            Ok(row) => rows.push(row),
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    Ok(IngestOutput {
        rows,
        row_errors,
        rows_read,
    })
}

const REQUIRED_COLUMNS: [&str; 4] = [
    "record_type",
    "observation_date",
    "indicator_code",
    "value_numeric",
];

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿record_type"). If we don't strip it, schema
    // validation will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn ensure_required_columns_exist(header_map: &HashMap<String, usize>) -> Result<(), AppError> {
    for name in REQUIRED_COLUMNS {
        if !header_map.contains_key(name) {
            return Err(AppError::new(2, format!("Missing required column: `{name}`")));
        }
    }
    Ok(())
}

fn parse_row(
    line: usize,
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
) -> Result<RawRow, String> {
    let record_type = get_required(record, header_map, "record_type")?.to_string();
    let indicator_code = get_required(record, header_map, "indicator_code")?.to_string();

    let date_str = get_required(record, header_map, "observation_date")?;
    let year = parse_year(date_str)?;

    let value_str = get_required(record, header_map, "value_numeric")?;
    let value = value_str
        .parse::<f64>()
        .map_err(|_| format!("Invalid `value_numeric` '{value_str}'."))?;
    if !value.is_finite() {
        return Err(format!("Non-finite `value_numeric` '{value_str}'."));
    }

    Ok(RawRow {
        line,
        record_type,
        indicator_code,
        year,
        value,
    })
}

fn get_required<'a>(
    record: &'a StringRecord,
    header_map: &HashMap<String, usize>,
    name: &str,
) -> Result<&'a str, String> {
    let idx = header_map
        .get(name)
        .ok_or_else(|| format!("Missing required column: `{name}`"))?;
    record
        .get(*idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| format!("Missing required value: `{name}`"))
}

fn parse_year(s: &str) -> Result<i32, String> {
    // The upstream pipeline emits ISO dates (`YYYY-MM-DD`), but enrichment
    // sources occasionally contribute `DD/MM/YYYY` or `DD-MM-YYYY`. We accept
    // a small set of common formats to reduce friction while keeping parsing
    // deterministic; anything else drops the row.
    const FMTS: [&str; 4] = ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d.year());
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: YYYY-MM-DD, DD/MM/YYYY, DD-MM-YYYY, YYYY/MM/DD."
    ))
}

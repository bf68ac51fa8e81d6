//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the closed indicator catalog (`Indicator`)
//! - typed observations and derived series (`Observation`, `TimeSeries`)
//! - trend-projection outputs (`TrendLine`, `Forecast`)
//! - the per-query error taxonomy (`QueryError`)

pub mod types;

pub use types::*;

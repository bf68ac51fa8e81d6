//! Input/output helpers.
//!
//! - CSV ingest + row-level diagnostics (`ingest`)
//! - series re-export (CSV) and forecast export (JSON) (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;

//! Dataset access: filtering, the cached in-memory table, sample generation.
//!
//! - `filter`: record-type + indicator allow-list filtering (pure, idempotent)
//! - `store`: the immutable `Dataset` handle ("load once, read many")
//! - `sample`: deterministic synthetic dataset generation for demos/tests

pub mod filter;
pub mod sample;
pub mod store;

pub use filter::*;
pub use sample::*;
pub use store::*;

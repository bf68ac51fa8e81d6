//! Reporting: formatted terminal output and advisory conversion.
//!
//! We keep formatting code in one place so:
//! - the query/projection code stays clean and testable
//! - output changes are localized (important for future snapshot tests)
//!
//! This is also the boundary where `QueryError` stops propagating: every
//! variant maps to a user-visible advisory or an "N/A" substitute, and no
//! failure here ever terminates the interaction.

pub mod format;

pub use format::*;

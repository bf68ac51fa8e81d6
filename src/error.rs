//! Process-level error type.
//!
//! `AppError` carries the exit code the binary should terminate with:
//!
//! - 2: input/configuration problems (missing file, malformed CSV, bad flags)
//! - 3: no usable data for the requested operation
//! - 4: internal/terminal failures (TUI init, write errors)
//!
//! Per-query failures (e.g. "not enough data to forecast") are NOT `AppError`s;
//! they live in [`crate::domain::QueryError`] and surface as advisory text.

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

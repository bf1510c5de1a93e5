//! Error types for size-report-core

use thiserror::Error;

/// Result type alias for size-report-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while turning raw input into a report
#[derive(Error, Debug)]
pub enum Error {
    /// The measurement payload is not well-formed JSON of the expected shape
    #[error("Failed to parse size-limit output: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid size margin: {0}. Must be a number, with or without a % sign, or \"non-zero\"")]
    InvalidMargin(String),
}

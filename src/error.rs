//! Error types for agi-session.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for all session operations.
#[derive(Debug, Error)]
pub enum AgiError {
    /// I/O error while reading the preamble or writing directives.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error (audit log rendering).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The durable log destination could not be prepared.
    #[error("cannot prepare log destination {}: {source}", path.display())]
    LogSetup {
        /// Directory or file that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using AgiError.
pub type Result<T> = std::result::Result<T, AgiError>;

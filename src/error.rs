//! Error types for the payslip name library.
//!
//! Only genuine failures live here: unreadable or unparsable configuration,
//! an unusable employee directory, or a failing page source. Pages without a
//! name and names without a directory match are ordinary data, reported
//! through [`MatchStatus`](crate::directory::MatchStatus), never as errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for library operations.
pub type HoleriteResult<T> = Result<T, HoleriteError>;

/// Error type for all fallible library operations.
#[derive(Debug, Error)]
pub enum HoleriteError {
    /// Error occurred while reading a file
    #[error("IO error for path '{}': {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    /// JSON document could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration data is present but unusable
    #[error("Invalid configuration '{field}': {reason}")]
    Config { field: String, reason: String },

    /// Directory source has the wrong shape (missing columns, bad rows)
    #[error("Directory load failed: {reason}")]
    DirectoryLoad { reason: String },

    /// Directory contained no usable employee after filtering
    #[error("Directory has no valid employees ({dropped} malformed entries dropped)")]
    EmptyDirectory { dropped: usize },

    /// Page text could not be obtained from the collaborator
    #[error("Page source error on page {page}: {reason}")]
    PageSource { page: usize, reason: String },

    /// Invalid parameter passed to the library
    #[error("Invalid input for '{parameter}': {reason}")]
    InvalidInput { parameter: String, reason: String },
}

impl HoleriteError {
    /// Wraps an IO error with the path that caused it.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for errors that abort a whole batch.
    pub fn is_fatal_for_batch(&self) -> bool {
        matches!(
            self,
            Self::DirectoryLoad { .. } | Self::EmptyDirectory { .. } | Self::Json(_) | Self::Io { .. }
        )
    }
}

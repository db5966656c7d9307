use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Result type for top-level import operations.
pub type Result<T> = std::result::Result<T, ImportError>;

/// Top-level failures of the import pipeline.
///
/// Only precondition failures and failures on the destination root surface
/// here. Per-file problems are collected as [`crate::models::Notice`] values.
#[derive(Debug, Error)]
pub enum ImportError {
    /// A required path does not exist.
    #[error("path not found: {}", .path.display())]
    NotFound { path: PathBuf },

    /// The destination is already occupied.
    #[error("destination already exists: {}", .path.display())]
    AlreadyExists { path: PathBuf },

    /// The request failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        field: &'static str,
        reason: &'static str,
    },

    /// Filesystem failure wrapping the underlying OS error.
    #[error("failed to {operation} {}", .path.display())]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ImportError {
    pub(crate) fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub(crate) fn already_exists(path: impl Into<PathBuf>) -> Self {
        Self::AlreadyExists { path: path.into() }
    }

    pub(crate) fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::InvalidInput { field, reason }
    }

    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

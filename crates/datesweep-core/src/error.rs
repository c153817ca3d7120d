//! Error types for the scan, transfer and report engines.
//!
//! Per-entry problems during a scan are never surfaced here; they are
//! counted and skipped. These enums describe failures the caller has to
//! act on.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that stop a scan before (or instead of) producing an outcome.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The scan root does not exist or is not a directory.
    #[error("scan root is not a readable directory: {0}")]
    InvalidRoot(PathBuf),

    /// The requested date range is empty or cannot be expressed in local time.
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    /// Cancellation was requested through the scan handle.
    #[error("scan was cancelled")]
    Cancelled,

    /// The background scan thread could not be started.
    #[error("failed to spawn scanner thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The scanner thread went away without reporting a result.
    #[error("scanner thread ended without a result")]
    Disconnected,
}

/// Failure of a single copy, move or delete.
#[derive(Debug, Error)]
pub enum TransferError {
    /// The source path does not exist at call time.
    #[error("source file does not exist: {0}")]
    SourceMissing(PathBuf),

    /// Any other filesystem error, tagged with the path being worked on.
    #[error("I/O error for path {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The item could not be expressed relative to the batch source root
    /// (for example it lives on another drive).
    #[error("cannot express {path} relative to {root}")]
    Relativize { path: PathBuf, root: PathBuf },
}

impl TransferError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// `true` when the failure was caused by a path that does not exist.
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::SourceMissing(_) => true,
            Self::Io { source, .. } => source.kind() == std::io::ErrorKind::NotFound,
            Self::Relativize { .. } => false,
        }
    }
}

/// Failure while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error writing report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing to a caller-provided sink failed.
    #[error("report write failed: {0}")]
    Write(#[from] std::io::Error),
}

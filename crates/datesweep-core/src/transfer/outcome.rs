//! Per-item results and batch accounting.

use crate::error::TransferError;
use std::path::PathBuf;

/// What happened to one item of a copy, move or delete.
#[derive(Debug)]
pub enum ItemOutcome {
    /// The operation completed.
    Done,
    /// Source and destination are the same file; nothing was touched.
    SameLocation,
    /// The operation failed. For a move, the copy may already exist at the
    /// destination; it is not rolled back.
    Failed(TransferError),
}

impl ItemOutcome {
    #[inline]
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done)
    }

    #[inline]
    pub fn is_same_location(&self) -> bool {
        matches!(self, Self::SameLocation)
    }

    pub fn error(&self) -> Option<&TransferError> {
        match self {
            Self::Failed(err) => Some(err),
            _ => None,
        }
    }
}

/// Tally of a batch operation.
///
/// Same-location items count as neither success nor error.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub success_count: usize,
    pub error_count: usize,
    pub skipped_count: usize,
    /// Original paths (as passed in) whose operation fully succeeded.
    pub succeeded: Vec<PathBuf>,
    /// Failed items with their reasons.
    pub failures: Vec<(PathBuf, TransferError)>,
}

impl BatchReport {
    pub(crate) fn record(&mut self, path: PathBuf, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Done => {
                self.success_count += 1;
                self.succeeded.push(path);
            }
            ItemOutcome::SameLocation => self.skipped_count += 1,
            ItemOutcome::Failed(err) => {
                self.error_count += 1;
                self.failures.push((path, err));
            }
        }
    }

    /// `(success_count, error_count)`.
    pub fn counts(&self) -> (usize, usize) {
        (self.success_count, self.error_count)
    }

    /// `true` if nothing was attempted, skipped or failed.
    pub fn is_empty(&self) -> bool {
        self.success_count == 0 && self.error_count == 0 && self.skipped_count == 0
    }
}

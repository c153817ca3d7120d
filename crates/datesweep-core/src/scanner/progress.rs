//! Scan progress reporting — lightweight messages sent from the scan
//! thread to the caller via a crossbeam channel.

use super::ScanOutcome;
use crate::error::ScanError;

/// Progress updates sent from the scan thread.
#[derive(Debug)]
pub enum ScanProgress {
    /// Periodic update with running totals.
    Update {
        files_matched: u64,
        dirs_visited: u64,
        total_size: u64,
        current_path: String,
    },
    /// An entry could not be read and was left out (e.g. permission denied).
    Skipped { path: String, message: String },
    /// Scanning completed; carries the full result.
    Complete(Box<ScanOutcome>),
    /// The scan could not run at all (bad root, bad range).
    Failed(ScanError),
    /// Scan was cancelled by the caller.
    Cancelled,
}

//! Scanner module — finds files by date range and extension.
//!
//! [`scan`] is the plain synchronous entry point: one pass over the tree,
//! one thread, returning a fresh [`ScanOutcome`]. [`start_scan`] runs the
//! same walk on a background thread and streams [`ScanProgress`] messages
//! so a UI can stay responsive and request cancellation.
pub mod filter;
pub mod progress;
pub mod walk;

pub use filter::{parse_day, DateRange, ExtensionFilter, DAY_FORMAT};
pub use progress::ScanProgress;

use crate::error::ScanError;
use crate::model::{DirectoryIndex, MatchedFile};
use crate::platform::absolutize;
use crossbeam_channel::{Receiver, Sender};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::warn;

/// Maximum number of progress messages that may queue up in the channel.
///
/// If the receiver falls behind, the scanner blocks on `send` rather than
/// consuming unbounded heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// What to scan and how to filter it.
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Directory to walk. Made absolute and normalized before use.
    pub root: PathBuf,
    pub range: DateRange,
    pub extensions: ExtensionFilter,
}

impl ScanRequest {
    pub fn new(root: impl Into<PathBuf>, range: DateRange, extensions: ExtensionFilter) -> Self {
        Self {
            root: root.into(),
            range,
            extensions,
        }
    }
}

/// Aggregates over a list of matches.
///
/// Always recomputed from the list; never maintained incrementally.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub file_count: usize,
    pub total_size: u64,
    pub has_system_file: bool,
}

impl ScanSummary {
    pub fn from_matches(matches: &[MatchedFile]) -> Self {
        Self {
            file_count: matches.len(),
            total_size: matches.iter().map(|m| m.size).sum(),
            has_system_file: matches.iter().any(|m| m.is_system),
        }
    }
}

/// Everything a scan produces.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// The normalized scan root all result paths derive from.
    pub root: PathBuf,
    /// Matched files grouped by directory.
    pub index: DirectoryIndex,
    /// Every matched file, in discovery order.
    pub matches: Vec<MatchedFile>,
    pub summary: ScanSummary,
    pub dirs_visited: u64,
    /// Entries left out because they could not be read.
    pub skipped: u64,
    pub duration: Duration,
}

/// Scan synchronously.
pub fn scan(request: &ScanRequest) -> Result<ScanOutcome, ScanError> {
    scan_with(request, None, None)
}

/// Scan synchronously, optionally reporting progress and honouring a
/// cancellation flag checked between entries.
pub fn scan_with(
    request: &ScanRequest,
    progress: Option<&Sender<ScanProgress>>,
    cancel: Option<&AtomicBool>,
) -> Result<ScanOutcome, ScanError> {
    let root = absolutize(&request.root).map_err(|_| ScanError::InvalidRoot(request.root.clone()))?;
    if !root.is_dir() {
        warn!("Scan root {} is not a directory", root.display());
        return Err(ScanError::InvalidRoot(root));
    }
    walk::walk_and_filter(root, request, progress, cancel)
}

/// Handle to a running or completed background scan.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan thread.
    pub progress_rx: Receiver<ScanProgress>,
    cancel_flag: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Request the scan to stop as soon as possible.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Block until the scan finishes, discarding intermediate progress.
    pub fn wait(mut self) -> Result<ScanOutcome, ScanError> {
        let result = loop {
            match self.progress_rx.recv() {
                Ok(ScanProgress::Complete(outcome)) => break Ok(*outcome),
                Ok(ScanProgress::Failed(err)) => break Err(err),
                Ok(ScanProgress::Cancelled) => break Err(ScanError::Cancelled),
                Ok(_) => continue,
                Err(_) => break Err(ScanError::Disconnected),
            }
        };
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        result
    }
}

/// Start a scan on a background thread.
pub fn start_scan(request: ScanRequest) -> Result<ScanHandle, ScanError> {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let thread = thread::Builder::new()
        .name("datesweep-scanner".into())
        .spawn(move || {
            let message = match scan_with(&request, Some(&progress_tx), Some(&cancel_clone)) {
                Ok(outcome) => ScanProgress::Complete(Box::new(outcome)),
                Err(ScanError::Cancelled) => ScanProgress::Cancelled,
                Err(err) => ScanProgress::Failed(err),
            };
            let _ = progress_tx.send(message);
        })
        .map_err(ScanError::Spawn)?;

    Ok(ScanHandle {
        progress_rx,
        cancel_flag,
        thread: Some(thread),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    #[test]
    fn summary_recomputes_from_list() {
        let now = Local::now();
        let matches = vec![
            MatchedFile::new(PathBuf::from("/x/a"), 100, now, false),
            MatchedFile::new(PathBuf::from("/x/b.dll"), 50, now, true),
        ];
        let summary = ScanSummary::from_matches(&matches);
        assert_eq!(summary.file_count, 2);
        assert_eq!(summary.total_size, 150);
        assert!(summary.has_system_file);

        assert_eq!(ScanSummary::from_matches(&[]), ScanSummary::default());
    }
}

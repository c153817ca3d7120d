//! Single-threaded directory walk with date and extension filtering.
//!
//! Uses `jwalk` in serial mode: every directory under the root is visited
//! once, symlinks are not followed. Files are filtered by extension first
//! (cheap, no syscall) and only then stat-ed for their timestamp. Each
//! visited directory also has its own timestamp checked so that folders
//! touched inside the window show up even when empty.
//!
//! Entries that vanish or cannot be read between listing and stat are
//! counted and skipped; they never abort the walk.

use super::filter::DateRange;
use super::progress::ScanProgress;
use super::{ScanOutcome, ScanRequest, ScanSummary};
use crate::error::ScanError;
use crate::model::{extension_of, DirectoryIndex, MatchedFile};
use crate::platform::is_system_sensitive;
use chrono::{DateTime, Local};
use crossbeam_channel::Sender;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tracing::{debug, info};

/// Entries between two `ScanProgress::Update` messages.
pub const PROGRESS_EVERY: u64 = 500;

/// One directory seen during the walk, with the files that survived the
/// filters.
struct DirVisit {
    path: PathBuf,
    in_range: bool,
    files: Vec<MatchedFile>,
}

/// Running state of a walk.
struct Walk<'a> {
    range: DateRange,
    progress: Option<&'a Sender<ScanProgress>>,
    visits: Vec<DirVisit>,
    visit_map: HashMap<PathBuf, usize>,
    matches: Vec<MatchedFile>,
    total_size: u64,
    dirs_visited: u64,
    skipped: u64,
}

impl<'a> Walk<'a> {
    fn new(range: DateRange, progress: Option<&'a Sender<ScanProgress>>) -> Self {
        Self {
            range,
            progress,
            visits: Vec::new(),
            visit_map: HashMap::new(),
            matches: Vec::new(),
            total_size: 0,
            dirs_visited: 0,
            skipped: 0,
        }
    }

    fn send(&self, message: ScanProgress) {
        if let Some(tx) = self.progress {
            let _ = tx.send(message);
        }
    }

    fn skip(&mut self, path: &Path, message: String) {
        self.skipped += 1;
        debug!("Skipping {}: {message}", path.display());
        self.send(ScanProgress::Skipped {
            path: path.to_string_lossy().into_owned(),
            message,
        });
    }

    /// Index of the visit record for `dir`, creating an out-of-range record
    /// if the directory has not been seen yet.
    fn visit_slot(&mut self, dir: &Path) -> usize {
        if let Some(&slot) = self.visit_map.get(dir) {
            return slot;
        }
        let slot = self.visits.len();
        self.visits.push(DirVisit {
            path: dir.to_path_buf(),
            in_range: false,
            files: Vec::new(),
        });
        self.visit_map.insert(dir.to_path_buf(), slot);
        slot
    }

    fn record_dir(&mut self, path: &Path) {
        self.dirs_visited += 1;
        let in_range = match fs::metadata(path).and_then(|m| m.modified()) {
            Ok(modified) => self.range.contains_system_time(modified),
            Err(err) => {
                self.skip(path, format!("{err}"));
                false
            }
        };
        let slot = self.visit_slot(path);
        self.visits[slot].in_range |= in_range;
    }

    fn record_file(&mut self, path: PathBuf) {
        // `fs::metadata` follows symlinks, like a plain stat would.
        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(err) => {
                self.skip(&path, format!("{err}"));
                return;
            }
        };
        if meta.is_dir() {
            // Symlink to a directory; not descended, not a file.
            return;
        }
        let modified = match meta.modified() {
            Ok(t) => t,
            Err(err) => {
                self.skip(&path, format!("{err}"));
                return;
            }
        };
        if !self.range.contains_system_time(modified) {
            return;
        }

        let is_system = is_system_sensitive(&path, &extension_of(&path));
        let file = MatchedFile::new(
            path,
            meta.len(),
            DateTime::<Local>::from(modified),
            is_system,
        );

        if let Some(parent) = file.path.parent() {
            let slot = self.visit_slot(parent);
            self.visits[slot].files.push(file.clone());
        }
        self.total_size += file.size;
        self.matches.push(file);
    }

    /// Turn the visit records into the directory index.
    fn build_index(visits: Vec<DirVisit>, root: &Path) -> DirectoryIndex {
        let mut index = DirectoryIndex::new();
        for visit in visits {
            if visit.files.is_empty() && !visit.in_range {
                continue;
            }
            let Ok(rel) = visit.path.strip_prefix(root) else {
                continue;
            };
            let components: Vec<String> = rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            index.insert_dir(components, visit.in_range, visit.files);
        }
        index
    }
}

/// Walk `root` (already absolute and normalized) and apply the filters of
/// `request`.
pub(crate) fn walk_and_filter(
    root: PathBuf,
    request: &ScanRequest,
    progress: Option<&Sender<ScanProgress>>,
    cancel: Option<&AtomicBool>,
) -> Result<ScanOutcome, ScanError> {
    let start = Instant::now();
    let is_cancelled = || cancel.is_some_and(|flag| flag.load(Ordering::Relaxed));

    info!(
        "Scanning {} for files modified {} .. {}",
        root.display(),
        request.range.start(),
        request.range.end()
    );

    let mut walk = Walk::new(request.range, progress);
    let mut entries_seen: u64 = 0;

    let walker = jwalk::WalkDir::new(&root)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(jwalk::Parallelism::Serial);

    for entry_result in walker {
        if is_cancelled() {
            info!("Scan of {} cancelled", root.display());
            return Err(ScanError::Cancelled);
        }
        entries_seen += 1;

        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                // jwalk errors are typically unreadable directories.
                let path = err.path().map(Path::to_path_buf).unwrap_or_default();
                walk.skip(&path, format!("{err}"));
                continue;
            }
        };

        let path = entry.path();
        if entry.file_type().is_dir() {
            walk.record_dir(&path);
            // jwalk reports an unreadable directory on the entry itself.
            if let Some(err) = &entry.read_children_error {
                walk.skip(&path, format!("{err}"));
            }
        } else if request
            .extensions
            .matches(&entry.file_name().to_string_lossy())
        {
            walk.record_file(path.clone());
        }

        if entries_seen % PROGRESS_EVERY == 0 {
            walk.send(ScanProgress::Update {
                files_matched: walk.matches.len() as u64,
                dirs_visited: walk.dirs_visited,
                total_size: walk.total_size,
                current_path: path.to_string_lossy().into_owned(),
            });
        }
    }

    let Walk {
        visits,
        matches,
        dirs_visited,
        skipped,
        ..
    } = walk;
    let index = Walk::build_index(visits, &root);
    let summary = ScanSummary::from_matches(&matches);
    let duration = start.elapsed();

    info!(
        "Scan complete: {} matches ({} bytes) in {} directories, {} skipped, {:?}",
        summary.file_count, summary.total_size, dirs_visited, skipped, duration
    );

    Ok(ScanOutcome {
        root,
        index,
        matches,
        summary,
        dirs_visited,
        skipped,
        duration,
    })
}

//! Caller-owned state around one scan result.
//!
//! The engine never edits a result it returned. A frontend that wants to
//! keep its list and tree in step with completed moves and deletes holds a
//! `ScanSession` and feeds it the paths that succeeded. The selection lives
//! here as well: an empty selection means "act on every match".

use crate::error::ReportError;
use crate::model::{sort_matches, DirectoryIndex, MatchedFile, SortField, SortOrder};
use crate::report::{self, ReportFormat};
use crate::scanner::{ScanOutcome, ScanSummary};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One scan result plus the caller's selection.
#[derive(Debug, Clone)]
pub struct ScanSession {
    root: PathBuf,
    index: DirectoryIndex,
    matches: Vec<MatchedFile>,
    summary: ScanSummary,
    selection: HashSet<PathBuf>,
}

impl From<ScanOutcome> for ScanSession {
    fn from(outcome: ScanOutcome) -> Self {
        Self::new(outcome)
    }
}

impl ScanSession {
    pub fn new(outcome: ScanOutcome) -> Self {
        Self {
            root: outcome.root,
            index: outcome.index,
            matches: outcome.matches,
            summary: outcome.summary,
            selection: HashSet::new(),
        }
    }

    /// The normalized root that was scanned.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn index(&self) -> &DirectoryIndex {
        &self.index
    }

    pub fn matches(&self) -> &[MatchedFile] {
        &self.matches
    }

    pub fn summary(&self) -> ScanSummary {
        self.summary
    }

    pub fn selection(&self) -> &HashSet<PathBuf> {
        &self.selection
    }

    /// `true` if `path` is a current match.
    pub fn contains(&self, path: &Path) -> bool {
        self.matches.iter().any(|m| m.path == path)
    }

    /// Add a match to the selection. Unknown paths are ignored.
    pub fn select(&mut self, path: &Path) -> bool {
        self.contains(path) && self.selection.insert(path.to_path_buf())
    }

    pub fn deselect(&mut self, path: &Path) -> bool {
        self.selection.remove(path)
    }

    /// Flip the selection state of a match; returns the new state.
    pub fn toggle(&mut self, path: &Path) -> bool {
        if self.deselect(path) {
            false
        } else {
            self.select(path)
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Paths an action should apply to: the selection in list order, or
    /// every match when nothing is selected.
    pub fn targets(&self) -> Vec<PathBuf> {
        self.target_files().map(|m| m.path.clone()).collect()
    }

    fn target_files(&self) -> impl Iterator<Item = &MatchedFile> + '_ {
        let all = self.selection.is_empty();
        self.matches
            .iter()
            .filter(move |m| all || self.selection.contains(&m.path))
    }

    /// `true` if any target is flagged as a system file, which warrants an
    /// extra confirmation before destructive actions.
    pub fn targets_include_system(&self) -> bool {
        self.target_files().any(|m| m.is_system)
    }

    /// Targets flagged as system files, in list order.
    pub fn system_targets(&self) -> Vec<PathBuf> {
        self.target_files()
            .filter(|m| m.is_system)
            .map(|m| m.path.clone())
            .collect()
    }

    /// Reorder the flat list and every directory's files.
    pub fn sort(&mut self, field: SortField, order: SortOrder) {
        sort_matches(&mut self.matches, field, order);
        self.index.sort(field, order);
    }

    /// Drop a match that was moved or deleted: from the list, the
    /// selection and the index. Returns `false` if it was not a match.
    pub fn forget(&mut self, path: &Path) -> bool {
        let before = self.matches.len();
        self.matches.retain(|m| m.path != path);
        let removed = self.matches.len() != before;
        self.selection.remove(path);
        self.index.remove_file(path);
        if removed {
            debug!("Forgot {}", path.display());
            self.summary = ScanSummary::from_matches(&self.matches);
        }
        removed
    }

    /// [`forget`](Self::forget) every path; returns how many were matches.
    pub fn forget_all<P: AsRef<Path>>(&mut self, paths: &[P]) -> usize {
        paths.iter().filter(|p| self.forget(p.as_ref())).count()
    }

    /// Drop index nodes that no longer hold anything.
    pub fn prune_index(&mut self) -> usize {
        self.index.prune_empty()
    }

    /// Export the current selection (or everything) to `dest`.
    pub fn export(&self, dest: &Path, format: ReportFormat) -> Result<(), ReportError> {
        report::export(dest, format, &self.matches, &self.selection, &self.root)
    }
}

//! The value type produced for every file that passes the scan filters.

use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// One file matched by a scan.
///
/// Identified by `path` within a scan session. Never mutated after the
/// scanner creates it; a successful move or delete removes it instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedFile {
    /// Absolute, normalized path.
    pub path: PathBuf,
    /// Size in bytes at scan time.
    pub size: u64,
    /// Last-modified timestamp at scan time.
    pub modified: DateTime<Local>,
    /// Flagged by the system-path heuristic.
    pub is_system: bool,
}

impl MatchedFile {
    pub fn new(path: PathBuf, size: u64, modified: DateTime<Local>, is_system: bool) -> Self {
        Self {
            path,
            size,
            modified,
            is_system,
        }
    }

    /// File name component, lossily converted for display and sorting.
    pub fn file_name(&self) -> String {
        file_name_of(&self.path)
    }

    /// Lower-cased extension including the leading dot, or `""`.
    pub fn extension(&self) -> String {
        extension_of(&self.path)
    }
}

pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Lower-cased `.ext` of the last path component.
///
/// Dot-files such as `.bashrc` have no extension.
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

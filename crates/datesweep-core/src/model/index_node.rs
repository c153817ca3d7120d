//! A single directory node in the arena-allocated [`DirectoryIndex`].
//!
//! Nodes are stored in a flat `Vec<IndexNode>`. Parent-child relationships
//! use indices rather than pointers.
//!
//! [`DirectoryIndex`]: super::DirectoryIndex

use super::matched_file::MatchedFile;
use super::sort::SortEntry;
use chrono::{DateTime, Local};
use compact_str::CompactString;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::Path;

/// Lightweight index into the arena `Vec<IndexNode>`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    /// Create a new `NodeIndex` from a `usize`.
    #[inline]
    pub fn new(index: usize) -> Self {
        debug_assert!(index <= u32::MAX as usize, "NodeIndex overflow");
        Self(index as u32)
    }

    /// Return the index as a `usize` for Vec indexing.
    #[inline]
    pub fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A matched file as listed under its directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFile {
    /// File name only, as shown in the tree.
    pub display_name: CompactString,
    pub file: MatchedFile,
}

impl IndexedFile {
    pub fn new(file: MatchedFile) -> Self {
        Self {
            display_name: CompactString::new(file.file_name()),
            file,
        }
    }
}

impl SortEntry for IndexedFile {
    fn sort_name(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.display_name.as_str())
    }

    fn sort_path(&self) -> &Path {
        &self.file.path
    }

    fn sort_size(&self) -> u64 {
        self.file.size
    }

    fn sort_modified(&self) -> DateTime<Local> {
        self.file.modified
    }
}

/// One directory in the index.
#[derive(Debug, Clone)]
pub struct IndexNode {
    /// Directory name only. Empty for the root, which stands for the
    /// scanned directory itself.
    pub name: CompactString,

    /// Matched files directly inside this directory, in discovery order
    /// until [`DirectoryIndex::sort`](super::DirectoryIndex::sort) is called.
    pub files: Vec<IndexedFile>,

    /// Child directories keyed by name.
    pub children: BTreeMap<CompactString, NodeIndex>,

    /// Parent node. `None` for the root.
    pub parent: Option<NodeIndex>,

    /// `true` if the directory's own modification time fell inside the
    /// scanned date range. Such a directory stays in the index even with
    /// no matched files.
    pub in_range: bool,
}

impl IndexNode {
    /// Create an empty directory node.
    pub fn new(name: CompactString, parent: Option<NodeIndex>) -> Self {
        Self {
            name,
            files: Vec::new(),
            children: BTreeMap::new(),
            parent,
            in_range: false,
        }
    }

    /// `true` if the node has neither files nor child directories.
    pub fn is_leaf_empty(&self) -> bool {
        self.files.is_empty() && self.children.is_empty()
    }
}

//! Arena-backed index of the directories a scan found relevant.
//!
//! The index mirrors only the part of the real tree that matters for a
//! scan: a directory is present iff it holds at least one matched file, or
//! its own modification time was in range, or it is an ancestor of such a
//! directory. All nodes live in one `Vec<IndexNode>` addressed by
//! [`NodeIndex`]; the root sits at index 0 and stands for the scanned
//! directory itself.

use super::index_node::{IndexNode, IndexedFile, NodeIndex};
use super::matched_file::MatchedFile;
use super::natural::NaturalKey;
use super::sort::{sort_entries, SortField, SortOrder};
use compact_str::CompactString;
use std::path::{Component, Path, PathBuf};

/// The hierarchical result structure produced by a scan.
#[derive(Debug, Clone)]
pub struct DirectoryIndex {
    nodes: Vec<IndexNode>,
}

impl Default for DirectoryIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl DirectoryIndex {
    /// Index slot of the root node.
    pub const ROOT: NodeIndex = NodeIndex(0);

    /// Create an index holding only the (unnamed) root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![IndexNode::new(CompactString::default(), None)],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeIndex {
        Self::ROOT
    }

    /// Get the node at the given index.
    #[inline]
    pub fn node(&self, index: NodeIndex) -> &IndexNode {
        &self.nodes[index.idx()]
    }

    /// Number of directory nodes, root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` if the root has no files and no children.
    pub fn is_empty(&self) -> bool {
        self.node(Self::ROOT).is_leaf_empty()
    }

    /// Return the node for `components` below the root, creating any
    /// missing directory along the way.
    pub fn ensure_path<I, S>(&mut self, components: I) -> NodeIndex
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut current = Self::ROOT;
        for part in components {
            let name = CompactString::new(part.as_ref());
            current = match self.nodes[current.idx()].children.get(&name) {
                Some(&idx) => idx,
                None => {
                    let idx = NodeIndex::new(self.nodes.len());
                    self.nodes.push(IndexNode::new(name.clone(), Some(current)));
                    self.nodes[current.idx()].children.insert(name, idx);
                    idx
                }
            };
        }
        current
    }

    /// Record a visited directory: materialise it (and its ancestors),
    /// mark whether its own timestamp was in range, and append its files.
    pub fn insert_dir<I, S>(&mut self, components: I, in_range: bool, files: Vec<MatchedFile>) -> NodeIndex
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let idx = self.ensure_path(components);
        let node = &mut self.nodes[idx.idx()];
        node.in_range |= in_range;
        node.files.extend(files.into_iter().map(IndexedFile::new));
        idx
    }

    /// Direct child of `parent` with the given name.
    pub fn child(&self, parent: NodeIndex, name: &str) -> Option<NodeIndex> {
        self.node(parent).children.get(name).copied()
    }

    /// Locate a directory by its path relative to the scanned root.
    ///
    /// An empty path (or `.`) is the root.
    pub fn find(&self, relative: &Path) -> Option<NodeIndex> {
        let mut current = Self::ROOT;
        for component in relative.components() {
            match component {
                Component::CurDir => {}
                Component::Normal(part) => {
                    current = self.child(current, &part.to_string_lossy())?;
                }
                _ => return None,
            }
        }
        Some(current)
    }

    /// Children of `parent` in natural name order.
    pub fn sorted_children(&self, parent: NodeIndex, order: SortOrder) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self.node(parent).children.values().copied().collect();
        children.sort_by(|a, b| {
            let ka = NaturalKey::new(&self.node(*a).name);
            let kb = NaturalKey::new(&self.node(*b).name);
            order.apply(ka.cmp(&kb))
        });
        children
    }

    /// Sort the file list of every node.
    pub fn sort(&mut self, field: SortField, order: SortOrder) {
        for node in &mut self.nodes {
            sort_entries(&mut node.files, field, order);
        }
    }

    /// Depth-first, pre-order list of the nodes reachable from `start`.
    ///
    /// Children are visited in name order.
    pub fn walk(&self, start: NodeIndex) -> Vec<NodeIndex> {
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(idx) = stack.pop() {
            order.push(idx);
            // Reverse so the smallest name is popped first.
            stack.extend(self.node(idx).children.values().rev().copied());
        }
        order
    }

    /// Every indexed file, directory by directory in [`walk`](Self::walk) order.
    pub fn files(&self) -> impl Iterator<Item = &IndexedFile> + '_ {
        self.walk(Self::ROOT)
            .into_iter()
            .flat_map(move |idx| self.node(idx).files.iter())
    }

    /// Total number of files in the index.
    pub fn file_count(&self) -> usize {
        self.nodes.iter().map(|n| n.files.len()).sum()
    }

    /// Number of files in `index` and everything below it.
    pub fn subtree_file_count(&self, index: NodeIndex) -> usize {
        self.walk(index)
            .into_iter()
            .map(|idx| self.node(idx).files.len())
            .sum()
    }

    /// Path of a node relative to the scanned root (empty for the root).
    pub fn relative_path(&self, index: NodeIndex) -> PathBuf {
        let mut segments = Vec::new();
        let mut current = Some(index);
        while let Some(idx) = current {
            let node = self.node(idx);
            if node.parent.is_some() {
                segments.push(node.name.as_str());
            }
            current = node.parent;
        }
        segments.iter().rev().collect()
    }

    /// Nesting depth of a node (0 = root).
    pub fn depth(&self, index: NodeIndex) -> usize {
        let mut depth = 0;
        let mut current = self.node(index).parent;
        while let Some(idx) = current {
            depth += 1;
            current = self.node(idx).parent;
        }
        depth
    }

    /// Remove the entry whose full path equals `path`.
    ///
    /// Nodes left empty stay in place; call [`prune_empty`](Self::prune_empty)
    /// to drop them.
    pub fn remove_file(&mut self, path: &Path) -> Option<IndexedFile> {
        for idx in self.walk(Self::ROOT) {
            let files = &mut self.nodes[idx.idx()].files;
            if let Some(pos) = files.iter().position(|f| f.file.path == path) {
                return Some(files.remove(pos));
            }
        }
        None
    }

    /// Drop every node that no longer satisfies the index invariant
    /// (no files, not in range, no surviving children). The root is kept.
    ///
    /// Compacts the arena, so previously obtained [`NodeIndex`] values are
    /// invalid afterwards. Returns the number of nodes removed.
    pub fn prune_empty(&mut self) -> usize {
        let before = self.nodes.len();

        // Children always have higher indices than their parents, so a
        // reverse pass decides every child before its parent.
        let mut keep = vec![false; before];
        for i in (0..before).rev() {
            let node = &self.nodes[i];
            let has_content = i == Self::ROOT.idx()
                || !node.files.is_empty()
                || node.in_range
                || node.children.values().any(|c| keep[c.idx()]);
            keep[i] = has_content;
        }

        let mut compacted = DirectoryIndex {
            nodes: Vec::with_capacity(before),
        };
        let mut remap = vec![None; before];
        for idx in self.walk(Self::ROOT) {
            if !keep[idx.idx()] {
                continue;
            }
            let old = &self.nodes[idx.idx()];
            let parent = old.parent.and_then(|p| remap[p.idx()]);
            let new_idx = NodeIndex::new(compacted.nodes.len());
            let mut node = IndexNode::new(old.name.clone(), parent);
            node.files = old.files.clone();
            node.in_range = old.in_range;
            compacted.nodes.push(node);
            if let Some(p) = parent {
                compacted.nodes[p.idx()]
                    .children
                    .insert(old.name.clone(), new_idx);
            }
            remap[idx.idx()] = Some(new_idx);
        }

        *self = compacted;
        before - self.nodes.len()
    }
}

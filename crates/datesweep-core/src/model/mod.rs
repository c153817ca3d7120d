//! Data model for scan results.
//!
//! Re-exports the matched-file value type, the arena-backed directory index
//! and the ordering helpers used to present them.
pub mod directory_index;
pub mod index_node;
pub mod matched_file;
pub mod natural;
pub mod size;
pub mod sort;

pub use directory_index::DirectoryIndex;
pub use index_node::{IndexNode, IndexedFile, NodeIndex};
pub use matched_file::{extension_of, MatchedFile};
pub use natural::{natural_cmp, natural_key, NaturalKey};
pub use size::{format_count, format_size};
pub use sort::{sort_entries, sort_matches, SortEntry, SortField, SortOrder};

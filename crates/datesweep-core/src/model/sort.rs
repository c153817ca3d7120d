//! Display ordering for matched files.
//!
//! Every field falls back to the natural order of the file name, so rows
//! with equal sizes, dates or types still come out in a stable, readable
//! order. Descending order reverses the whole comparison; the sort is
//! stable, so fully equal rows keep their discovery order either way.

use super::matched_file::{extension_of, MatchedFile};
use super::natural::NaturalKey;
use chrono::{DateTime, Local};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::path::Path;

/// Column a result list can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Name,
    Size,
    Date,
    /// Extension first, then name.
    Type,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    /// Apply this direction to an ascending comparison.
    #[inline]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// Anything that can be placed in a sorted result list.
pub trait SortEntry {
    /// Name shown to the user (and used for natural ordering).
    fn sort_name(&self) -> Cow<'_, str>;
    fn sort_path(&self) -> &Path;
    fn sort_size(&self) -> u64;
    fn sort_modified(&self) -> DateTime<Local>;
}

impl SortEntry for MatchedFile {
    fn sort_name(&self) -> Cow<'_, str> {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default()
    }

    fn sort_path(&self) -> &Path {
        &self.path
    }

    fn sort_size(&self) -> u64 {
        self.size
    }

    fn sort_modified(&self) -> DateTime<Local> {
        self.modified
    }
}

/// Compare two entries by `field` in ascending order.
pub fn compare_entries<T: SortEntry>(a: &T, b: &T, field: SortField) -> Ordering {
    let by_name = || NaturalKey::new(&a.sort_name()).cmp(&NaturalKey::new(&b.sort_name()));
    match field {
        SortField::Name => by_name(),
        SortField::Size => a.sort_size().cmp(&b.sort_size()).then_with(by_name),
        SortField::Date => a
            .sort_modified()
            .cmp(&b.sort_modified())
            .then_with(by_name),
        SortField::Type => extension_of(a.sort_path())
            .cmp(&extension_of(b.sort_path()))
            .then_with(by_name),
    }
}

/// Sort `entries` in place by `field` and `order`.
pub fn sort_entries<T: SortEntry>(entries: &mut [T], field: SortField, order: SortOrder) {
    entries.sort_by(|a, b| order.apply(compare_entries(a, b, field)));
}

/// Sort a flat match list in place.
pub fn sort_matches(matches: &mut [MatchedFile], field: SortField, order: SortOrder) {
    sort_entries(matches, field, order);
}

//! Natural ("human") ordering for names with embedded numbers.
//!
//! A name is split into alternating text and digit runs. Text runs compare
//! case-insensitively, digit runs compare by numeric value, so `item2` sorts
//! before `item10` and `v1.2.10` before `v1.10.0`.
//!
//! The key always starts with a text run (possibly empty) and alternates from
//! there, so two keys never compare a text run against a digit run at the
//! same position. Digit runs of any length are supported; they are never
//! parsed into a fixed-width integer.

use std::cmp::Ordering;

/// A run of ASCII digits compared by numeric value.
///
/// Leading zeros are stripped on construction, so `"007"` and `"7"` are
/// equal. Comparison is by length first, then lexically, which matches
/// numeric comparison for zero-stripped decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digits(String);

impl Digits {
    fn new(run: &str) -> Self {
        let trimmed = run.trim_start_matches('0');
        if trimmed.is_empty() {
            Self("0".to_string())
        } else {
            Self(trimmed.to_string())
        }
    }

    /// The zero-stripped digit string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Ord for Digits {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Digits {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// One run of a [`NaturalKey`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    /// Lower-cased non-digit text.
    Text(String),
    /// A digit run.
    Number(Digits),
}

/// Sort key whose derived ordering is the natural order of the source name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NaturalKey(Vec<Segment>);

impl NaturalKey {
    /// Build the key for `name`.
    pub fn new(name: &str) -> Self {
        let mut segments = Vec::new();
        let mut rest = name;

        loop {
            let text_end = rest
                .find(|c: char| c.is_ascii_digit())
                .unwrap_or(rest.len());
            segments.push(Segment::Text(rest[..text_end].to_lowercase()));
            rest = &rest[text_end..];
            if rest.is_empty() {
                break;
            }

            let digit_end = rest
                .find(|c: char| !c.is_ascii_digit())
                .unwrap_or(rest.len());
            segments.push(Segment::Number(Digits::new(&rest[..digit_end])));
            rest = &rest[digit_end..];
        }

        // "item10" ends with an empty text run, like "item" + 10 + "".
        if matches!(segments.last(), Some(Segment::Number(_))) {
            segments.push(Segment::Text(String::new()));
        }

        Self(segments)
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }
}

/// Convenience wrapper: the natural key of `name`.
pub fn natural_key(name: &str) -> NaturalKey {
    NaturalKey::new(name)
}

/// Compare two names in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    NaturalKey::new(a).cmp(&NaturalKey::new(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(names: &[&str]) -> Vec<String> {
        let mut v: Vec<String> = names.iter().map(|s| s.to_string()).collect();
        v.sort_by_key(|s| natural_key(s));
        v
    }

    #[test]
    fn numbers_sort_by_value() {
        assert_eq!(
            sorted(&["item10.txt", "item2.txt", "item1.txt"]),
            vec!["item1.txt", "item2.txt", "item10.txt"]
        );
    }

    #[test]
    fn version_strings_sort_component_wise() {
        assert_eq!(
            sorted(&["v1.2.10", "v1.2.2", "v1.10.0"]),
            vec!["v1.2.2", "v1.2.10", "v1.10.0"]
        );
    }

    #[test]
    fn text_runs_ignore_case() {
        assert_eq!(natural_cmp("Report.txt", "report.txt"), Ordering::Equal);
        assert_eq!(natural_cmp("alpha", "Beta"), Ordering::Less);
    }

    #[test]
    fn leading_digits_start_with_empty_text() {
        let key = natural_key("10a");
        assert_eq!(
            key.segments(),
            &[
                Segment::Text(String::new()),
                Segment::Number(Digits::new("10")),
                Segment::Text("a".to_string()),
            ]
        );
        assert_eq!(natural_cmp("2b", "10a"), Ordering::Less);
    }

    #[test]
    fn leading_zeros_compare_equal() {
        assert_eq!(natural_cmp("file007", "file7"), Ordering::Equal);
        assert_eq!(natural_cmp("file000", "file0"), Ordering::Equal);
    }

    /// Digit runs longer than any machine integer still compare numerically.
    #[test]
    fn very_long_digit_runs() {
        let small = format!("x{}", "9".repeat(40));
        let big = format!("x1{}", "0".repeat(40));
        assert_eq!(natural_cmp(&small, &big), Ordering::Less);
    }

    #[test]
    fn shorter_prefix_sorts_first() {
        assert_eq!(natural_cmp("item10", "item10a"), Ordering::Less);
        assert_eq!(natural_cmp("", "a"), Ordering::Less);
    }
}

//! Scan filters — the inclusive date window and the extension list.

use crate::error::ScanError;
use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, TimeZone};
use std::time::SystemTime;

/// Day input format accepted by [`parse_day`] (`17/10/2026`).
pub const DAY_FORMAT: &str = "%d/%m/%Y";

/// Inclusive `[start, end]` window of local timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: DateTime<Local>,
    end: DateTime<Local>,
}

impl DateRange {
    /// Build a range from two instants. Fails if `start` is after `end`.
    pub fn new(start: DateTime<Local>, end: DateTime<Local>) -> Result<Self, ScanError> {
        if start > end {
            return Err(ScanError::InvalidDateRange(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Whole local days: midnight of `first` through the last instant of `last`.
    pub fn from_days(first: NaiveDate, last: NaiveDate) -> Result<Self, ScanError> {
        let start = first
            .and_time(NaiveTime::MIN)
            .and_local_timezone(Local)
            .earliest()
            .ok_or_else(|| nonexistent(first))?;
        let end = last
            .and_hms_nano_opt(23, 59, 59, 999_999_999)
            .and_then(|t| Local.from_local_datetime(&t).latest())
            .ok_or_else(|| nonexistent(last))?;
        Self::new(start, end)
    }

    /// The last `days` days up to and including `today`.
    pub fn last_days(days: u32, today: NaiveDate) -> Result<Self, ScanError> {
        let first = today
            .checked_sub_days(chrono::Days::new(u64::from(days)))
            .ok_or_else(|| ScanError::InvalidDateRange(format!("{days} days before {today}")))?;
        Self::from_days(first, today)
    }

    /// From the first of the current month through `today`.
    pub fn month_to_date(today: NaiveDate) -> Result<Self, ScanError> {
        let first = today.with_day(1).ok_or_else(|| nonexistent(today))?;
        Self::from_days(first, today)
    }

    /// From the first of January through `today`.
    pub fn year_to_date(today: NaiveDate) -> Result<Self, ScanError> {
        let first = NaiveDate::from_ymd_opt(today.year(), 1, 1).ok_or_else(|| nonexistent(today))?;
        Self::from_days(first, today)
    }

    #[inline]
    pub fn start(&self) -> DateTime<Local> {
        self.start
    }

    #[inline]
    pub fn end(&self) -> DateTime<Local> {
        self.end
    }

    /// Inclusive on both ends.
    #[inline]
    pub fn contains(&self, at: DateTime<Local>) -> bool {
        self.start <= at && at <= self.end
    }

    pub fn contains_system_time(&self, at: SystemTime) -> bool {
        self.contains(DateTime::<Local>::from(at))
    }
}

fn nonexistent(day: NaiveDate) -> ScanError {
    ScanError::InvalidDateRange(format!("{day} has no matching local time"))
}

/// Parse a `DD/MM/YYYY` day.
pub fn parse_day(input: &str) -> Result<NaiveDate, ScanError> {
    NaiveDate::parse_from_str(input.trim(), DAY_FORMAT)
        .map_err(|e| ScanError::InvalidDateRange(format!("'{input}': {e}")))
}

/// Allowed file-name suffixes. Empty means every file passes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionFilter {
    extensions: Vec<String>,
}

impl ExtensionFilter {
    /// Accept every file.
    pub fn any() -> Self {
        Self::default()
    }

    /// Parse a comma-separated list such as `"txt, .PDF,,md"`.
    ///
    /// Tokens are trimmed and lower-cased, a missing leading dot is added,
    /// and empty tokens are dropped.
    pub fn parse(input: &str) -> Self {
        Self::from_list(input.split(','))
    }

    pub fn from_list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let extensions = items
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .map(|s| if s.starts_with('.') { s } else { format!(".{s}") })
            .collect();
        Self { extensions }
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Normalized extensions, each starting with `.`.
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// `true` if the lower-cased `file_name` ends with one of the
    /// extensions, or if the filter is empty.
    pub fn matches(&self, file_name: &str) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let lowered = file_name.to_lowercase();
        self.extensions.iter().any(|ext| lowered.ends_with(ext.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn parse_normalizes_tokens() {
        let filter = ExtensionFilter::parse(" txt, .PDF,,md ,");
        assert_eq!(filter.extensions(), [".txt", ".pdf", ".md"]);
    }

    #[test]
    fn empty_filter_matches_everything() {
        let filter = ExtensionFilter::parse("");
        assert!(filter.is_empty());
        assert!(filter.matches("anything.bin"));
        assert!(filter.matches("Makefile"));
    }

    #[test]
    fn matching_is_a_case_insensitive_suffix_test() {
        let filter = ExtensionFilter::parse("tar.gz,jpg");
        assert!(filter.matches("backup.TAR.GZ"));
        assert!(filter.matches("IMG_0001.JPG"));
        assert!(!filter.matches("notes.txt"));
        assert!(!filter.matches("jpg"));
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let range = DateRange::from_days(day(2024, 3, 1), day(2024, 3, 2)).unwrap();
        assert!(range.contains(range.start()));
        assert!(range.contains(range.end()));
        assert!(!range.contains(range.start() - Duration::nanoseconds(1)));
        assert!(!range.contains(range.end() + Duration::nanoseconds(1)));
    }

    #[test]
    fn reversed_range_is_rejected() {
        let err = DateRange::from_days(day(2024, 3, 2), day(2024, 3, 1)).unwrap_err();
        assert!(matches!(err, ScanError::InvalidDateRange(_)));
    }

    #[test]
    fn single_day_range_spans_the_whole_day() {
        let range = DateRange::from_days(day(2024, 6, 15), day(2024, 6, 15)).unwrap();
        let noon = Local.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        assert!(range.contains(noon));
    }

    #[test]
    fn presets_start_on_the_expected_day() {
        let today = day(2026, 10, 17);
        assert_eq!(
            DateRange::last_days(7, today).unwrap().start().date_naive(),
            day(2026, 10, 10)
        );
        assert_eq!(
            DateRange::month_to_date(today).unwrap().start().date_naive(),
            day(2026, 10, 1)
        );
        assert_eq!(
            DateRange::year_to_date(today).unwrap().start().date_naive(),
            day(2026, 1, 1)
        );
    }

    #[test]
    fn parse_day_uses_day_month_year() {
        assert_eq!(parse_day("17/10/2026").unwrap(), day(2026, 10, 17));
        assert!(parse_day("2026-10-17").is_err());
        assert!(parse_day("31/02/2026").is_err());
    }
}

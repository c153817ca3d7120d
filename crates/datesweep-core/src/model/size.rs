//! Size formatting utilities — human-readable byte counts.
//!
//! All internal sizes are `u64` bytes. Floating point is only used
//! at the display-formatting boundary.

/// Units walked by [`format_size`]; TB is the ceiling.
const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// Format a byte count with two decimals and a binary-scaled unit.
///
/// Divides by 1024 until the value drops below 1024 or the unit list runs
/// out. Anything past the TB range is still rendered in TB
/// (`2048.00 TB`), never in a larger unit.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.2} {}", UNITS[unit])
}

/// Group the digits of a count in threes: `1234567` becomes `1,234,567`.
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let lead = digits.len() % 3;
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.char_indices() {
        if i > 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

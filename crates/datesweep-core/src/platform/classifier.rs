//! Heuristic detection of operating-system files.
//!
//! A file is flagged when its extension is one that operating systems and
//! installers typically own, or when it lives under a well-known system
//! directory. The flag only gates an extra confirmation before destructive
//! actions; it never blocks anything, and both false positives and false
//! negatives are expected.

use std::path::Path;

/// Extensions treated as system-owned (lower case, with leading dot).
pub const SYSTEM_EXTENSIONS: &[&str] = &[".sys", ".dll", ".so", ".exe", ".sh", ".bin"];

/// Path prefixes treated as system-owned (lower case).
///
/// Matching is a plain string prefix test, so `/binaries` also matches
/// `/bin`.
pub const SYSTEM_PATH_PREFIXES: &[&str] = &[
    "/bin",
    "/boot",
    "/etc",
    "/lib",
    "/opt",
    "/sbin",
    "/sys",
    "/usr",
    "/var",
    "c:\\windows",
    "c:\\program files",
];

/// Decide whether a file looks system-sensitive.
///
/// `extension` is the file's extension with or without its leading dot;
/// `path` should be absolute. Both comparisons ignore case.
pub fn is_system_sensitive(path: &Path, extension: &str) -> bool {
    let ext = extension.to_lowercase();
    let ext = ext.strip_prefix('.').unwrap_or(&ext);
    if !ext.is_empty() && SYSTEM_EXTENSIONS.iter().any(|e| &e[1..] == ext) {
        return true;
    }

    let lowered = path.to_string_lossy().to_lowercase();
    SYSTEM_PATH_PREFIXES
        .iter()
        .any(|prefix| lowered.starts_with(prefix))
}

//! Lexical path handling shared by the scanner and the transfer engine.
//!
//! Paths are made absolute against the current directory and normalized
//! without touching the filesystem: `.` segments vanish and `..` pops the
//! previous segment. Symlinks are not resolved. On Windows, comparisons
//! ignore case the way the filesystem does.

use std::ffi::OsStr;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Make `path` absolute and lexically normalized.
pub fn absolutize(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(normalize_lexically(path))
    } else {
        Ok(normalize_lexically(&std::env::current_dir()?.join(path)))
    }
}

/// Remove `.` and resolve `..` segments without consulting the filesystem.
///
/// `..` at the root stays at the root. Leading `..` segments of a relative
/// path are kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

fn os_eq(a: &OsStr, b: &OsStr) -> bool {
    if cfg!(windows) {
        a.to_string_lossy().to_lowercase() == b.to_string_lossy().to_lowercase()
    } else {
        a == b
    }
}

fn component_eq(a: &Component<'_>, b: &Component<'_>) -> bool {
    match (a, b) {
        (Component::Normal(x), Component::Normal(y)) => os_eq(x, y),
        (Component::Prefix(x), Component::Prefix(y)) => os_eq(x.as_os_str(), y.as_os_str()),
        _ => a == b,
    }
}

/// `true` if both paths name the same location once made absolute.
///
/// Purely lexical: two different spellings that reach the same file
/// through a symlink are not considered equal; see [`same_file`].
pub fn same_location(a: &Path, b: &Path) -> io::Result<bool> {
    let a = absolutize(a)?;
    let b = absolutize(b)?;
    let mut ca = a.components();
    let mut cb = b.components();
    loop {
        match (ca.next(), cb.next()) {
            (None, None) => return Ok(true),
            (Some(x), Some(y)) if component_eq(&x, &y) => continue,
            _ => return Ok(false),
        }
    }
}

/// `true` if both paths exist and resolve to the same file on disk.
///
/// Catches aliases the lexical check cannot see, such as a destination
/// reached through a symlinked directory. A path that does not exist is
/// never the same file as anything.
pub fn same_file(a: &Path, b: &Path) -> io::Result<bool> {
    let (Some(meta_a), Some(meta_b)) = (metadata_if_exists(a)?, metadata_if_exists(b)?) else {
        return Ok(false);
    };
    same_file_meta(a, b, &meta_a, &meta_b)
}

fn metadata_if_exists(path: &Path) -> io::Result<Option<fs::Metadata>> {
    match fs::metadata(path) {
        Ok(meta) => Ok(Some(meta)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn same_file_meta(_a: &Path, _b: &Path, meta_a: &fs::Metadata, meta_b: &fs::Metadata) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;
    Ok(meta_a.dev() == meta_b.dev() && meta_a.ino() == meta_b.ino())
}

#[cfg(not(unix))]
fn same_file_meta(a: &Path, b: &Path, _meta_a: &fs::Metadata, _meta_b: &fs::Metadata) -> io::Result<bool> {
    Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
}

/// Express `path` relative to `base`; both must already be absolute and
/// normalized.
///
/// Like a classic `relpath`, the result climbs out of `base` with `..`
/// when `path` is not below it. Returns `None` when the two paths share no
/// root at all (different drives), and `.` when they are equal.
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    let p: Vec<Component<'_>> = path.components().collect();
    let b: Vec<Component<'_>> = base.components().collect();

    let anchored = |c: &[Component<'_>]| {
        c.iter()
            .take_while(|c| matches!(c, Component::Prefix(_) | Component::RootDir))
            .count()
    };
    let (pa, ba) = (anchored(&p), anchored(&b));
    if pa != ba || !p[..pa].iter().zip(&b[..ba]).all(|(x, y)| component_eq(x, y)) {
        return None;
    }

    let common = p
        .iter()
        .zip(&b)
        .take_while(|(x, y)| component_eq(x, y))
        .count();

    let mut rel = PathBuf::new();
    for _ in common..b.len() {
        rel.push("..");
    }
    for c in &p[common..] {
        rel.push(c.as_os_str());
    }
    if rel.as_os_str().is_empty() {
        rel.push(".");
    }
    Some(rel)
}

/// Re-base `item` from `source_root` onto `dest_root`.
///
/// All three paths are normalized before the relative path is computed,
/// so spelling differences in the inputs do not change the result.
pub fn rebase(item: &Path, source_root: &Path, dest_root: &Path) -> io::Result<Option<PathBuf>> {
    let item = absolutize(item)?;
    let source_root = absolutize(source_root)?;
    let dest_root = absolutize(dest_root)?;
    Ok(relative_to(&item, &source_root).map(|rel| normalize_lexically(&dest_root.join(rel))))
}

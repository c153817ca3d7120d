//! Copy, move and delete — single files and structure-preserving batches.
//!
//! The engine works on paths the caller already holds (normally from a
//! scan's match list) and never re-checks that they still match. Each item
//! yields an [`ItemOutcome`]; the `*_one` functions collapse it to the
//! `bool` a UI needs and the `batch_*` functions tally it into a
//! [`BatchReport`]. One item failing never stops the rest of a batch.
//!
//! A move is a copy followed by removal of the source. If the removal
//! fails, the item is reported as failed and the copy stays at the
//! destination.
pub mod outcome;

pub use outcome::{BatchReport, ItemOutcome};

use crate::error::TransferError;
use crate::platform::{absolutize, rebase, same_file, same_location};
use filetime::FileTime;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

// ── Helpers ──────────────────────────────────────────────────────────────────

fn absolute(path: &Path) -> Result<PathBuf, TransferError> {
    absolutize(path).map_err(|e| TransferError::io(path, e))
}

/// Fail with `SourceMissing` if `src` does not exist.
fn require_source(src: &Path) -> Result<(), TransferError> {
    match fs::symlink_metadata(src) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(TransferError::SourceMissing(src.to_path_buf()))
        }
        Err(e) => Err(TransferError::io(src, e)),
    }
}

/// Copy content and permissions, then carry over access and modification
/// times.
fn copy_with_times(src: &Path, dest: &Path) -> Result<(), TransferError> {
    fs::copy(src, dest).map_err(|e| TransferError::io(dest, e))?;
    let meta = fs::metadata(src).map_err(|e| TransferError::io(src, e))?;
    filetime::set_file_times(
        dest,
        FileTime::from_last_access_time(&meta),
        FileTime::from_last_modification_time(&meta),
    )
    .map_err(|e| TransferError::io(dest, e))
}

fn remove_source(src: &Path) -> Result<(), TransferError> {
    fs::remove_file(src).map_err(|e| {
        if e.kind() == io::ErrorKind::NotFound {
            TransferError::SourceMissing(src.to_path_buf())
        } else {
            TransferError::io(src, e)
        }
    })
}

/// `true` if writing `dest` would overwrite `src` itself: either the paths
/// are spelled the same or they reach one file through a link.
fn is_same_target(src: &Path, dest: &Path) -> Result<bool, TransferError> {
    if same_location(src, dest).map_err(|e| TransferError::io(dest, e))? {
        return Ok(true);
    }
    same_file(src, dest).map_err(|e| TransferError::io(dest, e))
}

fn into_outcome(result: Result<ItemOutcome, TransferError>) -> ItemOutcome {
    result.unwrap_or_else(ItemOutcome::Failed)
}

/// Collapse an outcome for the single-file API: `Ok(true)` on success,
/// `Ok(false)` for same-location or an I/O failure, `Err` only when the
/// source is missing.
fn collapse(src: &Path, outcome: ItemOutcome) -> Result<bool, TransferError> {
    match outcome {
        ItemOutcome::Done => Ok(true),
        ItemOutcome::SameLocation => Ok(false),
        ItemOutcome::Failed(err @ TransferError::SourceMissing(_)) => Err(err),
        ItemOutcome::Failed(err) => {
            warn!("Transfer of {} failed: {err}", src.display());
            Ok(false)
        }
    }
}

// ── Single items ─────────────────────────────────────────────────────────────

fn try_copy_item(src: &Path, dest_dir: &Path) -> Result<ItemOutcome, TransferError> {
    let src = absolute(src)?;
    let name = src.file_name().ok_or_else(|| {
        TransferError::io(&src, io::Error::new(io::ErrorKind::InvalidInput, "no file name"))
    })?;
    let dest = absolute(&dest_dir.join(name))?;

    if is_same_target(&src, &dest)? {
        debug!("{} is already in {}", src.display(), dest_dir.display());
        return Ok(ItemOutcome::SameLocation);
    }
    require_source(&src)?;
    copy_with_times(&src, &dest)?;
    Ok(ItemOutcome::Done)
}

/// Copy `src` into `dest_dir`, keeping its file name.
pub fn copy_item(src: &Path, dest_dir: &Path) -> ItemOutcome {
    into_outcome(try_copy_item(src, dest_dir))
}

/// Move `src` into `dest_dir`: copy, then remove the source.
pub fn cut_item(src: &Path, dest_dir: &Path) -> ItemOutcome {
    match copy_item(src, dest_dir) {
        ItemOutcome::Done => match remove_source(src) {
            Ok(()) => ItemOutcome::Done,
            Err(err) => {
                warn!(
                    "Copied {} but could not remove the source; copy left in {}",
                    src.display(),
                    dest_dir.display()
                );
                ItemOutcome::Failed(err)
            }
        },
        other => other,
    }
}

/// Delete one file.
pub fn delete_item(path: &Path) -> ItemOutcome {
    match remove_source(path) {
        Ok(()) => ItemOutcome::Done,
        Err(err) => ItemOutcome::Failed(err),
    }
}

/// Copy one file into `dest_dir`.
///
/// Returns `Ok(false)` when the destination is the source itself (nothing
/// is touched) or when the copy fails; `Err(SourceMissing)` when `src` does
/// not exist.
pub fn copy_one(src: &Path, dest_dir: &Path) -> Result<bool, TransferError> {
    collapse(src, copy_item(src, dest_dir))
}

/// Move one file into `dest_dir`. Same return contract as [`copy_one`].
pub fn cut_one(src: &Path, dest_dir: &Path) -> Result<bool, TransferError> {
    collapse(src, cut_item(src, dest_dir))
}

/// Delete one file. Any failure, including a missing file, is an error.
pub fn delete_one(path: &Path) -> Result<bool, TransferError> {
    remove_source(path)?;
    Ok(true)
}

// ── Batches ──────────────────────────────────────────────────────────────────

fn try_copy_into(item: &Path, source_root: &Path, dest_root: &Path) -> Result<ItemOutcome, TransferError> {
    let src = absolute(item)?;
    let target = rebase(&src, source_root, dest_root)
        .map_err(|e| TransferError::io(item, e))?
        .ok_or_else(|| TransferError::Relativize {
            path: src.clone(),
            root: source_root.to_path_buf(),
        })?;

    if is_same_target(&src, &target)? {
        debug!("{} maps onto itself; skipped", src.display());
        return Ok(ItemOutcome::SameLocation);
    }
    require_source(&src)?;
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(|e| TransferError::io(parent, e))?;
    }
    copy_with_times(&src, &target)?;
    Ok(ItemOutcome::Done)
}

/// Copy `item` to the same relative location under `dest_root` that it has
/// under `source_root`, creating intermediate directories.
pub fn copy_into(item: &Path, source_root: &Path, dest_root: &Path) -> ItemOutcome {
    into_outcome(try_copy_into(item, source_root, dest_root))
}

/// Structure-preserving move of one item: [`copy_into`], then remove the
/// source.
pub fn move_into(item: &Path, source_root: &Path, dest_root: &Path) -> ItemOutcome {
    match copy_into(item, source_root, dest_root) {
        ItemOutcome::Done => match remove_source(item) {
            Ok(()) => ItemOutcome::Done,
            Err(err) => {
                warn!(
                    "Copied {} but could not remove the source; copy left under {}",
                    item.display(),
                    dest_root.display()
                );
                ItemOutcome::Failed(err)
            }
        },
        other => other,
    }
}

fn run_batch<P, F>(label: &str, paths: &[P], mut op: F) -> BatchReport
where
    P: AsRef<Path>,
    F: FnMut(&Path) -> ItemOutcome,
{
    let mut report = BatchReport::default();
    for path in paths {
        let path = path.as_ref();
        let outcome = op(path);
        if let Some(err) = outcome.error() {
            warn!("{label} failed for {}: {err}", path.display());
        }
        report.record(path.to_path_buf(), outcome);
    }
    info!(
        "{label}: {} succeeded, {} failed, {} skipped",
        report.success_count, report.error_count, report.skipped_count
    );
    report
}

/// Copy every path to `dest_root`, keeping its layout relative to
/// `source_root`.
pub fn batch_copy<P: AsRef<Path>>(paths: &[P], dest_root: &Path, source_root: &Path) -> BatchReport {
    run_batch("Batch copy", paths, |p| copy_into(p, source_root, dest_root))
}

/// Move every path to `dest_root`, keeping its layout relative to
/// `source_root`. `succeeded` lists the items that were both copied and
/// removed.
pub fn batch_cut<P: AsRef<Path>>(paths: &[P], dest_root: &Path, source_root: &Path) -> BatchReport {
    run_batch("Batch move", paths, |p| move_into(p, source_root, dest_root))
}

/// Delete every path.
pub fn batch_delete<P: AsRef<Path>>(paths: &[P]) -> BatchReport {
    run_batch("Batch delete", paths, delete_item)
}

/// End-to-end scanner integration tests.
///
/// These tests run the real walk against a temporary directory tree whose
/// file and directory timestamps are pinned with `filetime`, then check the
/// flat match list, the directory index and the summary the scan returns.
///
/// Directory timestamps are set after the children are created, because
/// creating an entry bumps the parent's modification time.
use chrono::{Duration as ChronoDuration, Local, TimeZone};
use datesweep_core::model::{DirectoryIndex, SortOrder};
use datesweep_core::scanner::{
    scan, start_scan, DateRange, ExtensionFilter, ScanProgress, ScanRequest,
};
use datesweep_core::ScanError;
use filetime::FileTime;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// A window of one day either side of now.
fn around_now() -> DateRange {
    let now = Local::now();
    DateRange::new(now - ChronoDuration::days(1), now + ChronoDuration::days(1)).unwrap()
}

/// A timestamp well outside [`around_now`].
fn long_ago() -> FileTime {
    let when = Local.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
    FileTime::from_unix_time(when.timestamp(), 0)
}

fn write_file(path: &Path, bytes: usize) {
    fs::write(path, vec![b'x'; bytes]).unwrap();
}

fn age(path: &Path) {
    filetime::set_file_mtime(path, long_ago()).unwrap();
}

/// Build this tree (`*` marks an in-range timestamp):
///
/// ```text
/// root/              (old)
///   report.txt   *   100 bytes
///   old.txt          (old)
///   docs/            (old)
///     plan.PDF   *   200 bytes
///     archive/       (old)
///       ancient.txt  (old)
///   fresh/       *   empty
///   deep/            (old)
///     mid/           (old)
///       leaf/    *   empty
/// ```
fn build_dated_tree(root: &Path) {
    fs::create_dir_all(root.join("docs/archive")).unwrap();
    fs::create_dir_all(root.join("fresh")).unwrap();
    fs::create_dir_all(root.join("deep/mid/leaf")).unwrap();

    write_file(&root.join("report.txt"), 100);
    write_file(&root.join("old.txt"), 50);
    write_file(&root.join("docs/plan.PDF"), 200);
    write_file(&root.join("docs/archive/ancient.txt"), 10);

    age(&root.join("old.txt"));
    age(&root.join("docs/archive/ancient.txt"));
    age(&root.join("docs/archive"));
    age(&root.join("docs"));
    age(&root.join("deep/mid"));
    age(&root.join("deep"));
    age(root);
}

fn scan_root(root: &Path, extensions: ExtensionFilter) -> datesweep_core::scanner::ScanOutcome {
    scan(&ScanRequest::new(root, around_now(), extensions)).unwrap()
}

fn names(paths: impl IntoIterator<Item = PathBuf>) -> Vec<String> {
    let mut names: Vec<String> = paths
        .into_iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn child_names(index: &DirectoryIndex, relative: &str) -> Vec<String> {
    let node = index.find(Path::new(relative)).unwrap();
    index
        .sorted_children(node, SortOrder::Ascending)
        .into_iter()
        .map(|c| index.node(c).name.to_string())
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn only_in_range_files_are_matched() {
    let tmp = TempDir::new().unwrap();
    build_dated_tree(tmp.path());

    let outcome = scan_root(tmp.path(), ExtensionFilter::any());

    assert_eq!(
        names(outcome.matches.iter().map(|m| m.path.clone())),
        vec!["plan.PDF", "report.txt"]
    );
    assert_eq!(outcome.summary.file_count, 2);
    assert_eq!(outcome.summary.total_size, 300);
    assert_eq!(outcome.index.file_count(), 2);
    assert_eq!(outcome.skipped, 0);
}

#[test]
fn match_paths_are_absolute_and_under_root() {
    let tmp = TempDir::new().unwrap();
    build_dated_tree(tmp.path());

    let outcome = scan_root(tmp.path(), ExtensionFilter::any());

    for file in &outcome.matches {
        assert!(file.path.is_absolute());
        assert!(file.path.starts_with(&outcome.root));
    }
}

#[test]
fn empty_in_range_directory_gets_a_node() {
    let tmp = TempDir::new().unwrap();
    build_dated_tree(tmp.path());

    let outcome = scan_root(tmp.path(), ExtensionFilter::any());
    let fresh = outcome.index.find(Path::new("fresh")).unwrap();

    assert!(outcome.index.node(fresh).in_range);
    assert!(outcome.index.node(fresh).files.is_empty());
}

#[test]
fn ancestors_of_relevant_directories_are_materialized() {
    let tmp = TempDir::new().unwrap();
    build_dated_tree(tmp.path());

    let outcome = scan_root(tmp.path(), ExtensionFilter::any());
    let index = &outcome.index;

    let deep = index.find(Path::new("deep")).unwrap();
    let mid = index.find(Path::new("deep/mid")).unwrap();
    let leaf = index.find(Path::new("deep/mid/leaf")).unwrap();
    assert!(!index.node(deep).in_range);
    assert!(!index.node(mid).in_range);
    assert!(index.node(leaf).in_range);

    // `docs` is old but holds a match; `docs/archive` holds nothing.
    let docs = index.find(Path::new("docs")).unwrap();
    assert_eq!(index.node(docs).files.len(), 1);
    assert!(index.find(Path::new("docs/archive")).is_none());

    assert_eq!(child_names(index, ""), vec!["deep", "docs", "fresh"]);
}

#[test]
fn extension_filter_is_case_insensitive() {
    let tmp = TempDir::new().unwrap();
    build_dated_tree(tmp.path());

    let outcome = scan_root(tmp.path(), ExtensionFilter::parse(" pdf "));

    assert_eq!(
        names(outcome.matches.iter().map(|m| m.path.clone())),
        vec!["plan.PDF"]
    );
    // Directory nodes do not depend on the extension filter.
    assert!(outcome.index.find(Path::new("fresh")).is_some());
}

#[test]
fn system_extension_sets_summary_flag() {
    let tmp = TempDir::new().unwrap();
    write_file(&tmp.path().join("helper.dll"), 5);
    write_file(&tmp.path().join("notes.txt"), 5);

    let outcome = scan_root(tmp.path(), ExtensionFilter::any());

    assert!(outcome.summary.has_system_file);
    let dll = outcome
        .matches
        .iter()
        .find(|m| m.path.ends_with("helper.dll"))
        .unwrap();
    assert!(dll.is_system);
}

#[test]
fn relative_root_is_normalized() {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("inner")).unwrap();
    write_file(&tmp.path().join("inner/a.txt"), 1);

    let spelled = tmp.path().join("inner/../inner/.");
    let outcome = scan_root(&spelled, ExtensionFilter::any());

    assert_eq!(outcome.root.file_name().unwrap(), "inner");
    assert_eq!(outcome.matches.len(), 1);
    assert!(outcome.matches[0].path.ends_with("inner/a.txt"));
}

#[test]
fn missing_root_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let request = ScanRequest::new(tmp.path().join("nope"), around_now(), ExtensionFilter::any());

    assert!(matches!(scan(&request), Err(ScanError::InvalidRoot(_))));
}

#[test]
fn file_root_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("plain.txt");
    write_file(&file, 1);
    let request = ScanRequest::new(&file, around_now(), ExtensionFilter::any());

    assert!(matches!(scan(&request), Err(ScanError::InvalidRoot(_))));
}

#[test]
fn background_scan_completes_with_same_result() {
    let tmp = TempDir::new().unwrap();
    build_dated_tree(tmp.path());

    let request = ScanRequest::new(tmp.path(), around_now(), ExtensionFilter::any());
    let handle = start_scan(request).unwrap();
    let outcome = handle.wait().unwrap();

    assert_eq!(outcome.summary.file_count, 2);
    assert!(outcome.index.find(Path::new("deep/mid/leaf")).is_some());
}

#[test]
fn background_scan_reports_completion_on_channel() {
    let tmp = TempDir::new().unwrap();
    build_dated_tree(tmp.path());

    let handle = start_scan(ScanRequest::new(
        tmp.path(),
        around_now(),
        ExtensionFilter::any(),
    ))
    .unwrap();

    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    loop {
        assert!(
            std::time::Instant::now() < deadline,
            "scanner did not complete within 30 seconds"
        );
        match handle.progress_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(ScanProgress::Complete(outcome)) => {
                assert_eq!(outcome.matches.len(), 2);
                break;
            }
            Ok(ScanProgress::Failed(err)) => panic!("scan failed: {err}"),
            Ok(ScanProgress::Cancelled) => panic!("scan was unexpectedly cancelled"),
            Ok(_) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                panic!("scanner channel disconnected before Complete was sent");
            }
        }
    }
}

#[test]
fn cancelled_scan_reports_cancellation() {
    let tmp = TempDir::new().unwrap();
    for i in 0..50 {
        let dir = tmp.path().join(format!("d{i}"));
        fs::create_dir(&dir).unwrap();
        for j in 0..20 {
            write_file(&dir.join(format!("f{j}.txt")), 1);
        }
    }

    let handle = start_scan(ScanRequest::new(
        tmp.path(),
        around_now(),
        ExtensionFilter::any(),
    ))
    .unwrap();
    handle.cancel();
    assert!(handle.is_cancelled());

    // The walk may already be done on a fast machine; both are acceptable,
    // but a cancelled walk must say so rather than fail.
    match handle.wait() {
        Ok(outcome) => assert_eq!(outcome.matches.len(), 1_000),
        Err(err) => assert!(matches!(err, ScanError::Cancelled)),
    }
}

#[cfg(unix)]
#[test]
fn dangling_symlink_is_skipped_and_scan_continues() {
    let tmp = TempDir::new().unwrap();
    write_file(&tmp.path().join("kept.txt"), 3);
    std::os::unix::fs::symlink(tmp.path().join("nowhere"), tmp.path().join("dangling.txt"))
        .unwrap();

    let outcome = scan_root(tmp.path(), ExtensionFilter::any());

    assert!(outcome.skipped >= 1);
    assert_eq!(
        names(outcome.matches.iter().map(|m| m.path.clone())),
        vec!["kept.txt"]
    );
}

#[cfg(unix)]
#[test]
fn unreadable_directory_is_skipped_and_siblings_survive() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    let locked = tmp.path().join("locked");
    fs::create_dir(&locked).unwrap();
    write_file(&locked.join("hidden.txt"), 1);
    fs::create_dir(tmp.path().join("open")).unwrap();
    write_file(&tmp.path().join("open/visible.txt"), 2);

    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    // Root reads through permission bits; nothing to observe then.
    if fs::read_dir(&locked).is_ok() {
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let result = scan(&ScanRequest::new(tmp.path(), around_now(), ExtensionFilter::any()));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let outcome = result.unwrap();
    assert!(outcome.skipped >= 1);
    assert_eq!(
        names(outcome.matches.iter().map(|m| m.path.clone())),
        vec!["visible.txt"]
    );
}

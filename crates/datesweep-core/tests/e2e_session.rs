/// End-to-end session tests: scan, act on the selection with the transfer
/// engine, then feed the successful paths back into the session.
use chrono::Local;
use datesweep_core::report::ReportFormat;
use datesweep_core::scanner::{scan, DateRange, ExtensionFilter, ScanRequest};
use datesweep_core::transfer::{batch_cut, batch_delete};
use datesweep_core::ScanSession;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ── Helpers ──────────────────────────────────────────────────────────────────

/// ```text
/// root/
///   keep.txt
///   logs/
///     one.log
///     two.log
/// ```
fn scanned_session(root: &Path) -> ScanSession {
    fs::create_dir_all(root.join("logs")).unwrap();
    fs::write(root.join("keep.txt"), b"keep").unwrap();
    fs::write(root.join("logs/one.log"), b"1").unwrap();
    fs::write(root.join("logs/two.log"), b"22").unwrap();

    let now = Local::now();
    let range = DateRange::new(now - chrono::Duration::days(1), now + chrono::Duration::days(1))
        .unwrap();
    let outcome = scan(&ScanRequest::new(root, range, ExtensionFilter::any())).unwrap();
    ScanSession::new(outcome)
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[test]
fn deleting_selection_updates_session() {
    let tmp = TempDir::new().unwrap();
    let mut session = scanned_session(&tmp.path().join("root"));
    let logs: Vec<_> = session
        .matches()
        .iter()
        .filter(|m| m.extension() == ".log")
        .map(|m| m.path.clone())
        .collect();
    for path in &logs {
        session.select(path);
    }

    let report = batch_delete(&session.targets());
    assert_eq!(report.counts(), (2, 0));
    assert_eq!(session.forget_all(&report.succeeded), 2);

    assert_eq!(session.summary().file_count, 1);
    assert_eq!(session.summary().total_size, 4);
    assert!(session.selection().is_empty());
    assert_eq!(session.prune_index(), 0, "logs/ was created in range");
    assert_eq!(session.index().file_count(), 1);
}

#[test]
fn moving_everything_empties_session() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("root");
    let mut session = scanned_session(&root);
    let dest = tmp.path().join("moved");

    let report = batch_cut(&session.targets(), &dest, session.root());
    assert_eq!(report.counts(), (3, 0));
    session.forget_all(&report.succeeded);

    assert!(session.matches().is_empty());
    assert_eq!(session.summary().file_count, 0);
    assert!(dest.join("logs/two.log").exists());
}

#[test]
fn session_export_honours_selection() {
    let tmp = TempDir::new().unwrap();
    let mut session = scanned_session(&tmp.path().join("root"));
    let keep = session
        .matches()
        .iter()
        .find(|m| m.path.ends_with("keep.txt"))
        .unwrap()
        .path
        .clone();
    session.toggle(&keep);

    let dest = tmp.path().join("report.json");
    session.export(&dest, ReportFormat::Json).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
    assert_eq!(value["scope"], "selected");
    assert_eq!(value["count"], 1);
}

//! Manifest export of scan results.
//!
//! A report lists either the selected matches or all of them. The text
//! format is the human-readable manifest; CSV and JSON carry the same rows
//! for other tools. Output is a pure function of its inputs plus the
//! generation timestamp, which [`render`] takes as a parameter.

use crate::error::ReportError;
use crate::model::{format_size, MatchedFile};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Width of the `=` rule that opens a text report.
pub const REPORT_RULE_WIDTH: usize = 60;

const GENERATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const ROW_DATE_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Output encoding of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Csv,
    Json,
}

/// Which matches a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportScope {
    /// Only the caller's selection.
    Selected,
    /// Every match.
    All,
}

impl ReportScope {
    pub fn label(self) -> &'static str {
        match self {
            Self::Selected => "SELECTED",
            Self::All => "ALL",
        }
    }
}

/// Pick the rows of a report: the matches whose path is in `selected`, in
/// match order, or every match when the selection is empty.
pub fn select_rows<'a>(
    matches: &'a [MatchedFile],
    selected: &HashSet<PathBuf>,
) -> (ReportScope, Vec<&'a MatchedFile>) {
    if selected.is_empty() {
        (ReportScope::All, matches.iter().collect())
    } else {
        (
            ReportScope::Selected,
            matches.iter().filter(|m| selected.contains(&m.path)).collect(),
        )
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    system: bool,
    path: &'a Path,
    size_bytes: u64,
    size: String,
    modified: String,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    scope: ReportScope,
    generated_at: String,
    scanned_root: &'a Path,
    count: usize,
    files: Vec<&'a MatchedFile>,
}

/// Write a report to `out`.
pub fn render<W: Write>(
    out: &mut W,
    format: ReportFormat,
    matches: &[MatchedFile],
    selected: &HashSet<PathBuf>,
    scanned_root: &Path,
    generated_at: DateTime<Local>,
) -> Result<(), ReportError> {
    let (scope, rows) = select_rows(matches, selected);
    match format {
        ReportFormat::Text => write_text(out, scope, &rows, scanned_root, generated_at)?,
        ReportFormat::Csv => write_csv(out, &rows)?,
        ReportFormat::Json => {
            let doc = JsonReport {
                scope,
                generated_at: generated_at.format(GENERATED_FORMAT).to_string(),
                scanned_root,
                count: rows.len(),
                files: rows,
            };
            serde_json::to_writer_pretty(&mut *out, &doc)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn write_text<W: Write>(
    out: &mut W,
    scope: ReportScope,
    rows: &[&MatchedFile],
    scanned_root: &Path,
    generated_at: DateTime<Local>,
) -> std::io::Result<()> {
    writeln!(out, "{}", "=".repeat(REPORT_RULE_WIDTH))?;
    writeln!(
        out,
        "SCAN REPORT ({}): {}",
        scope.label(),
        generated_at.format(GENERATED_FORMAT)
    )?;
    writeln!(out, "Scanned directory: {}", scanned_root.display())?;
    writeln!(out, "Files included: {}", rows.len())?;
    writeln!(out)?;
    for file in rows {
        let tag = if file.is_system { "[SYSTEM] " } else { "" };
        writeln!(
            out,
            "{tag}{} | Size: {} | Date: {}",
            file.path.display(),
            format_size(file.size),
            file.modified.format(ROW_DATE_FORMAT)
        )?;
    }
    Ok(())
}

fn write_csv<W: Write>(out: &mut W, rows: &[&MatchedFile]) -> Result<(), ReportError> {
    let mut writer = csv::Writer::from_writer(out);
    for file in rows {
        writer.serialize(CsvRow {
            system: file.is_system,
            path: &file.path,
            size_bytes: file.size,
            size: format_size(file.size),
            modified: file.modified.format(ROW_DATE_FORMAT).to_string(),
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Write a report file at `dest`, stamped with the current local time.
///
/// The file is created (or truncated) and written as UTF-8.
pub fn export(
    dest: &Path,
    format: ReportFormat,
    matches: &[MatchedFile],
    selected: &HashSet<PathBuf>,
    scanned_root: &Path,
) -> Result<(), ReportError> {
    let file = File::create(dest).map_err(|source| ReportError::Io {
        path: dest.to_path_buf(),
        source,
    })?;
    let mut out = BufWriter::new(file);
    render(&mut out, format, matches, selected, scanned_root, Local::now())?;
    out.flush().map_err(|source| ReportError::Io {
        path: dest.to_path_buf(),
        source,
    })?;
    info!("Report written to {}", dest.display());
    Ok(())
}

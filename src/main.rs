//! DateSweep — find files by modification date, then act on them in bulk.
//!
//! Thin binary entry point. All logic lives in the `datesweep-core` crate;
//! this file only parses arguments, prints the result tree and dispatches
//! one optional batch action.

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate};
use clap::{ArgGroup, Parser, ValueEnum};
use datesweep_core::model::{format_count, format_size, DirectoryIndex, NodeIndex, SortField, SortOrder};
use datesweep_core::report::ReportFormat;
use datesweep_core::scanner::{parse_day, scan, DateRange, ExtensionFilter, ScanRequest};
use datesweep_core::transfer::{batch_copy, batch_cut, batch_delete, BatchReport};
use datesweep_core::ScanSession;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "datesweep")]
#[command(about = "Find files modified in a date range and copy, move, delete or list them", long_about = None)]
#[command(group(ArgGroup::new("action").args(["copy_to", "move_to", "delete", "export"])))]
struct Cli {
    /// Directory to scan
    root: PathBuf,

    /// First day of the range (DD/MM/YYYY); defaults to today
    #[arg(long, value_parser = parse_day_arg, conflicts_with = "last_days")]
    from: Option<NaiveDate>,

    /// Last day of the range (DD/MM/YYYY); defaults to today
    #[arg(long, value_parser = parse_day_arg, conflicts_with = "last_days")]
    to: Option<NaiveDate>,

    /// Use the last N days up to and including today
    #[arg(long, value_name = "N")]
    last_days: Option<u32>,

    /// Comma-separated extensions to keep, e.g. "txt,.pdf"
    #[arg(long, value_name = "LIST")]
    ext: Option<String>,

    /// Order of the files listed under each directory
    #[arg(long, value_enum, default_value_t = SortArg::Name)]
    sort: SortArg,

    /// Reverse the sort order
    #[arg(long)]
    desc: bool,

    /// Copy the matches here, keeping their layout below ROOT
    #[arg(long, value_name = "DIR")]
    copy_to: Option<PathBuf>,

    /// Move the matches here, keeping their layout below ROOT
    #[arg(long, value_name = "DIR")]
    move_to: Option<PathBuf>,

    /// Delete the matches
    #[arg(long)]
    delete: bool,

    /// Allow --move-to and --delete to touch files flagged as system files
    #[arg(long, short = 'y')]
    yes: bool,

    /// Write a manifest of the matches to FILE
    #[arg(long, value_name = "FILE")]
    export: Option<PathBuf>,

    /// Manifest encoding used with --export
    #[arg(long, value_enum, default_value_t = FormatArg::Text)]
    format: FormatArg,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Name,
    Size,
    Date,
    Type,
}

impl From<SortArg> for SortField {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Name => SortField::Name,
            SortArg::Size => SortField::Size,
            SortArg::Date => SortField::Date,
            SortArg::Type => SortField::Type,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Text,
    Csv,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Csv => ReportFormat::Csv,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

fn parse_day_arg(input: &str) -> Result<NaiveDate, String> {
    parse_day(input).map_err(|e| e.to_string())
}

impl Cli {
    fn range(&self) -> anyhow::Result<DateRange> {
        let today = Local::now().date_naive();
        let range = match self.last_days {
            Some(days) => DateRange::last_days(days, today)?,
            None => DateRange::from_days(self.from.unwrap_or(today), self.to.unwrap_or(today))?,
        };
        Ok(range)
    }

    fn order(&self) -> SortOrder {
        if self.desc {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        }
    }
}

fn print_tree(index: &DirectoryIndex, order: SortOrder) {
    fn visit(index: &DirectoryIndex, node: NodeIndex, order: SortOrder, depth: usize) {
        let indent = "  ".repeat(depth);
        let entry = index.node(node);
        if depth > 0 {
            let marker = if entry.in_range { " *" } else { "" };
            println!("{indent}{}/{marker}", entry.name);
        }
        let file_indent = if depth > 0 { "  ".repeat(depth + 1) } else { String::new() };
        for file in &entry.files {
            let tag = if file.file.is_system { " [SYSTEM]" } else { "" };
            println!(
                "{file_indent}{}  {}  {}{tag}",
                file.display_name,
                format_size(file.file.size),
                file.file.modified.format("%d/%m/%Y %H:%M")
            );
        }
        for child in index.sorted_children(node, order) {
            visit(index, child, order, depth + 1);
        }
    }
    visit(index, index.root(), order, 0);
}

/// Refuse a destructive action on system files unless the user confirmed
/// it up front with `--yes`.
fn check_system_targets(session: &ScanSession, action: &str, confirmed: bool) -> anyhow::Result<()> {
    if confirmed {
        return Ok(());
    }
    let flagged = session.system_targets();
    let Some(first) = flagged.first() else {
        return Ok(());
    };
    bail!(
        "{action} would touch {} system file(s), starting with {}; re-run with --yes to proceed",
        format_count(flagged.len() as u64),
        first.display()
    )
}

fn print_batch(label: &str, report: &BatchReport) {
    let (success, errors) = report.counts();
    println!(
        "{label}: {} succeeded, {} failed",
        format_count(success as u64),
        format_count(errors as u64)
    );
    for (path, err) in &report.failures {
        eprintln!("  {}: {err}", path.display());
    }
}

fn main() -> anyhow::Result<()> {
    // Initialise structured logging; RUST_LOG overrides the default level.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!("DateSweep starting");

    let extensions = cli
        .ext
        .as_deref()
        .map(ExtensionFilter::parse)
        .unwrap_or_default();
    let request = ScanRequest::new(&cli.root, cli.range()?, extensions);
    let outcome =
        scan(&request).with_context(|| format!("scanning {}", cli.root.display()))?;

    let mut session = ScanSession::new(outcome);
    let order = cli.order();
    session.sort(cli.sort.into(), order);

    println!("{}", session.root().display());
    print_tree(session.index(), order);
    let summary = session.summary();
    println!(
        "\n{} files, {}{}",
        format_count(summary.file_count as u64),
        format_size(summary.total_size),
        if summary.has_system_file {
            " (includes system files)"
        } else {
            ""
        }
    );

    let targets = session.targets();
    if let Some(dest) = &cli.copy_to {
        let report = batch_copy(&targets, dest, session.root());
        print_batch("Copy", &report);
    } else if let Some(dest) = &cli.move_to {
        check_system_targets(&session, "Move", cli.yes)?;
        let root = session.root().to_path_buf();
        let report = batch_cut(&targets, dest, &root);
        print_batch("Move", &report);
        session.forget_all(&report.succeeded);
    } else if cli.delete {
        check_system_targets(&session, "Delete", cli.yes)?;
        let report = batch_delete(&targets);
        print_batch("Delete", &report);
        session.forget_all(&report.succeeded);
    } else if let Some(dest) = &cli.export {
        session
            .export(dest, cli.format.into())
            .with_context(|| format!("writing report {}", dest.display()))?;
        println!("Report written to {}", dest.display());
    }

    if session.summary().file_count < summary.file_count {
        tracing::info!(
            "{} matches left after the action",
            session.summary().file_count
        );
    }
    Ok(())
}

//! DateSweep Core — date-range file search, batch transfer, and reporting.
//!
//! This crate contains all business logic with zero UI dependencies.
//! A frontend (the bundled CLI, or any other) drives a scan, shows the
//! resulting index, and hands selected paths back to the transfer engine.
//!
//! # Modules
//!
//! - [`model`] — Matched files, the arena-backed directory index, sorting.
//! - [`scanner`] — Date/extension filtered walk with progress and cancellation.
//! - [`transfer`] — Copy, move and delete, singly or as structure-preserving batches.
//! - [`report`] — Text, CSV and JSON manifests of a scan result.
//! - [`session`] — Caller-side selection and bookkeeping over one result.
//! - [`platform`] — Path normalization and system-file classification.
//! - [`error`] — Error enums shared by the engines.
pub mod error;
pub mod model;
pub mod platform;
pub mod report;
pub mod scanner;
pub mod session;
pub mod transfer;

pub use error::{ReportError, ScanError, TransferError};
pub use session::ScanSession;

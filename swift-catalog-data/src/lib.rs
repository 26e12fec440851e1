//! Snapshot parsing and bulk ingest for the SWIFT code catalog.
//!
//! Responsibilities:
//! - Read the comma-separated snapshot into typed records.
//! - Load countries and branches into any `BranchStore`.
//!
//! Boundaries:
//! - Do not encode lookup rules (live in `swift-catalog-core`).
//! - Never terminate the process; report failures to the caller.

#![forbid(unsafe_code)]

mod ingest;
mod snapshot;

pub use ingest::{
    IngestFailure, IngestReport, TableReport, ingest_snapshot, persist_branches,
    persist_countries, persist_records,
};
pub use snapshot::{SNAPSHOT_COLUMNS, SnapshotError, SnapshotRecord, read_snapshot};

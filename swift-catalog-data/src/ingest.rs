//! Bulk loading of a parsed snapshot into a [`BranchStore`].
//!
//! Countries are written first so branch rows can reference them. Existing
//! keys are skipped, which makes re-running an ingest harmless. Any other
//! storage failure is recorded in the [`IngestReport`] and the loader moves
//! on to the next row.

use std::collections::HashSet;

use camino::Utf8Path;
use log::{debug, info, warn};
use serde::Serialize;
use swift_catalog_core::{BranchStore, StoreError};

use crate::snapshot::{SnapshotError, SnapshotRecord, read_snapshot};

/// Per-table insert outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TableReport {
    /// Rows written.
    pub inserted: u64,
    /// Rows skipped because the key already existed.
    pub duplicates: u64,
    /// Rows rejected for any other reason.
    pub failed: u64,
}

/// A row that could not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestFailure {
    /// Table the row was destined for.
    pub table: &'static str,
    /// Key of the rejected row.
    pub key: String,
    /// Storage explanation.
    pub reason: String,
}

/// Summary of a snapshot ingest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    /// Number of parsed snapshot rows.
    pub records: u64,
    /// Outcomes for the countries table.
    pub countries: TableReport,
    /// Outcomes for the branches table.
    pub branches: TableReport,
    /// Rows rejected for reasons other than a duplicate key, in ingest order.
    pub failures: Vec<IngestFailure>,
}

impl IngestReport {
    /// Return `true` when no row failed.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Parse the snapshot at `path` and load it into `store`.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use swift_catalog_core::SqliteBranchStore;
/// use swift_catalog_data::ingest_snapshot;
///
/// let store = SqliteBranchStore::open(Utf8Path::new("swift_codes.db"))?;
/// let report = ingest_snapshot(&store, Utf8Path::new("SWIFT_CODES.csv"))?;
/// assert!(report.is_complete());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn ingest_snapshot<S>(store: &S, path: &Utf8Path) -> Result<IngestReport, SnapshotError>
where
    S: BranchStore + ?Sized,
{
    let records = read_snapshot(path)?;
    info!("parsed {} snapshot rows from {path}", records.len());
    Ok(persist_records(store, &records))
}

/// Persist countries, then branches, for already-parsed records.
pub fn persist_records<S>(store: &S, records: &[SnapshotRecord]) -> IngestReport
where
    S: BranchStore + ?Sized,
{
    let mut failures = Vec::new();
    let countries = persist_countries(store, records, &mut failures);
    let branches = persist_branches(store, records, &mut failures);
    let report = IngestReport {
        records: count(records.len()),
        countries,
        branches,
        failures,
    };
    info!(
        "ingest finished: countries {} new/{} existing/{} failed, branches {} new/{} existing/{} failed",
        report.countries.inserted,
        report.countries.duplicates,
        report.countries.failed,
        report.branches.inserted,
        report.branches.duplicates,
        report.branches.failed,
    );
    report
}

/// Insert one country per distinct country name, in first-seen order.
///
/// The first record carrying a name decides the ISO code stored for it.
pub fn persist_countries<S>(
    store: &S,
    records: &[SnapshotRecord],
    failures: &mut Vec<IngestFailure>,
) -> TableReport
where
    S: BranchStore + ?Sized,
{
    let mut seen = HashSet::new();
    let mut report = TableReport::default();
    for record in records
        .iter()
        .filter(|record| seen.insert(record.country_name.as_str()))
    {
        let country = record.country();
        let outcome = store.insert_country(&country);
        tally("countries", &country.iso2, outcome, &mut report, failures);
    }
    report
}

/// Insert a branch row for every record, whatever became of its country.
pub fn persist_branches<S>(
    store: &S,
    records: &[SnapshotRecord],
    failures: &mut Vec<IngestFailure>,
) -> TableReport
where
    S: BranchStore + ?Sized,
{
    let mut report = TableReport::default();
    for record in records {
        let outcome = store.insert_branch(&record.branch());
        tally("branches", &record.swift_code, outcome, &mut report, failures);
    }
    report
}

fn tally(
    table: &'static str,
    key: &str,
    outcome: Result<(), StoreError>,
    report: &mut TableReport,
    failures: &mut Vec<IngestFailure>,
) {
    match outcome {
        Ok(()) => report.inserted += 1,
        Err(err) if err.is_duplicate() => {
            debug!("skipping existing {table} row {key}");
            report.duplicates += 1;
        }
        Err(err) => {
            warn!("failed to store {table} row {key}: {err}");
            report.failed += 1;
            failures.push(IngestFailure {
                table,
                key: key.to_owned(),
                reason: err.to_string(),
            });
        }
    }
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

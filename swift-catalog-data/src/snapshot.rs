//! Reader for the comma-separated SWIFT code snapshot.
//!
//! The snapshot carries a header row followed by rows with exactly eight
//! columns, mapped positionally:
//!
//! | # | column        |
//! |---|---------------|
//! | 0 | country ISO2  |
//! | 1 | SWIFT code    |
//! | 2 | code type     |
//! | 3 | bank name     |
//! | 4 | address       |
//! | 5 | town name     |
//! | 6 | country name  |
//! | 7 | time zone     |

use camino::{Utf8Path, Utf8PathBuf};
use csv::{ReaderBuilder, StringRecord};
use swift_catalog_core::{BranchRecord, Country, is_headquarter_code};
use thiserror::Error;

/// Number of columns every snapshot row must carry.
pub const SNAPSHOT_COLUMNS: usize = 8;

/// One parsed snapshot row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotRecord {
    /// Column 0.
    pub country_iso2: String,
    /// Column 1.
    pub swift_code: String,
    /// Informational only; never persisted.
    pub code_type: String,
    /// Bank name, column 3.
    pub name: String,
    /// Column 4.
    pub address: String,
    /// Column 5.
    pub town_name: String,
    /// Column 6.
    pub country_name: String,
    /// Column 7.
    pub time_zone: String,
    /// Derived from the `XXX` suffix of [`Self::swift_code`].
    pub is_headquarter: bool,
}

impl SnapshotRecord {
    fn from_row(row: &StringRecord) -> Self {
        let column = |index: usize| row.get(index).unwrap_or_default().to_owned();
        let swift_code = column(1);
        Self {
            country_iso2: column(0),
            is_headquarter: is_headquarter_code(&swift_code),
            swift_code,
            code_type: column(2),
            name: column(3),
            address: column(4),
            town_name: column(5),
            country_name: column(6),
            time_zone: column(7),
        }
    }

    /// Country referenced by the row.
    #[must_use]
    pub fn country(&self) -> Country {
        Country::new(self.country_iso2.as_str(), self.country_name.as_str())
    }

    /// Branch row to persist for this record.
    #[must_use]
    pub fn branch(&self) -> BranchRecord {
        BranchRecord {
            swift_code: self.swift_code.clone(),
            name: self.name.clone(),
            address: self.address.clone(),
            town_name: self.town_name.clone(),
            time_zone: self.time_zone.clone(),
            country_iso2: self.country_iso2.clone(),
            is_headquarter: self.is_headquarter,
        }
    }
}

/// Errors raised while reading a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot could not be opened.
    #[error("failed to open snapshot at {path}")]
    SourceUnavailable {
        /// Path that was opened.
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A row did not carry the expected number of columns.
    #[error("snapshot line {line} has {found} columns, expected {SNAPSHOT_COLUMNS}")]
    MalformedInput {
        /// One-based line number in the file.
        line: u64,
        /// Number of columns found on the line.
        found: usize,
    },
    /// The CSV decoder failed.
    #[error("failed to read snapshot at {path}")]
    Read {
        /// Path being read.
        path: Utf8PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Parse every data row of the snapshot at `path`.
///
/// The header row is skipped and every cell is kept exactly as written.
/// Rows are returned in file order.
///
/// # Examples
/// ```no_run
/// use camino::Utf8Path;
/// use swift_catalog_data::read_snapshot;
///
/// let records = read_snapshot(Utf8Path::new("SWIFT_CODES.csv"))?;
/// println!("{} rows", records.len());
/// # Ok::<(), swift_catalog_data::SnapshotError>(())
/// ```
pub fn read_snapshot(path: &Utf8Path) -> Result<Vec<SnapshotRecord>, SnapshotError> {
    let file = swift_catalog_fs::open_utf8_file(path).map_err(|source| {
        SnapshotError::SourceUnavailable {
            path: path.to_path_buf(),
            source,
        }
    })?;
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(|source| SnapshotError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if row.len() != SNAPSHOT_COLUMNS {
            return Err(SnapshotError::MalformedInput {
                line: row.position().map_or(0, csv::Position::line),
                found: row.len(),
            });
        }
        records.push(SnapshotRecord::from_row(&row));
    }
    Ok(records)
}

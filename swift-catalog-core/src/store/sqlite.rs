//! SQLite-backed store for countries and branch records.

use std::{
    fmt,
    sync::{Mutex, MutexGuard},
    thread,
    time::Duration,
};

use camino::{Utf8Path, Utf8PathBuf};
use log::{info, warn};
use rusqlite::{Connection, Error as SqliteError, ErrorCode, OptionalExtension, Row, ffi};
use thiserror::Error;

use crate::{BranchEntry, BranchRecord, Country};

use super::schema::{SchemaError, initialise_schema};
use super::{BranchStore, StoreCounts, StoreError};

const BRANCH_COLUMNS: &str = "b.swift_code, b.name, b.address, b.town_name, b.time_zone, \
     b.country_iso2, b.is_headquarter";

/// Error raised when opening the catalog database.
#[derive(Debug, Error)]
pub enum SqliteBranchStoreError {
    /// Creating the parent directory of the database failed.
    #[error("failed to create parent directory for {path}")]
    CreateDirectory {
        /// Requested database path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Opening the SQLite database failed.
    #[error("failed to open SQLite database at {path}: {source}")]
    OpenDatabase {
        /// Location of the SQLite database on disk.
        path: Utf8PathBuf,
        /// Source error returned by `rusqlite`.
        #[source]
        source: SqliteError,
    },
    /// Preparing the tables failed.
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Bounded, fixed-delay retry schedule used when bootstrapping the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of attempts, including the first. Zero behaves like one.
    pub attempts: u32,
    /// Pause between consecutive attempts.
    pub delay: Duration,
}

impl RetryPolicy {
    /// Default number of attempts.
    pub const DEFAULT_ATTEMPTS: u32 = 5;
    /// Default pause between attempts.
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(1);

    /// Retry up to `attempts` times, pausing `delay` between attempts.
    #[must_use]
    pub const fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    const fn effective_attempts(self) -> u32 {
        if self.attempts == 0 { 1 } else { self.attempts }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ATTEMPTS, Self::DEFAULT_DELAY)
    }
}

/// Read-write catalog store backed by a single SQLite connection.
///
/// Calls are serialised through a mutex; the store adds no further
/// coordination between concurrent callers.
pub struct SqliteBranchStore {
    connection: Mutex<Connection>,
    location: Option<Utf8PathBuf>,
}

impl fmt::Debug for SqliteBranchStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteBranchStore")
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

impl SqliteBranchStore {
    /// Open (or create) the database at `path` and initialise its schema.
    ///
    /// Parent directories are created when missing.
    pub fn open(path: &Utf8Path) -> Result<Self, SqliteBranchStoreError> {
        swift_catalog_fs::ensure_parent_dir(path).map_err(|source| {
            SqliteBranchStoreError::CreateDirectory {
                path: path.to_path_buf(),
                source,
            }
        })?;
        let connection = Connection::open(path.as_std_path()).map_err(|source| {
            SqliteBranchStoreError::OpenDatabase {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_connection(connection, Some(path.to_path_buf()))
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> Result<Self, SqliteBranchStoreError> {
        let connection =
            Connection::open_in_memory().map_err(|source| SqliteBranchStoreError::OpenDatabase {
                path: Utf8PathBuf::from(":memory:"),
                source,
            })?;
        Self::from_connection(connection, None)
    }

    /// Open the database, retrying with a fixed delay until the policy's
    /// attempts are spent. The last failure is returned.
    ///
    /// # Examples
    /// ```no_run
    /// use camino::Utf8Path;
    /// use swift_catalog_core::{RetryPolicy, SqliteBranchStore};
    ///
    /// let store = SqliteBranchStore::open_with_retry(
    ///     Utf8Path::new("data/swift_codes.db"),
    ///     RetryPolicy::default(),
    /// )?;
    /// # Ok::<(), swift_catalog_core::SqliteBranchStoreError>(())
    /// ```
    pub fn open_with_retry(
        path: &Utf8Path,
        policy: RetryPolicy,
    ) -> Result<Self, SqliteBranchStoreError> {
        let attempts = policy.effective_attempts();
        let mut attempt = 1;
        loop {
            match Self::open(path) {
                Ok(store) => {
                    info!("connected to catalog database at {path}");
                    return Ok(store);
                }
                Err(err) if attempt < attempts => {
                    warn!("cannot open catalog database, try {attempt}/{attempts}: {err}");
                    thread::sleep(policy.delay);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn from_connection(
        mut connection: Connection,
        location: Option<Utf8PathBuf>,
    ) -> Result<Self, SqliteBranchStoreError> {
        initialise_schema(&mut connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
            location,
        })
    }

    /// Path of the backing database, or `None` when held in memory.
    #[must_use]
    pub fn location(&self) -> Option<&Utf8Path> {
        self.location.as_deref()
    }

    fn connection(&self, operation: &'static str) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.connection
            .lock()
            .map_err(|_| StoreError::Unavailable {
                operation,
                source: "connection lock poisoned".into(),
            })
    }
}

impl BranchStore for SqliteBranchStore {
    fn insert_country(&self, country: &Country) -> Result<(), StoreError> {
        const OPERATION: &str = "insert country";
        let connection = self.connection(OPERATION)?;
        connection
            .prepare_cached("INSERT INTO countries (country_iso2, country_name) VALUES (?1, ?2)")
            .and_then(|mut statement| statement.execute((&country.iso2, &country.name)))
            .map(|_| ())
            .map_err(|source| {
                classify_insert_error(
                    source,
                    InsertTarget {
                        operation: OPERATION,
                        table: "countries",
                        key: &country.iso2,
                        country_iso2: &country.iso2,
                    },
                )
            })
    }

    fn insert_branch(&self, branch: &BranchRecord) -> Result<(), StoreError> {
        const OPERATION: &str = "insert branch";
        let connection = self.connection(OPERATION)?;
        connection
            .prepare_cached(
                "INSERT INTO branches (
                    swift_code,
                    name,
                    address,
                    town_name,
                    time_zone,
                    country_iso2,
                    is_headquarter
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )
            .and_then(|mut statement| {
                statement.execute((
                    &branch.swift_code,
                    &branch.name,
                    &branch.address,
                    &branch.town_name,
                    &branch.time_zone,
                    &branch.country_iso2,
                    branch.is_headquarter,
                ))
            })
            .map(|_| ())
            .map_err(|source| {
                classify_insert_error(
                    source,
                    InsertTarget {
                        operation: OPERATION,
                        table: "branches",
                        key: &branch.swift_code,
                        country_iso2: &branch.country_iso2,
                    },
                )
            })
    }

    fn find_branch(&self, swift_code: &str) -> Result<Option<BranchEntry>, StoreError> {
        const OPERATION: &str = "find branch";
        let connection = self.connection(OPERATION)?;
        let query = format!(
            "SELECT {BRANCH_COLUMNS}, c.country_name
             FROM branches AS b
             JOIN countries AS c ON c.country_iso2 = b.country_iso2
             WHERE b.swift_code = ?1"
        );
        connection
            .prepare_cached(&query)
            .and_then(|mut statement| statement.query_row([swift_code], read_entry).optional())
            .map_err(unavailable(OPERATION))
    }

    fn find_branches_with_prefix(&self, prefix: &str) -> Result<Vec<BranchEntry>, StoreError> {
        const OPERATION: &str = "find branches by prefix";
        let connection = self.connection(OPERATION)?;
        // `substr` keeps the match literal and case-sensitive, unlike `LIKE`.
        let query = format!(
            "SELECT {BRANCH_COLUMNS}, c.country_name
             FROM branches AS b
             JOIN countries AS c ON c.country_iso2 = b.country_iso2
             WHERE substr(b.swift_code, 1, length(?1)) = ?1
             ORDER BY b.swift_code"
        );
        connection
            .prepare_cached(&query)
            .and_then(|mut statement| {
                statement
                    .query_map([prefix], read_entry)?
                    .collect::<Result<Vec<_>, _>>()
            })
            .map_err(unavailable(OPERATION))
    }

    fn find_country(&self, country_iso2: &str) -> Result<Option<Country>, StoreError> {
        const OPERATION: &str = "find country";
        let connection = self.connection(OPERATION)?;
        connection
            .prepare_cached(
                "SELECT country_iso2, country_name FROM countries WHERE country_iso2 = ?1",
            )
            .and_then(|mut statement| {
                statement
                    .query_row([country_iso2], |row| {
                        Ok(Country {
                            iso2: row.get(0)?,
                            name: row.get(1)?,
                        })
                    })
                    .optional()
            })
            .map_err(unavailable(OPERATION))
    }

    fn find_branches_in_country(
        &self,
        country_iso2: &str,
    ) -> Result<Vec<BranchRecord>, StoreError> {
        const OPERATION: &str = "find branches by country";
        let connection = self.connection(OPERATION)?;
        let query = format!(
            "SELECT {BRANCH_COLUMNS}
             FROM branches AS b
             WHERE b.country_iso2 = ?1
             ORDER BY b.swift_code"
        );
        connection
            .prepare_cached(&query)
            .and_then(|mut statement| {
                statement
                    .query_map([country_iso2], read_record)?
                    .collect::<Result<Vec<_>, _>>()
            })
            .map_err(unavailable(OPERATION))
    }

    fn delete_branch(&self, swift_code: &str) -> Result<usize, StoreError> {
        const OPERATION: &str = "delete branch";
        let connection = self.connection(OPERATION)?;
        connection
            .prepare_cached("DELETE FROM branches WHERE swift_code = ?1")
            .and_then(|mut statement| statement.execute([swift_code]))
            .map_err(unavailable(OPERATION))
    }

    fn counts(&self) -> Result<StoreCounts, StoreError> {
        const OPERATION: &str = "count rows";
        let connection = self.connection(OPERATION)?;
        let count = |table_query: &str| -> Result<u64, StoreError> {
            connection
                .query_row(table_query, [], |row| row.get::<_, i64>(0))
                .map(|value| u64::try_from(value).unwrap_or_default())
                .map_err(unavailable(OPERATION))
        };
        Ok(StoreCounts {
            countries: count("SELECT COUNT(*) FROM countries")?,
            branches: count("SELECT COUNT(*) FROM branches")?,
        })
    }
}

fn read_record(row: &Row<'_>) -> rusqlite::Result<BranchRecord> {
    Ok(BranchRecord {
        swift_code: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        town_name: row.get(3)?,
        time_zone: row.get(4)?,
        country_iso2: row.get(5)?,
        is_headquarter: row.get(6)?,
    })
}

fn read_entry(row: &Row<'_>) -> rusqlite::Result<BranchEntry> {
    Ok(BranchEntry {
        record: read_record(row)?,
        country_name: row.get(7)?,
    })
}

fn unavailable(operation: &'static str) -> impl FnOnce(SqliteError) -> StoreError {
    move |source| StoreError::Unavailable {
        operation,
        source: Box::new(source),
    }
}

struct InsertTarget<'a> {
    operation: &'static str,
    table: &'static str,
    key: &'a str,
    country_iso2: &'a str,
}

fn classify_insert_error(error: SqliteError, target: InsertTarget<'_>) -> StoreError {
    let SqliteError::SqliteFailure(failure, message) = &error else {
        return unavailable(target.operation)(error);
    };
    match failure.extended_code {
        ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
            StoreError::Duplicate {
                table: target.table,
                key: target.key.to_owned(),
            }
        }
        ffi::SQLITE_CONSTRAINT_FOREIGNKEY => StoreError::UnknownCountry {
            country_iso2: target.country_iso2.to_owned(),
        },
        _ if failure.code == ErrorCode::ConstraintViolation => StoreError::Constraint {
            operation: target.operation,
            message: message.clone().unwrap_or_else(|| error.to_string()),
        },
        _ => unavailable(target.operation)(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn store() -> SqliteBranchStore {
        let store = SqliteBranchStore::open_in_memory().expect("open in-memory store");
        store
            .insert_country(&Country::new("CL", "CHILE"))
            .expect("seed country");
        store
    }

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn branch(code: &str) -> BranchRecord {
        BranchRecord::derived(code, "BANCO DE CHILE", "Ahumada 251", "Santiago", "Pacific/Easter", "CL")
    }

    fn utf8_path(dir: &TempDir, name: &str) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf-8 path")
    }

    #[rstest]
    fn classifies_duplicate_country(store: SqliteBranchStore) {
        let err = store
            .insert_country(&Country::new("CL", "CHILE"))
            .expect_err("duplicate country");
        assert!(matches!(err, StoreError::Duplicate { table: "countries", key } if key == "CL"));
    }

    #[rstest]
    fn classifies_duplicate_branch(store: SqliteBranchStore) {
        store.insert_branch(&branch("BCHICLRMXXX")).expect("insert");
        let err = store
            .insert_branch(&branch("BCHICLRMXXX"))
            .expect_err("duplicate branch");
        assert!(matches!(err, StoreError::Duplicate { table: "branches", key } if key == "BCHICLRMXXX"));
    }

    #[rstest]
    fn classifies_missing_country(store: SqliteBranchStore) {
        let mut record = branch("BCHICLRMXXX");
        record.country_iso2 = "AR".into();
        let err = store.insert_branch(&record).expect_err("unknown country");
        assert!(matches!(err, StoreError::UnknownCountry { country_iso2 } if country_iso2 == "AR"));
    }

    #[rstest]
    fn classifies_other_constraints(store: SqliteBranchStore) {
        let err = store.insert_branch(&branch("   ")).expect_err("blank code");
        assert!(matches!(err, StoreError::Constraint { operation: "insert branch", .. }));
    }

    #[rstest]
    fn joins_country_name(store: SqliteBranchStore) {
        store.insert_branch(&branch("BCHICLRMIOB")).expect("insert");
        let entry = store
            .find_branch("BCHICLRMIOB")
            .expect("query")
            .expect("row present");
        assert_eq!(entry.country_name, "CHILE");
        assert_eq!(entry.record, branch("BCHICLRMIOB"));
    }

    #[rstest]
    fn exact_lookup_is_case_sensitive(store: SqliteBranchStore) {
        store.insert_branch(&branch("BCHICLRMIOB")).expect("insert");
        assert!(store.find_branch("bchiclrmiob").expect("query").is_none());
    }

    #[rstest]
    fn prefix_match_is_literal(store: SqliteBranchStore) {
        for code in ["BCHICLRMXXX", "BCHICLRMIOB", "BCHICLR_ABC", "BCHICLRNIOB"] {
            store.insert_branch(&branch(code)).expect("insert");
        }
        let codes: Vec<_> = store
            .find_branches_with_prefix("BCHICLRM")
            .expect("query")
            .into_iter()
            .map(|entry| entry.record.swift_code)
            .collect();
        assert_eq!(codes, vec!["BCHICLRMIOB", "BCHICLRMXXX"]);

        let wildcard = store
            .find_branches_with_prefix("BCHICLR_")
            .expect("query");
        assert_eq!(wildcard.len(), 1, "underscore must not act as a wildcard");
    }

    #[rstest]
    fn deletes_single_row(store: SqliteBranchStore) {
        store.insert_branch(&branch("BCHICLRMIOB")).expect("insert");
        assert_eq!(store.delete_branch("BCHICLRMIOB").expect("delete"), 1);
        assert_eq!(store.delete_branch("BCHICLRMIOB").expect("delete"), 0);
        assert_eq!(store.counts().expect("count").branches, 0);
    }

    #[rstest]
    fn persists_across_reopen(temp_dir: TempDir) {
        let path = utf8_path(&temp_dir, "nested/catalog.db");
        {
            let store = SqliteBranchStore::open(&path).expect("open store");
            store
                .insert_country(&Country::new("CL", "CHILE"))
                .expect("insert country");
            store.insert_branch(&branch("BCHICLRMXXX")).expect("insert branch");
        }
        let reopened = SqliteBranchStore::open(&path).expect("reopen store");
        assert_eq!(reopened.location(), Some(path.as_path()));
        assert_eq!(
            reopened.counts().expect("count"),
            StoreCounts {
                countries: 1,
                branches: 1
            }
        );
    }

    #[rstest]
    fn retry_gives_up_after_policy_attempts(temp_dir: TempDir) {
        let directory = Utf8PathBuf::from_path_buf(temp_dir.path().to_path_buf()).expect("utf-8 path");
        let outcome = SqliteBranchStore::open_with_retry(&directory, RetryPolicy::new(2, Duration::ZERO));
        assert!(outcome.is_err(), "a directory cannot be opened as a database");
    }

    #[rstest]
    #[case(RetryPolicy::new(0, Duration::ZERO), 1)]
    #[case(RetryPolicy::new(3, Duration::ZERO), 3)]
    fn zero_attempts_still_tries_once(#[case] policy: RetryPolicy, #[case] expected: u32) {
        assert_eq!(policy.effective_attempts(), expected);
    }
}

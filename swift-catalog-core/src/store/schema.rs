//! Table definitions backing [`SqliteBranchStore`](super::SqliteBranchStore).

use rusqlite::{Connection, Error as SqliteError, Transaction};
use thiserror::Error;

/// Create the `countries` and `branches` tables when missing.
///
/// Foreign keys are enabled on the connection so branch inserts referencing
/// an unknown country are rejected. Existing tables are left untouched.
///
/// # Examples
/// ```
/// use rusqlite::Connection;
/// use swift_catalog_core::store::initialise_schema;
///
/// let mut conn = Connection::open_in_memory().expect("create in-memory database");
/// initialise_schema(&mut conn).expect("create schema");
///
/// let tables: i64 = conn
///     .query_row(
///         "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('countries', 'branches')",
///         [],
///         |row| row.get(0),
///     )
///     .expect("count tables");
/// assert_eq!(tables, 2);
/// ```
pub fn initialise_schema(connection: &mut Connection) -> Result<(), SchemaError> {
    connection
        .pragma_update(None, "foreign_keys", true)
        .map_err(|source| SchemaError::ForeignKeys { source })?;

    let transaction = connection
        .transaction()
        .map_err(|source| SchemaError::Step {
            step: "begin schema transaction",
            source,
        })?;

    create_tables(&transaction)?;
    create_indexes(&transaction)?;

    transaction.commit().map_err(|source| SchemaError::Step {
        step: "commit schema transaction",
        source,
    })
}

fn create_tables(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_schema_step(
        transaction,
        "create countries",
        "CREATE TABLE IF NOT EXISTS countries (
            country_iso2 TEXT PRIMARY KEY CHECK (length(trim(country_iso2)) > 0),
            country_name TEXT NOT NULL
        ) WITHOUT ROWID",
    )?;
    run_schema_step(
        transaction,
        "create branches",
        "CREATE TABLE IF NOT EXISTS branches (
            swift_code TEXT PRIMARY KEY CHECK (length(trim(swift_code)) > 0),
            name TEXT NOT NULL,
            address TEXT NOT NULL DEFAULT '',
            town_name TEXT NOT NULL DEFAULT '',
            time_zone TEXT NOT NULL DEFAULT '',
            country_iso2 TEXT NOT NULL REFERENCES countries(country_iso2),
            is_headquarter INTEGER NOT NULL CHECK (is_headquarter IN (0, 1))
        ) WITHOUT ROWID",
    )
}

fn create_indexes(transaction: &Transaction<'_>) -> Result<(), SchemaError> {
    run_schema_step(
        transaction,
        "index branches by country",
        "CREATE INDEX IF NOT EXISTS idx_branches_country
            ON branches(country_iso2, swift_code)",
    )
}

fn run_schema_step(
    transaction: &Transaction<'_>,
    step: &'static str,
    sql: &str,
) -> Result<(), SchemaError> {
    transaction
        .execute(sql, [])
        .map(|_| ())
        .map_err(|source| SchemaError::Step { step, source })
}

/// Errors raised when initialising the catalog schema.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("failed to enable SQLite foreign keys")]
    ForeignKeys {
        #[source]
        source: SqliteError,
    },
    #[error("failed to execute schema step '{step}'")]
    Step {
        step: &'static str,
        #[source]
        source: SqliteError,
    },
}

//! Data access traits for countries and branch records.
//!
//! The [`BranchStore`] trait is the narrow relational interface the directory
//! and the ingest loader consume. Implementations own their connection
//! handling; callers pass the store explicitly to every operation.

use thiserror::Error;

use crate::{BranchEntry, BranchRecord, Country};

#[cfg(feature = "store-sqlite")]
mod schema;
#[cfg(feature = "store-sqlite")]
mod sqlite;

#[cfg(feature = "store-sqlite")]
pub use schema::{SchemaError, initialise_schema};
#[cfg(feature = "store-sqlite")]
pub use sqlite::{RetryPolicy, SqliteBranchStore, SqliteBranchStoreError};

/// Source error carried by [`StoreError::Unavailable`].
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Outcome of a failed store call, classified by cause.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A row with the same primary key already exists.
    #[error("{table} row {key} already exists")]
    Duplicate {
        /// Table that rejected the insert.
        table: &'static str,
        /// Conflicting key.
        key: String,
    },
    /// The branch references a country that is not stored.
    #[error("country {country_iso2} is not registered")]
    UnknownCountry {
        /// Referenced country code.
        country_iso2: String,
    },
    /// Any other constraint rejected the write.
    #[error("{operation} violated a storage constraint: {message}")]
    Constraint {
        /// Description of the failed operation.
        operation: &'static str,
        /// Message reported by the storage engine.
        message: String,
    },
    /// The store could not serve the request.
    #[error("storage unavailable during {operation}: {source}")]
    Unavailable {
        /// Description of the failed operation.
        operation: &'static str,
        /// Underlying failure.
        #[source]
        source: BoxedSource,
    },
}

impl StoreError {
    /// Return `true` for duplicate-key outcomes.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// Row counts per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreCounts {
    /// Rows in the countries table.
    pub countries: u64,
    /// Rows in the branches table.
    pub branches: u64,
}

/// Relational access to the `countries` and `branches` tables.
///
/// Lookups match keys exactly. Listing methods return rows ordered by SWIFT
/// code. Inserts never overwrite: an existing key yields
/// [`StoreError::Duplicate`], and a branch whose country is missing yields
/// [`StoreError::UnknownCountry`].
///
/// # Examples
///
/// ```rust
/// use swift_catalog_core::{BranchRecord, BranchStore, Country, SqliteBranchStore};
///
/// let store = SqliteBranchStore::open_in_memory().expect("open store");
/// store.insert_country(&Country::new("PL", "POLAND")).expect("insert country");
/// store
///     .insert_branch(&BranchRecord::derived("ABCABCABCAB", "ABC BANK", "Main Street", "Warsaw", "Europe/Warsaw", "PL"))
///     .expect("insert branch");
///
/// let entry = store.find_branch("ABCABCABCAB").expect("query").expect("row present");
/// assert_eq!(entry.country_name, "POLAND");
/// ```
pub trait BranchStore {
    /// Insert a country row.
    fn insert_country(&self, country: &Country) -> Result<(), StoreError>;

    /// Insert a branch row.
    fn insert_branch(&self, branch: &BranchRecord) -> Result<(), StoreError>;

    /// Fetch a branch by exact SWIFT code, joined with its country name.
    fn find_branch(&self, swift_code: &str) -> Result<Option<BranchEntry>, StoreError>;

    /// Fetch every branch whose SWIFT code starts with `prefix`.
    fn find_branches_with_prefix(&self, prefix: &str) -> Result<Vec<BranchEntry>, StoreError>;

    /// Fetch a country by exact ISO code.
    fn find_country(&self, country_iso2: &str) -> Result<Option<Country>, StoreError>;

    /// Fetch every branch registered under the country.
    fn find_branches_in_country(
        &self,
        country_iso2: &str,
    ) -> Result<Vec<BranchRecord>, StoreError>;

    /// Delete a branch by exact SWIFT code, returning the number of rows removed.
    fn delete_branch(&self, swift_code: &str) -> Result<usize, StoreError>;

    /// Count the rows in each table.
    fn counts(&self) -> Result<StoreCounts, StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryStore;
    use rstest::{fixture, rstest};

    #[fixture]
    fn store() -> MemoryStore {
        MemoryStore::with_countries([Country::new("PL", "POLAND")])
    }

    fn branch(code: &str) -> BranchRecord {
        BranchRecord::derived(code, "ABC BANK", "Main Street", "Warsaw", "Europe/Warsaw", "PL")
    }

    #[rstest]
    fn rejects_duplicate_branch(store: MemoryStore) {
        store.insert_branch(&branch("ABCABCABCAB")).expect("first insert");
        let err = store
            .insert_branch(&branch("ABCABCABCAB"))
            .expect_err("duplicate must fail");
        assert!(err.is_duplicate());
    }

    #[rstest]
    fn rejects_branch_for_unknown_country(store: MemoryStore) {
        let mut record = branch("ABCABCABCAB");
        record.country_iso2 = "DE".into();
        let err = store.insert_branch(&record).expect_err("missing country");
        assert!(matches!(err, StoreError::UnknownCountry { country_iso2 } if country_iso2 == "DE"));
    }

    #[rstest]
    fn lists_prefix_matches_in_code_order(store: MemoryStore) {
        for code in ["ABCABCABZZZ", "ABCABCABXXX", "ABCABCAB001", "ZZZABCABCAB"] {
            store.insert_branch(&branch(code)).expect("insert");
        }
        let codes: Vec<_> = store
            .find_branches_with_prefix("ABCABCAB")
            .expect("query")
            .into_iter()
            .map(|entry| entry.record.swift_code)
            .collect();
        assert_eq!(codes, vec!["ABCABCAB001", "ABCABCABXXX", "ABCABCABZZZ"]);
    }

    #[rstest]
    fn delete_reports_affected_rows(store: MemoryStore) {
        store.insert_branch(&branch("ABCABCABCAB")).expect("insert");
        assert_eq!(store.delete_branch("ABCABCABCAB").expect("delete"), 1);
        assert_eq!(store.delete_branch("ABCABCABCAB").expect("delete"), 0);
    }
}

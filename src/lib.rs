//! Facade crate for the SWIFT code catalog.
//!
//! This crate re-exports the core directory types and exposes the SQLite
//! store and the snapshot loader behind feature flags.

#![forbid(unsafe_code)]

pub use swift_catalog_core::{
    BranchEntry, BranchRecord, BranchStore, BranchView, Country, CountryBranchView, CountryView,
    DirectoryError, HEADQUARTER_SUFFIX, HeadquarterView, MessageView, StoreCounts, StoreError,
    SwiftCodeView, create_branch, delete_branch, headquarter_prefix, is_branch_of,
    is_headquarter_code, resolve_by_country, resolve_by_swift,
};

#[cfg(feature = "store-sqlite")]
pub use swift_catalog_core::{RetryPolicy, SqliteBranchStore, SqliteBranchStoreError};

#[cfg(feature = "ingest")]
pub use swift_catalog_data::{
    IngestFailure, IngestReport, SnapshotError, SnapshotRecord, TableReport, ingest_snapshot,
    read_snapshot,
};

//! Core domain types and operations for the SWIFT code catalog.
//!
//! Records describe countries and the bank branches registered under them.
//! The [`BranchStore`] trait abstracts relational storage, and the directory
//! functions ([`resolve_by_swift`], [`resolve_by_country`],
//! [`create_branch`], [`delete_branch`]) answer requests against any store.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod code;
mod directory;
mod record;
pub mod store;
#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;
mod view;

pub use code::{HEADQUARTER_SUFFIX, headquarter_prefix, is_branch_of, is_headquarter_code};
pub use directory::{
    DirectoryError, create_branch, delete_branch, resolve_by_country, resolve_by_swift,
};
pub use record::{BranchEntry, BranchRecord, Country};
pub use store::{BranchStore, StoreCounts, StoreError};
#[cfg(feature = "store-sqlite")]
pub use store::{RetryPolicy, SqliteBranchStore, SqliteBranchStoreError};
pub use view::{
    BranchView, CountryBranchView, CountryView, HeadquarterView, MessageView, SwiftCodeView,
};

//! Response and request shapes exchanged with callers of the directory.
//!
//! Field names serialise to the camelCase wire names used by the catalog's
//! clients (`bankName`, `countryISO2`, `isHeadquarter`, ...).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{BranchEntry, BranchRecord};

/// A single branch or headquarter, with its country name joined in.
///
/// Also serves as the input of [`create_branch`](crate::create_branch).
/// Missing fields deserialise as empty values so validation can report them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct BranchView {
    /// Street address.
    pub address: String,
    /// Name of the bank.
    pub bank_name: String,
    /// Two-letter ISO country code.
    #[cfg_attr(feature = "serde", serde(rename = "countryISO2"))]
    pub country_iso2: String,
    /// Name of the country.
    pub country_name: String,
    /// Whether the row is a headquarter.
    pub is_headquarter: bool,
    /// SWIFT code of the row.
    pub swift_code: String,
}

impl From<BranchEntry> for BranchView {
    fn from(entry: BranchEntry) -> Self {
        let BranchEntry {
            record,
            country_name,
        } = entry;
        Self {
            address: record.address,
            bank_name: record.name,
            country_iso2: record.country_iso2,
            country_name,
            is_headquarter: record.is_headquarter,
            swift_code: record.swift_code,
        }
    }
}

/// A headquarter together with the branches sharing its prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct HeadquarterView {
    /// Street address.
    pub address: String,
    /// Name of the bank.
    pub bank_name: String,
    /// Two-letter ISO country code.
    #[cfg_attr(feature = "serde", serde(rename = "countryISO2"))]
    pub country_iso2: String,
    /// Name of the country.
    pub country_name: String,
    /// Whether the row is a headquarter.
    pub is_headquarter: bool,
    /// SWIFT code of the row.
    pub swift_code: String,
    /// Branches ordered by SWIFT code; empty when none exist.
    pub branches: Vec<BranchView>,
}

impl HeadquarterView {
    /// Embed `branches` under the headquarter described by `base`.
    #[must_use]
    pub fn new(base: BranchView, branches: Vec<BranchView>) -> Self {
        Self {
            address: base.address,
            bank_name: base.bank_name,
            country_iso2: base.country_iso2,
            country_name: base.country_name,
            is_headquarter: base.is_headquarter,
            swift_code: base.swift_code,
            branches,
        }
    }
}

/// Result of resolving a SWIFT code.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum SwiftCodeView {
    /// A headquarter with its branches embedded.
    Headquarter(HeadquarterView),
    /// A branch on its own.
    Branch(BranchView),
}

impl SwiftCodeView {
    /// SWIFT code of the resolved row.
    #[must_use]
    pub fn swift_code(&self) -> &str {
        match self {
            Self::Headquarter(view) => &view.swift_code,
            Self::Branch(view) => &view.swift_code,
        }
    }

    /// Stored headquarter flag of the resolved row.
    #[must_use]
    pub const fn is_headquarter(&self) -> bool {
        match self {
            Self::Headquarter(view) => view.is_headquarter,
            Self::Branch(view) => view.is_headquarter,
        }
    }
}

/// Compact branch listing used inside a [`CountryView`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CountryBranchView {
    /// Street address.
    pub address: String,
    /// Name of the bank.
    pub bank_name: String,
    /// Two-letter ISO country code.
    #[cfg_attr(feature = "serde", serde(rename = "countryISO2"))]
    pub country_iso2: String,
    /// Whether the row is a headquarter.
    pub is_headquarter: bool,
    /// SWIFT code of the row.
    pub swift_code: String,
}

impl From<BranchRecord> for CountryBranchView {
    fn from(record: BranchRecord) -> Self {
        Self {
            address: record.address,
            bank_name: record.name,
            country_iso2: record.country_iso2,
            is_headquarter: record.is_headquarter,
            swift_code: record.swift_code,
        }
    }
}

/// A country and every SWIFT code registered under it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct CountryView {
    /// Two-letter ISO country code.
    #[cfg_attr(feature = "serde", serde(rename = "countryISO2"))]
    pub country_iso2: String,
    /// Name of the country.
    pub country_name: String,
    /// Codes registered under the country, ordered by SWIFT code.
    pub swift_codes: Vec<CountryBranchView>,
}

/// Acknowledgement returned by write operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MessageView {
    /// Human-readable outcome.
    pub message: String,
}

impl MessageView {
    /// Wrap `message` for output.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

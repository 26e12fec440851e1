//! Test-only, in-memory `BranchStore` implementations used by unit and
//! behaviour tests.

use std::cell::RefCell;
use std::collections::BTreeMap;

use crate::{
    BranchEntry, BranchRecord, BranchStore, Country,
    store::{StoreCounts, StoreError},
};

/// In-memory `BranchStore` mirroring the key and reference rules of the
/// SQLite tables.
///
/// Rows live in ordered maps so listings come back sorted by key.
#[derive(Default, Debug)]
pub struct MemoryStore {
    countries: RefCell<BTreeMap<String, Country>>,
    branches: RefCell<BTreeMap<String, BranchRecord>>,
}

impl MemoryStore {
    /// Create a store pre-populated with `countries`.
    pub fn with_countries<I>(countries: I) -> Self
    where
        I: IntoIterator<Item = Country>,
    {
        let store = Self::default();
        store.countries.borrow_mut().extend(
            countries
                .into_iter()
                .map(|country| (country.iso2.clone(), country)),
        );
        store
    }

    /// Add `branches` to the store, bypassing reference checks.
    #[must_use]
    pub fn with_branches<I>(self, branches: I) -> Self
    where
        I: IntoIterator<Item = BranchRecord>,
    {
        self.branches.borrow_mut().extend(
            branches
                .into_iter()
                .map(|branch| (branch.swift_code.clone(), branch)),
        );
        self
    }

    /// Snapshot of every stored country, ordered by ISO code.
    pub fn countries(&self) -> Vec<Country> {
        self.countries.borrow().values().cloned().collect()
    }

    /// Snapshot of every stored branch, ordered by SWIFT code.
    pub fn branches(&self) -> Vec<BranchRecord> {
        self.branches.borrow().values().cloned().collect()
    }

    fn entry(&self, record: &BranchRecord) -> Option<BranchEntry> {
        self.countries
            .borrow()
            .get(&record.country_iso2)
            .map(|country| BranchEntry {
                record: record.clone(),
                country_name: country.name.clone(),
            })
    }
}

fn require_key(operation: &'static str, key: &str) -> Result<(), StoreError> {
    if key.trim().is_empty() {
        return Err(StoreError::Constraint {
            operation,
            message: "key must not be blank".to_owned(),
        });
    }
    Ok(())
}

impl BranchStore for MemoryStore {
    fn insert_country(&self, country: &Country) -> Result<(), StoreError> {
        require_key("insert country", &country.iso2)?;
        let mut countries = self.countries.borrow_mut();
        if countries.contains_key(&country.iso2) {
            return Err(StoreError::Duplicate {
                table: "countries",
                key: country.iso2.clone(),
            });
        }
        countries.insert(country.iso2.clone(), country.clone());
        Ok(())
    }

    fn insert_branch(&self, branch: &BranchRecord) -> Result<(), StoreError> {
        require_key("insert branch", &branch.swift_code)?;
        let mut branches = self.branches.borrow_mut();
        if branches.contains_key(&branch.swift_code) {
            return Err(StoreError::Duplicate {
                table: "branches",
                key: branch.swift_code.clone(),
            });
        }
        if !self.countries.borrow().contains_key(&branch.country_iso2) {
            return Err(StoreError::UnknownCountry {
                country_iso2: branch.country_iso2.clone(),
            });
        }
        branches.insert(branch.swift_code.clone(), branch.clone());
        Ok(())
    }

    fn find_branch(&self, swift_code: &str) -> Result<Option<BranchEntry>, StoreError> {
        Ok(self
            .branches
            .borrow()
            .get(swift_code)
            .and_then(|record| self.entry(record)))
    }

    fn find_branches_with_prefix(&self, prefix: &str) -> Result<Vec<BranchEntry>, StoreError> {
        Ok(self
            .branches
            .borrow()
            .values()
            .filter(|record| record.swift_code.starts_with(prefix))
            .filter_map(|record| self.entry(record))
            .collect())
    }

    fn find_country(&self, country_iso2: &str) -> Result<Option<Country>, StoreError> {
        Ok(self.countries.borrow().get(country_iso2).cloned())
    }

    fn find_branches_in_country(
        &self,
        country_iso2: &str,
    ) -> Result<Vec<BranchRecord>, StoreError> {
        Ok(self
            .branches
            .borrow()
            .values()
            .filter(|record| record.country_iso2 == country_iso2)
            .cloned()
            .collect())
    }

    fn delete_branch(&self, swift_code: &str) -> Result<usize, StoreError> {
        Ok(usize::from(
            self.branches.borrow_mut().remove(swift_code).is_some(),
        ))
    }

    fn counts(&self) -> Result<StoreCounts, StoreError> {
        let len = |n: usize| u64::try_from(n).unwrap_or(u64::MAX);
        Ok(StoreCounts {
            countries: len(self.countries.borrow().len()),
            branches: len(self.branches.borrow().len()),
        })
    }
}

/// Store whose every call fails with [`StoreError::Unavailable`].
#[derive(Default, Debug, Copy, Clone)]
pub struct UnavailableStore;

fn offline<T>(operation: &'static str) -> Result<T, StoreError> {
    Err(StoreError::Unavailable {
        operation,
        source: "store offline".into(),
    })
}

impl BranchStore for UnavailableStore {
    fn insert_country(&self, _country: &Country) -> Result<(), StoreError> {
        offline("insert country")
    }

    fn insert_branch(&self, _branch: &BranchRecord) -> Result<(), StoreError> {
        offline("insert branch")
    }

    fn find_branch(&self, _swift_code: &str) -> Result<Option<BranchEntry>, StoreError> {
        offline("find branch")
    }

    fn find_branches_with_prefix(&self, _prefix: &str) -> Result<Vec<BranchEntry>, StoreError> {
        offline("find branches by prefix")
    }

    fn find_country(&self, _country_iso2: &str) -> Result<Option<Country>, StoreError> {
        offline("find country")
    }

    fn find_branches_in_country(
        &self,
        _country_iso2: &str,
    ) -> Result<Vec<BranchRecord>, StoreError> {
        offline("find branches by country")
    }

    fn delete_branch(&self, _swift_code: &str) -> Result<usize, StoreError> {
        offline("delete branch")
    }

    fn counts(&self) -> Result<StoreCounts, StoreError> {
        offline("count rows")
    }
}

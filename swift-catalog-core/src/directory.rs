//! Request/response operations over a [`BranchStore`].
//!
//! Each operation is stateless: the store is passed explicitly and no
//! result is cached between calls.

use log::{debug, warn};
use thiserror::Error;

use crate::{
    BranchRecord, BranchStore,
    code::{headquarter_prefix, is_branch_of},
    store::StoreError,
    view::{BranchView, CountryBranchView, CountryView, HeadquarterView, SwiftCodeView},
};

/// Errors returned by directory operations.
#[derive(Debug, Error)]
pub enum DirectoryError {
    /// No row matched the requested key.
    #[error("{what} {key} not found")]
    NotFound {
        /// Kind of entity that was looked up.
        what: &'static str,
        /// Key that was looked up.
        key: String,
    },
    /// A required request field was empty.
    #[error("field {field} must not be empty")]
    Validation {
        /// Wire name of the offending field.
        field: &'static str,
    },
    /// The branch references a country that is not registered.
    #[error("country {country_iso2} is not registered")]
    ForeignKeyViolation {
        /// Referenced country code.
        country_iso2: String,
    },
    /// The branch could not be stored alongside existing rows.
    #[error("branch {swift_code} conflicts with stored data: {detail}")]
    Conflict {
        /// Code of the rejected branch.
        swift_code: String,
        /// Storage explanation.
        detail: String,
    },
    /// The store failed to serve the request.
    #[error("storage unavailable: {source}")]
    StorageUnavailable {
        /// Underlying store failure.
        #[source]
        source: StoreError,
    },
}

impl From<StoreError> for DirectoryError {
    fn from(source: StoreError) -> Self {
        Self::StorageUnavailable { source }
    }
}

/// Resolve a SWIFT code to its branch, or to its headquarter with branches.
///
/// The stored headquarter flag decides the shape of the result. Branches of a
/// headquarter share its prefix, do not end in `XXX` and are ordered by code.
///
/// # Examples
/// ```
/// use swift_catalog_core::{
///     BranchRecord, BranchStore, Country, SqliteBranchStore, SwiftCodeView, resolve_by_swift,
/// };
///
/// let store = SqliteBranchStore::open_in_memory().expect("open store");
/// store.insert_country(&Country::new("CL", "CHILE")).expect("country");
/// for code in ["BCHICLRMXXX", "BCHICLRMIOB"] {
///     store
///         .insert_branch(&BranchRecord::derived(code, "BANCO DE CHILE", "Ahumada 251", "", "", "CL"))
///         .expect("branch");
/// }
///
/// let SwiftCodeView::Headquarter(hq) = resolve_by_swift(&store, "BCHICLRMXXX").expect("resolve") else {
///     panic!("expected a headquarter");
/// };
/// assert_eq!(hq.branches.len(), 1);
/// assert_eq!(hq.branches[0].swift_code, "BCHICLRMIOB");
/// ```
pub fn resolve_by_swift<S>(store: &S, swift_code: &str) -> Result<SwiftCodeView, DirectoryError>
where
    S: BranchStore + ?Sized,
{
    let entry = store
        .find_branch(swift_code)?
        .ok_or_else(|| DirectoryError::NotFound {
            what: "swift code",
            key: swift_code.to_owned(),
        })?;

    if !entry.record.is_headquarter {
        return Ok(SwiftCodeView::Branch(entry.into()));
    }

    let branches: Vec<BranchView> = store
        .find_branches_with_prefix(headquarter_prefix(swift_code))?
        .into_iter()
        .filter(|child| is_branch_of(swift_code, &child.record.swift_code))
        .map(BranchView::from)
        .collect();
    debug!("headquarter {swift_code} owns {} branches", branches.len());
    Ok(SwiftCodeView::Headquarter(HeadquarterView::new(
        entry.into(),
        branches,
    )))
}

/// List every SWIFT code registered under a country.
///
/// A known country without branches yields an empty list.
pub fn resolve_by_country<S>(store: &S, country_iso2: &str) -> Result<CountryView, DirectoryError>
where
    S: BranchStore + ?Sized,
{
    let country = store
        .find_country(country_iso2)?
        .ok_or_else(|| DirectoryError::NotFound {
            what: "country",
            key: country_iso2.to_owned(),
        })?;
    let swift_codes = store
        .find_branches_in_country(&country.iso2)?
        .into_iter()
        .map(CountryBranchView::from)
        .collect();
    Ok(CountryView {
        country_iso2: country.iso2,
        country_name: country.name,
        swift_codes,
    })
}

/// Store a new branch described by `request`.
///
/// The country must already exist. Town name and time zone are stored empty
/// and the caller's headquarter flag is kept as given.
pub fn create_branch<S>(store: &S, request: &BranchView) -> Result<(), DirectoryError>
where
    S: BranchStore + ?Sized,
{
    validate(request)?;
    let record = BranchRecord {
        swift_code: request.swift_code.clone(),
        name: request.bank_name.clone(),
        address: request.address.clone(),
        town_name: String::new(),
        time_zone: String::new(),
        country_iso2: request.country_iso2.clone(),
        is_headquarter: request.is_headquarter,
    };
    if record.has_inconsistent_flag() {
        warn!(
            "branch {} stored with isHeadquarter={} contrary to its code suffix",
            record.swift_code, record.is_headquarter
        );
    }

    store.insert_branch(&record).map_err(|err| match err {
        StoreError::UnknownCountry { country_iso2 } => {
            DirectoryError::ForeignKeyViolation { country_iso2 }
        }
        err @ (StoreError::Duplicate { .. } | StoreError::Constraint { .. }) => {
            DirectoryError::Conflict {
                swift_code: record.swift_code.clone(),
                detail: err.to_string(),
            }
        }
        source @ StoreError::Unavailable { .. } => DirectoryError::StorageUnavailable { source },
    })
}

fn validate(request: &BranchView) -> Result<(), DirectoryError> {
    let fields = [
        ("address", &request.address),
        ("countryISO2", &request.country_iso2),
        ("countryName", &request.country_name),
        ("bankName", &request.bank_name),
        ("swiftCode", &request.swift_code),
    ];
    match fields.into_iter().find(|(_, value)| value.is_empty()) {
        Some((field, _)) => Err(DirectoryError::Validation { field }),
        None => Ok(()),
    }
}

/// Delete the branch with exactly this SWIFT code.
pub fn delete_branch<S>(store: &S, swift_code: &str) -> Result<(), DirectoryError>
where
    S: BranchStore + ?Sized,
{
    match store.delete_branch(swift_code)? {
        0 => Err(DirectoryError::NotFound {
            what: "swift code",
            key: swift_code.to_owned(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        Country,
        test_support::{MemoryStore, UnavailableStore},
    };
    use rstest::{fixture, rstest};

    fn record(code: &str, country: &str) -> BranchRecord {
        BranchRecord::derived(code, "BANCO DE CHILE", "Ahumada 251", "Santiago", "Pacific/Easter", country)
    }

    #[fixture]
    fn store() -> MemoryStore {
        MemoryStore::with_countries([Country::new("CL", "CHILE"), Country::new("AR", "ARGENTINA")])
            .with_branches([
                record("BCHICLRMXXX", "CL"),
                record("BCHICLRMIOB", "CL"),
                record("BCHICLRM001", "CL"),
                record("BCHICLRMAXXX", "CL"),
                record("BCHICLRNIOB", "CL"),
            ])
    }

    fn request(code: &str) -> BranchView {
        BranchView {
            address: "Av. Corrientes 1".into(),
            bank_name: "BANCO NACION".into(),
            country_iso2: "AR".into(),
            country_name: "ARGENTINA".into(),
            is_headquarter: code.ends_with("XXX"),
            swift_code: code.into(),
        }
    }

    #[rstest]
    fn resolves_branch_without_children(store: MemoryStore) {
        let view = resolve_by_swift(&store, "BCHICLRMIOB").expect("resolve");
        let SwiftCodeView::Branch(branch) = view else {
            panic!("expected branch view");
        };
        assert_eq!(branch.country_name, "CHILE");
        assert!(!branch.is_headquarter);
    }

    #[rstest]
    fn headquarter_lists_prefix_branches_only(store: MemoryStore) {
        let view = resolve_by_swift(&store, "BCHICLRMXXX").expect("resolve");
        let SwiftCodeView::Headquarter(hq) = view else {
            panic!("expected headquarter view");
        };
        let codes: Vec<_> = hq.branches.iter().map(|b| b.swift_code.as_str()).collect();
        assert_eq!(codes, ["BCHICLRM001", "BCHICLRMIOB"]);
        assert!(hq.branches.iter().all(|b| b.country_name == "CHILE"));
    }

    #[rstest]
    fn unknown_code_is_not_found(store: MemoryStore) {
        let err = resolve_by_swift(&store, "NOPENOPEXXX").expect_err("missing");
        assert!(matches!(err, DirectoryError::NotFound { what: "swift code", .. }));
    }

    #[rstest]
    fn country_without_branches_lists_nothing(store: MemoryStore) {
        let view = resolve_by_country(&store, "AR").expect("resolve");
        assert_eq!(view.country_name, "ARGENTINA");
        assert!(view.swift_codes.is_empty());
    }

    #[rstest]
    fn unknown_country_is_not_found(store: MemoryStore) {
        let err = resolve_by_country(&store, "PE").expect_err("missing");
        assert!(matches!(err, DirectoryError::NotFound { what: "country", key } if key == "PE"));
    }

    #[rstest]
    #[case("address")]
    #[case("countryISO2")]
    #[case("countryName")]
    #[case("bankName")]
    #[case("swiftCode")]
    fn empty_fields_fail_validation(store: MemoryStore, #[case] field: &str) {
        let mut body = request("NACNARBAXXX");
        let slot = match field {
            "address" => &mut body.address,
            "countryISO2" => &mut body.country_iso2,
            "countryName" => &mut body.country_name,
            "bankName" => &mut body.bank_name,
            _ => &mut body.swift_code,
        };
        slot.clear();
        let err = create_branch(&store, &body).expect_err("invalid request");
        assert!(matches!(err, DirectoryError::Validation { field: f } if f == field));
    }

    #[rstest]
    fn whitespace_fields_are_stored_as_given(store: MemoryStore) {
        let mut body = request("NACNARBA001");
        body.address = "  ".into();
        create_branch(&store, &body).expect("whitespace is not empty");

        let view = resolve_by_swift(&store, "NACNARBA001").expect("resolve");
        let SwiftCodeView::Branch(branch) = view else {
            panic!("expected a branch view");
        };
        assert_eq!(branch.address, "  ");
    }

    #[rstest]
    fn created_branch_stores_empty_town_and_zone(store: MemoryStore) {
        create_branch(&store, &request("NACNARBAXXX")).expect("create");
        let stored = store
            .branches()
            .into_iter()
            .find(|b| b.swift_code == "NACNARBAXXX")
            .expect("stored");
        assert!(stored.town_name.is_empty());
        assert!(stored.time_zone.is_empty());
        assert!(stored.is_headquarter);
    }

    #[rstest]
    fn mismatched_flag_is_kept_as_given(store: MemoryStore) {
        let mut body = request("NACNARBAXXX");
        body.is_headquarter = false;
        create_branch(&store, &body).expect("create");
        let view = resolve_by_swift(&store, "NACNARBAXXX").expect("resolve");
        assert!(!view.is_headquarter());
    }

    #[rstest]
    fn duplicate_code_conflicts(store: MemoryStore) {
        let mut body = request("BCHICLRMIOB");
        body.country_iso2 = "CL".into();
        let before = store.branches();
        let err = create_branch(&store, &body).expect_err("duplicate");
        assert!(matches!(err, DirectoryError::Conflict { swift_code, .. } if swift_code == "BCHICLRMIOB"));
        assert_eq!(store.branches(), before);
    }

    #[rstest]
    fn unknown_country_violates_reference(store: MemoryStore) {
        let mut body = request("BCOPPEPLXXX");
        body.country_iso2 = "PE".into();
        let err = create_branch(&store, &body).expect_err("unknown country");
        assert!(matches!(err, DirectoryError::ForeignKeyViolation { country_iso2 } if country_iso2 == "PE"));
    }

    #[rstest]
    fn delete_removes_once(store: MemoryStore) {
        delete_branch(&store, "BCHICLRMIOB").expect("delete");
        let err = delete_branch(&store, "BCHICLRMIOB").expect_err("already gone");
        assert!(matches!(err, DirectoryError::NotFound { .. }));
        assert!(matches!(
            resolve_by_swift(&store, "BCHICLRMIOB"),
            Err(DirectoryError::NotFound { .. })
        ));
    }

    #[rstest]
    fn storage_failures_are_distinct_from_absence() {
        let store = UnavailableStore;
        assert!(matches!(
            delete_branch(&store, "BCHICLRMIOB"),
            Err(DirectoryError::StorageUnavailable { .. })
        ));
        assert!(matches!(
            resolve_by_swift(&store, "BCHICLRMIOB"),
            Err(DirectoryError::StorageUnavailable { .. })
        ));
        assert!(matches!(
            create_branch(&store, &request("NACNARBAXXX")),
            Err(DirectoryError::StorageUnavailable { .. })
        ));
    }
}

use crate::code::is_headquarter_code;

/// A country referenced by branch records.
///
/// # Examples
/// ```
/// use swift_catalog_core::Country;
///
/// let country = Country::new("PL", "POLAND");
/// assert_eq!(country.iso2, "PL");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Country {
    /// Two-letter ISO country code; unique key of the countries table.
    pub iso2: String,
    /// Display name, as provided by the first record that referenced it.
    pub name: String,
}

impl Country {
    /// Construct a country from its code and name.
    pub fn new(iso2: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            iso2: iso2.into(),
            name: name.into(),
        }
    }
}

/// A single bank branch or headquarter row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchRecord {
    /// Unique SWIFT code.
    pub swift_code: String,
    /// Bank name.
    pub name: String,
    /// Street address, as written in the source.
    pub address: String,
    /// Town name; empty for branches created through the directory.
    pub town_name: String,
    /// IANA time zone; empty for branches created through the directory.
    pub time_zone: String,
    /// ISO code of the owning country. Must reference a stored [`Country`].
    pub country_iso2: String,
    /// Whether the row is the institution's headquarter.
    pub is_headquarter: bool,
}

impl BranchRecord {
    /// Build a record whose headquarter flag is derived from the code suffix.
    ///
    /// # Examples
    /// ```
    /// use swift_catalog_core::BranchRecord;
    ///
    /// let hq = BranchRecord::derived("DEFDEFDEFDEFXXX", "DEF BANK", "Wall Street", "New York", "America/New_York", "US");
    /// assert!(hq.is_headquarter);
    /// ```
    pub fn derived(
        swift_code: impl Into<String>,
        name: impl Into<String>,
        address: impl Into<String>,
        town_name: impl Into<String>,
        time_zone: impl Into<String>,
        country_iso2: impl Into<String>,
    ) -> Self {
        let swift_code = swift_code.into();
        let is_headquarter = is_headquarter_code(&swift_code);
        Self {
            swift_code,
            name: name.into(),
            address: address.into(),
            town_name: town_name.into(),
            time_zone: time_zone.into(),
            country_iso2: country_iso2.into(),
            is_headquarter,
        }
    }

    /// Return `true` when the stored flag disagrees with the code suffix.
    #[must_use]
    pub fn has_inconsistent_flag(&self) -> bool {
        self.is_headquarter != is_headquarter_code(&self.swift_code)
    }
}

/// A branch row joined with the name of its country.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchEntry {
    /// The stored branch row.
    pub record: BranchRecord,
    /// Name of the country referenced by [`BranchRecord::country_iso2`].
    pub country_name: String,
}

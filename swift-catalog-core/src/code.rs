//! Structural rules for SWIFT codes.
//!
//! A SWIFT code identifies an institution and country in its first eight
//! characters. Codes carrying the literal `XXX` suffix denote the
//! institution's headquarter; every other code sharing the headquarter's
//! prefix is one of its branches.

/// Suffix marking a headquarter code.
pub const HEADQUARTER_SUFFIX: &str = "XXX";

/// Return `true` when the code ends in [`HEADQUARTER_SUFFIX`].
///
/// # Examples
/// ```
/// use swift_catalog_core::is_headquarter_code;
///
/// assert!(is_headquarter_code("AAISALTRXXX"));
/// assert!(!is_headquarter_code("AAISALTRTIR"));
/// ```
#[must_use]
pub fn is_headquarter_code(swift_code: &str) -> bool {
    swift_code.ends_with(HEADQUARTER_SUFFIX)
}

/// Strip the headquarter suffix, yielding the prefix shared by its branches.
///
/// Codes without the suffix are returned unchanged.
///
/// # Examples
/// ```
/// use swift_catalog_core::headquarter_prefix;
///
/// assert_eq!(headquarter_prefix("AAISALTRXXX"), "AAISALTR");
/// assert_eq!(headquarter_prefix("AAISALTR"), "AAISALTR");
/// ```
#[must_use]
pub fn headquarter_prefix(swift_code: &str) -> &str {
    swift_code
        .strip_suffix(HEADQUARTER_SUFFIX)
        .unwrap_or(swift_code)
}

/// Return `true` when `candidate` is a branch owned by `headquarter`.
///
/// Branches share the headquarter's prefix, never carry the headquarter
/// suffix themselves and never equal the headquarter code.
#[must_use]
pub fn is_branch_of(headquarter: &str, candidate: &str) -> bool {
    candidate != headquarter
        && candidate.starts_with(headquarter_prefix(headquarter))
        && !is_headquarter_code(candidate)
}

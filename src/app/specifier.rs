//! Version specifiers and specifier sets
//!
//! This module implements the constraint notation attached to manifest
//! entries: single comparisons such as `==1.6.1` or `>=1.2.2`, wildcard
//! forms such as `==1.6.*`, the compatible-release operator `~=`, and
//! comma-separated conjunctions of all of these.
//!
//! Matching follows the version scheme's operator rules, including the
//! asymmetries that trip up naive comparisons: `>1.7` does not admit
//! `1.7.post1` or `1.7+cu113`, and `<1.3` does not admit `1.3.dev1`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::app::version::Version;
use crate::errors::{ManifestError, ManifestResult};

/// Comparison operator of a single specifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `~=`, compatible release
    Compatible,
    /// `==`, version matching
    Equal,
    /// `!=`, version exclusion
    NotEqual,
    /// `<=`, inclusive upper bound
    LessOrEqual,
    /// `>=`, inclusive lower bound
    GreaterOrEqual,
    /// `<`, exclusive upper bound
    Less,
    /// `>`, exclusive lower bound
    Greater,
}

impl Operator {
    /// The operator as written in a manifest
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Compatible => "~=",
            Operator::Equal => "==",
            Operator::NotEqual => "!=",
            Operator::LessOrEqual => "<=",
            Operator::GreaterOrEqual => ">=",
            Operator::Less => "<",
            Operator::Greater => ">",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single version constraint: an operator applied to a version
///
/// Wildcard constraints (`==1.6.*`, `!=1.6.*`) are modeled with the
/// `wildcard` flag and a version holding only the release prefix.
///
/// # Examples
///
/// ```rust,no_run
/// use reqlint::app::{Specifier, Version};
///
/// let pin = Specifier::parse("==1.6.1")?;
/// assert!(pin.matches(&Version::parse("1.6.1")?));
/// assert!(!pin.matches(&Version::parse("1.6.2")?));
/// # Ok::<(), reqlint::errors::ManifestError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Specifier {
    operator: Operator,
    version: Version,
    wildcard: bool,
}

impl Specifier {
    /// Parse a single specifier such as `>=1.2.2` or `==1.6.*`
    ///
    /// Whitespace between the operator and the version is accepted.
    /// Operator-specific restrictions are enforced here: wildcards only
    /// combine with `==` and `!=` and only name a plain release, ordered
    /// comparisons reject local labels, and `~=` requires at least two
    /// release segments.
    pub fn parse(input: &str) -> ManifestResult<Self> {
        let text = input.trim();

        let (operator, rest) = Self::split_operator(text).ok_or_else(|| invalid_specifier(
            text,
            "missing comparison operator",
        ))?;

        let version_text = rest.trim();
        if version_text.is_empty() {
            return Err(invalid_specifier(text, "missing version"));
        }

        let (version_text, wildcard) = match version_text.strip_suffix(".*") {
            Some(prefix) => (prefix, true),
            None => (version_text, false),
        };

        let version = Version::parse(version_text)?;

        if wildcard {
            if !matches!(operator, Operator::Equal | Operator::NotEqual) {
                return Err(invalid_specifier(
                    text,
                    "wildcard is only valid with == and !=",
                ));
            }
            if version.pre().is_some()
                || version.post().is_some()
                || version.dev().is_some()
                || version.local().is_some()
            {
                return Err(invalid_specifier(
                    text,
                    "wildcard requires a plain release prefix",
                ));
            }
        }

        match operator {
            Operator::Compatible => {
                if version.release().len() < 2 {
                    return Err(invalid_specifier(
                        text,
                        "~= requires at least two release segments",
                    ));
                }
                if version.local().is_some() {
                    return Err(invalid_specifier(text, "~= does not accept a local label"));
                }
            }
            Operator::Less | Operator::LessOrEqual | Operator::Greater | Operator::GreaterOrEqual => {
                if version.local().is_some() {
                    return Err(invalid_specifier(
                        text,
                        "ordered comparison does not accept a local label",
                    ));
                }
            }
            Operator::Equal | Operator::NotEqual => {}
        }

        Ok(Specifier {
            operator,
            version,
            wildcard,
        })
    }

    fn split_operator(text: &str) -> Option<(Operator, &str)> {
        // Two-character operators first, so "<=" is not read as "<"
        for (symbol, operator) in [
            ("~=", Operator::Compatible),
            ("==", Operator::Equal),
            ("!=", Operator::NotEqual),
            ("<=", Operator::LessOrEqual),
            (">=", Operator::GreaterOrEqual),
            ("<", Operator::Less),
            (">", Operator::Greater),
        ] {
            if let Some(rest) = text.strip_prefix(symbol) {
                return Some((operator, rest));
            }
        }
        None
    }

    /// The comparison operator
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The version (or release prefix, for wildcards) being compared against
    pub fn version(&self) -> &Version {
        &self.version
    }

    /// True for `==X.*` and `!=X.*` forms
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Check whether a candidate version satisfies this specifier
    pub fn matches(&self, candidate: &Version) -> bool {
        match self.operator {
            Operator::Equal if self.wildcard => self.matches_prefix(candidate),
            Operator::NotEqual if self.wildcard => !self.matches_prefix(candidate),
            Operator::Equal => {
                if self.version.local().is_none() {
                    // A public pin ignores the candidate's local label
                    candidate.without_local() == self.version
                } else {
                    *candidate == self.version
                }
            }
            Operator::NotEqual => {
                if self.version.local().is_none() {
                    candidate.without_local() != self.version
                } else {
                    *candidate != self.version
                }
            }
            Operator::LessOrEqual => *candidate <= self.version,
            Operator::GreaterOrEqual => *candidate >= self.version,
            Operator::Less => {
                if !(*candidate < self.version) {
                    return false;
                }
                // An exclusive upper bound only admits pre-releases of the
                // bound itself when the bound is spelled as one
                if !self.version.is_prerelease()
                    && candidate.is_prerelease()
                    && candidate.base_version() == self.version.base_version()
                {
                    return false;
                }
                true
            }
            Operator::Greater => {
                if !(*candidate > self.version) {
                    return false;
                }
                // An exclusive lower bound does not admit post-releases or
                // local variants of the bound itself
                if !self.version.is_postrelease()
                    && candidate.is_postrelease()
                    && candidate.base_version() == self.version.base_version()
                {
                    return false;
                }
                if candidate.local().is_some()
                    && candidate.base_version() == self.version.base_version()
                {
                    return false;
                }
                true
            }
            Operator::Compatible => {
                if !(*candidate >= self.version) {
                    return false;
                }
                // Equivalent to ==prefix.* with the last release segment dropped
                let release = self.version.release();
                let prefix = &release[..release.len() - 1];
                candidate.epoch() == self.version.epoch()
                    && release_starts_with(candidate, prefix)
            }
        }
    }

    /// Prefix match for wildcard forms: equal epoch and a release that
    /// starts with the stated segments, missing segments reading as zero
    fn matches_prefix(&self, candidate: &Version) -> bool {
        candidate.epoch() == self.version.epoch()
            && release_starts_with(candidate, self.version.release())
    }
}

fn release_starts_with(candidate: &Version, prefix: &[u64]) -> bool {
    let release = candidate.release();
    prefix
        .iter()
        .enumerate()
        .all(|(i, segment)| release.get(i).copied().unwrap_or(0) == *segment)
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.operator, self.version)?;
        if self.wildcard {
            write!(f, ".*")?;
        }
        Ok(())
    }
}

impl FromStr for Specifier {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A comma-separated conjunction of specifiers
///
/// The empty set places no constraint and matches every version. Written
/// order is preserved for display, so entries round-trip the way the
/// manifest spelled them.
///
/// # Examples
///
/// ```rust,no_run
/// use reqlint::app::{SpecifierSet, Version};
///
/// let range = SpecifierSet::parse(">=1.2.2,<1.3")?;
/// assert!(range.matches(&Version::parse("1.2.5")?));
/// assert!(!range.matches(&Version::parse("1.3")?));
/// # Ok::<(), reqlint::errors::ManifestError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpecifierSet {
    specifiers: Vec<Specifier>,
}

impl SpecifierSet {
    /// The unconstrained set
    pub fn empty() -> Self {
        SpecifierSet {
            specifiers: Vec::new(),
        }
    }

    /// Parse a comma-separated list of specifiers
    ///
    /// An empty or all-whitespace input yields the unconstrained set.
    /// Empty list items (as in `>=1.0,,<2.0`) are rejected.
    pub fn parse(input: &str) -> ManifestResult<Self> {
        let text = input.trim();
        if text.is_empty() {
            return Ok(Self::empty());
        }

        let mut specifiers = Vec::new();
        for part in text.split(',') {
            let part = part.trim();
            if part.is_empty() {
                return Err(invalid_specifier(input.trim(), "empty specifier in list"));
            }
            specifiers.push(Specifier::parse(part)?);
        }

        Ok(SpecifierSet { specifiers })
    }

    /// Check whether a version satisfies every specifier in the set
    pub fn matches(&self, candidate: &Version) -> bool {
        self.specifiers.iter().all(|s| s.matches(candidate))
    }

    /// The exact version pinned by this set, when the set is a single
    /// `==` comparison without a wildcard
    pub fn pinned_version(&self) -> Option<&Version> {
        match self.specifiers.as_slice() {
            [only] if only.operator() == Operator::Equal && !only.is_wildcard() => {
                Some(only.version())
            }
            _ => None,
        }
    }

    /// True when the set pins one exact version
    pub fn is_pin(&self) -> bool {
        self.pinned_version().is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.specifiers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.specifiers.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Specifier> {
        self.specifiers.iter()
    }
}

impl fmt::Display for SpecifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.specifiers.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

impl FromStr for SpecifierSet {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Transparent serialization - serialize as the written string form
impl Serialize for SpecifierSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for SpecifierSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

fn invalid_specifier(spec: &str, reason: &str) -> ManifestError {
    ManifestError::InvalidSpecifier {
        spec: spec.to_string(),
        reason: reason.to_string(),
    }
}

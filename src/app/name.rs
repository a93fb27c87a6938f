//! Validated package name type with canonical identity
//!
//! This module provides a package name type that keeps the spelling found in
//! the manifest while comparing and hashing by the canonical form, so
//! `Torch-Pitch-Shift`, `torch_pitch_shift` and `torch.pitch.shift` all
//! identify the same package.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ManifestError, ManifestResult};

/// Package name as written in a manifest entry
///
/// Stores both the raw spelling and the canonical form. Equality, hashing
/// and ordering use only the canonical form, which makes this type directly
/// usable as a duplicate-detection key:
///
/// - **Canonical form**: lowercase, with runs of `-`, `_` and `.` collapsed
///   to a single `-`
/// - **Raw form**: preserved for display and round-tripping
///
/// # Examples
///
/// ```rust,no_run
/// use reqlint::app::PackageName;
///
/// let a = PackageName::new("Torch-Pitch-Shift")?;
/// let b = PackageName::new("torch_pitch_shift")?;
/// assert_eq!(a, b);
/// assert_eq!(a.canonical(), "torch-pitch-shift");
/// assert_eq!(a.as_str(), "Torch-Pitch-Shift");
/// # Ok::<(), reqlint::errors::ManifestError>(())
/// ```
#[derive(Debug, Clone)]
pub struct PackageName {
    raw: String,
    canonical: String,
}

impl PackageName {
    /// Create a package name from its manifest spelling
    ///
    /// # Arguments
    ///
    /// * `name` - package identifier: ASCII letters, digits, `-`, `_` and
    ///   `.`, starting and ending with a letter or digit
    ///
    /// # Returns
    ///
    /// `Ok(PackageName)` if the spelling is a valid identifier,
    /// `Err(ManifestError::InvalidName)` otherwise
    pub fn new(name: &str) -> ManifestResult<Self> {
        if !Self::is_valid(name) {
            return Err(ManifestError::InvalidName {
                name: name.to_string(),
            });
        }

        Ok(PackageName {
            raw: name.to_string(),
            canonical: canonicalize(name),
        })
    }

    /// Check whether a string is a valid package identifier
    ///
    /// Valid names consist of ASCII letters, digits and the separators
    /// `-`, `_`, `.`, and must start and end with a letter or digit.
    pub fn is_valid(name: &str) -> bool {
        let bytes = name.as_bytes();
        if bytes.is_empty() {
            return false;
        }
        if !bytes[0].is_ascii_alphanumeric() || !bytes[bytes.len() - 1].is_ascii_alphanumeric() {
            return false;
        }
        bytes
            .iter()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
    }

    /// The spelling found in the manifest
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// The canonical form used for identity
    pub fn canonical(&self) -> &str {
        &self.canonical
    }
}

/// Normalize a package name to its canonical form
///
/// Lowercases the name and collapses every run of `-`, `_` and `.` into a
/// single `-`. The input is assumed to be a valid identifier.
pub fn canonicalize(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut in_separator = false;

    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            if !in_separator {
                result.push('-');
                in_separator = true;
            }
        } else {
            result.push(c.to_ascii_lowercase());
            in_separator = false;
        }
    }

    result
}

impl PartialEq for PackageName {
    fn eq(&self, other: &Self) -> bool {
        self.canonical == other.canonical
    }
}

impl Eq for PackageName {}

impl Hash for PackageName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical.hash(state);
    }
}

impl PartialOrd for PackageName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageName {
    fn cmp(&self, other: &Self) -> Ordering {
        self.canonical.cmp(&other.canonical)
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl FromStr for PackageName {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// Transparent serialization - serialize as the raw spelling for JSON output
impl Serialize for PackageName {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for PackageName {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(&raw).map_err(serde::de::Error::custom)
    }
}

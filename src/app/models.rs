//! Data models for requirements manifests
//!
//! This module defines the core data structures used throughout the
//! application: requirement entries, line classification, and the parser
//! for the manifest entry grammar.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::app::name::PackageName;
use crate::app::specifier::SpecifierSet;
use crate::app::version::Version;
use crate::errors::{ManifestError, ManifestResult};

/// How tightly an entry constrains its package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequirementKind {
    /// Exactly one version admitted (`==1.6.1`)
    Pinned,
    /// Constrained to a range (`>=1.2.2,<1.3`)
    Ranged,
    /// No version expression at all
    Unconstrained,
}

impl RequirementKind {
    /// Short label used in listings
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pinned => "pinned",
            Self::Ranged => "ranged",
            Self::Unconstrained => "unconstrained",
        }
    }
}

impl fmt::Display for RequirementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One active manifest entry
///
/// Captures everything a line can declare: the package name, optional
/// extras, the version expression and a trailing comment. Equality and
/// hashing use only the canonical package name, so a `HashSet<Requirement>`
/// deduplicates entries the same way a resolver would.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    /// Package name as spelled in the manifest
    pub name: PackageName,
    /// Extras requested in brackets, e.g. `[security,socks]`
    pub extras: Vec<String>,
    /// Version expression, empty when the entry is a bare name
    pub specifiers: SpecifierSet,
    /// Trailing comment text, without the `#`
    pub comment: Option<String>,
}

impl Requirement {
    /// Create a requirement from already-validated parts
    pub fn new(
        name: PackageName,
        extras: Vec<String>,
        specifiers: SpecifierSet,
        comment: Option<String>,
    ) -> Self {
        Requirement {
            name,
            extras,
            specifiers,
            comment,
        }
    }

    /// Classify the entry by the shape of its version expression
    pub fn kind(&self) -> RequirementKind {
        if self.specifiers.is_empty() {
            RequirementKind::Unconstrained
        } else if self.specifiers.is_pin() {
            RequirementKind::Pinned
        } else {
            RequirementKind::Ranged
        }
    }

    /// The exact version pinned by this entry, if it is a pin
    pub fn pinned_version(&self) -> Option<&Version> {
        self.specifiers.pinned_version()
    }

    /// Check whether a candidate version satisfies the entry
    pub fn matches(&self, candidate: &Version) -> bool {
        self.specifiers.matches(candidate)
    }

    pub fn has_extras(&self) -> bool {
        !self.extras.is_empty()
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.extras.is_empty() {
            write!(f, "[{}]", self.extras.join(","))?;
        }
        if !self.specifiers.is_empty() {
            write!(f, "{}", self.specifiers)?;
        }
        Ok(())
    }
}

impl Hash for Requirement {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialEq for Requirement {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Requirement {}

/// One classified line of a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestLine {
    /// Empty or whitespace-only line
    Blank,
    /// Comment line, with the entry it disables when its body still
    /// parses as one (`# Cython==0.29.10`)
    Comment {
        text: String,
        disabled: Option<Requirement>,
    },
    /// Active requirement entry
    Entry(Requirement),
}

/// Classify a raw manifest line
///
/// Blank lines and comments always succeed; anything else must parse as
/// an entry. Comment bodies that still carry a version expression are
/// reported as disabled entries so reviewers can spot commented-out
/// dependencies.
pub fn classify_line(line: &str) -> ManifestResult<ManifestLine> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Ok(ManifestLine::Blank);
    }

    if let Some(body) = trimmed.strip_prefix('#') {
        let text = body.trim().to_string();
        // Bare words are prose more often than package names, so only a
        // body with a version expression counts as a disabled entry
        let disabled = parse_requirement_line(&text)
            .ok()
            .filter(|requirement| !requirement.specifiers.is_empty());
        return Ok(ManifestLine::Comment { text, disabled });
    }

    Ok(ManifestLine::Entry(parse_requirement_line(trimmed)?))
}

/// Parse an active manifest entry
///
/// Expected format: a package name, optional bracketed extras, an optional
/// version expression, and an optional trailing comment:
///
/// ```text
/// torch-pitch-shift>=1.2.2,<1.3
/// requests[security,socks] >= 2.0  # transitive of the auth layer
/// easydict
/// ```
///
/// Includes (`-r`), editable installs (`-e`), URLs and environment markers
/// are not part of the entry grammar and are rejected.
pub fn parse_requirement_line(line: &str) -> ManifestResult<Requirement> {
    let (entry_text, comment) = split_trailing_comment(line);
    let text = entry_text.trim();

    if text.is_empty() {
        return Err(ManifestError::InvalidFormat {
            line: 0,
            content: "Empty entry".to_string(),
        });
    }

    // Package name runs until the first character that cannot be part of one
    let name_end = text
        .bytes()
        .position(|b| !(b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.')))
        .unwrap_or(text.len());
    if name_end == 0 {
        return Err(ManifestError::InvalidFormat {
            line: 0,
            content: text.to_string(),
        });
    }
    let name = PackageName::new(&text[..name_end])?;

    let mut rest = text[name_end..].trim_start();

    let mut extras = Vec::new();
    if let Some(after_bracket) = rest.strip_prefix('[') {
        let (inside, after) =
            after_bracket
                .split_once(']')
                .ok_or_else(|| ManifestError::InvalidFormat {
                    line: 0,
                    content: text.to_string(),
                })?;
        if !inside.trim().is_empty() {
            for part in inside.split(',') {
                let part = part.trim();
                if !PackageName::is_valid(part) {
                    return Err(ManifestError::InvalidName {
                        name: part.to_string(),
                    });
                }
                extras.push(part.to_string());
            }
        }
        rest = after.trim_start();
    }

    let specifiers = SpecifierSet::parse(rest)?;

    Ok(Requirement::new(name, extras, specifiers, comment))
}

/// Split off a trailing comment: a `#` at the start of the text or
/// preceded by whitespace. A `#` glued to other text is not a comment and
/// stays part of the entry, where the grammar rejects it.
fn split_trailing_comment(line: &str) -> (&str, Option<String>) {
    let bytes = line.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            let comment = line[i + 1..].trim();
            let comment = (!comment.is_empty()).then(|| comment.to_string());
            return (&line[..i], comment);
        }
    }
    (line, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(line: &str) -> Requirement {
        parse_requirement_line(line).unwrap()
    }

    #[test]
    fn test_exact_pin_entry() {
        let requirement = entry("scipy==1.6.1");

        assert_eq!(requirement.name.as_str(), "scipy");
        assert_eq!(requirement.kind(), RequirementKind::Pinned);
        assert_eq!(
            requirement.pinned_version(),
            Some(&Version::parse("1.6.1").unwrap())
        );
        assert!(requirement.extras.is_empty());
        assert!(requirement.comment.is_none());
    }

    #[test]
    fn test_compound_range_entry() {
        let requirement = entry("torch-pitch-shift>=1.2.2,<1.3");

        assert_eq!(requirement.name.canonical(), "torch-pitch-shift");
        assert_eq!(requirement.kind(), RequirementKind::Ranged);
        assert_eq!(requirement.specifiers.len(), 2);
        assert!(requirement.matches(&Version::parse("1.2.5").unwrap()));
        assert!(!requirement.matches(&Version::parse("1.3").unwrap()));
    }

    #[test]
    fn test_bare_name_entry() {
        let requirement = entry("easydict");

        assert_eq!(requirement.kind(), RequirementKind::Unconstrained);
        assert!(requirement.specifiers.is_empty());
        assert!(requirement.matches(&Version::parse("0.0.1").unwrap()));
    }

    #[test]
    fn test_extras() {
        let requirement = entry("requests[security,socks]>=2.0");
        assert_eq!(requirement.extras, vec!["security", "socks"]);
        assert!(requirement.has_extras());

        // Whitespace around the brackets and commas is insignificant
        let spaced = entry("requests [ security , socks ] >= 2.0");
        assert_eq!(spaced.extras, vec!["security", "socks"]);

        // Empty extras brackets are allowed and mean no extras
        let empty = entry("requests[]>=2.0");
        assert!(empty.extras.is_empty());
    }

    #[test]
    fn test_trailing_comment() {
        let requirement = entry("torch==1.10.0  # CUDA build pinned for the CI image");

        assert_eq!(requirement.name.as_str(), "torch");
        assert_eq!(
            requirement.comment.as_deref(),
            Some("CUDA build pinned for the CI image")
        );

        // A bare "#" with nothing after it carries no comment text
        let bare = entry("torch==1.10.0 #");
        assert!(bare.comment.is_none());
    }

    #[test]
    fn test_hash_glued_to_entry_is_not_a_comment() {
        assert!(parse_requirement_line("scipy==1.6.1#inline").is_err());
    }

    #[test]
    fn test_whitespace_tolerance() {
        let requirement = entry("  scipy == 1.6.1  ");
        assert_eq!(requirement.name.as_str(), "scipy");
        assert!(requirement.specifiers.is_pin());

        let range = entry("numpy >= 1.16 , < 2.0");
        assert_eq!(range.specifiers.len(), 2);
    }

    #[test]
    fn test_invalid_entries() {
        let invalid_cases = [
            "-r base.txt",                  // Include option
            "-e .",                         // Editable install
            "https://example.com/pkg.whl",  // URL
            "==1.6.1",                      // Missing name
            "scipy==",                      // Missing version
            "scipy torch",                  // Two names
            "scipy==1.6.1 junk",            // Trailing junk
            "scipy[dev",                    // Unclosed extras
            "scipy[de v]",                  // Bad extra name
            "scipy; python_version<'3.8'",  // Environment marker
            "scipy==1.6.1; sys_platform",   // Marker after version
            "scipy-==1.0",                  // Name with dangling separator
        ];

        for line in &invalid_cases {
            assert!(
                parse_requirement_line(line).is_err(),
                "Should reject: {:?}",
                line
            );
        }
    }

    #[test]
    fn test_classify_blank_and_comment() {
        assert_eq!(classify_line("").unwrap(), ManifestLine::Blank);
        assert_eq!(classify_line("   \t ").unwrap(), ManifestLine::Blank);

        match classify_line("# install the GPU wheels first").unwrap() {
            ManifestLine::Comment { text, disabled } => {
                assert_eq!(text, "install the GPU wheels first");
                assert!(disabled.is_none());
            }
            other => panic!("expected comment, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_disabled_entry() {
        match classify_line("# Cython==0.29.10").unwrap() {
            ManifestLine::Comment { disabled, .. } => {
                let requirement = disabled.expect("commented pin should be a disabled entry");
                assert_eq!(requirement.name.as_str(), "Cython");
                assert_eq!(
                    requirement.pinned_version(),
                    Some(&Version::parse("0.29.10").unwrap())
                );
            }
            other => panic!("expected comment, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_bare_word_comment_is_prose() {
        // A single word would parse as an unconstrained entry, but prose
        // comments should not be flagged as disabled dependencies
        match classify_line("# dependencies").unwrap() {
            ManifestLine::Comment { disabled, .. } => assert!(disabled.is_none()),
            other => panic!("expected comment, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_entry() {
        match classify_line("torch==1.10.0").unwrap() {
            ManifestLine::Entry(requirement) => {
                assert_eq!(requirement.name.as_str(), "torch")
            }
            other => panic!("expected entry, got {:?}", other),
        }

        assert!(classify_line("not a valid entry").is_err());
    }

    #[test]
    fn test_requirement_identity_by_canonical_name() {
        let a = entry("Torch-Pitch-Shift>=1.2.2");
        let b = entry("torch_pitch_shift==1.2.5");
        let c = entry("scipy==1.6.1");

        // Identity tracks the package, not the constraint
        assert_eq!(a, b);
        assert_ne!(a, c);

        use std::collections::HashSet;
        let mut set = HashSet::new();
        set.insert(a);
        set.insert(b); // Duplicate package, not inserted
        set.insert(c);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display_round_trip() {
        let cases = [
            "scipy==1.6.1",
            "torch-pitch-shift>=1.2.2,<1.3",
            "easydict",
            "requests[security,socks]>=2.0",
        ];

        for line in &cases {
            assert_eq!(entry(line).to_string(), *line);
        }
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(RequirementKind::Pinned.to_string(), "pinned");
        assert_eq!(RequirementKind::Ranged.to_string(), "ranged");
        assert_eq!(RequirementKind::Unconstrained.to_string(), "unconstrained");
    }

    #[test]
    fn test_serialization() {
        let requirement = entry("torch==1.10.0  # pinned");
        let json = serde_json::to_string(&requirement).unwrap();

        assert!(json.contains("\"torch\""));
        assert!(json.contains("==1.10.0"));
        assert!(json.contains("pinned"));
    }
}

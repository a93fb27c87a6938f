//! Package version type with scheme-aware ordering
//!
//! This module parses the version notation used by pip manifests (epoch,
//! dotted release, pre-release, post-release, development and local
//! segments) into a structured type whose ordering follows the scheme's
//! rules rather than plain string comparison, so `1.10` sorts after `1.9`
//! and `1.0rc1` sorts before `1.0`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ManifestError, ManifestResult};

/// Pre-release phase marker
///
/// Declaration order matches release order: alphas come before betas,
/// betas before release candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PreReleasePhase {
    Alpha,
    Beta,
    ReleaseCandidate,
}

impl PreReleasePhase {
    /// Canonical spelling used when formatting a version
    pub fn as_str(&self) -> &'static str {
        match self {
            PreReleasePhase::Alpha => "a",
            PreReleasePhase::Beta => "b",
            PreReleasePhase::ReleaseCandidate => "rc",
        }
    }

    fn from_marker(word: &str) -> Option<Self> {
        match word {
            "a" | "alpha" => Some(PreReleasePhase::Alpha),
            "b" | "beta" => Some(PreReleasePhase::Beta),
            "rc" | "c" | "pre" | "preview" => Some(PreReleasePhase::ReleaseCandidate),
            _ => None,
        }
    }
}

/// One segment of a local version label
///
/// Numeric segments compare numerically and sort after alphanumeric ones,
/// which the variant declaration order encodes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LocalSegment {
    Str(String),
    Num(u64),
}

impl fmt::Display for LocalSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalSegment::Str(s) => write!(f, "{}", s),
            LocalSegment::Num(n) => write!(f, "{}", n),
        }
    }
}

/// Parsed package version
///
/// Captures every component the manifest notation can carry:
///
/// - **Epoch**: `1!2.0` resets the ordering baseline
/// - **Release**: the dotted numeric core, `1.6.1`
/// - **Pre-release**: `1.0a1`, `1.0b2`, `1.0rc1`
/// - **Post-release**: `1.0.post2`
/// - **Development release**: `1.0.dev3`
/// - **Local label**: `1.10.0+cu113`
///
/// Parsing is case insensitive and accepts the scheme's spelling variants
/// (`alpha` for `a`, `-`/`_` for `.`, a leading `v`). Display always
/// produces the canonical spelling.
///
/// Equality and ordering use the scheme's comparison rules: trailing zero
/// release segments are insignificant (`1.0` equals `1.0.0`), development
/// releases sort before pre-releases, pre-releases before the final
/// release, post-releases after it, and local labels after their public
/// version.
///
/// # Examples
///
/// ```rust,no_run
/// use reqlint::app::Version;
///
/// let pinned = Version::parse("1.6.1")?;
/// let candidate = Version::parse("1.6.1rc2")?;
/// assert!(candidate < pinned);
/// assert_eq!(Version::parse("1.0")?, Version::parse("1.0.0")?);
/// # Ok::<(), reqlint::errors::ManifestError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Version {
    epoch: u64,
    release: Vec<u64>,
    pre: Option<(PreReleasePhase, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Option<Vec<LocalSegment>>,
}

impl Version {
    /// Parse a version string
    ///
    /// # Arguments
    ///
    /// * `input` - version text, surrounding whitespace ignored
    ///
    /// # Returns
    ///
    /// `Ok(Version)` for any spelling the scheme accepts,
    /// `Err(ManifestError::InvalidVersion)` with a reason otherwise
    pub fn parse(input: &str) -> ManifestResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(invalid_version(input, "empty version"));
        }

        let lowered = trimmed.to_ascii_lowercase();
        let mut text = lowered.as_str();

        // Optional "v" prefix, common in tags
        if let Some(rest) = text.strip_prefix('v') {
            text = rest;
        }

        // Local label follows the first "+"
        let (public, local_text) = match text.split_once('+') {
            Some((public, local)) => (public, Some(local)),
            None => (text, None),
        };

        // Epoch precedes "!"
        let (epoch, release_text) = match public.split_once('!') {
            Some((epoch_text, rest)) => (parse_number(input, epoch_text)?, rest),
            None => (0, public),
        };

        let (release, pre, post, dev) = parse_public(input, release_text)?;

        let local = match local_text {
            Some(text) => Some(parse_local(input, text)?),
            None => None,
        };

        Ok(Version {
            epoch,
            release,
            pre,
            post,
            dev,
            local,
        })
    }

    /// Epoch component, 0 unless spelled explicitly
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Release segments as written (trailing zeros preserved)
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    /// Pre-release marker, if any
    pub fn pre(&self) -> Option<(PreReleasePhase, u64)> {
        self.pre
    }

    /// Post-release number, if any
    pub fn post(&self) -> Option<u64> {
        self.post
    }

    /// Development release number, if any
    pub fn dev(&self) -> Option<u64> {
        self.dev
    }

    /// Local label segments, if any
    pub fn local(&self) -> Option<&[LocalSegment]> {
        self.local.as_deref()
    }

    /// True for development and pre-release versions
    pub fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    /// True for post-release versions
    pub fn is_postrelease(&self) -> bool {
        self.post.is_some()
    }

    /// Epoch and release only, with all suffix segments removed
    ///
    /// `1.6.1rc2+cu113` becomes `1.6.1`. Useful for grouping candidates
    /// that belong to the same release.
    pub fn base_version(&self) -> Version {
        Version {
            epoch: self.epoch,
            release: self.release.clone(),
            pre: None,
            post: None,
            dev: None,
            local: None,
        }
    }

    /// Version with the local label removed
    pub fn without_local(&self) -> Version {
        Version {
            local: None,
            ..self.clone()
        }
    }

    /// Release segments with insignificant trailing zeros removed
    fn trimmed_release(&self) -> &[u64] {
        let mut end = self.release.len();
        while end > 0 && self.release[end - 1] == 0 {
            end -= 1;
        }
        &self.release[..end]
    }

    fn cmp_key(&self) -> CmpKey<'_> {
        let pre = match (self.pre, self.post, self.dev) {
            // A development release with no other suffix sorts before
            // every pre-release of the same release
            (None, None, Some(_)) => PreKey::BeforeAll,
            (None, _, _) => PreKey::AfterAll,
            (Some((phase, number)), _, _) => PreKey::Marker(phase, number),
        };

        let post = match self.post {
            Some(number) => PostKey::Marker(number),
            None => PostKey::BeforeAll,
        };

        let dev = match self.dev {
            Some(number) => DevKey::Marker(number),
            None => DevKey::AfterAll,
        };

        (
            self.epoch,
            self.trimmed_release(),
            pre,
            post,
            dev,
            self.local.as_deref(),
        )
    }
}

type CmpKey<'a> = (
    u64,
    &'a [u64],
    PreKey,
    PostKey,
    DevKey,
    Option<&'a [LocalSegment]>,
);

#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum PreKey {
    BeforeAll,
    Marker(PreReleasePhase, u64),
    AfterAll,
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum PostKey {
    BeforeAll,
    Marker(u64),
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum DevKey {
    Marker(u64),
    AfterAll,
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp_key() == other.cmp_key()
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_key().cmp(&other.cmp_key())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }

        let release: Vec<String> = self.release.iter().map(|n| n.to_string()).collect();
        write!(f, "{}", release.join("."))?;

        if let Some((phase, number)) = self.pre {
            write!(f, "{}{}", phase.as_str(), number)?;
        }
        if let Some(number) = self.post {
            write!(f, ".post{}", number)?;
        }
        if let Some(number) = self.dev {
            write!(f, ".dev{}", number)?;
        }
        if let Some(segments) = &self.local {
            let label: Vec<String> = segments.iter().map(|s| s.to_string()).collect();
            write!(f, "+{}", label.join("."))?;
        }

        Ok(())
    }
}

impl FromStr for Version {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// Transparent serialization - serialize as the canonical string form
impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

fn invalid_version(input: &str, reason: &str) -> ManifestError {
    ManifestError::InvalidVersion {
        version: input.trim().to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number(input: &str, text: &str) -> ManifestResult<u64> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid_version(input, "expected a number"));
    }
    text.parse::<u64>()
        .map_err(|_| invalid_version(input, "number out of range"))
}

/// Parse the public part after the epoch: release segments followed by
/// optional pre-release, post-release and development markers, in that
/// order
fn parse_public(
    input: &str,
    text: &str,
) -> ManifestResult<(
    Vec<u64>,
    Option<(PreReleasePhase, u64)>,
    Option<u64>,
    Option<u64>,
)> {
    let bytes = text.as_bytes();
    let mut pos = 0;

    let mut release = Vec::new();
    loop {
        let start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_digit() {
            pos += 1;
        }
        if start == pos {
            return Err(invalid_version(input, "release segment is not a number"));
        }
        release.push(parse_number(input, &text[start..pos])?);

        // Another dotted segment only when a digit follows the dot;
        // otherwise the dot belongs to a suffix marker like ".post1"
        if pos + 1 < bytes.len() && bytes[pos] == b'.' && bytes[pos + 1].is_ascii_digit() {
            pos += 1;
        } else {
            break;
        }
    }

    let mut pre = None;
    let mut post = None;
    let mut dev = None;

    while pos < bytes.len() {
        let (word, number, next) = take_suffix(input, text, pos)?;
        match word {
            marker if PreReleasePhase::from_marker(marker).is_some() => {
                if pre.is_some() || post.is_some() || dev.is_some() {
                    return Err(invalid_version(input, "pre-release marker out of order"));
                }
                pre = Some((PreReleasePhase::from_marker(marker).unwrap(), number));
            }
            "post" | "rev" | "r" => {
                if post.is_some() || dev.is_some() {
                    return Err(invalid_version(input, "post-release marker out of order"));
                }
                post = Some(number);
            }
            "dev" => {
                if dev.is_some() {
                    return Err(invalid_version(input, "duplicate dev marker"));
                }
                dev = Some(number);
            }
            other => {
                return Err(invalid_version(
                    input,
                    &format!("unknown marker '{}'", other),
                ));
            }
        }
        pos = next;
    }

    Ok((release, pre, post, dev))
}

/// Consume one suffix marker at `pos`: an optional separator, a letter
/// run, and an optional number (with its own optional separator). A
/// missing number means 0.
fn take_suffix<'a>(input: &str, text: &'a str, pos: usize) -> ManifestResult<(&'a str, u64, usize)> {
    let bytes = text.as_bytes();
    let mut cursor = pos;

    if cursor < bytes.len() && matches!(bytes[cursor], b'-' | b'_' | b'.') {
        cursor += 1;
    }

    let word_start = cursor;
    while cursor < bytes.len() && bytes[cursor].is_ascii_lowercase() {
        cursor += 1;
    }
    if word_start == cursor {
        return Err(invalid_version(input, "unexpected character after release"));
    }
    let word = &text[word_start..cursor];

    let mut number_start = cursor;
    if cursor < bytes.len() && matches!(bytes[cursor], b'-' | b'_' | b'.') {
        // Separator counts only when digits follow, otherwise leave it
        // for the caller to reject as trailing junk
        if cursor + 1 < bytes.len() && bytes[cursor + 1].is_ascii_digit() {
            cursor += 1;
            number_start = cursor;
        }
    }

    while cursor < bytes.len() && bytes[cursor].is_ascii_digit() {
        cursor += 1;
    }

    let number = if number_start == cursor {
        0
    } else {
        parse_number(input, &text[number_start..cursor])?
    };

    Ok((word, number, cursor))
}

/// Parse a local label: dot, dash or underscore separated alphanumeric
/// segments, with purely numeric segments kept as numbers
fn parse_local(input: &str, text: &str) -> ManifestResult<Vec<LocalSegment>> {
    if text.is_empty() {
        return Err(invalid_version(input, "empty local label"));
    }

    let mut segments = Vec::new();
    for part in text.split(|c| matches!(c, '.' | '-' | '_')) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(invalid_version(input, "malformed local label"));
        }
        if part.bytes().all(|b| b.is_ascii_digit()) {
            segments.push(LocalSegment::Num(parse_number(input, part)?));
        } else {
            segments.push(LocalSegment::Str(part.to_string()));
        }
    }

    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> Version {
        Version::parse(text).unwrap()
    }

    #[test]
    fn test_parse_release_only() {
        let version = v("1.6.1");
        assert_eq!(version.epoch(), 0);
        assert_eq!(version.release(), &[1, 6, 1]);
        assert_eq!(version.pre(), None);
        assert_eq!(version.post(), None);
        assert_eq!(version.dev(), None);
        assert_eq!(version.local(), None);
    }

    #[test]
    fn test_parse_all_components() {
        let version = v("2!1.0.3rc4.post5.dev6+cu113.7");
        assert_eq!(version.epoch(), 2);
        assert_eq!(version.release(), &[1, 0, 3]);
        assert_eq!(version.pre(), Some((PreReleasePhase::ReleaseCandidate, 4)));
        assert_eq!(version.post(), Some(5));
        assert_eq!(version.dev(), Some(6));
        assert_eq!(
            version.local(),
            Some(&[LocalSegment::Str("cu113".to_string()), LocalSegment::Num(7)][..])
        );
    }

    #[test]
    fn test_spelling_variants_normalize() {
        // Each pair spells the same version
        let equivalent = [
            ("1.0A1", "1.0a1"),
            ("1.0-alpha-1", "1.0a1"),
            ("1.0_beta_2", "1.0b2"),
            ("1.0pre3", "1.0rc3"),
            ("1.0preview3", "1.0rc3"),
            ("1.0c3", "1.0rc3"),
            ("1.0-post2", "1.0.post2"),
            ("1.0rev2", "1.0.post2"),
            ("1.0r2", "1.0.post2"),
            ("1.0-DEV", "1.0.dev0"),
            ("v1.6.1", "1.6.1"),
            ("  1.6.1  ", "1.6.1"),
            ("1.0a", "1.0a0"),
            ("1.0.post", "1.0.post0"),
            ("1.0+CU113", "1.0+cu113"),
            ("1.0+foo-bar_7", "1.0+foo.bar.7"),
        ];

        for (variant, canonical) in &equivalent {
            let parsed = v(variant);
            assert_eq!(
                parsed.to_string(),
                *canonical,
                "normalizing {:?}",
                variant
            );
            assert_eq!(parsed, v(canonical), "comparing {:?}", variant);
        }
    }

    #[test]
    fn test_invalid_versions() {
        let invalid_cases = [
            "",                // Empty
            "   ",             // Whitespace only
            "abc",             // No release
            "1.0.",            // Dangling dot
            "1..0",            // Empty segment
            "1.0-",            // Dangling separator
            "1.0+",            // Empty local label
            "1.0+foo..bar",    // Empty local segment
            "1.0+nope!",       // Bad local character
            "!1.0",            // Empty epoch
            "1.0.xyz",         // Unknown marker
            "1.0.post1.a1",    // Pre-release after post
            "1.0.dev1.post1",  // Post after dev
            "1.0.post1.post2", // Duplicate post
            "1.0 .2",          // Inner whitespace
            ">=1.0",           // Operator leaked into version
            "99999999999999999999999999999999", // Out of range
        ];

        for text in &invalid_cases {
            assert!(Version::parse(text).is_err(), "Should reject: {:?}", text);
        }
    }

    #[test]
    fn test_trailing_zeros_insignificant() {
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("1"), v("1.0"));
        assert_eq!(v("0!1.0"), v("1.0.0.0"));
        assert_ne!(v("1.0"), v("1.0.1"));
    }

    #[test]
    fn test_scheme_ordering_chain() {
        // Full suffix ordering for a single release, smallest first
        let chain = [
            "1.0.dev456",
            "1.0a1",
            "1.0a2.dev456",
            "1.0a12.dev456",
            "1.0a12",
            "1.0b1.dev456",
            "1.0b2",
            "1.0b2.post345.dev456",
            "1.0b2.post345",
            "1.0rc1.dev456",
            "1.0rc1",
            "1.0",
            "1.0+abc.5",
            "1.0+abc.7",
            "1.0+5",
            "1.0.post456.dev34",
            "1.0.post456",
            "1.1.dev1",
        ];

        for pair in chain.windows(2) {
            assert!(
                v(pair[0]) < v(pair[1]),
                "expected {} < {}",
                pair[0],
                pair[1]
            );
        }
    }

    #[test]
    fn test_numeric_not_lexicographic() {
        assert!(v("1.9") < v("1.10"));
        assert!(v("0.29.9") < v("0.29.10"));
        assert!(v("2.0") > v("1.999"));
    }

    #[test]
    fn test_epoch_dominates() {
        assert!(v("1!0.1") > v("999.0"));
        assert!(v("1!1.0") < v("2!0.1"));
    }

    #[test]
    fn test_base_version_and_local_stripping() {
        let version = v("1.6.1rc2.post1+cu113");
        assert_eq!(version.base_version(), v("1.6.1"));
        assert_eq!(version.without_local(), v("1.6.1rc2.post1"));
        assert_eq!(version.base_version().to_string(), "1.6.1");
    }

    #[test]
    fn test_prerelease_classification() {
        assert!(v("1.0a1").is_prerelease());
        assert!(v("1.0.dev3").is_prerelease());
        assert!(!v("1.0").is_prerelease());
        assert!(!v("1.0.post1").is_prerelease());
        assert!(v("1.0.post1").is_postrelease());
    }

    #[test]
    fn test_display_round_trip() {
        let canonical = ["1.6.1", "1!2.0", "1.0a1", "1.0.post2", "1.0.dev3", "1.10.0+cu113"];
        for text in &canonical {
            assert_eq!(v(text).to_string(), *text);
        }
    }

    #[test]
    fn test_from_str_trait() {
        let version: Version = "1.6.1".parse().unwrap();
        assert_eq!(version.release(), &[1, 6, 1]);
    }

    #[test]
    fn test_serialization() {
        let version = v("1.10.0+cu113");

        let json = serde_json::to_string(&version).unwrap();
        assert_eq!(json, "\"1.10.0+cu113\"");

        let deserialized: Version = serde_json::from_str(&json).unwrap();
        assert_eq!(version, deserialized);
    }

    #[test]
    fn test_sorting_collection() {
        let mut versions = vec![v("1.10"), v("1.2"), v("1.9rc1"), v("1.9"), v("1.2.dev1")];
        versions.sort();

        let order: Vec<String> = versions.iter().map(|v| v.to_string()).collect();
        assert_eq!(order, vec!["1.2.dev1", "1.2", "1.9rc1", "1.9", "1.10"]);
    }
}

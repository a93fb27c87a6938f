//! Core types for manifest processing
//!
//! This module contains the fundamental data structures used throughout
//! the manifest processing system, including configuration, statistics,
//! and aggregated package summaries.

use serde::{Deserialize, Serialize};

use crate::app::models::RequirementKind;
use crate::constants::manifest;

/// Statistics about manifest processing
#[derive(Debug, Clone, Default, Serialize)]
pub struct ManifestStats {
    /// Total lines processed
    pub lines_processed: usize,
    /// Valid active entries found
    pub valid_entries: usize,
    /// Invalid/malformed lines
    pub invalid_lines: usize,
    /// Duplicate package names encountered
    pub duplicate_names: usize,
    /// Comment lines
    pub comment_lines: usize,
    /// Commented-out entries among the comment lines
    pub disabled_entries: usize,
    /// Empty lines
    pub blank_lines: usize,
}

impl ManifestStats {
    /// Calculate success rate as percentage of processed lines
    pub fn success_rate(&self) -> f64 {
        if self.lines_processed == 0 {
            0.0
        } else {
            (self.valid_entries as f64 / self.lines_processed as f64) * 100.0
        }
    }

    /// Lines that did not produce an active entry
    pub fn total_skipped(&self) -> usize {
        self.invalid_lines + self.duplicate_names + self.comment_lines + self.blank_lines
    }

    /// Problems a clean manifest must not have
    pub fn findings(&self) -> usize {
        self.invalid_lines + self.duplicate_names
    }

    pub fn is_clean(&self) -> bool {
        self.findings() == 0
    }
}

/// Configuration for manifest streaming
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfig {
    /// Maximum number of unique package names to track (memory limit)
    pub max_tracked_names: usize,
    /// Whether repeated package names pass through instead of erroring
    pub allow_duplicates: bool,
    /// Batch size for progress reporting
    pub progress_batch_size: usize,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            max_tracked_names: manifest::MAX_TRACKED_NAMES,
            allow_duplicates: false,
            progress_batch_size: manifest::PROGRESS_BATCH_SIZE,
        }
    }
}

/// Aggregated view of one package across a manifest
#[derive(Debug, Clone, Serialize)]
pub struct PackageSummary {
    /// Canonical package name
    pub name: String,
    /// Spelling of the first occurrence
    pub spelled: String,
    /// Constraint shape of the first occurrence
    pub kind: RequirementKind,
    /// Version expression as written, empty for bare names
    pub specifiers: String,
    /// Exact version when the entry is a pin
    pub pinned_version: Option<String>,
    /// Extras requested by the entry
    pub extras: Vec<String>,
    /// Number of active entries naming this package
    pub occurrences: usize,
}

impl PackageSummary {
    /// Check if the package is pinned to one exact version
    pub fn is_pinned(&self) -> bool {
        self.kind == RequirementKind::Pinned
    }

    /// Version expression for display, with a placeholder for bare names
    pub fn constraint_label(&self) -> &str {
        if self.specifiers.is_empty() {
            "(any)"
        } else {
            &self.specifiers
        }
    }
}

/// Differences between two manifests, keyed by canonical package name
#[derive(Debug, Clone, Default, Serialize)]
pub struct ManifestDiff {
    /// Packages only the new manifest declares
    pub added: Vec<PackageSummary>,
    /// Packages only the old manifest declares
    pub removed: Vec<PackageSummary>,
    /// Packages whose version expression changed
    pub changed: Vec<ChangedPackage>,
}

impl ManifestDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty()
    }

    /// Total number of differing packages
    pub fn total_changes(&self) -> usize {
        self.added.len() + self.removed.len() + self.changed.len()
    }
}

/// One package whose constraint differs between two manifests
#[derive(Debug, Clone, Serialize)]
pub struct ChangedPackage {
    /// Canonical package name
    pub name: String,
    /// Version expression in the old manifest
    pub old: String,
    /// Version expression in the new manifest
    pub new: String,
}

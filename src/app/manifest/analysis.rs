//! Package analysis and filtering functionality
//!
//! This module provides functions to analyze manifests for the packages
//! they declare, filter entries based on criteria, and compare two
//! manifests package by package.

use std::collections::HashMap;
use std::path::Path;

use futures::StreamExt;
use tracing::{debug, info, warn};

use super::streaming::ManifestStreamer;
use super::types::{ChangedPackage, ManifestConfig, ManifestDiff, PackageSummary};
use crate::app::models::{Requirement, RequirementKind};
use crate::app::name::canonicalize;
use crate::errors::ManifestResult;

/// Collect a per-package summary from a manifest file
///
/// Aggregates active entries by canonical package name. The first
/// occurrence of a package supplies its spelling, constraint and extras;
/// repeats only increase the occurrence count, so callers can see how the
/// manifest would resolve while still spotting repeated names. Malformed
/// lines are logged and skipped; `check` is where they become failures.
///
/// # Arguments
///
/// * `manifest_path` - Path to the manifest file
///
/// # Returns
///
/// A map of canonical package names to their summaries
pub async fn collect_packages<P: AsRef<Path>>(
    manifest_path: P,
) -> ManifestResult<HashMap<String, PackageSummary>> {
    // Repeats aggregate into occurrence counts instead of erroring
    let config = ManifestConfig {
        allow_duplicates: true,
        ..Default::default()
    };
    let mut streamer = ManifestStreamer::with_config(config);
    let mut stream = streamer.stream(manifest_path).await?;

    let mut packages: HashMap<String, PackageSummary> = HashMap::new();

    while let Some(result) = stream.next().await {
        let requirement = match result {
            Ok(requirement) => requirement,
            Err(e) => {
                warn!("Skipping invalid entry: {}", e);
                continue;
            }
        };
        let canonical = requirement.name.canonical().to_string();

        let entry = packages
            .entry(canonical.clone())
            .or_insert_with(|| PackageSummary {
                name: canonical,
                spelled: requirement.name.as_str().to_string(),
                kind: requirement.kind(),
                specifiers: requirement.specifiers.to_string(),
                pinned_version: requirement.pinned_version().map(|v| v.to_string()),
                extras: requirement.extras.clone(),
                occurrences: 0,
            });

        // First occurrence wins for everything but the count
        entry.occurrences += 1;
    }

    debug!("Discovered {} packages from manifest", packages.len());

    Ok(packages)
}

/// Filter active entries from a manifest based on criteria
///
/// Malformed lines are logged and skipped rather than failing the listing.
///
/// # Arguments
///
/// * `manifest_path` - Path to the manifest file
/// * `kind` - Optional constraint-shape filter
/// * `name_contains` - Optional substring filter, matched against the
///   canonical name so any spelling of the needle works
///
/// # Returns
///
/// Vector of entries matching the criteria, in manifest order
pub async fn filter_requirements<P: AsRef<Path>>(
    manifest_path: P,
    kind: Option<RequirementKind>,
    name_contains: Option<&str>,
) -> ManifestResult<Vec<Requirement>> {
    let config = ManifestConfig {
        allow_duplicates: true,
        ..Default::default()
    };
    let mut streamer = ManifestStreamer::with_config(config);
    let mut stream = streamer.stream(manifest_path).await?;

    let needle = name_contains.map(canonicalize);
    let mut filtered = Vec::new();

    while let Some(result) = stream.next().await {
        let requirement = match result {
            Ok(requirement) => requirement,
            Err(e) => {
                warn!("Skipping invalid entry: {}", e);
                continue;
            }
        };

        // Apply kind filter
        if let Some(filter_kind) = kind {
            if requirement.kind() != filter_kind {
                continue;
            }
        }

        // Apply name filter
        if let Some(ref needle) = needle {
            if !requirement.name.canonical().contains(needle.as_str()) {
                continue;
            }
        }

        filtered.push(requirement);
    }

    info!("Filtered to {} entries matching criteria", filtered.len());

    Ok(filtered)
}

/// Find the active entry for one package
///
/// The lookup uses canonical names, so `Torch_Pitch_Shift` finds an entry
/// written as `torch-pitch-shift`. With duplicate entries, the first
/// occurrence is returned, matching how the manifest would resolve.
///
/// # Arguments
///
/// * `manifest_path` - Path to the manifest file
/// * `package` - Package name in any spelling
pub async fn find_requirement<P: AsRef<Path>>(
    manifest_path: P,
    package: &str,
) -> ManifestResult<Option<Requirement>> {
    let config = ManifestConfig {
        allow_duplicates: true,
        ..Default::default()
    };
    let mut streamer = ManifestStreamer::with_config(config);
    let mut stream = streamer.stream(manifest_path).await?;

    let wanted = canonicalize(package);

    while let Some(result) = stream.next().await {
        let requirement = match result {
            Ok(requirement) => requirement,
            Err(e) => {
                warn!("Skipping invalid entry: {}", e);
                continue;
            }
        };
        if requirement.name.canonical() == wanted {
            return Ok(Some(requirement));
        }
    }

    Ok(None)
}

/// Compare two manifests package by package
///
/// Packages are matched by canonical name. A package counts as changed
/// when its version expression differs between the manifests; spelling
/// and comment differences are ignored.
///
/// # Arguments
///
/// * `old_path` - Path to the baseline manifest
/// * `new_path` - Path to the updated manifest
///
/// # Returns
///
/// Added, removed and changed packages, each sorted by name
pub async fn diff_manifests<P: AsRef<Path>, Q: AsRef<Path>>(
    old_path: P,
    new_path: Q,
) -> ManifestResult<ManifestDiff> {
    let old_packages = collect_packages(old_path).await?;
    let new_packages = collect_packages(new_path).await?;

    let mut diff = ManifestDiff::default();

    for (name, summary) in &new_packages {
        match old_packages.get(name) {
            None => diff.added.push(summary.clone()),
            Some(old_summary) if old_summary.specifiers != summary.specifiers => {
                diff.changed.push(ChangedPackage {
                    name: name.clone(),
                    old: old_summary.specifiers.clone(),
                    new: summary.specifiers.clone(),
                });
            }
            Some(_) => {}
        }
    }

    for (name, summary) in &old_packages {
        if !new_packages.contains_key(name) {
            diff.removed.push(summary.clone());
        }
    }

    // Sort for stable output
    diff.added.sort_by(|a, b| a.name.cmp(&b.name));
    diff.removed.sort_by(|a, b| a.name.cmp(&b.name));
    diff.changed.sort_by(|a, b| a.name.cmp(&b.name));

    debug!(
        "Manifest diff: {} added, {} removed, {} changed",
        diff.added.len(),
        diff.removed.len(),
        diff.changed.len()
    );

    Ok(diff)
}

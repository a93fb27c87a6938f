//! Manifest parsing and streaming functionality
//!
//! This module provides efficient streaming parsing of pip requirements
//! manifests, with duplicate detection and memory-bounded processing for
//! large files. It supports package-level analysis, flexible filtering,
//! and manifest-to-manifest comparison.
//!
//! # Key Features
//!
//! - **Streaming parsing**: Memory-efficient processing of large manifest files
//! - **Duplicate detection**: Flags repeated package names with configurable limits
//! - **Package analysis**: Aggregates entries into per-package summaries
//! - **Flexible filtering**: Supports filtering by constraint shape and name
//! - **Manifest comparison**: Reports added, removed and changed packages
//!
//! # Module Organization
//!
//! - [`types`] - Core data structures (ManifestStats, ManifestConfig, PackageSummary, ManifestDiff)
//! - [`streaming`] - Core streaming parser with duplicate detection and memory management
//! - [`analysis`] - Package discovery, filtering, and manifest comparison
//! - [`utils`] - Convenience functions for common operations
//! - [`tests`] - Integration tests for complex scenarios
//!
//! # Examples
//!
//! ## Basic Streaming
//!
//! ```rust,no_run
//! use futures::StreamExt;
//! use reqlint::app::manifest::{ManifestStreamer, ManifestConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ManifestConfig::default();
//! let mut streamer = ManifestStreamer::with_config(config);
//! let mut stream = streamer.stream("requirements.txt").await?;
//!
//! while let Some(result) = stream.next().await {
//!     match result {
//!         Ok(requirement) => {
//!             println!("Found entry: {}", requirement);
//!         }
//!         Err(e) => {
//!             eprintln!("Error processing line: {}", e);
//!         }
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Package Analysis
//!
//! ```rust,no_run
//! use reqlint::app::manifest::collect_packages;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let packages = collect_packages("requirements.txt").await?;
//!
//! for (name, summary) in &packages {
//!     println!("Package: {}", name);
//!     println!("  Constraint: {}", summary.constraint_label());
//!     println!("  Occurrences: {}", summary.occurrences);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Filtering Entries
//!
//! ```rust,no_run
//! use reqlint::app::manifest::filter_requirements;
//! use reqlint::app::models::RequirementKind;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pinned = filter_requirements(
//!     "requirements.txt",
//!     Some(RequirementKind::Pinned),
//!     Some("torch"),
//! ).await?;
//!
//! println!("Found {} pinned torch packages", pinned.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Comparing Manifests
//!
//! ```rust,no_run
//! use reqlint::app::manifest::diff_manifests;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let diff = diff_manifests("requirements.txt", "requirements.new.txt").await?;
//!
//! for package in &diff.added {
//!     println!("+ {}", package.name);
//! }
//! for change in &diff.changed {
//!     println!("~ {}: {} -> {}", change.name, change.old, change.new);
//! }
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod streaming;
pub mod types;
pub mod utils;

#[cfg(test)]
pub mod tests;

// Re-export main public API for backward compatibility
pub use analysis::{collect_packages, diff_manifests, filter_requirements, find_requirement};
pub use streaming::ManifestStreamer;
pub use types::{ChangedPackage, ManifestConfig, ManifestDiff, ManifestStats, PackageSummary};
pub use utils::{collect_all_requirements, validate_manifest};

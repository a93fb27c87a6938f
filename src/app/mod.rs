//! Core application logic for reqlint
//!
//! This module contains the main application components including package
//! names, version handling, constraint evaluation, and manifest parsing.
//!
//! # Examples
//!
//! ```rust,no_run
//! use reqlint::app::{ManifestStreamer, Version};
//! use futures::StreamExt;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Stream entries from a manifest
//! let mut streamer = ManifestStreamer::new();
//! let mut stream = streamer.stream("requirements.txt").await?;
//!
//! let candidate: Version = "1.6.1".parse()?;
//!
//! while let Some(result) = stream.next().await {
//!     match result {
//!         Ok(requirement) => {
//!             println!("Found entry: {}", requirement.name);
//!             if requirement.matches(&candidate) {
//!                 println!("  allows {}", candidate);
//!             }
//!         }
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod manifest;
pub mod models;
pub mod name;
pub mod specifier;
pub mod version;

// Re-export main public API
pub use manifest::{
    ManifestConfig, ManifestStats, ManifestStreamer, collect_all_requirements, validate_manifest,
};
pub use models::{ManifestLine, Requirement, RequirementKind, classify_line, parse_requirement_line};
pub use name::PackageName;
pub use specifier::{Operator, Specifier, SpecifierSet};
pub use version::Version;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_structure() {
        // Ensure public API is accessible
        let config = ManifestConfig::default();
        assert!(!config.allow_duplicates);
    }
}

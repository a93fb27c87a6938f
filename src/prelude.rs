//! Prelude module for the reqlint library
//!
//! This module re-exports the most commonly used items from the library,
//! providing a convenient way to import everything needed for typical usage
//! with a single `use reqlint::prelude::*;` statement.
//!
//! # Usage
//!
//! ```rust,no_run
//! use reqlint::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let stats = validate_manifest("requirements.txt", 0).await?;
//!     println!("Entries: {}", stats.valid_entries);
//!
//!     let packages = collect_packages("requirements.txt").await?;
//!     for (name, summary) in &packages {
//!         println!("{}: {}", name, summary.constraint_label());
//!     }
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Essential app components that are used in most integrations
pub use crate::app::{
    ManifestConfig,
    ManifestStats,
    // Streaming
    ManifestStreamer,

    Operator,
    // Data types
    PackageName,
    Requirement,
    RequirementKind,

    Specifier,
    // Constraint evaluation
    SpecifierSet,
    Version,
};

// Aggregated views
pub use crate::app::manifest::{ChangedPackage, ManifestDiff, PackageSummary};

// Manifest functions (most commonly used)
pub use crate::app::manifest::{
    collect_all_requirements, collect_packages, diff_manifests, filter_requirements,
    validate_manifest,
};

// Commonly used constants
pub use crate::constants::{DEFAULT_MANIFEST_NAME, MAX_TRACKED_NAMES};

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};

// Common external crate re-exports for convenience
// Note: Only re-export types that users will commonly need,
// not the entire crates which would pollute the namespace
pub use tokio;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        // Verify that all essential types are available through prelude
        let _config = ManifestConfig::default();
        let _stats = ManifestStats::default();

        // Test that constants are available
        assert_eq!(DEFAULT_MANIFEST_NAME, "requirements.txt");
        assert!(MAX_TRACKED_NAMES > 0);
    }

    #[test]
    fn test_prelude_parsing_pattern() {
        // Test that the common parsing pattern works with prelude imports
        let name: PackageName = "Torch_Pitch_Shift".parse().unwrap();
        assert_eq!(name.canonical(), "torch-pitch-shift");

        let specifiers: SpecifierSet = ">=1.2.2,<1.3".parse().unwrap();
        let version: Version = "1.2.5".parse().unwrap();
        assert!(specifiers.matches(&version));
    }

    #[tokio::test]
    async fn test_prelude_integration_pattern() {
        // Test that the common integration pattern works with prelude imports
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"scipy==1.6.1\n").unwrap();
        file.flush().unwrap();

        let requirements = collect_all_requirements(file.path(), ManifestConfig::default())
            .await
            .unwrap();
        assert_eq!(requirements.len(), 1);
        assert_eq!(requirements[0].kind(), RequirementKind::Pinned);
    }

    #[test]
    fn test_std_reexports() {
        // Test that standard library re-exports work
        let path = PathBuf::from("/tmp/test");
        let _borrowed: &Path = path.as_path();
    }
}

//! reqlint Library
//!
//! A Rust library for validating and analyzing pip requirements manifests.
//! Provides streaming parsing, canonical package-name handling, version
//! ordering, and constraint evaluation.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

#[cfg(test)]
mod tests {
    use super::*;
    use constants::*;

    #[test]
    fn test_constants_accessible() {
        // Test that our constants are accessible
        assert_eq!(DEFAULT_MANIFEST_NAME, "requirements.txt");
        assert_eq!(EXIT_SUCCESS, 0);
        assert!(MAX_TRACKED_NAMES >= 1_000);
    }

    #[test]
    fn test_error_types() {
        // Test that our error types work correctly
        let manifest_error = errors::ManifestError::InvalidName {
            name: "-torch".to_string(),
        };
        let app_error = AppError::Manifest(manifest_error);

        assert_eq!(app_error.category(), "manifest");
        assert_eq!(app_error.exit_code(), EXIT_FAILURE);

        let findings = AppError::ValidationFailed { problems: 2 };
        assert_eq!(findings.exit_code(), EXIT_FINDINGS);
    }
}

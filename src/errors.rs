//! Error types for reqlint
//!
//! This module defines the error types for all components of the application.
//! Errors are designed to be actionable and provide clear context for debugging
//! and user feedback. The top-level `AppError` carries the process exit code,
//! so findings in a manifest and operational failures are distinguishable to
//! scripts and CI jobs.

use std::path::PathBuf;
use thiserror::Error;

use crate::constants::exit;

/// Manifest parsing and validation errors
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("Manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// I/O error reading manifest
    #[error("I/O error reading manifest")]
    Io(#[from] std::io::Error),

    /// Line does not follow the entry grammar
    #[error("Invalid manifest entry at line {line}: {content}")]
    InvalidFormat { line: usize, content: String },

    /// Malformed package name
    #[error("Invalid package name: {name}")]
    InvalidName { name: String },

    /// Malformed version string
    #[error("Invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// Malformed version specifier
    #[error("Invalid version specifier '{spec}': {reason}")]
    InvalidSpecifier { spec: String, reason: String },

    /// Package named more than once among active entries
    #[error("Duplicate package '{name}' at line {line} (first declared at line {first_line})")]
    DuplicateEntry {
        name: String,
        line: usize,
        first_line: usize,
    },
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid configuration format
    #[error("Invalid configuration format")]
    InvalidFormat(#[from] toml::de::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    /// I/O error reading or writing configuration
    #[error("Configuration file I/O error")]
    Io(#[from] std::io::Error),
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest error
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON output serialization error
    #[error("JSON serialization failed")]
    Json(#[from] serde_json::Error),

    /// Manifest checked cleanly but contained findings
    #[error("Validation failed: {problems} problem(s) found")]
    ValidationFailed { problems: usize },

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Process exit code for this error
    ///
    /// Findings in an otherwise readable manifest exit with
    /// `exit::FINDINGS` so scripts can separate "bad manifest" from
    /// "tool could not run".
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::ValidationFailed { .. } => exit::FINDINGS,
            _ => exit::FAILURE,
        }
    }

    /// Get error category for logging and metrics
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Manifest(_) => "manifest",
            AppError::Config(_) => "config",
            AppError::Io(_) => "io",
            AppError::Json(_) => "json",
            AppError::ValidationFailed { .. } => "validation",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Manifest result type alias
pub type ManifestResult<T> = std::result::Result<T, ManifestError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let findings = AppError::ValidationFailed { problems: 3 };
        assert_eq!(findings.exit_code(), exit::FINDINGS);

        let operational = AppError::Manifest(ManifestError::InvalidName {
            name: "-bad-".to_string(),
        });
        assert_eq!(operational.exit_code(), exit::FAILURE);
    }

    #[test]
    fn test_categories() {
        let manifest = AppError::Manifest(ManifestError::InvalidFormat {
            line: 3,
            content: "???".to_string(),
        });
        assert_eq!(manifest.category(), "manifest");

        let generic = AppError::generic("something odd");
        assert_eq!(generic.category(), "generic");
    }

    #[test]
    fn test_duplicate_entry_message_names_both_lines() {
        let error = ManifestError::DuplicateEntry {
            name: "torch".to_string(),
            line: 12,
            first_line: 4,
        };
        let message = error.to_string();
        assert!(message.contains("torch"));
        assert!(message.contains("12"));
        assert!(message.contains("4"));
    }
}

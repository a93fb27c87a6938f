//! Application constants for reqlint
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

#![allow(dead_code)] // Some constants are only referenced from one command path
#![allow(unused_imports)] // Re-exports mirror the module layout

/// Manifest streaming and duplicate tracking
pub mod manifest {
    /// Maximum tracked package names before the duplicate set is cleared
    /// to bound memory on very large manifests
    pub const MAX_TRACKED_NAMES: usize = 1_000_000;

    /// Entries between progress log lines while streaming
    pub const PROGRESS_BATCH_SIZE: usize = 1000;
}

/// File names and search locations
pub mod files {
    /// Conventional manifest file name
    pub const DEFAULT_MANIFEST_NAME: &str = "requirements.txt";

    /// File names tried, in order, when no manifest path is given
    pub const MANIFEST_SEARCH_CANDIDATES: &[&str] = &[
        "requirements.txt",
        "requirements-dev.txt",
        "dev-requirements.txt",
        "requirements.in",
    ];

    /// Application directory name under the platform config root
    pub const CONFIG_DIR_NAME: &str = "reqlint";

    /// Configuration file name
    pub const CONFIG_FILE_NAME: &str = "config.toml";
}

/// Progress reporting
pub mod progress {
    /// Spinner refresh interval (milliseconds)
    pub const TICK_INTERVAL_MS: u64 = 120;

    /// Entries between spinner message refreshes
    pub const SPINNER_UPDATE_EVERY: usize = 256;
}

/// Logging and debugging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}

/// Process exit codes
pub mod exit {
    /// Clean run, no findings
    pub const SUCCESS: i32 = 0;

    /// Manifest was readable but contained findings
    pub const FINDINGS: i32 = 1;

    /// Operational failure, the manifest could not be checked
    pub const FAILURE: i32 = 2;
}

// Re-export commonly used constants for convenience
pub use exit::{FAILURE as EXIT_FAILURE, FINDINGS as EXIT_FINDINGS, SUCCESS as EXIT_SUCCESS};
pub use files::{CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_MANIFEST_NAME};
pub use logging::DEFAULT_LOG_LEVEL;
pub use manifest::{MAX_TRACKED_NAMES, PROGRESS_BATCH_SIZE};

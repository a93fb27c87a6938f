//! Configuration management for reqlint
//!
//! This module provides unified configuration management with automatic
//! first-run initialization, multi-source loading, and zero-config defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::ManifestConfig;
use crate::constants::{files, logging, manifest};
use crate::errors::{AppError, ConfigError, ConfigResult, Result};

/// Unified application configuration for TOML serialization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// Manifest processing settings
    #[serde(default)]
    pub manifest: ManifestConfigToml,
    /// Console output settings
    #[serde(default)]
    pub output: OutputConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// TOML-friendly manifest configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestConfigToml {
    /// Maximum tracked package names
    pub max_tracked_names: usize,
    /// Allow duplicate package names without flagging them
    pub allow_duplicates: bool,
    /// Progress batch size
    pub progress_batch_size: usize,
}

impl Default for ManifestConfigToml {
    fn default() -> Self {
        Self {
            max_tracked_names: manifest::MAX_TRACKED_NAMES,
            allow_duplicates: false,
            progress_batch_size: manifest::PROGRESS_BATCH_SIZE,
        }
    }
}

/// Console output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable spinner display on interactive terminals
    pub progress: bool,
    /// Enable colored output
    pub colored_output: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            progress: true,
            colored_output: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default log level for the application
    pub level: String,
    /// Enable file logging
    pub file_logging: bool,
    /// Log file path (if file_logging is enabled)
    pub log_file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: logging::DEFAULT_LOG_LEVEL.to_string(),
            file_logging: false,
            log_file: None,
        }
    }
}

impl AppConfig {
    /// Convert TOML-friendly configuration to runtime configuration
    pub fn to_runtime_config(&self) -> ManifestConfig {
        self.manifest.to_runtime_config()
    }

    /// Load configuration with multi-source precedence:
    /// 1. Default values
    /// 2. Config file (if exists)
    /// 3. CLI arguments
    pub async fn load(config_file_override: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        // Try to load from config file
        let config_path = if let Some(ref path) = config_file_override {
            // Use explicit config file
            Some(path.clone())
        } else {
            // Look for default config file locations
            Self::find_config_file()?
        };

        if let Some(path) = config_path {
            if path.exists() {
                debug!("Loading config from: {}", path.display());
                config = Self::load_from_file(&path).await?;
            } else if config_file_override.is_some() {
                return Err(ConfigError::NotFound { path }.into());
            }
        }

        Ok(config)
    }

    /// Initialize configuration on first run
    ///
    /// Creates a default config file if none exists and notifies the user
    pub async fn initialize_first_run() -> Result<Option<PathBuf>> {
        let config_path = Self::get_default_config_path()?;

        if config_path.exists() {
            // Config already exists, nothing to do
            return Ok(Some(config_path));
        }

        // Create default config file
        info!("Creating default configuration file...");

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(ConfigError::Io)?;
        }

        // Generate default config with helpful comments
        let config_content = Self::generate_default_config_content();

        tokio::fs::write(&config_path, config_content)
            .await
            .map_err(ConfigError::Io)?;

        // Notify user
        println!("📁 Created default configuration file:");
        println!("   {}", config_path.display());
        println!("   You can customize settings by editing this file.");
        println!();

        Ok(Some(config_path))
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> Result<Option<PathBuf>> {
        let search_paths = vec![
            // Project-local config
            PathBuf::from("./reqlint.toml"),
            PathBuf::from("./config.toml"),
            // User config
            Self::get_default_config_path()?,
            // System config (Unix only)
            #[cfg(unix)]
            PathBuf::from("/etc/reqlint/config.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                debug!("Found config file: {}", path.display());
                return Ok(Some(path));
            }
        }

        debug!("No config file found in standard locations");
        Ok(None)
    }

    /// Get the default config file path for the current user
    pub fn get_default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AppError::generic("Could not determine user config directory"))?;

        Ok(config_dir
            .join(files::CONFIG_DIR_NAME)
            .join(files::CONFIG_FILE_NAME))
    }

    /// Load configuration from a TOML file
    async fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(ConfigError::Io)?;

        let config: AppConfig = toml::from_str(&content).map_err(ConfigError::InvalidFormat)?;
        config.validate()?;

        info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Check loaded values against their accepted ranges
    pub fn validate(&self) -> ConfigResult<()> {
        const LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

        if !LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::InvalidValue {
                field: "logging.level".to_string(),
                value: self.logging.level.clone(),
                reason: "expected one of: error, warn, info, debug, trace".to_string(),
            });
        }

        if self.manifest.max_tracked_names == 0 {
            return Err(ConfigError::InvalidValue {
                field: "manifest.max_tracked_names".to_string(),
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        if self.manifest.progress_batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "manifest.progress_batch_size".to_string(),
                value: "0".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Generate default configuration content with helpful comments
    pub fn generate_default_config_content() -> String {
        format!(
            r#"# reqlint Configuration
# This file was automatically generated on first run.
# You can customize any of these settings to suit your needs.

[manifest]
# Maximum number of unique package names tracked for duplicate detection
max_tracked_names = {}

# Treat repeated package names as ordinary entries instead of problems
allow_duplicates = false

# Entries per progress update when processing large manifests
progress_batch_size = {}

[output]
# Show a spinner on interactive terminals
progress = true

# Enable colored output
colored_output = true

[logging]
# Logging configuration
level = "{}"  # error, warn, info, debug, trace
file_logging = false
# log_file = "/path/to/log/file.log"  # Uncomment to enable file logging
"#,
            manifest::MAX_TRACKED_NAMES,
            manifest::PROGRESS_BATCH_SIZE,
            logging::DEFAULT_LOG_LEVEL,
        )
    }
}

impl ManifestConfigToml {
    /// Convert to runtime ManifestConfig
    pub fn to_runtime_config(&self) -> ManifestConfig {
        ManifestConfig {
            max_tracked_names: self.max_tracked_names,
            allow_duplicates: self.allow_duplicates,
            progress_batch_size: self.progress_batch_size,
        }
    }
}

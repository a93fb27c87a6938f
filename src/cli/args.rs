//! Command-line argument parsing for reqlint
//!
//! This module defines the CLI structure using clap derive macros,
//! providing a user-friendly interface for manifest validation, package
//! listing, manifest comparison, and constraint queries.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::app::models::RequirementKind;

/// reqlint - Check pip requirements manifests
#[derive(Parser, Debug)]
#[command(
    name = "reqlint",
    version,
    about = "Validate and analyze pip requirements manifests",
    long_about = "A fast checker for pip requirements manifests.
Validates entry syntax, flags duplicate packages, summarizes version constraints,
and answers whether a candidate version satisfies a declared constraint."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a manifest and report problems
    Check(CheckArgs),

    /// Show manifest statistics and health information
    Info(InfoArgs),

    /// List active entries from a manifest
    List(ListArgs),

    /// Compare two manifests package by package
    Diff(DiffArgs),

    /// Check whether a candidate version satisfies a declared constraint
    Satisfies(SatisfiesArgs),

    /// Manage reqlint configuration
    Config(ConfigArgs),
}

/// Arguments for the check command
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Path to the manifest file (searched for in the current directory if omitted)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Check only the first N entries (for spot checks of large manifests)
    #[arg(long, value_name = "N")]
    pub sample: Option<usize>,

    /// Treat repeated package names as ordinary entries instead of problems
    #[arg(long)]
    pub allow_duplicates: bool,

    /// Emit results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the info command
#[derive(Args, Debug, Clone)]
pub struct InfoArgs {
    /// Path to the manifest file (searched for in the current directory if omitted)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Emit results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the list command
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Path to the manifest file (searched for in the current directory if omitted)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    /// Show package names only
    #[arg(long)]
    pub names_only: bool,

    /// Show only entries pinned to an exact version
    #[arg(long)]
    pub pinned: bool,

    /// Show only entries with a version range
    #[arg(long)]
    pub ranged: bool,

    /// Show only entries without a version constraint
    #[arg(long)]
    pub unconstrained: bool,

    /// Show only packages whose name contains this text
    #[arg(long, value_name = "TEXT")]
    pub name: Option<String>,

    /// Emit results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the diff command
#[derive(Args, Debug, Clone)]
pub struct DiffArgs {
    /// Baseline manifest file
    #[arg(value_name = "OLD")]
    pub old: PathBuf,

    /// Updated manifest file
    #[arg(value_name = "NEW")]
    pub new: PathBuf,

    /// Emit results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the satisfies command
#[derive(Args, Debug, Clone)]
pub struct SatisfiesArgs {
    /// Package name in any spelling
    #[arg(value_name = "PACKAGE")]
    pub package: String,

    /// Candidate version to evaluate
    #[arg(value_name = "VERSION")]
    pub version: String,

    /// Path to the manifest file (searched for in the current directory if omitted)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,
}

/// Arguments for configuration management
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create a default configuration file
    Init {
        /// Overwrite an existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Show the effective configuration
    Show,

    /// Print the configuration file path
    Path,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    pub fn log_level(&self) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            tracing::Level::WARN
        }
    }
}

impl CheckArgs {
    /// Reject argument combinations that cannot be honored
    pub fn validate(&self) -> Result<(), String> {
        if self.sample == Some(0) {
            return Err("Sample size must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl ListArgs {
    /// Reject argument combinations that cannot be honored
    pub fn validate(&self) -> Result<(), String> {
        let shape_filters = [self.pinned, self.ranged, self.unconstrained]
            .iter()
            .filter(|&&flag| flag)
            .count();

        if shape_filters > 1 {
            return Err(
                "Cannot combine --pinned, --ranged, and --unconstrained".to_string(),
            );
        }

        if self.names_only && self.json {
            return Err("Cannot specify both --names-only and --json".to_string());
        }

        Ok(())
    }

    /// Constraint-shape filter requested by the flags
    pub fn kind(&self) -> Option<RequirementKind> {
        if self.pinned {
            Some(RequirementKind::Pinned)
        } else if self.ranged {
            Some(RequirementKind::Ranged)
        } else if self.unconstrained {
            Some(RequirementKind::Unconstrained)
        } else {
            None
        }
    }
}

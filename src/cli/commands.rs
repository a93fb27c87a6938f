//! Command handlers for the reqlint CLI
//!
//! This module implements the main command handlers that coordinate between
//! CLI arguments and the core manifest functionality.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use tracing::{debug, info};

use crate::app::manifest::{analysis, utils};
use crate::app::models::{Requirement, RequirementKind};
use crate::app::{ManifestStreamer, Version};
use crate::cli::{CheckArgs, ConfigAction, ConfigArgs, DiffArgs, InfoArgs, ListArgs, SatisfiesArgs};
use crate::config::AppConfig;
use crate::constants::{files, progress};
use crate::errors::{AppError, Result};

/// Handle the check command
///
/// Streams the manifest through the strict parsing pipeline, reporting
/// every problem found. Returns a validation failure when the manifest
/// is not clean, so shell callers can gate on the exit code.
pub async fn handle_check(args: CheckArgs, config: &AppConfig) -> Result<()> {
    let start_time = Instant::now();

    args.validate().map_err(AppError::generic)?;

    let manifest_path = resolve_manifest_path(args.file.as_ref())?;
    info!("Checking manifest file: {}", manifest_path.display());

    let mut manifest_config = config.to_runtime_config();
    if args.allow_duplicates {
        manifest_config.allow_duplicates = true;
    }

    let spinner = progress_spinner(
        "Checking manifest...",
        show_progress(config) && !args.json,
    );

    let sample_size = args.sample.unwrap_or(0);
    let mut streamer = ManifestStreamer::with_config(manifest_config);
    let mut problems: Vec<String> = Vec::new();
    {
        let mut stream = streamer.stream(&manifest_path).await?;
        let mut processed = 0;

        while let Some(result) = stream.next().await {
            if let Err(e) = result {
                problems.push(e.to_string());
            }

            processed += 1;
            if processed % progress::SPINNER_UPDATE_EVERY == 0 {
                spinner.set_message(format!("Checking manifest... {} entries", processed));
            }
            if sample_size > 0 && processed >= sample_size {
                break;
            }
        }
    } // stream is dropped here, ending the mutable borrow

    let stats = streamer.stats().clone();
    spinner.finish_and_clear();

    info!(
        "Check completed: {} problems in {:?}",
        problems.len(),
        start_time.elapsed()
    );

    if args.json {
        let report = json!({
            "file": manifest_path,
            "stats": stats,
            "problems": problems,
            "clean": problems.is_empty(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("📋 Manifest Check");
        println!("=================");
        println!("File: {}", manifest_path.display());
        println!();
        println!("Lines processed:  {}", stats.lines_processed);
        println!("Active entries:   {}", stats.valid_entries);
        println!(
            "Comment lines:    {} ({} disabled entries)",
            stats.comment_lines, stats.disabled_entries
        );
        println!("Blank lines:      {}", stats.blank_lines);
        println!("Invalid lines:    {}", stats.invalid_lines);
        println!("Duplicate names:  {}", stats.duplicate_names);

        if !problems.is_empty() {
            println!();
            println!("⚠️  Problems:");
            for problem in problems.iter().take(10) {
                println!("  • {}", problem);
            }
            if problems.len() > 10 {
                println!("  ... and {} more problems", problems.len() - 10);
            }
        }

        println!();
        if problems.is_empty() {
            println!("✅ Manifest is clean");
        } else {
            println!("❌ Found {} problem(s)", problems.len());
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationFailed {
            problems: problems.len(),
        })
    }
}

/// Handle the info command
pub async fn handle_info(args: InfoArgs, config: &AppConfig) -> Result<()> {
    let manifest_path = resolve_manifest_path(args.file.as_ref())?;
    info!("Analyzing manifest file: {}", manifest_path.display());

    let spinner = progress_spinner(
        "Loading manifest...",
        show_progress(config) && !args.json,
    );
    let load_start = Instant::now();

    let stats = utils::validate_manifest(&manifest_path, 0).await?;
    let packages = analysis::collect_packages(&manifest_path).await?;

    spinner.finish_and_clear();
    info!(
        "Analyzed {} packages in {:?}",
        packages.len(),
        load_start.elapsed()
    );

    let metadata = tokio::fs::metadata(&manifest_path).await?;
    let modified: Option<DateTime<Utc>> = metadata.modified().ok().map(DateTime::from);

    let pinned = count_kind(&packages, RequirementKind::Pinned);
    let ranged = count_kind(&packages, RequirementKind::Ranged);
    let unconstrained = count_kind(&packages, RequirementKind::Unconstrained);
    let with_extras = packages.values().filter(|p| !p.extras.is_empty()).count();
    let repeated = packages.values().filter(|p| p.occurrences > 1).count();

    if args.json {
        let report = json!({
            "file": manifest_path,
            "size_bytes": metadata.len(),
            "modified": modified,
            "stats": stats,
            "packages": {
                "unique": packages.len(),
                "pinned": pinned,
                "ranged": ranged,
                "unconstrained": unconstrained,
                "with_extras": with_extras,
                "repeated": repeated,
            },
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("📋 Manifest Information");
    println!("=======================");
    println!("File:     {}", manifest_path.display());
    println!("Size:     {:.1} KB", metadata.len() as f64 / 1024.0);
    if let Some(modified) = modified {
        println!(
            "Modified: {} ({})",
            modified.format("%Y-%m-%d %H:%M UTC"),
            age_description(modified)
        );
    }
    println!();
    println!("Lines processed:  {}", stats.lines_processed);
    println!("Active entries:   {}", stats.valid_entries);
    println!("Unique packages:  {}", packages.len());
    println!("  Pinned:         {}", pinned);
    println!("  Ranged:         {}", ranged);
    println!("  Unconstrained:  {}", unconstrained);
    println!("  With extras:    {}", with_extras);
    if repeated > 0 {
        println!("  Repeated:       {}", repeated);
    }
    println!(
        "Comment lines:    {} ({} disabled entries)",
        stats.comment_lines, stats.disabled_entries
    );
    println!("Blank lines:      {}", stats.blank_lines);

    println!();
    if stats.is_clean() {
        println!("✅ No problems found");
    } else {
        println!(
            "⚠️  {} problem(s) found. Run 'reqlint check' for details.",
            stats.findings()
        );
    }

    Ok(())
}

/// Handle the list command
pub async fn handle_list(args: ListArgs, config: &AppConfig) -> Result<()> {
    args.validate().map_err(AppError::generic)?;

    let manifest_path = resolve_manifest_path(args.file.as_ref())?;
    info!("Listing entries from: {}", manifest_path.display());

    let spinner = progress_spinner(
        "Preparing list...",
        show_progress(config) && !args.json && !args.names_only,
    );

    let mut requirements =
        analysis::filter_requirements(&manifest_path, args.kind(), args.name.as_deref()).await?;

    spinner.finish_and_clear();

    // Sort by canonical name for consistent output
    requirements.sort_by(|a, b| a.name.cmp(&b.name));

    if args.json {
        println!("{}", serde_json::to_string_pretty(&requirements)?);
        return Ok(());
    }

    if args.names_only {
        for requirement in &requirements {
            println!("{}", requirement.name.canonical());
        }
        return Ok(());
    }

    if requirements.is_empty() {
        println!("No entries match the criteria.");
        return Ok(());
    }

    display_requirements_table(&requirements);

    Ok(())
}

/// Display entries as a clean table
fn display_requirements_table(requirements: &[Requirement]) {
    // Calculate column widths
    let name_width = requirements
        .iter()
        .map(|r| r.name.as_str().len())
        .max()
        .unwrap_or(7)
        .max(7); // Minimum width for "Package"

    let constraint_width = requirements
        .iter()
        .map(|r| constraint_label(r).len())
        .max()
        .unwrap_or(10)
        .max(10); // Minimum width for "Constraint"

    // Print header
    println!(
        "{:<name_width$} {:<constraint_width$} {}",
        "Package",
        "Constraint",
        "Extras",
        name_width = name_width,
        constraint_width = constraint_width
    );

    // Print separator line
    println!("{}", "─".repeat(name_width + constraint_width + 8));

    // Print data rows
    for requirement in requirements {
        let extras = if requirement.extras.is_empty() {
            String::new()
        } else {
            requirement.extras.join(", ")
        };

        println!(
            "{:<name_width$} {:<constraint_width$} {}",
            requirement.name.as_str(),
            constraint_label(requirement),
            extras,
            name_width = name_width,
            constraint_width = constraint_width
        );
    }
}

/// Version expression for display, with a placeholder for bare names
fn constraint_label(requirement: &Requirement) -> String {
    if requirement.specifiers.is_empty() {
        "(any)".to_string()
    } else {
        requirement.specifiers.to_string()
    }
}

/// Handle the diff command
pub async fn handle_diff(args: DiffArgs, config: &AppConfig) -> Result<()> {
    info!(
        "Comparing manifests: {} -> {}",
        args.old.display(),
        args.new.display()
    );

    let spinner = progress_spinner(
        "Comparing manifests...",
        show_progress(config) && !args.json,
    );

    let diff = analysis::diff_manifests(&args.old, &args.new).await?;

    spinner.finish_and_clear();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&diff)?);
        return Ok(());
    }

    if diff.is_empty() {
        println!(
            "✅ No package differences between {} and {}",
            args.old.display(),
            args.new.display()
        );
        return Ok(());
    }

    println!("📋 Manifest Diff");
    println!("================");
    println!("Old: {}", args.old.display());
    println!("New: {}", args.new.display());

    if !diff.added.is_empty() {
        println!();
        println!("➕ Added:");
        for package in &diff.added {
            println!("  {} {}", package.spelled, package.constraint_label());
        }
    }

    if !diff.removed.is_empty() {
        println!();
        println!("➖ Removed:");
        for package in &diff.removed {
            println!("  {} {}", package.spelled, package.constraint_label());
        }
    }

    if !diff.changed.is_empty() {
        println!();
        println!("🔄 Changed:");
        for change in &diff.changed {
            println!(
                "  {}: {} -> {}",
                change.name,
                label_or_any(&change.old),
                label_or_any(&change.new)
            );
        }
    }

    println!();
    println!("{} package change(s)", diff.total_changes());

    Ok(())
}

fn label_or_any(specifiers: &str) -> &str {
    if specifiers.is_empty() {
        "(any)"
    } else {
        specifiers
    }
}

/// Handle the satisfies command
///
/// Exit status reports the answer: success when the candidate version
/// satisfies the declared constraint, validation failure otherwise.
pub async fn handle_satisfies(args: SatisfiesArgs) -> Result<()> {
    let manifest_path = resolve_manifest_path(args.file.as_ref())?;

    let candidate: Version = args.version.parse().map_err(AppError::Manifest)?;

    let requirement = match analysis::find_requirement(&manifest_path, &args.package).await? {
        Some(requirement) => requirement,
        None => {
            println!(
                "❌ Package '{}' is not declared in {}",
                args.package,
                manifest_path.display()
            );
            return Err(AppError::ValidationFailed { problems: 1 });
        }
    };

    let constraint = constraint_label(&requirement);

    if requirement.matches(&candidate) {
        println!(
            "✅ {} {} satisfies {}",
            requirement.name.canonical(),
            candidate,
            constraint
        );
        Ok(())
    } else {
        println!(
            "❌ {} {} does not satisfy {}",
            requirement.name.canonical(),
            candidate,
            constraint
        );
        Err(AppError::ValidationFailed { problems: 1 })
    }
}

/// Handle configuration commands
pub async fn handle_config(args: ConfigArgs) -> Result<()> {
    match args.action {
        ConfigAction::Init { force } => handle_config_init(force).await,
        ConfigAction::Show => handle_config_show().await,
        ConfigAction::Path => {
            let path = AppConfig::get_default_config_path()?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

/// Handle config init
async fn handle_config_init(force: bool) -> Result<()> {
    let config_path = AppConfig::get_default_config_path()?;

    if config_path.exists() {
        if !force {
            println!("✅ Configuration already exists: {}", config_path.display());
            println!("   Use --force to overwrite it with defaults.");
            return Ok(());
        }

        tokio::fs::write(&config_path, AppConfig::generate_default_config_content()).await?;
        println!("🔄 Configuration reset to defaults: {}", config_path.display());
        return Ok(());
    }

    AppConfig::initialize_first_run().await?;
    Ok(())
}

/// Handle config show
async fn handle_config_show() -> Result<()> {
    let config = AppConfig::load(None).await?;

    let rendered = toml::to_string_pretty(&config)
        .map_err(|e| AppError::generic(format!("Failed to render configuration: {}", e)))?;
    println!("{}", rendered);

    Ok(())
}

/// Count packages with a given constraint shape
fn count_kind(
    packages: &std::collections::HashMap<String, crate::app::manifest::PackageSummary>,
    kind: RequirementKind,
) -> usize {
    packages.values().filter(|p| p.kind == kind).count()
}

/// Describe how long ago a timestamp was, in whole days
fn age_description(modified: DateTime<Utc>) -> String {
    let days = (Utc::now() - modified).num_days();

    if days <= 0 {
        "today".to_string()
    } else if days == 1 {
        "1 day ago".to_string()
    } else {
        format!("{} days ago", days)
    }
}

/// Use the explicit path when given, otherwise search the current directory
fn resolve_manifest_path(file: Option<&PathBuf>) -> Result<PathBuf> {
    match file {
        Some(path) => Ok(path.clone()),
        None => find_manifest_file(),
    }
}

/// Find a requirements manifest in the current directory
fn find_manifest_file() -> Result<PathBuf> {
    if let Some(path) = find_manifest_in(Path::new(".")) {
        debug!("Found manifest file: {}", path.display());
        return Ok(path);
    }

    Err(AppError::generic(
        "No requirements manifest found in the current directory. Pass a file path explicitly.",
    ))
}

/// Search one directory for the standard manifest names
fn find_manifest_in(dir: &Path) -> Option<PathBuf> {
    for candidate in files::MANIFEST_SEARCH_CANDIDATES {
        let path = dir.join(candidate);
        if path.exists() {
            return Some(path);
        }
    }

    None
}

/// Whether spinners should be shown for this invocation
fn show_progress(config: &AppConfig) -> bool {
    config.output.progress && atty::is(atty::Stream::Stdout)
}

/// Create a spinner, or a hidden placeholder when progress display is off
fn progress_spinner(message: &str, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap()
            .tick_strings(&["◐", "◓", "◑", "◒"]),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(progress::TICK_INTERVAL_MS));

    spinner
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_find_manifest_in_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(find_manifest_in(temp_dir.path()).is_none());

        std::fs::write(temp_dir.path().join("requirements.txt"), "scipy==1.6.1\n").unwrap();

        let found = find_manifest_in(temp_dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "requirements.txt");
    }

    #[test]
    fn test_find_manifest_prefers_default_name() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("requirements-dev.txt"), "pytest\n").unwrap();
        std::fs::write(temp_dir.path().join("requirements.txt"), "scipy==1.6.1\n").unwrap();

        let found = find_manifest_in(temp_dir.path()).unwrap();
        assert_eq!(found.file_name().unwrap(), "requirements.txt");
    }

    #[tokio::test]
    async fn test_check_reports_findings() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("requirements.txt");
        std::fs::write(&path, "scipy==1.6.1\nscipy==1.7.0\n").unwrap();

        let args = CheckArgs {
            file: Some(path),
            sample: None,
            allow_duplicates: false,
            json: false,
        };

        let result = handle_check(args, &AppConfig::default()).await;
        assert!(matches!(
            result,
            Err(AppError::ValidationFailed { problems: 1 })
        ));
    }

    #[tokio::test]
    async fn test_check_allows_duplicates_when_requested() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("requirements.txt");
        std::fs::write(&path, "scipy==1.6.1\nscipy==1.7.0\n").unwrap();

        let args = CheckArgs {
            file: Some(path),
            sample: None,
            allow_duplicates: true,
            json: false,
        };

        let result = handle_check(args, &AppConfig::default()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_satisfies_exit_semantics() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("requirements.txt");
        std::fs::write(&path, "torch-pitch-shift>=1.2.2,<1.3\n").unwrap();

        let satisfied = SatisfiesArgs {
            package: "Torch_Pitch_Shift".to_string(),
            version: "1.2.5".to_string(),
            file: Some(path.clone()),
        };
        assert!(handle_satisfies(satisfied).await.is_ok());

        let unsatisfied = SatisfiesArgs {
            package: "torch-pitch-shift".to_string(),
            version: "1.3.0".to_string(),
            file: Some(path.clone()),
        };
        assert!(matches!(
            handle_satisfies(unsatisfied).await,
            Err(AppError::ValidationFailed { problems: 1 })
        ));

        let undeclared = SatisfiesArgs {
            package: "pandas".to_string(),
            version: "1.0".to_string(),
            file: Some(path),
        };
        assert!(handle_satisfies(undeclared).await.is_err());
    }
}

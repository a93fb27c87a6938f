//! reqlint CLI application
//!
//! Command-line interface for validating and analyzing pip requirements
//! manifests. Features streaming parsing, duplicate detection, and
//! version-constraint queries.

use std::process;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

// Import CLI modules through the library (module is public but not re-exported)
use reqlint::cli::{
    handle_check, handle_config, handle_diff, handle_info, handle_list, handle_satisfies, Cli,
    Commands,
};
use reqlint::config::AppConfig;
use reqlint::errors::{AppError, Result};

#[tokio::main]
async fn main() {
    // Initialize program
    let result = run().await;

    // Handle any errors that occurred
    if let Err(e) = result {
        // Findings are already printed by their command handler
        if !matches!(e, AppError::ValidationFailed { .. }) {
            eprintln!("Error: {}", e);
        }
        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Initialize logging based on verbosity
    init_logging(&cli);

    info!("reqlint v{} starting", env!("CARGO_PKG_VERSION"));

    // Load configuration, honoring an explicit --config path
    let config = AppConfig::load(cli.global.config.clone()).await?;

    // Execute the appropriate command
    match cli.command {
        Commands::Check(args) => {
            info!("Executing check command");
            handle_check(args, &config).await
        }
        Commands::Info(args) => {
            info!("Executing info command");
            handle_info(args, &config).await
        }
        Commands::List(args) => {
            info!("Executing list command");
            handle_list(args, &config).await
        }
        Commands::Diff(args) => {
            info!("Executing diff command");
            handle_diff(args, &config).await
        }
        Commands::Satisfies(args) => {
            info!("Executing satisfies command");
            handle_satisfies(args).await
        }
        Commands::Config(args) => {
            info!("Executing config command");
            handle_config(args).await
        }
    }
}

/// Initialize logging based on CLI verbosity settings
fn init_logging(cli: &Cli) {
    let log_level = cli.log_level();

    // Create environment filter
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("reqlint={}", log_level).parse().unwrap());

    // Initialize subscriber
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .init();

    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}

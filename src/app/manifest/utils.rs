//! Utility functions for manifest processing
//!
//! This module provides convenience functions for common manifest operations
//! like collecting all entries and validating manifest health.

use std::path::Path;

use futures::StreamExt;
use tracing::{debug, warn};

use super::streaming::ManifestStreamer;
use super::types::{ManifestConfig, ManifestStats};
use crate::app::models::Requirement;
use crate::errors::ManifestResult;

/// Convenience function to collect all valid entries from a manifest
///
/// # Arguments
///
/// * `manifest_path` - Path to the manifest file
/// * `config` - Configuration for parsing
///
/// # Returns
///
/// A vector of all valid entries, with errors logged but not returned
///
/// # Example
///
/// ```rust,no_run
/// use reqlint::app::manifest::{collect_all_requirements, ManifestConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ManifestConfig::default();
/// let requirements = collect_all_requirements("requirements.txt", config).await?;
/// println!("Found {} entries", requirements.len());
/// # Ok(())
/// # }
/// ```
pub async fn collect_all_requirements<P: AsRef<Path>>(
    manifest_path: P,
    config: ManifestConfig,
) -> ManifestResult<Vec<Requirement>> {
    let mut streamer = ManifestStreamer::with_config(config);
    let mut stream = streamer.stream(manifest_path).await?;
    let mut requirements = Vec::new();

    while let Some(result) = stream.next().await {
        match result {
            Ok(requirement) => requirements.push(requirement),
            Err(e) => {
                // Log error but continue processing
                warn!("Skipping invalid entry: {}", e);
            }
        }
    }

    Ok(requirements)
}

/// Validate a manifest file without collecting its entries
///
/// # Arguments
///
/// * `manifest_path` - Path to the manifest file
/// * `sample_size` - Number of lines to validate (0 = all lines)
///
/// # Returns
///
/// Statistics about the manifest validation
pub async fn validate_manifest<P: AsRef<Path>>(
    manifest_path: P,
    sample_size: usize,
) -> ManifestResult<ManifestStats> {
    let mut streamer = ManifestStreamer::new();
    let mut stream = streamer.stream(manifest_path).await?;
    let mut processed = 0;

    while let Some(result) = stream.next().await {
        match result {
            Ok(_) => {
                // Valid entry
            }
            Err(e) => {
                debug!("Validation error: {}", e);
            }
        }

        processed += 1;
        if sample_size > 0 && processed >= sample_size {
            break;
        }
    }

    // Drop the stream to release the mutable borrow on streamer
    drop(stream);

    Ok(streamer.stats().clone())
}

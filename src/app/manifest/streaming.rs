//! Manifest streaming functionality for memory-efficient processing
//!
//! This module provides efficient streaming parsing of requirements
//! manifests, with duplicate detection and memory-bounded processing for
//! large files. Malformed lines and duplicate packages surface as error
//! items in the stream while processing continues, so one bad line never
//! hides the rest of the manifest.

use std::collections::HashMap;
use std::path::Path;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::Stream;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, error, info, warn};

use super::types::{ManifestConfig, ManifestStats};
use crate::app::models::{classify_line, ManifestLine, Requirement};
use crate::errors::{ManifestError, ManifestResult};

/// Streaming manifest parser with duplicate detection
pub struct ManifestStreamer {
    /// Configuration for parsing
    config: ManifestConfig,
    /// Canonical names already seen, with the line that declared them
    seen_names: HashMap<String, usize>,
    /// Current processing statistics
    stats: ManifestStats,
    /// Current line number for error reporting
    current_line: usize,
}

impl ManifestStreamer {
    /// Create a new manifest streamer with default configuration
    pub fn new() -> Self {
        Self::with_config(ManifestConfig::default())
    }

    /// Create a new manifest streamer with custom configuration
    pub fn with_config(config: ManifestConfig) -> Self {
        Self {
            config,
            seen_names: HashMap::new(),
            stats: ManifestStats::default(),
            current_line: 0,
        }
    }

    /// Stream requirement entries from a manifest file
    ///
    /// # Arguments
    ///
    /// * `manifest_path` - Path to the manifest file
    ///
    /// # Returns
    ///
    /// An async stream of `ManifestResult<Requirement>` that yields active
    /// entries while reporting malformed lines and duplicate packages as
    /// error items without stopping processing. Comments and blank lines
    /// are counted in the statistics and skipped.
    ///
    /// # Errors
    ///
    /// Returns `ManifestError::NotFound` if the manifest does not exist,
    /// or `ManifestError::Io` if it cannot be read.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use futures::StreamExt;
    /// use reqlint::app::manifest::ManifestStreamer;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut streamer = ManifestStreamer::new();
    /// let mut stream = streamer.stream("requirements.txt").await?;
    ///
    /// while let Some(result) = stream.next().await {
    ///     match result {
    ///         Ok(requirement) => {
    ///             println!("Found package: {}", requirement.name);
    ///         }
    ///         Err(e) => {
    ///             eprintln!("Problem in manifest: {}", e);
    ///         }
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn stream<P: AsRef<Path>>(
        &mut self,
        manifest_path: P,
    ) -> ManifestResult<impl Stream<Item = ManifestResult<Requirement>> + '_> {
        let path = manifest_path.as_ref();
        let file = File::open(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ManifestError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                ManifestError::Io(e)
            }
        })?;
        let reader = BufReader::new(file);
        let lines = reader.lines();

        info!("Starting manifest streaming from: {}", path.display());

        Ok(RequirementStream {
            lines,
            streamer: self,
        })
    }

    /// Process a single manifest line
    fn process_line(&mut self, line: String) -> Option<ManifestResult<Requirement>> {
        self.current_line += 1;
        self.stats.lines_processed += 1;

        let requirement = match classify_line(&line) {
            Ok(ManifestLine::Blank) => {
                self.stats.blank_lines += 1;
                return None;
            }
            Ok(ManifestLine::Comment { text, disabled }) => {
                self.stats.comment_lines += 1;
                if let Some(disabled) = disabled {
                    self.stats.disabled_entries += 1;
                    debug!(
                        "Commented-out entry at line {}: {} ({})",
                        self.current_line, disabled, text
                    );
                }
                return None;
            }
            Ok(ManifestLine::Entry(requirement)) => requirement,
            Err(e) => {
                self.stats.invalid_lines += 1;
                warn!(
                    "Malformed entry at line {}: {}",
                    self.current_line,
                    line.trim()
                );

                // Every malformed line surfaces with its line number; parse
                // errors with a specific reason keep it in the content
                let content = match e {
                    ManifestError::InvalidFormat { content, .. } => content,
                    other => format!("{} ({})", line.trim(), other),
                };

                return Some(Err(ManifestError::InvalidFormat {
                    line: self.current_line,
                    content,
                }));
            }
        };

        // Check for duplicates by canonical name
        if !self.config.allow_duplicates {
            if let Some(&first_line) = self.seen_names.get(requirement.name.canonical()) {
                self.stats.duplicate_names += 1;
                warn!(
                    "Duplicate package '{}' at line {} (first declared at line {})",
                    requirement.name, self.current_line, first_line
                );

                return Some(Err(ManifestError::DuplicateEntry {
                    name: requirement.name.as_str().to_string(),
                    line: self.current_line,
                    first_line,
                }));
            }

            // Check memory limits
            if self.seen_names.len() >= self.config.max_tracked_names {
                warn!(
                    "Reached maximum tracked names limit ({}), clearing set",
                    self.config.max_tracked_names
                );
                self.seen_names.clear();
            }

            self.seen_names
                .insert(requirement.name.canonical().to_string(), self.current_line);
        }

        self.stats.valid_entries += 1;

        // Log progress periodically
        if self.stats.valid_entries % self.config.progress_batch_size == 0 {
            debug!(
                "Processed {} valid entries from {} lines ({}% success rate)",
                self.stats.valid_entries,
                self.stats.lines_processed,
                self.stats.success_rate()
            );
        }

        Some(Ok(requirement))
    }

    /// Get current processing statistics
    pub fn stats(&self) -> &ManifestStats {
        &self.stats
    }

    /// Reset the streamer state for reuse
    pub fn reset(&mut self) {
        self.seen_names.clear();
        self.stats = ManifestStats::default();
        self.current_line = 0;
    }

    /// Get memory usage estimate in bytes
    pub fn estimated_memory_usage(&self) -> usize {
        // Rough estimate: name bytes + line number + map overhead per entry
        self.seen_names
            .iter()
            .map(|(name, _)| name.len() + 48)
            .sum::<usize>()
            + std::mem::size_of::<Self>()
    }
}

impl Default for ManifestStreamer {
    fn default() -> Self {
        Self::new()
    }
}

/// Stream implementation for requirement entries
pub struct RequirementStream<'a> {
    lines: Lines<BufReader<File>>,
    streamer: &'a mut ManifestStreamer,
}

impl Stream for RequirementStream<'_> {
    type Item = ManifestResult<Requirement>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        // Poll for next line
        match Pin::new(&mut this.lines).poll_next_line(cx) {
            Poll::Ready(Ok(Some(line))) => {
                // Process the line
                match this.streamer.process_line(line) {
                    Some(result) => Poll::Ready(Some(result)),
                    None => {
                        // Line was skipped (blank or comment), poll again
                        cx.waker().wake_by_ref();
                        Poll::Pending
                    }
                }
            }
            Poll::Ready(Ok(None)) => {
                // End of file reached
                let stats = this.streamer.stats();
                info!(
                    "Manifest processing completed: {} active entries from {} lines ({:.1}% success rate)",
                    stats.valid_entries,
                    stats.lines_processed,
                    stats.success_rate()
                );

                if stats.duplicate_names > 0 {
                    warn!("Found {} duplicate package names", stats.duplicate_names);
                }

                if stats.invalid_lines > 0 {
                    warn!("Encountered {} invalid lines", stats.invalid_lines);
                }

                if stats.disabled_entries > 0 {
                    info!(
                        "Manifest contains {} commented-out entries",
                        stats.disabled_entries
                    );
                }

                Poll::Ready(None)
            }
            Poll::Ready(Err(e)) => {
                // I/O error reading file
                error!("Error reading manifest file: {}", e);
                Poll::Ready(Some(Err(ManifestError::Io(e))))
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::app_config::Config;
use crate::errors::SkipReason;
use crate::file_utils::FileManager;
use crate::subtitle_processor::{SubtitleFormat, SubtitleProcessor};

// @module: Application controller for batch subtitle cleaning

/// Outcome of cleaning one file
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub output: PathBuf,
    pub cues_written: usize,
    pub skipped: Vec<SkipReason>,
}

/// Totals for a whole run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    /// Files written successfully
    pub processed: usize,
    /// Files that could not be processed
    pub failed: usize,
    /// Cues written across all files
    pub cues_written: usize,
    /// Cues and dialogue lines dropped across all files
    pub cues_skipped: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &FileOutcome) {
        self.processed += 1;
        self.cues_written += outcome.cues_written;
        self.cues_skipped += outcome.skipped.len();
    }
}

/// Main application controller for subtitle cleaning
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Shared read-only processing settings
    processor: Arc<SubtitleProcessor>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        let processor = SubtitleProcessor::from_config(&config)?;

        Ok(Self {
            config,
            processor: Arc::new(processor),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn processor(&self) -> &SubtitleProcessor {
        &self.processor
    }

    /// Clean a single file and write the result next to it.
    ///
    /// SRT files are rewritten in place unless `convert_to_ass` is set, in
    /// which case an `.ass` file is written beside them. ASS/SSA files
    /// always end up as `.ass`.
    pub fn process_file(processor: &SubtitleProcessor, input: &Path, convert_to_ass: bool) -> Result<FileOutcome> {
        let source = SubtitleFormat::from_path(input)?;
        let target = source.output_format(convert_to_ass);

        let content = FileManager::read_document(input)?;
        let processed = processor
            .process(&content, source, target)
            .with_context(|| format!("Failed to process {}", input.display()))?;

        let output = FileManager::output_path(input, target);
        FileManager::write_with_bom(&output, &processed.content)?;

        for reason in &processed.skipped {
            debug!("{}: dropped unit: {}", input.display(), reason);
        }

        Ok(FileOutcome {
            input: input.to_path_buf(),
            output,
            cues_written: processed.cues_written,
            skipped: processed.skipped,
        })
    }

    /// Run the workflow on a file or a directory tree.
    ///
    /// Documents are processed concurrently; a document that fails is
    /// logged and counted, the rest of the batch continues.
    pub async fn run(&self, input_path: PathBuf, convert_to_ass: bool) -> Result<BatchSummary> {
        let start_time = std::time::Instant::now();

        let files = FileManager::find_subtitle_files(&input_path)?;
        if files.is_empty() {
            return Err(anyhow!("No subtitle files found at {:?}", input_path));
        }

        let total_files = files.len();
        info!("Found {} subtitle file(s)", total_files);

        let progress_bar = ProgressBar::new(total_files as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("=>-"));

        let results = stream::iter(files)
            .map(|path| {
                let processor = Arc::clone(&self.processor);
                let progress_bar = progress_bar.clone();
                async move {
                    let worker_path = path.clone();
                    let result = tokio::task::spawn_blocking(move || {
                        Self::process_file(&processor, &worker_path, convert_to_ass)
                    })
                    .await
                    .map_err(|e| anyhow!("Worker for {} stopped unexpectedly: {}", path.display(), e))
                    .and_then(|result| result);

                    progress_bar.inc(1);
                    (path, result)
                }
            })
            .buffer_unordered(self.config.concurrent_documents.max(1))
            .collect::<Vec<_>>()
            .await;

        progress_bar.finish_and_clear();

        let mut summary = BatchSummary::default();
        for (path, result) in results {
            match result {
                Ok(outcome) => {
                    if !outcome.skipped.is_empty() {
                        warn!(
                            "{}: dropped {} malformed or empty cue(s)",
                            outcome.input.display(),
                            outcome.skipped.len()
                        );
                    }
                    info!("{} -> {}", outcome.input.display(), outcome.output.display());
                    summary.record(&outcome);
                }
                Err(e) => {
                    error!("Skipping {}: {:#}", path.display(), e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            "Processed {}/{} file(s) in {}",
            summary.processed,
            total_files,
            Self::format_duration(start_time.elapsed())
        );

        Ok(summary)
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}

// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, info, warn};
use std::io::Write;
use std::path::PathBuf;

use subclean::app_config::{Config, LogLevel};
use subclean::app_controller::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate shell completions for subclean
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// subclean - subtitle cleaning and normalization
///
/// Cleans SRT and ASS/SSA subtitle files: caps cue durations, removes filler
/// and stray punctuation, applies custom replacements and can convert SRT
/// to ASS.
#[derive(Parser, Debug)]
#[command(name = "subclean")]
#[command(version)]
#[command(about = "Subtitle cleaning and normalization tool")]
#[command(long_about = "subclean cleans SRT and ASS/SSA subtitle files in place.

EXAMPLES:
    subclean movie.srt                     # Clean an SRT file in place
    subclean -a movie.srt                  # Clean and write movie.ass
    subclean -d 5 /subs/                   # Process a directory, 5s max per cue
    subclean -c my.yml --log-level debug . # Custom config with debug logging
    subclean -s /subs/                     # Also convert Traditional to Simplified Chinese
    subclean completions bash > subclean.bash

CONFIGURATION:
    Settings are read from config.yml by default (or a .json file given with
    --config). Keys: max_duration, replacements, ass_file, log_level,
    concurrent_documents, to_simplified. A missing config file means
    defaults are used. Input files may be UTF-8, UTF-16, GBK/GB18030 or
    Big5; output is always UTF-8 with a byte-order mark.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Subtitle file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Convert SRT files to ASS instead of rewriting them as SRT
    #[arg(short = 'a', long)]
    to_ass: bool,

    /// Configuration file path
    #[arg(short, long = "config", default_value = "config.yml")]
    config_path: PathBuf,

    /// Maximum seconds a cue may stay on screen (overrides the config)
    #[arg(short = 'd', long)]
    max_duration: Option<f64>,

    /// Number of files processed at the same time (overrides the config)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Convert Traditional Chinese to Simplified before cleaning
    #[arg(short = 's', long)]
    simplified: bool,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Tag and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "\x1B[1;31m"),
            Level::Warn => ("WARN ", "\x1B[1;33m"),
            Level::Info => ("INFO ", "\x1B[1;32m"),
            Level::Debug => ("DEBUG", "\x1B[1;36m"),
            Level::Trace => ("TRACE", "\x1B[1;35m"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let (tag, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The level is lowered or raised once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Some(Commands::Completions { shell }) = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "subclean", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(cli_level) = &cli.log_level {
        let level: LogLevel = cli_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let input_path = cli
        .input_path
        .clone()
        .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

    let mut config = Config::load(&cli.config_path)?;

    // Override config with CLI options if provided
    if let Some(max_duration) = cli.max_duration {
        config.max_duration = max_duration;
    }
    if let Some(jobs) = cli.jobs {
        config.concurrent_documents = jobs;
    }
    if cli.simplified {
        config.to_simplified = true;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level.into();
    } else {
        log::set_max_level(config.log_level.to_level_filter());
    }

    info!("max_duration: {}s", config.max_duration);
    if !config.replacements.is_empty() {
        info!("Loaded {} replacement rule(s)", config.replacements.len());
    }

    let controller = Controller::with_config(config)?;
    let summary = controller.run(input_path, cli.to_ass).await?;

    if summary.failed > 0 {
        warn!("{} file(s) could not be processed", summary.failed);
    }
    info!(
        "Done: {} file(s), {} cue(s) written, {} dropped",
        summary.processed, summary.cues_written, summary.cues_skipped
    );

    Ok(())
}

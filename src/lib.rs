/*!
 * # subclean - subtitle cleaning and normalization
 *
 * A Rust library for tidying SubRip and ASS/SSA subtitle files.
 *
 * ## Features
 *
 * - Parse SRT and ASS/SSA documents, dropping malformed cues
 * - Cap how long a cue stays on screen
 * - Clean every line of text:
 *   - user-defined regex replacements
 *   - repeated words and filler interjections collapsed
 *   - stray leading and trailing punctuation removed
 *   - filler-only lines removed
 * - Convert SRT to ASS with a configurable style header
 * - Batch processing of whole directory trees
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: Document model and the per-document pass
 * - `formats`: Format-specific parsing and emission:
 *   - `formats::srt`: SubRip blocks
 *   - `formats::ass`: ASS/SSA header and dialogue lines
 * - `timecode`: Timecode parsing, formatting and duration clamping
 * - `line_cleaner`: The text cleaning chain
 * - `file_utils`: File system operations
 * - `app_controller`: Batch controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod formats;
pub mod line_cleaner;
pub mod subtitle_processor;
pub mod timecode;

// Re-export main types for easier usage
pub use app_config::{Config, ReplacementTable};
pub use app_controller::{BatchSummary, Controller};
pub use errors::{ConfigError, SkipReason, SubtitleError, TimecodeError};
pub use line_cleaner::{LineCleaner, ReplacementRules};
pub use subtitle_processor::{Cue, Document, ProcessedDocument, SubtitleFormat, SubtitleProcessor};
pub use timecode::Timecode;

/*!
 * Error types for the subclean application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors produced when a timecode does not follow the `H:MM:SS,mmm` grammar
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimecodeError {
    /// The text does not look like a timecode at all
    #[error("Invalid timecode format: {0}")]
    Malformed(String),

    /// Minutes or seconds are 60 or more
    #[error("Timecode component out of range: {0}")]
    OutOfRange(String),
}

/// Why a single cue block or dialogue line was left out of the output.
///
/// None of these abort the document; the unit is dropped and the reason is
/// recorded so callers can report it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The block does not match the cue grammar
    #[error("Block does not match the cue grammar")]
    MalformedBlock,

    /// Fewer than two timecodes on the timing line or dialogue prefix
    #[error("Expected a start and an end timecode")]
    MissingTimecodes,

    /// A timecode was found but could not be parsed
    #[error("Bad timecode: {0}")]
    BadTimecode(#[from] TimecodeError),

    /// Every text line cleaned to nothing
    #[error("Cue text is empty after cleaning")]
    EmptyText,
}

/// Errors that abort processing of one subtitle document
#[derive(Error, Debug)]
pub enum SubtitleError {
    /// The document has no dialogue section, or nothing follows its header
    #[error("Not a valid ASS/SSA document: {0}")]
    InvalidDocument(String),

    /// The requested source/target pair is not supported
    #[error("Unsupported conversion: {from} -> {to}")]
    UnsupportedConversion {
        /// Source format
        from: String,
        /// Requested output format
        to: String,
    },

    /// The file extension is not a known subtitle format
    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),
}

/// Errors raised while loading or compiling configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A user replacement pattern that cannot be compiled or applied
    #[error("Invalid replacement pattern '{pattern}': {message}")]
    BadUserPattern {
        /// The pattern as written in the configuration
        pattern: String,
        /// Why it was rejected
        message: String,
    },

    /// The duration ceiling is not a positive, finite number of seconds
    #[error("Invalid max_duration: {0} (must be a positive number of seconds)")]
    InvalidDuration(f64),

    /// The worker count is zero
    #[error("Invalid concurrent_documents: {0} (must be at least 1)")]
    InvalidConcurrency(usize),

    /// The configuration file could not be parsed
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

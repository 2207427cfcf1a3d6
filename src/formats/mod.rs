/*!
 * Format-specific parsing and emission.
 *
 * - `srt`: SubRip blocks
 * - `ass`: ASS/SSA header and dialogue lines
 */

pub mod ass;
pub mod srt;

use crate::errors::SubtitleError;
use crate::subtitle_processor::Document;

/// Turns document text into cues and verbatim lines
pub trait SubtitleParser {
    /// Parse a whole document.
    ///
    /// Malformed units are recorded in `Document::skipped`; only problems
    /// with the document as a whole are returned as errors.
    fn parse(&self, content: &str) -> Result<Document, SubtitleError>;
}

/// Serializes a processed document
pub trait SubtitleEmitter {
    fn emit(&self, document: &Document) -> String;
}

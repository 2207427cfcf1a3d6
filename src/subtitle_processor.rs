/*!
 * Subtitle document model and the per-document processing pass.
 *
 * A document is parsed by the parser for its source format, every cue is
 * re-timed against the duration ceiling and its lines are cleaned, then the
 * emitter for the target format reassembles the text. The parser/emitter
 * pair is picked once per document from `SubtitleFormat`.
 */

use std::borrow::Cow;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::anyhow;
use log::{debug, warn};
use zhconv::{zhconv, Variant};

use crate::app_config::Config;
use crate::errors::{SkipReason, SubtitleError};
use crate::formats::{self, ass, srt};
use crate::line_cleaner::{LineCleaner, ReplacementRules};
use crate::timecode::{self, Timecode};

// @enum: Supported subtitle formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubtitleFormat {
    /// SubRip
    Srt,
    /// Advanced SubStation Alpha (SSA input is read as ASS)
    Ass,
}

impl SubtitleFormat {
    /// Map a file extension (without the dot, any case) to a format
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "srt" => Some(Self::Srt),
            "ass" | "ssa" => Some(Self::Ass),
            _ => None,
        }
    }

    /// Detect the format of a file from its extension
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, SubtitleError> {
        let path = path.as_ref();
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| SubtitleError::UnsupportedFormat(path.display().to_string()))
    }

    /// Output format for this source: SRT optionally converts, ASS/SSA always stays ASS
    pub fn output_format(self, convert_to_ass: bool) -> Self {
        match self {
            Self::Srt if convert_to_ass => Self::Ass,
            other => other,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Ass => "ass",
        }
    }

    /// Parser for documents in this format
    pub fn parser(self) -> Box<dyn formats::SubtitleParser> {
        match self {
            Self::Srt => Box::new(srt::SrtParser),
            Self::Ass => Box::new(ass::AssParser),
        }
    }

    /// Emitter producing documents in this format
    pub fn emitter(self, style_header: &str) -> Box<dyn formats::SubtitleEmitter + '_> {
        match self {
            Self::Srt => Box::new(srt::SrtEmitter),
            Self::Ass => Box::new(ass::AssEmitter::new(style_header)),
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for SubtitleFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::from_extension(s.trim_start_matches('.'))
            .ok_or_else(|| anyhow!("Invalid subtitle format: {}", s))
    }
}

// @struct: Single timed subtitle entry
#[derive(Debug, Clone, PartialEq)]
pub struct Cue {
    // @field: Sequence number from an SRT block, None for ASS dialogue
    pub sequence_index: Option<usize>,

    pub start: Timecode,

    pub end: Timecode,

    // @field: Visual lines of the cue, in order
    pub text_lines: Vec<String>,
}

impl Cue {
    pub fn new(sequence_index: Option<usize>, start: Timecode, end: Timecode, text_lines: Vec<String>) -> Self {
        Cue {
            sequence_index,
            start,
            end,
            text_lines,
        }
    }

    /// Duration in seconds
    pub fn duration_secs(&self) -> f64 {
        timecode::duration_secs(self.start, self.end)
    }

    /// Shorten the cue to at most `ceiling_seconds`
    pub fn apply_duration_ceiling(&mut self, ceiling_seconds: f64) {
        let (start, end) = timecode::clamp(self.start, self.end, ceiling_seconds);
        self.start = start;
        self.end = end;
    }

    /// Clean every text line in place, dropping the empty ones.
    ///
    /// Returns false when no text is left.
    pub fn clean_text(&mut self, cleaner: &LineCleaner) -> bool {
        let cleaned = cleaner.clean_lines(self.text_lines.iter().map(String::as_str));
        self.text_lines = cleaned;
        !self.text_lines.is_empty()
    }
}

/// One entry of a parsed document
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentItem {
    Cue(Cue),
    /// A non-cue line kept exactly as it was read
    Verbatim(String),
}

/// Parsed subtitle document
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Cues and verbatim lines in document order
    pub items: Vec<DocumentItem>,

    /// Units dropped so far, in document order
    pub skipped: Vec<SkipReason>,
}

impl Document {
    pub fn cues(&self) -> impl Iterator<Item = &Cue> {
        self.items.iter().filter_map(|item| match item {
            DocumentItem::Cue(cue) => Some(cue),
            DocumentItem::Verbatim(_) => None,
        })
    }

    pub fn cue_count(&self) -> usize {
        self.cues().count()
    }

    /// Record the outcome of parsing one unit
    pub fn push_parsed(&mut self, parsed: Result<Cue, SkipReason>) {
        match parsed {
            Ok(cue) => self.items.push(DocumentItem::Cue(cue)),
            Err(reason) => self.skipped.push(reason),
        }
    }
}

/// Result of one document pass
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    /// Emitted document text, without a byte-order mark
    pub content: String,

    /// Format of `content`
    pub format: SubtitleFormat,

    /// Number of cues written
    pub cues_written: usize,

    /// Why each dropped cue was dropped
    pub skipped: Vec<SkipReason>,
}

/// Convert Traditional Chinese characters and phrases to Simplified Chinese
pub fn to_simplified_chinese(text: &str) -> String {
    zhconv(text, Variant::ZhHans)
}

/// Immutable per-run processing settings shared by all documents
#[derive(Debug, Clone)]
pub struct SubtitleProcessor {
    cleaner: LineCleaner,
    max_duration: f64,
    style_header: String,

    // @field: Convert the whole document to Simplified Chinese before parsing
    to_simplified: bool,
}

impl SubtitleProcessor {
    pub fn new(cleaner: LineCleaner, max_duration: f64, style_header: String) -> Self {
        Self {
            cleaner,
            max_duration,
            style_header,
            to_simplified: false,
        }
    }

    /// Enable or disable Traditional to Simplified Chinese conversion
    pub fn with_simplified(mut self, to_simplified: bool) -> Self {
        self.to_simplified = to_simplified;
        self
    }

    /// Build a processor from configuration.
    ///
    /// Replacement patterns that fail to compile are logged and left out.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let (rules, errors) = ReplacementRules::compile(config.replacements.iter());
        for error in &errors {
            warn!("Skipping replacement rule: {}", error);
        }
        if !rules.is_empty() {
            debug!("Using {} replacement rule(s)", rules.len());
        }

        let style_header = config.style_header()?;
        Ok(Self::new(LineCleaner::new(rules), config.max_duration, style_header)
            .with_simplified(config.to_simplified))
    }

    pub fn max_duration(&self) -> f64 {
        self.max_duration
    }

    pub fn style_header(&self) -> &str {
        &self.style_header
    }

    pub fn cleaner(&self) -> &LineCleaner {
        &self.cleaner
    }

    pub fn to_simplified(&self) -> bool {
        self.to_simplified
    }

    /// Run one document through script conversion, parse, re-time, clean and emit
    pub fn process(
        &self,
        content: &str,
        source: SubtitleFormat,
        target: SubtitleFormat,
    ) -> Result<ProcessedDocument, SubtitleError> {
        if source == SubtitleFormat::Ass && target == SubtitleFormat::Srt {
            return Err(SubtitleError::UnsupportedConversion {
                from: source.to_string(),
                to: target.to_string(),
            });
        }

        let content = if self.to_simplified {
            Cow::Owned(to_simplified_chinese(content))
        } else {
            Cow::Borrowed(content)
        };

        let parser = source.parser();
        let mut document = parser.parse(&content)?;
        self.normalize(&mut document);

        let emitter = target.emitter(&self.style_header);
        let content = emitter.emit(&document);

        Ok(ProcessedDocument {
            content,
            format: target,
            cues_written: document.cue_count(),
            skipped: document.skipped,
        })
    }

    /// Clamp and clean every cue, dropping cues left without text
    pub fn normalize(&self, document: &mut Document) {
        let items = std::mem::take(&mut document.items);
        for item in items {
            match item {
                DocumentItem::Cue(mut cue) => {
                    cue.apply_duration_ceiling(self.max_duration);
                    if cue.clean_text(&self.cleaner) {
                        document.items.push(DocumentItem::Cue(cue));
                    } else {
                        document.skipped.push(SkipReason::EmptyText);
                    }
                }
                verbatim => document.items.push(verbatim),
            }
        }
    }
}

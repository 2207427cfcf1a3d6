/*!
 * SubRip (SRT) parsing and emission.
 *
 * A document is split on blank lines into blocks; each block must carry a
 * sequence number, a `start --> end` timing line and at least one text
 * line. Blocks that do not fit are dropped without affecting the numbering
 * of the blocks that follow.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{SkipReason, SubtitleError};
use crate::subtitle_processor::{Cue, Document, DocumentItem, SubtitleFormat};
use crate::timecode;

use super::{SubtitleEmitter, SubtitleParser};

// @const: Blank-line block separator
static BLOCK_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\r?\n\s*\n").unwrap()
});

// @const: Sequence number, timing line, text
static SRT_BLOCK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+)\s*\n([^\n]*-->[^\n]*)\s*\n([\s\S]*)$").unwrap()
});

/// Parse one trimmed SRT block into a cue
pub fn parse_block(block: &str) -> Result<Cue, SkipReason> {
    let caps = SRT_BLOCK_REGEX
        .captures(block)
        .ok_or(SkipReason::MalformedBlock)?;

    let sequence_index = caps[1].parse::<usize>().ok();
    let (start, end) = timecode::extract_time_range(&caps[2])?;
    let text_lines = caps[3].lines().map(|line| line.to_string()).collect();

    Ok(Cue::new(sequence_index, start, end, text_lines))
}

/// Parser for SubRip documents
#[derive(Debug, Clone, Copy, Default)]
pub struct SrtParser;

impl SubtitleParser for SrtParser {
    fn parse(&self, content: &str) -> Result<Document, SubtitleError> {
        let mut document = Document::default();

        for block in BLOCK_SEPARATOR_REGEX.split(content) {
            let block = block.trim();
            if block.is_empty() {
                continue;
            }
            document.push_parsed(parse_block(block));
        }

        Ok(document)
    }
}

/// Emitter for SubRip documents; cues are renumbered from 1
#[derive(Debug, Clone, Copy, Default)]
pub struct SrtEmitter;

impl SrtEmitter {
    /// Format one cue as an SRT block without the trailing blank line
    pub fn format_block(index: usize, cue: &Cue) -> String {
        format!(
            "{}\n{} --> {}\n{}",
            index,
            cue.start.format(SubtitleFormat::Srt),
            cue.end.format(SubtitleFormat::Srt),
            cue.text_lines.join("\n")
        )
    }
}

impl SubtitleEmitter for SrtEmitter {
    fn emit(&self, document: &Document) -> String {
        let blocks: Vec<String> = document
            .items
            .iter()
            .filter_map(|item| match item {
                DocumentItem::Cue(cue) => Some(cue),
                DocumentItem::Verbatim(_) => None,
            })
            .enumerate()
            .map(|(i, cue)| Self::format_block(i + 1, cue))
            .collect();

        let mut out = blocks.join("\n\n");
        out.push('\n');
        out
    }
}

/*!
 * ASS/SSA parsing and emission.
 *
 * Everything before the first `Dialogue:` line is the script header; it is
 * replaced on output by the configured (or default) style header. Dialogue
 * lines are rebuilt with a fixed prefix:
 *
 * `Dialogue: 0,<start>,<end>,Default,,0,0,0,,<text>`
 *
 * so the original layer, style, actor, margin and effect fields are not
 * carried over. Every other line after the header is kept as it was.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{SkipReason, SubtitleError};
use crate::subtitle_processor::{Cue, Document, DocumentItem, SubtitleFormat};
use crate::timecode;

use super::{SubtitleEmitter, SubtitleParser};

/// Built-in header used when no template is configured
pub const DEFAULT_STYLE_HEADER: &str = "[Script Info]
Title: Default Aegisub file
ScriptType: v4.00+
WrapStyle: 0
PlayResX: 1280
PlayResY: 960
ScaledBorderAndShadow: yes

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Microsoft YaHei,60,&H0000FFFF,&H000000FF,&H00000000,&H00000000,0,0,0,0,100,100,0,0,1,2,2,2,10,10,10,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

/// Inline line break inside dialogue text
pub const LINE_BREAK: &str = r"\N";

// @const: Start of the first dialogue line
static DIALOGUE_START_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*Dialogue:").unwrap()
});

// @const: Dialogue prefix (layer or SSA marker plus eight fields) and free text
static DIALOGUE_LINE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(Dialogue:\s*(?:Marked=)?\d+,[^,]*,[^,]*,[^,]*,[^,]*,[^,]*,[^,]*,[^,]*,[^,]*,)(.*)$").unwrap()
});

/// Split a script into its header and the text from the first dialogue line on.
///
/// Returns None when the script has no dialogue line.
pub fn split_header(content: &str) -> Option<(&str, &str)> {
    DIALOGUE_START_REGEX
        .find(content)
        .map(|m| content.split_at(m.start()))
}

/// Parse one line of the events section.
///
/// Returns None for lines that are not dialogue lines; those are kept
/// verbatim by the caller.
pub fn parse_dialogue(line: &str) -> Option<Result<Cue, SkipReason>> {
    let caps = DIALOGUE_LINE_REGEX.captures(line)?;

    let parsed = timecode::extract_time_range(&caps[1]).map(|(start, end)| {
        let text_lines = caps[2]
            .split(LINE_BREAK)
            .map(|part| part.to_string())
            .collect();
        Cue::new(None, start, end, text_lines)
    });

    Some(parsed)
}

/// Format a cue as a dialogue line with the fixed default prefix
pub fn format_dialogue(cue: &Cue) -> String {
    format!(
        "Dialogue: 0,{},{},Default,,0,0,0,,{}",
        cue.start.format(SubtitleFormat::Ass),
        cue.end.format(SubtitleFormat::Ass),
        cue.text_lines.join(LINE_BREAK)
    )
}

/// Parser for ASS and SSA scripts
#[derive(Debug, Clone, Copy, Default)]
pub struct AssParser;

impl SubtitleParser for AssParser {
    fn parse(&self, content: &str) -> Result<Document, SubtitleError> {
        let (_header, body) = split_header(content)
            .ok_or_else(|| SubtitleError::InvalidDocument("no Dialogue line found".to_string()))?;

        let body = body.trim();
        if body.is_empty() {
            return Err(SubtitleError::InvalidDocument("no subtitle events after the header".to_string()));
        }

        let mut document = Document::default();
        for line in body.lines() {
            match parse_dialogue(line.trim_start()) {
                Some(parsed) => document.push_parsed(parsed),
                None => document.items.push(DocumentItem::Verbatim(line.to_string())),
            }
        }

        Ok(document)
    }
}

/// Emitter for ASS scripts
#[derive(Debug, Clone, Copy)]
pub struct AssEmitter<'a> {
    style_header: &'a str,
}

impl<'a> AssEmitter<'a> {
    pub fn new(style_header: &'a str) -> Self {
        Self { style_header }
    }
}

impl SubtitleEmitter for AssEmitter<'_> {
    fn emit(&self, document: &Document) -> String {
        let mut out = self.style_header.trim().to_string();

        for item in &document.items {
            out.push('\n');
            match item {
                DocumentItem::Cue(cue) => out.push_str(&format_dialogue(cue)),
                DocumentItem::Verbatim(line) => out.push_str(line),
            }
        }

        out.push('\n');
        out
    }
}

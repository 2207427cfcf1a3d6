/*!
 * Time model for subtitle cues.
 *
 * Timecodes are stored at microsecond precision and rendered at the
 * precision native to each output format:
 * - SRT: `HH:MM:SS,mmm`
 * - ASS: `H:MM:SS.cc` (one leading hour zero dropped)
 *
 * Both `,` and `.` are accepted as the fractional separator when parsing,
 * whatever the document's format.
 */

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{SkipReason, TimecodeError};
use crate::subtitle_processor::SubtitleFormat;

// @const: Loose timecode pattern used to pull times out of timing lines and dialogue prefixes
static TIMECODE_SEARCH_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{1,2}:\d{2}:\d{2}[,.]\d{2,3}").unwrap()
});

// @const: Anchored timecode grammar
static TIMECODE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):(\d{2}):(\d{2})[,.](\d{2,3})$").unwrap()
});

const MICROS_PER_MILLI: u64 = 1_000;
const MICROS_PER_SECOND: u64 = 1_000_000;
const MICROS_PER_MINUTE: u64 = 60 * MICROS_PER_SECOND;
const MICROS_PER_HOUR: u64 = 60 * MICROS_PER_MINUTE;

/// A time offset from the start of the media
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timecode {
    micros: u64,
}

impl Timecode {
    /// Create a timecode from milliseconds
    pub fn from_millis(ms: u64) -> Self {
        Self { micros: ms * MICROS_PER_MILLI }
    }

    /// Create a timecode from microseconds
    pub fn from_micros(micros: u64) -> Self {
        Self { micros }
    }

    pub fn as_micros(&self) -> u64 {
        self.micros
    }

    pub fn as_millis(&self) -> u64 {
        self.micros / MICROS_PER_MILLI
    }

    /// Parse `H:MM:SS,mmm`, `HH:MM:SS.cc` and the other separator/precision mixes.
    ///
    /// Two fractional digits are centiseconds, three are milliseconds.
    pub fn parse(s: &str) -> Result<Self, TimecodeError> {
        let trimmed = s.trim();
        let caps = TIMECODE_REGEX
            .captures(trimmed)
            .ok_or_else(|| TimecodeError::Malformed(trimmed.to_string()))?;

        // The regex guarantees digits only, so these parses cannot overflow
        let field = |idx: usize| -> u64 { caps[idx].parse().unwrap_or(0) };
        let hours = field(1);
        let minutes = field(2);
        let seconds = field(3);

        if minutes >= 60 || seconds >= 60 {
            return Err(TimecodeError::OutOfRange(trimmed.to_string()));
        }

        let fraction = &caps[4];
        let millis = match fraction.len() {
            2 => field(4) * 10,
            _ => field(4),
        };

        Ok(Self {
            micros: hours * MICROS_PER_HOUR
                + minutes * MICROS_PER_MINUTE
                + seconds * MICROS_PER_SECOND
                + millis * MICROS_PER_MILLI,
        })
    }

    /// Render the timecode using the conventions of `format`.
    ///
    /// Sub-unit precision is truncated, never rounded.
    pub fn format(&self, format: SubtitleFormat) -> String {
        let hours = self.micros / MICROS_PER_HOUR;
        let minutes = (self.micros % MICROS_PER_HOUR) / MICROS_PER_MINUTE;
        let seconds = (self.micros % MICROS_PER_MINUTE) / MICROS_PER_SECOND;
        let sub_second = self.micros % MICROS_PER_SECOND;

        match format {
            SubtitleFormat::Srt => format!(
                "{:02}:{:02}:{:02},{:03}",
                hours,
                minutes,
                seconds,
                sub_second / MICROS_PER_MILLI
            ),
            SubtitleFormat::Ass => {
                let canonical = format!(
                    "{:02}:{:02}:{:02}.{:02}",
                    hours,
                    minutes,
                    seconds,
                    sub_second / (10 * MICROS_PER_MILLI)
                );
                // ASS players expect a single hour digit; only one zero is ever dropped
                match canonical.strip_prefix('0') {
                    Some(rest) => rest.to_string(),
                    None => canonical,
                }
            }
        }
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.format(SubtitleFormat::Srt))
    }
}

/// Signed duration between two timecodes, in seconds
pub fn duration_secs(start: Timecode, end: Timecode) -> f64 {
    (end.micros as f64 - start.micros as f64) / MICROS_PER_SECOND as f64
}

/// Shorten `end` so the cue lasts at most `ceiling_seconds`.
///
/// `start` is never touched. Cues within the ceiling, and cues whose end
/// precedes their start, pass through unchanged.
pub fn clamp(start: Timecode, end: Timecode, ceiling_seconds: f64) -> (Timecode, Timecode) {
    if ceiling_seconds.is_nan() || ceiling_seconds.is_infinite() {
        return (start, end);
    }

    if duration_secs(start, end) > ceiling_seconds {
        let ceiling_micros = (ceiling_seconds.max(0.0) * MICROS_PER_SECOND as f64).round() as u64;
        let clamped_end = Timecode::from_micros(start.micros.saturating_add(ceiling_micros));
        return (start, clamped_end);
    }

    (start, end)
}

/// Every substring that looks like a timecode, in document order
pub fn find_timecodes(text: &str) -> Vec<&str> {
    TIMECODE_SEARCH_REGEX
        .find_iter(text)
        .map(|m| m.as_str())
        .collect()
}

/// Parse the first two timecodes found in `text` as a `(start, end)` pair
pub fn extract_time_range(text: &str) -> Result<(Timecode, Timecode), SkipReason> {
    let found = find_timecodes(text);
    if found.len() < 2 {
        return Err(SkipReason::MissingTimecodes);
    }

    let start = Timecode::parse(found[0])?;
    let end = Timecode::parse(found[1])?;
    Ok((start, end))
}

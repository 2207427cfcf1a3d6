/*!
 * Text normalization for a single line of cue text.
 *
 * The cleaning chain runs in a fixed order, which matters: user
 * replacements run first so they can change what later counts as a
 * repetition, and repetitions are collapsed before trailing punctuation is
 * trimmed.
 *
 * 1. user replacement table (regex patterns, in table order)
 * 2. collapse repeated substrings of two or more characters
 * 3. collapse runs of the same filler token
 * 4. strip leading punctuation and whitespace
 * 5. strip trailing punctuation and whitespace (`?` and `!` are kept)
 * 6. blank lines made only of filler tokens and punctuation
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ConfigError;

/// Characters whose immediate repeats collapse to one.
///
/// The union of the filler interjections and the punctuation marks that are
/// collapsed in the same step, so "!!!" becomes "!" alongside "啊啊啊".
pub const FILLER_TOKENS: &str = " ,.，。！!?？：；;呵哒喽呗嘛哟哇呃啊哦啦唉欸诶喔呀呐哼哈喂";

/// The one particle that is never collapsed or blanked.
pub const EXEMPT_PARTICLE: char = '嗯';

// @const: Anything before the first word character, opening bracket or quote
static LEADING_JUNK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[^\w(（'"‘“]+"#).unwrap()
});

// @const: Trailing punctuation, question and exclamation marks excluded
static TRAILING_JUNK_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[,.:;，。：；、\s]+$").unwrap()
});

// @const: Lines made only of filler tokens and punctuation
static FILLER_ONLY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^[ ,.，。！!?？：；;—\-–…"'「」『』()（）呵哒喽呗嘛哟哇呃啊哦啦唉欸诶喔呀呐哼哈嘿喂]*$"#).unwrap()
});

/// A compiled user replacement rule
#[derive(Debug, Clone)]
struct ReplacementRule {
    pattern: Regex,
    replacement: String,
}

/// User replacement table compiled once per run.
///
/// Rules keep the order of the source table. Entries that failed to
/// compile are not part of the rule list.
#[derive(Debug, Clone, Default)]
pub struct ReplacementRules {
    rules: Vec<ReplacementRule>,
}

impl ReplacementRules {
    /// Compile `(pattern, replacement)` pairs.
    ///
    /// Returns the usable rules together with one `BadUserPattern` per entry
    /// that was rejected.
    pub fn compile<'a, I>(pairs: I) -> (Self, Vec<ConfigError>)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut rules = Vec::new();
        let mut errors = Vec::new();

        for (pattern, replacement) in pairs {
            let compiled = Regex::new(pattern).map_err(|e| e.to_string()).and_then(|regex| {
                translate_replacement(replacement).map(|replacement| ReplacementRule {
                    pattern: regex,
                    replacement,
                })
            });

            match compiled {
                Ok(rule) => rules.push(rule),
                Err(message) => errors.push(ConfigError::BadUserPattern {
                    pattern: pattern.to_string(),
                    message,
                }),
            }
        }

        (Self { rules }, errors)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn apply(&self, text: String) -> String {
        self.rules.iter().fold(text, |acc, rule| {
            rule.pattern
                .replace_all(&acc, rule.replacement.as_str())
                .into_owned()
        })
    }
}

/// Convert backslash-style group references (`\1`, `\g<name>`) into the
/// `${..}` syntax understood by the regex crate.
fn translate_replacement(raw: &str) -> Result<String, String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' => out.push_str("$$"),
            '\\' => match chars.next() {
                None => return Err("dangling backslash at end of replacement".to_string()),
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some('t') => out.push('\t'),
                Some('g') => {
                    if chars.next() != Some('<') {
                        return Err("missing '<' after \\g".to_string());
                    }
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('>') => break,
                            Some(ch) => name.push(ch),
                            None => return Err("unterminated group name".to_string()),
                        }
                    }
                    if name.is_empty() {
                        return Err("empty group name".to_string());
                    }
                    out.push_str(&format!("${{{}}}", name));
                }
                Some(d) if d.is_ascii_digit() => {
                    let mut number = d.to_string();
                    if let Some(next) = chars.peek().copied().filter(|ch| ch.is_ascii_digit()) {
                        number.push(next);
                        chars.next();
                    }
                    out.push_str(&format!("${{{}}}", number));
                }
                Some(other) if other.is_ascii_alphabetic() => {
                    return Err(format!("bad escape \\{}", other));
                }
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
            },
            _ => out.push(c),
        }
    }

    Ok(out)
}

/// Applies the cleaning chain to cue text lines
#[derive(Debug, Clone, Default)]
pub struct LineCleaner {
    replacements: ReplacementRules,
}

impl LineCleaner {
    pub fn new(replacements: ReplacementRules) -> Self {
        Self { replacements }
    }

    pub fn replacements(&self) -> &ReplacementRules {
        &self.replacements
    }

    /// Clean one line of cue text.
    ///
    /// Returns an empty string when nothing worth showing remains; callers
    /// drop those lines.
    pub fn clean_line(&self, line: &str) -> String {
        let text = line.trim();
        if text.is_empty() {
            return String::new();
        }

        let text = self.replacements.apply(text.to_string());
        let text = collapse_repeats(text);
        let text = LEADING_JUNK_REGEX.replace(&text, "");
        let text = TRAILING_JUNK_REGEX.replace(&text, "");
        let text = FILLER_ONLY_REGEX.replace(&text, "");

        text.trim().to_string()
    }

    /// Clean every line and drop the ones that end up empty
    pub fn clean_lines<'a, I>(&self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        lines
            .into_iter()
            .map(|line| self.clean_line(line))
            .filter(|line| !line.is_empty())
            .collect()
    }
}

/// Run both collapse steps until neither changes the text.
///
/// Either step can bring two equal units next to each other ("好啊啊好啊"
/// -> "好啊好啊"), so a single pass is not a fixed point.
fn collapse_repeats(mut text: String) -> String {
    loop {
        let collapsed = collapse_filler_runs(&collapse_repeated_substrings(&text));
        if collapsed == text {
            return text;
        }
        text = collapsed;
    }
}

/// Collapse a substring of two or more characters that is immediately
/// repeated into a single copy ("哈哈哈哈" -> "哈哈", "好的好的" -> "好的").
///
/// Scans left to right; at each position the shortest repeating unit wins
/// and all of its consecutive copies are consumed.
pub fn collapse_repeated_substrings(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        match repeated_unit_at(&chars, i) {
            Some((unit_len, span_len)) => {
                out.extend(&chars[i..i + unit_len]);
                i += span_len;
            }
            None => {
                out.push(chars[i]);
                i += 1;
            }
        }
    }

    out
}

// Returns (unit length, total length of the repeated run)
fn repeated_unit_at(chars: &[char], start: usize) -> Option<(usize, usize)> {
    let remaining = chars.len() - start;

    (2..=remaining / 2).find_map(|unit_len| {
        let unit = &chars[start..start + unit_len];
        if unit.contains(&'\n') {
            return None;
        }

        let mut end = start + unit_len;
        while end + unit_len <= chars.len() && &chars[end..end + unit_len] == unit {
            end += unit_len;
        }

        (end > start + unit_len).then_some((unit_len, end - start))
    })
}

/// Collapse runs of one repeated filler token ("啊啊啊" -> "啊", "!!!" -> "!")
pub fn collapse_filler_runs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous: Option<char> = None;

    for c in text.chars() {
        let is_repeat = previous == Some(c) && c != EXEMPT_PARTICLE && FILLER_TOKENS.contains(c);
        if !is_repeat {
            out.push(c);
        }
        previous = Some(c);
    }

    out
}

/*!
 * Common test utilities for the subclean test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use subclean::formats::ass::DEFAULT_STYLE_HEADER;
use subclean::line_cleaner::{LineCleaner, ReplacementRules};
use subclean::subtitle_processor::SubtitleProcessor;

/// SRT document with one over-long cue, one malformed block and one filler-only cue
pub const SAMPLE_SRT: &str = "1
00:00:01,000 --> 00:00:20,000
好的好的，我们走吧。

2
this block has no timing line

3
00:00:21,000 --> 00:00:22,500
呵呵呵。

4
00:00:23,000 --> 00:00:25,000
...Hello!!!...
嗯
";

/// ASS script with a custom header, a comment line and two dialogue lines
pub const SAMPLE_ASS: &str = "[Script Info]
Title: Sample
ScriptType: v4.00+

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
Dialogue: 0,0:00:01.00,0:00:15.00,Main,Bob,0000,0000,0000,,Hello!!!...
Comment: 0,0:00:02.00,0:00:03.00,Default,,0,0,0,,translator note
Dialogue: 0,0:00:04.00,0:00:05.00,Default,,0,0,0,,呃呃啊啊
";

/// Simplified Chinese SRT document, long enough for encoding detection
pub const SAMPLE_SIMPLIFIED_SRT: &str = "1
00:00:01,000 --> 00:00:04,000
我们今天晚上去看电影吧，听说这部电影很好看。

2
00:00:05,000 --> 00:00:08,000
好的，我下班以后在电影院门口等你。

3
00:00:09,000 --> 00:00:12,000
别忘了带上眼镜，上次你就忘记了。

4
00:00:13,000 --> 00:00:16,000
放心吧，这次我一定不会再迟到了。
";

/// Traditional Chinese SRT document, long enough for encoding detection
pub const SAMPLE_TRADITIONAL_SRT: &str = "1
00:00:01,000 --> 00:00:04,000
我們今天晚上去看電影吧，聽說這部電影很好看。

2
00:00:05,000 --> 00:00:08,000
好的，我下班以後在電影院門口等你。

3
00:00:09,000 --> 00:00:12,000
別忘了帶上眼鏡，上次你就忘記了。

4
00:00:13,000 --> 00:00:16,000
放心吧，這次我一定不會再遲到了。
";

/// Initialize test logging once; later calls are no-ops
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Processor with the default header and no replacement rules
pub fn default_processor(max_duration: f64) -> SubtitleProcessor {
    SubtitleProcessor::new(LineCleaner::default(), max_duration, DEFAULT_STYLE_HEADER.to_string())
}

/// Processor using the given replacement pairs, which must all compile
pub fn processor_with_rules(max_duration: f64, pairs: &[(&str, &str)]) -> SubtitleProcessor {
    let (rules, errors) = ReplacementRules::compile(pairs.iter().copied());
    assert!(errors.is_empty(), "unexpected rule errors: {:?}", errors);
    SubtitleProcessor::new(LineCleaner::new(rules), max_duration, DEFAULT_STYLE_HEADER.to_string())
}

/// Read a file and strip the byte-order mark the writer adds
pub fn read_without_bom(path: &Path) -> Result<String> {
    let content = fs::read_to_string(path)?;
    Ok(content.trim_start_matches('\u{feff}').to_string())
}

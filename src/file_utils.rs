use anyhow::{anyhow, Context, Result};
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, BIG5, GB18030, GBK, UTF_8, WINDOWS_1252};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::subtitle_processor::SubtitleFormat;

// @module: File and directory utilities

const UTF8_BOM: char = '\u{feff}';

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @checks: Extension is .srt, .ass or .ssa (any case)
    pub fn is_subtitle_file<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(SubtitleFormat::from_extension)
            .is_some()
    }

    /// Collect the subtitle files under `path`.
    ///
    /// A file path yields itself when it has a subtitle extension; a
    /// directory is walked recursively. Entries that cannot be read are
    /// skipped with a warning. The result is sorted.
    pub fn find_subtitle_files<P: AsRef<Path>>(path: P) -> Result<Vec<PathBuf>> {
        let path = path.as_ref();

        if Self::file_exists(path) {
            return Ok(if Self::is_subtitle_file(path) {
                vec![path.to_path_buf()]
            } else {
                Vec::new()
            });
        }

        if !Self::dir_exists(path) {
            return Err(anyhow!("Input path does not exist: {:?}", path));
        }

        let mut result = Vec::new();
        for entry in WalkDir::new(path).follow_links(true) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let entry_path = entry.path();
            if entry_path.is_file() && Self::is_subtitle_file(entry_path) {
                result.push(entry_path.to_path_buf());
            }
        }

        result.sort();
        Ok(result)
    }

    /// Read a subtitle document as text, whatever its encoding
    pub fn read_document<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .with_context(|| format!("Failed to read file: {:?}", path))?;

        let (text, encoding) = Self::decode_document(&bytes);
        if encoding != UTF_8 {
            debug!("Decoded {:?} as {}", path, encoding.name());
        }
        Ok(text)
    }

    /// Decode raw subtitle bytes into text.
    ///
    /// A byte-order mark decides the encoding and is dropped. Otherwise
    /// valid UTF-8 is used as is; failing that, the encoding guessed from
    /// the content is tried first, then GB18030 and Big5, and Windows-1252
    /// as the last resort. GBK guesses are read as GB18030, its superset.
    pub fn decode_document(bytes: &[u8]) -> (String, &'static Encoding) {
        if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
            let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
            return (text.into_owned(), encoding);
        }

        if let Ok(text) = std::str::from_utf8(bytes) {
            return (text.to_string(), UTF_8);
        }

        let mut detector = EncodingDetector::new();
        detector.feed(bytes, true);
        let guessed = match detector.guess(None, true) {
            encoding if encoding == GBK => GB18030,
            encoding => encoding,
        };

        for encoding in [guessed, GB18030, BIG5] {
            if let Some(text) = encoding.decode_without_bom_handling_and_without_replacement(bytes) {
                return (text.into_owned(), encoding);
            }
        }

        let (text, _) = WINDOWS_1252.decode_without_bom_handling(bytes);
        (text.into_owned(), WINDOWS_1252)
    }

    /// Write `content` prefixed with a UTF-8 byte-order mark
    pub fn write_with_bom<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
            }
        }

        let mut data = String::with_capacity(content.len() + UTF8_BOM.len_utf8());
        data.push(UTF8_BOM);
        data.push_str(content);

        fs::write(path, data)
            .with_context(|| format!("Failed to write to file: {:?}", path))?;
        Ok(())
    }

    // @generates: Output path for a cleaned document
    // @params: input_file, target format
    pub fn output_path<P: AsRef<Path>>(input_file: P, target: SubtitleFormat) -> PathBuf {
        let input_file = input_file.as_ref();
        let already_target = input_file
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(target.extension()));

        if already_target {
            input_file.to_path_buf()
        } else {
            input_file.with_extension(target.extension())
        }
    }
}

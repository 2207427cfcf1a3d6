/*!
 * Tests for file utility functions
 */

use std::fs;
use anyhow::Result;
use encoding_rs::{BIG5, GBK, UTF_8};
use subclean::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_file_exists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "test_file_exists.srt", "content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::file_exists(temp_dir.path()));
    Ok(())
}

/// Test that dir_exists returns false for non-existent directories
#[test]
fn test_dir_exists_withNonExistentDir_shouldReturnFalse() {
    assert!(!FileManager::dir_exists("./non_existent_directory_12345"));
    assert!(FileManager::dir_exists("."));
}

/// Test that directory walking finds subtitle files at any depth, sorted
#[test]
fn test_find_subtitle_files_withNestedDirs_shouldFindAllSubtitles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "b.srt", "x")?;
    common::create_test_file(temp_dir.path(), "a.ASS", "x")?;
    common::create_test_file(temp_dir.path(), "season1/ep1.ssa", "x")?;
    common::create_test_file(temp_dir.path(), "season1/notes.txt", "x")?;
    common::create_test_file(temp_dir.path(), "season1/deep/ep2.srt", "x")?;

    let files = FileManager::find_subtitle_files(temp_dir.path())?;
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(temp_dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();

    assert_eq!(names, vec!["a.ASS", "b.srt", "season1/deep/ep2.srt", "season1/ep1.ssa"]);
    Ok(())
}

/// Test that a single file path yields only itself
#[test]
fn test_find_subtitle_files_withSingleFile_shouldReturnIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let srt = common::create_test_file(temp_dir.path(), "movie.srt", "x")?;
    let txt = common::create_test_file(temp_dir.path(), "movie.txt", "x")?;

    assert_eq!(FileManager::find_subtitle_files(&srt)?, vec![srt]);
    assert!(FileManager::find_subtitle_files(&txt)?.is_empty());
    Ok(())
}

/// Test that a missing input path is an error
#[test]
fn test_find_subtitle_files_withMissingPath_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    assert!(FileManager::find_subtitle_files(temp_dir.path().join("nope")).is_err());
    Ok(())
}

/// Test that the byte-order mark is stripped on read and added on write
#[test]
fn test_read_and_write_withBom_shouldRoundTripContent() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let input = common::create_test_file(temp_dir.path(), "in.srt", "\u{feff}1\nhello\n")?;

    let content = FileManager::read_document(&input)?;
    assert_eq!(content, "1\nhello\n");

    let output = temp_dir.path().join("out/cleaned.srt");
    FileManager::write_with_bom(&output, &content)?;

    let bytes = fs::read(&output)?;
    assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
    assert_eq!(&bytes[3..], b"1\nhello\n");
    Ok(())
}

/// Test that a GBK encoded Chinese subtitle is decoded
#[test]
fn test_read_document_withGbkFile_shouldDecode() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (bytes, _, had_errors) = GBK.encode(common::SAMPLE_SIMPLIFIED_SRT);
    assert!(!had_errors);
    let path = temp_dir.path().join("gbk.srt");
    fs::write(&path, &bytes)?;

    assert_eq!(FileManager::read_document(&path)?, common::SAMPLE_SIMPLIFIED_SRT);
    Ok(())
}

/// Test that a Big5 encoded Traditional Chinese subtitle is decoded
#[test]
fn test_decode_document_withBig5Bytes_shouldDecode() {
    let (bytes, _, had_errors) = BIG5.encode(common::SAMPLE_TRADITIONAL_SRT);
    assert!(!had_errors);

    let (text, encoding) = FileManager::decode_document(&bytes);
    assert_eq!(text, common::SAMPLE_TRADITIONAL_SRT);
    assert_eq!(encoding, BIG5);
}

/// Test that plain UTF-8 is passed through untouched
#[test]
fn test_decode_document_withUtf8_shouldKeepText() {
    let (text, encoding) = FileManager::decode_document(common::SAMPLE_SRT.as_bytes());
    assert_eq!(text, common::SAMPLE_SRT);
    assert_eq!(encoding, UTF_8);
}

/// Test that bytes no multi-byte encoding accepts still decode
#[test]
fn test_decode_document_withUndecodableBytes_shouldNotFail() {
    let (text, _) = FileManager::decode_document(&[0x31, 0x0A, 0xE9, 0x0A]);
    assert!(text.starts_with("1\n"));
    assert_eq!(text.chars().count(), 4);
}

/*!
 * Tests for the batch controller
 */

use std::fs;
use anyhow::Result;

use subclean::app_config::Config;
use subclean::app_controller::{BatchSummary, Controller};
use crate::common;

/// Test that a directory run cleans each file and counts the one that fails
#[tokio::test]
async fn test_run_withMixedDirectory_shouldProcessAndCountFailures() -> Result<()> {
    common::init_logging();
    let temp_dir = common::create_temp_dir()?;
    let srt = common::create_test_file(temp_dir.path(), "a.srt", common::SAMPLE_SRT)?;
    common::create_test_file(temp_dir.path(), "nested/b.ssa", common::SAMPLE_ASS)?;
    common::create_test_file(temp_dir.path(), "nested/broken.ass", "[Script Info]\nTitle: nothing\n")?;

    let controller = Controller::with_config(Config::default())?;
    let summary = controller.run(temp_dir.path().to_path_buf(), false).await?;

    assert_eq!(
        summary,
        BatchSummary {
            processed: 2,
            failed: 1,
            cues_written: 3,
            cues_skipped: 3,
        }
    );

    // SRT is rewritten in place with a byte-order mark
    let bytes = fs::read(&srt)?;
    assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);
    let rewritten = common::read_without_bom(&srt)?;
    assert!(rewritten.starts_with("1\n00:00:01,000 --> 00:00:08,000\n"));

    // SSA input is written as .ass next to the source
    let converted = temp_dir.path().join("nested/b.ass");
    assert!(converted.exists());
    assert!(common::read_without_bom(&converted)?.contains(",,Hello!\n"));

    // The failed file is left untouched
    let broken = fs::read_to_string(temp_dir.path().join("nested/broken.ass"))?;
    assert_eq!(broken, "[Script Info]\nTitle: nothing\n");
    Ok(())
}

/// Test that SRT to ASS conversion writes a new file and keeps the source
#[tokio::test]
async fn test_run_withConvertToAss_shouldWriteAssBesideSource() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let srt = common::create_test_file(temp_dir.path(), "movie.srt", "1\n00:00:01,000 --> 00:00:10,000\nHello!!!...\n")?;

    let mut config = Config::default();
    config.concurrent_documents = 1;
    let controller = Controller::with_config(config)?;
    let summary = controller.run(srt.clone(), true).await?;

    assert_eq!(summary.processed, 1);
    assert_eq!(fs::read_to_string(&srt)?, "1\n00:00:01,000 --> 00:00:10,000\nHello!!!...\n");

    let ass = common::read_without_bom(&temp_dir.path().join("movie.ass"))?;
    assert!(ass.ends_with("Dialogue: 0,0:00:01.00,0:00:08.00,Default,,0,0,0,,Hello!\n"));
    Ok(())
}

/// Test that a directory without subtitles is reported as an error
#[tokio::test]
async fn test_run_withNoSubtitleFiles_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    common::create_test_file(temp_dir.path(), "readme.txt", "nothing to see")?;

    let controller = Controller::with_config(Config::default())?;
    assert!(controller.run(temp_dir.path().to_path_buf(), false).await.is_err());
    Ok(())
}

/// Test that an invalid configuration is rejected up front
#[test]
fn test_with_config_withInvalidDuration_shouldFail() {
    let mut config = Config::default();
    config.max_duration = -1.0;
    assert!(Controller::with_config(config).is_err());
}

/// Test that process_file works on a single path without the async runner
#[test]
fn test_process_file_withSingleSrt_shouldReportCounts() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let srt = common::create_test_file(temp_dir.path(), "one.srt", common::SAMPLE_SRT)?;
    let processor = common::default_processor(7.0);

    let outcome = Controller::process_file(&processor, &srt, false)?;

    assert_eq!(outcome.output, srt);
    assert_eq!(outcome.cues_written, 2);
    assert_eq!(outcome.skipped.len(), 2);
    Ok(())
}

/// Test that a Big5 Traditional Chinese file is decoded, converted and written as UTF-8
#[test]
fn test_process_file_withBig5AndSimplified_shouldWriteSimplifiedUtf8() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let (bytes, _, _) = encoding_rs::BIG5.encode(common::SAMPLE_TRADITIONAL_SRT);
    let srt = temp_dir.path().join("big5.srt");
    fs::write(&srt, &bytes)?;

    let processor = common::default_processor(7.0).with_simplified(true);
    let outcome = Controller::process_file(&processor, &srt, false)?;
    assert_eq!(outcome.cues_written, 4);

    let written = common::read_without_bom(&srt)?;
    assert!(written.contains("我们今天晚上去看电影吧，听说这部电影很好看\n"));
    assert!(written.contains("放心吧，这次我一定不会再迟到了\n"));
    assert!(!written.contains("們"));
    Ok(())
}

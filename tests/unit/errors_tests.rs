/*!
 * Tests for error types
 */

use subclean::errors::{ConfigError, SkipReason, SubtitleError, TimecodeError};

/// Test that a timecode error converts into a skip reason
#[test]
fn test_skip_reason_from_timecode_error_shouldWrapIt() {
    let reason: SkipReason = TimecodeError::OutOfRange("00:61:00,000".to_string()).into();
    assert_eq!(
        reason,
        SkipReason::BadTimecode(TimecodeError::OutOfRange("00:61:00,000".to_string()))
    );
    assert!(reason.to_string().contains("00:61:00,000"));
}

/// Test that the conversion error names both formats
#[test]
fn test_unsupported_conversion_display_shouldNameFormats() {
    let error = SubtitleError::UnsupportedConversion {
        from: "ass".to_string(),
        to: "srt".to_string(),
    };
    assert_eq!(error.to_string(), "Unsupported conversion: ass -> srt");
}

/// Test that a bad user pattern reports the pattern text
#[test]
fn test_bad_user_pattern_display_shouldIncludePattern() {
    let error = ConfigError::BadUserPattern {
        pattern: "(oops".to_string(),
        message: "unclosed group".to_string(),
    };
    let message = error.to_string();
    assert!(message.contains("(oops"));
    assert!(message.contains("unclosed group"));
}

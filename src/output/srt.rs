//! SRT subtitle rendering.

use crate::error::{Result, TolkError};
use crate::transcription::TranscriptSegment;

/// Convert a non-negative second count into an SRT timestamp.
///
/// SRT timestamps take the form `HH:MM:SS,mmm`. Hours, minutes and seconds
/// are zero-padded to two digits; recordings of 100 hours or more simply
/// render with a wider hour field.
pub fn seconds_to_timestamp(seconds: f64) -> Result<String> {
    if !seconds.is_finite() || seconds < 0.0 {
        return Err(TolkError::InvalidInput(format!(
            "Cannot render timestamp for {} seconds",
            seconds
        )));
    }

    let hours = (seconds / 3600.0).floor() as u64;
    let minutes = ((seconds % 3600.0) / 60.0).floor() as u64;
    let secs = (seconds % 60.0).floor() as u64;
    let millis = ((seconds - seconds.floor()) * 1000.0).floor() as u64;

    Ok(format!(
        "{:02}:{:02}:{:02},{:03}",
        hours, minutes, secs, millis
    ))
}

/// Render timed segments as SRT cues.
///
/// Each segment becomes one block: a 1-based index line, a
/// `start --> end` line, and the trimmed text, with a blank line between
/// blocks. An empty segment list renders as the empty string. Validation
/// happens before any output is assembled, so a bad segment never yields a
/// partial rendering.
pub fn format_cues(segments: &[TranscriptSegment]) -> Result<String> {
    let mut blocks = Vec::with_capacity(segments.len());

    for (i, segment) in segments.iter().enumerate() {
        if segment.end_seconds < segment.start_seconds {
            return Err(TolkError::InvalidInput(format!(
                "Cue {}: end {:.3}s precedes start {:.3}s",
                i + 1,
                segment.end_seconds,
                segment.start_seconds
            )));
        }

        blocks.push(format!(
            "{}\n{} --> {}\n{}\n",
            i + 1,
            seconds_to_timestamp(segment.start_seconds)?,
            seconds_to_timestamp(segment.end_seconds)?,
            segment.text.trim()
        ));
    }

    Ok(blocks.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_zero() {
        assert_eq!(seconds_to_timestamp(0.0).unwrap(), "00:00:00,000");
    }

    #[test]
    fn test_timestamp_with_millis() {
        assert_eq!(seconds_to_timestamp(3661.5).unwrap(), "01:01:01,500");
        assert_eq!(seconds_to_timestamp(61.5).unwrap(), "00:01:01,500");
    }

    #[test]
    fn test_timestamp_over_hundred_hours() {
        // 100h 0m 1s; wide hour fields are valid, not an error
        assert_eq!(seconds_to_timestamp(360_001.0).unwrap(), "100:00:01,000");
    }

    #[test]
    fn test_timestamp_rejects_negative() {
        assert!(matches!(
            seconds_to_timestamp(-0.5),
            Err(TolkError::InvalidInput(_))
        ));
        assert!(seconds_to_timestamp(f64::NAN).is_err());
    }

    #[test]
    fn test_format_cues_empty() {
        assert_eq!(format_cues(&[]).unwrap(), "");
    }

    #[test]
    fn test_format_cues_single_block() {
        let segments = vec![TranscriptSegment::new(0.0, 2.5, " Hello world. ".to_string())];
        let srt = format_cues(&segments).unwrap();

        assert_eq!(srt, "1\n00:00:00,000 --> 00:00:02,500\nHello world.\n");
    }

    #[test]
    fn test_format_cues_multiple_blocks() {
        let segments = vec![
            TranscriptSegment::new(0.0, 2.5, "Hello world.".to_string()),
            TranscriptSegment::new(2.5, 5.0, "This is a test.".to_string()),
        ];
        let srt = format_cues(&segments).unwrap();

        assert_eq!(
            srt,
            "1\n00:00:00,000 --> 00:00:02,500\nHello world.\n\n\
             2\n00:00:02,500 --> 00:00:05,000\nThis is a test.\n"
        );
    }

    #[test]
    fn test_format_cues_rejects_reversed_times() {
        let segments = vec![TranscriptSegment::new(5.0, 2.0, "backwards".to_string())];
        assert!(matches!(
            format_cues(&segments),
            Err(TolkError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_format_cues_idempotent() {
        let segments = vec![
            TranscriptSegment::new(0.0, 1.0, "a".to_string()),
            TranscriptSegment::new(1.0, 2.0, "b".to_string()),
        ];
        assert_eq!(format_cues(&segments).unwrap(), format_cues(&segments).unwrap());
    }
}

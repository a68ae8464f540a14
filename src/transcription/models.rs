//! Data models for transcription.

use serde::{Deserialize, Serialize};

/// A single recognized word with speaker attribution, as emitted by a
/// diarizing recognition backend.
///
/// This record is vendor-neutral: each backend adapter translates its native
/// response (protobuf durations, JSON strings, etc.) into this shape before
/// any grouping happens, so the grouping logic never sees vendor types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WordAnnotation {
    /// The word text.
    pub text: String,
    /// Speaker identifier assigned by the backend.
    pub speaker: i32,
    /// Start offset in seconds. Backends occasionally omit word timing.
    pub start_seconds: Option<f64>,
    /// End offset in seconds.
    pub end_seconds: Option<f64>,
}

impl WordAnnotation {
    /// Create a new word annotation.
    pub fn new(
        text: impl Into<String>,
        speaker: i32,
        start_seconds: Option<f64>,
        end_seconds: Option<f64>,
    ) -> Self {
        Self {
            text: text.into(),
            speaker,
            start_seconds,
            end_seconds,
        }
    }

    /// Start offset, with missing timing coerced to 0.0 seconds.
    ///
    /// The coercion mirrors the recognition backends' own fallback and can
    /// understate segment duration when several consecutive words lack
    /// timing; it is a defensive default, not a correctness guarantee.
    pub fn start(&self) -> f64 {
        self.start_seconds.unwrap_or(0.0)
    }

    /// End offset, with missing timing coerced to 0.0 seconds.
    pub fn end(&self) -> f64 {
        self.end_seconds.unwrap_or(0.0)
    }
}

/// A complete transcript with segments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transcript {
    /// Media ID this transcript belongs to (derived from the input file).
    pub media_id: String,
    /// Individual transcript segments with timestamps.
    pub segments: Vec<TranscriptSegment>,
    /// Full transcript text.
    pub full_text: String,
    /// Total duration in seconds.
    pub duration_seconds: f64,
    /// Language hint used for recognition, if any.
    pub language: Option<String>,
}

impl Transcript {
    /// Create a new transcript from segments, deriving the full text.
    pub fn new(media_id: String, segments: Vec<TranscriptSegment>) -> Self {
        let full_text = segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let duration_seconds = segments.last().map(|s| s.end_seconds).unwrap_or(0.0);

        Self {
            media_id,
            segments,
            full_text,
            duration_seconds,
            language: None,
        }
    }

    /// Replace the derived full text with the backend's own rendering.
    ///
    /// Google returns a punctuated transcript per result that reads better
    /// than re-joining the diarized words.
    pub fn with_text(mut self, full_text: String) -> Self {
        self.full_text = full_text;
        self
    }

    /// Attach the language used for recognition.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Whether any segment carries a speaker attribution.
    pub fn has_speakers(&self) -> bool {
        self.segments.iter().any(|s| s.speaker.is_some())
    }
}

/// A single segment of a transcript with timestamp information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Start time in seconds.
    pub start_seconds: f64,
    /// End time in seconds.
    pub end_seconds: f64,
    /// Transcribed text content.
    pub text: String,
    /// Speaker id when the engine performed diarization.
    pub speaker: Option<i32>,
}

impl TranscriptSegment {
    /// Create a new transcript segment without speaker attribution.
    pub fn new(start_seconds: f64, end_seconds: f64, text: String) -> Self {
        Self {
            start_seconds,
            end_seconds,
            text,
            speaker: None,
        }
    }

    /// Duration of this segment in seconds.
    pub fn duration(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }

    /// Display label for the attributed speaker, e.g. "SPEAKER_1".
    pub fn speaker_label(&self) -> Option<String> {
        self.speaker.map(|id| format!("SPEAKER_{}", id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_creation() {
        let segments = vec![
            TranscriptSegment::new(0.0, 5.0, "Hello world".to_string()),
            TranscriptSegment::new(5.0, 10.0, "This is a test".to_string()),
        ];

        let transcript = Transcript::new("meeting".to_string(), segments);

        assert_eq!(transcript.media_id, "meeting");
        assert_eq!(transcript.full_text, "Hello world This is a test");
        assert_eq!(transcript.duration_seconds, 10.0);
        assert!(!transcript.has_speakers());
    }

    #[test]
    fn test_with_text_override() {
        let segments = vec![TranscriptSegment::new(0.0, 2.0, "hi there".to_string())];
        let transcript =
            Transcript::new("m".to_string(), segments).with_text("Hi, there.".to_string());

        assert_eq!(transcript.full_text, "Hi, there.");
    }

    #[test]
    fn test_speaker_label() {
        let mut segment = TranscriptSegment::new(0.0, 1.0, "hi".to_string());
        assert_eq!(segment.speaker_label(), None);

        segment.speaker = Some(3);
        assert_eq!(segment.speaker_label().as_deref(), Some("SPEAKER_3"));
    }

    #[test]
    fn test_word_annotation_timing_fallback() {
        let word = WordAnnotation::new("hello", 1, None, None);
        assert_eq!(word.start(), 0.0);
        assert_eq!(word.end(), 0.0);

        let timed = WordAnnotation::new("hello", 1, Some(1.25), Some(1.75));
        assert_eq!(timed.start(), 1.25);
        assert_eq!(timed.end(), 1.75);
    }
}

//! Speaker segment grouping.
//!
//! Diarizing backends return a flat, chronological list of words, each tagged
//! with a speaker id. Readers want speaker turns, so consecutive words from
//! the same speaker are coalesced here into timestamped segments.

use super::models::{TranscriptSegment, WordAnnotation};

/// A maximal run of consecutive words attributed to one speaker.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerSegment {
    /// Speaker id shared by every word in the run.
    pub speaker: i32,
    /// Start of the first word in the run.
    pub start_seconds: f64,
    /// End of the most recent word in the run.
    pub end_seconds: f64,
    /// Space-joined word texts, trimmed.
    pub text: String,
}

impl SpeakerSegment {
    /// Display label for this speaker, e.g. "SPEAKER_0".
    pub fn speaker_label(&self) -> String {
        format!("SPEAKER_{}", self.speaker)
    }
}

impl From<SpeakerSegment> for TranscriptSegment {
    fn from(segment: SpeakerSegment) -> Self {
        Self {
            start_seconds: segment.start_seconds,
            end_seconds: segment.end_seconds,
            text: segment.text,
            speaker: Some(segment.speaker),
        }
    }
}

/// Groups consecutive same-speaker words into segments.
///
/// Words must arrive in the order the backend emitted them; segments come out
/// in that same order, and every input word lands in exactly one segment.
/// Missing word timing is coerced to 0.0 seconds (see
/// [`WordAnnotation::start`]).
pub fn build_segments(words: &[WordAnnotation]) -> Vec<SpeakerSegment> {
    let mut segments = Vec::new();

    let mut current: Option<SegmentAccumulator> = None;

    for word in words {
        match current {
            Some(ref mut acc) if acc.speaker == word.speaker => acc.push(word),
            _ => {
                if let Some(acc) = current.take() {
                    segments.push(acc.finish());
                }
                current = Some(SegmentAccumulator::open(word));
            }
        }
    }

    if let Some(acc) = current {
        segments.push(acc.finish());
    }

    segments
}

/// The currently-open run while scanning the word list.
struct SegmentAccumulator {
    speaker: i32,
    start_seconds: f64,
    end_seconds: f64,
    words: Vec<String>,
}

impl SegmentAccumulator {
    fn open(word: &WordAnnotation) -> Self {
        Self {
            speaker: word.speaker,
            start_seconds: word.start(),
            end_seconds: word.end(),
            words: vec![word.text.clone()],
        }
    }

    fn push(&mut self, word: &WordAnnotation) {
        self.words.push(word.text.clone());
        self.end_seconds = word.end();
    }

    fn finish(self) -> SpeakerSegment {
        SpeakerSegment {
            speaker: self.speaker,
            start_seconds: self.start_seconds,
            end_seconds: self.end_seconds,
            text: self.words.join(" ").trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, speaker: i32, start: f64, end: f64) -> WordAnnotation {
        WordAnnotation::new(text, speaker, Some(start), Some(end))
    }

    #[test]
    fn test_empty_input() {
        assert!(build_segments(&[]).is_empty());
    }

    #[test]
    fn test_two_speakers() {
        let words = vec![
            word("Hi", 0, 0.0, 0.5),
            word("there", 0, 0.5, 1.0),
            word("Bye", 1, 1.0, 1.5),
        ];

        let segments = build_segments(&words);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].speaker, 0);
        assert_eq!(segments[0].start_seconds, 0.0);
        assert_eq!(segments[0].end_seconds, 1.0);
        assert_eq!(segments[0].text, "Hi there");
        assert_eq!(segments[1].speaker, 1);
        assert_eq!(segments[1].start_seconds, 1.0);
        assert_eq!(segments[1].end_seconds, 1.5);
        assert_eq!(segments[1].text, "Bye");
    }

    #[test]
    fn test_single_word_zero_duration() {
        let segments = build_segments(&[word("Hm", 4, 2.0, 2.0)]);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_seconds, segments[0].end_seconds);
        assert_eq!(segments[0].speaker_label(), "SPEAKER_4");
    }

    #[test]
    fn test_speaker_returns_after_interruption() {
        // Same id on both sides of an interruption makes two distinct runs
        let words = vec![
            word("so", 1, 0.0, 0.3),
            word("wait", 2, 0.3, 0.6),
            word("anyway", 1, 0.6, 1.0),
        ];

        let segments = build_segments(&words);

        assert_eq!(segments.len(), 3);
        assert_eq!(segments[0].speaker, 1);
        assert_eq!(segments[1].speaker, 2);
        assert_eq!(segments[2].speaker, 1);
    }

    #[test]
    fn test_no_words_dropped_or_reordered() {
        let words: Vec<WordAnnotation> = (0..20)
            .map(|i| word(&format!("w{}", i), (i / 4) as i32, i as f64, (i + 1) as f64))
            .collect();

        let segments = build_segments(&words);

        let rejoined: Vec<String> = segments
            .iter()
            .flat_map(|s| s.text.split_whitespace().map(str::to_string))
            .collect();
        let original: Vec<String> = words.iter().map(|w| w.text.clone()).collect();

        assert_eq!(rejoined, original);
    }

    #[test]
    fn test_adjacent_pairs_define_boundaries() {
        let words = vec![
            word("a", 0, 0.0, 1.0),
            word("b", 0, 1.0, 2.0),
            word("c", 3, 2.0, 3.0),
            word("d", 3, 3.0, 4.0),
            word("e", 0, 4.0, 5.0),
        ];

        let segments = build_segments(&words);

        assert_eq!(
            segments.iter().map(|s| s.speaker).collect::<Vec<_>>(),
            vec![0, 3, 0]
        );
        assert_eq!(segments[0].text, "a b");
        assert_eq!(segments[1].text, "c d");
        assert_eq!(segments[2].text, "e");
    }

    #[test]
    fn test_missing_timing_collapses_to_zero() {
        // Documented fallback: absent timestamps read as 0.0
        let words = vec![
            WordAnnotation::new("one", 0, None, None),
            WordAnnotation::new("two", 0, Some(1.0), Some(1.5)),
        ];

        let segments = build_segments(&words);

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_seconds, 0.0);
        assert_eq!(segments[0].end_seconds, 1.5);
        assert_eq!(segments[0].text, "one two");
    }

    #[test]
    fn test_idempotent() {
        let words = vec![
            word("Hi", 0, 0.0, 0.5),
            word("there", 0, 0.5, 1.0),
            word("Bye", 1, 1.0, 1.5),
        ];

        assert_eq!(build_segments(&words), build_segments(&words));
    }

    #[test]
    fn test_conversion_to_transcript_segment() {
        let segments = build_segments(&[word("hello", 2, 0.5, 1.0)]);
        let segment: TranscriptSegment = segments.into_iter().next().unwrap().into();

        assert_eq!(segment.speaker, Some(2));
        assert_eq!(segment.speaker_label().as_deref(), Some("SPEAKER_2"));
        assert_eq!(segment.start_seconds, 0.5);
    }
}

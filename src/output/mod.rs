//! Transcript output formatting (plain text, markdown, SRT, JSON).

mod srt;
mod writer;

pub use srt::{format_cues, seconds_to_timestamp};
pub use writer::{save_output, SavedOutput};

use crate::error::Result;
use crate::transcription::Transcript;
use serde::Serialize;

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Markdown,
    Srt,
    Json,
}

impl OutputFormat {
    /// File extension for this format (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Text => "txt",
            OutputFormat::Markdown => "md",
            OutputFormat::Srt => "srt",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "txt" | "text" => Ok(OutputFormat::Text),
            "md" | "markdown" => Ok(OutputFormat::Markdown),
            "srt" => Ok(OutputFormat::Srt),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use txt, md, srt, or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// JSON-serializable transcript for export.
#[derive(Debug, Serialize)]
pub struct TranscriptExport {
    pub media_id: String,
    pub duration_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub segments: Vec<SegmentExport>,
}

#[derive(Debug, Serialize)]
pub struct SegmentExport {
    pub text: String,
    pub start_seconds: f64,
    pub end_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker: Option<String>,
}

impl From<&Transcript> for TranscriptExport {
    fn from(transcript: &Transcript) -> Self {
        Self {
            media_id: transcript.media_id.clone(),
            duration_seconds: transcript.duration_seconds,
            language: transcript.language.clone(),
            segments: transcript
                .segments
                .iter()
                .map(|s| SegmentExport {
                    text: s.text.clone(),
                    start_seconds: s.start_seconds,
                    end_seconds: s.end_seconds,
                    speaker: s.speaker_label(),
                })
                .collect(),
        }
    }
}

/// Format a transcript for output.
pub fn format_transcript(transcript: &Transcript, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(format_plain_text(&transcript.full_text)),
        OutputFormat::Markdown => Ok(format_markdown(&transcript.full_text)),
        OutputFormat::Srt => {
            // Engines without timing information (or an empty result) fall
            // back to plain text rather than producing an empty .srt body.
            if transcript.segments.is_empty() {
                Ok(format_plain_text(&transcript.full_text))
            } else {
                format_cues(&transcript.segments)
            }
        }
        OutputFormat::Json => format_json(transcript),
    }
}

/// Plain text: trimmed transcript ending with a single newline.
fn format_plain_text(text: &str) -> String {
    format!("{}\n", text.trim())
}

/// Markdown rendering. Currently the text itself; headings or speaker
/// annotations could be layered on here later.
fn format_markdown(text: &str) -> String {
    format!("{}\n", text.trim())
}

/// Pretty-printed JSON export.
fn format_json(transcript: &Transcript) -> Result<String> {
    let export = TranscriptExport::from(transcript);
    Ok(serde_json::to_string_pretty(&export)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcription::TranscriptSegment;

    fn sample_transcript() -> Transcript {
        let mut first = TranscriptSegment::new(0.0, 2.5, "Hello world.".to_string());
        first.speaker = Some(1);
        let mut second = TranscriptSegment::new(2.5, 5.0, "This is a test.".to_string());
        second.speaker = Some(2);

        Transcript::new("meeting".to_string(), vec![first, second])
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("txt".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("md".parse::<OutputFormat>().unwrap(), OutputFormat::Markdown);
        assert_eq!("SRT".parse::<OutputFormat>().unwrap(), OutputFormat::Srt);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("docx".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_plain_text_trims() {
        let transcript =
            Transcript::new("m".to_string(), vec![]).with_text("  some words  ".to_string());
        let text = format_transcript(&transcript, OutputFormat::Text).unwrap();
        assert_eq!(text, "some words\n");
    }

    #[test]
    fn test_format_srt() {
        let srt = format_transcript(&sample_transcript(), OutputFormat::Srt).unwrap();
        assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:02,500\nHello world.\n"));
        assert!(srt.contains("2\n00:00:02,500 --> 00:00:05,000"));
    }

    #[test]
    fn test_format_srt_without_segments_falls_back() {
        let transcript =
            Transcript::new("m".to_string(), vec![]).with_text("Just text.".to_string());
        let out = format_transcript(&transcript, OutputFormat::Srt).unwrap();
        assert_eq!(out, "Just text.\n");
    }

    #[test]
    fn test_format_json_includes_speakers() {
        let json = format_transcript(&sample_transcript(), OutputFormat::Json).unwrap();
        assert!(json.contains("\"media_id\": \"meeting\""));
        assert!(json.contains("\"speaker\": \"SPEAKER_1\""));
        assert!(json.contains("Hello world."));
    }
}

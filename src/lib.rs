//! Tolk - Audio Transcription with Speaker Diarization
//!
//! A CLI tool that turns an audio recording into a transcript, optionally
//! annotated with speaker labels and summarized into key takeaways.
//!
//! The name "Tolk" comes from the Norwegian/Scandinavian word for "interpreter."
//!
//! # Overview
//!
//! Tolk allows you to:
//! - Transcribe local audio/video recordings with OpenAI Whisper
//! - Attribute speech to speakers via Google Cloud Speech-to-Text diarization
//! - Generate key takeaways and action items with an LLM
//! - Export transcripts as plain text, markdown, SRT subtitles or JSON
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `audio` - Audio normalization and splitting (ffmpeg/ffprobe)
//! - `transcription` - Speech-to-text engines and speaker segment grouping
//! - `summary` - LLM summarization of transcripts
//! - `output` - Transcript formatting and file output
//!
//! # Example
//!
//! The speaker-grouping and subtitle-rendering core is pure and usable on its
//! own:
//!
//! ```rust
//! use tolk::output::format_cues;
//! use tolk::transcription::{build_segments, TranscriptSegment, WordAnnotation};
//!
//! let words = vec![
//!     WordAnnotation::new("Hi", 0, Some(0.0), Some(0.5)),
//!     WordAnnotation::new("there", 0, Some(0.5), Some(1.0)),
//!     WordAnnotation::new("Bye", 1, Some(1.0), Some(1.5)),
//! ];
//!
//! let segments: Vec<TranscriptSegment> =
//!     build_segments(&words).into_iter().map(Into::into).collect();
//! let srt = format_cues(&segments).unwrap();
//! assert!(srt.starts_with("1\n00:00:00,000 --> 00:00:01,000\nHi there\n"));
//! ```

pub mod audio;
pub mod cli;
pub mod config;
pub mod error;
pub mod openai;
pub mod output;
pub mod summary;
pub mod transcription;

pub use error::{Result, TolkError};

//! Transcription module for Tolk.
//!
//! Two interchangeable engines sit behind the [`Transcriber`] trait:
//!
//! - **Whisper** (default): OpenAI Whisper API, no speaker labels.
//! - **Google**: Google Cloud Speech-to-Text with speaker diarization;
//!   word-level speaker tags are grouped into speaker turns.

mod diarization;
mod google;
mod models;
mod whisper;

pub use diarization::{build_segments, SpeakerSegment};
pub use google::GoogleTranscriber;
pub use models::{Transcript, TranscriptSegment, WordAnnotation};
pub use whisper::WhisperTranscriber;

use crate::config::{Settings, TranscriptionEngine};
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Trait for transcription services.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe an audio file and return segments with timestamps.
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript>;

    /// Transcribe an audio file with a specific language hint.
    async fn transcribe_with_language(
        &self,
        audio_path: &Path,
        language: &str,
    ) -> Result<Transcript>;
}

/// Build the transcriber for the selected engine.
pub fn create_transcriber(
    engine: TranscriptionEngine,
    settings: &Settings,
) -> Result<Box<dyn Transcriber>> {
    match engine {
        TranscriptionEngine::Whisper => Ok(Box::new(WhisperTranscriber::with_config(
            &settings.transcription.model,
            settings.transcription.chunk_duration_seconds,
            settings.transcription.max_concurrent_chunks,
        ))),
        TranscriptionEngine::Google => Ok(Box::new(GoogleTranscriber::new(
            &settings.diarization,
            &settings.audio,
            &settings.transcription.language,
        )?)),
    }
}

/// Derive a media id from the audio file name.
pub(crate) fn media_id_for(audio_path: &Path) -> String {
    audio_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

//! Configuration settings for Tolk.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub audio: AudioSettings,
    pub transcription: TranscriptionSettings,
    pub diarization: DiarizationSettings,
    pub summary: SummarySettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory where transcripts and summaries are written.
    pub output_dir: String,
    /// Directory for temporary files (normalized WAV, chunk scratch space).
    pub temp_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            output_dir: "outputs".to_string(),
            temp_dir: "/tmp/tolk".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Audio normalization settings.
///
/// 16 kHz mono is the common recommendation for both Whisper and Google
/// Speech-to-Text; the diarization engine sends this rate in its request, so
/// it must match what the preprocessor produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Sampling rate in Hertz for the normalized recording.
    pub sample_rate: u32,
    /// Channel count for the normalized recording.
    pub channels: u32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            channels: 1,
        }
    }
}

/// Transcription engine selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionEngine {
    /// OpenAI Whisper API (default, no speaker labels).
    #[default]
    Whisper,
    /// Google Cloud Speech-to-Text with speaker diarization.
    Google,
}

impl std::str::FromStr for TranscriptionEngine {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "whisper" | "openai" => Ok(TranscriptionEngine::Whisper),
            "google" | "gcp" => Ok(TranscriptionEngine::Google),
            _ => Err(format!("Unknown transcription engine: {}", s)),
        }
    }
}

impl std::fmt::Display for TranscriptionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TranscriptionEngine::Whisper => write!(f, "whisper"),
            TranscriptionEngine::Google => write!(f, "google"),
        }
    }
}

/// Transcription service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionSettings {
    /// Engine used when the CLI does not force one (whisper, google).
    pub engine: TranscriptionEngine,
    /// Whisper model to use.
    pub model: String,
    /// Default language code, e.g. "en-US".
    pub language: String,
    /// Duration in seconds for splitting long audio files.
    pub chunk_duration_seconds: u32,
    /// Maximum concurrent chunk transcriptions.
    pub max_concurrent_chunks: usize,
}

impl Default for TranscriptionSettings {
    fn default() -> Self {
        Self {
            engine: TranscriptionEngine::Whisper,
            model: "whisper-1".to_string(),
            language: "en-US".to_string(),
            chunk_duration_seconds: 120,
            max_concurrent_chunks: 3,
        }
    }
}

/// Speaker diarization settings (Google Cloud Speech-to-Text).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiarizationSettings {
    /// GCS bucket used to stage audio for LongRunningRecognize.
    /// Falls back to the GCS_BUCKET environment variable.
    pub gcs_bucket: Option<String>,
    /// Minimum expected speaker count.
    pub min_speakers: u32,
    /// Maximum expected speaker count.
    pub max_speakers: u32,
    /// Give up on the recognition operation after this many seconds.
    pub operation_timeout_seconds: u64,
    /// Seconds between operation status polls.
    pub poll_interval_seconds: u64,
    /// Delete the staged GCS object once recognition finishes.
    pub delete_after_transcription: bool,
}

impl Default for DiarizationSettings {
    fn default() -> Self {
        Self {
            gcs_bucket: None,
            min_speakers: 2,
            max_speakers: 6,
            operation_timeout_seconds: 3600,
            poll_interval_seconds: 5,
            delete_after_transcription: true,
        }
    }
}

impl DiarizationSettings {
    /// Resolve the staging bucket from config or the GCS_BUCKET env var.
    pub fn bucket(&self) -> Option<String> {
        self.gcs_bucket
            .clone()
            .filter(|b| !b.is_empty())
            .or_else(|| std::env::var("GCS_BUCKET").ok().filter(|b| !b.is_empty()))
    }
}

/// Summarization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    /// Chat model used to distil the transcript.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Response token budget.
    pub max_tokens: u32,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.5,
            max_tokens: 512,
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TolkError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tolk")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded output directory path.
    pub fn output_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.output_dir)
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_parsing() {
        assert_eq!(
            "whisper".parse::<TranscriptionEngine>().unwrap(),
            TranscriptionEngine::Whisper
        );
        assert_eq!(
            "Google".parse::<TranscriptionEngine>().unwrap(),
            TranscriptionEngine::Google
        );
        assert!("azure".parse::<TranscriptionEngine>().is_err());
    }

    #[test]
    fn test_defaults_roundtrip() {
        let settings = Settings::default();
        let toml_str = toml::to_string_pretty(&settings).unwrap();
        let parsed: Settings = toml::from_str(&toml_str).unwrap();

        assert_eq!(parsed.audio.sample_rate, 16_000);
        assert_eq!(parsed.audio.channels, 1);
        assert_eq!(parsed.transcription.engine, TranscriptionEngine::Whisper);
        assert_eq!(parsed.diarization.min_speakers, 2);
        assert_eq!(parsed.diarization.max_speakers, 6);
    }

    #[test]
    fn test_partial_config() {
        // Sections and keys not present fall back to defaults
        let parsed: Settings = toml::from_str("[transcription]\nengine = \"google\"\n").unwrap();
        assert_eq!(parsed.transcription.engine, TranscriptionEngine::Google);
        assert_eq!(parsed.transcription.model, "whisper-1");
        assert_eq!(parsed.general.output_dir, "outputs");
    }
}

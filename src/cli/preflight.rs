//! Pre-flight checks before expensive operations.
//!
//! Validates that required tools and configuration are available before
//! starting operations that would otherwise fail midway — an hour-long
//! recognition run should not die on a missing API key at the output stage.

use crate::config::Settings;
use crate::error::{Result, TolkError};
use std::process::Command;

/// Requirements for different stages of the pipeline.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Normalization needs ffmpeg and ffprobe.
    Preprocess,
    /// Whisper transcription needs the OpenAI API key.
    WhisperTranscribe,
    /// Diarization needs Google credentials and a staging bucket.
    GoogleTranscribe,
    /// Summarization needs the OpenAI API key.
    Summarize,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation, settings: &Settings) -> Result<()> {
    match operation {
        Operation::Preprocess => {
            check_tool("ffmpeg")?;
            check_tool("ffprobe")?;
        }
        Operation::WhisperTranscribe | Operation::Summarize => {
            check_openai_api_key()?;
        }
        Operation::GoogleTranscribe => {
            check_google_auth()?;
            if settings.diarization.bucket().is_none() {
                return Err(TolkError::Config(
                    "No GCS bucket configured for diarization. \
                     Set diarization.gcs_bucket or export GCS_BUCKET."
                        .to_string(),
                ));
            }
        }
    }
    Ok(())
}

/// Check if the OpenAI API key is configured.
fn check_openai_api_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(TolkError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(TolkError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check that a Google bearer token is obtainable.
fn check_google_auth() -> Result<()> {
    if std::env::var("GOOGLE_ACCESS_TOKEN").map(|t| !t.is_empty()).unwrap_or(false) {
        return Ok(());
    }
    check_tool("gcloud")
}

/// Check if an external tool is available.
fn check_tool(name: &str) -> Result<()> {
    // ffmpeg/ffprobe use -version (single dash), others use --version
    let version_arg = match name {
        "ffmpeg" | "ffprobe" => "-version",
        _ => "--version",
    };
    match Command::new(name).arg(version_arg).output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(_) => Err(TolkError::ToolNotFound(format!(
            "{} is installed but not working correctly",
            name
        ))),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(TolkError::ToolNotFound(name.to_string()))
        }
        Err(e) => Err(TolkError::ToolNotFound(format!("{}: {}", name, e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_check_requires_bucket() {
        // A token in the env satisfies auth; the missing bucket must still fail
        std::env::set_var("GOOGLE_ACCESS_TOKEN", "test-token");
        std::env::remove_var("GCS_BUCKET");

        let settings = Settings::default();
        let result = check(Operation::GoogleTranscribe, &settings);

        std::env::remove_var("GOOGLE_ACCESS_TOKEN");
        assert!(matches!(result, Err(TolkError::Config(_))));
    }
}

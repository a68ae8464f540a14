//! Transcribe command implementation.
//!
//! Wires the whole pipeline together: preflight, audio normalization,
//! transcription, optional summarization, formatting and saving.

use crate::audio::preprocess_audio;
use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::{Settings, TranscriptionEngine};
use crate::output::{format_transcript, save_output, OutputFormat};
use crate::summary::{Summarizer, Summary};
use crate::transcription::create_transcriber;
use anyhow::Result;
use std::path::PathBuf;

/// Run the transcribe command.
#[allow(clippy::too_many_arguments)]
pub async fn run_transcribe(
    file: &str,
    diarize: bool,
    summary: bool,
    format: &str,
    output_dir: Option<String>,
    language: Option<String>,
    settings: Settings,
) -> Result<()> {
    // A bad format flag should fail before any audio work happens
    let output_format: OutputFormat = format
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    let engine = if diarize {
        TranscriptionEngine::Google
    } else {
        settings.transcription.engine
    };

    // Pre-flight checks for every stage this run will touch
    let mut operations = vec![Operation::Preprocess];
    operations.push(match engine {
        TranscriptionEngine::Whisper => Operation::WhisperTranscribe,
        TranscriptionEngine::Google => Operation::GoogleTranscribe,
    });
    if summary {
        operations.push(Operation::Summarize);
    }

    for operation in operations {
        if let Err(e) = preflight::check(operation, &settings) {
            Output::error(&format!("{}", e));
            Output::info("Run 'tolk doctor' for detailed diagnostics.");
            return Err(e.into());
        }
    }

    let input = PathBuf::from(file);
    Output::info(&format!("Processing: {}", file));

    // Normalize the recording into the temp dir
    let spinner = Output::spinner("Normalizing audio...");
    let wav = match preprocess_audio(
        &input,
        &settings.temp_dir(),
        settings.audio.sample_rate,
        settings.audio.channels,
    )
    .await
    {
        Ok(path) => {
            spinner.finish_and_clear();
            path
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to preprocess audio: {}", e));
            return Err(e.into());
        }
    };

    // Transcribe
    Output::info(&format!("Transcribing with the {} engine", engine));
    let transcriber = create_transcriber(engine, &settings)?;

    let result = match &language {
        Some(lang) => transcriber.transcribe_with_language(&wav, lang).await,
        None => transcriber.transcribe(&wav).await,
    };

    // The normalized WAV is scratch data either way
    let _ = std::fs::remove_file(&wav);

    let transcript = match result {
        Ok(t) => t,
        Err(e) => {
            Output::error(&format!("Transcription failed: {}", e));
            return Err(e.into());
        }
    };

    if transcript.full_text.trim().is_empty() {
        Output::warning("The recognition engine returned no speech.");
    }

    // Optional, best-effort summary
    let summary = if summary {
        generate_summary(&transcript.full_text, &settings).await
    } else {
        None
    };

    // Format and persist
    let content = format_transcript(&transcript, output_format)?;
    let out_dir = output_dir
        .map(|d| Settings::expand_path(&d))
        .unwrap_or_else(|| settings.output_dir());
    let saved = save_output(&content, output_format, &input, summary.as_ref(), &out_dir)?;

    Output::success(&format!(
        "Transcribed '{}' ({} segments, {:.0}s)",
        transcript.media_id,
        transcript.segments.len(),
        transcript.duration_seconds
    ));
    Output::kv("transcript", &saved.transcript_path.display().to_string());
    if let Some(path) = &saved.summary_path {
        Output::kv("summary", &path.display().to_string());
    }

    Ok(())
}

/// Run the summarizer, degrading to no summary on failure.
async fn generate_summary(full_text: &str, settings: &Settings) -> Option<Summary> {
    let spinner = Output::spinner("Summarizing transcript...");
    match Summarizer::new(&settings.summary).generate(full_text).await {
        Ok(summary) => {
            spinner.finish_and_clear();
            if summary.is_empty() {
                Output::warning("Summarizer returned an empty summary.");
            }
            Some(summary)
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::warning(&format!("Summarization failed, continuing without: {}", e));
            None
        }
    }
}

//! Audio normalization and splitting utilities.
//!
//! Speech recognition engines behave most consistently when they are fed a
//! known sample rate and channel count, so every input file is converted to
//! PCM WAV via the ffmpeg command-line tool before transcription. ffmpeg and
//! ffprobe must be installed on the host system.

use crate::error::{Result, TolkError};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

/// Converts an arbitrary audio or video file into a normalized WAV recording.
///
/// The output lands in `output_dir` as `<stem>.wav` with the requested sample
/// rate and channel count, overwriting any previous run. Returns the path to
/// the converted file.
#[instrument(skip(input, output_dir), fields(input = %input.display()))]
pub async fn preprocess_audio(
    input: &Path,
    output_dir: &Path,
    sample_rate: u32,
    channels: u32,
) -> Result<PathBuf> {
    if !input.is_file() {
        return Err(TolkError::InvalidInput(format!(
            "Input file does not exist: {}",
            input.display()
        )));
    }

    std::fs::create_dir_all(output_dir)?;

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");
    let output_path = output_dir.join(format!("{}.wav", stem));

    debug!("Normalizing to {} Hz, {} channel(s)", sample_rate, channels);

    let result = Command::new("ffmpeg")
        .arg("-i").arg(input)
        .arg("-vn")
        .arg("-acodec").arg("pcm_s16le")
        .arg("-ar").arg(sample_rate.to_string())
        .arg("-ac").arg(channels.to_string())
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(&output_path)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(TolkError::ToolNotFound("ffmpeg".into()));
        }
        Err(e) => {
            return Err(TolkError::Preprocess(format!("ffmpeg execution failed: {e}")));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TolkError::ToolFailed(format!("ffmpeg: {stderr}")));
    }

    info!("Normalized audio written to {}", output_path.display());
    Ok(output_path)
}

/// Reads the duration of a media file in seconds using ffprobe.
pub async fn probe_duration(path: &Path) -> Result<f64> {
    let result = Command::new("ffprobe")
        .arg("-v").arg("quiet")
        .arg("-print_format").arg("json")
        .arg("-show_format")
        .arg(path)
        .output()
        .await;

    let output = match result {
        Ok(o) => o,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(TolkError::ToolNotFound("ffprobe".into()));
        }
        Err(e) => {
            return Err(TolkError::Preprocess(format!("ffprobe execution failed: {e}")));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(TolkError::ToolFailed(format!("ffprobe: {stderr}")));
    }

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;

    json["format"]["duration"]
        .as_str()
        .and_then(|d| d.parse::<f64>().ok())
        .ok_or_else(|| TolkError::Preprocess("ffprobe reported no duration".into()))
}

/// Segments a long audio file into smaller chunks for API upload.
///
/// Each chunk will be approximately `chunk_seconds` long. Returns tuples of
/// (chunk_path, offset_seconds) for each segment; short files come back as a
/// single entry pointing at the source.
#[instrument(skip_all)]
pub async fn split_audio(
    source: &Path,
    output_dir: &Path,
    chunk_seconds: u32,
) -> Result<Vec<(PathBuf, f64)>> {
    std::fs::create_dir_all(output_dir)?;

    let total_duration = probe_duration(source).await?;
    info!("Total audio duration: {:.1}s", total_duration);

    let chunk_len = chunk_seconds as f64;

    // Short audio doesn't need splitting
    if total_duration <= chunk_len {
        return Ok(vec![(source.to_path_buf(), 0.0)]);
    }

    let base_name = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("audio");

    let mut segments = Vec::new();
    let mut offset = 0.0;
    let mut idx = 0u32;

    while offset < total_duration {
        let segment_path = output_dir.join(format!("{}_{:04}.wav", base_name, idx));
        let segment_len = chunk_len.min(total_duration - offset);

        extract_segment(source, &segment_path, offset, segment_len).await?;

        debug!("Created segment {} at offset {:.1}s", idx, offset);
        segments.push((segment_path, offset));

        offset += chunk_len;
        idx += 1;
    }

    info!("Created {} audio segments", segments.len());
    Ok(segments)
}

/// Extracts a time segment from an audio file.
async fn extract_segment(source: &Path, dest: &Path, start: f64, length: f64) -> Result<()> {
    // First attempt: stream copy (fast, no quality loss)
    let copy_result = Command::new("ffmpeg")
        .arg("-ss").arg(format!("{:.3}", start))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", length))
        .arg("-c").arg("copy")
        .arg("-y")
        .arg("-loglevel").arg("warning")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;

    if let Ok(status) = copy_result {
        if status.success() && dest.exists() {
            return Ok(());
        }
    }

    // Fallback: re-encode to PCM
    warn!("Stream copy failed, re-encoding segment");

    let encode_result = Command::new("ffmpeg")
        .arg("-ss").arg(format!("{:.3}", start))
        .arg("-i").arg(source)
        .arg("-t").arg(format!("{:.3}", length))
        .arg("-acodec").arg("pcm_s16le")
        .arg("-y")
        .arg("-loglevel").arg("error")
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .await;

    match encode_result {
        Ok(out) if out.status.success() => Ok(()),
        Ok(out) => {
            let err = String::from_utf8_lossy(&out.stderr);
            Err(TolkError::ToolFailed(format!("ffmpeg segment extraction: {err}")))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(TolkError::ToolNotFound("ffmpeg".into()))
        }
        Err(e) => Err(TolkError::Preprocess(format!("ffmpeg error: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preprocess_rejects_missing_input() {
        let temp = tempfile::tempdir().unwrap();
        let result = tokio_test::block_on(preprocess_audio(
            Path::new("/no/such/recording.mp3"),
            temp.path(),
            16_000,
            1,
        ));

        match result {
            Err(TolkError::InvalidInput(msg)) => assert!(msg.contains("recording.mp3")),
            other => panic!("expected InvalidInput, got {:?}", other.map(|p| p.display().to_string())),
        }
    }
}

//! Writing formatted transcripts and summaries to disk.

use super::OutputFormat;
use crate::error::Result;
use crate::summary::Summary;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Paths produced by [`save_output`].
#[derive(Debug)]
pub struct SavedOutput {
    pub transcript_path: PathBuf,
    pub summary_path: Option<PathBuf>,
}

/// Write the formatted transcript and optional summary to disk.
///
/// Files are named after the original audio file:
/// `<stem>_transcript.<ext>` and `<stem>_summary.json`, both under
/// `output_dir` (created if missing). An empty summary writes no file.
pub fn save_output(
    content: &str,
    format: OutputFormat,
    original_audio_path: &Path,
    summary: Option<&Summary>,
    output_dir: &Path,
) -> Result<SavedOutput> {
    std::fs::create_dir_all(output_dir)?;

    let base_name = original_audio_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("transcript");

    let transcript_path =
        output_dir.join(format!("{}_transcript.{}", base_name, format.extension()));
    std::fs::write(&transcript_path, content)?;
    debug!("Wrote transcript to {}", transcript_path.display());

    let summary_path = match summary {
        Some(summary) if !summary.is_empty() => {
            let path = output_dir.join(format!("{}_summary.json", base_name));
            let json = serde_json::to_string_pretty(summary)?;
            std::fs::write(&path, json)?;
            debug!("Wrote summary to {}", path.display());
            Some(path)
        }
        _ => None,
    };

    Ok(SavedOutput {
        transcript_path,
        summary_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_transcript_only() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save_output(
            "hello\n",
            OutputFormat::Text,
            Path::new("/recordings/standup.mp3"),
            None,
            dir.path(),
        )
        .unwrap();

        assert_eq!(
            saved.transcript_path.file_name().unwrap(),
            "standup_transcript.txt"
        );
        assert!(saved.summary_path.is_none());
        assert_eq!(std::fs::read_to_string(&saved.transcript_path).unwrap(), "hello\n");
    }

    #[test]
    fn test_save_with_summary() {
        let dir = tempfile::tempdir().unwrap();
        let summary = Summary {
            key_takeaways: vec!["point".to_string()],
            action_items: vec![],
        };

        let saved = save_output(
            "1\n00:00:00,000 --> 00:00:01,000\nhi\n",
            OutputFormat::Srt,
            Path::new("standup.wav"),
            Some(&summary),
            dir.path(),
        )
        .unwrap();

        let summary_path = saved.summary_path.expect("summary file");
        assert_eq!(summary_path.file_name().unwrap(), "standup_summary.json");
        let written = std::fs::read_to_string(summary_path).unwrap();
        assert!(written.contains("key_takeaways"));
    }

    #[test]
    fn test_empty_summary_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let saved = save_output(
            "text\n",
            OutputFormat::Markdown,
            Path::new("talk.m4a"),
            Some(&Summary::default()),
            dir.path(),
        )
        .unwrap();

        assert!(saved.summary_path.is_none());
    }
}

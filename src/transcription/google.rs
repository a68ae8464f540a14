//! Google Cloud Speech-to-Text engine with speaker diarization.
//!
//! Files longer than a minute require the LongRunningRecognize flow against a
//! Cloud Storage URI, so transcription is a four-step pipeline: upload the
//! normalized WAV to a staging bucket, start the recognition operation, poll
//! until it completes, then delete the staged object (best effort).
//!
//! Authentication uses a bearer token from the GOOGLE_ACCESS_TOKEN
//! environment variable, or from `gcloud auth print-access-token` when the
//! variable is unset.

use super::{build_segments, Transcriber, Transcript, TranscriptSegment, WordAnnotation};
use crate::config::{AudioSettings, DiarizationSettings};
use crate::error::{Result, TolkError};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};
use url::Url;

const SPEECH_API: &str = "https://speech.googleapis.com/v1";
const STORAGE_UPLOAD_API: &str = "https://storage.googleapis.com/upload/storage/v1";
const STORAGE_API: &str = "https://storage.googleapis.com/storage/v1";

/// Google Cloud Speech-to-Text transcriber with diarization enabled.
pub struct GoogleTranscriber {
    http: reqwest::Client,
    bucket: String,
    language: String,
    sample_rate: u32,
    channels: u32,
    min_speakers: u32,
    max_speakers: u32,
    operation_timeout: Duration,
    poll_interval: Duration,
    delete_after: bool,
}

impl GoogleTranscriber {
    /// Create a transcriber from diarization and audio settings.
    ///
    /// Fails with a configuration error when no staging bucket is available.
    pub fn new(
        diarization: &DiarizationSettings,
        audio: &AudioSettings,
        language: &str,
    ) -> Result<Self> {
        let bucket = diarization.bucket().ok_or_else(|| {
            TolkError::Config(
                "No GCS bucket configured. Set diarization.gcs_bucket or the GCS_BUCKET env var."
                    .to_string(),
            )
        })?;

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TolkError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            bucket,
            language: language.to_string(),
            sample_rate: audio.sample_rate,
            channels: audio.channels,
            min_speakers: diarization.min_speakers,
            max_speakers: diarization.max_speakers,
            operation_timeout: Duration::from_secs(diarization.operation_timeout_seconds),
            poll_interval: Duration::from_secs(diarization.poll_interval_seconds.max(1)),
            delete_after: diarization.delete_after_transcription,
        })
    }

    /// Obtain a bearer token for the Google APIs.
    async fn access_token(&self) -> Result<String> {
        if let Ok(token) = std::env::var("GOOGLE_ACCESS_TOKEN") {
            if !token.is_empty() {
                return Ok(token);
            }
        }

        let result = tokio::process::Command::new("gcloud")
            .arg("auth")
            .arg("print-access-token")
            .output()
            .await;

        let output = match result {
            Ok(o) => o,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(TolkError::ToolNotFound("gcloud".into()));
            }
            Err(e) => {
                return Err(TolkError::Transcription(format!(
                    "gcloud execution failed: {e}"
                )));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TolkError::ToolFailed(format!("gcloud: {stderr}")));
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            return Err(TolkError::ToolFailed(
                "gcloud returned an empty access token".into(),
            ));
        }
        Ok(token)
    }

    /// Upload the audio file to the staging bucket; returns the object name.
    #[instrument(skip(self, token, audio_path), fields(bucket = %self.bucket))]
    async fn upload_audio(&self, token: &str, audio_path: &Path) -> Result<String> {
        let file_name = audio_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("audio.wav");
        let object = format!("uploads/{}_{}", uuid::Uuid::new_v4().simple(), file_name);

        let bytes = tokio::fs::read(audio_path).await?;
        debug!("Uploading {} bytes as {}", bytes.len(), object);

        let url = format!("{}/b/{}/o", STORAGE_UPLOAD_API, self.bucket);
        let response = self
            .http
            .post(&url)
            .query(&[("uploadType", "media"), ("name", object.as_str())])
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, "audio/wav")
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TolkError::Gcs(format!(
                "Upload to bucket '{}' failed: {} {}",
                self.bucket, status, body
            )));
        }

        Ok(object)
    }

    /// Start a LongRunningRecognize operation; returns the operation name.
    async fn start_recognition(&self, token: &str, gcs_uri: &str) -> Result<String> {
        let request = serde_json::json!({
            "config": {
                "languageCode": self.language,
                "encoding": "LINEAR16",
                "sampleRateHertz": self.sample_rate,
                "audioChannelCount": self.channels,
                "enableAutomaticPunctuation": true,
                "diarizationConfig": {
                    "enableSpeakerDiarization": true,
                    "minSpeakerCount": self.min_speakers,
                    "maxSpeakerCount": self.max_speakers,
                },
            },
            "audio": { "uri": gcs_uri },
        });

        let url = format!("{}/speech:longrunningrecognize", SPEECH_API);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TolkError::Transcription(format!(
                "LongRunningRecognize request failed: {} {}",
                status, body
            )));
        }

        let operation: Operation = response.json().await?;
        operation
            .name
            .ok_or_else(|| TolkError::Transcription("Operation has no name".into()))
    }

    /// Poll the operation until it completes or the timeout elapses.
    async fn wait_for_operation(&self, token: &str, name: &str) -> Result<RecognizeResponse> {
        let url = format!("{}/operations/{}", SPEECH_API, name);
        let started = Instant::now();

        loop {
            if started.elapsed() > self.operation_timeout {
                return Err(TolkError::Transcription(format!(
                    "Recognition operation {} timed out after {:?}",
                    name, self.operation_timeout
                )));
            }

            tokio::time::sleep(self.poll_interval).await;

            let response = self.http.get(&url).bearer_auth(token).send().await?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(TolkError::Transcription(format!(
                    "Operation poll failed: {} {}",
                    status, body
                )));
            }

            let operation: Operation = response.json().await?;

            if let Some(error) = operation.error {
                return Err(TolkError::Transcription(format!(
                    "Recognition failed: {} (code {})",
                    error.message, error.code
                )));
            }

            if operation.done.unwrap_or(false) {
                return operation.response.ok_or_else(|| {
                    TolkError::Transcription("Completed operation carried no response".into())
                });
            }

            debug!("Operation {} still running", name);
        }
    }

    /// Delete the staged object. Failures are logged, not propagated.
    async fn delete_object(&self, token: &str, object: &str) {
        // The object name contains a slash that must be percent-encoded in
        // the URL path; Url::path_segments_mut does that for us.
        let mut url = match Url::parse(STORAGE_API) {
            Ok(u) => u,
            Err(e) => {
                warn!("Skipping GCS cleanup, bad base URL: {}", e);
                return;
            }
        };
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.extend(["b", self.bucket.as_str(), "o", object]);
        }

        match self.http.delete(url).bearer_auth(token).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("Deleted staged object {}", object);
            }
            Ok(response) => {
                warn!(
                    "Could not delete staged object {} ({})",
                    object,
                    response.status()
                );
            }
            Err(e) => warn!("Could not delete staged object {}: {}", object, e),
        }
    }

    async fn transcribe_inner(&self, audio_path: &Path, language: &str) -> Result<Transcript> {
        let media_id = super::media_id_for(audio_path);

        let token = self.access_token().await?;
        let object = self.upload_audio(&token, audio_path).await?;
        let gcs_uri = format!("gs://{}/{}", self.bucket, object);
        info!("Staged audio at {}", gcs_uri);

        let operation = self.start_recognition(&token, &gcs_uri).await?;
        info!("Recognition operation {} started", operation);

        let response = self.wait_for_operation(&token, &operation).await?;
        let transcript = assemble_transcript(media_id, &response)?.with_language(language);

        if self.delete_after {
            self.delete_object(&token, &object).await;
        }

        Ok(transcript)
    }
}

#[async_trait]
impl Transcriber for GoogleTranscriber {
    async fn transcribe(&self, audio_path: &Path) -> Result<Transcript> {
        let language = self.language.clone();
        self.transcribe_inner(audio_path, &language).await
    }

    async fn transcribe_with_language(
        &self,
        audio_path: &Path,
        language: &str,
    ) -> Result<Transcript> {
        self.transcribe_inner(audio_path, language).await
    }
}

// ============================================================================
// REST response model and adaptation
// ============================================================================

#[derive(Debug, Deserialize)]
struct Operation {
    name: Option<String>,
    done: Option<bool>,
    error: Option<OperationError>,
    response: Option<RecognizeResponse>,
}

#[derive(Debug, Deserialize)]
struct OperationError {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    #[serde(default)]
    results: Vec<SpeechResult>,
}

#[derive(Debug, Deserialize)]
struct SpeechResult {
    #[serde(default)]
    alternatives: Vec<SpeechAlternative>,
}

#[derive(Debug, Deserialize)]
struct SpeechAlternative {
    transcript: Option<String>,
    #[serde(default)]
    words: Vec<WordInfo>,
}

/// Word-level entry of the recognition response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WordInfo {
    word: Option<String>,
    speaker_tag: Option<i32>,
    start_time: Option<String>,
    end_time: Option<String>,
}

/// Build the final transcript from a completed recognition response.
///
/// The full text is the concatenation of each result's best alternative;
/// the diarized word list rides on the last result that carries words.
fn assemble_transcript(media_id: String, response: &RecognizeResponse) -> Result<Transcript> {
    let mut text_chunks: Vec<&str> = Vec::new();
    let mut diarized_words: &[WordInfo] = &[];

    for result in &response.results {
        if let Some(alternative) = result.alternatives.first() {
            if let Some(transcript) = alternative.transcript.as_deref() {
                text_chunks.push(transcript);
            }
            if !alternative.words.is_empty() {
                diarized_words = &alternative.words;
            }
        }
    }

    let words = diarized_words
        .iter()
        .map(adapt_word)
        .collect::<Result<Vec<_>>>()?;

    let segments: Vec<TranscriptSegment> = build_segments(&words)
        .into_iter()
        .map(Into::into)
        .collect();

    let full_text = text_chunks.join(" ").trim().to_string();

    Ok(Transcript::new(media_id, segments).with_text(full_text))
}

/// Translate a vendor word entry into the neutral annotation record.
///
/// A word without a speaker tag would silently corrupt the grouping, so it
/// is rejected outright. Missing timing stays absent and is coerced to 0.0
/// further down.
fn adapt_word(word: &WordInfo) -> Result<WordAnnotation> {
    let text = word.word.clone().unwrap_or_default();

    let speaker = word.speaker_tag.ok_or_else(|| {
        TolkError::InvalidInput(format!(
            "Recognition word {:?} is missing a speaker tag",
            text
        ))
    })?;

    Ok(WordAnnotation::new(
        text,
        speaker,
        parse_offset(word.start_time.as_deref())?,
        parse_offset(word.end_time.as_deref())?,
    ))
}

/// Parse a duration string like "3.400s" into seconds.
fn parse_offset(value: Option<&str>) -> Result<Option<f64>> {
    match value {
        None => Ok(None),
        Some(raw) => {
            let trimmed = raw.strip_suffix('s').unwrap_or(raw);
            trimmed.parse::<f64>().map(Some).map_err(|_| {
                TolkError::Transcription(format!(
                    "Unparseable time offset in recognition response: {:?}",
                    raw
                ))
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offset() {
        assert_eq!(parse_offset(None).unwrap(), None);
        assert_eq!(parse_offset(Some("3.400s")).unwrap(), Some(3.4));
        assert_eq!(parse_offset(Some("0s")).unwrap(), Some(0.0));
        assert!(parse_offset(Some("soon")).is_err());
    }

    #[test]
    fn test_adapt_word_requires_speaker_tag() {
        let word = WordInfo {
            word: Some("hello".to_string()),
            speaker_tag: None,
            start_time: Some("0s".to_string()),
            end_time: Some("0.5s".to_string()),
        };

        match adapt_word(&word) {
            Err(TolkError::InvalidInput(msg)) => assert!(msg.contains("hello")),
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_assemble_transcript_from_response_json() {
        let json = r#"{
            "results": [
                {"alternatives": [{"transcript": "Hi there."}]},
                {"alternatives": [{"transcript": "Bye.", "words": [
                    {"word": "Hi", "speakerTag": 1, "startTime": "0s", "endTime": "0.5s"},
                    {"word": "there", "speakerTag": 1, "startTime": "0.5s", "endTime": "1s"},
                    {"word": "Bye", "speakerTag": 2, "startTime": "1s", "endTime": "1.5s"}
                ]}]}
            ]
        }"#;

        let response: RecognizeResponse = serde_json::from_str(json).unwrap();
        let transcript = assemble_transcript("m".to_string(), &response).unwrap();

        assert_eq!(transcript.full_text, "Hi there. Bye.");
        assert_eq!(transcript.segments.len(), 2);
        assert_eq!(transcript.segments[0].speaker, Some(1));
        assert_eq!(transcript.segments[0].text, "Hi there");
        assert_eq!(transcript.segments[1].speaker, Some(2));
        assert_eq!(transcript.segments[1].end_seconds, 1.5);
        assert!(transcript.has_speakers());
    }

    #[test]
    fn test_assemble_transcript_empty_response() {
        let response = RecognizeResponse { results: vec![] };
        let transcript = assemble_transcript("m".to_string(), &response).unwrap();

        assert!(transcript.segments.is_empty());
        assert!(transcript.full_text.is_empty());
    }
}

//! LLM summarization of transcripts.
//!
//! Distils a long transcript into key takeaways and action items using the
//! OpenAI Chat API. Summarization is optional and best-effort: the transcribe
//! pipeline treats a failure here as a warning, not a fatal error.

use crate::config::SummarySettings;
use crate::error::{Result, TolkError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs, ResponseFormat,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarises meeting transcripts. \
    Given the transcript, extract the key takeaways and action items. \
    Respond in valid JSON with two arrays: 'key_takeaways' and 'action_items'.";

/// Structured summary of a transcript.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Summary {
    /// High-level points capturing the essence of the discussion.
    #[serde(default)]
    pub key_takeaways: Vec<String>,
    /// Specific follow-up tasks or recommendations.
    #[serde(default)]
    pub action_items: Vec<String>,
}

impl Summary {
    /// Whether the summary carries any content.
    pub fn is_empty(&self) -> bool {
        self.key_takeaways.is_empty() && self.action_items.is_empty()
    }
}

/// Chat-completion based transcript summarizer.
pub struct Summarizer {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl Summarizer {
    /// Create a summarizer from settings.
    pub fn new(settings: &SummarySettings) -> Self {
        Self {
            client: create_client(),
            model: settings.model.clone(),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
        }
    }

    /// Produce a summary consisting of key takeaways and action items.
    ///
    /// An empty transcript yields an empty summary without an API call.
    #[instrument(skip(self, transcript))]
    pub async fn generate(&self, transcript: &str) -> Result<Summary> {
        if transcript.trim().is_empty() {
            return Ok(Summary::default());
        }

        let user_prompt = format!(
            "Transcript:\n{}\n\nPlease return a JSON object with the fields 'key_takeaways' \
             and 'action_items' containing lists of bullet points summarising the discussion.",
            transcript
        );

        let messages: Vec<ChatCompletionRequestMessage> = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(SYSTEM_PROMPT)
                .build()
                .map_err(|e| TolkError::Summarization(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_prompt)
                .build()
                .map_err(|e| TolkError::Summarization(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .max_tokens(self.max_tokens)
            .response_format(ResponseFormat::JsonObject)
            .build()
            .map_err(|e| TolkError::Summarization(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| TolkError::OpenAI(format!("Summarization request failed: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| TolkError::Summarization("Empty response from LLM".to_string()))?;

        debug!("Summary response: {} chars", content.len());
        Ok(parse_summary(content))
    }
}

/// Parse the model's JSON reply, degrading to an empty summary on mismatch.
fn parse_summary(content: &str) -> Summary {
    match serde_json::from_str::<Summary>(content) {
        Ok(summary) => summary,
        Err(e) => {
            warn!("Summary response was not the expected JSON shape: {}", e);
            Summary::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_summary_full() {
        let summary = parse_summary(
            r#"{"key_takeaways": ["Q3 is on track"], "action_items": ["Send the report"]}"#,
        );
        assert_eq!(summary.key_takeaways, vec!["Q3 is on track"]);
        assert_eq!(summary.action_items, vec!["Send the report"]);
        assert!(!summary.is_empty());
    }

    #[test]
    fn test_parse_summary_partial_fields() {
        let summary = parse_summary(r#"{"key_takeaways": ["One point"]}"#);
        assert_eq!(summary.key_takeaways.len(), 1);
        assert!(summary.action_items.is_empty());
    }

    #[test]
    fn test_parse_summary_garbage() {
        let summary = parse_summary("Sure! Here are the takeaways:");
        assert!(summary.is_empty());
    }
}

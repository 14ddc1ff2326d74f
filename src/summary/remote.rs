//! Remote Summarization Service
//!
//! Calls an OpenAI-style chat-completion endpoint to summarize text.
//! Every failure mode is typed; the orchestrator absorbs them all and
//! falls back to the local engine.

use crate::config::Config;
use crate::error::RemoteError;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Environment variable holding the service credential.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: String,
}

/// Handles requests to the hosted summarization model.
#[derive(Clone)]
pub struct RemoteSummarizer {
    base_url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    timeout: Duration,
}

impl RemoteSummarizer {
    /// Create a new remote summarizer from config
    pub fn new(config: &Config) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            model: config.api_model.clone(),
            temperature: config.summary_temperature,
            max_tokens: config.summary_max_tokens,
            timeout: Duration::from_secs(config.api_timeout_secs),
        }
    }

    /// Request a summary of `text` in at most `max_sentences` sentences.
    pub async fn summarize(&self, text: &str, max_sentences: usize) -> Result<String, RemoteError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| RemoteError::MissingCredential)?;

        let prompt = format!("Summarize the following text in {max_sentences} sentences:\n\n{text}");

        let client = reqwest::Client::new();
        let response = client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&serde_json::json!({
                "model": self.model,
                "messages": [{"role": "user", "content": prompt}],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens,
            }))
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Summarization API error ({}): {}", status, body);
            return Err(RemoteError::Status(status.as_u16()));
        }

        debug!("Summarization raw body: {}", body);

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| RemoteError::Malformed(e.to_string()))?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| RemoteError::Malformed("response contained no choices".to_string()))?;

        let summary = choice.message.content.trim().to_string();
        if summary.is_empty() {
            return Err(RemoteError::Malformed("empty completion".to_string()));
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_deserialization() {
        let body = r#"{"choices":[{"message":{"role":"assistant","content":" A summary. "}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, " A summary. ");
    }

    #[test]
    fn test_response_without_choices_is_malformed() {
        let body = r#"{"choices":[]}"#;
        let parsed: ChatResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.choices.is_empty());
    }
}

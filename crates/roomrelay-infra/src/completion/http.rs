//! HttpCompletionClient -- [`CompletionClient`] for OpenAI-compatible APIs.
//!
//! Sends a single non-streaming request to `{base_url}/chat/completions`
//! with the configured persona as the system message and the submitted text
//! as the user message. The reply is the first choice's message content.
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output. Requests carry no timeout of their own and
//! are bounded only by the transport's defaults.

use secrecy::{ExposeSecret, SecretString};

use roomrelay_core::completion::client::CompletionClient;
use roomrelay_types::completion::CompletionError;
use roomrelay_types::config::CompletionConfig;

use super::types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};

/// Completion client for any server speaking the OpenAI chat completions API.
pub struct HttpCompletionClient {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
    persona: String,
    max_tokens: u32,
    temperature: Option<f64>,
}

// No Debug derive: keeps the client (and its key) out of log output.

impl HttpCompletionClient {
    /// Create a client from the completion config and a resolved API key.
    pub fn new(config: &CompletionConfig, api_key: SecretString) -> Result<Self, CompletionError> {
        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| CompletionError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            persona: config.persona.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn to_request(&self, prompt: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(&self.persona), ChatMessage::user(prompt)],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        }
    }
}

/// Parse a `Retry-After` header given in whole seconds.
fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(|secs| secs.saturating_mul(1000))
}

impl CompletionClient for HttpCompletionClient {
    fn name(&self) -> &str {
        "openai_compatible"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let body = self.to_request(prompt);

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| CompletionError::Provider {
                message: format!("HTTP request failed: {e}"),
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = retry_after_ms(response.headers());
            let error_body = response.text().await.unwrap_or_default();
            return Err(match status.as_u16() {
                401 | 403 => CompletionError::AuthenticationFailed,
                429 => CompletionError::RateLimited {
                    retry_after_ms: retry_after,
                },
                _ => CompletionError::Provider {
                    message: format!("HTTP {status}: {error_body}"),
                },
            });
        }

        let parsed: ChatCompletionResponse = response.json().await.map_err(|e| {
            CompletionError::Deserialization(format!("failed to parse response: {e}"))
        })?;

        match parsed.first_text() {
            Some(text) if !text.trim().is_empty() => Ok(text),
            _ => Err(CompletionError::EmptyReply),
        }
    }
}

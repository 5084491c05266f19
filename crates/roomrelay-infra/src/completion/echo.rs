//! Offline completion backend that acknowledges the prompt verbatim.
//!
//! Useful for local development and smoke tests where no API key is
//! available.

use roomrelay_core::completion::client::CompletionClient;
use roomrelay_types::completion::CompletionError;

pub struct EchoCompletionClient;

impl EchoCompletionClient {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EchoCompletionClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Acknowledgement text for `prompt`.
pub fn acknowledge(prompt: &str) -> String {
    format!("「{prompt}」を受け取りました。")
}

impl CompletionClient for EchoCompletionClient {
    fn name(&self) -> &str {
        "echo"
    }

    fn model(&self) -> &str {
        "echo"
    }

    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        Ok(acknowledge(prompt))
    }
}

//! Relay configuration types.
//!
//! `RelayConfig` represents the `config.toml` in the data directory that
//! controls the listen address and the completion backend.

use serde::{Deserialize, Serialize};

use crate::completion::ProviderKind;

/// System instruction sent with every completion request unless overridden.
pub const DEFAULT_PERSONA: &str = "You are a friendly assistant taking part in a shared chat room. \
Reply briefly and conversationally to the latest message.";

/// Top-level configuration for the relay.
///
/// Loaded from `~/.roomrelay/config.toml`. All fields have sensible defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub completion: CompletionConfig,
}

/// HTTP listen address and in-memory session limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Seconds without traffic after which a room's in-memory session is
    /// dropped. Its history stays in storage.
    #[serde(default = "default_idle_session_secs")]
    pub idle_session_secs: u64,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8787
}

fn default_idle_session_secs() -> u64 {
    900
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            idle_session_secs: default_idle_session_secs(),
        }
    }
}

/// Completion backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    #[serde(default)]
    pub provider: ProviderKind,

    /// Base URL of the OpenAI-compatible API (without `/chat/completions`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// System instruction sent with every request.
    #[serde(default = "default_persona")]
    pub persona: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_persona() -> String {
    DEFAULT_PERSONA.to_string()
}

fn default_max_tokens() -> u32 {
    1024
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            persona: default_persona(),
            max_tokens: default_max_tokens(),
            temperature: None,
        }
    }
}

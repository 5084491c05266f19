//! Completion service types for roomrelay.
//!
//! Errors and provider selection for the external language-model call that
//! produces the AI reply to each submitted message.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors from the external completion service.
///
/// Every variant is terminal for the submission that caused it: the relay
/// never retries a completion.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("completion returned no reply text")]
    EmptyReply,

    #[error("client configuration error: {0}")]
    Configuration(String),
}

/// Which completion backend the relay talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderKind {
    /// Any endpoint speaking the OpenAI chat-completions protocol.
    #[serde(rename = "openai_compatible")]
    OpenAiCompatible,
    /// Offline acknowledgement reply, no network involved.
    Echo,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::OpenAiCompatible => write!(f, "openai_compatible"),
            ProviderKind::Echo => write!(f, "echo"),
        }
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openai_compatible" => Ok(ProviderKind::OpenAiCompatible),
            "echo" => Ok(ProviderKind::Echo),
            other => Err(format!("invalid provider kind: '{other}'")),
        }
    }
}

impl Default for ProviderKind {
    fn default() -> Self {
        ProviderKind::OpenAiCompatible
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_kind_roundtrip() {
        for kind in [ProviderKind::OpenAiCompatible, ProviderKind::Echo] {
            let s = kind.to_string();
            let parsed: ProviderKind = s.parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_provider_kind_serde() {
        let json = serde_json::to_string(&ProviderKind::OpenAiCompatible).unwrap();
        assert_eq!(json, "\"openai_compatible\"");
        let parsed: ProviderKind = serde_json::from_str("\"echo\"").unwrap();
        assert_eq!(parsed, ProviderKind::Echo);
    }

    #[test]
    fn test_provider_kind_rejects_unknown() {
        assert!("bedrock".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_completion_error_display() {
        let err = CompletionError::Provider {
            message: "HTTP 500".to_string(),
        };
        assert_eq!(err.to_string(), "provider error: HTTP 500");
    }
}

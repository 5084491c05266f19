//! Completion service clients.
//!
//! Concrete implementations of the [`CompletionClient`] trait defined in
//! `roomrelay-core`, plus a factory ([`create_completion_client`]) that
//! picks one from the relay's [`CompletionConfig`].

pub mod echo;
pub mod http;
pub mod types;

use secrecy::SecretString;

use roomrelay_core::completion::box_client::BoxCompletionClient;
use roomrelay_types::completion::{CompletionError, ProviderKind};
use roomrelay_types::config::CompletionConfig;

use self::echo::EchoCompletionClient;
use self::http::HttpCompletionClient;

/// Create a [`BoxCompletionClient`] from the completion config.
///
/// `api_key` is the already-resolved key value. The OpenAI-compatible
/// backend refuses to start without one; the echo backend ignores it.
pub fn create_completion_client(
    config: &CompletionConfig,
    api_key: Option<&str>,
) -> Result<BoxCompletionClient, CompletionError> {
    match config.provider {
        ProviderKind::OpenAiCompatible => {
            let key = api_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
                CompletionError::Configuration(format!(
                    "no API key found in environment variable {}",
                    config.api_key_env
                ))
            })?;
            let client = HttpCompletionClient::new(config, SecretString::from(key.to_string()))?;
            Ok(BoxCompletionClient::new(client))
        }
        ProviderKind::Echo => Ok(BoxCompletionClient::new(EchoCompletionClient::new())),
    }
}

/// Read the API key named by `config.api_key_env` from the environment.
pub fn resolve_api_key(config: &CompletionConfig) -> Option<String> {
    std::env::var(&config.api_key_env).ok()
}

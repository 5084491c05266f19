//! CompletionClient trait definition.
//!
//! One prompt in, one reply out. No streaming and no retries: a failed call
//! is surfaced to the caller immediately.

use roomrelay_types::completion::CompletionError;

/// Trait for completion backends (OpenAI-compatible HTTP, echo, ...).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in roomrelay-infra.
pub trait CompletionClient: Send + Sync {
    /// Human-readable backend name (e.g., "openai_compatible").
    fn name(&self) -> &str;

    /// Model identifier requests are sent with.
    fn model(&self) -> &str;

    /// Send `prompt` (with the backend's persona instruction) and return the reply text.
    fn complete(
        &self,
        prompt: &str,
    ) -> impl std::future::Future<Output = Result<String, CompletionError>> + Send;
}

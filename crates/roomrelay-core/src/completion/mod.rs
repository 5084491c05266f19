//! Completion service abstractions for roomrelay.
//!
//! - `CompletionClient`: RPITIT trait for concrete completion backends
//! - `BoxCompletionClient`: Object-safe wrapper for runtime backend selection

pub mod box_client;
pub mod client;

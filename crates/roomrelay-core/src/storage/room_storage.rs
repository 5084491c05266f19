//! Fast room storage trait.
//!
//! Defines the interface for room-scoped key-value storage holding the live
//! history snapshot. Implementations live in roomrelay-infra.

use roomrelay_types::error::RepositoryError;

/// Trait for room-scoped key-value persistent storage.
///
/// Stores arbitrary JSON values keyed by room ID and string key.
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait FastRoomStorage: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        room_id: &str,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<serde_json::Value>, RepositoryError>> + Send;

    /// Overwrite the value for a key (upsert).
    fn put(
        &self,
        room_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}

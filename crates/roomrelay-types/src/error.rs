use thiserror::Error;

use crate::completion::CompletionError;

/// Errors surfaced by room operations.
///
/// Only `Validation`, `Persistence` and `Completion` ever reach a caller.
/// `PermanentLog` is produced by the permanent log writer and swallowed by
/// the history store after it has been logged.
#[derive(Debug, Error)]
pub enum RoomError {
    #[error("invalid message: {0}")]
    Validation(String),

    #[error("failed to persist room history: {0}")]
    Persistence(String),

    #[error("completion failed: {0}")]
    Completion(#[from] CompletionError),

    #[error("permanent log write failed: {0}")]
    PermanentLog(String),
}

impl RoomError {
    /// Whether the caller supplied bad input (as opposed to a server-side failure).
    pub fn is_client_error(&self) -> bool {
        matches!(self, RoomError::Validation(_))
    }
}

/// Errors from storage adapter operations (used by trait definitions in roomrelay-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

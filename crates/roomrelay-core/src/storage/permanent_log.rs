//! Permanent log trait and the best-effort writer used by the history store.

use std::sync::Arc;

use roomrelay_types::error::{RepositoryError, RoomError};
use roomrelay_types::message::{Message, PermanentLogRecord};
use tracing::debug;

/// Append-only audit store of every accepted message.
///
/// Records are never updated or deleted. Implementations live in
/// roomrelay-infra (e.g., `SqlitePermanentLog`).
pub trait PermanentLog: Send + Sync {
    /// Append one record.
    fn insert(
        &self,
        record: &PermanentLogRecord,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Most recent records for a room, newest first.
    fn recent(
        &self,
        room_id: &str,
        limit: u32,
    ) -> impl std::future::Future<Output = Result<Vec<PermanentLogRecord>, RepositoryError>> + Send;
}

/// Turns accepted messages into permanent log records and writes them.
///
/// Failures come back as [`RoomError::PermanentLog`]; deciding whether they
/// matter is left to the caller.
pub struct PermanentLogWriter<L: PermanentLog> {
    log: Arc<L>,
}

impl<L: PermanentLog> Clone for PermanentLogWriter<L> {
    fn clone(&self) -> Self {
        Self {
            log: Arc::clone(&self.log),
        }
    }
}

impl<L: PermanentLog> PermanentLogWriter<L> {
    pub fn new(log: Arc<L>) -> Self {
        Self { log }
    }

    /// Append `message` to the permanent log under `room_id`.
    pub async fn write(&self, room_id: &str, message: &Message) -> Result<(), RoomError> {
        let record = PermanentLogRecord::from_message(room_id, message).ok_or_else(|| {
            RoomError::PermanentLog(format!(
                "timestamp {} cannot be represented",
                message.timestamp
            ))
        })?;

        self.log
            .insert(&record)
            .await
            .map_err(|e| RoomError::PermanentLog(e.to_string()))?;

        debug!(room_id, sender = %record.sender, "Permanent log record written");
        Ok(())
    }
}

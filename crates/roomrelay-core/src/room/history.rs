//! Per-room message history backed by a fast-storage snapshot.
//!
//! `RoomHistoryStore` keeps the authoritative, ordered message list for one
//! room in memory. Every accepted message triggers a full snapshot
//! write-back to fast storage followed by a best-effort permanent log write.
//! The snapshot write is the one that decides success; the permanent log is
//! an audit trail and its failures are only logged.

use std::sync::Arc;

use roomrelay_types::error::RoomError;
use roomrelay_types::message::{HISTORY_KEY, Message, NewMessage, format_written_at};
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::retention;
use crate::storage::permanent_log::{PermanentLog, PermanentLogWriter};
use crate::storage::room_storage::FastRoomStorage;

/// In-memory state of one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomState {
    pub room_id: String,
    /// Insertion order is arrival order.
    pub messages: Vec<Message>,
    pub initialized: bool,
}

impl RoomState {
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            messages: Vec::new(),
            initialized: false,
        }
    }
}

/// Owns one room's message list and its two persistence fan-outs.
///
/// Not internally synchronized: callers must hold exclusive access for the
/// whole load-mutate-prune-store cycle (the room router wraps each session
/// in an async mutex).
pub struct RoomHistoryStore<S: FastRoomStorage, L: PermanentLog> {
    state: RoomState,
    storage: Arc<S>,
    log_writer: PermanentLogWriter<L>,
    clock: Arc<dyn Clock>,
}

impl<S: FastRoomStorage, L: PermanentLog> RoomHistoryStore<S, L> {
    pub fn new(
        room_id: impl Into<String>,
        storage: Arc<S>,
        log: Arc<L>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            state: RoomState::new(room_id),
            storage,
            log_writer: PermanentLogWriter::new(log),
            clock,
        }
    }

    pub fn room_id(&self) -> &str {
        &self.state.room_id
    }

    pub fn is_initialized(&self) -> bool {
        self.state.initialized
    }

    /// Read-only view of the raw in-memory state (not pruned).
    pub fn state(&self) -> &RoomState {
        &self.state
    }

    /// Load the persisted snapshot once.
    ///
    /// A missing snapshot is an empty history. Calling this again after a
    /// successful load is a no-op, so an in-memory history that is newer than
    /// the stored snapshot is never overwritten. On failure the store stays
    /// uninitialized and the next call tries again.
    pub async fn initialize(&mut self) -> Result<(), RoomError> {
        if self.state.initialized {
            return Ok(());
        }

        let stored = self
            .storage
            .get(&self.state.room_id, HISTORY_KEY)
            .await
            .map_err(|e| RoomError::Persistence(format!("failed to load snapshot: {e}")))?;

        let mut messages: Vec<Message> = match stored {
            Some(value) => serde_json::from_value(value).map_err(|e| {
                RoomError::Persistence(format!("stored snapshot is not a message list: {e}"))
            })?,
            None => Vec::new(),
        };
        let loaded = messages.len();

        retention::retain(&mut messages, self.clock.now_ms());
        debug!(
            room_id = %self.state.room_id,
            loaded,
            retained = messages.len(),
            "Room history restored from snapshot"
        );

        self.state.messages = messages;
        self.state.initialized = true;
        Ok(())
    }

    /// Accept a message into the room.
    ///
    /// Validates, stamps the acceptance time (unless the caller pinned one),
    /// prunes, and writes the full snapshot. A pinned timestamp must not lie
    /// after the acceptance time. The in-memory history only
    /// changes once the snapshot write has succeeded. The permanent log write
    /// that follows never fails the append.
    pub async fn append(&mut self, new_message: NewMessage) -> Result<Message, RoomError> {
        let now = self.clock.now_ms();
        validate(&new_message, now)?;
        self.initialize().await?;

        let message = Message {
            sender: new_message.sender,
            text: new_message.text,
            timestamp: new_message.timestamp.unwrap_or(now),
        };

        let mut next = self.state.messages.clone();
        next.push(message.clone());
        retention::retain(&mut next, now);

        self.persist(&next).await?;
        self.state.messages = next;

        info!(
            room_id = %self.state.room_id,
            sender = %message.sender,
            history_len = self.state.messages.len(),
            "Message accepted"
        );

        if let Err(e) = self.log_writer.write(&self.state.room_id, &message).await {
            warn!(
                room_id = %self.state.room_id,
                error = %e,
                "Permanent log write failed; history snapshot is unaffected"
            );
        }

        Ok(message)
    }

    /// Whether nothing in memory is inside the retention window right now.
    pub fn is_empty(&self) -> bool {
        let now = self.clock.now_ms();
        !self
            .state
            .messages
            .iter()
            .any(|m| retention::is_retained(m, now))
    }

    /// Current history, pruned to the retention window at call time.
    pub fn list(&self) -> Vec<Message> {
        retention::prune(&self.state.messages, self.clock.now_ms())
    }

    async fn persist(&self, messages: &[Message]) -> Result<(), RoomError> {
        let snapshot = serde_json::to_value(messages)
            .map_err(|e| RoomError::Persistence(format!("failed to encode snapshot: {e}")))?;

        self.storage
            .put(&self.state.room_id, HISTORY_KEY, &snapshot)
            .await
            .map_err(|e| RoomError::Persistence(e.to_string()))
    }
}

/// Reject messages with a blank sender, blank text, or a pinned timestamp
/// that is later than `now_ms` or cannot be written to the permanent log.
pub fn validate(message: &NewMessage, now_ms: i64) -> Result<(), RoomError> {
    if message.sender.trim().is_empty() {
        return Err(RoomError::Validation("sender must not be empty".to_string()));
    }
    if message.text.trim().is_empty() {
        return Err(RoomError::Validation("text must not be empty".to_string()));
    }
    if let Some(timestamp) = message.timestamp {
        if timestamp > now_ms {
            return Err(RoomError::Validation(format!(
                "timestamp {timestamp} is in the future"
            )));
        }
        if format_written_at(timestamp).is_none() {
            return Err(RoomError::Validation(format!(
                "timestamp {timestamp} is out of range"
            )));
        }
    }
    Ok(())
}

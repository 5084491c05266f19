//! Room message and permanent log record types.
//!
//! A room's live history is an ordered list of [`Message`] values. Every
//! accepted message is also mirrored into the permanent log as a
//! [`PermanentLogRecord`].

use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Sender label used for replies produced by the completion service.
pub const AI_IDENTITY: &str = "AI";

/// Room identifier used when a request does not name one.
pub const DEFAULT_ROOM_ID: &str = "default";

/// Sender used for submissions that do not name one.
pub const DEFAULT_SENDER: &str = "user";

/// Fast-storage key under which a room's history snapshot is kept.
pub const HISTORY_KEY: &str = "history";

/// Format of `written_at` in permanent log records (UTC, no zone suffix).
pub const WRITTEN_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// A single accepted chat message in a room.
///
/// Messages are immutable once accepted; they only ever leave a room's
/// history by falling out of the retention window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who wrote the message. Older snapshots stored this as `user`.
    #[serde(alias = "user")]
    pub sender: String,
    pub text: String,
    /// Acceptance time in epoch milliseconds (UTC).
    pub timestamp: i64,
}

impl Message {
    /// Whether this message was written by the completion service.
    pub fn is_ai(&self) -> bool {
        self.sender == AI_IDENTITY
    }
}

/// A message submitted for appending, before the store accepts it.
///
/// `timestamp` is normally left empty and assigned at acceptance time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    #[serde(alias = "user")]
    pub sender: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,
}

impl NewMessage {
    pub fn new(sender: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            timestamp: None,
        }
    }

    /// Pin the acceptance timestamp instead of using the store's clock.
    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// One row of the append-only permanent log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermanentLogRecord {
    pub text: String,
    pub sender: String,
    /// `YYYY-MM-DD HH:MM:SS.mmm` in UTC.
    pub written_at: String,
    pub room_id: String,
}

impl PermanentLogRecord {
    /// Build the log record for an accepted message.
    ///
    /// Returns `None` when the timestamp is outside chrono's representable range.
    pub fn from_message(room_id: &str, message: &Message) -> Option<Self> {
        Some(Self {
            text: message.text.clone(),
            sender: message.sender.clone(),
            written_at: format_written_at(message.timestamp)?,
            room_id: room_id.to_string(),
        })
    }
}

/// Render epoch milliseconds in the permanent log's timestamp format.
pub fn format_written_at(timestamp_ms: i64) -> Option<String> {
    DateTime::from_timestamp_millis(timestamp_ms)
        .map(|dt| dt.format(WRITTEN_AT_FORMAT).to_string())
}

/// Resolve an optional, possibly blank room identifier to a concrete one.
pub fn resolve_room_id(room_id: Option<&str>) -> String {
    match room_id {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => DEFAULT_ROOM_ID.to_string(),
    }
}

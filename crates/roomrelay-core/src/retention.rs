//! Rolling retention window for room history.
//!
//! A message is retained while `timestamp >= now - RETENTION_WINDOW_MS`.
//! The window is a fixed seven days measured in UTC epoch milliseconds.
//! Everything here is pure: the caller supplies `now`.

use roomrelay_types::message::Message;

/// Seven days in milliseconds.
pub const RETENTION_WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Oldest timestamp still inside the window at `now`.
pub fn cutoff(now_ms: i64) -> i64 {
    now_ms.saturating_sub(RETENTION_WINDOW_MS)
}

/// Whether `message` is inside the window at `now`.
pub fn is_retained(message: &Message, now_ms: i64) -> bool {
    message.timestamp >= cutoff(now_ms)
}

/// Return the messages still inside the window, preserving order.
pub fn prune(messages: &[Message], now_ms: i64) -> Vec<Message> {
    let cutoff = cutoff(now_ms);
    messages
        .iter()
        .filter(|m| m.timestamp >= cutoff)
        .cloned()
        .collect()
}

/// In-place variant of [`prune`].
pub fn retain(messages: &mut Vec<Message>, now_ms: i64) {
    let cutoff = cutoff(now_ms);
    messages.retain(|m| m.timestamp >= cutoff);
}

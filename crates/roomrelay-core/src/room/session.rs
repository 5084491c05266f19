//! Per-room orchestrator for chat submissions.
//!
//! A `RoomSession` wraps one room's [`RoomHistoryStore`] and the shared
//! completion client. A submission records the user's message, asks the
//! completion service for a reply, and records the reply as the AI.

use std::sync::Arc;

use roomrelay_types::error::RoomError;
use roomrelay_types::message::{AI_IDENTITY, Message, NewMessage};
use tracing::{Instrument, info_span, warn};

use crate::completion::client::CompletionClient;
use crate::storage::permanent_log::PermanentLog;
use crate::storage::room_storage::FastRoomStorage;

use super::history::RoomHistoryStore;

/// Lifecycle of a room session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// History has not been loaded from fast storage yet.
    Uninitialized,
    /// History is loaded and authoritative in memory.
    Ready,
}

/// Orchestrates submissions and history reads for a single room.
pub struct RoomSession<S: FastRoomStorage, L: PermanentLog, C: CompletionClient> {
    store: RoomHistoryStore<S, L>,
    completion: Arc<C>,
    /// Epoch milliseconds of the last routed operation.
    last_used_ms: i64,
}

impl<S: FastRoomStorage, L: PermanentLog, C: CompletionClient> RoomSession<S, L, C> {
    pub fn new(store: RoomHistoryStore<S, L>, completion: Arc<C>) -> Self {
        Self {
            store,
            completion,
            last_used_ms: 0,
        }
    }

    pub fn room_id(&self) -> &str {
        self.store.room_id()
    }

    /// Derived from the underlying store, which owns the loaded flag.
    pub fn state(&self) -> SessionState {
        if self.store.is_initialized() {
            SessionState::Ready
        } else {
            SessionState::Uninitialized
        }
    }

    pub fn last_used_ms(&self) -> i64 {
        self.last_used_ms
    }

    pub fn mark_used(&mut self, now_ms: i64) {
        self.last_used_ms = now_ms;
    }

    /// Whether the room holds no retained messages.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    async fn ensure_ready(&mut self) -> Result<(), RoomError> {
        self.store.initialize().await
    }

    /// Record a user message, obtain the AI reply, record it, and return it.
    ///
    /// The user message is durably snapshotted before the completion call
    /// starts, so it always precedes its reply. If the completion fails the
    /// user message stays recorded and no AI message is appended.
    pub async fn submit_message(&mut self, sender: &str, text: &str) -> Result<String, RoomError> {
        if text.trim().is_empty() {
            return Err(RoomError::Validation("text must not be empty".to_string()));
        }
        self.ensure_ready().await?;

        self.store.append(NewMessage::new(sender, text)).await?;

        let span = info_span!(
            "gen_ai.complete",
            gen_ai.system = self.completion.name(),
            gen_ai.request.model = %self.completion.model(),
            room_id = %self.store.room_id(),
        );
        let reply = match self.completion.complete(text).instrument(span).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(room_id = %self.store.room_id(), error = %e, "Completion failed; no reply recorded");
                return Err(RoomError::Completion(e));
            }
        };

        self.store
            .append(NewMessage::new(AI_IDENTITY, reply.clone()))
            .await?;

        Ok(reply)
    }

    /// Record a message without asking for a reply.
    pub async fn record_message(&mut self, message: NewMessage) -> Result<Message, RoomError> {
        self.ensure_ready().await?;
        self.store.append(message).await
    }

    /// The room's history, pruned to the retention window.
    pub async fn history(&mut self) -> Result<Vec<Message>, RoomError> {
        self.ensure_ready().await?;
        Ok(self.store.list())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::test_support::{DAY_MS, MockLog, MockStorage, NOW, StubCompletion};
    use roomrelay_types::completion::CompletionError;

    type TestSession = RoomSession<MockStorage, MockLog, StubCompletion>;

    fn session_with(
        storage: &Arc<MockStorage>,
        completion: StubCompletion,
    ) -> (TestSession, Arc<StubCompletion>) {
        let completion = Arc::new(completion);
        let store = RoomHistoryStore::new(
            "lobby",
            Arc::clone(storage),
            Arc::new(MockLog::default()),
            Arc::new(FixedClock::new(NOW)),
        );
        (RoomSession::new(store, Arc::clone(&completion)), completion)
    }

    fn pairs(messages: &[Message]) -> Vec<(String, String)> {
        messages
            .iter()
            .map(|m| (m.sender.clone(), m.text.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_submit_records_user_then_ai() {
        let storage = Arc::new(MockStorage::default());
        let (mut session, _) = session_with(&storage, StubCompletion::replying("hi there"));

        let reply = session.submit_message("alice", "hello").await.unwrap();
        assert_eq!(reply, "hi there");

        let history = session.history().await.unwrap();
        assert_eq!(
            pairs(&history),
            vec![
                ("alice".to_string(), "hello".to_string()),
                (AI_IDENTITY.to_string(), "hi there".to_string()),
            ]
        );
        assert_eq!(storage.snapshot("lobby").unwrap(), history);
    }

    #[tokio::test]
    async fn test_submit_completion_failure_keeps_user_message_only() {
        let storage = Arc::new(MockStorage::default());
        let (mut session, completion) = session_with(&storage, StubCompletion::failing());

        let err = session.submit_message("alice", "hello").await.unwrap_err();
        assert!(matches!(
            err,
            RoomError::Completion(CompletionError::Provider { .. })
        ));
        assert_eq!(completion.calls(), 1);

        let history = session.history().await.unwrap();
        assert_eq!(pairs(&history), vec![("alice".to_string(), "hello".to_string())]);
    }

    #[tokio::test]
    async fn test_submit_empty_text_is_validation_failure() {
        let storage = Arc::new(MockStorage::default());
        let (mut session, completion) = session_with(&storage, StubCompletion::replying("x"));

        let err = session.submit_message("alice", "   ").await.unwrap_err();
        assert!(matches!(err, RoomError::Validation(_)));
        assert_eq!(completion.calls(), 0);
        assert_eq!(storage.put_calls(), 0);
    }

    #[tokio::test]
    async fn test_submit_persistence_failure_skips_completion() {
        let storage = Arc::new(MockStorage::default());
        storage.fail_puts(true);
        let (mut session, completion) = session_with(&storage, StubCompletion::replying("x"));

        let err = session.submit_message("alice", "hello").await.unwrap_err();
        assert!(matches!(err, RoomError::Persistence(_)));
        assert_eq!(completion.calls(), 0);
    }

    #[tokio::test]
    async fn test_state_transitions_to_ready() {
        let storage = Arc::new(MockStorage::default());
        let (mut session, _) = session_with(&storage, StubCompletion::replying("x"));

        assert_eq!(session.state(), SessionState::Uninitialized);
        session.history().await.unwrap();
        assert_eq!(session.state(), SessionState::Ready);
    }

    #[tokio::test]
    async fn test_state_stays_uninitialized_after_failed_load() {
        let storage = Arc::new(MockStorage::default());
        storage.fail_gets(true);
        let (mut session, completion) = session_with(&storage, StubCompletion::replying("x"));

        let err = session.submit_message("alice", "hello").await.unwrap_err();
        assert!(matches!(err, RoomError::Persistence(_)));
        assert_eq!(session.state(), SessionState::Uninitialized);
        assert_eq!(completion.calls(), 0);

        storage.fail_gets(false);
        session.record_message(NewMessage::new("alice", "retry")).await.unwrap();
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(storage.get_calls(), 2);
    }

    #[tokio::test]
    async fn test_history_excludes_eight_day_old_message() {
        let storage = Arc::new(MockStorage::default());
        let (mut session, _) = session_with(&storage, StubCompletion::replying("x"));

        session
            .record_message(NewMessage::new("alice", "ancient").at(NOW - 8 * DAY_MS))
            .await
            .unwrap();
        session
            .record_message(NewMessage::new("alice", "recent"))
            .await
            .unwrap();

        let history = session.history().await.unwrap();
        assert_eq!(pairs(&history), vec![("alice".to_string(), "recent".to_string())]);
    }

    #[tokio::test]
    async fn test_history_restores_from_snapshot() {
        let storage = Arc::new(MockStorage::default());
        storage.seed(
            "lobby",
            &[Message {
                sender: "bob".to_string(),
                text: "from before restart".to_string(),
                timestamp: NOW - DAY_MS,
            }],
        );
        let (mut session, _) = session_with(&storage, StubCompletion::replying("x"));

        let history = session.history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].text, "from before restart");
    }
}

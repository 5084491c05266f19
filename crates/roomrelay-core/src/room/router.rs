//! Room router: maps room identifiers to their exclusive sessions.
//!
//! Sessions are created lazily on first access. Each session sits behind its
//! own async mutex, held for the full duration of every operation, so
//! operations on one room never interleave while different rooms run in
//! parallel.
//!
//! A session is dropped from the map once nothing else holds its handle and
//! it either has no retained messages or has sat idle past a threshold. Every
//! accepted message is already in the fast-storage snapshot, so a dropped
//! room reloads exactly on next access.
//!
//! Never hold a `DashMap` guard across an await: the session handle is
//! cloned out of the map before locking.

use std::sync::Arc;

use dashmap::DashMap;
use roomrelay_types::error::RoomError;
use roomrelay_types::message::{Message, NewMessage};
use tokio::sync::Mutex;
use tracing::debug;

use crate::clock::Clock;
use crate::completion::client::CompletionClient;
use crate::storage::permanent_log::PermanentLog;
use crate::storage::room_storage::FastRoomStorage;

use super::history::RoomHistoryStore;
use super::session::RoomSession;

/// Shared handle to one room's session.
pub type SessionHandle<S, L, C> = Arc<Mutex<RoomSession<S, L, C>>>;

/// Resolves room ids to sessions and forwards operations to them.
pub struct RoomRouter<S: FastRoomStorage, L: PermanentLog, C: CompletionClient> {
    rooms: DashMap<String, SessionHandle<S, L, C>>,
    storage: Arc<S>,
    log: Arc<L>,
    completion: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<S, L, C> RoomRouter<S, L, C>
where
    S: FastRoomStorage + 'static,
    L: PermanentLog + 'static,
    C: CompletionClient + 'static,
{
    pub fn new(storage: Arc<S>, log: Arc<L>, completion: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self {
            rooms: DashMap::new(),
            storage,
            log,
            completion,
            clock,
        }
    }

    /// Get the session for `room_id`, creating it on first access.
    pub fn session(&self, room_id: &str) -> SessionHandle<S, L, C> {
        if let Some(existing) = self.rooms.get(room_id) {
            return Arc::clone(existing.value());
        }

        let entry = self.rooms.entry(room_id.to_string()).or_insert_with(|| {
            debug!(room_id, "Creating room session");
            let store = RoomHistoryStore::new(
                room_id,
                Arc::clone(&self.storage),
                Arc::clone(&self.log),
                Arc::clone(&self.clock),
            );
            Arc::new(Mutex::new(RoomSession::new(
                store,
                Arc::clone(&self.completion),
            )))
        });
        Arc::clone(entry.value())
    }

    /// Submit a chat message to a room and return the AI reply.
    pub async fn submit_message(
        &self,
        room_id: &str,
        sender: &str,
        text: &str,
    ) -> Result<String, RoomError> {
        let handle = self.session(room_id);
        let result = {
            let mut session = handle.lock().await;
            session.mark_used(self.clock.now_ms());
            session.submit_message(sender, text).await
        };
        drop(handle);
        self.release_if_empty(room_id);
        result
    }

    /// Record a message in a room without requesting a reply.
    pub async fn record_message(
        &self,
        room_id: &str,
        message: NewMessage,
    ) -> Result<Message, RoomError> {
        let handle = self.session(room_id);
        let result = {
            let mut session = handle.lock().await;
            session.mark_used(self.clock.now_ms());
            session.record_message(message).await
        };
        drop(handle);
        self.release_if_empty(room_id);
        result
    }

    /// A room's pruned history.
    pub async fn history(&self, room_id: &str) -> Result<Vec<Message>, RoomError> {
        let handle = self.session(room_id);
        let result = {
            let mut session = handle.lock().await;
            session.mark_used(self.clock.now_ms());
            session.history().await
        };
        drop(handle);
        self.release_if_empty(room_id);
        result
    }

    /// Drop the session for `room_id` if no caller holds it and it has no
    /// retained messages.
    ///
    /// `remove_if` runs under the shard lock that `session` also takes, so no
    /// handle can be cloned out between the count check and the removal.
    fn release_if_empty(&self, room_id: &str) {
        let released = self.rooms.remove_if(room_id, |_, handle| {
            Arc::strong_count(handle) == 1
                && handle.try_lock().is_ok_and(|session| session.is_empty())
        });
        if released.is_some() {
            debug!(room_id, "Released empty room session");
        }
    }

    /// Drop every unheld session whose last operation is at least
    /// `max_idle_ms` old. Returns how many were dropped.
    pub fn evict_idle(&self, max_idle_ms: i64) -> usize {
        let now = self.clock.now_ms();
        let mut evicted = 0;
        self.rooms.retain(|room_id, handle| {
            let idle = Arc::strong_count(handle) == 1
                && handle
                    .try_lock()
                    .is_ok_and(|session| now - session.last_used_ms() >= max_idle_ms);
            if idle {
                debug!(room_id = %room_id, "Evicting idle room session");
                evicted += 1;
            }
            !idle
        });
        evicted
    }

    /// Number of rooms with a live session.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// The completion client shared by every room.
    pub fn completion(&self) -> &C {
        &self.completion
    }
}

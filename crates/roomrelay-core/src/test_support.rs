//! In-memory doubles for the storage, log and completion ports.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use roomrelay_types::completion::CompletionError;
use roomrelay_types::error::RepositoryError;
use roomrelay_types::message::{HISTORY_KEY, Message, PermanentLogRecord};

use crate::completion::client::CompletionClient;
use crate::storage::permanent_log::PermanentLog;
use crate::storage::room_storage::FastRoomStorage;

pub const DAY_MS: i64 = 24 * 60 * 60 * 1000;
pub const NOW: i64 = 1_750_000_000_000;

#[derive(Default)]
pub struct MockStorage {
    entries: Mutex<HashMap<(String, String), serde_json::Value>>,
    fail_gets: AtomicBool,
    fail_puts: AtomicBool,
    get_calls: AtomicUsize,
    put_calls: AtomicUsize,
}

impl MockStorage {
    pub fn seed(&self, room_id: &str, messages: &[Message]) {
        self.seed_raw(room_id, serde_json::to_value(messages).unwrap());
    }

    pub fn seed_raw(&self, room_id: &str, value: serde_json::Value) {
        self.entries
            .lock()
            .unwrap()
            .insert((room_id.to_string(), HISTORY_KEY.to_string()), value);
    }

    pub fn snapshot(&self, room_id: &str) -> Option<Vec<Message>> {
        self.entries
            .lock()
            .unwrap()
            .get(&(room_id.to_string(), HISTORY_KEY.to_string()))
            .map(|v| serde_json::from_value(v.clone()).unwrap())
    }

    pub fn fail_gets(&self, fail: bool) {
        self.fail_gets.store(fail, Ordering::SeqCst);
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn put_calls(&self) -> usize {
        self.put_calls.load(Ordering::SeqCst)
    }
}

impl FastRoomStorage for MockStorage {
    async fn get(
        &self,
        room_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, RepositoryError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_gets.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        Ok(self
            .entries
            .lock()
            .unwrap()
            .get(&(room_id.to_string(), key.to_string()))
            .cloned())
    }

    async fn put(
        &self,
        room_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), RepositoryError> {
        self.put_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(RepositoryError::Query("disk full".to_string()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert((room_id.to_string(), key.to_string()), value.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MockLog {
    records: Mutex<Vec<PermanentLogRecord>>,
    fail: AtomicBool,
}

impl MockLog {
    pub fn failing() -> Self {
        let log = Self::default();
        log.fail(true);
        log
    }

    pub fn fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn records(&self) -> Vec<PermanentLogRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl PermanentLog for MockLog {
    async fn insert(&self, record: &PermanentLogRecord) -> Result<(), RepositoryError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(RepositoryError::Connection);
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn recent(
        &self,
        room_id: &str,
        limit: u32,
    ) -> Result<Vec<PermanentLogRecord>, RepositoryError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .rev()
            .filter(|r| r.room_id == room_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

pub struct StubCompletion {
    reply: Option<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl StubCompletion {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            reply: None,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl CompletionClient for StubCompletion {
    fn name(&self) -> &str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub-model"
    }

    async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.reply.clone().ok_or_else(|| CompletionError::Provider {
            message: "HTTP 503: upstream unavailable".to_string(),
        })
    }
}

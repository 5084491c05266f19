//! SQLite permanent log.
//!
//! Implements `PermanentLog` from `roomrelay-core` on the `chat_memory`
//! table. Rows are only ever inserted.

use roomrelay_core::storage::permanent_log::PermanentLog;
use roomrelay_types::error::RepositoryError;
use roomrelay_types::message::PermanentLogRecord;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `PermanentLog`.
#[derive(Clone)]
pub struct SqlitePermanentLog {
    pool: DatabasePool,
}

impl SqlitePermanentLog {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

struct ChatMemoryRow {
    original: String,
    written_by: String,
    written_at: String,
    room_id: String,
}

impl ChatMemoryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            original: row.try_get("original")?,
            written_by: row.try_get("written_by")?,
            written_at: row.try_get("written_at")?,
            room_id: row.try_get("room_id")?,
        })
    }

    fn into_record(self) -> PermanentLogRecord {
        PermanentLogRecord {
            text: self.original,
            sender: self.written_by,
            written_at: self.written_at,
            room_id: self.room_id,
        }
    }
}

impl PermanentLog for SqlitePermanentLog {
    async fn insert(&self, record: &PermanentLogRecord) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO chat_memory (original, written_by, written_at, room_id) VALUES (?, ?, ?, ?)",
        )
        .bind(&record.text)
        .bind(&record.sender)
        .bind(&record.written_at)
        .bind(&record.room_id)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn recent(
        &self,
        room_id: &str,
        limit: u32,
    ) -> Result<Vec<PermanentLogRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT original, written_by, written_at, room_id FROM chat_memory WHERE room_id = ? ORDER BY id DESC LIMIT ?",
        )
        .bind(room_id)
        .bind(i64::from(limit))
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                ChatMemoryRow::from_row(row)
                    .map(ChatMemoryRow::into_record)
                    .map_err(|e| RepositoryError::Query(e.to_string()))
            })
            .collect()
    }
}

//! SQLite fast room storage.
//!
//! Implements `FastRoomStorage` from `roomrelay-core`. Each (room, key) pair
//! holds one JSON document that is replaced wholesale on every `put`.

use chrono::Utc;
use roomrelay_core::storage::room_storage::FastRoomStorage;
use roomrelay_types::error::RepositoryError;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `FastRoomStorage`.
#[derive(Clone)]
pub struct SqliteRoomStorage {
    pool: DatabasePool,
}

impl SqliteRoomStorage {
    /// Create a new room storage backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// All room ids that have a stored snapshot, sorted.
    pub async fn list_rooms(&self) -> Result<Vec<String>, RepositoryError> {
        let rows = sqlx::query("SELECT DISTINCT room_id FROM room_snapshots ORDER BY room_id")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut rooms = Vec::with_capacity(rows.len());
        for row in &rows {
            let room_id: String = row
                .try_get("room_id")
                .map_err(|e| RepositoryError::Query(e.to_string()))?;
            rooms.push(room_id);
        }
        Ok(rooms)
    }
}

impl FastRoomStorage for SqliteRoomStorage {
    async fn get(
        &self,
        room_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM room_snapshots WHERE room_id = ? AND key = ?")
            .bind(room_id)
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let value_str: String = row
                    .try_get("value")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                let value: serde_json::Value = serde_json::from_str(&value_str)
                    .map_err(|e| RepositoryError::Serialization(format!("invalid JSON value: {e}")))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        room_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let value_str = serde_json::to_string(value)
            .map_err(|e| RepositoryError::Serialization(format!("failed to serialize value: {e}")))?;

        sqlx::query(
            r#"INSERT INTO room_snapshots (room_id, key, value, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT (room_id, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(room_id)
        .bind(key)
        .bind(&value_str)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::{DatabasePool, database_url};
    use roomrelay_types::message::HISTORY_KEY;
    use serde_json::json;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let url = database_url(dir.path());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let storage = SqliteRoomStorage::new(test_pool().await);
        assert!(storage.get("lobby", HISTORY_KEY).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let storage = SqliteRoomStorage::new(test_pool().await);
        let snapshot = json!([{"sender": "alice", "text": "hello", "timestamp": 1}]);

        storage.put("lobby", HISTORY_KEY, &snapshot).await.unwrap();
        assert_eq!(storage.get("lobby", HISTORY_KEY).await.unwrap(), Some(snapshot));
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let storage = SqliteRoomStorage::new(test_pool().await);

        storage.put("lobby", HISTORY_KEY, &json!([1, 2, 3])).await.unwrap();
        storage.put("lobby", HISTORY_KEY, &json!([])).await.unwrap();

        assert_eq!(storage.get("lobby", HISTORY_KEY).await.unwrap(), Some(json!([])));
    }

    #[tokio::test]
    async fn test_rooms_are_isolated() {
        let storage = SqliteRoomStorage::new(test_pool().await);

        storage.put("lobby", HISTORY_KEY, &json!(["a"])).await.unwrap();
        storage.put("kitchen", HISTORY_KEY, &json!(["b"])).await.unwrap();

        assert_eq!(storage.get("lobby", HISTORY_KEY).await.unwrap(), Some(json!(["a"])));
        assert_eq!(storage.get("kitchen", HISTORY_KEY).await.unwrap(), Some(json!(["b"])));
        assert_eq!(storage.list_rooms().await.unwrap(), vec!["kitchen", "lobby"]);
    }

    #[tokio::test]
    async fn test_keys_are_isolated_within_room() {
        let storage = SqliteRoomStorage::new(test_pool().await);

        storage.put("lobby", HISTORY_KEY, &json!(["a"])).await.unwrap();
        assert!(storage.get("lobby", "other").await.unwrap().is_none());
    }
}

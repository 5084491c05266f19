//! Application state wiring the room router to its concrete adapters.
//!
//! AppState holds the service instances used by both CLI and HTTP API.
//! The room router is generic over storage/log/completion traits; AppState
//! pins it to the SQLite adapters and a runtime-selected completion client.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use roomrelay_core::clock::SystemClock;
use roomrelay_core::completion::box_client::BoxCompletionClient;
use roomrelay_core::room::router::RoomRouter;
use roomrelay_infra::completion::{create_completion_client, resolve_api_key};
use roomrelay_infra::config::load_relay_config;
use roomrelay_infra::data_dir::resolve_data_dir;
use roomrelay_infra::sqlite::permanent_log::SqlitePermanentLog;
use roomrelay_infra::sqlite::pool::{DatabasePool, database_url};
use roomrelay_infra::sqlite::room_storage::SqliteRoomStorage;
use roomrelay_types::config::RelayConfig;

/// Room router pinned to the infra implementations.
pub type ConcreteRoomRouter = RoomRouter<SqliteRoomStorage, SqlitePermanentLog, BoxCompletionClient>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub rooms: Arc<ConcreteRoomRouter>,
    /// Read handle on the permanent log (for `roomrelay log`).
    pub permanent_log: Arc<SqlitePermanentLog>,
    pub config: Arc<RelayConfig>,
    pub data_dir: PathBuf,
}

impl AppState {
    /// Initialize from the resolved data directory: load config, open the
    /// database and build the completion client.
    pub async fn init() -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        let config = load_relay_config(&data_dir).await;
        Self::open(&data_dir, config).await
    }

    /// Initialize against an explicit data directory and config.
    pub async fn open(data_dir: &Path, config: RelayConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(data_dir)
            .await
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let db_pool = DatabasePool::new(&database_url(data_dir))
            .await
            .context("failed to open relay database")?;

        let api_key = resolve_api_key(&config.completion);
        let completion = create_completion_client(&config.completion, api_key.as_deref())?;

        tracing::debug!(
            data_dir = %data_dir.display(),
            provider = %config.completion.provider,
            "Application state initialized"
        );

        Ok(Self::from_parts(db_pool, completion, config, data_dir.to_path_buf()))
    }

    /// Wire the state from already-constructed parts.
    pub fn from_parts(
        db_pool: DatabasePool,
        completion: BoxCompletionClient,
        config: RelayConfig,
        data_dir: PathBuf,
    ) -> Self {
        let permanent_log = Arc::new(SqlitePermanentLog::new(db_pool.clone()));
        let rooms = RoomRouter::new(
            Arc::new(SqliteRoomStorage::new(db_pool)),
            Arc::clone(&permanent_log),
            Arc::new(completion),
            Arc::new(SystemClock),
        );

        Self {
            rooms: Arc::new(rooms),
            permanent_log,
            config: Arc::new(config),
            data_dir,
        }
    }
}

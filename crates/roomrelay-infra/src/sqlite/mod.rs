//! SQLite storage layer.
//!
//! Fast room storage and permanent log backed by SQLite with WAL mode and
//! split read/write connection pools.

pub mod permanent_log;
pub mod pool;
pub mod room_storage;

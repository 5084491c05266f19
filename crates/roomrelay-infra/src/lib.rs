//! Infrastructure layer for roomrelay.
//!
//! Contains implementations of the port traits defined in `roomrelay-core`:
//! SQLite fast storage and permanent log, the completion service clients,
//! plus configuration loading and data directory resolution.

pub mod completion;
pub mod config;
pub mod data_dir;
pub mod sqlite;

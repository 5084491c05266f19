//! Storage abstractions for roomrelay.
//!
//! Defines the fast per-room snapshot store and the append-only permanent
//! log. Implementations live in roomrelay-infra.

pub mod permanent_log;
pub mod room_storage;

//! Shared domain types for roomrelay.
//!
//! This crate contains the types used across the relay: room messages,
//! permanent log records, completion errors, configuration, and the error
//! taxonomy surfaced to callers.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod completion;
pub mod config;
pub mod error;
pub mod message;

//! HTTP API layer for roomrelay.
//!
//! Plain JSON bodies (no envelope), `{"error": ...}` on failure, permissive
//! CORS so browser front ends on any origin can call it.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod router;

//! Room history lifecycle: per-room store, session orchestration, routing.

pub mod history;
pub mod router;
pub mod session;

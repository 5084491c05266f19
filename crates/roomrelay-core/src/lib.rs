//! Room history lifecycle and port trait definitions for roomrelay.
//!
//! This crate defines the "ports" (storage, permanent log, completion traits)
//! that the infrastructure layer implements, plus the per-room logic built on
//! top of them. It depends only on `roomrelay-types` -- never on
//! `roomrelay-infra` or any database/IO crate.

pub mod clock;
pub mod completion;
pub mod retention;
pub mod room;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

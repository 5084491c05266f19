//! Custom extractors for HTTP handlers.

pub mod query;

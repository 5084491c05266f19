//! Observability setup for roomrelay: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;

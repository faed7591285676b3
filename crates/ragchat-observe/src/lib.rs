//! Observability setup for ragchat: structured logging plus optional
//! OpenTelemetry span export.

pub mod tracing_setup;

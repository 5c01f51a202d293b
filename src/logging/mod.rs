//! Structured logging via `tracing`.

mod format;

pub use format::StructuredLogger;

//! Structured logging: tracing subscriber setup and one-off JSON result lines.

mod format;

pub use format::{PredictionRecord, StructuredLogger};

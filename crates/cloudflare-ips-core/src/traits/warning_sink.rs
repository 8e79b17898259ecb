//! Sink for the fallback warning

/// Receives one human-readable message each time the pipeline falls back
pub trait WarningSink: Send + Sync {
    fn warn(&self, message: &str);
}

/// Forwards warnings to `tracing` at WARN level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl WarningSink for TracingSink {
    fn warn(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

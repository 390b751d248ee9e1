//! Logging sink injected into the session.
//!
//! The session never touches a global logger directly. It receives an
//! `Arc<dyn LogSink>` at construction:
//!
//! - [`TracingSink`] forwards to `tracing` (what the binary uses)
//! - [`MemorySink`] records entries in memory (tests, embedding)

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Target used for every audit event.
pub const AUDIT_TARGET: &str = "agi";

/// Destination for audit messages.
pub trait LogSink: Send + Sync {
    /// Record an informational message.
    fn info(&self, message: &str);

    /// Record an error message.
    fn error(&self, message: &str);
}

/// Sink that emits `tracing` events under the [`AUDIT_TARGET`] target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn info(&self, message: &str) {
        tracing::info!(target: AUDIT_TARGET, "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: AUDIT_TARGET, "{}", message);
    }
}

/// Severity of a recorded entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Recorded through [`LogSink::info`].
    Info,
    /// Recorded through [`LogSink::error`].
    Error,
}

/// A single recorded entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Severity the entry was recorded with.
    pub level: Level,
    /// Message text, unchanged.
    pub message: String,
}

/// Sink that keeps every entry in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    /// Number of entries so far.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check if nothing was logged.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn record(&self, level: Level, message: &str) {
        self.lock().push(LogEntry {
            level,
            message: message.to_string(),
        });
    }

    // A panic while holding the lock cannot leave the Vec half-written.
    fn lock(&self) -> MutexGuard<'_, Vec<LogEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for MemorySink {
    fn info(&self, message: &str) {
        self.record(Level::Info, message);
    }

    fn error(&self, message: &str) {
        self.record(Level::Error, message);
    }
}

/*!
 * Diagnostic Sinks
 * Best-effort destinations for advisories nobody handled
 */

use super::types::ThrowRecord;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::warn;

/// Destination for unhandled advisory text
///
/// Emission is best effort: implementations must not fail or panic.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, record: &ThrowRecord, line: &str);
}

/// Writes advisories as `tracing` warnings on target `throw::advisory`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, record: &ThrowRecord, line: &str) {
        warn!(
            target: "throw::advisory",
            identifier = record.identifier(),
            kind = record.kind(),
            caller = %record.caller(),
            "{}",
            line
        );
    }
}

/// Keeps emitted lines in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every line emitted so far
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.lock().is_empty()
    }

    /// Drain captured lines
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, _record: &ThrowRecord, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}

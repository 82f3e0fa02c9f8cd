//! Diagnostic sink interface
//!
//! Interpretation never fails as a whole. Commands that cannot be turned into
//! geometry are skipped and described to a caller-supplied sink instead.

use crate::error::InterpretError;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::warn;

/// A skipped command or arc segment, with the source line it came from
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// 1-based line number in the command stream
    pub line_number: usize,
    /// The raw line as it appeared in the stream
    pub line: String,
    /// What went wrong
    pub error: InterpretError,
}

impl Diagnostic {
    pub fn new(line: impl Into<String>, error: InterpretError) -> Self {
        Self {
            line_number: error.line_number(),
            line: line.into(),
            error,
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.error, self.line.trim())
    }
}

/// Receiver for interpretation diagnostics
///
/// Implement this trait to route skipped commands to a log, a UI panel, or a
/// test assertion.
pub trait DiagnosticSink: Send + Sync {
    /// Called once per skipped command or arc sub-segment
    fn report(&self, diagnostic: &Diagnostic);
}

/// Arc-wrapped sink for sharing between an interpreter and its caller
pub type DiagnosticSinkHandle = Arc<dyn DiagnosticSink>;

/// Logs every diagnostic at WARN level through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        warn!(
            line_number = diagnostic.line_number,
            line = %diagnostic.line.trim(),
            "{}",
            diagnostic.error
        );
    }
}

/// Discards every diagnostic
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpSink;

impl DiagnosticSink for NoOpSink {
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Keeps every diagnostic in memory, in report order
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything reported so far
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.lock().is_empty()
    }

    /// Remove and return everything reported so far
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.lock())
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: &Diagnostic) {
        self.diagnostics.lock().push(diagnostic.clone());
    }
}

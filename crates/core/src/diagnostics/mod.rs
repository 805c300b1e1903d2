//! Non-fatal diagnostics and the sink they are reported to.
//!
//! Slicing never aborts on malformed or partially matching input; it degrades
//! by omission and reports what it skipped through a [`DiagnosticSink`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::model::ScriptFamily;

/// A recoverable problem encountered while slicing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// A resolved name has no extracted body; it is left out of the output.
    #[error("Function '{name}' was resolved but has no extracted body; skipping")]
    ExtractionMiss { name: String },

    /// The overhead anchors did not match, so no overhead block was appended.
    #[error("Could not locate the {family} PSReflect overhead block")]
    OverheadNotFound { family: ScriptFamily },

    /// The script defines the same function more than once; the last one wins.
    #[error("Function '{name}' is defined more than once; keeping the last definition")]
    DuplicateDefinition { name: String },

    /// Resolution stopped at the caller's step ceiling and may be incomplete.
    #[error("Dependency resolution stopped after {limit} steps; result may be incomplete")]
    ResolutionLimit { limit: usize },
}

/// Receiver for diagnostics emitted by the core.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Sink that logs each diagnostic as a warning and keeps a copy.
#[derive(Debug, Default)]
pub struct LogSink {
    recorded: Vec<Diagnostic>,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.recorded
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.recorded
    }
}

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        warn!("{diagnostic}");
        self.recorded.push(diagnostic);
    }
}

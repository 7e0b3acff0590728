//! Diagnostic messages emitted while resolving signing
//!
//! The resolver never formats or prints on its own; it hands every message to
//! a [`DiagnosticSink`]. Messages carry presence and lengths only, never a
//! password value.

use serde::Serialize;
use std::fmt;

/// Severity of a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Progress and summaries
    Info,
    /// Release signing will not be applied
    Warn,
}

/// A single human-readable diagnostic line
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Severity
    pub level: Level,
    /// Message text, free of password values
    pub message: String,
}

impl Diagnostic {
    /// Info-level diagnostic
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            message: message.into(),
        }
    }

    /// Warning-level diagnostic
    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warn,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Level::Info => write!(f, "[signet] {}", self.message),
            Level::Warn => write!(f, "[signet][WARN] {}", self.message),
        }
    }
}

/// Destination for diagnostics
pub trait DiagnosticSink {
    /// Accept one diagnostic
    fn emit(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Forwards diagnostics to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, diagnostic: Diagnostic) {
        match diagnostic.level {
            Level::Info => tracing::info!(target: "signet::signing", "{}", diagnostic.message),
            Level::Warn => tracing::warn!(target: "signet::signing", "{}", diagnostic.message),
        }
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&mut self, _diagnostic: Diagnostic) {}
}

/// Keeps a copy of every diagnostic while forwarding it to an inner sink
pub struct Recorder<'a> {
    inner: &'a mut dyn DiagnosticSink,
    recorded: Vec<Diagnostic>,
}

impl<'a> Recorder<'a> {
    /// Record everything passed on to `inner`
    pub fn new(inner: &'a mut dyn DiagnosticSink) -> Self {
        Self {
            inner,
            recorded: Vec::new(),
        }
    }

    /// Emit an info diagnostic
    pub fn info(&mut self, message: impl Into<String>) {
        self.emit(Diagnostic::info(message));
    }

    /// Emit a warning
    pub fn warn(&mut self, message: impl Into<String>) {
        self.emit(Diagnostic::warn(message));
    }

    /// Everything emitted so far, in order
    pub fn into_recorded(self) -> Vec<Diagnostic> {
        self.recorded
    }
}

impl DiagnosticSink for Recorder<'_> {
    fn emit(&mut self, diagnostic: Diagnostic) {
        self.recorded.push(diagnostic.clone());
        self.inner.emit(diagnostic);
    }
}

//! Error and diagnostic types for the sketch parser.
//!
//! The parser accumulates one [`Diagnostic`] per offending line and keeps
//! going, so a single run reports every problem in the file. The collected
//! diagnostics are wrapped in [`ParseError`] when any were produced.

use std::fmt;

use thiserror::Error;

/// A single parse problem with its source position.
///
/// `line` and `column` are 1-based; a zero line means the diagnostic applies
/// to the input as a whole (e.g. a missing module statement). `width` is the
/// length of the offending span, at least 1.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct Diagnostic {
    message: String,
    line: u32,
    column: u32,
    width: u32,
    help: Option<String>,
}

impl Diagnostic {
    /// Creates a diagnostic without a source position.
    pub fn error(message: impl Into<String>) -> Self {
        Diagnostic {
            message: message.into(),
            line: 0,
            column: 0,
            width: 1,
            help: None,
        }
    }

    /// Attaches a 1-based source position.
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.line = line;
        self.column = column;
        self
    }

    /// Sets the length of the highlighted span.
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = width.max(1);
        self
    }

    /// Attaches help text shown below the error.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }
}

/// Error type for the sketch parsing lifecycle.
///
/// Wraps one or more diagnostics. `Display` shows the first diagnostic and
/// a count of the rest.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    /// Create a new parse error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            if first.line() > 0 {
                write!(f, "line {}: {}", first.line(), first)?;
            } else {
                write!(f, "{first}")?;
            }
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
        }
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self { diagnostics }
    }
}

//! Error adapter for converting TreelineError to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error
//! types and miette's rich diagnostic formatting used in the CLI.
//!
//! # Multi-Error Support
//!
//! When a [`treeline_parser::error::ParseError`] contains multiple
//! diagnostics, each diagnostic is rendered independently.

use std::{error::Error, fmt};

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use treeline::TreelineError;
use treeline_parser::error::Diagnostic;

/// Adapter for a single sketch diagnostic.
///
/// Wraps a [`Diagnostic`] together with its source text and implements
/// [`MietteDiagnostic`] so the CLI can show the offending line.
pub struct DiagnosticAdapter<'a> {
    /// The wrapped diagnostic
    diag: &'a Diagnostic,
    /// Source code for displaying snippets
    src: &'a str,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic, src: &'a str) -> Self {
        Self { diag, src }
    }

    /// Byte span of the diagnostic within the source, if it names a line.
    fn span(&self) -> Option<SourceSpan> {
        if self.diag.line() == 0 {
            return None;
        }
        let mut offset = 0;
        let mut remaining = self.diag.line() - 1;
        for line in self.src.split_inclusive('\n') {
            if remaining == 0 {
                break;
            }
            offset += line.len();
            remaining -= 1;
        }
        offset += self.diag.column().saturating_sub(1) as usize;
        Some(SourceSpan::new(offset.into(), self.diag.width() as usize))
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())
    }
}

impl Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("treeline::sketch"))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|help| Box::new(help) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span()?;
        Some(Box::new(std::iter::once(
            LabeledSpan::new_primary_with_span(Some(self.diag.message().to_string()), span),
        )))
    }
}

/// Adapter for non-diagnostic [`TreelineError`] variants.
///
/// Handles errors without rich diagnostic information, such as I/O and
/// schema errors.
pub struct ErrorAdapter<'a>(pub &'a TreelineError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TreelineError::Io(_) => "treeline::io",
            TreelineError::Parse { .. } => return None,
            TreelineError::Schema(_) => "treeline::schema",
        };
        Some(Box::new(code))
    }
}

/// A reportable error that can be rendered by miette.
///
/// Wraps either a single diagnostic or a non-diagnostic error, providing a
/// uniform interface for error rendering.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A rich diagnostic with source location information.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(diagnostic) => fmt::Display::fmt(diagnostic, f),
            Reportable::Error(error) => fmt::Display::fmt(error, f),
        }
    }
}

impl Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(error) => error.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(diagnostic) => diagnostic.code(),
            Reportable::Error(error) => error.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(diagnostic) => diagnostic.help(),
            Reportable::Error(error) => error.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(diagnostic) => diagnostic.source_code(),
            Reportable::Error(error) => error.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(diagnostic) => diagnostic.labels(),
            Reportable::Error(error) => error.labels(),
        }
    }
}

/// Expand a [`TreelineError`] into independently renderable reports: one
/// per parse diagnostic, or a single wrapper for other variants.
pub fn to_reportables(error: &TreelineError) -> Vec<Reportable<'_>> {
    match error {
        TreelineError::Parse { err, src } => err
            .diagnostics()
            .iter()
            .map(|diag| Reportable::Diagnostic(DiagnosticAdapter::new(diag, src)))
            .collect(),
        other => vec![Reportable::Error(ErrorAdapter(other))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_expands_per_diagnostic() {
        let renderer = treeline::TreeRenderer::default();
        let err = renderer
            .parse("module m\n  widget a\n  widget b\n")
            .unwrap_err();
        assert_eq!(to_reportables(&err).len(), 2);
    }

    #[test]
    fn test_diagnostic_span_points_at_offending_token() {
        let src = "module m\n  widget a\n";
        let renderer = treeline::TreeRenderer::default();
        let err = renderer.parse(src).unwrap_err();
        let reportables = to_reportables(&err);
        let Reportable::Diagnostic(adapter) = &reportables[0] else {
            panic!("expected a diagnostic reportable");
        };
        let span = adapter.span().expect("diagnostic should carry a span");
        let start = span.offset();
        assert_eq!(&src[start..start + "widget".len()], "widget");
    }

    #[test]
    fn test_io_error_is_a_single_reportable() {
        let err = TreelineError::Io(std::io::Error::other("sink failed"));
        let reportables = to_reportables(&err);
        assert_eq!(reportables.len(), 1);
        assert!(matches!(reportables[0], Reportable::Error(_)));
    }
}

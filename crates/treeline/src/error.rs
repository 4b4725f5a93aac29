//! Error types for treeline operations.
//!
//! This module provides the main error type [`TreelineError`] which wraps
//! the error conditions that can occur while parsing a sketch or rendering
//! a diagram.
//!
//! Layout overflow is deliberately *not* an error: a line that cannot be
//! made to fit the requested maximum length is emitted anyway, since
//! content correctness wins over width compliance.

use std::io;

use thiserror::Error;

use treeline_core::schema::SchemaError;
use treeline_parser::error::ParseError;

/// The main error type for treeline operations.
///
/// The `Parse` variant keeps the offending source next to the structured
/// diagnostics so callers can produce rich reports with source spans.
#[derive(Debug, Error)]
pub enum TreelineError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{err}")]
    Parse { err: ParseError, src: String },

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),
}

impl TreelineError {
    /// Create a new `Parse` error with the associated source code.
    pub fn new_parse_error(err: ParseError, src: impl Into<String>) -> Self {
        Self::Parse {
            err,
            src: src.into(),
        }
    }
}

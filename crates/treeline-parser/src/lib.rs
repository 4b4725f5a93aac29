//! Parser for the treeline schema sketch format.
//!
//! The sketch format is a compact, indentation-based description of a
//! schema tree: a module header, node statements two spaces deeper per
//! nesting level, and optional `augment`/`rpcs`/`notifications`/
//! `grouping`/`yang-data` section headers. The public entry point is
//! [`parse`], which produces a [`treeline_core::schema::SchemaModule`]
//! ready for rendering.
//!
//! See [`parse`] for the grammar.

pub mod error;

mod sketch;

#[cfg(test)]
mod sketch_tests;

pub use error::{Diagnostic, ParseError};
pub use sketch::parse;

//! Treeline Core Types and Definitions
//!
//! This crate provides the foundational types for the treeline tree-diagram
//! renderer. It includes:
//!
//! - **Descriptors**: Canonical node and section descriptors ([`descriptor`] module)
//! - **Wrapper**: Left-margin continuation state for nested nodes ([`wrapper`] module)
//! - **Sinks**: Character output abstraction with a counting variant ([`sink`] module)
//! - **Schema**: The raw schema-tree model consumed by cursor adapters ([`schema`] module)
//! - **Cursor**: The navigation trait rendering is driven through ([`accessor`] module)

pub mod accessor;
pub mod descriptor;
pub mod schema;
pub mod sink;
pub mod wrapper;

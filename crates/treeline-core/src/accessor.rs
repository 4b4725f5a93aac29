//! The cursor trait rendering is driven through.
//!
//! [`SchemaCursor`] is the sole seam between the rendering pipeline and the
//! schema representation behind it: the walker and sequencer navigate
//! through it and read canonical [`NodeDescriptor`]s back, never the schema
//! itself. Implementations are selected at construction time (a real
//! adapter over a parsed tree, or a synthetic tree in tests) and the
//! pipeline holds the trait object, so no representation branching exists
//! inside the core.
//!
//! All navigation methods return `None` when the requested move is
//! impossible (exhausted siblings, missing section, leaf with no children);
//! the cursor position is unchanged in that case. Callers must check before
//! use; navigating past exhaustion is never an error.

use std::io;

use crate::{
    descriptor::{KeywordStatement, NodeDescriptor},
    sink::Sink,
};

/// Stateful navigation over one schema tree plus descriptor derivation.
///
/// The cursor owns exactly one position. Rendering is single-threaded and
/// synchronous: one cursor and one sink per top-level call, no locking.
pub trait SchemaCursor {
    // -------------------------------------------------------------------------
    // Cursor-preserving reads
    // -------------------------------------------------------------------------

    /// The `module`/`submodule` statement heading the whole diagram.
    fn module_statement(&self) -> KeywordStatement;

    /// Descriptor of the node under the cursor, if the cursor is on one.
    fn current_node(&self) -> Option<NodeDescriptor>;

    /// Descriptor of the sibling following the current node, without moving.
    fn peek_next_sibling(&self) -> Option<NodeDescriptor>;

    // -------------------------------------------------------------------------
    // Cursor-mutating navigation
    // -------------------------------------------------------------------------

    /// Moves to the parent of the current node.
    fn to_parent(&mut self) -> Option<NodeDescriptor>;

    /// Moves to the sibling following the current node.
    fn to_next_sibling(&mut self) -> Option<NodeDescriptor>;

    /// Moves to the first child of the current node.
    fn to_next_child(&mut self) -> Option<NodeDescriptor>;

    /// Moves back to the first sibling of the current group.
    fn to_first_sibling(&mut self) -> Option<NodeDescriptor>;

    // -------------------------------------------------------------------------
    // Section entry
    // -------------------------------------------------------------------------

    /// Positions the cursor at the first root of the module tree and
    /// returns the module statement. The module section always exists;
    /// with an empty tree the cursor ends up on no node.
    fn to_module_section(&mut self) -> KeywordStatement;

    /// Advances to the next augment section, positioning the cursor at its
    /// first root. `None` once augments are exhausted.
    fn to_next_augment(&mut self) -> Option<KeywordStatement>;

    /// Enters the rpcs section, positioning the cursor at its first root.
    /// `None` if the section is empty or already visited.
    fn to_rpcs_section(&mut self) -> Option<KeywordStatement>;

    /// Enters the notifications section, positioning the cursor at its
    /// first root. `None` if the section is empty or already visited.
    fn to_notifications_section(&mut self) -> Option<KeywordStatement>;

    /// Advances to the next grouping section, positioning the cursor at its
    /// first root. `None` once groupings are exhausted.
    fn to_next_grouping(&mut self) -> Option<KeywordStatement>;

    /// Advances to the next yang-data section, positioning the cursor at
    /// its first root. `None` once yang-data templates are exhausted.
    fn to_next_yang_data(&mut self) -> Option<KeywordStatement>;

    // -------------------------------------------------------------------------
    // Free-text callbacks
    // -------------------------------------------------------------------------

    /// Writes the current node's key names, space-separated, to the sink.
    ///
    /// The only place externally stored key collections reach the layout
    /// engine; a node without keys writes nothing.
    fn write_list_keys(&self, sink: &mut dyn Sink) -> io::Result<()>;

    /// Writes the current node's if-feature names, comma-separated, to the
    /// sink. A node without features writes nothing.
    fn write_feature_names(&self, sink: &mut dyn Sink) -> io::Result<()>;
}

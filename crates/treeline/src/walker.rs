//! The tree walker: recursive traversal over one section's forest.
//!
//! For every sibling group the walker first settles a unified type
//! alignment, then emits each sibling in turn (linebreak, node, recursive
//! descent into its children), advancing the cursor and restoring it after
//! each descent. The wrapper is extended by value on the way down, so
//! sibling branches never see each other's state.

use std::io;

use log::trace;

use treeline_core::{
    accessor::SchemaCursor, descriptor::NameWidth, sink::Sink, wrapper::Wrapper,
};

use crate::layout::{self, FitOutcome};

/// Traversal driver for one section forest.
///
/// Holds the cursor for the duration of the section and counts the
/// linebreaks it emits, for the sequencer's per-section diagnostics.
pub struct TreeWalker<'a> {
    cursor: &'a mut dyn SchemaCursor,
    max_len: usize,
    line_breaks: u32,
}

impl<'a> TreeWalker<'a> {
    /// Creates a walker over `cursor` with the given line-length limit.
    pub fn new(cursor: &'a mut dyn SchemaCursor, max_len: usize) -> Self {
        TreeWalker {
            cursor,
            max_len,
            line_breaks: 0,
        }
    }

    /// Linebreaks emitted so far by this walker.
    pub fn line_breaks(&self) -> u32 {
        self.line_breaks
    }

    /// Renders the sibling group under the cursor and every subtree below
    /// it. Each node is preceded by a linebreak; the caller owns the line
    /// the first node starts on.
    pub fn render_family_tree(&mut self, wrapper: Wrapper, sink: &mut dyn Sink) -> io::Result<()> {
        let unified = self.compute_unified_gap(wrapper)?;
        loop {
            sink.put("\n")?;
            self.line_breaks += 1;
            self.render_subtree(wrapper, unified, sink)?;
            if self.cursor.to_next_sibling().is_none() {
                break;
            }
        }
        Ok(())
    }

    /// Renders the current node (no preceding linebreak), then its child
    /// group, restoring the cursor to the node afterwards.
    fn render_subtree(
        &mut self,
        wrapper: Wrapper,
        unified: usize,
        sink: &mut dyn Sink,
    ) -> io::Result<()> {
        let Some(node) = self.cursor.current_node() else {
            return Ok(());
        };
        let is_last = self.cursor.peek_next_sibling().is_none();
        layout::render_entire_node(
            &node,
            is_last,
            wrapper,
            unified,
            self.max_len,
            &*self.cursor,
            sink,
        )?;

        if self.cursor.to_next_child().is_some() {
            let child_wrapper = if is_last {
                wrapper.with_blank()
            } else {
                wrapper.with_bar()
            };
            self.render_family_tree(child_wrapper, sink)?;
            self.cursor.to_parent();
        }
        Ok(())
    }

    /// Settles one shared type column for the sibling group under the
    /// cursor.
    ///
    /// For a growing tolerance `t`, the candidate column is the t-th
    /// largest name-derived minimum among typed siblings; the first
    /// candidate that leaves at most `t` typed siblings divided wins.
    /// Returns zero when all candidates force full division, in which
    /// case every node keeps its own default gap. The cursor is restored
    /// to the group's first member.
    fn compute_unified_gap(&mut self, wrapper: Wrapper) -> io::Result<usize> {
        let total = self.count_siblings();
        let mut bound = usize::MAX;
        let mut unified = 0;
        for tolerance in 0..total {
            let Some(candidate) = self.nth_largest_name_width(bound) else {
                break;
            };
            bound = candidate.derived_min();
            let divided = self.count_divided(wrapper, bound)?;
            if divided <= tolerance {
                unified = bound;
                break;
            }
        }
        self.cursor.to_first_sibling();
        trace!(unified = unified; "sibling group alignment settled");
        Ok(unified)
    }

    fn count_siblings(&mut self) -> usize {
        let mut count = usize::from(self.cursor.current_node().is_some());
        while self.cursor.to_next_sibling().is_some() {
            count += 1;
        }
        self.cursor.to_first_sibling();
        count
    }

    /// Largest typed-sibling name width whose derived minimum lies strictly
    /// below `bound`. Linear scan; ties prefer unmarked names. The cursor
    /// is restored to the first sibling.
    fn nth_largest_name_width(&mut self, bound: usize) -> Option<NameWidth> {
        let mut best: Option<NameWidth> = None;
        let mut node = self.cursor.current_node();
        while let Some(descriptor) = node {
            if descriptor.has_type() {
                let width = descriptor.name.width();
                if width.derived_min() < bound
                    && best.as_ref().is_none_or(|current| width.ranks_above(current))
                {
                    best = Some(width);
                }
            }
            node = self.cursor.to_next_sibling();
        }
        self.cursor.to_first_sibling();
        best
    }

    /// Number of typed siblings that would not fit on one line under the
    /// candidate unified column. The cursor is restored to the first
    /// sibling.
    fn count_divided(&mut self, wrapper: Wrapper, unified: usize) -> io::Result<usize> {
        let mut divided = 0;
        let mut node = self.cursor.current_node();
        while let Some(descriptor) = node {
            if descriptor.has_type() {
                let outcome =
                    layout::fit_outcome(&descriptor, wrapper, unified, self.max_len, &*self.cursor)?;
                if outcome != FitOutcome::Fits {
                    divided += 1;
                }
            }
            node = self.cursor.to_next_sibling();
        }
        self.cursor.to_first_sibling();
        Ok(divided)
    }
}

#[cfg(test)]
mod tests {
    use treeline_core::schema::{SchemaModule, SchemaNode, StatementKind};

    use crate::adapter::SketchCursor;

    use super::*;

    fn leaf_module(names: &[&str]) -> SchemaModule {
        let mut module = SchemaModule::new("demo");
        for name in names {
            module
                .add_root(SchemaNode::new(StatementKind::Leaf, *name).with_type("string"))
                .unwrap();
        }
        module
    }

    fn unified_for(module: &SchemaModule, max_len: usize) -> usize {
        let mut cursor = SketchCursor::new(module);
        let mut walker = TreeWalker::new(&mut cursor, max_len);
        walker.compute_unified_gap(Wrapper::top()).unwrap()
    }

    #[test]
    fn test_unified_gap_is_the_largest_name_minimum() {
        let module = leaf_module(&["a", "medium-one", "rather-long-leaf"]);
        // "rather-long-leaf?" is 17 characters with its mark; marked names
        // keep a 3-space minimum before the type.
        assert_eq!(unified_for(&module, usize::MAX), 20);
    }

    #[test]
    fn test_unified_gap_steps_down_past_an_unfittable_sibling() {
        let module = leaf_module(&["aaaa", "an-extremely-long-leaf-name-xxxx"]);
        // Chasing the long sibling would divide the short one, so the next
        // candidate wins with the long sibling alone tolerated as divided.
        assert_eq!(unified_for(&module, 40), "aaaa?".len() + 3);
    }

    #[test]
    fn test_unified_gap_zero_when_every_candidate_divides() {
        let module = leaf_module(&["aaaaaaaaaa", "bbbbbbbbbb"]);
        assert_eq!(unified_for(&module, 12), 0);
    }

    #[test]
    fn test_unified_gap_ignores_untyped_siblings() {
        let mut module = SchemaModule::new("demo");
        module
            .add_root(SchemaNode::new(
                StatementKind::Container,
                "very-long-container-name",
            ))
            .unwrap();
        module
            .add_root(SchemaNode::new(StatementKind::Leaf, "x").with_type("string"))
            .unwrap();
        // Only the typed leaf contributes: "x?" plus its 3-space minimum.
        assert_eq!(unified_for(&module, usize::MAX), 5);
    }

    #[test]
    fn test_cursor_restored_to_first_sibling() {
        let module = leaf_module(&["first", "second", "third"]);
        let mut cursor = SketchCursor::new(&module);
        let mut walker = TreeWalker::new(&mut cursor, usize::MAX);
        walker.compute_unified_gap(Wrapper::top()).unwrap();
        assert_eq!(cursor.current_node().unwrap().name.text, "first");
    }
}

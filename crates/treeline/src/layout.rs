//! The layout engine: exact character emission for one node.
//!
//! Everything here is a pure function of a [`NodeDescriptor`], a
//! [`Wrapper`], and an [`IndentPlan`]; measurement renders into a counting
//! sink and is therefore byte-identical to real output. Line splitting is a
//! bounded search: a node line has exactly three break candidates (before
//! the key list, before the type, before the if-features) tried right to
//! left, so no general backtracking machinery is needed.
//!
//! A node that cannot be made to fit is not an error. The engine prints the
//! header anyway and forces the remaining fields onto continuation lines;
//! content correctness always wins over width compliance.

use std::io;

use treeline_core::{
    accessor::SchemaCursor,
    descriptor::{
        GAP_BEFORE_FEATURES, GAP_BEFORE_KEYS, NameKind, NodeDescriptor, TypeKind, TypeRef,
    },
    sink::{CountingSink, Sink, write_spaces},
    wrapper::Wrapper,
};

/// Continuation-line content starts this many characters past the name
/// column of the first line.
const CONTINUATION_INDENT: usize = 2;

// =============================================================================
// Indent plans
// =============================================================================

/// One gap inside a node line: either a run of spaces or a line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gap {
    Spaces(usize),
    Break,
}

/// How a fit computation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitOutcome {
    /// The whole node fits on one line.
    Fits,
    /// The node fits once split at the planned break(s).
    MustDivide,
    /// Even the bare header exceeds the limit; no break can help.
    CannotFit,
}

/// The three gap widths of a node line plus the fit outcome.
///
/// Breaks are only ever placed as a right-to-left suffix, so once a gap
/// carries a break, every gap to its right does too and the fields behind
/// them move to continuation lines.
#[derive(Debug, Clone, Copy)]
pub struct IndentPlan {
    pub before_keys: Gap,
    pub before_type: Gap,
    pub before_features: Gap,
    pub outcome: FitOutcome,
}

impl IndentPlan {
    /// Default plan for a node, honoring a unified sibling alignment.
    ///
    /// `unified` is the sibling group's shared type column (relative to the
    /// name start), or zero when the group is not unified. It is applied
    /// only to nodes that actually have a type, and never shrinks a gap
    /// below the node's own minimum.
    pub fn for_node(node: &NodeDescriptor, unified: usize) -> Self {
        let width = node.name.width();
        let before_type = if unified != 0 && node.has_type() {
            unified.saturating_sub(width.len).max(width.min_gap())
        } else {
            width.min_gap()
        };
        IndentPlan {
            before_keys: Gap::Spaces(GAP_BEFORE_KEYS),
            before_type: Gap::Spaces(before_type),
            before_features: Gap::Spaces(GAP_BEFORE_FEATURES),
            outcome: FitOutcome::Fits,
        }
    }

    /// Plan for a continuation line: the first remaining field follows the
    /// alignment header directly.
    fn for_continuation(node: &NodeDescriptor) -> Self {
        let mut plan = Self::for_node(node, 0);
        if node.has_keys() {
            plan.before_keys = Gap::Spaces(0);
        } else if node.has_type() {
            plan.before_type = Gap::Spaces(0);
        } else if node.has_if_features {
            plan.before_features = Gap::Spaces(0);
        }
        plan
    }

    /// Whether any gap carries a break.
    pub fn has_break(&self) -> bool {
        self.before_keys == Gap::Break
            || self.before_type == Gap::Break
            || self.before_features == Gap::Break
    }

    /// Places a break at the right-most gap not yet broken, keeping the
    /// break set a contiguous suffix. `None` when every gap is broken.
    fn with_next_break(&self) -> Option<IndentPlan> {
        let mut plan = *self;
        if self.before_features != Gap::Break {
            plan.before_features = Gap::Break;
        } else if self.before_type != Gap::Break {
            plan.before_type = Gap::Break;
        } else if self.before_keys != Gap::Break {
            plan.before_keys = Gap::Break;
        } else {
            return None;
        }
        Some(plan)
    }
}

// =============================================================================
// Single-line emission
// =============================================================================

fn is_continuation(node: &NodeDescriptor) -> bool {
    node.name.text.is_empty() && node.name.kind != NameKind::CollapsedEllipsis
}

/// Width of the alignment header that stands in for
/// `<status>--<flags> <name>` on continuation lines: the two-character flag
/// field, the bracket prefix (or the space before plain names), and the
/// fixed continuation indent. The extra wrapper column of the continuation
/// line covers the `<status>--` part.
fn divided_header_width(node: &NodeDescriptor) -> usize {
    let prefix = match node.name.kind {
        NameKind::Case => 2,
        _ => 1,
    };
    2 + prefix + CONTINUATION_INDENT
}

fn write_type(node: &NodeDescriptor, sink: &mut dyn Sink) -> io::Result<()> {
    match node.type_ref.kind {
        TypeKind::PlainName => sink.put(&node.type_ref.text),
        TypeKind::LeafrefTargetPath => {
            sink.put("-> ")?;
            sink.put(&node.type_ref.text)
        }
        TypeKind::ForcedLeafrefKeyword => sink.put("leafref"),
        TypeKind::Absent => Ok(()),
    }
}

/// Renders one output line for the node: wrapper glyphs, then the header,
/// then each field whose gap has not been broken. Fields at and after the
/// first break belong to continuation lines and are not printed.
///
/// A continuation node (empty name text) gets pure alignment spaces in
/// place of the header. A collapsed node prints only its `...` placeholder.
pub fn render_node_line(
    node: &NodeDescriptor,
    wrapper: Wrapper,
    plan: &IndentPlan,
    cursor: &dyn SchemaCursor,
    sink: &mut dyn Sink,
) -> io::Result<()> {
    wrapper.write(sink)?;

    if node.name.kind == NameKind::CollapsedEllipsis {
        return sink.put("...");
    }

    if is_continuation(node) {
        write_spaces(sink, divided_header_width(node))?;
    } else {
        sink.put(node.status.symbol())?;
        sink.put("--")?;
        if node.name.kind != NameKind::Case {
            sink.put(node.flags.as_str())?;
            sink.put(" ")?;
        }
        node.name.write(sink)?;
    }

    if node.has_keys() {
        match plan.before_keys {
            Gap::Break => return Ok(()),
            Gap::Spaces(count) => {
                write_spaces(sink, count)?;
                sink.put("[")?;
                cursor.write_list_keys(sink)?;
                sink.put("]")?;
            }
        }
    }

    if node.has_type() {
        match plan.before_type {
            Gap::Break => return Ok(()),
            Gap::Spaces(count) => {
                write_spaces(sink, count)?;
                write_type(node, sink)?;
            }
        }
    }

    if node.has_if_features {
        match plan.before_features {
            Gap::Break => return Ok(()),
            Gap::Spaces(count) => {
                write_spaces(sink, count)?;
                sink.put("{")?;
                cursor.write_feature_names(sink)?;
                sink.put("}?")?;
            }
        }
    }

    Ok(())
}

/// Byte length [`render_node_line`] would produce for the same arguments.
pub fn measure(
    node: &NodeDescriptor,
    wrapper: Wrapper,
    plan: &IndentPlan,
    cursor: &dyn SchemaCursor,
) -> io::Result<usize> {
    let mut counter = CountingSink::new();
    render_node_line(node, wrapper, plan, cursor, &mut counter)?;
    Ok(counter.count())
}

// =============================================================================
// Fit search
// =============================================================================

/// Finds the indent plan under which the node's first line fits `max_len`.
///
/// Measures the one-line rendering; while it overflows, places a break at
/// the right-most gap still available (features, then type, then keys) and
/// measures the shortened first line again. Ends with outcome [`Fits`]
/// (no break needed), [`MustDivide`] (a break plan fits), or
/// [`CannotFit`] (the header alone overflows).
///
/// [`Fits`]: FitOutcome::Fits
/// [`MustDivide`]: FitOutcome::MustDivide
/// [`CannotFit`]: FitOutcome::CannotFit
pub fn try_normal_fit(
    node: &NodeDescriptor,
    wrapper: Wrapper,
    base: IndentPlan,
    max_len: usize,
    cursor: &dyn SchemaCursor,
) -> io::Result<IndentPlan> {
    let mut plan = base;
    loop {
        let width = measure(node, wrapper, &plan, cursor)?;
        if width <= max_len {
            plan.outcome = if plan.has_break() {
                FitOutcome::MustDivide
            } else {
                FitOutcome::Fits
            };
            return Ok(plan);
        }
        match plan.with_next_break() {
            Some(next) => plan = next,
            None => {
                plan.outcome = FitOutcome::CannotFit;
                return Ok(plan);
            }
        }
    }
}

/// Fit outcome for a node under a unified alignment, leafref substitution
/// included. Used by the walker when probing unified-gap candidates.
pub(crate) fn fit_outcome(
    node: &NodeDescriptor,
    wrapper: Wrapper,
    unified: usize,
    max_len: usize,
    cursor: &dyn SchemaCursor,
) -> io::Result<FitOutcome> {
    let node = substitute_overlong_leafref(node, wrapper, max_len);
    let base = IndentPlan::for_node(&node, unified);
    Ok(try_normal_fit(&node, wrapper, base, max_len, cursor)?.outcome)
}

// =============================================================================
// Whole-node emission
// =============================================================================

/// If the node's type is a leafref target whose path could never fit even
/// on a continuation line of its own, print the bare `leafref` keyword
/// instead. Decided before any fit computation.
fn substitute_overlong_leafref(
    node: &NodeDescriptor,
    wrapper: Wrapper,
    max_len: usize,
) -> NodeDescriptor {
    let mut node = node.clone();
    if node.type_ref.kind == TypeKind::LeafrefTargetPath {
        let projected =
            wrapper.char_width() + 2 + divided_header_width(&node) + node.type_ref.text.len();
        if projected > max_len {
            node.type_ref.kind = TypeKind::ForcedLeafrefKeyword;
        }
    }
    node
}

/// The fields of `node` that were not printed under `plan`, as a
/// continuation node: name text emptied (the kind is kept so the alignment
/// header stays accurate), printed fields stripped.
fn second_half(node: &NodeDescriptor, plan: &IndentPlan) -> NodeDescriptor {
    let mut rest = node.clone();
    rest.name.text = String::new();
    rest.name.module_prefix = None;
    if node.has_keys() && plan.before_keys != Gap::Break {
        rest.name.kind = NameKind::ListOrLeafList;
    }
    if node.has_type() && plan.before_type != Gap::Break {
        rest.type_ref = TypeRef::absent();
    }
    if node.has_if_features && plan.before_features != Gap::Break {
        rest.has_if_features = false;
    }
    rest
}

/// Forces the first remaining field onto the current line so every
/// continuation line makes progress, even past the length limit.
fn ensure_progress(rest: &NodeDescriptor, mut plan: IndentPlan) -> IndentPlan {
    if rest.has_keys() {
        if plan.before_keys == Gap::Break {
            plan.before_keys = Gap::Spaces(0);
        }
    } else if rest.has_type() {
        if plan.before_type == Gap::Break {
            plan.before_type = Gap::Spaces(0);
        }
    } else if rest.has_if_features && plan.before_features == Gap::Break {
        plan.before_features = Gap::Spaces(0);
    }
    plan
}

fn render_divided_rest(
    first_rest: NodeDescriptor,
    wrapper: Wrapper,
    max_len: usize,
    cursor: &dyn SchemaCursor,
    sink: &mut dyn Sink,
) -> io::Result<()> {
    let mut rest = first_rest;
    while rest.has_body() {
        sink.put("\n")?;
        let base = IndentPlan::for_continuation(&rest);
        let plan = try_normal_fit(&rest, wrapper, base, max_len, cursor)?;
        let plan = ensure_progress(&rest, plan);
        render_node_line(&rest, wrapper, &plan, cursor, sink)?;
        rest = second_half(&rest, &plan);
    }
    Ok(())
}

/// Renders a node completely: on one line when it fits, otherwise as a
/// first line plus aligned continuation lines.
///
/// `is_last_sibling` decides whether continuation lines carry a `|` in the
/// node's own column (more siblings follow below) or a blank (the node
/// closes its group).
pub fn render_entire_node(
    node: &NodeDescriptor,
    is_last_sibling: bool,
    wrapper: Wrapper,
    unified: usize,
    max_len: usize,
    cursor: &dyn SchemaCursor,
    sink: &mut dyn Sink,
) -> io::Result<()> {
    let node = substitute_overlong_leafref(node, wrapper, max_len);
    let base = IndentPlan::for_node(&node, unified);
    let plan = try_normal_fit(&node, wrapper, base, max_len, cursor)?;
    match plan.outcome {
        FitOutcome::Fits => render_node_line(&node, wrapper, &plan, cursor, sink),
        FitOutcome::MustDivide | FitOutcome::CannotFit => {
            render_node_line(&node, wrapper, &plan, cursor, sink)?;
            if plan.outcome == FitOutcome::CannotFit && !node.has_body() {
                return Ok(());
            }
            let continuation = if is_last_sibling {
                wrapper.with_blank()
            } else {
                wrapper.with_bar()
            };
            render_divided_rest(second_half(&node, &plan), continuation, max_len, cursor, sink)
        }
    }
}

#[cfg(test)]
mod tests {
    use treeline_core::{
        accessor::SchemaCursor,
        descriptor::{Flags, GAP_BEFORE_TYPE, KeywordStatement, NodeName, SectionKeyword, Status},
        sink::StringSink,
    };

    use super::*;

    /// Minimal cursor standing in for the schema: only the free-text
    /// callbacks matter to the layout engine.
    struct StubCursor {
        keys: &'static str,
        features: &'static str,
    }

    impl StubCursor {
        fn empty() -> Self {
            StubCursor {
                keys: "",
                features: "",
            }
        }
    }

    impl SchemaCursor for StubCursor {
        fn module_statement(&self) -> KeywordStatement {
            KeywordStatement::new(SectionKeyword::Module, "stub")
        }

        fn current_node(&self) -> Option<NodeDescriptor> {
            None
        }

        fn peek_next_sibling(&self) -> Option<NodeDescriptor> {
            None
        }

        fn to_parent(&mut self) -> Option<NodeDescriptor> {
            None
        }

        fn to_next_sibling(&mut self) -> Option<NodeDescriptor> {
            None
        }

        fn to_next_child(&mut self) -> Option<NodeDescriptor> {
            None
        }

        fn to_first_sibling(&mut self) -> Option<NodeDescriptor> {
            None
        }

        fn to_module_section(&mut self) -> KeywordStatement {
            self.module_statement()
        }

        fn to_next_augment(&mut self) -> Option<KeywordStatement> {
            None
        }

        fn to_rpcs_section(&mut self) -> Option<KeywordStatement> {
            None
        }

        fn to_notifications_section(&mut self) -> Option<KeywordStatement> {
            None
        }

        fn to_next_grouping(&mut self) -> Option<KeywordStatement> {
            None
        }

        fn to_next_yang_data(&mut self) -> Option<KeywordStatement> {
            None
        }

        fn write_list_keys(&self, sink: &mut dyn Sink) -> io::Result<()> {
            sink.put(self.keys)
        }

        fn write_feature_names(&self, sink: &mut dyn Sink) -> io::Result<()> {
            sink.put(self.features)
        }
    }

    fn leaf(name: &str, kind: NameKind, type_name: Option<&str>) -> NodeDescriptor {
        let mut node = NodeDescriptor::new(NodeName::new(kind, name));
        if let Some(type_name) = type_name {
            node.type_ref = TypeRef::named(type_name);
        }
        node
    }

    fn render_whole(node: &NodeDescriptor, max_len: usize, cursor: &dyn SchemaCursor) -> String {
        let mut sink = StringSink::new();
        render_entire_node(node, true, Wrapper::top(), 0, max_len, cursor, &mut sink).unwrap();
        sink.into_string()
    }

    #[test]
    fn test_plain_node_line() {
        let node = leaf("A", NameKind::Plain, None);
        assert_eq!(render_whole(&node, usize::MAX, &StubCursor::empty()), "  +--rw A");
    }

    #[test]
    fn test_case_node_has_no_flags_and_no_space() {
        let mut node = leaf("wired", NameKind::Case, None);
        node.flags = Flags::ReadWrite;
        assert_eq!(
            render_whole(&node, usize::MAX, &StubCursor::empty()),
            "  +--:(wired)"
        );
    }

    #[test]
    fn test_status_symbols_render() {
        let mut node = leaf("old", NameKind::Plain, None);
        node.status = Status::Deprecated;
        assert_eq!(render_whole(&node, usize::MAX, &StubCursor::empty()), "  x--rw old");
        node.status = Status::Obsolete;
        assert_eq!(render_whole(&node, usize::MAX, &StubCursor::empty()), "  o--rw old");
    }

    #[test]
    fn test_collapsed_node_prints_only_ellipsis() {
        let node = leaf("", NameKind::CollapsedEllipsis, None);
        assert_eq!(render_whole(&node, usize::MAX, &StubCursor::empty()), "  ...");
    }

    #[test]
    fn test_keyed_list_line() {
        let node = leaf("interface", NameKind::KeysList, None);
        let cursor = StubCursor {
            keys: "name",
            features: "",
        };
        assert_eq!(
            render_whole(&node, usize::MAX, &cursor),
            "  +--rw interface* [name]"
        );
    }

    #[test]
    fn test_type_gap_absorbs_opt_mark() {
        // The `?` consumes one space of the type gap, so the type column
        // matches that of an unmarked sibling of the same base name.
        let marked = leaf("mtu", NameKind::Optional, Some("uint16"));
        let unmarked = leaf("mtu", NameKind::Plain, Some("uint16"));
        assert_eq!(
            render_whole(&marked, usize::MAX, &StubCursor::empty()),
            "  +--rw mtu?   uint16"
        );
        assert_eq!(
            render_whole(&unmarked, usize::MAX, &StubCursor::empty()),
            "  +--rw mtu    uint16"
        );
    }

    #[test]
    fn test_features_segment() {
        let mut node = leaf("tunnel", NameKind::Optional, Some("string"));
        node.has_if_features = true;
        let cursor = StubCursor {
            keys: "",
            features: "tunnels,gre",
        };
        assert_eq!(
            render_whole(&node, usize::MAX, &cursor),
            "  +--rw tunnel?   string {tunnels,gre}?"
        );
    }

    #[test]
    fn test_leafref_renders_as_arrow_target() {
        let mut node = leaf("mgmt", NameKind::Optional, None);
        node.type_ref = TypeRef::leafref("/if:interfaces/if:interface/if:name");
        let text = render_whole(&node, usize::MAX, &StubCursor::empty());
        assert_eq!(text, "  +--rw mgmt?   -> /if:interfaces/if:interface/if:name");
    }

    #[test]
    fn test_overlong_leafref_collapses_to_keyword() {
        let mut node = leaf("mgmt", NameKind::Optional, None);
        node.type_ref = TypeRef::leafref("/if:interfaces/if:interface/if:name");
        let text = render_whole(&node, 30, &StubCursor::empty());
        assert_eq!(text, "  +--rw mgmt?   leafref");
    }

    #[test]
    fn test_measure_equals_rendered_length_and_is_stable() {
        let mut node = leaf("interface", NameKind::KeysList, Some("string"));
        node.has_if_features = true;
        let cursor = StubCursor {
            keys: "name type",
            features: "ethernet",
        };
        let plan = IndentPlan::for_node(&node, 0);
        let first = measure(&node, Wrapper::top(), &plan, &cursor).unwrap();
        let second = measure(&node, Wrapper::top(), &plan, &cursor).unwrap();
        assert_eq!(first, second);

        let mut sink = StringSink::new();
        render_node_line(&node, Wrapper::top(), &plan, &cursor, &mut sink).unwrap();
        assert_eq!(first, sink.as_str().len());
    }

    #[test]
    fn test_fit_is_monotone_in_line_length() {
        let mut node = leaf("interface", NameKind::KeysList, Some("string"));
        node.has_if_features = true;
        let cursor = StubCursor {
            keys: "name",
            features: "ethernet",
        };
        let mut fits_seen = false;
        for max_len in 0..80 {
            let plan = IndentPlan::for_node(&node, 0);
            let outcome = try_normal_fit(&node, Wrapper::top(), plan, max_len, &cursor)
                .unwrap()
                .outcome;
            if fits_seen {
                assert_eq!(outcome, FitOutcome::Fits, "fit must persist at {max_len}");
            } else if outcome == FitOutcome::Fits {
                fits_seen = true;
            }
        }
        assert!(fits_seen);
    }

    #[test]
    fn test_divided_type_aligns_under_continuation_indent() {
        let node = leaf("really-long-leaf-name", NameKind::Optional, Some("string"));
        assert_eq!(
            render_whole(&node, 30, &StubCursor::empty()),
            "  +--rw really-long-leaf-name?\n          string"
        );
    }

    #[test]
    fn test_divided_node_with_following_sibling_keeps_bar() {
        let node = leaf("really-long-leaf-name", NameKind::Optional, Some("string"));
        let mut sink = StringSink::new();
        render_entire_node(
            &node,
            false,
            Wrapper::top(),
            0,
            30,
            &StubCursor::empty(),
            &mut sink,
        )
        .unwrap();
        assert_eq!(
            sink.as_str(),
            "  +--rw really-long-leaf-name?\n  |       string"
        );
    }

    #[test]
    fn test_break_order_drops_features_first() {
        let mut node = leaf("interface", NameKind::KeysList, Some("string"));
        node.has_if_features = true;
        let cursor = StubCursor {
            keys: "name",
            features: "ethernet",
        };
        // Wide enough for name, keys and type, but not for the features.
        let text = render_whole(&node, 34, &cursor);
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("  +--rw interface* [name]   string"));
        assert_eq!(lines.next(), Some("          {ethernet}?"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_unfittable_header_prints_alone_when_no_body() {
        let node = leaf("unsplittable-token", NameKind::Plain, None);
        assert_eq!(
            render_whole(&node, 10, &StubCursor::empty()),
            "  +--rw unsplittable-token"
        );
    }

    #[test]
    fn test_unfittable_header_still_emits_body_fields() {
        let node = leaf("unsplittable-token", NameKind::Plain, Some("string"));
        assert_eq!(
            render_whole(&node, 10, &StubCursor::empty()),
            "  +--rw unsplittable-token\n          string"
        );
    }

    #[test]
    fn test_unified_gap_moves_type_column() {
        let node = leaf("ip", NameKind::Plain, Some("string"));
        let plan = IndentPlan::for_node(&node, 16);
        // Type starts at the unified column: 16 - len("ip") = 14 spaces.
        assert_eq!(plan.before_type, Gap::Spaces(14));

        let own = IndentPlan::for_node(&node, 0);
        assert_eq!(own.before_type, Gap::Spaces(GAP_BEFORE_TYPE));
    }
}

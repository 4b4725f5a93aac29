//! Canonical descriptors for tree-diagram nodes and section headers.
//!
//! A [`NodeDescriptor`] is the renderer-facing view of one schema node: its
//! status symbol, flag field, decorated name, type reference, and whether an
//! if-feature list follows. Cursor implementations derive descriptors from
//! whatever tree representation they wrap; the layout engine consumes them
//! without ever touching the underlying schema.
//!
//! # Overview
//!
//! - [`Status`] - One-character lifecycle symbol (`+`, `x`, `o`)
//! - [`Flags`] - Two-character access/operation field (`rw`, `ro`, `-x`, ...)
//! - [`NodeName`] / [`NameKind`] - Decorated node name (`(choice)`, `leaf?`, `list*`, ...)
//! - [`NameWidth`] - Rendered name width with an explicit trailing-mark record
//! - [`TypeRef`] / [`TypeKind`] - Type column content, including leafref targets
//! - [`KeywordStatement`] / [`SectionKeyword`] - Section header lines

use std::fmt;

use crate::sink::Sink;

// =============================================================================
// Gap defaults
// =============================================================================

/// Default number of spaces between a node name and its `[key ...]` list.
pub const GAP_BEFORE_KEYS: usize = 1;

/// Default number of spaces before the type column.
///
/// A name ending in a one-character opt mark (`?`, `!`, `*`) uses one space
/// less, so type columns line up whether or not a mark is present.
pub const GAP_BEFORE_TYPE: usize = 4;

/// Default number of spaces before the `{if-feature}?` segment.
pub const GAP_BEFORE_FEATURES: usize = 1;

// =============================================================================
// Status and flags
// =============================================================================

/// Lifecycle status of a node, rendered as the first character of the
/// `<status>--` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// In current use; rendered as `+`.
    #[default]
    Current,
    /// Deprecated but still present; rendered as `x`.
    Deprecated,
    /// Obsolete; rendered as `o`.
    Obsolete,
    /// No status information. Rendered as an empty string; cursor adapters
    /// never produce it, but it remains representable for callers that
    /// assemble descriptors by hand.
    None,
}

impl Status {
    /// Returns the one-character diagram symbol for this status.
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Current => "+",
            Status::Deprecated => "x",
            Status::Obsolete => "o",
            Status::None => "",
        }
    }
}

/// The two-character flag field printed after `--`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flags {
    /// Configuration data; rendered as `rw`.
    #[default]
    ReadWrite,
    /// State data; rendered as `ro`.
    ReadOnly,
    /// A node inside an rpc or action input; rendered as `-w`.
    RpcInput,
    /// A uses-of-grouping node; rendered as `-u`.
    UsesOfGrouping,
    /// An rpc or action node itself; rendered as `-x`.
    Rpc,
    /// A notification node; rendered as `-n`.
    Notification,
    /// A container carrying a mount point; rendered as `mp`.
    MountPoint,
    /// No access information; rendered as `--`.
    None,
}

impl Flags {
    /// Returns the fixed-width flag text.
    pub fn as_str(&self) -> &'static str {
        match self {
            Flags::ReadWrite => "rw",
            Flags::ReadOnly => "ro",
            Flags::RpcInput => "-w",
            Flags::UsesOfGrouping => "-u",
            Flags::Rpc => "-x",
            Flags::Notification => "-n",
            Flags::MountPoint => "mp",
            Flags::None => "--",
        }
    }
}

// =============================================================================
// Node names
// =============================================================================

/// How a node name is decorated in the diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// Undecorated name.
    Plain,
    /// A case branch, `:(name)`. Case lines carry no flag field.
    Case,
    /// A mandatory choice, `(name)`.
    Choice,
    /// A non-mandatory choice, `(name)?`.
    OptionalChoice,
    /// A non-mandatory leaf/anydata/anyxml, `name?`.
    Optional,
    /// A presence container, `name!`.
    PresenceContainer,
    /// A list without keys, or a leaf-list, `name*`.
    ListOrLeafList,
    /// A keyed list, `name*` followed by a `[key ...]` segment.
    KeysList,
    /// A mounted-module top-level data node, `/name`.
    TopLevelMount1,
    /// A mounted-module parent-reference node, `@name`.
    TopLevelMount2,
    /// A collapsed subtree placeholder. Bypasses the node header entirely
    /// and renders only `...`.
    CollapsedEllipsis,
}

impl NameKind {
    /// Text printed before the name (and before any module prefix).
    pub fn leading(&self) -> &'static str {
        match self {
            NameKind::Case => ":(",
            NameKind::Choice | NameKind::OptionalChoice => "(",
            NameKind::TopLevelMount1 => "/",
            NameKind::TopLevelMount2 => "@",
            _ => "",
        }
    }

    /// Text printed after the name.
    pub fn trailing(&self) -> &'static str {
        match self {
            NameKind::Case => ")",
            NameKind::Choice => ")",
            NameKind::OptionalChoice => ")?",
            NameKind::Optional => "?",
            NameKind::PresenceContainer => "!",
            NameKind::ListOrLeafList | NameKind::KeysList => "*",
            _ => "",
        }
    }

    /// Whether the decoration ends in a one-character opt mark.
    ///
    /// Marked names get one space less before the type column, keeping type
    /// columns aligned across marked and unmarked siblings.
    pub fn has_opt_mark(&self) -> bool {
        matches!(
            self,
            NameKind::OptionalChoice
                | NameKind::Optional
                | NameKind::PresenceContainer
                | NameKind::ListOrLeafList
                | NameKind::KeysList
        )
    }
}

/// A decorated node name.
///
/// `text` is the bare schema name; `module_prefix` is printed as
/// `<prefix>:` before it (used for nodes introduced from another module,
/// e.g. in augment sections).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeName {
    pub kind: NameKind,
    pub module_prefix: Option<String>,
    pub text: String,
}

impl NodeName {
    /// Creates a plain name without a module prefix.
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(NameKind::Plain, text)
    }

    /// Creates a name of the given kind without a module prefix.
    pub fn new(kind: NameKind, text: impl Into<String>) -> Self {
        NodeName {
            kind,
            module_prefix: None,
            text: text.into(),
        }
    }

    /// Returns the rendered width of this name together with its
    /// trailing-mark record.
    pub fn width(&self) -> NameWidth {
        let mut len = self.kind.leading().len() + self.text.len() + self.kind.trailing().len();
        if let Some(prefix) = &self.module_prefix {
            len += prefix.len() + 1;
        }
        NameWidth {
            len,
            has_mark: self.kind.has_opt_mark(),
        }
    }

    /// Writes the decorated name to the sink.
    pub fn write(&self, sink: &mut dyn Sink) -> std::io::Result<()> {
        sink.put(self.kind.leading())?;
        if let Some(prefix) = &self.module_prefix {
            sink.put(prefix)?;
            sink.put(":")?;
        }
        sink.put(&self.text)?;
        sink.put(self.kind.trailing())
    }
}

impl fmt::Display for NodeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.leading())?;
        if let Some(prefix) = &self.module_prefix {
            write!(f, "{prefix}:")?;
        }
        write!(f, "{}{}", self.text, self.kind.trailing())
    }
}

/// Rendered name width plus an explicit record of whether the name ends in
/// a one-character opt mark.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameWidth {
    /// Full rendered length, decorations and mark included.
    pub len: usize,
    /// Whether the last rendered character is an opt mark.
    pub has_mark: bool,
}

impl NameWidth {
    /// The smallest permitted gap between this name and its type column.
    pub fn min_gap(&self) -> usize {
        if self.has_mark {
            GAP_BEFORE_TYPE - 1
        } else {
            GAP_BEFORE_TYPE
        }
    }

    /// The minimum column, relative to the name start, at which this node's
    /// type can begin. Sibling groups unify on the largest of these.
    pub fn derived_min(&self) -> usize {
        self.len + self.min_gap()
    }

    /// Ordering used by the walker's nth-largest scan: wider ranks above
    /// narrower, and an unmarked name ranks above a marked name of equal
    /// derived minimum.
    pub fn ranks_above(&self, other: &NameWidth) -> bool {
        match self.derived_min().cmp(&other.derived_min()) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Equal => !self.has_mark && other.has_mark,
            std::cmp::Ordering::Less => false,
        }
    }
}

// =============================================================================
// Types
// =============================================================================

/// What the type column of a node contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    /// A named type, printed verbatim.
    PlainName,
    /// A leafref target path, printed as `-> <path>`.
    LeafrefTargetPath,
    /// A leafref whose target path would not fit; printed as the bare
    /// keyword `leafref`.
    ForcedLeafrefKeyword,
    /// No type column.
    Absent,
}

/// A node's type reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub kind: TypeKind,
    pub text: String,
}

impl TypeRef {
    /// A type reference that renders nothing.
    pub fn absent() -> Self {
        TypeRef {
            kind: TypeKind::Absent,
            text: String::new(),
        }
    }

    /// A plain named type.
    pub fn named(text: impl Into<String>) -> Self {
        TypeRef {
            kind: TypeKind::PlainName,
            text: text.into(),
        }
    }

    /// A leafref target path.
    pub fn leafref(path: impl Into<String>) -> Self {
        TypeRef {
            kind: TypeKind::LeafrefTargetPath,
            text: path.into(),
        }
    }

    pub fn is_absent(&self) -> bool {
        self.kind == TypeKind::Absent
    }
}

// =============================================================================
// Node descriptors
// =============================================================================

/// The renderer-facing view of one schema node.
///
/// Failed navigation is represented as `Option::None` at the cursor
/// boundary; a descriptor that exists is always renderable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeDescriptor {
    pub status: Status,
    pub flags: Flags,
    pub name: NodeName,
    pub type_ref: TypeRef,
    pub has_if_features: bool,
}

impl NodeDescriptor {
    /// Creates a descriptor with current status, read-write flags, no type
    /// and no features. A convenient starting point for tests and adapters.
    pub fn new(name: NodeName) -> Self {
        NodeDescriptor {
            status: Status::Current,
            flags: Flags::ReadWrite,
            name,
            type_ref: TypeRef::absent(),
            has_if_features: false,
        }
    }

    /// Whether a `[key ...]` segment follows the name.
    pub fn has_keys(&self) -> bool {
        self.name.kind == NameKind::KeysList
    }

    /// Whether a type column is rendered.
    pub fn has_type(&self) -> bool {
        !self.type_ref.is_absent()
    }

    /// Whether anything beyond the name would be rendered for this node.
    pub fn has_body(&self) -> bool {
        self.has_keys() || self.has_type() || self.has_if_features
    }
}

// =============================================================================
// Section keyword statements
// =============================================================================

/// The keyword opening a diagram section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKeyword {
    Module,
    Submodule,
    Augment,
    Rpcs,
    Notifications,
    Grouping,
    YangData,
}

impl SectionKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionKeyword::Module => "module",
            SectionKeyword::Submodule => "submodule",
            SectionKeyword::Augment => "augment",
            SectionKeyword::Rpcs => "rpcs",
            SectionKeyword::Notifications => "notifications",
            SectionKeyword::Grouping => "grouping",
            SectionKeyword::YangData => "yang-data",
        }
    }

    /// Top keywords head the whole diagram; their arguments print unsplit.
    /// Body keywords head indented sections whose path arguments may wrap
    /// at `/` boundaries.
    pub fn is_top(&self) -> bool {
        matches!(self, SectionKeyword::Module | SectionKeyword::Submodule)
    }
}

impl fmt::Display for SectionKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A section header: keyword plus its name-or-path argument.
///
/// `argument` is empty for the `rpcs` and `notifications` sections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordStatement {
    pub keyword: SectionKeyword,
    pub argument: String,
}

impl KeywordStatement {
    pub fn new(keyword: SectionKeyword, argument: impl Into<String>) -> Self {
        KeywordStatement {
            keyword,
            argument: argument.into(),
        }
    }
}

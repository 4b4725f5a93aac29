//! The raw schema-tree model.
//!
//! [`SchemaModule`] is an arena-backed tree of [`SchemaNode`]s plus the
//! per-section forests (augments, rpcs, notifications, groupings,
//! yang-data). It stores schema facts as stated (explicit config/status
//! statements, key lists, mandatory and presence bits) and leaves all
//! interpretation (flag inheritance, status inheritance, name
//! classification) to the cursor adapter.
//!
//! Nodes are identified by [`NodeId`] indices into the module's arena;
//! parent and child links are stored on the nodes themselves.

use log::trace;
use thiserror::Error;

/// Error raised by schema construction.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The parent statement kind cannot carry child data nodes.
    #[error("cannot add child node under {kind} `{parent}`")]
    ChildUnderLeaf { parent: String, kind: &'static str },

    /// Nodes must carry a non-empty name.
    #[error("schema node name must not be empty")]
    EmptyNodeName,
}

/// The schema statement a node was declared with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    Container,
    List,
    Leaf,
    LeafList,
    Choice,
    Case,
    Anydata,
    Anyxml,
    Rpc,
    Action,
    Input,
    Output,
    Notification,
    Uses,
    /// A collapsed-subtree placeholder, rendered as `...`.
    Collapsed,
}

impl StatementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Container => "container",
            StatementKind::List => "list",
            StatementKind::Leaf => "leaf",
            StatementKind::LeafList => "leaf-list",
            StatementKind::Choice => "choice",
            StatementKind::Case => "case",
            StatementKind::Anydata => "anydata",
            StatementKind::Anyxml => "anyxml",
            StatementKind::Rpc => "rpc",
            StatementKind::Action => "action",
            StatementKind::Input => "input",
            StatementKind::Output => "output",
            StatementKind::Notification => "notification",
            StatementKind::Uses => "uses",
            StatementKind::Collapsed => "...",
        }
    }

    /// Whether this statement kind terminates a branch (no child data nodes).
    pub fn is_leafy(&self) -> bool {
        matches!(
            self,
            StatementKind::Leaf
                | StatementKind::LeafList
                | StatementKind::Anydata
                | StatementKind::Anyxml
                | StatementKind::Collapsed
        )
    }
}

/// An explicit `status` statement value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplicitStatus {
    Current,
    Deprecated,
    Obsolete,
}

/// Which mounted-module top-level variant a node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountTop {
    /// Mounted data node, decorated with `/`.
    Data,
    /// Parent-reference node, decorated with `@`.
    ParentRef,
}

/// Identifier of a node in a [`SchemaModule`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// Identifier of an augment section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AugmentId(usize);

/// Identifier of a grouping section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupingId(usize);

/// Identifier of a yang-data section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct YangDataId(usize);

/// One raw schema node.
///
/// Constructed with [`SchemaNode::new`] plus the `with_`/marker builders,
/// then attached to a [`SchemaModule`].
#[derive(Debug, Clone)]
pub struct SchemaNode {
    name: String,
    prefix: Option<String>,
    kind: StatementKind,
    type_name: Option<String>,
    leafref_path: Option<String>,
    keys: Vec<String>,
    if_features: Vec<String>,
    presence: bool,
    mandatory: bool,
    config: Option<bool>,
    status: Option<ExplicitStatus>,
    mount_point: bool,
    mount_top: Option<MountTop>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SchemaNode {
    pub fn new(kind: StatementKind, name: impl Into<String>) -> Self {
        SchemaNode {
            name: name.into(),
            prefix: None,
            kind,
            type_name: None,
            leafref_path: None,
            keys: Vec::new(),
            if_features: Vec::new(),
            presence: false,
            mandatory: false,
            config: None,
            status: None,
            mount_point: false,
            mount_top: None,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    pub fn with_leafref(mut self, path: impl Into<String>) -> Self {
        self.leafref_path = Some(path.into());
        self
    }

    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_if_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.if_features = features.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_config(mut self, config: bool) -> Self {
        self.config = Some(config);
        self
    }

    pub fn with_status(mut self, status: ExplicitStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn presence(mut self) -> Self {
        self.presence = true;
        self
    }

    pub fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub fn mount_point(mut self) -> Self {
        self.mount_point = true;
        self
    }

    pub fn mount_top(mut self, variant: MountTop) -> Self {
        self.mount_top = Some(variant);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn kind(&self) -> StatementKind {
        self.kind
    }

    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn leafref_path(&self) -> Option<&str> {
        self.leafref_path.as_deref()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn if_features(&self) -> &[String] {
        &self.if_features
    }

    pub fn is_presence(&self) -> bool {
        self.presence
    }

    pub fn is_mandatory(&self) -> bool {
        self.mandatory
    }

    pub fn explicit_config(&self) -> Option<bool> {
        self.config
    }

    pub fn explicit_status(&self) -> Option<ExplicitStatus> {
        self.status
    }

    pub fn has_mount_point(&self) -> bool {
        self.mount_point
    }

    pub fn mount_top_kind(&self) -> Option<MountTop> {
        self.mount_top
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// An augment section: target path plus its forest roots.
#[derive(Debug, Clone)]
pub struct Augment {
    pub path: String,
    pub roots: Vec<NodeId>,
}

/// A grouping section: grouping name plus its forest roots.
#[derive(Debug, Clone)]
pub struct Grouping {
    pub name: String,
    pub roots: Vec<NodeId>,
}

/// A yang-data section: template name plus its forest roots.
#[derive(Debug, Clone)]
pub struct YangData {
    pub name: String,
    pub roots: Vec<NodeId>,
}

/// A complete module (or submodule) schema tree with all diagram sections.
#[derive(Debug, Clone)]
pub struct SchemaModule {
    name: String,
    submodule: bool,
    nodes: Vec<SchemaNode>,
    roots: Vec<NodeId>,
    augments: Vec<Augment>,
    rpcs: Vec<NodeId>,
    notifications: Vec<NodeId>,
    groupings: Vec<Grouping>,
    yang_data: Vec<YangData>,
}

impl SchemaModule {
    pub fn new(name: impl Into<String>) -> Self {
        SchemaModule {
            name: name.into(),
            submodule: false,
            nodes: Vec::new(),
            roots: Vec::new(),
            augments: Vec::new(),
            rpcs: Vec::new(),
            notifications: Vec::new(),
            groupings: Vec::new(),
            yang_data: Vec::new(),
        }
    }

    pub fn submodule(name: impl Into<String>) -> Self {
        let mut module = Self::new(name);
        module.submodule = true;
        module
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_submodule(&self) -> bool {
        self.submodule
    }

    /// Returns the node for the given ID.
    ///
    /// # Panics
    /// Panics if the ID does not belong to this module. IDs are only handed
    /// out by the attach methods, so a foreign ID is a caller bug.
    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn augments(&self) -> &[Augment] {
        &self.augments
    }

    pub fn rpcs(&self) -> &[NodeId] {
        &self.rpcs
    }

    pub fn notifications(&self) -> &[NodeId] {
        &self.notifications
    }

    pub fn groupings(&self) -> &[Grouping] {
        &self.groupings
    }

    pub fn yang_data(&self) -> &[YangData] {
        &self.yang_data
    }

    fn insert(&mut self, node: SchemaNode) -> Result<NodeId, SchemaError> {
        if node.name.is_empty() && node.kind != StatementKind::Collapsed {
            return Err(SchemaError::EmptyNodeName);
        }
        let id = NodeId(self.nodes.len());
        trace!(name = node.name.as_str(), kind = node.kind.as_str(); "attaching schema node");
        self.nodes.push(node);
        Ok(id)
    }

    /// Attaches a node to the module-tree forest.
    pub fn add_root(&mut self, node: SchemaNode) -> Result<NodeId, SchemaError> {
        let id = self.insert(node)?;
        self.roots.push(id);
        Ok(id)
    }

    /// Attaches a node as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, node: SchemaNode) -> Result<NodeId, SchemaError> {
        let parent_node = &self.nodes[parent.0];
        if parent_node.kind.is_leafy() {
            return Err(SchemaError::ChildUnderLeaf {
                parent: parent_node.name.clone(),
                kind: parent_node.kind.as_str(),
            });
        }
        let mut node = node;
        node.parent = Some(parent);
        let id = self.insert(node)?;
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Opens a new augment section for the given target path.
    pub fn add_augment(&mut self, path: impl Into<String>) -> AugmentId {
        let id = AugmentId(self.augments.len());
        self.augments.push(Augment {
            path: path.into(),
            roots: Vec::new(),
        });
        id
    }

    /// Attaches a forest root to an augment section.
    pub fn add_augment_root(
        &mut self,
        augment: AugmentId,
        node: SchemaNode,
    ) -> Result<NodeId, SchemaError> {
        let id = self.insert(node)?;
        self.augments[augment.0].roots.push(id);
        Ok(id)
    }

    /// Attaches a forest root to the rpcs section.
    pub fn add_rpc_root(&mut self, node: SchemaNode) -> Result<NodeId, SchemaError> {
        let id = self.insert(node)?;
        self.rpcs.push(id);
        Ok(id)
    }

    /// Attaches a forest root to the notifications section.
    pub fn add_notification_root(&mut self, node: SchemaNode) -> Result<NodeId, SchemaError> {
        let id = self.insert(node)?;
        self.notifications.push(id);
        Ok(id)
    }

    /// Opens a new grouping section.
    pub fn add_grouping(&mut self, name: impl Into<String>) -> GroupingId {
        let id = GroupingId(self.groupings.len());
        self.groupings.push(Grouping {
            name: name.into(),
            roots: Vec::new(),
        });
        id
    }

    /// Attaches a forest root to a grouping section.
    pub fn add_grouping_root(
        &mut self,
        grouping: GroupingId,
        node: SchemaNode,
    ) -> Result<NodeId, SchemaError> {
        let id = self.insert(node)?;
        self.groupings[grouping.0].roots.push(id);
        Ok(id)
    }

    /// Opens a new yang-data section.
    pub fn add_yang_data(&mut self, name: impl Into<String>) -> YangDataId {
        let id = YangDataId(self.yang_data.len());
        self.yang_data.push(YangData {
            name: name.into(),
            roots: Vec::new(),
        });
        id
    }

    /// Attaches a forest root to a yang-data section.
    pub fn add_yang_data_root(
        &mut self,
        yang_data: YangDataId,
        node: SchemaNode,
    ) -> Result<NodeId, SchemaError> {
        let id = self.insert(node)?;
        self.yang_data[yang_data.0].roots.push(id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_root_and_child() {
        let mut module = SchemaModule::new("demo");
        let root = module
            .add_root(SchemaNode::new(StatementKind::Container, "system"))
            .unwrap();
        let child = module
            .add_child(root, SchemaNode::new(StatementKind::Leaf, "hostname"))
            .unwrap();

        assert_eq!(module.roots(), &[root]);
        assert_eq!(module.node(root).children(), &[child]);
        assert_eq!(module.node(child).parent(), Some(root));
        assert_eq!(module.node(child).name(), "hostname");
    }

    #[test]
    fn test_child_under_leaf_is_rejected() {
        let mut module = SchemaModule::new("demo");
        let leaf = module
            .add_root(SchemaNode::new(StatementKind::Leaf, "hostname"))
            .unwrap();
        let err = module
            .add_child(leaf, SchemaNode::new(StatementKind::Leaf, "oops"))
            .unwrap_err();
        assert!(matches!(err, SchemaError::ChildUnderLeaf { .. }));
    }

    #[test]
    fn test_empty_name_is_rejected() {
        let mut module = SchemaModule::new("demo");
        let err = module
            .add_root(SchemaNode::new(StatementKind::Leaf, ""))
            .unwrap_err();
        assert!(matches!(err, SchemaError::EmptyNodeName));
    }

    #[test]
    fn test_collapsed_placeholder_needs_no_name() {
        let mut module = SchemaModule::new("demo");
        assert!(
            module
                .add_root(SchemaNode::new(StatementKind::Collapsed, ""))
                .is_ok()
        );
    }

    #[test]
    fn test_sections_preserve_order() {
        let mut module = SchemaModule::new("demo");
        let first = module.add_augment("/sys:system");
        let second = module.add_augment("/if:interfaces");
        module
            .add_augment_root(first, SchemaNode::new(StatementKind::Leaf, "a"))
            .unwrap();
        module
            .add_augment_root(second, SchemaNode::new(StatementKind::Leaf, "b"))
            .unwrap();

        assert_eq!(module.augments().len(), 2);
        assert_eq!(module.augments()[0].path, "/sys:system");
        assert_eq!(module.augments()[1].path, "/if:interfaces");
    }

    #[test]
    fn test_builder_attributes() {
        let node = SchemaNode::new(StatementKind::List, "interface")
            .with_keys(["name"])
            .with_if_features(["ethernet"])
            .with_config(true)
            .with_status(ExplicitStatus::Deprecated);
        assert_eq!(node.keys(), &["name".to_string()]);
        assert_eq!(node.if_features(), &["ethernet".to_string()]);
        assert_eq!(node.explicit_config(), Some(true));
        assert_eq!(node.explicit_status(), Some(ExplicitStatus::Deprecated));
    }
}

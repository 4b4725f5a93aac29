//! Cursor adapter over the raw schema model.
//!
//! [`SketchCursor`] implements [`SchemaCursor`] for a
//! [`SchemaModule`], deriving canonical descriptors on the fly:
//!
//! - name kind by statement-kind priority (case, choice, presence
//!   container, keyed list, list/leaf-list, optional anydata/anyxml,
//!   optional non-key leaf, plain),
//! - flags from the operation statements (`rpc`/`action`, `notification`,
//!   `input`, `output`, `uses`, mount points) or, failing those, the
//!   inherited config value,
//! - status from the nearest ancestor that set one explicitly,
//! - type text from the leafref path or type name of leaves and
//!   leaf-lists.
//!
//! The cursor holds one position (section + node) and per-section
//! iteration state; failed moves return `None` and leave the position
//! untouched.

use std::io;

use treeline_core::{
    accessor::SchemaCursor,
    descriptor::{
        Flags, KeywordStatement, NameKind, NodeDescriptor, NodeName, SectionKeyword, Status,
        TypeRef,
    },
    schema::{ExplicitStatus, MountTop, NodeId, SchemaModule, SchemaNode, StatementKind},
    sink::Sink,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionRef {
    Tree,
    Augment(usize),
    Rpcs,
    Notifications,
    Grouping(usize),
    YangData(usize),
}

/// A [`SchemaCursor`] over a [`SchemaModule`].
pub struct SketchCursor<'a> {
    module: &'a SchemaModule,
    position: Option<(SectionRef, NodeId)>,
    next_augment: usize,
    rpcs_visited: bool,
    notifications_visited: bool,
    next_grouping: usize,
    next_yang_data: usize,
}

impl<'a> SketchCursor<'a> {
    /// Creates a cursor positioned at the first root of the module tree.
    pub fn new(module: &'a SchemaModule) -> Self {
        let mut cursor = SketchCursor {
            module,
            position: None,
            next_augment: 0,
            rpcs_visited: false,
            notifications_visited: false,
            next_grouping: 0,
            next_yang_data: 0,
        };
        cursor.enter_forest(SectionRef::Tree);
        cursor
    }

    fn section_roots(&self, section: SectionRef) -> &'a [NodeId] {
        match section {
            SectionRef::Tree => self.module.roots(),
            SectionRef::Augment(index) => &self.module.augments()[index].roots,
            SectionRef::Rpcs => self.module.rpcs(),
            SectionRef::Notifications => self.module.notifications(),
            SectionRef::Grouping(index) => &self.module.groupings()[index].roots,
            SectionRef::YangData(index) => &self.module.yang_data()[index].roots,
        }
    }

    /// The sibling list the node belongs to: its parent's children, or the
    /// roots of its section.
    fn sibling_list(&self, section: SectionRef, id: NodeId) -> &'a [NodeId] {
        match self.module.node(id).parent() {
            Some(parent) => self.module.node(parent).children(),
            None => self.section_roots(section),
        }
    }

    fn sibling_index(&self, section: SectionRef, id: NodeId) -> usize {
        self.sibling_list(section, id)
            .iter()
            .position(|&candidate| candidate == id)
            .expect("cursor node belongs to its sibling list")
    }

    fn enter_forest(&mut self, section: SectionRef) {
        self.position = self
            .section_roots(section)
            .first()
            .map(|&id| (section, id));
    }

    fn move_to(&mut self, section: SectionRef, id: NodeId) -> NodeDescriptor {
        self.position = Some((section, id));
        self.descriptor(id)
    }

    // -------------------------------------------------------------------------
    // Descriptor derivation
    // -------------------------------------------------------------------------

    fn descriptor(&self, id: NodeId) -> NodeDescriptor {
        let node = self.module.node(id);
        let mut name = NodeName::new(self.classify_name(id), node.name());
        name.module_prefix = node.prefix().map(str::to_string);
        NodeDescriptor {
            status: self.effective_status(id),
            flags: self.derive_flags(id),
            name,
            type_ref: Self::derive_type(node),
            has_if_features: !node.if_features().is_empty(),
        }
    }

    fn classify_name(&self, id: NodeId) -> NameKind {
        let node = self.module.node(id);
        if let Some(mount) = node.mount_top_kind() {
            return match mount {
                MountTop::Data => NameKind::TopLevelMount1,
                MountTop::ParentRef => NameKind::TopLevelMount2,
            };
        }
        match node.kind() {
            StatementKind::Collapsed => NameKind::CollapsedEllipsis,
            StatementKind::Case => NameKind::Case,
            StatementKind::Choice => {
                if node.is_mandatory() {
                    NameKind::Choice
                } else {
                    NameKind::OptionalChoice
                }
            }
            StatementKind::Container if node.is_presence() => NameKind::PresenceContainer,
            StatementKind::List if !node.keys().is_empty() => NameKind::KeysList,
            StatementKind::List | StatementKind::LeafList => NameKind::ListOrLeafList,
            StatementKind::Anydata | StatementKind::Anyxml if !node.is_mandatory() => {
                NameKind::Optional
            }
            StatementKind::Leaf if !node.is_mandatory() && !self.is_list_key(id) => {
                NameKind::Optional
            }
            _ => NameKind::Plain,
        }
    }

    /// Whether the node is one of its parent list's keys. Keys never carry
    /// the optional `?` mark.
    fn is_list_key(&self, id: NodeId) -> bool {
        let node = self.module.node(id);
        node.parent().is_some_and(|parent| {
            let parent = self.module.node(parent);
            parent.kind() == StatementKind::List
                && parent.keys().iter().any(|key| key == node.name())
        })
    }

    fn derive_flags(&self, id: NodeId) -> Flags {
        let node = self.module.node(id);
        match node.kind() {
            StatementKind::Rpc | StatementKind::Action => return Flags::Rpc,
            StatementKind::Notification => return Flags::Notification,
            StatementKind::Input => return Flags::RpcInput,
            StatementKind::Output => return Flags::ReadOnly,
            StatementKind::Uses => return Flags::UsesOfGrouping,
            _ => {}
        }
        if node.has_mount_point() {
            return Flags::MountPoint;
        }

        // Operation context wins over config inheritance.
        let mut ancestor = node.parent();
        while let Some(current) = ancestor {
            match self.module.node(current).kind() {
                StatementKind::Input => return Flags::RpcInput,
                StatementKind::Output | StatementKind::Notification => return Flags::ReadOnly,
                _ => {}
            }
            ancestor = self.module.node(current).parent();
        }

        if self.effective_config(id) {
            Flags::ReadWrite
        } else {
            Flags::ReadOnly
        }
    }

    /// Nearest explicit `config` statement on the node or an ancestor;
    /// configuration (`true`) when none is set.
    fn effective_config(&self, id: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node_id) = current {
            if let Some(config) = self.module.node(node_id).explicit_config() {
                return config;
            }
            current = self.module.node(node_id).parent();
        }
        true
    }

    /// Status inherited from the nearest ancestor that set one explicitly.
    /// A node's own statement takes effect only while the inherited value
    /// is exactly `current`.
    fn effective_status(&self, id: NodeId) -> Status {
        let node = self.module.node(id);
        let inherited = match node.parent() {
            Some(parent) => self.effective_status(parent),
            None => Status::Current,
        };
        if inherited != Status::Current {
            return inherited;
        }
        match node.explicit_status() {
            Some(ExplicitStatus::Deprecated) => Status::Deprecated,
            Some(ExplicitStatus::Obsolete) => Status::Obsolete,
            Some(ExplicitStatus::Current) | None => Status::Current,
        }
    }

    fn derive_type(node: &SchemaNode) -> TypeRef {
        match node.kind() {
            StatementKind::Leaf | StatementKind::LeafList => {
                if let Some(path) = node.leafref_path() {
                    TypeRef::leafref(path)
                } else if let Some(name) = node.type_name() {
                    TypeRef::named(name)
                } else {
                    TypeRef::absent()
                }
            }
            _ => TypeRef::absent(),
        }
    }
}

impl SchemaCursor for SketchCursor<'_> {
    fn module_statement(&self) -> KeywordStatement {
        let keyword = if self.module.is_submodule() {
            SectionKeyword::Submodule
        } else {
            SectionKeyword::Module
        };
        KeywordStatement::new(keyword, self.module.name())
    }

    fn current_node(&self) -> Option<NodeDescriptor> {
        self.position.map(|(_, id)| self.descriptor(id))
    }

    fn peek_next_sibling(&self) -> Option<NodeDescriptor> {
        let (section, id) = self.position?;
        let siblings = self.sibling_list(section, id);
        let index = self.sibling_index(section, id);
        siblings
            .get(index + 1)
            .map(|&sibling| self.descriptor(sibling))
    }

    fn to_parent(&mut self) -> Option<NodeDescriptor> {
        let (section, id) = self.position?;
        let parent = self.module.node(id).parent()?;
        Some(self.move_to(section, parent))
    }

    fn to_next_sibling(&mut self) -> Option<NodeDescriptor> {
        let (section, id) = self.position?;
        let siblings = self.sibling_list(section, id);
        let index = self.sibling_index(section, id);
        let next = *siblings.get(index + 1)?;
        Some(self.move_to(section, next))
    }

    fn to_next_child(&mut self) -> Option<NodeDescriptor> {
        let (section, id) = self.position?;
        let child = *self.module.node(id).children().first()?;
        Some(self.move_to(section, child))
    }

    fn to_first_sibling(&mut self) -> Option<NodeDescriptor> {
        let (section, id) = self.position?;
        let first = *self.sibling_list(section, id).first()?;
        Some(self.move_to(section, first))
    }

    fn to_module_section(&mut self) -> KeywordStatement {
        self.enter_forest(SectionRef::Tree);
        self.module_statement()
    }

    fn to_next_augment(&mut self) -> Option<KeywordStatement> {
        let index = self.next_augment;
        let augment = self.module.augments().get(index)?;
        self.next_augment += 1;
        self.enter_forest(SectionRef::Augment(index));
        Some(KeywordStatement::new(
            SectionKeyword::Augment,
            augment.path.clone(),
        ))
    }

    fn to_rpcs_section(&mut self) -> Option<KeywordStatement> {
        if self.rpcs_visited || self.module.rpcs().is_empty() {
            return None;
        }
        self.rpcs_visited = true;
        self.enter_forest(SectionRef::Rpcs);
        Some(KeywordStatement::new(SectionKeyword::Rpcs, ""))
    }

    fn to_notifications_section(&mut self) -> Option<KeywordStatement> {
        if self.notifications_visited || self.module.notifications().is_empty() {
            return None;
        }
        self.notifications_visited = true;
        self.enter_forest(SectionRef::Notifications);
        Some(KeywordStatement::new(SectionKeyword::Notifications, ""))
    }

    fn to_next_grouping(&mut self) -> Option<KeywordStatement> {
        let index = self.next_grouping;
        let grouping = self.module.groupings().get(index)?;
        self.next_grouping += 1;
        self.enter_forest(SectionRef::Grouping(index));
        Some(KeywordStatement::new(
            SectionKeyword::Grouping,
            grouping.name.clone(),
        ))
    }

    fn to_next_yang_data(&mut self) -> Option<KeywordStatement> {
        let index = self.next_yang_data;
        let yang_data = self.module.yang_data().get(index)?;
        self.next_yang_data += 1;
        self.enter_forest(SectionRef::YangData(index));
        Some(KeywordStatement::new(
            SectionKeyword::YangData,
            yang_data.name.clone(),
        ))
    }

    fn write_list_keys(&self, sink: &mut dyn Sink) -> io::Result<()> {
        let Some((_, id)) = self.position else {
            return Ok(());
        };
        for (index, key) in self.module.node(id).keys().iter().enumerate() {
            if index > 0 {
                sink.put(" ")?;
            }
            sink.put(key)?;
        }
        Ok(())
    }

    fn write_feature_names(&self, sink: &mut dyn Sink) -> io::Result<()> {
        let Some((_, id)) = self.position else {
            return Ok(());
        };
        for (index, feature) in self.module.node(id).if_features().iter().enumerate() {
            if index > 0 {
                sink.put(",")?;
            }
            sink.put(feature)?;
        }
        Ok(())
    }
}

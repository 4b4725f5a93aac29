//! Example: Rendering a diagram from the schema model
//!
//! This example demonstrates how to programmatically build a schema tree
//! using the schema model types directly, without parsing sketch source.

use treeline::{
    TreeRenderer,
    config::RenderConfig,
    schema::{ExplicitStatus, SchemaModule, SchemaNode, StatementKind},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Building schema module from the model...\n");

    let mut module = SchemaModule::new("example-system");

    // The module tree: a container holding a keyed list of interfaces.
    let interfaces = module.add_root(SchemaNode::new(StatementKind::Container, "interfaces"))?;
    let interface = module.add_child(
        interfaces,
        SchemaNode::new(StatementKind::List, "interface").with_keys(["name"]),
    )?;
    module.add_child(
        interface,
        SchemaNode::new(StatementKind::Leaf, "name").with_type("string"),
    )?;
    module.add_child(
        interface,
        SchemaNode::new(StatementKind::Leaf, "mtu").with_type("uint16"),
    )?;
    module.add_child(
        interface,
        SchemaNode::new(StatementKind::Leaf, "speed")
            .with_type("uint32")
            .with_status(ExplicitStatus::Deprecated),
    )?;
    module.add_child(
        interface,
        SchemaNode::new(StatementKind::Leaf, "lower-layer").with_leafref("../../interface/name"),
    )?;

    // Operational state lives in a read-only subtree.
    let state = module.add_root(
        SchemaNode::new(StatementKind::Container, "interfaces-state").with_config(false),
    )?;
    module.add_child(
        state,
        SchemaNode::new(StatementKind::Leaf, "total-octets").with_type("uint64"),
    )?;

    // An rpc with input and output parameters.
    let restart = module.add_rpc_root(SchemaNode::new(StatementKind::Rpc, "restart-interface"))?;
    let input = module.add_child(restart, SchemaNode::new(StatementKind::Input, "input"))?;
    module.add_child(
        input,
        SchemaNode::new(StatementKind::Leaf, "name").with_type("string").mandatory(),
    )?;
    let output = module.add_child(restart, SchemaNode::new(StatementKind::Output, "output"))?;
    module.add_child(
        output,
        SchemaNode::new(StatementKind::Leaf, "restarted-at").with_type("yang:date-and-time"),
    )?;

    // A notification for link state changes.
    let flap = module.add_notification_root(SchemaNode::new(
        StatementKind::Notification,
        "link-state-change",
    ))?;
    module.add_child(
        flap,
        SchemaNode::new(StatementKind::Leaf, "if-name").with_type("string"),
    )?;

    let renderer = TreeRenderer::new(RenderConfig::default());
    let diagram = renderer.render_to_string(&module)?;

    println!("{diagram}");
    Ok(())
}

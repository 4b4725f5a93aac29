//! Parser for the schema sketch format.
//!
//! A sketch is line-oriented. Section headers sit at column zero
//! (`module <name>`, `augment <path>`, `rpcs`, `notifications`,
//! `grouping <name>`, `yang-data <name>`); node statements are indented by
//! two spaces per nesting level under the most recent header:
//!
//! ```text
//! module demo
//!   container interfaces
//!     list interface keys="name"
//!       leaf name type=string
//!       leaf enabled type=boolean
//!
//! augment /sys:system
//!   leaf hostname type=string prefix=dmo
//! ```
//!
//! A node statement is `<kind> <name> [attr ...]` with kinds matching the
//! schema statements of [`StatementKind`]; `input`/`output` take no name and
//! `...` marks a collapsed subtree. Attributes: `type=`, `leafref=`,
//! `keys=`, `features=`, `prefix=`, `config=`, `status=`, `mount=`,
//! `presence`, `mandatory`, `mp`. Blank lines and `#` comments are skipped.

use indexmap::IndexMap;
use log::{debug, trace};
use winnow::{
    Parser as _,
    ascii::space1,
    combinator::{alt, delimited, preceded, separated},
    error::{ContextError, ErrMode},
    token::take_while,
};

use treeline_core::schema::{
    AugmentId, ExplicitStatus, GroupingId, MountTop, NodeId, SchemaModule, SchemaNode,
    StatementKind, YangDataId,
};

use crate::error::{Diagnostic, ParseError};

type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

// =============================================================================
// Statement grammar
// =============================================================================

/// One parsed sketch line.
#[derive(Debug)]
enum Statement {
    Module { name: String, submodule: bool },
    Augment { path: String },
    Rpcs,
    Notifications,
    Grouping { name: String },
    YangData { name: String },
    Node(Box<SchemaNode>),
}

/// A grammar-level failure within one statement.
struct StatementError {
    /// 0-based column within the statement text.
    column: usize,
    width: usize,
    message: String,
    help: Option<String>,
}

impl StatementError {
    fn new(column: usize, width: usize, message: impl Into<String>) -> Self {
        StatementError {
            column,
            width: width.max(1),
            message: message.into(),
            help: None,
        }
    }

    fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

#[derive(Debug, Clone)]
enum Attr<'src> {
    Type(&'src str),
    Leafref(&'src str),
    Keys(Vec<&'src str>),
    Features(Vec<&'src str>),
    Prefix(&'src str),
    Config(bool),
    Status(ExplicitStatus),
    Mount(MountTop),
    Presence,
    Mandatory,
    MountPoint,
}

/// Parse a bare identifier (also covers `leaf-list`, `yang-data`, `...`).
fn ident<'src>(input: &mut &'src str) -> IResult<&'src str> {
    take_while(1.., |c: char| {
        c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
    })
    .parse_next(input)
}

/// Parse a whitespace-free token (paths, type names with prefixes).
fn token<'src>(input: &mut &'src str) -> IResult<&'src str> {
    take_while(1.., |c: char| !c.is_whitespace()).parse_next(input)
}

/// Parse a token that may appear inside a comma-separated list.
fn list_token<'src>(input: &mut &'src str) -> IResult<&'src str> {
    take_while(1.., |c: char| !c.is_whitespace() && c != ',').parse_next(input)
}

/// Parse a double-quoted string (no escapes; sketch values never need them).
fn quoted<'src>(input: &mut &'src str) -> IResult<&'src str> {
    delimited('"', take_while(0.., |c: char| c != '"'), '"').parse_next(input)
}

fn keys_value<'src>(input: &mut &'src str) -> IResult<Vec<&'src str>> {
    alt((
        quoted.map(|text: &'src str| text.split_whitespace().collect()),
        ident.map(|key| vec![key]),
    ))
    .parse_next(input)
}

fn attr<'src>(input: &mut &'src str) -> IResult<Attr<'src>> {
    alt((
        alt((
            preceded("type=", token).map(Attr::Type),
            preceded("leafref=", token).map(Attr::Leafref),
            preceded("keys=", keys_value).map(Attr::Keys),
            preceded("features=", separated(1.., list_token, ','))
                .map(|features: Vec<&'src str>| Attr::Features(features)),
            preceded("prefix=", ident).map(Attr::Prefix),
            preceded(
                "config=",
                alt(("true".value(true), "false".value(false))),
            )
            .map(Attr::Config),
            preceded(
                "status=",
                alt((
                    "current".value(ExplicitStatus::Current),
                    "deprecated".value(ExplicitStatus::Deprecated),
                    "obsolete".value(ExplicitStatus::Obsolete),
                )),
            )
            .map(Attr::Status),
        )),
        preceded(
            "mount=",
            alt((
                "data".value(MountTop::Data),
                "parent-ref".value(MountTop::ParentRef),
            )),
        )
        .map(Attr::Mount),
        "presence".value(Attr::Presence),
        "mandatory".value(Attr::Mandatory),
        "mp".value(Attr::MountPoint),
    ))
    .parse_next(input)
}

/// Maps a statement keyword to a node kind; `named` is false for the
/// anonymous `input`/`output` statements.
fn node_kind(keyword: &str) -> Option<(StatementKind, bool)> {
    let kind = match keyword {
        "container" => StatementKind::Container,
        "list" => StatementKind::List,
        "leaf" => StatementKind::Leaf,
        "leaf-list" => StatementKind::LeafList,
        "choice" => StatementKind::Choice,
        "case" => StatementKind::Case,
        "anydata" => StatementKind::Anydata,
        "anyxml" => StatementKind::Anyxml,
        "rpc" => StatementKind::Rpc,
        "action" => StatementKind::Action,
        "input" => return Some((StatementKind::Input, false)),
        "output" => return Some((StatementKind::Output, false)),
        "notification" => StatementKind::Notification,
        "uses" => StatementKind::Uses,
        "..." => return Some((StatementKind::Collapsed, false)),
        _ => return None,
    };
    Some((kind, true))
}

/// Column of the remaining input within the full statement text.
fn column_of(line: &str, rest: &str) -> usize {
    line.len() - rest.len()
}

fn ensure_end(line: &str, rest: &str) -> Result<(), StatementError> {
    let rest = rest.trim_start();
    if rest.is_empty() {
        Ok(())
    } else {
        Err(StatementError::new(
            column_of(line, rest),
            rest.len(),
            "unexpected trailing input",
        ))
    }
}

fn required_name<'src>(
    line: &str,
    input: &mut &'src str,
    what: &str,
) -> Result<&'src str, StatementError> {
    let column = column_of(line, input);
    (space1, ident)
        .map(|(_, name)| name)
        .parse_next(input)
        .map_err(|_| StatementError::new(column, 1, format!("expected {what}")))
}

fn required_path<'src>(
    line: &str,
    input: &mut &'src str,
) -> Result<&'src str, StatementError> {
    let column = column_of(line, input);
    (space1, token)
        .map(|(_, path)| path)
        .parse_next(input)
        .map_err(|_| StatementError::new(column, 1, "expected a target path"))
}

fn parse_statement(line: &str) -> Result<Statement, StatementError> {
    let mut input = line;
    let Ok(keyword) = ident(&mut input) else {
        return Err(StatementError::new(0, 1, "expected a statement keyword"));
    };

    match keyword {
        "module" | "submodule" => {
            let name = required_name(line, &mut input, "a module name")?;
            ensure_end(line, input)?;
            Ok(Statement::Module {
                name: name.to_string(),
                submodule: keyword == "submodule",
            })
        }
        "augment" => {
            let path = required_path(line, &mut input)?;
            ensure_end(line, input)?;
            Ok(Statement::Augment {
                path: path.to_string(),
            })
        }
        "rpcs" => {
            ensure_end(line, input)?;
            Ok(Statement::Rpcs)
        }
        "notifications" => {
            ensure_end(line, input)?;
            Ok(Statement::Notifications)
        }
        "grouping" => {
            let name = required_name(line, &mut input, "a grouping name")?;
            ensure_end(line, input)?;
            Ok(Statement::Grouping {
                name: name.to_string(),
            })
        }
        "yang-data" => {
            let name = required_name(line, &mut input, "a yang-data template name")?;
            ensure_end(line, input)?;
            Ok(Statement::YangData {
                name: name.to_string(),
            })
        }
        _ => match node_kind(keyword) {
            Some((kind, named)) => node_statement(kind, named, line, input),
            None => Err(StatementError::new(
                0,
                keyword.len(),
                format!("unknown statement keyword `{keyword}`"),
            )
            .with_help(
                "expected a section header (module, submodule, augment, rpcs, \
                 notifications, grouping, yang-data) or a node statement \
                 (container, list, leaf, leaf-list, choice, case, anydata, \
                 anyxml, rpc, action, input, output, notification, uses, ...)",
            )),
        },
    }
}

fn node_statement(
    kind: StatementKind,
    named: bool,
    line: &str,
    mut input: &str,
) -> Result<Statement, StatementError> {
    let name = if named {
        required_name(line, &mut input, "a node name")?
    } else {
        // `input`, `output` and `...` are anonymous; `...` has no name at all.
        match kind {
            StatementKind::Collapsed => "",
            other => other.as_str(),
        }
    };

    let mut node = SchemaNode::new(kind, name);
    let mut has_keys = false;
    let mut has_presence = false;

    loop {
        input = input.trim_start();
        if input.is_empty() {
            break;
        }
        let column = column_of(line, input);
        let parsed = match attr(&mut input) {
            Ok(parsed) => parsed,
            Err(_) => {
                let width = input.split_whitespace().next().map_or(1, str::len);
                return Err(StatementError::new(column, width, "invalid attribute")
                    .with_help(
                        "expected one of: type=, leafref=, keys=, features=, prefix=, \
                         config=, status=, mount=, presence, mandatory, mp",
                    ));
            }
        };
        node = match parsed {
            Attr::Type(type_name) => node.with_type(type_name),
            Attr::Leafref(path) => node.with_leafref(path),
            Attr::Keys(keys) => {
                has_keys = true;
                node.with_keys(keys)
            }
            Attr::Features(features) => node.with_if_features(features),
            Attr::Prefix(prefix) => node.with_prefix(prefix),
            Attr::Config(config) => node.with_config(config),
            Attr::Status(status) => node.with_status(status),
            Attr::Mount(variant) => node.mount_top(variant),
            Attr::Presence => {
                has_presence = true;
                node.presence()
            }
            Attr::Mandatory => node.mandatory(),
            Attr::MountPoint => node.mount_point(),
        };
    }

    if has_keys && kind != StatementKind::List {
        return Err(StatementError::new(0, line.trim_end().len(), "keys are only valid on list statements"));
    }
    if has_presence && kind != StatementKind::Container {
        return Err(StatementError::new(
            0,
            line.trim_end().len(),
            "presence is only valid on container statements",
        ));
    }

    Ok(Statement::Node(Box::new(node)))
}

// =============================================================================
// Tree building
// =============================================================================

#[derive(Debug, Clone, Copy)]
enum SectionContext {
    Tree,
    Augment(AugmentId),
    Rpcs,
    Notifications,
    Grouping(GroupingId),
    YangData(YangDataId),
}

struct TreeBuilder {
    module: Option<SchemaModule>,
    context: SectionContext,
    /// Open ancestors as (nesting level, node id); level 1 is a forest root.
    stack: Vec<(usize, NodeId)>,
    grouping_lines: IndexMap<String, u32>,
    yang_data_lines: IndexMap<String, u32>,
}

impl TreeBuilder {
    fn new() -> Self {
        TreeBuilder {
            module: None,
            context: SectionContext::Tree,
            stack: Vec::new(),
            grouping_lines: IndexMap::new(),
            yang_data_lines: IndexMap::new(),
        }
    }

    fn apply(&mut self, statement: Statement, level: usize, line: u32) -> Result<(), Diagnostic> {
        if self.module.is_none() && !matches!(statement, Statement::Module { .. }) {
            return Err(Diagnostic::error(
                "the first statement must be `module` or `submodule`",
            )
            .at(line, 1));
        }

        match statement {
            Statement::Module { name, submodule } => {
                if self.module.is_some() {
                    return Err(Diagnostic::error("duplicate module statement").at(line, 1));
                }
                if level != 0 {
                    return Err(Diagnostic::error("module statement must not be indented")
                        .at(line, 1));
                }
                debug!(module = name.as_str(), submodule = submodule; "sketch module opened");
                self.module = Some(if submodule {
                    SchemaModule::submodule(name)
                } else {
                    SchemaModule::new(name)
                });
                self.context = SectionContext::Tree;
                Ok(())
            }
            Statement::Augment { path } => {
                self.open_section(level, line)?;
                let id = self.module_mut().add_augment(path);
                self.context = SectionContext::Augment(id);
                Ok(())
            }
            Statement::Rpcs => {
                self.open_section(level, line)?;
                self.context = SectionContext::Rpcs;
                Ok(())
            }
            Statement::Notifications => {
                self.open_section(level, line)?;
                self.context = SectionContext::Notifications;
                Ok(())
            }
            Statement::Grouping { name } => {
                self.open_section(level, line)?;
                if let Some(first) = self.grouping_lines.get(&name) {
                    return Err(Diagnostic::error(format!(
                        "grouping `{name}` is defined multiple times"
                    ))
                    .at(line, 1)
                    .with_help(format!("first defined on line {first}")));
                }
                self.grouping_lines.insert(name.clone(), line);
                let id = self.module_mut().add_grouping(name);
                self.context = SectionContext::Grouping(id);
                Ok(())
            }
            Statement::YangData { name } => {
                self.open_section(level, line)?;
                if let Some(first) = self.yang_data_lines.get(&name) {
                    return Err(Diagnostic::error(format!(
                        "yang-data template `{name}` is defined multiple times"
                    ))
                    .at(line, 1)
                    .with_help(format!("first defined on line {first}")));
                }
                self.yang_data_lines.insert(name.clone(), line);
                let id = self.module_mut().add_yang_data(name);
                self.context = SectionContext::YangData(id);
                Ok(())
            }
            Statement::Node(node) => self.attach_node(*node, level, line),
        }
    }

    fn open_section(&mut self, level: usize, line: u32) -> Result<(), Diagnostic> {
        if level != 0 {
            return Err(
                Diagnostic::error("section headers must start at column zero").at(line, 1)
            );
        }
        self.stack.clear();
        Ok(())
    }

    fn attach_node(
        &mut self,
        node: SchemaNode,
        level: usize,
        line: u32,
    ) -> Result<(), Diagnostic> {
        if level == 0 {
            return Err(Diagnostic::error(
                "node statements must be indented under a section",
            )
            .at(line, 1)
            .with_help("indent forest roots by two spaces"));
        }

        while self
            .stack
            .last()
            .is_some_and(|(open_level, _)| *open_level >= level)
        {
            self.stack.pop();
        }

        let name = node.name().to_string();
        let attached = match self.stack.last().copied() {
            Some((parent_level, parent)) => {
                if level != parent_level + 1 {
                    return Err(Diagnostic::error("indentation jumps more than one level")
                        .at(line, 1));
                }
                self.module_mut().add_child(parent, node)
            }
            None => {
                if level != 1 {
                    return Err(Diagnostic::error("indentation jumps more than one level")
                        .at(line, 1));
                }
                let context = self.context;
                let module = self.module_mut();
                match context {
                    SectionContext::Tree => module.add_root(node),
                    SectionContext::Augment(id) => module.add_augment_root(id, node),
                    SectionContext::Rpcs => module.add_rpc_root(node),
                    SectionContext::Notifications => module.add_notification_root(node),
                    SectionContext::Grouping(id) => module.add_grouping_root(id, node),
                    SectionContext::YangData(id) => module.add_yang_data_root(id, node),
                }
            }
        };

        match attached {
            Ok(id) => {
                trace!(node = name.as_str(), level = level; "sketch node attached");
                self.stack.push((level, id));
                Ok(())
            }
            Err(err) => Err(Diagnostic::error(err.to_string()).at(line, 1)),
        }
    }

    fn module_mut(&mut self) -> &mut SchemaModule {
        // apply() rejects everything before the module statement.
        self.module
            .as_mut()
            .expect("module statement checked before dispatch")
    }

    fn finish(self) -> Result<SchemaModule, Diagnostic> {
        self.module
            .ok_or_else(|| Diagnostic::error("input contains no module statement"))
    }
}

// =============================================================================
// Entry point
// =============================================================================

/// Parses sketch source into a [`SchemaModule`].
///
/// # Errors
///
/// Returns a [`ParseError`] carrying one [`Diagnostic`] per offending line;
/// parsing continues past errors so a single run reports them all.
pub fn parse(source: &str) -> Result<SchemaModule, ParseError> {
    let mut diagnostics = Vec::new();
    let mut builder = TreeBuilder::new();

    for (index, raw_line) in source.lines().enumerate() {
        let line_no = index as u32 + 1;
        let line = raw_line.trim_end();
        let content = line.trim_start();
        if content.is_empty() || content.starts_with('#') {
            continue;
        }

        let indent = line.len() - content.len();
        if line[..indent].contains('\t') {
            diagnostics.push(
                Diagnostic::error("indentation must use spaces, not tabs").at(line_no, 1),
            );
            continue;
        }
        if indent % 2 != 0 {
            diagnostics.push(
                Diagnostic::error("indentation must be a multiple of two spaces")
                    .at(line_no, 1)
                    .with_width(indent as u32),
            );
            continue;
        }

        match parse_statement(content) {
            Ok(statement) => {
                if let Err(diagnostic) = builder.apply(statement, indent / 2, line_no) {
                    diagnostics.push(diagnostic);
                }
            }
            Err(err) => {
                let mut diagnostic = Diagnostic::error(err.message)
                    .at(line_no, (indent + err.column + 1) as u32)
                    .with_width(err.width as u32);
                if let Some(help) = err.help {
                    diagnostic = diagnostic.with_help(help);
                }
                diagnostics.push(diagnostic);
            }
        }
    }

    match builder.finish() {
        Ok(module) if diagnostics.is_empty() => {
            debug!(module = module.name(); "sketch parsed");
            Ok(module)
        }
        Ok(_) => Err(ParseError::new(diagnostics)),
        Err(diagnostic) => {
            diagnostics.push(diagnostic);
            Err(ParseError::new(diagnostics))
        }
    }
}

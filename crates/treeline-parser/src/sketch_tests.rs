//! Unit tests for the sketch parser.
//!
//! These tests verify that the parser handles all sketch constructs,
//! builds the expected schema model, and reports useful diagnostics with
//! accurate positions.

use treeline_core::schema::{ExplicitStatus, SchemaModule, StatementKind};

use crate::{error::ParseError, parse};

/// Helper to parse a source string and assert success.
fn parse_ok(source: &str) -> SchemaModule {
    match parse(source) {
        Ok(module) => module,
        Err(err) => panic!("expected parsing to succeed, but got: {err}"),
    }
}

/// Helper to parse a source string and assert failure.
fn parse_err(source: &str) -> ParseError {
    match parse(source) {
        Ok(_) => panic!("expected parsing to fail, but it succeeded"),
        Err(err) => err,
    }
}

mod basic_parsing_tests {
    use super::*;

    #[test]
    fn test_minimal_module() {
        let module = parse_ok("module demo\n");
        assert_eq!(module.name(), "demo");
        assert!(!module.is_submodule());
        assert!(module.roots().is_empty());
    }

    #[test]
    fn test_submodule_header() {
        let module = parse_ok("submodule demo-sub\n");
        assert!(module.is_submodule());
    }

    #[test]
    fn test_nested_containers() {
        let module = parse_ok(
            "module demo\n  container system\n    container clock\n      leaf timezone type=string\n",
        );
        let system = module.roots()[0];
        assert_eq!(module.node(system).name(), "system");
        let clock = module.node(system).children()[0];
        assert_eq!(module.node(clock).name(), "clock");
        let timezone = module.node(clock).children()[0];
        assert_eq!(module.node(timezone).kind(), StatementKind::Leaf);
        assert_eq!(module.node(timezone).type_name(), Some("string"));
    }

    #[test]
    fn test_dedent_returns_to_outer_level() {
        let module = parse_ok(
            "module demo\n  container a\n    leaf x type=string\n  container b\n",
        );
        assert_eq!(module.roots().len(), 2);
        assert_eq!(module.node(module.roots()[1]).name(), "b");
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let module = parse_ok(
            "# a sketch\nmodule demo\n\n  # the tree\n  leaf x type=string\n\n",
        );
        assert_eq!(module.roots().len(), 1);
    }

    #[test]
    fn test_list_with_keys_and_features() {
        let module = parse_ok(
            "module demo\n  list interface keys=\"name type\" features=ethernet,vlan\n",
        );
        let list = module.node(module.roots()[0]);
        assert_eq!(list.keys(), &["name".to_string(), "type".to_string()]);
        assert_eq!(
            list.if_features(),
            &["ethernet".to_string(), "vlan".to_string()]
        );
    }

    #[test]
    fn test_single_key_without_quotes() {
        let module = parse_ok("module demo\n  list interface keys=name\n");
        assert_eq!(module.node(module.roots()[0]).keys(), &["name".to_string()]);
    }

    #[test]
    fn test_marker_attributes() {
        let module = parse_ok(
            "module demo\n  container state presence config=false status=deprecated\n",
        );
        let node = module.node(module.roots()[0]);
        assert!(node.is_presence());
        assert_eq!(node.explicit_config(), Some(false));
        assert_eq!(node.explicit_status(), Some(ExplicitStatus::Deprecated));
    }

    #[test]
    fn test_leafref_attribute() {
        let module = parse_ok(
            "module demo\n  leaf mgmt leafref=/interfaces/interface/name\n",
        );
        let node = module.node(module.roots()[0]);
        assert_eq!(node.leafref_path(), Some("/interfaces/interface/name"));
    }

    #[test]
    fn test_collapsed_placeholder() {
        let module = parse_ok("module demo\n  container big\n    ...\n");
        let big = module.roots()[0];
        let placeholder = module.node(big).children()[0];
        assert_eq!(module.node(placeholder).kind(), StatementKind::Collapsed);
    }
}

mod section_tests {
    use super::*;

    #[test]
    fn test_all_sections() {
        let module = parse_ok(
            "module demo\n  leaf x type=string\naugment /sys:system\n  leaf hostname type=string\nrpcs\n  rpc restart\n    input\n      leaf delay type=uint32\n    output\n      leaf at type=string\nnotifications\n  notification link-flap\n    leaf name type=string\ngrouping endpoint\n  leaf port type=uint16\nyang-data report\n  container summary\n",
        );
        assert_eq!(module.roots().len(), 1);
        assert_eq!(module.augments().len(), 1);
        assert_eq!(module.augments()[0].path, "/sys:system");
        assert_eq!(module.rpcs().len(), 1);
        assert_eq!(module.notifications().len(), 1);
        assert_eq!(module.groupings().len(), 1);
        assert_eq!(module.groupings()[0].name, "endpoint");
        assert_eq!(module.yang_data().len(), 1);
        assert_eq!(module.yang_data()[0].name, "report");
    }

    #[test]
    fn test_rpc_input_output_are_anonymous() {
        let module = parse_ok("module demo\nrpcs\n  rpc restart\n    input\n    output\n");
        let rpc = module.rpcs()[0];
        let children = module.node(rpc).children();
        assert_eq!(module.node(children[0]).name(), "input");
        assert_eq!(module.node(children[0]).kind(), StatementKind::Input);
        assert_eq!(module.node(children[1]).name(), "output");
    }

    #[test]
    fn test_multiple_augments_keep_order() {
        let module = parse_ok(
            "module demo\naugment /a:b\n  leaf x type=string\naugment /c:d\n  leaf y type=string\n",
        );
        assert_eq!(module.augments()[0].path, "/a:b");
        assert_eq!(module.augments()[1].path, "/c:d");
    }

    #[test]
    fn test_duplicate_grouping_is_rejected() {
        let err = parse_err(
            "module demo\ngrouping g\n  leaf x type=string\ngrouping g\n  leaf y type=string\n",
        );
        assert!(err.to_string().contains("defined multiple times"));
    }
}

mod diagnostic_tests {
    use super::*;

    #[test]
    fn test_missing_module_statement() {
        let err = parse_err("  leaf x type=string\n");
        assert!(
            err.diagnostics()
                .iter()
                .any(|d| d.message().contains("module"))
        );
    }

    #[test]
    fn test_unknown_keyword_position() {
        let err = parse_err("module demo\n  widget x\n");
        let diagnostic = &err.diagnostics()[0];
        assert!(diagnostic.message().contains("unknown statement keyword"));
        assert_eq!(diagnostic.line(), 2);
        assert_eq!(diagnostic.column(), 3);
        assert_eq!(diagnostic.width(), "widget".len() as u32);
        assert!(diagnostic.help().is_some());
    }

    #[test]
    fn test_invalid_attribute_position() {
        let err = parse_err("module demo\n  leaf x colour=red\n");
        let diagnostic = &err.diagnostics()[0];
        assert!(diagnostic.message().contains("invalid attribute"));
        assert_eq!(diagnostic.line(), 2);
        // "  leaf x " is nine characters; the attribute starts at column 10.
        assert_eq!(diagnostic.column(), 10);
    }

    #[test]
    fn test_odd_indentation() {
        let err = parse_err("module demo\n   leaf x type=string\n");
        assert!(
            err.diagnostics()[0]
                .message()
                .contains("multiple of two spaces")
        );
    }

    #[test]
    fn test_tab_indentation() {
        let err = parse_err("module demo\n\tleaf x type=string\n");
        assert!(err.diagnostics()[0].message().contains("tabs"));
    }

    #[test]
    fn test_indentation_jump() {
        let err = parse_err("module demo\n  container a\n      leaf x type=string\n");
        assert!(err.diagnostics()[0].message().contains("jumps"));
    }

    #[test]
    fn test_keys_on_non_list() {
        let err = parse_err("module demo\n  leaf x keys=name\n");
        assert!(err.diagnostics()[0].message().contains("only valid on list"));
    }

    #[test]
    fn test_child_under_leaf() {
        let err = parse_err("module demo\n  leaf x type=string\n    leaf y type=string\n");
        assert!(err.diagnostics()[0].message().contains("cannot add child"));
    }

    #[test]
    fn test_multiple_diagnostics_in_one_run() {
        let err = parse_err("module demo\n  widget a\n  widget b\n");
        assert_eq!(err.diagnostics().len(), 2);
        assert!(err.to_string().contains("+1 more"));
    }
}

mod property_tests {
    use proptest::prelude::*;

    use super::*;

    proptest! {
        /// The parser must never panic, whatever the input.
        #[test]
        fn prop_parse_never_panics(source in "\\PC{0,200}") {
            let _ = parse(&source);
        }

        /// Any identifier is accepted as a module name and read back intact.
        #[test]
        fn prop_module_name_roundtrip(name in "[a-z][a-z0-9-]{0,30}") {
            let module = parse_ok(&format!("module {name}\n"));
            prop_assert_eq!(module.name(), name.as_str());
        }
    }
}

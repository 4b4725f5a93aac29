//! End-to-end tests for the CLI `run` entry point.

use std::fs;

use treeline_cli::{Args, run};

fn args_for(input: &str, output: &str) -> Args {
    Args {
        input: input.to_string(),
        output: output.to_string(),
        config: None,
        line_length: None,
        no_augments: false,
        no_rpcs: false,
        no_notifications: false,
        no_groupings: false,
        no_yang_data: false,
        log_level: "off".to_string(),
    }
}

#[test]
fn test_run_writes_diagram_to_output_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("demo.sketch");
    let output = dir.path().join("demo.tree");
    fs::write(&input, "module demo\n  container system\n    leaf hostname type=string\n")
        .expect("write input");

    let args = args_for(
        input.to_str().expect("utf-8 path"),
        output.to_str().expect("utf-8 path"),
    );
    run(&args).expect("run should succeed");

    let diagram = fs::read_to_string(&output).expect("read output");
    assert_eq!(
        diagram,
        "module: demo\n  +--rw system\n     +--rw hostname?   string\n"
    );
}

#[test]
fn test_run_applies_section_toggles() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("demo.sketch");
    let output = dir.path().join("demo.tree");
    fs::write(
        &input,
        "module demo\n  container a\nrpcs\n  rpc restart\n",
    )
    .expect("write input");

    let mut args = args_for(
        input.to_str().expect("utf-8 path"),
        output.to_str().expect("utf-8 path"),
    );
    args.no_rpcs = true;
    run(&args).expect("run should succeed");

    let diagram = fs::read_to_string(&output).expect("read output");
    assert_eq!(diagram, "module: demo\n  +--rw a\n");
}

#[test]
fn test_run_applies_config_file() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("demo.sketch");
    let output = dir.path().join("demo.tree");
    let config = dir.path().join("config.toml");
    fs::write(&input, "module demo\n  leaf mgmt leafref=/interfaces/ethernet/name\n")
        .expect("write input");
    fs::write(&config, "[render]\nmax_line_length = 30\n").expect("write config");

    let mut args = args_for(
        input.to_str().expect("utf-8 path"),
        output.to_str().expect("utf-8 path"),
    );
    args.config = Some(config.to_str().expect("utf-8 path").to_string());
    run(&args).expect("run should succeed");

    let diagram = fs::read_to_string(&output).expect("read output");
    assert_eq!(diagram, "module: demo\n  +--rw mgmt?   leafref\n");
}

#[test]
fn test_run_reports_missing_input() {
    let args = args_for("/nonexistent/input.sketch", "-");
    assert!(run(&args).is_err());
}

#[test]
fn test_run_reports_parse_errors() {
    let dir = tempfile::tempdir().expect("create temp dir");
    let input = dir.path().join("broken.sketch");
    fs::write(&input, "module demo\n  widget nope\n").expect("write input");

    let args = args_for(input.to_str().expect("utf-8 path"), "-");
    let err = run(&args).expect_err("run should fail");
    assert!(err.to_string().contains("unknown statement keyword"));
}

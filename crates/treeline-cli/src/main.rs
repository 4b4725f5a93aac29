//! Treeline CLI entry point.

use std::process;

use clap::Parser;
use log::{LevelFilter, debug, error, info};

use treeline::TreelineError;
use treeline_cli::{Args, error_adapter::to_reportables};

/// Initializes env_logger from the `--log-level` argument. An unknown
/// level name falls back to `warn` rather than aborting the run.
fn init_logging(level: &str) {
    let filter = level.parse::<LevelFilter>().unwrap_or_else(|_| {
        eprintln!("Invalid log level: {level}. Using 'warn' instead.");
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(filter)
        .init();
}

/// Renders every report carried by the error through miette's graphical
/// handler. A parse error expands into one report per diagnostic.
fn report_error(err: &TreelineError) {
    let handler = miette::GraphicalReportHandler::new();

    for reportable in to_reportables(err) {
        let mut rendered = String::new();
        handler
            .render_report(&mut rendered, &reportable)
            .expect("writing to a String buffer is infallible");

        error!("{rendered}");
    }
}

fn main() {
    // Install miette's pretty panic hook early for better panic reports
    miette::set_panic_hook();

    let args = Args::parse();
    init_logging(&args.log_level);

    info!("Starting treeline");
    debug!(args:?; "Parsed arguments");

    if let Err(err) = treeline_cli::run(&args) {
        report_error(&err);
        process::exit(1);
    }

    info!("Completed successfully");
}

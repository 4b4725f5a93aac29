//! CLI logic for the treeline diagram tool.
//!
//! This module contains the core CLI logic for the treeline diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    io::{self, Write as _},
};

use log::info;

use treeline::{TreeRenderer, TreelineError};

/// Run the treeline CLI application
///
/// Processes the input sketch through the treeline pipeline and writes the
/// rendered diagram to the output file, or to stdout when the output is
/// `-`.
///
/// # Errors
///
/// Returns `TreelineError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Sketch parsing errors
pub fn run(args: &Args) -> Result<(), TreelineError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Rendering tree diagram"
    );

    // Load configuration, then apply command-line overrides
    let mut render_config = config::load_config(args.config.as_ref())?;
    if let Some(line_length) = args.line_length {
        render_config.set_max_line_length(Some(line_length));
    }
    let mut sections = render_config.sections();
    sections.augment &= !args.no_augments;
    sections.rpcs &= !args.no_rpcs;
    sections.notifications &= !args.no_notifications;
    sections.grouping &= !args.no_groupings;
    sections.yang_data &= !args.no_yang_data;
    render_config.set_sections(sections);

    // Read input file
    let source = fs::read_to_string(&args.input)?;

    // Process the sketch using the TreeRenderer API
    let renderer = TreeRenderer::new(render_config);
    let module = renderer.parse(&source)?;
    let diagram = renderer.render_to_string(&module)?;

    // Write output
    if args.output == "-" {
        io::stdout().lock().write_all(diagram.as_bytes())?;
    } else {
        fs::write(&args.output, &diagram)?;
        info!(output_file = args.output; "Diagram written");
    }

    Ok(())
}

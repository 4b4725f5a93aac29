//! Command-line argument definitions for the treeline CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, layout width, section selection, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the treeline diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input sketch file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file; `-` prints to stdout
    #[arg(short, long, default_value = "-")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Maximum rendered line length; omit for unlimited
    #[arg(long)]
    pub line_length: Option<usize>,

    /// Skip augment sections
    #[arg(long)]
    pub no_augments: bool,

    /// Skip the rpcs section
    #[arg(long)]
    pub no_rpcs: bool,

    /// Skip the notifications section
    #[arg(long)]
    pub no_notifications: bool,

    /// Skip grouping sections
    #[arg(long)]
    pub no_groupings: bool,

    /// Skip yang-data sections
    #[arg(long)]
    pub no_yang_data: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

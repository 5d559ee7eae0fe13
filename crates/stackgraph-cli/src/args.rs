//! Command-line argument definitions for the Stackgraph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the root template, the output file and
//! format, configuration file selection, and logging verbosity.

use clap::Parser;

use stackgraph::OutputFormat;

/// Command-line arguments for the Stackgraph diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the root template (YAML)
    #[arg(short, long)]
    pub input: String,

    /// Output file name; the format's extension is added when missing
    #[arg(short, long)]
    pub output: String,

    /// Title shown on the diagram
    #[arg(short, long)]
    pub name: Option<String>,

    /// Output format (dot, svg, png, pdf, jpg)
    #[arg(short, long, default_value = "png")]
    pub format: OutputFormat,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

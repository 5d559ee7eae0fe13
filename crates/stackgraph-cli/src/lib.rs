//! CLI logic for the Stackgraph diagram tool.
//!
//! This module contains the core CLI logic for the Stackgraph diagram tool.

pub mod error_adapter;

mod args;
mod config;

pub use args::Args;

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;

use stackgraph::{DiagramBuilder, OutputFormat, StackGraphError};

/// Run the Stackgraph CLI application
///
/// This function builds the resource graph of the input template hierarchy
/// and writes the rendered diagram to the output file.
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `StackGraphError` for:
/// - Configuration loading errors
/// - Template loading and structure errors
/// - Rendering errors
/// - File I/O errors
pub fn run(args: &Args) -> Result<PathBuf, StackGraphError> {
    info!(
        input_path = args.input,
        output_path = args.output,
        format:% = args.format;
        "Processing template"
    );

    // Load configuration
    let app_config = config::load_config(args.config.as_ref())?;

    let name = diagram_name(args);
    let output = output_path(&args.output, args.format);

    // Build and render the diagram
    let builder = DiagramBuilder::new(app_config);
    let graph = builder.build_graph(&args.input)?;
    let bytes = builder.render(&graph, &name, args.format)?;

    if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output, bytes)?;

    info!(output_file = output.display().to_string(); "Diagram exported successfully");

    Ok(output)
}

/// Returns the diagram title: `--name`, or the input file stem.
fn diagram_name(args: &Args) -> String {
    args.name.clone().unwrap_or_else(|| {
        Path::new(&args.input)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    })
}

/// Returns `output` with the extension of `format` appended unless it
/// already ends with it.
fn output_path(output: &str, format: OutputFormat) -> PathBuf {
    let path = PathBuf::from(output);
    let has_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(format.extension()));
    if has_extension {
        path
    } else {
        PathBuf::from(format!("{output}.{}", format.extension()))
    }
}

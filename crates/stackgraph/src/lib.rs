//! Stackgraph - Resource dependency diagrams for CloudFormation templates.
//!
//! Loads a root template and every nested stack below it, builds a graph of
//! the supported resources and their `Ref` dependencies, and renders it with
//! Graphviz.

pub mod builder;
pub mod config;
pub mod export;

mod error;

pub use stackgraph_core::{graph, registry};

pub use error::StackGraphError;
pub use export::OutputFormat;

use std::path::Path;

use log::{debug, info, trace};

use stackgraph_parser::TemplateLoader;

use builder::ResourceGraphBuilder;
use config::AppConfig;
use export::{Exporter, dot::DotExporter};
use graph::ResourceGraph;

/// Builder for loading and rendering Stackgraph diagrams.
///
/// # Examples
///
/// ```rust,no_run
/// use stackgraph::{DiagramBuilder, OutputFormat, config::AppConfig};
///
/// let builder = DiagramBuilder::new(AppConfig::default());
///
/// // Load the template hierarchy into a graph
/// let graph = builder.build_graph("stacks/root.yaml")
///     .expect("Failed to build graph");
///
/// // Render it as PNG bytes
/// let png = builder.render(&graph, "My Stack", OutputFormat::Png)
///     .expect("Failed to render");
///
/// // Or use default config
/// let builder = DiagramBuilder::default();
/// ```
#[derive(Default)]
pub struct DiagramBuilder {
    config: AppConfig,
}

impl DiagramBuilder {
    /// Create a new diagram builder with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build the resource graph of the template at `path` and of every
    /// nested template it references.
    ///
    /// # Errors
    ///
    /// Returns `StackGraphError::Parse` when a template in the hierarchy is
    /// missing, malformed or nests itself.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use stackgraph::DiagramBuilder;
    ///
    /// let graph = DiagramBuilder::default()
    ///     .build_graph("stacks/root.yaml")
    ///     .expect("Failed to build graph");
    /// println!("{} resources", graph.node_count());
    /// ```
    pub fn build_graph(&self, path: impl AsRef<Path>) -> Result<ResourceGraph, StackGraphError> {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Building resource graph");

        let registry = self.config.registry();
        let loader = TemplateLoader::new();
        let graph = ResourceGraphBuilder::new(&registry, &loader).build(path)?;

        debug!("Resource graph built successfully");
        trace!(graph:?; "Built graph");

        Ok(graph)
    }

    /// Render a resource graph as Graphviz source.
    pub fn render_dot(&self, graph: &ResourceGraph, name: &str) -> String {
        DotExporter::new(OutputFormat::Dot)
            .with_style(self.config.style())
            .to_dot_string(graph, name)
    }

    /// Render a resource graph to the bytes of a `format` file.
    ///
    /// # Errors
    ///
    /// Returns `StackGraphError::Export` if Graphviz is needed for `format`
    /// and fails or is not installed.
    pub fn render(
        &self,
        graph: &ResourceGraph,
        name: &str,
        format: OutputFormat,
    ) -> Result<Vec<u8>, StackGraphError> {
        let bytes = DotExporter::new(format)
            .with_style(self.config.style())
            .export_graph(graph, name)?;

        info!(format:% = format, bytes = bytes.len(); "Diagram rendered successfully");
        Ok(bytes)
    }
}

//! Graphviz export.
//!
//! [`DotExporter`] turns a [`ResourceGraph`] into a `dot_structures` graph:
//!
//! - root template resources are top-level nodes,
//! - every [`Cluster`] becomes a `subgraph cluster_N`, nested like the
//!   templates were,
//! - dependency edges point from the referencing node to the referenced node
//!   and are drawn with `dir=back`, so the arrow head sits on the resource
//!   that holds the reference,
//! - containment edges are dotted.
//!
//! `dot` output is printed in-process. Every other [`OutputFormat`] is
//! rendered by the Graphviz `dot` executable.

use dot_structures::{
    Attribute, Edge, EdgeTy, Graph, GraphAttributes, Id, Node, NodeId, Stmt, Subgraph, Vertex,
};
use graphviz_rust::{
    cmd::{CommandArg, Format},
    printer::{DotPrinter, PrinterContext},
};
use log::{debug, error, info};

use stackgraph_core::{
    graph::{Cluster, ClusterId, EdgeKind, NodeIndex, ResourceGraph, ResourceNode},
    registry::ResourceCategory,
};

use super::{Error, Exporter, OutputFormat};
use crate::config::StyleConfig;

/// Converts resource graphs to Graphviz and renders them.
#[derive(Debug, Clone, Default)]
pub struct DotExporter {
    style: StyleConfig,
    format: OutputFormat,
}

impl DotExporter {
    /// Create an exporter producing `format` output.
    pub fn new(format: OutputFormat) -> Self {
        Self {
            style: StyleConfig::default(),
            format,
        }
    }

    /// Sets the style configuration used for nodes, edges and layout.
    pub fn with_style(mut self, style: &StyleConfig) -> Self {
        self.style = style.clone();
        self
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Build the Graphviz model of `graph`.
    pub fn to_graph(&self, graph: &ResourceGraph, name: &str) -> Graph {
        let mut stmts = vec![
            Stmt::GAttribute(GraphAttributes::Graph(vec![
                attr("label", quoted(name)),
                attr("rankdir", plain(self.style.direction().as_rankdir())),
                attr("compound", plain("true")),
            ])),
            Stmt::GAttribute(GraphAttributes::Node(self.font_attributes())),
            Stmt::GAttribute(GraphAttributes::Edge(self.font_attributes())),
        ];

        for idx in graph.root_nodes() {
            if let Some(node) = graph.node(idx) {
                stmts.push(self.node_stmt(idx, node));
            }
        }
        for cluster in graph.child_clusters(None) {
            stmts.push(self.cluster_stmt(graph, cluster));
        }
        for (source, target, kind) in graph.edges() {
            stmts.push(self.edge_stmt(source, target, kind));
        }

        Graph::DiGraph {
            id: quoted(name),
            strict: false,
            stmts,
        }
    }

    /// Print `graph` as Graphviz source.
    pub fn to_dot_string(&self, graph: &ResourceGraph, name: &str) -> String {
        self.to_graph(graph, name)
            .print(&mut PrinterContext::default())
    }

    fn font_attributes(&self) -> Vec<Attribute> {
        self.style
            .font_name()
            .map(|font| vec![attr("fontname", quoted(font))])
            .unwrap_or_default()
    }

    fn node_stmt(&self, idx: NodeIndex, node: &ResourceNode) -> Stmt {
        let label = if self.style.show_kinds() {
            format!("{}\\n{}", escape(node.display_name()), escape(node.kind()))
        } else {
            escape(node.display_name())
        };
        let (shape, color) = category_style(node.category());

        Stmt::Node(Node {
            id: node_id(idx),
            attributes: vec![
                attr("label", Id::Escaped(format!("\"{label}\""))),
                attr("shape", plain(shape)),
                attr("style", plain("filled")),
                attr("fillcolor", quoted(color)),
                attr("fontcolor", plain("white")),
                attr("tooltip", quoted(node.kind())),
                attr("class", quoted(node.icon())),
            ],
        })
    }

    fn cluster_stmt(&self, graph: &ResourceGraph, id: ClusterId) -> Stmt {
        let mut stmts = Vec::new();
        if let Some(cluster) = graph.cluster(id) {
            stmts.push(Stmt::Attribute(attr("label", quoted(cluster.label()))));
            stmts.extend(self.member_stmts(graph, cluster));
        }
        for child in graph.child_clusters(Some(id)) {
            stmts.push(self.cluster_stmt(graph, child));
        }

        Stmt::Subgraph(Subgraph {
            id: plain(&format!("cluster_{}", id.index())),
            stmts,
        })
    }

    fn member_stmts<'a>(
        &'a self,
        graph: &'a ResourceGraph,
        cluster: &'a Cluster,
    ) -> impl Iterator<Item = Stmt> + 'a {
        cluster
            .members()
            .iter()
            .filter_map(move |idx| graph.node(*idx).map(|node| self.node_stmt(*idx, node)))
    }

    fn edge_stmt(&self, source: NodeIndex, target: NodeIndex, kind: EdgeKind) -> Stmt {
        let attributes = match kind {
            EdgeKind::Dependency => vec![attr("dir", plain("back"))],
            EdgeKind::Containment => vec![
                attr("style", plain("dotted")),
                attr("color", quoted(self.style.containment_color())),
            ],
        };

        Stmt::Edge(Edge {
            ty: EdgeTy::Pair(Vertex::N(node_id(source)), Vertex::N(node_id(target))),
            attributes,
        })
    }
}

impl Exporter for DotExporter {
    fn export_graph(&self, graph: &ResourceGraph, name: &str) -> Result<Vec<u8>, Error> {
        info!(format:% = self.format; "Exporting diagram");
        let dot_graph = self.to_graph(graph, name);

        let format = match self.format {
            OutputFormat::Dot => {
                return Ok(dot_graph.print(&mut PrinterContext::default()).into_bytes());
            }
            OutputFormat::Svg => Format::Svg,
            OutputFormat::Png => Format::Png,
            OutputFormat::Pdf => Format::Pdf,
            OutputFormat::Jpg => Format::Jpg,
        };

        let bytes = graphviz_rust::exec(
            dot_graph,
            &mut PrinterContext::default(),
            vec![CommandArg::from(format)],
        )
        .map_err(|err| {
            error!(err:err; "Graphviz failed to render the diagram");
            Error::Io(err)
        })?;

        debug!(bytes = bytes.len(); "Diagram rendered");
        Ok(bytes)
    }
}

/// Shape and fill color of each category.
fn category_style(category: ResourceCategory) -> (&'static str, &'static str) {
    match category {
        ResourceCategory::Compute => ("box", "#ED7100"),
        ResourceCategory::Storage => ("cylinder", "#7AA116"),
        ResourceCategory::Network => ("box3d", "#8C4FFF"),
        ResourceCategory::Security => ("octagon", "#DD344C"),
        ResourceCategory::Database => ("cylinder", "#C925D1"),
        ResourceCategory::Messaging => ("cds", "#E7157B"),
        ResourceCategory::Management => ("folder", "#B0084D"),
        ResourceCategory::Analytics => ("parallelogram", "#01A88D"),
        ResourceCategory::Integration => ("cds", "#E7157B"),
        ResourceCategory::Mobile => ("component", "#C7131F"),
        ResourceCategory::General => ("ellipse", "#232F3E"),
    }
}

fn node_id(idx: NodeIndex) -> NodeId {
    NodeId(plain(&format!("n{}", idx.index())), None)
}

fn attr(key: &str, value: Id) -> Attribute {
    Attribute(plain(key), value)
}

fn plain(text: &str) -> Id {
    Id::Plain(text.to_string())
}

fn quoted(text: &str) -> Id {
    Id::Escaped(format!("\"{}\"", escape(text)))
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

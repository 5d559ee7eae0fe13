//! Resource dependency graph.
//!
//! A [`ResourceGraph`] holds every [`ResourceNode`] created across a template
//! hierarchy, the [`Cluster`]s that group the resources of each nested stack,
//! and the edges between nodes.
//!
//! # Architecture
//!
//! - Nodes and edges live in a petgraph [`DiGraph`]; nodes are addressed by
//!   [`NodeIndex`] because logical ids are only unique within one template.
//! - Clusters live in a separate list addressed by [`ClusterId`]. A cluster
//!   is owned by the nested stack node that introduced it and may itself sit
//!   inside a parent cluster.
//! - Every node records the cluster it was created in, so the exporter can
//!   rebuild the nesting without walking edges.
//!
//! Edges come in two kinds, see [`EdgeKind`]. Resources whose kind has no
//! registry entry get no node and are listed as [`SkippedResource`]s.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use petgraph::{
    Direction,
    graph::{DiGraph, EdgeIndex},
    visit::EdgeRef,
};

pub use petgraph::graph::NodeIndex;

use crate::registry::{ResourceCategory, ResourceType};

/// The relation an edge represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    /// The source resource references the target resource.
    Dependency,
    /// The source nested stack contains the target resource.
    Containment,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::Dependency => write!(f, "dependency"),
            EdgeKind::Containment => write!(f, "containment"),
        }
    }
}

/// Index of a [`Cluster`] within a [`ResourceGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(usize);

impl ClusterId {
    /// Returns the position of the cluster in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A graph vertex created from one supported template resource.
#[derive(Debug, Clone)]
pub struct ResourceNode {
    logical_id: String,
    display_name: String,
    kind: String,
    resource_type: ResourceType,
    template: PathBuf,
    cluster: Option<ClusterId>,
}

impl ResourceNode {
    /// Create a node for a resource declared in `template`.
    pub fn new(
        logical_id: impl Into<String>,
        display_name: impl Into<String>,
        kind: impl Into<String>,
        resource_type: ResourceType,
        template: impl Into<PathBuf>,
    ) -> Self {
        Self {
            logical_id: logical_id.into(),
            display_name: display_name.into(),
            kind: kind.into(),
            resource_type,
            template: template.into(),
            cluster: None,
        }
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    /// Returns the label shown in the diagram.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the resource kind string, e.g. `AWS::S3::Bucket`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn resource_type(&self) -> &ResourceType {
        &self.resource_type
    }

    pub fn category(&self) -> ResourceCategory {
        self.resource_type.category()
    }

    pub fn icon(&self) -> &str {
        self.resource_type.icon()
    }

    /// Returns the path of the template that declared this resource.
    pub fn template(&self) -> &Path {
        &self.template
    }

    /// Returns the cluster this node belongs to, or `None` for root template
    /// resources.
    pub fn cluster(&self) -> Option<ClusterId> {
        self.cluster
    }
}

/// The resources of one nested stack, grouped under the stack's node.
#[derive(Debug, Clone)]
pub struct Cluster {
    label: String,
    owner: NodeIndex,
    template: PathBuf,
    parent: Option<ClusterId>,
    members: Vec<NodeIndex>,
}

impl Cluster {
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the nested stack node that owns this cluster.
    pub fn owner(&self) -> NodeIndex {
        self.owner
    }

    /// Returns the path of the nested template the cluster was built from.
    pub fn template(&self) -> &Path {
        &self.template
    }

    /// Returns the enclosing cluster, or `None` if the owner is a root
    /// template resource.
    pub fn parent(&self) -> Option<ClusterId> {
        self.parent
    }

    /// Returns the nodes created directly from the nested template, in
    /// declaration order.
    pub fn members(&self) -> &[NodeIndex] {
        &self.members
    }
}

/// A declared resource left out of the graph because its kind is not
/// supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedResource {
    logical_id: String,
    kind: String,
    template: PathBuf,
}

impl SkippedResource {
    pub fn new(
        logical_id: impl Into<String>,
        kind: impl Into<String>,
        template: impl Into<PathBuf>,
    ) -> Self {
        Self {
            logical_id: logical_id.into(),
            kind: kind.into(),
            template: template.into(),
        }
    }

    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn template(&self) -> &Path {
        &self.template
    }
}

/// Resource nodes, clusters and edges of a whole template hierarchy.
#[derive(Debug, Default)]
pub struct ResourceGraph {
    graph: DiGraph<ResourceNode, EdgeKind>,
    clusters: Vec<Cluster>,
    skipped: Vec<SkippedResource>,
}

impl ResourceGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node, placing it in `cluster` when given.
    ///
    /// # Panics
    ///
    /// Panics if `cluster` does not belong to this graph.
    pub fn add_node(&mut self, mut node: ResourceNode, cluster: Option<ClusterId>) -> NodeIndex {
        node.cluster = cluster;
        let idx = self.graph.add_node(node);
        if let Some(cluster) = cluster {
            self.clusters[cluster.0].members.push(idx);
        }
        idx
    }

    /// Opens a new cluster owned by the nested stack node `owner`.
    ///
    /// The parent cluster is the cluster `owner` itself belongs to.
    ///
    /// # Panics
    ///
    /// Panics if `owner` is not a node of this graph.
    pub fn add_cluster(
        &mut self,
        label: impl Into<String>,
        owner: NodeIndex,
        template: impl Into<PathBuf>,
    ) -> ClusterId {
        let parent = self.graph[owner].cluster;
        self.clusters.push(Cluster {
            label: label.into(),
            owner,
            template: template.into(),
            parent,
            members: Vec::new(),
        });
        ClusterId(self.clusters.len() - 1)
    }

    /// Adds a directed edge between two existing nodes.
    ///
    /// Returns `None` without touching the graph if either endpoint is
    /// missing.
    pub fn add_edge(
        &mut self,
        source: NodeIndex,
        target: NodeIndex,
        kind: EdgeKind,
    ) -> Option<EdgeIndex> {
        if !self.contains_node(source) || !self.contains_node(target) {
            return None;
        }
        Some(self.graph.add_edge(source, target, kind))
    }

    pub fn contains_node(&self, idx: NodeIndex) -> bool {
        self.graph.node_weight(idx).is_some()
    }

    pub fn node(&self, idx: NodeIndex) -> Option<&ResourceNode> {
        self.graph.node_weight(idx)
    }

    /// Returns an iterator over all nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeIndex, &ResourceNode)> {
        self.graph
            .node_indices()
            .map(move |idx| (idx, &self.graph[idx]))
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the nodes whose logical id is `logical_id`, across all templates.
    pub fn nodes_by_logical_id<'a>(
        &'a self,
        logical_id: &'a str,
    ) -> impl Iterator<Item = NodeIndex> + 'a {
        self.nodes()
            .filter(move |(_, node)| node.logical_id() == logical_id)
            .map(|(idx, _)| idx)
    }

    /// Returns an iterator over all edges as `(source, target, kind)`, in
    /// creation order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex, EdgeKind)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source(), edge.target(), *edge.weight()))
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the targets of the outgoing edges of `source` with the given kind.
    pub fn targets(&self, source: NodeIndex, kind: EdgeKind) -> Vec<NodeIndex> {
        let mut targets: Vec<NodeIndex> = self
            .graph
            .edges_directed(source, Direction::Outgoing)
            .filter(|edge| *edge.weight() == kind)
            .map(|edge| edge.target())
            .collect();
        // petgraph walks adjacency lists newest first.
        targets.reverse();
        targets
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn cluster(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id.0)
    }

    /// Returns the ids of clusters whose parent is `parent`.
    pub fn child_clusters(
        &self,
        parent: Option<ClusterId>,
    ) -> impl Iterator<Item = ClusterId> + '_ {
        self.clusters
            .iter()
            .enumerate()
            .filter(move |(_, cluster)| cluster.parent == parent)
            .map(|(idx, _)| ClusterId(idx))
    }

    /// Records a resource that was left out of the graph.
    pub fn add_skipped(&mut self, skipped: SkippedResource) {
        self.skipped.push(skipped);
    }

    /// Returns the skipped resources in the order they were met.
    pub fn skipped(&self) -> &[SkippedResource] {
        &self.skipped
    }

    /// Returns the nodes that belong to no cluster.
    pub fn root_nodes(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.nodes()
            .filter(|(_, node)| node.cluster.is_none())
            .map(|(idx, _)| idx)
    }
}

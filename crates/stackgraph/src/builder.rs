//! Resource graph construction.
//!
//! [`ResourceGraphBuilder`] walks a root template and every nested template
//! it points at, depth-first, and accumulates a single [`ResourceGraph`].
//!
//! For each resource of a document, in declaration order:
//!
//! 1. Unsupported kinds are reported, recorded as skipped and get no node.
//! 2. Supported kinds get a node in the current cluster.
//! 3. Nested stacks (`AWS::CloudFormation::Stack` or any kind flagged as one)
//!    load their template, open a cluster owned by the stack
//!    node, build it recursively and connect the stack node to every child
//!    node with a containment edge.
//! 4. `Ref` links found in the entry become dependency edges to nodes that
//!    already exist in the same document. References to unsupported or
//!    not-yet-built resources are dropped.

use std::{
    fs,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, info, trace};

use stackgraph_core::{
    graph::{ClusterId, EdgeKind, NodeIndex, ResourceGraph, ResourceNode, SkippedResource},
    registry::{NESTED_STACK_KIND, ResourceType, TypeRegistry},
};
use stackgraph_parser::{
    Document, Resource, Template, TemplateLoader, discover,
    error::{Diagnostic, ErrorCode, ParseError},
};

use crate::error::StackGraphError;

/// Logical ids of one document mapped to their node, in declaration order.
///
/// Unsupported resources map to `None`.
pub type Fragment = IndexMap<String, Option<NodeIndex>>;

/// Builds a [`ResourceGraph`] from a template hierarchy.
pub struct ResourceGraphBuilder<'a> {
    registry: &'a TypeRegistry,
    loader: &'a TemplateLoader,
    graph: ResourceGraph,
    /// Canonical paths of the templates currently being built, outermost
    /// first.
    visiting: Vec<PathBuf>,
}

impl<'a> ResourceGraphBuilder<'a> {
    pub fn new(registry: &'a TypeRegistry, loader: &'a TemplateLoader) -> Self {
        Self {
            registry,
            loader,
            graph: ResourceGraph::new(),
            visiting: Vec::new(),
        }
    }

    /// Load the template at `root` and build the graph of it and every
    /// template nested below it.
    ///
    /// # Errors
    ///
    /// Returns [`StackGraphError::Parse`] if any template in the hierarchy
    /// cannot be loaded, is malformed, or nests itself.
    pub fn build(mut self, root: impl AsRef<Path>) -> Result<ResourceGraph, StackGraphError> {
        let root = root.as_ref();
        let document = self.loader.load(root).and_then(Template::into_document)?;

        self.visiting.push(fs::canonicalize(root)?);
        self.build_fragment(document, None)?;
        self.visiting.pop();

        info!(
            nodes = self.graph.node_count(),
            edges = self.graph.edge_count(),
            clusters = self.graph.clusters().len();
            "Resource graph built"
        );
        Ok(self.graph)
    }

    /// Add the resources of `document` to the graph inside `cluster`.
    ///
    /// Returns the fragment mapping every logical id of the document to its
    /// node.
    pub fn build_fragment(
        &mut self,
        document: Document,
        cluster: Option<ClusterId>,
    ) -> Result<Fragment, StackGraphError> {
        let template = document.path().to_path_buf();
        let base_dir = document.base_dir().to_path_buf();
        debug!(
            template = template.display().to_string(),
            resources = document.len();
            "Building fragment"
        );

        let mut fragment = Fragment::new();
        for resource in document.into_resources() {
            let Some(resource_type) = self.registry.lookup(resource.kind()).cloned() else {
                info!(
                    logical_id = resource.logical_id();
                    "Resource type `{}` is not supported",
                    resource.kind()
                );
                self.graph.add_skipped(SkippedResource::new(
                    resource.logical_id(),
                    resource.kind(),
                    &template,
                ));
                fragment.insert(resource.logical_id().to_string(), None);
                continue;
            };

            let node = self.add_resource(&resource, resource_type.clone(), &template, cluster);
            fragment.insert(resource.logical_id().to_string(), Some(node));

            if resource_type.is_nested_stack() || resource.kind() == NESTED_STACK_KIND {
                self.expand_nested_stack(&resource, node, &template, &base_dir)?;
            }

            self.link(&resource, node, &fragment, &template)?;
        }

        Ok(fragment)
    }

    fn add_resource(
        &mut self,
        resource: &Resource,
        resource_type: ResourceType,
        template: &Path,
        cluster: Option<ClusterId>,
    ) -> NodeIndex {
        trace!(
            logical_id = resource.logical_id(),
            kind = resource.kind();
            "Adding resource node"
        );
        let node = ResourceNode::new(
            resource.logical_id(),
            resource.display_name(),
            resource.kind(),
            resource_type,
            template,
        );
        self.graph.add_node(node, cluster)
    }

    fn expand_nested_stack(
        &mut self,
        resource: &Resource,
        owner: NodeIndex,
        template: &Path,
        base_dir: &Path,
    ) -> Result<(), StackGraphError> {
        let Some(url) = resource.template_url() else {
            return Err(ParseError::from(
                Diagnostic::error(format!(
                    "nested stack `{}` has no `Properties.TemplateURL`",
                    resource.logical_id()
                ))
                .with_code(ErrorCode::E103)
                .with_help("point `TemplateURL` at the child template, relative to this file"),
            )
            .with_path(template)
            .into());
        };

        let child_path = base_dir.join(url);
        info!(
            logical_id = resource.logical_id(),
            template = child_path.display().to_string();
            "Expanding nested stack"
        );

        let child = self
            .loader
            .load(&child_path)
            .and_then(Template::into_document)?;
        let canonical = fs::canonicalize(&child_path)?;
        if self.visiting.contains(&canonical) {
            return Err(ParseError::from(
                Diagnostic::error(format!(
                    "nested stack `{}` includes `{}`, which is already being expanded",
                    resource.logical_id(),
                    child_path.display()
                ))
                .with_code(ErrorCode::E104),
            )
            .with_path(template)
            .into());
        }

        let cluster = self
            .graph
            .add_cluster(resource.display_name(), owner, &child_path);

        self.visiting.push(canonical);
        let children = self.build_fragment(child, Some(cluster))?;
        self.visiting.pop();

        for child_node in children.values().flatten() {
            self.graph.add_edge(owner, *child_node, EdgeKind::Containment);
        }
        Ok(())
    }

    fn link(
        &mut self,
        resource: &Resource,
        node: NodeIndex,
        fragment: &Fragment,
        template: &Path,
    ) -> Result<(), StackGraphError> {
        let targets = discover(resource.entry()).map_err(|err| err.with_path(template))?;

        for reference in targets {
            match fragment.get(&reference).copied().flatten() {
                Some(target_node) => {
                    trace!(source = resource.logical_id(), reference; "Adding dependency edge");
                    self.graph.add_edge(node, target_node, EdgeKind::Dependency);
                }
                None => {
                    debug!(
                        source = resource.logical_id(),
                        reference;
                        "Dropping reference to a resource without a node"
                    );
                }
            }
        }
        Ok(())
    }
}

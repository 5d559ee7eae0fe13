//! Configuration types for Stackgraph diagram rendering.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining style settings and
//!   extra resource kinds.
//! - [`StyleConfig`] - Controls how the exported diagram looks.
//! - [`ResourceTypeConfig`] - One resource kind added to the built-in
//!   [`TypeRegistry`].
//!
//! # Example
//!
//! ```
//! # use stackgraph::config::{AppConfig, Direction};
//! let config: AppConfig = toml::from_str(r#"
//! [style]
//! direction = "LR"
//!
//! [[resource_types]]
//! kind = "Vendor::Custom::Widget"
//! category = "general"
//! icon = "Widget"
//! "#).unwrap();
//!
//! assert_eq!(config.style().direction(), Direction::LeftRight);
//! assert!(config.registry().supports("Vendor::Custom::Widget"));
//! ```

use std::fmt;

use serde::Deserialize;

use stackgraph_core::registry::{ResourceCategory, ResourceType, TypeRegistry};

const DEFAULT_CONTAINMENT_COLOR: &str = "brown";

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Resource kinds supported in addition to the built-in table.
    #[serde(default)]
    resource_types: Vec<ResourceTypeConfig>,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(style: StyleConfig, resource_types: Vec<ResourceTypeConfig>) -> Self {
        Self {
            style,
            resource_types,
        }
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the configured extra resource kinds.
    pub fn resource_types(&self) -> &[ResourceTypeConfig] {
        &self.resource_types
    }

    /// Builds the [`TypeRegistry`]: the built-in kinds with the configured
    /// kinds merged in. A configured kind replaces a built-in one.
    pub fn registry(&self) -> TypeRegistry {
        let mut registry = TypeRegistry::builtin();
        for entry in &self.resource_types {
            registry.register(entry.kind.clone(), entry.resource_type());
        }
        registry
    }
}

/// Layout direction of the rendered graph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum Direction {
    /// Ranks flow from top to bottom.
    #[default]
    #[serde(rename = "TB")]
    TopBottom,
    /// Ranks flow from left to right.
    #[serde(rename = "LR")]
    LeftRight,
}

impl Direction {
    /// Returns the Graphviz `rankdir` value.
    pub fn as_rankdir(self) -> &'static str {
        match self {
            Direction::TopBottom => "TB",
            Direction::LeftRight => "LR",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_rankdir())
    }
}

/// Visual styling configuration for rendered diagrams.
///
/// Fields that are not set fall back to renderer defaults.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    direction: Direction,

    /// Font used for every label, if set.
    #[serde(default)]
    font_name: Option<String>,

    /// Color of the dotted edges from a nested stack to its resources.
    #[serde(default)]
    containment_color: Option<String>,

    /// Append the resource kind to each node label.
    #[serde(default)]
    show_kinds: bool,
}

impl StyleConfig {
    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn font_name(&self) -> Option<&str> {
        self.font_name.as_deref()
    }

    /// Returns the containment edge color, `brown` unless configured.
    pub fn containment_color(&self) -> &str {
        self.containment_color
            .as_deref()
            .unwrap_or(DEFAULT_CONTAINMENT_COLOR)
    }

    pub fn show_kinds(&self) -> bool {
        self.show_kinds
    }

    /// Returns a copy with the given layout direction.
    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Returns a copy that appends resource kinds to labels.
    pub fn with_show_kinds(mut self, show_kinds: bool) -> Self {
        self.show_kinds = show_kinds;
        self
    }
}

/// A resource kind declared in configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceTypeConfig {
    kind: String,
    category: ResourceCategory,

    /// Icon name; defaults to the category name.
    #[serde(default)]
    icon: Option<String>,

    /// Expand the resource's `TemplateURL` as a nested stack.
    #[serde(default)]
    nested_stack: bool,
}

impl ResourceTypeConfig {
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn resource_type(&self) -> ResourceType {
        let icon = self
            .icon
            .clone()
            .unwrap_or_else(|| self.category.to_string());
        ResourceType::new(self.category, icon).with_nested_stack(self.nested_stack)
    }
}

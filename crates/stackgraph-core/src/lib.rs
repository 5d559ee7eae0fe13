//! Stackgraph Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Stackgraph
//! template parser, graph builder and exporters. It includes:
//!
//! - **Registry**: The table mapping resource kinds to renderer categories ([`registry::TypeRegistry`])
//! - **Graph**: The resource dependency graph with nested stack clusters ([`graph::ResourceGraph`])

pub mod graph;
pub mod registry;

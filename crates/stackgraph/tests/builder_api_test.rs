//! Integration tests for the DiagramBuilder API
//!
//! These tests build graphs from template hierarchies written to temporary
//! directories.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;

use stackgraph::{
    DiagramBuilder, OutputFormat, StackGraphError,
    config::AppConfig,
    graph::{EdgeKind, NodeIndex, ResourceGraph},
};
use stackgraph_parser::error::ErrorCode;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(&path, contents).expect("Failed to write fixture");
    path
}

fn node(graph: &ResourceGraph, logical_id: &str) -> NodeIndex {
    graph
        .nodes_by_logical_id(logical_id)
        .next()
        .unwrap_or_else(|| panic!("no node for {logical_id}"))
}

fn error_code(err: &StackGraphError) -> Option<ErrorCode> {
    err.as_parse_error().and_then(|parse| parse.code())
}

#[test]
fn test_builder_api_exists() {
    let _builder = DiagramBuilder::default();
}

#[test]
fn test_policy_depends_on_bucket() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "root.yaml",
        r#"
Resources:
  LogicalBucket:
    Type: AWS::S3::Bucket
  BucketPolicy:
    Type: AWS::S3::BucketPolicy
    Properties:
      Bucket: !Ref LogicalBucket
"#,
    );

    let graph = DiagramBuilder::default().build_graph(&root).unwrap();

    let bucket = node(&graph, "LogicalBucket");
    let policy = node(&graph, "BucketPolicy");
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.targets(policy, EdgeKind::Dependency), vec![bucket]);
    assert!(graph.targets(bucket, EdgeKind::Dependency).is_empty());
}

#[test]
fn test_long_form_ref_builds_the_same_edge() {
    let dir = TempDir::new().unwrap();
    let short = write(
        dir.path(),
        "short.yaml",
        "Resources:\n  B: {Type: AWS::S3::Bucket}\n  P:\n    Type: AWS::S3::BucketPolicy\n    Properties: {Bucket: !Ref B}\n",
    );
    let long = write(
        dir.path(),
        "long.yaml",
        "Resources:\n  B: {Type: AWS::S3::Bucket}\n  P:\n    Type: AWS::S3::BucketPolicy\n    Properties: {Bucket: {Fn::Ref: B}}\n",
    );

    let builder = DiagramBuilder::default();
    let short = builder.build_graph(&short).unwrap();
    let long = builder.build_graph(&long).unwrap();

    assert_eq!(short.edges().collect::<Vec<_>>(), long.edges().collect::<Vec<_>>());
    assert_eq!(short.edge_count(), 1);
}

#[test]
fn test_nested_stack_becomes_cluster() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "root.yaml",
        r#"
Resources:
  ChildStack:
    Type: AWS::CloudFormation::Stack
    Properties:
      TemplateURL: child.yaml
"#,
    );
    write(
        dir.path(),
        "child.yaml",
        "Resources:\n  Queue:\n    Type: AWS::SQS::Queue\n",
    );

    let graph = DiagramBuilder::default().build_graph(&root).unwrap();

    let stack = node(&graph, "ChildStack");
    let queue = node(&graph, "Queue");
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.clusters().len(), 1);

    let cluster = &graph.clusters()[0];
    assert_eq!(cluster.label(), "ChildStack");
    assert_eq!(cluster.owner(), stack);
    assert_eq!(cluster.members(), &[queue]);
    assert_eq!(graph.targets(stack, EdgeKind::Containment), vec![queue]);
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn test_cluster_label_uses_name() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "root.yaml",
        "Resources:\n  Child:\n    Type: AWS::CloudFormation::Stack\n    Name: Workers\n    Properties: {TemplateURL: child.yaml}\n",
    );
    write(dir.path(), "child.yaml", "Resources: {}\n");

    let graph = DiagramBuilder::default().build_graph(&root).unwrap();

    assert_eq!(graph.clusters()[0].label(), "Workers");
    assert!(graph.clusters()[0].members().is_empty());
}

#[test]
fn test_unsupported_kind_is_skipped() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "root.yaml",
        r#"
Resources:
  Widget:
    Type: Vendor::Custom::Widget
  Bucket:
    Type: AWS::S3::Bucket
    Properties:
      Owner: !Ref Widget
"#,
    );

    let graph = DiagramBuilder::default().build_graph(&root).unwrap();

    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.nodes_by_logical_id("Widget").count(), 0);
    assert_eq!(graph.edge_count(), 0);

    let skipped = graph.skipped();
    assert_eq!(skipped.len(), 1);
    assert_eq!(skipped[0].logical_id(), "Widget");
    assert_eq!(skipped[0].kind(), "Vendor::Custom::Widget");
}

#[test]
fn test_configured_stack_kind_keeps_expanding() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "root.yaml",
        "Resources:\n  Child:\n    Type: AWS::CloudFormation::Stack\n    Properties: {TemplateURL: child.yaml}\n",
    );
    write(dir.path(), "child.yaml", "Resources:\n  Q: {Type: AWS::SQS::Queue}\n");
    let config: AppConfig = toml::from_str(
        "[[resource_types]]\nkind = \"AWS::CloudFormation::Stack\"\ncategory = \"management\"\nicon = \"Stack\"\n",
    )
    .unwrap();

    let graph = DiagramBuilder::new(config).build_graph(&root).unwrap();

    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.clusters().len(), 1);
    assert_eq!(
        graph.targets(node(&graph, "Child"), EdgeKind::Containment),
        vec![node(&graph, "Q")]
    );
}

#[test]
fn test_configured_kind_is_supported() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "root.yaml",
        "Resources:\n  Widget:\n    Type: Vendor::Custom::Widget\n",
    );
    let config: AppConfig = toml::from_str(
        "[[resource_types]]\nkind = \"Vendor::Custom::Widget\"\ncategory = \"general\"\n",
    )
    .unwrap();

    let graph = DiagramBuilder::new(config).build_graph(&root).unwrap();

    assert_eq!(graph.node_count(), 1);
}

#[test]
fn test_node_count_matches_supported_resources() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "root.yaml",
        r#"
Resources:
  Vpc: {Type: AWS::EC2::VPC}
  Subnet: {Type: AWS::EC2::Subnet, Properties: {VpcId: !Ref Vpc}}
  Macro: {Type: AWS::CloudFormation::Macro}
  Table: {Type: AWS::DynamoDB::Table}
  Topic: {Type: AWS::SNS::Topic}
  Api: {Type: AWS::Serverless::HttpApi}
"#,
    );

    let graph = DiagramBuilder::default().build_graph(&root).unwrap();

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn test_deeply_nested_clusters() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "root.yaml",
        "Resources:\n  Outer:\n    Type: AWS::CloudFormation::Stack\n    Properties: {TemplateURL: stacks/outer.yaml}\n",
    );
    write(
        dir.path(),
        "stacks/outer.yaml",
        "Resources:\n  Inner:\n    Type: AWS::CloudFormation::Stack\n    Properties: {TemplateURL: inner/inner.yaml}\n",
    );
    write(
        dir.path(),
        "stacks/inner/inner.yaml",
        "Resources:\n  Fn: {Type: AWS::Lambda::Function}\n",
    );

    let graph = DiagramBuilder::default().build_graph(&root).unwrap();

    assert_eq!(graph.clusters().len(), 2);
    let outer = &graph.clusters()[0];
    let inner = &graph.clusters()[1];
    assert_eq!(outer.parent(), None);
    assert!(inner.parent().is_some());
    assert_eq!(inner.members(), &[node(&graph, "Fn")]);
}

#[test]
fn test_self_nesting_template_is_a_cycle() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "root.yaml",
        "Resources:\n  Again:\n    Type: AWS::CloudFormation::Stack\n    Properties: {TemplateURL: root.yaml}\n",
    );

    let err = DiagramBuilder::default().build_graph(&root).unwrap_err();

    assert_eq!(error_code(&err), Some(ErrorCode::E104));
}

#[test]
fn test_missing_nested_template() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "root.yaml",
        "Resources:\n  Child:\n    Type: AWS::CloudFormation::Stack\n    Properties: {TemplateURL: missing.yaml}\n",
    );

    let err = DiagramBuilder::default().build_graph(&root).unwrap_err();

    assert_eq!(error_code(&err), Some(ErrorCode::E001));
    assert!(err.to_string().contains("missing.yaml"));
}

#[test]
fn test_missing_root_template() {
    let dir = TempDir::new().unwrap();

    let err = DiagramBuilder::default()
        .build_graph(dir.path().join("nope.yaml"))
        .unwrap_err();

    assert_eq!(error_code(&err), Some(ErrorCode::E001));
}

#[test]
fn test_render_dot() {
    let dir = TempDir::new().unwrap();
    let root = write(
        dir.path(),
        "root.yaml",
        "Resources:\n  Bucket: {Type: AWS::S3::Bucket}\n",
    );

    let builder = DiagramBuilder::default();
    let graph = builder.build_graph(&root).unwrap();
    let dot = builder.render_dot(&graph, "Storage");
    let bytes = builder.render(&graph, "Storage", OutputFormat::Dot).unwrap();

    assert!(dot.contains("digraph"));
    assert!(dot.contains("\"Bucket\""));
    assert_eq!(bytes, dot.into_bytes());
}

use std::{fs, path::PathBuf};

use tempfile::tempdir;

use stackgraph::{OutputFormat, StackGraphError};
use stackgraph_cli::Args;
use stackgraph_parser::error::ErrorCode;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn args(input: PathBuf, output: PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        name: Some("Platform".to_string()),
        format: OutputFormat::Dot,
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_platform_template() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let cfg = args(fixture("platform.yaml"), temp_dir.path().join("platform"));
    let written = stackgraph_cli::run(&cfg).expect("platform template should render");

    assert_eq!(written, temp_dir.path().join("platform.dot"));
    let dot = fs::read_to_string(&written).expect("Failed to read output");

    assert!(dot.contains("digraph \"Platform\""));
    assert!(dot.contains("\"Image processor\""));
    assert!(dot.contains("\"BucketPolicy\""));
    assert!(dot.contains("subgraph cluster_0"));
    assert!(dot.contains("\"Queue\""));
    assert!(dot.contains("style=dotted"));
    assert!(!dot.contains("Widget"));
}

#[test]
fn e2e_smoke_test_explicit_config() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config_path = temp_dir.path().join("config.toml");
    fs::write(
        &config_path,
        "[style]\ndirection = \"LR\"\ncontainment_color = \"gray40\"\n\n[[resource_types]]\nkind = \"Vendor::Custom::Widget\"\ncategory = \"general\"\n",
    )
    .expect("Failed to write config");

    let mut cfg = args(fixture("platform.yaml"), temp_dir.path().join("out.dot"));
    cfg.config = Some(config_path.to_string_lossy().to_string());

    let written = stackgraph_cli::run(&cfg).expect("platform template should render");
    let dot = fs::read_to_string(&written).expect("Failed to read output");

    assert_eq!(written, temp_dir.path().join("out.dot"));
    assert!(dot.contains("rankdir=LR"));
    assert!(dot.contains("color=\"gray40\""));
    assert!(dot.contains("\"Widget\""));
}

#[test]
fn e2e_smoke_test_error_examples() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    let cases = [
        ("errors/self_nested.yaml", ErrorCode::E104),
        ("errors/no_resources.yaml", ErrorCode::E100),
        ("errors/malformed.yaml", ErrorCode::E002),
        ("errors/missing_type.yaml", ErrorCode::E102),
        ("errors/does_not_exist.yaml", ErrorCode::E001),
    ];

    for (name, expected) in cases {
        let cfg = args(fixture(name), temp_dir.path().join("out"));

        let err = stackgraph_cli::run(&cfg).expect_err(name);

        let StackGraphError::Parse(parse_err) = &err else {
            panic!("{name}: expected a template error, got {err}");
        };
        assert_eq!(parse_err.code(), Some(expected), "{name}");
        assert!(
            !stackgraph_cli::error_adapter::to_reportables(&err).is_empty(),
            "{name}"
        );
    }

    assert!(!temp_dir.path().join("out.dot").exists());
}

//! # Stackgraph Parser
//!
//! Reads infrastructure templates into a model the graph builder can walk:
//! YAML loading, canonical intrinsic functions and `Ref` discovery.
//!
//! ## Usage
//!
//! ```
//! # use stackgraph_parser::{TemplateLoader, discover, error::ParseError};
//! fn main() -> Result<(), ParseError> {
//!     let source = r#"
//! Resources:
//!   Logs:
//!     Type: AWS::S3::Bucket
//!   LogsPolicy:
//!     Type: AWS::S3::BucketPolicy
//!     Properties:
//!       Bucket: !Ref Logs
//! "#;
//!
//!     let document = TemplateLoader::new()
//!         .load_str(source, "stack.yaml")?
//!         .into_document()?;
//!     let policy = document.resource("LogsPolicy").unwrap();
//!
//!     assert_eq!(discover(policy.entry())?, vec!["Logs".to_string()]);
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod intrinsic;
pub mod links;
pub mod loader;
mod span;
pub mod template;

pub use intrinsic::{Intrinsic, IntrinsicFunction, IntrinsicResolver};
pub use links::discover;
pub use loader::TemplateLoader;
pub use span::Span;
pub use template::{Document, Resource, Template};

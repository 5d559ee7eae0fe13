//! Error and diagnostic system for template loading.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Labeled spans pointing into template source text
//! - The template path and source an error was raised against
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error message with an optional error code, source
//! locations and help text. Diagnostics are wrapped in [`ParseError`] for
//! returning from loading, document extraction and link discovery.
//!
//! # Example
//!
//! ```
//! # use std::path::Path;
//! # use stackgraph_parser::error::{Diagnostic, ErrorCode, ParseError};
//! # use stackgraph_parser::Span;
//! let diag = Diagnostic::error("did not find expected key")
//!     .with_code(ErrorCode::E002)
//!     .with_label(Span::new(14..15), "here")
//!     .with_help("check the indentation of the surrounding block");
//!
//! let err = ParseError::from(diag).with_origin("stack.yaml", "Resources:\n  - x\n");
//! assert_eq!(err.path(), Some(Path::new("stack.yaml")));
//! assert_eq!(err.to_string(), "error[E002]: did not find expected key");
//! ```

mod diagnostic;
mod error_code;
mod label;
mod parse_error;

pub(crate) use parse_error::Result;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;

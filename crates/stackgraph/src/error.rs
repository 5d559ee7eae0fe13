//! Error types for Stackgraph operations.
//!
//! This module provides the main error type [`StackGraphError`] which wraps
//! the error conditions that can occur while building or rendering a
//! diagram.

use std::io;

use thiserror::Error;

use stackgraph_parser::error::ParseError;

/// The main error type for Stackgraph operations.
///
/// # Diagnostic Variants
///
/// The `Parse` variant carries structured diagnostics together with the
/// path and source text of the template that produced them, enough for
/// rich error reporting.
#[derive(Debug, Error)]
pub enum StackGraphError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Parse(ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error>),
}

impl From<ParseError> for StackGraphError {
    fn from(error: ParseError) -> Self {
        Self::Parse(error)
    }
}

impl From<crate::export::Error> for StackGraphError {
    fn from(error: crate::export::Error) -> Self {
        Self::Export(Box::new(error))
    }
}

impl StackGraphError {
    /// Returns the parse error if this is a template error.
    pub fn as_parse_error(&self) -> Option<&ParseError> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

//! The core diagnostic type for the Stackgraph error system.
//!
//! A [`Diagnostic`] represents a single error with an optional
//! error code, labeled source spans, and help text.

use std::fmt;

use crate::{
    error::{error_code::ErrorCode, label::Label},
    span::Span,
};

/// A diagnostic message with optional source location information.
///
/// # Example
///
/// ```text
/// error[E002]: did not find expected key while parsing a block mapping
///   --> stacks/network.yaml:4:3
///    |
///  4 |   - Type: AWS::EC2::VPC
///    |   ^ here
///    |
///    = help: check the indentation of the surrounding block
/// ```
#[derive(Debug, Clone)]
pub struct Diagnostic {
    code: Option<ErrorCode>,
    message: String,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use stackgraph_parser::error::{Diagnostic, ErrorCode};
    /// let diag = Diagnostic::error("resource `Queue` has no `Type`")
    ///     .with_code(ErrorCode::E102)
    ///     .with_help("add a `Type` such as `AWS::SQS::Queue`");
    /// assert_eq!(diag.to_string(), "error[E102]: resource `Queue` has no `Type`");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            labels: Vec::new(),
            help: None,
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Add a label pointing at `span`.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::new(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "error[E001]: message" or "error: message"
        write!(f, "error")?;
        if let Some(code) = self.code {
            write!(f, "[{code}]")?;
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for Diagnostic {}

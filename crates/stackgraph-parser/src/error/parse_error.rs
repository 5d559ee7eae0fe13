//! The ParseError type for wrapping template diagnostics.
//!
//! [`ParseError`] wraps one or more [`Diagnostic`]s raised while loading a
//! template, extracting its resources or discovering references, together
//! with the template path and source text they refer to.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::error::{Diagnostic, ErrorCode};

/// A type alias for `Result<T, ParseError>`.
pub type Result<T> = std::result::Result<T, ParseError>;

/// Error type for template loading.
#[derive(Debug)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
    path: Option<PathBuf>,
    source: Option<String>,
}

impl ParseError {
    /// Create a new parse error from diagnostics.
    pub fn new(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            diagnostics,
            path: None,
            source: None,
        }
    }

    /// Attach the template path and source text the diagnostics point into.
    pub fn with_origin(mut self, path: impl Into<PathBuf>, source: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self.source = Some(source.into());
        self
    }

    /// Attach the template path only, for errors raised before the source
    /// could be read.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Get all diagnostics in this error.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the error, yielding its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Returns the code of the first diagnostic, if it has one.
    pub fn code(&self) -> Option<ErrorCode> {
        self.diagnostics.first().and_then(Diagnostic::code)
    }

    /// Returns the template the error was raised against.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Returns the template source text, if it was read.
    pub fn source_text(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(first) = self.diagnostics.first() {
            write!(f, "{first}")?;
            if self.diagnostics.len() > 1 {
                write!(f, " (+{} more)", self.diagnostics.len() - 1)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

impl From<Diagnostic> for ParseError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::new(vec![diagnostic])
    }
}

impl From<Vec<Diagnostic>> for ParseError {
    fn from(diagnostics: Vec<Diagnostic>) -> Self {
        Self::new(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_from_diagnostic() {
        let diag = Diagnostic::error("test error").with_code(ErrorCode::E100);
        let err: ParseError = diag.into();

        assert_eq!(err.diagnostics().len(), 1);
        assert_eq!(err.code(), Some(ErrorCode::E100));
        assert!(err.path().is_none());
        assert!(err.source_text().is_none());
    }

    #[test]
    fn test_parse_error_with_origin() {
        let err = ParseError::from(Diagnostic::error("bad"))
            .with_origin("stack.yaml", "Resources: {}");

        assert_eq!(err.path(), Some(Path::new("stack.yaml")));
        assert_eq!(err.source_text(), Some("Resources: {}"));
    }

    #[test]
    fn test_parse_error_with_path() {
        let err = ParseError::from(Diagnostic::error("missing")).with_path("gone.yaml");

        assert_eq!(err.path(), Some(Path::new("gone.yaml")));
        assert!(err.source_text().is_none());
    }

    #[test]
    fn test_parse_error_display_single() {
        let err: ParseError = Diagnostic::error("template is empty").into();
        assert_eq!(err.to_string(), "error: template is empty");
    }

    #[test]
    fn test_parse_error_display_multiple() {
        let err: ParseError = vec![
            Diagnostic::error("first error"),
            Diagnostic::error("second error"),
            Diagnostic::error("third error"),
        ]
        .into();

        assert_eq!(err.to_string(), "error: first error (+2 more)");
    }
}

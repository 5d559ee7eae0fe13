//! Labeled source spans for diagnostic messages.

use crate::span::Span;

/// A message attached to the span of template source where a problem is.
#[derive(Debug, Clone)]
pub struct Label {
    span: Span,
    message: String,
}

impl Label {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self {
            span,
            message: message.into(),
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

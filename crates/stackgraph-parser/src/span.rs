//! Byte ranges into template source text.

use std::{fmt, ops::Range};

/// A half-open byte range `start..end` into a template's source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Span {
    start: usize,
    end: usize,
}

impl Span {
    /// Create a new span from a byte range.
    pub fn new(range: Range<usize>) -> Self {
        Self {
            start: range.start,
            end: range.end.max(range.start),
        }
    }

    /// Create a zero or one byte span at `offset`, clamped to `source`.
    ///
    /// YAML errors report a single position; this widens it to the
    /// character found there so a report has something to underline.
    pub fn at(offset: usize, source: &str) -> Self {
        let mut start = offset.min(source.len());
        while !source.is_char_boundary(start) {
            start -= 1;
        }
        let width = source[start..].chars().next().map_or(0, char::len_utf8);
        Self::new(start..start + width)
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_new() {
        let span = Span::new(3..8);
        assert_eq!(span.start(), 3);
        assert_eq!(span.end(), 8);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
    }

    #[test]
    fn test_span_at_widens_to_char() {
        let source = "key: é";
        let span = Span::at(5, source);
        assert_eq!(span.start(), 5);
        assert_eq!(span.len(), 'é'.len_utf8());
    }

    #[test]
    fn test_span_at_end_of_input_is_empty() {
        let span = Span::at(100, "abc");
        assert_eq!(span.start(), 3);
        assert!(span.is_empty());
    }
}

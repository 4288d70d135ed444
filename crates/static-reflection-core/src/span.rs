//! Source location tracking for tokens, declarations and errors.
//!
//! Provides [`Span`] to track where tokens and errors occur in source code.

use std::fmt;

/// A span of source code.
///
/// Tracks the 1-indexed start line and column of a lexeme, the line it ends
/// on (multi-line strings and comments end later than they start), and its
/// byte range so callers can slice the original text.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start line (1-indexed).
    pub line: u32,
    /// End line (1-indexed, `>= line`).
    pub end_line: u32,
    /// Start column (1-indexed, byte-based).
    pub col: u32,
    /// Byte offset of the first byte.
    pub offset: u32,
    /// Length in bytes.
    pub len: u32,
}

impl Span {
    /// Create a span covering `len` bytes starting at `offset`.
    #[inline]
    pub fn new(line: u32, end_line: u32, col: u32, offset: u32, len: u32) -> Self {
        debug_assert!(line <= end_line);
        Self {
            line,
            end_line,
            col,
            offset,
            len,
        }
    }

    /// Create a zero-length span at a position.
    #[inline]
    pub fn point(line: u32, col: u32, offset: u32) -> Self {
        Self {
            line,
            end_line: line,
            col,
            offset,
            len: 0,
        }
    }

    /// Whether this span is empty (zero length).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The length of this span in bytes.
    #[inline]
    pub fn len(&self) -> u32 {
        self.len
    }

    /// Byte offset one past the last byte.
    #[inline]
    pub fn end_offset(&self) -> u32 {
        self.offset + self.len
    }

    /// Merge two spans into one that covers both.
    #[inline]
    pub fn merge(self, other: Span) -> Span {
        let first = if self.offset <= other.offset { self } else { other };
        let end = self.end_offset().max(other.end_offset());
        Span {
            line: first.line,
            end_line: self.end_line.max(other.end_line),
            col: first.col,
            offset: first.offset,
            len: end - first.offset,
        }
    }

    /// Slice the covered text out of `source`, if the range is valid.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.offset as usize..self.end_offset() as usize)
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.end_line != self.line {
            write!(f, "{}:{}-{}", self.line, self.col, self.end_line)
        } else {
            write!(f, "{}:{}", self.line, self.col)
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basics() {
        let span = Span::new(1, 1, 5, 4, 10);
        assert_eq!(span.len(), 10);
        assert_eq!(span.end_offset(), 14);
        assert!(!span.is_empty());

        let empty = Span::point(1, 5, 4);
        assert!(empty.is_empty());
        assert_eq!(empty.end_line, 1);
    }

    #[test]
    fn span_display() {
        let span = Span::new(3, 3, 15, 40, 5);
        assert_eq!(format!("{}", span), "3:15");
    }

    #[test]
    fn span_debug_multiline() {
        let span = Span::new(3, 5, 1, 0, 20);
        assert_eq!(format!("{:?}", span), "3:1-5");
    }

    #[test]
    fn span_merge_keeps_first_start() {
        let a = Span::new(1, 1, 5, 4, 3);
        let b = Span::new(2, 3, 1, 20, 6);
        let merged = b.merge(a);

        assert_eq!(merged.line, 1);
        assert_eq!(merged.end_line, 3);
        assert_eq!(merged.col, 5);
        assert_eq!(merged.offset, 4);
        assert_eq!(merged.len, 22);
    }

    #[test]
    fn span_slice() {
        let source = "class Foo {}";
        let span = Span::new(1, 1, 7, 6, 3);
        assert_eq!(span.slice(source), Some("Foo"));

        let out_of_range = Span::new(1, 1, 1, 10, 10);
        assert_eq!(out_of_range.slice(source), None);
    }
}

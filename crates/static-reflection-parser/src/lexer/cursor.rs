/// A cursor over source text that tracks position.
///
/// Provides low-level character access with peek/advance semantics.
/// Tracks byte offset, line number, and column number as it advances.
/// The cursor only moves forward.
pub struct Cursor<'src> {
    /// The source text being scanned.
    source: &'src str,
    /// Remaining source text (slice starting at current position).
    rest: &'src str,
    /// Current byte offset from start of source.
    offset: u32,
    /// Current line number (1-indexed).
    line: u32,
    /// Current column number (1-indexed, byte-based).
    column: u32,
}

impl<'src> Cursor<'src> {
    /// Create a new cursor at the start of the source.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// The unscanned remainder of the source.
    #[inline]
    pub fn rest(&self) -> &'src str {
        self.rest
    }

    /// Current byte offset from start of source.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Current line number (1-indexed).
    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Current column number (1-indexed, byte-based).
    #[inline]
    pub fn column(&self) -> u32 {
        self.column
    }

    /// Check if we've reached the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.rest.is_empty()
    }

    /// Peek at the current character without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        let first = *self.rest.as_bytes().first()?;
        if first < 128 {
            Some(first as char)
        } else {
            self.rest.chars().next()
        }
    }

    /// Peek at the nth character ahead (0 = current).
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    /// Check if the current character satisfies a predicate.
    #[inline]
    pub fn check(&self, f: impl Fn(char) -> bool) -> bool {
        self.peek().is_some_and(f)
    }

    /// Check if the upcoming bytes match the given string.
    #[inline]
    pub fn check_str(&self, s: &str) -> bool {
        self.rest.starts_with(s)
    }

    /// Consume the current character and advance.
    ///
    /// Returns the consumed character, or `None` if at EOF.
    /// Updates line/column tracking.
    #[inline(always)]
    pub fn advance(&mut self) -> Option<char> {
        let first = *self.rest.as_bytes().first()?;

        if first < 128 {
            // A single ASCII byte is always a char boundary.
            self.rest = &self.rest[1..];
            self.offset += 1;
            if first == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
            Some(first as char)
        } else {
            let ch = self.rest.chars().next()?;
            let len = ch.len_utf8();
            self.rest = &self.rest[len..];
            self.offset += len as u32;
            self.column += len as u32;
            Some(ch)
        }
    }

    /// Advance by n bytes, tracking any newlines crossed.
    ///
    /// `n` must land on a char boundary.
    pub fn advance_bytes(&mut self, n: usize) {
        debug_assert!(self.rest.is_char_boundary(n));

        for ch in self.rest[..n].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += ch.len_utf8() as u32;
            }
        }

        self.rest = &self.rest[n..];
        self.offset += n as u32;
    }

    /// Consume if the current character matches.
    #[inline]
    pub fn eat(&mut self, ch: char) -> bool {
        if self.peek() == Some(ch) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `s` if the upcoming bytes match it exactly.
    #[inline]
    pub fn eat_str(&mut self, s: &str) -> bool {
        if self.check_str(s) {
            self.advance_bytes(s.len());
            true
        } else {
            false
        }
    }

    /// Consume one line break (`\n`, `\r\n` or `\r`) if present.
    pub fn eat_newline(&mut self) -> bool {
        if self.eat_str("\r\n") {
            return true;
        }
        self.eat('\n') || self.eat('\r')
    }

    /// Consume characters while the predicate matches.
    ///
    /// Returns the consumed slice.
    pub fn eat_while(&mut self, f: impl Fn(char) -> bool) -> &'src str {
        let start = self.offset as usize;
        while self.check(&f) {
            self.advance();
        }
        &self.source[start..self.offset as usize]
    }

    /// Consume ASCII characters while the predicate matches.
    ///
    /// Does not track newlines; use only for single-line content such as
    /// digits.
    #[inline]
    pub fn eat_while_ascii(&mut self, f: impl Fn(u8) -> bool) -> &'src str {
        let start = self.offset as usize;
        let bytes = self.rest.as_bytes();
        let mut i = 0;
        while i < bytes.len() && bytes[i] < 128 && f(bytes[i]) {
            i += 1;
        }
        if i > 0 {
            self.rest = &self.rest[i..];
            self.offset += i as u32;
            self.column += i as u32;
        }
        &self.source[start..self.offset as usize]
    }

    /// Get a slice of source from a starting offset to current position.
    #[inline]
    pub fn slice_from(&self, start: u32) -> &'src str {
        &self.source[start as usize..self.offset as usize]
    }
}

/// Check if a character can start a name. Bytes above ASCII are allowed in
/// names.
#[inline]
pub fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// Check if a character can continue a name.
#[inline]
pub fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || !c.is_ascii()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cursor = Cursor::new("<?php");
        assert_eq!(cursor.peek(), Some('<'));
        assert_eq!(cursor.advance(), Some('<'));
        assert_eq!(cursor.peek_nth(1), Some('p'));
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.rest(), "?php");
    }

    #[test]
    fn cursor_eat_str() {
        let mut cursor = Cursor::new("?>text");
        assert!(!cursor.eat_str("<?"));
        assert!(cursor.eat_str("?>"));
        assert_eq!(cursor.column(), 3);
        assert_eq!(cursor.rest(), "text");
    }

    #[test]
    fn cursor_newlines() {
        let mut cursor = Cursor::new("a\r\nb\rc");
        cursor.advance();
        assert!(cursor.eat_newline());
        assert_eq!(cursor.line(), 2);
        assert_eq!(cursor.peek(), Some('b'));
        cursor.advance();
        // A lone `\r` is consumed but only `\n` counts as a line break.
        assert!(cursor.eat_newline());
        assert!(!cursor.eat_newline());
    }

    #[test]
    fn cursor_line_tracking_across_bytes() {
        let mut cursor = Cursor::new("ab\ncd");
        cursor.advance_bytes(3);
        assert_eq!(cursor.line(), 2);
        assert_eq!(cursor.column(), 1);
        assert_eq!(cursor.slice_from(0), "ab\n");
    }

    #[test]
    fn cursor_utf8() {
        let mut cursor = Cursor::new("héllo");
        cursor.advance();
        cursor.advance();
        assert_eq!(cursor.offset(), 3);
        assert_eq!(cursor.column(), 4);
        assert_eq!(cursor.slice_from(0), "hé");
    }

    #[test]
    fn cursor_eat_while() {
        let mut cursor = Cursor::new("123abc");
        assert_eq!(cursor.eat_while_ascii(|b| b.is_ascii_digit()), "123");
        assert_eq!(cursor.eat_while(is_ident_continue), "abc");
        assert!(cursor.is_eof());
    }

    #[test]
    fn ident_predicates() {
        assert!(is_ident_start('_'));
        assert!(is_ident_start('é'));
        assert!(!is_ident_start('1'));
        assert!(is_ident_continue('1'));
        assert!(!is_ident_continue('\\'));
        assert!(!is_ident_continue('$'));
    }
}

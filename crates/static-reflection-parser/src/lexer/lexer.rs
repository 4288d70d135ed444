//! Main lexer implementation.
//!
//! The [`Lexer`] converts source text into a stream of [`Token`]s using
//! direct dispatch on the first character. Source files alternate between
//! passthrough text and code delimited by `<?php … ?>`; only code is
//! tokenized structurally, so braces in passthrough text never affect the
//! scope depth.
//!
//! The lexer copies all lexemes into the arena, allowing the source string
//! to be freed after lexing completes.

use bumpalo::Bump;
use static_reflection_core::{LexError, Span};

use super::cursor::{Cursor, is_ident_continue, is_ident_start};
use super::token::{Token, TokenKind, lookup_keyword};

/// Punctuation and operators, longest first so the first match is the
/// maximal munch.
const PUNCTUATION: &[(&str, TokenKind)] = &[
    ("<<=", TokenKind::Operator),
    (">>=", TokenKind::Operator),
    ("**=", TokenKind::Operator),
    ("<=>", TokenKind::Operator),
    ("===", TokenKind::Operator),
    ("!==", TokenKind::Operator),
    ("??=", TokenKind::Operator),
    ("...", TokenKind::Ellipsis),
    ("?->", TokenKind::NullsafeArrow),
    ("::", TokenKind::ColonColon),
    ("->", TokenKind::Arrow),
    ("=>", TokenKind::DoubleArrow),
    ("==", TokenKind::Operator),
    ("!=", TokenKind::Operator),
    ("<>", TokenKind::Operator),
    ("<=", TokenKind::Operator),
    (">=", TokenKind::Operator),
    ("&&", TokenKind::Operator),
    ("||", TokenKind::Operator),
    ("??", TokenKind::Operator),
    ("++", TokenKind::Operator),
    ("--", TokenKind::Operator),
    ("+=", TokenKind::Operator),
    ("-=", TokenKind::Operator),
    ("*=", TokenKind::Operator),
    ("/=", TokenKind::Operator),
    (".=", TokenKind::Operator),
    ("%=", TokenKind::Operator),
    ("&=", TokenKind::Operator),
    ("|=", TokenKind::Operator),
    ("^=", TokenKind::Operator),
    ("<<", TokenKind::Operator),
    (">>", TokenKind::Operator),
    ("**", TokenKind::Operator),
    ("(", TokenKind::LeftParen),
    (")", TokenKind::RightParen),
    ("[", TokenKind::LeftBracket),
    ("]", TokenKind::RightBracket),
    ("{", TokenKind::LeftBrace),
    ("}", TokenKind::RightBrace),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    ("=", TokenKind::Equal),
    ("&", TokenKind::Amp),
    ("?", TokenKind::Question),
    (":", TokenKind::Colon),
    ("|", TokenKind::Pipe),
    ("+", TokenKind::Operator),
    ("-", TokenKind::Operator),
    ("*", TokenKind::Operator),
    ("/", TokenKind::Operator),
    ("%", TokenKind::Operator),
    ("^", TokenKind::Operator),
    ("~", TokenKind::Operator),
    ("!", TokenKind::Operator),
    ("<", TokenKind::Operator),
    (">", TokenKind::Operator),
    (".", TokenKind::Operator),
    ("@", TokenKind::Operator),
    ("$", TokenKind::Operator),
    ("\\", TokenKind::Operator),
];

/// What the lexer is currently scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Passthrough text, waiting for an open tag.
    InlineHtml,
    /// Code between an open tag and `?>`.
    Code,
}

/// Lexer for PHP-style source.
///
/// Tracks the `{`/`}` nesting depth as it goes. The depth never goes below
/// zero; a stray `}` is reported as [`LexError::UnbalancedScope`] and a
/// non-zero depth at end of input as [`LexError::UnclosedScope`].
///
/// The `'src` lifetime is the source string being lexed (temporary).
/// The `'ast` lifetime is the arena where token lexemes are allocated.
pub struct Lexer<'src, 'ast> {
    /// Low-level character cursor.
    cursor: Cursor<'src>,
    /// Arena for allocating token lexemes.
    arena: &'ast Bump,
    mode: Mode,
    /// Current `{` nesting.
    depth: u32,
    /// Deepest nesting seen.
    max_depth: u32,
    /// Kinds of the last two significant tokens, most recent first.
    recent: [TokenKind; 2],
    /// Accumulated errors.
    errors: Vec<LexError>,
    /// Set once the end-of-input checks have run.
    finished: bool,
}

impl<'src, 'ast> Lexer<'src, 'ast> {
    /// Create a lexer for a source file.
    ///
    /// Scanning starts in passthrough mode; code begins at the first open
    /// tag.
    pub fn new(source: &'src str, arena: &'ast Bump) -> Self {
        Self::with_mode(source, arena, Mode::InlineHtml)
    }

    /// Create a lexer for a code snippet that has no leading open tag.
    pub fn code(source: &'src str, arena: &'ast Bump) -> Self {
        Self::with_mode(source, arena, Mode::Code)
    }

    fn with_mode(source: &'src str, arena: &'ast Bump, mode: Mode) -> Self {
        Self {
            cursor: Cursor::new(source),
            arena,
            mode,
            depth: 0,
            max_depth: 0,
            recent: [TokenKind::Eof; 2],
            errors: Vec::new(),
            finished: false,
        }
    }

    /// Current scope nesting depth.
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Deepest scope nesting reached so far.
    pub fn max_depth(&self) -> u32 {
        self.max_depth
    }

    /// Errors reported so far.
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    /// Take accumulated errors, leaving an empty vec.
    pub fn take_errors(&mut self) -> Vec<LexError> {
        std::mem::take(&mut self.errors)
    }

    /// Check if any errors occurred.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Consume and return the next token.
    ///
    /// Returns [`TokenKind::Eof`] at the end of input, repeatedly.
    pub fn next_token(&mut self) -> Token<'ast> {
        let token = match self.mode {
            Mode::InlineHtml => self.scan_inline_html(),
            Mode::Code => self.scan_code(),
        };
        if !matches!(
            token.kind,
            TokenKind::DocComment | TokenKind::InlineHtml | TokenKind::Error
        ) {
            self.recent = [token.kind, self.recent[0]];
        }
        token
    }

    // =========================================
    // Internal: Token construction
    // =========================================

    /// Create a token from start position to current position.
    /// Copies the lexeme into the arena.
    fn make_token(
        &self,
        kind: TokenKind,
        start_line: u32,
        start_col: u32,
        start_offset: u32,
    ) -> Token<'ast> {
        let src_lexeme = self.cursor.slice_from(start_offset);
        let mut end_line = self.cursor.line();
        // A trailing newline belongs to the line it ends.
        if src_lexeme.ends_with('\n') && end_line > start_line {
            end_line -= 1;
        }
        let span = Span::new(
            start_line,
            end_line,
            start_col,
            start_offset,
            self.cursor.offset() - start_offset,
        );
        Token::new(kind, self.arena.alloc_str(src_lexeme), span)
    }

    /// Span from a start position to the current position.
    fn span_from(&self, start_line: u32, start_col: u32, start_offset: u32) -> Span {
        Span::new(
            start_line,
            self.cursor.line().max(start_line),
            start_col,
            start_offset,
            self.cursor.offset() - start_offset,
        )
    }

    /// Create an error token and record the error.
    fn make_error(&mut self, error: LexError) -> Token<'ast> {
        let span = error.span();
        self.errors.push(error);
        Token::new(TokenKind::Error, self.arena.alloc_str(""), span)
    }

    /// Create an EOF token, running the end-of-input scope check once.
    fn make_eof(&mut self) -> Token<'ast> {
        let span = Span::point(self.cursor.line(), self.cursor.column(), self.cursor.offset());
        if !self.finished {
            self.finished = true;
            if self.depth > 0 {
                self.errors.push(LexError::UnclosedScope {
                    depth: self.depth,
                    span,
                });
            }
        }
        Token::new(TokenKind::Eof, self.arena.alloc_str(""), span)
    }

    // =========================================
    // Scanning: Passthrough text and tags
    // =========================================

    fn scan_inline_html(&mut self) -> Token<'ast> {
        if self.cursor.is_eof() {
            return self.make_eof();
        }

        let start_line = self.cursor.line();
        let start_col = self.cursor.column();
        let start_offset = self.cursor.offset();

        match find_open_tag(self.cursor.rest()) {
            Some((0, tag_len, kind)) => {
                self.cursor.advance_bytes(tag_len);
                if kind == TokenKind::OpenTag && tag_len > 2 {
                    // `<?php` takes one following whitespace character with it.
                    if !self.cursor.eat_newline() {
                        let _ = self.cursor.eat(' ') || self.cursor.eat('\t');
                    }
                }
                self.mode = Mode::Code;
                self.make_token(kind, start_line, start_col, start_offset)
            }
            Some((idx, _, _)) => {
                self.cursor.advance_bytes(idx);
                self.make_token(TokenKind::InlineHtml, start_line, start_col, start_offset)
            }
            None => {
                let len = self.cursor.rest().len();
                self.cursor.advance_bytes(len);
                self.make_token(TokenKind::InlineHtml, start_line, start_col, start_offset)
            }
        }
    }

    // =========================================
    // Scanning: Code
    // =========================================

    fn scan_code(&mut self) -> Token<'ast> {
        loop {
            self.skip_whitespace();

            let Some(c) = self.cursor.peek() else {
                return self.make_eof();
            };

            let start_line = self.cursor.line();
            let start_col = self.cursor.column();
            let start_offset = self.cursor.offset();

            return match c {
                '?' if self.cursor.check_str("?>") => {
                    self.cursor.advance_bytes(2);
                    self.cursor.eat_newline();
                    self.mode = Mode::InlineHtml;
                    self.make_token(TokenKind::CloseTag, start_line, start_col, start_offset)
                }

                // Comments
                '#' if self.cursor.check_str("#[") => {
                    self.cursor.advance_bytes(2);
                    self.make_token(TokenKind::AttributeOpen, start_line, start_col, start_offset)
                }
                '#' => {
                    self.skip_line_comment();
                    continue;
                }
                '/' if self.cursor.check_str("//") => {
                    self.skip_line_comment();
                    continue;
                }
                '/' if self.cursor.check_str("/*") => {
                    let is_doc = self.cursor.check_str("/**")
                        && self.cursor.peek_nth(3).is_some_and(char::is_whitespace);
                    match self.scan_block_comment(start_line, start_col, start_offset) {
                        Err(error) => self.make_error(error),
                        Ok(()) if is_doc => {
                            self.make_token(TokenKind::DocComment, start_line, start_col, start_offset)
                        }
                        Ok(()) => continue,
                    }
                }

                // Strings
                '\'' => self.scan_quoted('\'', TokenKind::StringLiteral, start_line, start_col, start_offset),
                '"' => self.scan_quoted('"', TokenKind::InterpolatedString, start_line, start_col, start_offset),
                '`' => self.scan_quoted('`', TokenKind::InterpolatedString, start_line, start_col, start_offset),
                '<' if self.cursor.check_str("<<<") => {
                    match self.scan_heredoc(start_line, start_col, start_offset) {
                        Some(token) => token,
                        None => self.scan_punctuation(start_line, start_col, start_offset),
                    }
                }

                // Variables
                '$' if self.cursor.peek_nth(1).is_some_and(is_ident_start) => {
                    self.cursor.advance();
                    self.cursor.eat_while(is_ident_continue);
                    self.make_token(TokenKind::Variable, start_line, start_col, start_offset)
                }

                // Numbers
                c if c.is_ascii_digit() => self.scan_number(start_line, start_col, start_offset),
                '.' if self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                    self.scan_number(start_line, start_col, start_offset)
                }

                // Names and keywords
                '\\' if self.cursor.peek_nth(1).is_some_and(is_ident_start) => {
                    self.cursor.advance();
                    self.scan_name(start_line, start_col, start_offset)
                }
                c if is_ident_start(c) => self.scan_name(start_line, start_col, start_offset),

                // Operators and punctuation
                _ => self.scan_punctuation(start_line, start_col, start_offset),
            };
        }
    }

    /// Skip whitespace, and a byte order mark at the very start.
    fn skip_whitespace(&mut self) {
        if self.cursor.offset() == 0 && self.cursor.check_str("\u{FEFF}") {
            self.cursor.advance_bytes(3);
        }
        self.cursor.eat_while(|c| c.is_ascii_whitespace());
    }

    /// Skip a `//` or `#` comment. The comment ends at a newline or right
    /// before `?>`.
    fn skip_line_comment(&mut self) {
        while let Some(c) = self.cursor.peek() {
            if c == '\n' || self.cursor.check_str("?>") {
                break;
            }
            self.cursor.advance();
        }
    }

    /// Consume a `/* … */` comment.
    fn scan_block_comment(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Result<(), LexError> {
        self.cursor.advance_bytes(2);
        match self.cursor.rest().find("*/") {
            Some(idx) => {
                self.cursor.advance_bytes(idx + 2);
                Ok(())
            }
            None => {
                let len = self.cursor.rest().len();
                self.cursor.advance_bytes(len);
                Err(LexError::UnterminatedComment {
                    span: self.span_from(start_line, start_col, start_offset),
                })
            }
        }
    }

    // =========================================
    // Scanning: Strings
    // =========================================

    /// Scan a string delimited by `quote`. Strings may span lines.
    fn scan_quoted(
        &mut self,
        quote: char,
        kind: TokenKind,
        start_line: u32,
        start_col: u32,
        start_offset: u32,
    ) -> Token<'ast> {
        self.cursor.advance(); // opening quote

        loop {
            match self.cursor.advance() {
                None => {
                    let span = self.span_from(start_line, start_col, start_offset);
                    return self.make_error(LexError::UnterminatedString { span });
                }
                Some('\\') => {
                    self.cursor.advance();
                }
                Some(c) if c == quote => {
                    return self.make_token(kind, start_line, start_col, start_offset);
                }
                Some(_) => {}
            }
        }
    }

    /// Scan a heredoc or nowdoc.
    ///
    /// Returns `None` (consuming nothing) when `<<<` is not followed by a
    /// valid label and line break.
    fn scan_heredoc(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Option<Token<'ast>> {
        let header = parse_heredoc_header(self.cursor.rest())?;
        self.cursor.advance_bytes(header.len);

        let label = header.label;
        loop {
            // At the start of a body line: the closing label may be indented.
            let line = self.cursor.rest();
            let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
            let after_indent = &line[indent..];
            if after_indent.starts_with(label)
                && !after_indent[label.len()..]
                    .chars()
                    .next()
                    .is_some_and(is_ident_continue)
            {
                self.cursor.advance_bytes(indent + label.len());
                return Some(self.make_token(TokenKind::HeredocLiteral, start_line, start_col, start_offset));
            }

            match line.find('\n') {
                Some(idx) => self.cursor.advance_bytes(idx + 1),
                None => {
                    self.cursor.advance_bytes(line.len());
                    let span = self.span_from(start_line, start_col, start_offset);
                    return Some(self.make_error(LexError::UnterminatedHeredoc {
                        label: label.to_string(),
                        span,
                    }));
                }
            }
        }
    }

    // =========================================
    // Scanning: Numbers
    // =========================================

    fn scan_number(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'ast> {
        if self.cursor.peek() == Some('0')
            && let Some(radix_char) = self.cursor.peek_nth(1)
        {
            let radix = match radix_char {
                'x' | 'X' => Some(16),
                'b' | 'B' => Some(2),
                'o' | 'O' => Some(8),
                _ => None,
            };
            if let Some(radix) = radix {
                self.cursor.advance_bytes(2);
                let digits = self
                    .cursor
                    .eat_while_ascii(|b| b == b'_' || (b as char).is_digit(radix));
                if digits.is_empty() {
                    let span = self.span_from(start_line, start_col, start_offset);
                    return self.make_error(LexError::InvalidNumber {
                        span,
                        detail: "expected digits after radix prefix".to_string(),
                    });
                }
                return self.make_token(TokenKind::IntLiteral, start_line, start_col, start_offset);
            }
        }

        let mut is_float = false;
        self.eat_digits();

        if self.cursor.peek() == Some('.') && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            self.cursor.advance();
            self.eat_digits();
            is_float = true;
        }

        if matches!(self.cursor.peek(), Some('e' | 'E')) {
            let has_exponent = match self.cursor.peek_nth(1) {
                Some('+' | '-') => self.cursor.peek_nth(2).is_some_and(|c| c.is_ascii_digit()),
                Some(c) => c.is_ascii_digit(),
                None => false,
            };
            if has_exponent {
                self.cursor.advance();
                let _ = self.cursor.eat('+') || self.cursor.eat('-');
                self.eat_digits();
                is_float = true;
            }
        }

        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        };
        self.make_token(kind, start_line, start_col, start_offset)
    }

    /// Consume decimal digits (including underscores as separators).
    fn eat_digits(&mut self) {
        self.cursor.eat_while_ascii(|b| b.is_ascii_digit() || b == b'_');
    }

    // =========================================
    // Scanning: Names and keywords
    // =========================================

    /// Scan a name, joining `\`-separated segments, and classify keywords.
    fn scan_name(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'ast> {
        self.cursor.eat_while(is_ident_continue);
        while self.cursor.peek() == Some('\\') && self.cursor.peek_nth(1).is_some_and(is_ident_start) {
            self.cursor.advance();
            self.cursor.eat_while(is_ident_continue);
        }

        let lexeme = self.cursor.slice_from(start_offset);
        let kind = if lexeme.contains('\\') || self.in_member_name_position() {
            TokenKind::Name
        } else {
            lookup_keyword(lexeme).unwrap_or(TokenKind::Name)
        };
        self.make_token(kind, start_line, start_col, start_offset)
    }

    /// Whether the next name is a member name, where reserved words are
    /// ordinary identifiers.
    fn in_member_name_position(&self) -> bool {
        let [last, before] = self.recent;
        last.introduces_member_name() || (last == TokenKind::Amp && before == TokenKind::Function)
    }

    // =========================================
    // Scanning: Operators
    // =========================================

    fn scan_punctuation(&mut self, start_line: u32, start_col: u32, start_offset: u32) -> Token<'ast> {
        let rest = self.cursor.rest();
        let Some(&(text, kind)) = PUNCTUATION.iter().find(|(text, _)| rest.starts_with(text)) else {
            let ch = self.cursor.advance().unwrap_or('\0');
            let span = self.span_from(start_line, start_col, start_offset);
            return self.make_error(LexError::UnexpectedChar { ch, span });
        };
        self.cursor.advance_bytes(text.len());

        match kind {
            TokenKind::LeftBrace => {
                self.depth += 1;
                self.max_depth = self.max_depth.max(self.depth);
            }
            TokenKind::RightBrace => {
                if self.depth == 0 {
                    let span = self.span_from(start_line, start_col, start_offset);
                    self.errors.push(LexError::UnbalancedScope { span });
                } else {
                    self.depth -= 1;
                }
            }
            _ => {}
        }

        self.make_token(kind, start_line, start_col, start_offset)
    }
}

/// Implement Iterator for convenient token streaming.
impl<'ast> Iterator for Lexer<'_, 'ast> {
    type Item = Token<'ast>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token.kind == TokenKind::Eof {
            None
        } else {
            Some(token)
        }
    }
}

/// Locate the next open tag in passthrough text.
///
/// Returns the byte index, the tag length and its kind. `<?xml` and other
/// processing instructions are not open tags.
fn find_open_tag(text: &str) -> Option<(usize, usize, TokenKind)> {
    for (idx, _) in text.match_indices("<?") {
        let after = &text[idx + 2..];
        if after
            .as_bytes()
            .get(..3)
            .is_some_and(|word| word.eq_ignore_ascii_case(b"php"))
            && after[3..].chars().next().is_none_or(char::is_whitespace)
        {
            return Some((idx, 5, TokenKind::OpenTag));
        }
        if after.starts_with('=') {
            return Some((idx, 3, TokenKind::OpenTagWithEcho));
        }
        if after.chars().next().is_none_or(char::is_whitespace) {
            return Some((idx, 2, TokenKind::OpenTag));
        }
    }
    None
}

struct HeredocHeader<'a> {
    label: &'a str,
    /// Bytes up to and including the line break after the label.
    len: usize,
}

/// Parse `<<<LABEL`, `<<<"LABEL"` or `<<<'LABEL'` followed by a line break.
fn parse_heredoc_header(text: &str) -> Option<HeredocHeader<'_>> {
    let after = text.strip_prefix("<<<")?;
    let trimmed = after.trim_start_matches([' ', '\t']);
    let mut pos = 3 + (after.len() - trimmed.len());

    let quote = trimmed.chars().next().filter(|c| *c == '"' || *c == '\'');
    let body = if quote.is_some() { &trimmed[1..] } else { trimmed };
    if !body.chars().next().is_some_and(is_ident_start) {
        return None;
    }
    let label_len = body.find(|c: char| !is_ident_continue(c)).unwrap_or(body.len());
    let label = &body[..label_len];
    let mut rest = &body[label_len..];
    pos += label_len;
    if let Some(q) = quote {
        rest = rest.strip_prefix(q)?;
        pos += 2;
    }

    let newline = if rest.starts_with("\r\n") {
        2
    } else if rest.starts_with('\n') || rest.starts_with('\r') {
        1
    } else {
        return None;
    };
    Some(HeredocHeader {
        label,
        len: pos + newline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to collect all tokens from a code snippet.
    fn tokenize(source: &str) -> Vec<(TokenKind, String)> {
        let arena = Bump::new();
        Lexer::code(source, &arena)
            .map(|t| (t.kind, t.lexeme.to_string()))
            .collect()
    }

    /// Helper to get token kinds of a code snippet.
    fn token_kinds(source: &str) -> Vec<TokenKind> {
        let arena = Bump::new();
        Lexer::code(source, &arena).map(|t| t.kind).collect()
    }

    /// Helper to get token kinds of a whole file.
    fn file_kinds(source: &str) -> Vec<TokenKind> {
        let arena = Bump::new();
        Lexer::new(source, &arena).map(|t| t.kind).collect()
    }

    fn lex_all<'ast>(lexer: &mut Lexer<'_, 'ast>) -> Vec<Token<'ast>> {
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            if token.kind == TokenKind::Eof {
                return tokens;
            }
            tokens.push(token);
        }
    }

    // =========================================
    // Embedded-language boundaries
    // =========================================

    #[test]
    fn file_starts_in_passthrough_mode() {
        use TokenKind::*;
        assert_eq!(
            file_kinds("<html><?php class A {} ?>\n<p>"),
            vec![InlineHtml, OpenTag, Class, Name, LeftBrace, RightBrace, CloseTag, InlineHtml]
        );
    }

    #[test]
    fn passthrough_braces_are_not_structural() {
        let arena = Bump::new();
        let mut lexer = Lexer::new("<?php if ($a) { ?> } } { <?php } ", &arena);
        let tokens = lex_all(&mut lexer);
        let html: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::InlineHtml)
            .map(|t| t.lexeme)
            .collect();
        assert_eq!(html, [" } } { "]);
        assert_eq!(lexer.depth(), 0);
        assert_eq!(lexer.max_depth(), 1);
        assert!(!lexer.has_errors());
    }

    #[test]
    fn close_tag_swallows_one_newline() {
        let arena = Bump::new();
        let tokens = lex_all(&mut Lexer::new("<?php ?>\n\nX", &arena));
        assert_eq!(tokens[1].kind, TokenKind::CloseTag);
        assert_eq!(tokens[1].lexeme, "?>\n");
        assert_eq!(tokens[1].end_line(), 1);
        assert_eq!(tokens[2].lexeme, "\nX");
        assert_eq!(tokens[2].start_line(), 2);
    }

    #[test]
    fn open_tag_variants() {
        use TokenKind::*;
        assert_eq!(file_kinds("<?= $x ?>"), vec![OpenTagWithEcho, Variable, CloseTag]);
        assert_eq!(file_kinds("<?PHP\n$x;"), vec![OpenTag, Variable, Semicolon]);
        assert_eq!(file_kinds("<? $x;"), vec![OpenTag, Variable, Semicolon]);
        assert_eq!(file_kinds("<?xml version?>"), vec![InlineHtml]);
        assert_eq!(file_kinds("<?phpx"), vec![InlineHtml]);
    }

    #[test]
    fn line_comment_stops_at_close_tag() {
        use TokenKind::*;
        assert_eq!(
            file_kinds("<?php // note ?>text<?php # more\n$a;"),
            vec![OpenTag, CloseTag, InlineHtml, OpenTag, Variable, Semicolon]
        );
    }

    #[test]
    fn embedded_text_inside_method_body() {
        let arena = Bump::new();
        let source = r#"class c { function x(self $x) { ?>text<?php $s = "\n" . parent::x(); } }"#;
        let mut lexer = Lexer::code(source, &arena);
        let tokens = lex_all(&mut lexer);

        let self_token = tokens.iter().find(|t| t.lexeme == "self").unwrap();
        assert_eq!(self_token.kind, TokenKind::SelfKw);
        let parent_token = tokens.iter().find(|t| t.lexeme == "parent").unwrap();
        assert_eq!(parent_token.kind, TokenKind::Parent);
        assert!(tokens.iter().any(|t| t.kind == TokenKind::InlineHtml && t.lexeme == "text"));

        let opens = tokens.iter().filter(|t| t.kind == TokenKind::LeftBrace).count();
        let closes = tokens.iter().filter(|t| t.kind == TokenKind::RightBrace).count();
        assert_eq!(opens, 2);
        assert_eq!(opens, closes);
        assert_eq!(lexer.depth(), 0);
        assert!(!lexer.has_errors());
    }

    // =========================================
    // Names and keywords
    // =========================================

    #[test]
    fn keywords_are_case_insensitive() {
        use TokenKind::*;
        assert_eq!(
            token_kinds("ABSTRACT Class extends SELF Static"),
            vec![Abstract, Class, Extends, SelfKw, Static]
        );
    }

    #[test]
    fn keywords_as_member_names() {
        use TokenKind::*;
        assert_eq!(
            token_kinds("Foo::class $a->list $b?->new function print() function &use()"),
            vec![
                Name, ColonColon, Name, Variable, Arrow, Name, Variable, NullsafeArrow, Name,
                Function, Name, LeftParen, RightParen, Function, Amp, Name, LeftParen, RightParen,
            ]
        );
    }

    #[test]
    fn qualified_names() {
        assert_eq!(
            tokenize(r"\Foo\Bar namespace\Baz Qux"),
            vec![
                (TokenKind::Name, r"\Foo\Bar".to_string()),
                (TokenKind::Name, r"namespace\Baz".to_string()),
                (TokenKind::Name, "Qux".to_string()),
            ]
        );
    }

    #[test]
    fn variables() {
        use TokenKind::*;
        assert_eq!(token_kinds("$this $$x ${'a'}"), vec![
            Variable, Operator, Variable, Operator, LeftBrace, StringLiteral, RightBrace
        ]);
    }

    // =========================================
    // Literals
    // =========================================

    #[test]
    fn numbers() {
        assert_eq!(
            tokenize("42 0x1F 0b10 1_000 3.14 .5 1e3 2E-2"),
            vec![
                (TokenKind::IntLiteral, "42".to_string()),
                (TokenKind::IntLiteral, "0x1F".to_string()),
                (TokenKind::IntLiteral, "0b10".to_string()),
                (TokenKind::IntLiteral, "1_000".to_string()),
                (TokenKind::FloatLiteral, "3.14".to_string()),
                (TokenKind::FloatLiteral, ".5".to_string()),
                (TokenKind::FloatLiteral, "1e3".to_string()),
                (TokenKind::FloatLiteral, "2E-2".to_string()),
            ]
        );
    }

    #[test]
    fn invalid_radix_number() {
        let arena = Bump::new();
        let mut lexer = Lexer::code("0x;", &arena);
        assert_eq!(lexer.next_token().kind, TokenKind::Error);
        assert!(matches!(lexer.errors()[0], LexError::InvalidNumber { .. }));
    }

    #[test]
    fn strings_keep_braces() {
        let arena = Bump::new();
        let mut lexer = Lexer::code(r#"'{' "{$a} \" }" `ls {`"#, &arena);
        let kinds: Vec<_> = lex_all(&mut lexer).iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            [TokenKind::StringLiteral, TokenKind::InterpolatedString, TokenKind::InterpolatedString]
        );
        assert_eq!(lexer.max_depth(), 0);
    }

    #[test]
    fn multiline_string_reports_end_line() {
        let arena = Bump::new();
        let tokens = lex_all(&mut Lexer::code("$a = 'one\ntwo\nthree';\n$b;", &arena));
        let string = tokens[2];
        assert_eq!(string.kind, TokenKind::StringLiteral);
        assert_eq!(string.start_line(), 1);
        assert_eq!(string.end_line(), 3);
        assert_eq!(tokens[4].start_line(), 4);
    }

    #[test]
    fn heredoc_and_nowdoc() {
        let arena = Bump::new();
        let source = "$a = <<<EOT\n  {$x} }\n  EOT;\n$b = <<<'RAW'\n{\nRAW;\n";
        let mut lexer = Lexer::code(source, &arena);
        let tokens = lex_all(&mut lexer);
        let docs: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::HeredocLiteral)
            .collect();
        assert_eq!(docs.len(), 2);
        assert_eq!((docs[0].start_line(), docs[0].end_line()), (1, 3));
        assert_eq!((docs[1].start_line(), docs[1].end_line()), (4, 6));
        assert_eq!(lexer.max_depth(), 0);
        assert!(!lexer.has_errors());
    }

    #[test]
    fn unterminated_heredoc() {
        let arena = Bump::new();
        let mut lexer = Lexer::code("<<<EOT\nbody\n", &arena);
        assert_eq!(lexer.next_token().kind, TokenKind::Error);
        assert!(matches!(
            &lexer.errors()[0],
            LexError::UnterminatedHeredoc { label, .. } if label == "EOT"
        ));
    }

    #[test]
    fn shift_is_not_heredoc() {
        use TokenKind::*;
        assert_eq!(token_kinds("$a <<< 2"), vec![Variable, Operator, Operator, IntLiteral]);
    }

    // =========================================
    // Comments
    // =========================================

    #[test]
    fn doc_comments_are_tokens() {
        use TokenKind::*;
        assert_eq!(
            token_kinds("/** doc */ /* plain */ /**/ // line\n# hash\n$a"),
            vec![DocComment, Variable]
        );
    }

    #[test]
    fn attributes_are_not_comments() {
        use TokenKind::*;
        assert_eq!(
            token_kinds("#[Route('/')] function"),
            vec![AttributeOpen, Name, LeftParen, StringLiteral, RightParen, RightBracket, Function]
        );
    }

    #[test]
    fn unterminated_comment() {
        let arena = Bump::new();
        let mut lexer = Lexer::code("/* never closed", &arena);
        assert_eq!(lexer.next_token().kind, TokenKind::Error);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert!(matches!(lexer.errors()[0], LexError::UnterminatedComment { .. }));
    }

    // =========================================
    // Scope tracking
    // =========================================

    #[test]
    fn unbalanced_close_brace() {
        let arena = Bump::new();
        let mut lexer = Lexer::code("{ } }", &arena);
        let tokens = lex_all(&mut lexer);
        assert_eq!(tokens.len(), 3);
        assert_eq!(lexer.depth(), 0);
        assert!(matches!(lexer.errors(), [LexError::UnbalancedScope { span }] if span.col == 5));
    }

    #[test]
    fn unclosed_scope_at_eof() {
        let arena = Bump::new();
        let mut lexer = Lexer::new("<?php class A { function f() {", &arena);
        lex_all(&mut lexer);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.errors().len(), 1);
        assert!(matches!(lexer.errors()[0], LexError::UnclosedScope { depth: 2, .. }));
    }

    #[test]
    fn lines_are_monotonic() {
        let arena = Bump::new();
        let source = "<?php\n/**\n * Doc\n */\nclass A {\n  public $s = \"a\nb\";\n}\n?>\ntext\n<?php\n$x;";
        let tokens = lex_all(&mut Lexer::new(source, &arena));
        let mut last_end = 1;
        for token in &tokens {
            assert!(token.start_line() <= token.end_line(), "{token:?}");
            assert!(token.start_line() >= last_end, "{token:?}");
            last_end = token.end_line();
        }
        let class = tokens.iter().find(|t| t.kind == TokenKind::Class).unwrap();
        assert_eq!(class.start_line(), 5);
        let variable = tokens.iter().rfind(|t| t.kind == TokenKind::Variable).unwrap();
        assert_eq!(variable.start_line(), 12);
    }
}

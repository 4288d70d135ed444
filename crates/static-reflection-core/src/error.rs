//! Error types shared by the lexer, the parser and the type model builders.
//!
//! ## Error Hierarchy
//!
//! ```text
//! LexError      - tokenization errors (unterminated literals, scope imbalance)
//! ParseError    - declaration-level parse errors (with ParseErrorKind)
//! ParseErrors   - every error reported for one file
//! InitError     - a builder rejected a write (field set twice, duplicate member)
//! ```
//!
//! Lexer and builder errors are folded into [`ParseError`]s by the parser so
//! that a file's outcome is a single [`ParseErrors`] collection.

use thiserror::Error;

use crate::Span;

// ============================================================================
// Lexer Errors
// ============================================================================

/// Errors that occur during lexical analysis (tokenization).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// An unexpected character was encountered.
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    /// A string literal was not properly terminated.
    #[error("unterminated string at {span}")]
    UnterminatedString { span: Span },

    /// A heredoc or nowdoc was missing its closing label.
    #[error("unterminated heredoc '{label}' at {span}")]
    UnterminatedHeredoc { label: String, span: Span },

    /// A block comment was not properly terminated.
    #[error("unterminated comment at {span}")]
    UnterminatedComment { span: Span },

    /// A numeric literal could not be parsed.
    #[error("invalid number at {span}: {detail}")]
    InvalidNumber { span: Span, detail: String },

    /// A `}` closed a scope that was never opened.
    #[error("unbalanced '}}' at {span}")]
    UnbalancedScope { span: Span },

    /// Input ended while scopes were still open.
    #[error("{depth} unclosed scope(s) at end of input ({span})")]
    UnclosedScope { depth: u32, span: Span },
}

impl LexError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
            LexError::UnterminatedString { span } => *span,
            LexError::UnterminatedHeredoc { span, .. } => *span,
            LexError::UnterminatedComment { span } => *span,
            LexError::InvalidNumber { span, .. } => *span,
            LexError::UnbalancedScope { span } => *span,
            LexError::UnclosedScope { span, .. } => *span,
        }
    }
}

// ============================================================================
// Builder Errors
// ============================================================================

/// Errors raised by the descriptor builders.
///
/// The parser initializes every field of a descriptor exactly once; a second
/// `init_*` call means a declaration header was processed twice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    /// A write-once field was written a second time.
    #[error("{field} of '{element}' is already initialized")]
    AlreadyInitialized {
        /// The field that was written twice (e.g. `"start line"`).
        field: &'static str,
        /// Name of the element being built.
        element: String,
    },

    /// A member with the same name was already added to the class.
    #[error("{kind} '{name}' is already declared in '{class}'")]
    DuplicateMember {
        /// What kind of member (`"method"`, `"property"`, `"constant"`).
        kind: &'static str,
        /// The member name.
        name: String,
        /// The class being built.
        class: String,
    },
}

impl InitError {
    /// Create an "already initialized" error.
    pub fn already_initialized(field: &'static str, element: impl Into<String>) -> Self {
        InitError::AlreadyInitialized {
            field,
            element: element.into(),
        }
    }

    /// Create a "duplicate member" error.
    pub fn duplicate_member(
        kind: &'static str,
        name: impl Into<String>,
        class: impl Into<String>,
    ) -> Self {
        InitError::DuplicateMember {
            kind,
            name: name.into(),
            class: class.into(),
        }
    }

    /// The parse error kind this builder error is reported as.
    pub fn parse_error_kind(&self) -> ParseErrorKind {
        match self {
            InitError::AlreadyInitialized { .. } => ParseErrorKind::DuplicateInitialization,
            InitError::DuplicateMember { .. } => ParseErrorKind::DuplicateIdentifier,
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Categories of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    // Token-level errors
    /// A specific token was expected but not found.
    ExpectedToken,
    /// Unexpected end of file.
    UnexpectedEof,
    /// The lexer rejected part of the input.
    LexerError,

    // Declaration errors
    /// The declaration is invalid.
    InvalidDeclaration,
    /// Function parameters were expected.
    ExpectedParameters,
    /// A class member was expected.
    ExpectedClassMember,

    // Identifier errors
    /// An identifier was expected.
    ExpectedIdentifier,
    /// A duplicate identifier was found.
    DuplicateIdentifier,

    // Syntax errors
    /// Mismatched delimiter (parentheses, brackets, braces).
    MismatchedDelimiter,

    // Modifier errors
    /// Invalid modifier for this context.
    InvalidModifier,
    /// Conflicting modifiers were specified.
    ConflictingModifiers,

    // Other
    /// A descriptor field was initialized twice.
    DuplicateInitialization,
}

impl ParseErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
            ParseErrorKind::LexerError => "lexer error",
            ParseErrorKind::InvalidDeclaration => "invalid declaration",
            ParseErrorKind::ExpectedParameters => "expected parameters",
            ParseErrorKind::ExpectedClassMember => "expected class member",
            ParseErrorKind::ExpectedIdentifier => "expected identifier",
            ParseErrorKind::DuplicateIdentifier => "duplicate identifier",
            ParseErrorKind::MismatchedDelimiter => "mismatched delimiter",
            ParseErrorKind::InvalidModifier => "invalid modifier",
            ParseErrorKind::ConflictingModifiers => "conflicting modifiers",
            ParseErrorKind::DuplicateInitialization => "duplicate initialization",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parse error with location and context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    /// The category of this error.
    pub kind: ParseErrorKind,
    /// The source location where the error occurred.
    pub span: Span,
    /// A detailed error message.
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create an "expected token" error.
    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            span,
            format!("expected {expected}, found {found}"),
        )
    }

    /// Create an "unexpected EOF" error.
    pub fn unexpected_eof(span: Span) -> Self {
        Self::new(
            ParseErrorKind::UnexpectedEof,
            span,
            "unexpected end of file".to_string(),
        )
    }

    /// Create an "expected identifier" error.
    pub fn expected_identifier(span: Span, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedIdentifier,
            span,
            format!("expected identifier, found {found}"),
        )
    }

    /// Create a "duplicate identifier" error.
    pub fn duplicate(span: Span, what: &str, name: &str) -> Self {
        Self::new(
            ParseErrorKind::DuplicateIdentifier,
            span,
            format!("{what} '{name}' is declared more than once"),
        )
    }

    /// Format the error with source context for display.
    ///
    /// This provides a rich error message with the relevant source line
    /// and a caret pointing to the error location.
    pub fn display_with_source(&self, source: &str) -> String {
        let mut output = String::new();

        let line = self.span.line;
        let column = self.span.col.max(1);

        output.push_str(&format!("Error at {}:{}: {}\n", line, column, self.kind));

        if !self.message.is_empty() {
            output.push_str(&format!("  {}\n", self.message));
        }

        if let Some(line_text) = Self::get_line(source, line) {
            output.push_str("  |\n");
            output.push_str(&format!("{:>3} | {}\n", line, line_text));

            let indent = " ".repeat(column as usize - 1);
            let pointer = if self.span.len <= 1 || self.span.end_line != self.span.line {
                "^".to_string()
            } else {
                "^".to_string() + &"~".repeat((self.span.len - 1) as usize)
            };
            output.push_str(&format!("  | {}{}\n", indent, pointer));
        }

        output
    }

    /// Get the text of a specific line (1-indexed).
    fn get_line(source: &str, line_num: u32) -> Option<String> {
        source
            .lines()
            .nth((line_num as usize).checked_sub(1)?)
            .map(|s| s.to_string())
    }
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        ParseError::new(ParseErrorKind::LexerError, error.span(), error.to_string())
    }
}

/// A collection of parse errors.
///
/// Used when parsing can continue after encountering errors,
/// allowing multiple errors to be reported at once.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseErrors {
    errors: Vec<ParseError>,
}

impl ParseErrors {
    /// Create a new empty error collection.
    pub fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Add an error to the collection.
    pub fn push(&mut self, error: ParseError) {
        self.errors.push(error);
    }

    /// Check if there are any errors.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Get the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over the errors.
    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }

    /// The first reported error, if any.
    pub fn first(&self) -> Option<&ParseError> {
        self.errors.first()
    }

    /// Whether any error has the given kind.
    pub fn contains_kind(&self, kind: ParseErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    /// Convert to a Vec of errors.
    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}

impl IntoIterator for ParseErrors {
    type Item = ParseError;
    type IntoIter = std::vec::IntoIter<ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ParseErrors {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl From<ParseError> for ParseErrors {
    fn from(error: ParseError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl std::fmt::Display for ParseErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseErrors {}

//! Core parser: token buffer, navigation and entry points.

use std::path::PathBuf;
use std::sync::{Arc, Weak};

use bumpalo::Bump;
use rustc_hash::FxHashMap;
use static_reflection_core::{
    ClassRegistry, DocBlock, DocCommentParser, InitError, LexicalContext, NamespaceResolver,
    NamingResolver, ParseError, ParseErrorKind, ParseErrors, Span, StandardDocCommentParser, StaticClass,
};
use tracing::debug;

use crate::lexer::{Lexer, Token, TokenKind};

/// Collaborators and settings for one parse.
///
/// The default uses [`NamespaceResolver`], [`StandardDocCommentParser`],
/// no registry (parents and interfaces stay unbound) and no file name.
#[derive(Debug, Clone)]
pub struct ParseContext {
    resolver: Arc<dyn NamingResolver>,
    doc_parser: Arc<dyn DocCommentParser>,
    registry: Weak<ClassRegistry>,
    source_file: Option<PathBuf>,
}

impl Default for ParseContext {
    fn default() -> Self {
        Self {
            resolver: Arc::new(NamespaceResolver),
            doc_parser: Arc::new(StandardDocCommentParser),
            registry: Weak::new(),
            source_file: None,
        }
    }
}

impl ParseContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `resolver` to qualify referenced type names.
    pub fn with_resolver(mut self, resolver: Arc<dyn NamingResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    /// Use `doc_parser` for `/** */` comments.
    pub fn with_doc_parser(mut self, doc_parser: Arc<dyn DocCommentParser>) -> Self {
        self.doc_parser = doc_parser;
        self
    }

    /// Bind parsed classes to `registry` for parent and interface lookup.
    pub fn with_registry(mut self, registry: Weak<ClassRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Record `path` as the file every parsed class comes from.
    pub fn with_source_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_file = Some(path.into());
        self
    }

    pub fn resolver(&self) -> &Arc<dyn NamingResolver> {
        &self.resolver
    }

    pub fn doc_parser(&self) -> &Arc<dyn DocCommentParser> {
        &self.doc_parser
    }

    pub fn source_file(&self) -> Option<&PathBuf> {
        self.source_file.as_ref()
    }
}

/// Declaration parser for PHP-style source.
///
/// The parser looks only at declarations: classes, interfaces and their
/// members. Method bodies, functions and statements are skipped by brace
/// depth. Errors are collected rather than returned early, so one broken
/// member does not hide the rest of the file.
///
/// # Example
///
/// ```
/// use bumpalo::Bump;
/// use static_reflection_parser::{ParseContext, Parser};
///
/// let arena = Bump::new();
/// let source = "<?php\nclass Greeter {\n    public function hello($name) {}\n}\n";
/// let classes = Parser::parse(source, &arena, &ParseContext::default()).unwrap();
/// assert_eq!(classes[0].name(), "Greeter");
/// assert_eq!(classes[0].own_methods()[0].parameters()[0].name(), "name");
/// ```
pub struct Parser<'src, 'ast> {
    /// Source text, for copying default values verbatim.
    pub(super) source: &'src str,
    /// Significant tokens; always ends with `Eof`.
    pub(super) buffer: Vec<Token<'ast>>,
    /// Doc comments keyed by the index of the token that follows them.
    pub(super) docs: FxHashMap<usize, Token<'ast>>,
    pub(super) position: usize,
    pub(super) errors: ParseErrors,
    /// Namespace and imports in effect.
    pub(super) context: LexicalContext,
    pub(super) resolver: Arc<dyn NamingResolver>,
    pub(super) doc_parser: Arc<dyn DocCommentParser>,
    pub(super) registry: Weak<ClassRegistry>,
    pub(super) source_file: Option<PathBuf>,
    pub(super) classes: Vec<Arc<StaticClass>>,
    /// Lookup keys of the classes declared so far, and whether each was
    /// declared inside a conditional block.
    pub(super) declared: FxHashMap<String, bool>,
}

impl<'src, 'ast> Parser<'src, 'ast> {
    /// Tokenize `source` and prepare to parse it.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn new(source: &'src str, arena: &'ast Bump, context: &ParseContext) -> Self {
        let mut lexer = Lexer::new(source, arena);
        let mut buffer = Vec::new();
        let mut docs = FxHashMap::default();

        loop {
            let token = lexer.next_token();
            match token.kind {
                TokenKind::InlineHtml
                | TokenKind::OpenTag
                | TokenKind::OpenTagWithEcho
                | TokenKind::CloseTag
                | TokenKind::Error => {}
                TokenKind::DocComment => {
                    docs.insert(buffer.len(), token);
                }
                TokenKind::Eof => {
                    buffer.push(token);
                    break;
                }
                _ => buffer.push(token),
            }
        }

        let mut errors = ParseErrors::new();
        for error in lexer.take_errors() {
            errors.push(error.into());
        }

        Self {
            source,
            buffer,
            docs,
            position: 0,
            errors,
            context: LexicalContext::new(),
            resolver: Arc::clone(&context.resolver),
            doc_parser: Arc::clone(&context.doc_parser),
            registry: context.registry.clone(),
            source_file: context.source_file.clone(),
            classes: Vec::new(),
            declared: FxHashMap::default(),
        }
    }

    /// Parse every class and interface declared in `source`.
    ///
    /// Fails when any error was reported, including lexer errors such as
    /// an unbalanced scope.
    pub fn parse(
        source: &'src str,
        arena: &'ast Bump,
        context: &ParseContext,
    ) -> Result<Vec<Arc<StaticClass>>, ParseErrors> {
        let (classes, errors) = Self::parse_lenient(source, arena, context);
        if errors.is_empty() {
            Ok(classes)
        } else {
            Err(errors)
        }
    }

    /// Parse `source`, returning whatever was declared alongside every
    /// error reported.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_lenient(
        source: &'src str,
        arena: &'ast Bump,
        context: &ParseContext,
    ) -> (Vec<Arc<StaticClass>>, ParseErrors) {
        Parser::new(source, arena, context).parse_declarations()
    }

    /// Run the parse over the whole buffer.
    pub fn parse_declarations(mut self) -> (Vec<Arc<StaticClass>>, ParseErrors) {
        self.parse_top_level();
        debug!(
            file = ?self.source_file,
            classes = self.classes.len(),
            errors = self.errors.len(),
            "parsed declarations"
        );
        (self.classes, self.errors)
    }

    // =========================================
    // Navigation
    // =========================================

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Token<'ast> {
        self.peek_nth(0)
    }

    /// Peek `n` tokens ahead. Past the end this is the `Eof` token.
    pub(super) fn peek_nth(&self, n: usize) -> Token<'ast> {
        let last = self.buffer.len().saturating_sub(1);
        self.buffer[(self.position + n).min(last)]
    }

    /// The most recently consumed token.
    pub(super) fn previous(&self) -> Token<'ast> {
        self.buffer[self.position.saturating_sub(1).min(self.buffer.len().saturating_sub(1))]
    }

    /// Consume the current token. Never moves past `Eof`.
    pub(super) fn advance(&mut self) -> Token<'ast> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.position += 1;
        }
        token
    }

    pub(super) fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    /// Consume the current token if it has the given kind.
    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume a token of the given kind or report what was found instead.
    pub(super) fn expect(&mut self, kind: TokenKind) -> Result<Token<'ast>, ParseError> {
        if let Some(token) = self.eat(kind) {
            return Ok(token);
        }
        Err(self.error_expected(kind.description()))
    }

    pub(super) fn is_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Error for the current token when `expected` was wanted.
    pub(super) fn error_expected(&self, expected: &str) -> ParseError {
        let found = self.peek();
        if found.kind == TokenKind::Eof {
            ParseError::unexpected_eof(found.span)
        } else {
            ParseError::expected_token(found.span, expected, &describe(found))
        }
    }

    // =========================================
    // Skipping
    // =========================================

    /// Skip a `{ … }` block, returning the closing brace.
    pub(super) fn skip_block(&mut self) -> Result<Token<'ast>, ParseError> {
        let open = self.expect(TokenKind::LeftBrace)?;
        let mut depth = 1u32;
        loop {
            let token = self.advance();
            match token.kind {
                TokenKind::LeftBrace => depth += 1,
                TokenKind::RightBrace => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(token);
                    }
                }
                TokenKind::Eof => {
                    return Err(ParseError::new(
                        ParseErrorKind::MismatchedDelimiter,
                        open.span,
                        "'{' is never closed",
                    ));
                }
                _ => {}
            }
        }
    }

    /// Skip consecutive `#[ … ]` attributes.
    pub(super) fn skip_attributes(&mut self) -> Result<(), ParseError> {
        while let Some(open) = self.eat(TokenKind::AttributeOpen) {
            let mut depth = 1u32;
            while depth > 0 {
                let token = self.advance();
                match token.kind {
                    TokenKind::AttributeOpen | TokenKind::LeftBracket => depth += 1,
                    TokenKind::RightBracket => depth -= 1,
                    TokenKind::Eof => {
                        return Err(ParseError::new(
                            ParseErrorKind::MismatchedDelimiter,
                            open.span,
                            "attribute is never closed",
                        ));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Skip to the end of a statement: past the next `;` at nesting zero,
    /// or past a block that ends it.
    pub(super) fn skip_statement(&mut self) {
        let mut nesting = 0u32;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => return,
                TokenKind::Semicolon if nesting == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::LeftBrace if nesting == 0 => {
                    if let Err(error) = self.skip_block() {
                        self.errors.push(error);
                    }
                    return;
                }
                TokenKind::RightBrace if nesting == 0 => return,
                TokenKind::LeftParen | TokenKind::LeftBracket => nesting += 1,
                TokenKind::RightParen | TokenKind::RightBracket => nesting = nesting.saturating_sub(1),
                _ => {}
            }
            self.advance();
        }
    }

    /// Copy the source text of an initializer, stopping before any of
    /// `terminators` at nesting zero.
    pub(super) fn parse_initializer(&mut self, terminators: &[TokenKind]) -> Result<String, ParseError> {
        let first = self.peek();
        let mut nesting = 0u32;
        loop {
            let token = self.peek();
            match token.kind {
                TokenKind::Eof => return Err(ParseError::unexpected_eof(token.span)),
                kind if nesting == 0 && terminators.contains(&kind) => break,
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => nesting += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    if nesting == 0 {
                        break;
                    }
                    nesting -= 1;
                }
                _ => {}
            }
            self.advance();
        }

        if self.position == 0 || self.previous().span.offset < first.span.offset {
            return Err(self.error_expected("value"));
        }
        let span = first.span.merge(self.previous().span);
        Ok(span.slice(self.source).unwrap_or_default().to_string())
    }

    // =========================================
    // Doc comments and error reporting
    // =========================================

    /// The doc comment closest before the current token, looking no
    /// further back than the token at `start`.
    pub(super) fn doc_since(&self, start: usize) -> Option<(String, DocBlock)> {
        let token = (start..=self.position)
            .rev()
            .find_map(|idx| self.docs.get(&idx))?;
        Some((token.lexeme.to_string(), self.doc_parser.parse(token.lexeme)))
    }

    /// Report a rejected builder write.
    pub(super) fn report_init(&mut self, result: Result<(), InitError>, span: Span) {
        if let Err(error) = result {
            self.errors.push(ParseError::new(error.parse_error_kind(), span, error.to_string()));
        }
    }
}

/// Describe a token for an error message.
pub(super) fn describe(token: Token<'_>) -> String {
    match token.kind {
        TokenKind::Name | TokenKind::Variable => format!("{} '{}'", token.kind, token.lexeme),
        kind => kind.to_string(),
    }
}

//! Top-level parsing: namespaces, imports and class headers.
//!
//! Everything that is not a declaration is skipped. Braces outside class
//! bodies are transparent, so classes declared inside `if` blocks or braced
//! namespaces are still found.

use static_reflection_core::naming::lookup_key;
use static_reflection_core::{ClassBuilder, ClassFlags, ParseError, Span};
use tracing::{debug, trace};

use super::parser::{Parser, describe};
use crate::lexer::TokenKind;

impl<'src, 'ast> Parser<'src, 'ast> {
    /// Parse declarations until end of input.
    pub(super) fn parse_top_level(&mut self) {
        // One entry per open top-level brace; `true` for a braced namespace.
        let mut braces: Vec<bool> = Vec::new();

        while !self.is_eof() {
            match self.peek().kind {
                TokenKind::Namespace => self.parse_namespace(&mut braces),
                TokenKind::Use => self.parse_use(),
                TokenKind::AttributeOpen => {
                    let start = self.position;
                    if let Err(error) = self.skip_attributes() {
                        self.errors.push(error);
                    } else if self.at_class_declaration() {
                        self.parse_class_declaration(start, braces.contains(&false));
                    }
                }
                TokenKind::Abstract
                | TokenKind::Final
                | TokenKind::Readonly
                | TokenKind::Class
                | TokenKind::Interface
                    if self.at_class_declaration() =>
                {
                    self.parse_class_declaration(self.position, braces.contains(&false));
                }
                TokenKind::Trait => {
                    self.advance();
                    self.skip_to_body();
                }
                TokenKind::Function => {
                    self.advance();
                    self.skip_to_body();
                }
                TokenKind::New if self.peek_nth(1).kind == TokenKind::Class => {
                    // Anonymous class
                    self.advance();
                    self.advance();
                    self.skip_to_body();
                }
                TokenKind::LeftBrace => {
                    self.advance();
                    braces.push(false);
                }
                TokenKind::RightBrace => {
                    self.advance();
                    if braces.pop() == Some(true) {
                        self.context.set_namespace("");
                    }
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Whether a class or interface header starts at the current token.
    fn at_class_declaration(&self) -> bool {
        let mut n = 0;
        while matches!(
            self.peek_nth(n).kind,
            TokenKind::Abstract | TokenKind::Final | TokenKind::Readonly
        ) {
            n += 1;
        }
        matches!(self.peek_nth(n).kind, TokenKind::Class | TokenKind::Interface)
            && self.peek_nth(n + 1).kind == TokenKind::Name
    }

    /// Skip a function, trait or anonymous class: everything up to its body
    /// and the body itself. Stops early at a `;` (bodiless declaration) or
    /// when a `)` closes a paren opened before the header.
    fn skip_to_body(&mut self) {
        let mut parens = 0u32;
        loop {
            match self.peek().kind {
                TokenKind::Eof => return,
                TokenKind::LeftBrace => {
                    if let Err(error) = self.skip_block() {
                        self.errors.push(error);
                    }
                    return;
                }
                TokenKind::Semicolon if parens == 0 => {
                    self.advance();
                    return;
                }
                TokenKind::LeftParen => parens += 1,
                TokenKind::RightParen => {
                    if parens == 0 {
                        return;
                    }
                    parens -= 1;
                }
                _ => {}
            }
            self.advance();
        }
    }

    // =========================================
    // Namespaces and imports
    // =========================================

    /// Parse `namespace A\B;`, `namespace A\B {` or `namespace {`.
    fn parse_namespace(&mut self, braces: &mut Vec<bool>) {
        self.advance();
        let name = self.eat(TokenKind::Name).map_or("", |token| token.lexeme);

        if self.eat(TokenKind::LeftBrace).is_some() {
            braces.push(true);
        } else if self.eat(TokenKind::Semicolon).is_none() {
            let error = self.error_expected("';' or '{'");
            self.errors.push(error);
            self.skip_statement();
        }

        trace!(namespace = name, "entering namespace");
        self.context.set_namespace(name);
    }

    /// Parse a `use` import statement, including group use.
    fn parse_use(&mut self) {
        self.advance();

        // Function and constant imports never name a class.
        if self.check(TokenKind::Function) || self.check(TokenKind::Const) {
            self.skip_statement();
            return;
        }

        loop {
            let Some(target) = self.eat(TokenKind::Name) else {
                let error = ParseError::expected_identifier(self.peek().span, &describe(self.peek()));
                self.errors.push(error);
                self.skip_statement();
                return;
            };

            let is_group = self.peek().lexeme == "\\" && self.peek_nth(1).kind == TokenKind::LeftBrace;
            if is_group {
                self.advance();
                if let Err(error) = self.parse_group_use(target.lexeme) {
                    self.errors.push(error);
                    self.skip_statement();
                    return;
                }
            } else {
                let alias = self.parse_use_alias();
                self.context.add_import(target.lexeme, alias);
            }

            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        if let Err(error) = self.expect(TokenKind::Semicolon) {
            self.errors.push(error);
            self.skip_statement();
        }
    }

    /// Parse `{ B, C as D }` after `use Prefix\`.
    fn parse_group_use(&mut self, prefix: &str) -> Result<(), ParseError> {
        self.expect(TokenKind::LeftBrace)?;
        while !self.check(TokenKind::RightBrace) {
            let skip = self.eat(TokenKind::Function).is_some() || self.eat(TokenKind::Const).is_some();
            let member = self.expect(TokenKind::Name)?;
            let alias = self.parse_use_alias();
            if !skip {
                let target = format!("{prefix}\\{}", member.lexeme);
                self.context.add_import(&target, alias);
            }
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RightBrace)?;
        Ok(())
    }

    fn parse_use_alias(&mut self) -> Option<&'ast str> {
        self.eat(TokenKind::As)?;
        self.eat(TokenKind::Name).map(|token| token.lexeme)
    }

    // =========================================
    // Class declarations
    // =========================================

    /// Parse a class or interface declaration.
    ///
    /// `start` is the index of the first token belonging to the declaration
    /// (attributes included), used to find its doc comment. `conditional`
    /// is set inside a block other than a braced namespace.
    pub(super) fn parse_class_declaration(&mut self, start: usize, conditional: bool) {
        let first = self.peek();
        let mut flags = ClassFlags::empty();
        loop {
            match self.peek().kind {
                TokenKind::Abstract => flags |= ClassFlags::ABSTRACT,
                TokenKind::Final => flags |= ClassFlags::FINAL,
                TokenKind::Readonly => {}
                _ => break,
            }
            self.advance();
        }
        if self.advance().kind == TokenKind::Interface {
            flags |= ClassFlags::INTERFACE;
        }
        let doc = self.doc_since(start);

        // `at_class_declaration` guarantees the name.
        let name_token = self.advance();
        let name = self.context.declare(name_token.lexeme);
        let mut class = ClassBuilder::new(name, flags);

        let header = first.span;
        if let Some((raw, block)) = doc {
            let result = class.init_doc_comment(raw, block);
            self.report_init(result, header);
        }
        let result = class.init_start_line(first.span.line);
        self.report_init(result, header);
        if let Some(path) = self.source_file.clone() {
            let result = class.init_source_file(path);
            self.report_init(result, header);
        }

        if let Err(error) = self.parse_class_header(&mut class) {
            self.errors.push(error);
            self.recover_declaration();
            return;
        }

        self.parse_class_body(&mut class);

        match self.expect(TokenKind::RightBrace) {
            Ok(close) => {
                let result = class.init_end_line(close.span.end_line);
                self.report_init(result, close.span);
            }
            Err(error) => {
                self.errors.push(error);
                let result = class.init_end_line(self.previous().span.end_line);
                self.report_init(result, header);
            }
        }

        self.publish_class(class, name_token.span, conditional);
    }

    /// Parse `extends …` / `implements …` and the opening brace.
    fn parse_class_header(&mut self, class: &mut ClassBuilder) -> Result<(), ParseError> {
        if self.eat(TokenKind::Extends).is_some() {
            if class.is_interface() {
                for name in self.parse_name_list()? {
                    class.add_interface(name);
                }
            } else {
                let span = self.peek().span;
                let parent = self.parse_class_name()?;
                let result = class.init_parent(parent);
                self.report_init(result, span);
            }
        }

        if self.eat(TokenKind::Implements).is_some() {
            for name in self.parse_name_list()? {
                class.add_interface(name);
            }
        }

        self.expect(TokenKind::LeftBrace)?;
        Ok(())
    }

    /// Parse a comma-separated list of class names.
    fn parse_name_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut names = vec![self.parse_class_name()?];
        while self.eat(TokenKind::Comma).is_some() {
            names.push(self.parse_class_name()?);
        }
        Ok(names)
    }

    /// Parse a referenced class name and qualify it.
    fn parse_class_name(&mut self) -> Result<String, ParseError> {
        let token = self.peek();
        if token.kind != TokenKind::Name {
            return Err(ParseError::expected_identifier(token.span, &describe(token)));
        }
        self.advance();
        Ok(self.resolver.resolve(token.lexeme, &self.context))
    }

    /// Skip the rest of a declaration whose header failed to parse.
    fn recover_declaration(&mut self) {
        loop {
            match self.peek().kind {
                TokenKind::Eof => return,
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::LeftBrace => {
                    if let Err(error) = self.skip_block() {
                        self.errors.push(error);
                    }
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Freeze a parsed class and add it to the results, unless a class of
    /// the same name was already declared in this file.
    ///
    /// Redeclaring an unconditional class is an error. When either
    /// declaration sits in a conditional block (`if (...) { class A {} }
    /// else { class A {} }`) only the first is kept.
    fn publish_class(&mut self, class: ClassBuilder, name_span: Span, conditional: bool) {
        let key = lookup_key(class.name());
        if let Some(&earlier_conditional) = self.declared.get(&key) {
            if conditional || earlier_conditional {
                debug!(class = class.name(), line = name_span.line, "ignoring alternative declaration");
            } else {
                self.errors.push(ParseError::duplicate(name_span, "class", class.name()));
            }
            return;
        }
        self.declared.insert(key, conditional);

        let class = class.build(self.registry.clone());
        debug!(
            class = class.name(),
            methods = class.own_methods().len(),
            properties = class.own_properties().len(),
            line = class.start_line(),
            "parsed class"
        );
        self.classes.push(class);
    }
}

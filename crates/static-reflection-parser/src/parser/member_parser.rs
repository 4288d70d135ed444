//! Class body parsing: methods, properties, constants, parameters and
//! type hints.
//!
//! Every member is built through the write-once builders; a rejected write
//! is reported as a parse error but does not stop the parse.

use static_reflection_core::{
    CONSTRUCTOR_NAME, ClassBuilder, ClassConstant, DocBlock, MethodBuilder, Modifiers,
    ParameterBuilder, ParseError, ParseErrorKind, PropertyBuilder, TypeHint,
};
use tracing::trace;

use super::parser::{Parser, describe};
use crate::lexer::{Token, TokenKind};

impl<'src, 'ast> Parser<'src, 'ast> {
    /// Parse members until the closing `}` of the class (not consumed).
    pub(super) fn parse_class_body(&mut self, class: &mut ClassBuilder) {
        while !self.check(TokenKind::RightBrace) && !self.is_eof() {
            let before = self.position;
            if let Err(error) = self.parse_member(class) {
                trace!(class = class.name(), %error, "skipping malformed member");
                self.errors.push(error);
                self.synchronize_member();
            }
            if self.position == before {
                self.advance();
            }
        }
    }

    fn parse_member(&mut self, class: &mut ClassBuilder) -> Result<(), ParseError> {
        let start = self.position;
        self.skip_attributes()?;

        match self.peek().kind {
            // Trait use, with or without an adaptation block.
            TokenKind::Use => {
                self.advance();
                self.skip_statement();
                return Ok(());
            }
            TokenKind::Semicolon => {
                self.advance();
                return Ok(());
            }
            _ => {}
        }

        let doc = self.doc_since(start);
        let first = self.peek();
        let modifiers = self.parse_modifiers();

        match self.peek().kind {
            TokenKind::Function => self.parse_method(class, modifiers, doc, first.span.line),
            TokenKind::Const => self.parse_constants(class, modifiers),
            TokenKind::Variable if !modifiers.is_empty() => {
                self.parse_properties(class, modifiers, None, doc, first.span.line)
            }
            TokenKind::Name
            | TokenKind::Question
            | TokenKind::SelfKw
            | TokenKind::Parent
            | TokenKind::LeftParen
                if !modifiers.is_empty() =>
            {
                let declared = self.parse_type(class)?;
                self.parse_properties(class, modifiers, Some(declared), doc, first.span.line)
            }
            _ => {
                let found = self.peek();
                Err(ParseError::new(
                    ParseErrorKind::ExpectedClassMember,
                    found.span,
                    format!("expected class member, found {}", describe(found)),
                ))
            }
        }
    }

    /// Collect leading member modifiers. Repeated or conflicting modifiers
    /// are reported; the first one written wins.
    fn parse_modifiers(&mut self) -> Modifiers {
        let mut modifiers = Modifiers::empty();
        loop {
            let token = self.peek();
            let flag = match token.kind {
                TokenKind::Public | TokenKind::Var => Modifiers::PUBLIC,
                TokenKind::Protected => Modifiers::PROTECTED,
                TokenKind::Private => Modifiers::PRIVATE,
                TokenKind::Static => Modifiers::STATIC,
                TokenKind::Abstract => Modifiers::ABSTRACT,
                TokenKind::Final => Modifiers::FINAL,
                TokenKind::Readonly => Modifiers::READONLY,
                _ => return modifiers,
            };
            self.advance();

            if modifiers.contains(flag) {
                self.errors.push(ParseError::new(
                    ParseErrorKind::InvalidModifier,
                    token.span,
                    format!("duplicate modifier '{}'", token.lexeme),
                ));
            } else if flag.intersects(Modifiers::VISIBILITY) && modifiers.intersects(Modifiers::VISIBILITY) {
                self.errors.push(ParseError::new(
                    ParseErrorKind::ConflictingModifiers,
                    token.span,
                    "multiple visibility modifiers",
                ));
            } else if (modifiers | flag).contains(Modifiers::ABSTRACT | Modifiers::FINAL) {
                self.errors.push(ParseError::new(
                    ParseErrorKind::ConflictingModifiers,
                    token.span,
                    "'abstract' and 'final' cannot be combined",
                ));
            } else {
                modifiers |= flag;
            }
        }
    }

    /// Skip the rest of a malformed member.
    fn synchronize_member(&mut self) {
        loop {
            match self.peek().kind {
                TokenKind::Eof | TokenKind::RightBrace => return,
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

    /// Identifier in a declaration position; reserved words are allowed.
    fn expect_name(&mut self) -> Result<Token<'ast>, ParseError> {
        let token = self.peek();
        if token.kind == TokenKind::Name || token.kind.is_keyword() {
            self.advance();
            Ok(token)
        } else {
            Err(ParseError::expected_identifier(token.span, &describe(token)))
        }
    }

    // =========================================
    // Methods
    // =========================================

    fn parse_method(
        &mut self,
        class: &mut ClassBuilder,
        mut modifiers: Modifiers,
        doc: Option<(String, DocBlock)>,
        start_line: u32,
    ) -> Result<(), ParseError> {
        self.expect(TokenKind::Function)?;
        let returns_reference = self.eat(TokenKind::Amp).is_some();
        let name = self.expect_name()?;

        if class.is_interface() {
            modifiers |= Modifiers::ABSTRACT;
        }
        let mut method = MethodBuilder::new(name.lexeme, modifiers).with_returns_reference(returns_reference);

        let doc_block = doc.as_ref().map(|(_, block)| block);
        let (parameters, promoted) = self.parse_parameters(class, doc_block)?;

        let mut return_type = None;
        if self.eat(TokenKind::Colon).is_some() {
            return_type = Some(self.parse_type(class)?);
        } else if let Some(text) = doc_block.and_then(DocBlock::return_type) {
            return_type = self.doc_type(text, class);
        }

        let end = match self.peek().kind {
            TokenKind::Semicolon => self.advance(),
            TokenKind::LeftBrace => self.skip_block()?,
            _ => return Err(self.error_expected("'{' or ';'")),
        };

        let span = name.span;
        if let Some((raw, block)) = doc {
            let result = method.init_doc_comment(raw, block);
            self.report_init(result, span);
        }
        if let Some(hint) = return_type {
            let result = method.init_return_type(hint);
            self.report_init(result, span);
        }
        let results = [
            method.init_parameters(parameters),
            method.init_start_line(start_line),
            method.init_end_line(end.span.end_line),
        ];
        for result in results {
            self.report_init(result, span);
        }

        trace!(class = class.name(), method = name.lexeme, "parsed method");
        let result = class.add_method(method);
        self.report_init(result, span);

        if name.lexeme.eq_ignore_ascii_case(CONSTRUCTOR_NAME) {
            for property in promoted {
                let result = class.add_property(property);
                self.report_init(result, span);
            }
        }
        Ok(())
    }

    /// Parse `( … )`, returning the parameters and a property for each
    /// promoted parameter.
    fn parse_parameters(
        &mut self,
        class: &ClassBuilder,
        doc: Option<&DocBlock>,
    ) -> Result<(Vec<ParameterBuilder>, Vec<PropertyBuilder>), ParseError> {
        if !self.check(TokenKind::LeftParen) {
            let found = self.peek();
            return Err(ParseError::new(
                ParseErrorKind::ExpectedParameters,
                found.span,
                format!("expected parameter list, found {}", describe(found)),
            ));
        }
        self.advance();

        let mut parameters = Vec::new();
        let mut promoted = Vec::new();
        while !self.check(TokenKind::RightParen) {
            let (parameter, property) = self.parse_parameter(class, doc)?;
            parameters.push(parameter);
            promoted.extend(property);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::RightParen)?;
        Ok((parameters, promoted))
    }

    fn parse_parameter(
        &mut self,
        class: &ClassBuilder,
        doc: Option<&DocBlock>,
    ) -> Result<(ParameterBuilder, Option<PropertyBuilder>), ParseError> {
        self.skip_attributes()?;
        let first = self.peek();

        // Constructor promotion
        let mut promotion = Modifiers::empty();
        loop {
            let flag = match self.peek().kind {
                TokenKind::Public => Modifiers::PUBLIC,
                TokenKind::Protected => Modifiers::PROTECTED,
                TokenKind::Private => Modifiers::PRIVATE,
                TokenKind::Readonly => Modifiers::READONLY,
                _ => break,
            };
            self.advance();
            promotion |= flag;
        }

        let declared = match self.peek().kind {
            TokenKind::Amp | TokenKind::Ellipsis | TokenKind::Variable => None,
            _ => Some(self.parse_type(class)?),
        };
        let by_reference = self.eat(TokenKind::Amp).is_some();
        let variadic = self.eat(TokenKind::Ellipsis).is_some();
        let variable = self.expect(TokenKind::Variable)?;
        let default = match self.eat(TokenKind::Equal) {
            Some(_) => Some(self.parse_initializer(&[TokenKind::Comma, TokenKind::RightParen])?),
            None => None,
        };

        let mut hint = declared;
        if hint.is_none()
            && let Some(text) = doc.and_then(|block| block.param_type(variable.lexeme))
        {
            hint = self.doc_type(text, class);
        }

        let span = variable.span;
        let mut property = None;
        if !promotion.is_empty() {
            let mut promoted = PropertyBuilder::new(variable.lexeme, promotion);
            let mut results = vec![
                promoted.init_start_line(first.span.line),
                promoted.init_end_line(variable.span.end_line),
            ];
            if let Some(hint) = &hint {
                results.push(promoted.init_type_hint(hint.clone()));
            }
            for result in results {
                self.report_init(result, span);
            }
            property = Some(promoted);
        }

        let mut parameter = ParameterBuilder::new(variable.lexeme)
            .with_by_reference(by_reference)
            .with_variadic(variadic)
            .with_promoted(!promotion.is_empty());
        if let Some(hint) = hint {
            let result = parameter.init_type_hint(hint);
            self.report_init(result, span);
        }
        if let Some(default) = default {
            let result = parameter.init_default_value(default);
            self.report_init(result, span);
        }
        Ok((parameter, property))
    }

    // =========================================
    // Properties and constants
    // =========================================

    /// Parse `$a [= x], $b [= y];`. The doc comment goes to the first
    /// declarator; the declared (or `@var`) type applies to all of them.
    fn parse_properties(
        &mut self,
        class: &mut ClassBuilder,
        modifiers: Modifiers,
        declared: Option<TypeHint>,
        mut doc: Option<(String, DocBlock)>,
        start_line: u32,
    ) -> Result<(), ParseError> {
        let mut hint = declared;
        if hint.is_none()
            && let Some(text) = doc.as_ref().and_then(|(_, block)| block.var_type())
        {
            hint = self.doc_type(text, class);
        }

        let mut line = start_line;
        loop {
            let variable = self.expect(TokenKind::Variable)?;
            let default = match self.eat(TokenKind::Equal) {
                Some(_) => Some(self.parse_initializer(&[TokenKind::Comma, TokenKind::Semicolon])?),
                None => None,
            };

            let mut property = PropertyBuilder::new(variable.lexeme, modifiers);
            let mut results = vec![
                property.init_start_line(line),
                property.init_end_line(self.previous().span.end_line),
            ];
            if let Some((raw, block)) = doc.take() {
                results.push(property.init_doc_comment(raw, block));
            }
            if let Some(hint) = &hint {
                results.push(property.init_type_hint(hint.clone()));
            }
            if let Some(default) = default {
                results.push(property.init_default_value(default));
            }
            results.push(class.add_property(property));
            for result in results {
                self.report_init(result, variable.span);
            }

            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
            line = self.peek().span.line;
        }

        self.expect(TokenKind::Semicolon)?;
        Ok(())
    }

    /// Parse `const [type] A = 1, B = 2;`.
    fn parse_constants(&mut self, class: &mut ClassBuilder, modifiers: Modifiers) -> Result<(), ParseError> {
        self.expect(TokenKind::Const)?;
        let declared = match self.peek_nth(1).kind {
            TokenKind::Equal => None,
            _ => Some(self.parse_type(class)?),
        };

        loop {
            let name = self.expect_name()?;
            self.expect(TokenKind::Equal)?;
            let value = self.parse_initializer(&[TokenKind::Comma, TokenKind::Semicolon])?;
            let constant = ClassConstant::new(name.lexeme, value, name.span.line)
                .with_modifiers(modifiers)
                .with_type_hint(declared.clone());
            let result = class.add_constant(constant);
            self.report_init(result, name.span);

            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }

        self.expect(TokenKind::Semicolon)?;
        Ok(())
    }

    // =========================================
    // Type hints
    // =========================================

    /// Parse a declared type: `?T`, `A|B`, `A&B` or `(A&B)|null`.
    pub(super) fn parse_type(&mut self, class: &ClassBuilder) -> Result<TypeHint, ParseError> {
        if self.eat(TokenKind::Question).is_some() {
            return Ok(TypeHint::Nullable(Box::new(self.parse_single_type(class)?)));
        }

        let first = self.parse_intersection(class)?;
        if !self.check(TokenKind::Pipe) {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.eat(TokenKind::Pipe).is_some() {
            members.push(self.parse_intersection(class)?);
        }
        Ok(TypeHint::Union(members))
    }

    /// A single type, `A&B`, or a parenthesized `(A&B)` union member.
    fn parse_intersection(&mut self, class: &ClassBuilder) -> Result<TypeHint, ParseError> {
        if self.eat(TokenKind::LeftParen).is_some() {
            let mut members = vec![self.parse_single_type(class)?];
            while self.eat(TokenKind::Amp).is_some() {
                members.push(self.parse_single_type(class)?);
            }
            self.expect(TokenKind::RightParen)?;
            return Ok(TypeHint::Intersection(members));
        }

        let first = self.parse_single_type(class)?;
        if !self.at_intersection_amp() {
            return Ok(first);
        }
        let mut members = vec![first];
        while self.at_intersection_amp() {
            self.advance();
            members.push(self.parse_single_type(class)?);
        }
        Ok(TypeHint::Intersection(members))
    }

    /// `&` joining two types, as opposed to a by-reference marker before a
    /// parameter variable.
    fn at_intersection_amp(&self) -> bool {
        self.check(TokenKind::Amp)
            && matches!(
                self.peek_nth(1).kind,
                TokenKind::Name | TokenKind::SelfKw | TokenKind::Parent | TokenKind::Static
            )
    }

    fn parse_single_type(&mut self, class: &ClassBuilder) -> Result<TypeHint, ParseError> {
        let token = self.peek();
        let hint = match token.kind {
            TokenKind::SelfKw => TypeHint::Class(class.name().to_string()),
            TokenKind::Parent => match class.parent_name() {
                Some(parent) => TypeHint::Class(parent.to_string()),
                None => {
                    self.advance();
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidDeclaration,
                        token.span,
                        format!("'parent' used in '{}', which has no parent", class.name()),
                    ));
                }
            },
            TokenKind::Static => TypeHint::Static,
            TokenKind::Name => self.name_type(token.lexeme),
            _ => return Err(ParseError::expected_token(token.span, "type", &describe(token))),
        };
        self.advance();
        Ok(hint)
    }

    /// A type keyword, or a class name qualified through the resolver.
    fn name_type(&self, name: &str) -> TypeHint {
        self.builtin_or_class(name, TypeHint::keyword)
    }

    /// An imported name is always a class, even when it spells a pseudo type.
    fn builtin_or_class(&self, name: &str, keyword: fn(&str) -> Option<TypeHint>) -> TypeHint {
        if !name.contains('\\')
            && self.context.import(name).is_none()
            && let Some(hint) = keyword(name)
        {
            return hint;
        }
        TypeHint::Class(self.resolver.resolve(name, &self.context))
    }

    /// Interpret the type word of a `@var`, `@param` or `@return` tag.
    ///
    /// Returns `None` for anything that is not a recognizable type.
    pub(super) fn doc_type(&self, text: &str, class: &ClassBuilder) -> Option<TypeHint> {
        let text = text.trim();
        if let Some(inner) = text.strip_prefix('?') {
            return Some(TypeHint::Nullable(Box::new(self.doc_single_type(inner, class)?)));
        }

        let mut members = text
            .split('|')
            .map(|part| self.doc_single_type(part, class))
            .collect::<Option<Vec<_>>>()?;
        match members.len() {
            0 => None,
            1 => members.pop(),
            _ => Some(TypeHint::Union(members)),
        }
    }

    fn doc_single_type(&self, text: &str, class: &ClassBuilder) -> Option<TypeHint> {
        let text = text.trim();
        if text.ends_with("[]") {
            return Some(TypeHint::Array);
        }

        // Generic arguments (`array<int, Foo>`) are dropped.
        let base = text.find('<').map_or(text, |idx| &text[..idx]);
        let well_formed = base
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '\\' | '$' | '-'));
        if base.is_empty() || !well_formed {
            return None;
        }

        match base.to_ascii_lowercase().as_str() {
            "$this" | "static" => Some(TypeHint::Static),
            "self" => Some(TypeHint::Class(class.name().to_string())),
            "parent" => class.parent_name().map(|parent| TypeHint::Class(parent.to_string())),
            "list" | "non-empty-array" | "non-empty-list" => Some(TypeHint::Array),
            _ if base.starts_with('$') || base.contains('-') => None,
            _ => Some(self.builtin_or_class(base, TypeHint::doc_keyword)),
        }
    }
}

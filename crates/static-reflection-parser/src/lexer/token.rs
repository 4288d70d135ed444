//! Token types produced by the lexer.

use std::fmt;

use static_reflection_core::Span;

/// A token from the source code.
///
/// The `'ast` lifetime refers to the arena where the lexeme string is
/// allocated, so the source can be dropped once lexing is done.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'ast> {
    /// The type of token.
    pub kind: TokenKind,
    /// The source text of this token (allocated in arena).
    pub lexeme: &'ast str,
    /// Location in source.
    pub span: Span,
}

impl<'ast> Token<'ast> {
    /// Create a new token.
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'ast str, span: Span) -> Self {
        Self { kind, lexeme, span }
    }

    /// Line the lexeme starts on (1-indexed).
    #[inline]
    pub fn start_line(&self) -> u32 {
        self.span.line
    }

    /// Line the lexeme ends on (1-indexed).
    #[inline]
    pub fn end_line(&self) -> u32 {
        self.span.end_line
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// All token kinds.
///
/// Only the constructs a declaration scan needs are given their own kind;
/// the remaining operators share [`TokenKind::Operator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Embedded-language boundaries
    // =========================================
    /// Text outside `<?php … ?>`, passed through verbatim.
    InlineHtml,
    /// `<?php` or `<?`
    OpenTag,
    /// `<?=`
    OpenTagWithEcho,
    /// `?>`
    CloseTag,

    // =========================================
    // Literals
    // =========================================
    /// `42`, `0x1F`, `0b101`, `0o17`
    IntLiteral,
    /// `3.14`, `1e10`, `.5`
    FloatLiteral,
    /// `'text'`
    StringLiteral,
    /// `"text $var"` or `` `cmd` ``
    InterpolatedString,
    /// `<<<EOT … EOT` or `<<<'EOT' … EOT`
    HeredocLiteral,

    // =========================================
    // Names
    // =========================================
    /// Identifier, possibly `\`-qualified: `Foo`, `\Foo\Bar`, `namespace\Baz`
    Name,
    /// `$name`
    Variable,
    /// `/** … */`
    DocComment,

    // =========================================
    // Contextual class references
    // =========================================
    /// `self`
    SelfKw,
    /// `parent`
    Parent,
    /// `static`
    Static,

    // =========================================
    // Keywords - Declarations
    // =========================================
    /// `abstract`
    Abstract,
    /// `class`
    Class,
    /// `interface`
    Interface,
    /// `trait`
    Trait,
    /// `function`
    Function,
    /// `const`
    Const,
    /// `var`
    Var,
    /// `extends`
    Extends,
    /// `implements`
    Implements,
    /// `namespace`
    Namespace,
    /// `use`
    Use,
    /// `as`
    As,
    /// `new`
    New,

    // =========================================
    // Keywords - Modifiers
    // =========================================
    /// `public`
    Public,
    /// `protected`
    Protected,
    /// `private`
    Private,
    /// `final`
    Final,
    /// `readonly`
    Readonly,

    // =========================================
    // Delimiters
    // =========================================
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `#[`
    AttributeOpen,

    // =========================================
    // Punctuation
    // =========================================
    /// `=`
    Equal,
    /// `&`
    Amp,
    /// `?`
    Question,
    /// `:`
    Colon,
    /// `::`
    ColonColon,
    /// `->`
    Arrow,
    /// `?->`
    NullsafeArrow,
    /// `=>`
    DoubleArrow,
    /// `...`
    Ellipsis,
    /// `|`
    Pipe,
    /// Any other operator: `+`, `.=`, `===`, `??`, …
    Operator,

    // =========================================
    // Special
    // =========================================
    /// End of file
    Eof,
    /// Lexer error (unrecognized input)
    Error,
}

impl TokenKind {
    /// Check if this token kind is a reserved word.
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            SelfKw
                | Parent
                | Static
                | Abstract
                | Class
                | Interface
                | Trait
                | Function
                | Const
                | Var
                | Extends
                | Implements
                | Namespace
                | Use
                | As
                | New
                | Public
                | Protected
                | Private
                | Final
                | Readonly
        )
    }

    /// Check if this token kind is a literal.
    pub fn is_literal(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            IntLiteral | FloatLiteral | StringLiteral | InterpolatedString | HeredocLiteral
        )
    }

    /// Check if this token kind is a member modifier.
    pub fn is_modifier(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Public | Protected | Private | Static | Abstract | Final | Readonly | Var
        )
    }

    /// Tokens after which a keyword is a plain member name
    /// (`$a->list`, `Foo::class`, `function print()`).
    pub(crate) fn introduces_member_name(self) -> bool {
        matches!(
            self,
            TokenKind::Arrow | TokenKind::NullsafeArrow | TokenKind::ColonColon | TokenKind::Function
        )
    }

    /// Human-readable description used in error messages.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            InlineHtml => "inline text",
            OpenTag => "'<?php'",
            OpenTagWithEcho => "'<?='",
            CloseTag => "'?>'",
            IntLiteral => "integer",
            FloatLiteral => "float",
            StringLiteral | InterpolatedString => "string",
            HeredocLiteral => "heredoc",
            Name => "name",
            Variable => "variable",
            DocComment => "doc comment",
            SelfKw => "'self'",
            Parent => "'parent'",
            Static => "'static'",
            Abstract => "'abstract'",
            Class => "'class'",
            Interface => "'interface'",
            Trait => "'trait'",
            Function => "'function'",
            Const => "'const'",
            Var => "'var'",
            Extends => "'extends'",
            Implements => "'implements'",
            Namespace => "'namespace'",
            Use => "'use'",
            As => "'as'",
            New => "'new'",
            Public => "'public'",
            Protected => "'protected'",
            Private => "'private'",
            Final => "'final'",
            Readonly => "'readonly'",
            LeftParen => "'('",
            RightParen => "')'",
            LeftBracket => "'['",
            RightBracket => "']'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            Semicolon => "';'",
            Comma => "','",
            AttributeOpen => "'#['",
            Equal => "'='",
            Amp => "'&'",
            Question => "'?'",
            Colon => "':'",
            ColonColon => "'::'",
            Arrow => "'->'",
            NullsafeArrow => "'?->'",
            DoubleArrow => "'=>'",
            Ellipsis => "'...'",
            Pipe => "'|'",
            Operator => "operator",
            Eof => "end of file",
            Error => "invalid input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// Look up a reserved word, case-insensitively.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    // Longest keyword is `implements`.
    if ident.len() > 10 {
        return None;
    }
    let mut buf = [0u8; 10];
    let lower = &mut buf[..ident.len()];
    lower.copy_from_slice(ident.as_bytes());
    lower.make_ascii_lowercase();

    let kind = match &*lower {
        b"self" => TokenKind::SelfKw,
        b"parent" => TokenKind::Parent,
        b"static" => TokenKind::Static,
        b"abstract" => TokenKind::Abstract,
        b"class" => TokenKind::Class,
        b"interface" => TokenKind::Interface,
        b"trait" => TokenKind::Trait,
        b"function" => TokenKind::Function,
        b"const" => TokenKind::Const,
        b"var" => TokenKind::Var,
        b"extends" => TokenKind::Extends,
        b"implements" => TokenKind::Implements,
        b"namespace" => TokenKind::Namespace,
        b"use" => TokenKind::Use,
        b"as" => TokenKind::As,
        b"new" => TokenKind::New,
        b"public" => TokenKind::Public,
        b"protected" => TokenKind::Protected,
        b"private" => TokenKind::Private,
        b"final" => TokenKind::Final,
        b"readonly" => TokenKind::Readonly,
        _ => return None,
    };
    Some(kind)
}

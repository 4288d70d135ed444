//! Lexical analysis for PHP-style source.

mod cursor;
mod lexer;
mod token;

pub use lexer::Lexer;
pub use static_reflection_core::Span;
pub use token::{Token, TokenKind, lookup_keyword};

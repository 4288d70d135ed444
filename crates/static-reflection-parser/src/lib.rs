//! Static reflection parser crate.
//!
//! This crate provides the tokenizer and declaration parser for PHP-style
//! source code. It includes:
//! - Lexical analysis (tokenization), including embedded-text mode
//! - Namespace and import tracking during the parse
//! - Class, interface and member extraction into reflection descriptors
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use static_reflection_parser::{ParseContext, Parser};
//!
//! let arena = Bump::new();
//! let source = r#"<?php
//! namespace App;
//!
//! class Player {
//!     private int $health = 100;
//!
//!     public function takeDamage(int $amount): void {
//!         $this->health -= $amount;
//!     }
//! }
//! "#;
//!
//! match Parser::parse(source, &arena, &ParseContext::default()) {
//!     Ok(classes) => println!("Parsed successfully: {} classes", classes.len()),
//!     Err(errors) => eprintln!("Parse errors: {}", errors),
//! }
//! ```

// Lexer module
pub mod lexer;

// Parser module
pub mod parser;

// Re-export commonly used types at crate root
pub use lexer::{Lexer, Span, Token, TokenKind};
pub use parser::{ParseContext, ParseError, ParseErrorKind, ParseErrors, Parser};

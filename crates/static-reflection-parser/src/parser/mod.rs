//! Declaration parser.
//!
//! Turns a token stream into [`StaticClass`](static_reflection_core::StaticClass)
//! descriptors. Function bodies, initializers and everything outside
//! class and interface declarations are skipped, keeping only their extent.

mod decl_parser;
mod member_parser;
mod parser;

pub use parser::{ParseContext, Parser};
pub use static_reflection_core::{ParseError, ParseErrorKind, ParseErrors};

//! Static reflection for PHP-style source code.
//!
//! Classes and interfaces are described by reading their source, never by
//! loading or executing it. The crate is a facade over:
//! - [`static_reflection_parser`]: the tokenizer and declaration parser
//! - [`static_reflection_core`]: the descriptor model and class registry
//!
//! and adds the [`Session`] parse cache plus the file-set and directory
//! queries built on it.
//!
//! # Example
//!
//! ```no_run
//! use static_reflection::prelude::*;
//!
//! let session = Session::new();
//! let result = DirectoryQuery::new(&session)
//!     .exclude("^vendor$")
//!     .extensions(["php"])
//!     .find("src")?;
//!
//! for class in result.classes() {
//!     println!("{} ({} methods)", class.name(), class.methods().len());
//! }
//! for failure in result.failures() {
//!     eprintln!("{}", failure.error);
//! }
//! # Ok::<(), static_reflection::QueryError>(())
//! ```

pub mod error;
pub mod query;
pub mod session;

pub use error::{FileError, QueryError};
pub use query::{DirectoryQuery, FileFailure, FileSetQuery, QueryResult};
pub use session::{ParsedFile, Session, SessionBuilder, SessionStats};

pub use static_reflection_core::{
    ClassConstant, ClassFlags, ClassRef, ClassRegistry, DocBlock, DocCommentParser, MethodOrigin,
    Modifiers, NamespaceResolver, NamingResolver, NullClass, NullResolver, ReflectionClass,
    StandardDocCommentParser, StaticClass, StaticMethod, StaticParameter, StaticProperty, TypeHint,
    Visibility,
};
pub use static_reflection_parser::{
    Lexer, ParseContext, ParseError, ParseErrorKind, ParseErrors, Parser, Span, Token, TokenKind,
};

/// The types most callers need.
pub mod prelude {
    pub use crate::error::{FileError, QueryError};
    pub use crate::query::{DirectoryQuery, FileFailure, FileSetQuery, QueryResult};
    pub use crate::session::{ParsedFile, Session, SessionBuilder};
    pub use static_reflection_core::{
        ClassRef, ReflectionClass, StaticClass, StaticMethod, StaticParameter, StaticProperty,
        TypeHint,
    };
}

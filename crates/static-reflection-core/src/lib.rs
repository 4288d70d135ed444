//! Static reflection core crate.
//!
//! Shared types for the static reflection engine:
//! - Source spans and the error taxonomy
//! - Modifier and class flag sets
//! - Type hints and doc comment parsing
//! - Naming resolvers for namespace-qualified names
//! - The class/method/property/parameter descriptors and their builders
//! - The class registry used for lazy parent and interface binding

pub mod docblock;
pub mod entries;
pub mod error;
pub mod modifiers;
pub mod naming;
pub mod registry;
pub mod span;
pub mod type_hint;

pub use docblock::{DocBlock, DocCommentParser, DocTag, StandardDocCommentParser};
pub use entries::{
    CONSTRUCTOR_NAME, ClassBuilder, ClassConstant, ClassRef, DESTRUCTOR_NAME, MethodBuilder,
    MethodOrigin, NullClass, ParameterBuilder, PropertyBuilder, ReflectionClass, StaticClass,
    StaticMethod, StaticParameter, StaticProperty,
};
pub use error::{InitError, LexError, ParseError, ParseErrorKind, ParseErrors};
pub use modifiers::{ClassFlags, Modifiers, Visibility};
pub use naming::{LexicalContext, NamespaceResolver, NamingResolver, NullResolver};
pub use registry::ClassRegistry;
pub use span::Span;
pub use type_hint::TypeHint;

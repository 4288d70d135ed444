//! Declared type hints of parameters, properties and return values.

use std::fmt;

/// Reserved type names, which can never be class names.
const BUILTIN_TYPES: &[&str] = &[
    "bool", "int", "float", "string", "mixed", "void", "null", "object", "iterable", "never",
    "false", "true",
];

/// Pseudo types only meaningful in doc comments. These are legal class
/// names, so an import or declared type with the same name wins.
const DOC_TYPES: &[&str] = &["boolean", "integer", "double", "resource", "scalar"];

/// A type hint as declared in source.
///
/// Class names are stored fully qualified (as produced by the naming
/// resolver); `self` and `parent` are replaced by the names they denote at
/// parse time, so consumers never see them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeHint {
    /// `array`
    Array,
    /// `callable`
    Callable,
    /// `static` (late static binding, return types only)
    Static,
    /// A built-in scalar or pseudo type such as `int` or `mixed`.
    Builtin(String),
    /// A class or interface name.
    Class(String),
    /// `?T`
    Nullable(Box<TypeHint>),
    /// `A|B|…`
    Union(Vec<TypeHint>),
    /// `A&B&…`
    Intersection(Vec<TypeHint>),
}

impl TypeHint {
    /// Classify a non-class keyword type name, case-insensitively.
    ///
    /// Returns `None` for anything that has to go through name resolution.
    pub fn keyword(name: &str) -> Option<TypeHint> {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "array" => Some(TypeHint::Array),
            "callable" => Some(TypeHint::Callable),
            "static" => Some(TypeHint::Static),
            _ if BUILTIN_TYPES.contains(&lower.as_str()) => Some(TypeHint::Builtin(lower)),
            _ => None,
        }
    }

    /// Check whether `name` is a built-in type keyword.
    pub fn is_keyword(name: &str) -> bool {
        Self::keyword(name).is_some()
    }

    /// Like [`TypeHint::keyword`], also accepting the pseudo types used in
    /// doc comments (`boolean`, `integer`, `resource`, ...).
    pub fn doc_keyword(name: &str) -> Option<TypeHint> {
        Self::keyword(name).or_else(|| {
            let lower = name.to_ascii_lowercase();
            DOC_TYPES
                .contains(&lower.as_str())
                .then_some(TypeHint::Builtin(lower))
        })
    }

    /// Whether `null` is an accepted value.
    pub fn allows_null(&self) -> bool {
        match self {
            TypeHint::Nullable(_) => true,
            TypeHint::Builtin(name) => name == "null" || name == "mixed",
            TypeHint::Union(members) => members.iter().any(TypeHint::allows_null),
            _ => false,
        }
    }

    /// Whether this hint is `array` (possibly nullable).
    pub fn is_array(&self) -> bool {
        match self {
            TypeHint::Array => true,
            TypeHint::Nullable(inner) => inner.is_array(),
            _ => false,
        }
    }

    /// Whether this hint is `callable` (possibly nullable).
    pub fn is_callable(&self) -> bool {
        match self {
            TypeHint::Callable => true,
            TypeHint::Nullable(inner) => inner.is_callable(),
            _ => false,
        }
    }

    /// The class name this hint refers to, if it is a single class type.
    pub fn class_name(&self) -> Option<&str> {
        match self {
            TypeHint::Class(name) => Some(name),
            TypeHint::Nullable(inner) => inner.class_name(),
            _ => None,
        }
    }
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeHint::Array => write!(f, "array"),
            TypeHint::Callable => write!(f, "callable"),
            TypeHint::Static => write!(f, "static"),
            TypeHint::Builtin(name) | TypeHint::Class(name) => write!(f, "{name}"),
            TypeHint::Nullable(inner) => write!(f, "?{inner}"),
            TypeHint::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    match member {
                        TypeHint::Intersection(_) => write!(f, "({member})")?,
                        _ => write!(f, "{member}")?,
                    }
                }
                Ok(())
            }
            TypeHint::Intersection(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, "&")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
        }
    }
}

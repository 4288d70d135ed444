//! Name resolution for type names referenced in source.
//!
//! The parser records every referenced class or interface name through a
//! [`NamingResolver`], passing the [`LexicalContext`] (current namespace and
//! import aliases) in effect at the reference. Two resolvers exist:
//!
//! - [`NamespaceResolver`]: applies namespace and `use` alias rules.
//! - [`NullResolver`]: returns names unchanged, for global-namespace code
//!   where namespace semantics are irrelevant.
//!
//! Resolution never fails. A name that cannot be resolved is returned as
//! best-effort text, since references are allowed to dangle.
//!
//! # Example
//!
//! ```
//! use static_reflection_core::{LexicalContext, NamespaceResolver, NamingResolver};
//!
//! let mut context = LexicalContext::new();
//! context.set_namespace("App\\Models");
//! context.add_import("Vendor\\Orm\\Entity", None);
//!
//! let resolver = NamespaceResolver;
//! assert_eq!(resolver.resolve("Entity", &context), "Vendor\\Orm\\Entity");
//! assert_eq!(resolver.resolve("User", &context), "App\\Models\\User");
//! assert_eq!(resolver.resolve("\\Exception", &context), "Exception");
//! ```

use std::fmt::Debug;

use rustc_hash::FxHashMap;

use crate::TypeHint;

/// Namespace separator used in qualified names.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Namespace and import aliases in effect at a point in a file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LexicalContext {
    /// Current namespace without leading separator; empty for global.
    namespace: String,
    /// Import aliases keyed by lowercase alias.
    imports: FxHashMap<String, String>,
}

impl LexicalContext {
    /// Create a context for the global namespace with no imports.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current namespace (empty for the global namespace).
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Enter a namespace. Imports do not carry over between namespaces.
    pub fn set_namespace(&mut self, namespace: &str) {
        self.namespace = namespace.trim_matches(NAMESPACE_SEPARATOR).to_string();
        self.imports.clear();
    }

    /// Record `use target [as alias]`.
    ///
    /// Without an explicit alias the last segment of `target` is used.
    pub fn add_import(&mut self, target: &str, alias: Option<&str>) {
        let target = target.trim_start_matches(NAMESPACE_SEPARATOR);
        let alias = alias.unwrap_or_else(|| short_name(target));
        self.imports
            .insert(alias.to_ascii_lowercase(), target.to_string());
    }

    /// Look up an import alias, case-insensitively.
    pub fn import(&self, alias: &str) -> Option<&str> {
        self.imports
            .get(&alias.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Number of imports in effect.
    pub fn import_count(&self) -> usize {
        self.imports.len()
    }

    /// Qualify a declared (not referenced) name with the current namespace.
    pub fn declare(&self, name: &str) -> String {
        join(&self.namespace, name)
    }
}

/// Maps a name as written in source to a qualified name.
pub trait NamingResolver: Send + Sync + Debug {
    /// Resolve `name` as referenced within `context`.
    fn resolve(&self, name: &str, context: &LexicalContext) -> String;
}

/// Resolver implementing namespace-relative lookup and `use` aliases.
#[derive(Debug, Clone, Copy, Default)]
pub struct NamespaceResolver;

impl NamingResolver for NamespaceResolver {
    fn resolve(&self, name: &str, context: &LexicalContext) -> String {
        if name.is_empty() {
            return String::new();
        }

        // Fully qualified
        if let Some(absolute) = name.strip_prefix(NAMESPACE_SEPARATOR) {
            return absolute.to_string();
        }

        // `namespace\Foo` is relative to the current namespace
        if let Some(prefix) = name.get(..10)
            && prefix.eq_ignore_ascii_case("namespace\\")
        {
            return join(context.namespace(), &name[10..]);
        }

        let (first, rest) = match name.split_once(NAMESPACE_SEPARATOR) {
            Some((first, rest)) => (first, Some(rest)),
            None => (name, None),
        };

        if let Some(target) = context.import(first) {
            return match rest {
                Some(rest) => join(target, rest),
                None => target.to_string(),
            };
        }

        if rest.is_none() && (TypeHint::is_keyword(name) || is_relative_class_keyword(name)) {
            return name.to_string();
        }

        join(context.namespace(), name)
    }
}

/// Resolver that performs no resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl NamingResolver for NullResolver {
    fn resolve(&self, name: &str, _context: &LexicalContext) -> String {
        name.to_string()
    }
}

/// `self`, `parent` and `static`, which name a class relative to the
/// enclosing declaration.
pub fn is_relative_class_keyword(name: &str) -> bool {
    ["self", "parent", "static"]
        .iter()
        .any(|kw| name.eq_ignore_ascii_case(kw))
}

/// The unqualified last segment of a name.
pub fn short_name(qualified: &str) -> &str {
    match qualified.rfind(NAMESPACE_SEPARATOR) {
        Some(idx) => &qualified[idx + 1..],
        None => qualified,
    }
}

/// The namespace part of a qualified name (empty for global names).
pub fn namespace_name(qualified: &str) -> &str {
    let trimmed = qualified.trim_start_matches(NAMESPACE_SEPARATOR);
    match trimmed.rfind(NAMESPACE_SEPARATOR) {
        Some(idx) => &trimmed[..idx],
        None => "",
    }
}

/// Case-insensitive lookup key for a qualified class name.
pub fn lookup_key(qualified: &str) -> String {
    qualified
        .trim_start_matches(NAMESPACE_SEPARATOR)
        .to_ascii_lowercase()
}

fn join(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}{NAMESPACE_SEPARATOR}{name}")
    }
}

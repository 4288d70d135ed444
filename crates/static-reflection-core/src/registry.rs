//! ClassRegistry - lookup table for lazy class binding.
//!
//! Every class published by a session lands here, keyed by its lowercase
//! qualified name. Classes hold a weak handle to the registry and resolve
//! parent and interface names through it on each access, so the order in
//! which files are parsed never matters.
//!
//! # Thread Safety
//!
//! The table sits behind a `parking_lot::RwLock`; lookups take a read lock
//! and publication a write lock.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::warn;

use crate::entries::{ClassRef, StaticClass};
use crate::naming::lookup_key;

/// Classes available for binding, by case-insensitive qualified name.
#[derive(Debug, Default)]
pub struct ClassRegistry {
    classes: RwLock<FxHashMap<String, Arc<StaticClass>>>,
}

impl ClassRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a class. The first class registered under a name wins;
    /// returns `false` when the name was already taken.
    pub fn register(&self, class: Arc<StaticClass>) -> bool {
        let key = lookup_key(class.name());
        let mut classes = self.classes.write();
        if let Some(existing) = classes.get(&key) {
            warn!(
                class = class.name(),
                existing = ?existing.source_file(),
                duplicate = ?class.source_file(),
                "class already registered, keeping first declaration"
            );
            return false;
        }
        classes.insert(key, class);
        true
    }

    /// Publish every class in `classes`.
    pub fn register_all<'a>(&self, classes: impl IntoIterator<Item = &'a Arc<StaticClass>>) {
        for class in classes {
            self.register(Arc::clone(class));
        }
    }

    /// Get a class by qualified name (case-insensitive, leading `\` ignored).
    pub fn get(&self, name: &str) -> Option<Arc<StaticClass>> {
        self.classes.read().get(&lookup_key(name)).cloned()
    }

    /// Get a class, or a null class standing in for `name`.
    pub fn lookup(&self, name: &str) -> ClassRef {
        match self.get(name) {
            Some(class) => ClassRef::Static(class),
            None => ClassRef::null(name.trim_start_matches(crate::naming::NAMESPACE_SEPARATOR)),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.read().contains_key(&lookup_key(name))
    }

    pub fn len(&self) -> usize {
        self.classes.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.read().is_empty()
    }

    /// Qualified names of every registered class, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self
            .classes
            .read()
            .values()
            .map(|class| class.name().to_string())
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Weak;

    use super::*;
    use crate::{ClassBuilder, ClassFlags, ReflectionClass};

    fn class(name: &str, line: u32) -> Arc<StaticClass> {
        let mut builder = ClassBuilder::new(name, ClassFlags::empty());
        builder.init_start_line(line).unwrap();
        builder.build(Weak::new())
    }

    #[test]
    fn case_insensitive_lookup() {
        let registry = ClassRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.register(class("App\\User", 1)));
        assert!(registry.contains("app\\user"));
        assert!(registry.get("\\APP\\USER").is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn first_registration_wins() {
        let registry = ClassRegistry::new();
        assert!(registry.register(class("Foo", 1)));
        assert!(!registry.register(class("foo", 9)));
        assert_eq!(registry.get("Foo").map(|c| c.start_line()), Some(1));
    }

    #[test]
    fn lookup_missing_is_null() {
        let registry = ClassRegistry::new();
        registry.register_all(&[class("B", 1), class("A", 2)]);
        let missing = registry.lookup("\\Nope");
        assert!(missing.is_null());
        assert_eq!(missing.name(), "Nope");
        assert!(!registry.lookup("a").is_null());
        assert_eq!(registry.names(), ["A", "B"]);
    }
}

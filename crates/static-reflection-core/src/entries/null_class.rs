//! Placeholder for referenced types that are not available.

use std::path::Path;
use std::sync::Arc;

use crate::ClassFlags;

use super::{ClassConstant, ClassRef, ReflectionClass, StaticMethod, StaticProperty};

/// A class that was referenced but never parsed.
///
/// Every capability query answers with the empty or false default. The name
/// is empty when standing in for an undeclared parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NullClass {
    name: String,
}

impl NullClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl ReflectionClass for NullClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn flags(&self) -> ClassFlags {
        ClassFlags::empty()
    }

    fn is_instantiable(&self) -> bool {
        false
    }

    fn doc_comment(&self) -> Option<&str> {
        None
    }

    fn file_name(&self) -> Option<&Path> {
        None
    }

    fn start_line(&self) -> Option<u32> {
        None
    }

    fn end_line(&self) -> Option<u32> {
        None
    }

    fn parent_class(&self) -> ClassRef {
        ClassRef::null("")
    }

    fn interface_names(&self) -> Vec<String> {
        Vec::new()
    }

    fn interfaces(&self) -> Vec<ClassRef> {
        Vec::new()
    }

    fn implements_interface(&self, _name: &str) -> bool {
        false
    }

    fn is_subclass_of(&self, _name: &str) -> bool {
        false
    }

    fn has_method(&self, _name: &str) -> bool {
        false
    }

    fn method(&self, _name: &str) -> Option<Arc<StaticMethod>> {
        None
    }

    fn methods(&self) -> Vec<Arc<StaticMethod>> {
        Vec::new()
    }

    fn has_property(&self, _name: &str) -> bool {
        false
    }

    fn property(&self, _name: &str) -> Option<Arc<StaticProperty>> {
        None
    }

    fn properties(&self) -> Vec<Arc<StaticProperty>> {
        Vec::new()
    }

    fn constant(&self, _name: &str) -> Option<ClassConstant> {
        None
    }

    fn constants(&self) -> Vec<ClassConstant> {
        Vec::new()
    }

    fn is_null(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_query_degrades() {
        let null = NullClass::new("Vendor\\Missing");
        assert_eq!(null.name(), "Vendor\\Missing");
        assert_eq!(null.short_name(), "Missing");
        assert_eq!(null.namespace_name(), "Vendor");
        assert!(null.is_null());
        assert!(!null.is_interface());
        assert!(!null.is_instantiable());
        assert!(!null.has_method("__construct"));
        assert!(null.methods().is_empty());
        assert!(null.properties().is_empty());
        assert!(!null.has_constant("A"));
        assert!(null.parent_class().is_null());
        assert!(null.parent_class().parent_class().is_null());
        assert_eq!(null.start_line(), None);
    }
}

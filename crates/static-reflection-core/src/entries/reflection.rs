//! The class reflection capability shared by every class variant.

use std::path::Path;
use std::sync::Arc;

use crate::naming;
use crate::ClassFlags;

use super::{ClassConstant, ClassRef, StaticMethod, StaticProperty};

/// Read-only reflection API over a class or interface.
///
/// Implemented by [`StaticClass`](super::StaticClass) for declarations found
/// in source and by [`NullClass`](super::NullClass) for referenced types
/// that are not available. [`ClassRef`] dispatches to either.
pub trait ReflectionClass {
    /// Fully qualified name.
    fn name(&self) -> &str;

    fn short_name(&self) -> &str {
        naming::short_name(self.name())
    }

    fn namespace_name(&self) -> &str {
        naming::namespace_name(self.name())
    }

    fn flags(&self) -> ClassFlags;

    fn is_interface(&self) -> bool {
        self.flags().contains(ClassFlags::INTERFACE)
    }

    fn is_abstract(&self) -> bool {
        self.flags().contains(ClassFlags::ABSTRACT)
    }

    fn is_final(&self) -> bool {
        self.flags().contains(ClassFlags::FINAL)
    }

    fn is_instantiable(&self) -> bool;

    /// Raw doc comment text.
    fn doc_comment(&self) -> Option<&str>;

    fn file_name(&self) -> Option<&Path>;

    fn start_line(&self) -> Option<u32>;

    fn end_line(&self) -> Option<u32>;

    fn parent_class(&self) -> ClassRef;

    /// Names of every implemented interface, inherited ones included.
    fn interface_names(&self) -> Vec<String>;

    fn interfaces(&self) -> Vec<ClassRef>;

    fn implements_interface(&self, name: &str) -> bool;

    fn is_subclass_of(&self, name: &str) -> bool;

    fn has_method(&self, name: &str) -> bool;

    fn method(&self, name: &str) -> Option<Arc<StaticMethod>>;

    fn methods(&self) -> Vec<Arc<StaticMethod>>;

    fn has_property(&self, name: &str) -> bool;

    fn property(&self, name: &str) -> Option<Arc<StaticProperty>>;

    fn properties(&self) -> Vec<Arc<StaticProperty>>;

    fn has_constant(&self, name: &str) -> bool {
        self.constant(name).is_some()
    }

    fn constant(&self, name: &str) -> Option<ClassConstant>;

    fn constants(&self) -> Vec<ClassConstant>;

    /// Whether this is a placeholder for an unavailable type.
    fn is_null(&self) -> bool;
}

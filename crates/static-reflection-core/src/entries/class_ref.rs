//! A reference to a class that may or may not be available.

use std::path::Path;
use std::sync::Arc;

use crate::ClassFlags;

use super::{ClassConstant, NullClass, ReflectionClass, StaticClass, StaticMethod, StaticProperty};

/// Either a parsed class or the placeholder for a missing one.
#[derive(Debug, Clone)]
pub enum ClassRef {
    /// A class declared in a parsed file.
    Static(Arc<StaticClass>),
    /// A referenced type that is not available.
    Null(NullClass),
}

impl ClassRef {
    /// A null class standing in for `name`.
    pub fn null(name: impl Into<String>) -> Self {
        ClassRef::Null(NullClass::new(name))
    }

    pub fn as_static(&self) -> Option<&Arc<StaticClass>> {
        match self {
            ClassRef::Static(class) => Some(class),
            ClassRef::Null(_) => None,
        }
    }

    pub fn into_static(self) -> Option<Arc<StaticClass>> {
        match self {
            ClassRef::Static(class) => Some(class),
            ClassRef::Null(_) => None,
        }
    }

    fn inner(&self) -> &dyn ReflectionClass {
        match self {
            ClassRef::Static(class) => &**class,
            ClassRef::Null(null) => null,
        }
    }
}

impl From<Arc<StaticClass>> for ClassRef {
    fn from(class: Arc<StaticClass>) -> Self {
        ClassRef::Static(class)
    }
}

impl From<Option<Arc<StaticClass>>> for ClassRef {
    fn from(class: Option<Arc<StaticClass>>) -> Self {
        match class {
            Some(class) => ClassRef::Static(class),
            None => ClassRef::null(""),
        }
    }
}

impl ReflectionClass for ClassRef {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn flags(&self) -> ClassFlags {
        self.inner().flags()
    }

    fn is_instantiable(&self) -> bool {
        self.inner().is_instantiable()
    }

    fn doc_comment(&self) -> Option<&str> {
        self.inner().doc_comment()
    }

    fn file_name(&self) -> Option<&Path> {
        self.inner().file_name()
    }

    fn start_line(&self) -> Option<u32> {
        self.inner().start_line()
    }

    fn end_line(&self) -> Option<u32> {
        self.inner().end_line()
    }

    fn parent_class(&self) -> ClassRef {
        self.inner().parent_class()
    }

    fn interface_names(&self) -> Vec<String> {
        self.inner().interface_names()
    }

    fn interfaces(&self) -> Vec<ClassRef> {
        self.inner().interfaces()
    }

    fn implements_interface(&self, name: &str) -> bool {
        self.inner().implements_interface(name)
    }

    fn is_subclass_of(&self, name: &str) -> bool {
        self.inner().is_subclass_of(name)
    }

    fn has_method(&self, name: &str) -> bool {
        self.inner().has_method(name)
    }

    fn method(&self, name: &str) -> Option<Arc<StaticMethod>> {
        self.inner().method(name)
    }

    fn methods(&self) -> Vec<Arc<StaticMethod>> {
        self.inner().methods()
    }

    fn has_property(&self, name: &str) -> bool {
        self.inner().has_property(name)
    }

    fn property(&self, name: &str) -> Option<Arc<StaticProperty>> {
        self.inner().property(name)
    }

    fn properties(&self) -> Vec<Arc<StaticProperty>> {
        self.inner().properties()
    }

    fn constant(&self, name: &str) -> Option<ClassConstant> {
        self.inner().constant(name)
    }

    fn constants(&self) -> Vec<ClassConstant> {
        self.inner().constants()
    }

    fn is_null(&self) -> bool {
        self.inner().is_null()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Weak;

    use super::*;
    use crate::{ClassBuilder, MethodBuilder, Modifiers};

    #[test]
    fn dispatches_to_static_class() {
        let mut builder = ClassBuilder::new("App\\Service", ClassFlags::FINAL);
        builder
            .add_method(MethodBuilder::new("handle", Modifiers::empty()))
            .unwrap();
        builder.init_start_line(4).unwrap();
        let class: ClassRef = builder.build(Weak::new()).into();

        assert!(!class.is_null());
        assert!(class.is_final());
        assert_eq!(class.short_name(), "Service");
        assert_eq!(class.namespace_name(), "App");
        assert!(class.has_method("HANDLE"));
        assert_eq!(class.start_line(), Some(4));
        assert!(class.as_static().is_some());
        assert!(class.parent_class().is_null());
    }

    #[test]
    fn dispatches_to_null_class() {
        let class = ClassRef::from(None::<Arc<StaticClass>>);
        assert!(class.is_null());
        assert_eq!(class.name(), "");
        assert!(class.methods().is_empty());
        assert!(class.into_static().is_none());
    }
}

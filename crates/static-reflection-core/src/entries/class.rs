//! Class and interface descriptor.
//!
//! A [`StaticClass`] stores its parent and interfaces by name only. They are
//! looked up in the owning [`ClassRegistry`] on every access, so a class can
//! reference types parsed later (or never) without failing.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::naming::{self, lookup_key};
use crate::registry::ClassRegistry;
use crate::{ClassFlags, DocBlock, InitError, Modifiers, TypeHint};

use super::write_once::WriteOnce;
use super::{
    ClassRef, MethodBuilder, MethodOrigin, PropertyBuilder, ReflectionClass, StaticMethod,
    StaticProperty,
};

/// A class constant (`const NAME = value;`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassConstant {
    /// Constant name, case-sensitive.
    pub name: String,
    /// Value expression exactly as written in source.
    pub value: String,
    /// Visibility (public unless declared otherwise) and `final`.
    pub modifiers: Modifiers,
    /// Declared type, if any.
    pub type_hint: Option<TypeHint>,
    /// Line of the declarator.
    pub line: u32,
}

impl ClassConstant {
    pub fn new(name: impl Into<String>, value: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            modifiers: Modifiers::PUBLIC,
            type_hint: None,
            line,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers.with_default_visibility();
        self
    }

    pub fn with_type_hint(mut self, type_hint: Option<TypeHint>) -> Self {
        self.type_hint = type_hint;
        self
    }
}

/// A class or interface declared in a source file.
#[derive(Debug)]
pub struct StaticClass {
    name: String,
    flags: ClassFlags,
    doc_comment: Option<String>,
    doc_block: Option<DocBlock>,
    parent_name: Option<String>,
    interface_names: Vec<String>,
    constants: Vec<ClassConstant>,
    methods: Vec<Arc<StaticMethod>>,
    method_index: FxHashMap<String, usize>,
    properties: Vec<Arc<StaticProperty>>,
    property_index: FxHashMap<String, usize>,
    source_file: Option<PathBuf>,
    start_line: u32,
    end_line: u32,
    registry: Weak<ClassRegistry>,
}

impl StaticClass {
    /// Fully qualified name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> ClassFlags {
        self.flags
    }

    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
    }

    pub fn doc_block(&self) -> Option<&DocBlock> {
        self.doc_block.as_ref()
    }

    /// The parent name as declared (resolved, not bound).
    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.as_deref()
    }

    /// Declared interface names, in declaration order.
    ///
    /// For an interface these are the interfaces it extends.
    pub fn declared_interface_names(&self) -> &[String] {
        &self.interface_names
    }

    pub fn source_file(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }

    pub fn start_line(&self) -> u32 {
        self.start_line
    }

    pub fn end_line(&self) -> u32 {
        self.end_line
    }

    /// Methods declared by this class itself, in declaration order.
    pub fn own_methods(&self) -> &[Arc<StaticMethod>] {
        &self.methods
    }

    /// Properties declared by this class itself, in declaration order.
    pub fn own_properties(&self) -> &[Arc<StaticProperty>] {
        &self.properties
    }

    /// Constants declared by this class itself, in declaration order.
    pub fn own_constants(&self) -> &[ClassConstant] {
        &self.constants
    }

    /// Whether this class itself declares `name` (case-insensitive).
    pub fn declares_method(&self, name: &str) -> bool {
        self.method_index.contains_key(&name.to_ascii_lowercase())
    }

    /// A method declared by this class itself.
    pub fn own_method(&self, name: &str) -> Option<&Arc<StaticMethod>> {
        self.method_index
            .get(&name.to_ascii_lowercase())
            .map(|&idx| &self.methods[idx])
    }

    /// A property declared by this class itself (case-sensitive).
    pub fn own_property(&self, name: &str) -> Option<&Arc<StaticProperty>> {
        let name = name.trim_start_matches('$');
        self.property_index.get(name).map(|&idx| &self.properties[idx])
    }

    // ==========================================================================
    // Binding
    // ==========================================================================

    /// Look up another class in the registry this class was published to.
    pub fn resolve(&self, name: &str) -> Option<Arc<StaticClass>> {
        self.registry.upgrade()?.get(name)
    }

    /// The bound parent class, if it is declared and available.
    pub fn parent(&self) -> Option<Arc<StaticClass>> {
        self.resolve(self.parent_name.as_deref()?)
    }

    /// The parent as a [`ClassRef`]; a null class when undeclared or
    /// unavailable.
    pub fn parent_class(&self) -> ClassRef {
        match &self.parent_name {
            None => ClassRef::null(""),
            Some(name) => match self.resolve(name) {
                Some(class) => ClassRef::Static(class),
                None => ClassRef::null(name),
            },
        }
    }

    /// Available ancestors, nearest first. Stops at the first missing
    /// parent or at a hierarchy cycle.
    pub fn ancestors(&self) -> Vec<Arc<StaticClass>> {
        let mut visited = FxHashSet::default();
        visited.insert(lookup_key(&self.name));
        let mut ancestors = Vec::new();
        let mut next = self.parent();
        while let Some(class) = next {
            if !visited.insert(lookup_key(&class.name)) {
                break;
            }
            next = class.parent();
            ancestors.push(class);
        }
        ancestors
    }

    /// Every interface name implemented directly or through ancestors and
    /// interface inheritance, in discovery order.
    pub fn all_interface_names(&self) -> Vec<String> {
        fn queue_declared(class: &StaticClass, pending: &mut Vec<String>) {
            pending.extend(class.interface_names.iter().rev().cloned());
        }

        let mut seen = FxHashSet::default();
        let mut names = Vec::new();
        let mut pending = Vec::new();

        // Nearest class ends up on top of the stack.
        for ancestor in self.ancestors().iter().rev() {
            queue_declared(ancestor, &mut pending);
        }
        queue_declared(self, &mut pending);

        while let Some(name) = pending.pop() {
            if !seen.insert(lookup_key(&name)) {
                continue;
            }
            if let Some(interface) = self.resolve(&name) {
                queue_declared(&interface, &mut pending);
            }
            names.push(name);
        }
        names
    }

    /// Bound interfaces, including inherited ones; dangling names become
    /// null classes.
    pub fn interfaces(&self) -> Vec<ClassRef> {
        self.all_interface_names()
            .into_iter()
            .map(|name| match self.resolve(&name) {
                Some(class) => ClassRef::Static(class),
                None => ClassRef::null(&name),
            })
            .collect()
    }

    pub fn implements_interface(&self, name: &str) -> bool {
        let wanted = lookup_key(name);
        self.all_interface_names()
            .iter()
            .any(|candidate| lookup_key(candidate) == wanted)
    }

    /// Whether this class extends or implements `name`, directly or not.
    pub fn is_subclass_of(&self, name: &str) -> bool {
        let wanted = lookup_key(name);
        if wanted == lookup_key(&self.name) {
            return false;
        }
        let mut visited = FxHashSet::default();
        visited.insert(lookup_key(&self.name));
        let mut next = self.parent_name.clone();
        while let Some(parent_name) = next {
            let key = lookup_key(&parent_name);
            if key == wanted {
                return true;
            }
            if !visited.insert(key) {
                break;
            }
            next = self.resolve(&parent_name).and_then(|p| p.parent_name.clone());
        }
        self.implements_interface(name)
    }

    // ==========================================================================
    // Member lookup through the hierarchy
    // ==========================================================================

    /// Classes searched for inherited members: ancestors, then interfaces.
    fn inherited_sources(&self) -> Vec<Arc<StaticClass>> {
        let mut sources = self.ancestors();
        sources.extend(
            self.all_interface_names()
                .iter()
                .filter_map(|name| self.resolve(name)),
        );
        sources
    }

    /// Find a method declared here or inherited (case-insensitive).
    pub fn method(&self, name: &str) -> Option<Arc<StaticMethod>> {
        if let Some(method) = self.own_method(name) {
            return Some(Arc::clone(method));
        }
        self.inherited_sources()
            .iter()
            .find_map(|class| class.own_method(name).cloned())
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }

    /// Own methods, then the parent chain, then interfaces. A name seen
    /// earlier hides later declarations.
    pub fn methods(&self) -> Vec<Arc<StaticMethod>> {
        let inherited = self.inherited_sources();
        let mut seen = FxHashSet::default();
        let mut methods = Vec::new();
        for class in std::iter::once(self).chain(inherited.iter().map(Arc::as_ref)) {
            for method in &class.methods {
                if seen.insert(method.name().to_ascii_lowercase()) {
                    methods.push(Arc::clone(method));
                }
            }
        }
        methods
    }

    /// Origin of the method `name` as seen through this class.
    pub fn method_origin(&self, name: &str) -> Option<MethodOrigin> {
        self.method(name).map(|method| method.origin_in(self))
    }

    /// Find a property declared here or a non-private inherited one.
    pub fn property(&self, name: &str) -> Option<Arc<StaticProperty>> {
        if let Some(property) = self.own_property(name) {
            return Some(Arc::clone(property));
        }
        self.ancestors().iter().find_map(|class| {
            class
                .own_property(name)
                .filter(|property| !property.is_private())
                .cloned()
        })
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    /// Own properties followed by non-private inherited ones.
    pub fn properties(&self) -> Vec<Arc<StaticProperty>> {
        let mut seen: FxHashSet<String> = self.property_index.keys().cloned().collect();
        let mut properties = self.properties.clone();
        for class in self.ancestors() {
            for property in &class.properties {
                if !property.is_private() && seen.insert(property.name().to_string()) {
                    properties.push(Arc::clone(property));
                }
            }
        }
        properties
    }

    /// Find a constant declared here, on an ancestor or on an interface.
    pub fn constant(&self, name: &str) -> Option<ClassConstant> {
        if let Some(constant) = self.constants.iter().find(|c| c.name == name) {
            return Some(constant.clone());
        }
        self.inherited_sources()
            .iter()
            .find_map(|class| class.constants.iter().find(|c| c.name == name).cloned())
    }

    /// All visible constants, nearest declaration first.
    pub fn constants(&self) -> Vec<ClassConstant> {
        let inherited = self.inherited_sources();
        let mut seen = FxHashSet::default();
        let mut constants = Vec::new();
        for class in std::iter::once(self).chain(inherited.iter().map(Arc::as_ref)) {
            for constant in &class.constants {
                if seen.insert(constant.name.as_str()) {
                    constants.push(constant.clone());
                }
            }
        }
        constants
    }

    /// Concrete class whose constructor (if any) is public.
    pub fn is_instantiable(&self) -> bool {
        if self
            .flags
            .intersects(ClassFlags::INTERFACE | ClassFlags::ABSTRACT)
        {
            return false;
        }
        self.methods()
            .iter()
            .find(|method| method.is_constructor())
            .is_none_or(|ctor| ctor.is_public())
    }
}

impl ReflectionClass for StaticClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn flags(&self) -> ClassFlags {
        self.flags
    }

    fn is_instantiable(&self) -> bool {
        StaticClass::is_instantiable(self)
    }

    fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
    }

    fn file_name(&self) -> Option<&Path> {
        self.source_file.as_deref()
    }

    fn start_line(&self) -> Option<u32> {
        Some(self.start_line)
    }

    fn end_line(&self) -> Option<u32> {
        Some(self.end_line)
    }

    fn parent_class(&self) -> ClassRef {
        StaticClass::parent_class(self)
    }

    fn interface_names(&self) -> Vec<String> {
        self.all_interface_names()
    }

    fn interfaces(&self) -> Vec<ClassRef> {
        StaticClass::interfaces(self)
    }

    fn implements_interface(&self, name: &str) -> bool {
        StaticClass::implements_interface(self, name)
    }

    fn is_subclass_of(&self, name: &str) -> bool {
        StaticClass::is_subclass_of(self, name)
    }

    fn has_method(&self, name: &str) -> bool {
        StaticClass::has_method(self, name)
    }

    fn method(&self, name: &str) -> Option<Arc<StaticMethod>> {
        StaticClass::method(self, name)
    }

    fn methods(&self) -> Vec<Arc<StaticMethod>> {
        StaticClass::methods(self)
    }

    fn has_property(&self, name: &str) -> bool {
        StaticClass::has_property(self, name)
    }

    fn property(&self, name: &str) -> Option<Arc<StaticProperty>> {
        StaticClass::property(self, name)
    }

    fn properties(&self) -> Vec<Arc<StaticProperty>> {
        StaticClass::properties(self)
    }

    fn constant(&self, name: &str) -> Option<ClassConstant> {
        StaticClass::constant(self, name)
    }

    fn constants(&self) -> Vec<ClassConstant> {
        StaticClass::constants(self)
    }

    fn is_null(&self) -> bool {
        false
    }
}

/// Staging type for a [`StaticClass`].
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    name: String,
    flags: ClassFlags,
    doc: WriteOnce<(String, DocBlock)>,
    parent_name: WriteOnce<String>,
    interface_names: Vec<String>,
    constants: Vec<ClassConstant>,
    methods: Vec<MethodBuilder>,
    properties: Vec<PropertyBuilder>,
    source_file: WriteOnce<PathBuf>,
    start_line: WriteOnce<u32>,
    end_line: WriteOnce<u32>,
}

impl ClassBuilder {
    /// Start a class with its fully qualified name.
    pub fn new(name: impl Into<String>, flags: ClassFlags) -> Self {
        let name = name.into();
        Self {
            name: name.trim_start_matches(naming::NAMESPACE_SEPARATOR).to_string(),
            flags,
            doc: WriteOnce::new("doc comment"),
            parent_name: WriteOnce::new("parent"),
            interface_names: Vec::new(),
            constants: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            source_file: WriteOnce::new("source file"),
            start_line: WriteOnce::new("start line"),
            end_line: WriteOnce::new("end line"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> ClassFlags {
        self.flags
    }

    pub fn is_interface(&self) -> bool {
        self.flags.contains(ClassFlags::INTERFACE)
    }

    pub fn parent_name(&self) -> Option<&str> {
        self.parent_name.get().map(String::as_str)
    }

    pub fn init_doc_comment(&mut self, raw: impl Into<String>, block: DocBlock) -> Result<(), InitError> {
        self.doc.set((raw.into(), block), &self.name)
    }

    pub fn init_parent(&mut self, name: impl Into<String>) -> Result<(), InitError> {
        self.parent_name.set(name.into(), &self.name)
    }

    /// Add an implemented (or, for interfaces, extended) interface name.
    /// Repeated names are ignored.
    pub fn add_interface(&mut self, name: impl Into<String>) {
        let name = name.into();
        let key = lookup_key(&name);
        if !self.interface_names.iter().any(|n| lookup_key(n) == key) {
            self.interface_names.push(name);
        }
    }

    pub fn add_constant(&mut self, constant: ClassConstant) -> Result<(), InitError> {
        if self.constants.iter().any(|c| c.name == constant.name) {
            return Err(InitError::duplicate_member("constant", constant.name, &self.name));
        }
        self.constants.push(constant);
        Ok(())
    }

    /// Whether a method named `name` was already added (case-insensitive).
    pub fn has_method(&self, name: &str) -> bool {
        self.methods.iter().any(|m| m.name().eq_ignore_ascii_case(name))
    }

    /// Add a method, recording this class as its declaring class.
    pub fn add_method(&mut self, mut method: MethodBuilder) -> Result<(), InitError> {
        if self.has_method(method.name()) {
            return Err(InitError::duplicate_member("method", method.name(), &self.name));
        }
        method.init_declaring_class(self.name.clone())?;
        self.methods.push(method);
        Ok(())
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.properties.iter().any(|p| p.name() == name)
    }

    pub fn add_property(&mut self, mut property: PropertyBuilder) -> Result<(), InitError> {
        if self.has_property(property.name()) {
            return Err(InitError::duplicate_member("property", property.name(), &self.name));
        }
        property.init_declaring_class(self.name.clone())?;
        self.properties.push(property);
        Ok(())
    }

    pub fn init_source_file(&mut self, path: impl Into<PathBuf>) -> Result<(), InitError> {
        self.source_file.set(path.into(), &self.name)
    }

    pub fn init_start_line(&mut self, line: u32) -> Result<(), InitError> {
        self.start_line.set(line, &self.name)
    }

    pub fn init_end_line(&mut self, line: u32) -> Result<(), InitError> {
        self.end_line.set(line, &self.name)
    }

    /// Freeze the class. Members get their back references wired here.
    pub fn build(self, registry: Weak<ClassRegistry>) -> Arc<StaticClass> {
        let start_line = self.start_line.into_inner().unwrap_or(0);
        let (doc_comment, doc_block) = match self.doc.into_inner() {
            Some((raw, block)) => (Some(raw), Some(block)),
            None => (None, None),
        };

        Arc::new_cyclic(|class: &Weak<StaticClass>| {
            let methods: Vec<_> = self
                .methods
                .into_iter()
                .map(|method| method.build(class.clone()))
                .collect();
            let method_index = methods
                .iter()
                .enumerate()
                .map(|(idx, method)| (method.name().to_ascii_lowercase(), idx))
                .collect();
            let properties: Vec<_> = self
                .properties
                .into_iter()
                .map(|property| property.build(class.clone()))
                .collect();
            let property_index = properties
                .iter()
                .enumerate()
                .map(|(idx, property)| (property.name().to_string(), idx))
                .collect();

            StaticClass {
                name: self.name,
                flags: self.flags,
                doc_comment,
                doc_block,
                parent_name: self.parent_name.into_inner(),
                interface_names: self.interface_names,
                constants: self.constants,
                methods,
                method_index,
                properties,
                property_index,
                source_file: self.source_file.into_inner(),
                start_line,
                end_line: self.end_line.into_inner().unwrap_or(start_line),
                registry,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, parent: Option<&str>, methods: &[&str]) -> ClassBuilder {
        let mut builder = ClassBuilder::new(name, ClassFlags::empty());
        if let Some(parent) = parent {
            builder.init_parent(parent).unwrap();
        }
        for method in methods {
            builder
                .add_method(MethodBuilder::new(*method, Modifiers::empty()))
                .unwrap();
        }
        builder
    }

    fn interface(name: &str, extends: &[&str], methods: &[&str]) -> ClassBuilder {
        let mut builder = class(name, None, methods);
        builder.flags = ClassFlags::INTERFACE;
        for parent in extends {
            builder.add_interface(*parent);
        }
        builder
    }

    fn publish(registry: &Arc<ClassRegistry>, builder: ClassBuilder) -> Arc<StaticClass> {
        let class = builder.build(Arc::downgrade(registry));
        registry.register(Arc::clone(&class));
        class
    }

    #[test]
    fn duplicate_members_are_rejected() {
        let mut builder = class("Foo", None, &["run"]);
        let err = builder
            .add_method(MethodBuilder::new("RUN", Modifiers::empty()))
            .unwrap_err();
        assert_eq!(err, InitError::duplicate_member("method", "RUN", "Foo"));

        builder
            .add_property(PropertyBuilder::new("x", Modifiers::empty()))
            .unwrap();
        assert!(builder
            .add_property(PropertyBuilder::new("$x", Modifiers::empty()))
            .is_err());

        builder.add_constant(ClassConstant::new("A", "1", 1)).unwrap();
        assert!(builder.add_constant(ClassConstant::new("A", "2", 2)).is_err());
        assert!(builder.add_constant(ClassConstant::new("a", "2", 2)).is_ok());
    }

    #[test]
    fn back_references_point_at_class() {
        let class = class("App\\Foo", None, &["run"]).build(Weak::new());
        let method = class.own_method("RUN").unwrap();
        match method.declaring_class() {
            ClassRef::Static(owner) => assert!(Arc::ptr_eq(&owner, &class)),
            ClassRef::Null(_) => panic!("declaring class should be bound"),
        }
    }

    #[test]
    fn unavailable_parent_is_null() {
        let orphan = class("Foo", Some("Missing"), &[]).build(Weak::new());
        let parent = orphan.parent_class();
        assert!(parent.is_null());
        assert_eq!(parent.name(), "Missing");
        assert!(!parent.has_method("anything"));

        let root = class("Root", None, &[]).build(Weak::new());
        assert!(root.parent_class().is_null());
        assert_eq!(root.parent_class().name(), "");
    }

    #[test]
    fn parent_binds_lazily() {
        let registry = Arc::new(ClassRegistry::new());
        let child = publish(&registry, class("Child", Some("Base"), &["run"]));
        assert!(child.parent().is_none());

        publish(&registry, class("Base", None, &["run", "stop"]));
        assert_eq!(child.parent().map(|p| p.name().to_string()), Some("Base".into()));
        assert_eq!(child.method_origin("run"), Some(MethodOrigin::Overridden));
        assert_eq!(child.method_origin("stop"), Some(MethodOrigin::Inherited));
        assert_eq!(child.method_origin("nope"), None);
        assert!(child.is_subclass_of("base"));
        assert!(!child.is_subclass_of("Child"));
    }

    #[test]
    fn method_listing_order_and_dedup() {
        let registry = Arc::new(ClassRegistry::new());
        publish(&registry, interface("Runnable", &[], &["run", "status"]));
        publish(&registry, class("Base", None, &["stop", "Run"]));
        let mut child = class("Child", Some("Base"), &["run", "extra"]);
        child.add_interface("Runnable");
        let child = publish(&registry, child);

        let names: Vec<_> = child.methods().iter().map(|m| m.name().to_string()).collect();
        assert_eq!(names, ["run", "extra", "stop", "status"]);
        assert_eq!(child.method_origin("extra"), Some(MethodOrigin::Introduced));
        assert!(child.implements_interface("runnable"));
        assert!(child.is_subclass_of("Runnable"));
    }

    #[test]
    fn hierarchy_cycle_terminates() {
        let registry = Arc::new(ClassRegistry::new());
        let a = publish(&registry, class("A", Some("B"), &["a"]));
        publish(&registry, class("B", Some("A"), &["b"]));
        assert_eq!(a.ancestors().len(), 1);
        assert_eq!(a.methods().len(), 2);
        assert!(a.is_subclass_of("B"));
        assert!(!a.is_subclass_of("C"));

        let i = publish(&registry, interface("I", &["J"], &[]));
        publish(&registry, interface("J", &["I"], &[]));
        assert_eq!(i.all_interface_names(), ["J", "I"]);
    }

    #[test]
    fn interface_inheritance() {
        let registry = Arc::new(ClassRegistry::new());
        publish(&registry, interface("Countable", &[], &["count"]));
        publish(&registry, interface("Collection", &["Countable", "Missing"], &[]));
        let mut list = class("ListImpl", None, &[]);
        list.add_interface("Collection");
        let list = publish(&registry, list);

        assert_eq!(list.all_interface_names(), ["Collection", "Countable", "Missing"]);
        let interfaces = list.interfaces();
        assert_eq!(interfaces.len(), 3);
        assert!(interfaces[2].is_null());
        assert!(list.has_method("count"));
    }

    #[test]
    fn legacy_constructor_fallback() {
        let registry = Arc::new(ClassRegistry::new());
        let legacy = publish(&registry, class("Legacy", None, &["legacy"]));
        assert!(legacy.own_method("legacy").unwrap().is_constructor());

        let modern = publish(&registry, class("Modern", None, &["modern", "__construct"]));
        assert!(!modern.own_method("modern").unwrap().is_constructor());
        assert!(modern.own_method("__construct").unwrap().is_constructor());
    }

    #[test]
    fn inherited_properties_and_constants() {
        let registry = Arc::new(ClassRegistry::new());
        let mut base = class("Base", None, &[]);
        base.add_property(PropertyBuilder::new("shared", Modifiers::PROTECTED))
            .unwrap();
        base.add_property(PropertyBuilder::new("secret", Modifiers::PRIVATE))
            .unwrap();
        base.add_constant(ClassConstant::new("LIMIT", "10", 2)).unwrap();
        publish(&registry, base);

        let mut child = class("Child", Some("Base"), &[]);
        child
            .add_property(PropertyBuilder::new("own", Modifiers::empty()))
            .unwrap();
        let child = publish(&registry, child);

        let names: Vec<_> = child.properties().iter().map(|p| p.name().to_string()).collect();
        assert_eq!(names, ["own", "shared"]);
        assert!(!child.has_property("secret"));
        assert_eq!(child.constant("LIMIT").map(|c| c.value), Some("10".into()));
        assert_eq!(child.constants().len(), 1);
    }

    #[test]
    fn instantiable() {
        let registry = Arc::new(ClassRegistry::new());
        let mut hidden = ClassBuilder::new("Hidden", ClassFlags::empty());
        hidden
            .add_method(MethodBuilder::new("__construct", Modifiers::PRIVATE))
            .unwrap();
        let hidden = publish(&registry, hidden);
        assert!(!hidden.is_instantiable());

        let abstract_class = publish(&registry, ClassBuilder::new("Shape", ClassFlags::ABSTRACT));
        assert!(!abstract_class.is_instantiable());
        assert!(publish(&registry, class("Plain", None, &[])).is_instantiable());
    }
}

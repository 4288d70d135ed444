//! Method descriptor and its builder.

use std::sync::{Arc, Weak};

use crate::naming;
use crate::{DocBlock, InitError, Modifiers, TypeHint, Visibility};

use super::write_once::WriteOnce;
use super::{ClassRef, ParameterBuilder, StaticClass, StaticParameter};

/// Canonical constructor name.
pub const CONSTRUCTOR_NAME: &str = "__construct";
/// Canonical destructor name.
pub const DESTRUCTOR_NAME: &str = "__destruct";

/// How a method reached through a class relates to that class.
///
/// Exactly one applies to any method obtained through a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodOrigin {
    /// Declared by the class and not present on its parent.
    Introduced,
    /// Declared by the class, replacing a parent method of the same name.
    Overridden,
    /// Declared by an ancestor or interface, not by the class itself.
    Inherited,
}

/// A method declared in a class or interface.
#[derive(Debug)]
pub struct StaticMethod {
    name: String,
    modifiers: Modifiers,
    doc_comment: Option<String>,
    doc_block: Option<DocBlock>,
    returns_reference: bool,
    return_type: Option<TypeHint>,
    parameters: Vec<StaticParameter>,
    start_line: u32,
    end_line: u32,
    declaring_class_name: String,
    declaring_class: Weak<StaticClass>,
}

impl StaticMethod {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn visibility(&self) -> Visibility {
        self.modifiers.visibility()
    }

    pub fn is_public(&self) -> bool {
        self.visibility() == Visibility::Public
    }

    pub fn is_protected(&self) -> bool {
        self.visibility() == Visibility::Protected
    }

    pub fn is_private(&self) -> bool {
        self.visibility() == Visibility::Private
    }

    pub fn is_static(&self) -> bool {
        self.modifiers.contains(Modifiers::STATIC)
    }

    pub fn is_abstract(&self) -> bool {
        self.modifiers.contains(Modifiers::ABSTRACT)
    }

    pub fn is_final(&self) -> bool {
        self.modifiers.contains(Modifiers::FINAL)
    }

    /// Raw doc comment text, including delimiters.
    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
    }

    /// The parsed doc comment.
    pub fn doc_block(&self) -> Option<&DocBlock> {
        self.doc_block.as_ref()
    }

    /// `function &name()`
    pub fn returns_reference(&self) -> bool {
        self.returns_reference
    }

    /// Declared return type, or the `@return` doc type when none is declared.
    pub fn return_type(&self) -> Option<&TypeHint> {
        self.return_type.as_ref()
    }

    pub fn parameters(&self) -> &[StaticParameter] {
        &self.parameters
    }

    /// Look up a parameter by name (with or without `$`).
    pub fn parameter(&self, name: &str) -> Option<&StaticParameter> {
        let name = name.trim_start_matches('$');
        self.parameters.iter().find(|p| p.name() == name)
    }

    pub fn number_of_parameters(&self) -> usize {
        self.parameters.len()
    }

    pub fn number_of_required_parameters(&self) -> usize {
        self.parameters.iter().filter(|p| !p.is_optional()).count()
    }

    pub fn start_line(&self) -> u32 {
        self.start_line
    }

    pub fn end_line(&self) -> u32 {
        self.end_line
    }

    /// Qualified name of the declaring class.
    pub fn declaring_class_name(&self) -> &str {
        &self.declaring_class_name
    }

    /// The declaring class.
    pub fn declaring_class(&self) -> ClassRef {
        match self.declaring_class.upgrade() {
            Some(class) => ClassRef::Static(class),
            None => ClassRef::null(&self.declaring_class_name),
        }
    }

    /// Whether this method constructs instances of its declaring class.
    ///
    /// `__construct` always counts. A method named after the class counts
    /// only while the class declares no `__construct` of its own. Abstract
    /// methods never count.
    pub fn is_constructor(&self) -> bool {
        if self.is_abstract() {
            return false;
        }
        if self.name.eq_ignore_ascii_case(CONSTRUCTOR_NAME) {
            return true;
        }
        let class_name = naming::short_name(&self.declaring_class_name);
        if !self.name.eq_ignore_ascii_case(class_name) {
            return false;
        }
        match self.declaring_class.upgrade() {
            Some(class) => !class.declares_method(CONSTRUCTOR_NAME),
            None => true,
        }
    }

    pub fn is_destructor(&self) -> bool {
        self.name.eq_ignore_ascii_case(DESTRUCTOR_NAME)
    }

    /// Relation of this method to `reflected`, the class it was reached
    /// through.
    pub fn origin_in(&self, reflected: &StaticClass) -> MethodOrigin {
        if naming::lookup_key(&self.declaring_class_name) != naming::lookup_key(reflected.name()) {
            return MethodOrigin::Inherited;
        }
        match reflected.parent() {
            Some(parent) if parent.method(&self.name).is_some() => MethodOrigin::Overridden,
            _ => MethodOrigin::Introduced,
        }
    }

    pub fn is_inherited(&self, reflected: &StaticClass) -> bool {
        self.origin_in(reflected) == MethodOrigin::Inherited
    }

    pub fn is_overridden(&self, reflected: &StaticClass) -> bool {
        self.origin_in(reflected) == MethodOrigin::Overridden
    }

    pub fn is_introduced(&self, reflected: &StaticClass) -> bool {
        self.origin_in(reflected) == MethodOrigin::Introduced
    }
}

/// Staging type for a [`StaticMethod`].
///
/// Every optional field goes through an `init_*` call that accepts exactly
/// one write.
#[derive(Debug, Clone)]
pub struct MethodBuilder {
    name: String,
    modifiers: Modifiers,
    returns_reference: bool,
    doc: WriteOnce<(String, DocBlock)>,
    return_type: WriteOnce<TypeHint>,
    parameters: WriteOnce<Vec<ParameterBuilder>>,
    start_line: WriteOnce<u32>,
    end_line: WriteOnce<u32>,
    declaring_class: WriteOnce<String>,
}

impl MethodBuilder {
    pub fn new(name: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            name: name.into(),
            modifiers: modifiers.with_default_visibility(),
            returns_reference: false,
            doc: WriteOnce::new("doc comment"),
            return_type: WriteOnce::new("return type"),
            parameters: WriteOnce::new("parameters"),
            start_line: WriteOnce::new("start line"),
            end_line: WriteOnce::new("end line"),
            declaring_class: WriteOnce::new("declaring class"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub fn with_returns_reference(mut self, returns_reference: bool) -> Self {
        self.returns_reference = returns_reference;
        self
    }

    pub fn init_doc_comment(&mut self, raw: impl Into<String>, block: DocBlock) -> Result<(), InitError> {
        self.doc.set((raw.into(), block), &self.name)
    }

    pub fn doc_block(&self) -> Option<&DocBlock> {
        self.doc.get().map(|(_, block)| block)
    }

    pub fn init_return_type(&mut self, hint: TypeHint) -> Result<(), InitError> {
        self.return_type.set(hint, &self.name)
    }

    pub fn init_parameters(&mut self, parameters: Vec<ParameterBuilder>) -> Result<(), InitError> {
        self.parameters.set(parameters, &self.name)
    }

    pub fn init_start_line(&mut self, line: u32) -> Result<(), InitError> {
        self.start_line.set(line, &self.name)
    }

    pub fn init_end_line(&mut self, line: u32) -> Result<(), InitError> {
        self.end_line.set(line, &self.name)
    }

    /// Record the qualified name of the declaring class.
    ///
    /// Called by [`ClassBuilder::add_method`](super::ClassBuilder::add_method).
    pub fn init_declaring_class(&mut self, class_name: impl Into<String>) -> Result<(), InitError> {
        self.declaring_class.set(class_name.into(), &self.name)
    }

    pub(crate) fn build(self, declaring_class: Weak<StaticClass>) -> Arc<StaticMethod> {
        let parameters = self.parameters.into_inner().unwrap_or_default();
        let start_line = self.start_line.into_inner().unwrap_or(0);
        let end_line = self.end_line.into_inner().unwrap_or(start_line);
        let (doc_comment, doc_block) = match self.doc.into_inner() {
            Some((raw, block)) => (Some(raw), Some(block)),
            None => (None, None),
        };

        // Everything after the last parameter that cannot be omitted is optional.
        let required_until = parameters
            .iter()
            .rposition(|p| !p.may_be_omitted())
            .map_or(0, |idx| idx + 1);

        Arc::new_cyclic(|method| StaticMethod {
            name: self.name,
            modifiers: self.modifiers,
            doc_comment,
            doc_block,
            returns_reference: self.returns_reference,
            return_type: self.return_type.into_inner(),
            parameters: parameters
                .into_iter()
                .enumerate()
                .map(|(position, param)| param.build(position, position >= required_until, method.clone()))
                .collect(),
            start_line,
            end_line,
            declaring_class_name: self.declaring_class.into_inner().unwrap_or_default(),
            declaring_class,
        })
    }
}

//! Property descriptor and its builder.

use std::sync::{Arc, Weak};

use crate::{DocBlock, InitError, Modifiers, TypeHint, Visibility};

use super::write_once::WriteOnce;
use super::{ClassRef, StaticClass};

/// A property declared in a class body.
#[derive(Debug)]
pub struct StaticProperty {
    name: String,
    modifiers: Modifiers,
    doc_comment: Option<String>,
    doc_block: Option<DocBlock>,
    type_hint: Option<TypeHint>,
    default_value: Option<String>,
    start_line: u32,
    end_line: u32,
    declaring_class_name: String,
    declaring_class: Weak<StaticClass>,
}

impl StaticProperty {
    /// Property name without the leading `$`.
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

    pub fn is_readonly(&self) -> bool {
        self.modifiers.contains(Modifiers::READONLY)
    }

    /// Declared in the class body rather than created dynamically.
    ///
    /// Static reflection only ever sees declared properties.
    pub fn is_default(&self) -> bool {
        true
    }

    pub fn doc_comment(&self) -> Option<&str> {
        self.doc_comment.as_deref()
    }

    pub fn doc_block(&self) -> Option<&DocBlock> {
        self.doc_block.as_ref()
    }

    /// Declared type, or the `@var` doc type when none is declared.
    pub fn type_hint(&self) -> Option<&TypeHint> {
        self.type_hint.as_ref()
    }

    /// Default value exactly as written in source.
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn has_default_value(&self) -> bool {
        self.default_value.is_some()
    }

    pub fn start_line(&self) -> u32 {
        self.start_line
    }

    pub fn end_line(&self) -> u32 {
        self.end_line
    }

    pub fn declaring_class_name(&self) -> &str {
        &self.declaring_class_name
    }

    pub fn declaring_class(&self) -> ClassRef {
        match self.declaring_class.upgrade() {
            Some(class) => ClassRef::Static(class),
            None => ClassRef::null(&self.declaring_class_name),
        }
    }
}

/// Staging type for a [`StaticProperty`].
#[derive(Debug, Clone)]
pub struct PropertyBuilder {
    name: String,
    modifiers: Modifiers,
    doc: WriteOnce<(String, DocBlock)>,
    type_hint: WriteOnce<TypeHint>,
    default_value: WriteOnce<String>,
    start_line: WriteOnce<u32>,
    end_line: WriteOnce<u32>,
    declaring_class: WriteOnce<String>,
}

impl PropertyBuilder {
    /// Start a property named `name` (a leading `$` is stripped).
    pub fn new(name: impl Into<String>, modifiers: Modifiers) -> Self {
        let name = name.into();
        let name = match name.strip_prefix('$') {
            Some(stripped) => stripped.to_string(),
            None => name,
        };
        Self {
            name,
            modifiers: modifiers.with_default_visibility(),
            doc: WriteOnce::new("doc comment"),
            type_hint: WriteOnce::new("type hint"),
            default_value: WriteOnce::new("default value"),
            start_line: WriteOnce::new("start line"),
            end_line: WriteOnce::new("end line"),
            declaring_class: WriteOnce::new("declaring class"),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn init_doc_comment(&mut self, raw: impl Into<String>, block: DocBlock) -> Result<(), InitError> {
        self.doc.set((raw.into(), block), &self.name)
    }

    pub fn init_type_hint(&mut self, hint: TypeHint) -> Result<(), InitError> {
        self.type_hint.set(hint, &self.name)
    }

    pub fn init_default_value(&mut self, literal: impl Into<String>) -> Result<(), InitError> {
        self.default_value.set(literal.into(), &self.name)
    }

    pub fn init_start_line(&mut self, line: u32) -> Result<(), InitError> {
        self.start_line.set(line, &self.name)
    }

    pub fn init_end_line(&mut self, line: u32) -> Result<(), InitError> {
        self.end_line.set(line, &self.name)
    }

    pub fn init_declaring_class(&mut self, class_name: impl Into<String>) -> Result<(), InitError> {
        self.declaring_class.set(class_name.into(), &self.name)
    }

    pub(crate) fn build(self, declaring_class: Weak<StaticClass>) -> Arc<StaticProperty> {
        let start_line = self.start_line.into_inner().unwrap_or(0);
        let (doc_comment, doc_block) = match self.doc.into_inner() {
            Some((raw, block)) => (Some(raw), Some(block)),
            None => (None, None),
        };
        Arc::new(StaticProperty {
            name: self.name,
            modifiers: self.modifiers,
            doc_comment,
            doc_block,
            type_hint: self.type_hint.into_inner(),
            default_value: self.default_value.into_inner(),
            start_line,
            end_line: self.end_line.into_inner().unwrap_or(start_line),
            declaring_class_name: self.declaring_class.into_inner().unwrap_or_default(),
            declaring_class,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ReflectionClass;

    #[test]
    fn builds_property() {
        let mut builder = PropertyBuilder::new("$items", Modifiers::PROTECTED | Modifiers::STATIC);
        builder.init_type_hint(TypeHint::Array).unwrap();
        builder.init_default_value("[]").unwrap();
        builder.init_start_line(7).unwrap();
        builder.init_declaring_class("App\\Cart").unwrap();
        assert!(builder.init_default_value("null").is_err());

        let property = builder.build(Weak::new());
        assert_eq!(property.name(), "items");
        assert!(property.is_protected());
        assert!(property.is_static());
        assert!(property.is_default());
        assert_eq!(property.default_value(), Some("[]"));
        assert_eq!(property.end_line(), 7);
        assert_eq!(property.declaring_class().name(), "App\\Cart");
        assert!(property.declaring_class().is_null());
    }
}

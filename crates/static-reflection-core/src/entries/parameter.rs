//! Method parameter descriptor.

use std::sync::{Arc, Weak};

use crate::{InitError, TypeHint};

use super::write_once::WriteOnce;
use super::{ClassRef, StaticMethod};

/// A declared parameter of a [`StaticMethod`].
#[derive(Debug)]
pub struct StaticParameter {
    name: String,
    position: usize,
    type_hint: Option<TypeHint>,
    default_value: Option<String>,
    by_reference: bool,
    variadic: bool,
    promoted: bool,
    optional: bool,
    declaring_method: Weak<StaticMethod>,
}

impl StaticParameter {
    /// Parameter name without the leading `$`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Zero-based position in the parameter list.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The declared type, or the `@param` doc type when none is declared.
    pub fn type_hint(&self) -> Option<&TypeHint> {
        self.type_hint.as_ref()
    }

    /// Whether a default value is declared.
    pub fn has_default_value(&self) -> bool {
        self.default_value.is_some()
    }

    /// The default value exactly as written in source.
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// `&$param`
    pub fn is_passed_by_reference(&self) -> bool {
        self.by_reference
    }

    /// `...$param`
    pub fn is_variadic(&self) -> bool {
        self.variadic
    }

    /// Declared with a constructor promotion modifier.
    pub fn is_promoted(&self) -> bool {
        self.promoted
    }

    /// Whether callers may omit this argument.
    ///
    /// A parameter with a default that is followed by a required parameter
    /// is still required.
    pub fn is_optional(&self) -> bool {
        self.optional
    }

    /// Whether `null` may be passed.
    pub fn allows_null(&self) -> bool {
        match &self.type_hint {
            None => true,
            Some(hint) => {
                hint.allows_null()
                    || self
                        .default_value
                        .as_deref()
                        .is_some_and(|value| value.eq_ignore_ascii_case("null"))
            }
        }
    }

    /// Whether the parameter is type hinted as `array`.
    pub fn is_array(&self) -> bool {
        self.type_hint.as_ref().is_some_and(TypeHint::is_array)
    }

    /// Whether the parameter is type hinted as `callable`.
    pub fn is_callable(&self) -> bool {
        self.type_hint.as_ref().is_some_and(TypeHint::is_callable)
    }

    /// Qualified class name of the type hint, if it names a single class.
    pub fn class_name(&self) -> Option<&str> {
        self.type_hint.as_ref().and_then(TypeHint::class_name)
    }

    /// The method declaring this parameter.
    pub fn declaring_method(&self) -> Option<Arc<StaticMethod>> {
        self.declaring_method.upgrade()
    }

    /// The class declaring the method of this parameter.
    pub fn declaring_class(&self) -> ClassRef {
        match self.declaring_method.upgrade() {
            Some(method) => method.declaring_class(),
            None => ClassRef::null(""),
        }
    }
}

/// Staging type for a [`StaticParameter`].
#[derive(Debug, Clone)]
pub struct ParameterBuilder {
    name: String,
    type_hint: WriteOnce<TypeHint>,
    default_value: WriteOnce<String>,
    by_reference: bool,
    variadic: bool,
    promoted: bool,
}

impl ParameterBuilder {
    /// Start a parameter named `name` (a leading `$` is stripped).
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name = match name.strip_prefix('$') {
            Some(stripped) => stripped.to_string(),
            None => name,
        };
        Self {
            name,
            type_hint: WriteOnce::new("type hint"),
            default_value: WriteOnce::new("default value"),
            by_reference: false,
            variadic: false,
            promoted: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn init_type_hint(&mut self, hint: TypeHint) -> Result<(), InitError> {
        self.type_hint.set(hint, &self.name)
    }

    pub fn init_default_value(&mut self, literal: impl Into<String>) -> Result<(), InitError> {
        self.default_value.set(literal.into(), &self.name)
    }

    pub fn has_type_hint(&self) -> bool {
        self.type_hint.is_set()
    }

    pub fn with_by_reference(mut self, by_reference: bool) -> Self {
        self.by_reference = by_reference;
        self
    }

    pub fn with_variadic(mut self, variadic: bool) -> Self {
        self.variadic = variadic;
        self
    }

    pub fn with_promoted(mut self, promoted: bool) -> Self {
        self.promoted = promoted;
        self
    }

    /// Whether this parameter may be omitted regardless of its successors.
    pub(crate) fn may_be_omitted(&self) -> bool {
        self.variadic || self.default_value.is_set()
    }

    pub(crate) fn build(
        self,
        position: usize,
        optional: bool,
        declaring_method: Weak<StaticMethod>,
    ) -> StaticParameter {
        StaticParameter {
            name: self.name,
            position,
            type_hint: self.type_hint.into_inner(),
            default_value: self.default_value.into_inner(),
            by_reference: self.by_reference,
            variadic: self.variadic,
            promoted: self.promoted,
            optional,
            declaring_method,
        }
    }
}

//! Static reflection descriptors.
//!
//! This module provides the type model produced by the parser:
//!
//! - [`StaticClass`] - A class or interface declaration
//! - [`StaticMethod`] - A method with its parameters
//! - [`StaticProperty`] - A declared property
//! - [`StaticParameter`] - A method parameter
//! - [`NullClass`] - Placeholder for a referenced type that was never parsed
//! - [`ClassRef`] - Either of the two class variants
//!
//! Descriptors are assembled through builders ([`ClassBuilder`],
//! [`MethodBuilder`], [`PropertyBuilder`], [`ParameterBuilder`]) whose
//! `init_*` setters accept one write each. Building freezes the descriptor
//! and wires the non-owning back references to the declaring class and
//! method.

mod class;
mod class_ref;
mod method;
mod null_class;
mod parameter;
mod property;
mod reflection;
mod write_once;

pub use class::{ClassBuilder, ClassConstant, StaticClass};
pub use class_ref::ClassRef;
pub use method::{CONSTRUCTOR_NAME, DESTRUCTOR_NAME, MethodBuilder, MethodOrigin, StaticMethod};
pub use null_class::NullClass;
pub use parameter::{ParameterBuilder, StaticParameter};
pub use property::{PropertyBuilder, StaticProperty};
pub use reflection::ReflectionClass;

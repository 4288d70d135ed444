//! Modifier flags for declared classes and members.

use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Modifiers of a method or property.
    ///
    /// Bit values follow the conventional runtime reflection constants so
    /// `bits()` can be handed to tooling that expects them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u32 {
        const PUBLIC = 1;
        const PROTECTED = 2;
        const PRIVATE = 4;
        const STATIC = 16;
        const FINAL = 32;
        const ABSTRACT = 64;
        const READONLY = 128;

        const VISIBILITY = Self::PUBLIC.bits() | Self::PROTECTED.bits() | Self::PRIVATE.bits();
    }
}

bitflags! {
    /// Flags of a declared class or interface.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClassFlags: u32 {
        /// Declared `abstract` (interfaces are implicitly abstract).
        const ABSTRACT = 1;
        /// Declared `final`.
        const FINAL = 2;
        /// Declared with `interface`.
        const INTERFACE = 4;
    }
}

impl Modifiers {
    /// The visibility part of these modifiers, public when none was declared.
    pub fn visibility(self) -> Visibility {
        if self.contains(Modifiers::PRIVATE) {
            Visibility::Private
        } else if self.contains(Modifiers::PROTECTED) {
            Visibility::Protected
        } else {
            Visibility::Public
        }
    }

    /// Add an implicit `public` when no visibility was declared.
    pub fn with_default_visibility(self) -> Self {
        if self.intersects(Modifiers::VISIBILITY) {
            self
        } else {
            self | Modifiers::PUBLIC
        }
    }

    /// Keyword names of the set modifiers, in declaration order.
    pub fn keywords(self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Modifiers::ABSTRACT) {
            names.push("abstract");
        }
        if self.contains(Modifiers::FINAL) {
            names.push("final");
        }
        names.push(match self.visibility() {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Private => "private",
        });
        if self.contains(Modifiers::STATIC) {
            names.push("static");
        }
        if self.contains(Modifiers::READONLY) {
            names.push("readonly");
        }
        names
    }
}

/// Visibility modifier for class members.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Private,
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::Public => write!(f, "public"),
            Visibility::Protected => write!(f, "protected"),
            Visibility::Private => write!(f, "private"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_visibility_is_public() {
        assert_eq!(Modifiers::STATIC.visibility(), Visibility::Public);
        assert_eq!(
            Modifiers::STATIC.with_default_visibility(),
            Modifiers::STATIC | Modifiers::PUBLIC
        );
        assert_eq!(
            Modifiers::PRIVATE.with_default_visibility(),
            Modifiers::PRIVATE
        );
    }

    #[test]
    fn keywords_in_declaration_order() {
        let modifiers = Modifiers::ABSTRACT | Modifiers::PROTECTED | Modifiers::STATIC;
        assert_eq!(modifiers.keywords(), vec!["abstract", "protected", "static"]);
    }

    #[test]
    fn runtime_compatible_bits() {
        assert_eq!(Modifiers::PUBLIC.bits(), 1);
        assert_eq!((Modifiers::PRIVATE | Modifiers::STATIC).bits(), 20);
        assert_eq!(Modifiers::VISIBILITY.bits(), 7);
    }
}

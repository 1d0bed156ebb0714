//! Symbol flags.

use bitflags::bitflags;

bitflags! {
    /// Modifiers and kind markers attached to a symbol at completion time.
    ///
    /// Flags are part of the completed state: reading them from a stub is a
    /// `SymbolError::NotCompleted`.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct Flags: u64 {
        // === Visibility ===
        const PRIVATE = 1 << 0;
        const PROTECTED = 1 << 1;

        // === Definition kind ===
        /// A `def` (as opposed to a field or `val`).
        const METHOD = 1 << 2;
        /// An object, or the value of a Java class's static companion.
        const MODULE = 1 << 3;
        const TRAIT = 1 << 4;
        const PACKAGE = 1 << 5;
        const CONSTRUCTOR = 1 << 6;
        const ENUM = 1 << 7;
        /// A `var` or a non-final field.
        const MUTABLE = 1 << 8;
        const STATIC = 1 << 9;

        // === Modifiers ===
        const ABSTRACT = 1 << 10;
        const FINAL = 1 << 11;
        const SEALED = 1 << 12;
        const CASE = 1 << 13;
        const OVERRIDE = 1 << 14;
        const SYNTHETIC = 1 << 15;
        const ARTIFACT = 1 << 16;
        const STABLE = 1 << 17;

        // === Type parameters ===
        const COVARIANT = 1 << 18;
        const CONTRAVARIANT = 1 << 19;

        // === Origin ===
        const JAVA_DEFINED = 1 << 20;
        const SCALA2_DEFINED = 1 << 21;
        const JAVA_VARARGS = 1 << 22;
        const ANNOTATION = 1 << 23;

        // === Composite ===
        const VARIANCE = Self::COVARIANT.bits() | Self::CONTRAVARIANT.bits();
        /// Members that never take part in overriding.
        const NON_OVERRIDING = Self::PRIVATE.bits() | Self::CONSTRUCTOR.bits();
    }
}

impl Flags {
    #[inline]
    pub fn is_private(self) -> bool {
        self.contains(Flags::PRIVATE)
    }

    #[inline]
    pub fn is_module(self) -> bool {
        self.contains(Flags::MODULE)
    }

    #[inline]
    pub fn is_method(self) -> bool {
        self.contains(Flags::METHOD)
    }

    #[inline]
    pub fn is_java_defined(self) -> bool {
        self.contains(Flags::JAVA_DEFINED)
    }

    /// Whether a member with these flags may override or be overridden.
    #[inline]
    pub fn can_override(self) -> bool {
        !self.intersects(Flags::NON_OVERRIDING)
    }
}

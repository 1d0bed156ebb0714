//! Stable handles shared by the binder and the solver.
//!
//! Symbols and types reference each other by index, never by pointer, so the
//! symbol table and the type algebra can refer to one another cyclically
//! without ownership cycles.

/// Handle to a symbol in a `SymbolArena`. Identity is stable for the life of
/// the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(pub u32);

impl SymbolId {
    /// The root package is always the first symbol of an arena.
    pub const ROOT: SymbolId = SymbolId(0);

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to an interned type. Two equal `TypeId`s denote structurally equal
/// types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Absence of a type (declarations, imports, unresolved results).
    pub const NO_TYPE: TypeId = TypeId(0);
    /// The prefix of references to local symbols.
    pub const NO_PREFIX: TypeId = TypeId(1);

    /// Number of ids reserved before the first user type.
    pub const FIRST_USER: u32 = 2;

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub fn exists(self) -> bool {
        self != TypeId::NO_TYPE
    }
}

//! The type algebra.
//!
//! Types are immutable values interned in a `TypeInterner` and addressed by
//! `TypeId`. They reference symbols by `SymbolId` and never embed a cycle
//! directly: a class whose field is typed with the class itself goes through
//! a `TypeRef` to the class symbol.
//!
//! Intersections and unions are stored exactly as constructed. Nothing is
//! flattened or deduplicated at construction time.

use clsem_common::{Atom, Name, SymbolId, TypeId};

/// Identity of a binder (`MethodType`, `PolyType`, `TypeLambda`).
///
/// Every binder gets a fresh id, so a `ParamRef` can never be captured by a
/// different binder during substitution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BinderId(pub u32);

/// What a named reference points at.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Designator {
    /// Already resolved.
    Symbol(SymbolId),
    /// Resolved against the prefix on demand.
    Name(Name),
}

/// Literal values of constant types.
///
/// Floating-point values are stored as raw bits so constants stay hashable.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Constant {
    Unit,
    Boolean(bool),
    Char(u16),
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(u32),
    Double(u64),
    String(Atom),
    Null,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    NoType,
    NoPrefix,

    // === References ===
    PackageRef(SymbolId),
    TypeRef {
        prefix: TypeId,
        designator: Designator,
    },
    TermRef {
        prefix: TypeId,
        designator: Designator,
    },
    /// `C.this` for a class symbol `C`.
    ThisType(SymbolId),

    // === Value types ===
    AppliedType {
        tycon: TypeId,
        args: Vec<TypeId>,
    },
    ConstantType(Constant),
    AndType(TypeId, TypeId),
    OrType(TypeId, TypeId),

    // === Methodic types ===
    /// A by-name value or parameterless method result.
    ExprType(TypeId),
    MethodType {
        binder: BinderId,
        param_names: Vec<Atom>,
        param_types: Vec<TypeId>,
        result: TypeId,
    },
    PolyType {
        binder: BinderId,
        param_names: Vec<Atom>,
        /// One `TypeBounds` per parameter.
        bounds: Vec<TypeId>,
        result: TypeId,
    },
    TypeLambda {
        binder: BinderId,
        param_names: Vec<Atom>,
        bounds: Vec<TypeId>,
        result: TypeId,
    },
    /// Reference to parameter `index` of `binder`.
    ParamRef { binder: BinderId, index: u32 },

    // === Bounds ===
    /// An existential argument `? >: low <: high`; holds a `TypeBounds`.
    WildcardTypeBounds(TypeId),
    TypeBounds { low: TypeId, high: TypeId },
    /// The info of a type alias member.
    TypeAlias(TypeId),
}

impl TypeData {
    /// Method, poly and lambda types: not values until fully applied.
    pub fn is_methodic(&self) -> bool {
        matches!(
            self,
            TypeData::MethodType { .. } | TypeData::PolyType { .. } | TypeData::TypeLambda { .. }
        )
    }

    /// The binder introduced by this type, if any.
    pub fn binder(&self) -> Option<BinderId> {
        match self {
            TypeData::MethodType { binder, .. }
            | TypeData::PolyType { binder, .. }
            | TypeData::TypeLambda { binder, .. } => Some(*binder),
            _ => None,
        }
    }

    /// The result of a methodic type or of an `ExprType`.
    pub fn result_type(&self) -> Option<TypeId> {
        match self {
            TypeData::MethodType { result, .. }
            | TypeData::PolyType { result, .. }
            | TypeData::TypeLambda { result, .. }
            | TypeData::ExprType(result) => Some(*result),
            _ => None,
        }
    }
}

//! Symbol records.
//!
//! A `Symbol` is a name, an owner and a completion state. Everything that
//! depends on decoding a type (declared type, flags, parents, type
//! parameters) lives behind the `Completed` state and is only reachable
//! through the checked accessors on `SymbolArena`.

use crate::flags::Flags;
use clsem_common::{Name, SymbolId, TypeId};
use indexmap::IndexMap;
use once_cell::sync::OnceCell;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use std::sync::Arc;

/// Declaration buckets of a declaring symbol, in insertion order.
pub type DeclMap = IndexMap<Name, SmallVec<[SymbolId; 1]>, FxBuildHasher>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Package,
    Class,
    /// Methods, fields, objects, parameters.
    Term,
    /// Type aliases and abstract type members.
    TypeMember,
    ClassTypeParam,
}

impl SymbolKind {
    pub fn is_declaring(self) -> bool {
        matches!(self, SymbolKind::Package | SymbolKind::Class)
    }

    pub fn describe(self) -> &'static str {
        match self {
            SymbolKind::Package => "package",
            SymbolKind::Class => "class",
            SymbolKind::Term => "term",
            SymbolKind::TypeMember => "type member",
            SymbolKind::ClassTypeParam => "type parameter",
        }
    }
}

/// Where a symbol is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompletionState {
    /// Registered with name and owner only.
    Stub,
    /// Declared type attached, not yet verified with its decoding unit.
    Completed,
    /// Verified by `check_completed`; safe to publish.
    Verified,
}

/// Class-specific completed data.
#[derive(Debug, Default)]
pub struct ClassInfo {
    pub type_params: Vec<SymbolId>,
    pub parents: Vec<TypeId>,
    /// Computed once on first query.
    pub linearization: OnceCell<Arc<[SymbolId]>>,
}

/// The payload attached by `SymbolArena::complete`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Completion {
    Package,
    Class {
        flags: Flags,
        type_params: Vec<SymbolId>,
        parents: Vec<TypeId>,
    },
    /// A term's declared type, or a type member's alias/bounds, or a type
    /// parameter's bounds.
    Typed { flags: Flags, declared_type: TypeId },
}

#[derive(Debug)]
pub struct Symbol {
    pub(crate) name: Name,
    pub(crate) owner: Option<SymbolId>,
    pub(crate) kind: SymbolKind,
    pub(crate) state: CompletionState,
    pub(crate) flags: Flags,
    pub(crate) declared_type: Option<TypeId>,
    pub(crate) class: Option<ClassInfo>,
    pub(crate) decls: Option<DeclMap>,
}

impl Symbol {
    pub(crate) fn stub(name: Name, owner: Option<SymbolId>, kind: SymbolKind) -> Self {
        Symbol {
            name,
            owner,
            kind,
            state: CompletionState::Stub,
            flags: Flags::empty(),
            declared_type: None,
            class: None,
            decls: kind.is_declaring().then(DeclMap::default),
        }
    }

    #[inline]
    pub fn name(&self) -> &Name {
        &self.name
    }

    /// `None` only for the root package.
    #[inline]
    pub fn owner(&self) -> Option<SymbolId> {
        self.owner
    }

    #[inline]
    pub fn kind(&self) -> SymbolKind {
        self.kind
    }

    #[inline]
    pub fn state(&self) -> CompletionState {
        self.state
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        self.state != CompletionState::Stub
    }

    #[inline]
    pub fn is_class(&self) -> bool {
        self.kind == SymbolKind::Class
    }

    #[inline]
    pub fn is_package(&self) -> bool {
        self.kind == SymbolKind::Package
    }

    #[inline]
    pub fn is_term(&self) -> bool {
        self.kind == SymbolKind::Term
    }

    #[inline]
    pub fn is_type_param(&self) -> bool {
        self.kind == SymbolKind::ClassTypeParam
    }

    pub fn decls(&self) -> Option<&DeclMap> {
        self.decls.as_ref()
    }
}

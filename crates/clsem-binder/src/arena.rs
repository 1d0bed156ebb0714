//! The symbol arena.
//!
//! Symbols live in one append-only vector and are addressed by `SymbolId`.
//! Creating a symbol registers it in its owner's declaration map in the same
//! call, so a symbol is never observable without being reachable from its
//! owner. Completion attaches the declared type exactly once; a decoding unit
//! is published only after `check_completed` has verified every symbol it
//! created.
//!
//! A unit that fails half-way is undone with `rollback`: everything created
//! after the unit's `Checkpoint` is unregistered and dropped. Ids are never
//! reused while any symbol that could refer to them survives.

use crate::error::SymbolError;
use crate::flags::Flags;
use crate::symbols::{ClassInfo, CompletionState, Completion, DeclMap, Symbol, SymbolKind};
use clsem_common::{Name, SymbolId, TypeId};
use once_cell::sync::OnceCell;
use std::ops::Index;
use std::sync::Arc;
use tracing::{debug, trace};

/// A position in the arena to roll back to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Checkpoint(u32);

#[derive(Debug)]
pub struct SymbolArena {
    symbols: Vec<Symbol>,
}

impl SymbolArena {
    /// Create an arena holding only the root package, already verified.
    pub fn new(root_name: Name) -> Self {
        let mut root = Symbol::stub(root_name, None, SymbolKind::Package);
        root.state = CompletionState::Verified;
        root.flags = Flags::PACKAGE;
        SymbolArena {
            symbols: vec![root],
        }
    }

    #[inline]
    pub fn root(&self) -> SymbolId {
        SymbolId::ROOT
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[inline]
    pub fn get(&self, id: SymbolId) -> Option<&Symbol> {
        self.symbols.get(id.index())
    }

    pub fn symbol(&self, id: SymbolId) -> Result<&Symbol, SymbolError> {
        self.get(id).ok_or(SymbolError::UnknownSymbol(id))
    }

    fn symbol_mut(&mut self, id: SymbolId) -> Result<&mut Symbol, SymbolError> {
        self.symbols
            .get_mut(id.index())
            .ok_or(SymbolError::UnknownSymbol(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = SymbolId> + '_ {
        (0..self.symbols.len() as u32).map(SymbolId)
    }

    // =========================================================================
    // Creation & lookup
    // =========================================================================

    /// Create a stub and register it under `owner`. A same-named sibling is
    /// kept: the new symbol is appended to the bucket.
    pub fn create(
        &mut self,
        name: Name,
        owner: SymbolId,
        kind: SymbolKind,
    ) -> Result<SymbolId, SymbolError> {
        let id = SymbolId(self.symbols.len() as u32);
        let key = name.decl_key();
        let decls = self.decls_mut(owner)?;
        decls.entry(key).or_default().push(id);
        trace!(?id, ?owner, ?kind, "create symbol");
        self.symbols.push(Symbol::stub(name, Some(owner), kind));
        Ok(id)
    }

    /// Look up the package `name` in `owner`, creating and completing it if
    /// absent.
    pub fn get_or_create_package(
        &mut self,
        name: Name,
        owner: SymbolId,
    ) -> Result<SymbolId, SymbolError> {
        if let Some(existing) = self
            .get_decls(owner, &name)
            .iter()
            .copied()
            .find(|&id| self.symbols[id.index()].is_package())
        {
            return Ok(existing);
        }
        let id = self.create(name, owner, SymbolKind::Package)?;
        self.complete(id, Completion::Package)?;
        Ok(id)
    }

    /// Any one declaration for `name` in `owner`.
    pub fn get_decl(&self, owner: SymbolId, name: &Name) -> Option<SymbolId> {
        self.get_decls(owner, name).first().copied()
    }

    /// All declarations for `name` in `owner`, in creation order. Signed
    /// names share the bucket of their unsigned name.
    pub fn get_decls(&self, owner: SymbolId, name: &Name) -> &[SymbolId] {
        let Some(decls) = self.get(owner).and_then(Symbol::decls) else {
            return &[];
        };
        decls
            .get(&name.decl_key())
            .map(|bucket| bucket.as_slice())
            .unwrap_or(&[])
    }

    /// Every declaration in `owner`, bucket by bucket.
    pub fn decls(&self, owner: SymbolId) -> impl Iterator<Item = SymbolId> + '_ {
        self.get(owner)
            .and_then(Symbol::decls)
            .into_iter()
            .flat_map(|decls| decls.values().flat_map(|bucket| bucket.iter().copied()))
    }

    fn decls_mut(&mut self, owner: SymbolId) -> Result<&mut DeclMap, SymbolError> {
        self.symbol_mut(owner)?
            .decls
            .as_mut()
            .ok_or(SymbolError::NotADeclaringSymbol(owner))
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attach the completed state. Allowed once per symbol.
    pub fn complete(&mut self, id: SymbolId, completion: Completion) -> Result<(), SymbolError> {
        let symbol = self.symbol_mut(id)?;
        if symbol.state != CompletionState::Stub {
            return Err(SymbolError::AlreadyCompleted(id));
        }
        let expected = match (&completion, symbol.kind) {
            (Completion::Package, SymbolKind::Package) => None,
            (Completion::Class { .. }, SymbolKind::Class) => None,
            (
                Completion::Typed { .. },
                SymbolKind::Term | SymbolKind::TypeMember | SymbolKind::ClassTypeParam,
            ) => None,
            (Completion::Package, _) => Some("package"),
            (Completion::Class { .. }, _) => Some("class"),
            (Completion::Typed { .. }, _) => Some("term or type"),
        };
        if let Some(expected) = expected {
            return Err(SymbolError::KindMismatch {
                id,
                expected,
                actual: symbol.kind.describe(),
            });
        }

        match completion {
            Completion::Package => symbol.flags = Flags::PACKAGE,
            Completion::Class {
                flags,
                type_params,
                parents,
            } => {
                symbol.flags = flags;
                symbol.class = Some(ClassInfo {
                    type_params,
                    parents,
                    linearization: OnceCell::new(),
                });
            }
            Completion::Typed {
                flags,
                declared_type,
            } => {
                symbol.flags = flags;
                symbol.declared_type = Some(declared_type);
            }
        }
        symbol.state = CompletionState::Completed;
        trace!(?id, "complete symbol");
        Ok(())
    }

    /// Verify that every symbol of a decoding unit is completed, then mark
    /// them all as verified. Nothing is marked if any symbol is still a stub.
    pub fn check_completed(
        &mut self,
        ids: impl IntoIterator<Item = SymbolId>,
    ) -> Result<(), SymbolError> {
        let ids: Vec<SymbolId> = ids.into_iter().collect();
        let mut first = None;
        let mut count = 0;
        for &id in &ids {
            if !self.symbol(id)?.is_completed() {
                first.get_or_insert(id);
                count += 1;
            }
        }
        if let Some(first) = first {
            return Err(SymbolError::IncompleteUnit { first, count });
        }
        for id in ids {
            self.symbol_mut(id)?.state = CompletionState::Verified;
        }
        Ok(())
    }

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.symbols.len() as u32)
    }

    /// Symbols created since `checkpoint`, in creation order.
    pub fn created_since(&self, checkpoint: Checkpoint) -> impl Iterator<Item = SymbolId> {
        (checkpoint.0..self.symbols.len() as u32).map(SymbolId)
    }

    /// Drop every symbol created since `checkpoint` and unregister it from
    /// its owner.
    pub fn rollback(&mut self, checkpoint: Checkpoint) {
        let start = checkpoint.0 as usize;
        if start >= self.symbols.len() {
            return;
        }
        let dropped = self.symbols.len() - start;
        for symbol in &mut self.symbols[..start] {
            if let Some(decls) = symbol.decls.as_mut() {
                decls.retain(|_, bucket| {
                    bucket.retain(|id| id.index() < start);
                    !bucket.is_empty()
                });
            }
        }
        self.symbols.truncate(start);
        debug!(dropped, "rolled back symbols");
    }

    // =========================================================================
    // Checked accessors
    // =========================================================================

    fn completed(&self, id: SymbolId) -> Result<&Symbol, SymbolError> {
        let symbol = self.symbol(id)?;
        if symbol.is_completed() {
            Ok(symbol)
        } else {
            Err(SymbolError::NotCompleted(id))
        }
    }

    pub fn flags(&self, id: SymbolId) -> Result<Flags, SymbolError> {
        Ok(self.completed(id)?.flags)
    }

    pub fn declared_type(&self, id: SymbolId) -> Result<TypeId, SymbolError> {
        let symbol = self.completed(id)?;
        symbol.declared_type.ok_or(SymbolError::KindMismatch {
            id,
            expected: "term or type",
            actual: symbol.kind.describe(),
        })
    }

    fn class_info(&self, id: SymbolId) -> Result<&ClassInfo, SymbolError> {
        let symbol = self.completed(id)?;
        symbol.class.as_ref().ok_or(SymbolError::KindMismatch {
            id,
            expected: "class",
            actual: symbol.kind.describe(),
        })
    }

    pub fn parents(&self, id: SymbolId) -> Result<&[TypeId], SymbolError> {
        Ok(&self.class_info(id)?.parents)
    }

    pub fn class_type_params(&self, id: SymbolId) -> Result<&[SymbolId], SymbolError> {
        Ok(&self.class_info(id)?.type_params)
    }

    /// The once-only linearization slot of a completed class.
    pub fn linearization_cell(
        &self,
        id: SymbolId,
    ) -> Result<&OnceCell<Arc<[SymbolId]>>, SymbolError> {
        Ok(&self.class_info(id)?.linearization)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Owners from `id` (exclusive) up to the root (inclusive).
    pub fn owner_chain(&self, id: SymbolId) -> impl Iterator<Item = SymbolId> + '_ {
        std::iter::successors(self.get(id).and_then(Symbol::owner), move |&owner| {
            self.get(owner).and_then(Symbol::owner)
        })
    }

    /// `id` itself if it is a class, else its nearest enclosing class.
    pub fn enclosing_class(&self, id: SymbolId) -> Option<SymbolId> {
        std::iter::once(id)
            .chain(self.owner_chain(id))
            .find(|&s| self.get(s).is_some_and(Symbol::is_class))
    }

    /// Names from the root (exclusive) down to `id` (inclusive).
    pub fn full_name_path(&self, id: SymbolId) -> Vec<Name> {
        let mut path: Vec<Name> = std::iter::once(id)
            .chain(self.owner_chain(id))
            .filter(|&s| s != SymbolId::ROOT)
            .filter_map(|s| self.get(s).map(|sym| sym.name.clone()))
            .collect();
        path.reverse();
        path
    }
}

impl Index<SymbolId> for SymbolArena {
    type Output = Symbol;

    fn index(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.index()]
    }
}

#[cfg(test)]
#[path = "tests/arena_tests.rs"]
mod tests;

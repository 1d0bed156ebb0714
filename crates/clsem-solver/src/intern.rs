//! Type interning.
//!
//! Structurally equal `TypeData` values share one `TypeId`, so type identity
//! is an integer comparison. The interner takes `&self` everywhere: queries
//! that build new types (substitution, as-seen-from) may run concurrently
//! once a session has been published.

use crate::types::{BinderId, Constant, Designator, TypeData};
use clsem_common::{Atom, Name, SymbolId, TypeId};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct InternerState {
    map: FxHashMap<Arc<TypeData>, TypeId>,
    types: Vec<Arc<TypeData>>,
}

pub struct TypeInterner {
    state: RwLock<InternerState>,
    next_binder: AtomicU32,
    no_type: Arc<TypeData>,
}

impl TypeInterner {
    /// Create an interner with `NoType` and `NoPrefix` pre-registered at
    /// their fixed ids.
    pub fn new() -> Self {
        let interner = TypeInterner {
            state: RwLock::new(InternerState::default()),
            next_binder: AtomicU32::new(0),
            no_type: Arc::new(TypeData::NoType),
        };
        let no_type = interner.intern(TypeData::NoType);
        let no_prefix = interner.intern(TypeData::NoPrefix);
        debug_assert_eq!(no_type, TypeId::NO_TYPE);
        debug_assert_eq!(no_prefix, TypeId::NO_PREFIX);
        interner
    }

    // Every write pushes to `types` and `map` together, so a state poisoned
    // by a panicking reader or writer is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, InternerState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, InternerState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn intern(&self, data: TypeData) -> TypeId {
        if let Some(&id) = self.read().map.get(&data) {
            return id;
        }

        let mut state = self.write();
        if let Some(&id) = state.map.get(&data) {
            return id;
        }
        let id = TypeId(state.types.len() as u32);
        let data = Arc::new(data);
        state.types.push(data.clone());
        state.map.insert(data, id);
        id
    }

    pub fn lookup(&self, id: TypeId) -> Option<Arc<TypeData>> {
        self.read().types.get(id.index()).cloned()
    }

    /// Like `lookup`, but unknown ids read as `NoType`.
    #[inline]
    pub fn data(&self, id: TypeId) -> Arc<TypeData> {
        self.lookup(id).unwrap_or_else(|| self.no_type.clone())
    }

    pub fn len(&self) -> usize {
        self.read().types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= TypeId::FIRST_USER as usize
    }

    pub fn fresh_binder(&self) -> BinderId {
        BinderId(self.next_binder.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Constructors
    // =========================================================================

    pub fn package_ref(&self, package: SymbolId) -> TypeId {
        self.intern(TypeData::PackageRef(package))
    }

    pub fn this_type(&self, class: SymbolId) -> TypeId {
        self.intern(TypeData::ThisType(class))
    }

    pub fn symbol_type_ref(&self, prefix: TypeId, symbol: SymbolId) -> TypeId {
        self.intern(TypeData::TypeRef {
            prefix,
            designator: Designator::Symbol(symbol),
        })
    }

    pub fn named_type_ref(&self, prefix: TypeId, name: Name) -> TypeId {
        self.intern(TypeData::TypeRef {
            prefix,
            designator: Designator::Name(name),
        })
    }

    pub fn symbol_term_ref(&self, prefix: TypeId, symbol: SymbolId) -> TypeId {
        self.intern(TypeData::TermRef {
            prefix,
            designator: Designator::Symbol(symbol),
        })
    }

    pub fn named_term_ref(&self, prefix: TypeId, name: Name) -> TypeId {
        self.intern(TypeData::TermRef {
            prefix,
            designator: Designator::Name(name),
        })
    }

    /// A reference to a type parameter or local type symbol.
    pub fn param_type_ref(&self, symbol: SymbolId) -> TypeId {
        self.symbol_type_ref(TypeId::NO_PREFIX, symbol)
    }

    pub fn applied(&self, tycon: TypeId, args: Vec<TypeId>) -> TypeId {
        self.intern(TypeData::AppliedType { tycon, args })
    }

    pub fn constant(&self, value: Constant) -> TypeId {
        self.intern(TypeData::ConstantType(value))
    }

    pub fn and(&self, left: TypeId, right: TypeId) -> TypeId {
        self.intern(TypeData::AndType(left, right))
    }

    pub fn or(&self, left: TypeId, right: TypeId) -> TypeId {
        self.intern(TypeData::OrType(left, right))
    }

    pub fn expr(&self, result: TypeId) -> TypeId {
        self.intern(TypeData::ExprType(result))
    }

    pub fn method(
        &self,
        binder: BinderId,
        param_names: Vec<Atom>,
        param_types: Vec<TypeId>,
        result: TypeId,
    ) -> TypeId {
        self.intern(TypeData::MethodType {
            binder,
            param_names,
            param_types,
            result,
        })
    }

    pub fn poly(
        &self,
        binder: BinderId,
        param_names: Vec<Atom>,
        bounds: Vec<TypeId>,
        result: TypeId,
    ) -> TypeId {
        self.intern(TypeData::PolyType {
            binder,
            param_names,
            bounds,
            result,
        })
    }

    pub fn type_lambda(
        &self,
        binder: BinderId,
        param_names: Vec<Atom>,
        bounds: Vec<TypeId>,
        result: TypeId,
    ) -> TypeId {
        self.intern(TypeData::TypeLambda {
            binder,
            param_names,
            bounds,
            result,
        })
    }

    pub fn param_ref(&self, binder: BinderId, index: u32) -> TypeId {
        self.intern(TypeData::ParamRef { binder, index })
    }

    pub fn bounds(&self, low: TypeId, high: TypeId) -> TypeId {
        self.intern(TypeData::TypeBounds { low, high })
    }

    pub fn wildcard(&self, low: TypeId, high: TypeId) -> TypeId {
        let bounds = self.bounds(low, high);
        self.intern(TypeData::WildcardTypeBounds(bounds))
    }

    pub fn alias(&self, target: TypeId) -> TypeId {
        self.intern(TypeData::TypeAlias(target))
    }
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/intern_tests.rs"]
mod tests;

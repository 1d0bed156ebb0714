//! The shared semantic context.
//!
//! A `Context` bundles the name interner, the type interner, the symbol
//! arena and the well-known definitions. Decoders hold it mutably while a
//! unit is loaded; once published, every query takes `&Context`.

use crate::definitions::Definitions;
use crate::enter::Enter;
use crate::intern::TypeInterner;
use crate::types::{Designator, TypeData};
use clsem_binder::{SymbolArena, SymbolError, SymbolKind};
use clsem_common::{Atom, FullyQualifiedName, Interner, Name, SymbolId, TermName, TypeId, TypeName};

pub struct Context {
    pub names: Interner,
    pub types: TypeInterner,
    pub symbols: SymbolArena,
    pub defn: Definitions,
}

impl Context {
    /// Create a context with the root packages and the universal root chain
    /// installed and verified.
    pub fn new() -> Result<Self, SymbolError> {
        let names = Interner::new();
        names.intern_common();
        let types = TypeInterner::new();
        let mut symbols = SymbolArena::new(Name::term(names.intern("<root>")));
        let defn = Definitions::install(&mut Enter::new(&mut symbols, &types, &names))?;
        Ok(Context {
            names,
            types,
            symbols,
            defn,
        })
    }

    pub fn enter(&mut self) -> Enter<'_> {
        Enter::new(&mut self.symbols, &self.types, &self.names)
    }

    // =========================================================================
    // Names
    // =========================================================================

    #[inline]
    pub fn intern(&self, s: &str) -> Atom {
        self.names.intern(s)
    }

    pub fn term_name(&self, s: &str) -> Name {
        Name::Term(TermName::from_str(&self.names, s))
    }

    pub fn type_name(&self, s: &str) -> Name {
        Name::Type(TypeName::Plain(TermName::from_str(&self.names, s)))
    }

    pub fn fully_qualified_name(&self, symbol: SymbolId) -> FullyQualifiedName {
        FullyQualifiedName::new(self.symbols.full_name_path(symbol))
    }

    /// Dotted full name, e.g. `java.lang.Object`.
    pub fn full_name(&self, symbol: SymbolId) -> String {
        self.fully_qualified_name(symbol).display(&self.names)
    }

    pub fn symbol_name(&self, symbol: SymbolId) -> String {
        self.symbols
            .get(symbol)
            .map(|s| s.name().display(&self.names))
            .unwrap_or_default()
    }

    /// Look up a class by its dotted full name, e.g. `java.lang.String`.
    pub fn find_class(&self, full_name: &str) -> Option<SymbolId> {
        let mut segments: Vec<&str> = full_name.split('.').collect();
        let class_name = segments.pop()?;
        let mut owner = self.symbols.root();
        for segment in segments {
            let atom = self.names.get(segment)?;
            owner = self
                .symbols
                .get_decls(owner, &Name::term(atom))
                .iter()
                .copied()
                .find(|&id| self.symbols[id].is_package())?;
        }
        let atom = self.names.get(class_name)?;
        self.symbols
            .get_decls(owner, &Name::type_(atom))
            .iter()
            .copied()
            .find(|&id| self.symbols[id].is_class())
    }

    // =========================================================================
    // Class types
    // =========================================================================

    /// The unapplied reference to a class.
    pub fn class_type(&self, class: SymbolId) -> TypeId {
        class_type_ref(&self.symbols, &self.types, class)
    }

    /// The class applied to its own type parameters (`C[T1, ..., Tn]`), or
    /// the bare reference when it has none.
    pub fn class_this_type(&self, class: SymbolId) -> Result<TypeId, SymbolError> {
        let tycon = self.class_type(class);
        let params = self.symbols.class_type_params(class)?;
        if params.is_empty() {
            return Ok(tycon);
        }
        let args = params
            .iter()
            .map(|&p| self.types.param_type_ref(p))
            .collect();
        Ok(self.types.applied(tycon, args))
    }

    // =========================================================================
    // Resolution
    // =========================================================================

    /// The symbol a reference type denotes.
    pub fn resolve(&self, tp: TypeId) -> Option<SymbolId> {
        match &*self.types.data(tp) {
            TypeData::PackageRef(package) => Some(*package),
            TypeData::ThisType(class) => Some(*class),
            TypeData::TypeRef { prefix, designator } => {
                self.resolve_designator(*prefix, designator, false)
            }
            TypeData::TermRef { prefix, designator } => {
                self.resolve_designator(*prefix, designator, true)
            }
            _ => None,
        }
    }

    pub fn resolve_designator(
        &self,
        prefix: TypeId,
        designator: &Designator,
        is_term: bool,
    ) -> Option<SymbolId> {
        let name = match designator {
            Designator::Symbol(symbol) => return Some(*symbol),
            Designator::Name(name) => name,
        };
        let owner = self.prefix_owner(prefix)?;
        self.symbols.get_decls(owner, name).iter().copied().find(|&id| {
            let kind = self.symbols[id].kind();
            if is_term {
                matches!(kind, SymbolKind::Term | SymbolKind::Package)
            } else {
                matches!(
                    kind,
                    SymbolKind::Class | SymbolKind::TypeMember | SymbolKind::ClassTypeParam
                )
            }
        })
    }

    /// The declaring symbol whose members a prefix selects from.
    fn prefix_owner(&self, prefix: TypeId) -> Option<SymbolId> {
        match &*self.types.data(prefix) {
            TypeData::PackageRef(package) => Some(*package),
            TypeData::ThisType(class) => Some(*class),
            TypeData::TypeRef { .. } | TypeData::AppliedType { .. } => {
                crate::queries::class_symbol(self, prefix)
            }
            TypeData::TermRef { .. } => {
                let term = self.resolve(prefix)?;
                if self.symbols[term].is_package() {
                    return Some(term);
                }
                let info = self.symbols.declared_type(term).ok()?;
                crate::queries::class_symbol(self, info)
            }
            _ => None,
        }
    }
}

/// The prefix under which `class` is referenced from outside.
pub(crate) fn class_type_ref(
    symbols: &SymbolArena,
    types: &TypeInterner,
    class: SymbolId,
) -> TypeId {
    let prefix = match symbols.get(class).and_then(|s| s.owner()) {
        Some(owner) if symbols[owner].is_package() => types.package_ref(owner),
        Some(owner) if symbols[owner].is_class() => types.this_type(owner),
        _ => TypeId::NO_PREFIX,
    };
    types.symbol_type_ref(prefix, class)
}

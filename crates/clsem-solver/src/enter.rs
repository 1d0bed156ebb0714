//! Entering declarations into the symbol table.
//!
//! `Enter` is the write-side helper shared by the well-known definitions and
//! by decoders that deliver fully formed declarations (the pickle decoder
//! contract). It pairs each stub with the type built for it and never
//! verifies: the caller runs `check_completed` over its unit.

use crate::context::class_type_ref;
use crate::intern::TypeInterner;
use clsem_binder::{Completion, Flags, SymbolArena, SymbolError, SymbolKind};
use clsem_common::{Interner, Name, SymbolId, TermName, TypeId, TypeName};

pub struct Enter<'a> {
    pub symbols: &'a mut SymbolArena,
    pub types: &'a TypeInterner,
    pub names: &'a Interner,
}

impl<'a> Enter<'a> {
    pub fn new(symbols: &'a mut SymbolArena, types: &'a TypeInterner, names: &'a Interner) -> Self {
        Enter {
            symbols,
            types,
            names,
        }
    }

    /// Walk (and create) a dotted package path from the root.
    pub fn package_path(&mut self, path: &str) -> Result<SymbolId, SymbolError> {
        let mut owner = self.symbols.root();
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            let name = Name::term(self.names.intern(segment));
            owner = self.symbols.get_or_create_package(name, owner)?;
        }
        Ok(owner)
    }

    pub fn class_type(&self, class: SymbolId) -> TypeId {
        class_type_ref(&*self.symbols, self.types, class)
    }

    pub fn class_stub(&mut self, owner: SymbolId, name: TypeName) -> Result<SymbolId, SymbolError> {
        self.symbols.create(Name::Type(name), owner, SymbolKind::Class)
    }

    /// Create and complete a non-generic class.
    pub fn class(
        &mut self,
        owner: SymbolId,
        name: &str,
        flags: Flags,
        parents: Vec<TypeId>,
    ) -> Result<SymbolId, SymbolError> {
        let class = self.class_stub(owner, TypeName::plain(self.names.intern(name)))?;
        self.complete_class(class, flags, Vec::new(), parents)?;
        Ok(class)
    }

    /// Create a generic class whose parents may mention its own parameters.
    ///
    /// Type parameters are stubs until `parents` has run, so both parents and
    /// bounds may refer to the class and its parameters.
    pub fn generic_class(
        &mut self,
        owner: SymbolId,
        name: &str,
        flags: Flags,
        type_params: &[&str],
        parents: impl FnOnce(&mut Enter<'_>, SymbolId, &[SymbolId]) -> Vec<TypeId>,
    ) -> Result<(SymbolId, Vec<SymbolId>), SymbolError> {
        let class = self.class_stub(owner, TypeName::plain(self.names.intern(name)))?;
        let params = self.type_param_stubs(class, type_params)?;
        let parent_types = parents(self, class, &params);
        for &param in &params {
            self.complete_type_param(param, Flags::empty(), None, None)?;
        }
        self.complete_class(class, flags, params.clone(), parent_types)?;
        Ok((class, params))
    }

    pub fn type_param_stubs(
        &mut self,
        owner: SymbolId,
        names: &[&str],
    ) -> Result<Vec<SymbolId>, SymbolError> {
        names
            .iter()
            .map(|name| {
                let name = Name::Type(TypeName::plain(self.names.intern(name)));
                self.symbols.create(name, owner, SymbolKind::ClassTypeParam)
            })
            .collect()
    }

    /// Complete a type parameter with its bounds; missing bounds default to
    /// `Nothing` and `Any`.
    pub fn complete_type_param(
        &mut self,
        param: SymbolId,
        flags: Flags,
        low: Option<TypeId>,
        high: Option<TypeId>,
    ) -> Result<(), SymbolError> {
        let low = low.unwrap_or_else(|| self.root_class_type("Nothing"));
        let high = high.unwrap_or_else(|| self.root_class_type("Any"));
        let bounds = self.types.bounds(low, high);
        self.symbols.complete(
            param,
            Completion::Typed {
                flags,
                declared_type: bounds,
            },
        )
    }

    pub fn complete_class(
        &mut self,
        class: SymbolId,
        flags: Flags,
        type_params: Vec<SymbolId>,
        parents: Vec<TypeId>,
    ) -> Result<(), SymbolError> {
        self.symbols.complete(
            class,
            Completion::Class {
                flags,
                type_params,
                parents,
            },
        )
    }

    /// Create and complete a term member with a given declared type.
    pub fn term(
        &mut self,
        owner: SymbolId,
        name: TermName,
        flags: Flags,
        declared_type: TypeId,
    ) -> Result<SymbolId, SymbolError> {
        let term = self.symbols.create(Name::Term(name), owner, SymbolKind::Term)?;
        self.symbols.complete(
            term,
            Completion::Typed {
                flags,
                declared_type,
            },
        )?;
        Ok(term)
    }

    /// Create and complete a method with a single parameter list.
    pub fn method(
        &mut self,
        owner: SymbolId,
        name: &str,
        flags: Flags,
        params: &[(&str, TypeId)],
        result: TypeId,
    ) -> Result<SymbolId, SymbolError> {
        let binder = self.types.fresh_binder();
        let names = params.iter().map(|(n, _)| self.names.intern(n)).collect();
        let types = params.iter().map(|(_, t)| *t).collect();
        let info = self.types.method(binder, names, types, result);
        let name = TermName::from_str(self.names, name);
        self.term(owner, name, flags | Flags::METHOD, info)
    }

    /// Create and complete a type member whose info is an alias of `target`.
    pub fn type_alias(
        &mut self,
        owner: SymbolId,
        name: &str,
        target: TypeId,
    ) -> Result<SymbolId, SymbolError> {
        let name = Name::Type(TypeName::plain(self.names.intern(name)));
        let member = self.symbols.create(name, owner, SymbolKind::TypeMember)?;
        let info = self.types.alias(target);
        self.symbols.complete(
            member,
            Completion::Typed {
                flags: Flags::empty(),
                declared_type: info,
            },
        )?;
        Ok(member)
    }

    /// `scala.<name>` as a class type. Used only for default bounds, after
    /// the definitions exist.
    fn root_class_type(&self, name: &str) -> TypeId {
        let scala = self.names.get("scala").and_then(|atom| {
            self.symbols
                .get_decls(self.symbols.root(), &Name::term(atom))
                .first()
                .copied()
        });
        let class = scala.and_then(|scala| {
            let atom = self.names.get(name)?;
            self.symbols.get_decl(scala, &Name::type_(atom))
        });
        match class {
            Some(class) => self.class_type(class),
            None => TypeId::NO_TYPE,
        }
    }
}

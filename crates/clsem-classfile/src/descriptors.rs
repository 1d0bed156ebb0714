//! Lowering descriptors and signatures into the type algebra.
//!
//! Binary class names are resolved by walking the package tree from the
//! root. A class that is already entered is referenced by symbol; one that
//! is not yet loaded is referenced by name under its package, and resolves
//! once it arrives. Raw uses of generic classes stay bare references.

use crate::error::{DecodeError, DecodeErrorKind};
use crate::options::LoaderOptions;
use crate::signatures::{
    BaseType, ClassSig, ClassTypeSig, Grammar, MethodSig, SigCursor, SigType, SyntaxError,
    TypeArg, TypeParamSig,
};
use clsem_common::{Atom, Name, SymbolId, TypeId};
use clsem_solver::{BinderId, Context};
use tracing::trace;

/// What a type variable name refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeVarBinding {
    Class(SymbolId),
    Method { binder: BinderId, index: u32 },
}

/// Type variables in scope, innermost last.
#[derive(Clone, Debug, Default)]
pub struct TypeScope {
    vars: Vec<(String, TypeVarBinding)>,
}

impl TypeScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: impl Into<String>, binding: TypeVarBinding) {
        self.vars.push((name.into(), binding));
    }

    pub fn lookup(&self, name: &str) -> Option<TypeVarBinding> {
        self.vars
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, binding)| *binding)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    fn truncate(&mut self, len: usize) {
        self.vars.truncate(len);
    }
}

/// The static shape of the symbol whose type is decoded.
#[derive(Clone, Copy, Debug)]
pub enum MemberShape<'n> {
    Field,
    /// Parameter names, if known; missing names become `x$<i>`.
    Method { param_names: &'n [Atom] },
}

/// Decodes descriptors and signatures for the members of one class.
pub struct TypeDecoder<'a> {
    ctx: &'a mut Context,
    options: &'a LoaderOptions,
    scope: TypeScope,
}

impl<'a> TypeDecoder<'a> {
    pub fn new(ctx: &'a mut Context, options: &'a LoaderOptions) -> Self {
        Self::with_scope(ctx, options, TypeScope::new())
    }

    pub fn with_scope(ctx: &'a mut Context, options: &'a LoaderOptions, scope: TypeScope) -> Self {
        TypeDecoder {
            ctx,
            options,
            scope,
        }
    }

    pub fn scope_mut(&mut self) -> &mut TypeScope {
        &mut self.scope
    }

    pub fn ctx(&self) -> &Context {
        &*self.ctx
    }

    pub fn ctx_mut(&mut self) -> &mut Context {
        &mut *self.ctx
    }

    fn fail(&self, symbol: SymbolId, raw: &str, error: SyntaxError) -> DecodeError {
        DecodeError {
            symbol: self.ctx.full_name(symbol),
            raw: raw.to_owned(),
            position: error.position,
            kind: error.kind,
        }
    }

    /// Decode the type of `symbol` from its descriptor or signature.
    ///
    /// Fields get their value type wrapped in `ExprType`; methods get a
    /// `MethodType`, wrapped in a `PolyType` when the signature declares type
    /// parameters.
    pub fn decode(
        &mut self,
        symbol: SymbolId,
        raw: &str,
        grammar: Grammar,
        shape: MemberShape<'_>,
    ) -> Result<TypeId, DecodeError> {
        let cursor = SigCursor::new(raw, grammar);
        let result = match shape {
            MemberShape::Field => cursor
                .parse_field()
                .and_then(|tp| self.lower(&tp))
                .map(|tp| self.ctx.types.expr(tp)),
            MemberShape::Method { param_names } => cursor
                .parse_method()
                .and_then(|sig| self.lower_method(&sig, param_names)),
        };
        let tp = result.map_err(|e| self.fail(symbol, raw, e))?;
        trace!(symbol = ?symbol, raw, "decoded member type");
        Ok(tp)
    }

    /// Parse a class signature for `class`. Lowering happens once its type
    /// parameters are in scope.
    pub fn parse_class_signature(
        &self,
        class: SymbolId,
        raw: &str,
    ) -> Result<ClassSig, DecodeError> {
        SigCursor::new(raw, Grammar::Signature)
            .parse_class()
            .map_err(|e| self.fail(class, raw, e))
    }

    pub fn class_type(
        &mut self,
        symbol: SymbolId,
        raw: &str,
        sig: &ClassTypeSig,
    ) -> Result<TypeId, DecodeError> {
        self.lower_class(sig).map_err(|e| self.fail(symbol, raw, e))
    }

    /// The reference to a class given by its binary name.
    pub fn class_ref(
        &mut self,
        symbol: SymbolId,
        binary_name: &str,
    ) -> Result<TypeId, DecodeError> {
        self.resolve_class(binary_name, 0)
            .map_err(|e| self.fail(symbol, binary_name, e))
    }

    /// The upper bound of a type parameter: its bounds intersected, or
    /// `Object` when it has none.
    pub fn upper_bound(
        &mut self,
        symbol: SymbolId,
        raw: &str,
        param: &TypeParamSig,
    ) -> Result<TypeId, DecodeError> {
        self.lower_bound(param).map_err(|e| self.fail(symbol, raw, e))
    }

    // =========================================================================
    // Lowering
    // =========================================================================

    fn lower(&mut self, tp: &SigType) -> Result<TypeId, SyntaxError> {
        let defn = &self.ctx.defn;
        Ok(match tp {
            SigType::Base(base) => match base {
                BaseType::Byte => defn.byte_type,
                BaseType::Char => defn.char_type,
                BaseType::Double => defn.double_type,
                BaseType::Float => defn.float_type,
                BaseType::Int => defn.int_type,
                BaseType::Long => defn.long_type,
                BaseType::Short => defn.short_type,
                BaseType::Boolean => defn.boolean_type,
                BaseType::Void => defn.unit_type,
            },
            SigType::Array(elem) => {
                let array = defn.array_tycon;
                let elem = self.lower(elem)?;
                self.ctx.types.applied(array, vec![elem])
            }
            SigType::Class(class) => self.lower_class(class)?,
            SigType::TypeVar { name, position } => match self.scope.lookup(name) {
                Some(TypeVarBinding::Class(param)) => self.ctx.types.param_type_ref(param),
                Some(TypeVarBinding::Method { binder, index }) => {
                    self.ctx.types.param_ref(binder, index)
                }
                None => {
                    return Err(SyntaxError {
                        position: *position,
                        kind: DecodeErrorKind::UnknownTypeVariable(name.clone()),
                    });
                }
            },
        })
    }

    fn lower_class(&mut self, class: &ClassTypeSig) -> Result<TypeId, SyntaxError> {
        let tycon = self.resolve_class(&class.binary_name, class.position)?;
        if class.args.is_empty() {
            return Ok(tycon);
        }
        let args = class
            .args
            .iter()
            .map(|arg| self.lower_arg(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.ctx.types.applied(tycon, args))
    }

    fn lower_arg(&mut self, arg: &TypeArg) -> Result<TypeId, SyntaxError> {
        let nothing = self.ctx.defn.nothing_type;
        let object = self.ctx.defn.object_type;
        Ok(match arg {
            TypeArg::Star => self.ctx.types.wildcard(nothing, object),
            TypeArg::Exact(tp) => self.lower(tp)?,
            TypeArg::Extends(tp) => {
                let high = self.lower(tp)?;
                self.ctx.types.wildcard(nothing, high)
            }
            TypeArg::Super(tp) => {
                let low = self.lower(tp)?;
                self.ctx.types.wildcard(low, object)
            }
        })
    }

    fn lower_bound(&mut self, param: &TypeParamSig) -> Result<TypeId, SyntaxError> {
        let mut bounds = param.bounds.iter();
        let Some(first) = bounds.next() else {
            return Ok(self.ctx.defn.object_type);
        };
        let mut high = self.lower(first)?;
        for bound in bounds {
            let next = self.lower(bound)?;
            high = self.ctx.types.and(high, next);
        }
        Ok(high)
    }

    fn lower_method(
        &mut self,
        sig: &MethodSig,
        param_names: &[Atom],
    ) -> Result<TypeId, SyntaxError> {
        let mark = self.scope.len();
        let result = self.lower_method_in_scope(sig, param_names);
        self.scope.truncate(mark);
        result
    }

    fn lower_method_in_scope(
        &mut self,
        sig: &MethodSig,
        param_names: &[Atom],
    ) -> Result<TypeId, SyntaxError> {
        let poly_binder = (!sig.type_params.is_empty()).then(|| self.ctx.types.fresh_binder());
        if let Some(binder) = poly_binder {
            for (index, param) in sig.type_params.iter().enumerate() {
                self.scope.bind(
                    param.name.clone(),
                    TypeVarBinding::Method {
                        binder,
                        index: index as u32,
                    },
                );
            }
        }

        let param_types = sig
            .params
            .iter()
            .map(|tp| self.lower(tp))
            .collect::<Result<Vec<_>, _>>()?;
        let result = self.lower(&sig.result)?;
        // Extra leading names belong to parameters the signature omits
        // (outer instances, enum name and ordinal).
        let skip = param_names.len().saturating_sub(param_types.len());
        let names = (0..param_types.len())
            .map(|i| match param_names.get(skip + i) {
                Some(&atom) if !atom.is_none() => atom,
                _ => self.ctx.intern(&format!("x${i}")),
            })
            .collect();
        let binder = self.ctx.types.fresh_binder();
        let method = self.ctx.types.method(binder, names, param_types, result);

        let Some(poly_binder) = poly_binder else {
            return Ok(method);
        };
        let nothing = self.ctx.defn.nothing_type;
        let mut bounds = Vec::with_capacity(sig.type_params.len());
        let mut names = Vec::with_capacity(sig.type_params.len());
        for param in &sig.type_params {
            let high = self.lower_bound(param)?;
            bounds.push(self.ctx.types.bounds(nothing, high));
            names.push(self.ctx.intern(&param.name));
        }
        Ok(self.ctx.types.poly(poly_binder, names, bounds, method))
    }

    /// Walk `a/b/C` to package `a.b` and reference `C` in it.
    fn resolve_class(&mut self, binary_name: &str, position: usize) -> Result<TypeId, SyntaxError> {
        let unresolvable = |path: &str| SyntaxError {
            position,
            kind: DecodeErrorKind::UnresolvablePackage(path.replace('/', ".")),
        };
        let (package_path, simple) = match binary_name.rsplit_once('/') {
            Some((package, simple)) => (Some(package), simple),
            None => (None, binary_name),
        };
        if simple.is_empty() {
            return Err(SyntaxError {
                position,
                kind: DecodeErrorKind::UnexpectedEnd,
            });
        }

        let mut package = self.ctx.symbols.root();
        if let Some(path) = package_path {
            let mut end = 0;
            for (i, segment) in path.split('/').enumerate() {
                end += segment.len() + usize::from(i > 0);
                if segment.is_empty() {
                    return Err(unresolvable(&path[..end]));
                }
                let name = Name::term(self.ctx.intern(segment));
                let existing = self
                    .ctx
                    .symbols
                    .get_decls(package, &name)
                    .iter()
                    .copied()
                    .find(|&id| self.ctx.symbols[id].is_package());
                package = match existing {
                    Some(existing) => existing,
                    None if self.options.create_missing_packages => self
                        .ctx
                        .symbols
                        .get_or_create_package(name, package)
                        .map_err(|e| SyntaxError {
                            position,
                            kind: DecodeErrorKind::Symbol(e),
                        })?,
                    None => return Err(unresolvable(&path[..end])),
                };
            }
        }

        let name = Name::type_(self.ctx.intern(simple));
        let class = self
            .ctx
            .symbols
            .get_decls(package, &name)
            .iter()
            .copied()
            .find(|&id| self.ctx.symbols[id].is_class());
        Ok(match class {
            Some(class) => self.ctx.class_type(class),
            None => {
                let prefix = self.ctx.types.package_ref(package);
                self.ctx.types.named_type_ref(prefix, name)
            }
        })
    }
}

/// Decode a field descriptor with no type variables in scope.
pub fn decode_field_descriptor(
    ctx: &mut Context,
    options: &LoaderOptions,
    symbol: SymbolId,
    raw: &str,
) -> Result<TypeId, DecodeError> {
    TypeDecoder::new(ctx, options).decode(symbol, raw, Grammar::Descriptor, MemberShape::Field)
}

/// Decode a method descriptor; missing parameter names become `x$<i>`.
pub fn decode_method_descriptor(
    ctx: &mut Context,
    options: &LoaderOptions,
    symbol: SymbolId,
    raw: &str,
    param_names: &[Atom],
) -> Result<TypeId, DecodeError> {
    TypeDecoder::new(ctx, options).decode(
        symbol,
        raw,
        Grammar::Descriptor,
        MemberShape::Method { param_names },
    )
}

#[cfg(test)]
#[path = "tests/descriptors_tests.rs"]
mod tests;

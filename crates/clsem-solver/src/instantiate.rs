//! Substitution and instantiation.
//!
//! A `TypeSubstitution` maps either binder parameters (`ParamRef`) or class
//! type parameter symbols to replacement types. Application rebuilds only the
//! parts of a type that actually change and is capture-avoiding: a nested
//! binder that rebinds a substituted binder identity is left untouched.

use crate::context::Context;
use crate::error::TypeError;
use crate::types::{BinderId, Designator, TypeData};
use clsem_common::limits::MAX_SUBSTITUTION_DEPTH;
use clsem_common::{SymbolId, TypeId};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubstKey {
    Param(BinderId, u32),
    Symbol(SymbolId),
}

#[derive(Clone, Debug, Default)]
pub struct TypeSubstitution {
    map: FxHashMap<SubstKey, TypeId>,
    binders: FxHashSet<BinderId>,
}

impl TypeSubstitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Substitute the parameters of `binder` by `args`, positionally.
    pub fn for_binder(binder: BinderId, args: &[TypeId]) -> Self {
        let mut subst = Self::new();
        for (index, &arg) in args.iter().enumerate() {
            subst.insert(SubstKey::Param(binder, index as u32), arg);
        }
        subst
    }

    /// Substitute class type parameter symbols by `args`, positionally.
    pub fn for_class_params(params: &[SymbolId], args: &[TypeId]) -> Self {
        let mut subst = Self::new();
        for (&param, &arg) in params.iter().zip(args) {
            subst.insert(SubstKey::Symbol(param), arg);
        }
        subst
    }

    pub fn insert(&mut self, key: SubstKey, replacement: TypeId) {
        if let SubstKey::Param(binder, _) = key {
            self.binders.insert(binder);
        }
        self.map.insert(key, replacement);
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn get(&self, key: SubstKey) -> Option<TypeId> {
        self.map.get(&key).copied()
    }

    /// Substitute into `tp`. Types nested deeper than
    /// `MAX_SUBSTITUTION_DEPTH` are rejected rather than left partially
    /// substituted.
    pub fn apply(&self, ctx: &Context, tp: TypeId) -> Result<TypeId, TypeError> {
        if self.is_empty() {
            return Ok(tp);
        }
        let mut substituter = Substituter {
            ctx,
            subst: self,
            cache: FxHashMap::default(),
            depth: 0,
        };
        substituter.apply(tp)
    }
}

struct Substituter<'a> {
    ctx: &'a Context,
    subst: &'a TypeSubstitution,
    cache: FxHashMap<TypeId, TypeId>,
    depth: usize,
}

impl Substituter<'_> {
    fn apply(&mut self, tp: TypeId) -> Result<TypeId, TypeError> {
        if let Some(&done) = self.cache.get(&tp) {
            return Ok(done);
        }
        if self.depth >= MAX_SUBSTITUTION_DEPTH {
            trace!(?tp, "substitution depth limit reached");
            return Err(TypeError::DepthExceeded {
                what: "substitution",
                limit: MAX_SUBSTITUTION_DEPTH,
            });
        }
        self.depth += 1;
        let result = self.rebuild(tp);
        self.depth -= 1;
        let result = result?;
        self.cache.insert(tp, result);
        Ok(result)
    }

    fn apply_all(&mut self, types: &[TypeId]) -> Result<Vec<TypeId>, TypeError> {
        types.iter().map(|&t| self.apply(t)).collect()
    }

    fn rebuild(&mut self, tp: TypeId) -> Result<TypeId, TypeError> {
        let ctx = self.ctx;
        let data = ctx.types.data(tp);
        let types = &ctx.types;
        let rebuilt = match &*data {
            TypeData::ParamRef { binder, index } => self
                .subst
                .get(SubstKey::Param(*binder, *index))
                .unwrap_or(tp),
            TypeData::TypeRef {
                designator: Designator::Symbol(symbol),
                ..
            } if self.subst.get(SubstKey::Symbol(*symbol)).is_some() => {
                self.subst.get(SubstKey::Symbol(*symbol)).unwrap_or(tp)
            }
            TypeData::TypeRef { prefix, designator } => {
                let prefix = self.apply(*prefix)?;
                types.intern(TypeData::TypeRef {
                    prefix,
                    designator: designator.clone(),
                })
            }
            TypeData::TermRef { prefix, designator } => {
                let prefix = self.apply(*prefix)?;
                types.intern(TypeData::TermRef {
                    prefix,
                    designator: designator.clone(),
                })
            }
            TypeData::AppliedType { tycon, args } => {
                let tycon = self.apply(*tycon)?;
                let args = self.apply_all(args)?;
                types.applied(tycon, args)
            }
            TypeData::AndType(left, right) => {
                let (left, right) = (self.apply(*left)?, self.apply(*right)?);
                types.and(left, right)
            }
            TypeData::OrType(left, right) => {
                let (left, right) = (self.apply(*left)?, self.apply(*right)?);
                types.or(left, right)
            }
            TypeData::ExprType(result) => {
                let result = self.apply(*result)?;
                types.expr(result)
            }
            TypeData::MethodType {
                binder,
                param_names,
                param_types,
                result,
            } => {
                if self.subst.binders.contains(binder) {
                    return Ok(tp);
                }
                let param_types = self.apply_all(param_types)?;
                let result = self.apply(*result)?;
                types.method(*binder, param_names.clone(), param_types, result)
            }
            TypeData::PolyType {
                binder,
                param_names,
                bounds,
                result,
            } => {
                if self.subst.binders.contains(binder) {
                    return Ok(tp);
                }
                let bounds = self.apply_all(bounds)?;
                let result = self.apply(*result)?;
                types.poly(*binder, param_names.clone(), bounds, result)
            }
            TypeData::TypeLambda {
                binder,
                param_names,
                bounds,
                result,
            } => {
                if self.subst.binders.contains(binder) {
                    return Ok(tp);
                }
                let bounds = self.apply_all(bounds)?;
                let result = self.apply(*result)?;
                types.type_lambda(*binder, param_names.clone(), bounds, result)
            }
            TypeData::WildcardTypeBounds(bounds) => {
                let bounds = self.apply(*bounds)?;
                types.intern(TypeData::WildcardTypeBounds(bounds))
            }
            TypeData::TypeBounds { low, high } => {
                let (low, high) = (self.apply(*low)?, self.apply(*high)?);
                types.bounds(low, high)
            }
            TypeData::TypeAlias(target) => {
                let target = self.apply(*target)?;
                types.alias(target)
            }
            TypeData::NoType
            | TypeData::NoPrefix
            | TypeData::PackageRef(_)
            | TypeData::ThisType(_)
            | TypeData::ConstantType(_) => tp,
        };
        Ok(rebuilt)
    }
}

/// Apply a poly type (or type lambda) to type arguments, yielding the next
/// type of the curried chain.
pub fn instantiate(ctx: &Context, poly: TypeId, args: &[TypeId]) -> Result<TypeId, TypeError> {
    match &*ctx.types.data(poly) {
        TypeData::PolyType {
            binder,
            param_names,
            result,
            ..
        }
        | TypeData::TypeLambda {
            binder,
            param_names,
            result,
            ..
        } => {
            if param_names.len() != args.len() {
                return Err(TypeError::ArityMismatch {
                    expected: param_names.len(),
                    found: args.len(),
                });
            }
            TypeSubstitution::for_binder(*binder, args).apply(ctx, *result)
        }
        _ => Err(TypeError::NotApplicable(poly)),
    }
}

/// The result of applying a method type to arguments of the given types.
/// Dependent parameter references in the result are replaced by the
/// argument types.
pub fn instantiate_method(
    ctx: &Context,
    method: TypeId,
    arg_types: &[TypeId],
) -> Result<TypeId, TypeError> {
    match &*ctx.types.data(method) {
        TypeData::MethodType {
            binder,
            param_types,
            result,
            ..
        } => {
            if param_types.len() != arg_types.len() {
                return Err(TypeError::ArityMismatch {
                    expected: param_types.len(),
                    found: arg_types.len(),
                });
            }
            TypeSubstitution::for_binder(*binder, arg_types).apply(ctx, *result)
        }
        _ => Err(TypeError::NotApplicable(method)),
    }
}

/// Replace `ParamRef(from, i)` by `ParamRef(to, i)` for `i < arity`.
pub fn rename_binder(
    ctx: &Context,
    from: BinderId,
    to: BinderId,
    arity: usize,
) -> TypeSubstitution {
    let args: Vec<TypeId> = (0..arity as u32)
        .map(|index| ctx.types.param_ref(to, index))
        .collect();
    TypeSubstitution::for_binder(from, &args)
}

#[cfg(test)]
#[path = "tests/instantiate_tests.rs"]
mod tests;

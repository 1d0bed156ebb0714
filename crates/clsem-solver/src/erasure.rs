//! Erasure and erased signatures.
//!
//! Erasure maps a type to the JVM class (plus array dimensions) that
//! represents it at run time. Signatures built from erasures are what signed
//! names carry to tell overloads apart.

use crate::context::Context;
use crate::queries::{upper_bound, widen_dealias};
use crate::types::{BinderId, TypeData};
use clsem_binder::SymbolKind;
use clsem_common::limits::MAX_SUBSTITUTION_DEPTH;
use clsem_common::{ErasedTypeRef, ParamSig, Signature, TypeId};

/// Bounds of the binders enclosing the type being erased.
type BinderEnv = Vec<(BinderId, Vec<TypeId>)>;

pub fn erase(ctx: &Context, tp: TypeId) -> ErasedTypeRef {
    erase_in(ctx, tp, &mut Vec::new(), 0)
}

fn object(ctx: &Context) -> ErasedTypeRef {
    ErasedTypeRef::class(ctx.fully_qualified_name(ctx.defn.object_class))
}

fn erase_in(ctx: &Context, tp: TypeId, env: &mut BinderEnv, depth: usize) -> ErasedTypeRef {
    if depth > MAX_SUBSTITUTION_DEPTH {
        return object(ctx);
    }
    let tp = widen_dealias(ctx, tp);
    match &*ctx.types.data(tp) {
        TypeData::TypeRef { .. } => {
            let Some(symbol) = ctx.resolve(tp) else {
                return object(ctx);
            };
            match ctx.symbols[symbol].kind() {
                SymbolKind::Class if ctx.defn.erases_to_object(symbol) => object(ctx),
                SymbolKind::Class => ErasedTypeRef::class(ctx.fully_qualified_name(symbol)),
                SymbolKind::ClassTypeParam | SymbolKind::TypeMember => {
                    match ctx
                        .symbols
                        .declared_type(symbol)
                        .ok()
                        .and_then(|info| upper_bound(ctx, info))
                    {
                        Some(bound) => erase_in(ctx, bound, env, depth + 1),
                        None => object(ctx),
                    }
                }
                _ => object(ctx),
            }
        }
        TypeData::AppliedType { tycon, args } => {
            if ctx.resolve(*tycon) == Some(ctx.defn.array_class) && args.len() == 1 {
                erase_in(ctx, args[0], env, depth + 1).array_of()
            } else {
                erase_in(ctx, *tycon, env, depth + 1)
            }
        }
        TypeData::ParamRef { binder, index } => {
            let bound = env
                .iter()
                .rev()
                .find(|(b, _)| b == binder)
                .and_then(|(_, bounds)| bounds.get(*index as usize).copied())
                .and_then(|bounds| upper_bound(ctx, bounds));
            match bound {
                Some(bound) => erase_in(ctx, bound, env, depth + 1),
                None => object(ctx),
            }
        }
        TypeData::AndType(left, _) => erase_in(ctx, *left, env, depth + 1),
        TypeData::WildcardTypeBounds(bounds) | TypeData::TypeAlias(bounds) => {
            erase_in(ctx, *bounds, env, depth + 1)
        }
        TypeData::TypeBounds { high, .. } => erase_in(ctx, *high, env, depth + 1),
        TypeData::ExprType(result) => erase_in(ctx, *result, env, depth + 1),
        TypeData::PolyType {
            binder,
            bounds,
            result,
            ..
        }
        | TypeData::TypeLambda {
            binder,
            bounds,
            result,
            ..
        } => {
            env.push((*binder, bounds.clone()));
            let erased = erase_in(ctx, *result, env, depth + 1);
            env.pop();
            erased
        }
        TypeData::MethodType { result, .. } => erase_in(ctx, *result, env, depth + 1),
        TypeData::ThisType(class) => ErasedTypeRef::class(ctx.fully_qualified_name(*class)),
        TypeData::OrType(..)
        | TypeData::ConstantType(_)
        | TypeData::TermRef { .. }
        | TypeData::PackageRef(_)
        | TypeData::NoType
        | TypeData::NoPrefix => object(ctx),
    }
}

/// The erased signature of a declared type: one entry per type-parameter
/// clause and per term parameter, plus the erased final result.
pub fn signature_of(ctx: &Context, info: TypeId) -> Signature {
    let mut params = Vec::new();
    let mut env = BinderEnv::new();
    let mut current = info;
    for _ in 0..MAX_SUBSTITUTION_DEPTH {
        match &*ctx.types.data(current) {
            TypeData::PolyType {
                binder,
                bounds,
                result,
                ..
            } => {
                params.push(ParamSig::TypeLen(bounds.len() as u32));
                env.push((*binder, bounds.clone()));
                current = *result;
            }
            TypeData::MethodType {
                param_types,
                result,
                ..
            } => {
                for &param in param_types {
                    params.push(ParamSig::Term(erase_in(ctx, param, &mut env, 0)));
                }
                current = *result;
            }
            _ => break,
        }
    }
    Signature {
        params,
        result: erase_in(ctx, current, &mut env, 0),
    }
}

#[cfg(test)]
#[path = "tests/erasure_tests.rs"]
mod tests;

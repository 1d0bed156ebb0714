//! Base types and as-seen-from.
//!
//! `base_type(C[A], P)` walks the parents of `C` with `C`'s type parameters
//! replaced by `A`, until it reaches the parent whose class is `P`. This is
//! what lets a member of `Box[T]` selected on `Box[Int]` be seen as a member
//! over `Int`.

use crate::context::Context;
use crate::error::TypeError;
use crate::instantiate::TypeSubstitution;
use crate::queries::{upper_bound, widen_dealias};
use crate::types::TypeData;
use clsem_binder::SymbolKind;
use clsem_common::limits::MAX_HIERARCHY_DEPTH;
use clsem_common::{SymbolId, TypeId};

/// The class of a value type together with its type arguments.
pub fn class_and_args(ctx: &Context, tp: TypeId) -> Option<(SymbolId, Vec<TypeId>)> {
    let tp = widen_dealias(ctx, tp);
    match &*ctx.types.data(tp) {
        TypeData::TypeRef { .. } => {
            let symbol = ctx.resolve(tp)?;
            match ctx.symbols[symbol].kind() {
                SymbolKind::Class => Some((symbol, Vec::new())),
                SymbolKind::ClassTypeParam | SymbolKind::TypeMember => {
                    let bound = upper_bound(ctx, ctx.symbols.declared_type(symbol).ok()?)?;
                    class_and_args(ctx, bound)
                }
                _ => None,
            }
        }
        TypeData::AppliedType { tycon, args } => {
            let (class, _) = class_and_args(ctx, *tycon)?;
            Some((class, args.clone()))
        }
        TypeData::ThisType(class) => {
            let params = ctx.symbols.class_type_params(*class).ok()?;
            let args = params.iter().map(|&p| ctx.types.param_type_ref(p)).collect();
            Some((*class, args))
        }
        _ => None,
    }
}

/// The ancestor type of `tp` whose class is `class`, or `None` if `class`
/// is not an ancestor.
pub fn base_type(ctx: &Context, tp: TypeId, class: SymbolId) -> Option<TypeId> {
    base_type_at_depth(ctx, tp, class, 0)
}

fn base_type_at_depth(ctx: &Context, tp: TypeId, class: SymbolId, depth: usize) -> Option<TypeId> {
    if depth > MAX_HIERARCHY_DEPTH {
        return None;
    }
    let tp = widen_dealias(ctx, tp);
    if let TypeData::AndType(left, right) = &*ctx.types.data(tp) {
        return base_type_at_depth(ctx, *left, class, depth + 1)
            .or_else(|| base_type_at_depth(ctx, *right, class, depth + 1));
    }
    let (own, args) = class_and_args(ctx, tp)?;
    if own == class {
        return Some(tp);
    }
    let params = ctx.symbols.class_type_params(own).ok()?;
    let subst = if !args.is_empty() && args.len() == params.len() {
        TypeSubstitution::for_class_params(params, &args)
    } else {
        TypeSubstitution::new()
    };
    ctx.symbols.parents(own).ok()?.iter().find_map(|&parent| {
        base_type_at_depth(ctx, subst.apply(ctx, parent).ok()?, class, depth + 1)
    })
}

/// `tp`, a type found in `owner`, as seen from a value of type `prefix`:
/// `owner`'s class type parameters are replaced by the arguments `prefix`
/// gives them. Raw or unrelated prefixes leave `tp` unchanged.
pub fn as_seen_from(
    ctx: &Context,
    tp: TypeId,
    owner: SymbolId,
    prefix: TypeId,
) -> Result<TypeId, TypeError> {
    let Ok(params) = ctx.symbols.class_type_params(owner) else {
        return Ok(tp);
    };
    if params.is_empty() {
        return Ok(tp);
    }
    let Some(base) = base_type(ctx, prefix, owner) else {
        return Ok(tp);
    };
    match &*ctx.types.data(base) {
        TypeData::AppliedType { args, .. } if args.len() == params.len() => {
            TypeSubstitution::for_class_params(params, args).apply(ctx, tp)
        }
        _ => Ok(tp),
    }
}

#[cfg(test)]
#[path = "tests/base_types_tests.rs"]
mod tests;

//! Structural queries over the type algebra.
//!
//! These are predicates and projections: they never fail. A reference that
//! cannot be resolved, or a shape that does not match, is simply `false` or
//! `None`.

use crate::context::Context;
use crate::types::TypeData;
use clsem_binder::SymbolKind;
use clsem_common::limits::{MAX_DEALIAS_STEPS, MAX_WIDEN_STEPS};
use clsem_common::{SymbolId, TypeId};
use smallvec::SmallVec;
use tracing::trace;

/// A predicate over types, for `is_applied` and friends.
pub type TypePredicate<'p> = &'p dyn Fn(TypeId) -> bool;

/// Strip `ExprType`s and singleton types until reaching a type fit for
/// reference comparison.
///
/// Term references widen to their symbol's declared type as seen from the
/// prefix, `C.this` to `C`, constants to their class. Methodic types are
/// fixed points. The walk is bounded, so `widen` is total.
pub fn widen(ctx: &Context, tp: TypeId) -> TypeId {
    let mut current = tp;
    for _ in 0..MAX_WIDEN_STEPS {
        let next = match &*ctx.types.data(current) {
            TypeData::ExprType(result) => *result,
            TypeData::ConstantType(constant) => ctx.defn.constant_class_type(constant),
            TypeData::ThisType(class) => ctx.class_type(*class),
            TypeData::TermRef { prefix, .. } => match widen_term_ref(ctx, current, *prefix) {
                Some(next) => next,
                None => return current,
            },
            _ => return current,
        };
        current = next;
    }
    trace!(?tp, "widen step limit reached");
    current
}

fn widen_term_ref(ctx: &Context, term_ref: TypeId, prefix: TypeId) -> Option<TypeId> {
    let symbol = ctx.resolve(term_ref)?;
    let entry = ctx.symbols.get(symbol)?;
    if entry.kind() != SymbolKind::Term {
        return None;
    }
    let info = ctx.symbols.declared_type(symbol).ok()?;
    match entry.owner() {
        Some(owner) if ctx.symbols[owner].is_class() && prefix != TypeId::NO_PREFIX => {
            crate::base_types::as_seen_from(ctx, info, owner, prefix).ok()
        }
        _ => Some(info),
    }
}

/// Unfold references to type aliases.
pub fn dealias(ctx: &Context, tp: TypeId) -> TypeId {
    let mut current = tp;
    for _ in 0..MAX_DEALIAS_STEPS {
        let TypeData::TypeRef { .. } = &*ctx.types.data(current) else {
            return current;
        };
        let Some(symbol) = ctx.resolve(current) else {
            return current;
        };
        if ctx.symbols[symbol].kind() != SymbolKind::TypeMember {
            return current;
        }
        let Ok(info) = ctx.symbols.declared_type(symbol) else {
            return current;
        };
        match &*ctx.types.data(info) {
            TypeData::TypeAlias(target) => current = *target,
            _ => return current,
        }
    }
    current
}

/// `widen` followed by `dealias`, repeated until stable.
pub fn widen_dealias(ctx: &Context, tp: TypeId) -> TypeId {
    let mut current = tp;
    for _ in 0..MAX_DEALIAS_STEPS {
        let next = dealias(ctx, widen(ctx, current));
        if next == current {
            break;
        }
        current = next;
    }
    current
}

/// Whether `tp` denotes exactly `symbol`, through widening and aliases.
pub fn is_ref(ctx: &Context, tp: TypeId, symbol: SymbolId) -> bool {
    let tp = widen_dealias(ctx, tp);
    match &*ctx.types.data(tp) {
        TypeData::TypeRef { .. } | TypeData::PackageRef(_) => ctx.resolve(tp) == Some(symbol),
        _ => false,
    }
}

/// Whether `tp` widens to `C[A1, ..., An]` with `tycon(C)` and every
/// `args[i](Ai)` holding. A different argument count is `false`.
pub fn is_applied(
    ctx: &Context,
    tp: TypeId,
    tycon: TypePredicate<'_>,
    args: &[TypePredicate<'_>],
) -> bool {
    let tp = widen_dealias(ctx, tp);
    let TypeData::AppliedType {
        tycon: actual,
        args: actual_args,
    } = &*ctx.types.data(tp)
    else {
        return false;
    };
    actual_args.len() == args.len()
        && tycon(*actual)
        && actual_args.iter().zip(args).all(|(&arg, pred)| pred(arg))
}

/// The class a value type denotes: `C`, `C[...]`, `C.this`, or the upper
/// bound's class for type parameters.
pub fn class_symbol(ctx: &Context, tp: TypeId) -> Option<SymbolId> {
    let mut current = widen_dealias(ctx, tp);
    for _ in 0..MAX_WIDEN_STEPS {
        let next = match &*ctx.types.data(current) {
            TypeData::TypeRef { .. } => {
                let symbol = ctx.resolve(current)?;
                match ctx.symbols[symbol].kind() {
                    SymbolKind::Class => return Some(symbol),
                    SymbolKind::ClassTypeParam | SymbolKind::TypeMember => {
                        upper_bound(ctx, ctx.symbols.declared_type(symbol).ok()?)?
                    }
                    _ => return None,
                }
            }
            TypeData::AppliedType { tycon, .. } => *tycon,
            TypeData::ThisType(class) => return Some(*class),
            TypeData::AndType(left, _) => *left,
            _ => return None,
        };
        current = widen_dealias(ctx, next);
    }
    None
}

/// The high bound of a bounds or alias info.
pub fn upper_bound(ctx: &Context, info: TypeId) -> Option<TypeId> {
    match &*ctx.types.data(info) {
        TypeData::TypeBounds { high, .. } => Some(*high),
        TypeData::TypeAlias(target) => Some(*target),
        TypeData::WildcardTypeBounds(bounds) => upper_bound(ctx, *bounds),
        _ => None,
    }
}

/// Flattened parts of a widened intersection.
pub fn and_parts(ctx: &Context, tp: TypeId) -> SmallVec<[TypeId; 4]> {
    let mut parts = SmallVec::new();
    collect_parts(ctx, tp, true, &mut parts);
    parts
}

/// Flattened parts of a widened union.
pub fn or_parts(ctx: &Context, tp: TypeId) -> SmallVec<[TypeId; 4]> {
    let mut parts = SmallVec::new();
    collect_parts(ctx, tp, false, &mut parts);
    parts
}

fn collect_parts(ctx: &Context, tp: TypeId, and: bool, out: &mut SmallVec<[TypeId; 4]>) {
    let tp = widen_dealias(ctx, tp);
    match &*ctx.types.data(tp) {
        TypeData::AndType(left, right) if and => {
            collect_parts(ctx, *left, and, out);
            collect_parts(ctx, *right, and, out);
        }
        TypeData::OrType(left, right) if !and => {
            collect_parts(ctx, *left, and, out);
            collect_parts(ctx, *right, and, out);
        }
        _ => out.push(tp),
    }
}

/// Whether `tp` is an intersection whose flattened parts satisfy `parts`
/// pairwise, in order.
pub fn is_intersection_of(ctx: &Context, tp: TypeId, parts: &[TypePredicate<'_>]) -> bool {
    let actual = and_parts(ctx, tp);
    actual.len() >= 2 && matches_pairwise(&actual, parts)
}

pub fn is_union_of(ctx: &Context, tp: TypeId, parts: &[TypePredicate<'_>]) -> bool {
    let actual = or_parts(ctx, tp);
    actual.len() >= 2 && matches_pairwise(&actual, parts)
}

fn matches_pairwise(actual: &[TypeId], preds: &[TypePredicate<'_>]) -> bool {
    actual.len() == preds.len() && actual.iter().zip(preds).all(|(&tp, pred)| pred(tp))
}

/// The terminal result of a methodic chain (or of an `ExprType`).
pub fn final_result_type(ctx: &Context, tp: TypeId) -> TypeId {
    let mut current = tp;
    for _ in 0..MAX_WIDEN_STEPS {
        match ctx.types.data(current).result_type() {
            Some(result) => current = result,
            None => break,
        }
    }
    current
}

/// Whether `tp` is a method, poly or lambda type.
pub fn is_methodic(ctx: &Context, tp: TypeId) -> bool {
    ctx.types.data(tp).is_methodic()
}

/// Structural equality after widening; class references compare by symbol.
pub fn is_same_type(ctx: &Context, left: TypeId, right: TypeId) -> bool {
    let left = widen_dealias(ctx, left);
    let right = widen_dealias(ctx, right);
    if left == right {
        return true;
    }
    let (l, r) = (ctx.types.data(left), ctx.types.data(right));
    match (&*l, &*r) {
        (TypeData::TypeRef { .. }, TypeData::TypeRef { .. })
        | (TypeData::PackageRef(_), TypeData::PackageRef(_)) => {
            let resolved = ctx.resolve(left);
            resolved.is_some() && resolved == ctx.resolve(right)
        }
        (
            TypeData::AppliedType { tycon: lt, args: la },
            TypeData::AppliedType { tycon: rt, args: ra },
        ) => {
            la.len() == ra.len()
                && is_same_type(ctx, *lt, *rt)
                && la.iter().zip(ra).all(|(&a, &b)| is_same_type(ctx, a, b))
        }
        (TypeData::AndType(a1, b1), TypeData::AndType(a2, b2))
        | (TypeData::OrType(a1, b1), TypeData::OrType(a2, b2)) => {
            is_same_type(ctx, *a1, *a2) && is_same_type(ctx, *b1, *b2)
        }
        (
            TypeData::TypeBounds { low: l1, high: h1 },
            TypeData::TypeBounds { low: l2, high: h2 },
        ) => {
            is_same_type(ctx, *l1, *l2) && is_same_type(ctx, *h1, *h2)
        }
        (TypeData::WildcardTypeBounds(a), TypeData::WildcardTypeBounds(b)) => {
            is_same_type(ctx, *a, *b)
        }
        (
            TypeData::MethodType {
                binder: b1,
                param_types: p1,
                result: r1,
                ..
            },
            TypeData::MethodType {
                binder: b2,
                param_types: p2,
                result: r2,
                ..
            },
        ) => {
            p1.len() == p2.len() && {
                let rename = crate::instantiate::rename_binder(ctx, *b2, *b1, p2.len());
                p1.iter()
                    .zip(p2)
                    .all(|(&a, &b)| rename.apply(ctx, b).is_ok_and(|b| is_same_type(ctx, a, b)))
                    && rename
                        .apply(ctx, *r2)
                        .is_ok_and(|r2| is_same_type(ctx, *r1, r2))
            }
        }
        (
            TypeData::PolyType {
                binder: b1,
                bounds: p1,
                result: r1,
                ..
            },
            TypeData::PolyType {
                binder: b2,
                bounds: p2,
                result: r2,
                ..
            },
        )
        | (
            TypeData::TypeLambda {
                binder: b1,
                bounds: p1,
                result: r1,
                ..
            },
            TypeData::TypeLambda {
                binder: b2,
                bounds: p2,
                result: r2,
                ..
            },
        ) => {
            p1.len() == p2.len() && {
                let rename = crate::instantiate::rename_binder(ctx, *b2, *b1, p2.len());
                p1.iter()
                    .zip(p2)
                    .all(|(&a, &b)| rename.apply(ctx, b).is_ok_and(|b| is_same_type(ctx, a, b)))
                    && rename
                        .apply(ctx, *r2)
                        .is_ok_and(|r2| is_same_type(ctx, *r1, r2))
            }
        }
        _ => false,
    }
}

#[cfg(test)]
#[path = "tests/queries_tests.rs"]
mod tests;

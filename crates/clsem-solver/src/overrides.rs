//! Override resolution over linearizations.
//!
//! Two members match when they have the same name and, for terms, matching
//! parameter shapes: the same number of term parameters with the same types,
//! and the same number of type parameters. Result types are not compared.
//!
//! Members of the root chain (`Any`, `Matchable`, `Object`) match loosely:
//! parameter types need only agree after erasure, and a parameterless
//! `def f()` matches a `def f` or a `val f`.
//!
//! Private members and constructors never override and are never overridden.

use crate::base_types::as_seen_from;
use crate::context::Context;
use crate::erasure::erase;
use crate::error::TypeError;
use crate::instantiate::rename_binder;
use crate::linearization::linearization;
use crate::queries::is_same_type;
use crate::types::TypeData;
use clsem_binder::SymbolKind;
use clsem_common::limits::MAX_WIDEN_STEPS;
use clsem_common::{SymbolId, TypeId};
use tracing::instrument;

/// Whether `member` would override `candidate` as seen from `site`.
pub fn matches(ctx: &Context, member: SymbolId, candidate: SymbolId, site: TypeId) -> bool {
    if member == candidate {
        return false;
    }
    let (Some(m), Some(c)) = (ctx.symbols.get(member), ctx.symbols.get(candidate)) else {
        return false;
    };
    if m.name().decl_key() != c.name().decl_key() || m.kind() != c.kind() {
        return false;
    }
    let (Ok(m_flags), Ok(c_flags)) = (ctx.symbols.flags(member), ctx.symbols.flags(candidate))
    else {
        return false;
    };
    if !m_flags.can_override() || !c_flags.can_override() {
        return false;
    }
    match m.kind() {
        SymbolKind::Term => {}
        SymbolKind::TypeMember => return true,
        _ => return false,
    }
    let (Some(m_owner), Some(c_owner)) = (m.owner(), c.owner()) else {
        return false;
    };
    let (Ok(m_info), Ok(c_info)) = (
        ctx.symbols.declared_type(member),
        ctx.symbols.declared_type(candidate),
    ) else {
        return false;
    };
    let (Ok(m_info), Ok(c_info)) = (
        as_seen_from(ctx, m_info, m_owner, site),
        as_seen_from(ctx, c_info, c_owner, site),
    ) else {
        return false;
    };
    let relaxed = ctx.defn.is_root_class(c_owner);
    infos_match(ctx, m_info, c_info, relaxed)
}

fn infos_match(ctx: &Context, left: TypeId, right: TypeId, relaxed: bool) -> bool {
    let mut pair = (left, right);
    for _ in 0..MAX_WIDEN_STEPS {
        let (l, r) = (ctx.types.data(pair.0), ctx.types.data(pair.1));
        match (&*l, &*r) {
            (
                TypeData::MethodType {
                    binder: lb,
                    param_types: lp,
                    result: lr,
                    ..
                },
                TypeData::MethodType {
                    binder: rb,
                    param_types: rp,
                    result: rr,
                    ..
                },
            ) => {
                if lp.len() != rp.len() {
                    return false;
                }
                let rename = rename_binder(ctx, *rb, *lb, rp.len());
                let params_match = lp.iter().zip(rp).all(|(&a, &b)| {
                    rename.apply(ctx, b).is_ok_and(|b| {
                        is_same_type(ctx, a, b) || (relaxed && erase(ctx, a) == erase(ctx, b))
                    })
                });
                if !params_match {
                    return false;
                }
                let Ok(rr) = rename.apply(ctx, *rr) else {
                    return false;
                };
                if !ctx.types.data(*lr).is_methodic() && !ctx.types.data(rr).is_methodic() {
                    return true;
                }
                pair = (*lr, rr);
            }
            (
                TypeData::PolyType {
                    binder: lb,
                    param_names: ln,
                    result: lr,
                    ..
                },
                TypeData::PolyType {
                    binder: rb,
                    param_names: rn,
                    result: rr,
                    ..
                },
            ) => {
                if ln.len() != rn.len() {
                    return false;
                }
                let Ok(rr) = rename_binder(ctx, *rb, *lb, rn.len()).apply(ctx, *rr) else {
                    return false;
                };
                pair = (*lr, rr);
            }
            (TypeData::MethodType { param_types, .. }, other)
            | (other, TypeData::MethodType { param_types, .. })
                if !other.is_methodic() =>
            {
                return relaxed && param_types.is_empty();
            }
            (left, right) => return !left.is_methodic() && !right.is_methodic(),
        }
    }
    false
}

/// The declaration in `class` that `member` matches as seen from `site`.
pub fn matching_decl(
    ctx: &Context,
    member: SymbolId,
    class: SymbolId,
    site: TypeId,
) -> Option<SymbolId> {
    let name = ctx.symbols.get(member)?.name();
    ctx.symbols
        .get_decls(class, name)
        .iter()
        .copied()
        .find(|&candidate| matches(ctx, member, candidate, site))
}

fn owner_class(ctx: &Context, member: SymbolId) -> Option<SymbolId> {
    let owner = ctx.symbols.get(member)?.owner()?;
    ctx.symbols[owner].is_class().then_some(owner)
}

fn participates(ctx: &Context, member: SymbolId) -> Result<bool, TypeError> {
    Ok(ctx.symbols.flags(member)?.can_override())
}

/// The member that `member` overrides as visible from `at`.
///
/// - `at` is `member`'s owner: `member` itself.
/// - `at` derives from the owner: the nearest matching declaration after the
///   owner in `lin(at)`.
/// - `at` is an ancestor of the owner: the matching declaration in `at`.
/// - otherwise `None`.
#[instrument(level = "trace", skip(ctx))]
pub fn overridden_symbol(
    ctx: &Context,
    member: SymbolId,
    at: SymbolId,
) -> Result<Option<SymbolId>, TypeError> {
    let Some(owner) = owner_class(ctx, member) else {
        return Ok(None);
    };
    if at == owner {
        return Ok(Some(member));
    }
    if !participates(ctx, member)? {
        return Ok(None);
    }
    let lin_at = linearization(ctx, at)?;
    if let Some(pos) = lin_at.iter().position(|&c| c == owner) {
        let site = ctx.class_this_type(at)?;
        return Ok(lin_at[pos + 1..]
            .iter()
            .find_map(|&class| matching_decl(ctx, member, class, site)));
    }
    if linearization(ctx, owner)?.contains(&at) {
        let site = ctx.class_this_type(owner)?;
        return Ok(matching_decl(ctx, member, at, site));
    }
    Ok(None)
}

/// The member that overrides `member` in `at`: the nearest matching
/// declaration before `member`'s owner in `lin(at)`, or `member` itself when
/// nothing overrides it. `None` when `at` does not derive from the owner.
#[instrument(level = "trace", skip(ctx))]
pub fn overriding_symbol(
    ctx: &Context,
    member: SymbolId,
    at: SymbolId,
) -> Result<Option<SymbolId>, TypeError> {
    let Some(owner) = owner_class(ctx, member) else {
        return Ok(None);
    };
    let lin_at = linearization(ctx, at)?;
    let Some(pos) = lin_at.iter().position(|&c| c == owner) else {
        return Ok(None);
    };
    if !participates(ctx, member)? {
        return Ok(Some(member));
    }
    let site = ctx.class_this_type(at)?;
    let overriding = lin_at[..pos]
        .iter()
        .find_map(|&class| matching_decl(ctx, member, class, site));
    Ok(Some(overriding.unwrap_or(member)))
}

/// Every member `member` overrides, nearest first, following the tail of
/// its owner's linearization.
pub fn all_overridden_symbols(ctx: &Context, member: SymbolId) -> Result<Vec<SymbolId>, TypeError> {
    let Some(owner) = owner_class(ctx, member) else {
        return Ok(Vec::new());
    };
    if !participates(ctx, member)? {
        return Ok(Vec::new());
    }
    let site = ctx.class_this_type(owner)?;
    let lin = linearization(ctx, owner)?;
    Ok(lin
        .iter()
        .skip(1)
        .filter_map(|&class| matching_decl(ctx, member, class, site))
        .collect())
}

/// The nearest member `member` overrides.
pub fn next_overridden_symbol(
    ctx: &Context,
    member: SymbolId,
) -> Result<Option<SymbolId>, TypeError> {
    Ok(all_overridden_symbols(ctx, member)?.into_iter().next())
}

#[cfg(test)]
#[path = "tests/overrides_tests.rs"]
mod tests;

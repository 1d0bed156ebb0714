//! Member lookup.

use crate::context::Context;
use crate::erasure::signature_of;
use crate::error::TypeError;
use crate::linearization::linearization;
use clsem_common::{Name, SymbolId, TermName};

/// Declarations of `name` in `owner`. A signed term name keeps only the
/// overloads whose erased signature equals the name's.
pub fn decls_matching(ctx: &Context, owner: SymbolId, name: &Name) -> Vec<SymbolId> {
    let bucket = ctx.symbols.get_decls(owner, name);
    let Some(sig) = name.as_term().and_then(TermName::signature) else {
        return bucket.to_vec();
    };
    bucket
        .iter()
        .copied()
        .filter(|&id| {
            ctx.symbols
                .declared_type(id)
                .is_ok_and(|info| &signature_of(ctx, info) == sig)
        })
        .collect()
}

/// The first member named `name` found along the linearization of `class`.
///
/// For an unsigned name with several overloads in the same class, the first
/// declared one is returned.
pub fn find_member(
    ctx: &Context,
    class: SymbolId,
    name: &Name,
) -> Result<Option<SymbolId>, TypeError> {
    let lin = linearization(ctx, class)?;
    Ok(lin
        .iter()
        .find_map(|&c| decls_matching(ctx, c, name).first().copied()))
}

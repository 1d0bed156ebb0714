//! Class linearization.
//!
//! The linearization of `C extends P1 with P2 ... with Pn` is
//!
//! ```text
//! C :: (lin(Pn) \ acc) ++ ... ++ (lin(P2) \ lin(P1)) ++ lin(P1)
//! ```
//!
//! folding the parents left to right and prepending, for each parent, the
//! classes of its own linearization not already present. Later mixins thus
//! come first, and every reference class converges on `Object, Matchable,
//! Any`.
//!
//! The result is computed once per class and stored in the class's
//! linearization cell; afterwards it is immutable.

use crate::context::Context;
use crate::error::TypeError;
use crate::queries::class_symbol;
use clsem_common::limits::MAX_HIERARCHY_DEPTH;
use clsem_common::SymbolId;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// The linearization of `class`: itself first, then its ancestors.
#[instrument(level = "debug", skip(ctx), fields(class = %ctx.full_name(class)))]
pub fn linearization(ctx: &Context, class: SymbolId) -> Result<Arc<[SymbolId]>, TypeError> {
    let mut visiting = FxHashSet::default();
    linearize(ctx, class, &mut visiting)
}

fn linearize(
    ctx: &Context,
    class: SymbolId,
    visiting: &mut FxHashSet<SymbolId>,
) -> Result<Arc<[SymbolId]>, TypeError> {
    let cell = ctx.symbols.linearization_cell(class)?;
    if let Some(done) = cell.get() {
        return Ok(done.clone());
    }
    // Checked before touching the cell: re-entering an initializing cell
    // would block.
    if !visiting.insert(class) {
        return Err(TypeError::CyclicInheritance(class));
    }
    if visiting.len() > MAX_HIERARCHY_DEPTH {
        return Err(TypeError::DepthExceeded {
            what: "linearization",
            limit: MAX_HIERARCHY_DEPTH,
        });
    }

    let mut acc: Vec<SymbolId> = Vec::new();
    for &parent in ctx.symbols.parents(class)? {
        let parent_class =
            class_symbol(ctx, parent).ok_or(TypeError::UnresolvedReference(parent))?;
        let parent_lin = linearize(ctx, parent_class, visiting)?;
        let mut fresh: Vec<SymbolId> = parent_lin
            .iter()
            .copied()
            .filter(|c| !acc.contains(c))
            .collect();
        fresh.extend(acc);
        acc = fresh;
    }
    visiting.remove(&class);

    let mut lin = Vec::with_capacity(acc.len() + 1);
    lin.push(class);
    lin.extend(acc);
    let lin: Arc<[SymbolId]> = lin.into();
    debug!(len = lin.len(), "linearized");
    Ok(cell.get_or_init(|| lin).clone())
}

/// Whether `ancestor` appears in the linearization of `class`.
pub fn derives_from(ctx: &Context, class: SymbolId, ancestor: SymbolId) -> bool {
    class == ancestor
        || linearization(ctx, class)
            .map(|lin| lin.contains(&ancestor))
            .unwrap_or(false)
}

#[cfg(test)]
#[path = "tests/linearization_tests.rs"]
mod tests;

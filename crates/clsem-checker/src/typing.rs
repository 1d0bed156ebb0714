//! On-demand typing of trees.
//!
//! `Tree::tpe` computes a node's type from its own fields and the memoized
//! types of its direct children, then caches it. Repeated calls return the
//! cached value; concurrent readers agree on it.

use crate::error::TypingError;
use crate::trees::{Tree, TreeKind};
use clsem_binder::SymbolKind;
use clsem_common::{Name, SymbolId, TypeId};
use clsem_solver::{
    Context, TypeData, TypeError, class_symbol, decls_matching, find_member, instantiate,
    instantiate_method, is_methodic, widen,
};
use tracing::trace;

impl Tree {
    /// The type of this tree, computed on first request.
    ///
    /// Definitions and imports are typed `NoType`.
    pub fn tpe(&self, ctx: &Context) -> Result<TypeId, TypingError> {
        self.type_cell()
            .get_or_try_init(|| compute(ctx, self))
            .copied()
    }
}

fn compute(ctx: &Context, tree: &Tree) -> Result<TypeId, TypingError> {
    let types = &ctx.types;
    let tpe = match tree.kind() {
        TreeKind::Ident(symbol) => ident_type(ctx, *symbol)?,
        TreeKind::This(class) => types.this_type(*class),
        TreeKind::Select { qualifier, name } => select_type(ctx, qualifier, name)?,
        TreeKind::Literal(constant) => types.constant(constant.clone()),
        TreeKind::New(tpt) => tpt.tpe(ctx)?,
        TreeKind::Apply { fun, args } => apply_type(ctx, fun, args)?,
        TreeKind::TypeApply { fun, args } => type_apply_type(ctx, fun, args)?,
        TreeKind::Typed { tpt, .. } => tpt.tpe(ctx)?,
        TreeKind::Block { expr, .. } => expr.tpe(ctx)?,
        TreeKind::If {
            then_branch,
            else_branch,
            ..
        } => {
            let then_type = then_branch.tpe(ctx)?;
            let else_type = else_branch.tpe(ctx)?;
            if then_type == else_type {
                then_type
            } else {
                types.or(then_type, else_type)
            }
        }
        TreeKind::Assign { .. } => ctx.defn.unit_type,

        TreeKind::Inferred(tpe) => *tpe,
        TreeKind::TypeIdent(symbol) => type_ident_type(ctx, *symbol)?,
        TreeKind::AppliedTypeTree { tycon, args } => {
            let tycon = tycon.tpe(ctx)?;
            let args = types_of(ctx, args)?;
            types.applied(tycon, args)
        }
        TreeKind::SingletonTypeTree(reference) => reference.tpe(ctx)?,
        TreeKind::AndTypeTree(left, right) => types.and(left.tpe(ctx)?, right.tpe(ctx)?),
        TreeKind::OrTypeTree(left, right) => types.or(left.tpe(ctx)?, right.tpe(ctx)?),
        TreeKind::TypeBoundsTree { low, high } => types.bounds(low.tpe(ctx)?, high.tpe(ctx)?),

        TreeKind::ValDef { .. }
        | TreeKind::DefDef { .. }
        | TreeKind::TypeDef { .. }
        | TreeKind::ClassDef { .. }
        | TreeKind::Import { .. }
        | TreeKind::PackageDef { .. } => TypeId::NO_TYPE,
    };
    trace!(node = tree.node_name(), ?tpe, "typed");
    Ok(tpe)
}

fn types_of(ctx: &Context, trees: &[Tree]) -> Result<Vec<TypeId>, TypingError> {
    trees.iter().map(|tree| tree.tpe(ctx)).collect()
}

/// The prefix a member of `owner` is referred to through when named
/// without a qualifier.
fn implicit_prefix(ctx: &Context, owner: Option<SymbolId>) -> TypeId {
    match owner.and_then(|owner| Some((owner, ctx.symbols.get(owner)?.kind()))) {
        Some((owner, SymbolKind::Class)) => ctx.types.this_type(owner),
        Some((owner, SymbolKind::Package)) => ctx.types.package_ref(owner),
        _ => TypeId::NO_PREFIX,
    }
}

fn ident_type(ctx: &Context, symbol: SymbolId) -> Result<TypeId, TypingError> {
    let entry = ctx.symbols.symbol(symbol)?;
    match entry.kind() {
        SymbolKind::Package => Ok(ctx.types.package_ref(symbol)),
        SymbolKind::Term => {
            let prefix = implicit_prefix(ctx, entry.owner());
            Ok(ctx.types.symbol_term_ref(prefix, symbol))
        }
        SymbolKind::Class | SymbolKind::TypeMember | SymbolKind::ClassTypeParam => {
            type_ident_type(ctx, symbol)
        }
    }
}

fn type_ident_type(ctx: &Context, symbol: SymbolId) -> Result<TypeId, TypingError> {
    let entry = ctx.symbols.symbol(symbol)?;
    Ok(match entry.kind() {
        SymbolKind::Class => ctx.class_type(symbol),
        SymbolKind::ClassTypeParam => ctx.types.param_type_ref(symbol),
        SymbolKind::TypeMember => {
            let prefix = implicit_prefix(ctx, entry.owner());
            ctx.types.symbol_type_ref(prefix, symbol)
        }
        SymbolKind::Package | SymbolKind::Term => return ident_type(ctx, symbol),
    })
}

/// `qualifier.name`: a term reference with the qualifier's type as prefix,
/// so the member's declared type is seen from it when widened.
fn select_type(ctx: &Context, qualifier: &Tree, name: &Name) -> Result<TypeId, TypingError> {
    let prefix = qualifier.tpe(ctx)?;
    let widened = widen(ctx, prefix);
    let package = match &*ctx.types.data(widened) {
        TypeData::PackageRef(package) => Some(*package),
        _ => None,
    };
    let (member, owner) = match package {
        Some(package) => (
            decls_matching(ctx, package, name).first().copied(),
            Some(package),
        ),
        None => match class_symbol(ctx, widened) {
            Some(class) => (find_member(ctx, class, name)?, Some(class)),
            None => (None, None),
        },
    };
    let Some(member) = member else {
        return Err(TypingError::UnresolvedMember {
            name: name.display(&ctx.names),
            owner: owner.map_or_else(|| format!("{widened:?}"), |o| ctx.full_name(o)),
        });
    };
    Ok(match ctx.symbols.symbol(member)?.kind() {
        SymbolKind::Package => ctx.types.package_ref(member),
        SymbolKind::Term => ctx.types.symbol_term_ref(prefix, member),
        SymbolKind::Class => ctx.class_type(member),
        SymbolKind::TypeMember | SymbolKind::ClassTypeParam => {
            ctx.types.symbol_type_ref(prefix, member)
        }
    })
}

/// The `tpt` of `new tpt` when `fun` is a constructor selection on it,
/// possibly under further applications and type applications.
fn constructed<'t>(ctx: &Context, fun: &'t Tree) -> Option<&'t Tree> {
    let mut current = fun;
    loop {
        match current.kind() {
            TreeKind::Apply { fun, .. } | TreeKind::TypeApply { fun, .. } => current = fun.as_ref(),
            TreeKind::Select { qualifier, name } => {
                let is_init = name
                    .as_term()
                    .is_some_and(|term| term.unsigned().last_atom() == ctx.defn.names.init);
                return match qualifier.kind() {
                    TreeKind::New(tpt) if is_init => Some(tpt.as_ref()),
                    _ => None,
                };
            }
            _ => return None,
        }
    }
}

fn apply_type(ctx: &Context, fun: &Tree, args: &[Tree]) -> Result<TypeId, TypingError> {
    let fun_type = widen(ctx, fun.tpe(ctx)?);
    let arity = match &*ctx.types.data(fun_type) {
        TypeData::MethodType { param_types, .. } => param_types.len(),
        _ => {
            return Err(TypingError::NotApplicable {
                node: "Apply",
                tpe: fun_type,
            });
        }
    };
    if arity != args.len() {
        return Err(TypingError::ArityMismatch {
            expected: arity,
            found: args.len(),
        });
    }
    let arg_types = types_of(ctx, args)?;
    let result =
        instantiate_method(ctx, fun_type, &arg_types).map_err(|e| from_type_error("Apply", e))?;
    if !is_methodic(ctx, result)
        && let Some(tpt) = constructed(ctx, fun)
    {
        return tpt.tpe(ctx);
    }
    Ok(result)
}

fn type_apply_type(ctx: &Context, fun: &Tree, args: &[Tree]) -> Result<TypeId, TypingError> {
    let fun_type = widen(ctx, fun.tpe(ctx)?);
    if !matches!(&*ctx.types.data(fun_type), TypeData::PolyType { .. }) {
        return Err(TypingError::NotApplicable {
            node: "TypeApply",
            tpe: fun_type,
        });
    }
    let arg_types = types_of(ctx, args)?;
    instantiate(ctx, fun_type, &arg_types).map_err(|e| from_type_error("TypeApply", e))
}

fn from_type_error(node: &'static str, err: TypeError) -> TypingError {
    match err {
        TypeError::NotApplicable(tpe) => TypingError::NotApplicable { node, tpe },
        TypeError::ArityMismatch { expected, found } => {
            TypingError::ArityMismatch { expected, found }
        }
        other => TypingError::Type(other),
    }
}

#[cfg(test)]
#[path = "tests/typing_tests.rs"]
mod tests;

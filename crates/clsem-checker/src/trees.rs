//! The tree model.
//!
//! A `Tree` owns its children and memoizes its own type. Trees come in three
//! families sharing one enum:
//!
//! - terms, whose type is the type of the value they compute;
//! - type trees, whose type is the type they denote;
//! - definitions and imports, typed `NoType`.
//!
//! Trees are immutable once built. The only interior state is the type cache,
//! which is written at most once.

use clsem_common::{Name, SymbolId, TypeId};
use clsem_solver::Constant;
use once_cell::sync::OnceCell;
use std::fmt;

pub struct Tree {
    kind: TreeKind,
    tpe: OnceCell<TypeId>,
}

#[derive(Debug)]
pub enum TreeKind {
    // === Terms ===
    /// A reference to a term, package or module symbol.
    Ident(SymbolId),
    /// `C.this`.
    This(SymbolId),
    /// `qualifier.name`; a signed term name selects one overload.
    Select { qualifier: Box<Tree>, name: Name },
    Literal(Constant),
    /// `new tpt`, the qualifier of a constructor selection.
    New(Box<Tree>),
    Apply { fun: Box<Tree>, args: Vec<Tree> },
    TypeApply { fun: Box<Tree>, args: Vec<Tree> },
    /// `expr: tpt`.
    Typed { expr: Box<Tree>, tpt: Box<Tree> },
    Block { stats: Vec<Tree>, expr: Box<Tree> },
    If {
        cond: Box<Tree>,
        then_branch: Box<Tree>,
        else_branch: Box<Tree>,
    },
    Assign { lhs: Box<Tree>, rhs: Box<Tree> },

    // === Type trees ===
    /// A type already known, e.g. one produced by a pickle decoder.
    Inferred(TypeId),
    /// A reference to a class, type member or type parameter.
    TypeIdent(SymbolId),
    AppliedTypeTree { tycon: Box<Tree>, args: Vec<Tree> },
    /// `ref.type`.
    SingletonTypeTree(Box<Tree>),
    AndTypeTree(Box<Tree>, Box<Tree>),
    OrTypeTree(Box<Tree>, Box<Tree>),
    TypeBoundsTree { low: Box<Tree>, high: Box<Tree> },

    // === Definitions ===
    ValDef {
        symbol: SymbolId,
        tpt: Box<Tree>,
        rhs: Option<Box<Tree>>,
    },
    DefDef {
        symbol: SymbolId,
        type_params: Vec<Tree>,
        params: Vec<Tree>,
        tpt: Box<Tree>,
        rhs: Option<Box<Tree>>,
    },
    /// A class type parameter or method type parameter.
    TypeDef { symbol: SymbolId, rhs: Box<Tree> },
    ClassDef {
        symbol: SymbolId,
        parents: Vec<Tree>,
        body: Vec<Tree>,
    },
    Import { expr: Box<Tree>, selectors: Vec<Name> },
    PackageDef { package: SymbolId, stats: Vec<Tree> },
}

impl Tree {
    pub fn new(kind: TreeKind) -> Self {
        Tree {
            kind,
            tpe: OnceCell::new(),
        }
    }

    pub fn kind(&self) -> &TreeKind {
        &self.kind
    }

    /// The memoized type, if it has been computed.
    pub fn cached_type(&self) -> Option<TypeId> {
        self.tpe.get().copied()
    }

    pub(crate) fn type_cell(&self) -> &OnceCell<TypeId> {
        &self.tpe
    }

    pub fn is_term(&self) -> bool {
        matches!(
            self.kind,
            TreeKind::Ident(_)
                | TreeKind::This(_)
                | TreeKind::Select { .. }
                | TreeKind::Literal(_)
                | TreeKind::New(_)
                | TreeKind::Apply { .. }
                | TreeKind::TypeApply { .. }
                | TreeKind::Typed { .. }
                | TreeKind::Block { .. }
                | TreeKind::If { .. }
                | TreeKind::Assign { .. }
        )
    }

    pub fn is_type_tree(&self) -> bool {
        matches!(
            self.kind,
            TreeKind::Inferred(_)
                | TreeKind::TypeIdent(_)
                | TreeKind::AppliedTypeTree { .. }
                | TreeKind::SingletonTypeTree(_)
                | TreeKind::AndTypeTree(..)
                | TreeKind::OrTypeTree(..)
                | TreeKind::TypeBoundsTree { .. }
        )
    }

    pub fn is_definition(&self) -> bool {
        !self.is_term() && !self.is_type_tree()
    }

    /// The symbol a definition defines.
    pub fn defined_symbol(&self) -> Option<SymbolId> {
        match &self.kind {
            TreeKind::ValDef { symbol, .. }
            | TreeKind::DefDef { symbol, .. }
            | TreeKind::TypeDef { symbol, .. }
            | TreeKind::ClassDef { symbol, .. } => Some(*symbol),
            TreeKind::PackageDef { package, .. } => Some(*package),
            _ => None,
        }
    }

    pub fn node_name(&self) -> &'static str {
        match &self.kind {
            TreeKind::Ident(_) => "Ident",
            TreeKind::This(_) => "This",
            TreeKind::Select { .. } => "Select",
            TreeKind::Literal(_) => "Literal",
            TreeKind::New(_) => "New",
            TreeKind::Apply { .. } => "Apply",
            TreeKind::TypeApply { .. } => "TypeApply",
            TreeKind::Typed { .. } => "Typed",
            TreeKind::Block { .. } => "Block",
            TreeKind::If { .. } => "If",
            TreeKind::Assign { .. } => "Assign",
            TreeKind::Inferred(_) => "Inferred",
            TreeKind::TypeIdent(_) => "TypeIdent",
            TreeKind::AppliedTypeTree { .. } => "AppliedTypeTree",
            TreeKind::SingletonTypeTree(_) => "SingletonTypeTree",
            TreeKind::AndTypeTree(..) => "AndTypeTree",
            TreeKind::OrTypeTree(..) => "OrTypeTree",
            TreeKind::TypeBoundsTree { .. } => "TypeBoundsTree",
            TreeKind::ValDef { .. } => "ValDef",
            TreeKind::DefDef { .. } => "DefDef",
            TreeKind::TypeDef { .. } => "TypeDef",
            TreeKind::ClassDef { .. } => "ClassDef",
            TreeKind::Import { .. } => "Import",
            TreeKind::PackageDef { .. } => "PackageDef",
        }
    }

    /// Call `f` on every direct child, in source order.
    pub fn for_each_child<'t>(&'t self, mut f: impl FnMut(&'t Tree)) {
        match &self.kind {
            TreeKind::Ident(_)
            | TreeKind::This(_)
            | TreeKind::Literal(_)
            | TreeKind::Inferred(_)
            | TreeKind::TypeIdent(_) => {}
            TreeKind::Select { qualifier: inner, .. }
            | TreeKind::New(inner)
            | TreeKind::SingletonTypeTree(inner) => f(inner),
            TreeKind::Apply { fun, args } | TreeKind::TypeApply { fun, args } => {
                f(fun);
                args.iter().for_each(f);
            }
            TreeKind::AppliedTypeTree { tycon, args } => {
                f(tycon);
                args.iter().for_each(f);
            }
            TreeKind::Typed { expr, tpt } => {
                f(expr);
                f(tpt);
            }
            TreeKind::Block { stats, expr } => {
                stats.iter().for_each(&mut f);
                f(expr);
            }
            TreeKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                f(cond);
                f(then_branch);
                f(else_branch);
            }
            TreeKind::Assign { lhs: first, rhs: second }
            | TreeKind::AndTypeTree(first, second)
            | TreeKind::OrTypeTree(first, second)
            | TreeKind::TypeBoundsTree {
                low: first,
                high: second,
            } => {
                f(first);
                f(second);
            }
            TreeKind::ValDef { tpt, rhs, .. } => {
                f(tpt);
                if let Some(rhs) = rhs {
                    f(rhs);
                }
            }
            TreeKind::DefDef {
                type_params,
                params,
                tpt,
                rhs,
                ..
            } => {
                type_params.iter().for_each(&mut f);
                params.iter().for_each(&mut f);
                f(tpt);
                if let Some(rhs) = rhs {
                    f(rhs);
                }
            }
            TreeKind::TypeDef { rhs, .. } => f(rhs),
            TreeKind::ClassDef { parents, body, .. } => {
                parents.iter().for_each(&mut f);
                body.iter().for_each(f);
            }
            TreeKind::Import { expr, .. } => f(expr),
            TreeKind::PackageDef { stats, .. } => stats.iter().for_each(f),
        }
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("kind", &self.kind)
            .field("tpe", &self.tpe.get())
            .finish()
    }
}

// =============================================================================
// Constructors
// =============================================================================

impl Tree {
    pub fn ident(symbol: SymbolId) -> Self {
        Tree::new(TreeKind::Ident(symbol))
    }

    pub fn this(class: SymbolId) -> Self {
        Tree::new(TreeKind::This(class))
    }

    pub fn select(qualifier: Tree, name: Name) -> Self {
        Tree::new(TreeKind::Select {
            qualifier: Box::new(qualifier),
            name,
        })
    }

    pub fn literal(constant: Constant) -> Self {
        Tree::new(TreeKind::Literal(constant))
    }

    pub fn new_instance(tpt: Tree) -> Self {
        Tree::new(TreeKind::New(Box::new(tpt)))
    }

    pub fn apply(fun: Tree, args: Vec<Tree>) -> Self {
        Tree::new(TreeKind::Apply {
            fun: Box::new(fun),
            args,
        })
    }

    pub fn type_apply(fun: Tree, args: Vec<Tree>) -> Self {
        Tree::new(TreeKind::TypeApply {
            fun: Box::new(fun),
            args,
        })
    }

    pub fn typed(expr: Tree, tpt: Tree) -> Self {
        Tree::new(TreeKind::Typed {
            expr: Box::new(expr),
            tpt: Box::new(tpt),
        })
    }

    pub fn block(stats: Vec<Tree>, expr: Tree) -> Self {
        Tree::new(TreeKind::Block {
            stats,
            expr: Box::new(expr),
        })
    }

    pub fn if_(cond: Tree, then_branch: Tree, else_branch: Tree) -> Self {
        Tree::new(TreeKind::If {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    pub fn assign(lhs: Tree, rhs: Tree) -> Self {
        Tree::new(TreeKind::Assign {
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    pub fn inferred(tpe: TypeId) -> Self {
        Tree::new(TreeKind::Inferred(tpe))
    }

    pub fn type_ident(symbol: SymbolId) -> Self {
        Tree::new(TreeKind::TypeIdent(symbol))
    }

    pub fn applied_type(tycon: Tree, args: Vec<Tree>) -> Self {
        Tree::new(TreeKind::AppliedTypeTree {
            tycon: Box::new(tycon),
            args,
        })
    }

    pub fn singleton_type(reference: Tree) -> Self {
        Tree::new(TreeKind::SingletonTypeTree(Box::new(reference)))
    }

    pub fn and_type(left: Tree, right: Tree) -> Self {
        Tree::new(TreeKind::AndTypeTree(Box::new(left), Box::new(right)))
    }

    pub fn or_type(left: Tree, right: Tree) -> Self {
        Tree::new(TreeKind::OrTypeTree(Box::new(left), Box::new(right)))
    }

    pub fn type_bounds(low: Tree, high: Tree) -> Self {
        Tree::new(TreeKind::TypeBoundsTree {
            low: Box::new(low),
            high: Box::new(high),
        })
    }

    pub fn val_def(symbol: SymbolId, tpt: Tree, rhs: Option<Tree>) -> Self {
        Tree::new(TreeKind::ValDef {
            symbol,
            tpt: Box::new(tpt),
            rhs: rhs.map(Box::new),
        })
    }

    pub fn def_def(
        symbol: SymbolId,
        type_params: Vec<Tree>,
        params: Vec<Tree>,
        tpt: Tree,
        rhs: Option<Tree>,
    ) -> Self {
        Tree::new(TreeKind::DefDef {
            symbol,
            type_params,
            params,
            tpt: Box::new(tpt),
            rhs: rhs.map(Box::new),
        })
    }

    pub fn type_def(symbol: SymbolId, rhs: Tree) -> Self {
        Tree::new(TreeKind::TypeDef {
            symbol,
            rhs: Box::new(rhs),
        })
    }

    pub fn class_def(symbol: SymbolId, parents: Vec<Tree>, body: Vec<Tree>) -> Self {
        Tree::new(TreeKind::ClassDef {
            symbol,
            parents,
            body,
        })
    }

    pub fn import(expr: Tree, selectors: Vec<Name>) -> Self {
        Tree::new(TreeKind::Import {
            expr: Box::new(expr),
            selectors,
        })
    }

    pub fn package_def(package: SymbolId, stats: Vec<Tree>) -> Self {
        Tree::new(TreeKind::PackageDef { package, stats })
    }
}

#[cfg(test)]
#[path = "tests/trees_tests.rs"]
mod tests;

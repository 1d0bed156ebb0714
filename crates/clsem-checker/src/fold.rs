//! Folding over trees.
//!
//! `fold` is the one traversal: every "visit each node" or "collect from
//! each node" query is an operation plus a reduction over it.

use crate::error::TypingError;
use crate::trees::Tree;
use clsem_common::SymbolId;
use clsem_solver::Context;

/// Which children a fold descends into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Traversal {
    /// Every child of every node.
    AllNodes,
    /// Stop at type trees: a type tree is a payload, its parts are not.
    TypeTrees,
}

/// Fold `op` over `tree` and its descendants.
///
/// Each node contributes `reduce(default, op(node))`, which is then reduced
/// with the folds of its children in source order.
pub fn fold<'t, A: Clone>(
    tree: &'t Tree,
    traversal: Traversal,
    default: &A,
    op: &mut impl FnMut(&'t Tree) -> A,
    reduce: &impl Fn(A, A) -> A,
) -> A {
    let mut acc = reduce(default.clone(), op(tree));
    if traversal == Traversal::TypeTrees && tree.is_type_tree() {
        return acc;
    }
    let mut children = Vec::new();
    tree.for_each_child(|child| children.push(child));
    for child in children {
        let folded = fold(child, traversal, default, op, reduce);
        acc = reduce(acc, folded);
    }
    acc
}

pub fn count_nodes(tree: &Tree) -> usize {
    fold(tree, Traversal::AllNodes, &0, &mut |_| 1, &|a, b| a + b)
}

/// Every outermost type tree embedded in `tree`, in source order.
pub fn collect_type_trees(tree: &Tree) -> Vec<&Tree> {
    fold(
        tree,
        Traversal::TypeTrees,
        &Vec::new(),
        &mut |node| {
            if node.is_type_tree() {
                vec![node]
            } else {
                Vec::new()
            }
        },
        &|mut left, right| {
            left.extend(right);
            left
        },
    )
}

/// Symbols defined anywhere in `tree`.
pub fn defined_symbols(tree: &Tree) -> Vec<SymbolId> {
    fold(
        tree,
        Traversal::AllNodes,
        &Vec::new(),
        &mut |node| node.defined_symbol().into_iter().collect(),
        &|mut left, right| {
            left.extend(right);
            left
        },
    )
}

/// Type every node of `tree`, returning how many were typed, or the first
/// failure in source order.
pub fn type_all(ctx: &Context, tree: &Tree) -> Result<usize, TypingError> {
    fold(
        tree,
        Traversal::AllNodes,
        &Ok(0),
        &mut |node| node.tpe(ctx).map(|_| 1),
        &|left, right| Ok(left? + right?),
    )
}

#[cfg(test)]
#[path = "tests/fold_tests.rs"]
mod tests;

//! Trees over the clsem model and their on-demand typing.
//!
//! Trees never write into the symbol table: typing reads completed symbols
//! and builds types in the shared interner, memoizing the result per node.

pub mod error;
pub mod fold;
pub mod trees;
pub mod typing;

pub use error::TypingError;
pub use fold::{Traversal, collect_type_trees, count_nodes, defined_symbols, fold, type_all};
pub use trees::{Tree, TreeKind};

#[cfg(test)]
#[path = "tests/fixtures.rs"]
pub(crate) mod fixtures;

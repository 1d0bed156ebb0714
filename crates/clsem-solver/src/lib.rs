//! Type algebra and semantic queries for the clsem model.
//!
//! - `TypeData` / `TypeInterner`: immutable, structurally shared types
//! - `Context` / `Definitions`: the symbol table, the types and the root chain
//! - structural queries (`widen`, `is_ref`, `is_applied`, ...) that never fail
//! - `instantiate` and capture-avoiding substitution
//! - erasure, base types and as-seen-from
//! - linearization and override resolution

pub mod base_types;
pub mod context;
pub mod definitions;
pub mod enter;
pub mod erasure;
pub mod error;
pub mod instantiate;
mod intern;
pub mod linearization;
pub mod lookup;
pub mod overrides;
pub mod queries;
pub mod types;
pub mod visitor;

pub use base_types::{as_seen_from, base_type, class_and_args};
pub use context::Context;
pub use definitions::{Definitions, StdNames};
pub use enter::Enter;
pub use erasure::{erase, signature_of};
pub use error::TypeError;
pub use instantiate::{SubstKey, TypeSubstitution, instantiate, instantiate_method};
pub use intern::TypeInterner;
pub use linearization::{derives_from, linearization};
pub use lookup::{decls_matching, find_member};
pub use overrides::{
    all_overridden_symbols, matches, next_overridden_symbol, overridden_symbol, overriding_symbol,
};
pub use queries::{
    TypePredicate, and_parts, class_symbol, dealias, final_result_type, is_applied,
    is_intersection_of, is_methodic, is_ref, is_same_type, is_union_of, or_parts, widen,
    widen_dealias,
};
pub use types::{BinderId, Constant, Designator, TypeData};
pub use visitor::{contains_param_ref, contains_type_matching, for_each_child};

#[cfg(test)]
#[path = "tests/fixtures.rs"]
pub(crate) mod fixtures;

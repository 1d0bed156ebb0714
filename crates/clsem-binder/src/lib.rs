//! Symbol table for the clsem semantic model.
//!
//! - `SymbolArena`: owner-scoped declarations with overload buckets
//! - `Flags`: modifiers attached at completion
//! - the stub → completed → verified lifecycle, with checkpoints so a failed
//!   decoding unit leaves no trace

pub mod arena;
pub mod error;
pub mod flags;
pub mod symbols;

pub use arena::{Checkpoint, SymbolArena};
pub use error::SymbolError;
pub use flags::Flags;
pub use symbols::{ClassInfo, Completion, CompletionState, DeclMap, Symbol, SymbolKind};

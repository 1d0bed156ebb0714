//! Common types and utilities for the clsem workspace.
//!
//! This crate provides foundational types used across all clsem crates:
//! - String interning (`Atom`, `Interner`)
//! - Names and signatures (`Name`, `TermName`, `TypeName`, `Signature`)
//! - Symbol and type handles (`SymbolId`, `TypeId`)
//! - Limits for recursive algorithms

// String interning for name deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Names - term/type namespaces, signed names, erased signatures
pub mod names;
pub use names::{
    ErasedTypeRef, FullyQualifiedName, Name, ParamSig, SignedName, Signature, TermName, TypeName,
};

// Handles shared by the binder and the solver
pub mod ids;
pub use ids::{SymbolId, TypeId};

// Centralized limits
pub mod limits;

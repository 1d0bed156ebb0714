//! clsem: a semantic model of JVM class files and Scala pickles.
//!
//! The workspace crates do the work; this crate re-exports them and adds the
//! pieces a driver needs:
//!
//! - `session`: loading many class files into one symbol table, isolating
//!   per-class failures
//! - `config`: JSON configuration for the loader and the session
//! - `tracing_config`: the `tracing` subscriber used by the `clsem` binary

pub use clsem_binder as binder;
pub use clsem_checker as checker;
pub use clsem_classfile as classfile;
pub use clsem_common as common;
pub use clsem_solver as solver;

pub use clsem_binder::{CompletionState, Flags, SymbolError, SymbolKind};
pub use clsem_checker::{Traversal, Tree, TreeKind, TypingError, fold};
pub use clsem_classfile::{LoadError, LoadedClass, LoadedKind, LoaderOptions, PickleDecoder};
pub use clsem_common::{Atom, Interner, Name, SymbolId, TermName, TypeId, TypeName};
pub use clsem_solver::{Context, TypeData, TypeError};

pub mod config;
pub use config::ClsemConfig;

pub mod session;
pub use session::{ClassReport, Description, Session, SessionReport};

pub mod tracing_config;

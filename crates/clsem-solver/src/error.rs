use clsem_binder::SymbolError;
use clsem_common::{SymbolId, TypeId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    #[error("type {0:?} is not applicable")]
    NotApplicable(TypeId),
    #[error("expected {expected} argument(s), found {found}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("type {0:?} does not denote a class")]
    NotAClassType(TypeId),
    #[error("reference {0:?} does not resolve to a symbol")]
    UnresolvedReference(TypeId),
    #[error("cyclic inheritance involving {0:?}")]
    CyclicInheritance(SymbolId),
    #[error("{what} exceeded the depth limit of {limit}")]
    DepthExceeded { what: &'static str, limit: usize },
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

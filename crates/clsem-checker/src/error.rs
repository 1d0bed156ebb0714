use clsem_binder::SymbolError;
use clsem_common::TypeId;
use clsem_solver::TypeError;
use thiserror::Error;

/// Failure to compute the type of a tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypingError {
    #[error("{node} applied to a non-applicable type {tpe:?}")]
    NotApplicable { node: &'static str, tpe: TypeId },
    #[error("expected {expected} argument(s), found {found}")]
    ArityMismatch { expected: usize, found: usize },
    #[error("no member `{name}` in {owner}")]
    UnresolvedMember { name: String, owner: String },
    #[error(transparent)]
    Type(#[from] TypeError),
}

impl From<SymbolError> for TypingError {
    fn from(err: SymbolError) -> Self {
        TypingError::Type(TypeError::Symbol(err))
    }
}

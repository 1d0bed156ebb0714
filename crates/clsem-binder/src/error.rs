use clsem_common::SymbolId;
use thiserror::Error;

/// Contract violations on the symbol table.
///
/// These signal a bug in a decoder or consumer rather than bad input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("symbol {0:?} was already completed")]
    AlreadyCompleted(SymbolId),
    #[error("symbol {0:?} queried before completion")]
    NotCompleted(SymbolId),
    #[error("symbol {0:?} cannot own declarations")]
    NotADeclaringSymbol(SymbolId),
    #[error("symbol {id:?} is a {actual}, expected {expected}")]
    KindMismatch {
        id: SymbolId,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("{count} symbol(s) left incomplete, first is {first:?}")]
    IncompleteUnit { first: SymbolId, count: usize },
    #[error("unknown symbol {0:?}")]
    UnknownSymbol(SymbolId),
}

use clsem_binder::SymbolError;
use std::fmt;
use thiserror::Error;

/// Structural errors in the class-file container itself.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassfileError {
    #[error("unexpected end of class file at offset {offset}")]
    UnexpectedEof { offset: usize },
    #[error("invalid class file magic header {found:#010x}")]
    InvalidMagic { found: u32 },
    #[error("unsupported constant pool tag {tag} at index {index}")]
    UnsupportedConstant { tag: u8, index: u16 },
    #[error("invalid constant pool index {index}")]
    InvalidConstantIndex { index: u16 },
    #[error("constant pool entry {index} is not a {expected}")]
    WrongConstantKind { index: u16, expected: &'static str },
    #[error("invalid modified UTF-8 in constant pool entry {index}")]
    InvalidUtf8 { index: u16 },
    #[error("malformed {attribute} attribute: {reason}")]
    MalformedAttribute {
        attribute: &'static str,
        reason: String,
    },
}

/// What went wrong while decoding a descriptor or signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    UnknownCode(char),
    UnexpectedEnd,
    TrailingInput,
    Expected(char),
    UnresolvablePackage(String),
    UnknownTypeVariable(String),
    TooManyDimensions,
    NestingTooDeep,
    Symbol(SymbolError),
}

impl fmt::Display for DecodeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeErrorKind::UnknownCode(c) => write!(f, "unknown type code '{c}'"),
            DecodeErrorKind::UnexpectedEnd => write!(f, "unexpected end of input"),
            DecodeErrorKind::TrailingInput => write!(f, "trailing input after complete type"),
            DecodeErrorKind::Expected(c) => write!(f, "expected '{c}'"),
            DecodeErrorKind::UnresolvablePackage(p) => write!(f, "unresolvable package '{p}'"),
            DecodeErrorKind::UnknownTypeVariable(v) => write!(f, "unknown type variable '{v}'"),
            DecodeErrorKind::TooManyDimensions => write!(f, "more than 255 array dimensions"),
            DecodeErrorKind::NestingTooDeep => write!(f, "type arguments nested too deeply"),
            DecodeErrorKind::Symbol(e) => write!(f, "{e}"),
        }
    }
}

/// A descriptor or signature that could not be decoded, with the symbol
/// being completed, the raw string and the cursor position.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot decode `{raw}` for {symbol} at position {position}: {kind}")]
pub struct DecodeError {
    pub symbol: String,
    pub raw: String,
    pub position: usize,
    pub kind: DecodeErrorKind,
}

/// Errors reported by a pickle decoder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickleError {
    #[error("no pickle decoder is configured")]
    NoDecoder,
    #[error("malformed pickle: {0}")]
    Malformed(String),
    #[error(transparent)]
    Symbol(#[from] SymbolError),
}

/// Failure to load one class. The class's symbols are rolled back; other
/// classes are unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error(transparent)]
    Structure(#[from] ClassfileError),
    #[error("malformed artifact {class}: {reason}")]
    MalformedArtifact { class: String, reason: String },
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Symbol(#[from] SymbolError),
    #[error("cannot decode pickle of {class}: {source}")]
    Pickle {
        class: String,
        #[source]
        source: PickleError,
    },
    #[error("{0} is already loaded")]
    AlreadyLoaded(String),
}

//! JVM class files into the clsem model.
//!
//! - `reader` / `constant_pool` / `structure`: a single scan that records
//!   section positions without decoding them
//! - `classify`: which of the four payload kinds a class carries
//! - `signatures` / `descriptors`: the descriptor and generic-signature
//!   grammar, lowered into the type algebra
//! - `loader`: entering a Java class, its statics module and members as one
//!   verified unit; Scala pickles go to a `PickleDecoder`

pub mod access;
pub mod classify;
pub mod constant_pool;
pub mod descriptors;
pub mod error;
pub mod loader;
pub mod options;
pub mod pickle;
pub mod reader;
pub mod signatures;
pub mod structure;

pub use classify::{ClassKind, classify};
pub use constant_pool::{Constant, ConstantPool};
pub use descriptors::{
    MemberShape, TypeDecoder, TypeScope, TypeVarBinding, decode_field_descriptor,
    decode_method_descriptor,
};
pub use error::{ClassfileError, DecodeError, DecodeErrorKind, LoadError, PickleError};
pub use loader::{LoadedClass, LoadedKind, load_class, load_class_file};
pub use options::LoaderOptions;
pub use pickle::{PickleDecoder, decode_scala_signature_bytes};
pub use reader::{ClassReader, Fork};
pub use signatures::Grammar;
pub use structure::{AttributeInfo, ClassStructure, MemberInfo};

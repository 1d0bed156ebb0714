//! Centralized limits for the recursive algorithms of the model.
//!
//! The type algebra is acyclic by construction, but symbols may reference
//! themselves through their declared types, and malformed input may describe
//! cyclic hierarchies. These bounds turn such inputs into errors or fixed
//! points instead of stack overflows.

/// Maximum number of unwrapping steps `widen` performs before returning the
/// type reached so far.
pub const MAX_WIDEN_STEPS: usize = 64;

/// Maximum alias unfoldings followed by `is_ref` and `dealias`.
pub const MAX_DEALIAS_STEPS: usize = 32;

/// Maximum nesting depth for substitution and instantiation. Deep enough for
/// a method over the largest array type a descriptor may name.
///
/// Exceeding it yields `TypeError::DepthExceeded`.
pub const MAX_SUBSTITUTION_DEPTH: usize = 512;

/// Maximum depth of the class hierarchy walked by linearization and
/// base-type computation.
pub const MAX_HIERARCHY_DEPTH: usize = 512;

/// Maximum array dimensions accepted by the descriptor decoder (JVMS 4.3.2).
pub const MAX_ARRAY_DIMENSIONS: usize = 255;

/// Maximum nesting of type arguments inside one signature.
pub const MAX_SIGNATURE_NESTING: usize = 128;

//! The pickle collaborator boundary.
//!
//! Classes compiled by Scala 2 carry their real declarations in a pickle
//! stored as a string inside a `ScalaSignature` annotation. This crate
//! extracts and unpacks that string; interpreting the pickle belongs to a
//! `PickleDecoder` supplied by the caller.

use crate::error::PickleError;
use clsem_common::SymbolId;
use clsem_solver::Context;

/// Populates the symbol table from a pickle payload.
///
/// `owner` is the package (or class) the pickled class is declared in and
/// `class_name` its simple name. The decoder enters and completes every
/// symbol it creates and returns them; the loader verifies them with
/// `check_completed` and rolls everything back if decoding fails.
pub trait PickleDecoder {
    fn decode(
        &mut self,
        ctx: &mut Context,
        owner: SymbolId,
        class_name: &str,
        payload: &[u8],
    ) -> Result<Vec<SymbolId>, PickleError>;
}

/// Unpack the string form of a `ScalaSignature` annotation into raw bytes.
///
/// Each character carries seven bits. A `0x00` character stands for `0x7F`;
/// every other character is one above the value it carries. The 7-bit groups
/// are packed little-endian into bytes.
pub fn decode_scala_signature_bytes(encoded: &str) -> Result<Vec<u8>, PickleError> {
    let mut out = Vec::with_capacity(encoded.len() * 7 / 8);
    let mut acc: u32 = 0;
    let mut bits = 0u32;
    for ch in encoded.chars() {
        let code = ch as u32;
        if code > 0x7F {
            return Err(PickleError::Malformed(format!(
                "character U+{code:04X} outside the 7-bit signature alphabet"
            )));
        }
        let value = if code == 0 { 0x7F } else { (code - 1) & 0x7F };
        acc |= value << bits;
        bits += 7;
        if bits >= 8 {
            out.push((acc & 0xFF) as u8);
            acc >>= 8;
            bits -= 8;
        }
    }
    // Fewer than 8 leftover bits are padding from the last character.
    Ok(out)
}

#[cfg(test)]
#[path = "tests/pickle_tests.rs"]
mod tests;

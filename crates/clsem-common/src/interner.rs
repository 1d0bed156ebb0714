//! String interner for name deduplication.
//!
//! Every simple name read from a class file (package segments, class names,
//! member names, type-variable names) is interned once and passed around as a
//! `u32` handle (`Atom`). Name comparisons become integer comparisons.
//!
//! The interner is sharded and internally locked so it can be shared by
//! reference: decoding interns through `&Interner`, and read-only queries may
//! intern well-known names concurrently after a session is published.

use rustc_hash::{FxHashMap, FxHasher};
use serde::Serialize;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// An interned string identifier.
///
/// Atoms are cheap to copy (just a u32) and can be compared with == in O(1).
/// To get the actual string, use `Interner::resolve(atom)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Atom(pub u32);

impl Atom {
    /// A sentinel value representing no atom / empty string.
    pub const NONE: Atom = Atom(0);

    /// Check if this is the empty/none atom.
    #[inline]
    pub fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Get the raw index value.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

const SHARD_BITS: u32 = 6;
const SHARD_COUNT: usize = 1 << SHARD_BITS;
const SHARD_MASK: u32 = (SHARD_COUNT as u32) - 1;

/// Names that show up in nearly every class file.
const COMMON_STRINGS: &[&str] = &[
    // Packages
    "scala",
    "java",
    "lang",
    "util",
    "io",
    // Root classes
    "Any",
    "AnyVal",
    "AnyRef",
    "Matchable",
    "Nothing",
    "Null",
    "Object",
    "String",
    "Array",
    "Unit",
    "Boolean",
    "Char",
    "Byte",
    "Short",
    "Int",
    "Long",
    "Float",
    "Double",
    // Special members
    "<init>",
    "<clinit>",
    "toString",
    "equals",
    "hashCode",
    "getClass",
    "clone",
    "finalize",
    "value",
    "values",
    "valueOf",
    // Attribute names
    "Code",
    "Signature",
    "Exceptions",
    "InnerClasses",
    "MethodParameters",
    "RuntimeVisibleAnnotations",
    "ScalaSig",
    "Scala",
    "TASTY",
];

#[derive(Default)]
struct ShardState {
    map: FxHashMap<Arc<str>, Atom>,
    strings: Vec<Arc<str>>,
}

struct InternerShard {
    state: RwLock<ShardState>,
}

impl InternerShard {
    fn new() -> Self {
        InternerShard {
            state: RwLock::new(ShardState::default()),
        }
    }

    // A shard is only ever appended to, so a poisoned one is still usable.
    fn read(&self) -> RwLockReadGuard<'_, ShardState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ShardState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sharded string interner for shared use.
///
/// Uses fixed buckets to reduce lock contention while keeping Atom lookups O(1).
pub struct Interner {
    shards: [InternerShard; SHARD_COUNT],
}

impl Interner {
    /// Create a new interner with the empty string pre-interned at index 0.
    pub fn new() -> Self {
        let shards: [InternerShard; SHARD_COUNT] = std::array::from_fn(|_| InternerShard::new());

        {
            let mut state = shards[0].write();
            let empty: Arc<str> = Arc::from("");
            state.strings.push(empty.clone());
            state.map.insert(empty, Atom::NONE);
        }

        Interner { shards }
    }

    /// Intern a string, returning its Atom handle.
    /// If the string was already interned, returns the existing Atom.
    #[inline]
    pub fn intern(&self, s: &str) -> Atom {
        if s.is_empty() {
            return Atom::NONE;
        }

        let shard_idx = Self::shard_for(s);
        let shard = &self.shards[shard_idx];

        if let Some(&atom) = shard.read().map.get(s) {
            return atom;
        }

        let mut state = shard.write();

        if let Some(&atom) = state.map.get(s) {
            return atom;
        }

        let local_index = state.strings.len() as u32;
        if local_index > (u32::MAX >> SHARD_BITS) {
            return Atom::NONE;
        }

        let atom = Self::make_atom(local_index, shard_idx as u32);
        let owned: Arc<str> = Arc::from(s);
        state.strings.push(owned.clone());
        state.map.insert(owned, atom);
        atom
    }

    /// Look up a string without interning it.
    pub fn get(&self, s: &str) -> Option<Atom> {
        if s.is_empty() {
            return Some(Atom::NONE);
        }
        self.shards[Self::shard_for(s)].read().map.get(s).copied()
    }

    /// Resolve an Atom back to its string value.
    /// Returns empty string if atom is out of bounds.
    #[inline]
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.try_resolve(atom).unwrap_or_else(|| Arc::from(""))
    }

    /// Try to resolve an Atom, returning None if invalid.
    #[inline]
    pub fn try_resolve(&self, atom: Atom) -> Option<Arc<str>> {
        let (shard_idx, local_index) = Self::split_atom(atom);
        let shard = self.shards.get(shard_idx)?;
        shard.read().strings.get(local_index).cloned()
    }

    /// Get the number of interned strings.
    #[inline]
    pub fn len(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().strings.len()).sum()
    }

    /// Check if the interner is empty (only has the empty string).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() <= 1
    }

    /// Pre-intern package, class and attribute names common to class files.
    pub fn intern_common(&self) {
        for s in COMMON_STRINGS {
            self.intern(s);
        }
    }

    #[inline]
    fn shard_for(s: &str) -> usize {
        let mut hasher = FxHasher::default();
        s.hash(&mut hasher);
        (hasher.finish() as usize) & (SHARD_COUNT - 1)
    }

    #[inline]
    fn make_atom(local_index: u32, shard_idx: u32) -> Atom {
        Atom((local_index << SHARD_BITS) | (shard_idx & SHARD_MASK))
    }

    #[inline]
    fn split_atom(atom: Atom) -> (usize, usize) {
        if atom == Atom::NONE {
            return (0, 0);
        }
        let raw = atom.0;
        ((raw & SHARD_MASK) as usize, (raw >> SHARD_BITS) as usize)
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "tests/interner_tests.rs"]
mod tests;

//! String interning for type names and root descriptions.
//!
//! A snapshot contains thousands of objects but only a handful of distinct
//! type names. Storing xxh3 hashes in the model and resolving them through
//! one shared table keeps both the in-memory graph and the archive small.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

/// Hash-keyed string table.
///
/// The hash of the empty string is never stored; hash value 0 is reserved
/// as "no string" throughout the model.
#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct StringInterner {
    strings: HashMap<u64, String>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `s` and returns its hash. Empty strings map to 0 and are
    /// not stored.
    pub fn intern(&mut self, s: &str) -> u64 {
        if s.is_empty() {
            return 0;
        }
        let hash = xxh3_64(s.as_bytes());
        self.strings.entry(hash).or_insert_with(|| s.to_string());
        hash
    }

    /// Resolves a previously interned hash.
    pub fn resolve(&self, hash: u64) -> Option<&str> {
        self.strings.get(&hash).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_resolve() {
        let mut interner = StringInterner::new();
        let hash = interner.intern("runtime.mcache");
        assert_ne!(hash, 0);
        assert_eq!(interner.resolve(hash), Some("runtime.mcache"));
        assert_eq!(interner.resolve(0xdead), None);
    }

    #[test]
    fn test_intern_stable_hash() {
        let mut a = StringInterner::new();
        let mut b = StringInterner::new();
        assert_eq!(a.intern("main.T"), b.intern("main.T"));
        assert_eq!(a.len(), 1);
        a.intern("main.T");
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn test_intern_empty_reserved() {
        let mut interner = StringInterner::new();
        assert_eq!(interner.intern(""), 0);
        assert!(interner.is_empty());
        assert_eq!(interner.resolve(0), None);
    }
}

//! Record Keys
//!
//! This module defines the `Key` type used to address records in a store
//! file, and the `KeyIndex` map the writer maintains and the reader loads.
//!
//! ## Structure
//! A key is either an integer or a string. Both kinds may coexist in one
//! store file; the index orders all integer keys before all string keys,
//! integers numerically and strings lexicographically.
//!
//! ## Design Decisions
//! - `Key` derives `Ord` so the index can live in a `BTreeMap`, giving a
//!   stable on-disk entry order and sorted key listings for free
//! - `From` impls for common key-shaped types keep call sites terse
//!   (`writer.append(100, ...)`, `reader.read("alpha")`)

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A record key: an integer or a string
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Key {
    /// Integer key
    Int(i64),

    /// String key
    Str(String),
}

/// Map from key to the byte offset of its record block.
///
/// Ordered so that index encoding and key listings are deterministic for a
/// given key set.
pub type KeyIndex = BTreeMap<Key, u64>;

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Int(n) => write!(f, "{}", n),
            Key::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for Key {
    fn from(n: i64) -> Self {
        Key::Int(n)
    }
}

impl From<i32> for Key {
    fn from(n: i32) -> Self {
        Key::Int(n as i64)
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Str(s.to_string())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Str(s)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_keys_sort_before_str_keys() {
        let mut index = KeyIndex::new();
        index.insert(Key::from("alpha"), 3);
        index.insert(Key::from(200), 2);
        index.insert(Key::from(100), 1);

        let keys: Vec<Key> = index.keys().cloned().collect();
        assert_eq!(
            keys,
            vec![Key::Int(100), Key::Int(200), Key::Str("alpha".to_string())]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Key::from(42).to_string(), "42");
        assert_eq!(Key::from("beta").to_string(), "beta");
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(Key::from(7i32), Key::Int(7));
        assert_eq!(Key::from(7i64), Key::Int(7));
        assert_eq!(Key::from("x".to_string()), Key::Str("x".to_string()));
        assert_eq!(Key::from(&Key::Int(5)), Key::Int(5));
    }
}

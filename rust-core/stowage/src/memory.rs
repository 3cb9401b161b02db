// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Stowage contributors
//
// In-memory storage provider.
//
// A sorted map from identifier to bytes, with no locking: the facade hands
// out `&mut` for writes. Used for tests, ephemeral stores, and as the
// default when the persistent provider is compiled out.

use std::collections::BTreeMap;

use crate::provider::StorageProvider;

/// An in-memory provider backed by a `BTreeMap`.
///
/// All data lives in process memory and is lost on drop.
///
/// # Example
///
/// ```rust
/// use stowage::{MemoryProvider, StorageProvider};
///
/// let mut store = MemoryProvider::new();
/// store.set("hello", b"world");
/// assert_eq!(store.get("hello"), Some(b"world".to_vec()));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryProvider {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryProvider {
    /// Create a new, empty in-memory provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the number of identifiers currently stored.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return true if bytes are stored under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate stored identifiers in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<Vec<u8>>> FromIterator<(K, V)> for MemoryProvider {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl StorageProvider for MemoryProvider {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, bytes: &[u8]) {
        self.entries.insert(key.to_string(), bytes.to_vec());
    }

    fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }

    fn name(&self) -> &str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_crud() {
        let mut provider = MemoryProvider::new();

        // Initially empty.
        assert!(provider.is_empty());
        assert_eq!(provider.get("key1"), None);
        assert!(!provider.contains("key1"));

        // Set and get.
        provider.set("key1", b"value1");
        assert_eq!(provider.get("key1"), Some(b"value1".to_vec()));
        assert!(provider.contains("key1"));
        assert_eq!(provider.len(), 1);

        // Overwrite.
        provider.set("key1", b"updated");
        assert_eq!(provider.get("key1"), Some(b"updated".to_vec()));
        assert_eq!(provider.len(), 1);

        // Delete existing key.
        provider.delete("key1");
        assert_eq!(provider.get("key1"), None);
        assert!(provider.is_empty());

        // Delete non-existent key is a no-op.
        provider.delete("nonexistent");
        assert!(provider.is_empty());
    }

    #[test]
    fn test_empty_bytes_are_present() {
        let mut provider = MemoryProvider::new();
        provider.set("blank", b"");
        assert_eq!(provider.get("blank"), Some(Vec::new()));
    }

    #[test]
    fn test_keys_sorted() {
        let provider: MemoryProvider =
            [("zeta", b"1".to_vec()), ("alpha", b"2".to_vec()), ("mid", b"3".to_vec())]
                .into_iter()
                .collect();

        let keys: Vec<&str> = provider.keys().collect();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut provider = MemoryProvider::new();
        provider.set("shared", b"data");

        let snapshot = provider.clone();
        provider.set("shared", b"changed");

        assert_eq!(snapshot.get("shared"), Some(b"data".to_vec()));
        assert_eq!(provider.get("shared"), Some(b"changed".to_vec()));
    }

    #[test]
    fn test_name() {
        assert_eq!(MemoryProvider::new().name(), "in-memory");
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Stowage contributors
//
// Metrics-collecting wrapper for storage providers.
//
// Wraps any `StorageProvider` and transparently counts operations. Reads
// take `&self`, so the counters are atomics rather than plain integers.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::provider::StorageProvider;

/// A snapshot of the counters kept by a [`MetricsProvider`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProviderStats {
    /// Number of `get` calls.
    pub get_count: u64,
    /// Number of `get` calls that found bytes.
    pub hit_count: u64,
    /// Number of `set` calls.
    pub set_count: u64,
    /// Number of `delete` calls.
    pub delete_count: u64,
}

impl ProviderStats {
    /// Number of `get` calls that found nothing.
    ///
    /// Saturates at zero: a snapshot taken while other threads read may
    /// observe a hit before the matching get.
    pub fn miss_count(&self) -> u64 {
        self.get_count.saturating_sub(self.hit_count)
    }
}

/// A provider wrapper that counts operations.
///
/// # Example
///
/// ```rust
/// use stowage::{MemoryProvider, MetricsProvider, StorageProvider};
///
/// let mut metered = MetricsProvider::new(MemoryProvider::new());
/// metered.set("key", b"value");
/// metered.get("key");
///
/// let stats = metered.stats();
/// assert_eq!(stats.set_count, 1);
/// assert_eq!(stats.hit_count, 1);
/// ```
#[derive(Debug)]
pub struct MetricsProvider<P: StorageProvider> {
    inner: P,
    gets: AtomicU64,
    hits: AtomicU64,
    sets: AtomicU64,
    deletes: AtomicU64,
}

impl<P: StorageProvider> MetricsProvider<P> {
    /// Wrap `inner` with operation counting.
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            gets: AtomicU64::new(0),
            hits: AtomicU64::new(0),
            sets: AtomicU64::new(0),
            deletes: AtomicU64::new(0),
        }
    }

    /// Return a snapshot of the current counters.
    pub fn stats(&self) -> ProviderStats {
        // Hits are bumped after gets, so load them first.
        let hit_count = self.hits.load(Ordering::Acquire);
        ProviderStats {
            get_count: self.gets.load(Ordering::Acquire),
            hit_count,
            set_count: self.sets.load(Ordering::Relaxed),
            delete_count: self.deletes.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset_stats(&mut self) {
        *self.gets.get_mut() = 0;
        *self.hits.get_mut() = 0;
        *self.sets.get_mut() = 0;
        *self.deletes.get_mut() = 0;
    }

    /// Return a reference to the wrapped provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Unwrap, discarding the counters.
    pub fn into_inner(self) -> P {
        self.inner
    }
}

impl<P: StorageProvider> StorageProvider for MetricsProvider<P> {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.gets.fetch_add(1, Ordering::Release);
        let result = self.inner.get(key);
        if result.is_some() {
            self.hits.fetch_add(1, Ordering::Release);
        }
        result
    }

    fn set(&mut self, key: &str, bytes: &[u8]) {
        self.inner.set(key, bytes);
        *self.sets.get_mut() += 1;
    }

    fn delete(&mut self, key: &str) {
        self.inner.delete(key);
        *self.deletes.get_mut() += 1;
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

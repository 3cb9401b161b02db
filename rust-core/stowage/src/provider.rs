// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Stowage contributors
//
// Storage provider trait.
//
// A provider stores opaque byte blobs under string identifiers. It knows
// nothing about value types or encodings; the `Storage` facade does all of
// that. Providers are synchronous and infallible from the caller's point of
// view: how a provider reacts to a failing medium (halt, retry, drop) is its
// own policy.

/// A pluggable byte-blob store keyed by string identifier.
///
/// Implement this to route the facade to your own medium (an encrypted
/// store, a remote service, a file per key). Reads take `&self`; writes take
/// `&mut self`, so a provider needs no internal locking unless it is shared
/// outside the facade.
pub trait StorageProvider: Send {
    /// Retrieve the bytes stored for `key`.
    ///
    /// Returns `None` if nothing was ever stored or it was deleted.
    fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Store `bytes` under `key`, overwriting any previous value.
    fn set(&mut self, key: &str, bytes: &[u8]);

    /// Remove whatever is stored under `key`. A no-op if nothing is.
    fn delete(&mut self, key: &str);

    /// A human-readable name for this provider, used in logging.
    fn name(&self) -> &str {
        "custom"
    }
}

impl<P: StorageProvider + ?Sized> StorageProvider for Box<P> {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, bytes: &[u8]) {
        (**self).set(key, bytes)
    }

    fn delete(&mut self, key: &str) {
        (**self).delete(key)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

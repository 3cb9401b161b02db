// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Stowage contributors
//
// The typed storage facade.
//
// `Storage` owns the active provider and translates typed keys and values
// into provider calls. Values are encoded as JSON. The contract:
//
// - A read returns `None` when nothing is stored *or* the stored bytes do not
//   decode as the key's value type. The two cases are indistinguishable to
//   the caller; the decode failure is only logged.
// - A write of `Some(value)` encodes and stores; a write of `None` deletes.
// - Failing to encode a value is a programming error and panics. `try_put`
//   exposes the same condition as a `Result` for callers that need it.

use tracing::{debug, trace, warn};

use crate::config::{BackendKind, StorageConfig};
use crate::error::StorageError;
use crate::key::StorageKey;
use crate::memory::MemoryProvider;
use crate::provider::StorageProvider;

/// Typed access to the active storage provider.
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use stowage::{storage_key, Storage};
///
/// #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// struct Person {
///     id: u32,
///     name: String,
/// }
///
/// storage_key! {
///     PeopleKey: Vec<Person> = "people";
/// }
///
/// let mut storage = Storage::in_memory();
/// assert_eq!(storage.get::<PeopleKey>(), None);
///
/// let alice = Person { id: 1, name: "Alice".into() };
/// storage.put::<PeopleKey>(&vec![alice.clone()]);
/// assert_eq!(storage.get::<PeopleKey>(), Some(vec![alice]));
///
/// storage.set::<PeopleKey>(None);
/// assert_eq!(storage.get::<PeopleKey>(), None);
/// ```
pub struct Storage {
    provider: Box<dyn StorageProvider>,
}

impl Storage {
    /// Create a facade routing to `provider`.
    pub fn new(provider: impl StorageProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
        }
    }

    /// Create a facade over a fresh [`MemoryProvider`].
    pub fn in_memory() -> Self {
        Self::new(MemoryProvider::new())
    }

    /// Create a facade over the provider described by `config`.
    pub fn from_config(config: &StorageConfig) -> Result<Self, StorageError> {
        match config.backend {
            BackendKind::Memory => Ok(Self::in_memory()),
            #[cfg(feature = "redb-provider")]
            BackendKind::Redb => {
                let path = config.resolved_path()?;
                let provider = crate::redb_provider::RedbProvider::open_with_policy(
                    path,
                    config.on_medium_failure,
                )?;
                Ok(Self::new(provider))
            }
            #[cfg(not(feature = "redb-provider"))]
            BackendKind::Redb => Err(StorageError::InvalidConfig(
                "redb backend requested but the `redb-provider` feature is disabled".to_string(),
            )),
        }
    }

    /// Open the process default: configuration from `STOWAGE_*` environment
    /// variables, falling back to a redb file in the platform data directory.
    pub fn open_default() -> Result<Self, StorageError> {
        Self::from_config(&StorageConfig::from_env()?)
    }

    /// The active provider.
    pub fn provider(&self) -> &dyn StorageProvider {
        self.provider.as_ref()
    }

    /// The active provider, mutably. Writes made here bypass encoding.
    pub fn provider_mut(&mut self) -> &mut dyn StorageProvider {
        self.provider.as_mut()
    }

    /// Route all future operations to `provider`, returning the previous one.
    ///
    /// Nothing is migrated; the old provider keeps its own state.
    pub fn replace_provider(
        &mut self,
        provider: impl StorageProvider + 'static,
    ) -> Box<dyn StorageProvider> {
        let previous = std::mem::replace(&mut self.provider, Box::new(provider));
        debug!(
            previous = previous.name(),
            active = self.provider.name(),
            "replaced storage provider"
        );
        previous
    }

    /// Read the value stored for `K`.
    ///
    /// Returns `None` if nothing is stored or the stored bytes cannot be
    /// decoded as `K::Value`.
    pub fn get<K: StorageKey>(&self) -> Option<K::Value> {
        let bytes = self.provider.get(K::KEY)?;

        match serde_json::from_slice(&bytes) {
            Ok(value) => {
                trace!(
                    key = K::KEY,
                    provider = self.provider.name(),
                    len = bytes.len(),
                    "read value"
                );
                Some(value)
            }
            Err(err) => {
                warn!(
                    key = K::KEY,
                    provider = self.provider.name(),
                    error = %err,
                    "stored value could not be decoded, treating as absent"
                );
                None
            }
        }
    }

    /// Read the value stored for `K`, or `K::Value::default()` if absent.
    pub fn get_or_default<K>(&self) -> K::Value
    where
        K: StorageKey,
        K::Value: Default,
    {
        self.get::<K>().unwrap_or_default()
    }

    /// Write `value` for `K`, or delete the entry when `value` is `None`.
    ///
    /// # Panics
    ///
    /// Panics if `value` cannot be encoded.
    #[track_caller]
    pub fn set<K: StorageKey>(&mut self, value: Option<&K::Value>) {
        match value {
            Some(value) => self.put::<K>(value),
            None => self.remove::<K>(),
        }
    }

    /// Encode and store `value` for `K`, overwriting any previous value.
    ///
    /// # Panics
    ///
    /// Panics if `value` cannot be encoded.
    #[track_caller]
    pub fn put<K: StorageKey>(&mut self, value: &K::Value) {
        if let Err(err) = self.try_put::<K>(value) {
            panic!("{err}");
        }
    }

    /// Encode and store `value` for `K`, returning the encode error instead
    /// of panicking. Nothing is written on failure.
    pub fn try_put<K: StorageKey>(&mut self, value: &K::Value) -> Result<(), StorageError> {
        let bytes = serde_json::to_vec(value)
            .map_err(|source| StorageError::Encode { key: K::KEY, source })?;

        trace!(
            key = K::KEY,
            provider = self.provider.name(),
            len = bytes.len(),
            "write value"
        );
        self.provider.set(K::KEY, &bytes);
        Ok(())
    }

    /// Delete whatever is stored for `K`. A no-op if nothing is.
    pub fn remove<K: StorageKey>(&mut self) {
        trace!(key = K::KEY, provider = self.provider.name(), "delete value");
        self.provider.delete(K::KEY);
    }

    /// Read-modify-write `K`, starting from `K::Value::default()` when absent.
    ///
    /// # Panics
    ///
    /// Panics if the modified value cannot be encoded.
    #[track_caller]
    pub fn update<K, R>(&mut self, f: impl FnOnce(&mut K::Value) -> R) -> R
    where
        K: StorageKey,
        K::Value: Default,
    {
        let mut value = self.get_or_default::<K>();
        let out = f(&mut value);
        self.put::<K>(&value);
        out
    }
}

impl Default for Storage {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl std::fmt::Debug for Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storage")
            .field("provider", &self.provider.name())
            .finish()
    }
}

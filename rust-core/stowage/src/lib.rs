// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Stowage contributors
//
// Stowage: typed key-value persistence
//
// Callers declare typed keys, each pairing a unique string identifier with a
// serde value type. The `Storage` facade encodes values to bytes, hands them
// to a pluggable `StorageProvider`, and decodes them on the way back.
//
// # Modules
//
// - [`key`] -- The `StorageKey` trait and the `storage_key!` macro.
// - [`provider`] -- The `StorageProvider` byte-blob trait.
// - [`storage`] -- The `Storage` facade.
// - [`memory`] -- An unlocked in-memory provider for tests and ephemeral use.
// - [`redb_provider`] -- The persistent default provider (feature
//   `redb-provider`).
// - [`metrics`] -- A transparent wrapper counting provider operations.
// - [`config`] -- Startup configuration for the default provider.
// - [`error`] -- The `StorageError` enum.
//
// # Example
//
// ```rust
// use stowage::{storage_key, Storage};
//
// storage_key! {
//     RecentFilesKey: Vec<String> = "recent-files";
// }
//
// let mut storage = Storage::in_memory();
// storage.update::<RecentFilesKey, _>(|files| files.push("notes.txt".into()));
// assert_eq!(storage.get::<RecentFilesKey>(), Some(vec!["notes.txt".to_string()]));
// ```

pub mod config;
pub mod error;
pub mod key;
pub mod memory;
pub mod metrics;
pub mod provider;
pub mod storage;

// Optional persistent provider, feature-gated so embedders can drop redb.
#[cfg(feature = "redb-provider")]
pub mod redb_provider;

pub use config::{BackendKind, MediumFailurePolicy, StorageConfig};
pub use error::StorageError;
pub use key::StorageKey;
pub use memory::MemoryProvider;
pub use metrics::{MetricsProvider, ProviderStats};
pub use provider::StorageProvider;
pub use storage::Storage;

#[cfg(feature = "redb-provider")]
pub use redb_provider::RedbProvider;

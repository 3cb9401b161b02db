// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Stowage contributors
//
// redb-backed persistent storage provider.
//
// This is the default provider the facade is wired to at startup. Uses redb
// (pure Rust, B-tree, ACID, single-file database), so builds need no C/C++
// toolchain.
//
// # Design
//
// - Single redb `Database` file containing one table of `&str -> &[u8]`.
// - One read transaction per `get`, one write transaction per `set`/`delete`.
//   redb fsyncs on commit, so every facade write is durable when it returns.
// - The table is created on first write; reads before that are absent.
// - The fallible `try_*` methods report medium failures. The
//   `StorageProvider` impl routes them through the configured
//   `MediumFailurePolicy`.

use std::path::{Path, PathBuf};

use redb::{Database, ReadableDatabase, TableDefinition, TableError};
use tracing::{debug, error};

use crate::config::MediumFailurePolicy;
use crate::error::StorageError;
use crate::provider::StorageProvider;

/// Table holding every stored identifier.
const ENTRIES: TableDefinition<&str, &[u8]> = TableDefinition::new("entries");

/// A persistent provider powered by redb.
///
/// # Example
///
/// ```rust,no_run
/// use stowage::{RedbProvider, StorageProvider};
///
/// let mut store = RedbProvider::open("/tmp/stowage-example.redb").unwrap();
/// store.set("hello", b"world");
/// assert_eq!(store.get("hello"), Some(b"world".to_vec()));
/// ```
pub struct RedbProvider {
    db: Database,
    path: PathBuf,
    policy: MediumFailurePolicy,
}

impl RedbProvider {
    /// Open or create a redb database at `path` with the default
    /// [`MediumFailurePolicy::Halt`].
    ///
    /// Creates parent directories if they don't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        Self::open_with_policy(path, MediumFailurePolicy::default())
    }

    /// Open or create a redb database at `path` with an explicit policy.
    pub fn open_with_policy(
        path: impl AsRef<Path>,
        policy: MediumFailurePolicy,
    ) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::create(&path).map_err(|e| {
            StorageError::Backend(format!("failed to open redb at {}: {e}", path.display()))
        })?;

        debug!(path = %path.display(), ?policy, "opened redb provider");

        Ok(Self { db, path, policy })
    }

    /// Return the filesystem path of the database file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the medium-failure policy in effect.
    pub fn policy(&self) -> MediumFailurePolicy {
        self.policy
    }

    /// Read the bytes stored under `key`, reporting medium failures.
    pub fn try_get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let txn = self
            .db
            .begin_read()
            .map_err(|e| StorageError::Backend(format!("read txn: {e}")))?;

        let table = match txn.open_table(ENTRIES) {
            Ok(t) => t,
            // Nothing has been written yet.
            Err(TableError::TableDoesNotExist(_)) => return Ok(None),
            Err(e) => return Err(StorageError::Backend(format!("open table: {e}"))),
        };

        match table.get(key) {
            Ok(Some(value)) => Ok(Some(value.value().to_vec())),
            Ok(None) => Ok(None),
            Err(e) => Err(StorageError::Corrupted(format!("get: {e}"))),
        }
    }

    /// Store `bytes` under `key` in a single committed transaction.
    pub fn try_set(&self, key: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| StorageError::Backend(format!("write txn: {e}")))?;
        {
            let mut table = txn
                .open_table(ENTRIES)
                .map_err(|e| StorageError::Backend(format!("open table: {e}")))?;
            table
                .insert(key, bytes)
                .map_err(|e| StorageError::Corrupted(format!("insert: {e}")))?;
        }
        txn.commit()
            .map_err(|e| StorageError::Backend(format!("commit: {e}")))?;
        Ok(())
    }

    /// Remove `key`. Returns `Ok(true)` if something was stored.
    pub fn try_delete(&self, key: &str) -> Result<bool, StorageError> {
        let txn = self
            .db
            .begin_write()
            .map_err(|e| StorageError::Backend(format!("write txn: {e}")))?;
        let existed = {
            let mut table = txn
                .open_table(ENTRIES)
                .map_err(|e| StorageError::Backend(format!("open table: {e}")))?;
            let removed = table
                .remove(key)
                .map_err(|e| StorageError::Corrupted(format!("remove: {e}")))?;
            removed.is_some()
        };
        txn.commit()
            .map_err(|e| StorageError::Backend(format!("commit: {e}")))?;
        Ok(existed)
    }

    /// Apply the medium-failure policy to a failed operation.
    fn medium_failure(&self, op: &str, key: &str, err: StorageError) {
        match self.policy {
            MediumFailurePolicy::Halt => {
                panic!("redb provider at {}: {op} '{key}' failed: {err}", self.path.display())
            }
            MediumFailurePolicy::Ignore => {
                error!(
                    path = %self.path.display(),
                    op,
                    key,
                    error = %err,
                    "storage medium failure ignored"
                );
            }
        }
    }
}

impl std::fmt::Debug for RedbProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbProvider")
            .field("path", &self.path)
            .field("policy", &self.policy)
            .finish()
    }
}

impl StorageProvider for RedbProvider {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(err) => {
                self.medium_failure("get", key, err);
                None
            }
        }
    }

    fn set(&mut self, key: &str, bytes: &[u8]) {
        if let Err(err) = self.try_set(key, bytes) {
            self.medium_failure("set", key, err);
        }
    }

    fn delete(&mut self, key: &str) {
        if let Err(err) = self.try_delete(key) {
            self.medium_failure("delete", key, err);
        }
    }

    fn name(&self) -> &str {
        "redb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Create a temporary RedbProvider for testing.
    ///
    /// The `TempDir` must outlive the provider so the file is not unlinked
    /// while redb holds it open.
    fn temp_provider() -> (RedbProvider, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let provider = RedbProvider::open(dir.path().join("test.redb")).unwrap();
        (provider, dir)
    }

    #[test]
    fn test_basic_crud() {
        let (mut provider, _dir) = temp_provider();

        // Get on a fresh database returns None
        assert_eq!(provider.get("key1"), None);

        // Set and get
        provider.set("key1", b"value1");
        assert_eq!(provider.get("key1"), Some(b"value1".to_vec()));

        // Overwrite
        provider.set("key1", b"updated");
        assert_eq!(provider.get("key1"), Some(b"updated".to_vec()));

        // Delete
        provider.delete("key1");
        assert_eq!(provider.get("key1"), None);

        // Delete of a missing key is a no-op
        provider.delete("key1");
        assert_eq!(provider.get("key1"), None);
    }

    #[test]
    fn test_try_delete_reports_existence() {
        let (provider, _dir) = temp_provider();

        // Table does not exist yet; delete creates it and finds nothing.
        assert!(!provider.try_delete("missing").unwrap());

        provider.try_set("present", b"x").unwrap();
        assert!(provider.try_delete("present").unwrap());
        assert!(!provider.try_delete("present").unwrap());
    }

    #[test]
    #[should_panic(expected = "get 'people' failed: backend failure: read txn: disk gone")]
    fn test_halt_policy_panics_on_medium_failure() {
        let (provider, _dir) = temp_provider();
        assert_eq!(provider.policy(), MediumFailurePolicy::Halt);
        provider.medium_failure(
            "get",
            "people",
            StorageError::Backend("read txn: disk gone".to_string()),
        );
    }

    #[test]
    fn test_ignore_policy_logs_and_continues() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ignore.redb");
        let mut provider =
            RedbProvider::open_with_policy(&path, MediumFailurePolicy::Ignore).unwrap();
        assert_eq!(provider.policy(), MediumFailurePolicy::Ignore);

        provider.medium_failure(
            "set",
            "people",
            StorageError::Corrupted("insert: page checksum".to_string()),
        );

        // The provider stays usable after an ignored failure.
        provider.set("people", b"[]");
        assert_eq!(provider.get("people"), Some(b"[]".to_vec()));
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("store.redb");

        let provider = RedbProvider::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(provider.path(), path.as_path());
        assert_eq!(provider.policy(), MediumFailurePolicy::Halt);
    }

    #[test]
    fn test_persistence_across_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("persist.redb");

        {
            let mut provider = RedbProvider::open(&path).unwrap();
            provider.set("persistent-key", b"persistent-value");
        }

        {
            let provider = RedbProvider::open(&path).unwrap();
            assert_eq!(
                provider.get("persistent-key"),
                Some(b"persistent-value".to_vec())
            );
        }
    }

    #[test]
    fn test_open_on_directory_fails() {
        let dir = tempdir().unwrap();
        let result = RedbProvider::open(dir.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_name_and_debug() {
        let (provider, _dir) = temp_provider();
        assert_eq!(provider.name(), "redb");
        assert!(format!("{provider:?}").contains("RedbProvider"));
    }
}

// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Stowage contributors
//
// Error types for the Stowage facade and its providers.
//
// Reads through the facade never surface these: a missing key and an
// undecodable value both come back as `None`. Errors appear when opening a
// persistent provider, when loading configuration, and through the explicit
// `Storage::try_put` escape hatch for encode failures.

use thiserror::Error;

/// Errors that can occur when configuring or opening storage, or when a value
/// cannot be encoded.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred while preparing the storage location.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The storage medium failed (open, transaction, or commit).
    #[error("backend failure: {0}")]
    Backend(String),

    /// The storage medium returned data it could not read back.
    #[error("corrupted data: {0}")]
    Corrupted(String),

    /// A value could not be encoded for the given key identifier.
    #[error("failed to encode value for key '{key}': {source}")]
    Encode {
        /// Identifier of the key being written.
        key: &'static str,
        /// The underlying encoder error.
        #[source]
        source: serde_json::Error,
    },

    /// The storage configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

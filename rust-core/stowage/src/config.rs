// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Stowage contributors
//! Storage configuration.
//!
//! Defaults:
//! - backend: redb (in-memory when the `redb-provider` feature is off)
//! - path: `<platform data dir>/stowage/storage.redb`
//! - on_medium_failure: halt

use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::StorageError;

/// Environment variable selecting the backend (`memory` or `redb`).
pub const ENV_BACKEND: &str = "STOWAGE_BACKEND";
/// Environment variable overriding the persistent store path.
pub const ENV_PATH: &str = "STOWAGE_PATH";
/// Environment variable selecting the medium-failure policy (`halt` or `ignore`).
pub const ENV_ON_MEDIUM_FAILURE: &str = "STOWAGE_ON_MEDIUM_FAILURE";

/// Which provider the facade is wired to at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Process-local map, lost on exit.
    Memory,
    /// Single-file redb database.
    Redb,
}

impl Default for BackendKind {
    fn default() -> Self {
        if cfg!(feature = "redb-provider") {
            BackendKind::Redb
        } else {
            BackendKind::Memory
        }
    }
}

impl FromStr for BackendKind {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "redb" => Ok(BackendKind::Redb),
            other => Err(StorageError::InvalidConfig(format!(
                "unknown backend '{other}' (expected 'memory' or 'redb')"
            ))),
        }
    }
}

/// What a persistent provider does when its medium fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediumFailurePolicy {
    /// Panic with the medium error.
    #[default]
    Halt,
    /// Log at error level; reads become absent and writes are dropped.
    Ignore,
}

impl FromStr for MediumFailurePolicy {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "halt" => Ok(MediumFailurePolicy::Halt),
            "ignore" => Ok(MediumFailurePolicy::Ignore),
            other => Err(StorageError::InvalidConfig(format!(
                "unknown medium failure policy '{other}' (expected 'halt' or 'ignore')"
            ))),
        }
    }
}

/// Configuration for the provider wired into [`crate::Storage`] at startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend to open.
    pub backend: BackendKind,
    /// Location of the persistent store. `None` uses the platform data dir.
    pub path: Option<PathBuf>,
    /// Reaction of the persistent provider to medium failures.
    pub on_medium_failure: MediumFailurePolicy,
}

impl StorageConfig {
    /// An in-memory configuration.
    pub fn memory() -> Self {
        Self {
            backend: BackendKind::Memory,
            ..Self::default()
        }
    }

    /// A redb configuration at an explicit path.
    pub fn redb(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendKind::Redb,
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Load configuration from `STOWAGE_*` environment variables.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Result<Self, StorageError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, StorageError> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_BACKEND) {
            config.backend = raw.parse()?;
        }
        if let Some(raw) = lookup(ENV_PATH).filter(|p| !p.trim().is_empty()) {
            config.path = Some(PathBuf::from(raw));
        }
        if let Some(raw) = lookup(ENV_ON_MEDIUM_FAILURE) {
            config.on_medium_failure = raw.parse()?;
        }

        Ok(config)
    }

    /// The persistent store location: the explicit path, or
    /// `<data dir>/stowage/storage.redb`.
    pub fn resolved_path(&self) -> Result<PathBuf, StorageError> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        dirs::data_dir()
            .map(|dir| dir.join("stowage").join("storage.redb"))
            .ok_or_else(|| {
                StorageError::InvalidConfig(
                    "no storage path configured and no platform data directory".to_string(),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = StorageConfig::default();
        assert_eq!(config.path, None);
        assert_eq!(config.on_medium_failure, MediumFailurePolicy::Halt);
        #[cfg(feature = "redb-provider")]
        assert_eq!(config.backend, BackendKind::Redb);
        #[cfg(not(feature = "redb-provider"))]
        assert_eq!(config.backend, BackendKind::Memory);
    }

    #[test]
    fn test_from_lookup_empty_keeps_defaults() {
        let config = StorageConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, StorageConfig::default());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = StorageConfig::from_lookup(lookup_from(&[
            (ENV_BACKEND, "Memory"),
            (ENV_PATH, "/var/lib/app/store.redb"),
            (ENV_ON_MEDIUM_FAILURE, " ignore "),
        ]))
        .unwrap();

        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.path, Some(PathBuf::from("/var/lib/app/store.redb")));
        assert_eq!(config.on_medium_failure, MediumFailurePolicy::Ignore);
    }

    #[test]
    fn test_from_lookup_blank_path_ignored() {
        let config = StorageConfig::from_lookup(lookup_from(&[(ENV_PATH, "  ")])).unwrap();
        assert_eq!(config.path, None);
    }

    #[test]
    fn test_from_lookup_rejects_unknown_values() {
        let err =
            StorageConfig::from_lookup(lookup_from(&[(ENV_BACKEND, "floppy")])).unwrap_err();
        assert!(matches!(err, StorageError::InvalidConfig(msg) if msg.contains("floppy")));

        let err = StorageConfig::from_lookup(lookup_from(&[(ENV_ON_MEDIUM_FAILURE, "retry")]))
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidConfig(_)));
    }

    #[test]
    fn test_resolved_path_prefers_explicit() {
        let config = StorageConfig::redb("/tmp/explicit.redb");
        assert_eq!(
            config.resolved_path().unwrap(),
            PathBuf::from("/tmp/explicit.redb")
        );
    }

    #[test]
    fn test_resolved_path_falls_back_to_data_dir() {
        let config = StorageConfig::default();
        match dirs::data_dir() {
            Some(dir) => assert_eq!(
                config.resolved_path().unwrap(),
                dir.join("stowage").join("storage.redb")
            ),
            None => assert!(config.resolved_path().is_err()),
        }
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = StorageConfig {
            backend: BackendKind::Memory,
            path: Some(PathBuf::from("/data/s.redb")),
            on_medium_failure: MediumFailurePolicy::Ignore,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"memory\""));
        assert!(json.contains("\"ignore\""));
        let parsed: StorageConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let parsed: StorageConfig = serde_json::from_str(r#"{"backend":"memory"}"#).unwrap();
        assert_eq!(parsed.backend, BackendKind::Memory);
        assert_eq!(parsed.on_medium_failure, MediumFailurePolicy::Halt);
        assert_eq!(parsed.path, None);
    }
}

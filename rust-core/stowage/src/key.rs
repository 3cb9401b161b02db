// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Stowage contributors
//
// Typed storage keys.
//
// A key is never instantiated for storage purposes: the facade is called with
// the key as a type parameter (`storage.get::<PeopleKey>()`), which selects
// both the raw identifier and the value type at compile time.

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A type-level tag pairing a unique string identifier with a value type.
///
/// Implement this trait (or use [`storage_key!`](crate::storage_key)) to
/// declare a key:
///
/// ```rust
/// use stowage::StorageKey;
///
/// struct ThemeKey;
///
/// impl StorageKey for ThemeKey {
///     type Value = String;
///     const KEY: &'static str = "theme";
/// }
/// ```
///
/// Identifiers must be unique across every key that shares a provider. Two
/// keys with the same identifier read and overwrite each other's bytes; this
/// is not detected.
pub trait StorageKey {
    /// The type of value this key represents in storage.
    type Value: Serialize + DeserializeOwned;

    /// The raw identifier handed to the provider.
    const KEY: &'static str;
}

/// Declare one or more unit-struct storage keys.
///
/// ```rust
/// use stowage::storage_key;
///
/// storage_key! {
///     /// Names of recently opened files.
///     pub RecentFilesKey: Vec<String> = "recent-files";
///     WindowWidthKey: u32 = "window-width";
/// }
/// ```
#[macro_export]
macro_rules! storage_key {
    ($($(#[$meta:meta])* $vis:vis $name:ident : $value:ty = $key:expr;)+) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            $vis struct $name;

            impl $crate::StorageKey for $name {
                type Value = $value;
                const KEY: &'static str = $key;
            }
        )+
    };
}

//! Browser localStorage helpers for transient UI draft persistence.
//!
//! SYSTEM CONTEXT
//! ==============
//! These helpers centralize hydrate-only read/write behavior so pages and
//! components can persist dialog/input drafts without repeating web-sys
//! glue. Every key carries the app prefix so sign-out can clear the whole
//! cache without touching unrelated origin data.

#[cfg(test)]
#[path = "ui_persistence_test.rs"]
mod ui_persistence_test;

use serde::Serialize;
use serde::de::DeserializeOwned;

const APP_KEY_PREFIX: &str = "stacks.";

/// Build the prefixed storage key for `suffix`.
#[must_use]
pub fn storage_key(suffix: &str) -> String {
    format!("{APP_KEY_PREFIX}{suffix}")
}

#[cfg(any(test, feature = "hydrate"))]
fn is_app_key(key: &str) -> bool {
    key.starts_with(APP_KEY_PREFIX)
}

/// Load a JSON value from `localStorage` for the prefixed `suffix` key.
pub fn load_json<T: DeserializeOwned>(suffix: &str) -> Option<T> {
    #[cfg(feature = "hydrate")]
    {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten())?;
        let raw = storage.get_item(&storage_key(suffix)).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = suffix;
        None
    }
}

/// Save a JSON value to `localStorage` under the prefixed `suffix` key.
pub fn save_json<T: Serialize>(suffix: &str, value: &T) {
    #[cfg(feature = "hydrate")]
    {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
            return;
        };
        let Ok(raw) = serde_json::to_string(value) else {
            return;
        };
        let _ = storage.set_item(&storage_key(suffix), &raw);
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = (suffix, value);
    }
}

/// Remove every app-prefixed key. Called on sign-out so cached drafts do
/// not leak across accounts.
pub fn clear_app_keys() {
    #[cfg(feature = "hydrate")]
    {
        let Some(storage) = web_sys::window().and_then(|w| w.local_storage().ok().flatten()) else {
            return;
        };
        let len = storage.length().unwrap_or(0);
        let keys: Vec<String> = (0..len)
            .filter_map(|i| storage.key(i).ok().flatten())
            .filter(|key| is_app_key(key))
            .collect();
        for key in keys {
            let _ = storage.remove_item(&key);
        }
    }
}

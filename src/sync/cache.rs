//! Persistent per-recipe save cache.
//!
//! Entries live under `save-state-{id}` as `{saved, t}`. Anything that fails
//! to decode is treated as a cache miss.

#[cfg(test)]
#[path = "cache_test.rs"]
mod cache_test;

use std::rc::Rc;

use crate::config::ClientConfig;
use crate::error::StorageError;
use crate::state::save::SaveState;

/// String key-value storage shared by every tab of the origin.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns a [`StorageError`] when the write is refused (quota, privacy mode).
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&self, key: &str);
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Rc<T> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key);
    }
}

/// Decode a cached entry. `saved` must be a real boolean.
#[must_use]
pub fn decode_state(raw: &str) -> Option<SaveState> {
    serde_json::from_str(raw).ok()
}

/// Typed view over the store for save-state entries.
pub struct SaveCache<S> {
    store: S,
    config: ClientConfig,
}

impl<S: KeyValueStore> SaveCache<S> {
    pub fn new(store: S, config: &ClientConfig) -> Self {
        Self {
            store,
            config: config.clone(),
        }
    }

    fn key(&self, recipe_id: u32) -> String {
        self.config.state_key(recipe_id)
    }

    /// Cached saved flag, or `None` when absent or malformed.
    pub fn read(&self, recipe_id: u32) -> Option<bool> {
        let raw = self.store.get(&self.key(recipe_id))?;
        decode_state(&raw).map(|state| state.saved)
    }

    /// Record `saved` as the latest confirmed state.
    ///
    /// # Errors
    ///
    /// Propagates the store's write failure.
    pub fn write(&self, recipe_id: u32, saved: bool, t: f64) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&SaveState { saved, t })
            .map_err(|e| StorageError::Write(e.to_string()))?;
        self.store.set(&self.key(recipe_id), &raw)
    }
}

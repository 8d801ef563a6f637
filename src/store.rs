//! String-keyed JSON persistence.
//!
//! The backing engine (browser `localStorage` in production, a `HashMap` in
//! tests) only has to move strings. Reads never fail from the caller's point of
//! view: a missing key, an unavailable backend or a document that no longer
//! parses all yield the supplied default.

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

pub const BANK_KEY: &str = "ms_bank";
pub const SESSION_KEY: &str = "ms_session";
pub const PROGRESS_KEY: &str = "ms_progress";
pub const THEME_KEY: &str = "ms_theme";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage rejected key '{key}': {reason}")]
    Rejected { key: String, reason: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Minimal get/set capability over string values.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

fn try_load<T: DeserializeOwned, S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
        _ => Ok(None),
    }
}

/// Read `key` as JSON, falling back to `fallback()` on absence or corruption.
pub fn load_or<T, S, F>(store: &S, key: &str, fallback: F) -> T
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
    F: FnOnce() -> T,
{
    match try_load(store, key) {
        Ok(Some(value)) => value,
        Ok(None) => {
            log::debug!("store: '{key}' absent, using default");
            fallback()
        }
        Err(e) => {
            log::warn!("store: '{key}' unreadable ({e}), using default");
            fallback()
        }
    }
}

/// Write `value` as JSON under `key`. Failures are logged and swallowed.
pub fn save<T, S>(store: &mut S, key: &str, value: &T)
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let result = serde_json::to_string(value)
        .map_err(StoreError::from)
        .and_then(|raw| store.set(key, &raw));
    if let Err(e) = result {
        log::warn!("store: could not save '{key}': {e}");
    }
}

/// In-memory store used by native builds and tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

//! Liked-message persistence.
//!
//! The set of liked ids survives reloads as a JSON array in
//! `localStorage`. A missing or corrupt entry reads as empty.

use std::collections::BTreeSet;
#[cfg(test)]
use std::sync::Mutex;

use crate::error::{FarmError, FarmResult};

pub trait LikeStore {
    fn load(&self) -> FarmResult<BTreeSet<String>>;
    fn save(&self, ids: &BTreeSet<String>) -> FarmResult<()>;
}

/// Load, logging and swallowing any storage failure
pub fn load_or_empty(store: &dyn LikeStore) -> BTreeSet<String> {
    store.load().unwrap_or_else(|e| {
        tracing::warn!("[LIKES] starting with an empty liked set: {}", e);
        BTreeSet::new()
    })
}

fn decode(raw: &str) -> FarmResult<BTreeSet<String>> {
    let ids: Vec<String> = serde_json::from_str(raw).map_err(|e| FarmError::Storage(e.to_string()))?;
    Ok(ids.into_iter().collect())
}

fn encode(ids: &BTreeSet<String>) -> FarmResult<String> {
    serde_json::to_string(&ids.iter().collect::<Vec<_>>()).map_err(|e| FarmError::Storage(e.to_string()))
}

/// Browser `localStorage` under a fixed key
#[derive(Debug, Clone)]
pub struct LocalLikeStore {
    key: String,
}

impl LocalLikeStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    fn storage() -> FarmResult<web_sys::Storage> {
        web_sys::window()
            .ok_or_else(|| FarmError::Storage("no window".to_string()))?
            .local_storage()
            .map_err(|_| FarmError::Storage("localStorage access denied".to_string()))?
            .ok_or_else(|| FarmError::Storage("localStorage missing".to_string()))
    }
}

impl LikeStore for LocalLikeStore {
    fn load(&self) -> FarmResult<BTreeSet<String>> {
        let raw = Self::storage()?
            .get_item(&self.key)
            .map_err(|_| FarmError::Storage("read failed".to_string()))?;
        match raw {
            Some(raw) => decode(&raw),
            None => Ok(BTreeSet::new()),
        }
    }

    fn save(&self, ids: &BTreeSet<String>) -> FarmResult<()> {
        Self::storage()?
            .set_item(&self.key, &encode(ids)?)
            .map_err(|_| FarmError::Storage("write failed".to_string()))
    }
}

/// Process-local store
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryLikeStore {
    raw: Mutex<Option<String>>,
}

#[cfg(test)]
impl MemoryLikeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: &str) -> Self {
        Self {
            raw: Mutex::new(Some(raw.to_string())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.lock().ok().and_then(|raw| raw.clone())
    }
}

#[cfg(test)]
impl LikeStore for MemoryLikeStore {
    fn load(&self) -> FarmResult<BTreeSet<String>> {
        match self.raw() {
            Some(raw) => decode(&raw),
            None => Ok(BTreeSet::new()),
        }
    }

    fn save(&self, ids: &BTreeSet<String>) -> FarmResult<()> {
        let encoded = encode(ids)?;
        let mut raw = self
            .raw
            .lock()
            .map_err(|_| FarmError::Storage("store poisoned".to_string()))?;
        *raw = Some(encoded);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_is_a_json_array() {
        let store = MemoryLikeStore::new();
        let ids: BTreeSet<String> = ["b".to_string(), "a".to_string()].into();
        store.save(&ids).unwrap();
        assert_eq!(store.raw().as_deref(), Some(r#"["a","b"]"#));
        assert_eq!(store.load().unwrap(), ids);
    }

    #[test]
    fn test_corrupt_entry_reads_as_empty() {
        let store = MemoryLikeStore::with_raw("{not json");
        assert!(matches!(store.load(), Err(FarmError::Storage(_))));
        assert!(load_or_empty(&store).is_empty());
    }
}

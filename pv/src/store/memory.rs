//! In-memory store for tests and ephemeral sessions
//!
//! Slots hold raw JSON strings, like a browser key-value store, so tests can
//! seed corrupt data. Clones share the same slots.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{DIARY_SLOT, FAVORITES_SLOT, SessionStore, StoreError, decode_or_empty, encode};
use crate::domain::{DiaryEntry, Exercise};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    slots: HashMap<String, String>,
    writes: HashMap<String, usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put raw text in a slot, bypassing serialization
    pub fn seed_raw(&self, slot: &str, raw: impl Into<String>) {
        self.lock().slots.insert(slot.to_string(), raw.into());
    }

    /// Raw text currently stored in a slot
    pub fn raw(&self, slot: &str) -> Option<String> {
        self.lock().slots.get(slot).cloned()
    }

    /// Number of saves performed on a slot
    pub fn writes(&self, slot: &str) -> usize {
        self.lock().writes.get(slot).copied().unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // a poisoned lock only means another test thread panicked mid-write
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self, slot: &str, json: String) {
        let mut inner = self.lock();
        inner.slots.insert(slot.to_string(), json);
        *inner.writes.entry(slot.to_string()).or_default() += 1;
    }
}

impl SessionStore for MemoryStore {
    fn load_favorites(&self) -> Vec<Exercise> {
        decode_or_empty(FAVORITES_SLOT, self.raw(FAVORITES_SLOT).as_deref())
    }

    fn save_favorites(&mut self, favorites: &[Exercise]) -> Result<(), StoreError> {
        let json = encode(FAVORITES_SLOT, favorites)?;
        self.write(FAVORITES_SLOT, json);
        Ok(())
    }

    fn load_diary(&self) -> Vec<DiaryEntry> {
        decode_or_empty(DIARY_SLOT, self.raw(DIARY_SLOT).as_deref())
    }

    fn save_diary(&mut self, entries: &[DiaryEntry]) -> Result<(), StoreError> {
        let json = encode(DIARY_SLOT, entries)?;
        self.write(DIARY_SLOT, json);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_slots() {
        let store = MemoryStore::new();
        let mut handle = store.clone();

        handle.save_favorites(&[Exercise::new("Ponte", "", "", "")]).unwrap();

        assert_eq!(store.load_favorites().len(), 1);
        assert_eq!(store.writes(FAVORITES_SLOT), 1);
        assert_eq!(store.writes(DIARY_SLOT), 0);
    }

    #[test]
    fn test_seeded_garbage_loads_empty() {
        let store = MemoryStore::new();
        store.seed_raw(DIARY_SLOT, "undefined");

        assert!(store.load_diary().is_empty());
    }
}

//! Durable storage for favorites and diary entries
//!
//! Two named slots, each holding one JSON document. Loads never fail: a
//! missing or unreadable slot is an empty collection. Saves report errors so
//! the caller can log them.

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::{DiaryEntry, Exercise};

mod json_store;
mod memory;

pub use json_store::JsonStore;
pub use memory::MemoryStore;

/// Slot holding the favorites collection
pub const FAVORITES_SLOT: &str = "parkinvibe_favorites";

/// Slot holding the diary entries, newest first
pub const DIARY_SLOT: &str = "parkinvibe_diary";

/// Errors from store writes
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {slot}: {source}")]
    Io {
        slot: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error on {slot}: {source}")]
    Serialize {
        slot: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistence seam injected into the session
pub trait SessionStore: Send {
    fn load_favorites(&self) -> Vec<Exercise>;
    fn save_favorites(&mut self, favorites: &[Exercise]) -> Result<(), StoreError>;
    fn load_diary(&self) -> Vec<DiaryEntry>;
    fn save_diary(&mut self, entries: &[DiaryEntry]) -> Result<(), StoreError>;
}

/// Decode a stored slot, degrading to an empty collection
pub(crate) fn decode_or_empty<T: DeserializeOwned>(slot: &str, raw: Option<&str>) -> Vec<T> {
    debug!(%slot, present = raw.is_some(), "decode_or_empty: called");
    let Some(raw) = raw else {
        return Vec::new();
    };
    match serde_json::from_str(raw) {
        Ok(items) => items,
        Err(e) => {
            warn!(%slot, error = %e, "Stored data is unreadable, starting empty");
            Vec::new()
        }
    }
}

pub(crate) fn encode<T: serde::Serialize>(slot: &str, items: &[T]) -> Result<String, StoreError> {
    serde_json::to_string(items).map_err(|source| StoreError::Serialize {
        slot: slot.to_string(),
        source,
    })
}

//! File-backed store: one JSON file per slot in a data directory

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{DIARY_SLOT, FAVORITES_SLOT, SessionStore, StoreError, decode_or_empty, encode};
use crate::domain::{DiaryEntry, Exercise};

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    /// Open (and create if needed) a store rooted at `base_dir`
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let base_dir = base_dir.as_ref().to_path_buf();
        debug!(base_dir = %base_dir.display(), "JsonStore::open: called");
        fs::create_dir_all(&base_dir).map_err(|source| StoreError::Io {
            slot: base_dir.display().to_string(),
            source,
        })?;
        info!("Opened store at {}", base_dir.display());
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, slot: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", slot))
    }

    fn read_slot(&self, slot: &str) -> Option<String> {
        let path = self.file_path(slot);
        if !path.exists() {
            debug!(%slot, "JsonStore::read_slot: no file yet");
            return None;
        }
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                tracing::warn!(%slot, error = %e, "Failed to read store file");
                None
            }
        }
    }

    /// Write via a temp file and rename so a crash never leaves half a document
    fn write_slot(&self, slot: &str, json: &str) -> Result<(), StoreError> {
        debug!(%slot, bytes = json.len(), "JsonStore::write_slot: called");
        let path = self.file_path(slot);
        let tmp_path = path.with_extension("tmp");
        let io_err = |source| StoreError::Io {
            slot: slot.to_string(),
            source,
        };

        let mut file = fs::File::create(&tmp_path).map_err(io_err)?;
        file.write_all(json.as_bytes()).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        fs::rename(&tmp_path, &path).map_err(io_err)?;
        Ok(())
    }
}

impl SessionStore for JsonStore {
    fn load_favorites(&self) -> Vec<Exercise> {
        decode_or_empty(FAVORITES_SLOT, self.read_slot(FAVORITES_SLOT).as_deref())
    }

    fn save_favorites(&mut self, favorites: &[Exercise]) -> Result<(), StoreError> {
        let json = encode(FAVORITES_SLOT, favorites)?;
        self.write_slot(FAVORITES_SLOT, &json)
    }

    fn load_diary(&self) -> Vec<DiaryEntry> {
        decode_or_empty(DIARY_SLOT, self.read_slot(DIARY_SLOT).as_deref())
    }

    fn save_diary(&mut self, entries: &[DiaryEntry]) -> Result<(), StoreError> {
        let json = encode(DIARY_SLOT, entries)?;
        self.write_slot(DIARY_SLOT, &json)
    }
}

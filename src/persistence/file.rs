//! JSON file preferences (native)
//!
//! Writes go to `<path>.tmp` first and are renamed over the real file on
//! flush, so a crash mid-write leaves the previous file intact.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{PrefsStore, StorageError};

#[derive(Debug)]
pub struct JsonFilePrefs {
    path: PathBuf,
    values: BTreeMap<String, i64>,
    dirty: bool,
}

impl JsonFilePrefs {
    /// Open (or start) a preferences file. A missing file is empty; a
    /// corrupted one is reported so the caller can decide to start fresh.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        log::info!("Opened prefs {} ({} keys)", path.display(), values.len());
        Ok(Self {
            path,
            values,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl PrefsStore for JsonFilePrefs {
    fn load_int(&self, key: &str) -> Result<Option<i64>, StorageError> {
        Ok(self.values.get(key).copied())
    }

    fn save_int(&mut self, key: &str, value: i64) -> Result<(), StorageError> {
        if self.values.insert(key.to_string(), value) != Some(value) {
            self.dirty = true;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        if !self.dirty {
            return Ok(());
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        let tmp = self.tmp_path();
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        self.dirty = false;
        log::debug!("Prefs flushed to {}", self.path.display());
        Ok(())
    }
}

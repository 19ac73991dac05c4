//! Browser LocalStorage preferences (wasm32)

use super::{PrefsStore, StorageError};

/// LocalStorage-backed store. Keys are namespaced so the game does not
/// collide with other apps on the same origin.
#[derive(Debug, Clone)]
pub struct LocalStoragePrefs {
    prefix: String,
}

impl Default for LocalStoragePrefs {
    fn default() -> Self {
        Self::new("keepy_up_")
    }
}

impl LocalStoragePrefs {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("LocalStorage not accessible".into()))
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl PrefsStore for LocalStoragePrefs {
    fn load_int(&self, key: &str) -> Result<Option<i64>, StorageError> {
        let storage = self.storage()?;
        let raw = storage
            .get_item(&self.full_key(key))
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?;
        match raw {
            Some(raw) => match raw.trim().parse::<i64>() {
                Ok(value) => Ok(Some(value)),
                Err(_) => Err(StorageError::NotAnInteger {
                    key: key.to_string(),
                    raw,
                }),
            },
            None => Ok(None),
        }
    }

    fn save_int(&mut self, key: &str, value: i64) -> Result<(), StorageError> {
        let storage = self.storage()?;
        storage
            .set_item(&self.full_key(key), &value.to_string())
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }

    /// LocalStorage writes are synchronous
    fn flush(&mut self) -> Result<(), StorageError> {
        Ok(())
    }
}

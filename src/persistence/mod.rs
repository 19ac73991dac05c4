//! Key/value preference storage
//!
//! The rules engine only ever stores small integers (the best score), so the
//! contract is deliberately tiny: load, save, flush. Backends:
//! - `MemoryPrefs`: in-process map (tests, hosts without storage)
//! - `JsonFilePrefs`: JSON file with tmp-then-rename writes (native)
//! - `LocalStoragePrefs`: browser LocalStorage (wasm32)

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

use std::collections::HashMap;

#[cfg(not(target_arch = "wasm32"))]
pub use file::JsonFilePrefs;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStoragePrefs;

/// Storage failure. Never fatal to the game.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("value for {key:?} is not an integer: {raw:?}")]
    NotAnInteger { key: String, raw: String },
}

/// Durable integer preferences
pub trait PrefsStore {
    /// Read a value; `Ok(None)` when the key was never written
    fn load_int(&self, key: &str) -> Result<Option<i64>, StorageError>;

    fn save_int(&mut self, key: &str, value: i64) -> Result<(), StorageError>;

    /// Commit pending writes so they survive a restart
    fn flush(&mut self) -> Result<(), StorageError>;

    /// Read a value, falling back to `default` when missing or unreadable
    fn load_int_or(&self, key: &str, default: i64) -> i64 {
        match self.load_int(key) {
            Ok(Some(value)) => value,
            Ok(None) => default,
            Err(e) => {
                log::warn!("Failed to read {:?} ({}), using {}", key, e, default);
                default
            }
        }
    }
}

/// In-memory store; nothing survives the process
#[derive(Debug, Clone, Default)]
pub struct MemoryPrefs {
    values: HashMap<String, i64>,
    flushes: u32,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a key
    pub fn with(mut self, key: &str, value: i64) -> Self {
        self.values.insert(key.to_string(), value);
        self
    }

    /// Number of flushes requested so far
    pub fn flushes(&self) -> u32 {
        self.flushes
    }
}

impl PrefsStore for MemoryPrefs {
    fn load_int(&self, key: &str) -> Result<Option<i64>, StorageError> {
        Ok(self.values.get(key).copied())
    }

    fn save_int(&mut self, key: &str, value: i64) -> Result<(), StorageError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        self.flushes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenPrefs;

    impl PrefsStore for BrokenPrefs {
        fn load_int(&self, _key: &str) -> Result<Option<i64>, StorageError> {
            Err(StorageError::Unavailable("disk gone".into()))
        }
        fn save_int(&mut self, _key: &str, _value: i64) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disk gone".into()))
        }
        fn flush(&mut self) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_memory_prefs_roundtrip() {
        let mut prefs = MemoryPrefs::new();
        assert_eq!(prefs.load_int("HighScore").unwrap(), None);
        prefs.save_int("HighScore", 42).unwrap();
        prefs.flush().unwrap();
        assert_eq!(prefs.load_int("HighScore").unwrap(), Some(42));
        assert_eq!(prefs.flushes(), 1);
    }

    #[test]
    fn test_load_int_or_defaults() {
        let prefs = MemoryPrefs::new().with("Other", 7);
        assert_eq!(prefs.load_int_or("HighScore", 0), 0);
        assert_eq!(prefs.load_int_or("Other", 0), 7);
    }

    #[test]
    fn test_load_int_or_swallows_errors() {
        assert_eq!(BrokenPrefs.load_int_or("HighScore", 0), 0);
    }
}

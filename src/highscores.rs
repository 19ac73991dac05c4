//! Best-score record
//!
//! A single integer persisted under `HighScore`. Storage is best-effort: a
//! failed read starts from 0 and a failed write is logged and ignored.

use serde::{Deserialize, Serialize};

use crate::persistence::PrefsStore;

/// Preference key for the best score
pub const HIGH_SCORE_KEY: &str = "HighScore";

/// Outcome of comparing a final score against the record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordCheck {
    /// Score beat the record and is now the record
    NewRecord(u64),
    /// Record stands; carries the stored value
    Existing(u64),
}

impl RecordCheck {
    pub fn is_new_record(&self) -> bool {
        matches!(self, RecordCheck::NewRecord(_))
    }

    /// The record value after the check
    pub fn record(&self) -> u64 {
        match *self {
            RecordCheck::NewRecord(n) | RecordCheck::Existing(n) => n,
        }
    }

    /// Text for the game-over panel
    pub fn message(&self) -> String {
        match self {
            RecordCheck::NewRecord(n) => format!("New Record: {}!", n),
            RecordCheck::Existing(n) => format!("Record: {}", n),
        }
    }
}

/// Best score seen across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    best: u64,
}

impl HighScore {
    pub fn new(best: u64) -> Self {
        Self { best }
    }

    pub fn best(&self) -> u64 {
        self.best
    }

    /// Load from storage (0 when missing, unreadable or negative)
    pub fn load(store: &dyn PrefsStore) -> Self {
        let raw = store.load_int_or(HIGH_SCORE_KEY, 0);
        let best = u64::try_from(raw).unwrap_or(0);
        log::info!("Loaded high score {}", best);
        Self { best }
    }

    /// Compare without touching storage
    pub fn check(&mut self, score: u64) -> RecordCheck {
        if score > self.best {
            self.best = score;
            RecordCheck::NewRecord(score)
        } else {
            RecordCheck::Existing(self.best)
        }
    }

    /// Compare and persist when the record is beaten
    pub fn submit(&mut self, score: u64, store: &mut dyn PrefsStore) -> RecordCheck {
        let result = self.check(score);
        if result.is_new_record() {
            self.save(store);
        }
        result
    }

    /// Persist and flush. Failures are logged, never propagated.
    pub fn save(&self, store: &mut dyn PrefsStore) {
        let value = i64::try_from(self.best).unwrap_or(i64::MAX);
        let saved = store
            .save_int(HIGH_SCORE_KEY, value)
            .and_then(|_| store.flush());
        match saved {
            Ok(()) => log::info!("High score saved ({})", self.best),
            Err(e) => log::warn!("Failed to save high score {}: {}", self.best, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryPrefs, StorageError};

    struct ReadOnlyPrefs;

    impl PrefsStore for ReadOnlyPrefs {
        fn load_int(&self, _key: &str) -> Result<Option<i64>, StorageError> {
            Ok(Some(10))
        }
        fn save_int(&mut self, _key: &str, _value: i64) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only".into()))
        }
        fn flush(&mut self) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_new_record_is_persisted() {
        let mut prefs = MemoryPrefs::new().with(HIGH_SCORE_KEY, 10);
        let mut hs = HighScore::load(&prefs);
        assert_eq!(hs.best(), 10);

        let result = hs.submit(15, &mut prefs);
        assert_eq!(result, RecordCheck::NewRecord(15));
        assert_eq!(hs.best(), 15);
        assert_eq!(prefs.load_int(HIGH_SCORE_KEY).unwrap(), Some(15));
        assert_eq!(prefs.flushes(), 1);
    }

    #[test]
    fn test_lower_score_keeps_record() {
        let mut prefs = MemoryPrefs::new().with(HIGH_SCORE_KEY, 10);
        let mut hs = HighScore::load(&prefs);

        let result = hs.submit(5, &mut prefs);
        assert_eq!(result, RecordCheck::Existing(10));
        assert_eq!(hs.best(), 10);
        assert_eq!(prefs.flushes(), 0);
    }

    #[test]
    fn test_equal_score_is_not_a_record() {
        let mut hs = HighScore::new(10);
        assert_eq!(hs.check(10), RecordCheck::Existing(10));
    }

    #[test]
    fn test_negative_stored_value_reads_as_zero() {
        let prefs = MemoryPrefs::new().with(HIGH_SCORE_KEY, -4);
        assert_eq!(HighScore::load(&prefs).best(), 0);
    }

    #[test]
    fn test_write_failure_still_updates_memory() {
        let mut store = ReadOnlyPrefs;
        let mut hs = HighScore::load(&store);
        assert_eq!(hs.submit(12, &mut store), RecordCheck::NewRecord(12));
        assert_eq!(hs.best(), 12);
    }

    #[test]
    fn test_messages() {
        assert_eq!(RecordCheck::NewRecord(15).message(), "New Record: 15!");
        assert_eq!(RecordCheck::Existing(10).message(), "Record: 10");
        assert_eq!(RecordCheck::NewRecord(15).record(), 15);
        assert_eq!(RecordCheck::Existing(10).record(), 10);
    }
}

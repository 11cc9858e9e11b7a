//! Bounded, persisted calculation history.

use super::entry::{HistoryEntry, now_millis};
use crate::storage::{Storage, StorageError};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

/// Maximum number of entries kept by default.
pub const MAX_HISTORY: usize = 20;

/// Storage key the log is kept under by default.
pub const DEFAULT_HISTORY_KEY: &str = "simple_calc_history_v1";

/// Failure to persist or remove the history log.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("failed to encode history: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Append-only history log with oldest-first eviction.
///
/// The store keeps no entries in memory: every call reads from or writes to
/// the backing [`Storage`]. Appends hold both an in-process mutex and the
/// backend's key lock, so concurrent appenders never lose each other's
/// entries, whether they share this store or run in other processes.
pub struct HistoryStore<S: Storage> {
    storage: S,
    key: String,
    max_entries: usize,
    write_lock: Mutex<()>,
}

impl<S: Storage> HistoryStore<S> {
    /// Create a store with the default key and a cap of [`MAX_HISTORY`].
    pub fn new(storage: S) -> Self {
        Self::with_capacity(storage, DEFAULT_HISTORY_KEY, MAX_HISTORY)
    }

    /// Create a store with an explicit key and cap. A cap of zero is raised to one.
    pub fn with_capacity(storage: S, key: impl Into<String>, max_entries: usize) -> Self {
        Self {
            storage,
            key: key.into(),
            max_entries: max_entries.max(1),
            write_lock: Mutex::new(()),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Read the persisted log, oldest first.
    ///
    /// Missing, unreadable, or corrupt data all read as an empty log.
    pub fn load(&self) -> Vec<HistoryEntry> {
        let bytes = match self.storage.get(&self.key) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "Failed to read history");
                return Vec::new();
            }
        };

        match serde_json::from_slice::<Vec<HistoryEntry>>(&bytes) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(key = %self.key, error = %e, "Ignoring corrupt history");
                Vec::new()
            }
        }
    }

    /// Record a committed calculation.
    ///
    /// Persistence failures are logged and otherwise ignored.
    pub fn append(&self, expression: &str, result: f64) {
        if let Err(e) = self.try_append(expression, result) {
            warn!(error = %e, "Failed to save history");
        }
    }

    /// Record a committed calculation, reporting persistence failures.
    pub fn try_append(&self, expression: &str, result: f64) -> Result<(), HistoryError> {
        self.try_append_entry(HistoryEntry::new(expression, result, now_millis()))
    }

    pub(crate) fn try_append_entry(&self, entry: HistoryEntry) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let _lock = self.storage.lock(&self.key)?;

        let mut entries = self.load();
        entries.push(entry);
        if entries.len() > self.max_entries {
            let excess = entries.len() - self.max_entries;
            entries.drain(..excess);
        }

        let bytes = serde_json::to_vec(&entries)?;
        self.storage.set(&self.key, &bytes)?;
        debug!(key = %self.key, count = entries.len(), "Saved history");
        Ok(())
    }

    /// Delete the persisted log. Failures are logged and otherwise ignored.
    pub fn clear(&self) {
        if let Err(e) = self.try_clear() {
            warn!(error = %e, "Failed to clear history");
        }
    }

    /// Delete the persisted log, reporting failures.
    pub fn try_clear(&self) -> Result<(), HistoryError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let _lock = self.storage.lock(&self.key)?;
        self.storage.delete(&self.key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{FileStorage, MemoryStorage};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_empty_when_nothing_stored() {
        let store = HistoryStore::new(MemoryStorage::new());
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_append_round_trip() {
        let store = HistoryStore::new(MemoryStorage::new());
        store.append("2+2", 4.0);
        store.append("5%", 0.05);

        let entries = store.load();
        assert_eq!(entries.len(), 2);
        let last = entries.last().unwrap();
        assert_eq!(last.expression, "5%");
        assert_eq!(last.result, 0.05);
        assert_eq!(entries[0].expression, "2+2");
    }

    #[test]
    fn test_keeps_most_recent_twenty() {
        let store = HistoryStore::new(MemoryStorage::new());
        for i in 0..25 {
            store.append(&format!("{}+0", i), i as f64);
        }

        let entries = store.load();
        assert_eq!(entries.len(), MAX_HISTORY);
        let results: Vec<f64> = entries.iter().map(|e| e.result).collect();
        let expected: Vec<f64> = (5..25).map(|i| i as f64).collect();
        assert_eq!(results, expected);
    }

    #[test]
    fn test_custom_capacity() {
        let store = HistoryStore::with_capacity(MemoryStorage::new(), "h", 3);
        for i in 0..5 {
            store.append("x", i as f64);
        }
        let results: Vec<f64> = store.load().iter().map(|e| e.result).collect();
        assert_eq!(results, vec![2.0, 3.0, 4.0]);

        let store = HistoryStore::with_capacity(MemoryStorage::new(), "h", 0);
        assert_eq!(store.max_entries(), 1);
    }

    #[test]
    fn test_clear_then_load_is_empty() {
        let store = HistoryStore::new(MemoryStorage::new());
        store.append("1+1", 2.0);
        store.clear();
        assert!(store.load().is_empty());
        assert_eq!(store.storage().get(DEFAULT_HISTORY_KEY).unwrap(), None);
    }

    #[test]
    fn test_corrupt_payload_reads_as_empty() {
        let storage = MemoryStorage::new();
        storage.set(DEFAULT_HISTORY_KEY, b"{not json").unwrap();
        let store = HistoryStore::new(storage);
        assert!(store.load().is_empty());

        store.append("3*3", 9.0);
        assert_eq!(store.load().len(), 1);
    }

    #[test]
    fn test_disabled_storage_is_not_fatal() {
        let store = HistoryStore::new(MemoryStorage::disabled());
        store.append("1+1", 2.0);
        store.clear();
        assert!(store.load().is_empty());
        assert!(matches!(
            store.try_append("1+1", 2.0),
            Err(HistoryError::Storage(StorageError::Unavailable(_)))
        ));
        assert!(store.try_clear().is_err());
    }

    #[test]
    fn test_persisted_format() {
        let store = HistoryStore::new(MemoryStorage::new());
        store
            .try_append_entry(HistoryEntry::new("2+2", 4.0, 1000))
            .unwrap();

        let raw = store.storage().get(DEFAULT_HISTORY_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(
            value,
            serde_json::json!([{ "expr": "2+2", "result": 4.0, "time": 1000 }])
        );
    }

    #[test]
    fn test_survives_reopen_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = HistoryStore::new(FileStorage::new(dir.path()));
            store.append("6*7", 42.0);
        }
        let store = HistoryStore::new(FileStorage::new(dir.path()));
        let entries = store.load();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].expression, "6*7");
        assert_eq!(entries[0].result, 42.0);
    }

    #[test]
    fn test_separate_stores_on_one_directory_do_not_lose_appends() {
        let dir = tempfile::tempdir().unwrap();
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let path = dir.path().to_path_buf();
                thread::spawn(move || {
                    // Each writer has its own store and mutex, like separate processes.
                    let store = HistoryStore::with_capacity(FileStorage::new(path), "h", 100);
                    for i in 0..10 {
                        store.try_append(&format!("{}:{}", t, i), i as f64).unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let store = HistoryStore::with_capacity(FileStorage::new(dir.path()), "h", 100);
        assert_eq!(store.load().len(), 40);
    }

    #[test]
    fn test_concurrent_appends_are_not_lost() {
        let store = Arc::new(HistoryStore::with_capacity(MemoryStorage::new(), "h", 100));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..10 {
                        store.append(&format!("{}:{}", t, i), i as f64);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.load().len(), 40);
    }
}

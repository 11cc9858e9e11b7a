//! Key-value storage backends for persisted calculator state.
//!
//! The history store talks to storage only through [`Storage`], so it can
//! run against a directory on disk or an in-memory map in tests.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::fs::File;
use thiserror::Error;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}

/// A durable byte store addressed by string keys.
pub trait Storage: Send + Sync {
    /// Read the value for `key`, or `None` if it was never written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Replace the value for `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), StorageError>;

    /// Take an exclusive lock on `key`, shared with other processes using
    /// the same backend. The lock is held until the guard drops.
    fn lock(&self, key: &str) -> Result<StorageLock, StorageError> {
        validate_key(key)?;
        Ok(StorageLock::default())
    }
}

/// Guard returned by [`Storage::lock`].
///
/// File-backed locks are released when the lock file handle closes.
#[derive(Debug, Default)]
pub struct StorageLock {
    _file: Option<File>,
}

impl StorageLock {
    pub(crate) fn file(file: File) -> Self {
        Self { _file: Some(file) }
    }
}

impl<S: Storage + ?Sized> Storage for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        (**self).delete(key)
    }

    fn lock(&self, key: &str) -> Result<StorageLock, StorageError> {
        (**self).lock(key)
    }
}

/// Check that a key is safe to use as a file name.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        assert!(validate_key("simple_calc_history_v1").is_ok());
        assert!(validate_key("history-2.json").is_ok());
    }

    #[test]
    fn test_invalid_keys() {
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key(".hidden").is_err());
        assert!(validate_key("a/b").is_err());
        assert!(validate_key("with space").is_err());
    }
}

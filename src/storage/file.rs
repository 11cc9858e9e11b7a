//! File-backed storage: one file per key inside a data directory.

use super::{Storage, StorageError, StorageLock, validate_key};
use fs2::FileExt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Stores each key as `<dir>/<key>.json`, locked through `<dir>/.<key>.lock`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Create a backend rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default location under the user's data directory.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("pocketcalc"))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        // Readers must never see a partial file: write a unique sibling, then rename.
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;

        debug!(path = %path.display(), bytes = value.len(), "Wrote storage key");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn lock(&self, key: &str) -> Result<StorageLock, StorageError> {
        validate_key(key)?;
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(format!(".{}.lock", key));
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;
        file.lock_exclusive()?;

        debug!(path = %path.display(), "Locked storage key");
        Ok(StorageLock::file(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert_eq!(storage.get("history").unwrap(), None);
    }

    #[test]
    fn test_write_read_delete() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        storage.set("history", b"[1,2,3]").unwrap();
        assert_eq!(storage.get("history").unwrap(), Some(b"[1,2,3]".to_vec()));
        assert!(dir.path().join("nested").join("history.json").exists());

        storage.set("history", b"[]").unwrap();
        assert_eq!(storage.get("history").unwrap(), Some(b"[]".to_vec()));

        storage.delete("history").unwrap();
        assert_eq!(storage.get("history").unwrap(), None);
        storage.delete("history").unwrap();
    }

    #[test]
    fn test_lock_excludes_other_handles() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());

        let guard = storage.lock("history").unwrap();
        let other = OpenOptions::new()
            .write(true)
            .open(dir.path().join(".history.lock"))
            .unwrap();
        assert!(other.try_lock_exclusive().is_err());

        drop(guard);
        assert!(other.try_lock_exclusive().is_ok());
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        storage.set("k", b"v").unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
    }

    #[test]
    fn test_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.set("../escape", b"x"),
            Err(StorageError::InvalidKey(_))
        ));
    }
}

//! File-based storage backend.

use crate::error::Result;
use crate::storage::traits::KeyValueStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-based storage backend with atomic writes.
///
/// Each key maps to `<base_dir>/<key>.json`.
#[derive(Debug)]
pub struct FileBackend {
    base_dir: PathBuf,
}

impl FileBackend {
    /// Create a new file backend.
    ///
    /// Creates the base directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Directory holding the stored files.
    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the file backing `key`.
    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match fs::read(self.key_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.key_path(key);
        let temp = path.with_extension("tmp");

        fs::write(&temp, value)?;

        // Atomic rename - a crash mid-write never leaves a torn record
        fs::rename(&temp, &path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_backend() -> (FileBackend, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let backend = FileBackend::new(temp_dir.path().to_path_buf()).unwrap();
        (backend, temp_dir)
    }

    #[test]
    fn creates_base_directory() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("a").join("b");
        let backend = FileBackend::new(nested.clone()).unwrap();
        assert!(nested.is_dir());
        assert_eq!(backend.base_dir(), nested.as_path());
    }

    #[test]
    fn get_missing_key() {
        let (store, _temp) = create_test_backend();
        assert!(store.get("nothing").unwrap().is_none());
    }

    #[test]
    fn set_and_get() {
        let (store, _temp) = create_test_backend();
        store.set("record", b"{\"a\":1}").unwrap();
        assert_eq!(store.get("record").unwrap().unwrap(), b"{\"a\":1}");
    }

    #[test]
    fn set_overwrites_whole_value() {
        let (store, _temp) = create_test_backend();
        store.set("record", b"a much longer first value").unwrap();
        store.set("record", b"short").unwrap();
        assert_eq!(store.get("record").unwrap().unwrap(), b"short");
    }

    #[test]
    fn atomic_write_creates_no_temp_file() {
        let (store, temp_dir) = create_test_backend();
        store.set("record", b"{}").unwrap();

        assert!(!temp_dir.path().join("record.tmp").exists());
        assert!(temp_dir.path().join("record.json").exists());
    }

    #[test]
    fn keys_are_independent() {
        let (store, _temp) = create_test_backend();
        store.set("one", b"1").unwrap();
        store.set("two", b"2").unwrap();
        assert_eq!(store.get("one").unwrap().unwrap(), b"1");
        assert_eq!(store.get("two").unwrap().unwrap(), b"2");
    }

    #[test]
    fn unreadable_path_is_an_error() {
        let (store, temp_dir) = create_test_backend();
        // A directory where the file should be cannot be read as bytes
        fs::create_dir(temp_dir.path().join("record.json")).unwrap();
        assert!(store.get("record").is_err());
    }

    #[test]
    fn write_into_removed_directory_fails() {
        let (store, temp_dir) = create_test_backend();
        let path = temp_dir.path().to_path_buf();
        drop(temp_dir);
        assert!(!path.exists());
        assert!(store.set("record", b"{}").is_err());
    }
}

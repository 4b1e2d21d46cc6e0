//! Storage backends: the key → whole-document capability behind `RecordStore`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use serde_json::Value;

use crate::error::StoreError;

/// A key → JSON document store. Values are replaced wholesale.
pub trait StorageBackend: Send + Sync {
    /// Read the document stored under `key`, `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the document exists but cannot be read.
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Replace the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the document cannot be written.
    fn write(&self, key: &str, value: &Value) -> Result<(), StoreError>;

    /// Remove the document stored under `key`. Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the document exists but cannot be removed.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// Process-local backend, used for tests and `data_dir = ":memory:"`.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    docs: RwLock<HashMap<String, Value>>,
}

impl MemoryBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.docs.read().get(key).cloned())
    }

    fn write(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.docs.write().insert(key.to_string(), value.clone());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.docs.write().remove(key);
        Ok(())
    }
}

/// One pretty-printed `<key>.json` file per collection inside a directory.
///
/// Writes go to `<key>.json.tmp` first and are renamed into place, so a crash
/// mid-write leaves the previous document intact.
#[derive(Debug)]
pub struct JsonDirBackend {
    dir: PathBuf,
}

impl JsonDirBackend {
    /// Open (and create if needed) a data directory.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for JsonDirBackend {
    fn read(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|source| StoreError::Serde {
                collection: key.to_string(),
                source,
            })
    }

    fn write(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        let body = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Serde {
            collection: key.to_string(),
            source,
        })?;
        std::fs::write(&tmp, body).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        std::fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StoreError::Io { path, source }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn memory_backend_roundtrip() {
        let backend = MemoryBackend::new();
        assert!(backend.read("users").unwrap().is_none());
        backend.write("users", &json!([{"id": "1"}])).unwrap();
        assert_eq!(backend.read("users").unwrap(), Some(json!([{"id": "1"}])));
        backend.remove("users").unwrap();
        assert!(backend.read("users").unwrap().is_none());
    }

    #[test]
    fn dir_backend_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let backend = JsonDirBackend::open(dir.path()).unwrap();
            backend.write("protocol-counter", &json!(7)).unwrap();
        }
        let backend = JsonDirBackend::open(dir.path()).unwrap();
        assert_eq!(backend.read("protocol-counter").unwrap(), Some(json!(7)));
        assert!(dir.path().join("protocol-counter.json").exists());
        assert!(!dir.path().join("protocol-counter.json.tmp").exists());
    }

    #[test]
    fn dir_backend_reports_corrupt_document() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("requests.json"), "{not json").unwrap();
        let backend = JsonDirBackend::open(dir.path()).unwrap();
        let result = backend.read("requests");
        assert!(
            matches!(result, Err(StoreError::Serde { ref collection, .. }) if collection == "requests")
        );
    }

    #[test]
    fn dir_backend_remove_absent_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let backend = JsonDirBackend::open(dir.path()).unwrap();
        backend.remove("session").unwrap();
    }
}

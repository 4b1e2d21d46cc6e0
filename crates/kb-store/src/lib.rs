//! # kb-store
//!
//! Whole-collection record store for the kanban board.
//!
//! Every collection (`requests`, `users`, `audit-log`, ...) is one JSON
//! document read and replaced as a unit through a [`StorageBackend`]. Typed
//! access goes through [`RecordStore`]; protocol numbering through
//! [`ProtocolGenerator`]; first-run data through [`RecordStore::seed_defaults`].

pub mod backend;
pub mod collection;
pub mod error;
pub mod protocol;
pub mod seed;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use backend::{JsonDirBackend, MemoryBackend, StorageBackend};
pub use collection::Collection;
pub use error::StoreError;
pub use protocol::ProtocolGenerator;
pub use seed::SeedReport;

/// Typed view over a shared [`StorageBackend`].
///
/// Cloning is cheap; clones share the same backend.
#[derive(Clone)]
pub struct RecordStore {
    backend: Arc<dyn StorageBackend>,
}

impl RecordStore {
    #[must_use]
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self { backend }
    }

    /// A store backed by process memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }

    /// A store backed by a directory of JSON documents.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open_dir(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let backend = JsonDirBackend::open(dir.as_ref())?;
        Ok(Self::new(Arc::new(backend)))
    }

    /// The underlying backend, for sharing with another store instance.
    #[must_use]
    pub fn backend(&self) -> Arc<dyn StorageBackend> {
        Arc::clone(&self.backend)
    }

    /// Read a list collection. An absent collection reads as empty.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails or the document does not
    /// match `T`.
    pub fn get<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>, StoreError> {
        Ok(self.get_value(collection)?.unwrap_or_default())
    }

    /// Replace a list collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if serialization or the backend write fails.
    pub fn set<T: Serialize>(&self, collection: Collection, items: &[T]) -> Result<(), StoreError> {
        self.set_value(collection, &items)
    }

    /// Read a single-valued collection (counter, session), `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails or the document does not
    /// match `T`.
    pub fn get_value<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Option<T>, StoreError> {
        let Some(raw) = self.backend.read(collection.key())? else {
            return Ok(None);
        };
        serde_json::from_value(raw)
            .map(Some)
            .map_err(|source| StoreError::Serde {
                collection: collection.key().to_string(),
                source,
            })
    }

    /// Replace a single-valued collection.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if serialization or the backend write fails.
    pub fn set_value<T: Serialize + ?Sized>(
        &self,
        collection: Collection,
        value: &T,
    ) -> Result<(), StoreError> {
        let raw = serde_json::to_value(value).map_err(|source| StoreError::Serde {
            collection: collection.key().to_string(),
            source,
        })?;
        self.backend.write(collection.key(), &raw)
    }

    /// Raw document access, used where the stored shape is not trusted.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend read fails.
    pub fn get_raw(&self, collection: Collection) -> Result<Option<Value>, StoreError> {
        self.backend.read(collection.key())
    }

    /// Whether a collection has ever been written.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend read fails.
    pub fn contains(&self, collection: Collection) -> Result<bool, StoreError> {
        Ok(self.backend.read(collection.key())?.is_some())
    }

    /// Remove a collection entirely.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails to remove it.
    pub fn clear(&self, collection: Collection) -> Result<(), StoreError> {
        self.backend.remove(collection.key())
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use kb_core::entities::Sector;
    use pretty_assertions::assert_eq;

    fn sector(id: &str, name: &str) -> Sector {
        Sector {
            id: id.into(),
            name: name.into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn absent_collection_reads_empty() {
        let store = RecordStore::in_memory();
        let sectors: Vec<Sector> = store.get(Collection::Sectors).unwrap();
        assert!(sectors.is_empty());
        assert!(!store.contains(Collection::Sectors).unwrap());
    }

    #[test]
    fn set_replaces_whole_collection() {
        let store = RecordStore::in_memory();
        store
            .set(
                Collection::Sectors,
                &[sector("sec-1", "Marketing"), sector("sec-2", "Network")],
            )
            .unwrap();
        store
            .set(Collection::Sectors, &[sector("sec-3", "Development")])
            .unwrap();

        let sectors: Vec<Sector> = store.get(Collection::Sectors).unwrap();
        assert_eq!(sectors.len(), 1);
        assert_eq!(sectors[0].name, "Development");
    }

    #[test]
    fn clones_share_backend() {
        let store = RecordStore::in_memory();
        let other = store.clone();
        store.set_value(Collection::ProtocolCounter, &3u64).unwrap();
        assert_eq!(
            other.get_value::<u64>(Collection::ProtocolCounter).unwrap(),
            Some(3)
        );
    }

    #[test]
    fn shape_mismatch_is_serde_error() {
        let store = RecordStore::in_memory();
        store.set_value(Collection::Sectors, &"not a list").unwrap();
        let result = store.get::<Sector>(Collection::Sectors);
        assert!(matches!(result, Err(StoreError::Serde { .. })));
    }

    #[test]
    fn clear_removes_collection() {
        let store = RecordStore::in_memory();
        store.set_value(Collection::Session, &"usr-1").unwrap();
        store.clear(Collection::Session).unwrap();
        assert!(store.get_raw(Collection::Session).unwrap().is_none());
    }
}

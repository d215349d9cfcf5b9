//! Key-value storage for snapshots and preferences.

use crate::persistence::error::PersistenceError;
use log::debug;
use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::fs;

/// Everything the dashboard persists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    /// Raw feed records of the last successful fetch, as JSON.
    LastGoodSnapshot,
    /// Compact binary copy of the last analysis window, read when offline.
    OfflineSnapshot,
    /// Poll interval preference in milliseconds.
    PollInterval,
    /// Notifications preference, `true` or `false`.
    Notifications,
}

impl StorageKey {
    pub(crate) fn file_name(&self) -> &'static str {
        match self {
            StorageKey::LastGoodSnapshot => "last_good_feeds.json",
            StorageKey::OfflineSnapshot => "offline_snapshot.bin",
            StorageKey::PollInterval => "poll_interval_ms",
            StorageKey::Notifications => "notifications",
        }
    }
}

/// Durable byte storage addressed by [`StorageKey`].
///
/// `load` returns `Ok(None)` for keys that were never written or have been
/// removed.
pub trait SnapshotStore: Send + Sync + 'static {
    fn load(
        &self,
        key: StorageKey,
    ) -> impl Future<Output = Result<Option<Vec<u8>>, PersistenceError>> + Send;

    fn save(
        &self,
        key: StorageKey,
        value: Vec<u8>,
    ) -> impl Future<Output = Result<(), PersistenceError>> + Send;

    fn remove(&self, key: StorageKey) -> impl Future<Output = Result<(), PersistenceError>> + Send;
}

/// One file per key inside a cache directory.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    cache_dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(cache_dir: &Path) -> Self {
        FileSnapshotStore {
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    fn path(&self, key: StorageKey) -> PathBuf {
        self.cache_dir.join(key.file_name())
    }
}

impl SnapshotStore for FileSnapshotStore {
    async fn load(&self, key: StorageKey) -> Result<Option<Vec<u8>>, PersistenceError> {
        let path = self.path(key);
        match fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PersistenceError::Read(path, e)),
        }
    }

    async fn save(&self, key: StorageKey, value: Vec<u8>) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.cache_dir)
            .await
            .map_err(|e| PersistenceError::Write(self.cache_dir.clone(), e))?;
        let path = self.path(key);
        fs::write(&path, &value)
            .await
            .map_err(|e| PersistenceError::Write(path.clone(), e))?;
        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<(), PersistenceError> {
        let path = self.path(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(PersistenceError::Remove(path, e)),
        }
    }
}

/// Process-local store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshotStore {
    entries: Arc<Mutex<HashMap<StorageKey, Vec<u8>>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<StorageKey, Vec<u8>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn contains(&self, key: StorageKey) -> bool {
        self.entries().contains_key(&key)
    }
}

impl SnapshotStore for MemorySnapshotStore {
    async fn load(&self, key: StorageKey) -> Result<Option<Vec<u8>>, PersistenceError> {
        Ok(self.entries().get(&key).cloned())
    }

    async fn save(&self, key: StorageKey, value: Vec<u8>) -> Result<(), PersistenceError> {
        self.entries().insert(key, value);
        Ok(())
    }

    async fn remove(&self, key: StorageKey) -> Result<(), PersistenceError> {
        self.entries().remove(&key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_store_roundtrip() -> Result<(), PersistenceError> {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSnapshotStore::new(&dir.path().join("nested"));

        assert_eq!(store.load(StorageKey::PollInterval).await?, None);

        store
            .save(StorageKey::PollInterval, b"30000".to_vec())
            .await?;
        assert_eq!(
            store.load(StorageKey::PollInterval).await?,
            Some(b"30000".to_vec())
        );
        assert!(dir.path().join("nested").join("poll_interval_ms").exists());

        store.remove(StorageKey::PollInterval).await?;
        store.remove(StorageKey::PollInterval).await?;
        assert_eq!(store.load(StorageKey::PollInterval).await?, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_store_clones_share_entries() -> Result<(), PersistenceError> {
        let store = MemorySnapshotStore::new();
        let other = store.clone();

        other
            .save(StorageKey::Notifications, b"false".to_vec())
            .await?;
        assert!(store.contains(StorageKey::Notifications));
        assert_eq!(
            store.load(StorageKey::Notifications).await?,
            Some(b"false".to_vec())
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_unwritable_cache_dir_is_write_error() -> Result<(), PersistenceError> {
        let dir = tempfile::tempdir().expect("tempdir");
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").expect("write blocker");
        let store = FileSnapshotStore::new(&blocker);

        let result = store
            .save(StorageKey::Notifications, b"true".to_vec())
            .await;
        assert!(matches!(result, Err(PersistenceError::Write(path, _)) if path == blocker));
        Ok(())
    }
}

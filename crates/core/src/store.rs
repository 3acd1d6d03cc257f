//! String-valued key-value persistence
//!
//! The location cache, the car slot and user preferences all persist through
//! [`KeyValueStore`]. Two backends are provided:
//! - [`MemoryStore`]: process-local map, used in tests and ephemeral sessions
//! - [`FileStore`]: a single JSON object on disk, replaced atomically on write
//!
//! # Example
//!
//! ```rust
//! use myco_core::store::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("myco_username", "amanita").unwrap();
//! assert_eq!(store.get("myco_username").unwrap().as_deref(), Some("amanita"));
//! ```

use crate::error::{Error, ErrorCode, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::warn;

/// Well-known storage keys
pub mod keys {
    /// Most recent location fix with its capture time
    pub const LAST_LOCATION: &str = "myco_last_location";
    /// Saved car position
    pub const CAR_LOCATION: &str = "myco_car_location";
    /// Display name used when sharing spots
    pub const USERNAME: &str = "myco_username";
    /// Interface language
    pub const LANGUAGE: &str = "mushroomfinder_language";
}

/// Flat string-to-string persistence.
///
/// Single-key reads and writes are atomic; there are no cross-key transactions.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;
}

fn lock_error() -> Error {
    Error::new(ErrorCode::Internal, "Failed to acquire store lock")
}

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// True when nothing is stored
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self.entries.read().map_err(|_| lock_error())?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self.entries.write().map_err(|_| lock_error())?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut guard = self.entries.write().map_err(|_| lock_error())?;
        guard.remove(key);
        Ok(())
    }
}

/// JSON-file store
///
/// The whole file is read on first access and kept in memory. Every write
/// rewrites the file through a temporary sibling and a rename. Reads of a
/// corrupt file fail with [`ErrorCode::StorageCorrupt`]; the next write
/// starts from an empty map and replaces it.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<Option<BTreeMap<String, String>>>,
}

impl FileStore {
    /// Open a store backed by `path`; the file is created on first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: RwLock::new(None),
        }
    }

    /// Backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            Error::new(
                ErrorCode::StorageCorrupt,
                format!("Store file {} is not a JSON object", self.path.display()),
            )
            .with_source(e)
        })
    }

    fn write_file(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::storage_unavailable(format!(
                        "Cannot create {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn with_entries<T>(&self, f: impl FnOnce(&BTreeMap<String, String>) -> T) -> Result<T> {
        {
            let guard = self.entries.read().map_err(|_| lock_error())?;
            if let Some(entries) = guard.as_ref() {
                return Ok(f(entries));
            }
        }

        let mut guard = self.entries.write().map_err(|_| lock_error())?;
        let entries = match guard.take() {
            Some(entries) => entries,
            None => self.read_file()?,
        };
        let result = f(&entries);
        *guard = Some(entries);
        Ok(result)
    }

    fn update(&self, f: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let mut guard = self.entries.write().map_err(|_| lock_error())?;
        let snapshot = guard.take();
        let mut entries = match &snapshot {
            Some(entries) => entries.clone(),
            None => match self.read_file() {
                Ok(entries) => entries,
                Err(e) if e.code == ErrorCode::StorageCorrupt => {
                    warn!(path = %self.path.display(), error = %e, "Replacing corrupt store file");
                    BTreeMap::new()
                }
                Err(e) => return Err(e),
            },
        };
        f(&mut entries);

        match self.write_file(&entries) {
            Ok(()) => {
                *guard = Some(entries);
                Ok(())
            }
            Err(e) => {
                *guard = snapshot;
                Err(e)
            }
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_entries(|entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("missing").unwrap().is_none());

        store.set("a", "1").unwrap();
        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);

        store.remove("a").unwrap();
        store.remove("a").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_file_store_persists_across_instances() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("store.json");

        let store = FileStore::new(&path);
        store.set(keys::USERNAME, "morille").unwrap();
        store.set(keys::LANGUAGE, "en").unwrap();
        drop(store);

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(keys::USERNAME).unwrap().as_deref(), Some("morille"));
        assert_eq!(reopened.get(keys::LANGUAGE).unwrap().as_deref(), Some("en"));
    }

    #[test]
    fn test_file_store_remove() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("store.json"));

        store.set(keys::CAR_LOCATION, "{}").unwrap();
        store.remove(keys::CAR_LOCATION).unwrap();

        let reopened = FileStore::new(store.path());
        assert!(reopened.get(keys::CAR_LOCATION).unwrap().is_none());
    }

    #[test]
    fn test_file_store_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("absent.json"));
        assert!(store.get("anything").unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_corrupt_file_errors() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store.json");
        fs::write(&path, "not json at all").unwrap();

        let store = FileStore::new(&path);
        let err = store.get("x").unwrap_err();
        assert_eq!(err.code, ErrorCode::StorageCorrupt);
    }

    #[test]
    fn test_file_store_write_replaces_corrupt_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store.json");
        fs::write(&path, "{truncated").unwrap();

        let store = FileStore::new(&path);
        assert!(store.get(keys::CAR_LOCATION).is_err());

        store.set(keys::CAR_LOCATION, "car").unwrap();
        assert_eq!(store.get(keys::CAR_LOCATION).unwrap().as_deref(), Some("car"));

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get(keys::CAR_LOCATION).unwrap().as_deref(), Some("car"));
    }

    #[test]
    fn test_file_store_unwritable_location_errors() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let store = FileStore::new(blocker.join("store.json"));
        assert!(store.set("k", "v").is_err());
        assert!(store.get("k").unwrap().is_none());
    }
}

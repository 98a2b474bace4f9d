//! Key/value persistence for client state, shaped after the browser
//! `localStorage` API. Values are JSON strings.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub const AUTH_TOKEN_KEY: &str = "webnovel-manager-auth-token";
pub const USER_KEY: &str = "webnovel-manager-user";
pub const SETTINGS_KEY: &str = "webnovel-manager-settings";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to write {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to encode storage: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("storage lock poisoned")]
    Poisoned,
}

pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

pub type SharedStorage = Arc<dyn Storage>;

/// Reads `key` as JSON. Missing or unreadable entries yield `None`.
pub fn load<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    match storage.get_item(key) {
        Ok(Some(value)) => match serde_json::from_str::<T>(&value) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("ignoring unreadable {key}: {e}");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("failed to read {key}: {e}");
            None
        }
    }
}

pub fn save<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    storage.set_item(key, &serde_json::to_string(value)?)
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedStorage {
        Arc::new(Self::new())
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.remove(key);
        Ok(())
    }
}

/// A single JSON object on disk, rewritten whole on every mutation
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: Mutex<BTreeMap<String, String>>,
}

impl FileStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let items = match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("storage at {path:?} is unreadable, starting empty: {e}");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(source) => return Err(StorageError::Io { path, source }),
        };
        debug!("opened storage at {:?} with {} keys", path, items.len());

        Ok(Self {
            path,
            items: Mutex::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, items: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(items)?).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)?;

        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        self.flush(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.lock().map_err(|_| StorageError::Poisoned)?;
        if items.remove(key).is_some() {
            self.flush(&items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_memory_storage() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get_item(AUTH_TOKEN_KEY).unwrap(), None);

        storage.set_item(AUTH_TOKEN_KEY, "jwt").unwrap();
        assert_eq!(
            storage.get_item(AUTH_TOKEN_KEY).unwrap().as_deref(),
            Some("jwt")
        );

        storage.remove_item(AUTH_TOKEN_KEY).unwrap();
        assert_eq!(storage.get_item(AUTH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_load_ignores_garbage() {
        let storage = MemoryStorage::new();
        storage.set_item(SETTINGS_KEY, "{not json").unwrap();
        assert_eq!(load::<serde_json::Value>(&storage, SETTINGS_KEY), None);
    }

    #[test]
    fn test_file_storage_persists() {
        let dir = std::env::temp_dir().join(format!("webnovel-storage-{}", std::process::id()));
        let path = dir.join("storage.json");
        let _ = std::fs::remove_dir_all(&dir);

        {
            let storage = FileStorage::open(&path).unwrap();
            save(&storage, USER_KEY, &vec!["reader"]).unwrap();
            storage.set_item(AUTH_TOKEN_KEY, "jwt").unwrap();
            storage.remove_item(AUTH_TOKEN_KEY).unwrap();
        }

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(
            load::<Vec<String>>(&storage, USER_KEY),
            Some(vec!["reader".to_string()])
        );
        assert_eq!(storage.get_item(AUTH_TOKEN_KEY).unwrap(), None);

        let _ = std::fs::remove_dir_all(&dir);
    }
}

//! Key-value persistence for the source URL, row cache and refresh time

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::{CoreError, CoreResult};

/// Key holding the configured source URL
pub const SOURCE_URL_KEY: &str = "sheet_url";
/// Key holding the last fetched rows as a JSON array
pub const CACHE_KEY: &str = "money_manager_cache";
/// Key holding the human-readable time of the last successful refresh
pub const LAST_REFRESH_KEY: &str = "last_refresh";

/// String key-value store
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> CoreResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;
    fn remove(&self, key: &str) -> CoreResult<()>;
    /// Remove every key
    fn clear(&self) -> CoreResult<()>;
}

/// Store kept in memory only
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> CoreResult<()> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
        Ok(())
    }
}

/// Store backed by a JSON object file.
///
/// The whole file is rewritten on every change. It is created, along with
/// its parent directories, on first write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<Map<String, Value>>,
}

impl FileStore {
    /// Open a store, reading the file when it exists
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let entries = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                Map::new()
            } else {
                match serde_json::from_str::<Value>(&content) {
                    Ok(Value::Object(map)) => map,
                    Ok(_) => {
                        return Err(CoreError::StoreError {
                            message: format!("{} does not hold a JSON object", path.display()),
                        })
                    }
                    Err(e) => {
                        return Err(CoreError::StoreError {
                            message: format!("{}: {}", path.display(), e),
                        })
                    }
                }
            }
        } else {
            Map::new()
        };

        log::debug!("Opened store {} with {} keys", path.display(), entries.len());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &Map<String, Value>) -> CoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(entries).map_err(|e| CoreError::StoreError {
            message: e.to_string(),
        })?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.persist(&entries)
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    fn clear(&self) -> CoreResult<()> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.clear();
        self.persist(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert_eq!(store.get(SOURCE_URL_KEY).unwrap(), None);

        store.set(SOURCE_URL_KEY, "https://script.google.com/x").unwrap();
        assert_eq!(
            store.get(SOURCE_URL_KEY).unwrap().as_deref(),
            Some("https://script.google.com/x")
        );

        store.remove(SOURCE_URL_KEY).unwrap();
        assert_eq!(store.get(SOURCE_URL_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_persists_across_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = FileStore::open(&path).unwrap();
        store.set(CACHE_KEY, "[[\"2023-01-01\",\"Comida\",\"\",\"5\"]]").unwrap();
        store.set(LAST_REFRESH_KEY, "01/01/2024 10:00").unwrap();
        assert!(path.exists());

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get(LAST_REFRESH_KEY).unwrap().as_deref(),
            Some("01/01/2024 10:00")
        );
        assert!(reopened.get(CACHE_KEY).unwrap().unwrap().starts_with("[["));
    }

    #[test]
    fn test_file_store_clear() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path).unwrap();
        store.set(SOURCE_URL_KEY, "https://script.google.com/x").unwrap();
        store.clear().unwrap();

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(reopened.get(SOURCE_URL_KEY).unwrap(), None);
    }

    #[test]
    fn test_file_store_rejects_non_object() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, CoreError::StoreError { .. }));
    }
}

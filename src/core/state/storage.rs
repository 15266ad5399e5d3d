//! Persisted input store.
//!
//! A namespaced key/value store whose values are JSON documents. Keys follow
//! the `code-mo:<tool>[:<sub_key>]` layout so tools never collide. The store
//! is read once when opened and written through on every change; a missing
//! or corrupt file (or value) silently falls back to the caller's default.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::lock;
use crate::core::config::StorageConfig;

/// Prefix shared by every key written by this server.
pub const STORAGE_NAMESPACE: &str = "code-mo";

/// Build the storage key for a tool, optionally scoped to a sub key.
pub fn storage_key(tool: &str, sub_key: Option<&str>) -> String {
    match sub_key {
        Some(sub) if !sub.is_empty() => format!("{STORAGE_NAMESPACE}:{tool}:{sub}"),
        _ => format!("{STORAGE_NAMESPACE}:{tool}"),
    }
}

/// Errors raised while writing the store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing file could not be written.
    #[error("Failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The value could not be serialized to JSON.
    #[error("Failed to serialize value for '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Durable key/value store shared by all tools.
///
/// Cloning is cheap; clones share the same entries and backing file.
#[derive(Clone)]
pub struct PersistedStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    path: Option<PathBuf>,
    entries: Mutex<Map<String, Value>>,
}

impl std::fmt::Debug for PersistedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistedStore")
            .field("path", &self.inner.path)
            .field("entries", &lock(&self.inner.entries).len())
            .finish()
    }
}

impl PersistedStore {
    /// A store that lives only as long as the process.
    pub fn in_memory() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                path: None,
                entries: Mutex::new(Map::new()),
            }),
        }
    }

    /// Open a file-backed store, loading whatever the file currently holds.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = read_entries(&path);
        info!("Opened persisted store at {:?} ({} keys)", path, entries.len());

        Self {
            inner: Arc::new(StoreInner {
                path: Some(path),
                entries: Mutex::new(entries),
            }),
        }
    }

    /// Build the store described by the configuration.
    pub fn from_config(config: &StorageConfig) -> Self {
        match &config.path {
            Some(path) => Self::open(path),
            None => Self::in_memory(),
        }
    }

    /// The backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.inner.path.as_deref()
    }

    /// Load a value, falling back to `default` when absent or undecodable.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let Some(raw) = self.get_raw(key) else {
            return default;
        };

        match serde_json::from_value(raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Error loading stored value (key: {}): {}", key, e);
                default
            }
        }
    }

    /// The raw JSON value stored under `key`.
    pub fn get_raw(&self, key: &str) -> Option<Value> {
        lock(&self.inner.entries).get(key).cloned()
    }

    /// Store a value and write the store through to disk.
    ///
    /// On failure the previous value is kept.
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let value = serde_json::to_value(value).map_err(|source| StorageError::Serialize {
            key: key.to_string(),
            source,
        })?;

        let mut entries = lock(&self.inner.entries);
        let previous = entries.insert(key.to_string(), value);

        if let Err(e) = self.flush(&entries) {
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }

        debug!("Stored value under {}", key);
        Ok(())
    }

    /// Remove a single key. Returns whether the key existed.
    pub fn remove(&self, key: &str) -> Result<bool, StorageError> {
        let mut entries = lock(&self.inner.entries);
        let Some(previous) = entries.remove(key) else {
            return Ok(false);
        };

        if let Err(e) = self.flush(&entries) {
            entries.insert(key.to_string(), previous);
            return Err(e);
        }
        Ok(true)
    }

    /// Remove every key belonging to `tool`. Returns the number removed.
    pub fn remove_tool(&self, tool: &str) -> Result<usize, StorageError> {
        let own_key = storage_key(tool, None);
        let scoped_prefix = format!("{own_key}:");

        let mut entries = lock(&self.inner.entries);
        let snapshot = entries.clone();
        entries.retain(|key, _| key != &own_key && !key.starts_with(&scoped_prefix));
        let removed = snapshot.len() - entries.len();

        if removed > 0 {
            if let Err(e) = self.flush(&entries) {
                *entries = snapshot;
                return Err(e);
            }
        }
        Ok(removed)
    }

    /// Remove everything.
    pub fn clear(&self) -> Result<(), StorageError> {
        let mut entries = lock(&self.inner.entries);
        let snapshot = std::mem::take(&mut *entries);

        if let Err(e) = self.flush(&entries) {
            *entries = snapshot;
            return Err(e);
        }
        Ok(())
    }

    /// All keys currently stored, in insertion order.
    pub fn keys(&self) -> Vec<String> {
        lock(&self.inner.entries).keys().cloned().collect()
    }

    /// Write the entries to the backing file via a temp file and rename.
    fn flush(&self, entries: &Map<String, Value>) -> Result<(), StorageError> {
        let Some(path) = &self.inner.path else {
            return Ok(());
        };

        let io_error = |source| StorageError::Io {
            path: path.display().to_string(),
            source,
        };

        let body = serde_json::to_vec_pretty(entries).map_err(|source| StorageError::Serialize {
            key: STORAGE_NAMESPACE.to_string(),
            source,
        })?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let tmp = path.with_extension("tmp");
        fs::write(&tmp, body).map_err(io_error)?;
        fs::rename(&tmp, path).map_err(io_error)?;
        Ok(())
    }
}

/// Read the backing file; anything unreadable yields an empty store.
fn read_entries(path: &Path) -> Map<String, Value> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Map::new(),
        Err(e) => {
            warn!("Error reading persisted store {:?}: {}", path, e);
            return Map::new();
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(Value::Object(entries)) => entries,
        Ok(_) => {
            warn!("Persisted store {:?} is not a JSON object, starting empty", path);
            Map::new()
        }
        Err(e) => {
            warn!("Persisted store {:?} is corrupt, starting empty: {}", path, e);
            Map::new()
        }
    }
}

/// A single typed value bound to a storage key.
///
/// Read once on creation, written through on every [`set`](Self::set).
#[derive(Debug, Clone)]
pub struct PersistedValue<T> {
    store: PersistedStore,
    key: String,
    value: T,
}

impl<T> PersistedValue<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Bind `key`, loading its current value or `default`.
    pub fn load(store: &PersistedStore, key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        let value = store.load(&key, default);
        Self {
            store: store.clone(),
            key,
            value,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and write it through.
    ///
    /// The in-memory value always changes; the error only reports that the
    /// write did not reach the store.
    pub fn set(&mut self, value: T) -> Result<(), StorageError> {
        self.value = value;
        self.store.save(&self.key, &self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_storage_key_layout() {
        assert_eq!(storage_key("json", Some("input")), "code-mo:json:input");
        assert_eq!(storage_key("json", None), "code-mo:json");
        assert_eq!(storage_key("json", Some("")), "code-mo:json");
    }

    #[test]
    fn test_load_missing_returns_default() {
        let store = PersistedStore::in_memory();
        let value: String = store.load("code-mo:json:input", "fallback".to_string());
        assert_eq!(value, "fallback");
    }

    #[test]
    fn test_load_wrong_type_returns_default() {
        let store = PersistedStore::in_memory();
        store.save("code-mo:case:input", &42).unwrap();
        let value: Vec<String> = store.load("code-mo:case:input", vec!["x".to_string()]);
        assert_eq!(value, vec!["x".to_string()]);
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let store = PersistedStore::open(&path);
        store.save("code-mo:json:input", "{\"a\":1}").unwrap();
        store
            .save("code-mo:regex:input", &serde_json::json!({"pattern": "a+", "flags": "g"}))
            .unwrap();

        let reopened = PersistedStore::open(&path);
        let input: String = reopened.load("code-mo:json:input", String::new());
        assert_eq!(input, "{\"a\":1}");
        assert_eq!(
            reopened.get_raw("code-mo:regex:input"),
            Some(serde_json::json!({"pattern": "a+", "flags": "g"}))
        );
    }

    #[test]
    fn test_corrupt_file_falls_back_to_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        fs::write(&path, "{ not json").unwrap();

        let store = PersistedStore::open(&path);
        assert!(store.keys().is_empty());
        let value: String = store.load("code-mo:json:input", "default".to_string());
        assert_eq!(value, "default");
    }

    #[test]
    fn test_remove_tool_only_touches_its_namespace() {
        let store = PersistedStore::in_memory();
        store.save("code-mo:json:input", "a").unwrap();
        store.save("code-mo:json", "b").unwrap();
        store.save("code-mo:json-escape:input", "c").unwrap();

        assert_eq!(store.remove_tool("json").unwrap(), 2);
        assert_eq!(store.keys(), vec!["code-mo:json-escape:input".to_string()]);
    }

    #[test]
    fn test_clear_and_remove() {
        let store = PersistedStore::in_memory();
        store.save("code-mo:a", "1").unwrap();
        store.save("code-mo:b", "2").unwrap();

        assert!(store.remove("code-mo:a").unwrap());
        assert!(!store.remove("code-mo:a").unwrap());

        store.clear().unwrap();
        assert!(store.keys().is_empty());
    }

    #[test]
    fn test_failed_write_keeps_previous_value() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes the rename fail.
        let path = dir.path().join("store.json");
        fs::create_dir(&path).unwrap();

        let store = PersistedStore::open(&path);
        let result = store.save("code-mo:json:input", "value");
        assert!(result.is_err());
        assert!(store.get_raw("code-mo:json:input").is_none());
    }

    #[test]
    fn test_persisted_value_writes_through() {
        let store = PersistedStore::in_memory();
        let mut value = PersistedValue::load(&store, storage_key("markdown", Some("input")), String::new());
        assert_eq!(value.get(), "");

        value.set("# Title".to_string()).unwrap();
        let reloaded = PersistedValue::load(&store, "code-mo:markdown:input", String::new());
        assert_eq!(reloaded.get(), "# Title");
    }
}

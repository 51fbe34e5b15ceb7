//! On-disk key-value store.
//!
//! Keeps every key in one JSON object at `<dir>/store.json`. Writes go to a
//! temporary file first and are renamed into place.

use parking_lot::Mutex;
use serde_json::{Map, Value};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::db::store::KeyValueStore;
use crate::error::{ErrorContext, PortalError, PortalResult};

pub const STORE_FILE_NAME: &str = "store.json";

pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Open (or lazily create) the store inside `dir`.
    pub fn open<P: AsRef<Path>>(dir: P) -> PortalResult<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| {
            PortalError::storage_with_context(
                format!("Failed to create store directory: {}", e),
                ErrorContext::new("open_store").at(dir.display().to_string()),
            )
        })?;

        Ok(Self {
            path: dir.join(STORE_FILE_NAME),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> PortalResult<Map<String, Value>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => {
                return Err(PortalError::storage_with_context(
                    format!("Failed to read store: {}", e),
                    ErrorContext::new("read_store").at(self.path.display().to_string()),
                ))
            }
        };

        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(PortalError::storage_with_context(
                "Store file is not a JSON object",
                ErrorContext::new("read_store").at(self.path.display().to_string()),
            )),
            Err(e) => Err(PortalError::storage_with_context(
                format!("Store file is corrupt: {}", e),
                ErrorContext::new("read_store").at(self.path.display().to_string()),
            )),
        }
    }

    fn write_all(&self, entries: &Map<String, Value>) -> PortalResult<()> {
        let body = serde_json::to_string_pretty(entries)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body)
            .and_then(|_| fs::rename(&tmp, &self.path))
            .map_err(|e| {
                PortalError::storage_with_context(
                    format!("Failed to write store: {}", e),
                    ErrorContext::new("write_store").at(self.path.display().to_string()),
                )
            })
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> PortalResult<Option<String>> {
        let entries = self.read_all()?;
        Ok(entries.get(key).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }))
    }

    fn set(&self, key: &str, value: &str) -> PortalResult<()> {
        let _guard = self.write_lock.lock();
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), Value::String(value.to_string()));
        self.write_all(&entries)
    }
}

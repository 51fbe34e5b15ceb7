//! Store factory for dependency injection.
//!
//! Builds the dismissal store selected in `[storage]`.

use log::info;
use std::str::FromStr;
use std::sync::Arc;

use super::store::KeyValueStore;
use super::stores::{FileStore, InMemoryStore};
use crate::config::StorageSettings;
use crate::error::{PortalError, PortalResult};

/// Store backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreType {
    /// JSON file on disk, survives restarts
    File,
    /// Process-local map
    Memory,
}

impl FromStr for StoreType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "file" | "disk" => Ok(Self::File),
            "memory" | "in-memory" | "local" => Ok(Self::Memory),
            _ => Err(format!("Unknown store type: {}", s)),
        }
    }
}

pub struct StoreFactory;

impl StoreFactory {
    /// Create the store described by `settings`.
    pub fn create(settings: &StorageSettings) -> PortalResult<Arc<dyn KeyValueStore>> {
        let store_type = StoreType::from_str(&settings.store_type)
            .map_err(|e| PortalError::configuration(e).with_operation("create_store"))?;

        match store_type {
            StoreType::File => {
                let store = FileStore::open(&settings.dir)?;
                info!("Using file store at {}", store.path().display());
                Ok(Arc::new(store))
            }
            StoreType::Memory => {
                info!("Using in-memory store");
                Ok(Arc::new(InMemoryStore::new()))
            }
        }
    }
}

//! Client-local key-value store abstraction.
//!
//! The banner keeps a single piece of persisted state, the hidden-until
//! timestamp. It lives behind this trait so tests can swap the on-disk
//! store for an in-memory one.

use crate::error::PortalResult;

/// String-to-string store scoped to one client, surviving reloads.
pub trait KeyValueStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> PortalResult<Option<String>>;

    /// Write or overwrite a value.
    fn set(&self, key: &str, value: &str) -> PortalResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> PortalResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> PortalResult<()> {
        (**self).set(key, value)
    }
}

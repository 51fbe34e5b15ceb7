//! Client-local persistence for the banner's dismissal state.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  services::banner (DismissalTracker)         │
//! └───────────────────┬──────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────┐
//! │  KeyValueStore trait (store.rs)              │
//! └───────────────────┬──────────────────────────┘
//!          ┌──────────┴───────────┐
//!   FileStore (JSON on disk)   InMemoryStore
//! ```
//!
//! - `store`: trait definition
//! - `stores::file`: JSON file under the configured state directory
//! - `stores::memory`: in-memory map for tests
//! - `factory`: builds a store from `[storage]` settings

pub mod factory;
pub mod store;
pub mod stores;

pub use factory::{StoreFactory, StoreType};
pub use store::KeyValueStore;
pub use stores::{FileStore, InMemoryStore};

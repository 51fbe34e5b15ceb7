//! Where directory records come from.

pub mod sources;

pub use sources::{load_records, JsonFileSource, RecordSource, StaticSource};

//! Record sources for the directory engine.
//!
//! A [`RecordSource`] hands over the full record collection in one call.
//! The engine filters and paginates in memory afterwards, so a source is
//! read once per page load and then never touched again.

use async_trait::async_trait;
use log::info;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{ErrorContext, PortalError, PortalResult};
use crate::models::DirectoryRecord;
use crate::parsing::parse_records_str;
use crate::services::retry::{retry_async, RetryPolicy};

/// Supplier of the complete directory collection.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Short description used in log lines.
    fn describe(&self) -> String;

    /// Fetch every record.
    ///
    /// # Returns
    /// * `Ok(Vec<DirectoryRecord>)` - The collection, possibly empty
    /// * `Err(PortalError)` - `SourceError` for I/O failures (retryable when
    ///   transient), `ParseError` for malformed payloads
    async fn fetch(&self) -> PortalResult<Vec<DirectoryRecord>>;
}

/// JSON export on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }

    async fn fetch(&self) -> PortalResult<Vec<DirectoryRecord>> {
        let content = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            let mut context =
                ErrorContext::new("fetch_records").at(self.path.display().to_string());
            if is_transient(e.kind()) {
                context = context.transient();
            }
            PortalError::source_with_context(format!("Failed to read records: {}", e), context)
        })?;

        parse_records_str(&content)
    }
}

fn is_transient(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
    )
}

/// Records already in memory.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<DirectoryRecord>,
}

impl StaticSource {
    pub fn new(records: Vec<DirectoryRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for StaticSource {
    fn describe(&self) -> String {
        format!("{} static record(s)", self.records.len())
    }

    async fn fetch(&self) -> PortalResult<Vec<DirectoryRecord>> {
        Ok(self.records.clone())
    }
}

/// Fetch from `source`, retrying transient failures per `policy`.
pub async fn load_records<S: RecordSource + ?Sized>(
    source: &S,
    policy: &RetryPolicy,
) -> PortalResult<Vec<DirectoryRecord>> {
    let records = retry_async(policy, "load_records", || source.fetch()).await?;
    info!("Fetched {} record(s) from {}", records.len(), source.describe());
    Ok(records)
}

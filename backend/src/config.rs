//! Portal configuration file support.
//!
//! Settings are read from a TOML file. Every key has a default, so an empty
//! file (or no file at all, via [`PortalConfig::load_or_default`]) yields the
//! production values: UTC+5 calendar, 24 hour dismissal, 1 second ticks and
//! 12 records per directory page.
//!
//! ```toml
//! [banner]
//! utc_offset_minutes = 300
//! dismiss_hours = 24
//!
//! [banner.labels]
//! until_window_close = "Iftorgacha"
//!
//! [directory]
//! page_size = 12
//! ```

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ErrorContext, PortalError, PortalResult};
use crate::models::{FixedOffsetZone, MAX_OFFSET_MINUTES, MILLIS_PER_HOUR, UZBEKISTAN_OFFSET_MINUTES};
use crate::services::phase::BannerLabels;

/// Environment variable pointing at an explicit config file.
pub const CONFIG_ENV_VAR: &str = "PORTAL_CONFIG";

/// Operation recorded when the search over default locations finds nothing.
const DISCOVER_OPERATION: &str = "discover_config";

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub banner: BannerSettings,
    #[serde(default)]
    pub directory: DirectorySettings,
    #[serde(default)]
    pub retry: RetrySettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Countdown banner settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BannerSettings {
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_dismiss_hours")]
    pub dismiss_hours: u32,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default)]
    pub labels: BannerLabels,
}

/// Directory listing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectorySettings {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

/// Retry settings for record sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrySettings {
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: u32,
}

/// Where the dismissal state is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    #[serde(rename = "type", default = "default_store_type")]
    pub store_type: String,
    #[serde(default = "default_store_dir")]
    pub dir: PathBuf,
}

fn default_utc_offset_minutes() -> i32 {
    UZBEKISTAN_OFFSET_MINUTES
}

fn default_dismiss_hours() -> u32 {
    24
}

fn default_tick_interval_ms() -> u64 {
    1000
}

fn default_storage_key() -> String {
    "ramadan_banner_hidden_until".to_string()
}

fn default_page_size() -> usize {
    12
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    100
}

fn default_backoff_factor() -> u32 {
    2
}

fn default_store_type() -> String {
    "file".to_string()
}

fn default_store_dir() -> PathBuf {
    PathBuf::from(".portal-state")
}

impl Default for BannerSettings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: default_utc_offset_minutes(),
            dismiss_hours: default_dismiss_hours(),
            tick_interval_ms: default_tick_interval_ms(),
            storage_key: default_storage_key(),
            labels: BannerLabels::default(),
        }
    }
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay_ms(),
            backoff_factor: default_backoff_factor(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            store_type: default_store_type(),
            dir: default_store_dir(),
        }
    }
}

impl BannerSettings {
    pub fn zone(&self) -> PortalResult<FixedOffsetZone> {
        FixedOffsetZone::new(self.utc_offset_minutes).ok_or_else(|| {
            PortalError::configuration(format!(
                "banner.utc_offset_minutes must be within ±{} (got {})",
                MAX_OFFSET_MINUTES, self.utc_offset_minutes
            ))
        })
    }

    pub fn dismiss_duration_millis(&self) -> i64 {
        i64::from(self.dismiss_hours) * MILLIS_PER_HOUR
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

impl PortalConfig {
    /// Parse configuration from TOML text and validate it.
    pub fn from_toml_str(content: &str) -> PortalResult<Self> {
        let config: PortalConfig = toml::from_str(content).map_err(|e| {
            PortalError::configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> PortalResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PortalError::configuration(format!("Failed to read config file: {}", e))
                .with_operation("load_config")
        })?;

        let config = Self::from_toml_str(&content)?;
        info!("Loaded portal configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from the default location.
    ///
    /// Searches, in order:
    /// 1. the file named by `$PORTAL_CONFIG`
    /// 2. `portal.toml` in the current directory
    /// 3. `backend/portal.toml`
    /// 4. `../portal.toml`
    pub fn from_default_location() -> PortalResult<Self> {
        if let Ok(explicit) = std::env::var(CONFIG_ENV_VAR) {
            return Self::from_file(explicit);
        }

        let search_paths = [
            PathBuf::from("portal.toml"),
            PathBuf::from("backend/portal.toml"),
            PathBuf::from("../portal.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(PortalError::ConfigurationError {
            message: "No portal.toml found in standard locations".to_string(),
            context: ErrorContext::new(DISCOVER_OPERATION).at("portal.toml"),
        })
    }

    /// Like [`Self::from_default_location`], but falls back to defaults when
    /// no file exists. A file that exists but is invalid is still an error.
    pub fn load_or_default() -> PortalResult<Self> {
        match Self::from_default_location() {
            Ok(config) => Ok(config),
            Err(e) if is_nothing_found(&e) => {
                debug!("No portal.toml found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Reject settings the engines cannot work with.
    pub fn validate(&self) -> PortalResult<()> {
        self.banner.zone()?;

        if self.banner.tick_interval_ms == 0 {
            return Err(PortalError::configuration(
                "banner.tick_interval_ms must be greater than zero",
            ));
        }
        if self.banner.storage_key.trim().is_empty() {
            return Err(PortalError::configuration("banner.storage_key must not be empty"));
        }
        if self.directory.page_size == 0 {
            return Err(PortalError::configuration(
                "directory.page_size must be greater than zero",
            ));
        }
        if self.retry.backoff_factor == 0 {
            return Err(PortalError::configuration(
                "retry.backoff_factor must be at least 1",
            ));
        }
        Ok(())
    }
}

/// True for the error [`PortalConfig::from_default_location`] returns when
/// the search found no file, as opposed to a file that failed to load.
fn is_nothing_found(err: &PortalError) -> bool {
    matches!(err, PortalError::ConfigurationError { context, .. }
        if context.operation.as_deref() == Some(DISCOVER_OPERATION))
}

//! Config discovery through `PORTAL_CONFIG` and the default search.

mod support;

use std::fs;

use eduportal::config::CONFIG_ENV_VAR;
use eduportal::{PortalConfig, PortalError};
use tempfile::TempDir;

use support::with_scoped_env;

#[test]
fn env_var_points_at_explicit_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("custom.toml");
    fs::write(&path, "[banner]\nutc_offset_minutes = 240\n[directory]\npage_size = 9\n").unwrap();

    let config = with_scoped_env(&[(CONFIG_ENV_VAR, path.to_str())], || {
        PortalConfig::from_default_location()
    })
    .unwrap();

    assert_eq!(config.banner.utc_offset_minutes, 240);
    assert_eq!(config.directory.page_size, 9);
}

#[test]
fn missing_explicit_file_is_an_error_even_with_fallback() {
    let result = with_scoped_env(
        &[(CONFIG_ENV_VAR, Some("/no/such/dir/portal.toml"))],
        PortalConfig::load_or_default,
    );

    let err = result.unwrap_err();
    assert!(matches!(err, PortalError::ConfigurationError { .. }));
    assert_eq!(err.context().operation.as_deref(), Some("load_config"));
}

#[test]
fn no_config_anywhere_falls_back_to_defaults() {
    let config = with_scoped_env(&[(CONFIG_ENV_VAR, None)], PortalConfig::load_or_default).unwrap();
    assert_eq!(config, PortalConfig::default());
}

#[test]
fn invalid_explicit_file_is_reported() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[storage]\ntype = \"memory\"\n[directory]\npage_size = 0\n").unwrap();

    let result = with_scoped_env(&[(CONFIG_ENV_VAR, path.to_str())], PortalConfig::load_or_default);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("page_size"));
}

#[test]
fn example_config_parses() {
    let example = concat!(env!("CARGO_MANIFEST_DIR"), "/portal.example.toml");
    let config = PortalConfig::from_file(example).unwrap();
    assert_eq!(config.banner.storage_key, "ramadan_banner_hidden_until");
    assert_eq!(config.directory.page_size, 12);
}

//! # Configuration Loader
//!
//! Reads the TOML file into the [`AppConfig`] DTO and fills whatever the
//! file leaves out from system defaults. The file is taken as fact: no
//! validation happens here.

use anyhow::Context;
use pv_core::config::AppConfig;
use std::path::Path;

/// Load configuration from a TOML file.
///
/// Missing sections and keys come back as empty values.
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML.
pub fn load_config(config_path: &Path) -> anyhow::Result<AppConfig> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
    let toml_value: toml::Value =
        toml::from_str(&content).context("Failed to parse config as TOML")?;
    AppConfig::from_toml(&toml_value)
}

/// Config for this run: the file at `config_path` if given, with gaps filled
/// from defaults rooted at the platform data directory.
pub fn resolve_config(config_path: Option<&Path>) -> anyhow::Result<AppConfig> {
    let data_dir = pv_infra::fs::app_data_dir()?;
    let defaults = AppConfig::with_system_defaults(data_dir);
    match config_path {
        Some(path) => Ok(load_config(path)?.or_defaults(defaults)),
        None => Ok(defaults),
    }
}

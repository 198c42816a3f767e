//! Configuration loading from file system

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{info, instrument, warn};

use super::defaults::DEFAULT_CONFIG_PATH;
use super::types::StoreConfig;

/// Default config file location (~/.hotclip/config.json)
pub fn default_config_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde(DEFAULT_CONFIG_PATH).as_ref())
}

/// Load configuration from a JSON file.
///
/// Returns `StoreConfig::default()` if the file is missing, unreadable or
/// malformed. Fields absent from the file take their defaults.
#[instrument(name = "load_config")]
pub fn load_config(path: &Path) -> StoreConfig {
    if !path.exists() {
        info!(path = %path.display(), "Config file not found, using defaults");
        return StoreConfig::default();
    }

    match read_config(path) {
        Ok(config) => {
            info!(path = %path.display(), "Successfully loaded config");
            config
        }
        Err(e) => {
            warn!(path = %path.display(), error = %format!("{:#}", e), "Failed to load config, using defaults");
            StoreConfig::default()
        }
    }
}

fn read_config(path: &Path) -> Result<StoreConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    serde_json::from_str(&content).context("Failed to parse config JSON")
}

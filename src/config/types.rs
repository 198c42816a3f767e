//! Configuration type definitions

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::defaults::*;

/// Process-level configuration for the datastore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConfig {
    /// Directory holding one SQLite file per domain (default: ~/.hotclip/db)
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Directory for the JSONL log (default: ~/.hotclip/logs)
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
    /// Most lines read from a shell history file (default: 1000)
    #[serde(default = "default_max_history_entries")]
    pub max_history_entries: usize,
    /// Most suggestions returned by a shell search (default: 500)
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,
}

fn default_data_dir() -> String {
    DEFAULT_DATA_DIR.to_string()
}
fn default_log_dir() -> String {
    DEFAULT_LOG_DIR.to_string()
}
fn default_max_history_entries() -> usize {
    DEFAULT_MAX_HISTORY_ENTRIES
}
fn default_max_search_results() -> usize {
    DEFAULT_MAX_SEARCH_RESULTS
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            data_dir: default_data_dir(),
            log_dir: default_log_dir(),
            max_history_entries: DEFAULT_MAX_HISTORY_ENTRIES,
            max_search_results: DEFAULT_MAX_SEARCH_RESULTS,
        }
    }
}

impl StoreConfig {
    /// Config rooted at an explicit data directory (tests, portable installs)
    pub fn with_data_dir(data_dir: impl Into<String>) -> Self {
        StoreConfig {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }

    /// Data directory with `~` expanded
    pub fn data_dir_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.data_dir).as_ref())
    }

    /// Log directory with `~` expanded
    pub fn log_dir_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.log_dir).as_ref())
    }
}

//! Configuration module - where the datastore lives and how much it keeps
//!
//! This module provides functionality for:
//! - Loading configuration from ~/.hotclip/config.json
//! - Default values for all settings
//! - Type definitions for config structures
//!
//! User-editable preferences (max clipboard entries, hotkeys) are not file
//! config; they live in the settings store, see [`crate::records::Settings`].
//!
//! # Module Structure
//!
//! - `defaults` - All default constant values
//! - `types` - Configuration struct definitions
//! - `loader` - File system loading and parsing

pub mod defaults;
mod loader;
mod types;

pub use defaults::{DEFAULT_MAX_ENTRIES, DEFAULT_MAX_HISTORY_ENTRIES, DEFAULT_MAX_SEARCH_RESULTS};
pub use loader::{default_config_path, load_config};
pub use types::StoreConfig;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

//! Default configuration values
//!
//! All constants used throughout the config module and the settings record are defined here.

/// Default upper bound on stored clipboard entries
pub const DEFAULT_MAX_ENTRIES: usize = 100;

/// Default hotkeys (modifier + key per popup)
pub const DEFAULT_HOTKEY_MODIFIER: &str = "alt";
pub const DEFAULT_CLIPBOARD_KEY: &str = "z";
pub const DEFAULT_APPS_KEY: &str = "a";
pub const DEFAULT_SHELL_KEY: &str = "x";

/// Default locations, tilde-expanded at load time
pub const DEFAULT_DATA_DIR: &str = "~/.hotclip/db";
pub const DEFAULT_LOG_DIR: &str = "~/.hotclip/logs";
pub const DEFAULT_CONFIG_PATH: &str = "~/.hotclip/config.json";

/// Most history lines kept from a shell history file
pub const DEFAULT_MAX_HISTORY_ENTRIES: usize = 1000;

/// Most shell suggestions returned by one search
pub const DEFAULT_MAX_SEARCH_RESULTS: usize = 500;

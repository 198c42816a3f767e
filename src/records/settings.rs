use std::fmt;

use rusqlite::types::{Type, Value};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::config::defaults::{
    DEFAULT_APPS_KEY, DEFAULT_CLIPBOARD_KEY, DEFAULT_HOTKEY_MODIFIER, DEFAULT_MAX_ENTRIES,
    DEFAULT_SHELL_KEY,
};
use crate::store::{Record, Unindexed};

/// Fixed primary key of the settings row
pub const SETTINGS_KEY: &str = "settings";

/// A modifier + key pair that opens one of the popups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotkey {
    pub modifier: String,
    pub key: String,
}

impl Hotkey {
    pub fn new(modifier: impl Into<String>, key: impl Into<String>) -> Self {
        Hotkey {
            modifier: modifier.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifier.is_empty() {
            write!(f, "{}", self.key)
        } else {
            write!(f, "{}+{}", self.modifier, self.key)
        }
    }
}

/// Per-feature hotkeys
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hotkeys {
    pub clipboard: Hotkey,
    pub apps: Hotkey,
    pub shell: Hotkey,
}

impl Default for Hotkeys {
    fn default() -> Self {
        Hotkeys {
            clipboard: Hotkey::new(DEFAULT_HOTKEY_MODIFIER, DEFAULT_CLIPBOARD_KEY),
            apps: Hotkey::new(DEFAULT_HOTKEY_MODIFIER, DEFAULT_APPS_KEY),
            shell: Hotkey::new(DEFAULT_HOTKEY_MODIFIER, DEFAULT_SHELL_KEY),
        }
    }
}

/// User settings, stored as a single row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Upper bound on stored clipboard entries
    pub max_entries: usize,
    pub hotkeys: Hotkeys,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            max_entries: DEFAULT_MAX_ENTRIES,
            hotkeys: Hotkeys::default(),
        }
    }
}

impl Settings {
    /// Check the settings before they are persisted.
    ///
    /// Returns a description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_entries == 0 {
            return Err("max_entries must be at least 1".to_string());
        }
        for (feature, hotkey) in [
            ("clipboard", &self.hotkeys.clipboard),
            ("apps", &self.hotkeys.apps),
            ("shell", &self.hotkeys.shell),
        ] {
            if hotkey.key.trim().is_empty() {
                return Err(format!("{} hotkey has no key", feature));
            }
        }
        Ok(())
    }
}

impl Record for Settings {
    const DOMAIN: &'static str = "settings";
    const TABLE: &'static str = "settings";
    const COLUMNS: &'static [&'static str] = &["id", "max_entries", "hotkeys"];
    const SCHEMA: &'static str = r#"
        CREATE TABLE IF NOT EXISTS settings (
            id TEXT PRIMARY KEY,
            max_entries INTEGER NOT NULL,
            hotkeys TEXT NOT NULL
        );
    "#;

    type Index = Unindexed;

    fn key(&self) -> &str {
        SETTINGS_KEY
    }

    fn to_values(&self) -> rusqlite::Result<Vec<Value>> {
        let hotkeys = serde_json::to_string(&self.hotkeys)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let max_entries = i64::try_from(self.max_entries)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        Ok(vec![
            Value::Text(SETTINGS_KEY.to_string()),
            Value::Integer(max_entries),
            Value::Text(hotkeys),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let max_entries: i64 = row.get(1)?;
        let max_entries = usize::try_from(max_entries)
            .map_err(|_| rusqlite::Error::IntegralValueOutOfRange(1, max_entries))?;
        let hotkeys: String = row.get(2)?;
        let hotkeys = serde_json::from_str(&hotkeys)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))?;
        Ok(Settings {
            max_entries,
            hotkeys,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.max_entries, 100);
        assert_eq!(settings.hotkeys.clipboard.to_string(), "alt+z");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_max_entries() {
        let settings = Settings {
            max_entries: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_key() {
        let mut settings = Settings::default();
        settings.hotkeys.shell.key = "  ".to_string();
        let err = settings.validate().unwrap_err();
        assert!(err.contains("shell"));
    }

    #[test]
    fn test_hotkey_display_without_modifier() {
        assert_eq!(Hotkey::new("", "F12").to_string(), "F12");
    }
}

use rusqlite::types::Value;
use rusqlite::Row;

use crate::store::{Record, SortIndex};

/// A launchable application discovered by a desktop-file scan
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppEntry {
    /// Exec command line, the primary key
    pub exec: String,
    /// Desktop file the entry was read from
    pub file: String,
    pub name: String,
    pub icon: String,
    pub terminal: bool,
    /// Last launch in milliseconds since the Unix epoch, 0 when never launched
    pub access_time: i64,
}

impl AppEntry {
    pub fn new(exec: impl Into<String>, name: impl Into<String>) -> Self {
        AppEntry {
            exec: exec.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// True when any field other than the key and access time differs
    pub fn metadata_differs(&self, other: &AppEntry) -> bool {
        self.file != other.file
            || self.name != other.name
            || self.icon != other.icon
            || self.terminal != other.terminal
    }
}

/// Sortable fields of the apps domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppIndex {
    AccessTime,
    Name,
}

impl SortIndex for AppIndex {
    fn column(self) -> &'static str {
        match self {
            AppIndex::AccessTime => "access_time",
            AppIndex::Name => "name",
        }
    }
}

impl Record for AppEntry {
    const DOMAIN: &'static str = "apps";
    const TABLE: &'static str = "apps";
    const COLUMNS: &'static [&'static str] =
        &["exec", "file", "name", "icon", "terminal", "access_time"];
    const SCHEMA: &'static str = r#"
        CREATE TABLE IF NOT EXISTS apps (
            exec TEXT PRIMARY KEY,
            file TEXT NOT NULL DEFAULT '',
            name TEXT NOT NULL DEFAULT '',
            icon TEXT NOT NULL DEFAULT '',
            terminal INTEGER NOT NULL DEFAULT 0,
            access_time INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_apps_access_time ON apps(access_time DESC);
    "#;

    type Index = AppIndex;

    fn key(&self) -> &str {
        &self.exec
    }

    fn to_values(&self) -> rusqlite::Result<Vec<Value>> {
        Ok(vec![
            Value::Text(self.exec.clone()),
            Value::Text(self.file.clone()),
            Value::Text(self.name.clone()),
            Value::Text(self.icon.clone()),
            Value::Integer(i64::from(self.terminal)),
            Value::Integer(self.access_time),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(AppEntry {
            exec: row.get(0)?,
            file: row.get(1)?,
            name: row.get(2)?,
            icon: row.get(3)?,
            terminal: row.get::<_, i64>(4)? != 0,
            access_time: row.get(5)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_differs_ignores_access_time() {
        let mut a = AppEntry::new("firefox %u", "Firefox");
        let mut b = a.clone();
        b.access_time = 42;
        assert!(!a.metadata_differs(&b));

        a.icon = "/usr/share/icons/firefox.png".to_string();
        assert!(a.metadata_differs(&b));
    }
}

use rusqlite::types::Value;
use rusqlite::Row;

use crate::store::{Record, SortIndex};

/// A shell command from history or a completion script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellEntry {
    /// Command text, the primary key
    pub cmd: String,
    pub is_history: bool,
    pub is_completion: bool,
}

impl ShellEntry {
    pub fn history(cmd: impl Into<String>) -> Self {
        ShellEntry {
            cmd: cmd.into(),
            is_history: true,
            is_completion: false,
        }
    }

    pub fn completion(cmd: impl Into<String>) -> Self {
        ShellEntry {
            cmd: cmd.into(),
            is_history: false,
            is_completion: true,
        }
    }
}

/// Sortable fields of the shell domain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellIndex {
    /// Order in which the entries were loaded
    Inserted,
}

impl SortIndex for ShellIndex {
    fn column(self) -> &'static str {
        match self {
            ShellIndex::Inserted => "rowid",
        }
    }
}

impl Record for ShellEntry {
    const DOMAIN: &'static str = "shell";
    const TABLE: &'static str = "shell";
    const COLUMNS: &'static [&'static str] = &["cmd", "is_history", "is_completion"];
    const SCHEMA: &'static str = r#"
        CREATE TABLE IF NOT EXISTS shell (
            cmd TEXT PRIMARY KEY,
            is_history INTEGER NOT NULL DEFAULT 0,
            is_completion INTEGER NOT NULL DEFAULT 0
        );
    "#;

    type Index = ShellIndex;

    fn key(&self) -> &str {
        &self.cmd
    }

    fn to_values(&self) -> rusqlite::Result<Vec<Value>> {
        Ok(vec![
            Value::Text(self.cmd.clone()),
            Value::Integer(i64::from(self.is_history)),
            Value::Integer(i64::from(self.is_completion)),
        ])
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(ShellEntry {
            cmd: row.get(0)?,
            is_history: row.get::<_, i64>(1)? != 0,
            is_completion: row.get::<_, i64>(2)? != 0,
        })
    }
}

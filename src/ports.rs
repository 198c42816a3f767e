//! Contracts for the collaborators that feed the datastore
//!
//! Desktop-file discovery and history reading live outside the persistence
//! layer. They hand over plain records through these traits and report
//! failures as `anyhow` errors with context.

use crate::records::{AppEntry, ShellEntry};

/// Produces the current list of installed applications
pub trait AppScanner {
    fn scan(&self) -> anyhow::Result<Vec<AppEntry>>;
}

/// Produces shell history entries, newest first
pub trait HistorySource {
    fn read_history(&self) -> anyhow::Result<Vec<ShellEntry>>;
}

impl<F> AppScanner for F
where
    F: Fn() -> anyhow::Result<Vec<AppEntry>>,
{
    fn scan(&self) -> anyhow::Result<Vec<AppEntry>> {
        self()
    }
}

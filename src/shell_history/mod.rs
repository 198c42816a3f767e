//! Shell History Module
//!
//! The shell domain is replaced wholesale on every load and queried by
//! case-insensitive substring search for the shell popup.
//!
//! ## Module Structure
//! - `history_file`: reads bash and zsh history files into entries

mod history_file;

use regex::RegexBuilder;
use tracing::{debug, info, instrument};

use crate::error::{Result, StoreError};
use crate::records::{ShellEntry, ShellIndex};
use crate::store::{Order, Record, Store};

pub use history_file::{HistoryFile, HistoryFormat};

/// Atomically replace the shell domain with `entries`.
///
/// Entries keep their input order. A repeated command collapses into the
/// first occurrence's position. On failure the previous history is kept.
/// Returns the number of records now stored.
#[instrument(name = "shell_replace_history", skip_all, fields(entries = entries.len()))]
pub fn replace_history(store: &Store<ShellEntry>, entries: &[ShellEntry]) -> Result<usize> {
    let stored = store.run_transaction(|tx| {
        let dropped = tx.drop_all()?;
        debug!(dropped, "Cleared previous shell entries");
        for entry in entries {
            tx.save(entry)?;
        }
        tx.count()
    })?;

    info!(stored, "Replaced shell history");
    Ok(stored)
}

/// Entries whose command contains `fragment`, ignoring case, in stored order.
///
/// The fragment is matched literally. At most `limit` entries are returned.
pub fn search(store: &Store<ShellEntry>, fragment: &str, limit: usize) -> Result<Vec<ShellEntry>> {
    let matcher = RegexBuilder::new(&regex::escape(fragment))
        .case_insensitive(true)
        .build()
        .map_err(|e| StoreError::InvalidRecord {
            domain: ShellEntry::DOMAIN,
            reason: format!("unusable search fragment: {}", e),
        })?;

    let results: Vec<ShellEntry> = list(store)?
        .into_iter()
        .filter(|entry| matcher.is_match(&entry.cmd))
        .take(limit)
        .collect();

    debug!(fragment, limit, found = results.len(), "Searched shell entries");
    Ok(results)
}

/// Every shell entry in load order
pub fn list(store: &Store<ShellEntry>) -> Result<Vec<ShellEntry>> {
    store.list(ShellIndex::Inserted, Order::Ascending, None)
}

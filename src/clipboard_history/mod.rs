//! Clipboard History Module
//!
//! Content-addressed clipboard history on top of the clipboard store.
//!
//! ## Features
//! - Entries keyed by payload digest, so re-copying refreshes instead of duplicating
//! - Bounded size: retention runs after every insert
//! - Star/unstar entries to protect them from eviction
//!
//! ## Module Structure
//! - `retention`: oldest-first eviction above the configured maximum

pub mod retention;

use tracing::{debug, info, instrument};

use crate::error::{Result, StoreError};
use crate::records::{ClipboardEntry, ClipboardIndex};
use crate::store::{Order, Record, Store};

/// What happened when an entry was added
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddOutcome {
    /// The entry as stored
    pub entry: ClipboardEntry,
    /// True when the payload was already in history and only its timestamp moved
    pub refreshed: bool,
    /// Entries removed by retention afterwards
    pub evicted: usize,
}

/// Save an entry, then enforce the retention bound.
///
/// A payload that is already stored keeps its starred flag. Retention
/// failures are logged and never fail the insert.
#[instrument(name = "clipboard_add", skip_all, fields(digest = %entry.digest))]
pub fn add_entry(
    store: &Store<ClipboardEntry>,
    mut entry: ClipboardEntry,
    max_entries: usize,
) -> Result<AddOutcome> {
    let (entry, refreshed) = store.run_transaction(|tx| {
        let existing = tx.find(&entry.digest)?;
        if let Some(existing) = &existing {
            entry.starred |= existing.starred;
        }
        tx.save(&entry)?;
        Ok((entry, existing.is_some()))
    })?;

    if refreshed {
        debug!(mime = %entry.mime, "Refreshed existing clipboard entry");
    } else {
        info!(mime = %entry.mime, bytes = entry.data.len(), "Added clipboard entry");
    }

    let evicted = retention::enforce(store, max_entries);
    Ok(AddOutcome {
        entry,
        refreshed,
        evicted,
    })
}

/// All entries, most recently captured first
pub fn list_entries(store: &Store<ClipboardEntry>) -> Result<Vec<ClipboardEntry>> {
    store.list(ClipboardIndex::CapturedAt, Order::Descending, None)
}

pub fn get_entry(store: &Store<ClipboardEntry>, digest: &str) -> Result<ClipboardEntry> {
    store.get(digest)
}

pub fn delete_entry(store: &Store<ClipboardEntry>, digest: &str) -> Result<()> {
    store.delete(digest)?;
    info!(digest, "Removed clipboard entry");
    Ok(())
}

/// Star or unstar an entry, returning the updated entry
pub fn set_starred(
    store: &Store<ClipboardEntry>,
    digest: &str,
    starred: bool,
) -> Result<ClipboardEntry> {
    let updated = store.run_transaction(|tx| {
        let Some(mut entry) = tx.find(digest)? else {
            return Ok(None);
        };
        entry.starred = starred;
        tx.save(&entry)?;
        Ok(Some(entry))
    })?;

    let entry =
        updated.ok_or_else(|| StoreError::not_found(ClipboardEntry::DOMAIN, digest))?;
    info!(digest, starred, "Updated clipboard entry star");
    Ok(entry)
}

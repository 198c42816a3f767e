//! App Launcher Module
//!
//! Stored application entries: ordered listing for the launcher popup,
//! access-time tracking on launch, and reconciliation against a fresh scan.
//!
//! ## Module Structure
//! - `reconcile`: atomic refresh of the stored set from scanned candidates

pub mod reconcile;

use tracing::info;

use crate::error::{Result, StoreError};
use crate::records::{now_millis, AppEntry, AppIndex};
use crate::store::{Order, Record, Store};

pub use reconcile::{reconcile, ReconcileReport};

/// All apps, most recently launched first
pub fn list_apps(store: &Store<AppEntry>) -> Result<Vec<AppEntry>> {
    store.list(AppIndex::AccessTime, Order::Descending, None)
}

pub fn get_app(store: &Store<AppEntry>, exec: &str) -> Result<AppEntry> {
    store.get(exec)
}

/// Mark an app as launched now and persist it.
///
/// Runs in a write transaction so it cannot interleave with a refresh that
/// is removing the same entry.
pub fn update_access(store: &Store<AppEntry>, exec: &str) -> Result<AppEntry> {
    update_access_at(store, exec, now_millis())
}

fn update_access_at(store: &Store<AppEntry>, exec: &str, access_time: i64) -> Result<AppEntry> {
    let updated = store.run_transaction(|tx| {
        let Some(mut entry) = tx.find(exec)? else {
            return Ok(None);
        };
        entry.access_time = access_time;
        tx.save(&entry)?;
        Ok(Some(entry))
    })?;

    let entry = updated.ok_or_else(|| StoreError::not_found(AppEntry::DOMAIN, exec))?;
    info!(exec, access_time, "Recorded app launch");
    Ok(entry)
}

//! Reconciliation of stored apps against a freshly scanned candidate list
//!
//! The stored key set becomes exactly the candidate key set. Entries present
//! on both sides keep their access time; their descriptive fields (file,
//! name, icon, terminal) follow the candidate.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tracing::{debug, info, instrument};

use crate::error::Result;
use crate::records::AppEntry;
use crate::store::Store;

/// Counts from one reconciliation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Candidates that were not stored before
    pub inserted: usize,
    /// Stored entries absent from the candidates
    pub removed: usize,
    /// Shared entries rewritten because their metadata changed
    pub updated: usize,
    /// Shared entries left untouched
    pub kept: usize,
}

impl ReconcileReport {
    /// True when readers would see a different app list
    pub fn changed(&self) -> bool {
        self.inserted + self.removed + self.updated > 0
    }
}

/// Replace the stored app set with `candidates` in one transaction.
///
/// Matching is by exec command only. Duplicate candidate keys collapse to
/// the first occurrence. On any error the transaction rolls back and the
/// previous app list stays visible.
#[instrument(name = "apps_reconcile", skip_all, fields(candidates = candidates.len()))]
pub fn reconcile(store: &Store<AppEntry>, candidates: &[AppEntry]) -> Result<ReconcileReport> {
    let mut wanted: HashMap<&str, &AppEntry> = HashMap::with_capacity(candidates.len());
    let mut ordered = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if let Entry::Vacant(slot) = wanted.entry(candidate.exec.as_str()) {
            slot.insert(candidate);
            ordered.push(candidate);
        }
    }

    let report = store.run_transaction(|tx| {
        let persisted = tx.all()?;
        let mut report = ReconcileReport::default();
        let mut shared: HashSet<&str> = HashSet::with_capacity(persisted.len());

        for existing in &persisted {
            let Some(candidate) = wanted.get(existing.exec.as_str()) else {
                tx.delete(&existing.exec)?;
                debug!(exec = %existing.exec, "Removed stale app");
                report.removed += 1;
                continue;
            };

            shared.insert(existing.exec.as_str());
            if candidate.metadata_differs(existing) {
                let refreshed = AppEntry {
                    access_time: existing.access_time,
                    ..(*candidate).clone()
                };
                tx.save(&refreshed)?;
                report.updated += 1;
            } else {
                report.kept += 1;
            }
        }

        for candidate in &ordered {
            if !shared.contains(candidate.exec.as_str()) {
                tx.save(candidate)?;
                report.inserted += 1;
            }
        }

        Ok(report)
    })?;

    info!(
        inserted = report.inserted,
        removed = report.removed,
        updated = report.updated,
        kept = report.kept,
        "Reconciled app entries"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_launcher::list_apps;
    use crate::error::ErrorKind;

    fn app(exec: &str, access_time: i64) -> AppEntry {
        AppEntry {
            file: format!("/usr/share/applications/{}.desktop", exec),
            access_time,
            ..AppEntry::new(exec, exec)
        }
    }

    fn keys(store: &Store<AppEntry>) -> Vec<String> {
        let mut keys: Vec<String> = store.all().unwrap().into_iter().map(|a| a.exec).collect();
        keys.sort();
        keys
    }

    #[test]
    fn test_scenario_preserves_access_time() {
        let store = Store::open_in_memory().unwrap();
        store.save(&app("A", 5)).unwrap();
        store.save(&app("B", 3)).unwrap();

        let report = reconcile(&store, &[app("B", 0), app("C", 0)]).unwrap();
        assert_eq!(
            report,
            ReconcileReport {
                inserted: 1,
                removed: 1,
                updated: 0,
                kept: 1
            }
        );

        let listed: Vec<(String, i64)> = list_apps(&store)
            .unwrap()
            .into_iter()
            .map(|a| (a.exec, a.access_time))
            .collect();
        assert_eq!(listed, vec![("B".to_string(), 3), ("C".to_string(), 0)]);
    }

    #[test]
    fn test_key_set_equals_candidates() {
        let store = Store::open_in_memory().unwrap();
        for exec in ["a", "b", "c", "d"] {
            store.save(&app(exec, 1)).unwrap();
        }

        reconcile(&store, &[app("b", 0), app("d", 0), app("e", 0), app("f", 0)]).unwrap();
        assert_eq!(keys(&store), vec!["b", "d", "e", "f"]);
    }

    #[test]
    fn test_changed_metadata_is_refreshed_without_touching_access_time() {
        let store = Store::open_in_memory().unwrap();
        store.save(&app("firefox", 42)).unwrap();

        let mut candidate = app("firefox", 0);
        candidate.icon = "/usr/share/icons/firefox-new.png".to_string();
        candidate.name = "Firefox Web Browser".to_string();

        let report = reconcile(&store, &[candidate.clone()]).unwrap();
        assert_eq!(report.updated, 1);

        let stored = store.get("firefox").unwrap();
        assert_eq!(stored.icon, candidate.icon);
        assert_eq!(stored.name, candidate.name);
        assert_eq!(stored.access_time, 42);
    }

    #[test]
    fn test_unchanged_scan_reports_no_change() {
        let store = Store::open_in_memory().unwrap();
        reconcile(&store, &[app("a", 0), app("b", 0)]).unwrap();

        let report = reconcile(&store, &[app("a", 0), app("b", 0)]).unwrap();
        assert!(!report.changed());
        assert_eq!(report.kept, 2);
    }

    #[test]
    fn test_duplicate_candidates_collapse_to_first() {
        let store = Store::open_in_memory().unwrap();
        let mut second = app("dup", 0);
        second.name = "Second".to_string();

        let report = reconcile(&store, &[app("dup", 0), second]).unwrap();
        assert_eq!(report.inserted, 1);
        assert_eq!(store.get("dup").unwrap().name, "dup");
    }

    #[test]
    fn test_empty_scan_clears_domain() {
        let store = Store::open_in_memory().unwrap();
        store.save(&app("a", 1)).unwrap();

        let report = reconcile(&store, &[]).unwrap();
        assert_eq!(report.removed, 1);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_failure_leaves_previous_set() {
        let store = Store::open_in_memory().unwrap();
        store.save(&app("A", 5)).unwrap();
        store.save(&app("B", 3)).unwrap();
        let before = store.all().unwrap();

        store
            .execute_batch(
                "CREATE TRIGGER fail_insert BEFORE INSERT ON apps WHEN NEW.exec = 'broken'
                 BEGIN SELECT RAISE(ABORT, 'forced failure'); END;",
            )
            .unwrap();

        // "C" is inserted before "broken" fails, and "A" is deleted before both
        let err = reconcile(&store, &[app("B", 0), app("C", 0), app("broken", 0)]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TransactionAborted);
        assert_eq!(store.all().unwrap(), before);
    }
}

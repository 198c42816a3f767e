//! Bounded-size retention for clipboard history
//!
//! Eviction is oldest-first by capture time. Starred entries are never
//! evicted, so a history with more than `max_entries` starred entries stays
//! above the bound.

use tracing::{debug, info, warn};

use crate::error::ResultExt;
use crate::records::{ClipboardEntry, ClipboardIndex};
use crate::store::{Order, Store};

/// Evict the oldest unstarred entries until at most `max_entries` remain.
///
/// Count, selection and deletes run in one write transaction, so concurrent
/// inserts cannot make two passes evict the same slot twice. Best-effort: a
/// failed pass evicts nothing, and a failed delete skips that entry.
/// Returns the number of entries removed.
pub fn enforce(store: &Store<ClipboardEntry>, max_entries: usize) -> usize {
    let pass = store.run_transaction(|tx| {
        let total = tx.count()?;
        if total <= max_entries {
            return Ok(None);
        }
        let excess = total - max_entries;

        // Only digests of unstarred rows leave the engine
        let oldest = tx.list_keys(
            ClipboardIndex::CapturedAt,
            Order::Ascending,
            Some(ClipboardIndex::Starred),
            Some(excess),
        )?;

        let mut evicted = 0;
        for digest in &oldest {
            if tx.delete(digest).warn_on_err().is_some() {
                debug!(digest = %digest, "Evicted clipboard entry");
                evicted += 1;
            }
        }
        Ok(Some((total, excess, evicted)))
    });

    let Some(Some((total, excess, evicted))) = pass.warn_on_err() else {
        return 0;
    };

    if evicted < excess {
        warn!(
            total,
            max_entries,
            evicted,
            excess,
            "Clipboard history still above max entries (starred or undeletable entries)"
        );
    } else {
        info!(total, max_entries, evicted, "Clipboard retention complete");
    }
    evicted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::MIME_TEXT;

    fn fill(store: &Store<ClipboardEntry>, n: i64) -> Vec<ClipboardEntry> {
        (0..n)
            .map(|i| {
                let e = ClipboardEntry::captured_at(MIME_TEXT, format!("item {}", i).into_bytes(), i);
                store.save(&e).unwrap();
                e
            })
            .collect()
    }

    #[test]
    fn test_under_limit_is_noop() {
        let store = Store::open_in_memory().unwrap();
        fill(&store, 3);
        assert_eq!(enforce(&store, 3), 0);
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_bound_keeps_most_recent() {
        let store = Store::open_in_memory().unwrap();
        let entries = fill(&store, 10);

        assert_eq!(enforce(&store, 4), 6);

        let remaining: Vec<i64> = store
            .list(ClipboardIndex::CapturedAt, Order::Descending, None)
            .unwrap()
            .iter()
            .map(|e| e.captured_at)
            .collect();
        assert_eq!(remaining, vec![9, 8, 7, 6]);
        assert!(store.find(&entries[0].digest).unwrap().is_none());
    }

    #[test]
    fn test_starred_entries_are_exempt() {
        let store = Store::open_in_memory().unwrap();
        let mut entries = fill(&store, 5);
        entries[0].starred = true;
        store.save(&entries[0]).unwrap();

        assert_eq!(enforce(&store, 2), 3);

        let remaining: Vec<i64> = store
            .list(ClipboardIndex::CapturedAt, Order::Descending, None)
            .unwrap()
            .iter()
            .map(|e| e.captured_at)
            .collect();
        assert_eq!(remaining, vec![4, 0]);
    }

    #[test]
    fn test_starred_rows_interleaved_evicts_exact_excess() {
        let store = Store::open_in_memory().unwrap();
        let mut entries = fill(&store, 8);
        for i in [0, 2, 3, 6] {
            entries[i].starred = true;
            store.save(&entries[i]).unwrap();
        }

        // 8 rows, bound 5: the three oldest unstarred (1, 4, 5) go
        assert_eq!(enforce(&store, 5), 3);
        assert_eq!(store.count().unwrap(), 5);

        let remaining: Vec<i64> = store
            .list(ClipboardIndex::CapturedAt, Order::Ascending, None)
            .unwrap()
            .iter()
            .map(|e| e.captured_at)
            .collect();
        assert_eq!(remaining, vec![0, 2, 3, 6, 7]);
    }

    #[test]
    fn test_failed_delete_is_skipped() {
        let store = Store::open_in_memory().unwrap();
        let entries = fill(&store, 4);
        store
            .execute_batch(&format!(
                "CREATE TRIGGER pin_oldest BEFORE DELETE ON clipboard WHEN OLD.digest = '{}'
                 BEGIN SELECT RAISE(ABORT, 'forced failure'); END;",
                entries[0].digest
            ))
            .unwrap();

        // Oldest cannot be deleted, the next oldest still goes
        assert_eq!(enforce(&store, 2), 1);
        assert!(store.find(&entries[0].digest).unwrap().is_some());
        assert!(store.find(&entries[1].digest).unwrap().is_none());
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_all_starred_stays_above_bound() {
        let store = Store::open_in_memory().unwrap();
        for mut e in fill(&store, 3) {
            e.starred = true;
            store.save(&e).unwrap();
        }

        assert_eq!(enforce(&store, 1), 0);
        assert_eq!(store.count().unwrap(), 3);
    }
}

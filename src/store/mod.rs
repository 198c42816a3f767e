//! Single-domain SQLite store
//!
//! One `Store<R>` owns one SQLite database holding one table for record type
//! `R`. Domains never share a connection, so a long transaction in one domain
//! does not block writers in another.
//!
//! ## Module Structure
//! - `record`: the `Record` mapping trait and typed sort indexes
//! - `ops`: SQL shared by plain calls and transactions
//! - `transaction`: the handle passed to `run_transaction` closures

mod ops;
mod record;
mod transaction;

use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::{Connection, TransactionBehavior};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, StoreError};

pub use record::{Order, Record, SortIndex, Unindexed};
pub use transaction::StoreTransaction;

/// Handle to one domain's store. Cloning shares the underlying connection.
pub struct Store<R: Record> {
    conn: Arc<Mutex<Connection>>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> Clone for Store<R> {
    fn clone(&self) -> Self {
        Store {
            conn: Arc::clone(&self.conn),
            _record: PhantomData,
        }
    }
}

impl<R: Record> std::fmt::Debug for Store<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store").field("domain", &R::DOMAIN).finish()
    }
}

impl<R: Record> Store<R> {
    /// Open (or create) the store at `path`
    #[instrument(name = "store_open", skip_all, fields(domain = R::DOMAIN))]
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|e| StoreError::io(R::DOMAIN, e))?;

        // WAL lets readers proceed while a writer holds the database
        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA busy_timeout = 5000;",
        )
        .map_err(|e| StoreError::io(R::DOMAIN, e))?;

        let store = Self::from_connection(conn)?;
        info!(domain = R::DOMAIN, path = %path.display(), "Store opened");
        Ok(store)
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|e| StoreError::io(R::DOMAIN, e))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(R::SCHEMA)
            .map_err(|e| StoreError::io(R::DOMAIN, e))?;
        Ok(Store {
            conn: Arc::new(Mutex::new(conn)),
            _record: PhantomData,
        })
    }

    /// Insert the record, replacing any record with the same key
    pub fn save(&self, record: &R) -> Result<()> {
        ops::save(&self.conn.lock(), record)
    }

    /// Delete by key. Deleting a missing key is `NotFound`.
    pub fn delete(&self, key: &str) -> Result<()> {
        ops::delete::<R>(&self.conn.lock(), key)
    }

    pub fn get(&self, key: &str) -> Result<R> {
        ops::get(&self.conn.lock(), key)
    }

    pub fn find(&self, key: &str) -> Result<Option<R>> {
        ops::find(&self.conn.lock(), key)
    }

    /// List records ordered by `index`. Ties keep insertion order in the same direction.
    pub fn list(&self, index: R::Index, order: Order, limit: Option<usize>) -> Result<Vec<R>> {
        ops::list(&self.conn.lock(), index, order, limit)
    }

    /// Primary keys ordered by `index`, skipping records whose `unset` flag is set.
    ///
    /// Reads only the key column, so large payloads stay on disk.
    pub fn list_keys(
        &self,
        index: R::Index,
        order: Order,
        unset: Option<R::Index>,
        limit: Option<usize>,
    ) -> Result<Vec<String>> {
        ops::list_keys::<R>(&self.conn.lock(), index, order, unset, limit)
    }

    /// Every record in insertion order
    pub fn all(&self) -> Result<Vec<R>> {
        ops::all(&self.conn.lock())
    }

    pub fn count(&self) -> Result<usize> {
        ops::count::<R>(&self.conn.lock())
    }

    /// Remove every record of this domain, returning how many were removed
    pub fn drop_all(&self) -> Result<usize> {
        let deleted = ops::drop_all::<R>(&self.conn.lock())?;
        info!(domain = R::DOMAIN, deleted, "Dropped domain");
        Ok(deleted)
    }

    /// Run `f` inside one write transaction.
    ///
    /// Commits when `f` returns `Ok`. Any error from `f` or from the commit
    /// rolls back every write made through the transaction and is returned
    /// as `TransactionAborted`.
    pub fn run_transaction<T>(
        &self,
        f: impl FnOnce(&StoreTransaction<'_, R>) -> Result<T>,
    ) -> Result<T> {
        let mut conn = self.conn.lock();
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| StoreError::io(R::DOMAIN, e))?;

        let scope = StoreTransaction {
            conn: &tx,
            _record: PhantomData,
        };

        match f(&scope) {
            Ok(value) => {
                tx.commit().map_err(|e| StoreError::TransactionAborted {
                    domain: R::DOMAIN,
                    source: Box::new(StoreError::io(R::DOMAIN, e)),
                })?;
                debug!(domain = R::DOMAIN, "Transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback) = tx.rollback() {
                    warn!(domain = R::DOMAIN, error = %rollback, "Rollback failed");
                }
                warn!(domain = R::DOMAIN, error = %err, "Transaction rolled back");
                Err(StoreError::TransactionAborted {
                    domain: R::DOMAIN,
                    source: Box::new(err),
                })
            }
        }
    }

    /// Raw access to the connection, for fault injection in tests
    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) -> rusqlite::Result<()> {
        self.conn.lock().execute_batch(sql)
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

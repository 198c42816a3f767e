use std::marker::PhantomData;

use rusqlite::Connection;

use super::ops;
use super::record::{Order, Record};
use crate::error::Result;

/// Operations available inside [`Store::run_transaction`](super::Store::run_transaction).
///
/// Nothing done through this handle is visible to other connections until
/// the closure returns `Ok` and the transaction commits.
pub struct StoreTransaction<'t, R: Record> {
    pub(super) conn: &'t Connection,
    pub(super) _record: PhantomData<fn() -> R>,
}

impl<R: Record> StoreTransaction<'_, R> {
    pub fn save(&self, record: &R) -> Result<()> {
        ops::save(self.conn, record)
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        ops::delete::<R>(self.conn, key)
    }

    pub fn get(&self, key: &str) -> Result<R> {
        ops::get(self.conn, key)
    }

    pub fn find(&self, key: &str) -> Result<Option<R>> {
        ops::find(self.conn, key)
    }

    pub fn list(&self, index: R::Index, order: Order, limit: Option<usize>) -> Result<Vec<R>> {
        ops::list(self.conn, index, order, limit)
    }

    pub fn list_keys(
        &self,
        index: R::Index,
        order: Order,
        unset: Option<R::Index>,
        limit: Option<usize>,
    ) -> Result<Vec<String>> {
        ops::list_keys::<R>(self.conn, index, order, unset, limit)
    }

    /// Every record in insertion order
    pub fn all(&self) -> Result<Vec<R>> {
        ops::all(self.conn)
    }

    pub fn count(&self) -> Result<usize> {
        ops::count::<R>(self.conn)
    }

    pub fn drop_all(&self) -> Result<usize> {
        ops::drop_all::<R>(self.conn)
    }
}

//! Mapping between record types and their SQLite tables

use rusqlite::types::Value;
use rusqlite::Row;

/// A sortable field of one record type.
///
/// Each record names its own index enum, so listing by a field that the
/// record does not have is a compile error.
pub trait SortIndex: Copy + std::fmt::Debug {
    /// Column the index orders by
    fn column(self) -> &'static str;
}

/// Index type for records that cannot be listed by any field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unindexed {}

impl SortIndex for Unindexed {
    fn column(self) -> &'static str {
        match self {}
    }
}

/// Sort direction for [`Store::list`](super::Store::list)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    Ascending,
    Descending,
}

impl Order {
    pub(super) fn sql(self) -> &'static str {
        match self {
            Order::Ascending => "ASC",
            Order::Descending => "DESC",
        }
    }
}

/// A value type persisted in its own single-table store
pub trait Record: Clone + Send + 'static {
    /// Domain name used in logs and errors
    const DOMAIN: &'static str;
    const TABLE: &'static str;
    /// Column names, primary key first, in `to_values`/`from_row` order
    const COLUMNS: &'static [&'static str];
    /// Idempotent DDL run whenever the store is opened
    const SCHEMA: &'static str;

    type Index: SortIndex;

    /// Primary key
    fn key(&self) -> &str;

    /// Column values in `COLUMNS` order
    fn to_values(&self) -> rusqlite::Result<Vec<Value>>;

    /// Rebuild a record from a row selected with `COLUMNS`
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

//! SQL operations shared by the store and its transactions
//!
//! Everything here takes a plain `&Connection`; a `rusqlite::Transaction`
//! derefs to one, so the same code runs inside and outside transactions.

use rusqlite::{params, params_from_iter, Connection, OptionalExtension};
use tracing::debug;

use super::record::{Order, Record, SortIndex};
use crate::error::{Result, StoreError};

fn select_sql<R: Record>() -> String {
    format!("SELECT {} FROM {}", R::COLUMNS.join(", "), R::TABLE)
}

fn upsert_sql<R: Record>() -> String {
    let columns = R::COLUMNS;
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{}", i)).collect();
    let updates: Vec<String> = columns[1..]
        .iter()
        .map(|c| format!("{c} = excluded.{c}"))
        .collect();
    let on_conflict = if updates.is_empty() {
        "DO NOTHING".to_string()
    } else {
        format!("DO UPDATE SET {}", updates.join(", "))
    };
    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT({}) {}",
        R::TABLE,
        columns.join(", "),
        placeholders.join(", "),
        columns[0],
        on_conflict
    )
}

fn io<R: Record>(e: rusqlite::Error) -> StoreError {
    StoreError::io(R::DOMAIN, e)
}

pub(super) fn save<R: Record>(conn: &Connection, record: &R) -> Result<()> {
    let values = record.to_values().map_err(io::<R>)?;
    conn.prepare_cached(&upsert_sql::<R>())
        .and_then(|mut stmt| stmt.execute(params_from_iter(values)))
        .map_err(io::<R>)?;
    debug!(domain = R::DOMAIN, key = record.key(), "Saved record");
    Ok(())
}

pub(super) fn delete<R: Record>(conn: &Connection, key: &str) -> Result<()> {
    let affected = conn
        .execute(
            &format!("DELETE FROM {} WHERE {} = ?1", R::TABLE, R::COLUMNS[0]),
            params![key],
        )
        .map_err(io::<R>)?;
    if affected == 0 {
        return Err(StoreError::not_found(R::DOMAIN, key));
    }
    debug!(domain = R::DOMAIN, key, "Deleted record");
    Ok(())
}

pub(super) fn find<R: Record>(conn: &Connection, key: &str) -> Result<Option<R>> {
    conn.query_row(
        &format!("{} WHERE {} = ?1", select_sql::<R>(), R::COLUMNS[0]),
        params![key],
        R::from_row,
    )
    .optional()
    .map_err(io::<R>)
}

pub(super) fn get<R: Record>(conn: &Connection, key: &str) -> Result<R> {
    find::<R>(conn, key)?.ok_or_else(|| StoreError::not_found(R::DOMAIN, key))
}

fn query_all<R: Record>(conn: &Connection, sql: &str, limit: Option<usize>) -> Result<Vec<R>> {
    let mut stmt = conn.prepare(sql).map_err(io::<R>)?;
    let rows = match limit {
        Some(limit) => {
            let limit = i64::try_from(limit).unwrap_or(i64::MAX);
            stmt.query_map(params![limit], R::from_row)
                .and_then(|rows| rows.collect::<rusqlite::Result<Vec<R>>>())
        }
        None => stmt
            .query_map([], R::from_row)
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<R>>>()),
    };
    rows.map_err(io::<R>)
}

pub(super) fn list<R: Record>(
    conn: &Connection,
    index: R::Index,
    order: Order,
    limit: Option<usize>,
) -> Result<Vec<R>> {
    let dir = order.sql();
    let mut sql = format!(
        "{} ORDER BY {} {dir}, rowid {dir}",
        select_sql::<R>(),
        index.column()
    );
    if limit.is_some() {
        sql.push_str(" LIMIT ?1");
    }
    query_all::<R>(conn, &sql, limit)
}

/// Keys only, ordered like [`list`]. With `unset`, rows whose flag column
/// is non-zero are skipped by the engine.
pub(super) fn list_keys<R: Record>(
    conn: &Connection,
    index: R::Index,
    order: Order,
    unset: Option<R::Index>,
    limit: Option<usize>,
) -> Result<Vec<String>> {
    let dir = order.sql();
    let mut sql = format!("SELECT {} FROM {}", R::COLUMNS[0], R::TABLE);
    if let Some(flag) = unset {
        sql.push_str(&format!(" WHERE {} = 0", flag.column()));
    }
    sql.push_str(&format!(" ORDER BY {} {dir}, rowid {dir}", index.column()));
    if limit.is_some() {
        sql.push_str(" LIMIT ?1");
    }

    let mut stmt = conn.prepare(&sql).map_err(io::<R>)?;
    let keys = match limit {
        Some(limit) => {
            let limit = i64::try_from(limit).unwrap_or(i64::MAX);
            stmt.query_map(params![limit], |row| row.get::<_, String>(0))
                .and_then(|rows| rows.collect::<rusqlite::Result<Vec<String>>>())
        }
        None => stmt
            .query_map([], |row| row.get::<_, String>(0))
            .and_then(|rows| rows.collect::<rusqlite::Result<Vec<String>>>()),
    };
    keys.map_err(io::<R>)
}

pub(super) fn all<R: Record>(conn: &Connection) -> Result<Vec<R>> {
    query_all::<R>(conn, &format!("{} ORDER BY rowid ASC", select_sql::<R>()), None)
}

pub(super) fn count<R: Record>(conn: &Connection) -> Result<usize> {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", R::TABLE), [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|c| c as usize)
    .map_err(io::<R>)
}

pub(super) fn drop_all<R: Record>(conn: &Connection) -> Result<usize> {
    let deleted = conn
        .execute(&format!("DELETE FROM {}", R::TABLE), [])
        .map_err(io::<R>)?;
    debug!(domain = R::DOMAIN, deleted, "Dropped all records");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{AppEntry, Settings};

    #[test]
    fn test_upsert_sql_updates_non_key_columns() {
        let sql = upsert_sql::<AppEntry>();
        assert!(sql.starts_with("INSERT INTO apps (exec, file, name, icon, terminal, access_time)"));
        assert!(sql.contains("ON CONFLICT(exec) DO UPDATE SET file = excluded.file"));
        assert!(!sql.contains("exec = excluded.exec"));
    }

    #[test]
    fn test_select_sql_lists_columns_in_order() {
        assert_eq!(
            select_sql::<Settings>(),
            "SELECT id, max_entries, hotkeys FROM settings"
        );
    }
}

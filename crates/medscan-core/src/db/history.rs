//! Search history database operations (append-only).

use rusqlite::{params, OptionalExtension, Row};

use super::{Database, DbError, DbResult};
use crate::models::{SearchHistoryEntry, SearchMethod};

impl Database {
    /// Append a history entry.
    pub fn insert_search(&self, entry: &SearchHistoryEntry) -> DbResult<()> {
        self.conn.execute(
            r#"
            INSERT INTO search_history (
                entry_id, query_text, method, matched_record_id, searched_at
            ) VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                entry.entry_id,
                entry.query_text,
                entry.method.as_str(),
                entry.matched_record_id,
                entry.searched_at,
            ],
        )?;
        Ok(())
    }

    /// Get one history entry.
    pub fn get_search(&self, entry_id: &str) -> DbResult<SearchHistoryEntry> {
        let row = self
            .conn
            .query_row(
                r#"
                SELECT entry_id, query_text, method, matched_record_id, searched_at
                FROM search_history WHERE entry_id = ?
                "#,
                [entry_id],
                map_row,
            )
            .optional()?;

        match row {
            Some(row) => row.into_entry(),
            None => Err(DbError::NotFound(entry_id.to_string())),
        }
    }

    /// Most recent searches first, at most `limit`.
    pub fn recent_searches(&self, limit: usize) -> DbResult<Vec<SearchHistoryEntry>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT entry_id, query_text, method, matched_record_id, searched_at
            FROM search_history
            ORDER BY searched_at DESC, rowid DESC
            LIMIT ?
            "#,
        )?;

        let rows = stmt.query_map([limit as i64], map_row)?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?.into_entry()?);
        }
        Ok(entries)
    }
}

/// Raw row; `method` is parsed after the query so a bad value surfaces as
/// [`DbError::InvalidValue`] rather than a SQLite conversion error.
struct HistoryRow {
    entry_id: String,
    query_text: String,
    method: String,
    matched_record_id: Option<String>,
    searched_at: String,
}

impl HistoryRow {
    fn into_entry(self) -> DbResult<SearchHistoryEntry> {
        let method: SearchMethod = self.method.parse().map_err(DbError::InvalidValue)?;
        Ok(SearchHistoryEntry {
            entry_id: self.entry_id,
            query_text: self.query_text,
            method,
            matched_record_id: self.matched_record_id,
            searched_at: self.searched_at,
        })
    }
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<HistoryRow> {
    Ok(HistoryRow {
        entry_id: row.get(0)?,
        query_text: row.get(1)?,
        method: row.get(2)?,
        matched_record_id: row.get(3)?,
        searched_at: row.get(4)?,
    })
}

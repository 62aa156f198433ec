//! Recording identifications.
//!
//! History is best effort: a failing sink is logged and never changes the
//! identification result.

use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Mutex;

use crate::db::{Database, DbError};
use crate::models::{MatchResult, SearchHistoryEntry, SearchMethod};

/// Destination for search history entries.
pub trait HistorySink {
    type Error: Display;

    fn record(&self, entry: &SearchHistoryEntry) -> Result<(), Self::Error>;
}

impl HistorySink for Database {
    type Error = DbError;

    fn record(&self, entry: &SearchHistoryEntry) -> Result<(), DbError> {
        self.insert_search(entry)
    }
}

/// In-process history, newest last.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Mutex<Vec<SearchHistoryEntry>>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<SearchHistoryEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl HistorySink for MemoryHistory {
    type Error = Infallible;

    fn record(&self, entry: &SearchHistoryEntry) -> Result<(), Infallible> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(entry.clone());
        Ok(())
    }
}

/// Record the outcome of an identification.
///
/// Returns the entry that was offered to the sink, whether or not the sink
/// accepted it.
pub fn record_identification<S: HistorySink + ?Sized>(
    sink: &S,
    query_text: &str,
    method: SearchMethod,
    result: &MatchResult,
) -> SearchHistoryEntry {
    let matched = result.record_id().map(str::to_string);
    let entry = SearchHistoryEntry::new(query_text, method, matched);

    if let Err(e) = sink.record(&entry) {
        tracing::warn!(
            entry_id = %entry.entry_id,
            error = %e,
            "failed to record search history"
        );
    }

    entry
}

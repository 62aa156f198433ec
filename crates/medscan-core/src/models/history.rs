//! Search history models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How the query text was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMethod {
    Photo,
    Manual,
}

impl SearchMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchMethod::Photo => "photo",
            SearchMethod::Manual => "manual",
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "photo" => Ok(SearchMethod::Photo),
            "manual" => Ok(SearchMethod::Manual),
            other => Err(format!("unknown search method: {}", other)),
        }
    }
}

/// One recorded identification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHistoryEntry {
    pub entry_id: String,
    pub query_text: String,
    pub method: SearchMethod,
    pub matched_record_id: Option<String>,
    /// RFC 3339 timestamp
    pub searched_at: String,
}

impl SearchHistoryEntry {
    /// Create a new entry stamped with the current time.
    pub fn new(
        query_text: impl Into<String>,
        method: SearchMethod,
        matched_record_id: Option<String>,
    ) -> Self {
        Self {
            entry_id: Uuid::new_v4().to_string(),
            query_text: query_text.into(),
            method,
            matched_record_id,
            searched_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

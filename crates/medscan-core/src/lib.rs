//! MedScan Core Library
//!
//! Offline medication identification from noisy OCR or typed text.
//!
//! # Architecture
//!
//! ```text
//! Camera → OCR (medscan-ocr) ─┐
//!                             ├─→ SearchQuery
//! Typed text ─────────────────┘        │
//!                                      ▼
//!                          Candidate Extraction
//!                                      │
//!                     ┌────────────────▼────────────────┐
//!                     │          Match Cascade          │
//!                     │  exact → fuzzy → partial →      │
//!                     │  contains, first hit wins       │
//!                     └────────────────┬────────────────┘
//!                                      │
//!                         ┌────────────┴────────────┐
//!                         ▼                         ▼
//!                    MatchResult             Search History
//!                  (+ attempt log)           (best effort)
//! ```
//!
//! # Core Principle
//!
//! **Identification never fails.** A query that matches nothing returns an
//! empty [`MatchResult`] with the full attempt log; only corpus loading and
//! history storage can error.
//!
//! # Modules
//!
//! - [`config`]: Matching thresholds, word lists and field weights
//! - [`db`]: SQLite corpus loader and search history
//! - [`history`]: History sinks and best-effort recording
//! - [`models`]: Domain types (MedicationRecord, Corpus, SearchQuery, etc.)
//! - [`resolver`]: Normalizer, candidate extractor, similarity and strategies

pub mod config;
pub mod db;
pub mod history;
pub mod models;
pub mod resolver;

// Re-export commonly used types
pub use config::{FieldWeights, MatchConfig};
pub use db::Database;
pub use history::{record_identification, HistorySink, MemoryHistory};
pub use models::{
    Attempt, AttemptOutcome, Corpus, MatchResult, MedicationRecord, SearchHistoryEntry,
    SearchMethod, SearchQuery, Strategy,
};
pub use resolver::{identify, normalize, Identifier};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum MedScanError {
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid corpus: {0}")]
    InvalidCorpus(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<db::DbError> for MedScanError {
    fn from(e: db::DbError) -> Self {
        match e {
            db::DbError::Corpus(e) => e.into(),
            other => MedScanError::DatabaseError(other.to_string()),
        }
    }
}

impl From<models::CorpusError> for MedScanError {
    fn from(e: models::CorpusError) -> Self {
        MedScanError::InvalidCorpus(e.to_string())
    }
}

impl From<config::ConfigError> for MedScanError {
    fn from(e: config::ConfigError) -> Self {
        MedScanError::ConfigError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for MedScanError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        MedScanError::DatabaseError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open the database at the given path and load its medications.
#[uniffi::export]
pub fn open_identifier(db_path: String) -> Result<Arc<MedScanCore>, MedScanError> {
    let db = Database::open(&db_path)?;
    let corpus = db.load_corpus()?;
    let identifier = Identifier::default();
    Ok(Arc::new(MedScanCore::new(corpus, identifier, db)))
}

/// Like [`open_identifier`], with a JSON [`MatchConfig`] overriding defaults.
#[uniffi::export]
pub fn open_identifier_with_config(
    db_path: String,
    config_json: String,
) -> Result<Arc<MedScanCore>, MedScanError> {
    let identifier = Identifier::new(MatchConfig::from_json_str(&config_json)?)?;
    let db = Database::open(&db_path)?;
    let corpus = db.load_corpus()?;
    Ok(Arc::new(MedScanCore::new(corpus, identifier, db)))
}

/// Build an identifier from a JSON array of medication records.
///
/// History goes to an in-memory database.
#[uniffi::export]
pub fn open_identifier_from_json(records_json: String) -> Result<Arc<MedScanCore>, MedScanError> {
    let corpus = Corpus::from_json_str(&records_json)?;
    let db = Database::open_in_memory()?;
    let identifier = Identifier::default();
    Ok(Arc::new(MedScanCore::new(corpus, identifier, db)))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe identifier for FFI.
///
/// The corpus is immutable and shared; only history writes take the lock.
#[derive(uniffi::Object)]
pub struct MedScanCore {
    corpus: Arc<Corpus>,
    identifier: Identifier,
    db: Arc<Mutex<Database>>,
}

impl MedScanCore {
    fn new(corpus: Corpus, identifier: Identifier, db: Database) -> Self {
        Self {
            corpus: Arc::new(corpus),
            identifier,
            db: Arc::new(Mutex::new(db)),
        }
    }
}

#[uniffi::export]
impl MedScanCore {
    // =========================================================================
    // Identification
    // =========================================================================

    /// Identify the best matching medication.
    pub fn identify(&self, query: FfiSearchQuery) -> FfiMatchResult {
        self.identifier.identify(&query.into(), &self.corpus).into()
    }

    /// Identify and append the outcome to search history.
    pub fn identify_and_record(
        &self,
        query: FfiSearchQuery,
        method: String,
    ) -> Result<FfiMatchResult, MedScanError> {
        let method = parse_method(&method)?;
        let query: SearchQuery = query.into();
        let result = self.identifier.identify(&query, &self.corpus);

        // A poisoned lock still holds a usable connection; history must not
        // cost the caller a computed match.
        let db = self
            .db
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        record_identification(&*db, &query.primary_text, method, &result);
        Ok(result.into())
    }

    // =========================================================================
    // Corpus
    // =========================================================================

    /// Number of medications in the loaded corpus.
    pub fn medication_count(&self) -> u32 {
        self.corpus.len() as u32
    }

    /// Get a medication by id.
    pub fn get_medication(&self, id: String) -> Option<FfiMedicationRecord> {
        self.corpus.get_by_id(&id).cloned().map(|r| r.into())
    }

    // =========================================================================
    // Search History
    // =========================================================================

    /// Append a history entry.
    pub fn record_search(
        &self,
        query_text: String,
        method: String,
        matched_record_id: Option<String>,
    ) -> Result<FfiHistoryEntry, MedScanError> {
        let entry = SearchHistoryEntry::new(query_text, parse_method(&method)?, matched_record_id);
        let db = self.db.lock()?;
        db.insert_search(&entry)?;
        Ok(entry.into())
    }

    /// Most recent searches first.
    pub fn recent_searches(&self, limit: u32) -> Result<Vec<FfiHistoryEntry>, MedScanError> {
        let db = self.db.lock()?;
        let entries = db.recent_searches(limit as usize)?;
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }
}

fn parse_method(method: &str) -> Result<SearchMethod, MedScanError> {
    method.parse().map_err(MedScanError::InvalidInput)
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe medication record.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMedicationRecord {
    pub id: String,
    pub name: String,
    pub name_localized: Option<String>,
    pub generic_name: Option<String>,
    pub generic_name_localized: Option<String>,
    pub category: Option<String>,
    pub category_localized: Option<String>,
    pub primary_use: Option<String>,
    pub primary_use_localized: Option<String>,
    pub dosage: Option<String>,
    pub dosage_localized: Option<String>,
    pub warnings: Option<String>,
    pub warnings_localized: Option<String>,
}

impl From<MedicationRecord> for FfiMedicationRecord {
    fn from(record: MedicationRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            name_localized: record.name_localized,
            generic_name: record.generic_name,
            generic_name_localized: record.generic_name_localized,
            category: record.category,
            category_localized: record.category_localized,
            primary_use: record.primary_use,
            primary_use_localized: record.primary_use_localized,
            dosage: record.dosage,
            dosage_localized: record.dosage_localized,
            warnings: record.warnings,
            warnings_localized: record.warnings_localized,
        }
    }
}

/// FFI-safe search query.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSearchQuery {
    pub primary_text: String,
    pub alternative_queries: Vec<String>,
    pub full_transcript: Option<String>,
    pub ocr_confidence: Option<f64>,
}

impl From<FfiSearchQuery> for SearchQuery {
    fn from(query: FfiSearchQuery) -> Self {
        SearchQuery {
            primary_text: query.primary_text,
            alternative_queries: query.alternative_queries,
            full_transcript: query.full_transcript,
            ocr_confidence: query.ocr_confidence,
        }
    }
}

/// FFI-safe attempt log entry. `record_id` and `score` are set on a match.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAttempt {
    pub candidate: String,
    pub strategy: String,
    pub record_id: Option<String>,
    pub score: Option<f64>,
}

impl From<Attempt> for FfiAttempt {
    fn from(attempt: Attempt) -> Self {
        let (record_id, score) = match attempt.outcome {
            AttemptOutcome::Matched { record_id, score } => (Some(record_id), Some(score)),
            AttemptOutcome::NoMatch => (None, None),
        };
        Self {
            candidate: attempt.candidate,
            strategy: attempt.strategy.to_string(),
            record_id,
            score,
        }
    }
}

/// FFI-safe match result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMatchResult {
    pub record: Option<FfiMedicationRecord>,
    pub candidate: Option<String>,
    pub strategy: Option<String>,
    pub score: Option<f64>,
    pub attempt_log: Vec<FfiAttempt>,
}

impl From<MatchResult> for FfiMatchResult {
    fn from(result: MatchResult) -> Self {
        Self {
            record: result.record.map(|r| r.into()),
            candidate: result.candidate,
            strategy: result.strategy.map(|s| s.to_string()),
            score: result.score,
            attempt_log: result.attempt_log.into_iter().map(|a| a.into()).collect(),
        }
    }
}

/// FFI-safe search history entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHistoryEntry {
    pub entry_id: String,
    pub query_text: String,
    pub method: String,
    pub matched_record_id: Option<String>,
    pub searched_at: String,
}

impl From<SearchHistoryEntry> for FfiHistoryEntry {
    fn from(entry: SearchHistoryEntry) -> Self {
        Self {
            entry_id: entry.entry_id,
            query_text: entry.query_text,
            method: entry.method.to_string(),
            matched_record_id: entry.matched_record_id,
            searched_at: entry.searched_at,
        }
    }
}

//! The immutable, ordered medication corpus.

use std::collections::HashMap;

use thiserror::Error;

use super::{MedicationRecord, NameField};
use crate::resolver::normalize;

/// Corpus construction errors.
#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Record at index {0} has an empty name")]
    EmptyName(usize),

    #[error("Duplicate record id: {0}")]
    DuplicateId(String),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type CorpusResult<T> = Result<T, CorpusError>;

/// A name-like field prepared for matching.
#[derive(Debug, Clone)]
pub struct IndexedField {
    pub field: NameField,
    /// Normalized form (lowercase, noise stripped, whitespace collapsed)
    pub normalized: String,
}

/// Precomputed match keys for one record.
#[derive(Debug, Clone)]
pub struct IndexedRecord {
    pub fields: Vec<IndexedField>,
}

impl IndexedRecord {
    fn build(record: &MedicationRecord) -> Self {
        let fields = record
            .name_fields()
            .map(|(field, value)| IndexedField {
                field,
                normalized: normalize(value),
            })
            .filter(|f| !f.normalized.is_empty())
            .collect();
        Self { fields }
    }

    /// Normalized value of one field, if present.
    pub fn get(&self, field: NameField) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.normalized.as_str())
    }
}

/// Ordered, read-only collection of medication records.
///
/// Built once at startup and shared (typically behind an `Arc`) by any number
/// of concurrent identifications. Insertion order is the tie-break of last
/// resort for every strategy.
#[derive(Debug, Clone)]
pub struct Corpus {
    records: Vec<MedicationRecord>,
    index: Vec<IndexedRecord>,
    /// Case-insensitive exact name → lowest corpus index
    exact: HashMap<String, usize>,
    by_id: HashMap<String, usize>,
}

impl Corpus {
    /// Build a corpus, validating record invariants.
    pub fn new(records: Vec<MedicationRecord>) -> CorpusResult<Self> {
        let mut by_id = HashMap::with_capacity(records.len());
        let mut exact = HashMap::new();
        let mut index = Vec::with_capacity(records.len());

        for (i, record) in records.iter().enumerate() {
            if record.name.trim().is_empty() {
                return Err(CorpusError::EmptyName(i));
            }
            if by_id.insert(record.id.clone(), i).is_some() {
                return Err(CorpusError::DuplicateId(record.id.clone()));
            }

            for (_, value) in record.name_fields() {
                exact.entry(exact_key(value)).or_insert(i);
            }
            index.push(IndexedRecord::build(record));
        }

        tracing::debug!(records = records.len(), "corpus built");

        Ok(Self {
            records,
            index,
            exact,
            by_id,
        })
    }

    /// Build a corpus from a JSON array of records.
    pub fn from_json_str(json: &str) -> CorpusResult<Self> {
        let records: Vec<MedicationRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record at a corpus index.
    pub fn get(&self, index: usize) -> Option<&MedicationRecord> {
        self.records.get(index)
    }

    /// Record by its id.
    pub fn get_by_id(&self, id: &str) -> Option<&MedicationRecord> {
        self.by_id.get(id).and_then(|&i| self.records.get(i))
    }

    /// Records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MedicationRecord> {
        self.records.iter()
    }

    /// Lowest index whose name-like field equals `text`, ignoring case and
    /// surrounding whitespace.
    pub fn find_exact(&self, text: &str) -> Option<usize> {
        self.exact.get(&exact_key(text)).copied()
    }

    /// Match keys in insertion order, paired with their corpus index.
    pub fn indexed(&self) -> impl Iterator<Item = (usize, &IndexedRecord)> {
        self.index.iter().enumerate()
    }
}

fn exact_key(text: &str) -> String {
    text.trim().to_lowercase()
}

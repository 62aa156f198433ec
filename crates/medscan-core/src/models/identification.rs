//! Identification request/response models.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::MedicationRecord;

/// A single identification request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchQuery {
    /// Text to identify (OCR line or typed input)
    pub primary_text: String,
    /// Fallback strings, tried after the primary text's candidates
    #[serde(default)]
    pub alternative_queries: Vec<String>,
    /// Full OCR transcript to mine for individual words
    #[serde(default)]
    pub full_transcript: Option<String>,
    /// OCR confidence (0-100). Gated by the caller, ignored by the cascade.
    #[serde(default)]
    pub ocr_confidence: Option<f64>,
}

impl SearchQuery {
    /// Create a query for typed or single-string input.
    pub fn new(primary_text: impl Into<String>) -> Self {
        Self {
            primary_text: primary_text.into(),
            ..Default::default()
        }
    }

    pub fn with_alternatives(mut self, alternatives: Vec<String>) -> Self {
        self.alternative_queries = alternatives;
        self
    }

    pub fn with_transcript(mut self, transcript: impl Into<String>) -> Self {
        self.full_transcript = Some(transcript.into());
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.ocr_confidence = Some(confidence);
        self
    }
}

/// Match strategies, in cascade order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Exact,
    Fuzzy,
    Partial,
    Contains,
}

impl Strategy {
    /// Cascade order: exact beats fuzzy beats partial beats contains.
    pub const CASCADE: [Strategy; 4] = [
        Strategy::Exact,
        Strategy::Fuzzy,
        Strategy::Partial,
        Strategy::Contains,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Exact => "exact",
            Strategy::Fuzzy => "fuzzy",
            Strategy::Partial => "partial",
            Strategy::Contains => "contains",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one strategy on one candidate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum AttemptOutcome {
    Matched { record_id: String, score: f64 },
    NoMatch,
}

/// One (candidate, strategy, outcome) entry of the attempt log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Attempt {
    pub candidate: String,
    pub strategy: Strategy,
    pub outcome: AttemptOutcome,
}

/// Result of an identification. `record` is `None` when nothing matched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct MatchResult {
    pub record: Option<MedicationRecord>,
    /// Corpus index of the matched record
    pub corpus_index: Option<usize>,
    /// Candidate string that produced the match
    pub candidate: Option<String>,
    pub strategy: Option<Strategy>,
    /// Score accepted by the winning strategy (1.0 for exact and contains)
    pub score: Option<f64>,
    pub attempt_log: Vec<Attempt>,
}

impl MatchResult {
    pub fn is_match(&self) -> bool {
        self.record.is_some()
    }

    /// Id of the matched record, if any.
    pub fn record_id(&self) -> Option<&str> {
        self.record.as_ref().map(|r| r.id.as_str())
    }
}

//! Matching configuration.
//!
//! Resolved once at startup and handed to [`Identifier::new`](crate::Identifier::new).
//! Every field has a default, so a JSON file only needs to list overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::NameField;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Per-field weights used by the partial strategy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldWeights {
    pub name: f64,
    pub generic_name: f64,
    pub name_localized: f64,
    pub generic_name_localized: f64,
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self {
            name: 1.0,
            generic_name: 0.9,
            name_localized: 0.8,
            generic_name_localized: 0.7,
        }
    }
}

impl FieldWeights {
    pub fn weight(&self, field: NameField) -> f64 {
        match field {
            NameField::Name => self.name,
            NameField::GenericName => self.generic_name,
            NameField::NameLocalized => self.name_localized,
            NameField::GenericNameLocalized => self.generic_name_localized,
        }
    }
}

/// Tunables for candidate extraction and the match cascade.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchConfig {
    /// Fuzzy matches must score above this
    pub fuzzy_threshold: f64,
    /// Partial matches must score above this
    pub partial_threshold: f64,
    pub min_fuzzy_len: usize,
    pub min_partial_len: usize,
    pub min_contains_len: usize,
    /// Shortest pattern-derived, alternative or transcript candidate kept
    pub min_candidate_len: usize,
    pub catch_all_min_len: usize,
    pub catch_all_max_len: usize,
    pub min_alternative_len: usize,
    pub min_transcript_word_len: usize,
    /// Endings of lowercase tokens that look like drug names
    pub drug_suffixes: Vec<String>,
    /// Endings typical of generic-name morphology
    pub generic_suffixes: Vec<String>,
    /// Words never extracted as pattern tokens or transcript words.
    /// Empty unless configured.
    pub stop_words: Vec<String>,
    pub field_weights: FieldWeights,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.6,
            partial_threshold: 0.3,
            min_fuzzy_len: 3,
            min_partial_len: 4,
            min_contains_len: 3,
            min_candidate_len: 3,
            catch_all_min_len: 3,
            catch_all_max_len: 15,
            min_alternative_len: 3,
            min_transcript_word_len: 4,
            drug_suffixes: to_strings(&[
                "ine", "ol", "mycin", "cillin", "cycline", "floxacin", "phen", "fen", "caine",
                "ide", "one", "pam", "vir", "cin",
            ]),
            generic_suffixes: to_strings(&[
                "pril", "sartan", "statin", "zole", "dipine", "tidine", "gliptin", "mab", "nib",
                "oxetine", "triptan", "parin", "lukast",
            ]),
            stop_words: Vec::new(),
            field_weights: FieldWeights::default(),
        }
    }
}

impl MatchConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check ranges and non-empty lists.
    pub fn validate(&self) -> ConfigResult<()> {
        let weights = &self.field_weights;
        for (label, value) in [
            ("fuzzy_threshold", self.fuzzy_threshold),
            ("partial_threshold", self.partial_threshold),
            ("field_weights.name", weights.name),
            ("field_weights.generic_name", weights.generic_name),
            ("field_weights.name_localized", weights.name_localized),
            (
                "field_weights.generic_name_localized",
                weights.generic_name_localized,
            ),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be within [0, 1], got {}",
                    label, value
                )));
            }
        }

        if self.catch_all_min_len > self.catch_all_max_len {
            return Err(ConfigError::Invalid(format!(
                "catch_all_min_len ({}) exceeds catch_all_max_len ({})",
                self.catch_all_min_len, self.catch_all_max_len
            )));
        }

        if self
            .drug_suffixes
            .iter()
            .chain(&self.generic_suffixes)
            .any(|s| s.trim().is_empty())
        {
            return Err(ConfigError::Invalid("suffixes must not be blank".into()));
        }

        Ok(())
    }

    /// Whether `word` is a configured stop word (case-insensitive).
    pub fn is_stop_word(&self, word: &str) -> bool {
        let lower = word.to_lowercase();
        self.stop_words.iter().any(|s| s.to_lowercase() == lower)
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

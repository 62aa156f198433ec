//! Candidate extraction.
//!
//! Turns raw OCR or typed text into an ordered, de-duplicated list of strings
//! that plausibly name a medication. Earlier candidates are tried first.
//!
//! Order:
//! 1. The primary text as given, then its normalized form
//! 2. Tokens from the primary text: capitalized words, drug-suffix words,
//!    generic-suffix words, then any other alphabetic word
//! 3. Alternative queries, in caller order
//! 4. Words of the full transcript, in transcript order

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::normalize;
use crate::config::MatchConfig;

/// A letter followed by letters, digits, dots or hyphens.
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\p{L}[\p{L}\p{N}.\-]*").expect("valid regex"));

/// Trailing strength such as `500mg`, `-20`, `1.5ml`, `10%`.
static DOSE_SUFFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[.\-]*\d+(?:[.,]\d+)?(?:mg|mcg|µg|ug|g|ml|l|iu|units?|%)?\.?$")
        .expect("valid regex")
});

/// Where a candidate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CandidateSource {
    Primary,
    Normalized,
    Capitalized,
    DrugSuffix,
    GenericSuffix,
    CatchAll,
    Alternative,
    TranscriptWord,
}

/// A string to test against the corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub text: String,
    pub source: CandidateSource,
}

/// Ordered candidate list with case-insensitive de-duplication.
struct CandidateList {
    items: Vec<Candidate>,
    seen: HashSet<String>,
}

impl CandidateList {
    fn new() -> Self {
        Self {
            items: Vec::new(),
            seen: HashSet::new(),
        }
    }

    fn push(&mut self, text: &str, source: CandidateSource) {
        if text.is_empty() {
            return;
        }
        if self.seen.insert(text.to_lowercase()) {
            self.items.push(Candidate {
                text: text.to_string(),
                source,
            });
        }
    }
}

/// Extracts candidates according to a [`MatchConfig`].
#[derive(Debug, Clone)]
pub struct CandidateExtractor {
    config: MatchConfig,
}

impl Default for CandidateExtractor {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

impl CandidateExtractor {
    pub fn new(config: MatchConfig) -> Self {
        Self { config }
    }

    /// Extract candidates from the primary text, alternatives and transcript.
    ///
    /// An empty primary text with no alternatives or transcript yields an
    /// empty list.
    pub fn extract(
        &self,
        primary_text: &str,
        alternative_queries: &[String],
        full_transcript: Option<&str>,
    ) -> Vec<Candidate> {
        let mut list = CandidateList::new();
        let min_len = self.config.min_candidate_len;

        // Step 1: short values are allowed here, exact matching may need them
        list.push(primary_text.trim(), CandidateSource::Primary);
        list.push(&normalize(primary_text), CandidateSource::Normalized);

        // Step 2
        let tokens: Vec<String> = self
            .tokens(primary_text)
            .filter(|t| char_len(t) >= min_len)
            .collect();
        for (source, accepts) in self.token_passes() {
            for token in tokens.iter().filter(|t| accepts(self, t.as_str())) {
                list.push(token, source);
            }
        }

        // Step 3
        for alternative in alternative_queries {
            let alternative = alternative.trim();
            if char_len(alternative) >= self.config.min_alternative_len.max(min_len) {
                list.push(alternative, CandidateSource::Alternative);
            }
        }

        // Step 4
        if let Some(transcript) = full_transcript {
            let min_word = self.config.min_transcript_word_len.max(min_len);
            for word in transcript.split_whitespace() {
                let word = word.trim_matches(|c: char| !c.is_alphanumeric());
                if char_len(word) >= min_word && !self.config.is_stop_word(word) {
                    list.push(word, CandidateSource::TranscriptWord);
                }
            }
        }

        list.items
    }

    /// Tokenize raw text, stripping trailing strengths and stop words.
    fn tokens<'t>(&'t self, raw: &'t str) -> impl Iterator<Item = String> + 't {
        TOKEN_RE.find_iter(raw).filter_map(move |m| {
            let stripped = DOSE_SUFFIX_RE.replace(m.as_str(), "");
            let token = stripped.trim_end_matches(['.', '-']);
            if token.is_empty() || self.config.is_stop_word(token) {
                None
            } else {
                Some(token.to_string())
            }
        })
    }

    fn token_passes(&self) -> [(CandidateSource, fn(&Self, &str) -> bool); 4] {
        [
            (CandidateSource::Capitalized, Self::is_capitalized),
            (CandidateSource::DrugSuffix, Self::is_drug_suffixed),
            (CandidateSource::GenericSuffix, Self::is_generic_suffixed),
            (CandidateSource::CatchAll, Self::is_catch_all),
        ]
    }

    /// Capitalized multi-letter word, e.g. a brand name (`Tylenol`, `ADVIL`).
    fn is_capitalized(&self, token: &str) -> bool {
        let mut chars = token.chars();
        matches!(chars.next(), Some(c) if c.is_uppercase())
            && char_len(token) >= 2
            && token.chars().all(|c| c.is_alphabetic() || c == '-')
    }

    fn is_drug_suffixed(&self, token: &str) -> bool {
        self.has_suffix(token, &self.config.drug_suffixes)
    }

    fn is_generic_suffixed(&self, token: &str) -> bool {
        self.has_suffix(token, &self.config.generic_suffixes)
    }

    /// Lowercase word ending in one of `suffixes`, longer than the suffix.
    fn has_suffix(&self, token: &str, suffixes: &[String]) -> bool {
        token.chars().all(|c| c.is_lowercase() || c == '-')
            && suffixes
                .iter()
                .any(|s| token.len() > s.len() && token.ends_with(s.as_str()))
    }

    fn is_catch_all(&self, token: &str) -> bool {
        let len = char_len(token);
        token.chars().all(char::is_alphabetic)
            && len >= self.config.catch_all_min_len
            && len <= self.config.catch_all_max_len
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

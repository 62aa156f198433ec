//! Match strategies and result scoring.
//!
//! Each strategy takes one candidate and returns at most one corpus index.
//! Fuzzy and partial strategies rank every record and keep the best; ties go
//! to the lowest corpus index because records are visited in insertion order
//! and only a strictly higher score replaces the current best.

use serde::{Deserialize, Serialize};

use super::similarity::best_similarity;
use crate::config::FieldWeights;
use crate::models::Corpus;

/// Partial tier: field equals candidate.
const TIER_EQUAL: f64 = 1.0;
/// Partial tier: field contains candidate as whole word(s).
const TIER_WHOLE_WORD: f64 = 0.9;
/// Partial tier: candidate contains the whole field.
const TIER_CANDIDATE_CONTAINS: f64 = 0.8;
/// Partial tier: field starts with candidate.
const TIER_PREFIX: f64 = 0.7;
/// Partial tier: candidate starts a later word of the field.
const TIER_WORD_BOUNDARY: f64 = 0.6;
/// Partial tier: candidate found mid-word; base plus positional bonus.
const TIER_POSITIONAL_BASE: f64 = 0.4;
const TIER_POSITIONAL_BONUS: f64 = 0.2;

/// A record selected by a strategy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrategyMatch {
    /// Corpus index of the record
    pub index: usize,
    pub score: f64,
}

/// Keeps the highest score seen, first one wins on ties.
#[derive(Debug, Default)]
struct BestMatch {
    best: Option<StrategyMatch>,
}

impl BestMatch {
    fn offer(&mut self, index: usize, score: f64) {
        match self.best {
            Some(current) if score <= current.score => {}
            _ => self.best = Some(StrategyMatch { index, score }),
        }
    }

    fn above(self, threshold: f64) -> Option<StrategyMatch> {
        self.best.filter(|m| m.score > threshold)
    }
}

/// Case-insensitive equality with any name-like field.
pub fn exact_match(candidate: &str, corpus: &Corpus) -> Option<StrategyMatch> {
    corpus
        .find_exact(candidate)
        .map(|index| StrategyMatch { index, score: 1.0 })
}

/// Best record by maximum field similarity, if it clears `threshold`.
///
/// `candidate` must already be normalized.
pub fn fuzzy_match(candidate: &str, corpus: &Corpus, threshold: f64) -> Option<StrategyMatch> {
    let mut best = BestMatch::default();

    for (index, record) in corpus.indexed() {
        let score = record
            .fields
            .iter()
            .map(|f| best_similarity(candidate, &f.normalized))
            .fold(0.0, f64::max);
        best.offer(index, score);
    }

    best.above(threshold)
}

/// Best record by weighted substring/prefix/position score, if it clears
/// `threshold`.
///
/// `candidate` must already be normalized.
pub fn partial_match(
    candidate: &str,
    corpus: &Corpus,
    weights: &FieldWeights,
    threshold: f64,
) -> Option<StrategyMatch> {
    let mut best = BestMatch::default();

    for (index, record) in corpus.indexed() {
        let score = record
            .fields
            .iter()
            .map(|f| partial_field_score(candidate, &f.normalized) * weights.weight(f.field))
            .fold(0.0, f64::max);
        best.offer(index, score);
    }

    best.above(threshold)
}

/// Unweighted partial score of one normalized field.
pub fn partial_field_score(candidate: &str, field: &str) -> f64 {
    if candidate.is_empty() || field.is_empty() {
        return 0.0;
    }
    if field == candidate {
        return TIER_EQUAL;
    }
    if contains_whole_words(field, candidate) {
        return TIER_WHOLE_WORD;
    }
    if candidate.contains(field) {
        return TIER_CANDIDATE_CONTAINS;
    }
    if field.starts_with(candidate) {
        return TIER_PREFIX;
    }

    let Some(first) = field.find(candidate) else {
        return 0.0;
    };
    if starts_word_after(field, candidate) {
        return TIER_WORD_BOUNDARY;
    }

    let position = field[..first].chars().count() as f64;
    let length = field.chars().count() as f64;
    TIER_POSITIONAL_BASE + TIER_POSITIONAL_BONUS * (1.0 - position / length)
}

/// First record whose field contains the candidate, is contained by it, or
/// shares a token prefix with it.
///
/// `candidate` must already be normalized. Field tokens shorter than
/// `min_token_len` are not used as prefixes of the candidate.
pub fn contains_match(
    candidate: &str,
    corpus: &Corpus,
    min_token_len: usize,
) -> Option<StrategyMatch> {
    if candidate.is_empty() {
        return None;
    }

    corpus
        .indexed()
        .find(|(_, record)| {
            record.fields.iter().any(|f| {
                let field = f.normalized.as_str();
                field.contains(candidate)
                    || candidate.contains(field)
                    || tokens(field).any(|token| {
                        token.starts_with(candidate)
                            || (token.chars().count() >= min_token_len
                                && candidate.starts_with(token))
                    })
            })
        })
        .map(|(index, _)| StrategyMatch { index, score: 1.0 })
}

fn tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split([' ', '-']).filter(|t| !t.is_empty())
}

/// `field` contains `candidate` delimited by spaces or the string ends.
fn contains_whole_words(field: &str, candidate: &str) -> bool {
    format!(" {} ", field).contains(&format!(" {} ", candidate))
}

/// Some occurrence of `candidate` in `field` starts right after a space or
/// hyphen.
fn starts_word_after(field: &str, candidate: &str) -> bool {
    field
        .match_indices(candidate)
        .any(|(i, _)| matches!(field[..i].chars().last(), Some(' ') | Some('-')))
}

//! Medication identification.
//!
//! Pipeline: Normalization → Candidate Extraction → Match Cascade
//!
//! For each candidate, in extraction order, the strategies run in a fixed
//! order (exact, fuzzy, partial, contains) and the first hit ends the search.
//! A strategy ranked earlier always wins over a later one, whatever their
//! numeric scores.

mod candidates;
mod normalizer;
pub mod similarity;
pub mod strategies;

pub use candidates::*;
pub use normalizer::*;
pub use strategies::StrategyMatch;

use crate::config::{ConfigResult, MatchConfig};
use crate::models::{Attempt, AttemptOutcome, Corpus, MatchResult, SearchQuery, Strategy};

/// Runs the match cascade against a corpus.
///
/// Holds no per-request state, so one instance can serve concurrent calls.
#[derive(Debug, Clone)]
pub struct Identifier {
    config: MatchConfig,
    extractor: CandidateExtractor,
}

impl Default for Identifier {
    fn default() -> Self {
        Self::from_valid_config(MatchConfig::default())
    }
}

impl Identifier {
    /// Create an identifier after validating `config`.
    pub fn new(config: MatchConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    fn from_valid_config(config: MatchConfig) -> Self {
        Self {
            extractor: CandidateExtractor::new(config.clone()),
            config,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Candidates for a query, in the order the cascade tries them.
    pub fn candidates(&self, query: &SearchQuery) -> Vec<Candidate> {
        self.extractor.extract(
            &query.primary_text,
            &query.alternative_queries,
            query.full_transcript.as_deref(),
        )
    }

    /// Identify the single best record for a query.
    ///
    /// Never fails: "no match" is a result with no record and the full
    /// attempt log.
    pub fn identify(&self, query: &SearchQuery, corpus: &Corpus) -> MatchResult {
        let candidates = self.candidates(query);
        let mut attempt_log = Vec::new();

        for candidate in &candidates {
            let normalized = normalize(&candidate.text);
            let length = normalized.chars().count();

            for strategy in Strategy::CASCADE {
                if !self.is_eligible(strategy, length) {
                    continue;
                }

                let found = self.run_strategy(strategy, &candidate.text, &normalized, corpus);
                tracing::debug!(
                    candidate = %candidate.text,
                    %strategy,
                    matched = found.is_some(),
                    "strategy attempted"
                );

                let Some(found) = found else {
                    attempt_log.push(Attempt {
                        candidate: candidate.text.clone(),
                        strategy,
                        outcome: AttemptOutcome::NoMatch,
                    });
                    continue;
                };

                let Some(record) = corpus.get(found.index) else {
                    continue;
                };
                attempt_log.push(Attempt {
                    candidate: candidate.text.clone(),
                    strategy,
                    outcome: AttemptOutcome::Matched {
                        record_id: record.id.clone(),
                        score: found.score,
                    },
                });

                tracing::info!(
                    record_id = %record.id,
                    candidate = %candidate.text,
                    %strategy,
                    score = found.score,
                    "medication identified"
                );

                return MatchResult {
                    record: Some(record.clone()),
                    corpus_index: Some(found.index),
                    candidate: Some(candidate.text.clone()),
                    strategy: Some(strategy),
                    score: Some(found.score),
                    attempt_log,
                };
            }
        }

        tracing::debug!(
            candidates = candidates.len(),
            attempts = attempt_log.len(),
            "no medication matched"
        );

        MatchResult {
            attempt_log,
            ..Default::default()
        }
    }

    /// Length guards: exact always runs, the others need longer candidates.
    fn is_eligible(&self, strategy: Strategy, length: usize) -> bool {
        match strategy {
            Strategy::Exact => true,
            Strategy::Fuzzy => length >= self.config.min_fuzzy_len,
            Strategy::Partial => length >= self.config.min_partial_len,
            Strategy::Contains => length >= self.config.min_contains_len,
        }
    }

    fn run_strategy(
        &self,
        strategy: Strategy,
        raw: &str,
        normalized: &str,
        corpus: &Corpus,
    ) -> Option<StrategyMatch> {
        match strategy {
            Strategy::Exact => strategies::exact_match(raw, corpus),
            Strategy::Fuzzy => {
                strategies::fuzzy_match(normalized, corpus, self.config.fuzzy_threshold)
            }
            Strategy::Partial => strategies::partial_match(
                normalized,
                corpus,
                &self.config.field_weights,
                self.config.partial_threshold,
            ),
            Strategy::Contains => {
                strategies::contains_match(normalized, corpus, self.config.min_contains_len)
            }
        }
    }
}

/// Identify a query with the default configuration.
pub fn identify(query: &SearchQuery, corpus: &Corpus) -> MatchResult {
    Identifier::default().identify(query, corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MedicationRecord;

    fn setup_corpus() -> Corpus {
        let mut brufen = MedicationRecord::new("BRU-1".into(), "Brufen".into());
        brufen.generic_name = Some("Ibuprofen".into());
        brufen.category = Some("NSAID".into());

        let mut panadol = MedicationRecord::new("PAN-1".into(), "Panadol".into());
        panadol.generic_name = Some("Paracetamol".into());
        panadol.name_localized = Some("بانادول".into());

        let augmentin = MedicationRecord::new("AUG-1".into(), "Augmentin".into());

        Corpus::new(vec![brufen, panadol, augmentin]).unwrap()
    }

    #[test]
    fn test_exact_generic_name() {
        let corpus = setup_corpus();
        let result = Identifier::default().identify(&SearchQuery::new("ibuprofen"), &corpus);

        assert_eq!(result.record_id(), Some("BRU-1"));
        assert_eq!(result.strategy, Some(Strategy::Exact));
        assert_eq!(result.attempt_log.len(), 1);
    }

    #[test]
    fn test_localized_name() {
        let corpus = setup_corpus();
        let result = identify(&SearchQuery::new("بانادول"), &corpus);

        assert_eq!(result.record_id(), Some("PAN-1"));
        assert_eq!(result.strategy, Some(Strategy::Exact));
    }

    #[test]
    fn test_falls_through_to_fuzzy() {
        let corpus = setup_corpus();
        let result = identify(&SearchQuery::new("Panadoll"), &corpus);

        assert_eq!(result.record_id(), Some("PAN-1"));
        assert_eq!(result.strategy, Some(Strategy::Fuzzy));
        assert_eq!(result.candidate.as_deref(), Some("Panadoll"));
        assert_eq!(
            result.attempt_log.first().map(|a| a.strategy),
            Some(Strategy::Exact)
        );
    }

    #[test]
    fn test_alternative_query_used() {
        let corpus = setup_corpus();
        let query = SearchQuery::new("qx").with_alternatives(vec!["augmentin".into()]);
        let result = identify(&query, &corpus);

        assert_eq!(result.record_id(), Some("AUG-1"));
        assert_eq!(result.candidate.as_deref(), Some("augmentin"));
    }

    #[test]
    fn test_no_match_keeps_log() {
        let corpus = setup_corpus();
        let result = identify(&SearchQuery::new("qqqqqq"), &corpus);

        assert!(!result.is_match());
        assert!(result.strategy.is_none());
        let strategies: Vec<_> = result.attempt_log.iter().map(|a| a.strategy).collect();
        assert_eq!(strategies, Strategy::CASCADE.to_vec());
        assert!(result
            .attempt_log
            .iter()
            .all(|a| a.outcome == AttemptOutcome::NoMatch));
    }

    #[test]
    fn test_empty_query() {
        let corpus = setup_corpus();
        let result = identify(&SearchQuery::new(""), &corpus);

        assert!(!result.is_match());
        assert!(result.attempt_log.is_empty());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = MatchConfig {
            partial_threshold: -0.1,
            ..MatchConfig::default()
        };
        assert!(Identifier::new(config).is_err());
    }
}

//! End-to-end identification scenarios.
//!
//! Each test builds a small corpus and checks which record the cascade
//! returns, through which strategy, and what it logged on the way.

use std::sync::Arc;
use std::thread;

use medscan_core::config::{FieldWeights, MatchConfig};
use medscan_core::models::{
    AttemptOutcome, Corpus, MatchResult, MedicationRecord, SearchQuery, Strategy,
};
use medscan_core::resolver::{strategies, CandidateExtractor, Identifier};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn record(id: &str, name: &str, generic_name: Option<&str>) -> MedicationRecord {
    let mut record = MedicationRecord::new(id.to_string(), name.to_string());
    record.generic_name = generic_name.map(|s| s.to_string());
    record
}

fn pharmacy_corpus() -> Corpus {
    Corpus::new(vec![
        record("ASP-1", "Aspirin", Some("Acetylsalicylic acid")),
        record("IBU-1", "Ibuprofen", None),
        record("AMX-1", "Amoxil", Some("Amoxicillin")),
        record("LIS-1", "Zestril", Some("Lisinopril")),
    ])
    .unwrap()
}

/// Test case: query text and the expected (record id, strategy).
struct ScenarioCase {
    id: &'static str,
    query: &'static str,
    expected: Option<(&'static str, Strategy)>,
}

fn get_scenario_cases() -> Vec<ScenarioCase> {
    vec![
        ScenarioCase {
            id: "exact-name",
            query: "ibuprofen",
            expected: Some(("IBU-1", Strategy::Exact)),
        },
        ScenarioCase {
            id: "exact-generic-upper",
            query: "LISINOPRIL",
            expected: Some(("LIS-1", Strategy::Exact)),
        },
        ScenarioCase {
            id: "one-substitution",
            query: "ibuprofin",
            expected: Some(("IBU-1", Strategy::Fuzzy)),
        },
        ScenarioCase {
            id: "transposed-letters",
            query: "Amoxicilin",
            expected: Some(("AMX-1", Strategy::Fuzzy)),
        },
        ScenarioCase {
            id: "too-short",
            query: "ib",
            expected: None,
        },
        ScenarioCase {
            id: "noise",
            query: "qqqqqq",
            expected: None,
        },
    ]
}

#[test]
fn test_scenario_cases() {
    init_tracing();
    let corpus = pharmacy_corpus();
    let identifier = Identifier::default();

    for case in get_scenario_cases() {
        let result = identifier.identify(&SearchQuery::new(case.query), &corpus);

        let actual = result.record_id().zip(result.strategy);
        assert_eq!(actual, case.expected, "Case {}: wrong match", case.id);
    }
}

#[test]
fn test_exact_on_first_candidate() {
    let corpus = pharmacy_corpus();
    let result = Identifier::default().identify(&SearchQuery::new("ibuprofen"), &corpus);

    assert_eq!(result.record_id(), Some("IBU-1"));
    assert_eq!(result.strategy, Some(Strategy::Exact));
    assert_eq!(result.candidate.as_deref(), Some("ibuprofen"));
    assert_eq!(result.score, Some(1.0));
    assert_eq!(result.corpus_index, Some(1));
    assert_eq!(result.attempt_log.len(), 1);
}

#[test]
fn test_fuzzy_reports_similarity() {
    let corpus = pharmacy_corpus();
    let result = Identifier::default().identify(&SearchQuery::new("ibuprofin"), &corpus);

    assert_eq!(result.strategy, Some(Strategy::Fuzzy));
    let score = result.score.unwrap();
    assert!(score >= 0.6, "similarity {} below threshold", score);

    // Exact was tried first and failed
    assert_eq!(result.attempt_log[0].strategy, Strategy::Exact);
    assert_eq!(result.attempt_log[0].outcome, AttemptOutcome::NoMatch);
    assert!(matches!(
        &result.attempt_log[1].outcome,
        AttemptOutcome::Matched { record_id, .. } if record_id == "IBU-1"
    ));
}

#[test]
fn test_short_query_only_tries_exact() {
    let corpus = pharmacy_corpus();
    let result = Identifier::default().identify(&SearchQuery::new("ib"), &corpus);

    assert!(!result.is_match());
    assert_eq!(result.attempt_log.len(), 1);
    assert_eq!(result.attempt_log[0].strategy, Strategy::Exact);
}

#[test]
fn test_short_query_matches_short_name() {
    let corpus = Corpus::new(vec![record("IB-1", "IB", None)]).unwrap();
    let result = Identifier::default().identify(&SearchQuery::new("ib"), &corpus);

    assert_eq!(result.record_id(), Some("IB-1"));
    assert_eq!(result.strategy, Some(Strategy::Exact));
}

#[test]
fn test_transcript_brand_before_generic() {
    init_tracing();
    let transcript = "TYLENOL 500mg acetaminophen tablets take with food";

    // Generic record comes first in the corpus; extraction order still wins
    let corpus = Corpus::new(vec![
        record("ACE-1", "Acetaminophen", None),
        record("TYL-1", "Tylenol", None),
    ])
    .unwrap();

    let candidates: Vec<String> = CandidateExtractor::default()
        .extract(transcript, &[], Some(transcript))
        .into_iter()
        .map(|c| c.text)
        .collect();
    let position = |text: &str| candidates.iter().position(|c| c == text);
    let brand = position("TYLENOL").unwrap();
    let generic = position("acetaminophen").unwrap();
    assert!(brand < generic);

    let query = SearchQuery::new(transcript).with_transcript(transcript);
    let result = Identifier::default().identify(&query, &corpus);
    assert_eq!(result.record_id(), Some("TYL-1"));
}

#[test]
fn test_partial_prefers_earlier_position() {
    // "floxa" sits at char 5 of "ciprofloxacin" and char 1 of "ofloxacin"
    let corpus = Corpus::new(vec![
        record("CIP-1", "Ciprofloxacin", None),
        record("OFL-1", "Ofloxacin", None),
    ])
    .unwrap();

    let weights = FieldWeights::default();
    let found = strategies::partial_match("floxa", &corpus, &weights, 0.3).unwrap();
    assert_eq!(found.index, 1);
}

fn strategies_tried(result: &MatchResult) -> Vec<Strategy> {
    result.attempt_log.iter().map(|a| a.strategy).collect()
}

/// A label line with the brand name buried behind unrelated text.
const BURIED_BRAND: &str = "xxxxxxxxxxxxxxxxxxxx panadol";

fn buried_brand_corpus() -> Corpus {
    Corpus::new(vec![
        record("BRU-1", "Brufen", Some("Ibuprofen")),
        record("PAN-1", "Panadol", Some("Paracetamol")),
    ])
    .unwrap()
}

#[test]
fn test_three_char_miss_skips_partial() {
    let corpus = pharmacy_corpus();
    let result = Identifier::default().identify(&SearchQuery::new("qqq"), &corpus);

    assert!(!result.is_match());
    let expected = vec![Strategy::Exact, Strategy::Fuzzy, Strategy::Contains];
    assert_eq!(strategies_tried(&result), expected);
    assert!(result
        .attempt_log
        .iter()
        .all(|a| a.outcome == AttemptOutcome::NoMatch));
}

#[test]
fn test_long_label_falls_through_to_partial() {
    init_tracing();
    let corpus = buried_brand_corpus();
    let result = Identifier::default().identify(&SearchQuery::new(BURIED_BRAND), &corpus);

    assert_eq!(result.record_id(), Some("PAN-1"));
    assert_eq!(result.strategy, Some(Strategy::Partial));
    let score = result.score.unwrap();
    assert!((score - 0.8).abs() < 1e-9, "partial score {}", score);

    let expected = vec![Strategy::Exact, Strategy::Fuzzy, Strategy::Partial];
    assert_eq!(strategies_tried(&result), expected);
    assert_eq!(result.attempt_log[1].outcome, AttemptOutcome::NoMatch);
}

#[test]
fn test_contains_after_partial_threshold() {
    let corpus = buried_brand_corpus();
    let config = MatchConfig {
        partial_threshold: 0.9,
        ..MatchConfig::default()
    };
    let identifier = Identifier::new(config).unwrap();
    let result = identifier.identify(&SearchQuery::new(BURIED_BRAND), &corpus);

    assert_eq!(result.record_id(), Some("PAN-1"));
    assert_eq!(result.strategy, Some(Strategy::Contains));
    assert_eq!(result.score, Some(1.0));

    let expected = vec![
        Strategy::Exact,
        Strategy::Fuzzy,
        Strategy::Partial,
        Strategy::Contains,
    ];
    assert_eq!(strategies_tried(&result), expected);
}

#[test]
fn test_exact_preempts_higher_ranked_fuzzy() {
    let corpus = Corpus::new(vec![
        record("IBU-F", "Ibuprofen Forte", None),
        record("IBU-1", "Ibuprofen", None),
    ])
    .unwrap();

    // Fuzzy alone ties both records and keeps the first
    let fuzzy = strategies::fuzzy_match("ibuprofen", &corpus, 0.6).unwrap();
    assert_eq!(fuzzy.index, 0);

    let result = Identifier::default().identify(&SearchQuery::new("ibuprofen"), &corpus);
    assert_eq!(result.record_id(), Some("IBU-1"));
    assert_eq!(result.strategy, Some(Strategy::Exact));
}

#[test]
fn test_duplicate_names_resolve_to_first_record() {
    let corpus = Corpus::new(vec![
        record("AMX-500", "Amoxil", None),
        record("AMX-250", "Amoxil", None),
    ])
    .unwrap();

    let result = Identifier::default().identify(&SearchQuery::new("Amoxil"), &corpus);
    assert_eq!(result.record_id(), Some("AMX-500"));
}

#[test]
fn test_alternative_query_after_primary() {
    let corpus = pharmacy_corpus();
    let query = SearchQuery::new("xx").with_alternatives(vec!["Zestril".to_string()]);

    let result = Identifier::default().identify(&query, &corpus);
    assert_eq!(result.record_id(), Some("LIS-1"));
    assert_eq!(result.candidate.as_deref(), Some("Zestril"));
}

#[test]
fn test_empty_corpus_never_matches() {
    let corpus = Corpus::new(Vec::new()).unwrap();
    let result = Identifier::default().identify(&SearchQuery::new("ibuprofen"), &corpus);

    assert!(!result.is_match());
    assert!(!result.attempt_log.is_empty());
}

#[test]
fn test_concurrent_identify() {
    let corpus = Arc::new(pharmacy_corpus());
    let identifier = Arc::new(Identifier::default());

    let handles: Vec<_> = ["ibuprofen", "ibuprofin", "Amoxicilin", "LISINOPRIL"]
        .into_iter()
        .map(|text| {
            let corpus = Arc::clone(&corpus);
            let identifier = Arc::clone(&identifier);
            thread::spawn(move || {
                let result = identifier.identify(&SearchQuery::new(text), &corpus);
                result.record_id().map(str::to_string)
            })
        })
        .collect();

    let ids: Vec<Option<String>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        ids,
        vec![
            Some("IBU-1".to_string()),
            Some("IBU-1".to_string()),
            Some("AMX-1".to_string()),
            Some("LIS-1".to_string()),
        ]
    );
}

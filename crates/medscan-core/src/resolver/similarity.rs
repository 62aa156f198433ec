//! String similarity functions used by the fuzzy strategy.
//!
//! All functions return a value in `[0.0, 1.0]` and count characters, not
//! bytes. Levenshtein and Jaro-Winkler are symmetric.

use strsim::{jaro, normalized_levenshtein};

/// Maximum common-prefix length rewarded by Jaro-Winkler.
const WINKLER_PREFIX_CAP: usize = 4;

/// Jaro-Winkler prefix scaling factor.
const WINKLER_SCALING: f64 = 0.1;

/// `1 - distance / max(len(a), len(b))`; two empty strings are identical.
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b)
}

/// Jaro similarity boosted by the length of the shared prefix (up to 4).
///
/// Unlike `strsim::jaro_winkler`, the boost is applied at every Jaro score,
/// not only above 0.7.
pub fn jaro_winkler_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    // Greedy Jaro matching depends on argument order in rare cases; fix it.
    let (a, b) = if a <= b { (a, b) } else { (b, a) };

    let sim = jaro(a, b);
    let prefix = a
        .chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count()
        .min(WINKLER_PREFIX_CAP);

    sim + WINKLER_SCALING * prefix as f64 * (1.0 - sim)
}

/// Fraction of query words that appear inside (or contain) some target word.
pub fn word_overlap_similarity(query: &str, target: &str) -> f64 {
    let query_words: Vec<&str> = query.split_whitespace().collect();
    if query_words.is_empty() {
        return 0.0;
    }
    let target_words: Vec<&str> = target.split_whitespace().collect();

    let matched = query_words
        .iter()
        .filter(|q| target_words.iter().any(|t| t.contains(*q) || q.contains(t)))
        .count();

    matched as f64 / query_words.len() as f64
}

/// The most lenient of the three metrics. Fuzzy matching deliberately
/// favours recall on noisy OCR text.
pub fn best_similarity(candidate: &str, field: &str) -> f64 {
    levenshtein_similarity(candidate, field)
        .max(jaro_winkler_similarity(candidate, field))
        .max(word_overlap_similarity(candidate, field))
}

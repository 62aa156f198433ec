//! Text normalizer.
//!
//! Handles:
//! - Noise stripping (anything but letters, digits, whitespace, `-` and `.`)
//! - Whitespace collapsing and trimming
//! - Lowercasing

/// Normalize raw text for matching.
///
/// Lowercasing happens first so that characters whose lowercase form expands
/// (e.g. `İ`) are filtered in their final shape, which keeps the function
/// idempotent.
pub fn normalize(raw: &str) -> String {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .map(|c| if is_kept(c) { c } else { ' ' })
        .collect();

    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn is_kept(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || c == '-' || c == '.'
}

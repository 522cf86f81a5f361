use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;

use super::normalize::normalize;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").unwrap());

/// Splits `text` on whitespace and punctuation, returning normalized tokens
/// in order of appearance.
pub fn tokenize(text: &str) -> Vec<String> {
    WORD_RE
        .find_iter(text)
        .map(|m| normalize(m.as_str()))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Like [`tokenize`], but drops tokens present in `stops` and tokens shorter
/// than `min_len` characters.
pub fn tokenize_with_stops(text: &str, stops: &HashSet<String>, min_len: usize) -> Vec<String> {
    tokenize(text)
        .into_iter()
        .filter(|t| t.chars().count() >= min_len && !stops.contains(t))
        .collect()
}

/// Counts occurrences of each token.
pub fn term_frequencies(tokens: &[String]) -> HashMap<String, usize> {
    let mut freqs = HashMap::new();
    for t in tokens {
        *freqs.entry(t.clone()).or_insert(0) += 1;
    }
    freqs
}

/// Keeps only tokens whose frequency falls within `[min, max]` (`max` optional).
pub fn filter_by_frequency(
    freqs: &HashMap<String, usize>,
    min: usize,
    max: Option<usize>,
) -> HashMap<String, usize> {
    freqs
        .iter()
        .filter(|(_, &count)| count >= min && max.map_or(true, |m| count <= m))
        .map(|(k, &v)| (k.clone(), v))
        .collect()
}

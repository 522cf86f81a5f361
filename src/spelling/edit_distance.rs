//! Dictionary + bounded-Levenshtein corrector (spec 4.C, priority 1).

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;

use super::{CancelToken, Corrector, CorrectorError, CorrectorOutcome};
use crate::text::normalize;

/// Edit-distance corrector over a fixed valid-word set and misspelling
/// table. Immutable after construction per the data-model lifecycle note.
pub struct EditDistanceCorrector {
    valid_words: HashSet<String>,
    misspellings: HashMap<String, String>,
    max_distance: usize,
}

impl EditDistanceCorrector {
    pub fn new(valid_words: HashSet<String>, misspellings: HashMap<String, String>) -> Self {
        Self::with_max_distance(valid_words, misspellings, 2)
    }

    pub fn with_max_distance(
        valid_words: HashSet<String>,
        misspellings: HashMap<String, String>,
        max_distance: usize,
    ) -> Self {
        Self {
            valid_words,
            misspellings,
            max_distance,
        }
    }

    pub fn valid_words(&self) -> &HashSet<String> {
        &self.valid_words
    }

    /// Resolves a single normalized token. Tries membership, then the
    /// misspelling table, then a bounded Levenshtein search over `V` with
    /// tie-break: minimum distance, then maximum target length.
    fn correct_token(&self, token: &str) -> String {
        if self.valid_words.contains(token) {
            return token.to_string();
        }
        if let Some(canonical) = self.misspellings.get(token) {
            return canonical.clone();
        }

        let mut best: Option<(&str, usize)> = None;
        for candidate in &self.valid_words {
            let dist = levenshtein(token, candidate);
            if dist > self.max_distance {
                continue;
            }
            best = match best {
                None => Some((candidate.as_str(), dist)),
                Some((best_word, best_dist)) => {
                    if dist < best_dist
                        || (dist == best_dist && candidate.chars().count() > best_word.chars().count())
                    {
                        Some((candidate.as_str(), dist))
                    } else {
                        Some((best_word, best_dist))
                    }
                }
            };
        }

        best.map(|(w, _)| w.to_string()).unwrap_or_else(|| token.to_string())
    }
}

/// Levenshtein distance with unit insert/delete/substitute costs, computed
/// with a two-row rolling buffer.
pub fn levenshtein(s: &str, t: &str) -> usize {
    let s: Vec<char> = s.chars().collect();
    let t: Vec<char> = t.chars().collect();

    let mut prev: Vec<usize> = (0..=t.len()).collect();
    let mut curr = vec![0usize; t.len() + 1];

    for i in 1..=s.len() {
        curr[0] = i;
        for j in 1..=t.len() {
            let cost = if s[i - 1] == t[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[t.len()]
}

#[async_trait]
impl Corrector for EditDistanceCorrector {
    fn priority(&self) -> i32 {
        1
    }

    fn name(&self) -> &str {
        "EditDistance"
    }

    async fn try_correct(
        &self,
        query: &str,
        cancel: &CancelToken,
        _deadline: Option<Duration>,
    ) -> Result<CorrectorOutcome, CorrectorError> {
        if cancel.is_cancelled() {
            return Err(CorrectorError::Cancelled);
        }

        let tokens: Vec<&str> = query.split_whitespace().collect();
        if tokens.is_empty() {
            return Ok(CorrectorOutcome::unchanged(self.name(), query));
        }

        let normalized_tokens: Vec<String> = tokens.iter().map(|t| normalize(t)).collect();
        let corrected_tokens: Vec<String> = normalized_tokens
            .iter()
            .map(|t| self.correct_token(t))
            .collect();
        let normalized = normalized_tokens.join(" ");
        let corrected = corrected_tokens.join(" ");

        if normalized == corrected {
            Ok(CorrectorOutcome::unchanged(self.name(), query))
        } else {
            Ok(CorrectorOutcome::changed(self.name(), query, &corrected))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> HashSet<String> {
        ["путин", "москва", "россия"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn levenshtein_matches_known_distances() {
        assert_eq!(levenshtein("путин", "путин"), 0);
        assert_eq!(levenshtein("путен", "путин"), 1);
        assert_eq!(levenshtein("", "abc"), 3);
    }

    #[tokio::test]
    async fn corrects_a_single_typo() {
        let corrector = EditDistanceCorrector::new(dictionary(), HashMap::new());
        let outcome = corrector
            .try_correct("путен", &CancelToken::new(), None)
            .await
            .unwrap();
        assert_eq!(outcome.corrected, "путин");
        assert!(outcome.has_correction);
    }

    #[tokio::test]
    async fn passes_through_valid_words_unchanged() {
        let corrector = EditDistanceCorrector::new(dictionary(), HashMap::new());
        let outcome = corrector
            .try_correct("москва", &CancelToken::new(), None)
            .await
            .unwrap();
        assert_eq!(outcome.corrected, "москва");
        assert!(!outcome.has_correction);
    }

    #[tokio::test]
    async fn misspelling_table_takes_precedence_over_search() {
        let mut misspellings = HashMap::new();
        misspellings.insert("масков".to_string(), "москва".to_string());
        let corrector = EditDistanceCorrector::new(dictionary(), misspellings);
        let outcome = corrector
            .try_correct("масков", &CancelToken::new(), None)
            .await
            .unwrap();
        assert_eq!(outcome.corrected, "москва");
    }

    #[tokio::test]
    async fn ties_break_toward_longer_target() {
        let mut words = HashSet::new();
        // Both are distance 1 from "кот": "кола" via substitution, "кота"
        // via a trailing insertion — tie-break picks the longer target.
        words.insert("кол".to_string());
        words.insert("кота".to_string());
        let corrector = EditDistanceCorrector::new(words, HashMap::new());
        let outcome = corrector
            .try_correct("кот", &CancelToken::new(), None)
            .await
            .unwrap();
        assert_eq!(outcome.corrected, "кота");
    }

    #[tokio::test]
    async fn punctuation_only_normalization_is_not_reported_as_a_correction() {
        let corrector = EditDistanceCorrector::new(dictionary(), HashMap::new());
        let outcome = corrector
            .try_correct("Москва, Россия", &CancelToken::new(), None)
            .await
            .unwrap();
        assert_eq!(outcome.corrected, "москва россия");
        assert!(!outcome.has_correction);
    }

    #[tokio::test]
    async fn empty_query_bypasses_correction() {
        let corrector = EditDistanceCorrector::new(dictionary(), HashMap::new());
        let outcome = corrector
            .try_correct("", &CancelToken::new(), None)
            .await
            .unwrap();
        assert!(!outcome.has_correction);
    }
}

//! Russian Soundex-like phonetic corrector (spec 4.E, priority 3).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::{CancelToken, Corrector, CorrectorError, CorrectorOutcome};
use crate::text::normalize;

const CODE_WIDTH: usize = 4;

/// Digit class for a consonant; `None` for vowels, `й`, and soft/hard signs
/// (the latter two are dropped entirely rather than mapped).
fn digit_for(ch: char) -> Option<char> {
    match ch {
        'б' | 'п' => Some('1'),
        'в' | 'ф' => Some('2'),
        'г' | 'к' | 'х' => Some('3'),
        'д' | 'т' => Some('4'),
        'ж' | 'ш' | 'щ' | 'ч' => Some('5'),
        'з' | 'с' | 'ц' => Some('6'),
        'л' => Some('7'),
        'м' | 'н' => Some('8'),
        'р' => Some('9'),
        _ => None,
    }
}

/// Computes the fixed-width phonetic code for a single (already normalized)
/// token: first character kept literally, subsequent consonants mapped to
/// digit classes with adjacent duplicates collapsed, soft/hard signs
/// dropped, and the digit suffix padded or truncated to [`CODE_WIDTH`].
pub fn phonetic_code(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.is_empty() {
        return String::new();
    }

    let mut digits = String::new();
    let mut last_digit: Option<char> = None;

    for &ch in &chars[1..] {
        if ch == 'ь' || ch == 'ъ' {
            continue;
        }
        match digit_for(ch) {
            Some(d) => {
                if last_digit != Some(d) {
                    digits.push(d);
                }
                last_digit = Some(d);
            }
            None => last_digit = None,
        }
    }

    digits.truncate(CODE_WIDTH);
    while digits.chars().count() < CODE_WIDTH {
        digits.push('0');
    }

    let mut code = String::new();
    code.push(chars[0]);
    code.push_str(&digits);
    code
}

/// Phonetic corrector keyed by a preloaded `code -> ordered candidates` map.
pub struct PhoneticCorrector {
    table: HashMap<String, Vec<String>>,
}

impl PhoneticCorrector {
    pub fn new(table: HashMap<String, Vec<String>>) -> Self {
        Self { table }
    }

    /// Builds the phonetic table from a flat word list, grouping by code and
    /// ordering candidates lexicographically within each group for
    /// deterministic lookups.
    pub fn from_word_list<I: IntoIterator<Item = String>>(words: I) -> Self {
        let mut table: HashMap<String, Vec<String>> = HashMap::new();
        for word in words {
            let code = phonetic_code(&word);
            table.entry(code).or_default().push(word);
        }
        for candidates in table.values_mut() {
            candidates.sort();
            candidates.dedup();
        }
        Self { table }
    }

    fn correct_token(&self, token: &str) -> String {
        let code = phonetic_code(token);
        match self.table.get(&code) {
            Some(candidates) => candidates
                .iter()
                .find(|c| c.as_str() != token)
                .cloned()
                .unwrap_or_else(|| token.to_string()),
            None => token.to_string(),
        }
    }
}

#[async_trait]
impl Corrector for PhoneticCorrector {
    fn priority(&self) -> i32 {
        3
    }

    fn name(&self) -> &str {
        "Phonetic"
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

    #[test]
    fn same_phonetic_class_yields_equal_codes() {
        // "масква" and "москва" differ only in a vowel between identical
        // consonant skeletons, so their codes must collide.
        assert_eq!(phonetic_code("масква"), phonetic_code("москва"));
    }

    #[test]
    fn code_is_fixed_width() {
        assert_eq!(phonetic_code("москва").chars().count(), 1 + CODE_WIDTH);
        assert_eq!(phonetic_code("да").chars().count(), 1 + CODE_WIDTH);
    }

    #[tokio::test]
    async fn corrects_a_phonetic_misspelling() {
        let corrector = PhoneticCorrector::from_word_list(
            ["москва", "россия"].iter().map(|s| s.to_string()),
        );
        let outcome = corrector
            .try_correct("масква", &CancelToken::new(), None)
            .await
            .unwrap();
        assert_eq!(outcome.corrected, "москва");
    }

    #[tokio::test]
    async fn passes_through_when_no_candidate_differs() {
        let corrector =
            PhoneticCorrector::from_word_list(["москва"].iter().map(|s| s.to_string()));
        let outcome = corrector
            .try_correct("москва", &CancelToken::new(), None)
            .await
            .unwrap();
        assert!(!outcome.has_correction);
    }

    #[tokio::test]
    async fn punctuation_only_normalization_is_not_reported_as_a_correction() {
        let corrector =
            PhoneticCorrector::from_word_list(["москва"].iter().map(|s| s.to_string()));
        let outcome = corrector
            .try_correct("Москва!", &CancelToken::new(), None)
            .await
            .unwrap();
        assert_eq!(outcome.corrected, "москва");
        assert!(!outcome.has_correction);
    }
}

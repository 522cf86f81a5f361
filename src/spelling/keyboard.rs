//! Keyboard-layout mis-typing corrector (spec 4.D, priority 2).
//!
//! Transliterates a token typed on the wrong physical layout (Latin keys
//! while intending Cyrillic, or vice versa) by mapping each character to the
//! glyph that shares its keyboard position on a standard ЙЦУКЕН/QWERTY pair.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use once_cell::sync::Lazy;

use super::{CancelToken, Corrector, CorrectorError, CorrectorOutcome};
use crate::text::normalize;

/// Position-for-position QWERTY -> ЙЦУКЕН map (lowercase only; the corrector
/// normalizes input before translating).
static QWERTY_TO_YCUKEN: Lazy<HashMap<char, char>> = Lazy::new(|| {
    let qwerty = "`qwertyuiop[]asdfghjkl;'zxcvbnm,.";
    let ycuken = "ёйцукенгшщзхъфывапролджэячсмитьбю";
    qwerty.chars().zip(ycuken.chars()).collect()
});

static YCUKEN_TO_QWERTY: Lazy<HashMap<char, char>> =
    Lazy::new(|| QWERTY_TO_YCUKEN.iter().map(|(&q, &y)| (y, q)).collect());

fn translate(token: &str, map: &HashMap<char, char>) -> Option<String> {
    let mut out = String::with_capacity(token.len());
    for ch in token.chars() {
        out.push(*map.get(&ch)?);
    }
    Some(out)
}

/// Corrects tokens typed entirely on the wrong keyboard layout, provided the
/// transliteration lands in a known valid-word set.
pub struct KeyboardLayoutCorrector {
    valid_words: HashSet<String>,
}

impl KeyboardLayoutCorrector {
    pub fn new(valid_words: HashSet<String>) -> Self {
        Self { valid_words }
    }

    fn is_latin_token(token: &str) -> bool {
        !token.is_empty() && token.chars().all(|c| c.is_ascii_alphabetic())
    }

    fn is_cyrillic_token(token: &str) -> bool {
        !token.is_empty() && token.chars().all(|c| ('а'..='я').contains(&c) || c == 'ё')
    }

    fn correct_token(&self, token: &str) -> String {
        if Self::is_latin_token(token) {
            if let Some(translit) = translate(token, &QWERTY_TO_YCUKEN) {
                if self.valid_words.contains(&translit) {
                    return translit;
                }
            }
        } else if Self::is_cyrillic_token(token) {
            if let Some(translit) = translate(token, &YCUKEN_TO_QWERTY) {
                if self.valid_words.contains(&translit) {
                    return translit;
                }
            }
        }
        token.to_string()
    }
}

#[async_trait]
impl Corrector for KeyboardLayoutCorrector {
    fn priority(&self) -> i32 {
        2
    }

    fn name(&self) -> &str {
        "KeyboardLayout"
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

    #[tokio::test]
    async fn fixes_a_latin_typed_russian_word() {
        let mut valid = HashSet::new();
        valid.insert("привет".to_string());
        let corrector = KeyboardLayoutCorrector::new(valid);
        // "привет" typed with the Latin keys in the same physical positions.
        let mistyped = translate("привет", &YCUKEN_TO_QWERTY).unwrap();
        let outcome = corrector
            .try_correct(&mistyped, &CancelToken::new(), None)
            .await
            .unwrap();
        assert_eq!(outcome.corrected, "привет");
    }

    #[tokio::test]
    async fn passes_through_when_transliteration_is_unknown() {
        let corrector = KeyboardLayoutCorrector::new(HashSet::new());
        let outcome = corrector
            .try_correct("hello", &CancelToken::new(), None)
            .await
            .unwrap();
        assert_eq!(outcome.corrected, "hello");
        assert!(!outcome.has_correction);
    }

    #[tokio::test]
    async fn punctuation_only_normalization_is_not_reported_as_a_correction() {
        let corrector = KeyboardLayoutCorrector::new(HashSet::new());
        let outcome = corrector
            .try_correct("Hello, World!", &CancelToken::new(), None)
            .await
            .unwrap();
        assert_eq!(outcome.corrected, "hello world");
        assert!(!outcome.has_correction);
    }
}

//! Mining configuration record (spec 4.I input).

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

fn default_min_similarity() -> f64 {
    0.25
}
fn default_min_co_occurrence() -> usize {
    2
}
fn default_min_word_length() -> usize {
    3
}
fn default_max_word_length() -> usize {
    30
}
fn default_true() -> bool {
    true
}
fn default_title_weight() -> f64 {
    2.0
}
fn default_max_synonyms_per_word() -> usize {
    15
}
fn default_min_word_frequency() -> usize {
    2
}
fn default_min_proper_noun_occurrences() -> usize {
    5
}
fn default_proper_noun_capitalization_threshold() -> f64 {
    0.8
}
fn default_min_compound_occurrences() -> usize {
    3
}
fn default_morphological_similarity_threshold() -> f64 {
    0.78
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MiningOptions {
    pub min_similarity: f64,
    pub min_co_occurrence: usize,
    pub min_word_length: usize,
    pub max_word_length: usize,
    pub use_titles: bool,
    pub use_content: bool,
    pub title_weight: f64,
    pub max_synonyms_per_word: usize,
    pub min_word_frequency: usize,
    pub max_word_frequency: Option<usize>,
    pub excluded_words: HashSet<String>,
    pub forbidden_words: HashSet<String>,
    pub exclude_proper_nouns: bool,
    pub min_proper_noun_occurrences: usize,
    pub proper_noun_capitalization_threshold: f64,
    pub exclude_compound_terms: bool,
    pub min_compound_occurrences: usize,
    pub morphological_similarity_threshold: f64,
}

impl Default for MiningOptions {
    fn default() -> Self {
        Self {
            min_similarity: default_min_similarity(),
            min_co_occurrence: default_min_co_occurrence(),
            min_word_length: default_min_word_length(),
            max_word_length: default_max_word_length(),
            use_titles: default_true(),
            use_content: default_true(),
            title_weight: default_title_weight(),
            max_synonyms_per_word: default_max_synonyms_per_word(),
            min_word_frequency: default_min_word_frequency(),
            max_word_frequency: None,
            excluded_words: HashSet::new(),
            forbidden_words: HashSet::new(),
            exclude_proper_nouns: default_true(),
            min_proper_noun_occurrences: default_min_proper_noun_occurrences(),
            proper_noun_capitalization_threshold: default_proper_noun_capitalization_threshold(),
            exclude_compound_terms: default_true(),
            min_compound_occurrences: default_min_compound_occurrences(),
            morphological_similarity_threshold: default_morphological_similarity_threshold(),
        }
    }
}

/// One source article: title and body content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub content: String,
}

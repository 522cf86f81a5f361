//! Offline co-occurrence synonym miner (spec 4.I).

mod options;
mod union_find;

pub use options::{Article, MiningOptions};

use std::collections::{HashMap, HashSet};

use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rayon::prelude::*;
use thiserror::Error;

use crate::synonyms::{MiningStatistics, SynonymFile};
use crate::text::{normalize, russian_stopwords};
use union_find::UnionFind;

#[derive(Debug, Error)]
pub enum MiningError {
    #[error("failed to read corpus: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse corpus: {0}")]
    Parse(String),
}

/// `(w1, w2, jaccard, cosine, co_occurrence, freq1, freq2)` (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub struct WordSimilarity {
    pub w1: String,
    pub w2: String,
    pub jaccard: f64,
    pub cosine: f64,
    pub co_occurrence: usize,
    pub freq1: usize,
    pub freq2: usize,
}

/// The full output of one mining run: a symmetric adjacency map ready for
/// [`crate::synonyms::SynonymProvider::load_from_data`], per-word confidence
/// scores, and run statistics.
#[derive(Debug, Clone)]
pub struct MiningResult {
    pub adjacency: HashMap<String, HashSet<String>>,
    pub confidence_scores: HashMap<String, f64>,
    pub statistics: MiningStatistics,
}

impl MiningResult {
    /// Packages this run into the on-disk format (spec 4.J), ready to be
    /// handed to `SynonymProvider::load_from_data` or written directly.
    pub fn into_synonym_file(self) -> SynonymFile {
        SynonymFile {
            synonyms: self
                .adjacency
                .into_iter()
                .map(|(k, v)| (k, v.into_iter().collect()))
                .collect(),
            last_updated: chrono::Utc::now(),
            total_groups: 0,
            confidence_scores: self.confidence_scores,
            statistics: Some(self.statistics),
        }
    }
}

/// Reads a JSON array of [`Article`] values from `path`. Corpus-level I/O or
/// parse failures surface as [`MiningError`]; per-article content quality
/// issues do not (the mining pipeline itself never errors).
pub fn load_corpus(path: &std::path::Path) -> Result<Vec<Article>, MiningError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| MiningError::Parse(e.to_string()))
}

/// Runs the full mining pipeline over `articles`. Never errors — an empty
/// corpus yields an empty graph (spec §4.I failure semantics); per-article
/// content is treated as plain text, so there is nothing here that can fail
/// to "parse" (corpus-level I/O errors are the caller's concern, surfaced by
/// [`load_corpus`]).
pub fn mine(articles: &[Article], options: &MiningOptions) -> MiningResult {
    if articles.is_empty() {
        return MiningResult {
            adjacency: HashMap::new(),
            confidence_scores: HashMap::new(),
            statistics: MiningStatistics::default(),
        };
    }

    let stopwords = russian_stopwords();

    // --- Step 1: frequency pass -------------------------------------------------
    let mut raw_tokens_per_article: Vec<Vec<(String, bool)>> = Vec::with_capacity(articles.len());
    let mut global_counts: HashMap<String, usize> = HashMap::new();
    let mut uppercase_counts: HashMap<String, usize> = HashMap::new();

    for article in articles {
        let mut text = String::new();
        if options.use_titles {
            text.push_str(&article.title);
            text.push(' ');
        }
        if options.use_content {
            text.push_str(&article.content);
        }

        let raw_words = raw_words(&text);
        let mut tagged = Vec::with_capacity(raw_words.len());
        for raw in raw_words {
            let token = normalize(&raw);
            if token.is_empty() {
                continue;
            }
            let starts_uppercase = raw.chars().next().map_or(false, |c| c.is_uppercase());
            *global_counts.entry(token.clone()).or_insert(0) += 1;
            if starts_uppercase {
                *uppercase_counts.entry(token.clone()).or_insert(0) += 1;
            }
            tagged.push((token, starts_uppercase));
        }
        raw_tokens_per_article.push(tagged);
    }

    let mut vocabulary: HashSet<String> = global_counts
        .iter()
        .filter(|(token, &count)| {
            let len = token.chars().count();
            len >= options.min_word_length
                && len <= options.max_word_length
                && !stopwords.contains(*token)
                && count >= options.min_word_frequency
                && options.max_word_frequency.map_or(true, |max| count <= max)
                && !options.excluded_words.contains(*token)
                && !options.forbidden_words.contains(*token)
        })
        .map(|(token, _)| token.clone())
        .collect();

    // --- Step 2: proper-noun filter ----------------------------------------------
    if options.exclude_proper_nouns {
        vocabulary.retain(|token| {
            let total = *global_counts.get(token).unwrap_or(&0);
            let upper = *uppercase_counts.get(token).unwrap_or(&0);
            if total == 0 {
                return true;
            }
            let ratio = upper as f64 / total as f64;
            !(ratio > options.proper_noun_capitalization_threshold
                && upper > options.min_proper_noun_occurrences)
        });
    }

    // --- Step 3: compound-term filter --------------------------------------------
    let mut compound_pairs: HashSet<(String, String)> = HashSet::new();
    if options.exclude_compound_terms {
        let mut bigram_counts: HashMap<(String, String), usize> = HashMap::new();
        for tagged in &raw_tokens_per_article {
            let tokens: Vec<&str> = tagged
                .iter()
                .map(|(t, _)| t.as_str())
                .filter(|t| vocabulary.contains(*t))
                .collect();
            for window in tokens.windows(2) {
                let pair = sorted_pair(window[0], window[1]);
                *bigram_counts.entry(pair).or_insert(0) += 1;
            }
        }
        for (pair, count) in bigram_counts {
            if count >= options.min_compound_occurrences {
                compound_pairs.insert(pair);
            }
        }
    }

    // --- Step 4: inverted index ---------------------------------------------------
    let mut postings: HashMap<String, HashSet<usize>> = HashMap::new();
    for (doc_id, tagged) in raw_tokens_per_article.iter().enumerate() {
        for (token, _) in tagged {
            if vocabulary.contains(token) {
                postings.entry(token.clone()).or_default().insert(doc_id);
            }
        }
    }

    let mut words: Vec<String> = postings
        .iter()
        .filter(|(_, docs)| docs.len() >= options.min_co_occurrence)
        .map(|(w, _)| w.clone())
        .collect();
    words.sort();

    // --- Step 5: pairwise similarity (parallel over the outer index) ------------
    let progress = ProgressBar::new(words.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("mining similarity [{bar:40.cyan/blue}] {pos}/{len} ({percent}%)")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let normal_pairs: Vec<WordSimilarity> = words
        .par_iter()
        .enumerate()
        .flat_map_iter(|(i, w1)| {
            let p1 = &postings[w1];
            let mut local = Vec::new();
            for w2 in &words[i + 1..] {
                let p2 = &postings[w2];
                let intersection = p1.intersection(p2).count();
                if intersection == 0 {
                    continue;
                }
                let union = p1.len() + p2.len() - intersection;
                let jaccard = intersection as f64 / union as f64;
                if jaccard < options.min_similarity || intersection < options.min_co_occurrence {
                    continue;
                }
                if compound_pairs.contains(&sorted_pair(w1, w2)) {
                    continue;
                }
                let cosine = intersection as f64 / ((p1.len() as f64).sqrt() * (p2.len() as f64).sqrt());
                local.push(WordSimilarity {
                    w1: w1.clone(),
                    w2: w2.clone(),
                    jaccard,
                    cosine,
                    co_occurrence: intersection,
                    freq1: p1.len(),
                    freq2: p2.len(),
                });
            }
            progress.inc(1);
            local
        })
        .collect();
    progress.finish_and_clear();
    info!("mining: {} similarity pairs survived filtering", normal_pairs.len());

    // --- Step 6: morphological near-duplicate filter -----------------------------
    // Open question §9.1: pairs that exceed the morphological threshold are
    // treated as spelling variants of the same lemma. They are unioned into
    // the same synonym component but are not recorded as independent
    // similarity pairs — they don't contribute to the reported statistics.
    let mut grouping = UnionFind::new();
    let mut kept_pairs: Vec<WordSimilarity> = Vec::new();

    for pair in normal_pairs {
        let morph_similarity = morphological_similarity(&pair.w1, &pair.w2);
        if morph_similarity > options.morphological_similarity_threshold {
            grouping.union(&pair.w1, &pair.w2);
            continue;
        }
        kept_pairs.push(pair);
    }

    // --- Step 7: per-word capping --------------------------------------------------
    let mut by_word: HashMap<String, Vec<WordSimilarity>> = HashMap::new();
    for pair in kept_pairs {
        by_word.entry(pair.w1.clone()).or_default().push(pair.clone());
        by_word.entry(pair.w2.clone()).or_default().push(pair);
    }

    let mut surviving_edges: HashMap<(String, String), f64> = HashMap::new();
    let mut confidence_scores: HashMap<String, f64> = HashMap::new();

    for (word, mut partners) in by_word {
        partners.sort_by(|a, b| b.jaccard.partial_cmp(&a.jaccard).unwrap_or(std::cmp::Ordering::Equal));
        partners.truncate(options.max_synonyms_per_word);
        if let Some(best) = partners.first() {
            confidence_scores.insert(word.clone(), best.jaccard);
        }
        for partner in partners {
            let other = if partner.w1 == word { partner.w2.clone() } else { partner.w1.clone() };
            surviving_edges.insert(sorted_pair(&word, &other), partner.jaccard);
        }
    }
    let all_jaccards: Vec<f64> = surviving_edges.values().cloned().collect();

    // --- Step 8: grouping -----------------------------------------------------------
    for (a, b) in surviving_edges.keys() {
        grouping.union(a, b);
    }

    let mut adjacency: HashMap<String, HashSet<String>> = HashMap::new();
    for component in grouping.components() {
        if component.len() < 2 {
            continue;
        }
        for member in &component {
            let neighbors: HashSet<String> = component
                .iter()
                .filter(|&m| m != member)
                .cloned()
                .collect();
            adjacency.insert(member.clone(), neighbors);
        }
    }

    // --- Step 9: statistics -----------------------------------------------------------
    let statistics = MiningStatistics {
        total_words: vocabulary.len(),
        total_pairs: all_jaccards.len(),
        min_similarity: all_jaccards.iter().cloned().fold(f64::INFINITY, f64::min),
        avg_similarity: if all_jaccards.is_empty() {
            0.0
        } else {
            all_jaccards.iter().sum::<f64>() / all_jaccards.len() as f64
        },
        max_similarity: all_jaccards.iter().cloned().fold(0.0, f64::max),
        articles_analyzed: articles.len(),
    };
    let statistics = MiningStatistics {
        min_similarity: if all_jaccards.is_empty() { 0.0 } else { statistics.min_similarity },
        ..statistics
    };

    MiningResult {
        adjacency,
        confidence_scores,
        statistics,
    }
}

fn sorted_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// 1 minus normalized Levenshtein distance — a cheap morphological-similarity
/// proxy for catching inflectional variants of the same stem.
fn morphological_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    let distance = crate::spelling::levenshtein(a, b);
    1.0 - (distance as f64 / max_len as f64)
}

/// Extracts raw (case-preserved) word substrings — used instead of a
/// normalizing tokenizer where original casing matters (proper-noun
/// detection relies on the first letter's case before folding).
fn raw_words(text: &str) -> Vec<String> {
    use once_cell::sync::Lazy;
    use regex::Regex;
    static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\p{L}\p{N}]+").unwrap());
    WORD_RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

//! Confidence-gated, normalized bidirectional synonym graph (spec 4.H).

mod persistence;

pub use persistence::{MiningStatistics, SynonymFile};

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;
use std::sync::RwLock;

use chrono::Utc;
use indexmap::IndexSet;
use log::warn;
use thiserror::Error;

use crate::text::normalize;

#[derive(Debug, Error)]
pub enum SynonymError {
    #[error("persistence failure: {0}")]
    PersistenceFailure(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

struct GraphState {
    adjacency: HashMap<String, HashSet<String>>,
    confidence_scores: HashMap<String, f64>,
    statistics: Option<MiningStatistics>,
}

impl GraphState {
    fn empty() -> Self {
        Self {
            adjacency: HashMap::new(),
            confidence_scores: HashMap::new(),
            statistics: None,
        }
    }

    fn passes(&self, token: &str, min_conf: f64) -> bool {
        self.confidence_scores
            .get(token)
            .map_or(true, |score| *score >= min_conf)
    }
}

/// Normalized, undirected synonym graph with a per-token confidence gate.
pub struct SynonymProvider {
    state: RwLock<GraphState>,
    min_confidence: RwLock<f64>,
}

impl Default for SynonymProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SynonymProvider {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(GraphState::empty()),
            min_confidence: RwLock::new(0.0),
        }
    }

    /// Reads a persisted dictionary from `path`. A missing or malformed file
    /// falls back to an empty graph with a warning rather than an error —
    /// only write failures propagate (spec §7).
    pub fn load(&self, path: &Path) -> Result<(), SynonymError> {
        let data = match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str::<SynonymFile>(&contents) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("synonym file at {} is malformed ({e}), starting empty", path.display());
                    SynonymFile::default()
                }
            },
            Err(e) => {
                warn!("synonym file at {} unreadable ({e}), starting empty", path.display());
                SynonymFile::default()
            }
        };
        self.load_from_data(data);
        Ok(())
    }

    /// Loads from an in-memory document: normalizes keys/values, drops
    /// self-synonyms, and clamps confidences to `[0,1]`.
    pub fn load_from_data(&self, data: SynonymFile) {
        let mut adjacency: HashMap<String, HashSet<String>> = HashMap::new();
        for (raw_key, raw_values) in data.synonyms {
            let key = normalize(&raw_key);
            if key.is_empty() {
                continue;
            }
            adjacency.entry(key.clone()).or_default();
            for raw_value in raw_values {
                let value = normalize(&raw_value);
                if value.is_empty() || value == key {
                    continue;
                }
                adjacency.entry(key.clone()).or_default().insert(value.clone());
                adjacency.entry(value).or_default().insert(key.clone());
            }
        }

        let confidence_scores = data
            .confidence_scores
            .into_iter()
            .map(|(k, v)| (normalize(&k), v.clamp(0.0, 1.0)))
            .filter(|(k, _)| !k.is_empty())
            .collect();

        let mut state = self.state.write().unwrap();
        *state = GraphState {
            adjacency,
            confidence_scores,
            statistics: data.statistics,
        };
    }

    /// Writes the current graph to `path`, creating parent directories as
    /// needed and pretty-printing with non-ASCII letters left literal.
    pub fn save(&self, path: &Path) -> Result<(), SynonymError> {
        let state = self.state.read().unwrap();

        let synonyms = state
            .adjacency
            .iter()
            .map(|(k, v)| (k.clone(), v.iter().cloned().collect::<Vec<_>>()))
            .collect();

        let file = SynonymFile {
            synonyms,
            last_updated: Utc::now(),
            total_groups: Self::connected_components(&state.adjacency, |_| true).len(),
            confidence_scores: state.confidence_scores.clone(),
            statistics: state.statistics.clone(),
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| SynonymError::PersistenceFailure(e.to_string()))?;
            }
        }

        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| SynonymError::PersistenceFailure(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| SynonymError::PersistenceFailure(e.to_string()))?;

        Ok(())
    }

    fn effective_threshold(&self, min_conf: Option<f64>) -> f64 {
        min_conf.unwrap_or_else(|| *self.min_confidence.read().unwrap())
    }

    /// Returns the synonyms of `word` whose confidence (and `word`'s own)
    /// meets the threshold. Unknown words yield an empty set.
    pub fn get_synonyms(&self, word: &str, min_conf: Option<f64>) -> HashSet<String> {
        let threshold = self.effective_threshold(min_conf);
        let key = normalize(word);
        let state = self.state.read().unwrap();

        if !state.passes(&key, threshold) {
            return HashSet::new();
        }

        state
            .adjacency
            .get(&key)
            .map(|neighbors| {
                neighbors
                    .iter()
                    .filter(|n| state.passes(n, threshold))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn has_synonyms(&self, word: &str, min_conf: Option<f64>) -> bool {
        !self.get_synonyms(word, min_conf).is_empty()
    }

    /// Tokenizes `query` on ASCII whitespace/tab, normalizes each token, and
    /// returns the union of the original tokens and their thresholded
    /// synonyms in insertion order (deterministic for a fixed input, but not
    /// otherwise specified — spec §9).
    pub fn expand_query(&self, query: &str, min_conf: Option<f64>) -> String {
        let mut union: IndexSet<String> = IndexSet::new();

        for raw_token in query.split(|c: char| c == ' ' || c == '\t') {
            if raw_token.is_empty() {
                continue;
            }
            let token = normalize(raw_token);
            if token.is_empty() {
                continue;
            }
            union.insert(token.clone());
            for synonym in self.get_synonyms(&token, min_conf) {
                union.insert(synonym);
            }
        }

        union.into_iter().collect::<Vec<_>>().join(" ")
    }

    /// Normalizes `words`, requires at least two distinct survivors, and
    /// adds all pairwise edges. Touched tokens lose any stored confidence
    /// score — a manually added group is unscored and therefore passes the
    /// gate unconditionally (absence ⇒ passing).
    pub fn add_group(&self, words: &[&str]) -> Result<(), SynonymError> {
        let normalized: IndexSet<String> = words
            .iter()
            .map(|w| normalize(w))
            .filter(|w| !w.is_empty())
            .collect();

        if normalized.len() < 2 {
            return Err(SynonymError::InvalidInput(
                "add_group requires at least two distinct normalized words".to_string(),
            ));
        }

        let mut state = self.state.write().unwrap();
        for a in &normalized {
            state.confidence_scores.remove(a);
            for b in &normalized {
                if a == b {
                    continue;
                }
                state.adjacency.entry(a.clone()).or_default().insert(b.clone());
            }
        }

        Ok(())
    }

    /// Connected components of the graph restricted to nodes passing
    /// `filter`, computed by breadth-first traversal.
    fn connected_components(
        adjacency: &HashMap<String, HashSet<String>>,
        filter: impl Fn(&str) -> bool,
    ) -> Vec<HashSet<String>> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut components = Vec::new();

        let mut nodes: Vec<&String> = adjacency.keys().collect();
        nodes.sort();

        for start in nodes {
            if visited.contains(start.as_str()) || !filter(start) {
                continue;
            }
            let mut component = HashSet::new();
            let mut queue = VecDeque::new();
            queue.push_back(start.as_str());
            visited.insert(start.as_str());

            while let Some(node) = queue.pop_front() {
                component.insert(node.to_string());
                if let Some(neighbors) = adjacency.get(node) {
                    let mut sorted_neighbors: Vec<&String> = neighbors.iter().collect();
                    sorted_neighbors.sort();
                    for neighbor in sorted_neighbors {
                        if filter(neighbor) && !visited.contains(neighbor.as_str()) {
                            visited.insert(neighbor.as_str());
                            queue.push_back(neighbor.as_str());
                        }
                    }
                }
            }

            components.push(component);
        }

        components
    }

    /// Connected components restricted to nodes passing the confidence gate.
    pub fn groups(&self, min_conf: Option<f64>) -> Vec<HashSet<String>> {
        let threshold = self.effective_threshold(min_conf);
        let state = self.state.read().unwrap();
        Self::connected_components(&state.adjacency, |node| state.passes(node, threshold))
    }

    /// For each component of size ≥ 2, emits `"a, b, c"` — deduplicated
    /// (case-insensitive, though tokens are already normalized) and sorted
    /// lexicographically. Components with identical signatures collapse to
    /// one rule.
    pub fn build_index_rules(&self, min_conf: Option<f64>) -> Vec<String> {
        let mut signatures: IndexSet<String> = IndexSet::new();

        for component in self.groups(min_conf) {
            if component.len() < 2 {
                continue;
            }
            let mut members: Vec<String> = component.into_iter().collect();
            members.sort();
            members.dedup();
            signatures.insert(members.join(", "));
        }

        let mut rules: Vec<String> = signatures.into_iter().collect();
        rules.sort();
        rules
    }

    pub fn set_min_confidence(&self, v: f64) {
        *self.min_confidence.write().unwrap() = v.clamp(0.0, 1.0);
    }
}

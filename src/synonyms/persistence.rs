//! On-disk synonym dictionary format (spec 4.J).

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MiningStatistics {
    #[serde(rename = "totalWords", default)]
    pub total_words: usize,
    #[serde(rename = "totalPairs", default)]
    pub total_pairs: usize,
    #[serde(rename = "minSimilarity", default)]
    pub min_similarity: f64,
    #[serde(rename = "avgSimilarity", default)]
    pub avg_similarity: f64,
    #[serde(rename = "maxSimilarity", default)]
    pub max_similarity: f64,
    #[serde(rename = "articlesAnalyzed", default)]
    pub articles_analyzed: usize,
}

/// The document written and read by the persistence layer. Field names
/// match the wire format exactly (§4.J); the reader tolerates missing
/// `statistics` and `confidence_scores` via `#[serde(default)]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynonymFile {
    pub synonyms: HashMap<String, Vec<String>>,
    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
    #[serde(rename = "totalGroups")]
    pub total_groups: usize,
    #[serde(rename = "confidenceScores", default)]
    pub confidence_scores: HashMap<String, f64>,
    #[serde(default)]
    pub statistics: Option<MiningStatistics>,
}

impl Default for SynonymFile {
    fn default() -> Self {
        Self {
            synonyms: HashMap::new(),
            last_updated: Utc::now(),
            total_groups: 0,
            confidence_scores: HashMap::new(),
            statistics: None,
        }
    }
}

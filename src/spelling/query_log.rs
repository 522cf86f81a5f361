//! Query-log analytics corrector (spec 4.F, priority 8).
//!
//! Learns from past queries that were typed differently but returned more
//! results than the current one — a cheap, index-agnostic way to surface
//! corrections the edit-distance and phonetic stages cannot see.

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;

use super::{CancelToken, Corrector, CorrectorError, CorrectorOutcome};
use crate::text::normalize;

/// The external collaborator this corrector consumes. Out of scope per the
/// specification's §6 — the core only relies on this narrow interface.
#[cfg_attr(test, mockall::automock)]
pub trait IndexClient: Send + Sync {
    /// Returns up to `lookback` historical `(raw_query, result_count)` pairs,
    /// most recent first.
    fn recent_queries(&self, lookback: usize) -> Vec<(String, usize)>;
}

pub struct QueryLogCorrector<C: IndexClient> {
    client: C,
    lookback: usize,
    /// Fraction of normalized tokens that must overlap for two queries to be
    /// considered "close" (by Jaccard over token sets).
    overlap_threshold: f64,
    /// A historical query must have yielded at least this many results to be
    /// considered a worthwhile substitution.
    min_result_count: usize,
}

impl<C: IndexClient> QueryLogCorrector<C> {
    pub fn new(client: C, lookback: usize) -> Self {
        Self {
            client,
            lookback,
            overlap_threshold: 0.5,
            min_result_count: 2,
        }
    }

    pub fn with_overlap_threshold(mut self, threshold: f64) -> Self {
        self.overlap_threshold = threshold.clamp(0.0, 1.0);
        self
    }

    pub fn with_min_result_count(mut self, min: usize) -> Self {
        self.min_result_count = min;
        self
    }

    fn token_set(query: &str) -> HashSet<String> {
        query.split_whitespace().map(normalize).filter(|t| !t.is_empty()).collect()
    }

    fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
        if a.is_empty() && b.is_empty() {
            return 1.0;
        }
        let intersection = a.intersection(b).count();
        let union = a.union(b).count();
        if union == 0 {
            0.0
        } else {
            intersection as f64 / union as f64
        }
    }
}

#[async_trait]
impl<C: IndexClient> Corrector for QueryLogCorrector<C> {
    fn priority(&self) -> i32 {
        8
    }

    fn name(&self) -> &str {
        "QueryLog"
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

        let current_tokens = Self::token_set(query);
        if current_tokens.is_empty() {
            return Ok(CorrectorOutcome::unchanged(self.name(), query));
        }

        let history = self.client.recent_queries(self.lookback);

        let mut best: Option<(&str, usize)> = None;
        for (raw, count) in &history {
            if cancel.is_cancelled() {
                return Err(CorrectorError::Cancelled);
            }
            if *count < self.min_result_count {
                continue;
            }
            let candidate_tokens = Self::token_set(raw);
            if candidate_tokens == current_tokens {
                continue;
            }
            if Self::jaccard(&current_tokens, &candidate_tokens) < self.overlap_threshold {
                continue;
            }
            let better_than_current = best.map_or(true, |(_, c)| *count > c);
            if better_than_current {
                best = Some((raw.as_str(), *count));
            }
        }

        match best {
            Some((historical, _)) => Ok(CorrectorOutcome::changed(self.name(), query, historical)),
            None => Ok(CorrectorOutcome::unchanged(self.name(), query)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FakeIndex(Vec<(String, usize)>);

    impl IndexClient for FakeIndex {
        fn recent_queries(&self, lookback: usize) -> Vec<(String, usize)> {
            self.0.iter().take(lookback).cloned().collect()
        }
    }

    #[tokio::test]
    async fn prefers_a_historical_query_with_more_results() {
        let client = FakeIndex(vec![("москва новости".to_string(), 500)]);
        let corrector = QueryLogCorrector::new(client, 100);
        let outcome = corrector
            .try_correct("москва новасти", &CancelToken::new(), None)
            .await
            .unwrap();
        assert_eq!(outcome.corrected, "москва новости");
    }

    #[tokio::test]
    async fn ignores_unrelated_history() {
        let client = FakeIndex(vec![("погода завтра".to_string(), 9000)]);
        let corrector = QueryLogCorrector::new(client, 100);
        let outcome = corrector
            .try_correct("москва новости", &CancelToken::new(), None)
            .await
            .unwrap();
        assert!(!outcome.has_correction);
    }

    #[tokio::test]
    async fn ignores_history_with_fewer_results() {
        let client = FakeIndex(vec![("москва новости точно" .to_string(), 1)]);
        let corrector = QueryLogCorrector::new(client, 100).with_overlap_threshold(0.3);
        let outcome = corrector
            .try_correct("москва новости", &CancelToken::new(), None)
            .await
            .unwrap();
        assert!(!outcome.has_correction);
    }

    #[tokio::test]
    async fn works_against_a_mocked_index_client() {
        let mut mock = MockIndexClient::new();
        mock.expect_recent_queries()
            .times(1)
            .returning(|_| vec![("москва новости".to_string(), 500)]);

        let corrector = QueryLogCorrector::new(mock, 100);
        let outcome = corrector
            .try_correct("москва новасти", &CancelToken::new(), None)
            .await
            .unwrap();
        assert_eq!(outcome.corrected, "москва новости");
    }
}

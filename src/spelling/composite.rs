//! Priority-ordered composite corrector (spec 4.G).

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use log::warn;

use super::{CancelToken, Corrector, CorrectorError, CorrectorOutcome, SpellCache};
use crate::text::normalize;

/// The result of a full `try_correct` call: the final corrected query plus
/// the trace of every stage that changed it.
#[derive(Debug, Clone, PartialEq)]
pub struct DetailedResult {
    pub original: String,
    pub corrected: String,
    pub steps: Vec<super::CorrectionStep>,
    pub confidence: f64,
    pub elapsed: Duration,
}

/// Default per-step confidence multiplier (spec 4.G step 3).
const DEFAULT_STEP_CONFIDENCE_FACTOR: f64 = 0.8;

/// Default composite configuration (spec §6): 1000-entry cache, 1-hour TTL.
pub const DEFAULT_MAX_CACHE_SIZE: usize = 1000;
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

pub struct CompositeCorrector {
    correctors: RwLock<Vec<Arc<dyn Corrector>>>,
    cache: SpellCache,
    step_confidence_factor: f64,
}

impl CompositeCorrector {
    pub fn new(correctors: Vec<Arc<dyn Corrector>>) -> Self {
        Self::with_config(correctors, DEFAULT_MAX_CACHE_SIZE, DEFAULT_CACHE_TTL)
    }

    pub fn with_config(
        mut correctors: Vec<Arc<dyn Corrector>>,
        max_cache_size: usize,
        cache_ttl: Duration,
    ) -> Self {
        correctors.sort_by_key(|c| c.priority());
        Self {
            correctors: RwLock::new(correctors),
            cache: SpellCache::new(max_cache_size, cache_ttl),
            step_confidence_factor: DEFAULT_STEP_CONFIDENCE_FACTOR,
        }
    }

    /// Adds a corrector (e.g. a model-backed one with priority 10) and
    /// re-sorts by priority, ties broken by insertion order (a stable sort
    /// preserves relative order of equal-priority entries).
    pub fn add_checker(&self, corrector: Arc<dyn Corrector>) {
        let mut correctors = self.correctors.write().unwrap();
        correctors.push(corrector);
        correctors.sort_by_key(|c| c.priority());
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub async fn try_correct(&self, query: &str, cancel: &CancelToken) -> DetailedResult {
        let start = Instant::now();

        if query.trim().is_empty() {
            return DetailedResult {
                original: query.to_string(),
                corrected: query.to_string(),
                steps: vec![],
                confidence: 1.0,
                elapsed: start.elapsed(),
            };
        }

        let key = normalize(query);

        if let Some(cached) = self.cache.get(&key) {
            return DetailedResult {
                original: query.to_string(),
                corrected: cached.corrected.clone(),
                steps: vec![super::CorrectionStep {
                    method: "Cache".to_string(),
                    before: query.to_string(),
                    after: cached.corrected,
                    confidence: 1.0,
                    reason: "cache hit within TTL".to_string(),
                }],
                confidence: 1.0,
                elapsed: start.elapsed(),
            };
        }

        let mut current = query.to_string();
        let mut confidence = 1.0;
        let mut steps = Vec::new();
        let mut cancelled = false;

        let correctors = self.correctors.read().unwrap().clone();
        for corrector in correctors.iter() {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let outcome = corrector.try_correct(&current, cancel, None).await;
            let outcome: CorrectorOutcome = match outcome {
                Ok(outcome) => outcome,
                Err(CorrectorError::Cancelled) => {
                    cancelled = true;
                    break;
                }
                Err(err) => {
                    warn!("corrector '{}' failed, skipping: {err}", corrector.name());
                    continue;
                }
            };

            if !outcome.success {
                warn!(
                    "corrector '{}' reported failure: {:?}",
                    corrector.name(),
                    outcome.message
                );
                continue;
            }

            if outcome.has_correction && outcome.corrected != current {
                steps.push(super::CorrectionStep {
                    method: corrector.name().to_string(),
                    before: current.clone(),
                    after: outcome.corrected.clone(),
                    confidence,
                    reason: outcome
                        .message
                        .clone()
                        .unwrap_or_else(|| format!("{} correction", corrector.name())),
                });
                current = outcome.corrected;
                confidence *= self.step_confidence_factor;
            }
        }

        let result = DetailedResult {
            original: query.to_string(),
            corrected: current,
            steps,
            confidence,
            elapsed: start.elapsed(),
        };

        // A cancelled run's `result` is only a best-effort partial; caching it
        // would serve that degraded output to later, uncancelled callers.
        if !cancelled {
            self.cache.insert(key, result.clone());
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedCorrector {
        priority: i32,
        name: String,
        from: String,
        to: String,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Corrector for FixedCorrector {
        fn priority(&self) -> i32 {
            self.priority
        }
        fn name(&self) -> &str {
            &self.name
        }
        async fn try_correct(
            &self,
            query: &str,
            _cancel: &CancelToken,
            _deadline: Option<Duration>,
        ) -> Result<CorrectorOutcome, CorrectorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if query == self.from {
                Ok(CorrectorOutcome::changed(&self.name, query, &self.to))
            } else {
                Ok(CorrectorOutcome::unchanged(&self.name, query))
            }
        }
    }

    struct FailingCorrector;

    #[async_trait]
    impl Corrector for FailingCorrector {
        fn priority(&self) -> i32 {
            0
        }
        fn name(&self) -> &str {
            "Failing"
        }
        async fn try_correct(
            &self,
            _query: &str,
            _cancel: &CancelToken,
            _deadline: Option<Duration>,
        ) -> Result<CorrectorOutcome, CorrectorError> {
            Err(CorrectorError::Stage("Failing".to_string(), "boom".to_string()))
        }
    }

    #[tokio::test]
    async fn runs_stages_in_priority_order_and_chains_output() {
        let calls = Arc::new(AtomicUsize::new(0));
        let stage1 = Arc::new(FixedCorrector {
            priority: 1,
            name: "Stage1".to_string(),
            from: "путен".to_string(),
            to: "путин".to_string(),
            calls: calls.clone(),
        });
        let stage2 = Arc::new(FixedCorrector {
            priority: 2,
            name: "Stage2".to_string(),
            from: "путин".to_string(),
            to: "путин путин".to_string(),
            calls,
        });
        let composite = CompositeCorrector::new(vec![stage2, stage1]);
        let result = composite.try_correct("путен", &CancelToken::new()).await;
        assert_eq!(result.corrected, "путин путин");
        assert_eq!(result.steps.len(), 2);
        assert_eq!(result.steps[0].method, "Stage1");
        assert_eq!(result.steps[1].before, "путин");
    }

    #[tokio::test]
    async fn a_failing_stage_is_absorbed() {
        let composite = CompositeCorrector::new(vec![Arc::new(FailingCorrector)]);
        let result = composite.try_correct("query", &CancelToken::new()).await;
        assert_eq!(result.corrected, "query");
        assert!(result.steps.is_empty());
    }

    #[tokio::test]
    async fn no_change_when_every_stage_passes_through() {
        let calls = Arc::new(AtomicUsize::new(0));
        let noop = Arc::new(FixedCorrector {
            priority: 1,
            name: "Noop".to_string(),
            from: "zzz".to_string(),
            to: "yyy".to_string(),
            calls,
        });
        let composite = CompositeCorrector::new(vec![noop]);
        let result = composite.try_correct("some query", &CancelToken::new()).await;
        assert_eq!(result.corrected, "some query");
    }

    #[tokio::test]
    async fn repeat_query_within_ttl_hits_the_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let stage = Arc::new(FixedCorrector {
            priority: 1,
            name: "Stage".to_string(),
            from: "путен".to_string(),
            to: "путин".to_string(),
            calls: calls.clone(),
        });
        let composite = CompositeCorrector::new(vec![stage]);

        let first = composite.try_correct("путен", &CancelToken::new()).await;
        assert_eq!(first.corrected, "путин");

        let second = composite.try_correct("путен", &CancelToken::new()).await;
        assert_eq!(second.steps.len(), 1);
        assert_eq!(second.steps[0].method, "Cache");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn a_cancelled_run_is_never_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let stage = Arc::new(FixedCorrector {
            priority: 1,
            name: "Stage".to_string(),
            from: "путен".to_string(),
            to: "путин".to_string(),
            calls: calls.clone(),
        });
        let composite = CompositeCorrector::new(vec![stage]);

        let cancel = CancelToken::new();
        cancel.cancel();
        let cancelled = composite.try_correct("путен", &cancel).await;
        assert_eq!(cancelled.corrected, "путен");
        assert_eq!(composite.cache_len(), 0);

        let later = composite.try_correct("путен", &CancelToken::new()).await;
        assert_eq!(later.corrected, "путин");
        assert_ne!(later.steps[0].method, "Cache");
    }

    struct ErroringCorrector(CorrectorError);

    #[async_trait]
    impl Corrector for ErroringCorrector {
        fn priority(&self) -> i32 {
            0
        }
        fn name(&self) -> &str {
            "Erroring"
        }
        async fn try_correct(
            &self,
            _query: &str,
            _cancel: &CancelToken,
            _deadline: Option<Duration>,
        ) -> Result<CorrectorOutcome, CorrectorError> {
            Err(self.0.clone())
        }
    }

    #[rstest::rstest]
    #[case(CorrectorError::Cancelled)]
    #[case(CorrectorError::Timeout("Stage".to_string()))]
    #[case(CorrectorError::Stage("Stage".to_string(), "boom".to_string()))]
    #[tokio::test]
    async fn every_stage_error_variant_is_absorbed(#[case] error: CorrectorError) {
        let composite = CompositeCorrector::new(vec![Arc::new(ErroringCorrector(error))]);
        let result = composite.try_correct("some query", &CancelToken::new()).await;
        assert_eq!(result.corrected, "some query");
        assert!(result.steps.is_empty());
    }

    #[tokio::test]
    async fn blank_query_bypasses_every_stage() {
        let calls = Arc::new(AtomicUsize::new(0));
        let stage = Arc::new(FixedCorrector {
            priority: 1,
            name: "Stage".to_string(),
            from: "".to_string(),
            to: "x".to_string(),
            calls: calls.clone(),
        });
        let composite = CompositeCorrector::new(vec![stage]);
        let result = composite.try_correct("   ", &CancelToken::new()).await;
        assert_eq!(result.corrected, "   ");
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}

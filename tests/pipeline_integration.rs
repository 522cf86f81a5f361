#[cfg(test)]
mod pipeline_integration_tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::Arc;

    use queryforge::spelling::{
        CancelToken, CompositeCorrector, Corrector, EditDistanceCorrector, KeyboardLayoutCorrector,
        PhoneticCorrector,
    };
    use queryforge::synonyms::SynonymProvider;

    fn default_stages() -> Vec<Arc<dyn Corrector>> {
        let mut valid_words = HashSet::new();
        valid_words.insert("путин".to_string());
        let misspellings = HashMap::new();

        vec![
            Arc::new(EditDistanceCorrector::new(valid_words, misspellings)),
            Arc::new(KeyboardLayoutCorrector::new(Default::default())),
            Arc::new(PhoneticCorrector::new(Default::default())),
        ]
    }

    #[tokio::test]
    async fn composite_pipeline_corrects_and_caches_a_query() {
        let composite = CompositeCorrector::new(default_stages());

        let first = composite.try_correct("путен", &CancelToken::new()).await;
        assert_eq!(first.corrected, "путин");
        assert!(!first.steps.is_empty());

        let second = composite.try_correct("путен", &CancelToken::new()).await;
        assert_eq!(second.steps.len(), 1);
        assert_eq!(second.steps[0].method, "Cache");
    }

    #[tokio::test]
    async fn corrected_query_can_be_expanded_with_synonyms() {
        let composite = CompositeCorrector::new(default_stages());
        let synonyms = SynonymProvider::new();
        synonyms.add_group(&["путин", "президент"]).unwrap();

        let corrected = composite.try_correct("путен", &CancelToken::new()).await;
        let expanded = synonyms.expand_query(&corrected.corrected, None);

        let tokens: Vec<&str> = expanded.split(' ').collect();
        assert!(tokens.contains(&"путин"));
        assert!(tokens.contains(&"президент"));
    }

    #[tokio::test]
    async fn cancelled_token_yields_a_best_effort_partial_result() {
        let composite = CompositeCorrector::new(default_stages());
        let cancel = CancelToken::new();
        cancel.cancel();

        let result = composite.try_correct("путен", &cancel).await;
        assert_eq!(result.corrected, "путен");
        assert!(result.steps.is_empty());
    }

    #[tokio::test]
    async fn a_cancelled_call_does_not_poison_the_cache_for_later_callers() {
        let composite = CompositeCorrector::new(default_stages());
        let cancel = CancelToken::new();
        cancel.cancel();

        let cancelled = composite.try_correct("путен", &cancel).await;
        assert_eq!(cancelled.corrected, "путен");

        let later = composite.try_correct("путен", &CancelToken::new()).await;
        assert_eq!(later.corrected, "путин");
        assert_ne!(later.steps.first().map(|s| s.method.as_str()), Some("Cache"));
    }
}

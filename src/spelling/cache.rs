//! Bounded cache for composite-corrector results with TTL expiry and
//! minimum-timestamp eviction (spec 4.G data model, §5 concurrency note).
//!
//! Deliberately hand-rolled rather than built on the `lru` crate: eviction
//! here is "drop the oldest insertion when at capacity", not "drop the
//! least-recently-read" — a different policy than a conventional LRU cache
//! implements, so reusing that crate would silently change semantics.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use super::composite::DetailedResult;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: DetailedResult,
    pub inserted_at: Instant,
}

struct Inner {
    entries: HashMap<String, CacheEntry>,
    capacity: usize,
    ttl: Duration,
}

/// Process-local, thread-safe cache keyed by normalized query. Read, evict,
/// and insert form a single critical section per call, satisfying the
/// concurrency model's correctness rule for a shared composite-corrector
/// instance.
pub struct SpellCache {
    inner: Mutex<Inner>,
}

impl SpellCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                capacity,
                ttl,
            }),
        }
    }

    /// Returns a fresh (non-expired) cached value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<DetailedResult> {
        let inner = self.inner.lock().unwrap();
        inner.entries.get(key).and_then(|entry| {
            if entry.inserted_at.elapsed() < inner.ttl {
                Some(entry.value.clone())
            } else {
                None
            }
        })
    }

    /// Inserts `value` under `key`, evicting the entry with the smallest
    /// timestamp first if at capacity.
    pub fn insert(&self, key: String, value: DetailedResult) {
        let mut inner = self.inner.lock().unwrap();
        if inner.entries.len() >= inner.capacity && !inner.entries.contains_key(&key) {
            if let Some(oldest_key) = inner
                .entries
                .iter()
                .min_by_key(|(_, e)| e.inserted_at)
                .map(|(k, _)| k.clone())
            {
                inner.entries.remove(&oldest_key);
            }
        }
        inner.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spelling::DetailedResult;
    use std::thread;

    fn sample(query: &str) -> DetailedResult {
        DetailedResult {
            original: query.to_string(),
            corrected: query.to_string(),
            steps: vec![],
            confidence: 1.0,
            elapsed: Duration::from_millis(0),
        }
    }

    #[test]
    fn evicts_the_oldest_entry_at_capacity() {
        let cache = SpellCache::new(2, Duration::from_secs(60));
        cache.insert("a".to_string(), sample("a"));
        thread::sleep(Duration::from_millis(5));
        cache.insert("b".to_string(), sample("b"));
        thread::sleep(Duration::from_millis(5));
        cache.insert("c".to_string(), sample("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
        assert!(cache.get("c").is_some());
    }

    #[test]
    fn expires_entries_past_ttl() {
        let cache = SpellCache::new(10, Duration::from_millis(10));
        cache.insert("a".to_string(), sample("a"));
        assert!(cache.get("a").is_some());
        thread::sleep(Duration::from_millis(20));
        assert!(cache.get("a").is_none());
    }
}

//! The LRU result cache (§4.12): keyed by `(query, maxResults, optionsHash)`,
//! cleared on any index mutation (§3 invariant 4).

use std::num::NonZeroUsize;

use ahash::RandomState;
use lru::LruCache;

use crate::result::SearchResult;

/// Deterministic hasher seeded the way the teacher's `search/cache.rs`
/// seeds its `ahash::RandomState` — fixed seeds, not process-random, so
/// the same query always hashes the same way across runs.
fn hasher() -> RandomState {
    RandomState::with_seeds(0x5EED_0001, 0x5EED_0002, 0x5EED_0003, 0x5EED_0004)
}

/// A cache key: the processed query string, the requested result count,
/// and a digest of whatever search options affect scoring (languages,
/// filters, sort, thresholds — anything the caller varies per call).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: String,
    pub max_results: usize,
    pub options_digest: u64,
}

impl CacheKey {
    pub fn new(query: impl Into<String>, max_results: usize, options_digest: u64) -> Self {
        CacheKey { query: query.into(), max_results, options_digest }
    }
}

/// Hashes an arbitrary set of option strings into the `optionsDigest` half
/// of a [`CacheKey`], so callers don't need to hand-roll their own digest.
pub fn digest_options(parts: &[&str]) -> u64 {
    use std::hash::{BuildHasher, Hash, Hasher};
    let mut hasher = hasher().build_hasher();
    for part in parts {
        part.hash(&mut hasher);
    }
    hasher.finish()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Bounded LRU cache of query results. Move-to-front on hit, evict
/// least-recently-used on overflow (§4.12).
pub struct ResultCache {
    inner: LruCache<CacheKey, Vec<SearchResult>>,
    stats: CacheStats,
}

impl ResultCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
        ResultCache { inner: LruCache::new(capacity), stats: CacheStats::default() }
    }

    pub fn get(&mut self, key: &CacheKey) -> Option<Vec<SearchResult>> {
        match self.inner.get(key) {
            Some(results) => {
                self.stats.hits += 1;
                Some(results.clone())
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    pub fn put(&mut self, key: CacheKey, results: Vec<SearchResult>) {
        self.inner.put(key, results);
    }

    /// Cleared on any index mutation (build invariant 4).
    pub fn clear(&mut self) {
        self.inner.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

//! Bounded LRU memo for suggestion lookups
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;

pub const DEFAULT_SUGGESTION_CACHE_SIZE: usize = 1000;

/// Cache key for suggestion lists
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Trimmed, lowercased query.
    pub query: String,
    pub max_suggestions: usize,
}

impl CacheKey {
    pub fn new(query: &str, max_suggestions: usize) -> Self {
        Self {
            query: query.trim().to_lowercase(),
            max_suggestions,
        }
    }
}

/// Suggestion cache. A capacity of zero disables caching.
///
/// Hit and miss accounting lives in the engine's metrics, not here.
pub struct SuggestionCache {
    entries: Option<Mutex<LruCache<CacheKey, Vec<String>>>>,
    capacity: usize,
}

impl SuggestionCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap))),
            capacity,
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<Vec<String>> {
        self.entries
            .as_ref()
            .and_then(|entries| entries.lock().get(key).cloned())
    }

    pub fn insert(&self, key: CacheKey, suggestions: Vec<String>) {
        if let Some(entries) = &self.entries {
            entries.lock().put(key, suggestions);
        }
    }

    pub fn clear(&self) {
        if let Some(entries) = &self.entries {
            entries.lock().clear();
        }
    }

    pub fn get_stats(&self) -> CacheStats {
        CacheStats {
            size: self.entries.as_ref().map_or(0, |entries| entries.lock().len()),
            capacity: self.capacity,
        }
    }
}

impl Default for SuggestionCache {
    fn default() -> Self {
        Self::new(DEFAULT_SUGGESTION_CACHE_SIZE)
    }
}

/// Cache statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
}

//! Memoization of ranked search results
//!
//! Keyed by the full (query, role, context, actor, limit) tuple so two
//! callers with different entitlements can never share an entry. Eviction
//! is plain insertion-order once the bound is reached; a hit does not
//! refresh an entry's position. Any data or configuration change clears
//! the cache wholesale.

use crate::access::{Actor, Context, Role};
use crate::engine::ScoredRecord;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

/// Default maximum number of cached result lists
pub const DEFAULT_CACHE_SIZE: usize = 1000;

/// Identity of one search invocation. The typed tuple makes the encoding
/// deterministic and independent of any option ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: String,
    pub role: Role,
    pub context: Context,
    pub actor: Actor,
    pub limit: usize,
}

/// Bounded query-result cache
pub struct SearchCache {
    entries: HashMap<CacheKey, Vec<ScoredRecord>>,
    insertion_order: VecDeque<CacheKey>,
    max_size: usize,
}

impl Default for SearchCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}

impl SearchCache {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            insertion_order: VecDeque::new(),
            max_size: max_size.max(1),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<&Vec<ScoredRecord>> {
        self.entries.get(key)
    }

    /// Store a result list, evicting the oldest insertion if full
    pub fn insert(&mut self, key: CacheKey, results: Vec<ScoredRecord>) {
        if self.entries.contains_key(&key) {
            // Refresh content in place; insertion position is unchanged
            self.entries.insert(key, results);
            return;
        }

        if self.entries.len() >= self.max_size {
            if let Some(oldest) = self.insertion_order.pop_front() {
                self.entries.remove(&oldest);
                debug!("Cache full: evicted oldest entry for '{}'", oldest.query);
            }
        }

        self.insertion_order.push_back(key.clone());
        self.entries.insert(key, results);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.insertion_order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

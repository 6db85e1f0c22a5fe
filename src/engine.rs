//! The search engine facade
//!
//! Ties access filtering, synonym expansion, intent classification, fuzzy
//! scoring, caching, and the history/analytics loop into one configurable
//! engine over a caller-held record snapshot.

use crate::access::{AccessFilter, Actor, Context, ContextRules, Role, RolePermission};
use crate::cache::{CacheKey, SearchCache};
use crate::error::{validate_query, SearchError};
use crate::history::{AnalyticsSummary, SearchHistory};
use crate::record::Record;
use crate::search::{
    expand_query, score_record, FuzzyMatcher, IntentClassifier, ScoringParams,
};
use crate::storage::{Clock, KeyValueStore, MemoryStore, SystemClock};
use crate::suggest::{self, Suggestion};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Default result list cap
pub const DEFAULT_RESULT_LIMIT: usize = 50;

/// Per-call search parameters. Role and context are mandatory by type:
/// there is no unfiltered fallback path.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub context: Context,
    pub role: Role,
    pub actor: Actor,
    pub limit: Option<usize>,
}

impl SearchOptions {
    pub fn new(context: Context, role: Role) -> Self {
        Self {
            context,
            role,
            actor: Actor::anonymous(),
            limit: None,
        }
    }

    pub fn with_actor(mut self, actor: Actor) -> Self {
        self.actor = actor;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// A permitted, field-stripped record with its relevance score.
///
/// Serializes as the record's own fields plus an injected `_score`, for
/// callers that surface the score as a diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub record: Record,
    pub score: f64,
}

impl Serialize for ScoredRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.record.len() + 1))?;
        for (name, value) in self.record.fields() {
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("_score", &self.score)?;
        map.end()
    }
}

/// Synonym-aware, fuzzy, intent-driven search over an in-memory snapshot
pub struct SmartSearch {
    data: Vec<Record>,
    access: AccessFilter,
    matcher: FuzzyMatcher,
    classifier: IntentClassifier,
    cache: SearchCache,
    history: SearchHistory,
    clock: Arc<dyn Clock>,
}

impl SmartSearch {
    /// Build an engine with the default permission and rule tables,
    /// persisting through the given store and reading the given clock
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            data: Vec::new(),
            access: AccessFilter::with_defaults(),
            matcher: FuzzyMatcher::default(),
            classifier: IntentClassifier::new(),
            cache: SearchCache::default(),
            history: SearchHistory::load(store, clock.clone()),
            clock,
        }
    }

    /// Volatile engine: in-memory store, wall clock
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(SystemClock))
    }

    /// Replace the dataset wholesale. Derived state (the cache) is
    /// invalidated; records are never mutated in place.
    pub fn set_data(&mut self, records: Vec<Record>) -> &mut Self {
        self.data = records;
        self.cache.clear();
        self
    }

    /// Append a single record to the snapshot
    pub fn add_record(&mut self, record: Record) -> &mut Self {
        self.data.push(record);
        self.cache.clear();
        self
    }

    /// Replace all filter rules for one context
    pub fn set_context_filters(&mut self, context: Context, rules: ContextRules) -> &mut Self {
        self.access.set_context_filters(context, rules);
        self.cache.clear();
        self
    }

    /// Replace the permission entry for one role
    pub fn set_permissions(&mut self, role: Role, permission: RolePermission) -> &mut Self {
        self.access.set_permissions(role, permission);
        self.cache.clear();
        self
    }

    /// Set a personalization weight for a record category or type
    pub fn set_preference(&mut self, key: impl Into<String>, weight: f64) -> &mut Self {
        self.history.set_preference(key, weight);
        self
    }

    /// Run a ranked search.
    ///
    /// `InvalidRole` is surfaced as an error; denied or unconfigured
    /// (context, role) pairs are logged and yield an empty result set. No
    /// failure path ever falls back to unfiltered data.
    pub fn search(
        &mut self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<Vec<ScoredRecord>, SearchError> {
        validate_query(query)?;

        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Ok(Vec::new());
        }

        let limit = options.limit.unwrap_or(DEFAULT_RESULT_LIMIT);
        let key = CacheKey {
            query: query.to_string(),
            role: options.role,
            context: options.context,
            actor: options.actor.clone(),
            limit,
        };

        if let Some(hit) = self.cache.get(&key) {
            debug!("Cache hit for '{}'", query);
            return Ok(hit.clone());
        }

        let start = Instant::now();

        let expanded_terms = expand_query(trimmed);
        let intents = self.classifier.detect(trimmed);

        let filtered = match self.access.filter(
            &self.data,
            options.role,
            options.context,
            &options.actor,
        ) {
            Ok(records) => records,
            Err(err @ SearchError::InvalidRole(_)) => return Err(err),
            Err(err) => {
                warn!("Search denied ({}): returning no results", err.error_code());
                Vec::new()
            }
        };

        let query_lower = trimmed.to_lowercase();
        let params = ScoringParams {
            query: &query_lower,
            expanded_terms: &expanded_terms,
            intents: &intents,
            history: self.history.entries(),
            preferences: self.history.preferences(),
            now: self.clock.now(),
        };

        let mut results: Vec<ScoredRecord> = filtered
            .into_iter()
            .filter_map(|record| {
                let score = score_record(&record, &self.matcher, &params);
                (score > 0.0).then_some(ScoredRecord { record, score })
            })
            .collect();

        // Stable sort keeps equal-scored records in snapshot order
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(limit);

        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!(
            "Search '{}' ({}, {}): {} results in {:.2}ms",
            query,
            options.context,
            options.role,
            results.len(),
            elapsed_ms
        );

        self.cache.insert(key, results.clone());
        self.history
            .record_search(query, results.len(), elapsed_ms, Some(options.context));

        Ok(results)
    }

    /// Autocomplete over history and the unfiltered dataset.
    ///
    /// Bypasses the access filter entirely; see the suggester's module
    /// documentation for the scope boundary.
    pub fn autocomplete_suggestions(&self, query: &str, limit: Option<usize>) -> Vec<Suggestion> {
        suggest::suggestions(
            query,
            self.history.entries(),
            &self.data,
            &self.classifier,
            limit,
        )
    }

    /// Attach a clicked result id to the matching history entry
    pub fn record_click(&mut self, query: &str, record_id: &str) {
        self.history.record_click(query, record_id);
    }

    /// Aggregated history and analytics snapshot
    pub fn search_analytics(&self) -> AnalyticsSummary {
        self.history.summary()
    }

    pub fn clear_cache(&mut self) -> &mut Self {
        self.cache.clear();
        self
    }

    /// Prune stale history and low-frequency analytics
    pub fn optimize(&mut self) -> &mut Self {
        self.history.optimize();
        self
    }

    pub fn cached_queries(&self) -> usize {
        self.cache.len()
    }

    pub fn history_len(&self) -> usize {
        self.history.entries().len()
    }
}

//! Search history, click feedback, and query analytics
//!
//! The learning loop: every search is recorded, clicks are attached to the
//! matching history entry, and the aggregate feeds personalization back
//! into scoring. State is persisted through the key-value store on every
//! mutation, fire-and-forget.

use crate::access::Context;
use crate::storage::{Clock, KeyValueStore, StorageError};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Most recent searches kept in the history ring
pub const HISTORY_LIMIT: usize = 100;

/// History entries older than this are pruned by `optimize`
const HISTORY_MAX_AGE_DAYS: i64 = 7;

/// Analytics entries below this frequency are pruned by `optimize`
const ANALYTICS_MIN_FREQUENCY: u64 = 2;

const HISTORY_KEY: &str = "search_history";
const PREFERENCES_KEY: &str = "user_preferences";
const ANALYTICS_KEY: &str = "search_analytics";

/// One recorded search, newest entries sit at the front of the list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchHistoryEntry {
    pub query: String,
    pub result_count: usize,
    pub search_time_ms: f64,
    pub timestamp_ms: i64,
    pub context: Option<Context>,
    pub clicked_result_ids: Vec<String>,
}

/// Aggregated analytics snapshot
#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsSummary {
    pub top_queries: Vec<(String, u64)>,
    pub recent_searches: Vec<SearchHistoryEntry>,
    pub average_search_time_ms: f64,
}

/// History ring + analytics map + caller preference weights
pub struct SearchHistory {
    entries: Vec<SearchHistoryEntry>,
    analytics: BTreeMap<String, u64>,
    preferences: BTreeMap<String, f64>,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
}

impl SearchHistory {
    /// Load persisted state from the store; corrupt or missing state starts
    /// empty with a warning rather than failing construction.
    pub fn load(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let entries = read_json(store.as_ref(), HISTORY_KEY).unwrap_or_default();
        let analytics = read_json(store.as_ref(), ANALYTICS_KEY).unwrap_or_default();
        let preferences = read_json(store.as_ref(), PREFERENCES_KEY).unwrap_or_default();

        Self {
            entries,
            analytics,
            preferences,
            store,
            clock,
        }
    }

    pub fn entries(&self) -> &[SearchHistoryEntry] {
        &self.entries
    }

    pub fn preferences(&self) -> &BTreeMap<String, f64> {
        &self.preferences
    }

    /// Set a preference weight for a record category or type
    pub fn set_preference(&mut self, key: impl Into<String>, weight: f64) {
        self.preferences.insert(key.into(), weight);
        self.persist();
    }

    /// Record a completed search at the front of the history
    pub fn record_search(
        &mut self,
        query: &str,
        result_count: usize,
        search_time_ms: f64,
        context: Option<Context>,
    ) {
        self.entries.insert(
            0,
            SearchHistoryEntry {
                query: query.to_string(),
                result_count,
                search_time_ms,
                timestamp_ms: self.clock.now().timestamp_millis(),
                context,
                clicked_result_ids: Vec::new(),
            },
        );
        self.entries.truncate(HISTORY_LIMIT);

        *self.analytics.entry(query.to_string()).or_insert(0) += 1;
        self.persist();
    }

    /// Attach a clicked result to the most recent entry with an exact query
    /// match. Unknown queries are ignored.
    pub fn record_click(&mut self, query: &str, record_id: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.query == query) {
            entry.clicked_result_ids.push(record_id.to_string());
            self.persist();
        } else {
            debug!("Click for unknown query '{}' ignored", query);
        }
    }

    /// Drop stale history and low-frequency analytics
    pub fn optimize(&mut self) {
        let cutoff_ms =
            (self.clock.now() - Duration::days(HISTORY_MAX_AGE_DAYS)).timestamp_millis();
        let before = self.entries.len();
        self.entries.retain(|e| e.timestamp_ms > cutoff_ms);

        self.analytics
            .retain(|_, count| *count >= ANALYTICS_MIN_FREQUENCY);

        debug!(
            "Optimize pruned {} history entries, kept {} analytics queries",
            before - self.entries.len(),
            self.analytics.len()
        );
        self.persist();
    }

    /// Aggregate snapshot: top-10 queries, last 20 searches, mean latency
    pub fn summary(&self) -> AnalyticsSummary {
        let mut top_queries: Vec<(String, u64)> = self
            .analytics
            .iter()
            .map(|(q, c)| (q.clone(), *c))
            .collect();
        // BTreeMap iteration is query-ascending, so a stable sort by count
        // gives a deterministic count-desc, query-asc ordering
        top_queries.sort_by(|a, b| b.1.cmp(&a.1));
        top_queries.truncate(10);

        let recent_searches: Vec<SearchHistoryEntry> =
            self.entries.iter().take(20).cloned().collect();

        let average_search_time_ms = if self.entries.is_empty() {
            0.0
        } else {
            self.entries.iter().map(|e| e.search_time_ms).sum::<f64>()
                / self.entries.len() as f64
        };

        AnalyticsSummary {
            top_queries,
            recent_searches,
            average_search_time_ms,
        }
    }

    /// Write all state through the store; failures are logged, not raised
    fn persist(&self) {
        if let Err(e) = self.try_persist() {
            warn!("Failed to persist search state: {}", e);
        }
    }

    fn try_persist(&self) -> Result<(), StorageError> {
        self.store
            .set(HISTORY_KEY, &serde_json::to_string(&self.entries)?)?;
        self.store
            .set(ANALYTICS_KEY, &serde_json::to_string(&self.analytics)?)?;
        self.store
            .set(PREFERENCES_KEY, &serde_json::to_string(&self.preferences)?)?;
        Ok(())
    }
}

/// Read and deserialize a stored value, logging on corruption
fn read_json<T: serde::de::DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Option<T> {
    match store.get(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Corrupt persisted state under '{}': {}", key, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            warn!("Failed to read persisted state under '{}': {}", key, e);
            None
        }
    }
}

//! Relevance scoring
//!
//! Combines substring, fuzzy, and synonym matches per field (weighted by
//! field importance) with once-per-record intent, preference, and history
//! bonuses. The inclusion rule is score > 0.

use super::fuzzy::FuzzyMatcher;
use super::intent::Intent;
use crate::history::SearchHistoryEntry;
use crate::record::Record;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// Bonus for a case-insensitive substring match of the whole query
const SUBSTRING_BONUS: f64 = 100.0;
/// Bonus for a fuzzy match, checked independently of the substring test
const FUZZY_BONUS: f64 = 50.0;
/// Bonus per distinct expanded/synonym term contained in the field
const SYNONYM_TERM_BONUS: f64 = 25.0;
/// Once-per-record bonus for high-priority records under Urgent intent
const URGENT_BONUS: f64 = 75.0;
/// Once-per-record bonus for records exposing a status under Status intent
const STATUS_BONUS: f64 = 25.0;
/// Once-per-record bonus when the caller prefers the record's category/type
const PREFERENCE_BONUS: f64 = 30.0;
/// Once-per-record bonus for previously clicked results on related queries
const HISTORY_BONUS: f64 = 40.0;

/// Importance multiplier for a field's accumulated contribution
pub fn field_weight(name: &str) -> f64 {
    match name {
        "name" | "title" => 3.0,
        "email" => 2.5,
        "description" | "content" | "tags" => 2.0,
        "category" => 1.5,
        "id" | "created_at" => 0.5,
        _ => 1.0,
    }
}

/// Everything the scorer needs besides the record itself
pub struct ScoringParams<'a> {
    /// Lowercased, trimmed query
    pub query: &'a str,
    pub expanded_terms: &'a [String],
    pub intents: &'a [Intent],
    pub history: &'a [SearchHistoryEntry],
    pub preferences: &'a BTreeMap<String, f64>,
    pub now: DateTime<Utc>,
}

/// Score a single (already access-filtered) record
pub fn score_record(record: &Record, matcher: &FuzzyMatcher, params: &ScoringParams) -> f64 {
    let mut total = 0.0;

    for (name, value) in record.fields() {
        if value.is_null() {
            continue;
        }

        let text = value.stringify().to_lowercase();
        if text.is_empty() {
            continue;
        }

        let mut field_score = 0.0;

        if text.contains(params.query) {
            field_score += SUBSTRING_BONUS;
        }

        if matcher.is_match(params.query, &text) {
            field_score += FUZZY_BONUS;
        }

        for term in params.expanded_terms {
            if text.contains(term.as_str()) {
                field_score += SYNONYM_TERM_BONUS;
            }
        }

        total += field_score * field_weight(name);
    }

    for intent in params.intents {
        match intent {
            Intent::Recent => {
                if let Some(date) = record_date(record) {
                    let days_since =
                        (params.now - date).num_milliseconds() as f64 / 86_400_000.0;
                    total += (50.0 - days_since).max(0.0);
                }
            }
            Intent::Urgent => {
                let high_priority = record
                    .get("priority")
                    .and_then(|v| v.as_str())
                    .is_some_and(|p| p == "high");
                let urgent = record
                    .get("urgent")
                    .and_then(|v| v.as_bool())
                    .unwrap_or(false);
                if high_priority || urgent {
                    total += URGENT_BONUS;
                }
            }
            Intent::Status => {
                if record.get("status").is_some_and(|v| !v.is_null()) {
                    total += STATUS_BONUS;
                }
            }
            _ => {}
        }
    }

    if has_preference(record, params.preferences) {
        total += PREFERENCE_BONUS;
    }

    if has_history_click(record, params.query, params.history) {
        total += HISTORY_BONUS;
    }

    total
}

/// Date-like field used for recency: `created_at`, falling back to `date`
fn record_date(record: &Record) -> Option<DateTime<Utc>> {
    record
        .get("created_at")
        .and_then(|v| v.as_datetime())
        .or_else(|| record.get("date").and_then(|v| v.as_datetime()))
}

/// Presence-only check on the caller's preference map, keyed by the
/// record's category or type value. The stored weight is only tested for
/// truthiness.
fn has_preference(record: &Record, preferences: &BTreeMap<String, f64>) -> bool {
    ["category", "type"].iter().any(|field| {
        record
            .get(field)
            .map(|v| v.stringify())
            .and_then(|key| preferences.get(&key).copied())
            .is_some_and(|weight| weight != 0.0)
    })
}

/// True when any history entry for a related query (substring either way)
/// has this record among its clicked results
fn has_history_click(record: &Record, query: &str, history: &[SearchHistoryEntry]) -> bool {
    let Some(id) = record.id() else {
        return false;
    };

    history.iter().any(|entry| {
        let entry_query = entry.query.to_lowercase();
        let related = entry_query.contains(query) || query.contains(entry_query.as_str());
        related && entry.clicked_result_ids.iter().any(|c| c == &id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::FieldValue;
    use chrono::TimeZone;

    fn params<'a>(
        query: &'a str,
        expanded: &'a [String],
        intents: &'a [Intent],
        history: &'a [SearchHistoryEntry],
        preferences: &'a BTreeMap<String, f64>,
    ) -> ScoringParams<'a> {
        ScoringParams {
            query,
            expanded_terms: expanded,
            intents,
            history,
            preferences,
            now: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
        }
    }

    static EMPTY_PREFS: BTreeMap<String, f64> = BTreeMap::new();

    #[test]
    fn test_substring_beats_fuzzy_only() {
        let exact = Record::new().with("note", FieldValue::String("blue phone".into()));
        let fuzzy = Record::new().with("note", FieldValue::String("phome".into()));
        let matcher = FuzzyMatcher::default();
        let p = params("phone", &[], &[], &[], &EMPTY_PREFS);

        let exact_score = score_record(&exact, &matcher, &p);
        let fuzzy_score = score_record(&fuzzy, &matcher, &p);
        // Substring match also passes the fuzzy containment check, so it
        // collects both bonuses
        assert_eq!(exact_score, 150.0);
        assert_eq!(fuzzy_score, 50.0);
        assert!(exact_score >= fuzzy_score);
    }

    #[test]
    fn test_field_weight_applied() {
        let in_name = Record::new().with("name", FieldValue::String("phone".into()));
        let in_notes = Record::new().with("notes", FieldValue::String("phone".into()));
        let matcher = FuzzyMatcher::default();
        let p = params("phone", &[], &[], &[], &EMPTY_PREFS);

        assert_eq!(
            score_record(&in_name, &matcher, &p),
            score_record(&in_notes, &matcher, &p) * 3.0
        );
    }

    #[test]
    fn test_synonym_terms_counted_per_distinct_term() {
        let record = Record::new().with(
            "description",
            FieldValue::String("revenue and income report".into()),
        );
        let matcher = FuzzyMatcher::default();
        let expanded = vec!["revenue".to_string(), "income".to_string()];
        let p = params("profit", &expanded, &[], &[], &EMPTY_PREFS);

        // No substring or fuzzy hit for "profit"; two synonym terms at
        // weight 2.0 for description
        assert_eq!(score_record(&record, &matcher, &p), 100.0);
    }

    #[test]
    fn test_null_and_empty_fields_skipped() {
        let record = Record::new()
            .with("note", FieldValue::Null)
            .with("name", FieldValue::String("phone".into()));
        let matcher = FuzzyMatcher::default();
        let p = params("phone", &[], &[], &[], &EMPTY_PREFS);
        assert_eq!(score_record(&record, &matcher, &p), 450.0);
    }

    #[test]
    fn test_recent_intent_decays_with_age() {
        let matcher = FuzzyMatcher::default();
        let fresh = Record::new()
            .with("name", FieldValue::String("phone".into()))
            .with(
                "created_at",
                FieldValue::DateTime(Utc.with_ymd_and_hms(2024, 5, 31, 0, 0, 0).unwrap()),
            );
        let stale = Record::new()
            .with("name", FieldValue::String("phone".into()))
            .with(
                "created_at",
                FieldValue::DateTime(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            );

        let intents = [Intent::Recent];
        let p = params("phone", &[], &intents, &[], &EMPTY_PREFS);

        let fresh_score = score_record(&fresh, &matcher, &p);
        let stale_score = score_record(&stale, &matcher, &p);
        // One day old: +49; 152 days old: bonus floored at 0
        assert!((fresh_score - (450.0 + 49.0)).abs() < 1e-9);
        assert_eq!(stale_score, 450.0);
    }

    #[test]
    fn test_urgent_bonus() {
        let matcher = FuzzyMatcher::default();
        let record = Record::new()
            .with("name", FieldValue::String("phone".into()))
            .with("priority", FieldValue::String("high".into()));
        let intents = [Intent::Urgent];
        let p = params("phone", &[], &intents, &[], &EMPTY_PREFS);
        assert_eq!(score_record(&record, &matcher, &p), 450.0 + 75.0);

        let flagged = Record::new()
            .with("name", FieldValue::String("phone".into()))
            .with("urgent", FieldValue::Bool(true));
        assert_eq!(score_record(&flagged, &matcher, &p), 450.0 + 75.0);
    }

    #[test]
    fn test_status_bonus_once_per_record() {
        let matcher = FuzzyMatcher::default();
        let record = Record::new()
            .with("name", FieldValue::String("phone".into()))
            .with("status", FieldValue::String("shipped".into()));
        let intents = [Intent::Status];
        let p = params("phone", &[], &intents, &[], &EMPTY_PREFS);
        assert_eq!(score_record(&record, &matcher, &p), 450.0 + 25.0);
    }

    #[test]
    fn test_preference_bonus_presence_only() {
        let matcher = FuzzyMatcher::default();
        let record = Record::new()
            .with("name", FieldValue::String("phone".into()))
            .with("category", FieldValue::String("Electronics".into()));

        let mut prefs = BTreeMap::new();
        prefs.insert("Electronics".to_string(), 0.25);
        let p = params("phone", &[], &[], &[], &prefs);
        // Category itself does not contain "phone"; bonus is flat 30
        assert_eq!(score_record(&record, &matcher, &p), 450.0 + 30.0);

        // A zero weight is not truthy
        let mut zeroed = BTreeMap::new();
        zeroed.insert("Electronics".to_string(), 0.0);
        let p = params("phone", &[], &[], &[], &zeroed);
        assert_eq!(score_record(&record, &matcher, &p), 450.0);
    }

    #[test]
    fn test_history_click_bonus() {
        let matcher = FuzzyMatcher::default();
        let record = Record::new()
            .with("id", FieldValue::Number(7.0))
            .with("name", FieldValue::String("phone".into()));

        let history = vec![SearchHistoryEntry {
            query: "phone cases".to_string(),
            result_count: 2,
            search_time_ms: 1.0,
            timestamp_ms: 0,
            context: None,
            clicked_result_ids: vec!["7".to_string()],
        }];
        let p = params("phone", &[], &[], &history, &EMPTY_PREFS);

        // "phone cases" contains "phone", and record 7 was clicked
        assert_eq!(score_record(&record, &matcher, &p), 450.0 + 40.0);

        let unrelated = vec![SearchHistoryEntry {
            query: "tablets".to_string(),
            clicked_result_ids: vec!["7".to_string()],
            ..history[0].clone()
        }];
        let p = params("phone", &[], &[], &unrelated, &EMPTY_PREFS);
        assert_eq!(score_record(&record, &matcher, &p), 450.0);
    }

    #[test]
    fn test_no_match_scores_zero() {
        let matcher = FuzzyMatcher::default();
        let record = Record::new().with("name", FieldValue::String("table".into()));
        let p = params("zzzzzz", &[], &[], &[], &EMPTY_PREFS);
        assert_eq!(score_record(&record, &matcher, &p), 0.0);
    }
}

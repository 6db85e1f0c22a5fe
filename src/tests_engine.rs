//! End-to-end engine scenarios: security, determinism, ranking, and the
//! learning loop exercised through the public API

use crate::access::{Actor, Context, Role};
use crate::engine::{SearchOptions, SmartSearch};
use crate::record::{FieldValue, Record};
use crate::storage::{FixedClock, MemoryStore};
use crate::suggest::SuggestionKind;
use chrono::{TimeZone, Utc};
use std::sync::Arc;

fn engine() -> SmartSearch {
    SmartSearch::new(
        Arc::new(MemoryStore::new()),
        Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        )),
    )
}

fn catalog() -> Vec<Record> {
    vec![
        Record::new()
            .with("id", FieldValue::Number(1.0))
            .with("name", FieldValue::String("iPhone 14 Pro".into()))
            .with("category", FieldValue::String("Electronics".into())),
        Record::new()
            .with("id", FieldValue::Number(2.0))
            .with("name", FieldValue::String("iPhone Case".into()))
            .with("category", FieldValue::String("Accessories".into())),
    ]
}

#[test]
fn guest_dashboard_always_empty() {
    let mut engine = engine();
    engine.set_data(catalog());

    // Guest has no dashboard entitlement; any query yields no results
    let options = SearchOptions::new(Context::Dashboard, Role::Guest);
    let results = engine.search("iphone", &options).unwrap();
    assert!(results.is_empty());
}

#[test]
fn restricted_fields_never_returned() {
    let mut engine = engine();
    engine.set_data(vec![Record::new()
        .with("id", FieldValue::Number(1.0))
        .with("name", FieldValue::String("Alice".into()))
        .with("email", FieldValue::String("alice@example.com".into()))
        .with("password", FieldValue::String("hunter2".into()))
        .with("api_keys", FieldValue::String("sk-123".into()))]);

    // Admin has the wildcard-free allow list; super admin has the wildcard
    // with no restrictions. Neither may leak through differently than
    // configured.
    let options = SearchOptions::new(Context::Users, Role::Admin)
        .with_actor(Actor::with_id("admin-1"));
    let results = engine.search("alice", &options).unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].record.get("password").is_none());
    assert!(results[0].record.get("api_keys").is_none());
    assert!(results[0].record.get("email").is_some());
}

#[test]
fn repeated_search_is_deterministic() {
    let mut engine = engine();
    engine.set_data(catalog());
    let options = SearchOptions::new(Context::Products, Role::Admin);

    let first = engine.search("iphone", &options).unwrap();
    // Defeat the cache so the second run actually recomputes
    engine.clear_cache();
    let second = engine.search("iphone", &options).unwrap();

    assert_eq!(first, second);
}

#[test]
fn exact_substring_outranks_fuzzy_only() {
    let mut engine = engine();
    engine.set_data(vec![
        Record::new()
            .with("id", FieldValue::Number(1.0))
            .with("name", FieldValue::String("phome".into())),
        Record::new()
            .with("id", FieldValue::Number(2.0))
            .with("name", FieldValue::String("phone".into())),
    ]);

    let options = SearchOptions::new(Context::Products, Role::Admin);
    let results = engine.search("phone", &options).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].record.id(), Some("2".to_string()));
    assert!(results[0].score > results[1].score);
}

#[test]
fn limit_returns_exactly_top_k() {
    let mut engine = engine();
    // Even ids match in the name (weight 3.0), odd ids only in the
    // description (weight 2.0), so the top of the ranking is the even ids
    // in snapshot order
    let data: Vec<Record> = (0..10)
        .map(|i| {
            let record = Record::new().with("id", FieldValue::Number(i as f64));
            if i % 2 == 0 {
                record.with("name", FieldValue::String("widget".into()))
            } else {
                record.with("description", FieldValue::String("widget".into()))
            }
        })
        .collect();
    engine.set_data(data);

    let all = engine
        .search(
            "widget",
            &SearchOptions::new(Context::Products, Role::Admin),
        )
        .unwrap();
    let top3 = engine
        .search(
            "widget",
            &SearchOptions::new(Context::Products, Role::Admin).with_limit(3),
        )
        .unwrap();

    assert_eq!(top3.len(), 3);
    assert_eq!(top3.as_slice(), &all[..3]);
    let ids: Vec<Option<String>> = top3.iter().map(|r| r.record.id()).collect();
    assert_eq!(
        ids,
        vec![
            Some("0".to_string()),
            Some("2".to_string()),
            Some("4".to_string())
        ]
    );
}

#[test]
fn scenario_shop_owner_iphone_pro() {
    let mut engine = engine();
    engine.set_data(catalog());

    // Neither record carries an ownership field: both are visible to the
    // shop owner
    let options = SearchOptions::new(Context::Products, Role::ShopOwner)
        .with_actor(Actor::with_id("owner-1"));
    let results = engine.search("iphone pro", &options).unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].record.id(), Some("1".to_string()));
    assert_eq!(results[1].record.id(), Some("2".to_string()));
    assert!(results[0].score > results[1].score);
}

#[test]
fn scenario_history_bounded_at_one_hundred() {
    let mut engine = engine();
    engine.set_data(catalog());
    let options = SearchOptions::new(Context::Products, Role::Admin);

    // Distinct queries so none is served from cache
    for i in 0..101 {
        engine.search(&format!("query {}", i), &options).unwrap();
    }

    assert_eq!(engine.history_len(), 100);
    let analytics = engine.search_analytics();
    assert_eq!(analytics.recent_searches[0].query, "query 100");
    assert!(analytics
        .recent_searches
        .iter()
        .all(|e| e.query != "query 0"));
}

#[test]
fn autocomplete_recent_suggestions_are_prefix_matches() {
    let mut engine = engine();
    engine.set_data(catalog());
    let options = SearchOptions::new(Context::Products, Role::Admin);

    engine.search("products on sale", &options).unwrap();
    engine.search("profit report", &options).unwrap();
    engine.search("iphone", &options).unwrap();

    let suggestions = engine.autocomplete_suggestions("pro", None);
    for suggestion in suggestions
        .iter()
        .filter(|s| s.kind == SuggestionKind::Recent)
    {
        assert!(suggestion.text.to_lowercase().starts_with("pro"));
    }
    assert!(suggestions
        .iter()
        .any(|s| s.kind == SuggestionKind::Recent && s.text == "profit report"));
}

#[test]
fn click_feedback_biases_related_queries() {
    let mut engine = engine();
    engine.set_data(catalog());
    let options = SearchOptions::new(Context::Products, Role::Admin);

    let score_of = |results: &[crate::engine::ScoredRecord], id: &str| {
        results
            .iter()
            .find(|r| r.record.id().as_deref() == Some(id))
            .map(|r| r.score)
            .unwrap()
    };

    let before = engine.search("iphone", &options).unwrap();
    // Both names contain "iphone" equally; snapshot order wins the tie
    assert_eq!(before[0].record.id(), Some("1".to_string()));

    engine.record_click("iphone", "2");
    engine.clear_cache();

    let after = engine.search("iphone", &options).unwrap();
    assert_eq!(score_of(&after, "2"), score_of(&before, "2") + 40.0);
    // The clicked record now ranks first
    assert_eq!(after[0].record.id(), Some("2".to_string()));
}

#[test]
fn invalid_role_is_an_error_after_reconfiguration() {
    use crate::access::{AllowedFields, RolePermission};
    use std::collections::BTreeSet;

    let mut engine = engine();
    engine.set_data(catalog());

    // A role stripped of every context entitlement gets an empty result
    // set, never data
    engine.set_permissions(
        Role::Guest,
        RolePermission {
            allowed_fields: AllowedFields::All,
            restricted_fields: BTreeSet::new(),
            contexts: BTreeSet::new(),
        },
    );

    let results = engine
        .search(
            "iphone",
            &SearchOptions::new(Context::Products, Role::Guest),
        )
        .unwrap();
    assert!(results.is_empty());
}

#[test]
fn optimize_prunes_history_and_analytics() {
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    ));
    let mut engine = SmartSearch::new(Arc::new(MemoryStore::new()), clock.clone());
    engine.set_data(catalog());
    let options = SearchOptions::new(Context::Products, Role::Admin);

    engine.search("stale query", &options).unwrap();
    clock.advance(chrono::Duration::days(8));

    engine.search("fresh query", &options).unwrap();
    engine.clear_cache();
    engine.search("fresh query", &options).unwrap();

    engine.optimize();

    let analytics = engine.search_analytics();
    assert!(analytics
        .recent_searches
        .iter()
        .all(|e| e.query == "fresh query"));
    assert_eq!(
        analytics.top_queries,
        vec![("fresh query".to_string(), 2)]
    );
}

use crate::access::{Context, Role};
use crate::engine::{SearchOptions, SmartSearch};
use crate::record::{FieldValue, Record};
use crate::search::fuzzy::levenshtein;
use proptest::prelude::*;

fn record(id: usize, name: &str, category: &str) -> Record {
    Record::new()
        .with("id", FieldValue::Number(id as f64))
        .with("name", FieldValue::String(name.to_string()))
        .with("category", FieldValue::String(category.to_string()))
}

proptest! {
    // Edit distance is symmetric, zero on identity, and bounded by the
    // longer input
    #[test]
    fn levenshtein_invariants(a in "[a-zé]{0,12}", b in "[a-zé]{0,12}") {
        let forward = levenshtein(&a, &b);
        let backward = levenshtein(&b, &a);
        prop_assert_eq!(forward, backward);
        prop_assert_eq!(levenshtein(&a, &a), 0);

        let max_len = a.chars().count().max(b.chars().count());
        prop_assert!(forward <= max_len);
    }
}

proptest! {
    // Re-running a search over unchanged data and config returns an
    // identical ordered result list
    #[test]
    fn search_is_deterministic(queries in proptest::collection::vec("[a-z ]{1,12}", 1..5)) {
        let mut engine = SmartSearch::in_memory();
        engine.set_data(vec![
            record(1, "iPhone 14 Pro", "Electronics"),
            record(2, "iPhone Case", "Accessories"),
            record(3, "Pixel Stand", "Electronics"),
            record(4, "USB Cable", "Accessories"),
        ]);
        let options = SearchOptions::new(Context::Products, Role::Admin);

        for query in &queries {
            let first = engine.search(query, &options).unwrap();
            engine.clear_cache();
            let second = engine.search(query, &options).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}

proptest! {
    // The result list never exceeds the requested limit
    #[test]
    fn limit_is_never_exceeded(limit in 1usize..20, count in 0usize..30) {
        let mut engine = SmartSearch::in_memory();
        let data: Vec<Record> = (0..count)
            .map(|i| record(i, "widget", "Tools"))
            .collect();
        engine.set_data(data);

        let options = SearchOptions::new(Context::Products, Role::Admin)
            .with_limit(limit);
        let results = engine.search("widget", &options).unwrap();
        prop_assert!(results.len() <= limit);
    }
}

proptest! {
    // Restricted fields never appear in results regardless of record shape
    #[test]
    fn restricted_fields_always_stripped(
        names in proptest::collection::vec("[a-z]{2,10}", 1..8),
        secret in "[a-z0-9]{1,16}",
    ) {
        let mut engine = SmartSearch::in_memory();
        let data: Vec<Record> = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                record(i, name, "Electronics")
                    .with("password", FieldValue::String(secret.clone()))
                    .with("api_keys", FieldValue::String(secret.clone()))
            })
            .collect();
        engine.set_data(data);

        let options = SearchOptions::new(Context::Products, Role::Admin);
        for name in &names {
            let results = engine.search(name, &options).unwrap();
            for scored in &results {
                prop_assert!(scored.record.get("password").is_none());
                prop_assert!(scored.record.get("api_keys").is_none());
            }
        }
    }
}

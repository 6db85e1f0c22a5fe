//! Intent classification for natural-language queries
//!
//! Coarse detection of search purpose from fixed keyword tables. The scan
//! is a single case-insensitive multi-pattern substring pass, so multiple
//! intents may co-occur in one query.

use aho_corasick::AhoCorasick;

/// Search purpose inferred from query keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Intent {
    Find,
    Filter,
    Count,
    Sort,
    Recent,
    Urgent,
    Status,
}

/// Keyword table per intent
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (Intent::Find, &["find", "search", "get", "show", "display", "list"]),
    (Intent::Filter, &["filter", "where", "with", "having"]),
    (Intent::Count, &["count", "how many", "number of", "total"]),
    (Intent::Sort, &["sort", "order", "arrange", "rank"]),
    (Intent::Recent, &["recent", "latest", "new", "today", "yesterday"]),
    (Intent::Urgent, &["urgent", "priority", "important", "critical"]),
    (Intent::Status, &["active", "inactive", "pending", "completed", "failed"]),
];

/// Keyword scanner shared across searches
pub struct IntentClassifier {
    automaton: AhoCorasick,
    pattern_intents: Vec<Intent>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl IntentClassifier {
    pub fn new() -> Self {
        let mut patterns: Vec<&str> = Vec::new();
        let mut pattern_intents: Vec<Intent> = Vec::new();

        for (intent, keywords) in INTENT_KEYWORDS {
            for keyword in *keywords {
                patterns.push(keyword);
                pattern_intents.push(*intent);
            }
        }

        let automaton = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&patterns)
            .expect("static intent keyword table must compile");

        Self {
            automaton,
            pattern_intents,
        }
    }

    /// Detect the intents present in a query, de-duplicated, in enum order
    pub fn detect(&self, query: &str) -> Vec<Intent> {
        let mut found: Vec<Intent> = self
            .automaton
            .find_overlapping_iter(query)
            .map(|m| self.pattern_intents[m.pattern().as_usize()])
            .collect();

        found.sort();
        found.dedup();
        found
    }
}

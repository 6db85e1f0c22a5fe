//! Synonym expansion for semantic query understanding
//!
//! A fixed, directed table of term groups. A query token that is a group
//! key or member pulls in the key and every member of that group; groups
//! are not chained transitively.

/// Directed synonym groups: key term → related terms
const SYNONYM_GROUPS: &[(&str, &[&str])] = &[
    // Business terms
    ("profit", &["revenue", "income", "earnings", "money", "cash"]),
    ("customer", &["client", "user", "buyer", "consumer"]),
    ("product", &["item", "goods", "merchandise", "service"]),
    ("order", &["purchase", "transaction", "sale", "booking"]),
    ("urgent", &["priority", "important", "critical", "rush"]),
    ("recent", &["latest", "new", "current", "fresh"]),
    // Technical terms
    ("error", &["bug", "issue", "problem", "fail"]),
    ("user", &["account", "profile", "member"]),
    ("data", &["information", "record", "entry"]),
    // Status terms
    ("active", &["live", "running", "enabled", "on"]),
    ("inactive", &["disabled", "off", "stopped", "paused"]),
    ("pending", &["waiting", "queued", "processing"]),
    ("completed", &["done", "finished", "success"]),
    // Time-based
    ("today", &["current", "now"]),
    ("yesterday", &["previous", "last"]),
    ("week", &["weekly", "7 days"]),
    ("month", &["monthly", "30 days"]),
    ("year", &["yearly", "annual", "12 months"]),
];

/// Expand a query into its tokens plus related terms.
///
/// Tokenizes on whitespace and lowercases. The result is de-duplicated and
/// keeps first-seen order, so repeated runs over the same query are
/// identical.
pub fn expand_query(query: &str) -> Vec<String> {
    let mut expanded: Vec<String> = Vec::new();

    let mut push = |term: &str| {
        if !expanded.iter().any(|t| t == term) {
            expanded.push(term.to_string());
        }
    };

    for token in query.split_whitespace() {
        let token = token.to_lowercase();
        push(&token);

        for (key, members) in SYNONYM_GROUPS {
            if *key == token || members.contains(&token.as_str()) {
                push(key);
                for member in *members {
                    push(member);
                }
            }
        }
    }

    expanded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_tokens_pass_through() {
        assert_eq!(expand_query("iphone pro"), vec!["iphone", "pro"]);
    }

    #[test]
    fn test_key_expands_to_members() {
        let expanded = expand_query("profit");
        assert_eq!(
            expanded,
            vec!["profit", "revenue", "income", "earnings", "money", "cash"]
        );
    }

    #[test]
    fn test_member_expands_to_whole_group() {
        let expanded = expand_query("revenue");
        assert!(expanded.contains(&"profit".to_string()));
        assert!(expanded.contains(&"cash".to_string()));
    }

    #[test]
    fn test_lowercased_before_lookup() {
        let expanded = expand_query("PROFIT");
        assert!(expanded.contains(&"revenue".to_string()));
    }

    #[test]
    fn test_member_of_several_groups() {
        // "current" belongs to both the "recent" and "today" groups
        let expanded = expand_query("current");
        assert!(expanded.contains(&"recent".to_string()));
        assert!(expanded.contains(&"today".to_string()));
        assert!(expanded.contains(&"now".to_string()));
    }

    #[test]
    fn test_no_transitive_closure() {
        // "recent" pulls in "current", but "current" being a member of
        // "today" must not drag the "today" group in through "recent"
        let expanded = expand_query("latest");
        assert!(expanded.contains(&"recent".to_string()));
        assert!(!expanded.contains(&"now".to_string()));
    }

    #[test]
    fn test_deduplicated() {
        let expanded = expand_query("profit profit revenue");
        let unique: std::collections::HashSet<&String> = expanded.iter().collect();
        assert_eq!(unique.len(), expanded.len());
    }

    #[test]
    fn test_empty_query() {
        assert!(expand_query("").is_empty());
        assert!(expand_query("   ").is_empty());
    }
}

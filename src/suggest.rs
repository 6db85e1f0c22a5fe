//! Autocomplete suggestions
//!
//! Lightweight, exact prefix/substring generation from search history and
//! the raw dataset. Deliberately narrower than full search: no fuzzy
//! matching, no synonym expansion, and no access filtering (a documented
//! scope limitation of the suggester).

use crate::history::SearchHistoryEntry;
use crate::record::Record;
use crate::search::{Intent, IntentClassifier};
use serde::Serialize;

/// Default cap on the total suggestion list
pub const DEFAULT_SUGGESTION_LIMIT: usize = 10;

const MAX_RECENT: usize = 3;
const MAX_COMPLETIONS: usize = 7;
const MIN_QUERY_LEN: usize = 2;

/// Where a suggestion came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// A previous query starting with the input
    Recent,
    /// A dataset field value containing the input
    Completion,
    /// An intent-derived refinement of the input
    Smart,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub text: String,
    pub kind: SuggestionKind,
}

/// Generate autocomplete suggestions for a partial query.
///
/// Queries shorter than two characters yield nothing. Up to three recent
/// queries (newest first, prefix match), up to seven distinct dataset
/// value completions (substring match, first-seen order), and one smart
/// suggestion when the Recent intent is detected.
pub fn suggestions(
    query: &str,
    history: &[SearchHistoryEntry],
    records: &[Record],
    classifier: &IntentClassifier,
    limit: Option<usize>,
) -> Vec<Suggestion> {
    if query.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }

    let query_lower = query.to_lowercase();
    let mut out: Vec<Suggestion> = Vec::new();

    for entry in history
        .iter()
        .filter(|e| e.query.to_lowercase().starts_with(&query_lower))
        .take(MAX_RECENT)
    {
        out.push(Suggestion {
            text: entry.query.clone(),
            kind: SuggestionKind::Recent,
        });
    }

    let mut completions: Vec<String> = Vec::new();
    'records: for record in records {
        for (_, value) in record.fields() {
            if value.is_null() {
                continue;
            }
            let text = value.stringify();
            if text.to_lowercase().contains(&query_lower) && !completions.contains(&text) {
                completions.push(text);
                if completions.len() >= MAX_COMPLETIONS {
                    break 'records;
                }
            }
        }
    }
    out.extend(completions.into_iter().map(|text| Suggestion {
        text,
        kind: SuggestionKind::Completion,
    }));

    if classifier.detect(query).contains(&Intent::Recent) {
        out.push(Suggestion {
            text: format!("{} from today", query),
            kind: SuggestionKind::Smart,
        });
    }

    out.truncate(limit.unwrap_or(DEFAULT_SUGGESTION_LIMIT));
    out
}

//! Matching and scoring primitives: fuzzy comparison, synonym expansion,
//! intent classification, and the relevance scorer

pub mod fuzzy;
pub mod intent;
pub mod scoring;
pub mod synonyms;

#[cfg(test)]
mod property_tests;

pub use fuzzy::{levenshtein, FuzzyMatcher};
pub use intent::{Intent, IntentClassifier};
pub use scoring::{field_weight, score_record, ScoringParams};
pub use synonyms::expand_query;

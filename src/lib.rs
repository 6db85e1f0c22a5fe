//! smartsearch: role-aware fuzzy search and ranking for in-memory records
//!
//! An in-process engine for application search boxes: synonym-aware,
//! fuzzy, intent-driven relevance scoring over a caller-supplied record
//! snapshot, with role-and-context visibility enforcement before scoring,
//! query caching, and a click-feedback learning loop.
//!
//! The engine is not a full-text index: it operates on a replaceable
//! in-memory snapshot and recomputes from scratch whenever the snapshot
//! changes.

pub mod access;
pub mod cache;
pub mod cli;
pub mod engine;
pub mod error;
pub mod history;
pub mod record;
pub mod search;
pub mod storage;
pub mod suggest;

#[cfg(test)]
mod tests_engine;

pub use access::{Actor, Context, Role};
pub use engine::{ScoredRecord, SearchOptions, SmartSearch};
pub use error::SearchError;
pub use record::{FieldValue, Record};
pub use suggest::{Suggestion, SuggestionKind};

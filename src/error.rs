//! Error types and handling for the search engine

use serde::Serialize;
use std::fmt;

/// Engine error types surfaced to callers
#[derive(Debug, Clone, Serialize)]
pub enum SearchError {
    /// Role absent from the configured permission table
    InvalidRole(String),
    /// Role has no entitlement to the requested context
    AccessDenied(String),
    /// No filter rule configured for a (context, role) pair
    FilterRuleMissing(String),
    /// Query failed validation
    InvalidQuery(String),
    /// Persistence collaborator failure
    Storage(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::InvalidRole(msg) => write!(f, "Invalid role: {}", msg),
            SearchError::AccessDenied(msg) => write!(f, "Access denied: {}", msg),
            SearchError::FilterRuleMissing(msg) => write!(f, "Filter rule missing: {}", msg),
            SearchError::InvalidQuery(msg) => write!(f, "Invalid query: {}", msg),
            SearchError::Storage(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for SearchError {}

impl SearchError {
    /// Get the stable error code for machine-readable responses
    pub fn error_code(&self) -> &'static str {
        match self {
            SearchError::InvalidRole(_) => "invalid_role",
            SearchError::AccessDenied(_) => "access_denied",
            SearchError::FilterRuleMissing(_) => "filter_rule_missing",
            SearchError::InvalidQuery(_) => "invalid_query",
            SearchError::Storage(_) => "storage_error",
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// Convert serde_json::Error to SearchError
impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Storage(err.to_string())
    }
}

/// Convert std::io::Error to SearchError
impl From<std::io::Error> for SearchError {
    fn from(err: std::io::Error) -> Self {
        SearchError::Storage(err.to_string())
    }
}

impl From<crate::storage::StorageError> for SearchError {
    fn from(err: crate::storage::StorageError) -> Self {
        SearchError::Storage(err.to_string())
    }
}

/// Validate a raw query string before it reaches the pipeline
pub fn validate_query(query: &str) -> Result<(), SearchError> {
    if query.chars().any(|c| c == '\0') {
        return Err(SearchError::InvalidQuery(
            "Query contains NUL bytes".to_string(),
        ));
    }

    const MAX_QUERY_LEN: usize = 500;
    if query.len() > MAX_QUERY_LEN {
        return Err(SearchError::InvalidQuery(format!(
            "Query too long: {} bytes (max {})",
            query.len(),
            MAX_QUERY_LEN
        )));
    }

    Ok(())
}

//! Access filter: role/context validation, record visibility, field stripping
//!
//! Runs before any scoring so nothing downstream ever sees a record or
//! field the caller is not entitled to. Every deny path resolves to an
//! empty set, never to unfiltered data.

use super::rules::{ContextRules, FilterPredicate};
use super::types::{Actor, Context, Role, RolePermission};
use crate::error::SearchError;
use crate::record::Record;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Permission tables plus the (context, role) rule dispatch table
pub struct AccessFilter {
    permissions: BTreeMap<Role, RolePermission>,
    context_filters: BTreeMap<Context, ContextRules>,
}

impl AccessFilter {
    pub fn new(
        permissions: BTreeMap<Role, RolePermission>,
        context_filters: BTreeMap<Context, ContextRules>,
    ) -> Self {
        Self {
            permissions,
            context_filters,
        }
    }

    /// Built-in tables for the standard storefront roles and contexts
    pub fn with_defaults() -> Self {
        Self::new(
            super::permissions::default_permissions(),
            super::rules::default_context_filters(),
        )
    }

    /// Replace the permission entry for one role
    pub fn set_permissions(&mut self, role: Role, permission: RolePermission) {
        self.permissions.insert(role, permission);
    }

    /// Replace all rules for one context
    pub fn set_context_filters(&mut self, context: Context, rules: ContextRules) {
        self.context_filters.insert(context, rules);
    }

    pub fn permission(&self, role: Role) -> Option<&RolePermission> {
        self.permissions.get(&role)
    }

    /// Check role existence and context entitlement without touching data
    pub fn validate_access(&self, role: Role, context: Context) -> Result<(), SearchError> {
        let permission = self
            .permissions
            .get(&role)
            .ok_or_else(|| SearchError::InvalidRole(format!("no permission entry for {}", role)))?;

        if !permission.contexts.contains(&context) {
            return Err(SearchError::AccessDenied(format!(
                "role {} cannot access {}",
                role, context
            )));
        }

        Ok(())
    }

    /// Produce the permitted, field-stripped subset of `records`.
    ///
    /// A missing (context, role) rule is a configuration gap and denies by
    /// default; it never falls back to unfiltered data.
    pub fn filter(
        &self,
        records: &[Record],
        role: Role,
        context: Context,
        actor: &Actor,
    ) -> Result<Vec<Record>, SearchError> {
        self.validate_access(role, context)?;

        let rule = self
            .context_filters
            .get(&context)
            .and_then(|rules| rules.get(&role))
            .ok_or_else(|| {
                warn!(
                    "No context filter rule for ({}, {}): denying by default",
                    context, role
                );
                SearchError::FilterRuleMissing(format!("no rule for ({}, {})", context, role))
            })?;

        // validate_access guarantees the permission entry exists
        let permission = self
            .permissions
            .get(&role)
            .ok_or_else(|| SearchError::InvalidRole(format!("no permission entry for {}", role)))?;

        let filtered: Vec<Record> = records
            .iter()
            .filter(|record| rule.predicate.matches(record, actor))
            .map(|record| strip_fields(record, permission))
            .collect();

        debug!(
            "Access filter ({}, {}): {} of {} records visible",
            context,
            role,
            filtered.len(),
            records.len()
        );

        Ok(filtered)
    }

    /// Convenience probe used by tests: is this pair explicitly denied?
    pub fn rule_for(&self, context: Context, role: Role) -> Option<&FilterPredicate> {
        self.context_filters
            .get(&context)
            .and_then(|rules| rules.get(&role))
            .map(|rule| &rule.predicate)
    }
}

/// Copy only the fields the role may see, preserving field order
fn strip_fields(record: &Record, permission: &RolePermission) -> Record {
    let mut stripped = Record::new();
    for (name, value) in record.fields() {
        if permission.field_visible(name) {
            stripped.insert(name, value.clone());
        }
    }
    stripped
}

//! Role-and-context access control for search
//!
//! Validation, record visibility rules, and field stripping run before any
//! scoring. Absence of an explicit rule means no access.

pub mod filter;
pub mod permissions;
pub mod rules;
pub mod types;

pub use filter::AccessFilter;
pub use permissions::default_permissions;
pub use rules::{default_context_filters, ContextFilterRule, ContextRules, FilterPredicate};
pub use types::{Actor, AllowedFields, Context, Role, RolePermission};

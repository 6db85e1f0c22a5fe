//! Roles, contexts, and field-level permissions

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Caller role, fixed at configuration time
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    ShopOwner,
    Manager,
    Employee,
    User,
    Guest,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::SuperAdmin => "super_admin",
            Role::Admin => "admin",
            Role::ShopOwner => "shop_owner",
            Role::Manager => "manager",
            Role::Employee => "employee",
            Role::User => "user",
            Role::Guest => "guest",
        };
        f.write_str(name)
    }
}

/// Usage scenario gating which records and fields a role may see
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Context {
    Dashboard,
    Products,
    Orders,
    Users,
    Analytics,
    Inventory,
    Customers,
    Transactions,
    Reports,
    Settings,
    ShopOverview,
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Context::Dashboard => "dashboard",
            Context::Products => "products",
            Context::Orders => "orders",
            Context::Users => "users",
            Context::Analytics => "analytics",
            Context::Inventory => "inventory",
            Context::Customers => "customers",
            Context::Transactions => "transactions",
            Context::Reports => "reports",
            Context::Settings => "settings",
            Context::ShopOverview => "shop_overview",
        };
        f.write_str(name)
    }
}

/// Actor identity values, supplied as plain call parameters by the caller's
/// auth/session layer. The engine never resolves identity itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    pub id: Option<String>,
    pub department: Option<String>,
    pub shop_id: Option<String>,
}

impl Actor {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Which fields a role may see at all
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AllowedFields {
    /// Every field the record carries (restricted fields still removed)
    All,
    /// Only the named fields
    Only(BTreeSet<String>),
}

/// Per-role field visibility. Restricted fields always override allowed
/// ones, including the `All` wildcard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolePermission {
    pub allowed_fields: AllowedFields,
    pub restricted_fields: BTreeSet<String>,
    /// Contexts this role is entitled to search in
    pub contexts: BTreeSet<Context>,
}

impl RolePermission {
    /// May this role see the named field?
    pub fn field_visible(&self, field: &str) -> bool {
        if self.restricted_fields.contains(field) {
            return false;
        }
        match &self.allowed_fields {
            AllowedFields::All => true,
            AllowedFields::Only(fields) => fields.contains(field),
        }
    }
}

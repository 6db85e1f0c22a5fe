//! Context filter rules: per-(context, role) record visibility predicates
//!
//! Each rule is an explicit strategy variant evaluated against the record
//! and the caller-supplied actor values. Rules are plain data resolved
//! through a static dispatch table; nothing here synthesizes or evaluates
//! code at runtime.

use super::types::{Actor, Context, Role};
use crate::record::Record;
use std::collections::BTreeMap;

/// Record visibility predicate, parameterized by actor values at call time
#[derive(Debug, Clone, PartialEq)]
pub enum FilterPredicate {
    /// Every record is visible
    AllowAll,
    /// No record is visible
    DenyAll,
    /// Hide records flagged `system_level`
    ExcludeSystemLevel,
    /// Records owned by the actor's shop. A record carrying none of the
    /// ownership fields (`shop_owner_id`, `owner_id`, `shop_id`) is
    /// treated as shop-neutral and stays visible.
    OwnShop,
    /// Records in the actor's department, or marked public
    DepartmentOrPublic,
    /// Records in the actor's department only
    DepartmentOnly,
    /// Records assigned to the actor, or marked public
    AssignedOrPublic,
    /// Records assigned to or created by the actor
    AssignedOrCreated,
    /// Records whose named field equals the actor id
    ActorIdField { field: &'static str },
    /// User records except super admins
    NonSuperAdminUsers,
    /// User records in the actor's shop, excluding admins
    ShopTeam,
    /// User records in the actor's department, excluding admin tiers
    DepartmentTeam,
    /// Records managed by the actor as category manager, or public
    CategoryManagerOrPublic,
    /// Active records only
    ActiveOnly,
    /// Active records visible to customers
    ActivePublicListing,
    /// Active, customer-visible records also flagged for guests
    ActiveGuestListing,
}

impl FilterPredicate {
    /// Evaluate the predicate for one record
    pub fn matches(&self, record: &Record, actor: &Actor) -> bool {
        match self {
            FilterPredicate::AllowAll => true,
            FilterPredicate::DenyAll => false,
            FilterPredicate::ExcludeSystemLevel => !field_truthy(record, "system_level"),
            FilterPredicate::OwnShop => {
                let has_ownership = ["shop_owner_id", "owner_id", "shop_id"]
                    .iter()
                    .any(|f| record.get(f).is_some_and(|v| !v.is_null()));
                if !has_ownership {
                    return true;
                }
                field_eq(record, "shop_owner_id", actor.id.as_deref())
                    || field_eq(record, "owner_id", actor.id.as_deref())
                    || field_eq(record, "shop_id", actor.shop_id.as_deref())
            }
            FilterPredicate::DepartmentOrPublic => {
                field_eq(record, "department", actor.department.as_deref())
                    || field_truthy(record, "public")
            }
            FilterPredicate::DepartmentOnly => {
                field_eq(record, "department", actor.department.as_deref())
            }
            FilterPredicate::AssignedOrPublic => {
                field_eq(record, "assigned_to", actor.id.as_deref())
                    || field_truthy(record, "public")
            }
            FilterPredicate::AssignedOrCreated => {
                field_eq(record, "assigned_to", actor.id.as_deref())
                    || field_eq(record, "created_by", actor.id.as_deref())
            }
            FilterPredicate::ActorIdField { field } => {
                field_eq(record, field, actor.id.as_deref())
            }
            FilterPredicate::NonSuperAdminUsers => !record_role_is(record, &["super_admin"]),
            FilterPredicate::ShopTeam => {
                field_eq(record, "shop_id", actor.shop_id.as_deref())
                    && !record_role_is(record, &["admin"])
            }
            FilterPredicate::DepartmentTeam => {
                field_eq(record, "department", actor.department.as_deref())
                    && !record_role_is(record, &["super_admin", "admin"])
            }
            FilterPredicate::CategoryManagerOrPublic => {
                field_eq(record, "category_manager", actor.id.as_deref())
                    || field_truthy(record, "public")
            }
            FilterPredicate::ActiveOnly => field_truthy(record, "active"),
            FilterPredicate::ActivePublicListing => {
                field_truthy(record, "active") && field_truthy(record, "visible_to_customers")
            }
            FilterPredicate::ActiveGuestListing => {
                field_truthy(record, "active")
                    && field_truthy(record, "visible_to_customers")
                    && field_truthy(record, "guest_viewable")
            }
        }
    }
}

/// Field equals the given actor value. A missing field or missing actor
/// value never matches.
fn field_eq(record: &Record, field: &str, actor_value: Option<&str>) -> bool {
    match (record.get(field), actor_value) {
        (Some(value), Some(expected)) if !value.is_null() => value.stringify() == expected,
        _ => false,
    }
}

fn field_truthy(record: &Record, field: &str) -> bool {
    record.get(field).is_some_and(|v| v.is_truthy())
}

/// Role name stored on a user record, for team-visibility predicates
fn record_role_is(record: &Record, roles: &[&str]) -> bool {
    record
        .get("role")
        .map(|v| v.stringify())
        .is_some_and(|r| roles.contains(&r.as_str()))
}

/// Visibility rule for one (context, role) pair: the predicate plus any
/// extra fields that pair is granted beyond its base permission
#[derive(Debug, Clone, PartialEq)]
pub struct ContextFilterRule {
    pub predicate: FilterPredicate,
    pub additional_fields: Vec<String>,
}

impl ContextFilterRule {
    pub fn new(predicate: FilterPredicate) -> Self {
        Self {
            predicate,
            additional_fields: Vec::new(),
        }
    }

    pub fn with_fields(predicate: FilterPredicate, fields: &[&str]) -> Self {
        Self {
            predicate,
            additional_fields: fields.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Rules for all roles within one context
pub type ContextRules = BTreeMap<Role, ContextFilterRule>;

/// Built-in (context, role) dispatch table. Pairs absent from the table
/// deny by default.
pub fn default_context_filters() -> BTreeMap<Context, ContextRules> {
    use FilterPredicate::*;

    let mut table: BTreeMap<Context, ContextRules> = BTreeMap::new();

    let mut shop_overview = ContextRules::new();
    shop_overview.insert(
        Role::ShopOwner,
        ContextFilterRule::with_fields(OwnShop, &["profit_margin", "cost_analysis", "shop_metrics"]),
    );
    shop_overview.insert(
        Role::Admin,
        ContextFilterRule::with_fields(AllowAll, &["system_metrics", "all_shops_data"]),
    );
    shop_overview.insert(
        Role::Manager,
        ContextFilterRule::with_fields(DepartmentOrPublic, &["department_metrics"]),
    );
    shop_overview.insert(Role::Employee, ContextFilterRule::new(AssignedOrPublic));
    shop_overview.insert(Role::User, ContextFilterRule::new(DenyAll));
    shop_overview.insert(Role::Guest, ContextFilterRule::new(DenyAll));
    table.insert(Context::ShopOverview, shop_overview);

    let mut dashboard = ContextRules::new();
    dashboard.insert(
        Role::SuperAdmin,
        ContextFilterRule::with_fields(AllowAll, &["system_metrics", "security_logs"]),
    );
    dashboard.insert(
        Role::Admin,
        ContextFilterRule::with_fields(ExcludeSystemLevel, &["admin_metrics", "user_activity"]),
    );
    dashboard.insert(
        Role::ShopOwner,
        ContextFilterRule::with_fields(OwnShop, &["shop_metrics", "sales_analytics"]),
    );
    dashboard.insert(
        Role::Manager,
        ContextFilterRule::with_fields(DepartmentOrPublic, &["department_metrics"]),
    );
    dashboard.insert(Role::Employee, ContextFilterRule::new(AssignedOrPublic));
    dashboard.insert(
        Role::User,
        ContextFilterRule::new(ActorIdField { field: "user_id" }),
    );
    dashboard.insert(Role::Guest, ContextFilterRule::new(DenyAll));
    table.insert(Context::Dashboard, dashboard);

    let mut users = ContextRules::new();
    users.insert(
        Role::SuperAdmin,
        ContextFilterRule::with_fields(AllowAll, &["login_history", "permissions"]),
    );
    users.insert(
        Role::Admin,
        ContextFilterRule::with_fields(NonSuperAdminUsers, &["last_login", "status"]),
    );
    users.insert(
        Role::ShopOwner,
        ContextFilterRule::with_fields(ShopTeam, &["customer_data", "order_history"]),
    );
    users.insert(
        Role::Manager,
        ContextFilterRule::with_fields(DepartmentTeam, &["department", "performance"]),
    );
    users.insert(
        Role::Employee,
        ContextFilterRule::new(ActorIdField { field: "id" }),
    );
    users.insert(Role::User, ContextFilterRule::new(DenyAll));
    users.insert(Role::Guest, ContextFilterRule::new(DenyAll));
    table.insert(Context::Users, users);

    let mut orders = ContextRules::new();
    orders.insert(
        Role::SuperAdmin,
        ContextFilterRule::with_fields(AllowAll, &["profit_margin", "cost_analysis"]),
    );
    orders.insert(
        Role::Admin,
        ContextFilterRule::with_fields(AllowAll, &["revenue_impact", "customer_segment"]),
    );
    orders.insert(
        Role::ShopOwner,
        ContextFilterRule::with_fields(OwnShop, &["profit_data", "shop_commission"]),
    );
    orders.insert(
        Role::Manager,
        ContextFilterRule::with_fields(DepartmentOnly, &["team_commission"]),
    );
    orders.insert(
        Role::Employee,
        ContextFilterRule::with_fields(AssignedOrCreated, &["commission"]),
    );
    orders.insert(
        Role::User,
        ContextFilterRule::new(ActorIdField { field: "customer_id" }),
    );
    orders.insert(Role::Guest, ContextFilterRule::new(DenyAll));
    table.insert(Context::Orders, orders);

    let mut products = ContextRules::new();
    products.insert(
        Role::SuperAdmin,
        ContextFilterRule::with_fields(AllowAll, &["cost_price", "supplier_info", "profit_margin"]),
    );
    products.insert(
        Role::Admin,
        ContextFilterRule::with_fields(AllowAll, &["cost_price", "supplier_info"]),
    );
    products.insert(
        Role::ShopOwner,
        ContextFilterRule::with_fields(OwnShop, &["cost_price", "profit_data", "shop_analytics"]),
    );
    products.insert(
        Role::Manager,
        ContextFilterRule::with_fields(CategoryManagerOrPublic, &["sales_data", "inventory_alerts"]),
    );
    products.insert(
        Role::Employee,
        ContextFilterRule::with_fields(ActiveOnly, &["stock_level", "reorder_point"]),
    );
    products.insert(
        Role::User,
        ContextFilterRule::with_fields(ActivePublicListing, &["reviews", "ratings"]),
    );
    products.insert(Role::Guest, ContextFilterRule::new(ActiveGuestListing));
    table.insert(Context::Products, products);

    let mut analytics = ContextRules::new();
    analytics.insert(
        Role::SuperAdmin,
        ContextFilterRule::with_fields(AllowAll, &["all_metrics", "system_performance"]),
    );
    analytics.insert(
        Role::Admin,
        ContextFilterRule::with_fields(ExcludeSystemLevel, &["business_metrics", "user_analytics"]),
    );
    analytics.insert(
        Role::ShopOwner,
        ContextFilterRule::with_fields(
            OwnShop,
            &["shop_analytics", "sales_metrics", "customer_insights"],
        ),
    );
    analytics.insert(
        Role::Manager,
        ContextFilterRule::with_fields(DepartmentOnly, &["department_analytics", "team_performance"]),
    );
    analytics.insert(
        Role::Employee,
        ContextFilterRule::with_fields(ActorIdField { field: "user_id" }, &["personal_metrics"]),
    );
    analytics.insert(Role::User, ContextFilterRule::new(DenyAll));
    analytics.insert(Role::Guest, ContextFilterRule::new(DenyAll));
    table.insert(Context::Analytics, analytics);

    table
}

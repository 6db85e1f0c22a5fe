//! Default per-role permission table
//!
//! What fields each role can search and see, and which contexts it may
//! enter. Callers can replace individual entries via `set_permissions`.

use super::types::{AllowedFields, Context, Role, RolePermission};
use std::collections::{BTreeMap, BTreeSet};

fn fields(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|s| s.to_string()).collect()
}

fn contexts(list: &[Context]) -> BTreeSet<Context> {
    list.iter().copied().collect()
}

/// Built-in permission table covering every role
pub fn default_permissions() -> BTreeMap<Role, RolePermission> {
    let mut table = BTreeMap::new();

    table.insert(
        Role::SuperAdmin,
        RolePermission {
            allowed_fields: AllowedFields::All,
            restricted_fields: BTreeSet::new(),
            contexts: contexts(&[
                Context::Dashboard,
                Context::Products,
                Context::Orders,
                Context::Users,
                Context::Analytics,
                Context::Inventory,
                Context::Customers,
                Context::Transactions,
                Context::Reports,
                Context::Settings,
                Context::ShopOverview,
            ]),
        },
    );

    table.insert(
        Role::Admin,
        RolePermission {
            allowed_fields: AllowedFields::Only(fields(&[
                "id", "name", "title", "description", "category", "status",
                "created_at", "updated_at", "price", "stock", "sku",
                "email", "username", "role", "department", "active",
                "order_id", "customer_name", "total", "payment_status",
                "analytics_data", "revenue", "sales",
            ])),
            restricted_fields: fields(&["password", "api_keys", "tokens", "private_notes"]),
            contexts: contexts(&[
                Context::Dashboard,
                Context::Products,
                Context::Orders,
                Context::Users,
                Context::Analytics,
                Context::Inventory,
                Context::Customers,
                Context::Transactions,
                Context::Reports,
            ]),
        },
    );

    table.insert(
        Role::ShopOwner,
        RolePermission {
            allowed_fields: AllowedFields::Only(fields(&[
                "id", "name", "title", "description", "category", "status",
                "created_at", "updated_at", "price", "stock", "sku",
                "order_id", "customer_name", "total", "payment_status",
                "shop_analytics", "sales_data", "revenue", "profit",
                "rating", "reviews", "inventory_level",
            ])),
            restricted_fields: fields(&[
                "password", "api_keys", "tokens", "private_notes",
                "admin_settings", "system_configs", "other_shop_data",
            ]),
            contexts: contexts(&[
                Context::Dashboard,
                Context::Products,
                Context::Orders,
                Context::Inventory,
                Context::Customers,
                Context::Analytics,
                Context::ShopOverview,
            ]),
        },
    );

    table.insert(
        Role::Manager,
        RolePermission {
            allowed_fields: AllowedFields::Only(fields(&[
                "id", "name", "title", "description", "category", "status",
                "created_at", "updated_at", "price", "stock", "sku",
                "order_id", "customer_name", "total", "payment_status",
                "department_analytics", "team_performance",
            ])),
            restricted_fields: fields(&[
                "password", "api_keys", "tokens", "private_notes", "salary",
                "admin_settings", "system_configs", "user_roles",
            ]),
            contexts: contexts(&[
                Context::Dashboard,
                Context::Products,
                Context::Orders,
                Context::Inventory,
                Context::Customers,
                Context::Analytics,
            ]),
        },
    );

    table.insert(
        Role::Employee,
        RolePermission {
            allowed_fields: AllowedFields::Only(fields(&[
                "id", "name", "title", "description", "category", "status",
                "created_at", "price", "stock", "sku",
                "order_id", "customer_name", "payment_status", "assigned_to",
            ])),
            restricted_fields: fields(&[
                "password", "api_keys", "tokens", "private_notes", "salary",
                "admin_settings", "system_configs", "user_roles", "revenue",
                "profit_margins", "cost_price", "analytics_data",
            ]),
            contexts: contexts(&[
                Context::Dashboard,
                Context::Products,
                Context::Orders,
                Context::Inventory,
                Context::Customers,
            ]),
        },
    );

    table.insert(
        Role::User,
        RolePermission {
            allowed_fields: AllowedFields::Only(fields(&[
                "id", "name", "title", "description", "category", "price",
                "available", "in_stock", "public_reviews", "rating",
            ])),
            restricted_fields: fields(&[
                "password", "api_keys", "tokens", "private_notes", "salary",
                "admin_settings", "system_configs", "user_roles", "revenue",
                "profit_margins", "cost_price", "analytics_data", "stock",
                "sku", "supplier_info", "internal_notes",
            ]),
            contexts: contexts(&[Context::Products, Context::Orders]),
        },
    );

    table.insert(
        Role::Guest,
        RolePermission {
            allowed_fields: AllowedFields::Only(fields(&[
                "id", "name", "title", "description", "price", "available",
            ])),
            // Guests see nothing beyond the explicit allow list
            restricted_fields: BTreeSet::new(),
            contexts: contexts(&[Context::Products]),
        },
    );

    table
}

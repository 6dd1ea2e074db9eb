//! Well-known role names and the compiled-in permission catalog.
//!
//! Role names must match the seed data in
//! `20260801000002_create_rbac_tables.sql`. The permission catalog is the
//! source of truth for `PermissionRepo::sync`: new codes are inserted,
//! existing ones have their module/description refreshed.

/// Full access, bypasses per-permission checks.
pub const ROLE_ADMIN: &str = "admin";
/// Manages day-to-day operations for one or more societies.
pub const ROLE_SUPERVISOR: &str = "supervisor";
/// Executes assigned work orders.
pub const ROLE_TECHNICIAN: &str = "technician";

pub const PERM_ASSETS_MANAGE: &str = "assets.manage";
pub const PERM_LOCATIONS_MANAGE: &str = "locations.manage";
pub const PERM_CATEGORIES_MANAGE: &str = "categories.manage";
pub const PERM_SOCIETIES_MANAGE: &str = "societies.manage";
pub const PERM_TICKETS_VIEW: &str = "tickets.view";
pub const PERM_TICKETS_MANAGE: &str = "tickets.manage";
pub const PERM_INVENTORY_MANAGE: &str = "inventory.manage";
pub const PERM_ANNOUNCEMENTS_MANAGE: &str = "announcements.manage";
pub const PERM_REPORTS_VIEW: &str = "reports.view";

/// One catalog entry: `(code, module, description)`.
pub type PermissionDef = (&'static str, &'static str, &'static str);

/// Every permission the API enforces. Synced into the `permissions`
/// table by `POST /admin/permissions/sync`.
pub const PERMISSION_CATALOG: &[PermissionDef] = &[
    (PERM_ASSETS_MANAGE, "assets", "Create, edit and delete assets"),
    (
        PERM_LOCATIONS_MANAGE,
        "locations",
        "Create, edit and delete locations",
    ),
    (
        PERM_CATEGORIES_MANAGE,
        "categories",
        "Create, edit and delete asset categories",
    ),
    (
        PERM_SOCIETIES_MANAGE,
        "societies",
        "Edit society records and branding",
    ),
    (PERM_TICKETS_VIEW, "tickets", "View work orders"),
    (
        PERM_TICKETS_MANAGE,
        "tickets",
        "Create, edit and progress work orders",
    ),
    (
        PERM_INVENTORY_MANAGE,
        "inventory",
        "Manage parts, counts and kardex movements",
    ),
    (
        PERM_ANNOUNCEMENTS_MANAGE,
        "announcements",
        "Publish and retire announcements",
    ),
    (PERM_REPORTS_VIEW, "reports", "View the reporting dashboard"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_codes_are_unique() {
        let mut codes: Vec<&str> = PERMISSION_CATALOG.iter().map(|(c, _, _)| *c).collect();
        codes.sort_unstable();
        let before = codes.len();
        codes.dedup();
        assert_eq!(before, codes.len(), "duplicate permission code in catalog");
    }

    #[test]
    fn catalog_codes_follow_module_dot_action() {
        for (code, module, _) in PERMISSION_CATALOG {
            let (prefix, action) = code.split_once('.').expect("code must contain a dot");
            assert_eq!(prefix, *module, "code prefix must match module for {code}");
            assert!(!action.is_empty());
        }
    }
}

//! Role and permission models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use mainstay_core::types::{DbId, Timestamp};

/// A row from the `roles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `permissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Permission {
    pub id: DbId,
    pub code: String,
    pub module: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A role enriched with its assigned permission codes.
#[derive(Debug, Clone, Serialize)]
pub struct RoleWithPermissions {
    pub role: Role,
    pub permissions: Vec<Permission>,
}

/// DTO for creating a role.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRole {
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    pub description: Option<String>,
}

/// DTO for updating a role.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateRole {
    #[validate(length(min = 1, max = 60))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// DTO for replacing a role's permission set.
#[derive(Debug, Clone, Deserialize)]
pub struct SetRolePermissions {
    pub permission_ids: Vec<DbId>,
}

/// Result of syncing the compiled-in permission catalog.
#[derive(Debug, Clone, Serialize)]
pub struct PermissionSyncReport {
    pub inserted: i64,
    pub updated: i64,
    pub total: i64,
}

//! Repository for the `permissions` and `role_permissions` tables.
//!
//! Carries the two operations the admin screens call as RPCs: syncing
//! the compiled-in permission catalog and replacing a role's permission
//! set atomically.

use sqlx::PgPool;

use mainstay_core::roles::PERMISSION_CATALOG;
use mainstay_core::types::DbId;

use crate::models::role::{Permission, PermissionSyncReport};

const COLUMNS: &str = "id, code, module, description, created_at, updated_at";

/// Provides operations for the permission catalog and role assignments.
pub struct PermissionRepo;

impl PermissionRepo {
    /// List the permission catalog ordered by module then code.
    pub async fn list(pool: &PgPool) -> Result<Vec<Permission>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM permissions ORDER BY module, code");
        sqlx::query_as::<_, Permission>(&query).fetch_all(pool).await
    }

    /// Upsert the compiled-in catalog into the `permissions` table.
    ///
    /// New codes are inserted; existing codes get their module and
    /// description refreshed. Runs in a single transaction so a partial
    /// catalog is never visible.
    pub async fn sync(pool: &PgPool) -> Result<PermissionSyncReport, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let mut inserted = 0i64;
        let mut updated = 0i64;

        for (code, module, description) in PERMISSION_CATALOG {
            let was_insert: (bool,) = sqlx::query_as(
                "INSERT INTO permissions (code, module, description) \
                 VALUES ($1, $2, $3) \
                 ON CONFLICT (code) DO UPDATE \
                    SET module = EXCLUDED.module, description = EXCLUDED.description \
                 RETURNING (xmax = 0)",
            )
            .bind(code)
            .bind(module)
            .bind(description)
            .fetch_one(&mut *tx)
            .await?;

            if was_insert.0 {
                inserted += 1;
            } else {
                updated += 1;
            }
        }

        tx.commit().await?;

        tracing::info!(inserted, updated, "Permission catalog synced");

        Ok(PermissionSyncReport {
            inserted,
            updated,
            total: PERMISSION_CATALOG.len() as i64,
        })
    }

    /// Permissions currently assigned to a role.
    pub async fn list_for_role(pool: &PgPool, role_id: DbId) -> Result<Vec<Permission>, sqlx::Error> {
        let query = format!(
            "SELECT p.id, p.code, p.module, p.description, p.created_at, p.updated_at \
             FROM permissions p \
             JOIN role_permissions rp ON rp.permission_id = p.id \
             WHERE rp.role_id = $1 \
             ORDER BY p.module, p.code"
        );
        sqlx::query_as::<_, Permission>(&query)
            .bind(role_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a role's permission set atomically (delete + insert).
    pub async fn set_for_role(
        pool: &PgPool,
        role_id: DbId,
        permission_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut *tx)
            .await?;

        if !permission_ids.is_empty() {
            sqlx::query(
                "INSERT INTO role_permissions (role_id, permission_id) \
                 SELECT $1, unnest($2::bigint[])",
            )
            .bind(role_id)
            .bind(permission_ids)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Whether a role holds a permission, by permission code.
    pub async fn role_has_permission(
        pool: &PgPool,
        role_name: &str,
        permission_code: &str,
    ) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) \
             FROM role_permissions rp \
             JOIN roles r ON r.id = rp.role_id \
             JOIN permissions p ON p.id = rp.permission_id \
             WHERE r.name = $1 AND p.code = $2",
        )
        .bind(role_name)
        .bind(permission_code)
        .fetch_one(pool)
        .await?;
        Ok(count.0 > 0)
    }
}

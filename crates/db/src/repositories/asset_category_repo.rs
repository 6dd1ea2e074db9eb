//! Repository for the `asset_categories` table.

use sqlx::PgPool;

use mainstay_core::types::DbId;

use crate::models::asset_category::{AssetCategory, CreateAssetCategory, UpdateAssetCategory};

const COLUMNS: &str = "id, code, name, description, is_active, created_at, updated_at";

/// Provides CRUD operations for asset categories.
pub struct AssetCategoryRepo;

impl AssetCategoryRepo {
    /// Insert a new category. Defaults to active.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAssetCategory,
    ) -> Result<AssetCategory, sqlx::Error> {
        let query = format!(
            "INSERT INTO asset_categories (code, name, description, is_active) \
             VALUES ($1, $2, $3, COALESCE($4, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetCategory>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a category by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AssetCategory>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM asset_categories WHERE id = $1");
        sqlx::query_as::<_, AssetCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List categories ordered by name.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<AssetCategory>, sqlx::Error> {
        let where_clause = if include_inactive {
            ""
        } else {
            "WHERE is_active = true"
        };
        let query = format!("SELECT {COLUMNS} FROM asset_categories {where_clause} ORDER BY name");
        sqlx::query_as::<_, AssetCategory>(&query).fetch_all(pool).await
    }

    /// Update a category's descriptive fields.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAssetCategory,
    ) -> Result<Option<AssetCategory>, sqlx::Error> {
        let query = format!(
            "UPDATE asset_categories SET \
                code = COALESCE($2, code), \
                name = COALESCE($3, name), \
                description = COALESCE($4, description) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetCategory>(&query)
            .bind(id)
            .bind(input.code.as_deref())
            .bind(input.name.as_deref())
            .bind(input.description.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Flip the `is_active` flag. Returns the updated row.
    pub async fn toggle_active(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AssetCategory>, sqlx::Error> {
        let query = format!(
            "UPDATE asset_categories SET is_active = NOT is_active \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssetCategory>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a category by ID. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM asset_categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count assets referencing this category (deletion-safety check).
    pub async fn count_assets(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM assets WHERE category_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }
}

//! Repository for the `locations` table.

use sqlx::PgPool;

use mainstay_core::types::DbId;

use crate::models::location::{CreateLocation, Location, LocationListParams, UpdateLocation};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, name, description, is_active, created_at, updated_at";

/// Provides CRUD operations for locations.
pub struct LocationRepo;

impl LocationRepo {
    /// Insert a new location. Defaults to active.
    pub async fn create(pool: &PgPool, input: &CreateLocation) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations (code, name, description, is_active) \
             VALUES ($1, $2, $3, COALESCE($4, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a location by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE id = $1");
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List locations, optionally including deactivated rows and
    /// filtering by code/name.
    pub async fn list(
        pool: &PgPool,
        params: &LocationListParams,
    ) -> Result<Vec<Location>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();

        if !params.include_inactive {
            conditions.push("is_active = true".to_string());
        }
        if params.search.is_some() {
            conditions.push("(code ILIKE $1 OR name ILIKE $1)".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!("SELECT {COLUMNS} FROM locations {where_clause} ORDER BY name");

        let mut q = sqlx::query_as::<_, Location>(&query);
        if let Some(ref search) = params.search {
            q = q.bind(format!("%{search}%"));
        }
        q.fetch_all(pool).await
    }

    /// Update a location's descriptive fields.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET \
                code = COALESCE($2, code), \
                name = COALESCE($3, name), \
                description = COALESCE($4, description) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(input.code.as_deref())
            .bind(input.name.as_deref())
            .bind(input.description.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Flip the `is_active` flag. Returns the updated row.
    pub async fn toggle_active(pool: &PgPool, id: DbId) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET is_active = NOT is_active \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a location by ID. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count assets referencing this location (deletion-safety check).
    pub async fn count_assets(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM assets WHERE location_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }
}

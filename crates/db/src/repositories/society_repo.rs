//! Repository for the `societies` table.

use sqlx::PgPool;

use mainstay_core::types::DbId;

use crate::models::society::{CreateSociety, Society, UpdateSociety};

const COLUMNS: &str = "\
    id, code, name, display_name, logo_url, primary_color, \
    contact_email, is_active, created_at, updated_at";

/// Provides CRUD operations for societies.
pub struct SocietyRepo;

impl SocietyRepo {
    /// Insert a new society. Defaults to active.
    pub async fn create(pool: &PgPool, input: &CreateSociety) -> Result<Society, sqlx::Error> {
        let query = format!(
            "INSERT INTO societies (\
                code, name, display_name, logo_url, primary_color, contact_email, is_active\
             ) VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Society>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.display_name.as_deref())
            .bind(input.logo_url.as_deref())
            .bind(input.primary_color.as_deref())
            .bind(input.contact_email.as_deref())
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a society by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Society>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM societies WHERE id = $1");
        sqlx::query_as::<_, Society>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List societies ordered by name.
    pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Society>, sqlx::Error> {
        let where_clause = if include_inactive {
            ""
        } else {
            "WHERE is_active = true"
        };
        let query = format!("SELECT {COLUMNS} FROM societies {where_clause} ORDER BY name");
        sqlx::query_as::<_, Society>(&query).fetch_all(pool).await
    }

    /// Update a society (branding fields included).
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSociety,
    ) -> Result<Option<Society>, sqlx::Error> {
        let query = format!(
            "UPDATE societies SET \
                name = COALESCE($2, name), \
                display_name = COALESCE($3, display_name), \
                logo_url = COALESCE($4, logo_url), \
                primary_color = COALESCE($5, primary_color), \
                contact_email = COALESCE($6, contact_email) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Society>(&query)
            .bind(id)
            .bind(input.name.as_deref())
            .bind(input.display_name.as_deref())
            .bind(input.logo_url.as_deref())
            .bind(input.primary_color.as_deref())
            .bind(input.contact_email.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Flip the `is_active` flag. Returns the updated row.
    pub async fn toggle_active(pool: &PgPool, id: DbId) -> Result<Option<Society>, sqlx::Error> {
        let query = format!(
            "UPDATE societies SET is_active = NOT is_active WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Society>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a society by ID. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM societies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count tickets referencing this society (deletion-safety check).
    pub async fn count_tickets(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tickets WHERE society_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }
}

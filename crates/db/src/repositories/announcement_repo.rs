//! Repository for the `announcements` table.

use sqlx::PgPool;

use mainstay_core::types::DbId;

use crate::models::announcement::{
    Announcement, AnnouncementListParams, CreateAnnouncement, UpdateAnnouncement,
};

const COLUMNS: &str = "\
    id, title, body, society_id, publish_from, publish_until, is_active, \
    created_at, updated_at";

/// Provides CRUD operations for announcements.
pub struct AnnouncementRepo;

impl AnnouncementRepo {
    /// Insert a new announcement. Defaults to active.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAnnouncement,
    ) -> Result<Announcement, sqlx::Error> {
        let query = format!(
            "INSERT INTO announcements (title, body, society_id, publish_from, publish_until, is_active) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Announcement>(&query)
            .bind(&input.title)
            .bind(&input.body)
            .bind(input.society_id)
            .bind(input.publish_from)
            .bind(input.publish_until)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find an announcement by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Announcement>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM announcements WHERE id = $1");
        sqlx::query_as::<_, Announcement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List announcements, newest first. With `current = true` only
    /// rows whose publish window covers "now" are returned.
    pub async fn list(
        pool: &PgPool,
        params: &AnnouncementListParams,
    ) -> Result<Vec<Announcement>, sqlx::Error> {
        let mut conditions: Vec<String> = Vec::new();

        if !params.include_inactive {
            conditions.push("is_active = true".to_string());
        }
        if params.current {
            conditions.push("(publish_from IS NULL OR publish_from <= now())".to_string());
            conditions.push("(publish_until IS NULL OR publish_until >= now())".to_string());
        }
        if params.society_id.is_some() {
            conditions.push("society_id = $1".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query =
            format!("SELECT {COLUMNS} FROM announcements {where_clause} ORDER BY created_at DESC");

        let mut q = sqlx::query_as::<_, Announcement>(&query);
        if let Some(society_id) = params.society_id {
            q = q.bind(society_id);
        }
        q.fetch_all(pool).await
    }

    /// Update an announcement.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAnnouncement,
    ) -> Result<Option<Announcement>, sqlx::Error> {
        let query = format!(
            "UPDATE announcements SET \
                title = COALESCE($2, title), \
                body = COALESCE($3, body), \
                publish_from = COALESCE($4, publish_from), \
                publish_until = COALESCE($5, publish_until) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Announcement>(&query)
            .bind(id)
            .bind(input.title.as_deref())
            .bind(input.body.as_deref())
            .bind(input.publish_from)
            .bind(input.publish_until)
            .fetch_optional(pool)
            .await
    }

    /// Flip the `is_active` flag. Returns the updated row.
    pub async fn toggle_active(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Announcement>, sqlx::Error> {
        let query = format!(
            "UPDATE announcements SET is_active = NOT is_active \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Announcement>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an announcement by ID. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

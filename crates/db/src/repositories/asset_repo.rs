//! Repository for the `assets` table.
//!
//! List queries resolve location/category names and count open tickets
//! so the asset table screen needs a single round trip.

use sqlx::PgPool;

use mainstay_core::status::{TICKET_IN_EXECUTION, TICKET_PENDING};
use mainstay_core::types::DbId;

use crate::models::asset::{Asset, AssetSearchParams, AssetWithRefs, CreateAsset, UpdateAsset};

/// Column list for `assets` queries.
const COLUMNS: &str = "\
    id, code, name, description, location_id, category_id, \
    serial_number, purchase_date, is_active, created_at, updated_at";

/// Default page size for asset listing.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for asset listing.
const MAX_LIMIT: i64 = 200;

/// Provides CRUD operations for assets.
pub struct AssetRepo;

impl AssetRepo {
    /// Insert a new asset. Defaults to active.
    pub async fn create(pool: &PgPool, input: &CreateAsset) -> Result<Asset, sqlx::Error> {
        let query = format!(
            "INSERT INTO assets (\
                code, name, description, location_id, category_id, \
                serial_number, purchase_date, is_active\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.description.as_deref())
            .bind(input.location_id)
            .bind(input.category_id)
            .bind(input.serial_number.as_deref())
            .bind(input.purchase_date)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find an asset by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Search assets with optional filters and pagination, enriched with
    /// resolved reference names and open-ticket counts.
    pub async fn search(
        pool: &PgPool,
        params: &AssetSearchParams,
    ) -> Result<Vec<AssetWithRefs>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        // Build dynamic WHERE clauses.
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if params.search.is_some() {
            conditions.push(format!(
                "(a.code ILIKE ${bind_idx} OR a.name ILIKE ${bind_idx})"
            ));
            bind_idx += 1;
        }
        if params.location_id.is_some() {
            conditions.push(format!("a.location_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.category_id.is_some() {
            conditions.push(format!("a.category_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if !params.include_inactive {
            conditions.push("a.is_active = true".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT \
                a.id, a.code, a.name, a.description, a.location_id, a.category_id, \
                a.serial_number, a.purchase_date, a.is_active, a.created_at, a.updated_at, \
                l.name AS location_name, \
                c.name AS category_name, \
                COUNT(t.id) FILTER (WHERE t.status IN ('{TICKET_PENDING}', '{TICKET_IN_EXECUTION}')) \
                    AS open_ticket_count \
             FROM assets a \
             JOIN locations l ON l.id = a.location_id \
             JOIN asset_categories c ON c.id = a.category_id \
             LEFT JOIN tickets t ON t.asset_id = a.id \
             {where_clause} \
             GROUP BY a.id, l.name, c.name \
             ORDER BY a.name, a.code \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, AssetWithRefs>(&query);

        // Bind dynamic parameters in order.
        if let Some(ref search) = params.search {
            q = q.bind(format!("%{search}%"));
        }
        if let Some(location_id) = params.location_id {
            q = q.bind(location_id);
        }
        if let Some(category_id) = params.category_id {
            q = q.bind(category_id);
        }

        q = q.bind(limit).bind(offset);
        q.fetch_all(pool).await
    }

    /// Update an existing asset.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAsset,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET \
                code = COALESCE($2, code), \
                name = COALESCE($3, name), \
                description = COALESCE($4, description), \
                location_id = COALESCE($5, location_id), \
                category_id = COALESCE($6, category_id), \
                serial_number = COALESCE($7, serial_number), \
                purchase_date = COALESCE($8, purchase_date) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .bind(input.code.as_deref())
            .bind(input.name.as_deref())
            .bind(input.description.as_deref())
            .bind(input.location_id)
            .bind(input.category_id)
            .bind(input.serial_number.as_deref())
            .bind(input.purchase_date)
            .fetch_optional(pool)
            .await
    }

    /// Flip the `is_active` flag. Returns the updated row.
    pub async fn toggle_active(pool: &PgPool, id: DbId) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!(
            "UPDATE assets SET is_active = NOT is_active WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete an asset by ID. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Verify that an asset exists by ID.
    pub async fn verify_exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM assets WHERE id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count.0 > 0)
    }

    /// Count tickets referencing this asset (deletion-safety check).
    pub async fn count_tickets(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tickets WHERE asset_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(count.0)
    }
}

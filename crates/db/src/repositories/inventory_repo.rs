//! Repository for inventory parts, unit costs, count documents, and the
//! kardex ledger.
//!
//! Stock only moves inside transactions: closing a count document and
//! recording a movement both adjust `stock_qty` and append the matching
//! kardex entry atomically.

use sqlx::{PgPool, Postgres, Transaction};

use mainstay_core::status::{DocStatus, DOC_DRAFT};
use mainstay_core::types::DbId;

use crate::models::inventory::{
    CloseDocReport, CreateInventoryDoc, CreateMovement, CreatePart, DocItemInput, InventoryDoc,
    InventoryDocItem, InventoryPart, KardexEntry, PartCost, PartSearchParams, UpdatePart,
    KARDEX_IN, KARDEX_OUT, REASON_ADJUSTMENT,
};

/// Column list for `inventory_parts` queries.
const PART_COLUMNS: &str = "\
    id, code, name, category, unit, stock_qty, min_qty, is_active, created_at, updated_at";

/// Column list for `part_costs` queries.
const COST_COLUMNS: &str = "id, part_id, unit_cost, currency, created_at, updated_at";

/// Column list for `inventory_docs` queries.
const DOC_COLUMNS: &str = "\
    id, folio, status, society_id, notes, opened_by, opened_at, closed_at, \
    created_at, updated_at";

/// Column list for `inventory_doc_items` queries.
const ITEM_COLUMNS: &str =
    "id, doc_id, part_id, counted_qty, expected_qty, created_at, updated_at";

/// Column list for `kardex_entries` queries.
const KARDEX_COLUMNS: &str = "\
    id, part_id, direction, qty, unit_cost, reason, ticket_id, doc_id, moved_at, \
    created_at, updated_at";

/// Default page size for part listing.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for part listing.
const MAX_LIMIT: i64 = 200;

/// Provides inventory operations: parts, costs, counts, kardex.
pub struct InventoryRepo;

impl InventoryRepo {
    // -----------------------------------------------------------------------
    // Parts
    // -----------------------------------------------------------------------

    /// Insert a new part; records its unit cost when one is given.
    pub async fn create_part(
        pool: &PgPool,
        input: &CreatePart,
    ) -> Result<InventoryPart, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO inventory_parts (code, name, category, unit, stock_qty, min_qty, is_active) \
             VALUES ($1, $2, $3, COALESCE($4, 'unit'), COALESCE($5, 0), $6, COALESCE($7, true)) \
             RETURNING {PART_COLUMNS}"
        );
        let part = sqlx::query_as::<_, InventoryPart>(&query)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.category.as_deref())
            .bind(input.unit.as_deref())
            .bind(input.stock_qty)
            .bind(input.min_qty)
            .bind(input.is_active)
            .fetch_one(&mut *tx)
            .await?;

        if let Some(unit_cost) = input.unit_cost {
            Self::upsert_cost_inner(&mut tx, part.id, unit_cost).await?;
        }

        tx.commit().await?;
        Ok(part)
    }

    /// Find a part by ID.
    pub async fn find_part(pool: &PgPool, id: DbId) -> Result<Option<InventoryPart>, sqlx::Error> {
        let query = format!("SELECT {PART_COLUMNS} FROM inventory_parts WHERE id = $1");
        sqlx::query_as::<_, InventoryPart>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Search parts with optional filters and pagination.
    pub async fn search_parts(
        pool: &PgPool,
        params: &PartSearchParams,
    ) -> Result<Vec<InventoryPart>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if params.search.is_some() {
            conditions.push(format!("(code ILIKE ${bind_idx} OR name ILIKE ${bind_idx})"));
            bind_idx += 1;
        }
        if params.category.is_some() {
            conditions.push(format!("category = ${bind_idx}"));
            bind_idx += 1;
        }
        if !params.include_inactive {
            conditions.push("is_active = true".to_string());
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {PART_COLUMNS} FROM inventory_parts {where_clause} \
             ORDER BY name, code \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, InventoryPart>(&query);
        if let Some(ref search) = params.search {
            q = q.bind(format!("%{search}%"));
        }
        if let Some(ref category) = params.category {
            q = q.bind(category);
        }
        q = q.bind(limit).bind(offset);
        q.fetch_all(pool).await
    }

    /// Update a part's descriptive fields; upserts the unit cost when
    /// one is given.
    pub async fn update_part(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePart,
    ) -> Result<Option<InventoryPart>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE inventory_parts SET \
                code = COALESCE($2, code), \
                name = COALESCE($3, name), \
                category = COALESCE($4, category), \
                unit = COALESCE($5, unit), \
                min_qty = COALESCE($6, min_qty) \
             WHERE id = $1 \
             RETURNING {PART_COLUMNS}"
        );
        let part = sqlx::query_as::<_, InventoryPart>(&query)
            .bind(id)
            .bind(input.code.as_deref())
            .bind(input.name.as_deref())
            .bind(input.category.as_deref())
            .bind(input.unit.as_deref())
            .bind(input.min_qty)
            .fetch_optional(&mut *tx)
            .await?;

        if let (Some(part), Some(unit_cost)) = (&part, input.unit_cost) {
            Self::upsert_cost_inner(&mut tx, part.id, unit_cost).await?;
        }

        tx.commit().await?;
        Ok(part)
    }

    /// Flip the `is_active` flag. Returns the updated row.
    pub async fn toggle_part_active(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<InventoryPart>, sqlx::Error> {
        let query = format!(
            "UPDATE inventory_parts SET is_active = NOT is_active \
             WHERE id = $1 RETURNING {PART_COLUMNS}"
        );
        sqlx::query_as::<_, InventoryPart>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a part by ID. Returns true if a row was deleted.
    pub async fn delete_part(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM inventory_parts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Count kardex entries for this part (deletion-safety check).
    pub async fn count_movements(pool: &PgPool, part_id: DbId) -> Result<i64, sqlx::Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM kardex_entries WHERE part_id = $1")
                .bind(part_id)
                .fetch_one(pool)
                .await?;
        Ok(count.0)
    }

    /// Current unit cost for a part, if recorded.
    pub async fn find_cost(pool: &PgPool, part_id: DbId) -> Result<Option<PartCost>, sqlx::Error> {
        let query = format!("SELECT {COST_COLUMNS} FROM part_costs WHERE part_id = $1");
        sqlx::query_as::<_, PartCost>(&query)
            .bind(part_id)
            .fetch_optional(pool)
            .await
    }

    async fn upsert_cost_inner(
        tx: &mut Transaction<'_, Postgres>,
        part_id: DbId,
        unit_cost: f64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO part_costs (part_id, unit_cost) VALUES ($1, $2) \
             ON CONFLICT (part_id) DO UPDATE SET unit_cost = EXCLUDED.unit_cost",
        )
        .bind(part_id)
        .bind(unit_cost)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Count documents
    // -----------------------------------------------------------------------

    /// Open a new count document in `draft`.
    pub async fn open_doc(
        pool: &PgPool,
        input: &CreateInventoryDoc,
        opened_by: Option<DbId>,
    ) -> Result<InventoryDoc, sqlx::Error> {
        let query = format!(
            "INSERT INTO inventory_docs (status, society_id, notes, opened_by) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {DOC_COLUMNS}"
        );
        sqlx::query_as::<_, InventoryDoc>(&query)
            .bind(DOC_DRAFT)
            .bind(input.society_id)
            .bind(input.notes.as_deref())
            .bind(opened_by)
            .fetch_one(pool)
            .await
    }

    /// Find a count document by ID.
    pub async fn find_doc(pool: &PgPool, id: DbId) -> Result<Option<InventoryDoc>, sqlx::Error> {
        let query = format!("SELECT {DOC_COLUMNS} FROM inventory_docs WHERE id = $1");
        sqlx::query_as::<_, InventoryDoc>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List count documents, newest first.
    pub async fn list_docs(pool: &PgPool) -> Result<Vec<InventoryDoc>, sqlx::Error> {
        let query = format!("SELECT {DOC_COLUMNS} FROM inventory_docs ORDER BY opened_at DESC");
        sqlx::query_as::<_, InventoryDoc>(&query).fetch_all(pool).await
    }

    /// Line items for a document.
    pub async fn list_doc_items(
        pool: &PgPool,
        doc_id: DbId,
    ) -> Result<Vec<InventoryDocItem>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM inventory_doc_items WHERE doc_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, InventoryDocItem>(&query)
            .bind(doc_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a draft document's line items, snapshotting current
    /// stock as `expected_qty` for each line.
    pub async fn set_doc_items(
        pool: &PgPool,
        doc_id: DbId,
        items: &[DocItemInput],
    ) -> Result<Vec<InventoryDocItem>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM inventory_doc_items WHERE doc_id = $1")
            .bind(doc_id)
            .execute(&mut *tx)
            .await?;

        let insert_query = format!(
            "INSERT INTO inventory_doc_items (doc_id, part_id, counted_qty, expected_qty) \
             SELECT $1, $2, $3, stock_qty FROM inventory_parts WHERE id = $2 \
             RETURNING {ITEM_COLUMNS}"
        );
        let mut inserted = Vec::with_capacity(items.len());
        for item in items {
            let row = sqlx::query_as::<_, InventoryDocItem>(&insert_query)
                .bind(doc_id)
                .bind(item.part_id)
                .bind(item.counted_qty)
                .fetch_one(&mut *tx)
                .await?;
            inserted.push(row);
        }

        tx.commit().await?;
        Ok(inserted)
    }

    /// Close a draft document: apply counted quantities to stock and
    /// append an adjustment kardex entry per changed line. One
    /// transaction; the document ends up `closed`.
    pub async fn close_doc(pool: &PgPool, doc_id: DbId) -> Result<CloseDocReport, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let items = {
            let query = format!(
                "SELECT {ITEM_COLUMNS} FROM inventory_doc_items WHERE doc_id = $1 ORDER BY id"
            );
            sqlx::query_as::<_, InventoryDocItem>(&query)
                .bind(doc_id)
                .fetch_all(&mut *tx)
                .await?
        };

        let mut adjustments_in = 0i64;
        let mut adjustments_out = 0i64;

        for item in &items {
            // Lock the part row and read live stock; expected_qty was a
            // snapshot and may be stale by close time.
            let (current,): (f64,) = sqlx::query_as(
                "SELECT stock_qty FROM inventory_parts WHERE id = $1 FOR UPDATE",
            )
            .bind(item.part_id)
            .fetch_one(&mut *tx)
            .await?;

            let delta = item.counted_qty - current;
            if delta == 0.0 {
                continue;
            }

            sqlx::query("UPDATE inventory_parts SET stock_qty = $2 WHERE id = $1")
                .bind(item.part_id)
                .bind(item.counted_qty)
                .execute(&mut *tx)
                .await?;

            let direction = if delta > 0.0 {
                adjustments_in += 1;
                KARDEX_IN
            } else {
                adjustments_out += 1;
                KARDEX_OUT
            };
            sqlx::query(
                "INSERT INTO kardex_entries (part_id, direction, qty, reason, doc_id) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(item.part_id)
            .bind(direction)
            .bind(delta.abs())
            .bind(REASON_ADJUSTMENT)
            .bind(doc_id)
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE inventory_docs SET status = $2, closed_at = now() WHERE id = $1")
            .bind(doc_id)
            .bind(DocStatus::Closed.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            doc_id,
            adjustments_in,
            adjustments_out,
            "Inventory count applied to stock"
        );

        Ok(CloseDocReport {
            doc_id,
            items_applied: items.len() as i64,
            adjustments_in,
            adjustments_out,
        })
    }

    /// Cancel a draft document without touching stock.
    pub async fn cancel_doc(pool: &PgPool, doc_id: DbId) -> Result<Option<InventoryDoc>, sqlx::Error> {
        let query = format!(
            "UPDATE inventory_docs SET status = $2, closed_at = now() \
             WHERE id = $1 RETURNING {DOC_COLUMNS}"
        );
        sqlx::query_as::<_, InventoryDoc>(&query)
            .bind(doc_id)
            .bind(DocStatus::Cancelled.as_str())
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Kardex
    // -----------------------------------------------------------------------

    /// Movement history for a part, newest first.
    pub async fn list_kardex(
        pool: &PgPool,
        part_id: DbId,
    ) -> Result<Vec<KardexEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {KARDEX_COLUMNS} FROM kardex_entries \
             WHERE part_id = $1 ORDER BY moved_at DESC, id DESC"
        );
        sqlx::query_as::<_, KardexEntry>(&query)
            .bind(part_id)
            .fetch_all(pool)
            .await
    }

    /// Record a manual movement (consumption or receipt): adjusts stock
    /// and appends the ledger entry in one transaction.
    ///
    /// Returns `None` when the part does not exist.
    pub async fn record_movement(
        pool: &PgPool,
        part_id: DbId,
        input: &CreateMovement,
        reason: &str,
    ) -> Result<Option<KardexEntry>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let signed_qty = if input.direction == KARDEX_OUT {
            -input.qty
        } else {
            input.qty
        };

        let updated = sqlx::query(
            "UPDATE inventory_parts SET stock_qty = GREATEST(stock_qty + $2, 0) WHERE id = $1",
        )
        .bind(part_id)
        .bind(signed_qty)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO kardex_entries (part_id, direction, qty, unit_cost, reason, ticket_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {KARDEX_COLUMNS}"
        );
        let entry = sqlx::query_as::<_, KardexEntry>(&query)
            .bind(part_id)
            .bind(&input.direction)
            .bind(input.qty)
            .bind(input.unit_cost)
            .bind(reason)
            .bind(input.ticket_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(entry))
    }
}

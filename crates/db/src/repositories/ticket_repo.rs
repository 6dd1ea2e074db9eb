//! Repository for the `tickets` table.
//!
//! Status transitions stamp `started_at` / `finished_at` so the report
//! layer can measure execution time and SLA compliance.

use sqlx::PgPool;

use mainstay_core::status::TicketStatus;
use mainstay_core::types::DbId;

use crate::models::ticket::{
    CreateTicket, Ticket, TicketSearchParams, TicketWithRefs, UpdateTicket,
};

/// Column list for `tickets` queries.
const COLUMNS: &str = "\
    id, code, title, description, asset_id, society_id, status, priority, \
    reported_by, assigned_to, opened_at, started_at, finished_at, due_at, \
    created_at, updated_at";

/// Column list with the `t.` alias for JOIN queries.
const ALIASED_COLUMNS: &str = "\
    t.id, t.code, t.title, t.description, t.asset_id, t.society_id, t.status, t.priority, \
    t.reported_by, t.assigned_to, t.opened_at, t.started_at, t.finished_at, t.due_at, \
    t.created_at, t.updated_at";

/// Default page size for ticket listing.
const DEFAULT_LIMIT: i64 = 50;

/// Maximum page size for ticket listing.
const MAX_LIMIT: i64 = 200;

/// Provides CRUD and lifecycle operations for tickets.
pub struct TicketRepo;

impl TicketRepo {
    /// Insert a new ticket in `pending`.
    ///
    /// The `code` column is generated by the database (`WO-<id>`), so
    /// the insert never provides it.
    pub async fn create(
        pool: &PgPool,
        input: &CreateTicket,
        priority: &str,
        reported_by: Option<DbId>,
    ) -> Result<Ticket, sqlx::Error> {
        let query = format!(
            "INSERT INTO tickets (\
                title, description, asset_id, society_id, status, priority, \
                reported_by, assigned_to, due_at\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(&input.title)
            .bind(input.description.as_deref())
            .bind(input.asset_id)
            .bind(input.society_id)
            .bind(TicketStatus::Pending.as_str())
            .bind(priority)
            .bind(reported_by)
            .bind(input.assigned_to)
            .bind(input.due_at)
            .fetch_one(pool)
            .await
    }

    /// Find a ticket by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tickets WHERE id = $1");
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Search tickets with optional filters and pagination, enriched
    /// with resolved asset/society/assignee names.
    pub async fn search(
        pool: &PgPool,
        params: &TicketSearchParams,
    ) -> Result<Vec<TicketWithRefs>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if params.status.is_some() {
            conditions.push(format!("t.status = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.asset_id.is_some() {
            conditions.push(format!("t.asset_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.society_id.is_some() {
            conditions.push(format!("t.society_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if params.opened_from.is_some() {
            conditions.push(format!("t.opened_at >= ${bind_idx}"));
            bind_idx += 1;
        }
        if params.opened_until.is_some() {
            conditions.push(format!("t.opened_at <= ${bind_idx}"));
            bind_idx += 1;
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT {ALIASED_COLUMNS}, \
                a.name AS asset_name, \
                s.name AS society_name, \
                u.username AS assigned_to_name \
             FROM tickets t \
             LEFT JOIN assets a ON a.id = t.asset_id \
             LEFT JOIN societies s ON s.id = t.society_id \
             LEFT JOIN users u ON u.id = t.assigned_to \
             {where_clause} \
             ORDER BY t.opened_at DESC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, TicketWithRefs>(&query);

        if let Some(ref status) = params.status {
            q = q.bind(status);
        }
        if let Some(asset_id) = params.asset_id {
            q = q.bind(asset_id);
        }
        if let Some(society_id) = params.society_id {
            q = q.bind(society_id);
        }
        if let Some(opened_from) = params.opened_from {
            q = q.bind(opened_from);
        }
        if let Some(opened_until) = params.opened_until {
            q = q.bind(opened_until);
        }

        q = q.bind(limit).bind(offset);
        q.fetch_all(pool).await
    }

    /// Update a ticket's descriptive fields.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTicket,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let query = format!(
            "UPDATE tickets SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                asset_id = COALESCE($4, asset_id), \
                priority = COALESCE($5, priority), \
                assigned_to = COALESCE($6, assigned_to), \
                due_at = COALESCE($7, due_at) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(input.title.as_deref())
            .bind(input.description.as_deref())
            .bind(input.asset_id)
            .bind(input.priority.as_deref())
            .bind(input.assigned_to)
            .bind(input.due_at)
            .fetch_optional(pool)
            .await
    }

    /// Apply a validated status transition, stamping the lifecycle
    /// timestamps that correspond to the new status.
    pub async fn change_status(
        pool: &PgPool,
        id: DbId,
        to: TicketStatus,
    ) -> Result<Option<Ticket>, sqlx::Error> {
        let stamp = match to {
            TicketStatus::InExecution => ", started_at = now()",
            TicketStatus::Finalized => ", finished_at = now()",
            _ => "",
        };
        let query = format!(
            "UPDATE tickets SET status = $2{stamp} WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ticket>(&query)
            .bind(id)
            .bind(to.as_str())
            .fetch_optional(pool)
            .await
    }

    /// Delete a ticket by ID. Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tickets WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

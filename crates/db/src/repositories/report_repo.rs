//! Row fetchers for the report layer.
//!
//! Queries here stay deliberately thin: plain SELECTs with backend-side
//! filtering only. All shaping (normalization, bucketing, ranking,
//! ratios) happens in `mainstay_core::reports` over the returned
//! snapshots.

use sqlx::PgPool;

use mainstay_core::reports::{CostLine, KardexLine, StockLine, TicketSnapshot};
use mainstay_core::types::{DbId, Timestamp};

use crate::models::report::{CostRow, KardexRow, StockRow, TicketReportRow};

/// Provides the raw row sets the dashboard endpoints aggregate.
pub struct ReportRepo;

impl ReportRepo {
    /// Ticket snapshots with asset names resolved, optionally limited
    /// to one society and/or an opened-at window start.
    pub async fn ticket_snapshots(
        pool: &PgPool,
        society_id: Option<DbId>,
        opened_from: Option<Timestamp>,
    ) -> Result<Vec<TicketSnapshot>, sqlx::Error> {
        let mut conditions = Vec::new();
        let mut bind_idx = 1u32;

        if society_id.is_some() {
            conditions.push(format!("t.society_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if opened_from.is_some() {
            conditions.push(format!("t.opened_at >= ${bind_idx}"));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let query = format!(
            "SELECT t.id, t.asset_id, a.name AS asset_name, t.status, t.priority, \
                    t.opened_at, t.finished_at, t.due_at \
             FROM tickets t \
             LEFT JOIN assets a ON a.id = t.asset_id \
             {where_clause} \
             ORDER BY t.opened_at"
        );

        let mut q = sqlx::query_as::<_, TicketReportRow>(&query);
        if let Some(society_id) = society_id {
            q = q.bind(society_id);
        }
        if let Some(opened_from) = opened_from {
            q = q.bind(opened_from);
        }

        let rows = q.fetch_all(pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Current stock of all active parts.
    pub async fn stock_lines(pool: &PgPool) -> Result<Vec<StockLine>, sqlx::Error> {
        let rows = sqlx::query_as::<_, StockRow>(
            "SELECT id AS part_id, name AS part_name, category, stock_qty AS qty \
             FROM inventory_parts WHERE is_active = true \
             ORDER BY name",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Unit costs for all parts that have one.
    pub async fn cost_lines(pool: &PgPool) -> Result<Vec<CostLine>, sqlx::Error> {
        let rows = sqlx::query_as::<_, CostRow>("SELECT part_id, unit_cost FROM part_costs")
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Kardex movements with part names resolved, optionally limited to
    /// a window start.
    pub async fn kardex_lines(
        pool: &PgPool,
        moved_from: Option<Timestamp>,
    ) -> Result<Vec<KardexLine>, sqlx::Error> {
        let where_clause = if moved_from.is_some() {
            "WHERE k.moved_at >= $1"
        } else {
            ""
        };
        let query = format!(
            "SELECT k.part_id, p.name AS part_name, k.direction, k.qty \
             FROM kardex_entries k \
             JOIN inventory_parts p ON p.id = k.part_id \
             {where_clause} \
             ORDER BY k.moved_at"
        );

        let mut q = sqlx::query_as::<_, KardexRow>(&query);
        if let Some(moved_from) = moved_from {
            q = q.bind(moved_from);
        }

        let rows = q.fetch_all(pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Number of active assets (overview KPI).
    pub async fn active_asset_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let count: (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM assets WHERE is_active = true")
                .fetch_one(pool)
                .await?;
        Ok(count.0)
    }
}

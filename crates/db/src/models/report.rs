//! Raw row types fetched for the report layer.
//!
//! `ReportRepo` maps these into the snapshot types consumed by
//! `mainstay_core::reports`; the transforms themselves never see sqlx.

use sqlx::FromRow;

use mainstay_core::reports::{CostLine, KardexLine, StockLine, TicketSnapshot};
use mainstay_core::types::{DbId, Timestamp};

/// One ticket row with the asset name already resolved.
#[derive(Debug, Clone, FromRow)]
pub struct TicketReportRow {
    pub id: DbId,
    pub asset_id: Option<DbId>,
    pub asset_name: Option<String>,
    pub status: String,
    pub priority: String,
    pub opened_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub due_at: Option<Timestamp>,
}

impl From<TicketReportRow> for TicketSnapshot {
    fn from(r: TicketReportRow) -> Self {
        TicketSnapshot {
            id: r.id,
            asset_id: r.asset_id,
            asset_name: r.asset_name,
            status: r.status,
            priority: r.priority,
            opened_at: r.opened_at,
            finished_at: r.finished_at,
            due_at: r.due_at,
        }
    }
}

/// Current stock of one active part.
#[derive(Debug, Clone, FromRow)]
pub struct StockRow {
    pub part_id: DbId,
    pub part_name: String,
    pub category: Option<String>,
    pub qty: f64,
}

impl From<StockRow> for StockLine {
    fn from(r: StockRow) -> Self {
        StockLine {
            part_id: r.part_id,
            part_name: r.part_name,
            category: r.category,
            qty: r.qty,
        }
    }
}

/// Unit cost of one part.
#[derive(Debug, Clone, FromRow)]
pub struct CostRow {
    pub part_id: DbId,
    pub unit_cost: f64,
}

impl From<CostRow> for CostLine {
    fn from(r: CostRow) -> Self {
        CostLine {
            part_id: r.part_id,
            unit_cost: r.unit_cost,
        }
    }
}

/// One kardex movement with the part name resolved.
#[derive(Debug, Clone, FromRow)]
pub struct KardexRow {
    pub part_id: DbId,
    pub part_name: String,
    pub direction: String,
    pub qty: f64,
}

impl From<KardexRow> for KardexLine {
    fn from(r: KardexRow) -> Self {
        KardexLine {
            part_id: r.part_id,
            part_name: r.part_name,
            direction: r.direction,
            qty: r.qty,
        }
    }
}

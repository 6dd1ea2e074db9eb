//! Inventory models and DTOs: parts, unit costs, count documents, and
//! the kardex movement ledger.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use mainstay_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Parts and costs
// ---------------------------------------------------------------------------

/// A row from the `inventory_parts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryPart {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub unit: String,
    pub stock_qty: f64,
    pub min_qty: Option<f64>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `part_costs` table (one per part).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PartCost {
    pub id: DbId,
    pub part_id: DbId,
    pub unit_cost: f64,
    pub currency: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a part.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreatePart {
    #[validate(length(min = 1, max = 40))]
    pub code: String,
    #[validate(length(min = 1, max = 160))]
    pub name: String,
    #[validate(length(max = 80))]
    pub category: Option<String>,
    /// Unit of measure, defaults to `unit`.
    #[validate(length(max = 20))]
    pub unit: Option<String>,
    #[validate(range(min = 0.0))]
    pub stock_qty: Option<f64>,
    #[validate(range(min = 0.0))]
    pub min_qty: Option<f64>,
    #[validate(range(min = 0.0))]
    pub unit_cost: Option<f64>,
    pub is_active: Option<bool>,
}

/// DTO for updating a part's descriptive fields. Stock moves only via
/// count documents and kardex movements.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdatePart {
    #[validate(length(min = 1, max = 40))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 160))]
    pub name: Option<String>,
    #[validate(length(max = 80))]
    pub category: Option<String>,
    #[validate(length(max = 20))]
    pub unit: Option<String>,
    #[validate(range(min = 0.0))]
    pub min_qty: Option<f64>,
    #[validate(range(min = 0.0))]
    pub unit_cost: Option<f64>,
}

/// Query parameters for listing parts.
#[derive(Debug, Clone, Deserialize)]
pub struct PartSearchParams {
    /// Filter by code or name (ILIKE).
    pub search: Option<String>,
    /// Filter by category (exact).
    pub category: Option<String>,
    /// Include deactivated rows (default false).
    #[serde(default)]
    pub include_inactive: bool,
    /// Maximum results (default 50, max 200).
    pub limit: Option<i64>,
    /// Offset for pagination.
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Count documents
// ---------------------------------------------------------------------------

/// A row from the `inventory_docs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryDoc {
    pub id: DbId,
    pub folio: String,
    pub status: String,
    pub society_id: Option<DbId>,
    pub notes: Option<String>,
    pub opened_by: Option<DbId>,
    pub opened_at: Timestamp,
    pub closed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `inventory_doc_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InventoryDocItem {
    pub id: DbId,
    pub doc_id: DbId,
    pub part_id: DbId,
    pub counted_qty: f64,
    /// Stock at the moment the item was recorded.
    pub expected_qty: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A count document with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct InventoryDocWithItems {
    pub doc: InventoryDoc,
    pub items: Vec<InventoryDocItem>,
}

/// DTO for opening a count document.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInventoryDoc {
    #[validate(range(min = 1))]
    pub society_id: Option<DbId>,
    pub notes: Option<String>,
}

/// One counted line sent when replacing a draft document's items.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct DocItemInput {
    #[validate(range(min = 1))]
    pub part_id: DbId,
    #[validate(range(min = 0.0))]
    pub counted_qty: f64,
}

/// DTO wrapping the full item list for a draft document.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SetDocItems {
    #[validate(nested)]
    pub items: Vec<DocItemInput>,
}

/// Summary returned when a count document is closed.
#[derive(Debug, Clone, Serialize)]
pub struct CloseDocReport {
    pub doc_id: DbId,
    pub items_applied: i64,
    pub adjustments_in: i64,
    pub adjustments_out: i64,
}

// ---------------------------------------------------------------------------
// Kardex
// ---------------------------------------------------------------------------

/// Movement direction: stock in.
pub const KARDEX_IN: &str = "in";
/// Movement direction: stock out.
pub const KARDEX_OUT: &str = "out";

/// Movement reason: count adjustment.
pub const REASON_ADJUSTMENT: &str = "adjustment";
/// Movement reason: consumption against a ticket.
pub const REASON_CONSUMPTION: &str = "consumption";
/// Movement reason: purchase receipt.
pub const REASON_RECEIPT: &str = "receipt";

/// A row from the `kardex_entries` ledger.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct KardexEntry {
    pub id: DbId,
    pub part_id: DbId,
    pub direction: String,
    pub qty: f64,
    pub unit_cost: Option<f64>,
    pub reason: String,
    pub ticket_id: Option<DbId>,
    pub doc_id: Option<DbId>,
    pub moved_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a consumption or receipt movement.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateMovement {
    /// `in` or `out`.
    pub direction: String,
    #[validate(range(min = 0.000001))]
    pub qty: f64,
    #[validate(range(min = 0.0))]
    pub unit_cost: Option<f64>,
    /// Ticket the parts were consumed against, if any.
    #[validate(range(min = 1))]
    pub ticket_id: Option<DbId>,
}

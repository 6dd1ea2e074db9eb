//! Ticket (work order) models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use mainstay_core::types::{DbId, Timestamp};

/// A row from the `tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ticket {
    pub id: DbId,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub asset_id: Option<DbId>,
    pub society_id: Option<DbId>,
    pub status: String,
    pub priority: String,
    pub reported_by: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub opened_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
    pub due_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Ticket enriched with resolved reference names for list screens.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TicketWithRefs {
    pub id: DbId,
    pub code: String,
    pub title: String,
    pub description: Option<String>,
    pub asset_id: Option<DbId>,
    pub society_id: Option<DbId>,
    pub status: String,
    pub priority: String,
    pub reported_by: Option<DbId>,
    pub assigned_to: Option<DbId>,
    pub opened_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub finished_at: Option<Timestamp>,
    pub due_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Resolved asset name (LEFT JOIN).
    pub asset_name: Option<String>,
    /// Resolved society name (LEFT JOIN).
    pub society_name: Option<String>,
    /// Resolved assignee username (LEFT JOIN).
    pub assigned_to_name: Option<String>,
}

/// DTO for creating a ticket. New tickets always start `pending`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTicket {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub asset_id: Option<DbId>,
    #[validate(range(min = 1))]
    pub society_id: Option<DbId>,
    /// Defaults to `medium`.
    pub priority: Option<String>,
    #[validate(range(min = 1))]
    pub assigned_to: Option<DbId>,
    pub due_at: Option<Timestamp>,
}

/// DTO for updating a ticket's descriptive fields. Status changes go
/// through the dedicated status endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateTicket {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub asset_id: Option<DbId>,
    pub priority: Option<String>,
    #[validate(range(min = 1))]
    pub assigned_to: Option<DbId>,
    pub due_at: Option<Timestamp>,
}

/// DTO for requesting a status transition.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangeTicketStatus {
    pub status: String,
}

/// Query parameters for searching/listing tickets.
#[derive(Debug, Clone, Deserialize)]
pub struct TicketSearchParams {
    /// Filter by exact status.
    pub status: Option<String>,
    /// Filter by asset id.
    pub asset_id: Option<DbId>,
    /// Filter by society id.
    pub society_id: Option<DbId>,
    /// Only tickets opened at or after this instant.
    pub opened_from: Option<Timestamp>,
    /// Only tickets opened at or before this instant.
    pub opened_until: Option<Timestamp>,
    /// Maximum results (default 50, max 200).
    pub limit: Option<i64>,
    /// Offset for pagination.
    pub offset: Option<i64>,
}

//! Location models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use mainstay_core::types::{DbId, Timestamp};

/// A row from the `locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Location {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a location.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLocation {
    #[validate(length(min = 1, max = 40))]
    pub code: String,
    #[validate(length(min = 1, max = 160))]
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// DTO for updating a location.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLocation {
    #[validate(length(min = 1, max = 40))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 160))]
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Query parameters for listing locations.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationListParams {
    /// Include deactivated rows (default false).
    #[serde(default)]
    pub include_inactive: bool,
    /// Filter by code or name (ILIKE).
    pub search: Option<String>,
}

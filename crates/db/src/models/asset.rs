//! Asset models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use mainstay_core::types::{DbId, Timestamp};

/// A row from the `assets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub location_id: DbId,
    pub category_id: DbId,
    pub serial_number: Option<String>,
    pub purchase_date: Option<chrono::NaiveDate>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Asset enriched with resolved reference names for list screens.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetWithRefs {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub location_id: DbId,
    pub category_id: DbId,
    pub serial_number: Option<String>,
    pub purchase_date: Option<chrono::NaiveDate>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Resolved location name (from JOIN).
    pub location_name: String,
    /// Resolved category name (from JOIN).
    pub category_name: String,
    /// Open (pending / in execution) tickets referencing this asset.
    pub open_ticket_count: i64,
}

/// DTO for creating an asset.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAsset {
    #[validate(length(min = 1, max = 40))]
    pub code: String,
    #[validate(length(min = 1, max = 160))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub location_id: DbId,
    #[validate(range(min = 1))]
    pub category_id: DbId,
    pub serial_number: Option<String>,
    pub purchase_date: Option<chrono::NaiveDate>,
    pub is_active: Option<bool>,
}

/// DTO for updating an asset.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAsset {
    #[validate(length(min = 1, max = 40))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 160))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 1))]
    pub location_id: Option<DbId>,
    #[validate(range(min = 1))]
    pub category_id: Option<DbId>,
    pub serial_number: Option<String>,
    pub purchase_date: Option<chrono::NaiveDate>,
}

/// Query parameters for searching/listing assets.
#[derive(Debug, Clone, Deserialize)]
pub struct AssetSearchParams {
    /// Filter by code or name (ILIKE).
    pub search: Option<String>,
    /// Filter by location id.
    pub location_id: Option<DbId>,
    /// Filter by category id.
    pub category_id: Option<DbId>,
    /// Include deactivated rows (default false).
    #[serde(default)]
    pub include_inactive: bool,
    /// Maximum results (default 50, max 200).
    pub limit: Option<i64>,
    /// Offset for pagination.
    pub offset: Option<i64>,
}

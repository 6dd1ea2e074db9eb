//! Asset category models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use mainstay_core::types::{DbId, Timestamp};

/// A row from the `asset_categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AssetCategory {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an asset category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAssetCategory {
    #[validate(length(min = 1, max = 40))]
    pub code: String,
    #[validate(length(min = 1, max = 160))]
    pub name: String,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// DTO for updating an asset category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAssetCategory {
    #[validate(length(min = 1, max = 40))]
    pub code: Option<String>,
    #[validate(length(min = 1, max = 160))]
    pub name: Option<String>,
    pub description: Option<String>,
}

//! Society models and DTOs, including the branding fields the clients
//! cache for instant paint.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use mainstay_core::types::{DbId, Timestamp};

/// A row from the `societies` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Society {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub display_name: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    pub contact_email: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// The branding subset served to clients (and held in the cache).
#[derive(Debug, Clone, Serialize)]
pub struct SocietyBranding {
    pub society_id: DbId,
    pub display_name: String,
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
}

impl From<&Society> for SocietyBranding {
    fn from(s: &Society) -> Self {
        SocietyBranding {
            society_id: s.id,
            display_name: s.display_name.clone().unwrap_or_else(|| s.name.clone()),
            logo_url: s.logo_url.clone(),
            primary_color: s.primary_color.clone(),
        }
    }
}

/// DTO for creating a society.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSociety {
    #[validate(length(min = 1, max = 40))]
    pub code: String,
    #[validate(length(min = 1, max = 160))]
    pub name: String,
    #[validate(length(max = 160))]
    pub display_name: Option<String>,
    #[validate(url)]
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub is_active: Option<bool>,
}

/// DTO for updating a society (branding included).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSociety {
    #[validate(length(min = 1, max = 160))]
    pub name: Option<String>,
    #[validate(length(max = 160))]
    pub display_name: Option<String>,
    #[validate(url)]
    pub logo_url: Option<String>,
    pub primary_color: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
}

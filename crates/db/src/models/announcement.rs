//! Announcement models and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use mainstay_core::types::{DbId, Timestamp};

/// A row from the `announcements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Announcement {
    pub id: DbId,
    pub title: String,
    pub body: String,
    pub society_id: Option<DbId>,
    pub publish_from: Option<Timestamp>,
    pub publish_until: Option<Timestamp>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating an announcement.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAnnouncement {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub body: String,
    #[validate(range(min = 1))]
    pub society_id: Option<DbId>,
    pub publish_from: Option<Timestamp>,
    pub publish_until: Option<Timestamp>,
    pub is_active: Option<bool>,
}

/// DTO for updating an announcement.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateAnnouncement {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub body: Option<String>,
    pub publish_from: Option<Timestamp>,
    pub publish_until: Option<Timestamp>,
}

/// Query parameters for listing announcements.
#[derive(Debug, Clone, Deserialize)]
pub struct AnnouncementListParams {
    /// Only announcements whose publish window covers "now".
    #[serde(default)]
    pub current: bool,
    /// Include deactivated rows (default false).
    #[serde(default)]
    pub include_inactive: bool,
    /// Filter by society.
    pub society_id: Option<DbId>,
}

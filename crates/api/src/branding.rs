//! In-process cache of society branding.
//!
//! The clients paint branding (display name, logo, primary color) before
//! anything else, so the branding read path skips the database once a
//! society has been seen. Any write to a society must invalidate its
//! entry; the next read repopulates it.

use std::collections::HashMap;

use tokio::sync::RwLock;

use mainstay_core::types::DbId;
use mainstay_db::models::society::SocietyBranding;
use mainstay_db::repositories::SocietyRepo;
use mainstay_db::DbPool;

/// Read-through branding cache keyed by society id.
#[derive(Default)]
pub struct BrandingCache {
    entries: RwLock<HashMap<DbId, SocietyBranding>>,
}

impl BrandingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch branding for a society, hitting the database only on a
    /// cache miss. Returns `None` when the society does not exist.
    pub async fn get(
        &self,
        pool: &DbPool,
        society_id: DbId,
    ) -> Result<Option<SocietyBranding>, sqlx::Error> {
        if let Some(found) = self.entries.read().await.get(&society_id) {
            return Ok(Some(found.clone()));
        }

        let Some(society) = SocietyRepo::find_by_id(pool, society_id).await? else {
            return Ok(None);
        };

        let branding = SocietyBranding::from(&society);
        self.entries
            .write()
            .await
            .insert(society_id, branding.clone());
        Ok(Some(branding))
    }

    /// Drop one society's cached branding (call after any write to it).
    pub async fn invalidate(&self, society_id: DbId) {
        self.entries.write().await.remove(&society_id);
    }

    /// Number of cached entries (used by tests).
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache currently holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

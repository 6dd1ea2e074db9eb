//! Route definitions for announcements, mounted under `/announcements`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::announcements;
use crate::state::AppState;

/// ```text
/// GET    /                    -> list_announcements
/// POST   /                    -> create_announcement
/// GET    /{id}                -> get_announcement
/// PUT    /{id}                -> update_announcement
/// DELETE /{id}                -> delete_announcement
/// POST   /{id}/toggle-active  -> toggle_announcement
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(announcements::list_announcements).post(announcements::create_announcement),
        )
        .route(
            "/{id}",
            get(announcements::get_announcement)
                .put(announcements::update_announcement)
                .delete(announcements::delete_announcement),
        )
        .route(
            "/{id}/toggle-active",
            post(announcements::toggle_announcement),
        )
}

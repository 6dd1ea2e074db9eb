//! Route definitions for societies, mounted under `/societies`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::societies;
use crate::state::AppState;

/// ```text
/// GET    /                    -> list_societies
/// POST   /                    -> create_society
/// GET    /{id}                -> get_society
/// PUT    /{id}                -> update_society
/// DELETE /{id}                -> delete_society
/// GET    /{id}/branding       -> get_branding (cached)
/// POST   /{id}/toggle-active  -> toggle_society
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(societies::list_societies).post(societies::create_society),
        )
        .route(
            "/{id}",
            get(societies::get_society)
                .put(societies::update_society)
                .delete(societies::delete_society),
        )
        .route("/{id}/branding", get(societies::get_branding))
        .route("/{id}/toggle-active", post(societies::toggle_society))
}

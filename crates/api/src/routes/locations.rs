//! Route definitions for locations, mounted under `/locations`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::locations;
use crate::state::AppState;

/// ```text
/// GET    /                    -> list_locations
/// POST   /                    -> create_location
/// GET    /{id}                -> get_location
/// PUT    /{id}                -> update_location
/// DELETE /{id}                -> delete_location
/// POST   /{id}/toggle-active  -> toggle_location
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(locations::list_locations).post(locations::create_location),
        )
        .route(
            "/{id}",
            get(locations::get_location)
                .put(locations::update_location)
                .delete(locations::delete_location),
        )
        .route("/{id}/toggle-active", post(locations::toggle_location))
}

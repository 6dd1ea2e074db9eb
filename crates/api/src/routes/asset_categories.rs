//! Route definitions for asset categories, mounted under
//! `/asset-categories`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::asset_categories;
use crate::state::AppState;

/// ```text
/// GET    /                    -> list_categories
/// POST   /                    -> create_category
/// GET    /{id}                -> get_category
/// PUT    /{id}                -> update_category
/// DELETE /{id}                -> delete_category
/// POST   /{id}/toggle-active  -> toggle_category
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(asset_categories::list_categories).post(asset_categories::create_category),
        )
        .route(
            "/{id}",
            get(asset_categories::get_category)
                .put(asset_categories::update_category)
                .delete(asset_categories::delete_category),
        )
        .route(
            "/{id}/toggle-active",
            post(asset_categories::toggle_category),
        )
}

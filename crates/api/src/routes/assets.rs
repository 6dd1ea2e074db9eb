//! Route definitions for assets, mounted under `/assets`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::assets;
use crate::state::AppState;

/// ```text
/// GET    /                    -> list_assets
/// POST   /                    -> create_asset
/// GET    /{id}                -> get_asset
/// PUT    /{id}                -> update_asset
/// DELETE /{id}                -> delete_asset
/// POST   /{id}/toggle-active  -> toggle_asset
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(assets::list_assets).post(assets::create_asset))
        .route(
            "/{id}",
            get(assets::get_asset)
                .put(assets::update_asset)
                .delete(assets::delete_asset),
        )
        .route("/{id}/toggle-active", post(assets::toggle_asset))
}

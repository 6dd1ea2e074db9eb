//! Route definitions for inventory, mounted under `/inventory`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::inventory;
use crate::state::AppState;

/// ```text
/// GET    /parts                      -> list_parts
/// POST   /parts                      -> create_part
/// GET    /parts/{id}                 -> get_part (with cost)
/// PUT    /parts/{id}                 -> update_part
/// DELETE /parts/{id}                 -> delete_part
/// POST   /parts/{id}/toggle-active   -> toggle_part
/// GET    /parts/{id}/kardex          -> list_kardex
/// POST   /parts/{id}/movements       -> record_movement
/// GET    /docs                       -> list_docs
/// POST   /docs                       -> open_doc
/// GET    /docs/{id}                  -> get_doc (with items)
/// PUT    /docs/{id}/items            -> set_doc_items
/// POST   /docs/{id}/close            -> close_doc
/// POST   /docs/{id}/cancel           -> cancel_doc
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/parts",
            get(inventory::list_parts).post(inventory::create_part),
        )
        .route(
            "/parts/{id}",
            get(inventory::get_part)
                .put(inventory::update_part)
                .delete(inventory::delete_part),
        )
        .route("/parts/{id}/toggle-active", post(inventory::toggle_part))
        .route("/parts/{id}/kardex", get(inventory::list_kardex))
        .route("/parts/{id}/movements", post(inventory::record_movement))
        .route("/docs", get(inventory::list_docs).post(inventory::open_doc))
        .route("/docs/{id}", get(inventory::get_doc))
        .route("/docs/{id}/items", put(inventory::set_doc_items))
        .route("/docs/{id}/close", post(inventory::close_doc))
        .route("/docs/{id}/cancel", post(inventory::cancel_doc))
}

//! Route definitions for tickets (work orders), mounted under `/tickets`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tickets;
use crate::state::AppState;

/// ```text
/// GET    /             -> list_tickets
/// POST   /             -> create_ticket
/// GET    /{id}         -> get_ticket
/// PUT    /{id}         -> update_ticket
/// DELETE /{id}         -> delete_ticket
/// POST   /{id}/status  -> change_ticket_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tickets::list_tickets).post(tickets::create_ticket))
        .route(
            "/{id}",
            get(tickets::get_ticket)
                .put(tickets::update_ticket)
                .delete(tickets::delete_ticket),
        )
        .route("/{id}/status", post(tickets::change_ticket_status))
}

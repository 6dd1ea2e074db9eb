//! Route definitions for the reporting dashboard, mounted under
//! `/reports`. One endpoint per dashboard tab.

use axum::routing::get;
use axum::Router;

use crate::handlers::reports;
use crate::state::AppState;

/// ```text
/// GET /overview   -> overview (headline KPIs)
/// GET /tickets    -> tickets (breakdowns, aging, trend, SLA)
/// GET /assets     -> assets (top-N by ticket volume)
/// GET /inventory  -> inventory (valuation + consumption)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(reports::overview))
        .route("/tickets", get(reports::tickets))
        .route("/assets", get(reports::assets))
        .route("/inventory", get(reports::inventory))
}

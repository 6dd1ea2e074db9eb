pub mod announcements;
pub mod asset_categories;
pub mod assets;
pub mod health;
pub mod inventory;
pub mod locations;
pub mod rbac;
pub mod reports;
pub mod societies;
pub mod tickets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /locations                             list, create
/// /locations/{id}                        get, update, delete
/// /locations/{id}/toggle-active          toggle
///
/// /asset-categories                      list, create
/// /asset-categories/{id}                 get, update, delete
/// /asset-categories/{id}/toggle-active   toggle
///
/// /assets                                list/search, create
/// /assets/{id}                           get, update, delete
/// /assets/{id}/toggle-active             toggle
///
/// /societies                             list, create
/// /societies/{id}                        get, update, delete
/// /societies/{id}/branding               cached branding read
/// /societies/{id}/toggle-active          toggle
///
/// /admin/roles                           list, create (admin only)
/// /admin/roles/{id}                      get, update, delete
/// /admin/roles/{id}/permissions          replace assignment (PUT)
/// /admin/permissions                     list catalog
/// /admin/permissions/sync                sync compiled-in catalog (POST)
///
/// /tickets                               list/search, create
/// /tickets/{id}                          get, update, delete
/// /tickets/{id}/status                   lifecycle transition (POST)
///
/// /inventory/parts                       list, create
/// /inventory/parts/{id}                  get, update, delete
/// /inventory/parts/{id}/toggle-active    toggle
/// /inventory/parts/{id}/kardex           movement ledger
/// /inventory/parts/{id}/movements        record movement (POST)
/// /inventory/docs                        list, open
/// /inventory/docs/{id}                   get with items
/// /inventory/docs/{id}/items             replace items (PUT)
/// /inventory/docs/{id}/close             apply count (POST)
/// /inventory/docs/{id}/cancel            discard draft (POST)
///
/// /announcements                         list, create
/// /announcements/{id}                    get, update, delete
/// /announcements/{id}/toggle-active      toggle
///
/// /reports/overview                      headline KPIs
/// /reports/tickets                       breakdowns, aging, trend, SLA
/// /reports/assets                        top-N by ticket volume
/// /reports/inventory                     valuation + consumption
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Reference data.
        .nest("/locations", locations::router())
        .nest("/asset-categories", asset_categories::router())
        // Asset registry.
        .nest("/assets", assets::router())
        // Societies and branding.
        .nest("/societies", societies::router())
        // RBAC administration.
        .nest("/admin", rbac::router())
        // Work orders.
        .nest("/tickets", tickets::router())
        // Inventory: parts, counts, kardex.
        .nest("/inventory", inventory::router())
        // Announcements.
        .nest("/announcements", announcements::router())
        // Reporting dashboard.
        .nest("/reports", reports::router())
}

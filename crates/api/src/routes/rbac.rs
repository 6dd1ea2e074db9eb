//! Route definitions for RBAC administration, mounted under `/admin`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::rbac;
use crate::state::AppState;

/// ```text
/// GET    /roles                   -> list_roles
/// POST   /roles                   -> create_role
/// GET    /roles/{id}              -> get_role (with permissions)
/// PUT    /roles/{id}              -> update_role
/// DELETE /roles/{id}              -> delete_role
/// PUT    /roles/{id}/permissions  -> set_role_permissions
/// GET    /permissions             -> list_permissions
/// POST   /permissions/sync        -> sync_permissions
/// ```
///
/// Everything here is admin-only.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/roles", get(rbac::list_roles).post(rbac::create_role))
        .route(
            "/roles/{id}",
            get(rbac::get_role)
                .put(rbac::update_role)
                .delete(rbac::delete_role),
        )
        .route("/roles/{id}/permissions", put(rbac::set_role_permissions))
        .route("/permissions", get(rbac::list_permissions))
        .route("/permissions/sync", post(rbac::sync_permissions))
}

//! Role/permission gating for handlers.
//!
//! [`RequireAdmin`] and [`RequireAuth`] are extractors in the usual
//! Axum style. Finer-grained checks go through [`ensure_permission`],
//! which consults the role/permission assignment in the database; the
//! admin role bypasses per-permission checks.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use mainstay_core::error::CoreError;
use mainstay_core::roles::ROLE_ADMIN;
use mainstay_db::repositories::PermissionRepo;

use super::auth::AuthUser;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Requires the `admin` role. Rejects with 403 Forbidden otherwise.
///
/// ```ignore
/// async fn admin_only(RequireAdmin(user): RequireAdmin) -> AppResult<Json<()>> {
///     // user is guaranteed to be an admin here
///     Ok(Json(()))
/// }
/// ```
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if user.role != ROLE_ADMIN {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires any authenticated user (any valid role).
///
/// Functionally equivalent to [`AuthUser`] but named explicitly for use
/// in route definitions where the intent "this route requires
/// authentication" should be self-documenting.
pub struct RequireAuth(pub AuthUser);

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        Ok(RequireAuth(user))
    }
}

/// Reject with 403 unless the user's role holds `permission_code`.
///
/// Admins pass unconditionally; everyone else is checked against the
/// `role_permissions` assignment.
pub async fn ensure_permission(
    state: &AppState,
    user: &AuthUser,
    permission_code: &str,
) -> AppResult<()> {
    if user.role == ROLE_ADMIN {
        return Ok(());
    }

    let allowed =
        PermissionRepo::role_has_permission(&state.pool, &user.role, permission_code).await?;
    if !allowed {
        return Err(AppError::Core(CoreError::Forbidden(format!(
            "Permission '{permission_code}' required"
        ))));
    }
    Ok(())
}

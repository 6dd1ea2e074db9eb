//! Handlers for RBAC administration: role CRUD, the permission catalog,
//! and role/permission assignment. All endpoints are admin-only.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use mainstay_core::error::CoreError;
use mainstay_core::types::DbId;
use mainstay_db::models::role::{CreateRole, RoleWithPermissions, SetRolePermissions, UpdateRole};
use mainstay_db::repositories::{PermissionRepo, RoleRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/roles
pub async fn list_roles(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let roles = RoleRepo::list(&state.pool).await?;

    Ok(Json(DataResponse { data: roles }))
}

/// GET /api/v1/admin/roles/{id}
///
/// Role detail including its assigned permissions.
pub async fn get_role(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let role = RoleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Role", id }))?;

    let permissions = PermissionRepo::list_for_role(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: RoleWithPermissions { role, permissions },
    }))
}

/// POST /api/v1/admin/roles
pub async fn create_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateRole>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    if RoleRepo::find_by_name(&state.pool, &input.name).await?.is_some() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Role '{}' already exists",
            input.name
        ))));
    }

    let role = RoleRepo::create(&state.pool, &input).await?;

    tracing::info!(
        role_id = role.id,
        name = %role.name,
        user_id = admin.user_id,
        "Role created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: role })))
}

/// PUT /api/v1/admin/roles/{id}
pub async fn update_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateRole>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let role = RoleRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Role", id }))?;

    tracing::info!(role_id = id, user_id = admin.user_id, "Role updated");

    Ok(Json(DataResponse { data: role }))
}

/// DELETE /api/v1/admin/roles/{id}
///
/// Rejected with 409 while users still hold the role.
pub async fn delete_role(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let holders = RoleRepo::count_users(&state.pool, id).await?;
    if holders > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Role is held by {holders} user(s)"
        ))));
    }

    let deleted = RoleRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Role", id }));
    }

    tracing::info!(role_id = id, user_id = admin.user_id, "Role deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Permissions
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/permissions
pub async fn list_permissions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let permissions = PermissionRepo::list(&state.pool).await?;

    Ok(Json(DataResponse { data: permissions }))
}

/// POST /api/v1/admin/permissions/sync
///
/// Upsert the compiled-in permission catalog into the database.
pub async fn sync_permissions(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let report = PermissionRepo::sync(&state.pool).await?;

    tracing::info!(
        inserted = report.inserted,
        updated = report.updated,
        user_id = admin.user_id,
        "Permission sync requested",
    );

    Ok(Json(DataResponse { data: report }))
}

/// PUT /api/v1/admin/roles/{id}/permissions
///
/// Replace the role's permission set atomically.
pub async fn set_role_permissions(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetRolePermissions>,
) -> AppResult<impl IntoResponse> {
    let role = RoleRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Role", id }))?;

    PermissionRepo::set_for_role(&state.pool, role.id, &input.permission_ids).await?;
    let permissions = PermissionRepo::list_for_role(&state.pool, role.id).await?;

    tracing::info!(
        role_id = id,
        permission_count = permissions.len(),
        user_id = admin.user_id,
        "Role permissions replaced",
    );

    Ok(Json(DataResponse {
        data: RoleWithPermissions { role, permissions },
    }))
}

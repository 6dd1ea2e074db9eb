//! Handlers for the `/societies` resource.
//!
//! Every write invalidates the society's entry in the branding cache so
//! the next branding read sees fresh data.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use mainstay_core::error::CoreError;
use mainstay_core::roles::PERM_SOCIETIES_MANAGE;
use mainstay_core::types::DbId;
use mainstay_core::validation::{require_hex_color, require_trimmed, MAX_CODE_LEN, MAX_NAME_LEN};
use mainstay_db::models::society::{CreateSociety, UpdateSociety};
use mainstay_db::repositories::SocietyRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{ensure_permission, RequireAuth};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/societies
pub async fn list_societies(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let societies = SocietyRepo::list(&state.pool, params.include_inactive).await?;

    Ok(Json(DataResponse { data: societies }))
}

/// GET /api/v1/societies/{id}
pub async fn get_society(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let society = SocietyRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Society",
            id,
        }))?;

    Ok(Json(DataResponse { data: society }))
}

/// GET /api/v1/societies/{id}/branding
///
/// Served from the in-process cache; populated on first read.
pub async fn get_branding(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let branding = state
        .branding_cache
        .get(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Society",
            id,
        }))?;

    Ok(Json(DataResponse { data: branding }))
}

/// POST /api/v1/societies
pub async fn create_society(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Json(mut input): Json<CreateSociety>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_SOCIETIES_MANAGE).await?;

    input.validate()?;
    input.code = require_trimmed("code", &input.code, MAX_CODE_LEN)?.to_string();
    input.name = require_trimmed("name", &input.name, MAX_NAME_LEN)?.to_string();
    if let Some(color) = input.primary_color.as_deref() {
        require_hex_color("primary_color", color)?;
    }

    let society = SocietyRepo::create(&state.pool, &input).await?;

    tracing::info!(
        society_id = society.id,
        code = %society.code,
        user_id = auth.user_id,
        "Society created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: society })))
}

/// PUT /api/v1/societies/{id}
pub async fn update_society(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateSociety>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_SOCIETIES_MANAGE).await?;

    input.validate()?;
    if let Some(name) = input.name.as_deref() {
        input.name = Some(require_trimmed("name", name, MAX_NAME_LEN)?.to_string());
    }
    if let Some(color) = input.primary_color.as_deref() {
        require_hex_color("primary_color", color)?;
    }

    let society = SocietyRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Society",
            id,
        }))?;

    state.branding_cache.invalidate(id).await;

    tracing::info!(society_id = id, user_id = auth.user_id, "Society updated");

    Ok(Json(DataResponse { data: society }))
}

/// POST /api/v1/societies/{id}/toggle-active
pub async fn toggle_society(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_SOCIETIES_MANAGE).await?;

    let society = SocietyRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Society",
            id,
        }))?;

    state.branding_cache.invalidate(id).await;

    tracing::info!(
        society_id = id,
        is_active = society.is_active,
        user_id = auth.user_id,
        "Society active flag toggled",
    );

    Ok(Json(DataResponse { data: society }))
}

/// DELETE /api/v1/societies/{id}
///
/// Rejected with 409 while tickets still reference the society.
pub async fn delete_society(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_SOCIETIES_MANAGE).await?;

    let dependents = SocietyRepo::count_tickets(&state.pool, id).await?;
    if dependents > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Society is referenced by {dependents} ticket(s); deactivate it instead"
        ))));
    }

    let deleted = SocietyRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Society",
            id,
        }));
    }

    state.branding_cache.invalidate(id).await;

    tracing::info!(society_id = id, user_id = auth.user_id, "Society deleted");

    Ok(StatusCode::NO_CONTENT)
}

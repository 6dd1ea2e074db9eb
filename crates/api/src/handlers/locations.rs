//! Handlers for the `/locations` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use mainstay_core::error::CoreError;
use mainstay_core::roles::PERM_LOCATIONS_MANAGE;
use mainstay_core::types::DbId;
use mainstay_core::validation::{require_trimmed, MAX_CODE_LEN, MAX_NAME_LEN};
use mainstay_db::models::location::{CreateLocation, LocationListParams, UpdateLocation};
use mainstay_db::repositories::LocationRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{ensure_permission, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/locations
///
/// List locations with optional search and `include_inactive`.
pub async fn list_locations(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<LocationListParams>,
) -> AppResult<impl IntoResponse> {
    let locations = LocationRepo::list(&state.pool, &params).await?;

    Ok(Json(DataResponse { data: locations }))
}

/// GET /api/v1/locations/{id}
pub async fn get_location(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let location = LocationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id,
        }))?;

    Ok(Json(DataResponse { data: location }))
}

/// POST /api/v1/locations
pub async fn create_location(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Json(mut input): Json<CreateLocation>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_LOCATIONS_MANAGE).await?;

    input.validate()?;
    input.code = require_trimmed("code", &input.code, MAX_CODE_LEN)?.to_string();
    input.name = require_trimmed("name", &input.name, MAX_NAME_LEN)?.to_string();

    let location = LocationRepo::create(&state.pool, &input).await?;

    tracing::info!(
        location_id = location.id,
        code = %location.code,
        user_id = auth.user_id,
        "Location created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: location })))
}

/// PUT /api/v1/locations/{id}
pub async fn update_location(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateLocation>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_LOCATIONS_MANAGE).await?;

    input.validate()?;
    if let Some(code) = input.code.as_deref() {
        input.code = Some(require_trimmed("code", code, MAX_CODE_LEN)?.to_string());
    }
    if let Some(name) = input.name.as_deref() {
        input.name = Some(require_trimmed("name", name, MAX_NAME_LEN)?.to_string());
    }

    let location = LocationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id,
        }))?;

    tracing::info!(location_id = id, user_id = auth.user_id, "Location updated");

    Ok(Json(DataResponse { data: location }))
}

/// POST /api/v1/locations/{id}/toggle-active
pub async fn toggle_location(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_LOCATIONS_MANAGE).await?;

    let location = LocationRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id,
        }))?;

    tracing::info!(
        location_id = id,
        is_active = location.is_active,
        user_id = auth.user_id,
        "Location active flag toggled",
    );

    Ok(Json(DataResponse { data: location }))
}

/// DELETE /api/v1/locations/{id}
///
/// Rejected with 409 while assets still reference the location.
pub async fn delete_location(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_LOCATIONS_MANAGE).await?;

    let dependents = LocationRepo::count_assets(&state.pool, id).await?;
    if dependents > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Location is referenced by {dependents} asset(s); deactivate it instead"
        ))));
    }

    let deleted = LocationRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Location",
            id,
        }));
    }

    tracing::info!(location_id = id, user_id = auth.user_id, "Location deleted");

    Ok(StatusCode::NO_CONTENT)
}

//! Handlers for the `/assets` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use mainstay_core::error::CoreError;
use mainstay_core::roles::PERM_ASSETS_MANAGE;
use mainstay_core::types::DbId;
use mainstay_core::validation::{require_trimmed, MAX_CODE_LEN, MAX_NAME_LEN};
use mainstay_db::models::asset::{AssetSearchParams, CreateAsset, UpdateAsset};
use mainstay_db::repositories::{AssetCategoryRepo, AssetRepo, LocationRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{ensure_permission, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Check that the referenced location and category exist and report the
/// missing one by name.
async fn ensure_refs_exist(
    pool: &sqlx::PgPool,
    location_id: Option<DbId>,
    category_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(id) = location_id {
        if LocationRepo::find_by_id(pool, id).await?.is_none() {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Location",
                id,
            }));
        }
    }
    if let Some(id) = category_id {
        if AssetCategoryRepo::find_by_id(pool, id).await?.is_none() {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "AssetCategory",
                id,
            }));
        }
    }
    Ok(())
}

/// GET /api/v1/assets
///
/// List/search assets with optional filters. Rows arrive enriched with
/// location/category names and open-ticket counts.
pub async fn list_assets(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<AssetSearchParams>,
) -> AppResult<impl IntoResponse> {
    let assets = AssetRepo::search(&state.pool, &params).await?;

    Ok(Json(DataResponse { data: assets }))
}

/// GET /api/v1/assets/{id}
pub async fn get_asset(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let asset = AssetRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;

    Ok(Json(DataResponse { data: asset }))
}

/// POST /api/v1/assets
pub async fn create_asset(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Json(mut input): Json<CreateAsset>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_ASSETS_MANAGE).await?;

    input.validate()?;
    input.code = require_trimmed("code", &input.code, MAX_CODE_LEN)?.to_string();
    input.name = require_trimmed("name", &input.name, MAX_NAME_LEN)?.to_string();

    ensure_refs_exist(&state.pool, Some(input.location_id), Some(input.category_id)).await?;

    let asset = AssetRepo::create(&state.pool, &input).await?;

    tracing::info!(
        asset_id = asset.id,
        code = %asset.code,
        user_id = auth.user_id,
        "Asset created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// PUT /api/v1/assets/{id}
pub async fn update_asset(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateAsset>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_ASSETS_MANAGE).await?;

    input.validate()?;
    if let Some(code) = input.code.as_deref() {
        input.code = Some(require_trimmed("code", code, MAX_CODE_LEN)?.to_string());
    }
    if let Some(name) = input.name.as_deref() {
        input.name = Some(require_trimmed("name", name, MAX_NAME_LEN)?.to_string());
    }

    ensure_refs_exist(&state.pool, input.location_id, input.category_id).await?;

    let asset = AssetRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;

    tracing::info!(asset_id = id, user_id = auth.user_id, "Asset updated");

    Ok(Json(DataResponse { data: asset }))
}

/// POST /api/v1/assets/{id}/toggle-active
pub async fn toggle_asset(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_ASSETS_MANAGE).await?;

    let asset = AssetRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Asset", id }))?;

    tracing::info!(
        asset_id = id,
        is_active = asset.is_active,
        user_id = auth.user_id,
        "Asset active flag toggled",
    );

    Ok(Json(DataResponse { data: asset }))
}

/// DELETE /api/v1/assets/{id}
///
/// Rejected with 409 while tickets still reference the asset.
pub async fn delete_asset(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_ASSETS_MANAGE).await?;

    let dependents = AssetRepo::count_tickets(&state.pool, id).await?;
    if dependents > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Asset is referenced by {dependents} ticket(s); deactivate it instead"
        ))));
    }

    let deleted = AssetRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound { entity: "Asset", id }));
    }

    tracing::info!(asset_id = id, user_id = auth.user_id, "Asset deleted");

    Ok(StatusCode::NO_CONTENT)
}

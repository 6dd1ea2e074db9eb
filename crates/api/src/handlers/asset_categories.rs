//! Handlers for the `/asset-categories` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use mainstay_core::error::CoreError;
use mainstay_core::roles::PERM_CATEGORIES_MANAGE;
use mainstay_core::types::DbId;
use mainstay_core::validation::{require_trimmed, MAX_CODE_LEN, MAX_NAME_LEN};
use mainstay_db::models::asset_category::{CreateAssetCategory, UpdateAssetCategory};
use mainstay_db::repositories::AssetCategoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{ensure_permission, RequireAuth};
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/asset-categories
pub async fn list_categories(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let categories = AssetCategoryRepo::list(&state.pool, params.include_inactive).await?;

    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/asset-categories/{id}
pub async fn get_category(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let category = AssetCategoryRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AssetCategory",
            id,
        }))?;

    Ok(Json(DataResponse { data: category }))
}

/// POST /api/v1/asset-categories
pub async fn create_category(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Json(mut input): Json<CreateAssetCategory>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_CATEGORIES_MANAGE).await?;

    input.validate()?;
    input.code = require_trimmed("code", &input.code, MAX_CODE_LEN)?.to_string();
    input.name = require_trimmed("name", &input.name, MAX_NAME_LEN)?.to_string();

    let category = AssetCategoryRepo::create(&state.pool, &input).await?;

    tracing::info!(
        category_id = category.id,
        code = %category.code,
        user_id = auth.user_id,
        "Asset category created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/asset-categories/{id}
pub async fn update_category(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateAssetCategory>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_CATEGORIES_MANAGE).await?;

    input.validate()?;
    if let Some(code) = input.code.as_deref() {
        input.code = Some(require_trimmed("code", code, MAX_CODE_LEN)?.to_string());
    }
    if let Some(name) = input.name.as_deref() {
        input.name = Some(require_trimmed("name", name, MAX_NAME_LEN)?.to_string());
    }

    let category = AssetCategoryRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AssetCategory",
            id,
        }))?;

    tracing::info!(category_id = id, user_id = auth.user_id, "Asset category updated");

    Ok(Json(DataResponse { data: category }))
}

/// POST /api/v1/asset-categories/{id}/toggle-active
pub async fn toggle_category(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_CATEGORIES_MANAGE).await?;

    let category = AssetCategoryRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AssetCategory",
            id,
        }))?;

    tracing::info!(
        category_id = id,
        is_active = category.is_active,
        user_id = auth.user_id,
        "Asset category active flag toggled",
    );

    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/asset-categories/{id}
///
/// Rejected with 409 while assets still reference the category.
pub async fn delete_category(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_CATEGORIES_MANAGE).await?;

    let dependents = AssetCategoryRepo::count_assets(&state.pool, id).await?;
    if dependents > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Category is referenced by {dependents} asset(s); deactivate it instead"
        ))));
    }

    let deleted = AssetCategoryRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "AssetCategory",
            id,
        }));
    }

    tracing::info!(category_id = id, user_id = auth.user_id, "Asset category deleted");

    Ok(StatusCode::NO_CONTENT)
}

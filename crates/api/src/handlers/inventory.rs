//! Handlers for inventory: parts, count documents, and the kardex
//! ledger.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use mainstay_core::error::CoreError;
use mainstay_core::roles::PERM_INVENTORY_MANAGE;
use mainstay_core::status::DocStatus;
use mainstay_core::types::DbId;
use mainstay_core::validation::{require_trimmed, MAX_CODE_LEN, MAX_NAME_LEN};
use mainstay_db::models::inventory::{
    CreateInventoryDoc, CreateMovement, CreatePart, InventoryDocWithItems, PartSearchParams,
    SetDocItems, UpdatePart, KARDEX_IN, KARDEX_OUT, REASON_CONSUMPTION, REASON_RECEIPT,
};
use mainstay_db::repositories::InventoryRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{ensure_permission, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Parts
// ---------------------------------------------------------------------------

/// GET /api/v1/inventory/parts
pub async fn list_parts(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<PartSearchParams>,
) -> AppResult<impl IntoResponse> {
    let parts = InventoryRepo::search_parts(&state.pool, &params).await?;

    Ok(Json(DataResponse { data: parts }))
}

/// GET /api/v1/inventory/parts/{id}
///
/// Part detail with its unit cost, when one is recorded.
pub async fn get_part(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let part = InventoryRepo::find_part(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "InventoryPart",
            id,
        }))?;

    let cost = InventoryRepo::find_cost(&state.pool, id).await?;

    let detail = serde_json::json!({
        "part": part,
        "cost": cost,
    });

    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/inventory/parts
pub async fn create_part(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Json(mut input): Json<CreatePart>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_INVENTORY_MANAGE).await?;

    input.validate()?;
    input.code = require_trimmed("code", &input.code, MAX_CODE_LEN)?.to_string();
    input.name = require_trimmed("name", &input.name, MAX_NAME_LEN)?.to_string();

    let part = InventoryRepo::create_part(&state.pool, &input).await?;

    tracing::info!(
        part_id = part.id,
        code = %part.code,
        user_id = auth.user_id,
        "Inventory part created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: part })))
}

/// PUT /api/v1/inventory/parts/{id}
pub async fn update_part(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdatePart>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_INVENTORY_MANAGE).await?;

    input.validate()?;
    if let Some(code) = input.code.as_deref() {
        input.code = Some(require_trimmed("code", code, MAX_CODE_LEN)?.to_string());
    }
    if let Some(name) = input.name.as_deref() {
        input.name = Some(require_trimmed("name", name, MAX_NAME_LEN)?.to_string());
    }

    let part = InventoryRepo::update_part(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "InventoryPart",
            id,
        }))?;

    tracing::info!(part_id = id, user_id = auth.user_id, "Inventory part updated");

    Ok(Json(DataResponse { data: part }))
}

/// POST /api/v1/inventory/parts/{id}/toggle-active
pub async fn toggle_part(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_INVENTORY_MANAGE).await?;

    let part = InventoryRepo::toggle_part_active(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "InventoryPart",
            id,
        }))?;

    tracing::info!(
        part_id = id,
        is_active = part.is_active,
        user_id = auth.user_id,
        "Inventory part active flag toggled",
    );

    Ok(Json(DataResponse { data: part }))
}

/// DELETE /api/v1/inventory/parts/{id}
///
/// Rejected with 409 while kardex history references the part.
pub async fn delete_part(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_INVENTORY_MANAGE).await?;

    let movements = InventoryRepo::count_movements(&state.pool, id).await?;
    if movements > 0 {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Part has {movements} kardex movement(s); deactivate it instead"
        ))));
    }

    let deleted = InventoryRepo::delete_part(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "InventoryPart",
            id,
        }));
    }

    tracing::info!(part_id = id, user_id = auth.user_id, "Inventory part deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Kardex
// ---------------------------------------------------------------------------

/// GET /api/v1/inventory/parts/{id}/kardex
///
/// Movement ledger for one part, newest first.
pub async fn list_kardex(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let entries = InventoryRepo::list_kardex(&state.pool, id).await?;

    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/inventory/parts/{id}/movements
///
/// Record a consumption (`out`) or receipt (`in`) movement; stock and
/// ledger move together.
pub async fn record_movement(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateMovement>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_INVENTORY_MANAGE).await?;

    input.validate()?;
    let reason = match input.direction.as_str() {
        KARDEX_OUT => REASON_CONSUMPTION,
        KARDEX_IN => REASON_RECEIPT,
        other => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Unknown direction: '{other}'. Valid directions: {KARDEX_IN}, {KARDEX_OUT}"
            ))))
        }
    };

    let entry = InventoryRepo::record_movement(&state.pool, id, &input, reason)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "InventoryPart",
            id,
        }))?;

    tracing::info!(
        part_id = id,
        direction = %entry.direction,
        qty = entry.qty,
        user_id = auth.user_id,
        "Kardex movement recorded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

// ---------------------------------------------------------------------------
// Count documents
// ---------------------------------------------------------------------------

/// Fetch a document or 404.
async fn find_doc(
    pool: &sqlx::PgPool,
    id: DbId,
) -> AppResult<mainstay_db::models::inventory::InventoryDoc> {
    InventoryRepo::find_doc(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "InventoryDoc",
            id,
        }))
}

/// Reject operations on documents that are no longer drafts.
fn ensure_draft(status: &str) -> AppResult<()> {
    if DocStatus::from_str(status)? != DocStatus::Draft {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Count document is {status} and can no longer change"
        ))));
    }
    Ok(())
}

/// GET /api/v1/inventory/docs
pub async fn list_docs(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let docs = InventoryRepo::list_docs(&state.pool).await?;

    Ok(Json(DataResponse { data: docs }))
}

/// GET /api/v1/inventory/docs/{id}
///
/// Document detail including its line items.
pub async fn get_doc(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let doc = find_doc(&state.pool, id).await?;
    let items = InventoryRepo::list_doc_items(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: InventoryDocWithItems { doc, items },
    }))
}

/// POST /api/v1/inventory/docs
///
/// Open a count document in `draft`.
pub async fn open_doc(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<CreateInventoryDoc>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_INVENTORY_MANAGE).await?;

    input.validate()?;

    let doc = InventoryRepo::open_doc(&state.pool, &input, Some(auth.user_id)).await?;

    tracing::info!(
        doc_id = doc.id,
        folio = %doc.folio,
        user_id = auth.user_id,
        "Inventory count opened",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: doc })))
}

/// PUT /api/v1/inventory/docs/{id}/items
///
/// Replace the draft document's counted lines.
pub async fn set_doc_items(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetDocItems>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_INVENTORY_MANAGE).await?;

    input.validate()?;

    let doc = find_doc(&state.pool, id).await?;
    ensure_draft(&doc.status)?;

    let items = InventoryRepo::set_doc_items(&state.pool, id, &input.items).await?;

    tracing::info!(
        doc_id = id,
        item_count = items.len(),
        user_id = auth.user_id,
        "Inventory count items replaced",
    );

    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/inventory/docs/{id}/close
///
/// Apply the counted quantities: stock adjusts and kardex entries are
/// appended in a single transaction.
pub async fn close_doc(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_INVENTORY_MANAGE).await?;

    let doc = find_doc(&state.pool, id).await?;
    ensure_draft(&doc.status)?;

    let report = InventoryRepo::close_doc(&state.pool, id).await?;

    tracing::info!(
        doc_id = id,
        items_applied = report.items_applied,
        user_id = auth.user_id,
        "Inventory count closed",
    );

    Ok(Json(DataResponse { data: report }))
}

/// POST /api/v1/inventory/docs/{id}/cancel
///
/// Discard a draft document without touching stock.
pub async fn cancel_doc(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_INVENTORY_MANAGE).await?;

    let doc = find_doc(&state.pool, id).await?;
    ensure_draft(&doc.status)?;

    let doc = InventoryRepo::cancel_doc(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "InventoryDoc",
            id,
        }))?;

    tracing::info!(doc_id = id, user_id = auth.user_id, "Inventory count cancelled");

    Ok(Json(DataResponse { data: doc }))
}

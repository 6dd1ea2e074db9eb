//! Handlers for the `/tickets` resource (work orders).
//!
//! Status changes go through a dedicated endpoint so the lifecycle
//! rules in `mainstay_core::status` are enforced in one place.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use mainstay_core::error::CoreError;
use mainstay_core::roles::{PERM_TICKETS_MANAGE, PERM_TICKETS_VIEW};
use mainstay_core::status::{validate_priority, validate_ticket_transition, PRIORITY_MEDIUM};
use mainstay_core::types::DbId;
use mainstay_core::validation::require_trimmed;
use mainstay_db::models::ticket::{
    ChangeTicketStatus, CreateTicket, TicketSearchParams, UpdateTicket,
};
use mainstay_db::repositories::{AssetRepo, TicketRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{ensure_permission, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum length for ticket titles.
const MAX_TITLE_LEN: usize = 200;

/// GET /api/v1/tickets
///
/// List/search tickets with optional filters.
pub async fn list_tickets(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<TicketSearchParams>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_TICKETS_VIEW).await?;

    let tickets = TicketRepo::search(&state.pool, &params).await?;

    Ok(Json(DataResponse { data: tickets }))
}

/// GET /api/v1/tickets/{id}
pub async fn get_ticket(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_TICKETS_VIEW).await?;

    let ticket = TicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))?;

    Ok(Json(DataResponse { data: ticket }))
}

/// POST /api/v1/tickets
///
/// Create a ticket in `pending`, reported by the caller.
pub async fn create_ticket(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Json(mut input): Json<CreateTicket>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_TICKETS_MANAGE).await?;

    input.validate()?;
    input.title = require_trimmed("title", &input.title, MAX_TITLE_LEN)?.to_string();

    let priority = input
        .priority
        .clone()
        .unwrap_or_else(|| PRIORITY_MEDIUM.to_string());
    validate_priority(&priority)?;

    if let Some(asset_id) = input.asset_id {
        if !AssetRepo::verify_exists(&state.pool, asset_id).await? {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "Asset",
                id: asset_id,
            }));
        }
    }

    let ticket = TicketRepo::create(&state.pool, &input, &priority, Some(auth.user_id)).await?;

    tracing::info!(
        ticket_id = ticket.id,
        code = %ticket.code,
        priority = %ticket.priority,
        user_id = auth.user_id,
        "Ticket created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket })))
}

/// PUT /api/v1/tickets/{id}
///
/// Update descriptive fields. Terminal tickets are immutable.
pub async fn update_ticket(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateTicket>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_TICKETS_MANAGE).await?;

    input.validate()?;
    if let Some(title) = input.title.as_deref() {
        input.title = Some(require_trimmed("title", title, MAX_TITLE_LEN)?.to_string());
    }
    if let Some(priority) = input.priority.as_deref() {
        validate_priority(priority)?;
    }

    let existing = TicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))?;

    let current = mainstay_core::status::TicketStatus::from_str(&existing.status)?;
    if !current.is_open() {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Ticket {} is {} and can no longer be edited",
            existing.code, existing.status
        ))));
    }

    let ticket = TicketRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))?;

    tracing::info!(ticket_id = id, user_id = auth.user_id, "Ticket updated");

    Ok(Json(DataResponse { data: ticket }))
}

/// POST /api/v1/tickets/{id}/status
///
/// Progress the ticket through its lifecycle
/// (`pending -> in_execution -> finalized`, cancellation from either
/// open status). Invalid transitions are a 400.
pub async fn change_ticket_status(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ChangeTicketStatus>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_TICKETS_MANAGE).await?;

    let existing = TicketRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))?;

    let to = validate_ticket_transition(&existing.status, &input.status)?;

    let ticket = TicketRepo::change_status(&state.pool, id, to)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }))?;

    tracing::info!(
        ticket_id = id,
        from = %existing.status,
        to = %ticket.status,
        user_id = auth.user_id,
        "Ticket status changed",
    );

    Ok(Json(DataResponse { data: ticket }))
}

/// DELETE /api/v1/tickets/{id}
pub async fn delete_ticket(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_TICKETS_MANAGE).await?;

    let deleted = TicketRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Ticket",
            id,
        }));
    }

    tracing::info!(ticket_id = id, user_id = auth.user_id, "Ticket deleted");

    Ok(StatusCode::NO_CONTENT)
}

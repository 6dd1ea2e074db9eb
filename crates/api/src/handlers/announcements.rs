//! Handlers for the `/announcements` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use validator::Validate;

use mainstay_core::error::CoreError;
use mainstay_core::roles::PERM_ANNOUNCEMENTS_MANAGE;
use mainstay_core::types::DbId;
use mainstay_core::validation::{require_ordered_window, require_trimmed};
use mainstay_db::models::announcement::{
    AnnouncementListParams, CreateAnnouncement, UpdateAnnouncement,
};
use mainstay_db::repositories::AnnouncementRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::{ensure_permission, RequireAuth};
use crate::response::DataResponse;
use crate::state::AppState;

/// Maximum length for announcement titles.
const MAX_TITLE_LEN: usize = 200;

/// GET /api/v1/announcements
///
/// `?current=true` limits the list to announcements whose publish
/// window covers "now".
pub async fn list_announcements(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Query(params): Query<AnnouncementListParams>,
) -> AppResult<impl IntoResponse> {
    let announcements = AnnouncementRepo::list(&state.pool, &params).await?;

    Ok(Json(DataResponse {
        data: announcements,
    }))
}

/// GET /api/v1/announcements/{id}
pub async fn get_announcement(
    RequireAuth(_auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let announcement = AnnouncementRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Announcement",
            id,
        }))?;

    Ok(Json(DataResponse { data: announcement }))
}

/// POST /api/v1/announcements
pub async fn create_announcement(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Json(mut input): Json<CreateAnnouncement>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_ANNOUNCEMENTS_MANAGE).await?;

    input.validate()?;
    input.title = require_trimmed("title", &input.title, MAX_TITLE_LEN)?.to_string();
    require_ordered_window(input.publish_from, input.publish_until)?;

    let announcement = AnnouncementRepo::create(&state.pool, &input).await?;

    tracing::info!(
        announcement_id = announcement.id,
        user_id = auth.user_id,
        "Announcement created",
    );

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: announcement }),
    ))
}

/// PUT /api/v1/announcements/{id}
pub async fn update_announcement(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateAnnouncement>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_ANNOUNCEMENTS_MANAGE).await?;

    input.validate()?;
    if let Some(title) = input.title.as_deref() {
        input.title = Some(require_trimmed("title", title, MAX_TITLE_LEN)?.to_string());
    }
    require_ordered_window(input.publish_from, input.publish_until)?;

    let announcement = AnnouncementRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Announcement",
            id,
        }))?;

    tracing::info!(announcement_id = id, user_id = auth.user_id, "Announcement updated");

    Ok(Json(DataResponse { data: announcement }))
}

/// POST /api/v1/announcements/{id}/toggle-active
pub async fn toggle_announcement(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_ANNOUNCEMENTS_MANAGE).await?;

    let announcement = AnnouncementRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Announcement",
            id,
        }))?;

    tracing::info!(
        announcement_id = id,
        is_active = announcement.is_active,
        user_id = auth.user_id,
        "Announcement active flag toggled",
    );

    Ok(Json(DataResponse { data: announcement }))
}

/// DELETE /api/v1/announcements/{id}
pub async fn delete_announcement(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_permission(&state, &auth, PERM_ANNOUNCEMENTS_MANAGE).await?;

    let deleted = AnnouncementRepo::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Announcement",
            id,
        }));
    }

    tracing::info!(announcement_id = id, user_id = auth.user_id, "Announcement deleted");

    Ok(StatusCode::NO_CONTENT)
}

//! Handlers for the `/notifications` resource.
//!
//! All endpoints require authentication via [`AuthUser`]. Admins read the
//! shared admin inbox alongside their own.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use postboard_core::types::EntityId;
use postboard_db::models::notification::Notification;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::{CountResponse, DataResponse};
use crate::services::notify;
use crate::state::AppState;

/// GET /api/v1/notifications
///
/// Unread notifications plus those read in the last week, newest first.
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Notification>>>> {
    let feed = notify::feed(&state.pool, &auth.actor, Utc::now()).await?;
    Ok(Json(DataResponse { data: feed }))
}

/// POST /api/v1/notifications/{id}/read
///
/// Returns 204 No Content, or 404 if the notification is not in one of the
/// caller's inboxes.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_uuid): Path<EntityId>,
) -> AppResult<impl IntoResponse> {
    notify::mark_read(&state.pool, &auth.actor, notification_uuid).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all
///
/// Returns the number of notifications that were marked.
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CountResponse>>> {
    let count = notify::mark_all_read(&state.pool, &auth.actor).await?;
    Ok(Json(DataResponse {
        data: CountResponse {
            count: count as i64,
        },
    }))
}

/// GET /api/v1/notifications/unread-count
pub async fn unread_count(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<CountResponse>>> {
    let count = notify::unread_count(&state.pool, &auth.actor).await?;
    Ok(Json(DataResponse {
        data: CountResponse { count },
    }))
}

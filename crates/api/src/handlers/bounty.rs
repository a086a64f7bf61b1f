//! Handlers for an idea's bounty.

use axum::extract::{Path, State};
use axum::Json;
use postboard_core::bounty::BountyRequest;
use postboard_core::types::EntityId;
use postboard_db::models::bounty::Bounty;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::extract::JsonBody;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::services::bounty;
use crate::state::AppState;

/// PUT /api/v1/ideas/{idea}/bounty
///
/// Returns `{"data": null}` when a non-monetary request removed the bounty.
pub async fn upsert_bounty(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
    JsonBody(input): JsonBody<BountyRequest>,
) -> AppResult<Json<DataResponse<Option<Bounty>>>> {
    let stored = bounty::upsert(&state, &auth.actor, idea_uuid, &input).await?;
    Ok(Json(DataResponse { data: stored }))
}

/// POST /api/v1/admin/ideas/{idea}/bounty/approve
pub async fn approve_bounty(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
) -> AppResult<Json<DataResponse<Bounty>>> {
    let decided = bounty::decide(&state, &admin.actor, idea_uuid, true).await?;
    Ok(Json(DataResponse { data: decided }))
}

/// POST /api/v1/admin/ideas/{idea}/bounty/deny
pub async fn deny_bounty(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
) -> AppResult<Json<DataResponse<Bounty>>> {
    let decided = bounty::decide(&state, &admin.actor, idea_uuid, false).await?;
    Ok(Json(DataResponse { data: decided }))
}

//! Handlers for claim requests and the `/claim-approvals` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use postboard_core::claim::Approver;
use postboard_core::types::EntityId;
use postboard_db::models::claim::{ClaimApproval, DecisionRequest};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::extract::JsonBody;
use crate::response::DataResponse;
use crate::services::claims;
use crate::state::AppState;

/// POST /api/v1/ideas/{idea}/claim-requests
pub async fn request_claim(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
) -> AppResult<(StatusCode, Json<DataResponse<ClaimApproval>>)> {
    let approval = claims::request_claim(&state, &auth.actor, &auth.name, idea_uuid).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: approval })))
}

/// GET /api/v1/claim-approvals/pending
///
/// Requests where the caller is the idea owner or the claimer's manager and
/// that side has not decided yet.
pub async fn list_pending(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ClaimApproval>>>> {
    let items = claims::awaiting_decision(&state.pool, &auth.actor).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/claim-approvals/mine
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ClaimApproval>>>> {
    let items = claims::my_requests(&state.pool, &auth.actor).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/claim-approvals/{id}/owner-decision
pub async fn owner_decision(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(approval_uuid): Path<EntityId>,
    JsonBody(input): JsonBody<DecisionRequest>,
) -> AppResult<Json<DataResponse<ClaimApproval>>> {
    let approval = claims::decide(
        &state,
        &auth.actor,
        approval_uuid,
        Approver::IdeaOwner,
        input.approve,
    )
    .await?;
    Ok(Json(DataResponse { data: approval }))
}

/// POST /api/v1/claim-approvals/{id}/manager-decision
pub async fn manager_decision(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(approval_uuid): Path<EntityId>,
    JsonBody(input): JsonBody<DecisionRequest>,
) -> AppResult<Json<DataResponse<ClaimApproval>>> {
    let approval = claims::decide(
        &state,
        &auth.actor,
        approval_uuid,
        Approver::Manager,
        input.approve,
    )
    .await?;
    Ok(Json(DataResponse { data: approval }))
}

use axum::extract::{Path, State};
use axum::Json;
use postboard_core::lifecycle::TransitionRequest;
use postboard_core::types::EntityId;
use postboard_db::models::idea::Idea;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::extract::JsonBody;
use crate::response::DataResponse;
use crate::services::lifecycle;
use crate::state::AppState;

/// PUT /api/v1/ideas/{idea}/sub-status
///
/// Move a claimed idea to another development stage. Claimers, the
/// assignee, the benefactor team's manager and admins may do this.
pub async fn update_sub_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
    JsonBody(input): JsonBody<TransitionRequest>,
) -> AppResult<Json<DataResponse<Idea>>> {
    let idea = lifecycle::update_sub_status(&state, &auth.actor, idea_uuid, &input).await?;
    Ok(Json(DataResponse { data: idea }))
}

//! Handlers for dashboard statistics.

use axum::extract::{Path, State};
use axum::Json;
use postboard_core::analytics::{BoardStats, TeamStats};
use postboard_core::types::EntityId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::services::analytics;
use crate::state::AppState;

/// GET /api/v1/stats
pub async fn board_stats(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<BoardStats>>> {
    let stats = analytics::board(&state.pool).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/teams/{team}/stats
///
/// Admins and the team's manager only.
pub async fn team_stats(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(team_uuid): Path<EntityId>,
) -> AppResult<Json<DataResponse<TeamStats>>> {
    let stats = analytics::team(&state.pool, &auth.actor, team_uuid).await?;
    Ok(Json(DataResponse { data: stats }))
}

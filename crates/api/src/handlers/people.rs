//! Handlers for the skills catalogue, the team list and the caller's profile.

use axum::extract::State;
use axum::Json;
use postboard_db::models::people::{Skill, Team};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::extract::JsonBody;
use crate::response::DataResponse;
use crate::services::people::{self, OwnProfileUpdate, ProfileDetail};
use crate::state::AppState;

/// GET /api/v1/skills
pub async fn list_skills(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Skill>>>> {
    let items = people::list_skills(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/teams
pub async fn list_teams(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Team>>>> {
    let items = people::list_teams(&state.pool).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/profile
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ProfileDetail>>> {
    let profile = people::own_profile(&state.pool, &auth.actor).await?;
    Ok(Json(DataResponse { data: profile }))
}

/// PUT /api/v1/profile
///
/// Name and skills only. Developer roles must keep at least one skill.
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<OwnProfileUpdate>,
) -> AppResult<Json<DataResponse<ProfileDetail>>> {
    let profile = people::update_own_profile(&state, &auth.actor, &input).await?;
    Ok(Json(DataResponse { data: profile }))
}

//! Handlers for the `/admin` resources: idea management, the skills
//! catalogue, teams and user profiles.
//!
//! All handlers require the admin flag via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use postboard_core::types::EntityId;
use postboard_db::models::idea::{Idea, IdeaOverride};
use postboard_db::models::people::{CreateTeam, Skill, Team};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::extract::JsonBody;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::services::admin;
use crate::services::people::{self, ProfileDetail, ProfileRequest, SkillName};
use crate::state::AppState;

/// Request body for `POST /admin/ideas/{idea}/assign`.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    pub assignee_email: String,
}

/// POST /api/v1/admin/ideas/{idea}/assign
///
/// Skips the approval workflow and drops pending requests for the idea.
pub async fn assign_idea(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
    JsonBody(input): JsonBody<AssignRequest>,
) -> AppResult<Json<DataResponse<Idea>>> {
    let idea = admin::assign(&state, &admin.actor, idea_uuid, &input.assignee_email).await?;
    Ok(Json(DataResponse { data: idea }))
}

/// POST /api/v1/admin/ideas/{idea}/unclaim
pub async fn unclaim_idea(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
) -> AppResult<Json<DataResponse<Idea>>> {
    let idea = admin::unclaim(&state, &admin.actor, idea_uuid).await?;
    Ok(Json(DataResponse { data: idea }))
}

/// PUT /api/v1/admin/ideas/{idea}
///
/// Direct field edit. Status changes here bypass the stage machine.
pub async fn override_idea(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
    JsonBody(input): JsonBody<IdeaOverride>,
) -> AppResult<Json<DataResponse<Idea>>> {
    let idea = admin::override_idea(&state, &admin.actor, idea_uuid, &input).await?;
    Ok(Json(DataResponse { data: idea }))
}

/// DELETE /api/v1/admin/ideas/{idea}
pub async fn delete_idea(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
) -> AppResult<StatusCode> {
    admin::delete(&state, &admin.actor, idea_uuid).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Skills
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/skills
pub async fn create_skill(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<SkillName>,
) -> AppResult<(StatusCode, Json<DataResponse<Skill>>)> {
    let skill = people::create_skill(&state.pool, &admin.actor, &input.name).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: skill })))
}

/// PUT /api/v1/admin/skills/{skill}
pub async fn rename_skill(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(skill_uuid): Path<EntityId>,
    JsonBody(input): JsonBody<SkillName>,
) -> AppResult<Json<DataResponse<Skill>>> {
    let skill = people::rename_skill(&state.pool, &admin.actor, skill_uuid, &input.name).await?;
    Ok(Json(DataResponse { data: skill }))
}

/// DELETE /api/v1/admin/skills/{skill}
///
/// Refused while any idea calls for the skill.
pub async fn delete_skill(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(skill_uuid): Path<EntityId>,
) -> AppResult<StatusCode> {
    people::delete_skill(&state.pool, &admin.actor, skill_uuid).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Teams and profiles
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/teams
pub async fn create_team(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateTeam>,
) -> AppResult<(StatusCode, Json<DataResponse<Team>>)> {
    let team = people::create_team(&state.pool, &admin.actor, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: team })))
}

/// PUT /api/v1/admin/users/{email}
///
/// Create the profile or replace it, skills included.
pub async fn upsert_profile(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(email): Path<String>,
    JsonBody(input): JsonBody<ProfileRequest>,
) -> AppResult<Json<DataResponse<ProfileDetail>>> {
    let profile = people::upsert_profile(&state, &admin.actor, &email, &input).await?;
    Ok(Json(DataResponse { data: profile }))
}

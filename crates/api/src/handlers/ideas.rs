//! Handlers for the `/ideas` resource and its detail tabs.
//!
//! Board reads are open to any authenticated user. Comments, external
//! links, activities, stage data and status history are gated by the idea
//! access policy.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use postboard_core::idea::{IdeaRelationship, IdeaSort, Priority, SortOrder};
use postboard_core::status::IdeaStatus;
use postboard_core::types::EntityId;
use postboard_db::models::history::StatusHistoryEntry;
use postboard_db::models::idea::{Idea, PersonalIdea};
use postboard_db::models::idea_detail::{
    CreateComment, CreateExternalLink, IdeaActivity, IdeaComment, IdeaExternalLink, StageDataEntry,
};
use postboard_db::repositories::IdeaFilter;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::extract::{JsonBody, QueryParams};
use crate::response::DataResponse;
use crate::services::ideas::{self, IdeaDetail, SubmitIdea};
use crate::state::AppState;

/// Query parameters for `GET /ideas`.
#[derive(Debug, Deserialize)]
pub struct IdeaListQuery {
    pub status: Option<IdeaStatus>,
    pub priority: Option<Priority>,
    /// Benefactor team name.
    pub team: Option<String>,
    /// Skill name.
    pub skill: Option<String>,
    pub sort_by: Option<IdeaSort>,
    pub order: Option<SortOrder>,
    /// Maximum number of results. Defaults to 50, capped at 200.
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Query parameters for `GET /ideas/mine`.
#[derive(Debug, Deserialize)]
pub struct MyIdeasQuery {
    pub relationship: Option<IdeaRelationship>,
}

const MAX_LIMIT: i64 = 200;
const DEFAULT_LIMIT: i64 = 50;

/// POST /api/v1/ideas
pub async fn submit_idea(
    auth: AuthUser,
    State(state): State<AppState>,
    JsonBody(input): JsonBody<SubmitIdea>,
) -> AppResult<(StatusCode, Json<DataResponse<IdeaDetail>>)> {
    let idea = ideas::submit(&state, &auth.actor, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: idea })))
}

/// GET /api/v1/ideas
pub async fn list_ideas(
    _auth: AuthUser,
    State(state): State<AppState>,
    QueryParams(params): QueryParams<IdeaListQuery>,
) -> AppResult<Json<DataResponse<Vec<Idea>>>> {
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = params.offset.unwrap_or(0).max(0);
    let filter = IdeaFilter {
        status: params.status,
        priority: params.priority,
        benefactor_team: params.team.filter(|t| !t.is_empty()),
        skill: params.skill.filter(|s| !s.is_empty()),
        sort: params.sort_by,
        order: params.order,
    };
    let items = ideas::list(&state.pool, &filter, limit, offset).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/ideas/mine
///
/// Ideas the caller submitted or claimed, each tagged with the relationship.
pub async fn my_ideas(
    auth: AuthUser,
    State(state): State<AppState>,
    QueryParams(params): QueryParams<MyIdeasQuery>,
) -> AppResult<Json<DataResponse<Vec<PersonalIdea>>>> {
    let relationship = params.relationship.unwrap_or(IdeaRelationship::Both);
    let items = ideas::mine(&state.pool, &auth.actor, relationship).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/ideas/{idea}
pub async fn get_idea(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
) -> AppResult<Json<DataResponse<IdeaDetail>>> {
    let idea = ideas::get(&state.pool, idea_uuid).await?;
    Ok(Json(DataResponse { data: idea }))
}

// ---------------------------------------------------------------------------
// Detail tabs
// ---------------------------------------------------------------------------

/// GET /api/v1/ideas/{idea}/comments
pub async fn list_comments(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
) -> AppResult<Json<DataResponse<Vec<IdeaComment>>>> {
    let items = ideas::comments(&state.pool, &auth.actor, idea_uuid).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/ideas/{idea}/comments
pub async fn add_comment(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
    JsonBody(input): JsonBody<CreateComment>,
) -> AppResult<(StatusCode, Json<DataResponse<IdeaComment>>)> {
    let comment = ideas::add_comment(&state, &auth.actor, idea_uuid, &input.content).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}

/// GET /api/v1/ideas/{idea}/external-links
pub async fn list_external_links(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
) -> AppResult<Json<DataResponse<Vec<IdeaExternalLink>>>> {
    let items = ideas::external_links(&state.pool, &auth.actor, idea_uuid).await?;
    Ok(Json(DataResponse { data: items }))
}

/// POST /api/v1/ideas/{idea}/external-links
pub async fn add_external_link(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
    JsonBody(input): JsonBody<CreateExternalLink>,
) -> AppResult<(StatusCode, Json<DataResponse<IdeaExternalLink>>)> {
    let link = ideas::add_external_link(&state, &auth.actor, idea_uuid, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: link })))
}

/// GET /api/v1/ideas/{idea}/activities
///
/// Newest first, at most [`ideas::ACTIVITY_FEED_LIMIT`] entries.
pub async fn list_activities(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
) -> AppResult<Json<DataResponse<Vec<IdeaActivity>>>> {
    let items = ideas::activities(&state.pool, &auth.actor, idea_uuid).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/ideas/{idea}/stage-data
pub async fn list_stage_data(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
) -> AppResult<Json<DataResponse<Vec<StageDataEntry>>>> {
    let items = ideas::stage_data(&state.pool, &auth.actor, idea_uuid).await?;
    Ok(Json(DataResponse { data: items }))
}

/// GET /api/v1/ideas/{idea}/status-history
pub async fn list_status_history(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(idea_uuid): Path<EntityId>,
) -> AppResult<Json<DataResponse<Vec<StatusHistoryEntry>>>> {
    let items = ideas::status_history(&state.pool, &auth.actor, idea_uuid).await?;
    Ok(Json(DataResponse { data: items }))
}

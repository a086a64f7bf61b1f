//! Idea submission, board reads and the access-gated detail tabs.

use std::collections::HashMap;

use postboard_core::access::{self, IdeaAccessFacts, PartyFacts};
use postboard_core::actor::ActorContext;
use postboard_core::bounty::BountyRequest;
use postboard_core::idea::{self, ActivityType, IdeaRelationship};
use postboard_core::status::ClaimApprovalStatus;
use postboard_core::types::EntityId;
use postboard_db::models::bounty::Bounty;
use postboard_db::models::claim::Claim;
use postboard_db::models::history::StatusHistoryEntry;
use postboard_db::models::idea::{CreateIdea, Idea, PersonalIdea};
use postboard_db::models::idea_detail::{
    CreateExternalLink, IdeaActivity, IdeaComment, IdeaExternalLink, NewActivity, StageDataEntry,
};
use postboard_db::repositories::{
    ActivityRepo, BountyRepo, ClaimApprovalRepo, ClaimRepo, CommentRepo, ExternalLinkRepo,
    IdeaFilter, IdeaRepo, StageDataRepo, StatusHistoryRepo, UserRepo,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use super::{bounty, ensure_idea_exists, lock_idea, notify, people};
use crate::error::AppResult;
use crate::state::AppState;

/// Most recent entries returned by the activity tab.
pub const ACTIVITY_FEED_LIMIT: i64 = 100;

/// Request body for submitting an idea, optionally with a bounty.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitIdea {
    #[serde(flatten)]
    pub idea: CreateIdea,
    pub bounty: Option<BountyRequest>,
}

/// An idea with its bounty, skills, current claims and open requests.
#[derive(Debug, Serialize)]
pub struct IdeaDetail {
    #[serde(flatten)]
    pub idea: Idea,
    pub skills: Vec<String>,
    pub bounty: Option<Bounty>,
    pub claims: Vec<Claim>,
    /// Claim requests still waiting on a decision.
    pub pending_requests: i64,
}

// ---------------------------------------------------------------------------
// Board
// ---------------------------------------------------------------------------

/// Submit a new open idea on behalf of `actor`.
pub async fn submit(state: &AppState, actor: &ActorContext, input: &SubmitIdea) -> AppResult<IdeaDetail> {
    idea::validate_title(&input.idea.title)?;
    let skill_uuids = people::resolve_skills(&state.pool, &input.idea.skills).await?;

    let mut tx = state.pool.begin().await?;
    let created = IdeaRepo::create(&mut tx, &actor.email, &input.idea).await?;
    IdeaRepo::attach_skills(&mut tx, created.uuid, &skill_uuids).await?;
    ActivityRepo::insert(
        &mut tx,
        &NewActivity::new(created.uuid, &actor.email, ActivityType::Created, "submitted the idea"),
    )
    .await?;

    let (stored_bounty, batch) = match &input.bounty {
        Some(request) => bounty::apply_upsert(&mut tx, &created, request).await?,
        None => (None, Vec::new()),
    };
    tx.commit().await?;

    tracing::info!(idea_uuid = %created.uuid, submitter = %actor.email, "Idea submitted");
    notify::deliver(state, &batch).await;

    let skills = IdeaRepo::skill_names(&state.pool, created.uuid).await?;
    Ok(IdeaDetail {
        idea: created,
        skills,
        bounty: stored_bounty,
        claims: Vec::new(),
        pending_requests: 0,
    })
}

pub async fn list(pool: &PgPool, filter: &IdeaFilter, limit: i64, offset: i64) -> AppResult<Vec<Idea>> {
    Ok(IdeaRepo::list(pool, filter, limit, offset).await?)
}

/// The caller's own board: ideas they submitted, claimed, or both.
pub async fn mine(
    pool: &PgPool,
    actor: &ActorContext,
    relationship: IdeaRelationship,
) -> AppResult<Vec<PersonalIdea>> {
    Ok(IdeaRepo::list_for_person(pool, &actor.email, relationship).await?)
}

pub async fn get(pool: &PgPool, idea_uuid: EntityId) -> AppResult<IdeaDetail> {
    let idea = ensure_idea_exists(pool, idea_uuid).await?;
    let skills = IdeaRepo::skill_names(pool, idea_uuid).await?;
    let bounty = BountyRepo::find_for_idea(pool, idea_uuid).await?;
    let claims = ClaimRepo::list_for_idea(pool, idea_uuid).await?;
    let pending_requests =
        ClaimApprovalRepo::count_for_idea(pool, idea_uuid, ClaimApprovalStatus::Pending).await?;
    Ok(IdeaDetail {
        idea,
        skills,
        bounty,
        claims,
        pending_requests,
    })
}

// ---------------------------------------------------------------------------
// Detail tabs
// ---------------------------------------------------------------------------

/// Load who is attached to an idea, with each person's current team.
async fn access_facts(pool: &PgPool, idea: &Idea) -> AppResult<IdeaAccessFacts> {
    let submitter_team = UserRepo::find_by_email(pool, &idea.submitter_email)
        .await?
        .and_then(|p| p.team_uuid);

    let claimer_teams: HashMap<String, Option<EntityId>> = UserRepo::list_claimers(pool, idea.uuid)
        .await?
        .into_iter()
        .map(|p| (p.email.to_lowercase(), p.team_uuid))
        .collect();

    let claimers = ClaimRepo::list_for_idea(pool, idea.uuid)
        .await?
        .into_iter()
        .map(|c| PartyFacts {
            team_uuid: claimer_teams
                .get(&c.claimer_email.to_lowercase())
                .copied()
                .flatten(),
            email: c.claimer_email,
        })
        .collect();

    Ok(IdeaAccessFacts {
        submitter: PartyFacts {
            email: idea.submitter_email.clone(),
            team_uuid: submitter_team,
        },
        claimers,
    })
}

/// Resolve an idea and check `actor` may see its detail tabs.
pub async fn require_tab_access(
    pool: &PgPool,
    actor: &ActorContext,
    idea_uuid: EntityId,
) -> AppResult<Idea> {
    let idea = ensure_idea_exists(pool, idea_uuid).await?;
    let facts = access_facts(pool, &idea).await?;
    access::require_idea_tab_access(&facts, actor)?;
    Ok(idea)
}

pub async fn comments(
    pool: &PgPool,
    actor: &ActorContext,
    idea_uuid: EntityId,
) -> AppResult<Vec<IdeaComment>> {
    require_tab_access(pool, actor, idea_uuid).await?;
    Ok(CommentRepo::list_for_idea(pool, idea_uuid).await?)
}

pub async fn add_comment(
    state: &AppState,
    actor: &ActorContext,
    idea_uuid: EntityId,
    content: &str,
) -> AppResult<IdeaComment> {
    idea::validate_comment(content)?;
    require_tab_access(&state.pool, actor, idea_uuid).await?;

    let mut tx = state.pool.begin().await?;
    lock_idea(&mut tx, idea_uuid).await?;
    let comment = CommentRepo::create(&mut tx, idea_uuid, &actor.email, content.trim()).await?;
    ActivityRepo::insert(
        &mut tx,
        &NewActivity::new(idea_uuid, &actor.email, ActivityType::CommentAdded, "added a comment")
            .with_payload(serde_json::json!({ "comment_uuid": comment.uuid })),
    )
    .await?;
    tx.commit().await?;

    tracing::debug!(idea_uuid = %idea_uuid, actor = %actor.email, "Comment added");
    Ok(comment)
}

pub async fn external_links(
    pool: &PgPool,
    actor: &ActorContext,
    idea_uuid: EntityId,
) -> AppResult<Vec<IdeaExternalLink>> {
    require_tab_access(pool, actor, idea_uuid).await?;
    Ok(ExternalLinkRepo::list_for_idea(pool, idea_uuid).await?)
}

pub async fn add_external_link(
    state: &AppState,
    actor: &ActorContext,
    idea_uuid: EntityId,
    input: &CreateExternalLink,
) -> AppResult<IdeaExternalLink> {
    idea::validate_external_link(&input.title, &input.url)?;
    require_tab_access(&state.pool, actor, idea_uuid).await?;

    let mut tx = state.pool.begin().await?;
    lock_idea(&mut tx, idea_uuid).await?;
    let link = ExternalLinkRepo::create(&mut tx, idea_uuid, &actor.email, input).await?;
    ActivityRepo::insert(
        &mut tx,
        &NewActivity::new(
            idea_uuid,
            &actor.email,
            ActivityType::LinkAdded,
            format!("added a {}", input.link_type.phrase()),
        )
        .with_payload(serde_json::json!({
            "link_type": input.link_type,
            "title": input.title,
            "url": input.url,
        })),
    )
    .await?;
    tx.commit().await?;

    tracing::debug!(idea_uuid = %idea_uuid, actor = %actor.email, link_type = %input.link_type, "External link added");
    Ok(link)
}

pub async fn activities(
    pool: &PgPool,
    actor: &ActorContext,
    idea_uuid: EntityId,
) -> AppResult<Vec<IdeaActivity>> {
    require_tab_access(pool, actor, idea_uuid).await?;
    Ok(ActivityRepo::list_for_idea(pool, idea_uuid, ACTIVITY_FEED_LIMIT).await?)
}

pub async fn stage_data(
    pool: &PgPool,
    actor: &ActorContext,
    idea_uuid: EntityId,
) -> AppResult<Vec<StageDataEntry>> {
    require_tab_access(pool, actor, idea_uuid).await?;
    Ok(StageDataRepo::list_for_idea(pool, idea_uuid).await?)
}

pub async fn status_history(
    pool: &PgPool,
    actor: &ActorContext,
    idea_uuid: EntityId,
) -> AppResult<Vec<StatusHistoryEntry>> {
    require_tab_access(pool, actor, idea_uuid).await?;
    Ok(StatusHistoryRepo::list_for_idea(pool, idea_uuid).await?)
}

//! Development-stage transitions of claimed ideas.

use chrono::Utc;
use postboard_core::actor::ActorContext;
use postboard_core::idea::ActivityType;
use postboard_core::lifecycle::{self, TransitionFacts, TransitionRequest};
use postboard_core::types::EntityId;
use postboard_db::models::idea::Idea;
use postboard_db::models::idea_detail::NewActivity;
use postboard_db::repositories::{
    ActivityRepo, ClaimRepo, IdeaRepo, StageDataRepo, StageUpdate, StatusHistoryRepo, TeamRepo,
    UserRepo,
};

use super::{lock_idea, notify};
use crate::error::AppResult;
use crate::state::AppState;

/// Move a claimed idea to another development stage.
///
/// Appends the history row, updates progress, blocked reason and expected
/// completion, replaces the stage's data when fields were submitted, logs the
/// activity and notifies the submitter (and for blocking stages the
/// benefactor team's manager). Verified and cancelled complete the idea.
pub async fn update_sub_status(
    state: &AppState,
    actor: &ActorContext,
    idea_uuid: EntityId,
    request: &TransitionRequest,
) -> AppResult<Idea> {
    let mut tx = state.pool.begin().await?;
    let idea = lock_idea(&mut tx, idea_uuid).await?;
    let claimer_emails = ClaimRepo::claimer_emails(&mut tx, idea_uuid).await?;

    let (benefactor_team_uuid, benefactor_manager_email) = match idea.benefactor_team.as_deref() {
        Some(team_name) => (
            TeamRepo::find_by_name(&state.pool, team_name)
                .await?
                .map(|t| t.uuid),
            UserRepo::find_manager_by_team_name(&state.pool, team_name)
                .await?
                .map(|m| m.email),
        ),
        None => (None, None),
    };

    let now = Utc::now();
    let facts = TransitionFacts {
        idea: idea.idea_ref(),
        status: idea.status()?,
        sub_status: idea.sub_status()?,
        progress: idea.progress_percentage,
        sub_status_updated_at: idea.sub_status_updated_at,
        submitter_email: &idea.submitter_email,
        assigned_to_email: idea.assigned_to_email.as_deref(),
        claimer_emails: &claimer_emails,
        benefactor_team_uuid,
        benefactor_manager_email: benefactor_manager_email.as_deref(),
    };
    let plan = lifecycle::plan_transition(&facts, request, actor, now)?;

    StatusHistoryRepo::insert(&mut tx, idea_uuid, &plan.history).await?;
    let updated = IdeaRepo::apply_stage_update(
        &mut tx,
        idea_uuid,
        &StageUpdate {
            status: plan.status,
            sub_status: plan.sub_status,
            progress: plan.progress,
            blocked_reason: plan.blocked_reason.as_deref(),
            expected_completion: plan.expected_completion,
            updated_by: &actor.email,
            updated_at: now,
        },
    )
    .await?;

    if !request.stage_data.is_empty() {
        StageDataRepo::replace(
            &mut tx,
            idea_uuid,
            plan.history.to_sub_status,
            &plan.stage_data,
            &actor.email,
        )
        .await?;
    }

    ActivityRepo::insert(
        &mut tx,
        &NewActivity::new(
            idea_uuid,
            &actor.email,
            ActivityType::StatusChanged,
            plan.activity_description.as_str(),
        )
        .with_payload(plan.activity_payload.clone()),
    )
    .await?;

    notify::record(&mut tx, &plan.notifications).await?;
    tx.commit().await?;

    tracing::info!(
        idea_uuid = %idea_uuid,
        actor = %actor.email,
        from = ?plan.history.from_sub_status,
        to = %plan.history.to_sub_status,
        status = %plan.status,
        progress = plan.progress,
        duration_minutes = ?plan.history.duration_minutes,
        "Idea stage changed"
    );
    notify::deliver(state, &plan.notifications).await;

    Ok(updated)
}

//! Claim requests and their dual approval.

use postboard_core::actor::ActorContext;
use postboard_core::claim::{
    self, Approver, ClaimParties, ClaimerTeamFacts, DecisionOutcome, CLAIMED_ENTRY_STAGE,
};
use postboard_core::idea::ActivityType;
use postboard_core::lifecycle::default_progress;
use postboard_core::status::IdeaStatus;
use postboard_core::types::EntityId;
use postboard_db::models::claim::{ClaimApproval, NewClaimApproval};
use postboard_db::models::idea_detail::NewActivity;
use postboard_db::repositories::{
    ActivityRepo, ClaimApprovalRepo, ClaimRepo, IdeaRepo, StatusHistoryRepo, TeamRepo, UserRepo,
};
use sqlx::PgPool;

use super::{lock_idea, notify};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Ask to claim an open idea.
///
/// The claimer's name, team and skills are snapshotted onto the request. If
/// the claimer has no team, or the team has no manager, the manager side is
/// approved by the system immediately.
pub async fn request_claim(
    state: &AppState,
    actor: &ActorContext,
    claimer_name: &str,
    idea_uuid: EntityId,
) -> AppResult<ClaimApproval> {
    let (team_name, manager_email) = match actor.team_uuid {
        Some(team_uuid) => (
            TeamRepo::find_by_uuid(&state.pool, team_uuid).await?.map(|t| t.name),
            UserRepo::find_team_manager(&state.pool, team_uuid)
                .await?
                .map(|m| m.email),
        ),
        None => (None, None),
    };
    let skills = UserRepo::skill_names(&state.pool, &actor.email)
        .await?
        .join(", ");

    let mut tx = state.pool.begin().await?;
    let idea = lock_idea(&mut tx, idea_uuid).await?;

    let has_pending = ClaimApprovalRepo::has_pending(&mut tx, idea_uuid, &actor.email).await?;
    claim::validate_claim_request(idea.status()?, actor, has_pending)?;

    let team = ClaimerTeamFacts {
        team_uuid: actor.team_uuid,
        manager_email,
    };
    let manager_approved = claim::initial_manager_approval(&team);

    let approval = ClaimApprovalRepo::create(
        &mut tx,
        &NewClaimApproval {
            idea_uuid,
            claimer_email: actor.email.clone(),
            claimer_name: claimer_name.to_string(),
            claimer_team: team_name,
            claimer_skills: skills,
            idea_owner_email: idea.submitter_email.clone(),
            manager_email: team.manager_email.clone(),
            manager_approved,
        },
    )
    .await?;

    let parties = ClaimParties {
        idea: idea.idea_ref(),
        owner_email: &idea.submitter_email,
        claimer_email: &actor.email,
        claimer_name,
        manager_email: team.manager_email.as_deref(),
    };
    let batch = claim::request_notifications(&parties, manager_approved == Some(true));
    notify::record(&mut tx, &batch).await?;

    tx.commit().await?;

    tracing::info!(
        idea_uuid = %idea_uuid,
        approval_uuid = %approval.uuid,
        claimer = %actor.email,
        manager_auto_approved = manager_approved.is_some(),
        "Claim requested"
    );
    notify::deliver(state, &batch).await;

    Ok(approval)
}

/// Record the idea owner's or the manager's decision on a pending request.
///
/// When this decision completes the pair of approvals the idea is promoted
/// to `claimed` in the same transaction.
pub async fn decide(
    state: &AppState,
    actor: &ActorContext,
    approval_uuid: EntityId,
    approver: Approver,
    approve: bool,
) -> AppResult<ClaimApproval> {
    // Lock order: idea row, then approval row, as in `request_claim` and
    // `admin::assign`.
    let idea_uuid = ClaimApprovalRepo::find_by_uuid(&state.pool, approval_uuid)
        .await?
        .ok_or_else(|| AppError::not_found("ClaimApproval", approval_uuid))?
        .idea_uuid;

    let mut tx = state.pool.begin().await?;
    let idea = lock_idea(&mut tx, idea_uuid).await?;
    let approval = ClaimApprovalRepo::lock(&mut tx, approval_uuid)
        .await?
        .ok_or_else(|| AppError::not_found("ClaimApproval", approval_uuid))?;

    match approver {
        Approver::IdeaOwner => claim::authorize_owner_decision(actor, &approval.idea_owner_email)?,
        Approver::Manager => {
            let claimer_team = UserRepo::find_by_email(&state.pool, &approval.claimer_email)
                .await?
                .and_then(|p| p.team_uuid);
            claim::authorize_manager_decision(actor, claimer_team)?
        }
    }

    let mut fields = approval.fields()?;
    let outcome = claim::apply_decision(&mut fields, approver, approve)?;

    let updated = ClaimApprovalRepo::record_decision(
        &mut tx,
        approval_uuid,
        approver,
        approve,
        &actor.email,
        fields.status,
    )
    .await?;

    if outcome == DecisionOutcome::Approved {
        claim::validate_promotion(idea.status()?)?;
        promote(&mut tx, &approval).await?;
    }

    let parties = ClaimParties {
        idea: idea.idea_ref(),
        owner_email: &approval.idea_owner_email,
        claimer_email: &approval.claimer_email,
        claimer_name: &approval.claimer_name,
        manager_email: approval.manager_email.as_deref(),
    };
    let batch = claim::decision_notifications(&parties, outcome, &actor.email);
    notify::record(&mut tx, &batch).await?;

    tx.commit().await?;

    tracing::info!(
        approval_uuid = %approval_uuid,
        idea_uuid = %approval.idea_uuid,
        actor = %actor.email,
        ?approver,
        approve,
        status = %updated.status_id,
        "Claim decision recorded"
    );
    notify::deliver(state, &batch).await;

    Ok(updated)
}

/// Turn an approved request into a claim and move the idea to its entry stage.
async fn promote(tx: &mut postboard_db::DbTx<'_>, approval: &ClaimApproval) -> AppResult<()> {
    let progress = default_progress(CLAIMED_ENTRY_STAGE, 0);

    ClaimRepo::create(tx, approval.idea_uuid, &approval.claimer_email).await?;
    IdeaRepo::mark_claimed(
        tx,
        approval.idea_uuid,
        CLAIMED_ENTRY_STAGE,
        progress,
        &approval.claimer_email,
    )
    .await?;
    StatusHistoryRepo::insert_status_change(
        tx,
        approval.idea_uuid,
        (IdeaStatus::Open, None),
        (IdeaStatus::Claimed, Some(CLAIMED_ENTRY_STAGE)),
        &approval.claimer_email,
        Some("Claim approved"),
    )
    .await?;
    ActivityRepo::insert(
        tx,
        &NewActivity::new(
            approval.idea_uuid,
            &approval.claimer_email,
            ActivityType::Claimed,
            "claimed the idea",
        )
        .with_payload(serde_json::json!({
            "approval_uuid": approval.uuid,
            "sub_status": CLAIMED_ENTRY_STAGE,
            "progress": progress,
        })),
    )
    .await?;
    Ok(())
}

/// Pending requests waiting on the actor's decision.
pub async fn awaiting_decision(pool: &PgPool, actor: &ActorContext) -> AppResult<Vec<ClaimApproval>> {
    Ok(ClaimApprovalRepo::list_awaiting(pool, &actor.email, actor.managed_team_uuid).await?)
}

/// Requests the actor has made.
pub async fn my_requests(pool: &PgPool, actor: &ActorContext) -> AppResult<Vec<ClaimApproval>> {
    Ok(ClaimApprovalRepo::list_for_claimer(pool, &actor.email).await?)
}

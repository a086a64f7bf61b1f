//! Privileged operations: direct assignment, unclaim, override edit, delete.
//!
//! Each operation checks the admin flag itself as well, so calling these
//! from somewhere other than the `/admin` routes stays safe.

use postboard_core::actor::ActorContext;
use postboard_core::claim::{self, CLAIMED_ENTRY_STAGE};
use postboard_core::error::CoreError;
use postboard_core::idea::{self, ActivityType};
use postboard_core::lifecycle::{self, default_progress};
use postboard_core::status::IdeaStatus;
use postboard_core::types::EntityId;
use postboard_db::models::idea::{Idea, IdeaOverride};
use postboard_db::models::idea_detail::NewActivity;
use postboard_db::repositories::{
    ActivityRepo, ClaimApprovalRepo, ClaimRepo, IdeaRepo, StatusHistoryRepo, UserRepo,
};

use super::{lock_idea, notify};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Give an idea straight to a developer, skipping the approval workflow.
///
/// Replaces any existing claims and drops pending requests for the idea.
pub async fn assign(
    state: &AppState,
    actor: &ActorContext,
    idea_uuid: EntityId,
    assignee_email: &str,
) -> AppResult<Idea> {
    claim::require_admin(actor, "assign ideas")?;
    let assignee = UserRepo::find_by_email(&state.pool, assignee_email)
        .await?
        .ok_or_else(|| AppError::not_found("User", assignee_email))?;

    let mut tx = state.pool.begin().await?;
    let idea = lock_idea(&mut tx, idea_uuid).await?;
    let from = (idea.status()?, idea.sub_status()?);

    ClaimRepo::delete_for_idea(&mut tx, idea_uuid).await?;
    let superseded = ClaimApprovalRepo::delete_pending_for_idea(&mut tx, idea_uuid).await?;
    ClaimRepo::create(&mut tx, idea_uuid, &assignee.email).await?;
    IdeaRepo::set_assignment(&mut tx, idea_uuid, &assignee.email, &actor.email).await?;
    let updated = IdeaRepo::mark_claimed(
        &mut tx,
        idea_uuid,
        CLAIMED_ENTRY_STAGE,
        default_progress(CLAIMED_ENTRY_STAGE, 0),
        &actor.email,
    )
    .await?;

    let comment = format!("Assigned to {}", assignee.email);
    StatusHistoryRepo::insert_status_change(
        &mut tx,
        idea_uuid,
        from,
        (IdeaStatus::Claimed, Some(CLAIMED_ENTRY_STAGE)),
        &actor.email,
        Some(comment.as_str()),
    )
    .await?;
    ActivityRepo::insert(
        &mut tx,
        &NewActivity::new(
            idea_uuid,
            &actor.email,
            ActivityType::Assigned,
            format!("assigned the idea to {}", assignee.name),
        )
        .with_payload(serde_json::json!({
            "assignee_email": assignee.email,
            "superseded_requests": superseded,
        })),
    )
    .await?;

    let batch = claim::assignment_notifications(
        idea.idea_ref(),
        &idea.submitter_email,
        &assignee.email,
        &actor.email,
    );
    notify::record(&mut tx, &batch).await?;
    tx.commit().await?;

    tracing::info!(
        idea_uuid = %idea_uuid,
        actor = %actor.email,
        assignee = %assignee.email,
        superseded,
        "Idea assigned"
    );
    notify::deliver(state, &batch).await;

    Ok(updated)
}

/// Remove every claim and return the idea to `open`.
pub async fn unclaim(state: &AppState, actor: &ActorContext, idea_uuid: EntityId) -> AppResult<Idea> {
    claim::require_admin(actor, "unclaim ideas")?;

    let mut tx = state.pool.begin().await?;
    let idea = lock_idea(&mut tx, idea_uuid).await?;
    let from = (idea.status()?, idea.sub_status()?);
    if from.0 == IdeaStatus::Open {
        return Err(CoreError::InvalidTransition("Idea is not claimed".to_string()).into());
    }

    let removed = ClaimRepo::delete_for_idea(&mut tx, idea_uuid).await?;
    let updated = IdeaRepo::reopen(&mut tx, idea_uuid).await?;
    StatusHistoryRepo::insert_status_change(
        &mut tx,
        idea_uuid,
        from,
        (IdeaStatus::Open, None),
        &actor.email,
        Some("Unclaimed by admin"),
    )
    .await?;
    ActivityRepo::insert(
        &mut tx,
        &NewActivity::new(
            idea_uuid,
            &actor.email,
            ActivityType::StatusChanged,
            "returned the idea to open",
        )
        .with_payload(serde_json::json!({ "removed_claims": removed })),
    )
    .await?;
    tx.commit().await?;

    tracing::info!(idea_uuid = %idea_uuid, actor = %actor.email, removed, "Idea unclaimed");
    Ok(updated)
}

/// Direct edit of any idea field, including status.
///
/// Bypasses the stage machine: any status may be set from any status. Only
/// the storage rule (a sub-status exactly while claimed) is enforced, via
/// [`lifecycle::normalize_override`].
pub async fn override_idea(
    state: &AppState,
    actor: &ActorContext,
    idea_uuid: EntityId,
    input: &IdeaOverride,
) -> AppResult<Idea> {
    claim::require_admin(actor, "edit ideas directly")?;
    validate_override(input)?;

    let mut tx = state.pool.begin().await?;
    let idea = lock_idea(&mut tx, idea_uuid).await?;
    let from = (idea.status()?, idea.sub_status()?);

    let status = input.status.unwrap_or(from.0);
    let sub_status = lifecycle::normalize_override(status, input.sub_status.or(from.1));
    let updated = IdeaRepo::apply_override(&mut tx, idea_uuid, input, status, sub_status).await?;

    if (status, sub_status) != from {
        StatusHistoryRepo::insert_status_change(
            &mut tx,
            idea_uuid,
            from,
            (status, sub_status),
            &actor.email,
            Some("Admin override"),
        )
        .await?;
        ActivityRepo::insert(
            &mut tx,
            &NewActivity::new(
                idea_uuid,
                &actor.email,
                ActivityType::StatusChanged,
                format!("overrode the status to {status}"),
            )
            .with_payload(serde_json::json!({
                "old_status": from.0,
                "old_sub_status": from.1,
                "new_status": status,
                "new_sub_status": sub_status,
            })),
        )
        .await?;
    }
    tx.commit().await?;

    tracing::info!(
        idea_uuid = %idea_uuid,
        actor = %actor.email,
        status = %status,
        sub_status = ?sub_status,
        "Idea overridden"
    );
    Ok(updated)
}

fn validate_override(input: &IdeaOverride) -> Result<(), CoreError> {
    if let Some(title) = &input.title {
        idea::validate_title(title)?;
    }
    if let Some(progress) = input.progress_percentage {
        lifecycle::validate_progress(progress)?;
    }
    Ok(())
}

/// Delete an idea and everything attached to it.
pub async fn delete(state: &AppState, actor: &ActorContext, idea_uuid: EntityId) -> AppResult<()> {
    claim::require_admin(actor, "delete ideas")?;
    if !IdeaRepo::delete(&state.pool, idea_uuid).await? {
        return Err(AppError::not_found("Idea", idea_uuid));
    }
    tracing::info!(idea_uuid = %idea_uuid, actor = %actor.email, "Idea deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn override_rejects_blank_title() {
        let input = IdeaOverride {
            title: Some("  ".to_string()),
            ..Default::default()
        };
        assert_matches!(validate_override(&input), Err(CoreError::Validation(_)));
    }

    #[test]
    fn override_body_rejects_unknown_priority() {
        let body = serde_json::json!({ "priority": "urgent" });
        assert!(serde_json::from_value::<IdeaOverride>(body).is_err());
    }

    #[test]
    fn override_rejects_out_of_range_progress() {
        let input = IdeaOverride {
            progress_percentage: Some(101),
            ..Default::default()
        };
        assert_matches!(validate_override(&input), Err(CoreError::Validation(_)));
    }

    #[test]
    fn empty_override_is_valid() {
        assert!(validate_override(&IdeaOverride::default()).is_ok());
    }
}

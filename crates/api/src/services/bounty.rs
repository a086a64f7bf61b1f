//! Bounty upserts and admin approval.

use postboard_core::actor::ActorContext;
use postboard_core::bounty::{self, BountyPlan, BountyRequest};
use postboard_core::notification::{self, NewNotification, NotificationKind};
use postboard_core::types::EntityId;
use postboard_db::models::bounty::Bounty;
use postboard_db::models::idea::Idea;
use postboard_db::repositories::{BountyRepo, NotificationRepo};
use postboard_db::DbTx;

use super::{lock_idea, notify};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Set, change or remove an idea's bounty. Returns the stored bounty, or
/// `None` when a non-monetary request removed it.
pub async fn upsert(
    state: &AppState,
    actor: &ActorContext,
    idea_uuid: EntityId,
    request: &BountyRequest,
) -> AppResult<Option<Bounty>> {
    let mut tx = state.pool.begin().await?;
    let idea = lock_idea(&mut tx, idea_uuid).await?;
    bounty::authorize_upsert(actor, &idea.submitter_email)?;

    let (stored, batch) = apply_upsert(&mut tx, &idea, request).await?;
    tx.commit().await?;

    tracing::info!(
        idea_uuid = %idea_uuid,
        actor = %actor.email,
        amount = stored.as_ref().map(|b| b.amount),
        pending_approval = !batch.is_empty(),
        "Bounty saved"
    );
    notify::deliver(state, &batch).await;

    Ok(stored)
}

/// Write a bounty request inside an open transaction.
///
/// Asks the admin inbox for a decision when the bounty has just become
/// pending. The returned notifications are already recorded.
pub(crate) async fn apply_upsert(
    tx: &mut DbTx<'_>,
    idea: &Idea,
    request: &BountyRequest,
) -> AppResult<(Option<Bounty>, Vec<NewNotification>)> {
    let before = BountyRepo::lock_for_idea(tx, idea.uuid)
        .await?
        .map(|b| b.state());
    let plan = bounty::plan_upsert(before.as_ref(), request)?;
    let needs_notice = plan.needs_admin_notice(before.as_ref());

    let stored = match plan {
        BountyPlan::Delete => {
            BountyRepo::delete_for_idea(tx, idea.uuid).await?;
            None
        }
        BountyPlan::Create(after) => Some(BountyRepo::insert(tx, idea.uuid, &after).await?),
        BountyPlan::Update(after) => Some(BountyRepo::update(tx, idea.uuid, &after).await?),
    };

    let batch = match (&stored, needs_notice) {
        (Some(b), true) => vec![notification::bounty_approval(
            idea.idea_ref(),
            b.amount,
            &idea.submitter_email,
        )],
        _ => Vec::new(),
    };
    notify::record(tx, &batch).await?;

    Ok((stored, batch))
}

/// Record an admin's approval or denial of a pending bounty.
pub async fn decide(
    state: &AppState,
    actor: &ActorContext,
    idea_uuid: EntityId,
    approve: bool,
) -> AppResult<Bounty> {
    let mut tx = state.pool.begin().await?;
    let idea = lock_idea(&mut tx, idea_uuid).await?;
    let current = BountyRepo::lock_for_idea(&mut tx, idea_uuid)
        .await?
        .ok_or_else(|| AppError::not_found("Bounty", idea_uuid))?;

    let mut decided = current.state();
    bounty::decide(&mut decided, actor, approve)?;

    let stored = BountyRepo::record_decision(&mut tx, idea_uuid, approve, &actor.email).await?;
    NotificationRepo::mark_read_for_idea(&mut tx, idea_uuid, NotificationKind::BountyApproval)
        .await?;

    let batch = if approve {
        vec![notification::bounty_approved(
            &idea.submitter_email,
            idea.idea_ref(),
            stored.amount,
            &actor.email,
        )]
    } else {
        vec![notification::bounty_denied(
            &idea.submitter_email,
            idea.idea_ref(),
            stored.amount,
            &actor.email,
        )]
    };
    notify::record(&mut tx, &batch).await?;
    tx.commit().await?;

    tracing::info!(
        idea_uuid = %idea_uuid,
        actor = %actor.email,
        approve,
        amount = stored.amount,
        "Bounty decided"
    );
    notify::deliver(state, &batch).await;

    Ok(stored)
}

//! Notification persistence, feed assembly and post-commit email delivery.

use postboard_core::actor::ActorContext;
use postboard_core::notification::{self, NewNotification, ADMIN_INBOX, FEED_LIMIT};
use postboard_core::types::{EntityId, Timestamp};
use postboard_db::models::notification::Notification;
use postboard_db::repositories::NotificationRepo;
use postboard_db::DbTx;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Append `batch` to the inboxes inside the caller's transaction.
pub async fn record(tx: &mut DbTx<'_>, batch: &[NewNotification]) -> AppResult<()> {
    NotificationRepo::insert_all(tx, batch).await?;
    Ok(())
}

/// Email a committed batch. Never fails; delivery problems are logged.
pub async fn deliver(state: &AppState, batch: &[NewNotification]) {
    if batch.is_empty() {
        return;
    }
    let sent = postboard_events::deliver_best_effort(state.mailer.as_deref(), batch).await;
    tracing::debug!(queued = batch.len(), sent, "Notification emails dispatched");
}

/// The inboxes `actor` reads, lower-cased: their own, plus the admin inbox
/// for admins.
pub fn inboxes(actor: &ActorContext) -> Vec<String> {
    let mut inboxes = vec![actor.email.to_lowercase()];
    if actor.is_admin {
        inboxes.push(ADMIN_INBOX.to_string());
    }
    inboxes
}

/// The actor's feed as of `now`.
pub async fn feed(pool: &PgPool, actor: &ActorContext, now: Timestamp) -> AppResult<Vec<Notification>> {
    let cutoff = notification::read_cutoff(now);
    let limit = FEED_LIMIT as i64;

    let personal = NotificationRepo::list_visible(pool, &actor.email, cutoff, limit).await?;
    let admin_inbox = if actor.is_admin {
        NotificationRepo::list_visible(pool, ADMIN_INBOX, cutoff, limit).await?
    } else {
        Vec::new()
    };

    Ok(notification::merge_feed(personal, admin_inbox, now))
}

pub async fn unread_count(pool: &PgPool, actor: &ActorContext) -> AppResult<i64> {
    Ok(NotificationRepo::unread_count(pool, &inboxes(actor)).await?)
}

/// Mark one notification read. 404 unless it sits in one of the actor's inboxes.
pub async fn mark_read(pool: &PgPool, actor: &ActorContext, uuid: EntityId) -> AppResult<()> {
    if NotificationRepo::mark_read(pool, uuid, &inboxes(actor)).await? {
        Ok(())
    } else {
        Err(AppError::not_found("Notification", uuid))
    }
}

pub async fn mark_all_read(pool: &PgPool, actor: &ActorContext) -> AppResult<u64> {
    Ok(NotificationRepo::mark_all_read(pool, &inboxes(actor)).await?)
}

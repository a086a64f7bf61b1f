//! Repository for the `notifications` table.

use postboard_core::notification::{NewNotification, NotificationKind};
use postboard_core::types::{EntityId, Timestamp};
use sqlx::PgPool;

use crate::models::notification::Notification;
use crate::DbTx;

/// Column list for `notifications` queries.
const COLUMNS: &str = "uuid, user_email, type, title, message, idea_uuid, related_user_email, \
    is_read, created_at, read_at";

/// Append-only store of in-app notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    /// Insert one notification as part of the triggering transaction.
    pub async fn insert(
        tx: &mut DbTx<'_>,
        input: &NewNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications \
                (user_email, type, title, message, idea_uuid, related_user_email) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(&input.user_email)
            .bind(input.kind.as_str())
            .bind(&input.title)
            .bind(&input.message)
            .bind(input.idea_uuid)
            .bind(&input.related_user_email)
            .fetch_one(&mut **tx)
            .await
    }

    /// Insert a batch, preserving order.
    pub async fn insert_all(
        tx: &mut DbTx<'_>,
        inputs: &[NewNotification],
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let mut stored = Vec::with_capacity(inputs.len());
        for input in inputs {
            stored.push(Self::insert(tx, input).await?);
        }
        Ok(stored)
    }

    /// Notifications for one inbox that may appear in a feed: unread ones,
    /// plus read ones created at or after `read_cutoff`.
    pub async fn list_visible(
        pool: &PgPool,
        email: &str,
        read_cutoff: Timestamp,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE LOWER(user_email) = LOWER($1) \
               AND (is_read = false OR created_at >= $2) \
             ORDER BY created_at DESC \
             LIMIT $3"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(email)
            .bind(read_cutoff)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Unread notifications across the given inboxes.
    pub async fn unread_count(pool: &PgPool, inboxes: &[String]) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM notifications \
             WHERE LOWER(user_email) = ANY($1) AND is_read = false",
        )
        .bind(lowered(inboxes))
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }

    /// Mark one notification read if it belongs to one of `inboxes`.
    ///
    /// Returns `false` if no such notification exists in those inboxes.
    /// Marking an already-read notification keeps its original `read_at`.
    pub async fn mark_read(
        pool: &PgPool,
        uuid: EntityId,
        inboxes: &[String],
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = COALESCE(read_at, NOW()) \
             WHERE uuid = $1 AND LOWER(user_email) = ANY($2)",
        )
        .bind(uuid)
        .bind(lowered(inboxes))
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark everything unread in `inboxes` as read. Returns the number updated.
    pub async fn mark_all_read(pool: &PgPool, inboxes: &[String]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE LOWER(user_email) = ANY($1) AND is_read = false",
        )
        .bind(lowered(inboxes))
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Close out unread notifications of one kind for an idea, e.g. the
    /// pending bounty request once an admin has decided.
    pub async fn mark_read_for_idea(
        tx: &mut DbTx<'_>,
        idea_uuid: EntityId,
        kind: NotificationKind,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE idea_uuid = $1 AND type = $2 AND is_read = false",
        )
        .bind(idea_uuid)
        .bind(kind.as_str())
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }
}

fn lowered(inboxes: &[String]) -> Vec<String> {
    inboxes.iter().map(|e| e.to_lowercase()).collect()
}

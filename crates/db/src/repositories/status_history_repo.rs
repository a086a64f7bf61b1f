//! Repository for the append-only `status_history` table.

use postboard_core::lifecycle::HistoryEntry;
use postboard_core::status::{IdeaStatus, SubStatus};
use postboard_core::types::EntityId;
use sqlx::PgPool;

use crate::models::history::StatusHistoryEntry;
use crate::DbTx;

pub struct StatusHistoryRepo;

impl StatusHistoryRepo {
    pub async fn insert(
        tx: &mut DbTx<'_>,
        idea_uuid: EntityId,
        entry: &HistoryEntry,
    ) -> Result<EntityId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO status_history \
                (idea_uuid, from_status_id, to_status_id, from_sub_status_id, to_sub_status_id, \
                 changed_by, comment, duration_minutes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING uuid",
        )
        .bind(idea_uuid)
        .bind(entry.from_status.id())
        .bind(entry.to_status.id())
        .bind(entry.from_sub_status.map(SubStatus::id))
        .bind(entry.to_sub_status.id())
        .bind(&entry.changed_by)
        .bind(&entry.comment)
        .bind(entry.duration_minutes)
        .fetch_one(&mut **tx)
        .await
    }

    /// Record a status change that did not go through the stage machine
    /// (claim promotion, assignment, unclaim, override).
    pub async fn insert_status_change(
        tx: &mut DbTx<'_>,
        idea_uuid: EntityId,
        from: (IdeaStatus, Option<SubStatus>),
        to: (IdeaStatus, Option<SubStatus>),
        changed_by: &str,
        comment: Option<&str>,
    ) -> Result<EntityId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO status_history \
                (idea_uuid, from_status_id, to_status_id, from_sub_status_id, to_sub_status_id, \
                 changed_by, comment) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING uuid",
        )
        .bind(idea_uuid)
        .bind(from.0.id())
        .bind(to.0.id())
        .bind(from.1.map(SubStatus::id))
        .bind(to.1.map(SubStatus::id))
        .bind(changed_by)
        .bind(comment)
        .fetch_one(&mut **tx)
        .await
    }

    /// History of an idea, oldest first, with status names resolved.
    pub async fn list_for_idea(
        pool: &PgPool,
        idea_uuid: EntityId,
    ) -> Result<Vec<StatusHistoryEntry>, sqlx::Error> {
        sqlx::query_as::<_, StatusHistoryEntry>(
            "SELECT h.uuid, h.idea_uuid, \
                    fs.name AS from_status, ts.name AS to_status, \
                    fss.name AS from_sub_status, tss.name AS to_sub_status, \
                    h.changed_by, h.changed_at, h.comment, h.duration_minutes \
             FROM status_history h \
             JOIN idea_statuses ts ON ts.id = h.to_status_id \
             LEFT JOIN idea_statuses fs ON fs.id = h.from_status_id \
             LEFT JOIN idea_sub_statuses fss ON fss.id = h.from_sub_status_id \
             LEFT JOIN idea_sub_statuses tss ON tss.id = h.to_sub_status_id \
             WHERE h.idea_uuid = $1 \
             ORDER BY h.changed_at, h.uuid",
        )
        .bind(idea_uuid)
        .fetch_all(pool)
        .await
    }
}

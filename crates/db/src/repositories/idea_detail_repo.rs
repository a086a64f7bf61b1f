//! Repositories for the idea detail tabs.

use postboard_core::status::SubStatus;
use postboard_core::types::EntityId;
use sqlx::PgPool;

use crate::models::idea_detail::{
    CreateExternalLink, IdeaActivity, IdeaComment, IdeaExternalLink, NewActivity, StageDataEntry,
};
use crate::DbTx;

const COMMENT_COLUMNS: &str = "uuid, idea_uuid, author_email, content, created_at";
const LINK_COLUMNS: &str = "uuid, idea_uuid, link_type, title, url, description, created_by, created_at";
const ACTIVITY_COLUMNS: &str = "uuid, idea_uuid, actor_email, activity_type, description, payload, created_at";

pub struct CommentRepo;

impl CommentRepo {
    pub async fn create(
        tx: &mut DbTx<'_>,
        idea_uuid: EntityId,
        author_email: &str,
        content: &str,
    ) -> Result<IdeaComment, sqlx::Error> {
        let query = format!(
            "INSERT INTO idea_comments (idea_uuid, author_email, content) \
             VALUES ($1, $2, $3) \
             RETURNING {COMMENT_COLUMNS}"
        );
        sqlx::query_as::<_, IdeaComment>(&query)
            .bind(idea_uuid)
            .bind(author_email)
            .bind(content)
            .fetch_one(&mut **tx)
            .await
    }

    /// Comments on an idea, oldest first.
    pub async fn list_for_idea(
        pool: &PgPool,
        idea_uuid: EntityId,
    ) -> Result<Vec<IdeaComment>, sqlx::Error> {
        let query = format!(
            "SELECT {COMMENT_COLUMNS} FROM idea_comments \
             WHERE idea_uuid = $1 ORDER BY created_at, uuid"
        );
        sqlx::query_as::<_, IdeaComment>(&query)
            .bind(idea_uuid)
            .fetch_all(pool)
            .await
    }
}

pub struct ExternalLinkRepo;

impl ExternalLinkRepo {
    pub async fn create(
        tx: &mut DbTx<'_>,
        idea_uuid: EntityId,
        created_by: &str,
        input: &CreateExternalLink,
    ) -> Result<IdeaExternalLink, sqlx::Error> {
        let query = format!(
            "INSERT INTO idea_external_links \
                (idea_uuid, link_type, title, url, description, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {LINK_COLUMNS}"
        );
        sqlx::query_as::<_, IdeaExternalLink>(&query)
            .bind(idea_uuid)
            .bind(input.link_type.as_str())
            .bind(input.title.trim())
            .bind(input.url.trim())
            .bind(&input.description)
            .bind(created_by)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn list_for_idea(
        pool: &PgPool,
        idea_uuid: EntityId,
    ) -> Result<Vec<IdeaExternalLink>, sqlx::Error> {
        let query = format!(
            "SELECT {LINK_COLUMNS} FROM idea_external_links \
             WHERE idea_uuid = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, IdeaExternalLink>(&query)
            .bind(idea_uuid)
            .fetch_all(pool)
            .await
    }
}

/// Append-only activity feed.
pub struct ActivityRepo;

impl ActivityRepo {
    pub async fn insert(tx: &mut DbTx<'_>, input: &NewActivity) -> Result<IdeaActivity, sqlx::Error> {
        let query = format!(
            "INSERT INTO idea_activities \
                (idea_uuid, actor_email, activity_type, description, payload) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ACTIVITY_COLUMNS}"
        );
        sqlx::query_as::<_, IdeaActivity>(&query)
            .bind(input.idea_uuid)
            .bind(&input.actor_email)
            .bind(input.activity_type.as_str())
            .bind(&input.description)
            .bind(&input.payload)
            .fetch_one(&mut **tx)
            .await
    }

    /// Most recent activities first.
    pub async fn list_for_idea(
        pool: &PgPool,
        idea_uuid: EntityId,
        limit: i64,
    ) -> Result<Vec<IdeaActivity>, sqlx::Error> {
        let query = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM idea_activities \
             WHERE idea_uuid = $1 \
             ORDER BY created_at DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, IdeaActivity>(&query)
            .bind(idea_uuid)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}

pub struct StageDataRepo;

impl StageDataRepo {
    /// Replace the stored fields of one stage with `fields`.
    pub async fn replace(
        tx: &mut DbTx<'_>,
        idea_uuid: EntityId,
        sub_status: SubStatus,
        fields: &[(String, String)],
        updated_by: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM idea_stage_data WHERE idea_uuid = $1 AND sub_status_id = $2")
            .bind(idea_uuid)
            .bind(sub_status.id())
            .execute(&mut **tx)
            .await?;

        for (name, value) in fields {
            sqlx::query(
                "INSERT INTO idea_stage_data \
                    (idea_uuid, sub_status_id, field_name, field_value, updated_by) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(idea_uuid)
            .bind(sub_status.id())
            .bind(name)
            .bind(value)
            .bind(updated_by)
            .execute(&mut **tx)
            .await?;
        }
        Ok(())
    }

    /// All stage data of an idea, grouped by stage order.
    pub async fn list_for_idea(
        pool: &PgPool,
        idea_uuid: EntityId,
    ) -> Result<Vec<StageDataEntry>, sqlx::Error> {
        sqlx::query_as::<_, StageDataEntry>(
            "SELECT d.uuid, d.idea_uuid, d.sub_status_id, s.name AS sub_status, \
                    d.field_name, d.field_value, d.updated_by, d.updated_at \
             FROM idea_stage_data d \
             JOIN idea_sub_statuses s ON s.id = d.sub_status_id \
             WHERE d.idea_uuid = $1 \
             ORDER BY d.sub_status_id, d.field_name",
        )
        .bind(idea_uuid)
        .fetch_all(pool)
        .await
    }
}

//! Repository for the `ideas` table.

use chrono::NaiveDate;
use postboard_core::idea::{IdeaRelationship, IdeaSize, IdeaSort, Priority, SortOrder};
use postboard_core::status::{IdeaStatus, SubStatus};
use postboard_core::types::{EntityId, Timestamp};
use sqlx::PgPool;

use crate::models::idea::{CreateIdea, Idea, IdeaOverride, PersonalIdea};
use crate::DbTx;

/// Column list for `ideas` queries.
const COLUMNS: &str = "uuid, title, description, submitter_email, benefactor_team, priority, \
    size, needed_by, status_id, sub_status_id, sub_status_updated_at, sub_status_updated_by, \
    progress_percentage, blocked_reason, expected_completion, assigned_to_email, assigned_at, \
    assigned_by, date_submitted";

/// Fields written by a lifecycle transition.
#[derive(Debug, Clone)]
pub struct StageUpdate<'a> {
    pub status: IdeaStatus,
    pub sub_status: Option<SubStatus>,
    pub progress: i32,
    pub blocked_reason: Option<&'a str>,
    pub expected_completion: Option<NaiveDate>,
    pub updated_by: &'a str,
    pub updated_at: Timestamp,
}

/// Board listing filters. Unset fields do not constrain the result.
#[derive(Debug, Clone, Default)]
pub struct IdeaFilter {
    pub status: Option<IdeaStatus>,
    pub priority: Option<Priority>,
    pub benefactor_team: Option<String>,
    pub skill: Option<String>,
    pub sort: Option<IdeaSort>,
    pub order: Option<SortOrder>,
}

impl IdeaFilter {
    /// ORDER BY clause. Defaults to newest first; ties fall back to
    /// submission date so pages stay stable.
    fn order_by(&self) -> String {
        let key = match self.sort.unwrap_or(IdeaSort::DateSubmitted) {
            IdeaSort::DateSubmitted => "date_submitted".to_string(),
            IdeaSort::NeededBy => "needed_by".to_string(),
            IdeaSort::Priority => rank_case("priority", Priority::ALL.iter().map(|p| p.as_str())),
            IdeaSort::Size => rank_case("size", IdeaSize::ALL.iter().map(|s| s.as_str())),
        };
        let direction = match self.order.unwrap_or(SortOrder::Desc) {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        format!("{key} {direction} NULLS LAST, date_submitted DESC")
    }
}

/// `CASE` expression ranking a text column by declaration order (1-based).
fn rank_case<'a>(column: &str, names: impl Iterator<Item = &'a str>) -> String {
    let arms: String = names
        .enumerate()
        .map(|(i, name)| format!(" WHEN '{name}' THEN {}", i + 1))
        .collect();
    format!("CASE {column}{arms} END")
}

pub struct IdeaRepo;

impl IdeaRepo {
    /// Insert a new open idea.
    pub async fn create(
        tx: &mut DbTx<'_>,
        submitter_email: &str,
        input: &CreateIdea,
    ) -> Result<Idea, sqlx::Error> {
        let query = format!(
            "INSERT INTO ideas \
                (title, description, submitter_email, benefactor_team, priority, size, needed_by) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 'medium'), COALESCE($6, 'medium'), $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(submitter_email)
            .bind(&input.benefactor_team)
            .bind(input.priority.map(Priority::as_str))
            .bind(input.size.map(IdeaSize::as_str))
            .bind(input.needed_by)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn find_by_uuid(pool: &PgPool, uuid: EntityId) -> Result<Option<Idea>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ideas WHERE uuid = $1");
        sqlx::query_as::<_, Idea>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// Load an idea and hold its row lock until the transaction ends.
    pub async fn lock(tx: &mut DbTx<'_>, uuid: EntityId) -> Result<Option<Idea>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ideas WHERE uuid = $1 FOR UPDATE");
        sqlx::query_as::<_, Idea>(&query)
            .bind(uuid)
            .fetch_optional(&mut **tx)
            .await
    }

    /// List the board. The skill filter matches skill names exactly.
    pub async fn list(
        pool: &PgPool,
        filter: &IdeaFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Idea>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ideas \
             WHERE ($1::SMALLINT IS NULL OR status_id = $1) \
               AND ($2::TEXT IS NULL OR priority = $2) \
               AND ($3::TEXT IS NULL OR benefactor_team = $3) \
               AND ($4::TEXT IS NULL OR EXISTS ( \
                   SELECT 1 FROM idea_skills isk \
                   JOIN skills s ON s.uuid = isk.skill_uuid \
                   WHERE isk.idea_uuid = ideas.uuid AND s.name = $4)) \
             ORDER BY {order} \
             LIMIT $5 OFFSET $6",
            order = filter.order_by()
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(filter.status.map(IdeaStatus::id))
            .bind(filter.priority.map(Priority::as_str))
            .bind(&filter.benefactor_team)
            .bind(&filter.skill)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Ideas a person submitted or holds a claim on, newest first.
    ///
    /// `Submitted` keeps ideas the person submitted, `Claimed` ideas they
    /// claimed, `Both` keeps either. Each row carries the actual relationship.
    pub async fn list_for_person(
        pool: &PgPool,
        email: &str,
        relationship: IdeaRelationship,
    ) -> Result<Vec<PersonalIdea>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS}, \
                CASE WHEN submitted AND claimed THEN 'both' \
                     WHEN claimed THEN 'claimed' \
                     ELSE 'submitted' END AS relationship \
             FROM ( \
                 SELECT i.*, \
                     LOWER(i.submitter_email) = LOWER($1) AS submitted, \
                     EXISTS (SELECT 1 FROM claims c \
                             WHERE c.idea_uuid = i.uuid \
                               AND LOWER(c.claimer_email) = LOWER($1)) AS claimed \
                 FROM ideas i \
             ) mine \
             WHERE (submitted AND $2 <> 'claimed') OR (claimed AND $2 <> 'submitted') \
             ORDER BY date_submitted DESC"
        );
        sqlx::query_as::<_, PersonalIdea>(&query)
            .bind(email)
            .bind(relationship.as_str())
            .fetch_all(pool)
            .await
    }

    /// Move an idea into `claimed` at the given entry stage.
    pub async fn mark_claimed(
        tx: &mut DbTx<'_>,
        uuid: EntityId,
        entry_stage: SubStatus,
        progress: i32,
        updated_by: &str,
    ) -> Result<Idea, sqlx::Error> {
        let query = format!(
            "UPDATE ideas SET \
                status_id = $2, sub_status_id = $3, progress_percentage = $4, \
                sub_status_updated_at = NOW(), sub_status_updated_by = $5, \
                blocked_reason = NULL \
             WHERE uuid = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(uuid)
            .bind(IdeaStatus::Claimed.id())
            .bind(entry_stage.id())
            .bind(progress)
            .bind(updated_by)
            .fetch_one(&mut **tx)
            .await
    }

    /// Record an admin assignment. Status fields are set by [`Self::mark_claimed`].
    pub async fn set_assignment(
        tx: &mut DbTx<'_>,
        uuid: EntityId,
        assignee_email: &str,
        assigned_by: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE ideas SET \
                assigned_to_email = $2, assigned_at = NOW(), assigned_by = $3 \
             WHERE uuid = $1",
        )
        .bind(uuid)
        .bind(assignee_email)
        .bind(assigned_by)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Return an idea to `open`, clearing stage, progress and assignment.
    pub async fn reopen(tx: &mut DbTx<'_>, uuid: EntityId) -> Result<Idea, sqlx::Error> {
        let query = format!(
            "UPDATE ideas SET \
                status_id = $2, sub_status_id = NULL, sub_status_updated_at = NULL, \
                sub_status_updated_by = NULL, progress_percentage = 0, blocked_reason = NULL, \
                assigned_to_email = NULL, assigned_at = NULL, assigned_by = NULL \
             WHERE uuid = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(uuid)
            .bind(IdeaStatus::Open.id())
            .fetch_one(&mut **tx)
            .await
    }

    /// Write the outcome of a lifecycle transition.
    pub async fn apply_stage_update(
        tx: &mut DbTx<'_>,
        uuid: EntityId,
        update: &StageUpdate<'_>,
    ) -> Result<Idea, sqlx::Error> {
        let query = format!(
            "UPDATE ideas SET \
                status_id = $2, sub_status_id = $3, progress_percentage = $4, \
                blocked_reason = $5, \
                expected_completion = COALESCE($6, expected_completion), \
                sub_status_updated_by = $7, sub_status_updated_at = $8 \
             WHERE uuid = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(uuid)
            .bind(update.status.id())
            .bind(update.sub_status.map(SubStatus::id))
            .bind(update.progress)
            .bind(update.blocked_reason)
            .bind(update.expected_completion)
            .bind(update.updated_by)
            .bind(update.updated_at)
            .fetch_one(&mut **tx)
            .await
    }

    /// Apply an admin override. `sub_status` is written as given (already
    /// normalised by the caller), everything else only when present.
    pub async fn apply_override(
        tx: &mut DbTx<'_>,
        uuid: EntityId,
        input: &IdeaOverride,
        status: IdeaStatus,
        sub_status: Option<SubStatus>,
    ) -> Result<Idea, sqlx::Error> {
        let query = format!(
            "UPDATE ideas SET \
                title = COALESCE($2, title), \
                description = COALESCE($3, description), \
                benefactor_team = COALESCE($4, benefactor_team), \
                priority = COALESCE($5, priority), \
                size = COALESCE($6, size), \
                needed_by = COALESCE($7, needed_by), \
                status_id = $8, \
                sub_status_id = $9, \
                progress_percentage = COALESCE($10, progress_percentage), \
                blocked_reason = COALESCE($11, blocked_reason), \
                expected_completion = COALESCE($12, expected_completion), \
                assigned_to_email = COALESCE($13, assigned_to_email) \
             WHERE uuid = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Idea>(&query)
            .bind(uuid)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.benefactor_team)
            .bind(input.priority.map(Priority::as_str))
            .bind(input.size.map(IdeaSize::as_str))
            .bind(input.needed_by)
            .bind(status.id())
            .bind(sub_status.map(SubStatus::id))
            .bind(input.progress_percentage)
            .bind(&input.blocked_reason)
            .bind(input.expected_completion)
            .bind(&input.assigned_to_email)
            .fetch_one(&mut **tx)
            .await
    }

    /// Attach required skills. Already attached skills are skipped.
    pub async fn attach_skills(
        tx: &mut DbTx<'_>,
        uuid: EntityId,
        skill_uuids: &[EntityId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO idea_skills (idea_uuid, skill_uuid) \
             SELECT $1, UNNEST($2::UUID[]) \
             ON CONFLICT DO NOTHING",
        )
        .bind(uuid)
        .bind(skill_uuids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Skill names an idea calls for, alphabetically.
    pub async fn skill_names(pool: &PgPool, uuid: EntityId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT s.name FROM idea_skills isk \
             JOIN skills s ON s.uuid = isk.skill_uuid \
             WHERE isk.idea_uuid = $1 \
             ORDER BY s.name",
        )
        .bind(uuid)
        .fetch_all(pool)
        .await
    }

    /// Delete an idea; child rows go with it and notifications keep their
    /// text with the idea link cleared. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, uuid: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM ideas WHERE uuid = $1")
            .bind(uuid)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_order_is_newest_first() {
        assert_eq!(
            IdeaFilter::default().order_by(),
            "date_submitted DESC NULLS LAST, date_submitted DESC"
        );
    }

    #[test]
    fn priority_sort_ranks_by_declaration_order() {
        let filter = IdeaFilter {
            sort: Some(IdeaSort::Priority),
            order: Some(SortOrder::Asc),
            ..Default::default()
        };
        assert_eq!(
            filter.order_by(),
            "CASE priority WHEN 'low' THEN 1 WHEN 'medium' THEN 2 WHEN 'high' THEN 3 END ASC \
             NULLS LAST, date_submitted DESC"
        );
    }
}

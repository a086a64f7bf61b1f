//! Repositories for `claims` and `claim_approvals`.

use postboard_core::claim::Approver;
use postboard_core::roles::SYSTEM_ACTOR;
use postboard_core::status::ClaimApprovalStatus;
use postboard_core::types::EntityId;
use sqlx::PgPool;

use crate::models::claim::{Claim, ClaimApproval, NewClaimApproval};
use crate::DbTx;

const CLAIM_COLUMNS: &str = "uuid, idea_uuid, claimer_email, claim_date";

/// Column list for `claim_approvals` queries.
const COLUMNS: &str = "uuid, idea_uuid, claimer_email, claimer_name, claimer_team, claimer_skills, \
    idea_owner_email, idea_owner_approved, idea_owner_approved_at, idea_owner_approved_by, \
    idea_owner_denied_at, manager_email, manager_approved, manager_approved_at, \
    manager_approved_by, manager_denied_at, status_id, created_at, updated_at";

pub struct ClaimRepo;

impl ClaimRepo {
    pub async fn create(
        tx: &mut DbTx<'_>,
        idea_uuid: EntityId,
        claimer_email: &str,
    ) -> Result<Claim, sqlx::Error> {
        let query = format!(
            "INSERT INTO claims (idea_uuid, claimer_email) VALUES ($1, $2) \
             RETURNING {CLAIM_COLUMNS}"
        );
        sqlx::query_as::<_, Claim>(&query)
            .bind(idea_uuid)
            .bind(claimer_email)
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn list_for_idea(pool: &PgPool, idea_uuid: EntityId) -> Result<Vec<Claim>, sqlx::Error> {
        let query = format!(
            "SELECT {CLAIM_COLUMNS} FROM claims WHERE idea_uuid = $1 ORDER BY claim_date"
        );
        sqlx::query_as::<_, Claim>(&query)
            .bind(idea_uuid)
            .fetch_all(pool)
            .await
    }

    /// Claimer emails of an idea, read inside a transaction.
    pub async fn claimer_emails(
        tx: &mut DbTx<'_>,
        idea_uuid: EntityId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT claimer_email FROM claims WHERE idea_uuid = $1 ORDER BY claim_date")
            .bind(idea_uuid)
            .fetch_all(&mut **tx)
            .await
    }

    /// Remove every claim on an idea. Returns the number removed.
    pub async fn delete_for_idea(tx: &mut DbTx<'_>, idea_uuid: EntityId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM claims WHERE idea_uuid = $1")
            .bind(idea_uuid)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }
}

pub struct ClaimApprovalRepo;

impl ClaimApprovalRepo {
    /// Insert a pending request. A system manager approval is stamped with
    /// [`SYSTEM_ACTOR`].
    pub async fn create(
        tx: &mut DbTx<'_>,
        input: &NewClaimApproval,
    ) -> Result<ClaimApproval, sqlx::Error> {
        let query = format!(
            "INSERT INTO claim_approvals \
                (idea_uuid, claimer_email, claimer_name, claimer_team, claimer_skills, \
                 idea_owner_email, manager_email, manager_approved, \
                 manager_approved_at, manager_approved_by, status_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, \
                 CASE WHEN $8 THEN NOW() END, CASE WHEN $8 THEN $9 END, $10) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClaimApproval>(&query)
            .bind(input.idea_uuid)
            .bind(&input.claimer_email)
            .bind(&input.claimer_name)
            .bind(&input.claimer_team)
            .bind(&input.claimer_skills)
            .bind(&input.idea_owner_email)
            .bind(&input.manager_email)
            .bind(input.manager_approved)
            .bind(SYSTEM_ACTOR)
            .bind(ClaimApprovalStatus::Pending.id())
            .fetch_one(&mut **tx)
            .await
    }

    pub async fn find_by_uuid(
        pool: &PgPool,
        uuid: EntityId,
    ) -> Result<Option<ClaimApproval>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM claim_approvals WHERE uuid = $1");
        sqlx::query_as::<_, ClaimApproval>(&query)
            .bind(uuid)
            .fetch_optional(pool)
            .await
    }

    /// Load an approval and hold its row lock, so the first decision wins.
    pub async fn lock(tx: &mut DbTx<'_>, uuid: EntityId) -> Result<Option<ClaimApproval>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM claim_approvals WHERE uuid = $1 FOR UPDATE");
        sqlx::query_as::<_, ClaimApproval>(&query)
            .bind(uuid)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn has_pending(
        tx: &mut DbTx<'_>,
        idea_uuid: EntityId,
        claimer_email: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM claim_approvals \
             WHERE idea_uuid = $1 AND LOWER(claimer_email) = LOWER($2) AND status_id = $3)",
        )
        .bind(idea_uuid)
        .bind(claimer_email)
        .bind(ClaimApprovalStatus::Pending.id())
        .fetch_one(&mut **tx)
        .await
    }

    /// Store one side's decision together with the derived overall status.
    pub async fn record_decision(
        tx: &mut DbTx<'_>,
        uuid: EntityId,
        approver: Approver,
        approve: bool,
        decided_by: &str,
        status: ClaimApprovalStatus,
    ) -> Result<ClaimApproval, sqlx::Error> {
        let side = match approver {
            Approver::IdeaOwner => "idea_owner",
            Approver::Manager => "manager",
        };
        let query = format!(
            "UPDATE claim_approvals SET \
                {side}_approved = $2, \
                {side}_approved_at = CASE WHEN $2 THEN NOW() END, \
                {side}_approved_by = CASE WHEN $2 THEN $3 END, \
                {side}_denied_at = CASE WHEN $2 THEN NULL ELSE NOW() END, \
                status_id = $4, \
                updated_at = NOW() \
             WHERE uuid = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ClaimApproval>(&query)
            .bind(uuid)
            .bind(approve)
            .bind(decided_by)
            .bind(status.id())
            .fetch_one(&mut **tx)
            .await
    }

    /// Drop pending requests superseded by an admin assignment.
    pub async fn delete_pending_for_idea(
        tx: &mut DbTx<'_>,
        idea_uuid: EntityId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM claim_approvals WHERE idea_uuid = $1 AND status_id = $2")
            .bind(idea_uuid)
            .bind(ClaimApprovalStatus::Pending.id())
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }

    /// Pending requests waiting on this user, either as idea owner or as the
    /// manager of the claimer's current team.
    pub async fn list_awaiting(
        pool: &PgPool,
        email: &str,
        managed_team_uuid: Option<EntityId>,
    ) -> Result<Vec<ClaimApproval>, sqlx::Error> {
        let query = format!(
            "SELECT {cols} FROM claim_approvals a \
             LEFT JOIN user_profiles p ON LOWER(p.email) = LOWER(a.claimer_email) \
             WHERE a.status_id = $1 AND ( \
                 (LOWER(a.idea_owner_email) = LOWER($2) AND a.idea_owner_approved IS NULL) \
              OR ($3::UUID IS NOT NULL AND p.team_uuid = $3 AND a.manager_approved IS NULL) \
             ) \
             ORDER BY a.created_at",
            cols = prefixed("a")
        );
        sqlx::query_as::<_, ClaimApproval>(&query)
            .bind(ClaimApprovalStatus::Pending.id())
            .bind(email)
            .bind(managed_team_uuid)
            .fetch_all(pool)
            .await
    }

    /// Requests made by this user, newest first.
    pub async fn list_for_claimer(
        pool: &PgPool,
        email: &str,
    ) -> Result<Vec<ClaimApproval>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM claim_approvals \
             WHERE LOWER(claimer_email) = LOWER($1) \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ClaimApproval>(&query)
            .bind(email)
            .fetch_all(pool)
            .await
    }

    /// Count requests for an idea in the given status.
    pub async fn count_for_idea(
        pool: &PgPool,
        idea_uuid: EntityId,
        status: ClaimApprovalStatus,
    ) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM claim_approvals WHERE idea_uuid = $1 AND status_id = $2",
        )
        .bind(idea_uuid)
        .bind(status.id())
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}

fn prefixed(alias: &str) -> String {
    COLUMNS
        .split(", ")
        .map(|c| format!("{alias}.{}", c.trim()))
        .collect::<Vec<_>>()
        .join(", ")
}

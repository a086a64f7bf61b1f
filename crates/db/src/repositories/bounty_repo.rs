//! Repository for the `bounties` table.

use postboard_core::bounty::BountyState;
use postboard_core::types::EntityId;
use sqlx::PgPool;

use crate::models::bounty::Bounty;
use crate::DbTx;

const COLUMNS: &str = "uuid, idea_uuid, is_monetary, is_expensed, amount, requires_approval, \
    is_approved, approved_by, approved_at, created_at, updated_at";

pub struct BountyRepo;

impl BountyRepo {
    pub async fn find_for_idea(
        pool: &PgPool,
        idea_uuid: EntityId,
    ) -> Result<Option<Bounty>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bounties WHERE idea_uuid = $1");
        sqlx::query_as::<_, Bounty>(&query)
            .bind(idea_uuid)
            .fetch_optional(pool)
            .await
    }

    /// Load an idea's bounty under a row lock.
    pub async fn lock_for_idea(
        tx: &mut DbTx<'_>,
        idea_uuid: EntityId,
    ) -> Result<Option<Bounty>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM bounties WHERE idea_uuid = $1 FOR UPDATE");
        sqlx::query_as::<_, Bounty>(&query)
            .bind(idea_uuid)
            .fetch_optional(&mut **tx)
            .await
    }

    pub async fn insert(
        tx: &mut DbTx<'_>,
        idea_uuid: EntityId,
        state: &BountyState,
    ) -> Result<Bounty, sqlx::Error> {
        let query = format!(
            "INSERT INTO bounties \
                (idea_uuid, is_monetary, is_expensed, amount, requires_approval, is_approved) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bounty>(&query)
            .bind(idea_uuid)
            .bind(state.is_monetary)
            .bind(state.is_expensed)
            .bind(state.amount)
            .bind(state.requires_approval)
            .bind(state.is_approved)
            .fetch_one(&mut **tx)
            .await
    }

    /// Overwrite the decision-relevant fields; approver columns are left as they are.
    pub async fn update(
        tx: &mut DbTx<'_>,
        idea_uuid: EntityId,
        state: &BountyState,
    ) -> Result<Bounty, sqlx::Error> {
        let query = format!(
            "UPDATE bounties SET \
                is_monetary = $2, is_expensed = $3, amount = $4, \
                requires_approval = $5, is_approved = $6, updated_at = NOW() \
             WHERE idea_uuid = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bounty>(&query)
            .bind(idea_uuid)
            .bind(state.is_monetary)
            .bind(state.is_expensed)
            .bind(state.amount)
            .bind(state.requires_approval)
            .bind(state.is_approved)
            .fetch_one(&mut **tx)
            .await
    }

    /// Store an admin decision.
    pub async fn record_decision(
        tx: &mut DbTx<'_>,
        idea_uuid: EntityId,
        approve: bool,
        decided_by: &str,
    ) -> Result<Bounty, sqlx::Error> {
        let query = format!(
            "UPDATE bounties SET \
                is_approved = $2, approved_by = $3, approved_at = NOW(), updated_at = NOW() \
             WHERE idea_uuid = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bounty>(&query)
            .bind(idea_uuid)
            .bind(approve)
            .bind(decided_by)
            .fetch_one(&mut **tx)
            .await
    }

    /// Returns `true` if a bounty was removed.
    pub async fn delete_for_idea(tx: &mut DbTx<'_>, idea_uuid: EntityId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bounties WHERE idea_uuid = $1")
            .bind(idea_uuid)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

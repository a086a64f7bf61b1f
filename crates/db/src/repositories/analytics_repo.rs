//! Read-only aggregation queries for dashboards.

use postboard_core::status::IdeaStatus;
use postboard_core::types::EntityId;
use sqlx::PgPool;

use crate::models::analytics::{BountySpendRow, StatusCountRow};

pub struct AnalyticsRepo;

impl AnalyticsRepo {
    /// Idea counts per status, optionally limited to one benefactor team.
    pub async fn status_counts(
        pool: &PgPool,
        benefactor_team: Option<&str>,
    ) -> Result<Vec<StatusCountRow>, sqlx::Error> {
        sqlx::query_as::<_, StatusCountRow>(
            "SELECT status_id, COUNT(*) AS count FROM ideas \
             WHERE ($1::TEXT IS NULL OR benefactor_team = $1) \
             GROUP BY status_id",
        )
        .bind(benefactor_team)
        .fetch_all(pool)
        .await
    }

    /// Every bounty with its idea's benefactor team, optionally limited to one team.
    pub async fn spending_rows(
        pool: &PgPool,
        benefactor_team: Option<&str>,
    ) -> Result<Vec<BountySpendRow>, sqlx::Error> {
        sqlx::query_as::<_, BountySpendRow>(
            "SELECT i.benefactor_team AS team_name, b.amount, b.is_monetary, b.is_expensed, \
                    b.requires_approval, b.is_approved \
             FROM bounties b \
             JOIN ideas i ON i.uuid = b.idea_uuid \
             WHERE ($1::TEXT IS NULL OR i.benefactor_team = $1)",
        )
        .bind(benefactor_team)
        .fetch_all(pool)
        .await
    }

    /// Claims held by members of a team on ideas still in progress.
    pub async fn active_claims_for_team(
        pool: &PgPool,
        team_uuid: EntityId,
    ) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM claims c \
             JOIN user_profiles u ON LOWER(u.email) = LOWER(c.claimer_email) \
             JOIN ideas i ON i.uuid = c.idea_uuid \
             WHERE u.team_uuid = $1 AND i.status_id = $2",
        )
        .bind(team_uuid)
        .bind(IdeaStatus::Claimed.id())
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}

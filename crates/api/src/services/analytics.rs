//! Board-wide and per-team dashboard numbers.

use postboard_core::access;
use postboard_core::actor::ActorContext;
use postboard_core::analytics::{summarize_spending, BoardStats, SpendingRow, StatusCounts, TeamStats};
use postboard_core::error::CoreError;
use postboard_core::status::IdeaStatus;
use postboard_core::types::EntityId;
use postboard_db::models::analytics::StatusCountRow;
use postboard_db::repositories::{AnalyticsRepo, TeamRepo};
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

fn status_counts(rows: Vec<StatusCountRow>) -> Result<StatusCounts, CoreError> {
    let grouped = rows
        .into_iter()
        .map(|row| Ok((IdeaStatus::from_id(row.status_id)?, row.count)))
        .collect::<Result<Vec<_>, CoreError>>()?;
    Ok(StatusCounts::from_grouped(grouped))
}

async fn spending_for(pool: &PgPool, benefactor_team: Option<&str>) -> AppResult<Vec<SpendingRow>> {
    Ok(AnalyticsRepo::spending_rows(pool, benefactor_team)
        .await?
        .into_iter()
        .map(SpendingRow::from)
        .collect())
}

pub async fn board(pool: &PgPool) -> AppResult<BoardStats> {
    let ideas = status_counts(AnalyticsRepo::status_counts(pool, None).await?)?;
    let spending = summarize_spending(&spending_for(pool, None).await?);
    Ok(BoardStats { ideas, spending })
}

/// Stats for one team. Admins and the team's own manager only.
pub async fn team(pool: &PgPool, actor: &ActorContext, team_uuid: EntityId) -> AppResult<TeamStats> {
    if !access::can_manage_team(actor, team_uuid) {
        return Err(CoreError::Forbidden("Only the team's manager can view its statistics".to_string()).into());
    }
    let team = TeamRepo::find_by_uuid(pool, team_uuid)
        .await?
        .ok_or_else(|| AppError::not_found("Team", team_uuid))?;

    let ideas = status_counts(AnalyticsRepo::status_counts(pool, Some(&team.name)).await?)?;
    let spending = summarize_spending(&spending_for(pool, Some(&team.name)).await?);
    let member_count = TeamRepo::member_count(pool, team_uuid).await?;
    let active_claims = AnalyticsRepo::active_claims_for_team(pool, team_uuid).await?;

    Ok(TeamStats {
        team_uuid,
        team_name: team.name,
        ideas,
        member_count,
        active_claims,
        spending,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn grouped_rows_become_counts() {
        let rows = vec![
            StatusCountRow { status_id: IdeaStatus::Open.id(), count: 3 },
            StatusCountRow { status_id: IdeaStatus::Complete.id(), count: 2 },
        ];
        let counts = status_counts(rows).unwrap();
        assert_eq!(counts.open, 3);
        assert_eq!(counts.claimed, 0);
        assert_eq!(counts.total, 5);
    }

    #[test]
    fn unknown_status_id_is_rejected() {
        let rows = vec![StatusCountRow { status_id: 99, count: 1 }];
        assert_matches!(status_counts(rows), Err(CoreError::Internal(_)));
    }
}

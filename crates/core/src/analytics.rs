//! Dashboard aggregation: idea counts and bounty spending.

use std::collections::HashMap;

use serde::Serialize;

use crate::status::IdeaStatus;

/// Number of teams listed in the spending leaderboard.
pub const TOP_TEAMS_LIMIT: usize = 5;

/// Idea counts per top-level status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub open: i64,
    pub claimed: i64,
    pub complete: i64,
    pub total: i64,
}

impl StatusCounts {
    /// Build from `(status, count)` pairs as returned by a `GROUP BY`.
    pub fn from_grouped(rows: impl IntoIterator<Item = (IdeaStatus, i64)>) -> Self {
        let mut counts = Self::default();
        for (status, n) in rows {
            match status {
                IdeaStatus::Open => counts.open += n,
                IdeaStatus::Claimed => counts.claimed += n,
                IdeaStatus::Complete => counts.complete += n,
            }
            counts.total += n;
        }
        counts
    }
}

/// One bounty joined with its idea's benefactor team.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingRow {
    pub team_name: Option<String>,
    pub amount: f64,
    pub is_monetary: bool,
    pub is_expensed: bool,
    pub requires_approval: bool,
    pub is_approved: Option<bool>,
}

impl SpendingRow {
    fn counts_as_approved(&self) -> bool {
        self.is_monetary && self.is_expensed && self.is_approved == Some(true)
    }

    fn counts_as_pending(&self) -> bool {
        self.is_monetary && self.is_expensed && self.requires_approval && self.is_approved.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSpend {
    pub team: String,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SpendingSummary {
    pub total_approved: f64,
    pub approved_count: i64,
    pub total_pending: f64,
    pub pending_count: i64,
    pub top_teams: Vec<TeamSpend>,
}

/// Sum approved and pending spend and rank teams by approved spend.
pub fn summarize_spending(rows: &[SpendingRow]) -> SpendingSummary {
    let mut summary = SpendingSummary::default();
    let mut per_team: HashMap<&str, f64> = HashMap::new();

    for row in rows {
        if row.counts_as_approved() {
            summary.total_approved += row.amount;
            summary.approved_count += 1;
            if let Some(team) = row.team_name.as_deref() {
                *per_team.entry(team).or_default() += row.amount;
            }
        } else if row.counts_as_pending() {
            summary.total_pending += row.amount;
            summary.pending_count += 1;
        }
    }

    let mut teams: Vec<TeamSpend> = per_team
        .into_iter()
        .map(|(team, total)| TeamSpend {
            team: team.to_string(),
            total,
        })
        .collect();
    teams.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.team.cmp(&b.team)));
    teams.truncate(TOP_TEAMS_LIMIT);
    summary.top_teams = teams;
    summary
}

/// Board-wide dashboard numbers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardStats {
    pub ideas: StatusCounts,
    pub spending: SpendingSummary,
}

/// Numbers for one team's page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStats {
    pub team_uuid: crate::types::EntityId,
    pub team_name: String,
    /// Ideas whose benefactor is this team.
    pub ideas: StatusCounts,
    pub member_count: i64,
    /// Claims held by team members on ideas still in progress.
    pub active_claims: i64,
    pub spending: SpendingSummary,
}

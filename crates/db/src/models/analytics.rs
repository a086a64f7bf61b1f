use postboard_core::analytics::SpendingRow;
use postboard_core::status::StatusId;
use sqlx::FromRow;

/// `(status_id, count)` from a grouped idea count.
#[derive(Debug, Clone, FromRow)]
pub struct StatusCountRow {
    pub status_id: StatusId,
    pub count: i64,
}

/// A bounty joined with its idea's benefactor team.
#[derive(Debug, Clone, FromRow)]
pub struct BountySpendRow {
    pub team_name: Option<String>,
    pub amount: f64,
    pub is_monetary: bool,
    pub is_expensed: bool,
    pub requires_approval: bool,
    pub is_approved: Option<bool>,
}

impl From<BountySpendRow> for SpendingRow {
    fn from(row: BountySpendRow) -> Self {
        SpendingRow {
            team_name: row.team_name,
            amount: row.amount,
            is_monetary: row.is_monetary,
            is_expensed: row.is_expensed,
            requires_approval: row.requires_approval,
            is_approved: row.is_approved,
        }
    }
}

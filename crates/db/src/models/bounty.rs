use postboard_core::bounty::BountyState;
use postboard_core::types::{EntityId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `bounties` table (at most one per idea).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Bounty {
    pub uuid: EntityId,
    pub idea_uuid: EntityId,
    pub is_monetary: bool,
    pub is_expensed: bool,
    pub amount: f64,
    pub requires_approval: bool,
    pub is_approved: Option<bool>,
    pub approved_by: Option<String>,
    pub approved_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Bounty {
    pub fn state(&self) -> BountyState {
        BountyState {
            is_monetary: self.is_monetary,
            is_expensed: self.is_expensed,
            amount: self.amount,
            requires_approval: self.requires_approval,
            is_approved: self.is_approved,
        }
    }
}

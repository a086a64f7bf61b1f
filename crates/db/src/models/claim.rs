//! Claim and dual-approval models.

use postboard_core::claim::ApprovalFields;
use postboard_core::error::CoreError;
use postboard_core::status::{ClaimApprovalStatus, StatusId};
use postboard_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `claims` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Claim {
    pub uuid: EntityId,
    pub idea_uuid: EntityId,
    pub claimer_email: String,
    pub claim_date: Timestamp,
}

/// A row from the `claim_approvals` table.
///
/// The claimer's name, team and skills are a snapshot taken when the request
/// was made.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ClaimApproval {
    pub uuid: EntityId,
    pub idea_uuid: EntityId,
    pub claimer_email: String,
    pub claimer_name: String,
    pub claimer_team: Option<String>,
    pub claimer_skills: String,
    pub idea_owner_email: String,
    pub idea_owner_approved: Option<bool>,
    pub idea_owner_approved_at: Option<Timestamp>,
    pub idea_owner_approved_by: Option<String>,
    pub idea_owner_denied_at: Option<Timestamp>,
    pub manager_email: Option<String>,
    pub manager_approved: Option<bool>,
    pub manager_approved_at: Option<Timestamp>,
    pub manager_approved_by: Option<String>,
    pub manager_denied_at: Option<Timestamp>,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ClaimApproval {
    pub fn status(&self) -> Result<ClaimApprovalStatus, CoreError> {
        ClaimApprovalStatus::from_id(self.status_id)
    }

    /// The decision-bearing fields, for the claim engine.
    pub fn fields(&self) -> Result<ApprovalFields, CoreError> {
        Ok(ApprovalFields {
            idea_owner_approved: self.idea_owner_approved,
            manager_approved: self.manager_approved,
            status: self.status()?,
        })
    }
}

/// DTO for inserting a claim request.
#[derive(Debug, Clone)]
pub struct NewClaimApproval {
    pub idea_uuid: EntityId,
    pub claimer_email: String,
    pub claimer_name: String,
    pub claimer_team: Option<String>,
    pub claimer_skills: String,
    pub idea_owner_email: String,
    pub manager_email: Option<String>,
    /// `Some(true)` when the manager side was approved by the system.
    pub manager_approved: Option<bool>,
}

/// Request body for the owner and manager decision endpoints.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct DecisionRequest {
    pub approve: bool,
}

/// Request body for the admin assignment endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AssignRequest {
    pub assignee_email: String,
}

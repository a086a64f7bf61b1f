//! Idea entity model and DTOs.

use chrono::NaiveDate;
use postboard_core::error::CoreError;
use postboard_core::idea::{IdeaRelationship, IdeaSize, Priority};
use postboard_core::notification::IdeaRef;
use postboard_core::status::{IdeaStatus, StatusId, SubStatus};
use postboard_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ideas` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Idea {
    pub uuid: EntityId,
    pub title: String,
    pub description: String,
    pub submitter_email: String,
    /// Name of the team that benefits from the idea.
    pub benefactor_team: Option<String>,
    #[sqlx(try_from = "String")]
    pub priority: Priority,
    #[sqlx(try_from = "String")]
    pub size: IdeaSize,
    pub needed_by: Option<NaiveDate>,
    pub status_id: StatusId,
    pub sub_status_id: Option<StatusId>,
    pub sub_status_updated_at: Option<Timestamp>,
    pub sub_status_updated_by: Option<String>,
    pub progress_percentage: i32,
    pub blocked_reason: Option<String>,
    pub expected_completion: Option<NaiveDate>,
    pub assigned_to_email: Option<String>,
    pub assigned_at: Option<Timestamp>,
    pub assigned_by: Option<String>,
    pub date_submitted: Timestamp,
}

impl Idea {
    pub fn status(&self) -> Result<IdeaStatus, CoreError> {
        IdeaStatus::from_id(self.status_id)
    }

    pub fn sub_status(&self) -> Result<Option<SubStatus>, CoreError> {
        self.sub_status_id.map(SubStatus::from_id).transpose()
    }

    /// Identity used in notification wording.
    pub fn idea_ref(&self) -> IdeaRef<'_> {
        IdeaRef {
            uuid: self.uuid,
            title: &self.title,
        }
    }
}

/// DTO for submitting a new idea.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateIdea {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub benefactor_team: Option<String>,
    pub priority: Option<Priority>,
    pub size: Option<IdeaSize>,
    pub needed_by: Option<NaiveDate>,
    /// Names of existing skills the idea calls for.
    #[serde(default)]
    pub skills: Vec<String>,
}

/// Privileged direct edit. Every field is optional; status fields bypass
/// the lifecycle rules and are only normalised for storage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IdeaOverride {
    pub title: Option<String>,
    pub description: Option<String>,
    pub benefactor_team: Option<String>,
    pub priority: Option<Priority>,
    pub size: Option<IdeaSize>,
    pub needed_by: Option<NaiveDate>,
    pub status: Option<IdeaStatus>,
    pub sub_status: Option<SubStatus>,
    pub progress_percentage: Option<i32>,
    pub blocked_reason: Option<String>,
    pub expected_completion: Option<NaiveDate>,
    pub assigned_to_email: Option<String>,
}

/// An idea on a person's own board, tagged with how they relate to it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PersonalIdea {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub idea: Idea,
    #[sqlx(try_from = "String")]
    pub relationship: IdeaRelationship,
}

//! User profile, team and skill models.

use postboard_core::actor::ActorContext;
use postboard_core::error::CoreError;
use postboard_core::roles::UserRole;
use postboard_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `user_profiles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProfile {
    pub email: String,
    pub name: String,
    pub role: Option<String>,
    pub team_uuid: Option<EntityId>,
    pub managed_team_uuid: Option<EntityId>,
    pub is_admin: bool,
    pub created_at: Timestamp,
}

impl UserProfile {
    pub fn role(&self) -> Result<Option<UserRole>, CoreError> {
        self.role.as_deref().map(str::parse).transpose()
    }

    /// Build the caller identity handed to the engines.
    pub fn actor(&self) -> Result<ActorContext, CoreError> {
        let role = self.role()?;
        Ok(ActorContext {
            email: self.email.clone(),
            role,
            team_uuid: self.team_uuid,
            managed_team_uuid: match role {
                Some(UserRole::Manager) => self.managed_team_uuid,
                _ => None,
            },
            is_admin: self.is_admin,
        })
    }
}

/// Profile fields written by an admin create-or-update.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertUserProfile {
    pub email: String,
    pub name: String,
    pub role: Option<UserRole>,
    pub team_uuid: Option<EntityId>,
    pub managed_team_uuid: Option<EntityId>,
    #[serde(default)]
    pub is_admin: bool,
}

/// A row from the `teams` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Team {
    pub uuid: EntityId,
    pub name: String,
    pub description: Option<String>,
    pub is_approved: bool,
    pub created_at: Timestamp,
}

/// DTO for creating a team.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTeam {
    pub name: String,
    pub description: Option<String>,
    /// Teams created by an admin are approved unless stated otherwise.
    #[serde(default = "approved_by_default")]
    pub is_approved: bool,
}

fn approved_by_default() -> bool {
    true
}

/// A row from the `skills` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Skill {
    pub uuid: EntityId,
    pub name: String,
    pub created_at: Timestamp,
}

//! The explicit caller identity handed to every engine operation.

use serde::Serialize;

use crate::roles::UserRole;
use crate::types::EntityId;

/// Who is performing an operation.
///
/// Resolved once per request from the bearer token plus the caller's
/// `user_profiles` row; engines never consult ambient session state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActorContext {
    pub email: String,
    /// `None` for admins or users who have not completed their profile.
    pub role: Option<UserRole>,
    pub team_uuid: Option<EntityId>,
    /// Only set for managers.
    pub managed_team_uuid: Option<EntityId>,
    pub is_admin: bool,
}

impl ActorContext {
    /// Whether this actor is the user identified by `email`.
    pub fn is(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email)
    }

    /// Whether this actor holds the manager role for the given team.
    pub fn manages(&self, team_uuid: Option<EntityId>) -> bool {
        match (self.role, self.managed_team_uuid, team_uuid) {
            (Some(UserRole::Manager), Some(managed), Some(team)) => managed == team,
            _ => false,
        }
    }
}

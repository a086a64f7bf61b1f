//! Access policy for an idea's sensitive sub-resources (comments, external
//! links, activity feed, stage data, status history) and for team pages.
//!
//! Pure predicates: callers load the facts, these functions decide.

use crate::actor::ActorContext;
use crate::error::CoreError;
use crate::types::EntityId;

/// A person attached to an idea, with the team their profile belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyFacts {
    pub email: String,
    pub team_uuid: Option<EntityId>,
}

/// Everything the policy needs to know about one idea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdeaAccessFacts {
    pub submitter: PartyFacts,
    pub claimers: Vec<PartyFacts>,
}

/// Whether `actor` may view or add to the idea's detail tabs.
///
/// Grants access, in order, to: admins; the submitter; any claimer; a
/// manager of the submitter's team or of any claimer's team.
pub fn can_access_idea_tabs(idea: &IdeaAccessFacts, actor: &ActorContext) -> bool {
    if actor.is_admin {
        return true;
    }
    if actor.is(&idea.submitter.email) {
        return true;
    }
    if idea.claimers.iter().any(|c| actor.is(&c.email)) {
        return true;
    }
    std::iter::once(&idea.submitter)
        .chain(idea.claimers.iter())
        .any(|party| actor.manages(party.team_uuid))
}

/// [`can_access_idea_tabs`] as a `Result`, for use with `?`.
pub fn require_idea_tab_access(
    idea: &IdeaAccessFacts,
    actor: &ActorContext,
) -> Result<(), CoreError> {
    if can_access_idea_tabs(idea, actor) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "You do not have access to this idea's details".to_string(),
        ))
    }
}

/// Whether `actor` may see a team's management views.
pub fn can_manage_team(actor: &ActorContext, team_uuid: EntityId) -> bool {
    actor.is_admin || actor.manages(Some(team_uuid))
}

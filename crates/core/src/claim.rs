//! Dual-approval claim workflow.
//!
//! A claim request needs two independent approvals: the idea owner's and the
//! claimer's manager's. The first decision recorded on each side wins; a
//! denial from either side closes the request immediately, and two approvals
//! promote the idea from `open` to `claimed`.
//!
//! This module decides; `postboard-api`'s claim service applies the decision
//! inside one transaction with the approval row locked.

use crate::actor::ActorContext;
use crate::error::CoreError;
use crate::notification::{self, IdeaRef, NewNotification};
use crate::status::{ClaimApprovalStatus, IdeaStatus, SubStatus};
use crate::types::EntityId;

/// Stage an idea enters when it becomes claimed (organically or by admin assignment).
pub const CLAIMED_ENTRY_STAGE: SubStatus = SubStatus::Planning;

/// Which side of the dual approval is deciding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Approver {
    IdeaOwner,
    Manager,
}

impl Approver {
    fn describe(self) -> &'static str {
        match self {
            Approver::IdeaOwner => "The idea owner",
            Approver::Manager => "The manager",
        }
    }
}

/// Result of recording one decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// Recorded an approval; the other side has not approved yet.
    AwaitingOther,
    /// Both sides approved; the idea must be promoted to `claimed`.
    Approved,
    /// This decision was a denial; the request is closed.
    Denied,
}

/// The decision-bearing fields of a `claim_approvals` row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalFields {
    pub idea_owner_approved: Option<bool>,
    pub manager_approved: Option<bool>,
    pub status: ClaimApprovalStatus,
}

impl ApprovalFields {
    /// A fresh request, optionally with the manager side pre-approved.
    pub fn new_request(manager_approved: Option<bool>) -> Self {
        Self {
            idea_owner_approved: None,
            manager_approved,
            status: ClaimApprovalStatus::Pending,
        }
    }
}

/// The overall status implied by the two decision fields.
pub fn derive_status(owner: Option<bool>, manager: Option<bool>) -> ClaimApprovalStatus {
    match (owner, manager) {
        (Some(false), _) | (_, Some(false)) => ClaimApprovalStatus::Denied,
        (Some(true), Some(true)) => ClaimApprovalStatus::Approved,
        _ => ClaimApprovalStatus::Pending,
    }
}

/// What we know about the claimer's team when a request is created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimerTeamFacts {
    pub team_uuid: Option<EntityId>,
    pub manager_email: Option<String>,
}

/// Manager-side value for a new request.
///
/// Claimers without a team, or whose team has no manager, have nobody to ask,
/// so the manager side is approved by the system up front.
pub fn initial_manager_approval(team: &ClaimerTeamFacts) -> Option<bool> {
    match (team.team_uuid, team.manager_email.as_deref()) {
        (Some(_), Some(_)) => None,
        _ => Some(true),
    }
}

/// Check the preconditions for `actor` to request a claim on an idea.
pub fn validate_claim_request(
    idea_status: IdeaStatus,
    actor: &ActorContext,
    has_pending_request: bool,
) -> Result<(), CoreError> {
    if !actor.role.is_some_and(|r| r.can_claim()) {
        return Err(CoreError::Forbidden(
            "Only developers and citizen developers can claim ideas".to_string(),
        ));
    }
    if idea_status != IdeaStatus::Open {
        return Err(CoreError::InvalidTransition(format!(
            "Idea is {idea_status} and not available for claiming"
        )));
    }
    if has_pending_request {
        return Err(CoreError::InvalidTransition(
            "You already have a pending claim request for this idea".to_string(),
        ));
    }
    Ok(())
}

/// Only the idea owner may record the owner-side decision.
pub fn authorize_owner_decision(actor: &ActorContext, idea_owner_email: &str) -> Result<(), CoreError> {
    if actor.is(idea_owner_email) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the idea owner can make this decision".to_string(),
        ))
    }
}

/// Only the manager of the claimer's current team may record the manager-side decision.
pub fn authorize_manager_decision(
    actor: &ActorContext,
    claimer_team_uuid: Option<EntityId>,
) -> Result<(), CoreError> {
    if actor.manages(claimer_team_uuid) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the claimer's manager can make this decision".to_string(),
        ))
    }
}

/// Record one side's decision.
///
/// Fails without touching `fields` when the request is no longer pending or
/// when this side has already decided.
pub fn apply_decision(
    fields: &mut ApprovalFields,
    approver: Approver,
    approve: bool,
) -> Result<DecisionOutcome, CoreError> {
    if fields.status != ClaimApprovalStatus::Pending {
        return Err(CoreError::InvalidTransition(format!(
            "Claim request is already {}",
            fields.status
        )));
    }

    let slot = match approver {
        Approver::IdeaOwner => &mut fields.idea_owner_approved,
        Approver::Manager => &mut fields.manager_approved,
    };
    if slot.is_some() {
        return Err(CoreError::InvalidTransition(format!(
            "{} has already decided on this request",
            approver.describe()
        )));
    }
    *slot = Some(approve);

    fields.status = derive_status(fields.idea_owner_approved, fields.manager_approved);
    Ok(match fields.status {
        ClaimApprovalStatus::Denied => DecisionOutcome::Denied,
        ClaimApprovalStatus::Approved => DecisionOutcome::Approved,
        ClaimApprovalStatus::Pending => DecisionOutcome::AwaitingOther,
    })
}

/// Promotion requires the idea to still be open.
pub fn validate_promotion(idea_status: IdeaStatus) -> Result<(), CoreError> {
    if idea_status == IdeaStatus::Open {
        Ok(())
    } else {
        Err(CoreError::InvalidTransition(format!(
            "Idea is already {idea_status}; the claim can no longer be approved"
        )))
    }
}

// ---------------------------------------------------------------------------
// Notification plans
// ---------------------------------------------------------------------------

/// The people involved in one claim request.
#[derive(Debug, Clone, Copy)]
pub struct ClaimParties<'a> {
    pub idea: IdeaRef<'a>,
    pub owner_email: &'a str,
    pub claimer_email: &'a str,
    pub claimer_name: &'a str,
    /// Set only when the claimer's team has a manager.
    pub manager_email: Option<&'a str>,
}

/// Notifications emitted when a request is created.
pub fn request_notifications(parties: &ClaimParties<'_>, manager_auto_approved: bool) -> Vec<NewNotification> {
    let mut out = vec![notification::claim_request(
        parties.owner_email,
        parties.idea,
        parties.claimer_name,
        parties.claimer_email,
    )];
    if let (Some(manager), false) = (parties.manager_email, manager_auto_approved) {
        out.push(notification::claim_approval_required(
            manager,
            parties.idea,
            parties.claimer_name,
            parties.claimer_email,
        ));
    }
    out
}

/// Notifications emitted after a decision was recorded.
pub fn decision_notifications(
    parties: &ClaimParties<'_>,
    outcome: DecisionOutcome,
    decided_by: &str,
) -> Vec<NewNotification> {
    match outcome {
        DecisionOutcome::AwaitingOther => Vec::new(),
        DecisionOutcome::Denied => vec![notification::claim_denied(
            parties.claimer_email,
            parties.idea,
            decided_by,
        )],
        DecisionOutcome::Approved => vec![
            notification::claim_approved_for_claimer(parties.claimer_email, parties.idea),
            notification::claim_approved_for_owner(
                parties.owner_email,
                parties.idea,
                parties.claimer_email,
            ),
        ],
    }
}

/// Notifications emitted when an admin assigns an idea directly.
pub fn assignment_notifications(
    idea: IdeaRef<'_>,
    owner_email: &str,
    assignee_email: &str,
    admin_email: &str,
) -> Vec<NewNotification> {
    vec![
        notification::assigned(assignee_email, idea, admin_email),
        notification::claim_approved_for_owner(owner_email, idea, assignee_email),
    ]
}

/// Admin-only operations (assign, unclaim) share this gate.
pub fn require_admin(actor: &ActorContext, action: &str) -> Result<(), CoreError> {
    if actor.is_admin {
        Ok(())
    } else {
        Err(CoreError::Forbidden(format!("Admin role required to {action}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::NotificationKind;
    use crate::roles::UserRole;
    use assert_matches::assert_matches;
    use uuid::Uuid;

    fn developer() -> ActorContext {
        ActorContext {
            email: "david.dev@company.com".to_string(),
            role: Some(UserRole::Developer),
            team_uuid: None,
            managed_team_uuid: None,
            is_admin: false,
        }
    }

    fn parties(manager: Option<&'static str>) -> ClaimParties<'static> {
        ClaimParties {
            idea: IdeaRef {
                uuid: Uuid::nil(),
                title: "Invoice Bot",
            },
            owner_email: "jane.submitter@company.com",
            claimer_email: "david.dev@company.com",
            claimer_name: "David Dev",
            manager_email: manager,
        }
    }

    #[test]
    fn claimer_without_team_is_manager_auto_approved() {
        let facts = ClaimerTeamFacts {
            team_uuid: None,
            manager_email: None,
        };
        assert_eq!(initial_manager_approval(&facts), Some(true));
    }

    #[test]
    fn team_without_manager_is_manager_auto_approved() {
        let facts = ClaimerTeamFacts {
            team_uuid: Some(Uuid::new_v4()),
            manager_email: None,
        };
        assert_eq!(initial_manager_approval(&facts), Some(true));
    }

    #[test]
    fn team_with_manager_waits_for_manager() {
        let facts = ClaimerTeamFacts {
            team_uuid: Some(Uuid::new_v4()),
            manager_email: Some("bob.manager@company.com".to_string()),
        };
        assert_eq!(initial_manager_approval(&facts), None);
    }

    #[test]
    fn owner_approval_after_auto_approval_promotes() {
        let mut fields = ApprovalFields::new_request(Some(true));
        let outcome = apply_decision(&mut fields, Approver::IdeaOwner, true).unwrap();
        assert_eq!(outcome, DecisionOutcome::Approved);
        assert_eq!(fields.status, ClaimApprovalStatus::Approved);
    }

    #[test]
    fn single_approval_keeps_request_pending() {
        let mut fields = ApprovalFields::new_request(None);
        let outcome = apply_decision(&mut fields, Approver::Manager, true).unwrap();
        assert_eq!(outcome, DecisionOutcome::AwaitingOther);
        assert_eq!(fields.status, ClaimApprovalStatus::Pending);
        assert_eq!(fields.manager_approved, Some(true));
    }

    #[test]
    fn owner_denial_closes_request_while_manager_undecided() {
        let mut fields = ApprovalFields::new_request(None);
        let outcome = apply_decision(&mut fields, Approver::IdeaOwner, false).unwrap();
        assert_eq!(outcome, DecisionOutcome::Denied);
        assert_eq!(fields.status, ClaimApprovalStatus::Denied);
        assert_eq!(fields.manager_approved, None);
    }

    #[test]
    fn second_owner_decision_is_rejected_without_change() {
        let mut fields = ApprovalFields::new_request(None);
        apply_decision(&mut fields, Approver::IdeaOwner, true).unwrap();
        let before = fields;
        let err = apply_decision(&mut fields, Approver::IdeaOwner, true).unwrap_err();
        assert_matches!(err, CoreError::InvalidTransition(_));
        assert_eq!(fields, before);
    }

    #[test]
    fn decisions_on_closed_request_are_rejected() {
        let mut fields = ApprovalFields::new_request(None);
        apply_decision(&mut fields, Approver::Manager, false).unwrap();
        let err = apply_decision(&mut fields, Approver::IdeaOwner, true).unwrap_err();
        assert_matches!(err, CoreError::InvalidTransition(msg) if msg.contains("denied"));
        assert_eq!(fields.idea_owner_approved, None);
    }

    #[test]
    fn derived_status_matches_approval_invariant() {
        let values = [None, Some(true), Some(false)];
        for owner in values {
            for manager in values {
                let status = derive_status(owner, manager);
                let both_true = owner == Some(true) && manager == Some(true);
                assert_eq!(status == ClaimApprovalStatus::Approved, both_true);
                if status == ClaimApprovalStatus::Denied {
                    assert!(owner == Some(false) || manager == Some(false));
                }
            }
        }
    }

    #[test]
    fn request_rejected_for_non_developer_roles() {
        let mut actor = developer();
        actor.role = Some(UserRole::IdeaSubmitter);
        assert_matches!(
            validate_claim_request(IdeaStatus::Open, &actor, false),
            Err(CoreError::Forbidden(_))
        );
        actor.role = None;
        assert_matches!(
            validate_claim_request(IdeaStatus::Open, &actor, false),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn request_rejected_when_idea_not_open() {
        assert_matches!(
            validate_claim_request(IdeaStatus::Claimed, &developer(), false),
            Err(CoreError::InvalidTransition(_))
        );
    }

    #[test]
    fn duplicate_pending_request_rejected() {
        assert_matches!(
            validate_claim_request(IdeaStatus::Open, &developer(), true),
            Err(CoreError::InvalidTransition(_))
        );
        assert!(validate_claim_request(IdeaStatus::Open, &developer(), false).is_ok());
    }

    #[test]
    fn only_owner_decides_owner_side() {
        let owner = ActorContext {
            email: "jane.submitter@company.com".to_string(),
            ..developer()
        };
        assert!(authorize_owner_decision(&owner, "jane.submitter@company.com").is_ok());
        assert_matches!(
            authorize_owner_decision(&developer(), "jane.submitter@company.com"),
            Err(CoreError::Forbidden(_))
        );
    }

    #[test]
    fn only_claimers_manager_decides_manager_side() {
        let team = Uuid::new_v4();
        let manager = ActorContext {
            email: "bob.manager@company.com".to_string(),
            role: Some(UserRole::Manager),
            team_uuid: Some(team),
            managed_team_uuid: Some(team),
            is_admin: false,
        };
        assert!(authorize_manager_decision(&manager, Some(team)).is_ok());
        assert!(authorize_manager_decision(&manager, Some(Uuid::new_v4())).is_err());
        assert!(authorize_manager_decision(&manager, None).is_err());
    }

    #[test]
    fn promotion_requires_open_idea() {
        assert!(validate_promotion(IdeaStatus::Open).is_ok());
        assert!(validate_promotion(IdeaStatus::Claimed).is_err());
    }

    #[test]
    fn request_notifies_owner_and_manager() {
        let sent = request_notifications(&parties(Some("bob.manager@company.com")), false);
        let kinds: Vec<_> = sent.iter().map(|n| (n.user_email.as_str(), n.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                ("jane.submitter@company.com", NotificationKind::ClaimRequest),
                ("bob.manager@company.com", NotificationKind::ClaimApprovalRequired),
            ]
        );
    }

    #[test]
    fn auto_approved_request_only_notifies_owner() {
        let sent = request_notifications(&parties(None), true);
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, NotificationKind::ClaimRequest);
    }

    #[test]
    fn approval_notifies_claimer_and_owner() {
        let sent = decision_notifications(&parties(None), DecisionOutcome::Approved, "jane.submitter@company.com");
        assert_eq!(sent.len(), 2);
        assert!(sent.iter().all(|n| n.kind == NotificationKind::ClaimApproved));
        assert_eq!(sent[0].user_email, "david.dev@company.com");
        assert_eq!(sent[1].user_email, "jane.submitter@company.com");
    }

    #[test]
    fn denial_notifies_claimer_only() {
        let sent = decision_notifications(&parties(None), DecisionOutcome::Denied, "jane.submitter@company.com");
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, NotificationKind::ClaimDenied);
        assert_eq!(sent[0].user_email, "david.dev@company.com");
    }

    #[test]
    fn pending_outcome_sends_nothing() {
        assert!(decision_notifications(&parties(None), DecisionOutcome::AwaitingOther, "x").is_empty());
    }

    #[test]
    fn assignment_notifies_assignee_and_owner() {
        let idea = IdeaRef {
            uuid: Uuid::nil(),
            title: "Invoice Bot",
        };
        let sent = assignment_notifications(idea, "jane@c.com", "david@c.com", "admin@c.com");
        assert_eq!(sent[0].kind, NotificationKind::Assigned);
        assert_eq!(sent[0].user_email, "david@c.com");
        assert_eq!(sent[1].kind, NotificationKind::ClaimApproved);
        assert_eq!(sent[1].user_email, "jane@c.com");
    }
}

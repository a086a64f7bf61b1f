//! Bounty approval gating.
//!
//! Monetary bounties above [`BOUNTY_APPROVAL_THRESHOLD`] need an admin
//! decision; smaller ones are approved on creation. A decision, once made,
//! survives later amount edits.

use serde::{Deserialize, Serialize};

use crate::actor::ActorContext;
use crate::error::CoreError;

/// Amounts strictly above this need admin approval.
pub const BOUNTY_APPROVAL_THRESHOLD: f64 = 50.0;

/// Bounty fields as submitted with an idea.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BountyRequest {
    pub is_monetary: bool,
    #[serde(default)]
    pub is_expensed: bool,
    #[serde(default)]
    pub amount: f64,
}

/// The decision-relevant columns of a stored bounty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BountyState {
    pub is_monetary: bool,
    pub is_expensed: bool,
    pub amount: f64,
    pub requires_approval: bool,
    pub is_approved: Option<bool>,
}

impl BountyState {
    /// Waiting for an admin decision.
    pub fn is_pending(&self) -> bool {
        self.requires_approval && self.is_approved.is_none()
    }
}

/// What to do with the bounty row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BountyPlan {
    Delete,
    Create(BountyState),
    Update(BountyState),
}

impl BountyPlan {
    /// Whether applying this plan should ask admins for a decision.
    pub fn needs_admin_notice(&self, before: Option<&BountyState>) -> bool {
        match self {
            BountyPlan::Delete => false,
            BountyPlan::Create(after) | BountyPlan::Update(after) => {
                after.is_pending() && !before.is_some_and(BountyState::is_pending)
            }
        }
    }
}

pub fn requires_approval(amount: f64) -> bool {
    amount > BOUNTY_APPROVAL_THRESHOLD
}

pub fn validate_amount(amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() {
        return Err(CoreError::Validation(
            "Bounty amount must be a number".to_string(),
        ));
    }
    if amount < 0.0 {
        return Err(CoreError::Validation(format!(
            "Bounty amount must not be negative, got {amount}"
        )));
    }
    Ok(())
}

/// Decide how a submitted bounty changes the stored one.
///
/// A bounty that was denied at a high amount and then lowered below the
/// threshold keeps its denial: only an undecided bounty is auto-approved.
pub fn plan_upsert(existing: Option<&BountyState>, request: &BountyRequest) -> Result<BountyPlan, CoreError> {
    if !request.is_monetary {
        return Ok(BountyPlan::Delete);
    }
    validate_amount(request.amount)?;

    let needs_approval = requires_approval(request.amount);
    match existing {
        None => Ok(BountyPlan::Create(BountyState {
            is_monetary: true,
            is_expensed: request.is_expensed,
            amount: request.amount,
            requires_approval: needs_approval,
            is_approved: if needs_approval { None } else { Some(true) },
        })),
        Some(prior) => {
            let is_approved = match (needs_approval, prior.is_approved) {
                (false, None) => Some(true),
                (_, decided) => decided,
            };
            Ok(BountyPlan::Update(BountyState {
                is_monetary: true,
                is_expensed: request.is_expensed,
                amount: request.amount,
                requires_approval: needs_approval,
                is_approved,
            }))
        }
    }
}

/// The idea's submitter and admins may set or change its bounty.
pub fn authorize_upsert(actor: &ActorContext, submitter_email: &str) -> Result<(), CoreError> {
    if actor.is_admin || actor.is(submitter_email) {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the idea submitter or an admin can change its bounty".to_string(),
        ))
    }
}

/// Only admins decide, and only on a bounty still waiting for a decision.
pub fn authorize_decision(actor: &ActorContext, state: &BountyState) -> Result<(), CoreError> {
    if !actor.is_admin {
        return Err(CoreError::Forbidden(
            "Admin role required to decide on bounties".to_string(),
        ));
    }
    if !state.requires_approval {
        return Err(CoreError::InvalidTransition(
            "Bounty does not require approval".to_string(),
        ));
    }
    if let Some(decided) = state.is_approved {
        let word = if decided { "approved" } else { "denied" };
        return Err(CoreError::InvalidTransition(format!(
            "Bounty has already been {word}"
        )));
    }
    Ok(())
}

/// Record an admin decision. `requires_approval` is left untouched.
pub fn decide(state: &mut BountyState, actor: &ActorContext, approve: bool) -> Result<(), CoreError> {
    authorize_decision(actor, state)?;
    state.is_approved = Some(approve);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn admin() -> ActorContext {
        ActorContext {
            email: "admin@company.com".to_string(),
            role: None,
            team_uuid: None,
            managed_team_uuid: None,
            is_admin: true,
        }
    }

    fn monetary(amount: f64) -> BountyRequest {
        BountyRequest {
            is_monetary: true,
            is_expensed: true,
            amount,
        }
    }

    fn created(plan: BountyPlan) -> BountyState {
        match plan {
            BountyPlan::Create(state) => state,
            other => panic!("expected create, got {other:?}"),
        }
    }

    fn updated(plan: BountyPlan) -> BountyState {
        match plan {
            BountyPlan::Update(state) => state,
            other => panic!("expected update, got {other:?}"),
        }
    }

    #[test]
    fn large_bounty_waits_for_admin_then_is_approved() {
        let plan = plan_upsert(None, &monetary(75.0)).unwrap();
        assert!(plan.needs_admin_notice(None));
        let mut state = created(plan);
        assert!(state.requires_approval);
        assert_eq!(state.is_approved, None);

        decide(&mut state, &admin(), true).unwrap();
        assert_eq!(state.is_approved, Some(true));
        assert!(state.requires_approval);
    }

    #[test]
    fn small_bounty_is_approved_immediately_without_notice() {
        let plan = plan_upsert(None, &monetary(30.0)).unwrap();
        assert!(!plan.needs_admin_notice(None));
        let state = created(plan);
        assert!(!state.requires_approval);
        assert_eq!(state.is_approved, Some(true));
    }

    #[test]
    fn threshold_itself_does_not_need_approval() {
        assert!(!requires_approval(50.0));
        assert!(requires_approval(50.01));
    }

    #[test]
    fn non_monetary_bounty_deletes_row() {
        let request = BountyRequest {
            is_monetary: false,
            is_expensed: false,
            amount: 500.0,
        };
        assert_eq!(plan_upsert(None, &request).unwrap(), BountyPlan::Delete);
    }

    #[test]
    fn raising_an_approved_bounty_keeps_the_decision() {
        let prior = created(plan_upsert(None, &monetary(20.0)).unwrap());
        let plan = plan_upsert(Some(&prior), &monetary(200.0)).unwrap();
        assert!(!plan.needs_admin_notice(Some(&prior)));
        let state = updated(plan);
        assert!(state.requires_approval);
        assert_eq!(state.is_approved, Some(true));
    }

    #[test]
    fn lowering_a_denied_bounty_keeps_the_denial() {
        let mut prior = created(plan_upsert(None, &monetary(90.0)).unwrap());
        decide(&mut prior, &admin(), false).unwrap();
        let state = updated(plan_upsert(Some(&prior), &monetary(40.0)).unwrap());
        assert!(!state.requires_approval);
        assert_eq!(state.is_approved, Some(false));
    }

    #[test]
    fn lowering_a_pending_bounty_auto_approves() {
        let prior = created(plan_upsert(None, &monetary(90.0)).unwrap());
        let state = updated(plan_upsert(Some(&prior), &monetary(10.0)).unwrap());
        assert!(!state.requires_approval);
        assert_eq!(state.is_approved, Some(true));
    }

    #[test]
    fn amount_invariant_holds_for_every_plan() {
        let priors = [
            None,
            Some(created(plan_upsert(None, &monetary(10.0)).unwrap())),
            Some(created(plan_upsert(None, &monetary(100.0)).unwrap())),
        ];
        for prior in priors.iter() {
            for amount in [0.0, 25.0, 50.0, 50.5, 75.0, 1000.0] {
                let state = match plan_upsert(prior.as_ref(), &monetary(amount)).unwrap() {
                    BountyPlan::Create(s) | BountyPlan::Update(s) => s,
                    BountyPlan::Delete => unreachable!(),
                };
                if amount <= BOUNTY_APPROVAL_THRESHOLD {
                    assert!(!state.requires_approval);
                }
                if state.requires_approval {
                    assert!(state.amount > BOUNTY_APPROVAL_THRESHOLD);
                }
            }
        }
    }

    #[test]
    fn negative_and_nan_amounts_rejected() {
        assert_matches!(plan_upsert(None, &monetary(-1.0)), Err(CoreError::Validation(_)));
        assert_matches!(plan_upsert(None, &monetary(f64::NAN)), Err(CoreError::Validation(_)));
    }

    #[test]
    fn only_admin_decides() {
        let mut state = created(plan_upsert(None, &monetary(75.0)).unwrap());
        let mut user = admin();
        user.is_admin = false;
        assert_matches!(decide(&mut state, &user, true), Err(CoreError::Forbidden(_)));
        assert_eq!(state.is_approved, None);
    }

    #[test]
    fn second_decision_rejected() {
        let mut state = created(plan_upsert(None, &monetary(75.0)).unwrap());
        decide(&mut state, &admin(), false).unwrap();
        assert_matches!(
            decide(&mut state, &admin(), true),
            Err(CoreError::InvalidTransition(msg)) if msg.contains("denied")
        );
    }

    #[test]
    fn bounty_without_approval_requirement_cannot_be_decided() {
        let mut state = created(plan_upsert(None, &monetary(10.0)).unwrap());
        assert_matches!(
            decide(&mut state, &admin(), true),
            Err(CoreError::InvalidTransition(_))
        );
    }

    #[test]
    fn only_submitter_or_admin_sets_bounty() {
        let mut submitter = admin();
        submitter.email = "Jane.Submitter@company.com".to_string();
        submitter.is_admin = false;
        assert!(authorize_upsert(&submitter, "jane.submitter@company.com").is_ok());
        assert!(authorize_upsert(&admin(), "jane.submitter@company.com").is_ok());

        let mut other = submitter.clone();
        other.email = "david.dev@company.com".to_string();
        assert_matches!(
            authorize_upsert(&other, "jane.submitter@company.com"),
            Err(CoreError::Forbidden(_))
        );
    }
}

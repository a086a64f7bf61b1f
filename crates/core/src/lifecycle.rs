//! Sub-status state machine for claimed ideas.
//!
//! [`plan_transition`] turns a requested stage change into a complete
//! [`TransitionPlan`]: the history row, the new idea fields, the replacement
//! stage data, the activity payload and the notifications. The lifecycle
//! service writes the plan inside one transaction.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use crate::actor::ActorContext;
use crate::error::CoreError;
use crate::notification::{self, IdeaRef, NewNotification};
use crate::status::{IdeaStatus, SubStatus};
use crate::types::{EntityId, Timestamp};

/// Format accepted for `expected_completion`.
pub const EXPECTED_COMPLETION_FORMAT: &str = "%Y-%m-%d";

pub const MIN_PROGRESS: i32 = 0;
pub const MAX_PROGRESS: i32 = 100;

impl SubStatus {
    /// Display label, e.g. "Awaiting Deployment".
    pub fn label(self) -> &'static str {
        match self {
            SubStatus::Planning => "Planning",
            SubStatus::InDevelopment => "In Development",
            SubStatus::Testing => "Testing",
            SubStatus::AwaitingDeployment => "Awaiting Deployment",
            SubStatus::Deployed => "Deployed",
            SubStatus::Verified => "Verified",
            SubStatus::OnHold => "On Hold",
            SubStatus::Blocked => "Blocked",
            SubStatus::Cancelled => "Cancelled",
            SubStatus::RolledBack => "Rolled Back",
        }
    }

    /// Entering this stage completes the idea.
    pub fn is_terminal(self) -> bool {
        matches!(self, SubStatus::Verified | SubStatus::Cancelled)
    }

    /// Stages that carry a blocked reason.
    pub fn takes_blocked_reason(self) -> bool {
        matches!(self, SubStatus::Blocked | SubStatus::OnHold)
    }

    /// Stages escalated to the benefactor team's manager.
    pub fn needs_escalation(self) -> bool {
        matches!(
            self,
            SubStatus::Blocked | SubStatus::OnHold | SubStatus::RolledBack
        )
    }

    /// Stage-data fields a developer may record while in this stage.
    pub fn stage_fields(self) -> &'static [&'static str] {
        match self {
            SubStatus::Planning => &["requirements_doc_url", "design_spec_url"],
            SubStatus::InDevelopment => &["repository_url", "branch_name", "pull_request_urls"],
            SubStatus::Testing => &["test_plan_url", "test_results_summary", "defects_found"],
            SubStatus::AwaitingDeployment | SubStatus::Deployed => {
                &["deployment_guide_url", "release_notes", "target_environment"]
            }
            SubStatus::Verified => &["verified_by", "performance_metrics", "signoff_notes"],
            SubStatus::OnHold | SubStatus::Blocked | SubStatus::Cancelled | SubStatus::RolledBack => &[],
        }
    }
}

/// Progress implied by entering `sub_status`; pause-like stages keep `current`.
pub fn default_progress(sub_status: SubStatus, current: i32) -> i32 {
    match sub_status {
        SubStatus::Planning => 10,
        SubStatus::InDevelopment => 30,
        SubStatus::Testing => 60,
        SubStatus::AwaitingDeployment => 80,
        SubStatus::Deployed => 90,
        SubStatus::Verified => 100,
        SubStatus::RolledBack => 85,
        SubStatus::OnHold | SubStatus::Blocked | SubStatus::Cancelled => current,
    }
}

pub fn validate_progress(progress: i32) -> Result<(), CoreError> {
    if (MIN_PROGRESS..=MAX_PROGRESS).contains(&progress) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Progress must be between {MIN_PROGRESS} and {MAX_PROGRESS}, got {progress}"
        )))
    }
}

pub fn parse_expected_completion(raw: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(raw.trim(), EXPECTED_COMPLETION_FORMAT).map_err(|_| {
        CoreError::Validation(format!(
            "Invalid expected completion date '{raw}'. Expected YYYY-MM-DD"
        ))
    })
}

/// Keep the non-empty submitted fields, rejecting names the stage does not know.
pub fn validate_stage_data(
    sub_status: SubStatus,
    submitted: &BTreeMap<String, String>,
) -> Result<Vec<(String, String)>, CoreError> {
    let allowed = sub_status.stage_fields();
    let mut fields = Vec::new();
    for (name, value) in submitted {
        if !allowed.contains(&name.as_str()) {
            return Err(CoreError::Validation(format!(
                "Field '{name}' is not recorded during {}",
                sub_status.label()
            )));
        }
        let value = value.trim();
        if !value.is_empty() {
            fields.push((name.clone(), value.to_string()));
        }
    }
    Ok(fields)
}

/// A stage change requested by a caller.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransitionRequest {
    pub sub_status: Option<SubStatus>,
    pub comment: Option<String>,
    pub progress_override: Option<i32>,
    pub blocked_reason: Option<String>,
    pub expected_completion: Option<String>,
    #[serde(default)]
    pub stage_data: BTreeMap<String, String>,
}

/// The current state of the idea being transitioned, loaded under lock.
#[derive(Debug, Clone)]
pub struct TransitionFacts<'a> {
    pub idea: IdeaRef<'a>,
    pub status: IdeaStatus,
    pub sub_status: Option<SubStatus>,
    pub progress: i32,
    pub sub_status_updated_at: Option<Timestamp>,
    pub submitter_email: &'a str,
    pub assigned_to_email: Option<&'a str>,
    pub claimer_emails: &'a [String],
    pub benefactor_team_uuid: Option<EntityId>,
    pub benefactor_manager_email: Option<&'a str>,
}

/// Row to append to `status_history`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub from_status: IdeaStatus,
    pub to_status: IdeaStatus,
    pub from_sub_status: Option<SubStatus>,
    pub to_sub_status: SubStatus,
    pub changed_by: String,
    pub comment: Option<String>,
    pub duration_minutes: Option<i64>,
}

/// Everything the lifecycle service writes for one transition.
#[derive(Debug, Clone)]
pub struct TransitionPlan {
    pub history: HistoryEntry,
    pub status: IdeaStatus,
    /// Value for the `sub_status` column; `None` once the idea is complete.
    pub sub_status: Option<SubStatus>,
    pub progress: i32,
    pub blocked_reason: Option<String>,
    /// Only replaces the stored value when `Some`.
    pub expected_completion: Option<NaiveDate>,
    /// Replaces the stage data of `history.to_sub_status`.
    pub stage_data: Vec<(String, String)>,
    pub activity_description: String,
    pub activity_payload: serde_json::Value,
    pub notifications: Vec<NewNotification>,
}

/// Admin, assignee, any claimer, or the benefactor team's manager.
pub fn authorize_transition(facts: &TransitionFacts<'_>, actor: &ActorContext) -> Result<(), CoreError> {
    let allowed = actor.is_admin
        || facts.assigned_to_email.is_some_and(|a| actor.is(a))
        || facts.claimer_emails.iter().any(|c| actor.is(c))
        || actor.manages(facts.benefactor_team_uuid);
    if allowed {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "Only the assigned developer, a claimer, the benefactor manager or an admin can update this idea's status"
                .to_string(),
        ))
    }
}

/// Decide a sub-status transition.
pub fn plan_transition(
    facts: &TransitionFacts<'_>,
    request: &TransitionRequest,
    actor: &ActorContext,
    now: Timestamp,
) -> Result<TransitionPlan, CoreError> {
    authorize_transition(facts, actor)?;

    let target = request
        .sub_status
        .ok_or_else(|| CoreError::Validation("sub_status is required".to_string()))?;

    if facts.status != IdeaStatus::Claimed {
        return Err(CoreError::InvalidTransition(format!(
            "Idea is {}; only claimed ideas can change development stage",
            facts.status
        )));
    }

    let progress = match request.progress_override {
        Some(p) => {
            validate_progress(p)?;
            p
        }
        None => default_progress(target, facts.progress),
    };

    let expected_completion = request
        .expected_completion
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .map(parse_expected_completion)
        .transpose()?;

    let stage_data = validate_stage_data(target, &request.stage_data)?;

    let blocked_reason = if target.takes_blocked_reason() {
        request
            .blocked_reason
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string)
    } else {
        None
    };

    let comment = request
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    let duration_minutes = facts
        .sub_status_updated_at
        .map(|since| (now - since).num_minutes());

    let (status, sub_status) = if target.is_terminal() {
        (IdeaStatus::Complete, None)
    } else {
        (IdeaStatus::Claimed, Some(target))
    };

    let history = HistoryEntry {
        from_status: facts.status,
        to_status: status,
        from_sub_status: facts.sub_status,
        to_sub_status: target,
        changed_by: actor.email.clone(),
        comment: comment.clone(),
        duration_minutes,
    };

    let activity_description = match facts.sub_status {
        Some(old) => format!("changed stage from {} to {}", old.label(), target.label()),
        None => format!("set stage to {}", target.label()),
    };
    let activity_payload = json!({
        "old_sub_status": facts.sub_status,
        "new_sub_status": target,
        "progress": progress,
        "comment": comment,
        "stage_data": stage_data.iter().cloned().collect::<BTreeMap<String, String>>(),
    });

    let mut notifications = Vec::new();
    if !actor.is(facts.submitter_email) {
        notifications.push(notification::status_change(
            facts.submitter_email,
            facts.idea,
            target,
            &actor.email,
        ));
    }
    if target.needs_escalation() {
        if let Some(manager) = facts.benefactor_manager_email.filter(|m| !actor.is(m)) {
            notifications.push(notification::stage_escalation(
                manager,
                facts.idea,
                target,
                blocked_reason.as_deref(),
                &actor.email,
            ));
        }
    }

    Ok(TransitionPlan {
        history,
        status,
        sub_status,
        progress,
        blocked_reason,
        expected_completion,
        stage_data,
        activity_description,
        activity_payload,
        notifications,
    })
}

// ---------------------------------------------------------------------------
// Admin override
// ---------------------------------------------------------------------------

/// Privileged direct edit of status fields.
///
/// Bypasses the state machine entirely: any status may be set from any
/// status. Only the storage invariant (sub-status present exactly while
/// claimed) is restored.
pub fn normalize_override(status: IdeaStatus, sub_status: Option<SubStatus>) -> Option<SubStatus> {
    match status {
        IdeaStatus::Claimed => Some(sub_status.unwrap_or(SubStatus::Planning)),
        IdeaStatus::Open | IdeaStatus::Complete => None,
    }
}

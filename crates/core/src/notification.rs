//! Notification catalogue and feed rules.
//!
//! Every engine describes its side effects as [`NewNotification`] values;
//! the service layer inserts them inside the same transaction as the state
//! change that caused them. The constructors here own the wording so that
//! organic and admin paths produce identical notifications.

use chrono::Duration;
use serde::Serialize;

use crate::status::SubStatus;
use crate::types::{EntityId, Timestamp};

/// Synthetic inbox merged into every admin's feed.
pub const ADMIN_INBOX: &str = "admin@system.local";

/// Maximum number of entries returned by a feed.
pub const FEED_LIMIT: usize = 50;

/// Read notifications older than this drop out of the feed.
pub const READ_RETENTION_DAYS: i64 = 7;

define_text_enum! {
    /// The `type` column of a notification.
    NotificationKind ("notification type") {
        ClaimRequest => "claim_request",
        ClaimApprovalRequired => "claim_approval_required",
        ClaimApproved => "claim_approved",
        ClaimDenied => "claim_denied",
        StatusChange => "status_change",
        Assigned => "assigned",
        BountyApproval => "bounty_approval",
        BountyApproved => "bounty_approved",
        BountyDenied => "bounty_denied",
    }
}

/// The idea a notification is about.
#[derive(Debug, Clone, Copy)]
pub struct IdeaRef<'a> {
    pub uuid: EntityId,
    pub title: &'a str,
}

/// A notification waiting to be persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewNotification {
    pub user_email: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub idea_uuid: Option<EntityId>,
    pub related_user_email: Option<String>,
}

impl NewNotification {
    /// Create a notification with only the required fields.
    pub fn new(
        user_email: impl Into<String>,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            user_email: user_email.into(),
            kind,
            title: title.into(),
            message: message.into(),
            idea_uuid: None,
            related_user_email: None,
        }
    }

    /// Attach the idea this notification refers to.
    pub fn with_idea(mut self, idea_uuid: EntityId) -> Self {
        self.idea_uuid = Some(idea_uuid);
        self
    }

    /// Attach the other user involved (claimer, approver, assigner).
    pub fn with_related_user(mut self, email: impl Into<String>) -> Self {
        self.related_user_email = Some(email.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

/// Tell the idea owner someone wants to claim their idea.
pub fn claim_request(owner_email: &str, idea: IdeaRef<'_>, claimer_name: &str, claimer_email: &str) -> NewNotification {
    NewNotification::new(
        owner_email,
        NotificationKind::ClaimRequest,
        "New Claim Request",
        format!("{claimer_name} has requested to claim your idea: {}", idea.title),
    )
    .with_idea(idea.uuid)
    .with_related_user(claimer_email)
}

/// Ask the claimer's manager to approve a claim request.
pub fn claim_approval_required(
    manager_email: &str,
    idea: IdeaRef<'_>,
    claimer_name: &str,
    claimer_email: &str,
) -> NewNotification {
    NewNotification::new(
        manager_email,
        NotificationKind::ClaimApprovalRequired,
        "Team Member Claim Approval Required",
        format!(
            "{claimer_name} from your team has requested to claim: {}",
            idea.title
        ),
    )
    .with_idea(idea.uuid)
    .with_related_user(claimer_email)
}

/// Tell the claimer both approvals are in and the idea is theirs.
pub fn claim_approved_for_claimer(claimer_email: &str, idea: IdeaRef<'_>) -> NewNotification {
    NewNotification::new(
        claimer_email,
        NotificationKind::ClaimApproved,
        "Claim Request Approved",
        format!("Your claim request for '{}' has been approved", idea.title),
    )
    .with_idea(idea.uuid)
}

/// Tell the idea owner their idea has been claimed.
pub fn claim_approved_for_owner(owner_email: &str, idea: IdeaRef<'_>, claimer_email: &str) -> NewNotification {
    NewNotification::new(
        owner_email,
        NotificationKind::ClaimApproved,
        "Idea Claimed",
        format!("Your idea '{}' has been claimed by {claimer_email}", idea.title),
    )
    .with_idea(idea.uuid)
    .with_related_user(claimer_email)
}

/// Tell the claimer their request was denied.
pub fn claim_denied(claimer_email: &str, idea: IdeaRef<'_>, denied_by: &str) -> NewNotification {
    NewNotification::new(
        claimer_email,
        NotificationKind::ClaimDenied,
        "Claim Request Denied",
        format!("Your claim request for '{}' has been denied", idea.title),
    )
    .with_idea(idea.uuid)
    .with_related_user(denied_by)
}

/// Tell a developer an admin assigned them an idea.
pub fn assigned(assignee_email: &str, idea: IdeaRef<'_>, assigned_by: &str) -> NewNotification {
    NewNotification::new(
        assignee_email,
        NotificationKind::Assigned,
        "Idea Assigned to You",
        format!("You have been assigned to work on: {}", idea.title),
    )
    .with_idea(idea.uuid)
    .with_related_user(assigned_by)
}

/// Tell the submitter their idea moved to a new development stage.
pub fn status_change(submitter_email: &str, idea: IdeaRef<'_>, sub_status: SubStatus, actor_email: &str) -> NewNotification {
    NewNotification::new(
        submitter_email,
        NotificationKind::StatusChange,
        format!("Status Update: {}", sub_status.label()),
        sub_status_message(sub_status, idea.title),
    )
    .with_idea(idea.uuid)
    .with_related_user(actor_email)
}

/// Escalate a blocked, on-hold or rolled-back idea to the benefactor team's manager.
pub fn stage_escalation(
    manager_email: &str,
    idea: IdeaRef<'_>,
    sub_status: SubStatus,
    blocked_reason: Option<&str>,
    actor_email: &str,
) -> NewNotification {
    let reason = blocked_reason
        .filter(|r| !r.trim().is_empty())
        .unwrap_or("No reason given");
    NewNotification::new(
        manager_email,
        NotificationKind::StatusChange,
        format!("Attention Needed: {}", sub_status.label()),
        format!("{} Reason: {reason}", sub_status_message(sub_status, idea.title)),
    )
    .with_idea(idea.uuid)
    .with_related_user(actor_email)
}

/// Ask admins to approve a monetary bounty over the threshold.
pub fn bounty_approval(idea: IdeaRef<'_>, amount: f64, submitter_email: &str) -> NewNotification {
    NewNotification::new(
        ADMIN_INBOX,
        NotificationKind::BountyApproval,
        "Bounty Approval Required",
        format!(
            "Idea '{}' has a ${amount:.2} bounty requiring approval",
            idea.title
        ),
    )
    .with_idea(idea.uuid)
    .with_related_user(submitter_email)
}

/// Tell the submitter their bounty was approved.
pub fn bounty_approved(submitter_email: &str, idea: IdeaRef<'_>, amount: f64, approver: &str) -> NewNotification {
    NewNotification::new(
        submitter_email,
        NotificationKind::BountyApproved,
        "Bounty Approved",
        format!(
            "The ${amount:.2} bounty for '{}' has been approved",
            idea.title
        ),
    )
    .with_idea(idea.uuid)
    .with_related_user(approver)
}

/// Tell the submitter their bounty was denied.
pub fn bounty_denied(submitter_email: &str, idea: IdeaRef<'_>, amount: f64, approver: &str) -> NewNotification {
    NewNotification::new(
        submitter_email,
        NotificationKind::BountyDenied,
        "Bounty Denied",
        format!("The ${amount:.2} bounty for '{}' has been denied", idea.title),
    )
    .with_idea(idea.uuid)
    .with_related_user(approver)
}

/// Human-readable sentence describing an idea entering `sub_status`.
pub fn sub_status_message(sub_status: SubStatus, title: &str) -> String {
    match sub_status {
        SubStatus::Planning => format!("Planning has started for '{title}'"),
        SubStatus::InDevelopment => format!("Development has started on '{title}'"),
        SubStatus::Testing => format!("'{title}' is now in testing"),
        SubStatus::AwaitingDeployment => format!("'{title}' is ready and awaiting deployment"),
        SubStatus::Deployed => format!("'{title}' has been deployed"),
        SubStatus::Verified => format!("'{title}' has been verified and is complete"),
        SubStatus::OnHold => format!("'{title}' has been put on hold."),
        SubStatus::Blocked => format!("'{title}' is blocked."),
        SubStatus::Cancelled => format!("'{title}' has been cancelled"),
        SubStatus::RolledBack => format!("'{title}' has been rolled back."),
    }
}

// ---------------------------------------------------------------------------
// Feed
// ---------------------------------------------------------------------------

/// The fields of a stored notification the feed rules look at.
pub trait FeedEntry {
    fn is_read(&self) -> bool;
    fn created_at(&self) -> Timestamp;
}

/// Oldest `created_at` a read notification may have and still be shown.
pub fn read_cutoff(now: Timestamp) -> Timestamp {
    now - Duration::days(READ_RETENTION_DAYS)
}

/// Unread notifications are always shown; read ones only within the retention window.
pub fn is_visible_in_feed<N: FeedEntry>(entry: &N, now: Timestamp) -> bool {
    !entry.is_read() || entry.created_at() >= read_cutoff(now)
}

/// Build a feed from the personal inbox and, for admins, the admin inbox.
///
/// Filters by visibility, orders newest first and caps at [`FEED_LIMIT`].
pub fn merge_feed<N: FeedEntry>(personal: Vec<N>, admin_inbox: Vec<N>, now: Timestamp) -> Vec<N> {
    let mut feed: Vec<N> = personal
        .into_iter()
        .chain(admin_inbox)
        .filter(|n| is_visible_in_feed(n, now))
        .collect();
    feed.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
    feed.truncate(FEED_LIMIT);
    feed
}

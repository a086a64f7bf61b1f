//! Idea vocabulary and validation helpers.
//!
//! Priority, size, external-link and activity enums plus the field checks
//! shared by the DB and API layers.

use crate::error::CoreError;

/// Maximum length of an idea title.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length of a comment body.
pub const MAX_COMMENT_LENGTH: usize = 10_000;

/// Maximum length of an external link URL.
pub const MAX_URL_LENGTH: usize = 500;

define_text_enum! {
    /// How urgent the submitting team considers the idea.
    Priority ("priority") {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
}

define_text_enum! {
    /// Rough effort estimate for an idea.
    IdeaSize ("size") {
        Small => "small",
        Medium => "medium",
        Large => "large",
        ExtraLarge => "extra_large",
    }
}

define_text_enum! {
    /// Kind of resource an external link points at.
    ExternalLinkType ("link type") {
        Repository => "repository",
        PullRequest => "pull_request",
        AdoWorkItem => "ado_work_item",
        Documentation => "documentation",
        GanttChart => "gantt_chart",
        TestResults => "test_results",
        Other => "other",
    }
}

define_text_enum! {
    /// Entry type in an idea's activity feed.
    ActivityType ("activity type") {
        Created => "created",
        StatusChanged => "status_changed",
        Assigned => "assigned",
        Claimed => "claimed",
        CommentAdded => "comment_added",
        LinkAdded => "link_added",
        ProgressUpdated => "progress_updated",
    }
}

define_text_enum! {
    /// Column an idea listing is ordered by.
    IdeaSort ("sort field") {
        DateSubmitted => "date_submitted",
        NeededBy => "needed_by",
        Priority => "priority",
        Size => "size",
    }
}

define_text_enum! {
    /// Direction of an idea listing.
    SortOrder ("sort order") {
        Asc => "asc",
        Desc => "desc",
    }
}

define_text_enum! {
    /// How the caller relates to the ideas on their personal board.
    IdeaRelationship ("relationship") {
        Submitted => "submitted",
        Claimed => "claimed",
        Both => "both",
    }
}

impl ExternalLinkType {
    /// Lower-case phrase used in activity descriptions ("added a pull request").
    pub fn phrase(self) -> String {
        self.as_str().replace('_', " ")
    }
}

/// Validate an idea title.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate comment content.
pub fn validate_comment(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation(
            "Comment content must not be empty".to_string(),
        ));
    }
    if content.len() > MAX_COMMENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Comment exceeds maximum length of {MAX_COMMENT_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Validate an external link: non-empty title and an http(s) URL.
pub fn validate_external_link(title: &str, url: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Link title must not be empty".to_string(),
        ));
    }
    if url.len() > MAX_URL_LENGTH {
        return Err(CoreError::Validation(format!(
            "URL exceeds maximum length of {MAX_URL_LENGTH} characters"
        )));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(CoreError::Validation(format!(
            "Invalid URL '{url}'. Must start with http:// or https://"
        )));
    }
    Ok(())
}

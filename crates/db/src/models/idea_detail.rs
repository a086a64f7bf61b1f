//! Append-only records shown on an idea's detail tabs: comments, external
//! links, the activity feed and per-stage data.

use postboard_core::idea::{ActivityType, ExternalLinkType};
use postboard_core::status::StatusId;
use postboard_core::types::{EntityId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `idea_comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IdeaComment {
    pub uuid: EntityId,
    pub idea_uuid: EntityId,
    pub author_email: String,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub content: String,
}

/// A row from the `idea_external_links` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IdeaExternalLink {
    pub uuid: EntityId,
    pub idea_uuid: EntityId,
    pub link_type: String,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
    pub created_by: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateExternalLink {
    pub link_type: ExternalLinkType,
    pub title: String,
    pub url: String,
    pub description: Option<String>,
}

/// A row from the `idea_activities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct IdeaActivity {
    pub uuid: EntityId,
    pub idea_uuid: EntityId,
    pub actor_email: String,
    pub activity_type: String,
    pub description: String,
    pub payload: serde_json::Value,
    pub created_at: Timestamp,
}

/// An activity waiting to be appended.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub idea_uuid: EntityId,
    pub actor_email: String,
    pub activity_type: ActivityType,
    pub description: String,
    pub payload: serde_json::Value,
}

impl NewActivity {
    pub fn new(
        idea_uuid: EntityId,
        actor_email: impl Into<String>,
        activity_type: ActivityType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            idea_uuid,
            actor_email: actor_email.into(),
            activity_type,
            description: description.into(),
            payload: serde_json::Value::Object(Default::default()),
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

/// A row from the `idea_stage_data` table, with the stage name resolved.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StageDataEntry {
    pub uuid: EntityId,
    pub idea_uuid: EntityId,
    pub sub_status_id: StatusId,
    pub sub_status: String,
    pub field_name: String,
    pub field_value: String,
    pub updated_by: String,
    pub updated_at: Timestamp,
}

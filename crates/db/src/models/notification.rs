//! Notification entity model.

use postboard_core::notification::FeedEntry;
use postboard_core::types::{EntityId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub uuid: EntityId,
    pub user_email: String,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub notification_type: String,
    pub title: String,
    pub message: String,
    pub idea_uuid: Option<EntityId>,
    pub related_user_email: Option<String>,
    pub is_read: bool,
    pub created_at: Timestamp,
    pub read_at: Option<Timestamp>,
}

impl FeedEntry for Notification {
    fn is_read(&self) -> bool {
        self.is_read
    }

    fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

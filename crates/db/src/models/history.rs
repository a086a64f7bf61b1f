//! Status history model.

use postboard_core::types::{EntityId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A `status_history` row with its lookup ids resolved to names.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StatusHistoryEntry {
    pub uuid: EntityId,
    pub idea_uuid: EntityId,
    pub from_status: Option<String>,
    pub to_status: String,
    pub from_sub_status: Option<String>,
    pub to_sub_status: Option<String>,
    pub changed_by: String,
    pub changed_at: Timestamp,
    pub comment: Option<String>,
    pub duration_minutes: Option<i64>,
}

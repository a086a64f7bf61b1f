//! Transactional orchestration around the pure engines in `postboard_core`.
//!
//! Every mutating operation follows the same shape: open one transaction,
//! lock the rows the decision depends on, ask the core engine what to do,
//! write the outcome and its notifications, commit, then hand the
//! notifications to email delivery. Handlers stay thin and only translate
//! HTTP into calls on these modules.

pub mod admin;
pub mod analytics;
pub mod bounty;
pub mod claims;
pub mod ideas;
pub mod lifecycle;
pub mod notify;
pub mod people;

use postboard_core::types::EntityId;
use postboard_db::models::idea::Idea;
use postboard_db::repositories::IdeaRepo;
use postboard_db::DbTx;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};

/// Verify that an idea exists, returning the full row.
pub(crate) async fn ensure_idea_exists(pool: &PgPool, uuid: EntityId) -> AppResult<Idea> {
    IdeaRepo::find_by_uuid(pool, uuid)
        .await?
        .ok_or_else(|| AppError::not_found("Idea", uuid))
}

/// Lock an idea row for the rest of the transaction.
pub(crate) async fn lock_idea(tx: &mut DbTx<'_>, uuid: EntityId) -> AppResult<Idea> {
    IdeaRepo::lock(tx, uuid)
        .await?
        .ok_or_else(|| AppError::not_found("Idea", uuid))
}

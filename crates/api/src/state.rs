use std::sync::Arc;

use postboard_events::EmailDelivery;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: inner data is behind `Arc` or is already `Clone`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: postboard_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// SMTP delivery for notification emails; `None` when SMTP is not configured.
    pub mailer: Option<Arc<EmailDelivery>>,
}

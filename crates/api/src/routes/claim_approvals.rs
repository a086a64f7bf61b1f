use axum::routing::{get, post};
use axum::Router;

use crate::handlers::claims;
use crate::state::AppState;

/// Routes mounted at `/claim-approvals`.
///
/// ```text
/// GET    /pending                   -> list_pending
/// GET    /mine                      -> list_mine
/// POST   /{id}/owner-decision       -> owner_decision
/// POST   /{id}/manager-decision     -> manager_decision
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pending", get(claims::list_pending))
        .route("/mine", get(claims::list_mine))
        .route("/{id}/owner-decision", post(claims::owner_decision))
        .route("/{id}/manager-decision", post(claims::manager_decision))
}

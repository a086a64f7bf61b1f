//! Route definitions for the `/admin` resource.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::{admin, bounty};
use crate::state::AppState;

/// Routes mounted at `/admin`.
///
/// All routes require the admin flag (enforced by handler extractors).
///
/// ```text
/// PUT    /ideas/{idea}                  -> override_idea
/// DELETE /ideas/{idea}                  -> delete_idea
/// POST   /ideas/{idea}/assign           -> assign_idea
/// POST   /ideas/{idea}/unclaim          -> unclaim_idea
/// POST   /ideas/{idea}/bounty/approve   -> approve_bounty
/// POST   /ideas/{idea}/bounty/deny      -> deny_bounty
///
/// POST   /skills                        -> create_skill
/// PUT    /skills/{skill}                -> rename_skill
/// DELETE /skills/{skill}                -> delete_skill
/// POST   /teams                         -> create_team
/// PUT    /users/{email}                 -> upsert_profile
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/ideas/{idea}",
            put(admin::override_idea).delete(admin::delete_idea),
        )
        .route("/ideas/{idea}/assign", post(admin::assign_idea))
        .route("/ideas/{idea}/unclaim", post(admin::unclaim_idea))
        .route("/ideas/{idea}/bounty/approve", post(bounty::approve_bounty))
        .route("/ideas/{idea}/bounty/deny", post(bounty::deny_bounty))
        .route("/skills", post(admin::create_skill))
        .route(
            "/skills/{skill}",
            put(admin::rename_skill).delete(admin::delete_skill),
        )
        .route("/teams", post(admin::create_team))
        .route("/users/{email}", put(admin::upsert_profile))
}

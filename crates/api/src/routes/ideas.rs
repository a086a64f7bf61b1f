//! Route definitions for the `/ideas` resource.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{bounty, claims, ideas, lifecycle};
use crate::state::AppState;

/// Routes mounted at `/ideas`.
///
/// ```text
/// GET    /                          -> list_ideas
/// POST   /                          -> submit_idea
/// GET    /mine                      -> my_ideas
/// GET    /{idea}                    -> get_idea
/// POST   /{idea}/claim-requests     -> request_claim
/// PUT    /{idea}/sub-status         -> update_sub_status
/// PUT    /{idea}/bounty             -> upsert_bounty
///
/// GET    /{idea}/comments           -> list_comments
/// POST   /{idea}/comments           -> add_comment
/// GET    /{idea}/external-links     -> list_external_links
/// POST   /{idea}/external-links     -> add_external_link
/// GET    /{idea}/activities         -> list_activities
/// GET    /{idea}/stage-data         -> list_stage_data
/// GET    /{idea}/status-history     -> list_status_history
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(ideas::list_ideas).post(ideas::submit_idea))
        .route("/mine", get(ideas::my_ideas))
        .route("/{idea}", get(ideas::get_idea))
        .route("/{idea}/claim-requests", post(claims::request_claim))
        .route("/{idea}/sub-status", put(lifecycle::update_sub_status))
        .route("/{idea}/bounty", put(bounty::upsert_bounty))
        // Access-gated detail tabs
        .route(
            "/{idea}/comments",
            get(ideas::list_comments).post(ideas::add_comment),
        )
        .route(
            "/{idea}/external-links",
            get(ideas::list_external_links).post(ideas::add_external_link),
        )
        .route("/{idea}/activities", get(ideas::list_activities))
        .route("/{idea}/stage-data", get(ideas::list_stage_data))
        .route("/{idea}/status-history", get(ideas::list_status_history))
}

pub mod admin;
pub mod claim_approvals;
pub mod health;
pub mod ideas;
pub mod notification;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ideas                                           list (filter, sort), submit
/// /ideas/mine                                      my submitted/claimed ideas
/// /ideas/{idea}                                    get
/// /ideas/{idea}/claim-requests                     request claim (POST)
/// /ideas/{idea}/sub-status                         lifecycle transition (PUT)
/// /ideas/{idea}/bounty                             upsert bounty (PUT)
/// /ideas/{idea}/comments                           list, add (access-gated)
/// /ideas/{idea}/external-links                     list, add (access-gated)
/// /ideas/{idea}/activities                         list (access-gated)
/// /ideas/{idea}/stage-data                         list (access-gated)
/// /ideas/{idea}/status-history                     list (access-gated)
///
/// /claim-approvals/pending                         awaiting my decision
/// /claim-approvals/mine                            my requests
/// /claim-approvals/{id}/owner-decision             idea owner decides (POST)
/// /claim-approvals/{id}/manager-decision           claimer's manager decides (POST)
///
/// /notifications                                   feed
/// /notifications/unread-count                      badge count
/// /notifications/{id}/read                         mark one read (POST)
/// /notifications/read-all                          mark all read (POST)
///
/// /skills                                          skills catalogue
/// /teams                                           team list
/// /profile                                         my profile, update name/skills (PUT)
///
/// /stats                                           board counts and spending
/// /teams/{team}/stats                              team stats (admin or manager)
///
/// /admin/ideas/{idea}                              override, delete (admin only)
/// /admin/ideas/{idea}/assign                       direct assignment (POST)
/// /admin/ideas/{idea}/unclaim                      return to open (POST)
/// /admin/ideas/{idea}/bounty/approve               approve bounty (POST)
/// /admin/ideas/{idea}/bounty/deny                  deny bounty (POST)
/// /admin/skills                                    create skill (POST)
/// /admin/skills/{skill}                            rename, delete skill
/// /admin/teams                                     create team (POST)
/// /admin/users/{email}                             create or replace profile (PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/ideas", ideas::router())
        .nest("/claim-approvals", claim_approvals::router())
        .nest("/notifications", notification::router())
        // People.
        .route("/skills", get(handlers::people::list_skills))
        .route("/teams", get(handlers::people::list_teams))
        .route(
            "/profile",
            get(handlers::people::get_profile).put(handlers::people::update_profile),
        )
        // Dashboards.
        .route("/stats", get(handlers::analytics::board_stats))
        .route("/teams/{team}/stats", get(handlers::analytics::team_stats))
        // Privileged idea management.
        .nest("/admin", admin::router())
}

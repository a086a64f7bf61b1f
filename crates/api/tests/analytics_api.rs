//! HTTP-level tests for the board and team dashboards.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, create_profile, create_team, get_auth, post_json_auth, token_for};
use postboard_core::roles::UserRole;
use postboard_core::types::EntityId;
use sqlx::PgPool;

const SUBMITTER: &str = "jane.submitter@company.com";
const FINANCE_MANAGER: &str = "fiona.manager@company.com";
const DEV: &str = "david.dev@company.com";
const ADMIN: &str = "admin@company.com";

async fn submit(app: Router, body: serde_json::Value) -> String {
    let response = post_json_auth(app, "/api/v1/ideas", body, &token_for(SUBMITTER, false)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["uuid"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Three Finance ideas (one assigned to a Finance developer) and one for HR.
/// Bounties: Finance 30 (auto-approved) and 80 (pending), HR 20 (auto-approved).
async fn seed(pool: &PgPool, app: Router) -> EntityId {
    let finance = create_team(pool, "Finance").await;
    create_team(pool, "HR").await;
    create_profile(pool, SUBMITTER, UserRole::IdeaSubmitter, None, false).await;
    create_profile(pool, FINANCE_MANAGER, UserRole::Manager, Some(finance), false).await;
    create_profile(pool, DEV, UserRole::Developer, Some(finance), false).await;

    let bounty = |amount: f64| {
        serde_json::json!({ "is_monetary": true, "is_expensed": true, "amount": amount })
    };

    let first = submit(
        app.clone(),
        serde_json::json!({ "title": "Invoice Bot", "benefactor_team": "Finance", "bounty": bounty(30.0) }),
    )
    .await;
    submit(
        app.clone(),
        serde_json::json!({ "title": "Expense Scanner", "benefactor_team": "Finance", "bounty": bounty(80.0) }),
    )
    .await;
    submit(app.clone(), serde_json::json!({ "title": "Ledger Sync", "benefactor_team": "Finance" })).await;
    submit(
        app.clone(),
        serde_json::json!({ "title": "Onboarding Checklist", "benefactor_team": "HR", "bounty": bounty(20.0) }),
    )
    .await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/admin/ideas/{first}/assign"),
        serde_json::json!({ "assignee_email": DEV }),
        &token_for(ADMIN, true),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    finance
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_board_stats(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    seed(&pool, app.clone()).await;

    let stats = body_json(get_auth(app, "/api/v1/stats", &token_for(DEV, false)).await).await;
    let data = &stats["data"];
    assert_eq!(data["ideas"]["open"], 3);
    assert_eq!(data["ideas"]["claimed"], 1);
    assert_eq!(data["ideas"]["total"], 4);

    assert_eq!(data["spending"]["total_approved"], 50.0);
    assert_eq!(data["spending"]["approved_count"], 2);
    assert_eq!(data["spending"]["total_pending"], 80.0);
    assert_eq!(data["spending"]["pending_count"], 1);
    assert_eq!(data["spending"]["top_teams"][0]["team"], "Finance");
    assert_eq!(data["spending"]["top_teams"][0]["total"], 30.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_team_stats_for_manager(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let finance = seed(&pool, app.clone()).await;

    let response = get_auth(
        app,
        &format!("/api/v1/teams/{finance}/stats"),
        &token_for(FINANCE_MANAGER, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["team_name"], "Finance");
    assert_eq!(data["ideas"]["total"], 3);
    assert_eq!(data["ideas"]["claimed"], 1);
    // Fiona and David.
    assert_eq!(data["member_count"], 2);
    assert_eq!(data["active_claims"], 1);
    assert_eq!(data["spending"]["total_approved"], 30.0);
    assert_eq!(data["spending"]["total_pending"], 80.0);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_team_stats_access(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let finance = seed(&pool, app.clone()).await;
    let uri = format!("/api/v1/teams/{finance}/stats");

    let response = get_auth(app.clone(), &uri, &token_for(DEV, false)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = get_auth(app.clone(), &uri, &token_for(ADMIN, true)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get_auth(
        app,
        "/api/v1/teams/00000000-0000-0000-0000-000000000000/stats",
        &token_for(ADMIN, true),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

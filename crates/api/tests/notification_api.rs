//! HTTP-level tests for the notification feed and read state.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_profile, create_team, get_auth, post_auth, post_json_auth, token_for};
use postboard_core::roles::UserRole;
use sqlx::PgPool;

const SUBMITTER: &str = "jane.submitter@company.com";
const DEV: &str = "david.dev@company.com";
const MANAGER: &str = "bob.manager@company.com";

/// Two claim requests on Jane's ideas: Jane gets two `claim_request`
/// notifications and Bob two `claim_approval_required`.
async fn seed(pool: &PgPool, app: axum::Router) {
    let platform = create_team(pool, "Platform").await;
    create_profile(pool, SUBMITTER, UserRole::IdeaSubmitter, None, false).await;
    create_profile(pool, DEV, UserRole::Developer, Some(platform), false).await;
    create_profile(pool, MANAGER, UserRole::Manager, Some(platform), false).await;

    for title in ["Invoice Bot", "Expense Scanner"] {
        let response = post_json_auth(
            app.clone(),
            "/api/v1/ideas",
            serde_json::json!({ "title": title }),
            &token_for(SUBMITTER, false),
        )
        .await;
        let idea = body_json(response).await["data"]["uuid"]
            .as_str()
            .unwrap()
            .to_string();
        let response = post_auth(
            app.clone(),
            &format!("/api/v1/ideas/{idea}/claim-requests"),
            &token_for(DEV, false),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}

async fn unread(app: axum::Router, email: &str) -> i64 {
    let json = body_json(
        get_auth(app, "/api/v1/notifications/unread-count", &token_for(email, false)).await,
    )
    .await;
    json["data"]["count"].as_i64().unwrap()
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_mark_one_read(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    seed(&pool, app.clone()).await;
    assert_eq!(unread(app.clone(), SUBMITTER).await, 2);

    let feed = body_json(get_auth(app.clone(), "/api/v1/notifications", &token_for(SUBMITTER, false)).await).await;
    let first = feed["data"][0]["uuid"].as_str().unwrap().to_string();

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/notifications/{first}/read"),
        &token_for(SUBMITTER, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(unread(app.clone(), SUBMITTER).await, 1);

    // Marking again is harmless.
    let response = post_auth(
        app.clone(),
        &format!("/api/v1/notifications/{first}/read"),
        &token_for(SUBMITTER, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Recently read notifications stay in the feed, newest first.
    let feed = body_json(get_auth(app, "/api/v1/notifications", &token_for(SUBMITTER, false)).await).await;
    let entries = feed["data"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["uuid"], first.as_str());
    assert_eq!(entries[0]["is_read"], true);
    assert_eq!(entries[1]["is_read"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_cannot_mark_someone_elses_notification(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    seed(&pool, app.clone()).await;

    let feed = body_json(get_auth(app.clone(), "/api/v1/notifications", &token_for(MANAGER, false)).await).await;
    let managers = feed["data"][0]["uuid"].as_str().unwrap().to_string();

    let response = post_auth(
        app.clone(),
        &format!("/api/v1/notifications/{managers}/read"),
        &token_for(SUBMITTER, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(unread(app, MANAGER).await, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_mark_all_read(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    seed(&pool, app.clone()).await;

    let response = post_auth(app.clone(), "/api/v1/notifications/read-all", &token_for(MANAGER, false)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["count"], 2);

    assert_eq!(unread(app.clone(), MANAGER).await, 0);
    // Other inboxes are untouched.
    assert_eq!(unread(app, SUBMITTER).await, 2);
}

//! HTTP-level tests for idea submission and the access-gated detail tabs.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{
    body_json, create_profile, create_team, get_auth, post_json_auth, post_raw_auth, token_for,
};
use postboard_core::roles::UserRole;
use sqlx::PgPool;

const SUBMITTER: &str = "jane.submitter@company.com";
const SUBMITTER_MANAGER: &str = "sam.manager@company.com";
const OUTSIDER: &str = "eve.dev@company.com";

async fn seed(pool: &PgPool, app: Router) -> String {
    let sales = create_team(pool, "Sales").await;
    create_profile(pool, SUBMITTER, UserRole::IdeaSubmitter, Some(sales), false).await;
    create_profile(pool, SUBMITTER_MANAGER, UserRole::Manager, Some(sales), false).await;
    create_profile(pool, OUTSIDER, UserRole::Developer, None, false).await;

    let response = post_json_auth(
        app,
        "/api/v1/ideas",
        serde_json::json!({ "title": "Lead Router", "size": "medium" }),
        &token_for(SUBMITTER, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["data"]["uuid"]
        .as_str()
        .unwrap()
        .to_string()
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_submitted_idea_is_open_and_listed(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let idea = seed(&pool, app.clone()).await;

    let list = body_json(
        get_auth(app.clone(), "/api/v1/ideas?status=open", &token_for(OUTSIDER, false)).await,
    )
    .await;
    let items = list["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["uuid"], idea.as_str());
    assert_eq!(items[0]["status_id"], 1);
    assert_eq!(items[0]["size"], "medium");

    let claimed = body_json(
        get_auth(app, "/api/v1/ideas?status=claimed", &token_for(OUTSIDER, false)).await,
    )
    .await;
    assert!(claimed["data"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_invalid_submission_rejected(pool: PgPool) {
    create_profile(&pool, SUBMITTER, UserRole::IdeaSubmitter, None, false).await;
    let app = common::build_test_app(pool.clone());
    let token = token_for(SUBMITTER, false);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/ideas",
        serde_json::json!({ "title": "   " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    // Unknown enum values and broken JSON never reach the service.
    for body in [
        r#"{ "title": "Lead Router", "priority": "urgent" }"#,
        r#"{ "title": "Lead Router", "size": "huge" }"#,
        r#"{ "title": "Lead Router", "#,
    ] {
        let response = post_raw_auth(app.clone(), "/api/v1/ideas", body, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["code"], "BAD_REQUEST");
        assert!(json["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ideas")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_comments_visible_to_submitter_and_their_manager(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let idea = seed(&pool, app.clone()).await;
    let uri = format!("/api/v1/ideas/{idea}/comments");

    let response = post_json_auth(
        app.clone(),
        &uri,
        serde_json::json!({ "content": "  Needs CRM access  " }),
        &token_for(SUBMITTER, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["content"], "Needs CRM access");

    let response = get_auth(app.clone(), &uri, &token_for(SUBMITTER_MANAGER, false)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);

    let response = get_auth(app.clone(), &uri, &token_for(OUTSIDER, false)).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admins see everything.
    let response = get_auth(app.clone(), &uri, &token_for("admin@company.com", true)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let activities = body_json(
        get_auth(app, &format!("/api/v1/ideas/{idea}/activities"), &token_for(SUBMITTER, false)).await,
    )
    .await;
    let kinds: Vec<&str> = activities["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["activity_type"].as_str().unwrap())
        .collect();
    // Newest first.
    assert_eq!(kinds, vec!["comment_added", "created"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_outsider_cannot_post_comment(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let idea = seed(&pool, app.clone()).await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/ideas/{idea}/comments"),
        serde_json::json!({ "content": "Let me in" }),
        &token_for(OUTSIDER, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_external_links(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let idea = seed(&pool, app.clone()).await;
    let uri = format!("/api/v1/ideas/{idea}/external-links");

    let response = post_json_auth(
        app.clone(),
        &uri,
        serde_json::json!({
            "link_type": "pull_request",
            "title": "Initial PR",
            "url": "https://git.example.com/lead-router/pull/1"
        }),
        &token_for(SUBMITTER, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["link_type"], "pull_request");

    let response = post_json_auth(
        app.clone(),
        &uri,
        serde_json::json!({ "link_type": "other", "title": "Notes", "url": "ftp://files.local/x" }),
        &token_for(SUBMITTER, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let links = body_json(get_auth(app.clone(), &uri, &token_for(SUBMITTER, false)).await).await;
    assert_eq!(links["data"].as_array().unwrap().len(), 1);

    let activities = body_json(
        get_auth(app, &format!("/api/v1/ideas/{idea}/activities"), &token_for(SUBMITTER, false)).await,
    )
    .await;
    assert_eq!(activities["data"][0]["description"], "added a pull request");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_unknown_idea_returns_404(pool: PgPool) {
    create_profile(&pool, SUBMITTER, UserRole::IdeaSubmitter, None, false).await;
    let app = common::build_test_app(pool);

    let response = get_auth(
        app,
        "/api/v1/ideas/00000000-0000-0000-0000-000000000000",
        &token_for(SUBMITTER, false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

//! HTTP-level tests for development-stage transitions.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{
    body_json, create_profile, create_team, get_auth, post_json_auth, put_json_auth, token_for,
};
use postboard_core::roles::UserRole;
use sqlx::PgPool;

const SUBMITTER: &str = "jane.submitter@company.com";
const DEV: &str = "david.dev@company.com";
const FINANCE_MANAGER: &str = "fiona.manager@company.com";
const ADMIN: &str = "admin@company.com";

/// Seed people and return an idea (benefactor: Finance) assigned to David.
async fn claimed_idea(pool: &PgPool, app: Router) -> String {
    let finance = create_team(pool, "Finance").await;
    create_profile(pool, SUBMITTER, UserRole::IdeaSubmitter, Some(finance), false).await;
    create_profile(pool, DEV, UserRole::Developer, None, false).await;
    create_profile(pool, FINANCE_MANAGER, UserRole::Manager, Some(finance), false).await;

    let response = post_json_auth(
        app.clone(),
        "/api/v1/ideas",
        serde_json::json!({ "title": "Invoice Bot", "benefactor_team": "Finance" }),
        &token_for(SUBMITTER, false),
    )
    .await;
    let idea = body_json(response).await["data"]["uuid"]
        .as_str()
        .unwrap()
        .to_string();

    let response = post_json_auth(
        app,
        &format!("/api/v1/admin/ideas/{idea}/assign"),
        serde_json::json!({ "assignee_email": DEV }),
        &token_for(ADMIN, true),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    idea
}

async fn transition(
    app: Router,
    idea: &str,
    email: &str,
    body: serde_json::Value,
) -> axum::http::Response<axum::body::Body> {
    put_json_auth(
        app,
        &format!("/api/v1/ideas/{idea}/sub-status"),
        body,
        &token_for(email, false),
    )
    .await
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_claimer_moves_stage_with_stage_data(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let idea = claimed_idea(&pool, app.clone()).await;

    let response = transition(
        app.clone(),
        &idea,
        DEV,
        serde_json::json!({
            "sub_status": "in_development",
            "comment": "Started the build",
            "stage_data": { "repository_url": "https://git.example.com/invoice-bot" }
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["status_id"], 2);
    assert_eq!(updated["data"]["sub_status_id"], 2);
    assert_eq!(updated["data"]["progress_percentage"], 30);
    assert_eq!(updated["data"]["sub_status_updated_by"], DEV);

    let stage_data = body_json(
        get_auth(app.clone(), &format!("/api/v1/ideas/{idea}/stage-data"), &token_for(DEV, false)).await,
    )
    .await;
    let entries = stage_data["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["field_name"], "repository_url");
    assert_eq!(entries[0]["sub_status"], "in_development");

    // Assignment plus this transition.
    let history = body_json(
        get_auth(app.clone(), &format!("/api/v1/ideas/{idea}/status-history"), &token_for(DEV, false)).await,
    )
    .await;
    assert_eq!(history["data"].as_array().unwrap().len(), 2);

    let feed = body_json(get_auth(app, "/api/v1/notifications", &token_for(SUBMITTER, false)).await).await;
    let types: Vec<&str> = feed["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["type"].as_str().unwrap())
        .collect();
    assert!(types.contains(&"status_change"));
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_verified_completes_the_idea(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let idea = claimed_idea(&pool, app.clone()).await;

    let response = transition(app, &idea, DEV, serde_json::json!({ "sub_status": "verified" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["status_id"], 3);
    assert!(updated["data"]["sub_status_id"].is_null());
    assert_eq!(updated["data"]["progress_percentage"], 100);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_blocked_escalates_to_benefactor_manager(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let idea = claimed_idea(&pool, app.clone()).await;

    let response = transition(
        app.clone(),
        &idea,
        DEV,
        serde_json::json!({ "sub_status": "blocked", "blocked_reason": "Waiting on API keys" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["data"]["blocked_reason"], "Waiting on API keys");
    // Blocked keeps the previous progress.
    assert_eq!(updated["data"]["progress_percentage"], 10);

    let feed = body_json(
        get_auth(app, "/api/v1/notifications", &token_for(FINANCE_MANAGER, false)).await,
    )
    .await;
    let entries = feed["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["title"], "Attention Needed: Blocked");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_rolled_back_escalates_to_benefactor_manager(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let idea = claimed_idea(&pool, app.clone()).await;

    let response = transition(app.clone(), &idea, DEV, serde_json::json!({ "sub_status": "deployed" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = transition(app.clone(), &idea, DEV, serde_json::json!({ "sub_status": "rolled_back" })).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["progress_percentage"], 85);

    let feed = body_json(
        get_auth(app, "/api/v1/notifications", &token_for(FINANCE_MANAGER, false)).await,
    )
    .await;
    let entries = feed["data"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["title"], "Attention Needed: Rolled Back");
    assert_eq!(entries[0]["type"], "status_change");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_benefactor_manager_may_transition(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let idea = claimed_idea(&pool, app.clone()).await;

    let response = transition(
        app,
        &idea,
        FINANCE_MANAGER,
        serde_json::json!({ "sub_status": "on_hold", "blocked_reason": "Budget freeze" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_unrelated_user_cannot_transition(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let idea = claimed_idea(&pool, app.clone()).await;
    create_profile(&pool, "eve.dev@company.com", UserRole::Developer, None, false).await;

    let response = transition(
        app,
        &idea,
        "eve.dev@company.com",
        serde_json::json!({ "sub_status": "testing" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_field_from_another_stage_rejected(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let idea = claimed_idea(&pool, app.clone()).await;

    let response = transition(
        app.clone(),
        &idea,
        DEV,
        serde_json::json!({
            "sub_status": "testing",
            "stage_data": { "repository_url": "https://git.example.com/x" }
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    // Nothing was written.
    let detail = body_json(
        get_auth(app, &format!("/api/v1/ideas/{idea}"), &token_for(DEV, false)).await,
    )
    .await;
    assert_eq!(detail["data"]["sub_status_id"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires DATABASE_URL"]
async fn test_open_idea_has_no_stage(pool: PgPool) {
    create_profile(&pool, SUBMITTER, UserRole::IdeaSubmitter, None, false).await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/v1/ideas",
        serde_json::json!({ "title": "Unclaimed" }),
        &token_for(SUBMITTER, false),
    )
    .await;
    let idea = body_json(response).await["data"]["uuid"]
        .as_str()
        .unwrap()
        .to_string();

    let response = put_json_auth(
        app,
        &format!("/api/v1/ideas/{idea}/sub-status"),
        serde_json::json!({ "sub_status": "testing" }),
        &token_for(ADMIN, true),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "INVALID_TRANSITION");
}

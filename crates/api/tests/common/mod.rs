#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use postboard_api::auth::jwt::{generate_access_token, JwtConfig};
use postboard_api::config::ServerConfig;
use postboard_api::router::build_app_router;
use postboard_api::state::AppState;
use postboard_core::roles::UserRole;
use postboard_core::types::EntityId;
use postboard_db::models::people::{CreateTeam, UpsertUserProfile, UserProfile};
use postboard_db::repositories::{SkillRepo, TeamRepo, UserRepo};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-secret-for-integration-tests".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the full application router, with email delivery disabled.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        mailer: None,
    };
    build_app_router(state, &config)
}

/// Bearer token for `email`, signed with the test secret.
pub fn token_for(email: &str, is_admin: bool) -> String {
    generate_access_token(email, is_admin, &test_config().jwt).expect("token generation")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_team(pool: &PgPool, name: &str) -> EntityId {
    let input = CreateTeam {
        name: name.to_string(),
        description: None,
        is_approved: true,
    };
    TeamRepo::create(pool, &input)
        .await
        .expect("team creation should succeed")
        .uuid
}

pub async fn create_profile(
    pool: &PgPool,
    email: &str,
    role: UserRole,
    team_uuid: Option<EntityId>,
    is_admin: bool,
) -> UserProfile {
    let managed_team_uuid = match role {
        UserRole::Manager => team_uuid,
        _ => None,
    };
    let name = email.split('@').next().unwrap_or(email).replace('.', " ");
    let mut tx = pool.begin().await.expect("begin");
    let profile = UserRepo::upsert(
        &mut tx,
        &UpsertUserProfile {
            email: email.to_string(),
            name,
            role: Some(role),
            team_uuid,
            managed_team_uuid,
            is_admin,
        },
    )
    .await
    .expect("profile creation should succeed");
    tx.commit().await.expect("commit");
    profile
}

/// Add a skill to the shared catalogue.
pub async fn create_skill(pool: &PgPool, name: &str) -> EntityId {
    SkillRepo::create(pool, name)
        .await
        .expect("skill creation should succeed")
        .uuid
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

/// Send an unauthenticated GET request.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Send a raw, possibly malformed, JSON body.
pub async fn post_raw_auth(app: Router, uri: &str, body: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use postboard_core::actor::ActorContext;
use postboard_core::error::CoreError;
use postboard_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller, resolved from a JWT Bearer token plus the caller's
/// `user_profiles` row.
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(actor = %auth.actor.email, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub actor: ActorContext,
    /// Display name from the profile, or the email when there is no profile.
    pub name: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        // A user without a profile has no role or team yet; they can read
        // their feed but every role-gated operation will refuse them.
        match UserRepo::find_by_email(&state.pool, &claims.sub).await? {
            Some(profile) => {
                let mut actor = profile.actor()?;
                actor.is_admin |= claims.is_admin;
                Ok(AuthUser {
                    actor,
                    name: profile.name,
                })
            }
            None => Ok(AuthUser {
                actor: ActorContext {
                    email: claims.sub.clone(),
                    role: None,
                    team_uuid: None,
                    managed_team_uuid: None,
                    is_admin: claims.is_admin,
                },
                name: claims.sub,
            }),
        }
    }
}

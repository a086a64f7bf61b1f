//! Request extractors.
//!
//! - [`auth::AuthUser`] -- Resolves the caller from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Requires the admin flag.
//! - [`extract::JsonBody`] / [`extract::QueryParams`] -- Input parsing with JSON errors.

pub mod auth;
pub mod extract;
pub mod rbac;

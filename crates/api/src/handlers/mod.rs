//! Request handlers.
//!
//! Handlers extract the caller and request body, delegate to
//! [`crate::services`], and wrap the result in the `{ "data": ... }` envelope.

pub mod admin;
pub mod analytics;
pub mod bounty;
pub mod claims;
pub mod ideas;
pub mod lifecycle;
pub mod notification;
pub mod people;

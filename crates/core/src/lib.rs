//! Domain rules of the posting board: claim approvals, the idea lifecycle,
//! bounty gating, notification wording and access policy.
//!
//! Nothing here touches the database. Engines take loaded facts plus an
//! [`actor::ActorContext`] and return decisions or plans.

#[macro_use]
mod macros;

pub mod access;
pub mod actor;
pub mod analytics;
pub mod bounty;
pub mod claim;
pub mod error;
pub mod idea;
pub mod lifecycle;
pub mod notification;
pub mod roles;
pub mod status;
pub mod types;

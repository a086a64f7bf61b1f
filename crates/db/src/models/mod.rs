//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, plus the `Deserialize` request DTOs that feed it.

pub mod analytics;
pub mod bounty;
pub mod claim;
pub mod history;
pub mod idea;
pub mod idea_detail;
pub mod notification;
pub mod people;

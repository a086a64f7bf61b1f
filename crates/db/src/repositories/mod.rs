//! Repository layer.
//!
//! Each repository is a zero-sized struct. Plain reads accept `&PgPool`;
//! writes and locking reads take the caller's transaction so every change
//! of one domain event commits together.

pub mod analytics_repo;
pub mod bounty_repo;
pub mod claim_repo;
pub mod idea_detail_repo;
pub mod idea_repo;
pub mod notification_repo;
pub mod skill_repo;
pub mod status_history_repo;
pub mod team_repo;
pub mod user_repo;

pub use analytics_repo::AnalyticsRepo;
pub use bounty_repo::BountyRepo;
pub use claim_repo::{ClaimApprovalRepo, ClaimRepo};
pub use idea_detail_repo::{ActivityRepo, CommentRepo, ExternalLinkRepo, StageDataRepo};
pub use idea_repo::{IdeaFilter, IdeaRepo, StageUpdate};
pub use notification_repo::NotificationRepo;
pub use skill_repo::SkillRepo;
pub use status_history_repo::StatusHistoryRepo;
pub use team_repo::TeamRepo;
pub use user_repo::UserRepo;

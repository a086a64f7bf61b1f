//! Outbound delivery of posting-board notifications.
//!
//! In-app notifications are written by the services inside their
//! transactions; this crate handles the optional email copy sent after the
//! commit:
//!
//! - [`delivery::email`]: SMTP transport and message rendering.
//! - [`dispatch`]: best-effort fan-out of a committed batch.

pub mod delivery;
pub mod dispatch;

pub use delivery::email::{EmailConfig, EmailDelivery, EmailError};
pub use dispatch::deliver_best_effort;

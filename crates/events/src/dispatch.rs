//! Best-effort email fan-out after a transaction has committed.

use postboard_core::notification::{NewNotification, ADMIN_INBOX};

use crate::delivery::email::EmailDelivery;

/// Email every notification in `batch`, logging and swallowing failures.
///
/// The synthetic admin inbox has no mailbox and is skipped. Returns the
/// number of emails sent.
pub async fn deliver_best_effort(mailer: Option<&EmailDelivery>, batch: &[NewNotification]) -> usize {
    let Some(mailer) = mailer else {
        return 0;
    };

    let mut sent = 0;
    for notification in batch {
        if notification.user_email.eq_ignore_ascii_case(ADMIN_INBOX) {
            continue;
        }
        match mailer.deliver(notification).await {
            Ok(()) => sent += 1,
            Err(e) => tracing::warn!(
                to = %notification.user_email,
                kind = %notification.kind,
                error = %e,
                "Notification email failed"
            ),
        }
    }
    sent
}

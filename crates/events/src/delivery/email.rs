//! Email notification delivery via SMTP.
//!
//! [`EmailDelivery`] wraps the `lettre` async SMTP transport to send a
//! plain-text copy of an in-app notification. Configuration is loaded from
//! environment variables; if `SMTP_HOST` is not set, [`EmailConfig::from_env`]
//! returns `None` and no mailer should be constructed.

use postboard_core::notification::NewNotification;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for email delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}

// ---------------------------------------------------------------------------
// EmailConfig
// ---------------------------------------------------------------------------

/// Default SMTP port (STARTTLS).
const DEFAULT_SMTP_PORT: u16 = 587;

/// Default sender address when `SMTP_FROM` is not set.
const DEFAULT_FROM_ADDRESS: &str = "noreply@postboard.local";

/// Prefix on every subject line.
const SUBJECT_PREFIX: &str = "[Posting Board]";

/// Configuration for the SMTP email delivery service.
#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    /// Defaults to 587.
    pub smtp_port: u16,
    /// RFC 5322 "From" address.
    pub from_address: String,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    /// Base URL of the web UI, used to link back to the idea.
    pub app_base_url: Option<String>,
}

impl EmailConfig {
    /// Load configuration from environment variables.
    ///
    /// Returns `None` if `SMTP_HOST` is not set, signalling that email
    /// delivery is not configured and should be skipped.
    ///
    /// | Variable        | Required | Default                    |
    /// |-----------------|----------|----------------------------|
    /// | `SMTP_HOST`     | yes      | -                          |
    /// | `SMTP_PORT`     | no       | `587`                      |
    /// | `SMTP_FROM`     | no       | `noreply@postboard.local`  |
    /// | `SMTP_USER`     | no       | -                          |
    /// | `SMTP_PASSWORD` | no       | -                          |
    /// | `APP_BASE_URL`  | no       | -                          |
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        Some(Self {
            smtp_host,
            smtp_port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_SMTP_PORT),
            from_address: std::env::var("SMTP_FROM")
                .unwrap_or_else(|_| DEFAULT_FROM_ADDRESS.to_string()),
            smtp_user: std::env::var("SMTP_USER").ok(),
            smtp_password: std::env::var("SMTP_PASSWORD").ok(),
            app_base_url: std::env::var("APP_BASE_URL").ok(),
        })
    }
}

/// Subject and plain-text body for a notification email.
pub fn render(notification: &NewNotification, app_base_url: Option<&str>) -> (String, String) {
    let subject = format!("{SUBJECT_PREFIX} {}", notification.title);
    let mut body = notification.message.clone();
    if let (Some(base), Some(idea)) = (app_base_url, notification.idea_uuid) {
        body.push_str(&format!(
            "\n\nView the idea: {}/ideas/{idea}",
            base.trim_end_matches('/')
        ));
    }
    (subject, body)
}

// ---------------------------------------------------------------------------
// EmailDelivery
// ---------------------------------------------------------------------------

/// Sends notification emails via SMTP.
pub struct EmailDelivery {
    config: EmailConfig,
}

impl EmailDelivery {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    /// Send the email copy of `notification` to its recipient.
    pub async fn deliver(&self, notification: &NewNotification) -> Result<(), EmailError> {
        use lettre::{
            message::header::ContentType, transport::smtp::authentication::Credentials,
            AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
        };

        let (subject, body) = render(notification, self.config.app_base_url.as_deref());

        let email = Message::builder()
            .from(self.config.from_address.parse()?)
            .to(notification.user_email.parse()?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        let mut transport_builder =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port);

        if let (Some(user), Some(pass)) = (&self.config.smtp_user, &self.config.smtp_password) {
            transport_builder =
                transport_builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }

        let mailer = transport_builder.build();
        mailer.send(email).await?;

        tracing::info!(
            to = %notification.user_email,
            kind = %notification.kind,
            "Notification email sent"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use postboard_core::notification::{IdeaRef, NotificationKind};
    use uuid::Uuid;

    #[test]
    fn from_env_returns_none_without_smtp_host() {
        std::env::remove_var("SMTP_HOST");
        assert!(EmailConfig::from_env().is_none());
    }

    #[test]
    fn render_prefixes_subject_and_links_idea() {
        let idea = Uuid::new_v4();
        let n = postboard_core::notification::claim_approved_for_claimer(
            "david.dev@company.com",
            IdeaRef {
                uuid: idea,
                title: "Invoice Bot",
            },
        );
        let (subject, body) = render(&n, Some("https://board.example.com/"));
        assert_eq!(subject, "[Posting Board] Claim Request Approved");
        assert!(body.starts_with("Your claim request for 'Invoice Bot' has been approved"));
        assert!(body.ends_with(&format!("https://board.example.com/ideas/{idea}")));
    }

    #[test]
    fn render_without_base_url_is_message_only() {
        let n = NewNotification::new(
            "jane@company.com",
            NotificationKind::StatusChange,
            "Status Update: Testing",
            "'Invoice Bot' is now in testing",
        );
        let (_, body) = render(&n, None);
        assert_eq!(body, "'Invoice Bot' is now in testing");
    }

    #[test]
    fn email_error_display_address() {
        let addr_err: Result<lettre::Address, _> = "not-an-email".parse();
        let err = EmailError::Address(addr_err.unwrap_err());
        assert!(err.to_string().contains("Email address parse error"));
    }
}

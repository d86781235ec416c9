//! Outbound notification sending
//!
//! The contact flow depends on the `NotificationSender` capability
//! rather than constructing a mailer inline, so delivery can be
//! swapped (SMTP, disabled, test double) without touching the flow.

use crate::config::MailConfig;
use async_trait::async_trait;
use lettre::{
    message::header::ContentType,
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// A contact notification to be delivered to the site owner
#[derive(Debug, Clone)]
pub struct ContactNotification {
    /// Submitter name, used in the subject line
    pub name: String,
    /// Submitter email, set as the reply-to address
    pub email: String,
    /// Submitter phone, appended to the body
    pub phone: String,
    /// Message body
    pub message: String,
}

/// Error type for notification delivery
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Invalid notification address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build notification: {0}")]
    Build(String),

    #[error("Notification transport failed: {0}")]
    Transport(String),
}

/// Capability for delivering contact notifications
#[async_trait]
pub trait NotificationSender: Send + Sync {
    async fn send(&self, notification: &ContactNotification) -> Result<(), NotifyError>;
}

/// SMTP-backed notification sender
pub struct SmtpNotificationSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: String,
    mailbox: String,
}

impl SmtpNotificationSender {
    /// Build an SMTP sender from mail configuration
    pub fn new(config: &MailConfig) -> Result<Self, NotifyError> {
        let creds = Credentials::new(config.username.clone(), config.password.clone());

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
            .map_err(|e| NotifyError::Transport(format!("Failed to create SMTP transport: {}", e)))?
            .credentials(creds)
            .port(config.smtp_port)
            .build();

        Ok(Self {
            mailer,
            from: config.username.clone(),
            mailbox: config.mailbox.clone(),
        })
    }
}

#[async_trait]
impl NotificationSender for SmtpNotificationSender {
    async fn send(&self, notification: &ContactNotification) -> Result<(), NotifyError> {
        let email = Message::builder()
            .from(self
                .from
                .parse()
                .map_err(|e| NotifyError::InvalidAddress(format!("from address: {}", e)))?)
            .reply_to(notification
                .email
                .parse()
                .map_err(|e| NotifyError::InvalidAddress(format!("reply-to address: {}", e)))?)
            .to(self
                .mailbox
                .parse()
                .map_err(|e| NotifyError::InvalidAddress(format!("to address: {}", e)))?)
            .subject(format!("New message from {}", notification.name))
            .header(ContentType::TEXT_PLAIN)
            .body(format!("{}\n{}", notification.message, notification.phone))
            .map_err(|e| NotifyError::Build(e.to_string()))?;

        self.mailer
            .send(email)
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        Ok(())
    }
}

/// Sender used when mail is disabled in configuration.
///
/// Accepts every notification and only logs it, so the contact flow
/// behaves identically with and without a configured relay.
pub struct DisabledSender;

#[async_trait]
impl NotificationSender for DisabledSender {
    async fn send(&self, notification: &ContactNotification) -> Result<(), NotifyError> {
        tracing::info!(
            "Mail disabled; dropping contact notification from {} <{}>",
            notification.name,
            notification.email
        );
        Ok(())
    }
}

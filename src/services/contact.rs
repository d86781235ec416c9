//! Contact service
//!
//! Implements the contact flow: persist the submission first, then
//! notify the site owner. The database commit and the notification are
//! deliberately independent: a failed or slow mail leg never rolls
//! back the stored message, it only downgrades the receipt.

use crate::db::repositories::ContactRepository;
use crate::models::ContactInput;
use crate::services::notify::{ContactNotification, NotificationSender};
use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;

/// Error types for contact submissions
#[derive(Debug, thiserror::Error)]
pub enum ContactServiceError {
    /// This email address has already submitted a message
    #[error("A message from {0} was already submitted")]
    DuplicateEmail(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Outcome of a successful submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactReceipt {
    /// Identifier of the stored message
    pub message_id: i64,
    /// Whether the notification reached the mail transport in time
    pub mail_delivered: bool,
}

/// Contact service for the public contact form
pub struct ContactService {
    repo: Arc<dyn ContactRepository>,
    notifier: Arc<dyn NotificationSender>,
    send_timeout: Duration,
}

impl ContactService {
    /// Create a new contact service
    ///
    /// # Arguments
    /// * `repo` - Contact message repository
    /// * `notifier` - Injected notification capability
    /// * `send_timeout` - Upper bound on a single notification send
    pub fn new(
        repo: Arc<dyn ContactRepository>,
        notifier: Arc<dyn NotificationSender>,
        send_timeout: Duration,
    ) -> Self {
        Self {
            repo,
            notifier,
            send_timeout,
        }
    }

    /// Handle a contact-form submission.
    ///
    /// The message is committed before the notification is attempted;
    /// a transport failure or timeout is reported through the receipt
    /// (`mail_delivered == false`) rather than as an error.
    ///
    /// # Errors
    /// - `ValidationError` if the email or message is empty
    /// - `DuplicateEmail` if this address already submitted
    pub async fn submit(&self, input: ContactInput) -> Result<ContactReceipt, ContactServiceError> {
        if input.email.trim().is_empty() {
            return Err(ContactServiceError::ValidationError(
                "Email cannot be empty".to_string(),
            ));
        }
        if input.message.trim().is_empty() {
            return Err(ContactServiceError::ValidationError(
                "Message cannot be empty".to_string(),
            ));
        }

        if self
            .repo
            .exists_by_email(&input.email)
            .await
            .context("Failed to check for earlier submission")?
        {
            return Err(ContactServiceError::DuplicateEmail(input.email));
        }

        let stored = self
            .repo
            .create(&input)
            .await
            .context("Failed to store contact message")?;

        let notification = ContactNotification {
            name: stored.name.clone(),
            email: stored.email.clone(),
            phone: stored.phone.clone(),
            message: stored.message.clone(),
        };

        let mail_delivered =
            match tokio::time::timeout(self.send_timeout, self.notifier.send(&notification)).await
            {
                Ok(Ok(())) => true,
                Ok(Err(e)) => {
                    tracing::warn!("Contact notification failed: {}", e);
                    false
                }
                Err(_) => {
                    tracing::warn!(
                        "Contact notification timed out after {:?}",
                        self.send_timeout
                    );
                    false
                }
            };

        Ok(ContactReceipt {
            message_id: stored.id,
            mail_delivered,
        })
    }
}

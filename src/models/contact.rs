//! Contact message model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A contact-form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    /// Unique identifier
    pub id: i64,
    /// Sender name
    pub name: String,
    /// Sender email, unique across all submissions
    pub email: String,
    /// Sender phone
    pub phone: String,
    /// Message body
    pub message: String,
    /// When the submission was stored
    pub submitted_at: DateTime<Utc>,
}

/// Input for a contact-form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactInput {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

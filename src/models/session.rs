//! Admin session model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Session entity for admin authentication.
///
/// The stored username is checked against the configured admin username
/// on every validation, so a stale session cannot outlive a credential
/// change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminSession {
    /// Session token
    pub token: String,
    /// Username the session was issued for
    pub username: String,
    /// Expiration timestamp
    pub expires_at: DateTime<Utc>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl AdminSession {
    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

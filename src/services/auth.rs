//! Admin authentication service
//!
//! Implements the session/auth gate for the single configured admin:
//! - Login by exact credential match against configuration
//! - Session token issuing and validation
//! - Logout and expired-session sweeping
//!
//! There is no user table: the one privileged principal lives in the
//! admin section of the configuration, and a session is valid only
//! while its stored username still equals the configured one.

use crate::config::AdminConfig;
use crate::db::repositories::SessionRepository;
use crate::models::AdminSession;
use anyhow::Context;
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Error types for admin authentication
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Credentials did not match the configured admin
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Admin authentication service
pub struct AdminAuthService {
    admin: AdminConfig,
    sessions: Arc<dyn SessionRepository>,
}

impl AdminAuthService {
    /// Create a new auth service for the configured admin
    pub fn new(admin: AdminConfig, sessions: Arc<dyn SessionRepository>) -> Self {
        Self { admin, sessions }
    }

    /// Log in with the submitted credentials.
    ///
    /// Success requires exact equality with the configured username and
    /// password. An empty configured password never matches, so login
    /// stays closed until one is set.
    pub async fn login(&self, username: &str, password: &str) -> Result<AdminSession, AuthError> {
        if self.admin.password.is_empty()
            || username != self.admin.username
            || password != self.admin.password
        {
            tracing::warn!("Failed admin login attempt for '{}'", username);
            return Err(AuthError::InvalidCredentials);
        }

        let now = Utc::now();
        let session = AdminSession {
            token: Uuid::new_v4().to_string(),
            username: username.to_string(),
            expires_at: now + Duration::hours(self.admin.session_ttl_hours),
            created_at: now,
        };

        let session = self
            .sessions
            .create(&session)
            .await
            .context("Failed to create session")?;

        tracing::info!("Admin '{}' logged in", username);
        Ok(session)
    }

    /// Validate a session token.
    ///
    /// Returns the admin username when the session exists, has not
    /// expired, and was issued for the currently configured admin.
    /// Expired sessions are deleted on sight.
    pub async fn validate(&self, token: &str) -> Result<Option<String>, AuthError> {
        let session = self
            .sessions
            .get_by_token(token)
            .await
            .context("Failed to look up session")?;

        let Some(session) = session else {
            return Ok(None);
        };

        if session.is_expired() {
            self.sessions
                .delete(&session.token)
                .await
                .context("Failed to delete expired session")?;
            return Ok(None);
        }

        if session.username != self.admin.username {
            return Ok(None);
        }

        Ok(Some(session.username))
    }

    /// Delete the session for a token. Unknown tokens are a no-op.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        self.sessions
            .delete(token)
            .await
            .context("Failed to delete session")?;
        Ok(())
    }

    /// Remove expired sessions, returning how many were swept
    pub async fn sweep_expired(&self) -> Result<i64, AuthError> {
        Ok(self
            .sessions
            .delete_expired()
            .await
            .context("Failed to sweep expired sessions")?)
    }
}

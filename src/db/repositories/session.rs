//! Session repository
//!
//! Database operations for admin sessions.
//!
//! This module provides:
//! - `SessionRepository` trait defining the interface for session data access
//! - `SqlxSessionRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::AdminSession;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Session repository trait
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Create a new session
    async fn create(&self, session: &AdminSession) -> Result<AdminSession>;

    /// Get session by token
    async fn get_by_token(&self, token: &str) -> Result<Option<AdminSession>>;

    /// Delete a session. Absent tokens are a no-op.
    async fn delete(&self, token: &str) -> Result<()>;

    /// Delete expired sessions, returning how many were removed
    async fn delete_expired(&self) -> Result<i64>;
}

/// SQLx-based session repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxSessionRepository {
    pool: DynDatabasePool,
}

impl SqlxSessionRepository {
    /// Create a new SQLx session repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn SessionRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl SessionRepository for SqlxSessionRepository {
    async fn create(&self, session: &AdminSession) -> Result<AdminSession> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_session_sqlite(self.pool.as_sqlite().unwrap(), session).await
            }
            DatabaseDriver::Mysql => {
                create_session_mysql(self.pool.as_mysql().unwrap(), session).await
            }
        }
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<AdminSession>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_session_by_token_sqlite(self.pool.as_sqlite().unwrap(), token).await
            }
            DatabaseDriver::Mysql => {
                get_session_by_token_mysql(self.pool.as_mysql().unwrap(), token).await
            }
        }
    }

    async fn delete(&self, token: &str) -> Result<()> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_session_sqlite(self.pool.as_sqlite().unwrap(), token).await
            }
            DatabaseDriver::Mysql => {
                delete_session_mysql(self.pool.as_mysql().unwrap(), token).await
            }
        }
    }

    async fn delete_expired(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                delete_expired_sessions_sqlite(self.pool.as_sqlite().unwrap()).await
            }
            DatabaseDriver::Mysql => {
                delete_expired_sessions_mysql(self.pool.as_mysql().unwrap()).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_session_sqlite(pool: &SqlitePool, session: &AdminSession) -> Result<AdminSession> {
    sqlx::query(
        r#"
        INSERT INTO sessions (token, username, expires_at, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&session.token)
    .bind(&session.username)
    .bind(session.expires_at)
    .bind(session.created_at)
    .execute(pool)
    .await
    .context("Failed to create session")?;

    Ok(session.clone())
}

async fn get_session_by_token_sqlite(
    pool: &SqlitePool,
    token: &str,
) -> Result<Option<AdminSession>> {
    let row = sqlx::query(
        r#"
        SELECT token, username, expires_at, created_at
        FROM sessions
        WHERE token = ?
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await
    .context("Failed to get session by token")?;

    match row {
        Some(row) => Ok(Some(row_to_session_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn delete_session_sqlite(pool: &SqlitePool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await
        .context("Failed to delete session")?;

    Ok(())
}

async fn delete_expired_sessions_sqlite(pool: &SqlitePool) -> Result<i64> {
    let now = Utc::now();
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to delete expired sessions")?;

    Ok(result.rows_affected() as i64)
}

fn row_to_session_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<AdminSession> {
    Ok(AdminSession {
        token: row.get("token"),
        username: row.get("username"),
        expires_at: row.get("expires_at"),
        created_at: row.get("created_at"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_session_mysql(pool: &MySqlPool, session: &AdminSession) -> Result<AdminSession> {
    sqlx::query(
        r#"
        INSERT INTO sessions (token, username, expires_at, created_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&session.token)
    .bind(&session.username)
    .bind(session.expires_at)
    .bind(session.created_at)
    .execute(pool)
    .await
    .context("Failed to create session")?;

    Ok(session.clone())
}

async fn get_session_by_token_mysql(
    pool: &MySqlPool,
    token: &str,
) -> Result<Option<AdminSession>> {
    let row = sqlx::query(
        r#"
        SELECT token, username, expires_at, created_at
        FROM sessions
        WHERE token = ?
        "#,
    )
    .bind(token)
    .fetch_optional(pool)
    .await
    .context("Failed to get session by token")?;

    match row {
        Some(row) => Ok(Some(row_to_session_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn delete_session_mysql(pool: &MySqlPool, token: &str) -> Result<()> {
    sqlx::query("DELETE FROM sessions WHERE token = ?")
        .bind(token)
        .execute(pool)
        .await
        .context("Failed to delete session")?;

    Ok(())
}

async fn delete_expired_sessions_mysql(pool: &MySqlPool) -> Result<i64> {
    let now = Utc::now();
    let result = sqlx::query("DELETE FROM sessions WHERE expires_at < ?")
        .bind(now)
        .execute(pool)
        .await
        .context("Failed to delete expired sessions")?;

    Ok(result.rows_affected() as i64)
}

fn row_to_session_mysql(row: &sqlx::mysql::MySqlRow) -> Result<AdminSession> {
    let expires_at: DateTime<Utc> = row.get("expires_at");
    let created_at: DateTime<Utc> = row.get("created_at");

    Ok(AdminSession {
        token: row.get("token"),
        username: row.get("username"),
        expires_at,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use chrono::Duration;
    use uuid::Uuid;

    async fn setup_test_repo() -> SqlxSessionRepository {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        SqlxSessionRepository::new(pool)
    }

    fn create_test_session(username: &str, expires_in_hours: i64) -> AdminSession {
        let now = Utc::now();
        AdminSession {
            token: Uuid::new_v4().to_string(),
            username: username.to_string(),
            expires_at: now + Duration::hours(expires_in_hours),
            created_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_session() {
        let repo = setup_test_repo().await;

        let session = create_test_session("admin", 24);
        let created = repo.create(&session).await.expect("Failed to create session");

        assert_eq!(created.token, session.token);
        assert_eq!(created.username, "admin");
    }

    #[tokio::test]
    async fn test_get_session_by_token() {
        let repo = setup_test_repo().await;

        let session = create_test_session("admin", 24);
        repo.create(&session).await.expect("Failed to create session");

        let found = repo
            .get_by_token(&session.token)
            .await
            .expect("Failed to get session")
            .expect("Session not found");

        assert_eq!(found.token, session.token);
        assert_eq!(found.username, "admin");
    }

    #[tokio::test]
    async fn test_get_session_by_token_not_found() {
        let repo = setup_test_repo().await;

        let found = repo
            .get_by_token("nonexistent-session-token")
            .await
            .expect("Failed to get session");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_delete_session() {
        let repo = setup_test_repo().await;

        let session = create_test_session("admin", 24);
        repo.create(&session).await.expect("Failed to create session");

        repo.delete(&session.token)
            .await
            .expect("Failed to delete session");

        let found = repo
            .get_by_token(&session.token)
            .await
            .expect("Failed to get session");
        assert!(found.is_none());

        // Deleting an absent token is a no-op
        repo.delete(&session.token)
            .await
            .expect("Deleting absent session should not fail");
    }

    #[tokio::test]
    async fn test_delete_expired_sessions() {
        let repo = setup_test_repo().await;

        let now = Utc::now();
        let expired_session = AdminSession {
            token: Uuid::new_v4().to_string(),
            username: "admin".to_string(),
            expires_at: now - Duration::hours(1),
            created_at: now - Duration::hours(25),
        };
        let valid_session = create_test_session("admin", 24);

        repo.create(&expired_session)
            .await
            .expect("Failed to create expired session");
        repo.create(&valid_session)
            .await
            .expect("Failed to create valid session");

        let deleted_count = repo
            .delete_expired()
            .await
            .expect("Failed to delete expired sessions");

        assert_eq!(deleted_count, 1);
        assert!(repo.get_by_token(&expired_session.token).await.unwrap().is_none());
        assert!(repo.get_by_token(&valid_session.token).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_session_expiration_check() {
        let now = Utc::now();

        let expired_session = AdminSession {
            token: "expired".to_string(),
            username: "admin".to_string(),
            expires_at: now - Duration::hours(1),
            created_at: now - Duration::hours(25),
        };

        let valid_session = AdminSession {
            token: "valid".to_string(),
            username: "admin".to_string(),
            expires_at: now + Duration::hours(1),
            created_at: now,
        };

        assert!(expired_session.is_expired());
        assert!(!valid_session.is_expired());
    }
}

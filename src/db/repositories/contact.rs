//! Contact message repository
//!
//! Database operations for contact-form submissions. Messages are only
//! ever written by the contact flow; nothing in the application reads
//! them back except the duplicate-email check.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{ContactInput, ContactMessage};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Contact message repository trait
#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Store a new contact message with the current timestamp
    async fn create(&self, input: &ContactInput) -> Result<ContactMessage>;

    /// Check whether a message from this email address already exists
    async fn exists_by_email(&self, email: &str) -> Result<bool>;

    /// Count stored messages
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based contact message repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxContactRepository {
    pool: DynDatabasePool,
}

impl SqlxContactRepository {
    /// Create a new SQLx contact repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn ContactRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl ContactRepository for SqlxContactRepository {
    async fn create(&self, input: &ContactInput) -> Result<ContactMessage> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                create_message_sqlite(self.pool.as_sqlite().unwrap(), input).await
            }
            DatabaseDriver::Mysql => {
                create_message_mysql(self.pool.as_mysql().unwrap(), input).await
            }
        }
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                exists_by_email_sqlite(self.pool.as_sqlite().unwrap(), email).await
            }
            DatabaseDriver::Mysql => {
                exists_by_email_mysql(self.pool.as_mysql().unwrap(), email).await
            }
        }
    }

    async fn count(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_messages_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => count_messages_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_message_sqlite(pool: &SqlitePool, input: &ContactInput) -> Result<ContactMessage> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO contact_messages (name, email, phone, message, submitted_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(&input.message)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create contact message")?;

    Ok(ContactMessage {
        id: result.last_insert_rowid(),
        name: input.name.clone(),
        email: input.email.clone(),
        phone: input.phone.clone(),
        message: input.message.clone(),
        submitted_at: now,
    })
}

async fn exists_by_email_sqlite(pool: &SqlitePool, email: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM contact_messages WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await
        .context("Failed to check email existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

async fn count_messages_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM contact_messages")
        .fetch_one(pool)
        .await
        .context("Failed to count contact messages")?;

    Ok(row.get("count"))
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_message_mysql(pool: &MySqlPool, input: &ContactInput) -> Result<ContactMessage> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO contact_messages (name, email, phone, message, submitted_at)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(&input.message)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create contact message")?;

    Ok(ContactMessage {
        id: result.last_insert_id() as i64,
        name: input.name.clone(),
        email: input.email.clone(),
        phone: input.phone.clone(),
        message: input.message.clone(),
        submitted_at: now,
    })
}

async fn exists_by_email_mysql(pool: &MySqlPool, email: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM contact_messages WHERE email = ?")
        .bind(email)
        .fetch_one(pool)
        .await
        .context("Failed to check email existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

async fn count_messages_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM contact_messages")
        .fetch_one(pool)
        .await
        .context("Failed to count contact messages")?;

    Ok(row.get("count"))
}

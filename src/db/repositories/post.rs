//! Post repository
//!
//! Database operations for blog posts.
//!
//! This module provides:
//! - `PostRepository` trait defining the interface for post data access
//! - `SqlxPostRepository` implementing the trait for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{CreatePostInput, Post, UpdatePostInput};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;

/// Post repository trait
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Create a new post with a server-assigned publication timestamp
    async fn create(&self, input: &CreatePostInput) -> Result<Post>;

    /// Get post by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// Get post by slug
    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>>;

    /// List posts in insertion (primary-key) order with offset/limit
    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Post>>;

    /// List all posts in insertion order
    async fn list_all(&self) -> Result<Vec<Post>>;

    /// Count total posts
    async fn count(&self) -> Result<i64>;

    /// Overwrite every field of a post and refresh its timestamp.
    /// Returns `None` when no post has the given ID.
    async fn update(&self, id: i64, input: &UpdatePostInput) -> Result<Option<Post>>;

    /// Delete a post. Returns `false` when no post had the given ID.
    async fn delete(&self, id: i64) -> Result<bool>;

    /// Check if a slug already exists
    async fn exists_by_slug(&self, slug: &str) -> Result<bool>;

    /// Check if a slug exists for a different post (for updates)
    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool>;
}

/// SQLx-based post repository implementation
///
/// Supports both SQLite and MySQL databases.
pub struct SqlxPostRepository {
    pool: DynDatabasePool,
}

impl SqlxPostRepository {
    /// Create a new SQLx post repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn PostRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl PostRepository for SqlxPostRepository {
    async fn create(&self, input: &CreatePostInput) -> Result<Post> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_post_sqlite(self.pool.as_sqlite().unwrap(), input).await,
            DatabaseDriver::Mysql => create_post_mysql(self.pool.as_mysql().unwrap(), input).await,
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_post_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => get_post_by_id_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn get_by_slug(&self, slug: &str) -> Result<Option<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                get_post_by_slug_sqlite(self.pool.as_sqlite().unwrap(), slug).await
            }
            DatabaseDriver::Mysql => {
                get_post_by_slug_mysql(self.pool.as_mysql().unwrap(), slug).await
            }
        }
    }

    async fn list(&self, offset: i64, limit: i64) -> Result<Vec<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                list_posts_sqlite(self.pool.as_sqlite().unwrap(), offset, limit).await
            }
            DatabaseDriver::Mysql => {
                list_posts_mysql(self.pool.as_mysql().unwrap(), offset, limit).await
            }
        }
    }

    async fn list_all(&self) -> Result<Vec<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_all_posts_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => list_all_posts_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn count(&self) -> Result<i64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => count_posts_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Mysql => count_posts_mysql(self.pool.as_mysql().unwrap()).await,
        }
    }

    async fn update(&self, id: i64, input: &UpdatePostInput) -> Result<Option<Post>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_post_sqlite(self.pool.as_sqlite().unwrap(), id, input).await
            }
            DatabaseDriver::Mysql => {
                update_post_mysql(self.pool.as_mysql().unwrap(), id, input).await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_post_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Mysql => delete_post_mysql(self.pool.as_mysql().unwrap(), id).await,
        }
    }

    async fn exists_by_slug(&self, slug: &str) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                exists_by_slug_sqlite(self.pool.as_sqlite().unwrap(), slug).await
            }
            DatabaseDriver::Mysql => exists_by_slug_mysql(self.pool.as_mysql().unwrap(), slug).await,
        }
    }

    async fn exists_by_slug_excluding(&self, slug: &str, exclude_id: i64) -> Result<bool> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                exists_by_slug_excluding_sqlite(self.pool.as_sqlite().unwrap(), slug, exclude_id)
                    .await
            }
            DatabaseDriver::Mysql => {
                exists_by_slug_excluding_mysql(self.pool.as_mysql().unwrap(), slug, exclude_id)
                    .await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn create_post_sqlite(pool: &SqlitePool, input: &CreatePostInput) -> Result<Post> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO posts (title, tagline, slug, body, published_at, image)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&input.tagline)
    .bind(&input.slug)
    .bind(&input.body)
    .bind(now)
    .bind(&input.image)
    .execute(pool)
    .await
    .context("Failed to create post")?;

    let id = result.last_insert_rowid();

    Ok(Post {
        id,
        title: input.title.clone(),
        tagline: input.tagline.clone(),
        slug: input.slug.clone(),
        body: input.body.clone(),
        published_at: now,
        image: input.image.clone(),
    })
}

async fn get_post_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Post>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, tagline, slug, body, published_at, image
        FROM posts
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get post by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_post_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn get_post_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<Option<Post>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, tagline, slug, body, published_at, image
        FROM posts
        WHERE slug = ?
        "#,
    )
    .bind(slug)
    .fetch_optional(pool)
    .await
    .context("Failed to get post by slug")?;

    match row {
        Some(row) => Ok(Some(row_to_post_sqlite(&row)?)),
        None => Ok(None),
    }
}

async fn list_posts_sqlite(pool: &SqlitePool, offset: i64, limit: i64) -> Result<Vec<Post>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, tagline, slug, body, published_at, image
        FROM posts
        ORDER BY id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .context("Failed to list posts")?;

    let mut posts = Vec::new();
    for row in rows {
        posts.push(row_to_post_sqlite(&row)?);
    }

    Ok(posts)
}

async fn list_all_posts_sqlite(pool: &SqlitePool) -> Result<Vec<Post>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, tagline, slug, body, published_at, image
        FROM posts
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list posts")?;

    let mut posts = Vec::new();
    for row in rows {
        posts.push(row_to_post_sqlite(&row)?);
    }

    Ok(posts)
}

async fn count_posts_sqlite(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM posts")
        .fetch_one(pool)
        .await
        .context("Failed to count posts")?;

    Ok(row.get("count"))
}

async fn update_post_sqlite(
    pool: &SqlitePool,
    id: i64,
    input: &UpdatePostInput,
) -> Result<Option<Post>> {
    // Check existence first; an unchanged UPDATE can report zero
    // affected rows, which is not the same as "absent".
    if get_post_by_id_sqlite(pool, id).await?.is_none() {
        return Ok(None);
    }

    let now = Utc::now();

    sqlx::query(
        r#"
        UPDATE posts
        SET title = ?, tagline = ?, slug = ?, body = ?, published_at = ?, image = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.title)
    .bind(&input.tagline)
    .bind(&input.slug)
    .bind(&input.body)
    .bind(now)
    .bind(&input.image)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update post")?;

    Ok(Some(Post {
        id,
        title: input.title.clone(),
        tagline: input.tagline.clone(),
        slug: input.slug.clone(),
        body: input.body.clone(),
        published_at: now,
        image: input.image.clone(),
    }))
}

async fn delete_post_sqlite(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete post")?;

    Ok(result.rows_affected() > 0)
}

async fn exists_by_slug_sqlite(pool: &SqlitePool, slug: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE slug = ?")
        .bind(slug)
        .fetch_one(pool)
        .await
        .context("Failed to check slug existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

async fn exists_by_slug_excluding_sqlite(
    pool: &SqlitePool,
    slug: &str,
    exclude_id: i64,
) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE slug = ? AND id != ?")
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
        .context("Failed to check slug existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

fn row_to_post_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<Post> {
    Ok(Post {
        id: row.get("id"),
        title: row.get("title"),
        tagline: row.get("tagline"),
        slug: row.get("slug"),
        body: row.get("body"),
        published_at: row.get("published_at"),
        image: row.get("image"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn create_post_mysql(pool: &MySqlPool, input: &CreatePostInput) -> Result<Post> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO posts (title, tagline, slug, body, published_at, image)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.title)
    .bind(&input.tagline)
    .bind(&input.slug)
    .bind(&input.body)
    .bind(now)
    .bind(&input.image)
    .execute(pool)
    .await
    .context("Failed to create post")?;

    let id = result.last_insert_id() as i64;

    Ok(Post {
        id,
        title: input.title.clone(),
        tagline: input.tagline.clone(),
        slug: input.slug.clone(),
        body: input.body.clone(),
        published_at: now,
        image: input.image.clone(),
    })
}

async fn get_post_by_id_mysql(pool: &MySqlPool, id: i64) -> Result<Option<Post>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, tagline, slug, body, published_at, image
        FROM posts
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get post by ID")?;

    match row {
        Some(row) => Ok(Some(row_to_post_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn get_post_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<Option<Post>> {
    let row = sqlx::query(
        r#"
        SELECT id, title, tagline, slug, body, published_at, image
        FROM posts
        WHERE slug = ?
        "#,
    )
    .bind(slug)
    .fetch_optional(pool)
    .await
    .context("Failed to get post by slug")?;

    match row {
        Some(row) => Ok(Some(row_to_post_mysql(&row)?)),
        None => Ok(None),
    }
}

async fn list_posts_mysql(pool: &MySqlPool, offset: i64, limit: i64) -> Result<Vec<Post>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, tagline, slug, body, published_at, image
        FROM posts
        ORDER BY id
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
    .context("Failed to list posts")?;

    let mut posts = Vec::new();
    for row in rows {
        posts.push(row_to_post_mysql(&row)?);
    }

    Ok(posts)
}

async fn list_all_posts_mysql(pool: &MySqlPool) -> Result<Vec<Post>> {
    let rows = sqlx::query(
        r#"
        SELECT id, title, tagline, slug, body, published_at, image
        FROM posts
        ORDER BY id
        "#,
    )
    .fetch_all(pool)
    .await
    .context("Failed to list posts")?;

    let mut posts = Vec::new();
    for row in rows {
        posts.push(row_to_post_mysql(&row)?);
    }

    Ok(posts)
}

async fn count_posts_mysql(pool: &MySqlPool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM posts")
        .fetch_one(pool)
        .await
        .context("Failed to count posts")?;

    Ok(row.get("count"))
}

async fn update_post_mysql(
    pool: &MySqlPool,
    id: i64,
    input: &UpdatePostInput,
) -> Result<Option<Post>> {
    // Check existence first; an unchanged UPDATE can report zero
    // affected rows, which is not the same as "absent".
    if get_post_by_id_mysql(pool, id).await?.is_none() {
        return Ok(None);
    }

    let now = Utc::now();

    sqlx::query(
        r#"
        UPDATE posts
        SET title = ?, tagline = ?, slug = ?, body = ?, published_at = ?, image = ?
        WHERE id = ?
        "#,
    )
    .bind(&input.title)
    .bind(&input.tagline)
    .bind(&input.slug)
    .bind(&input.body)
    .bind(now)
    .bind(&input.image)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update post")?;

    Ok(Some(Post {
        id,
        title: input.title.clone(),
        tagline: input.tagline.clone(),
        slug: input.slug.clone(),
        body: input.body.clone(),
        published_at: now,
        image: input.image.clone(),
    }))
}

async fn delete_post_mysql(pool: &MySqlPool, id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete post")?;

    Ok(result.rows_affected() > 0)
}

async fn exists_by_slug_mysql(pool: &MySqlPool, slug: &str) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE slug = ?")
        .bind(slug)
        .fetch_one(pool)
        .await
        .context("Failed to check slug existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

async fn exists_by_slug_excluding_mysql(
    pool: &MySqlPool,
    slug: &str,
    exclude_id: i64,
) -> Result<bool> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM posts WHERE slug = ? AND id != ?")
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
        .context("Failed to check slug existence")?;

    let count: i64 = row.get("count");
    Ok(count > 0)
}

fn row_to_post_mysql(row: &sqlx::mysql::MySqlRow) -> Result<Post> {
    Ok(Post {
        id: row.get("id"),
        title: row.get("title"),
        tagline: row.get("tagline"),
        slug: row.get("slug"),
        body: row.get("body"),
        published_at: row.get("published_at"),
        image: row.get("image"),
    })
}

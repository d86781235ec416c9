//! Post service
//!
//! Implements business logic for post management:
//! - The paginated home listing with previous/next navigation
//! - Slug-keyed public reads
//! - Create, update, delete with validation and slug uniqueness

use crate::db::repositories::PostRepository;
use crate::models::{CreatePostInput, PageNav, Post, PostPage, UpdatePostInput};
use anyhow::Context;
use std::sync::Arc;

/// Error types for post service operations
#[derive(Debug, thiserror::Error)]
pub enum PostServiceError {
    /// Post not found
    #[error("Post not found: {0}")]
    NotFound(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Duplicate slug
    #[error("Post slug already exists: {0}")]
    DuplicateSlug(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Post service for managing blog posts
pub struct PostService {
    repo: Arc<dyn PostRepository>,
    posts_per_page: u32,
}

impl PostService {
    /// Create a new post service
    ///
    /// # Arguments
    /// * `repo` - Post repository for database operations
    /// * `posts_per_page` - Configured page size for the home listing
    pub fn new(repo: Arc<dyn PostRepository>, posts_per_page: u32) -> Self {
        Self {
            repo,
            // A zero page size would make every page empty and the page
            // arithmetic meaningless; config normalizes this too.
            posts_per_page: posts_per_page.max(1),
        }
    }

    /// One page of the home listing.
    ///
    /// Posts are returned in insertion order. A page past the end yields
    /// an empty slice without error. `prev` is absent on page 1 and
    /// `next` is absent on the last page; an empty collection has
    /// neither link.
    pub async fn front_page(&self, page: u32) -> Result<PostPage, PostServiceError> {
        let page = page.max(1);
        let size = self.posts_per_page;

        let total = self.repo.count().await.context("Failed to count posts")?;
        let last_page = last_page(total, size);

        let offset = (page as i64 - 1) * size as i64;
        let posts = self
            .repo
            .list(offset, size as i64)
            .await
            .context("Failed to list posts")?;

        Ok(PostPage {
            posts,
            page,
            last_page,
            total,
            nav: page_nav(page, last_page),
        })
    }

    /// Get a post by its public slug
    ///
    /// # Errors
    /// - `NotFound` when no post carries the slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<Post, PostServiceError> {
        self.repo
            .get_by_slug(slug)
            .await
            .context("Failed to get post by slug")?
            .ok_or_else(|| PostServiceError::NotFound(format!("No post with slug '{}'", slug)))
    }

    /// Get a post by its identifier
    ///
    /// # Errors
    /// - `NotFound` when the ID does not resolve
    pub async fn get_by_id(&self, id: i64) -> Result<Post, PostServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get post by ID")?
            .ok_or_else(|| PostServiceError::NotFound(format!("No post with ID {}", id)))
    }

    /// All posts for the dashboard, in insertion order
    pub async fn list_all(&self) -> Result<Vec<Post>, PostServiceError> {
        Ok(self.repo.list_all().await.context("Failed to list posts")?)
    }

    /// Create a new post with a server-assigned publication timestamp
    ///
    /// # Errors
    /// - `ValidationError` if any required field is empty
    /// - `DuplicateSlug` if the slug already exists
    pub async fn create(&self, input: CreatePostInput) -> Result<Post, PostServiceError> {
        validate_fields(&input.title, &input.tagline, &input.slug, &input.body)?;

        if self
            .repo
            .exists_by_slug(&input.slug)
            .await
            .context("Failed to check slug uniqueness")?
        {
            return Err(PostServiceError::DuplicateSlug(input.slug));
        }

        let post = self
            .repo
            .create(&input)
            .await
            .context("Failed to create post")?;

        tracing::info!("Created post {} ({})", post.id, post.slug);
        Ok(post)
    }

    /// Update an existing post, overwriting every field and refreshing
    /// the publication timestamp. The identifier never changes.
    ///
    /// # Errors
    /// - `NotFound` if the ID does not resolve
    /// - `ValidationError` if any required field is empty
    /// - `DuplicateSlug` if the new slug belongs to a different post
    pub async fn update(
        &self,
        id: i64,
        input: UpdatePostInput,
    ) -> Result<Post, PostServiceError> {
        validate_fields(&input.title, &input.tagline, &input.slug, &input.body)?;

        if self
            .repo
            .exists_by_slug_excluding(&input.slug, id)
            .await
            .context("Failed to check slug uniqueness")?
        {
            return Err(PostServiceError::DuplicateSlug(input.slug));
        }

        let updated = self
            .repo
            .update(id, &input)
            .await
            .context("Failed to update post")?
            .ok_or_else(|| PostServiceError::NotFound(format!("No post with ID {}", id)))?;

        tracing::info!("Updated post {} ({})", updated.id, updated.slug);
        Ok(updated)
    }

    /// Delete a post by identifier.
    ///
    /// Deleting a nonexistent identifier is a no-op; the returned flag
    /// reports whether a post was actually removed.
    pub async fn delete(&self, id: i64) -> Result<bool, PostServiceError> {
        let deleted = self
            .repo
            .delete(id)
            .await
            .context("Failed to delete post")?;

        if deleted {
            tracing::info!("Deleted post {}", id);
        }
        Ok(deleted)
    }
}

/// Total number of pages for a collection size and page size
fn last_page(total: i64, page_size: u32) -> u32 {
    if total <= 0 {
        return 0;
    }
    ((total as u64 + page_size as u64 - 1) / page_size as u64) as u32
}

/// Previous/next navigation for a page.
///
/// With an empty collection `last_page` is 0 and page 1 gets neither
/// link.
fn page_nav(page: u32, last_page: u32) -> PageNav {
    PageNav {
        prev: if page <= 1 { None } else { Some(page - 1) },
        next: if page >= last_page { None } else { Some(page + 1) },
    }
}

fn validate_fields(
    title: &str,
    tagline: &str,
    slug: &str,
    body: &str,
) -> Result<(), PostServiceError> {
    if title.trim().is_empty() {
        return Err(PostServiceError::ValidationError(
            "Title cannot be empty".to_string(),
        ));
    }
    if tagline.trim().is_empty() {
        return Err(PostServiceError::ValidationError(
            "Tagline cannot be empty".to_string(),
        ));
    }
    if slug.trim().is_empty() {
        return Err(PostServiceError::ValidationError(
            "Slug cannot be empty".to_string(),
        ));
    }
    if body.trim().is_empty() {
        return Err(PostServiceError::ValidationError(
            "Body cannot be empty".to_string(),
        ));
    }
    Ok(())
}

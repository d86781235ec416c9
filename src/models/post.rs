//! Post model
//!
//! This module provides:
//! - `Post` entity representing a blog post
//! - Input types for creating and updating posts
//! - Pagination types for the home listing

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier
    pub id: i64,
    /// Post title
    pub title: String,
    /// Short tagline shown under the title
    pub tagline: String,
    /// URL-friendly slug, unique across all posts
    pub slug: String,
    /// Post body
    pub body: String,
    /// Publication timestamp, server-assigned
    pub published_at: DateTime<Utc>,
    /// Stored image filename, if any
    #[serde(default)]
    pub image: Option<String>,
}

/// Input for creating a new post
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostInput {
    pub title: String,
    pub tagline: String,
    pub slug: String,
    pub body: String,
    pub image: Option<String>,
}

/// Input for updating an existing post
///
/// Every field is overwritten on update; the publication timestamp is
/// refreshed by the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatePostInput {
    pub title: String,
    pub tagline: String,
    pub slug: String,
    pub body: String,
    pub image: Option<String>,
}

/// Navigation targets for a page of the home listing.
///
/// `None` is the "no link" sentinel: the first page has no `prev`, the
/// last page (and an empty collection) has no `next`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageNav {
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

/// One page of the home listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPage {
    /// Posts on this page, in insertion order
    pub posts: Vec<Post>,
    /// Requested page number (1-indexed)
    pub page: u32,
    /// Total number of pages
    pub last_page: u32,
    /// Total number of posts across all pages
    pub total: i64,
    /// Previous/next navigation
    pub nav: PageNav,
}

impl PostPage {
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }
}

//! Public content endpoints
//!
//! Handles HTTP requests for the public blog surface:
//! - GET / - paginated post listing
//! - GET /post/{slug} - single post by slug
//! - GET /about - site information

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{ApiError, AppState};
use crate::models::Post;
use crate::services::PostServiceError;

/// Query parameters for the home listing
#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    /// Requested page; anything that is not a non-negative integer
    /// literal falls back to page 1
    pub page: Option<String>,
}

/// View model for one page of the home listing
#[derive(Debug, Serialize, Deserialize)]
pub struct HomePage {
    pub title: String,
    pub posts: Vec<Post>,
    pub page: u32,
    pub last_page: u32,
    pub total: i64,
    /// Link to the previous page, absent on page 1
    pub prev: Option<String>,
    /// Link to the next page, absent on the last page
    pub next: Option<String>,
}

/// View model for the about page
#[derive(Debug, Serialize, Deserialize)]
pub struct AboutPage {
    pub title: String,
    pub tagline: String,
    pub about: String,
}

/// GET / - paginated post listing
pub async fn home(
    State(state): State<AppState>,
    Query(query): Query<HomeQuery>,
) -> Result<Json<HomePage>, ApiError> {
    let page = query
        .page
        .as_deref()
        .and_then(|raw| raw.parse::<u32>().ok())
        .unwrap_or(1);

    let listing = state
        .post_service
        .front_page(page)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(HomePage {
        title: state.site.title.clone(),
        prev: listing.nav.prev.map(page_link),
        next: listing.nav.next.map(page_link),
        page: listing.page,
        last_page: listing.last_page,
        total: listing.total,
        posts: listing.posts,
    }))
}

fn page_link(page: u32) -> String {
    format!("/?page={}", page)
}

/// GET /post/{slug} - single post by slug
pub async fn post_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<Post>, ApiError> {
    let post = state
        .post_service
        .get_by_slug(&slug)
        .await
        .map_err(|e| match e {
            PostServiceError::NotFound(msg) => ApiError::not_found(msg),
            _ => ApiError::internal_error(e.to_string()),
        })?;

    Ok(Json(post))
}

/// GET /about - static site information
pub async fn about(State(state): State<AppState>) -> Json<AboutPage> {
    Json(AboutPage {
        title: state.site.title.clone(),
        tagline: state.site.tagline.clone(),
        about: state.site.about.clone(),
    })
}

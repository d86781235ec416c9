//! Admin endpoints
//!
//! Handles HTTP requests for the admin surface:
//! - GET/POST /dashboard - login form / admin post listing
//! - GET /logout - session teardown
//! - GET/POST /edit/{id} - post editor (id 0 opens an empty editor;
//!   submitting it creates a post, any other id updates that post)
//! - POST /delete/{id} - post deletion

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Redirect},
    Form, Json,
};
use serde::{Deserialize, Serialize};

use crate::api::middleware::{
    clear_session_cookie, extract_session_token, session_cookie, AdminIdentity, ApiError, AppState,
};
use crate::models::{CreatePostInput, Post, UpdatePostInput};
use crate::services::{AuthError, PostServiceError};

/// Form body for the dashboard login
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// View model for the dashboard.
///
/// When unauthenticated this doubles as the login prompt: the post
/// list is absent and `authenticated` is false, with no further
/// detail about why.
#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardView {
    pub authenticated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posts: Option<Vec<Post>>,
}

/// Form body for the post editor
#[derive(Debug, Deserialize)]
pub struct EditorForm {
    pub title: String,
    pub tagline: String,
    pub slug: String,
    pub body: String,
    /// Stored image filename; an empty field means no image
    #[serde(default)]
    pub image: String,
}

impl EditorForm {
    fn image(&self) -> Option<String> {
        let trimmed = self.image.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}

/// View model for the post editor
#[derive(Debug, Serialize, Deserialize)]
pub struct EditorView {
    /// The post being edited; absent for the empty create form
    pub post: Option<Post>,
}

/// GET /dashboard - login prompt or admin post listing
pub async fn dashboard_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardView>, ApiError> {
    let authenticated = match extract_session_token(&headers) {
        Some(token) => state
            .auth_service
            .validate(&token)
            .await
            .map_err(|e| ApiError::internal_error(e.to_string()))?
            .is_some(),
        None => false,
    };

    if !authenticated {
        return Ok(Json(DashboardView {
            authenticated: false,
            posts: None,
        }));
    }

    let posts = state
        .post_service
        .list_all()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Json(DashboardView {
        authenticated: true,
        posts: Some(posts),
    }))
}

/// POST /dashboard - login
///
/// On success the session cookie is set and the dashboard returned.
/// On failure the login prompt is re-answered with no error detail.
pub async fn dashboard_login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, ApiError> {
    let session = match state
        .auth_service
        .login(&form.username, &form.password)
        .await
    {
        Ok(session) => session,
        Err(AuthError::InvalidCredentials) => {
            return Ok((
                HeaderMap::new(),
                Json(DashboardView {
                    authenticated: false,
                    posts: None,
                }),
            ));
        }
        Err(e) => return Err(ApiError::internal_error(e.to_string())),
    };

    let posts = state
        .post_service
        .list_all()
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    let cookie = session_cookie(&session.token, state.session_max_age_secs);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&cookie)
            .map_err(|e| ApiError::internal_error(format!("Invalid cookie: {}", e)))?,
    );

    Ok((
        headers,
        Json(DashboardView {
            authenticated: true,
            posts: Some(posts),
        }),
    ))
}

/// GET /logout - clear the session and return to the dashboard
pub async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(token) = extract_session_token(&headers) {
        state
            .auth_service
            .logout(&token)
            .await
            .map_err(|e| ApiError::internal_error(e.to_string()))?;
    }

    let mut response_headers = HeaderMap::new();
    response_headers.insert(
        header::SET_COOKIE,
        HeaderValue::from_str(&clear_session_cookie())
            .map_err(|e| ApiError::internal_error(format!("Invalid cookie: {}", e)))?,
    );

    Ok((response_headers, Redirect::to("/dashboard")))
}

/// GET /edit/{id} - editor form
///
/// Id 0 opens the empty create form; any other id pre-populates the
/// editor from the stored post, or answers 404.
pub async fn edit_form(
    State(state): State<AppState>,
    _admin: AdminIdentity,
    Path(id): Path<i64>,
) -> Result<Json<EditorView>, ApiError> {
    if id == 0 {
        return Ok(Json(EditorView { post: None }));
    }

    let post = state.post_service.get_by_id(id).await.map_err(|e| match e {
        PostServiceError::NotFound(msg) => ApiError::not_found(msg),
        _ => ApiError::internal_error(e.to_string()),
    })?;

    Ok(Json(EditorView { post: Some(post) }))
}

/// POST /edit/{id} - create or update a post
///
/// Id 0 creates a new post and redirects to its editor; any other id
/// overwrites that post and redirects back to the same editor.
pub async fn edit_submit(
    State(state): State<AppState>,
    _admin: AdminIdentity,
    Path(id): Path<i64>,
    Form(form): Form<EditorForm>,
) -> Result<Redirect, ApiError> {
    let image = form.image();

    let post_id = if id == 0 {
        let created = state
            .post_service
            .create(CreatePostInput {
                title: form.title,
                tagline: form.tagline,
                slug: form.slug,
                body: form.body,
                image,
            })
            .await
            .map_err(map_post_error)?;
        created.id
    } else {
        let updated = state
            .post_service
            .update(
                id,
                UpdatePostInput {
                    title: form.title,
                    tagline: form.tagline,
                    slug: form.slug,
                    body: form.body,
                    image,
                },
            )
            .await
            .map_err(map_post_error)?;
        updated.id
    };

    Ok(Redirect::to(&format!("/edit/{}", post_id)))
}

/// POST /delete/{id} - delete a post
///
/// Deleting a nonexistent id is a no-op; either way the response
/// returns to the dashboard.
pub async fn delete_post(
    State(state): State<AppState>,
    _admin: AdminIdentity,
    Path(id): Path<i64>,
) -> Result<Redirect, ApiError> {
    state
        .post_service
        .delete(id)
        .await
        .map_err(|e| ApiError::internal_error(e.to_string()))?;

    Ok(Redirect::to("/dashboard"))
}

fn map_post_error(e: PostServiceError) -> ApiError {
    match e {
        PostServiceError::NotFound(msg) => ApiError::not_found(msg),
        PostServiceError::ValidationError(msg) => ApiError::validation_error(msg),
        PostServiceError::DuplicateSlug(slug) => {
            ApiError::conflict(format!("A post with slug '{}' already exists", slug))
        }
        PostServiceError::InternalError(e) => ApiError::internal_error(e.to_string()),
    }
}

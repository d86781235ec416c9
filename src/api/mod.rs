//! API layer - HTTP handlers and routing
//!
//! This module contains all HTTP endpoints for the Tinta blog engine:
//! - Public content endpoints (home listing, single post, about)
//! - Admin endpoints (dashboard, editor, delete, logout)
//! - Contact endpoints
//! - Upload endpoint and static serving of the upload directory

pub mod admin;
pub mod contact;
pub mod middleware;
pub mod posts;
pub mod upload;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use middleware::{AdminIdentity, ApiError, AppState};

/// Build the complete application router
pub fn build_router(state: AppState) -> Router {
    // Routes behind the admin gate
    let admin_routes = Router::new()
        .route("/edit/{id}", get(admin::edit_form).post(admin::edit_submit))
        .route("/delete/{id}", post(admin::delete_post))
        .route("/uploader", get(upload::upload_form).post(upload::upload_file))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ));

    let upload_dir = state.upload_config.path.clone();

    Router::new()
        .route("/", get(posts::home))
        .route("/about", get(posts::about))
        .route("/post/{slug}", get(posts::post_by_slug))
        .route(
            "/dashboard",
            get(admin::dashboard_page).post(admin::dashboard_login),
        )
        .route("/logout", get(admin::logout))
        .route(
            "/contact",
            get(contact::contact_page).post(contact::contact_submit),
        )
        .merge(admin_routes)
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdminConfig, SiteConfig, UploadConfig};
    use crate::db::repositories::{
        SqlxContactRepository, SqlxPostRepository, SqlxSessionRepository,
    };
    use crate::db::{create_test_pool, migrations};
    use crate::models::CreatePostInput;
    use crate::services::{
        AdminAuthService, ContactService, DisabledSender, PostService,
    };
    use axum::http::{header, HeaderName, StatusCode};
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde::Serialize;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    struct TestApp {
        server: TestServer,
        state: AppState,
        // Keeps the upload directory alive for the test's duration
        _upload_dir: TempDir,
    }

    async fn spawn_app() -> TestApp {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let upload_dir = TempDir::new().expect("Failed to create upload dir");

        let admin = AdminConfig {
            username: "admin".to_string(),
            password: "secret".to_string(),
            session_ttl_hours: 1,
        };

        let post_service = Arc::new(PostService::new(SqlxPostRepository::boxed(pool.clone()), 5));
        let auth_service = Arc::new(AdminAuthService::new(
            admin,
            SqlxSessionRepository::boxed(pool.clone()),
        ));
        let contact_service = Arc::new(ContactService::new(
            SqlxContactRepository::boxed(pool),
            Arc::new(DisabledSender),
            Duration::from_secs(1),
        ));

        let state = AppState {
            post_service,
            auth_service,
            contact_service,
            site: Arc::new(SiteConfig {
                title: "Test Blog".to_string(),
                tagline: "testing".to_string(),
                about: "about text".to_string(),
            }),
            upload_config: Arc::new(UploadConfig {
                path: upload_dir.path().to_path_buf(),
                max_file_size: 1024,
                allowed_types: vec!["image/png".to_string()],
            }),
            session_max_age_secs: 3600,
        };

        let server = TestServer::new(build_router(state.clone())).expect("Failed to start server");

        TestApp {
            server,
            state,
            _upload_dir: upload_dir,
        }
    }

    async fn seed_posts(app: &TestApp, count: usize) {
        for n in 1..=count {
            app.state
                .post_service
                .create(CreatePostInput {
                    title: format!("Post {}", n),
                    tagline: "tagline".to_string(),
                    slug: format!("post-{}", n),
                    body: "body".to_string(),
                    image: None,
                })
                .await
                .expect("Seed create failed");
        }
    }

    async fn admin_token(app: &TestApp) -> String {
        app.state
            .auth_service
            .login("admin", "secret")
            .await
            .expect("Login failed")
            .token
    }

    fn bearer(token: &str) -> (HeaderName, axum::http::HeaderValue) {
        (
            header::AUTHORIZATION,
            format!("Bearer {}", token).parse().unwrap(),
        )
    }

    #[derive(Serialize)]
    struct EditorFormBody<'a> {
        title: &'a str,
        tagline: &'a str,
        slug: &'a str,
        body: &'a str,
        image: &'a str,
    }

    // ------------------------------------------------------------------
    // Public surface
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_home_listing_pagination() {
        let app = spawn_app().await;
        seed_posts(&app, 12).await;

        let res = app.server.get("/").await;
        res.assert_status(StatusCode::OK);
        let page: posts::HomePage = res.json();
        assert_eq!(page.page, 1);
        assert_eq!(page.last_page, 3);
        assert_eq!(page.posts.len(), 5);
        assert_eq!(page.prev, None);
        assert_eq!(page.next.as_deref(), Some("/?page=2"));

        let res = app.server.get("/").add_query_param("page", "3").await;
        let page: posts::HomePage = res.json();
        assert_eq!(page.posts.len(), 2);
        assert_eq!(page.prev.as_deref(), Some("/?page=2"));
        assert_eq!(page.next, None);
    }

    #[tokio::test]
    async fn test_home_non_numeric_page_defaults_to_one() {
        let app = spawn_app().await;
        seed_posts(&app, 3).await;

        let res = app.server.get("/").add_query_param("page", "abc").await;
        res.assert_status(StatusCode::OK);
        let page: posts::HomePage = res.json();
        assert_eq!(page.page, 1);
        assert_eq!(page.posts.len(), 3);
    }

    #[tokio::test]
    async fn test_home_empty_collection_has_no_links() {
        let app = spawn_app().await;

        let res = app.server.get("/").await;
        let page: posts::HomePage = res.json();
        assert!(page.posts.is_empty());
        assert_eq!(page.prev, None);
        assert_eq!(page.next, None);
    }

    #[tokio::test]
    async fn test_post_by_slug() {
        let app = spawn_app().await;
        seed_posts(&app, 1).await;

        let res = app.server.get("/post/post-1").await;
        res.assert_status(StatusCode::OK);

        let res = app.server.get("/post/missing").await;
        res.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_about_page() {
        let app = spawn_app().await;

        let res = app.server.get("/about").await;
        res.assert_status(StatusCode::OK);
        let page: posts::AboutPage = res.json();
        assert_eq!(page.title, "Test Blog");
        assert_eq!(page.about, "about text");
    }

    // ------------------------------------------------------------------
    // Auth gate
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_dashboard_login_flow() {
        let app = spawn_app().await;
        seed_posts(&app, 2).await;

        // Unauthenticated GET shows the login prompt
        let res = app.server.get("/dashboard").await;
        res.assert_status(StatusCode::OK);
        let view: admin::DashboardView = res.json();
        assert!(!view.authenticated);
        assert!(view.posts.is_none());

        // Wrong credentials re-answer the prompt with no detail
        let res = app
            .server
            .post("/dashboard")
            .form(&[("username", "admin"), ("password", "wrong")])
            .await;
        res.assert_status(StatusCode::OK);
        let view: admin::DashboardView = res.json();
        assert!(!view.authenticated);

        // Correct credentials set the session cookie and list posts
        let res = app
            .server
            .post("/dashboard")
            .form(&[("username", "admin"), ("password", "secret")])
            .await;
        res.assert_status(StatusCode::OK);
        let cookie_header = res
            .headers()
            .get(header::SET_COOKIE)
            .expect("Session cookie should be set")
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie_header.starts_with("session="));
        let view: admin::DashboardView = res.json();
        assert!(view.authenticated);
        assert_eq!(view.posts.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unauthenticated_edit_never_mutates() {
        let app = spawn_app().await;
        seed_posts(&app, 1).await;

        let res = app.server.get("/edit/1").await;
        res.assert_status(StatusCode::UNAUTHORIZED);

        let res = app
            .server
            .post("/edit/1")
            .form(&EditorFormBody {
                title: "Hacked",
                tagline: "x",
                slug: "post-1",
                body: "x",
                image: "",
            })
            .await;
        res.assert_status(StatusCode::UNAUTHORIZED);

        let post = app.state.post_service.get_by_id(1).await.unwrap();
        assert_eq!(post.title, "Post 1");
    }

    #[tokio::test]
    async fn test_unauthenticated_delete_never_mutates() {
        let app = spawn_app().await;
        seed_posts(&app, 1).await;

        let res = app.server.post("/delete/1").await;
        res.assert_status(StatusCode::UNAUTHORIZED);

        assert!(app.state.post_service.get_by_id(1).await.is_ok());
    }

    #[tokio::test]
    async fn test_unauthenticated_upload_never_accepts_a_file() {
        let app = spawn_app().await;

        let res = app
            .server
            .post("/uploader")
            .multipart(
                MultipartForm::new().add_part(
                    "file",
                    Part::bytes(b"data".to_vec())
                        .file_name("x.png")
                        .mime_type("image/png"),
                ),
            )
            .await;
        res.assert_status(StatusCode::UNAUTHORIZED);

        let entries = std::fs::read_dir(app.state.upload_config.path.as_path())
            .unwrap()
            .count();
        assert_eq!(entries, 0);
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let app = spawn_app().await;
        let token = admin_token(&app).await;

        let (name, value) = bearer(&token);
        let res = app.server.get("/logout").add_header(name, value).await;
        res.assert_status(StatusCode::SEE_OTHER);

        // The token no longer opens the gate
        let (name, value) = bearer(&token);
        let res = app.server.get("/edit/0").add_header(name, value).await;
        res.assert_status(StatusCode::UNAUTHORIZED);
    }

    // ------------------------------------------------------------------
    // Post editing
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_edit_zero_creates_and_redirects() {
        let app = spawn_app().await;
        let token = admin_token(&app).await;

        let (name, value) = bearer(&token);
        let res = app.server.get("/edit/0").add_header(name, value).await;
        res.assert_status(StatusCode::OK);
        let view: admin::EditorView = res.json();
        assert!(view.post.is_none());

        let (name, value) = bearer(&token);
        let res = app
            .server
            .post("/edit/0")
            .add_header(name, value)
            .form(&EditorFormBody {
                title: "Fresh",
                tagline: "new",
                slug: "fresh",
                body: "body",
                image: "",
            })
            .await;
        res.assert_status(StatusCode::SEE_OTHER);
        let location = res.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        assert_eq!(location, "/edit/1");

        let post = app.state.post_service.get_by_slug("fresh").await.unwrap();
        assert_eq!(post.title, "Fresh");
    }

    #[tokio::test]
    async fn test_edit_existing_overwrites_and_redirects_back() {
        let app = spawn_app().await;
        seed_posts(&app, 1).await;
        let token = admin_token(&app).await;

        let (name, value) = bearer(&token);
        let res = app
            .server
            .post("/edit/1")
            .add_header(name, value)
            .form(&EditorFormBody {
                title: "Rewritten",
                tagline: "tl",
                slug: "rewritten",
                body: "new body",
                image: "cover.png",
            })
            .await;
        res.assert_status(StatusCode::SEE_OTHER);
        let location = res.headers().get(header::LOCATION).unwrap().to_str().unwrap();
        assert_eq!(location, "/edit/1");

        let post = app.state.post_service.get_by_id(1).await.unwrap();
        assert_eq!(post.title, "Rewritten");
        assert_eq!(post.image.as_deref(), Some("cover.png"));
    }

    #[tokio::test]
    async fn test_edit_missing_post_is_not_found() {
        let app = spawn_app().await;
        let token = admin_token(&app).await;

        let (name, value) = bearer(&token);
        let res = app.server.get("/edit/99").add_header(name, value).await;
        res.assert_status(StatusCode::NOT_FOUND);

        let (name, value) = bearer(&token);
        let res = app
            .server
            .post("/edit/99")
            .add_header(name, value)
            .form(&EditorFormBody {
                title: "t",
                tagline: "tl",
                slug: "s",
                body: "b",
                image: "",
            })
            .await;
        res.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_edit_duplicate_slug_conflicts() {
        let app = spawn_app().await;
        seed_posts(&app, 2).await;
        let token = admin_token(&app).await;

        let (name, value) = bearer(&token);
        let res = app
            .server
            .post("/edit/2")
            .add_header(name, value)
            .form(&EditorFormBody {
                title: "t",
                tagline: "tl",
                slug: "post-1",
                body: "b",
                image: "",
            })
            .await;
        res.assert_status(StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_delete_redirects_even_for_missing_post() {
        let app = spawn_app().await;
        seed_posts(&app, 1).await;
        let token = admin_token(&app).await;

        let (name, value) = bearer(&token);
        let res = app.server.post("/delete/1").add_header(name, value).await;
        res.assert_status(StatusCode::SEE_OTHER);
        assert!(app.state.post_service.get_by_id(1).await.is_err());

        // Deleting an absent post is a no-op, not a failure
        let (name, value) = bearer(&token);
        let res = app.server.post("/delete/42").add_header(name, value).await;
        res.assert_status(StatusCode::SEE_OTHER);
    }

    // ------------------------------------------------------------------
    // Contact flow
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_contact_submission_sets_one_shot_flash() {
        let app = spawn_app().await;

        let res = app
            .server
            .post("/contact")
            .form(&[
                ("name", "Ada"),
                ("email", "ada@example.com"),
                ("phone", "555-0100"),
                ("message", "Hello"),
            ])
            .await;
        res.assert_status(StatusCode::SEE_OTHER);
        let flash_cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .expect("Flash cookie should be set")
            .to_str()
            .unwrap()
            .to_string();
        assert!(flash_cookie.starts_with("flash=success"));

        // The banner shows once and is consumed
        let flash_header: axum::http::HeaderValue = "flash=success".parse().unwrap();
        let res = app
            .server
            .get("/contact")
            .add_header(header::COOKIE, flash_header)
            .await;
        res.assert_status(StatusCode::OK);
        let clearing = res
            .headers()
            .get(header::SET_COOKIE)
            .expect("Flash cookie should be cleared")
            .to_str()
            .unwrap()
            .to_string();
        assert!(clearing.contains("Max-Age=0"));
        let page: contact::ContactPage = res.json();
        assert!(page.flash.is_some());

        // Without the cookie there is no banner
        let res = app.server.get("/contact").await;
        let page: contact::ContactPage = res.json();
        assert!(page.flash.is_none());
    }

    #[tokio::test]
    async fn test_contact_duplicate_email_gets_distinct_banner() {
        let app = spawn_app().await;

        let form = [
            ("name", "Ada"),
            ("email", "ada@example.com"),
            ("phone", "555-0100"),
            ("message", "Hello"),
        ];
        app.server.post("/contact").form(&form).await;

        let res = app.server.post("/contact").form(&form).await;
        res.assert_status(StatusCode::SEE_OTHER);
        let flash_cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(flash_cookie.starts_with("flash=duplicate"));
    }

    #[tokio::test]
    async fn test_contact_empty_message_is_rejected() {
        let app = spawn_app().await;

        let res = app
            .server
            .post("/contact")
            .form(&[
                ("name", "Ada"),
                ("email", "ada@example.com"),
                ("phone", ""),
                ("message", ""),
            ])
            .await;
        res.assert_status(StatusCode::BAD_REQUEST);
    }

    // ------------------------------------------------------------------
    // Upload flow
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_upload_sanitizes_and_overwrites() {
        let app = spawn_app().await;
        let token = admin_token(&app).await;

        let (name, value) = bearer(&token);
        let res = app
            .server
            .post("/uploader")
            .add_header(name, value)
            .multipart(
                MultipartForm::new().add_part(
                    "file",
                    Part::bytes(b"first".to_vec())
                        .file_name("../../escape.png")
                        .mime_type("image/png"),
                ),
            )
            .await;
        res.assert_status(StatusCode::OK);
        let body: upload::UploadResponse = res.json();
        assert_eq!(body.filename, "escape.png");
        assert_eq!(body.url, "/uploads/escape.png");

        let stored = app.state.upload_config.path.join("escape.png");
        assert_eq!(std::fs::read(&stored).unwrap(), b"first");

        // Same sanitized name overwrites the earlier file
        let (name, value) = bearer(&token);
        let res = app
            .server
            .post("/uploader")
            .add_header(name, value)
            .multipart(
                MultipartForm::new().add_part(
                    "file",
                    Part::bytes(b"second".to_vec())
                        .file_name("escape.png")
                        .mime_type("image/png"),
                ),
            )
            .await;
        res.assert_status(StatusCode::OK);
        assert_eq!(std::fs::read(&stored).unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_upload_rejects_disallowed_type_and_oversize() {
        let app = spawn_app().await;
        let token = admin_token(&app).await;

        let (name, value) = bearer(&token);
        let res = app
            .server
            .post("/uploader")
            .add_header(name, value)
            .multipart(
                MultipartForm::new().add_part(
                    "file",
                    Part::bytes(b"#!/bin/sh".to_vec())
                        .file_name("evil.sh")
                        .mime_type("application/x-sh"),
                ),
            )
            .await;
        res.assert_status(StatusCode::BAD_REQUEST);

        // Larger than the configured 1 KiB limit
        let (name, value) = bearer(&token);
        let res = app
            .server
            .post("/uploader")
            .add_header(name, value)
            .multipart(
                MultipartForm::new().add_part(
                    "file",
                    Part::bytes(vec![0u8; 2048])
                        .file_name("big.png")
                        .mime_type("image/png"),
                ),
            )
            .await;
        res.assert_status(StatusCode::BAD_REQUEST);
    }
}

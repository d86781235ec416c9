//! Tinta - a small single-admin personal blog engine

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tinta::{
    api::{self, AppState},
    config::Config,
    db::{
        self,
        repositories::{SqlxContactRepository, SqlxPostRepository, SqlxSessionRepository},
    },
    services::{
        AdminAuthService, ContactService, DisabledSender, NotificationSender, PostService,
        SmtpNotificationSender,
    },
};

/// Interval between expired-session sweeps
const SESSION_SWEEP_INTERVAL_SECS: u64 = 600;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tinta=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Tinta blog engine...");

    // Load configuration
    let config = Config::load_with_env(Path::new("config.yml"))?;
    tracing::info!("Configuration loaded");

    if config.admin.password.is_empty() {
        tracing::warn!("No admin password configured; dashboard login is disabled");
    }

    // Initialize database
    let pool = db::create_pool(&config.database).await?;
    tracing::info!("Database connected: {:?}", config.database.driver());

    // Run migrations
    db::migrations::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    // Create repositories
    let post_repo = SqlxPostRepository::boxed(pool.clone());
    let contact_repo = SqlxContactRepository::boxed(pool.clone());
    let session_repo = SqlxSessionRepository::boxed(pool.clone());

    // Pick the notification backend
    let notifier: Arc<dyn NotificationSender> = if config.mail.enabled {
        Arc::new(SmtpNotificationSender::new(&config.mail)?)
    } else {
        tracing::warn!("Mail disabled; contact notifications will be dropped");
        Arc::new(DisabledSender)
    };

    // Initialize services
    let post_service = Arc::new(PostService::new(
        post_repo,
        config.pagination.posts_per_page,
    ));
    let auth_service = Arc::new(AdminAuthService::new(config.admin.clone(), session_repo));
    let contact_service = Arc::new(ContactService::new(
        contact_repo,
        notifier,
        Duration::from_secs(config.mail.send_timeout_secs),
    ));

    // Build application state
    let state = AppState {
        post_service,
        auth_service: auth_service.clone(),
        contact_service,
        site: Arc::new(config.site.clone()),
        upload_config: Arc::new(config.upload.clone()),
        session_max_age_secs: config.admin.session_ttl_hours * 3600,
    };

    // Sweep expired sessions periodically
    {
        let auth = auth_service.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(SESSION_SWEEP_INTERVAL_SECS));
            loop {
                interval.tick().await;
                match auth.sweep_expired().await {
                    Ok(0) => {}
                    Ok(n) => tracing::debug!("Swept {} expired session(s)", n),
                    Err(e) => tracing::warn!("Session sweep failed: {}", e),
                }
            }
        });
    }

    // Build router
    let app = api::build_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

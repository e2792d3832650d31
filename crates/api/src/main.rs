use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wedsite_api::bootstrap::ensure_platform_admin;
use wedsite_api::config::{ServerConfig, StorageBackendKind};
use wedsite_api::router::build_app_router;
use wedsite_api::state::AppState;
use wedsite_api::storage::{ImageStorage, LocalImageStorage, S3ImageStorage};
use wedsite_notify::{EmailConfig, EmailDelivery};

/// How long in-flight emails may keep the process alive after shutdown.
const BACKGROUND_DRAIN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "wedsite_api=debug,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        app_env = ?config.app_env,
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = wedsite_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    wedsite_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    wedsite_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Platform admin ---
    match &config.admin_bootstrap {
        Some(admin) => ensure_platform_admin(&pool, admin)
            .await
            .expect("Failed to bootstrap platform admin"),
        None => tracing::info!("ADMIN_EMAIL/ADMIN_PASSWORD not set; skipping admin bootstrap"),
    }

    // --- Image storage ---
    let storage: Arc<dyn ImageStorage> = match config.storage.backend {
        StorageBackendKind::Local => {
            tokio::fs::create_dir_all(&config.storage.upload_dir)
                .await
                .expect("Failed to create UPLOAD_DIR");
            tracing::info!(dir = %config.storage.upload_dir.display(), "Using local image storage");
            Arc::new(LocalImageStorage::new(
                config.storage.upload_dir.clone(),
                &config.storage.upload_public_path,
            ))
        }
        StorageBackendKind::S3 => {
            let s3 = config
                .storage
                .s3
                .as_ref()
                .expect("S3 configuration must be present for the s3 backend");
            tracing::info!(bucket = %s3.bucket, "Using S3 image storage");
            Arc::new(S3ImageStorage::connect(s3).await)
        }
    };

    // --- Email ---
    let mailer = match EmailConfig::from_env() {
        Some(email_config) => {
            Some(EmailDelivery::new(email_config).expect("Invalid SMTP configuration"))
        }
        None => {
            tracing::warn!("SMTP_HOST not set; outgoing email is disabled");
            None
        }
    };

    // --- App state and router ---
    let state = AppState::new(pool.clone(), config.clone(), storage, mailer);
    let app = build_app_router(state.clone(), &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    // Peer addresses feed the per-client rate limiters.
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, draining background tasks");
    state.drain_background(BACKGROUND_DRAIN_GRACE).await;

    tracing::info!("Closing database pool");
    pool.close().await;
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl-C, starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}

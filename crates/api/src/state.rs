use std::sync::Arc;
use std::time::Duration;

use tokio_util::task::TaskTracker;
use wedsite_core::email_template::RenderedEmail;
use wedsite_core::registry::TemplateRegistry;
use wedsite_notify::EmailDelivery;

use crate::config::ServerConfig;
use crate::middleware::rate_limit::{RateLimitPolicy, RateLimiter};
use crate::storage::ImageStorage;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: wedsite_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Default-config providers keyed by template key.
    pub registry: Arc<TemplateRegistry>,
    pub storage: Arc<dyn ImageStorage>,
    /// `None` when SMTP is not configured; emails are then skipped.
    pub mailer: Option<Arc<EmailDelivery>>,
    /// Login, registration and token-redemption attempts.
    pub auth_limiter: Arc<RateLimiter>,
    /// Endpoints that send email.
    pub email_limiter: Arc<RateLimiter>,
    /// Fire-and-forget work (outgoing email) drained on shutdown.
    pub background: TaskTracker,
}

impl AppState {
    pub fn new(
        pool: wedsite_db::DbPool,
        config: ServerConfig,
        storage: Arc<dyn ImageStorage>,
        mailer: Option<EmailDelivery>,
    ) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            registry: Arc::new(TemplateRegistry::builtin()),
            storage,
            mailer: mailer.map(Arc::new),
            auth_limiter: Arc::new(RateLimiter::new("auth", RateLimitPolicy::auth())),
            email_limiter: Arc::new(RateLimiter::new("email", RateLimitPolicy::email())),
            background: TaskTracker::new(),
        }
    }

    /// Send an email on a background task. Failures are logged, never surfaced.
    pub fn send_email_in_background(&self, email: RenderedEmail) {
        let Some(mailer) = self.mailer.clone() else {
            tracing::debug!(subject = %email.subject, "Email delivery not configured; skipping");
            return;
        };
        self.background.spawn(async move {
            mailer.send_best_effort(&email).await;
        });
    }

    /// Stop accepting background work and wait up to `grace` for in-flight
    /// tasks. Returns `false` if some were still running at the deadline.
    pub async fn drain_background(&self, grace: Duration) -> bool {
        self.background.close();
        let pending = self.background.len();
        if pending > 0 {
            tracing::info!(pending, "Waiting for background tasks");
        }
        match tokio::time::timeout(grace, self.background.wait()).await {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(
                    pending = self.background.len(),
                    "Background tasks still running at shutdown; abandoning them"
                );
                false
            }
        }
    }
}

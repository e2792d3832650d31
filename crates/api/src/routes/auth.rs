//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, orders};
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /register         -> register
/// POST /login            -> login
/// POST /verify-email     -> verify_email
/// POST /forgot-password  -> forgot_password
/// POST /reset-password   -> reset_password
/// GET  /me               -> me (requires auth)
/// POST /logout           -> logout (requires auth)
/// GET  /admin-panels     -> admin_panels (requires auth)
/// GET  /orders           -> my_orders (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/verify-email", post(auth::verify_email))
        .route("/forgot-password", post(auth::forgot_password))
        .route("/reset-password", post(auth::reset_password))
        .route("/me", get(auth::me))
        .route("/logout", post(auth::logout))
        .route("/admin-panels", get(auth::admin_panels))
        .route("/orders", get(orders::my_orders))
}

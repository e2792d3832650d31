//! Route definitions for platform administration.

use axum::routing::{post, put};
use axum::Router;

use crate::handlers::orders;
use crate::state::AppState;

/// Routes mounted at `/admin`. All require the platform admin role.
///
/// ```text
/// POST /orders                       -> create_order
/// POST /orders/{order_id}/complete   -> complete_order
/// PUT  /orders/{order_id}/status     -> set_order_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", post(orders::create_order))
        .route("/orders/{order_id}/complete", post(orders::complete_order))
        .route("/orders/{order_id}/status", put(orders::set_order_status))
}
